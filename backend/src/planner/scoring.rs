//! Weight normalization and per-patch scoring.
//!
//! Both scores are deliberately *proxies* for demo-grade prioritization.
//! A production build would plug in real EPSS feeds, CISA KEV, asset
//! exposure and detection coverage instead.

use crate::models::{OptimizationWeights, Patch, PatchScore};

/// Normalize weights so the sum is 1.0.
///
/// Kept explicit so the UI can send any non-negative numbers without
/// worrying about normalization client-side. A non-positive sum falls back
/// to uniform thirds.
pub fn normalize_weights(w: &OptimizationWeights) -> OptimizationWeights {
    let total = w.risk + w.cost + w.outage;
    if total <= 0.0 {
        return OptimizationWeights {
            risk: 1.0 / 3.0,
            cost: 1.0 / 3.0,
            outage: 1.0 / 3.0,
        };
    }
    OptimizationWeights {
        risk: w.risk / total,
        cost: w.cost / total,
        outage: w.outage / total,
    }
}

/// Risk-reduction proxy: severity × exploitability × criticality,
/// boosted 25% for known-exploited vulnerabilities.
pub fn risk_reduction(p: &Patch) -> f64 {
    let sev = p.cvss / 10.0; // 0..1
    let expl = p.epss_like; // 0..1
    let crit = f64::from(p.asset_criticality) / 5.0; // 0..1
    let kev_boost = if p.kev { 1.25 } else { 1.0 };
    100.0 * sev * expl * crit * kev_boost
}

/// Outage/operational-pain proxy. Higher = more operational risk *if* the
/// patch ships.
pub fn outage_risk(p: &Patch) -> f64 {
    let crit = f64::from(p.asset_criticality) / 5.0;
    (30.0 * p.change_risk + 0.25 * f64::from(p.downtime_minutes)) * (1.0 + crit)
}

impl PatchScore {
    /// Score a patch under already-normalized weights.
    pub fn compute(p: &Patch, w: &OptimizationWeights) -> PatchScore {
        let rr = risk_reduction(p);
        let or = outage_risk(p);
        PatchScore {
            patch_id: p.id.clone(),
            risk_reduction: rr,
            eng_cost: p.eng_cost,
            outage_risk: or,
            weighted_total: w.risk * rr - w.cost * p.eng_cost - w.outage * or,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patch(cvss: f64, epss: f64, crit: u8, kev: bool) -> Patch {
        Patch {
            id: "p".to_string(),
            name: "test".to_string(),
            asset: "host".to_string(),
            asset_criticality: crit,
            cve: "CVE-2024-0000".to_string(),
            cvss,
            epss_like: epss,
            kev,
            downtime_minutes: 20,
            eng_cost: 2.0,
            change_risk: 0.5,
            depends_on: vec![],
        }
    }

    #[test]
    fn test_normalize_weights_sums_to_one() {
        let w = normalize_weights(&OptimizationWeights {
            risk: 5.0,
            cost: 3.0,
            outage: 2.0,
        });
        assert!((w.risk + w.cost + w.outage - 1.0).abs() < 1e-9);
        assert!((w.risk - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_normalize_all_zero_yields_thirds() {
        let w = normalize_weights(&OptimizationWeights {
            risk: 0.0,
            cost: 0.0,
            outage: 0.0,
        });
        assert_eq!(w.risk, 1.0 / 3.0);
        assert_eq!(w.cost, 1.0 / 3.0);
        assert_eq!(w.outage, 1.0 / 3.0);
    }

    #[test]
    fn test_risk_reduction_kev_boost() {
        let base = risk_reduction(&patch(8.0, 0.5, 4, false));
        let boosted = risk_reduction(&patch(8.0, 0.5, 4, true));
        assert!((boosted / base - 1.25).abs() < 1e-9);
    }

    #[test]
    fn test_risk_reduction_formula() {
        // 100 * (10/10) * 1.0 * (5/5) * 1.25 = 125
        let p = patch(10.0, 1.0, 5, true);
        assert!((risk_reduction(&p) - 125.0).abs() < 1e-9);
    }

    #[test]
    fn test_outage_risk_scales_with_criticality() {
        let low = outage_risk(&patch(5.0, 0.1, 1, false));
        let high = outage_risk(&patch(5.0, 0.1, 5, false));
        assert!(high > low);
        // (30*0.5 + 0.25*20) * (1 + 1/5) = 20 * 1.2 = 24
        assert!((low - 24.0).abs() < 1e-9);
    }

    #[test]
    fn test_weighted_total_composition() {
        let p = patch(10.0, 1.0, 5, false);
        let w = OptimizationWeights {
            risk: 1.0,
            cost: 0.0,
            outage: 0.0,
        };
        let score = PatchScore::compute(&p, &w);
        assert!((score.weighted_total - score.risk_reduction).abs() < 1e-9);

        let w = OptimizationWeights {
            risk: 0.0,
            cost: 1.0,
            outage: 0.0,
        };
        let score = PatchScore::compute(&p, &w);
        assert!((score.weighted_total + p.eng_cost).abs() < 1e-9);
    }
}
