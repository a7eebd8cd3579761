//! Read-only window/patch catalog.
//!
//! The catalog is constructed once at startup, validated in a single pass,
//! and shared by reference (`Arc<Catalog>`) with every optimization call.
//! The planner itself assumes validated input and carries no range checks.

use crate::models::{MaintenanceWindow, Patch};

/// Validation failures raised at the catalog boundary.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("duplicate {entity} id '{id}'")]
    DuplicateId { entity: &'static str, id: String },
    #[error("window '{id}': invalid timestamp '{value}'")]
    InvalidTimestamp { id: String, value: String },
    #[error("window '{id}': negative eng_cost_budget {value}")]
    NegativeBudget { id: String, value: f64 },
    #[error("patch '{id}': {field} {value} outside [{min}, {max}]")]
    OutOfRange {
        id: String,
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
    #[error("patch '{id}': negative eng_cost {value}")]
    NegativeCost { id: String, value: f64 },
}

/// Immutable catalog of maintenance windows and candidate patches.
///
/// Windows keep their input order; that order doubles as the chronological
/// proxy used by the dependency ordering constraints.
#[derive(Debug, Clone)]
pub struct Catalog {
    windows: Vec<MaintenanceWindow>,
    patches: Vec<Patch>,
}

impl Catalog {
    /// Validate and wrap the given windows and patches.
    pub fn new(
        windows: Vec<MaintenanceWindow>,
        patches: Vec<Patch>,
    ) -> Result<Self, CatalogError> {
        validate_windows(&windows)?;
        validate_patches(&patches)?;
        Ok(Self { windows, patches })
    }

    pub fn windows(&self) -> &[MaintenanceWindow] {
        &self.windows
    }

    pub fn patches(&self) -> &[Patch] {
        &self.patches
    }

    /// Demo data set: three windows and eight patches with dependency chains,
    /// including a two-level chain (p7 → p5 → p2).
    pub fn sample() -> Result<Self, CatalogError> {
        let windows = vec![
            window(
                "w1",
                "Saturday night – primary",
                "2025-03-01T22:00:00Z",
                "2025-03-02T02:00:00Z",
                120,
                10.0,
            ),
            window(
                "w2",
                "Sunday early – spillover",
                "2025-03-02T04:00:00Z",
                "2025-03-02T06:00:00Z",
                60,
                5.0,
            ),
            window(
                "w3",
                "Mid-week quick fixes",
                "2025-03-05T01:00:00Z",
                "2025-03-05T02:00:00Z",
                45,
                4.0,
            ),
        ];

        let patches = vec![
            patch(PatchSpec {
                id: "p1",
                name: "OpenSSL update",
                asset: "edge-proxy-01",
                asset_criticality: 5,
                cve: "CVE-2024-20001",
                cvss: 9.8,
                epss_like: 0.82,
                kev: true,
                downtime_minutes: 30,
                eng_cost: 2.0,
                change_risk: 0.25,
                depends_on: &[],
            }),
            patch(PatchSpec {
                id: "p2",
                name: "Hypervisor firmware",
                asset: "hv-cluster-a",
                asset_criticality: 5,
                cve: "CVE-2024-20417",
                cvss: 8.1,
                epss_like: 0.35,
                kev: false,
                downtime_minutes: 45,
                eng_cost: 3.0,
                change_risk: 0.45,
                depends_on: &[],
            }),
            patch(PatchSpec {
                id: "p3",
                name: "Postgres minor release",
                asset: "db-core-01",
                asset_criticality: 4,
                cve: "CVE-2024-21890",
                cvss: 7.5,
                epss_like: 0.6,
                kev: false,
                downtime_minutes: 25,
                eng_cost: 2.0,
                change_risk: 0.3,
                depends_on: &[],
            }),
            patch(PatchSpec {
                id: "p4",
                name: "ORM driver bump",
                asset: "app-tier",
                asset_criticality: 3,
                cve: "CVE-2024-22222",
                cvss: 6.5,
                epss_like: 0.2,
                kev: false,
                downtime_minutes: 10,
                eng_cost: 1.0,
                change_risk: 0.15,
                depends_on: &["p3"],
            }),
            patch(PatchSpec {
                id: "p5",
                name: "Guest tools rollout",
                asset: "hv-cluster-a",
                asset_criticality: 4,
                cve: "CVE-2024-23111",
                cvss: 7.0,
                epss_like: 0.5,
                kev: false,
                downtime_minutes: 20,
                eng_cost: 1.5,
                change_risk: 0.2,
                depends_on: &["p2"],
            }),
            patch(PatchSpec {
                id: "p6",
                name: "Log4j-style hotfix",
                asset: "search-01",
                asset_criticality: 4,
                cve: "CVE-2024-24400",
                cvss: 9.1,
                epss_like: 0.7,
                kev: true,
                downtime_minutes: 15,
                eng_cost: 1.0,
                change_risk: 0.1,
                depends_on: &[],
            }),
            patch(PatchSpec {
                id: "p7",
                name: "VM kernel respin",
                asset: "hv-cluster-a",
                asset_criticality: 4,
                cve: "CVE-2024-25555",
                cvss: 6.8,
                epss_like: 0.3,
                kev: false,
                downtime_minutes: 30,
                eng_cost: 2.0,
                change_risk: 0.35,
                depends_on: &["p5"],
            }),
            patch(PatchSpec {
                id: "p8",
                name: "Legacy ERP mega-patch",
                asset: "erp-legacy",
                asset_criticality: 5,
                cve: "CVE-2024-26666",
                cvss: 8.8,
                epss_like: 0.55,
                kev: false,
                downtime_minutes: 180,
                eng_cost: 8.0,
                change_risk: 0.7,
                depends_on: &[],
            }),
        ];

        Self::new(windows, patches)
    }
}

fn validate_windows(windows: &[MaintenanceWindow]) -> Result<(), CatalogError> {
    let mut seen = std::collections::HashSet::new();
    for w in windows {
        if !seen.insert(w.id.as_str()) {
            return Err(CatalogError::DuplicateId {
                entity: "window",
                id: w.id.clone(),
            });
        }
        if w.start().is_none() {
            return Err(CatalogError::InvalidTimestamp {
                id: w.id.clone(),
                value: w.start_iso.clone(),
            });
        }
        if w.end().is_none() {
            return Err(CatalogError::InvalidTimestamp {
                id: w.id.clone(),
                value: w.end_iso.clone(),
            });
        }
        if w.eng_cost_budget < 0.0 {
            return Err(CatalogError::NegativeBudget {
                id: w.id.clone(),
                value: w.eng_cost_budget,
            });
        }
    }
    Ok(())
}

fn validate_patches(patches: &[Patch]) -> Result<(), CatalogError> {
    let mut seen = std::collections::HashSet::new();
    for p in patches {
        if !seen.insert(p.id.as_str()) {
            return Err(CatalogError::DuplicateId {
                entity: "patch",
                id: p.id.clone(),
            });
        }
        range(&p.id, "asset_criticality", f64::from(p.asset_criticality), 1.0, 5.0)?;
        range(&p.id, "cvss", p.cvss, 0.0, 10.0)?;
        range(&p.id, "epss_like", p.epss_like, 0.0, 1.0)?;
        range(&p.id, "change_risk", p.change_risk, 0.0, 1.0)?;
        if p.eng_cost < 0.0 {
            return Err(CatalogError::NegativeCost {
                id: p.id.clone(),
                value: p.eng_cost,
            });
        }
    }
    Ok(())
}

fn range(
    id: &str,
    field: &'static str,
    value: f64,
    min: f64,
    max: f64,
) -> Result<(), CatalogError> {
    if value < min || value > max {
        return Err(CatalogError::OutOfRange {
            id: id.to_string(),
            field,
            value,
            min,
            max,
        });
    }
    Ok(())
}

fn window(
    id: &str,
    title: &str,
    start: &str,
    end: &str,
    downtime_budget_minutes: u32,
    eng_cost_budget: f64,
) -> MaintenanceWindow {
    MaintenanceWindow {
        id: id.to_string(),
        title: title.to_string(),
        start_iso: start.to_string(),
        end_iso: end.to_string(),
        downtime_budget_minutes,
        eng_cost_budget,
    }
}

struct PatchSpec<'a> {
    id: &'a str,
    name: &'a str,
    asset: &'a str,
    asset_criticality: u8,
    cve: &'a str,
    cvss: f64,
    epss_like: f64,
    kev: bool,
    downtime_minutes: u32,
    eng_cost: f64,
    change_risk: f64,
    depends_on: &'a [&'a str],
}

fn patch(spec: PatchSpec<'_>) -> Patch {
    Patch {
        id: spec.id.to_string(),
        name: spec.name.to_string(),
        asset: spec.asset.to_string(),
        asset_criticality: spec.asset_criticality,
        cve: spec.cve.to_string(),
        cvss: spec.cvss,
        epss_like: spec.epss_like,
        kev: spec.kev,
        downtime_minutes: spec.downtime_minutes,
        eng_cost: spec.eng_cost,
        change_risk: spec.change_risk,
        depends_on: spec.depends_on.iter().map(|d| d.to_string()).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_catalog_is_valid() {
        let catalog = Catalog::sample().unwrap();
        assert_eq!(catalog.windows().len(), 3);
        assert_eq!(catalog.patches().len(), 8);
    }

    #[test]
    fn test_sample_contains_two_level_chain() {
        let catalog = Catalog::sample().unwrap();
        let p7 = catalog.patches().iter().find(|p| p.id == "p7").unwrap();
        assert_eq!(p7.depends_on, vec!["p5".to_string()]);
        let p5 = catalog.patches().iter().find(|p| p.id == "p5").unwrap();
        assert_eq!(p5.depends_on, vec!["p2".to_string()]);
    }

    #[test]
    fn test_duplicate_patch_id_rejected() {
        let catalog = Catalog::sample().unwrap();
        let mut patches = catalog.patches().to_vec();
        patches.push(patches[0].clone());
        let err = Catalog::new(catalog.windows().to_vec(), patches).unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateId { entity: "patch", .. }));
    }

    #[test]
    fn test_out_of_range_cvss_rejected() {
        let catalog = Catalog::sample().unwrap();
        let mut patches = catalog.patches().to_vec();
        patches[0].cvss = 11.0;
        let err = Catalog::new(catalog.windows().to_vec(), patches).unwrap_err();
        assert!(matches!(err, CatalogError::OutOfRange { field: "cvss", .. }));
    }

    #[test]
    fn test_bad_timestamp_rejected() {
        let catalog = Catalog::sample().unwrap();
        let mut windows = catalog.windows().to_vec();
        windows[0].start_iso = "next saturday".to_string();
        let err = Catalog::new(windows, catalog.patches().to_vec()).unwrap_err();
        assert!(matches!(err, CatalogError::InvalidTimestamp { .. }));
    }
}
