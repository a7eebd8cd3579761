//! Dependency precedence graph over the patch catalog.
//!
//! Edge direction is dependency → dependent (B → A when A depends on B).
//! Dependency ids that reference patches outside the catalog are skipped,
//! i.e. treated as already satisfied.

use std::collections::{HashMap, HashSet};

use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;

use crate::models::Patch;

/// In-memory precedence graph, built fresh per optimization call.
pub struct DependencyGraph {
    graph: DiGraph<String, ()>,
    node_map: HashMap<String, NodeIndex>,
    /// Catalog position per patch id, used as a deterministic tie-break.
    position: HashMap<String, usize>,
}

impl DependencyGraph {
    /// Build the graph from the patch catalog, one node per patch id.
    pub fn build(patches: &[Patch]) -> Self {
        let mut graph = DiGraph::new();
        let mut node_map = HashMap::new();
        let mut position = HashMap::new();

        for (pos, patch) in patches.iter().enumerate() {
            let idx = graph.add_node(patch.id.clone());
            node_map.insert(patch.id.clone(), idx);
            position.insert(patch.id.clone(), pos);
        }
        for patch in patches {
            for dep in &patch.depends_on {
                if let (Some(&from), Some(&to)) = (node_map.get(dep), node_map.get(&patch.id)) {
                    graph.add_edge(from, to, ());
                }
            }
        }

        Self {
            graph,
            node_map,
            position,
        }
    }

    /// Whether the given id is a catalog patch (graph node).
    pub fn contains(&self, id: &str) -> bool {
        self.node_map.contains_key(id)
    }

    /// Returns one patch id participating in a dependency cycle, if any.
    pub fn find_cycle(&self) -> Option<String> {
        toposort(&self.graph, None)
            .err()
            .map(|cycle| self.graph[cycle.node_id()].clone())
    }

    /// Direct dependents of a patch (graph successors), in catalog order.
    pub fn dependents_of(&self, id: &str) -> Vec<String> {
        let Some(&idx) = self.node_map.get(id) else {
            return vec![];
        };
        let mut out: Vec<String> = self
            .graph
            .neighbors_directed(idx, Direction::Outgoing)
            .map(|n| self.graph[n].clone())
            .collect();
        out.sort_by_key(|n| self.position.get(n).copied().unwrap_or(usize::MAX));
        out
    }

    /// Topological order restricted to a subset of patch ids.
    ///
    /// Independent patches keep their relative input order (Kahn's algorithm
    /// with an input-position tie-break). If the induced subgraph contains a
    /// cycle the subset is returned in input order; cyclic catalogs are
    /// rejected before model construction, so this branch is a safety net.
    pub fn order_subset(&self, ids: &[String]) -> Vec<String> {
        // Position within the caller's slice, used as the stability tie-break.
        let input_pos: HashMap<&str, usize> = ids
            .iter()
            .enumerate()
            .map(|(i, id)| (id.as_str(), i))
            .collect();
        let members: HashSet<&str> = input_pos.keys().copied().collect();

        // In-degree within the induced subgraph.
        let mut indegree: HashMap<&str, usize> = HashMap::new();
        for id in ids {
            let Some(&idx) = self.node_map.get(id.as_str()) else {
                continue;
            };
            let deg = self
                .graph
                .neighbors_directed(idx, Direction::Incoming)
                .filter(|n| members.contains(self.graph[*n].as_str()))
                .count();
            indegree.insert(id.as_str(), deg);
        }

        let mut ordered = Vec::with_capacity(ids.len());
        let mut ready: Vec<&str> = ids
            .iter()
            .map(String::as_str)
            .filter(|id| indegree.get(id).copied() == Some(0))
            .collect();

        while !ready.is_empty() {
            let next = ready.remove(0);
            ordered.push(next.to_string());

            let Some(&idx) = self.node_map.get(next) else {
                continue;
            };
            for succ in self.graph.neighbors_directed(idx, Direction::Outgoing) {
                let name = self.graph[succ].as_str();
                if let Some(deg) = indegree.get_mut(name) {
                    *deg -= 1;
                    if *deg == 0 {
                        if let Some(&pos) = input_pos.get(name) {
                            ready.push(ids[pos].as_str());
                        }
                    }
                }
            }
            ready.sort_by_key(|id| input_pos.get(id).copied().unwrap_or(usize::MAX));
        }

        if ordered.len() != ids.len() {
            // Cycle in declared dependencies within this subset.
            return ids.to_vec();
        }
        ordered
    }
}
