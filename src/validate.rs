//! Deterministic re-verification of reported cliques.
//!
//! The search engine maintains its clique incrementally; this module checks
//! the final answer against the graph from scratch, so a bookkeeping bug can
//! never ship a wrong result silently.

use crate::graph::Graph;

/// Returns `true` iff `vertices` names a clique: all ids in range, no
/// duplicates, every pair adjacent. The empty set is trivially a clique.
pub fn verify_clique(graph: &Graph, vertices: &[usize]) -> bool {
    for (i, &u) in vertices.iter().enumerate() {
        if u >= graph.n() {
            return false;
        }
        for &v in &vertices[i + 1..] {
            if u == v || !graph.has_edge(u, v) {
                return false;
            }
        }
    }
    true
}

// ============================================================================
// Tests
// ============================================================================
