//! Greedy DSATUR vertex coloring, used to seed the clique construction.

use crate::graph::Graph;
use std::collections::{BTreeSet, HashSet};

// ============================================================================
// Coloring
// ============================================================================

/// A proper vertex coloring: adjacent vertices never share a color.
#[derive(Clone, Debug)]
pub struct Coloring {
    colors: Vec<usize>,
    color_count: usize,
}

impl Coloring {
    /// Color assigned to vertex `v`.
    #[inline]
    pub fn color_of(&self, v: usize) -> usize {
        self.colors[v]
    }

    /// Number of distinct colors used.
    #[inline]
    pub fn color_count(&self) -> usize {
        self.color_count
    }

    /// The full assignment, indexed by vertex.
    #[inline]
    pub fn colors(&self) -> &[usize] {
        &self.colors
    }

    /// Returns whether no edge joins two equal colors.
    pub fn is_proper(&self, graph: &Graph) -> bool {
        (0..graph.n()).all(|v| {
            graph
                .neighbors(v)
                .iter()
                .all(|&u| self.colors[u] != self.colors[v])
        })
    }
}

/// Marker for a vertex that has not been assigned a color yet.
const UNCOLORED: usize = usize::MAX;

/// Colors the graph greedily in saturation order.
///
/// Repeatedly selects the uncolored vertex with the lexicographically
/// largest `(saturation, uncolored-degree, id)` triple, where saturation is
/// the number of distinct colors already present in its neighborhood, and
/// gives it the smallest color absent from that neighborhood. The selection
/// queue is an ordered set keyed by the triple; neighbor updates remove the
/// old key and reinsert the new one so the ordering stays valid.
pub fn dsatur(graph: &Graph) -> Coloring {
    let n = graph.n();
    let mut colors = vec![UNCOLORED; n];
    let mut color_count = 0;

    // Distinct colors seen in each vertex's neighborhood.
    let mut adjacent_colors: Vec<HashSet<usize>> = vec![HashSet::new(); n];
    let mut uncolored_degree: Vec<usize> = (0..n).map(|v| graph.degree(v)).collect();

    let mut queue: BTreeSet<(usize, usize, usize)> =
        (0..n).map(|v| (0, uncolored_degree[v], v)).collect();

    while let Some(&key) = queue.iter().next_back() {
        queue.remove(&key);
        let (_, _, v) = key;

        let mut color = 0;
        while adjacent_colors[v].contains(&color) {
            color += 1;
        }
        colors[v] = color;
        color_count = color_count.max(color + 1);

        for &u in graph.neighbors(v) {
            if colors[u] != UNCOLORED {
                continue;
            }
            let old_key = (adjacent_colors[u].len(), uncolored_degree[u], u);
            let removed = queue.remove(&old_key);
            debug_assert!(removed, "stale key for vertex {u}");
            adjacent_colors[u].insert(color);
            uncolored_degree[u] -= 1;
            queue.insert((adjacent_colors[u].len(), uncolored_degree[u], u));
        }
    }

    Coloring {
        colors,
        color_count,
    }
}

// ============================================================================
// Tests
// ============================================================================
