//! Initial clique construction: seeds each restart with a maximal clique.

use crate::clique::CliqueState;
use crate::coloring::{Coloring, dsatur};
use crate::graph::Graph;
use rand::Rng;
use rand::seq::SliceRandom;
use std::collections::{BTreeSet, HashMap};

// ============================================================================
// Strategy
// ============================================================================

/// Strategy for building the initial clique of a restart.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConstructionStrategy {
    /// Randomized greedy growth over a shuffled candidate pool.
    RandomGreedy,
    /// Color the graph with DSATUR, then grow the clique guided by color
    /// saturation.
    SaturationGuided,
}

/// Grows a maximal clique inside `state` from an empty clique.
///
/// `randomization` controls the width of the randomized pick in the
/// random-greedy variant and is ignored by the saturation-guided one.
///
/// # Panics
/// Panics if the state's clique is non-empty or `randomization` is zero.
pub fn build_initial_clique<R: Rng + ?Sized>(
    state: &mut CliqueState<'_>,
    strategy: ConstructionStrategy,
    randomization: usize,
    rng: &mut R,
) {
    assert_eq!(
        state.clique_size(),
        0,
        "initial construction expects an empty clique"
    );
    match strategy {
        ConstructionStrategy::RandomGreedy => random_greedy(state, randomization, rng),
        ConstructionStrategy::SaturationGuided => saturation_guided(state),
    }
}

// ============================================================================
// Random-greedy
// ============================================================================

/// Repeatedly picks one of the first `min(randomization - 1, last)` pool
/// entries (inclusive), adds it, drops every pool vertex not adjacent to it
/// by swap-and-pop, and reshuffles. The pool shrinks to empty, at which
/// point no vertex outside the clique is adjacent to all of it.
fn random_greedy<R: Rng + ?Sized>(state: &mut CliqueState<'_>, randomization: usize, rng: &mut R) {
    assert!(randomization >= 1, "randomization must be at least 1");
    let graph = state.graph();

    let mut pool: Vec<usize> = (0..graph.n()).collect();
    pool.shuffle(rng);

    while !pool.is_empty() {
        let last = pool.len() - 1;
        let pick = rng.random_range(0..=(randomization - 1).min(last));
        let vertex = pool[pick];
        state.add_to_clique(vertex);

        let mut i = 0;
        while i < pool.len() {
            let candidate = pool[i];
            if candidate == vertex || !graph.has_edge(vertex, candidate) {
                pool.swap_remove(i);
            } else {
                i += 1;
            }
        }
        pool.shuffle(rng);
    }
}

// ============================================================================
// Saturation-guided
// ============================================================================

/// DSATUR-seeded growth. A queue over the eligible vertices is kept ordered
/// by `(color saturation, in-queue degree, id)`, where the saturation of a
/// vertex counts the distinct DSATUR colors among its neighbors still in the
/// queue. The top vertex joins the clique; its non-neighbors leave the
/// queue; affected keys are updated by erase/reinsert, the same discipline
/// the coloring itself uses.
fn saturation_guided(state: &mut CliqueState<'_>) {
    let graph = state.graph();
    let n = graph.n();
    if n == 0 {
        return;
    }
    let coloring = dsatur(graph);

    let mut in_queue = vec![true; n];
    // Per-vertex multiset of neighbor colors within the queue; the key uses
    // its distinct count.
    let mut color_counts: Vec<HashMap<usize, usize>> = vec![HashMap::new(); n];
    let mut queue_degree = vec![0usize; n];
    for v in 0..n {
        for &u in graph.neighbors(v) {
            *color_counts[v].entry(coloring.color_of(u)).or_insert(0) += 1;
        }
        queue_degree[v] = graph.degree(v);
    }

    let mut queue: BTreeSet<(usize, usize, usize)> = (0..n)
        .map(|v| (color_counts[v].len(), queue_degree[v], v))
        .collect();

    while let Some(&key) = queue.iter().next_back() {
        queue.remove(&key);
        let (_, _, v) = key;
        in_queue[v] = false;
        state.add_to_clique(v);

        // v leaving the queue shrinks its in-queue neighbors' keys.
        drop_from_neighbor_keys(graph, &coloring, &mut queue, &in_queue, &mut color_counts, &mut queue_degree, v);

        // Everything not adjacent to v can no longer join this clique.
        let evicted: Vec<usize> = queue
            .iter()
            .map(|&(_, _, w)| w)
            .filter(|&w| !graph.has_edge(v, w))
            .collect();
        for w in evicted {
            let removed = queue.remove(&(color_counts[w].len(), queue_degree[w], w));
            debug_assert!(removed, "stale key for vertex {w}");
            in_queue[w] = false;
            drop_from_neighbor_keys(graph, &coloring, &mut queue, &in_queue, &mut color_counts, &mut queue_degree, w);
        }
    }
}

/// Updates the queue keys of `removed`'s neighbors after `removed` left the
/// queue.
fn drop_from_neighbor_keys(
    graph: &Graph,
    coloring: &Coloring,
    queue: &mut BTreeSet<(usize, usize, usize)>,
    in_queue: &[bool],
    color_counts: &mut [HashMap<usize, usize>],
    queue_degree: &mut [usize],
    removed: usize,
) {
    let color = coloring.color_of(removed);
    for &u in graph.neighbors(removed) {
        if !in_queue[u] {
            continue;
        }
        let old_key = (color_counts[u].len(), queue_degree[u], u);
        let was_present = queue.remove(&old_key);
        debug_assert!(was_present, "stale key for vertex {u}");

        if let Some(count) = color_counts[u].get_mut(&color) {
            *count -= 1;
            if *count == 0 {
                color_counts[u].remove(&color);
            }
        }
        queue_degree[u] -= 1;
        queue.insert((color_counts[u].len(), queue_degree[u], u));
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Graph;
    use rand::{Rng, SeedableRng};
    use rand_xorshift::XorShiftRng;

    fn random_graph(rng: &mut XorShiftRng, n: usize, p: f64) -> Graph {
        let mut edges = Vec::new();
        for u in 0..n {
            for v in (u + 1)..n {
                if rng.random_bool(p) {
                    edges.push((u, v));
                }
            }
        }
        Graph::from_edges(n, &edges)
    }

    fn assert_maximal(state: &CliqueState<'_>) {
        let graph = state.graph();
        let clique = state.clique();
        for v in 0..graph.n() {
            if clique.contains(&v) {
                continue;
            }
            let adjacent_to_all = clique.iter().all(|&u| graph.has_edge(u, v));
            assert!(!adjacent_to_all, "vertex {v} could still extend the clique");
        }
    }

    #[test]
    fn random_greedy_builds_a_maximal_clique() {
        let mut rng = XorShiftRng::seed_from_u64(0x5EED);
        for _ in 0..20 {
            let g = random_graph(&mut rng, 18, 0.5);
            let mut state = CliqueState::new(&g);
            build_initial_clique(&mut state, ConstructionStrategy::RandomGreedy, 3, &mut rng);
            assert!(state.clique_size() >= 1);
            state.check_invariants();
            assert_maximal(&state);
        }
    }

    #[test]
    fn random_greedy_with_randomization_one_is_still_maximal() {
        let mut rng = XorShiftRng::seed_from_u64(0xA11);
        let g = random_graph(&mut rng, 15, 0.4);
        let mut state = CliqueState::new(&g);
        build_initial_clique(&mut state, ConstructionStrategy::RandomGreedy, 1, &mut rng);
        assert_maximal(&state);
    }

    #[test]
    fn saturation_guided_builds_a_maximal_clique() {
        let mut rng = XorShiftRng::seed_from_u64(0xBEE);
        for _ in 0..20 {
            let g = random_graph(&mut rng, 18, 0.5);
            let mut state = CliqueState::new(&g);
            build_initial_clique(
                &mut state,
                ConstructionStrategy::SaturationGuided,
                1,
                &mut rng,
            );
            assert!(state.clique_size() >= 1);
            state.check_invariants();
            assert_maximal(&state);
        }
    }

    #[test]
    fn both_strategies_fill_a_complete_graph() {
        let edges: Vec<(usize, usize)> = (0..6)
            .flat_map(|u| ((u + 1)..6).map(move |v| (u, v)))
            .collect();
        let g = Graph::from_edges(6, &edges);
        let mut rng = XorShiftRng::seed_from_u64(0xF00D);

        for strategy in [
            ConstructionStrategy::RandomGreedy,
            ConstructionStrategy::SaturationGuided,
        ] {
            let mut state = CliqueState::new(&g);
            build_initial_clique(&mut state, strategy, 2, &mut rng);
            assert_eq!(state.clique(), vec![0, 1, 2, 3, 4, 5]);
        }
    }

    #[test]
    fn edgeless_graph_yields_a_single_vertex() {
        let g = Graph::with_vertices(5);
        let mut rng = XorShiftRng::seed_from_u64(0x1CE);
        let mut state = CliqueState::new(&g);
        build_initial_clique(&mut state, ConstructionStrategy::RandomGreedy, 3, &mut rng);
        assert_eq!(state.clique_size(), 1);
    }

    #[test]
    fn empty_graph_is_handled() {
        let g = Graph::with_vertices(0);
        let mut rng = XorShiftRng::seed_from_u64(0x0);
        for strategy in [
            ConstructionStrategy::RandomGreedy,
            ConstructionStrategy::SaturationGuided,
        ] {
            let mut state = CliqueState::new(&g);
            build_initial_clique(&mut state, strategy, 3, &mut rng);
            assert_eq!(state.clique_size(), 0);
        }
    }

    #[test]
    #[should_panic(expected = "randomization")]
    fn zero_randomization_panics() {
        let g = Graph::with_vertices(3);
        let mut rng = XorShiftRng::seed_from_u64(0x2);
        let mut state = CliqueState::new(&g);
        build_initial_clique(&mut state, ConstructionStrategy::RandomGreedy, 0, &mut rng);
    }
}
