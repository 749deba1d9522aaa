//! The clique state engine: a cursor-partitioned vertex permutation.
//!
//! The whole point of this module is the swap-with-boundary discipline. All
//! vertices live in one permutation `order` (with inverse `pos`), split by
//! two cursors into three zones:
//!
//! ```text
//!   order: [ clique Q | candidates | non-candidates ]
//!                     ^clique_end  ^candidate_end
//! ```
//!
//! Moving a vertex between adjacent zones is a single position swap plus a
//! cursor shift, and the per-vertex `tightness` counter (how many clique
//! members are non-neighbors) tells which zone a vertex belongs to without
//! ever scanning the clique. Adding or removing a clique vertex therefore
//! costs O(1) per affected non-neighbor instead of a set difference.

use crate::graph::Graph;
use crate::tabu::TabuMemory;
use rand::Rng;

// ============================================================================
// Selection policy
// ============================================================================

/// How [`CliqueState::extend`] and the swap moves choose among feasible
/// alternatives.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectionPolicy {
    /// Enumerate every feasible move, then pick one uniformly at random.
    /// Prevents deterministic cycling between equivalent local optima.
    RandomFeasible,
    /// Take the first feasible move, scanning the clique in permutation
    /// order and non-neighbors in ascending id; `extend` takes the last
    /// candidate. Deterministic given a deterministic history.
    FirstFeasible,
}

// ============================================================================
// CliqueState
// ============================================================================

/// Incrementally maintained state of a clique under local search.
///
/// Tracks the current clique `Q`, the candidate set (vertices adjacent to
/// everything in `Q`), and per-vertex tightness, all inside one permutation.
/// The tabu memory lives here too: the swap moves consult it and record
/// their own vertices, and [`CliqueState::perturb`] clears it.
///
/// Invariants upheld after every public operation:
/// - `Q` is a clique;
/// - the candidate zone holds exactly the non-clique vertices with
///   tightness 0, the non-candidate zone those with tightness ≥ 1;
/// - `order` and `pos` are mutually inverse;
/// - `tightness[v]` equals the number of clique members not adjacent to `v`.
#[derive(Clone, Debug)]
pub struct CliqueState<'g> {
    graph: &'g Graph,
    /// Sorted non-neighbor lists, computed once; immutable afterwards.
    non_neighbors: Vec<Vec<usize>>,
    order: Vec<usize>,
    pos: Vec<usize>,
    tightness: Vec<usize>,
    /// Exclusive end of the clique zone in `order`.
    clique_end: usize,
    /// Exclusive end of the candidate zone in `order`.
    candidate_end: usize,
    policy: SelectionPolicy,
    tabu: TabuMemory,
}

impl<'g> CliqueState<'g> {
    /// Creates an empty-clique state with the default policy and tabu
    /// windows.
    pub fn new(graph: &'g Graph) -> Self {
        Self::with_policy(
            graph,
            SelectionPolicy::RandomFeasible,
            TabuMemory::DEFAULT_ADDED_WINDOW,
            TabuMemory::DEFAULT_REMOVED_WINDOW,
        )
    }

    /// Creates an empty-clique state with explicit policy and tabu windows.
    ///
    /// Precomputes the non-neighbor mirror in O(n²); use [`Self::reset`] to
    /// reuse it across restarts.
    ///
    /// # Panics
    /// Panics if either tabu window is zero.
    pub fn with_policy(
        graph: &'g Graph,
        policy: SelectionPolicy,
        added_window: usize,
        removed_window: usize,
    ) -> Self {
        let n = graph.n();
        let non_neighbors = (0..n)
            .map(|v| {
                (0..n)
                    .filter(|&u| u != v && !graph.has_edge(v, u))
                    .collect()
            })
            .collect();
        Self {
            graph,
            non_neighbors,
            order: (0..n).collect(),
            pos: (0..n).collect(),
            tightness: vec![0; n],
            clique_end: 0,
            candidate_end: n,
            policy,
            tabu: TabuMemory::new(added_window, removed_window),
        }
    }

    /// Restores the freshly-constructed state: empty clique, every vertex a
    /// candidate, identity permutation, tabu memory cleared. The
    /// non-neighbor mirror is kept.
    pub fn reset(&mut self) {
        let n = self.graph.n();
        for i in 0..n {
            self.order[i] = i;
            self.pos[i] = i;
            self.tightness[i] = 0;
        }
        self.clique_end = 0;
        self.candidate_end = n;
        self.tabu.clear();
    }

    /// The graph this state searches over.
    #[inline]
    pub fn graph(&self) -> &'g Graph {
        self.graph
    }

    /// Number of vertices.
    #[inline]
    pub fn n(&self) -> usize {
        self.graph.n()
    }

    /// Current clique size.
    #[inline]
    pub fn clique_size(&self) -> usize {
        self.clique_end
    }

    /// Number of vertices that could extend the clique right now.
    #[inline]
    pub fn candidate_count(&self) -> usize {
        self.candidate_end - self.clique_end
    }

    /// Returns whether `v` is in the clique.
    #[inline]
    pub fn contains(&self, v: usize) -> bool {
        self.pos[v] < self.clique_end
    }

    /// Returns whether `v` is a candidate (outside the clique, adjacent to
    /// all of it).
    #[inline]
    pub fn is_candidate(&self, v: usize) -> bool {
        let p = self.pos[v];
        self.clique_end <= p && p < self.candidate_end
    }

    /// Number of clique members that are non-neighbors of `v`.
    #[inline]
    pub fn tightness(&self, v: usize) -> usize {
        self.tightness[v]
    }

    /// The current clique, sorted ascending.
    pub fn clique(&self) -> Vec<usize> {
        let mut q = self.order[..self.clique_end].to_vec();
        q.sort_unstable();
        q
    }

    /// Swaps the vertices at permutation positions `i` and `j`, keeping
    /// `pos` inverse to `order`. Every zone transition is this plus a cursor
    /// shift.
    fn swap_positions(&mut self, i: usize, j: usize) {
        let a = self.order[i];
        let b = self.order[j];
        self.order.swap(i, j);
        self.pos[a] = j;
        self.pos[b] = i;
    }

    /// Adds a candidate to the clique and demotes the candidates it
    /// invalidates.
    ///
    /// # Panics
    /// Panics if `v` is not currently a candidate.
    pub fn add_to_clique(&mut self, v: usize) {
        assert!(
            self.is_candidate(v),
            "add_to_clique: vertex {v} is not a candidate"
        );
        self.swap_positions(self.pos[v], self.clique_end);
        self.clique_end += 1;

        for i in 0..self.non_neighbors[v].len() {
            let u = self.non_neighbors[v][i];
            if self.tightness[u] == 0 {
                // u was a candidate; it now conflicts with v.
                self.swap_positions(self.pos[u], self.candidate_end - 1);
                self.candidate_end -= 1;
            }
            self.tightness[u] += 1;
        }
    }

    /// Removes a clique member and promotes the vertices it was blocking.
    ///
    /// # Panics
    /// Panics if `v` is not in the clique.
    pub fn remove_from_clique(&mut self, v: usize) {
        assert!(
            self.contains(v),
            "remove_from_clique: vertex {v} is not in the clique"
        );
        self.swap_positions(self.pos[v], self.clique_end - 1);
        self.clique_end -= 1;

        for i in 0..self.non_neighbors[v].len() {
            let u = self.non_neighbors[v][i];
            self.tightness[u] -= 1;
            if self.tightness[u] == 0 {
                self.swap_positions(self.pos[u], self.candidate_end);
                self.candidate_end += 1;
            }
        }
    }

    /// Grows the clique by one candidate, chosen per the selection policy.
    /// Returns `false` when no candidate exists.
    pub fn extend<R: Rng + ?Sized>(&mut self, rng: &mut R) -> bool {
        if self.clique_end == self.candidate_end {
            return false;
        }
        let v = match self.policy {
            SelectionPolicy::RandomFeasible => {
                self.order[rng.random_range(self.clique_end..self.candidate_end)]
            }
            SelectionPolicy::FirstFeasible => self.order[self.candidate_end - 1],
        };
        self.add_to_clique(v);
        true
    }

    /// Exchanges one clique member `u` for one outside vertex `w` whose only
    /// clique conflict is `u`, subject to the tabu windows. Returns whether
    /// a swap happened.
    pub fn swap_1_1<R: Rng + ?Sized>(&mut self, rng: &mut R) -> bool {
        match self.policy {
            SelectionPolicy::RandomFeasible => {
                let mut feasible: Vec<(usize, usize)> = Vec::new();
                for qi in 0..self.clique_end {
                    let u = self.order[qi];
                    if self.tabu.is_in_added(u) {
                        continue;
                    }
                    for &w in &self.non_neighbors[u] {
                        if self.tightness[w] == 1 && !self.tabu.is_in_removed(w) {
                            feasible.push((u, w));
                        }
                    }
                }
                if feasible.is_empty() {
                    return false;
                }
                let (u, w) = feasible[rng.random_range(0..feasible.len())];
                self.apply_swap_1_1(u, w);
                true
            }
            SelectionPolicy::FirstFeasible => {
                for qi in 0..self.clique_end {
                    let u = self.order[qi];
                    if self.tabu.is_in_added(u) {
                        continue;
                    }
                    let found = self.non_neighbors[u]
                        .iter()
                        .copied()
                        .find(|&w| self.tightness[w] == 1 && !self.tabu.is_in_removed(w));
                    if let Some(w) = found {
                        self.apply_swap_1_1(u, w);
                        return true;
                    }
                }
                false
            }
        }
    }

    /// Exchanges one clique member `u` for two adjacent outside vertices
    /// whose only clique conflict is `u`, subject to the tabu windows.
    /// Returns whether a swap happened.
    pub fn swap_1_2<R: Rng + ?Sized>(&mut self, rng: &mut R) -> bool {
        match self.policy {
            SelectionPolicy::RandomFeasible => {
                let mut feasible: Vec<(usize, usize, usize)> = Vec::new();
                for qi in 0..self.clique_end {
                    let u = self.order[qi];
                    if self.tabu.is_in_added(u) {
                        continue;
                    }
                    let nn = &self.non_neighbors[u];
                    for (ai, &a) in nn.iter().enumerate() {
                        if self.tightness[a] != 1 || self.tabu.is_in_removed(a) {
                            continue;
                        }
                        for &b in &nn[ai + 1..] {
                            if self.tightness[b] != 1 || self.tabu.is_in_removed(b) {
                                continue;
                            }
                            if self.graph.has_edge(a, b) {
                                feasible.push((u, a, b));
                            }
                        }
                    }
                }
                if feasible.is_empty() {
                    return false;
                }
                let (u, a, b) = feasible[rng.random_range(0..feasible.len())];
                self.apply_swap_1_2(u, a, b);
                true
            }
            SelectionPolicy::FirstFeasible => {
                for qi in 0..self.clique_end {
                    let u = self.order[qi];
                    if self.tabu.is_in_added(u) {
                        continue;
                    }
                    let mut found = None;
                    let nn = &self.non_neighbors[u];
                    'pairs: for (ai, &a) in nn.iter().enumerate() {
                        if self.tightness[a] != 1 || self.tabu.is_in_removed(a) {
                            continue;
                        }
                        for &b in &nn[ai + 1..] {
                            if self.tightness[b] == 1
                                && !self.tabu.is_in_removed(b)
                                && self.graph.has_edge(a, b)
                            {
                                found = Some((a, b));
                                break 'pairs;
                            }
                        }
                    }
                    if let Some((a, b)) = found {
                        self.apply_swap_1_2(u, a, b);
                        return true;
                    }
                }
                false
            }
        }
    }

    /// Removes up to `k` clique members, each drawn uniformly at random from
    /// the current clique, then clears the tabu memory.
    pub fn perturb<R: Rng + ?Sized>(&mut self, rng: &mut R, k: usize) {
        let removals = k.min(self.clique_end);
        for _ in 0..removals {
            let v = self.order[rng.random_range(0..self.clique_end)];
            self.remove_from_clique(v);
        }
        self.tabu.clear();
    }

    /// Tabu memory, for inspection.
    #[inline]
    pub fn tabu(&self) -> &TabuMemory {
        &self.tabu
    }

    fn apply_swap_1_1(&mut self, u: usize, w: usize) {
        self.remove_from_clique(u);
        self.tabu.restrict_removed(u);
        self.add_to_clique(w);
        self.tabu.restrict_added(w);
    }

    fn apply_swap_1_2(&mut self, u: usize, a: usize, b: usize) {
        self.remove_from_clique(u);
        self.tabu.restrict_removed(u);
        // a and b are adjacent, so adding a leaves b a candidate.
        self.add_to_clique(a);
        self.add_to_clique(b);
        self.tabu.restrict_added(a);
        self.tabu.restrict_added(b);
    }

    /// Recomputes everything from scratch and asserts the incremental state
    /// agrees. Test support only.
    #[cfg(test)]
    pub(crate) fn check_invariants(&self) {
        let n = self.n();
        assert!(self.clique_end <= self.candidate_end && self.candidate_end <= n);

        // order and pos are mutually inverse bijections.
        for i in 0..n {
            assert_eq!(self.pos[self.order[i]], i, "pos[order[{i}]] != {i}");
            assert_eq!(self.order[self.pos[i]], i, "order[pos[{i}]] != {i}");
        }

        // The clique zone is pairwise adjacent.
        let clique = &self.order[..self.clique_end];
        for (i, &u) in clique.iter().enumerate() {
            for &v in &clique[i + 1..] {
                assert!(self.graph.has_edge(u, v), "clique pair ({u}, {v}) not adjacent");
            }
        }

        // Tightness matches a brute-force count, and zones match tightness.
        for v in 0..n {
            let expected = clique.iter().filter(|&&u| u != v && !self.graph.has_edge(u, v)).count();
            assert_eq!(self.tightness[v], expected, "tightness[{v}] mismatch");
            let p = self.pos[v];
            if p < self.clique_end {
                assert_eq!(expected, 0);
            } else if p < self.candidate_end {
                assert_eq!(expected, 0, "candidate {v} has positive tightness");
            } else {
                assert!(expected >= 1, "non-candidate {v} has tightness 0");
            }
        }
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

    fn complete(n: usize) -> Graph {
        let edges: Vec<(usize, usize)> = (0..n)
            .flat_map(|u| ((u + 1)..n).map(move |v| (u, v)))
            .collect();
        Graph::from_edges(n, &edges)
    }

    fn cycle4() -> Graph {
        Graph::from_edges(4, &[(0, 1), (1, 2), (2, 3), (3, 0)])
    }

    #[test]
    fn fresh_state_has_everything_as_candidate() {
        let g = complete(4);
        let state = CliqueState::new(&g);
        assert_eq!(state.clique_size(), 0);
        assert_eq!(state.candidate_count(), 4);
        for v in 0..4 {
            assert_eq!(state.tightness(v), 0);
            assert!(state.is_candidate(v));
        }
        state.check_invariants();
    }

    #[test]
    fn extend_fills_a_complete_graph() {
        let g = complete(4);
        let mut state = CliqueState::new(&g);
        let mut rng = XorShiftRng::seed_from_u64(1);
        for expected in 1..=4 {
            assert!(state.extend(&mut rng));
            assert_eq!(state.clique_size(), expected);
            state.check_invariants();
        }
        assert!(!state.extend(&mut rng));
        assert_eq!(state.clique(), vec![0, 1, 2, 3]);
    }

    #[test]
    fn add_and_remove_restore_prior_state() {
        let g = Graph::from_edges(6, &[(0, 1), (0, 2), (1, 2), (2, 3), (3, 4), (0, 5)]);
        let mut state = CliqueState::new(&g);
        state.add_to_clique(0);
        state.add_to_clique(2);

        let clique_end = state.clique_size();
        let candidates = state.candidate_count();
        let tightness: Vec<usize> = (0..6).map(|v| state.tightness(v)).collect();

        state.add_to_clique(1);
        state.check_invariants();
        state.remove_from_clique(1);
        state.check_invariants();

        assert_eq!(state.clique_size(), clique_end);
        assert_eq!(state.candidate_count(), candidates);
        let after: Vec<usize> = (0..6).map(|v| state.tightness(v)).collect();
        assert_eq!(after, tightness);
    }

    #[test]
    fn removal_on_k5_leaves_everything_a_candidate() {
        let g = complete(5);
        let mut state = CliqueState::new(&g);
        state.add_to_clique(0);
        state.add_to_clique(1);
        state.add_to_clique(2);
        state.remove_from_clique(1);

        assert_eq!(state.clique(), vec![0, 2]);
        for v in 0..5 {
            if !state.contains(v) {
                assert_eq!(state.tightness(v), 0);
                assert!(state.is_candidate(v));
            }
        }
        state.check_invariants();
    }

    #[test]
    #[should_panic(expected = "not a candidate")]
    fn adding_a_non_candidate_panics() {
        let g = cycle4();
        let mut state = CliqueState::new(&g);
        state.add_to_clique(0);
        // 2 is the opposite corner: not adjacent to 0, hence not a candidate.
        state.add_to_clique(2);
    }

    #[test]
    #[should_panic(expected = "not in the clique")]
    fn removing_a_non_member_panics() {
        let g = cycle4();
        let mut state = CliqueState::new(&g);
        state.remove_from_clique(1);
    }

    #[test]
    fn swap_1_1_trades_the_unique_conflict() {
        // Vertices 0,1,2 form a triangle; vertex 3 is adjacent to 1 and 2
        // but not to 0, so its only conflict in Q={0,1,2} is 0.
        let g = Graph::from_edges(4, &[(0, 1), (0, 2), (1, 2), (1, 3), (2, 3)]);
        let mut state = CliqueState::new(&g);
        for v in [0, 1, 2] {
            state.add_to_clique(v);
        }
        assert_eq!(state.tightness(3), 1);

        let mut rng = XorShiftRng::seed_from_u64(7);
        assert!(state.swap_1_1(&mut rng));
        assert_eq!(state.clique(), vec![1, 2, 3]);
        assert!(state.tabu().is_in_removed(0));
        assert!(state.tabu().is_in_added(3));
        state.check_invariants();

        // 0 is now the unique conflict of nobody tabu-eligible: the reverse
        // swap is blocked by both windows.
        assert!(!state.swap_1_1(&mut rng));
    }

    #[test]
    fn swap_1_1_respects_removed_window() {
        let g = Graph::from_edges(4, &[(0, 1), (0, 2), (1, 2), (1, 3), (2, 3)]);
        let mut state = CliqueState::with_policy(&g, SelectionPolicy::FirstFeasible, 3, 1);
        for v in [1, 2, 3] {
            state.add_to_clique(v);
        }
        // Pretend 0 was just swapped out; the only feasible swap would bring
        // it straight back.
        state.remove_from_clique(3);
        state.add_to_clique(0);
        let mut rng = XorShiftRng::seed_from_u64(3);
        // Baseline sanity: with no restrictions the swap exists.
        assert_eq!(state.tightness(3), 1);
        state.tabu_mut_for_test().restrict_removed(3);
        assert!(!state.swap_1_1(&mut rng));
    }

    #[test]
    fn swap_1_2_grows_the_clique_by_one() {
        // Q = {0, 1}. Vertices 2 and 3 are adjacent to each other and to 1,
        // but not to 0: removing 0 and adding both nets +1.
        let g = Graph::from_edges(4, &[(0, 1), (1, 2), (1, 3), (2, 3)]);
        let mut state = CliqueState::new(&g);
        state.add_to_clique(0);
        state.add_to_clique(1);

        let mut rng = XorShiftRng::seed_from_u64(11);
        assert!(state.swap_1_2(&mut rng));
        assert_eq!(state.clique(), vec![1, 2, 3]);
        assert!(state.tabu().is_in_removed(0));
        assert!(state.tabu().is_in_added(2) && state.tabu().is_in_added(3));
        state.check_invariants();
    }

    #[test]
    fn swap_1_2_requires_the_pair_to_be_adjacent() {
        // 2 and 3 both conflict only with 0 but are not adjacent to each
        // other, so no 1-to-2 swap exists.
        let g = Graph::from_edges(4, &[(0, 1), (1, 2), (1, 3)]);
        let mut state = CliqueState::new(&g);
        state.add_to_clique(0);
        state.add_to_clique(1);
        let mut rng = XorShiftRng::seed_from_u64(13);
        assert!(!state.swap_1_2(&mut rng));
    }

    #[test]
    fn perturb_zero_clears_tabu_only() {
        let g = complete(4);
        let mut state = CliqueState::new(&g);
        let mut rng = XorShiftRng::seed_from_u64(17);
        state.add_to_clique(0);
        state.add_to_clique(1);
        state.tabu_mut_for_test().restrict_added(1);

        state.perturb(&mut rng, 0);
        assert_eq!(state.clique(), vec![0, 1]);
        assert!(!state.tabu().is_in_added(1));
        state.check_invariants();
    }

    #[test]
    fn perturb_caps_at_clique_size() {
        let g = complete(5);
        let mut state = CliqueState::new(&g);
        let mut rng = XorShiftRng::seed_from_u64(19);
        for v in 0..3 {
            state.add_to_clique(v);
        }
        state.perturb(&mut rng, 100);
        assert_eq!(state.clique_size(), 0);
        assert_eq!(state.candidate_count(), 5);
        state.check_invariants();
    }

    #[test]
    fn reset_matches_a_fresh_state() {
        let g = cycle4();
        let mut state = CliqueState::new(&g);
        let mut rng = XorShiftRng::seed_from_u64(23);
        while state.extend(&mut rng) {}
        state.reset();

        let fresh = CliqueState::new(&g);
        assert_eq!(state.clique_size(), fresh.clique_size());
        assert_eq!(state.candidate_count(), fresh.candidate_count());
        for v in 0..4 {
            assert_eq!(state.tightness(v), fresh.tightness(v));
        }
        state.check_invariants();
    }

    #[test]
    fn extend_reports_candidates_exactly() {
        // P4: extend succeeds iff some outside vertex has tightness 0.
        let g = Graph::from_edges(5, &[(0, 1), (1, 2), (2, 0), (3, 4)]);
        let mut state = CliqueState::new(&g);
        let mut rng = XorShiftRng::seed_from_u64(29);
        state.add_to_clique(0);
        state.add_to_clique(1);
        // Only 2 is adjacent to both.
        assert_eq!(state.candidate_count(), 1);
        assert!(state.extend(&mut rng));
        assert!(!state.extend(&mut rng));
        let outside_zero_tightness =
            (0..5).any(|v| !state.contains(v) && state.tightness(v) == 0);
        assert!(!outside_zero_tightness);
    }

    #[test]
    fn random_operation_sequences_preserve_invariants() {
        let mut rng = XorShiftRng::seed_from_u64(0xC11_0E);
        for trial in 0..30 {
            let n = 12;
            let mut edges = Vec::new();
            for u in 0..n {
                for v in (u + 1)..n {
                    if rng.random_bool(0.45) {
                        edges.push((u, v));
                    }
                }
            }
            let g = Graph::from_edges(n, &edges);
            let policy = if trial % 2 == 0 {
                SelectionPolicy::RandomFeasible
            } else {
                SelectionPolicy::FirstFeasible
            };
            let mut state = CliqueState::with_policy(&g, policy, 3, 1);

            for _ in 0..200 {
                match rng.random_range(0..5u32) {
                    0 => {
                        state.extend(&mut rng);
                    }
                    1 => {
                        state.swap_1_1(&mut rng);
                    }
                    2 => {
                        state.swap_1_2(&mut rng);
                    }
                    3 => {
                        if state.clique_size() > 0 && rng.random_bool(0.5) {
                            let q = state.clique();
                            let v = q[rng.random_range(0..q.len())];
                            state.remove_from_clique(v);
                        }
                    }
                    _ => {
                        let k = rng.random_range(0..3);
                        state.perturb(&mut rng, k);
                    }
                }
                state.check_invariants();
            }
        }
    }

    #[test]
    fn empty_graph_is_inert() {
        let g = Graph::with_vertices(0);
        let mut state = CliqueState::new(&g);
        let mut rng = XorShiftRng::seed_from_u64(31);
        assert!(!state.extend(&mut rng));
        assert!(!state.swap_1_1(&mut rng));
        assert!(!state.swap_1_2(&mut rng));
        state.perturb(&mut rng, 5);
        assert_eq!(state.clique_size(), 0);
    }

    impl<'g> CliqueState<'g> {
        fn tabu_mut_for_test(&mut self) -> &mut TabuMemory {
            &mut self.tabu
        }
    }
}
