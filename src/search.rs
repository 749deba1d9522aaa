//! Multi-start tabu search driver.

use crate::clique::{CliqueState, SelectionPolicy};
use crate::construction::{ConstructionStrategy, build_initial_clique};
use crate::graph::Graph;
use crate::validate::verify_clique;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

// ============================================================================
// Configuration
// ============================================================================

/// Search configuration parameters.
///
/// The defaults are the richer configuration: random-among-feasible move
/// selection, the 1-to-2 swap enabled, and perturbation at local optima.
/// [`SearchConfig::minimal`] gives the simpler first-feasible variant that
/// stops each restart at its first local optimum.
#[derive(Clone, Debug)]
pub struct SearchConfig {
    /// Number of independent restarts.
    pub starts: usize,
    /// Per-restart budget of counted steps: every swap and every
    /// perturbation consumes one unit; extensions are free.
    pub max_swaps: usize,
    /// Width of the randomized pick in the random-greedy construction
    /// (must be at least 1).
    pub randomization: usize,
    /// How each restart builds its initial clique.
    pub strategy: ConstructionStrategy,
    /// How moves choose among feasible alternatives.
    pub policy: SelectionPolicy,
    /// Whether the 1-to-2 swap neighborhood is explored.
    pub use_swap_1_2: bool,
    /// Whether a local optimum triggers perturbation; when disabled, the
    /// restart's inner loop terminates there instead.
    pub use_perturbation: bool,
    /// Tabu window for recently added vertices.
    pub added_tabu_window: usize,
    /// Tabu window for recently removed vertices.
    pub removed_tabu_window: usize,
    /// Perturbation removes a uniform fraction of the clique drawn from
    /// `[perturb_fraction_min, perturb_fraction_max]`.
    pub perturb_fraction_min: f64,
    /// Upper bound of the perturbation fraction.
    pub perturb_fraction_max: f64,
    /// Deterministic seed. Without one, a fresh seed is drawn and runs are
    /// not reproducible; the seed actually used is reported in the result.
    pub seed: Option<u64>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            starts: 300,
            max_swaps: 300,
            randomization: 3,
            strategy: ConstructionStrategy::RandomGreedy,
            policy: SelectionPolicy::RandomFeasible,
            use_swap_1_2: true,
            use_perturbation: true,
            added_tabu_window: 3,
            removed_tabu_window: 1,
            perturb_fraction_min: 0.3,
            perturb_fraction_max: 0.7,
            seed: None,
        }
    }
}

impl SearchConfig {
    /// The stripped-down configuration: first-feasible selection, no
    /// 1-to-2 swap, no perturbation, and a smaller swap budget.
    pub fn minimal() -> Self {
        Self {
            max_swaps: 100,
            policy: SelectionPolicy::FirstFeasible,
            use_swap_1_2: false,
            use_perturbation: false,
            ..Self::default()
        }
    }
}

// ============================================================================
// Result
// ============================================================================

/// Outcome of a search run.
#[derive(Clone, Debug)]
pub struct SearchResult {
    /// The best clique found, sorted ascending.
    pub clique: Vec<usize>,
    /// Size of that clique.
    pub size: usize,
    /// Whether the final pairwise-adjacency recheck passed. A `false` here
    /// means the engine has a bug; the result is still reported so the
    /// caller can flag it.
    pub verified: bool,
    /// The seed the run actually used.
    pub seed: u64,
}

// ============================================================================
// Driver
// ============================================================================

/// Runs the multi-start tabu search and returns the best clique found.
///
/// Each restart reuses one clique state (resetting it rather than paying the
/// non-neighbor precomputation again), seeds it with the configured
/// construction, then interleaves extension, 1-to-1 and 1-to-2 swaps until
/// the step budget runs out; local optima record the best-so-far and either
/// perturb or, in the minimal configuration, end the restart.
pub fn run_search(graph: &Graph, cfg: &SearchConfig) -> SearchResult {
    let seed = cfg.seed.unwrap_or_else(rand::random::<u64>);
    let mut rng = SmallRng::seed_from_u64(seed);

    let mut state = CliqueState::with_policy(
        graph,
        cfg.policy,
        cfg.added_tabu_window,
        cfg.removed_tabu_window,
    );
    let mut best: Vec<usize> = Vec::new();

    for _ in 0..cfg.starts {
        state.reset();
        build_initial_clique(&mut state, cfg.strategy, cfg.randomization, &mut rng);

        let mut steps = 0;
        while steps < cfg.max_swaps {
            if state.extend(&mut rng) {
                continue;
            }
            if state.swap_1_1(&mut rng) {
                steps += 1;
                continue;
            }
            if cfg.use_swap_1_2 && state.swap_1_2(&mut rng) {
                steps += 1;
                continue;
            }

            // Local optimum for every enabled neighborhood.
            if state.clique_size() > best.len() {
                best = state.clique();
            }
            if !cfg.use_perturbation {
                break;
            }
            let strength = perturb_strength(state.clique_size(), cfg, &mut rng);
            state.perturb(&mut rng, strength);
            steps += 1;
        }

        if state.clique_size() > best.len() {
            best = state.clique();
        }
    }

    let verified = verify_clique(graph, &best);
    SearchResult {
        size: best.len(),
        clique: best,
        verified,
        seed,
    }
}

/// Draws the perturbation strength: `round(uniform(min·|Q|, max·|Q|))`.
fn perturb_strength<R: Rng + ?Sized>(
    clique_size: usize,
    cfg: &SearchConfig,
    rng: &mut R,
) -> usize {
    if clique_size == 0 {
        return 0;
    }
    let lo = cfg.perturb_fraction_min * clique_size as f64;
    let hi = cfg.perturb_fraction_max * clique_size as f64;
    let drawn = if hi > lo { rng.random_range(lo..=hi) } else { lo };
    drawn.round() as usize
}

// ============================================================================
// Tests
// ============================================================================
