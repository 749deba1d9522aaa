//! # Tabu Clique Search
//!
//! A heuristic solver for the Maximum Clique problem on undirected graphs in
//! DIMACS edge-list form: tabu-enhanced local search with multi-start and
//! perturbation.
//!
//! The engine maintains the current clique, the candidate set, and
//! per-vertex tightness inside a single cursor-partitioned permutation, so
//! growing or shrinking the clique costs O(1) per affected non-neighbor.
//! Three neighborhood moves (extension, 1-to-1 swap, 1-to-2 swap) explore
//! feasible cliques while a short recency-bounded tabu memory blocks
//! immediate reversals; each restart is seeded by a greedy or color-guided
//! construction.
//!
//! ## Quick Start
//!
//! ```
//! use clique_tabu::prelude::*;
//!
//! // A 4-cycle: the largest clique is a single edge.
//! let graph = Graph::from_edges(4, &[(0, 1), (1, 2), (2, 3), (3, 0)]);
//! let cfg = SearchConfig {
//!     starts: 10,
//!     seed: Some(7),
//!     ..SearchConfig::default()
//! };
//! let result = run_search(&graph, &cfg);
//! assert_eq!(result.size, 2);
//! assert!(result.verified);
//! ```
//!
//! ## Loading DIMACS instances
//!
//! ```
//! use clique_tabu::graph::Graph;
//!
//! let graph = Graph::parse_dimacs("p edge 3 3\ne 1 2\ne 1 3\ne 2 3\n").unwrap();
//! assert_eq!(graph.n(), 3);
//! ```
//!
//! ## Modules
//!
//! - [`graph`]: graph storage and DIMACS parsing.
//! - [`recency`]: the bounded insertion-ordered set behind the tabu memory.
//! - [`tabu`]: the added/removed tabu windows.
//! - [`clique`]: the incremental clique state and its moves.
//! - [`coloring`]: DSATUR greedy coloring.
//! - [`construction`]: initial clique heuristics.
//! - [`search`]: the multi-start driver.
//! - [`validate`]: final result verification.
//!
//! ## Notes
//!
//! - The search is single-threaded and strictly sequential; all randomness
//!   flows from one seeded generator per run. Without an explicit seed,
//!   runs are not reproducible (the drawn seed is reported back).
//! - Precondition violations (adding a non-candidate, zero-capacity
//!   windows, ...) are programmer errors and panic; malformed input
//!   surfaces as `Result` errors before the search starts.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::many_single_char_names)] // Graph-theory variable names
#![allow(clippy::needless_range_loop)] // Index loops where iterators would fight the borrow checker

pub mod clique;
pub mod coloring;
pub mod construction;
pub mod graph;
pub mod recency;
pub mod search;
pub mod tabu;
pub mod validate;

/// Re-export of the commonly used types.
pub mod prelude {
    pub use crate::clique::{CliqueState, SelectionPolicy};
    pub use crate::construction::ConstructionStrategy;
    pub use crate::graph::{DimacsError, Graph};
    pub use crate::search::{SearchConfig, SearchResult, run_search};
    pub use crate::validate::verify_clique;
}
