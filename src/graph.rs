//! Undirected graph storage and DIMACS `.clq` parsing.

use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::Path;

// ============================================================================
// Graph
// ============================================================================

/// An undirected graph on the vertex range `0..n`.
///
/// Adjacency is stored per vertex as an unordered membership set, which is
/// exactly what the clique engine needs: O(1) edge queries and cheap
/// neighborhood scans. The structure is symmetric and loop-free by
/// construction; duplicate edges in the input collapse into the sets.
/// After loading, the graph is treated as immutable for the lifetime of a
/// search run.
#[derive(Clone, Debug)]
pub struct Graph {
    adj: Vec<HashSet<usize>>,
}

impl Graph {
    /// Creates a graph with `n` isolated vertices.
    pub fn with_vertices(n: usize) -> Self {
        Self {
            adj: vec![HashSet::new(); n],
        }
    }

    /// Builds a graph from an explicit 0-based edge list.
    ///
    /// # Panics
    /// Panics if any endpoint is out of range or an edge is a self-loop.
    pub fn from_edges(n: usize, edges: &[(usize, usize)]) -> Self {
        let mut graph = Self::with_vertices(n);
        for &(u, v) in edges {
            graph.add_edge(u, v);
        }
        graph
    }

    /// Inserts the undirected edge `(u, v)`. Duplicates are harmless.
    ///
    /// # Panics
    /// Panics if `u == v` or either endpoint is out of range.
    pub fn add_edge(&mut self, u: usize, v: usize) {
        assert!(u < self.n() && v < self.n(), "edge endpoint out of range");
        assert!(u != v, "self-loops are not representable");
        self.adj[u].insert(v);
        self.adj[v].insert(u);
    }

    /// Returns the number of vertices.
    #[inline]
    pub fn n(&self) -> usize {
        self.adj.len()
    }

    /// Returns the number of edges, each counted once.
    pub fn edge_count(&self) -> usize {
        self.adj.iter().map(HashSet::len).sum::<usize>() / 2
    }

    /// Returns the degree of vertex `v`.
    #[inline]
    pub fn degree(&self, v: usize) -> usize {
        self.adj[v].len()
    }

    /// Returns whether the edge `(u, v)` exists.
    #[inline]
    pub fn has_edge(&self, u: usize, v: usize) -> bool {
        self.adj[u].contains(&v)
    }

    /// Returns the neighbor set of vertex `v`.
    #[inline]
    pub fn neighbors(&self, v: usize) -> &HashSet<usize> {
        &self.adj[v]
    }

    /// Parses a graph from DIMACS clq/col text.
    ///
    /// Rules:
    /// - Lines starting with `c` are comments and are skipped, as are blank
    ///   lines.
    /// - Exactly one `p edge N M` (or `p col N M`) header must precede every
    ///   edge line.
    /// - `e u v` lines use 1-based vertex ids. Duplicate edges are permitted;
    ///   self-loops are dropped; ids outside `[1, N]` are an error.
    ///
    /// # Errors
    /// Returns a [`DimacsError`] describing the first offending line.
    pub fn parse_dimacs(text: &str) -> Result<Self, DimacsError> {
        let mut graph: Option<Graph> = None;

        for (idx, raw) in text.lines().enumerate() {
            let line_no = idx + 1;
            let line = raw.trim();
            if line.is_empty() || line.starts_with('c') {
                continue;
            }

            let mut fields = line.split_whitespace();
            match fields.next() {
                Some("p") => {
                    if graph.is_some() {
                        return Err(DimacsError::DuplicateHeader { line: line_no });
                    }
                    let format = fields.next();
                    if !matches!(format, Some("edge") | Some("col")) {
                        return Err(DimacsError::MalformedHeader { line: line_no });
                    }
                    let n: usize = fields
                        .next()
                        .and_then(|t| t.parse().ok())
                        .ok_or(DimacsError::MalformedHeader { line: line_no })?;
                    // The edge count is declared but not trusted.
                    let _m: usize = fields
                        .next()
                        .and_then(|t| t.parse().ok())
                        .ok_or(DimacsError::MalformedHeader { line: line_no })?;
                    graph = Some(Graph::with_vertices(n));
                }
                Some("e") => {
                    let graph = graph
                        .as_mut()
                        .ok_or(DimacsError::EdgeBeforeHeader { line: line_no })?;
                    let u: usize = fields
                        .next()
                        .and_then(|t| t.parse().ok())
                        .ok_or(DimacsError::MalformedEdge { line: line_no })?;
                    let v: usize = fields
                        .next()
                        .and_then(|t| t.parse().ok())
                        .ok_or(DimacsError::MalformedEdge { line: line_no })?;
                    let n = graph.n();
                    for endpoint in [u, v] {
                        if endpoint == 0 || endpoint > n {
                            return Err(DimacsError::VertexOutOfRange {
                                line: line_no,
                                vertex: endpoint,
                                n,
                            });
                        }
                    }
                    if u != v {
                        graph.add_edge(u - 1, v - 1);
                    }
                }
                Some(directive) => {
                    return Err(DimacsError::UnknownDirective {
                        line: line_no,
                        directive: directive.to_string(),
                    });
                }
                None => unreachable!("split_whitespace on a non-empty line"),
            }
        }

        graph.ok_or(DimacsError::MissingHeader)
    }

    /// Reads and parses a DIMACS file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or its content is
    /// malformed.
    pub fn parse_dimacs_file(path: impl AsRef<Path>) -> Result<Self, DimacsError> {
        let text = fs::read_to_string(path).map_err(|e| DimacsError::Io(e.to_string()))?;
        Self::parse_dimacs(&text)
    }
}

// ============================================================================
// Errors
// ============================================================================

/// Errors encountered while reading a DIMACS instance.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DimacsError {
    /// I/O error (file not found, etc.).
    Io(String),
    /// The input ended without a `p` header line.
    MissingHeader,
    /// A second `p` header appeared.
    DuplicateHeader {
        /// Line number of the duplicate header.
        line: usize,
    },
    /// A `p` line that does not match `p edge N M` / `p col N M`.
    MalformedHeader {
        /// Line number of the bad header.
        line: usize,
    },
    /// An edge line appeared before the header declared the vertex count.
    EdgeBeforeHeader {
        /// Line number of the premature edge.
        line: usize,
    },
    /// An `e` line that does not carry two integer endpoints.
    MalformedEdge {
        /// Line number of the bad edge.
        line: usize,
    },
    /// An edge endpoint outside the declared range `[1, N]`.
    VertexOutOfRange {
        /// Line number of the offending edge.
        line: usize,
        /// The out-of-range 1-based vertex id.
        vertex: usize,
        /// The declared vertex count.
        n: usize,
    },
    /// A line starting with something other than `c`, `p`, or `e`.
    UnknownDirective {
        /// Line number of the unrecognized line.
        line: usize,
        /// The leading token of that line.
        directive: String,
    },
}

impl fmt::Display for DimacsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DimacsError::Io(msg) => write!(f, "I/O error: {msg}"),
            DimacsError::MissingHeader => write!(f, "no 'p edge N M' header found"),
            DimacsError::DuplicateHeader { line } => {
                write!(f, "line {line}: duplicate 'p' header")
            }
            DimacsError::MalformedHeader { line } => {
                write!(f, "line {line}: malformed header (expected 'p edge N M')")
            }
            DimacsError::EdgeBeforeHeader { line } => {
                write!(f, "line {line}: edge before the 'p' header")
            }
            DimacsError::MalformedEdge { line } => {
                write!(f, "line {line}: malformed edge (expected 'e u v')")
            }
            DimacsError::VertexOutOfRange { line, vertex, n } => {
                write!(f, "line {line}: vertex {vertex} outside [1, {n}]")
            }
            DimacsError::UnknownDirective { line, directive } => {
                write!(f, "line {line}: unknown directive {directive:?}")
            }
        }
    }
}

impl std::error::Error for DimacsError {}

// ============================================================================
// Tests
// ============================================================================
