use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// Construction-time settings for a [`Network`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// If true, `(u, v)` and `(v, u)` are distinct edges.
    pub directed: bool,
}

impl NetworkConfig {
    /// Configuration for a directed network.
    pub fn directed() -> Self {
        Self { directed: true }
    }

    /// Configuration for an undirected network.
    pub fn undirected() -> Self {
        Self { directed: false }
    }
}

/// A stored edge.
///
/// `source` and `target` keep the orientation of the first submission.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    /// Source vertex index.
    pub source: usize,
    /// Target vertex index.
    pub target: usize,
    /// Maximum weight over all submissions of this pair.
    pub weight: f64,
    /// Number of submissions beyond the first.
    pub duplicates: usize,
}

impl Edge {
    /// The endpoint opposite to `vertex`.
    pub fn other(&self, vertex: usize) -> usize {
        if self.source == vertex {
            self.target
        } else {
            self.source
        }
    }

    /// True if both endpoints are the same vertex.
    pub fn is_self_loop(&self) -> bool {
        self.source == self.target
    }
}

/// A sparse network over the dense vertex range `0..vertex_count`.
///
/// Edges are stored once per (normalized) pair. Re-inserting a pair merges
/// into the existing edge: the duplicate counter is bumped and the stored
/// weight becomes the maximum seen so far. Adjacency lists hold edge indices
/// in insertion order, so enumeration is deterministic for a given insertion
/// sequence.
///
/// # Example
///
/// ```rust
/// use sparsenet_core::{Network, NetworkConfig};
///
/// let mut net = Network::new(3, NetworkConfig::undirected());
///
/// assert!(net.insert_edge(0, 1, 1.0).unwrap());
/// assert!(!net.insert_edge(1, 0, 5.0).unwrap()); // same undirected pair
///
/// assert_eq!(net.edge_count(), 1);
/// assert_eq!(net.duplicate_count(), 1);
/// assert_eq!(net.edge(0, 1).unwrap().weight, 5.0);
/// ```
#[derive(Debug, Clone)]
pub struct Network {
    config: NetworkConfig,
    vertex_count: usize,

    /// All distinct edges, in insertion order.
    edges: Vec<Edge>,

    /// Normalized (source, target) -> index into `edges`.
    edge_index: HashMap<(usize, usize), usize>,

    /// Per-vertex edge indices. For undirected networks this holds every
    /// incident edge; for directed networks only outgoing ones.
    outgoing: Vec<Vec<usize>>,

    /// Per-vertex incoming edge indices (directed networks only).
    incoming: Vec<Vec<usize>>,

    /// Total merge events across all pairs.
    duplicate_count: usize,
}

impl Network {
    /// Create a network with `vertex_count` isolated vertices.
    pub fn new(vertex_count: usize, config: NetworkConfig) -> Self {
        debug!(vertex_count, directed = config.directed, "creating network");
        let incoming = if config.directed {
            vec![Vec::new(); vertex_count]
        } else {
            Vec::new()
        };

        Self {
            config,
            vertex_count,
            edges: Vec::new(),
            edge_index: HashMap::new(),
            outgoing: vec![Vec::new(); vertex_count],
            incoming,
            duplicate_count: 0,
        }
    }

    /// Create a network from a signed vertex count, as produced by counting
    /// parsers. Negative counts are rejected.
    pub fn try_new(vertex_count: i64, config: NetworkConfig) -> Result<Self> {
        let n = usize::try_from(vertex_count).map_err(|_| {
            Error::InvalidArgument(format!("vertex count must be >= 0, got {vertex_count}"))
        })?;
        Ok(Self::new(n, config))
    }

    /// Insert an edge, merging with an existing one for the same pair.
    ///
    /// Returns `true` if a new edge was stored and `false` if the pair was
    /// already present. On a merge the adjacency lists are left untouched.
    pub fn insert_edge(&mut self, u: usize, v: usize, weight: f64) -> Result<bool> {
        self.check_vertex(u)?;
        self.check_vertex(v)?;
        if !weight.is_finite() {
            return Err(Error::InvalidArgument(format!(
                "edge ({u}, {v}) has non-finite weight {weight}"
            )));
        }

        let key = self.key(u, v);
        if let Some(&idx) = self.edge_index.get(&key) {
            let edge = &mut self.edges[idx];
            edge.duplicates += 1;
            if weight > edge.weight {
                edge.weight = weight;
            }
            self.duplicate_count += 1;
            return Ok(false);
        }

        let idx = self.edges.len();
        self.edges.push(Edge {
            source: u,
            target: v,
            weight,
            duplicates: 0,
        });
        self.edge_index.insert(key, idx);

        self.outgoing[u].push(idx);
        if self.config.directed {
            self.incoming[v].push(idx);
        } else if u != v {
            self.outgoing[v].push(idx);
        }

        Ok(true)
    }

    /// Insert an edge with the default weight of 1.0.
    pub fn insert_unweighted(&mut self, u: usize, v: usize) -> Result<bool> {
        self.insert_edge(u, v, 1.0)
    }

    fn check_vertex(&self, vertex: usize) -> Result<()> {
        if vertex < self.vertex_count {
            Ok(())
        } else {
            Err(Error::OutOfRange {
                vertex,
                vertex_count: self.vertex_count,
            })
        }
    }

    fn key(&self, u: usize, v: usize) -> (usize, usize) {
        if self.config.directed {
            (u, v)
        } else {
            (u.min(v), u.max(v))
        }
    }

    /// Look up the stored edge for a pair. Undirected lookups ignore order.
    pub fn edge(&self, u: usize, v: usize) -> Option<&Edge> {
        self.edge_index
            .get(&self.key(u, v))
            .map(|&idx| &self.edges[idx])
    }

    /// All distinct edges in insertion order.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Number of distinct edges (duplicates excluded).
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Total number of duplicate submissions merged so far.
    pub fn duplicate_count(&self) -> usize {
        self.duplicate_count
    }

    /// Number of vertices, fixed at construction.
    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    /// Whether `(u, v)` and `(v, u)` are distinct edges.
    pub fn is_directed(&self) -> bool {
        self.config.directed
    }

    /// The configuration this network was built with.
    pub fn config(&self) -> NetworkConfig {
        self.config
    }

    /// Neighbors one edge away, with the merged edge weight.
    ///
    /// Successors for directed networks, all neighbors otherwise. Order is
    /// insertion order. Out-of-range vertices have no neighbors.
    pub fn adjacency(&self, vertex: usize) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.outgoing
            .get(vertex)
            .into_iter()
            .flatten()
            .map(move |&idx| {
                let edge = &self.edges[idx];
                (edge.other(vertex), edge.weight)
            })
    }

    /// Predecessors of a vertex. Always empty for undirected networks.
    pub fn predecessors(&self, vertex: usize) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.incoming
            .get(vertex)
            .into_iter()
            .flatten()
            .map(move |&idx| {
                let edge = &self.edges[idx];
                (edge.source, edge.weight)
            })
    }

    /// Neighbors ignoring edge direction: successors, then predecessors.
    pub fn undirected_neighbors(&self, vertex: usize) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.adjacency(vertex).chain(self.predecessors(vertex))
    }

    /// Edge indices whose stored source is `vertex`, in insertion order.
    ///
    /// Each edge is reported by exactly one vertex, which makes this the
    /// basis for enumerating induced edge sets without repeats.
    pub(crate) fn sourced_edges(&self, vertex: usize) -> impl Iterator<Item = usize> + '_ {
        self.outgoing
            .get(vertex)
            .into_iter()
            .flatten()
            .copied()
            .filter(move |&idx| self.edges[idx].source == vertex)
    }

    /// Number of incident edge ends, counting both directions. A self-loop
    /// contributes 2 whether the network is directed or not. O(d).
    pub fn degree(&self, vertex: usize) -> usize {
        let Some(out) = self.outgoing.get(vertex) else {
            return 0;
        };
        if self.config.directed {
            return out.len() + self.incoming[vertex].len();
        }
        // Undirected self-loops are listed once
        let loops = out.iter().filter(|&&idx| self.edges[idx].is_self_loop()).count();
        out.len() + loops
    }
}

/// Statistics about a network.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkStats {
    /// Number of vertices.
    pub vertex_count: usize,
    /// Number of distinct edges.
    pub edge_count: usize,
    /// Total duplicate submissions merged.
    pub duplicate_count: usize,
    /// Whether the network is directed.
    pub directed: bool,
    /// Vertices with no incident edges.
    pub isolated_vertices: usize,
    /// Largest vertex degree.
    pub max_degree: usize,
}

impl Network {
    /// Compute statistics about the network.
    pub fn stats(&self) -> NetworkStats {
        let degrees = (0..self.vertex_count).map(|v| self.degree(v));
        let (isolated_vertices, max_degree) =
            degrees.fold((0, 0), |(isolated, max), d| {
                (isolated + usize::from(d == 0), max.max(d))
            });

        NetworkStats {
            vertex_count: self.vertex_count,
            edge_count: self.edge_count(),
            duplicate_count: self.duplicate_count,
            directed: self.config.directed,
            isolated_vertices,
            max_degree,
        }
    }
}
