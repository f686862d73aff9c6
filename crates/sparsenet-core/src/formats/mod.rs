//! Graph input and output formats.
//!
//! - GML (graph markup) - node and edge declarations, optional edge weights
//! - CSV - headerless `source,target[,weight]` edge lists
//!
//! Readers remap external integer node IDs to the dense `0..N` range a
//! [`Network`] requires and keep the mapping in [`LoadedNetwork::node_ids`]
//! so writers can translate back.

mod csv;
mod gml;

pub use self::csv::Csv;
pub use gml::{Gml, GmlComponentWriter};

use crate::{Network, NetworkConfig};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Progress is logged every this many distinct edges.
const PROGRESS_INTERVAL: usize = 10_000_000;

/// Options shared by all readers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadOptions {
    /// Force directedness. `None` defers to the input (GML `directed 1`),
    /// falling back to undirected.
    pub directed: Option<bool>,
}

impl LoadOptions {
    fn config(self, declared: Option<bool>) -> NetworkConfig {
        NetworkConfig {
            directed: self.directed.or(declared).unwrap_or(false),
        }
    }
}

/// Counters collected while loading.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadStats {
    /// Number of declared nodes.
    pub node_count: usize,
    /// Smallest external node ID, if any node was declared.
    pub min_id: Option<i64>,
    /// Largest external node ID, if any node was declared.
    pub max_id: Option<i64>,
    /// Distinct edges stored.
    pub distinct_edges: usize,
    /// Duplicate edge submissions merged into existing edges.
    pub duplicate_edges: usize,
}

/// A network together with its external node IDs.
#[derive(Debug, Clone)]
pub struct LoadedNetwork {
    /// The network over dense indices.
    pub network: Network,
    /// External ID of each dense index.
    pub node_ids: Vec<i64>,
    /// Load counters.
    pub stats: LoadStats,
}

/// Tracks edge counts and ID range while a reader feeds a network.
#[derive(Debug, Default)]
struct LoadTally {
    stats: LoadStats,
}

impl LoadTally {
    fn node(&mut self, id: i64) {
        self.stats.node_count += 1;
        self.stats.min_id = Some(self.stats.min_id.map_or(id, |m| m.min(id)));
        self.stats.max_id = Some(self.stats.max_id.map_or(id, |m| m.max(id)));
    }

    fn edge(&mut self, inserted: bool) {
        if inserted {
            self.stats.distinct_edges += 1;
            if self.stats.distinct_edges % PROGRESS_INTERVAL == 0 {
                info!(
                    "{} million edges read",
                    self.stats.distinct_edges / 1_000_000
                );
            }
        } else {
            self.stats.duplicate_edges += 1;
        }
    }

    fn finish(self, network: Network, node_ids: Vec<i64>) -> LoadedNetwork {
        if let Some(min) = self.stats.min_id {
            if min != 0 && min != 1 {
                warn!(min, "smallest node number should be 0 or 1");
            }
        }
        info!(
            nodes = self.stats.node_count,
            edges = self.stats.distinct_edges,
            duplicates = self.stats.duplicate_edges,
            "network loaded"
        );
        LoadedNetwork {
            network,
            node_ids,
            stats: self.stats,
        }
    }
}
