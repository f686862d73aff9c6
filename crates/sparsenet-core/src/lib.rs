// Allow minor clippy style warnings at crate level
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::should_implement_trait)]
#![allow(clippy::missing_const_for_fn)]

//! Sparse networks and connected components.
//!
//! Built for large relationship graphs (e.g. genotype-similarity networks)
//! where the same edge can show up many times in the input:
//!
//! - [`Network`] - Fixed vertex set `0..N`, edge insertion that merges
//!   duplicates into a single max-weight edge, insertion-ordered adjacency
//! - [`algo::components`] - Breadth-first partition into connected components,
//!   each with its induced edge set
//! - [`formats`] - GML and CSV readers, GML component writer
//! - [`RunSummary`] - Counters for a load-and-extract run
//!
//! # Example
//!
//! ```rust
//! use sparsenet_core::{Network, NetworkConfig};
//! use sparsenet_core::algo::components::extract_components;
//!
//! let mut net = Network::new(5, NetworkConfig::undirected());
//! net.insert_edge(0, 1, 1.0).unwrap();
//! net.insert_edge(1, 2, 1.0).unwrap();
//! net.insert_edge(3, 4, 2.0).unwrap();
//!
//! let components = extract_components(&net).unwrap();
//! assert_eq!(components.len(), 2);
//! assert_eq!(components[0].vertices, vec![0, 1, 2]);
//! assert_eq!(components[1].vertices, vec![3, 4]);
//! ```

pub mod algo;
mod error;
pub mod formats;
mod network;
mod summary;

pub use error::{Error, Result};
pub use network::{Edge, Network, NetworkConfig, NetworkStats};
pub use summary::RunSummary;
