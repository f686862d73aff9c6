//! Algorithms over sparse networks.

/// Connected components via breadth-first search.
pub mod components;
