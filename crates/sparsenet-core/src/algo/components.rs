//! Connected components by breadth-first search.
//!
//! Components are defined on the underlying undirected connectivity: for a
//! directed network both successor and predecessor edges are followed, so the
//! result is the set of weakly connected components.
//!
//! Start vertices are taken in index order and adjacency is enumerated in
//! insertion order, so numbering and membership are fully determined by the
//! vertex count, directedness and the edge insertion sequence.
//!
//! - [`components`] - Lazy iterator, one [`Component`] at a time
//! - [`extract_components`] - Collect every component
//! - [`write_components`] - Stream components into a [`ComponentSink`]
//! - [`component_stats`] - Summary statistics over a partition

use crate::{Edge, Error, Network, Result};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::iter::FusedIterator;
use tracing::debug;

/// A connected component and its induced subgraph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    /// 1-based id in discovery order.
    pub id: usize,
    /// Member vertices in BFS discovery order. The first is the start vertex.
    pub vertices: Vec<usize>,
    /// Edges with both endpoints in this component, grouped by source vertex
    /// in discovery order, then in that vertex's adjacency order.
    pub edges: Vec<Edge>,
}

impl Component {
    /// Number of member vertices.
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Components always hold at least their start vertex.
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// A single vertex with no incident edges.
    pub fn is_singleton(&self) -> bool {
        self.vertices.len() == 1 && self.edges.is_empty()
    }
}

/// Iterator over the components of a network, in discovery order.
///
/// Each call to `next` runs one full BFS; once a component is yielded no
/// vertex will be added to it later.
pub struct Components<'a> {
    network: &'a Network,
    visited: Vec<bool>,
    queue: VecDeque<usize>,
    next_start: usize,
    next_id: usize,
}

impl<'a> Components<'a> {
    fn new(network: &'a Network) -> Self {
        Self {
            network,
            visited: vec![false; network.vertex_count()],
            queue: VecDeque::new(),
            next_start: 0,
            next_id: 0,
        }
    }

    /// Visit everything reachable from `start`, returning members in BFS order.
    fn explore(&mut self, start: usize) -> Vec<usize> {
        let mut members = vec![start];
        self.visited[start] = true;
        self.queue.push_back(start);

        while let Some(x) = self.queue.pop_front() {
            for (y, _) in self.network.undirected_neighbors(x) {
                if !self.visited[y] {
                    self.visited[y] = true;
                    members.push(y);
                    self.queue.push_back(y);
                }
            }
        }

        members
    }

    /// Every edge incident to a member lies inside the component, so the
    /// induced set is just the edges sourced at member vertices.
    fn induced_edges(&self, members: &[usize]) -> Vec<Edge> {
        let edges = self.network.edges();
        members
            .iter()
            .flat_map(|&v| self.network.sourced_edges(v))
            .map(|idx| edges[idx])
            .collect()
    }
}

impl Iterator for Components<'_> {
    type Item = Component;

    fn next(&mut self) -> Option<Component> {
        let n = self.visited.len();
        while self.next_start < n && self.visited[self.next_start] {
            self.next_start += 1;
        }
        if self.next_start == n {
            return None;
        }

        self.next_id += 1;
        let vertices = self.explore(self.next_start);
        let edges = self.induced_edges(&vertices);
        debug!(
            id = self.next_id,
            vertices = vertices.len(),
            edges = edges.len(),
            "component complete"
        );

        Some(Component {
            id: self.next_id,
            vertices,
            edges,
        })
    }
}

impl FusedIterator for Components<'_> {}

/// Lazily partition a network into connected components.
///
/// Fails with [`Error::InvalidArgument`] for a network without vertices.
pub fn components(network: &Network) -> Result<Components<'_>> {
    if network.vertex_count() == 0 {
        return Err(Error::InvalidArgument(
            "cannot extract components from a network with no vertices".into(),
        ));
    }
    Ok(Components::new(network))
}

/// Partition a network into connected components.
///
/// # Complexity
/// O(V + E) time; O(V) extra space for the visited flags and queue.
pub fn extract_components(network: &Network) -> Result<Vec<Component>> {
    Ok(components(network)?.collect())
}

/// Consumer of components as they are discovered.
pub trait ComponentSink {
    /// Handle one finished component.
    fn write_component(&mut self, network: &Network, component: &Component) -> Result<()>;
}

/// Sink that keeps every component in memory.
#[derive(Debug, Clone, Default)]
pub struct CollectingSink {
    /// Components received so far.
    pub components: Vec<Component>,
}

impl ComponentSink for CollectingSink {
    fn write_component(&mut self, _network: &Network, component: &Component) -> Result<()> {
        self.components.push(component.clone());
        Ok(())
    }
}

/// Diagnostics from a [`write_components`] run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionSummary {
    /// Number of components found.
    pub component_count: usize,
    /// Vertex count of the largest component.
    pub largest_component_size: usize,
    /// Components with one vertex and no edges.
    pub singleton_count: usize,
    /// Total induced edges handed to the sink.
    pub edges_written: usize,
}

/// Stream each component into `sink`, dropping it before the next is found.
pub fn write_components<S: ComponentSink + ?Sized>(
    network: &Network,
    sink: &mut S,
) -> Result<ExtractionSummary> {
    let mut summary = ExtractionSummary::default();

    for component in components(network)? {
        sink.write_component(network, &component)?;

        summary.component_count += 1;
        summary.largest_component_size = summary.largest_component_size.max(component.len());
        summary.singleton_count += usize::from(component.is_singleton());
        summary.edges_written += component.edges.len();
    }

    Ok(summary)
}

/// Statistics about connected components.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentStats {
    /// Number of components.
    pub num_components: usize,
    /// Size of the largest component.
    pub max_component_size: usize,
    /// Size of the smallest component.
    pub min_component_size: usize,
    /// Average component size.
    pub avg_component_size: f64,
    /// Fraction of vertices in the largest component.
    pub largest_component_fraction: f64,
}

/// Compute statistics from components.
///
/// Returns zeroed stats if components is empty.
#[must_use]
pub fn component_stats(components: &[Component]) -> ComponentStats {
    if components.is_empty() {
        return ComponentStats {
            num_components: 0,
            max_component_size: 0,
            min_component_size: 0,
            avg_component_size: 0.0,
            largest_component_fraction: 0.0,
        };
    }

    let sizes: Vec<usize> = components.iter().map(Component::len).collect();
    let total: usize = sizes.iter().sum();
    let max_size = sizes.iter().copied().max().unwrap_or(0);
    let min_size = sizes.iter().copied().min().unwrap_or(0);

    ComponentStats {
        num_components: components.len(),
        max_component_size: max_size,
        min_component_size: min_size,
        avg_component_size: total as f64 / components.len() as f64,
        largest_component_fraction: if total > 0 {
            max_size as f64 / total as f64
        } else {
            0.0
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NetworkConfig;
    use petgraph::unionfind::UnionFind;

    fn build(n: usize, directed: bool, edges: &[(usize, usize, f64)]) -> Network {
        let mut net = Network::new(n, NetworkConfig { directed });
        for &(u, v, w) in edges {
            net.insert_edge(u, v, w).unwrap();
        }
        net
    }

    fn sorted(mut v: Vec<usize>) -> Vec<usize> {
        v.sort_unstable();
        v
    }

    #[test]
    fn test_two_components() {
        let net = build(5, false, &[(0, 1, 1.0), (1, 2, 1.0), (3, 4, 2.0)]);
        let comps = extract_components(&net).unwrap();

        assert_eq!(comps.len(), 2);
        assert_eq!(comps[0].id, 1);
        assert_eq!(comps[0].vertices, vec![0, 1, 2]);
        assert_eq!(comps[0].edges.len(), 2);
        assert_eq!(comps[1].id, 2);
        assert_eq!(comps[1].vertices, vec![3, 4]);
        assert_eq!(comps[1].edges[0].weight, 2.0);
    }

    #[test]
    fn test_duplicate_then_singleton() {
        let net = build(3, false, &[(0, 1, 1.0), (0, 1, 5.0)]);
        assert_eq!(net.edge_count(), 1);

        let comps = extract_components(&net).unwrap();
        assert_eq!(comps.len(), 2);
        assert_eq!(comps[0].vertices, vec![0, 1]);
        assert_eq!(comps[0].edges.len(), 1);
        assert_eq!(comps[0].edges[0].weight, 5.0);
        assert_eq!(comps[0].edges[0].duplicates, 1);
        assert_eq!(comps[1].vertices, vec![2]);
        assert!(comps[1].is_singleton());
    }

    #[test]
    fn test_single_vertex() {
        let net = Network::new(1, NetworkConfig::default());
        let comps = extract_components(&net).unwrap();

        assert_eq!(comps.len(), 1);
        assert_eq!(comps[0].vertices, vec![0]);
        assert!(comps[0].edges.is_empty());
    }

    #[test]
    fn test_empty_network_rejected() {
        let net = Network::new(0, NetworkConfig::default());
        assert!(matches!(
            extract_components(&net),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_directed_weak_connectivity() {
        // 0 -> 1 <- 2: no directed path from 0 to 2, but weakly connected
        let net = build(4, true, &[(0, 1, 1.0), (2, 1, 1.0)]);
        let comps = extract_components(&net).unwrap();

        assert_eq!(comps.len(), 2);
        assert_eq!(comps[0].vertices, vec![0, 1, 2]);
        assert_eq!(comps[0].edges.len(), 2);
        assert_eq!(comps[1].vertices, vec![3]);
    }

    #[test]
    fn test_directed_antiparallel_edges_both_induced() {
        let net = build(2, true, &[(0, 1, 1.0), (1, 0, 3.0)]);
        let comps = extract_components(&net).unwrap();

        assert_eq!(comps.len(), 1);
        let weights: Vec<f64> = comps[0].edges.iter().map(|e| e.weight).collect();
        assert_eq!(weights, vec![1.0, 3.0]);
    }

    #[test]
    fn test_self_loop_induced_once() {
        let net = build(3, false, &[(1, 1, 1.0), (1, 2, 1.0)]);
        let comps = extract_components(&net).unwrap();

        assert_eq!(comps.len(), 2);
        assert_eq!(comps[0].vertices, vec![0]);
        assert_eq!(comps[1].vertices, vec![1, 2]);
        assert_eq!(comps[1].edges.len(), 2);
        assert!(!comps[1].is_singleton());
    }

    #[test]
    fn test_bfs_discovery_order() {
        // Star around 0 plus a tail: BFS visits 0, its neighbors, then 4.
        let net = build(5, false, &[(0, 3, 1.0), (0, 1, 1.0), (1, 4, 1.0), (0, 2, 1.0)]);
        let comps = extract_components(&net).unwrap();

        assert_eq!(comps.len(), 1);
        assert_eq!(comps[0].vertices, vec![0, 3, 1, 2, 4]);
    }

    #[test]
    fn test_edges_follow_discovery_order() {
        // Inserted out of order; emitted by source vertex as BFS reaches it
        let net = build(4, false, &[(2, 3, 1.0), (0, 1, 1.0), (1, 2, 1.0)]);
        let comps = extract_components(&net).unwrap();

        let pairs: Vec<(usize, usize)> = comps[0].edges.iter().map(|e| (e.source, e.target)).collect();
        assert_eq!(pairs, vec![(0, 1), (1, 2), (2, 3)]);
    }

    #[test]
    fn test_edges_grouped_by_source_adjacency() {
        let net = build(3, false, &[(0, 2, 1.0), (1, 0, 2.0), (0, 1, 3.0), (2, 1, 4.0)]);
        assert_eq!(net.edge_count(), 3);
        let comps = extract_components(&net).unwrap();

        // 0 is discovered first, then 2 and 1; (1, 0) has source 1
        let pairs: Vec<(usize, usize)> = comps[0].edges.iter().map(|e| (e.source, e.target)).collect();
        assert_eq!(comps[0].vertices, vec![0, 2, 1]);
        assert_eq!(pairs, vec![(0, 2), (2, 1), (1, 0)]);
        assert_eq!(comps[0].edges[2].weight, 3.0);
    }

    #[test]
    fn test_matches_union_find() {
        let edges = [
            (0, 5, 1.0),
            (5, 9, 1.0),
            (2, 3, 1.0),
            (7, 7, 1.0),
            (8, 2, 1.0),
            (4, 6, 1.0),
        ];
        let n = 10;
        let net = build(n, true, &edges);

        let mut uf = UnionFind::<usize>::new(n);
        for &(u, v, _) in &edges {
            uf.union(u, v);
        }

        let comps = extract_components(&net).unwrap();
        let mut seen = vec![false; n];
        for comp in &comps {
            for &v in &comp.vertices {
                assert!(!seen[v], "vertex {} in two components", v);
                seen[v] = true;
                assert!(uf.equiv(comp.vertices[0], v));
            }
        }
        assert!(seen.iter().all(|&s| s));

        let roots: std::collections::HashSet<usize> = uf.into_labeling().into_iter().collect();
        assert_eq!(comps.len(), roots.len());
    }

    #[test]
    fn test_lazy_iterator() {
        let net = build(4, false, &[(0, 1, 1.0), (2, 3, 1.0)]);
        let mut iter = components(&net).unwrap();

        assert_eq!(sorted(iter.next().unwrap().vertices), vec![0, 1]);
        assert_eq!(sorted(iter.next().unwrap().vertices), vec![2, 3]);
        assert!(iter.next().is_none());
        assert!(iter.next().is_none());
    }

    #[test]
    fn test_write_components_summary() {
        let net = build(6, false, &[(0, 1, 1.0), (1, 2, 1.0), (4, 5, 1.0)]);
        let mut sink = CollectingSink::default();

        let summary = write_components(&net, &mut sink).unwrap();
        assert_eq!(summary.component_count, 3);
        assert_eq!(summary.largest_component_size, 3);
        assert_eq!(summary.singleton_count, 1);
        assert_eq!(summary.edges_written, 3);

        let ids: Vec<usize> = sink.components.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_component_stats() {
        let net = build(4, false, &[(0, 1, 1.0), (1, 2, 1.0)]);
        let comps = extract_components(&net).unwrap();
        let stats = component_stats(&comps);

        assert_eq!(stats.num_components, 2);
        assert_eq!(stats.max_component_size, 3);
        assert_eq!(stats.min_component_size, 1);
        assert!((stats.avg_component_size - 2.0).abs() < 1e-6);
        assert!((stats.largest_component_fraction - 0.75).abs() < 1e-6);

        assert_eq!(component_stats(&[]).num_components, 0);
    }
}
