//! Directed region graph and shortest travel time search.
//!
//! # Algorithm
//! Single-source Dijkstra over a binary min-heap with lazy deletion.
//! Edge weights are rounded travel minutes, always non-negative; blocked or
//! impassable segments are never inserted, so "no edge" and "+∞" coincide.
//!
//! # Complexity
//! Build: O(V + E). Search: O((V + E) log V).
//!
//! # Reference
//! Dijkstra (1959), "A note on two problems in connexion with graphs"

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use tracing::debug;

use crate::error::{Error, Result};
use crate::models::Region;
use crate::validation::validate_regions;

#[derive(Debug, Clone, Copy)]
struct Edge {
    to: usize,
    minutes: f64,
}

/// Read-only road network built from a region snapshot.
///
/// Region ids are mapped to dense indices once; searches work on indices.
/// The graph is immutable and can be shared across threads.
#[derive(Debug, Clone)]
pub struct RegionGraph {
    ids: Vec<String>,
    index: HashMap<String, usize>,
    adjacency: Vec<Vec<Edge>>,
}

#[derive(Debug)]
struct State {
    cost: f64,
    node: usize,
}

impl PartialEq for State {
    fn eq(&self, other: &Self) -> bool {
        self.cost == other.cost && self.node == other.node
    }
}

impl Eq for State {}

impl PartialOrd for State {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for State {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed for a min-heap; node index keeps pops deterministic.
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl RegionGraph {
    /// Builds the graph from a region snapshot.
    ///
    /// Edges come strictly from each region's own distance map; a blocked
    /// forward segment never affects the reverse direction.
    ///
    /// # Errors
    /// [`Error::Validation`] on duplicate region ids, unknown neighbours or
    /// invalid distances.
    pub fn build(regions: &[Region]) -> Result<Self> {
        validate_regions(regions)?;

        let ids: Vec<String> = regions.iter().map(|r| r.id.clone()).collect();
        let index: HashMap<String, usize> = ids
            .iter()
            .enumerate()
            .map(|(i, id)| (id.clone(), i))
            .collect();

        let adjacency: Vec<Vec<Edge>> = regions
            .iter()
            .map(|region| {
                region
                    .distances
                    .keys()
                    .filter_map(|neighbor| {
                        let minutes = region.travel_minutes(neighbor);
                        if !minutes.is_finite() {
                            return None;
                        }
                        index.get(neighbor).map(|&to| Edge { to, minutes })
                    })
                    .collect()
            })
            .collect();

        debug!(
            regions = ids.len(),
            edges = adjacency.iter().map(Vec::len).sum::<usize>(),
            "region graph built"
        );

        Ok(Self {
            ids,
            index,
            adjacency,
        })
    }

    /// Number of regions.
    pub fn region_count(&self) -> usize {
        self.ids.len()
    }

    /// Number of traversable directed segments.
    pub fn edge_count(&self) -> usize {
        self.adjacency.iter().map(Vec::len).sum()
    }

    /// Whether the region id is part of the graph.
    pub fn contains(&self, region_id: &str) -> bool {
        self.index.contains_key(region_id)
    }

    /// Travel minutes of the direct segment `from → to`, if traversable.
    pub fn edge_minutes(&self, from: &str, to: &str) -> Option<f64> {
        let from = *self.index.get(from)?;
        let to = *self.index.get(to)?;
        self.adjacency[from]
            .iter()
            .find(|edge| edge.to == to)
            .map(|edge| edge.minutes)
    }

    fn node(&self, region_id: &str) -> Result<usize> {
        self.index
            .get(region_id)
            .copied()
            .ok_or_else(|| Error::UnknownRegion(region_id.to_string()))
    }

    /// Shortest travel time (minutes) from `start` to `end`.
    ///
    /// Returns `0.0` when `start == end` and `f64::INFINITY` when `end` is
    /// unreachable. The search stops as soon as `end` is settled.
    ///
    /// # Errors
    /// [`Error::UnknownRegion`] if either id is not in the graph.
    pub fn shortest_time(&self, start: &str, end: &str) -> Result<f64> {
        let source = self.node(start)?;
        let target = self.node(end)?;
        let dist = self.search(source, Some(target));
        Ok(dist[target])
    }

    /// Shortest travel time from `start` to every region.
    ///
    /// Unreachable regions map to `f64::INFINITY`.
    ///
    /// # Errors
    /// [`Error::UnknownRegion`] if `start` is not in the graph.
    pub fn travel_times_from(&self, start: &str) -> Result<HashMap<String, f64>> {
        let source = self.node(start)?;
        let dist = self.search(source, None);
        Ok(self.ids.iter().cloned().zip(dist).collect())
    }

    fn search(&self, source: usize, target: Option<usize>) -> Vec<f64> {
        let mut dist = vec![f64::INFINITY; self.ids.len()];
        let mut heap = BinaryHeap::new();

        dist[source] = 0.0;
        heap.push(State {
            cost: 0.0,
            node: source,
        });

        while let Some(State { cost, node }) = heap.pop() {
            if Some(node) == target {
                break;
            }
            // Stale entry
            if cost > dist[node] {
                continue;
            }

            for edge in &self.adjacency[node] {
                let next = cost + edge.minutes;
                if next < dist[edge.to] {
                    dist[edge.to] = next;
                    heap.push(State {
                        cost: next,
                        node: edge.to,
                    });
                }
            }
        }

        dist
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Terrain;
    use crate::validation::ValidationErrorKind;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn two_regions() -> Vec<Region> {
        vec![
            Region::new("A", Terrain::Urban)
                .with_speed(30.0)
                .with_neighbor("B", 10.0),
            Region::new("B", Terrain::Urban)
                .with_speed(30.0)
                .with_neighbor("A", 10.0),
        ]
    }

    /// A → B → C (10 + 10 min) and a slow detour A → D → C (20 + 20 min).
    fn diamond() -> Vec<Region> {
        vec![
            Region::new("A", Terrain::Urban)
                .with_neighbor("B", 5.0)
                .with_neighbor("D", 10.0),
            Region::new("B", Terrain::Urban).with_neighbor("C", 5.0),
            Region::new("C", Terrain::Urban),
            Region::new("D", Terrain::Urban).with_neighbor("C", 10.0),
        ]
    }

    fn random_regions(rng: &mut StdRng, count: usize) -> Vec<Region> {
        (0..count)
            .map(|i| {
                let mut region = Region::new(format!("R{i}"), Terrain::Urban)
                    .with_congestion(rng.random_range(0.5..1.5));
                for j in 0..count {
                    if i != j && rng.random_bool(0.35) {
                        region = region.with_neighbor(format!("R{j}"), rng.random_range(1.0..20.0));
                    }
                }
                region
            })
            .collect()
    }

    #[test]
    fn test_two_region_scenario() {
        let graph = RegionGraph::build(&two_regions()).unwrap();
        assert_eq!(graph.shortest_time("A", "B").unwrap(), 20.0);
        assert_eq!(graph.shortest_time("B", "A").unwrap(), 20.0);
        assert_eq!(graph.region_count(), 2);
        assert_eq!(graph.edge_count(), 2);
    }

    #[test]
    fn test_same_region_is_zero() {
        let graph = RegionGraph::build(&diamond()).unwrap();
        for id in ["A", "B", "C", "D"] {
            assert_eq!(graph.shortest_time(id, id).unwrap(), 0.0);
        }
    }

    #[test]
    fn test_prefers_multi_hop_shortcut() {
        let graph = RegionGraph::build(&diamond()).unwrap();
        assert_eq!(graph.shortest_time("A", "C").unwrap(), 20.0);
    }

    #[test]
    fn test_blocking_shortest_path_reroutes() {
        let mut regions = diamond();
        regions[1] = regions[1].clone().with_blocked("C");
        let graph = RegionGraph::build(&regions).unwrap();
        assert_eq!(graph.shortest_time("A", "C").unwrap(), 40.0);
    }

    #[test]
    fn test_blocking_only_path_is_unreachable() {
        let mut regions = two_regions();
        regions[0] = regions[0].clone().with_blocked("B");
        let graph = RegionGraph::build(&regions).unwrap();
        assert!(graph.shortest_time("A", "B").unwrap().is_infinite());
        // Reverse direction is unaffected.
        assert_eq!(graph.shortest_time("B", "A").unwrap(), 20.0);
    }

    #[test]
    fn test_directed_edges_only() {
        let regions = vec![
            Region::new("A", Terrain::Urban).with_neighbor("B", 10.0),
            Region::new("B", Terrain::Urban),
        ];
        let graph = RegionGraph::build(&regions).unwrap();
        assert_eq!(graph.shortest_time("A", "B").unwrap(), 20.0);
        assert!(graph.shortest_time("B", "A").unwrap().is_infinite());
    }

    #[test]
    fn test_zero_congestion_segment_is_dropped() {
        let regions = vec![
            Region::new("A", Terrain::Urban)
                .with_congestion(0.0)
                .with_neighbor("B", 10.0),
            Region::new("B", Terrain::Urban).with_neighbor("A", 10.0),
        ];
        let graph = RegionGraph::build(&regions).unwrap();
        assert!(graph.edge_minutes("A", "B").is_none());
        assert!(graph.shortest_time("A", "B").unwrap().is_infinite());
    }

    #[test]
    fn test_unknown_region_fails_fast() {
        let graph = RegionGraph::build(&two_regions()).unwrap();
        assert_eq!(
            graph.shortest_time("A", "Z"),
            Err(Error::UnknownRegion("Z".into()))
        );
        assert!(graph.travel_times_from("Z").is_err());
    }

    #[test]
    fn test_build_rejects_unknown_neighbour() {
        let regions = vec![Region::new("A", Terrain::Urban).with_neighbor("B", 1.0)];
        match RegionGraph::build(&regions) {
            Err(Error::Validation(errors)) => {
                assert_eq!(errors[0].kind, ValidationErrorKind::InvalidRegionReference)
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_travel_times_from_matches_pairwise() {
        let graph = RegionGraph::build(&diamond()).unwrap();
        let times = graph.travel_times_from("A").unwrap();
        for id in ["A", "B", "C", "D"] {
            assert_eq!(times[id], graph.shortest_time("A", id).unwrap());
        }
    }

    #[test]
    fn test_graph_shared_across_threads() {
        let graph = RegionGraph::build(&diamond()).unwrap();
        let results: Vec<f64> = std::thread::scope(|scope| {
            let handles: Vec<_> = ["B", "C", "D"]
                .into_iter()
                .map(|target| {
                    let graph = &graph;
                    scope.spawn(move || graph.shortest_time("A", target).unwrap())
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });
        assert_eq!(results, vec![10.0, 20.0, 20.0]);
    }

    #[test]
    fn test_random_graphs_zero_diagonal_and_triangle_inequality() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..20 {
            let regions = random_regions(&mut rng, 8);
            let graph = RegionGraph::build(&regions).unwrap();
            let all: Vec<HashMap<String, f64>> = regions
                .iter()
                .map(|r| graph.travel_times_from(&r.id).unwrap())
                .collect();

            for (a, from_a) in regions.iter().zip(&all) {
                assert_eq!(from_a[&a.id], 0.0);
                for (b, from_b) in regions.iter().zip(&all) {
                    assert!(from_a[&b.id] >= 0.0);
                    for c in &regions {
                        assert!(from_a[&c.id] <= from_a[&b.id] + from_b[&c.id]);
                    }
                }
            }
        }
    }

    #[test]
    fn test_random_graphs_heavier_edge_never_shortens() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..20 {
            let regions = random_regions(&mut rng, 8);
            let before = RegionGraph::build(&regions).unwrap();

            let mut heavier = regions.clone();
            let victim = rng.random_range(0..heavier.len());
            for distance in heavier[victim].distances.values_mut() {
                *distance *= 3.0;
            }
            let after = RegionGraph::build(&heavier).unwrap();

            for a in &regions {
                for b in &regions {
                    let old = before.shortest_time(&a.id, &b.id).unwrap();
                    let new = after.shortest_time(&a.id, &b.id).unwrap();
                    assert!(new >= old, "{} → {}: {new} < {old}", a.id, b.id);
                }
            }
        }
    }

    #[test]
    fn test_random_graphs_blocking_never_shortens() {
        let mut rng = StdRng::seed_from_u64(1234);
        for _ in 0..20 {
            let regions = random_regions(&mut rng, 8);
            let before = RegionGraph::build(&regions).unwrap();

            let mut blocked = regions.clone();
            let victim = rng.random_range(0..blocked.len());
            let targets: Vec<String> = blocked[victim].distances.keys().cloned().collect();
            for target in targets {
                if rng.random_bool(0.5) {
                    blocked[victim].blocked_routes.insert(target);
                }
            }
            let after = RegionGraph::build(&blocked).unwrap();

            for a in &regions {
                for b in &regions {
                    assert!(
                        after.shortest_time(&a.id, &b.id).unwrap()
                            >= before.shortest_time(&a.id, &b.id).unwrap()
                    );
                }
            }
        }
    }
}
