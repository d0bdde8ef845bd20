//! Road-network routing.
//!
//! Builds a directed, weighted region graph (weights = travel minutes) and
//! answers shortest travel time queries. Unreachable targets are a valid
//! `f64::INFINITY` result, not an error; unknown region ids are.
//!
//! # Usage
//!
//! ```
//! use u_emergency::models::{Region, Terrain};
//! use u_emergency::routing::RegionGraph;
//!
//! let regions = vec![
//!     Region::new("A", Terrain::Urban).with_speed(30.0).with_neighbor("B", 10.0),
//!     Region::new("B", Terrain::Urban).with_speed(30.0).with_neighbor("A", 10.0),
//! ];
//! let graph = RegionGraph::build(&regions).unwrap();
//! assert_eq!(graph.shortest_time("A", "B").unwrap(), 20.0);
//! ```

mod graph;

pub use graph::RegionGraph;
