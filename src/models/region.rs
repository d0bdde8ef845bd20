//! Region model.
//!
//! Regions are the nodes of the road network. Each region owns its outgoing
//! road segments (neighbour → distance) and the subset of those segments that
//! are currently blocked. Travel attributes (terrain speed, congestion) are
//! properties of the source region, so the resulting graph is directed and
//! generally asymmetric.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Terrain classification of a region.
///
/// Determines the base travel speed (km/h) when no explicit speed is given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Terrain {
    /// Dense city streets.
    Urban,
    /// Mixed arterial roads.
    Suburban,
    /// Open highways and country roads.
    Rural,
    /// Unrecognised terrain label.
    Other(String),
}

impl Terrain {
    /// Base travel speed (km/h) for this terrain class.
    pub fn base_speed(&self) -> f64 {
        match self {
            Terrain::Urban => 30.0,
            Terrain::Suburban => 50.0,
            Terrain::Rural => 80.0,
            Terrain::Other(_) => 50.0,
        }
    }
}

impl Default for Terrain {
    fn default() -> Self {
        Terrain::Other(String::new())
    }
}

impl From<String> for Terrain {
    fn from(label: String) -> Self {
        match label.as_str() {
            "Urban" => Terrain::Urban,
            "Suburban" => Terrain::Suburban,
            "Rural" => Terrain::Rural,
            _ => Terrain::Other(label),
        }
    }
}

impl From<Terrain> for String {
    fn from(terrain: Terrain) -> Self {
        match terrain {
            Terrain::Urban => "Urban".into(),
            Terrain::Suburban => "Suburban".into(),
            Terrain::Rural => "Rural".into(),
            Terrain::Other(label) => label,
        }
    }
}

/// A geographic region (graph node) with its outgoing road segments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Region {
    /// Unique region identifier.
    #[serde(alias = "region_id")]
    pub id: String,
    /// Terrain class.
    #[serde(default, rename = "terrain_type", alias = "type")]
    pub terrain: Terrain,
    /// Explicit travel speed (km/h). Overrides the terrain default.
    #[serde(default)]
    pub speed: Option<f64>,
    /// Outgoing road segments: neighbour id → distance (km).
    #[serde(default)]
    pub distances: BTreeMap<String, f64>,
    /// Travel-speed multiplier (1.0 = free flow, <1.0 = congested).
    pub congestion_factor: f64,
    /// Neighbours whose outgoing segment from this region is closed.
    #[serde(default)]
    pub blocked_routes: BTreeSet<String>,
}

impl Region {
    /// Creates a region with the given terrain and free-flow traffic.
    pub fn new(id: impl Into<String>, terrain: Terrain) -> Self {
        Self {
            id: id.into(),
            terrain,
            speed: None,
            distances: BTreeMap::new(),
            congestion_factor: 1.0,
            blocked_routes: BTreeSet::new(),
        }
    }

    /// Sets an explicit travel speed (km/h).
    pub fn with_speed(mut self, speed: f64) -> Self {
        self.speed = Some(speed);
        self
    }

    /// Sets the congestion multiplier.
    pub fn with_congestion(mut self, factor: f64) -> Self {
        self.congestion_factor = factor;
        self
    }

    /// Adds an outgoing road segment.
    pub fn with_neighbor(mut self, neighbor: impl Into<String>, distance: f64) -> Self {
        self.distances.insert(neighbor.into(), distance);
        self
    }

    /// Blocks the outgoing segment towards `neighbor`.
    pub fn with_blocked(mut self, neighbor: impl Into<String>) -> Self {
        self.blocked_routes.insert(neighbor.into());
        self
    }

    /// Speed used for travel-time estimation (km/h).
    pub fn effective_speed(&self) -> f64 {
        self.speed.unwrap_or_else(|| self.terrain.base_speed())
    }

    /// Travel time (minutes) from this region to `neighbor`.
    ///
    /// Returns `f64::INFINITY` when the segment is blocked or absent.
    pub fn travel_minutes(&self, neighbor: &str) -> f64 {
        if self.blocked_routes.contains(neighbor) {
            return f64::INFINITY;
        }
        match self.distances.get(neighbor) {
            Some(&distance) => {
                segment_minutes(distance, self.effective_speed(), self.congestion_factor)
            }
            None => f64::INFINITY,
        }
    }
}

/// Rounded travel time (minutes) for one road segment.
///
/// `round(distance / (speed * congestion) * 60)`. A non-positive effective
/// speed means the segment cannot be travelled and yields `f64::INFINITY`.
pub fn segment_minutes(distance: f64, speed: f64, congestion_factor: f64) -> f64 {
    let rate = speed * congestion_factor;
    // NaN rates fall through to the impassable branch as well.
    if !(rate > 0.0) || !distance.is_finite() || distance < 0.0 {
        return f64::INFINITY;
    }
    (distance / rate * 60.0).round()
}
