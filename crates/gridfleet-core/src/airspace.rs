//! Static airspace reference data: dock layout, target catalog, altitude
//! layers and quadrants. Consumed by the engine, never mutated by it.

use crate::models::{Drone, GridPosition, TargetPosition};
use serde::{Deserialize, Serialize};

/// Docks are laid out on a square grid of this many cells per side.
pub const GRID_SIZE: i32 = 4;

/// Transit layer for even-numbered drones.
pub const PRIMARY_TRANSIT_LAYER: u8 = 3;
/// Transit layer for odd-numbered drones.
pub const SECONDARY_TRANSIT_LAYER: u8 = 4;

/// Cruise altitude bands in meters, picked by conflict severity.
pub mod cruise {
    pub const LOW_M: f64 = 10.0;
    pub const MEDIUM_M: f64 = 15.0;
    pub const HIGH_M: f64 = 20.0;
    pub const VERY_HIGH_M: f64 = 25.0;
}

/// Horizontal-transit layer for a drone, fixed by id parity.
///
/// Even ids cruise in the primary band, odd ids in the secondary band.
/// The split is a one-way-traffic convention: only drones sharing a layer
/// are ever tested against each other by the conflict detector.
pub fn transit_layer(drone_id: u32) -> u8 {
    if drone_id % 2 == 0 {
        PRIMARY_TRANSIT_LAYER
    } else {
        SECONDARY_TRANSIT_LAYER
    }
}

/// Quadrant 1-4 for a dock cell: west/east split at x = 2, north/south at
/// y = 2.
pub fn quadrant_for(position: GridPosition) -> u8 {
    match (position.x < GRID_SIZE / 2, position.y < GRID_SIZE / 2) {
        (true, true) => 1,
        (false, true) => 2,
        (true, false) => 3,
        (false, false) => 4,
    }
}

/// The full 16-drone fleet at its dock positions, row-major from the
/// grid origin, with transit layer and quadrant precomputed.
pub fn default_fleet() -> Vec<Drone> {
    (0..GRID_SIZE * GRID_SIZE)
        .map(|i| {
            let id = (i + 1) as u32;
            let dock = GridPosition::new(i % GRID_SIZE, i / GRID_SIZE);
            Drone::docked(id, dock, transit_layer(id), quadrant_for(dock))
        })
        .collect()
}

/// The eight named destinations surrounding the grid.
pub fn target_catalog() -> Vec<TargetPosition> {
    vec![
        TargetPosition::named(-2, -2, "North West Zone"),
        TargetPosition::named(1, -3, "North Zone"),
        TargetPosition::named(5, -1, "North East Zone"),
        TargetPosition::named(-3, 2, "West Zone"),
        TargetPosition::named(6, 2, "East Zone"),
        TargetPosition::named(-2, 5, "South West Zone"),
        TargetPosition::named(2, 6, "South Zone"),
        TargetPosition::named(5, 5, "South East Zone"),
    ]
}

/// A named altitude band.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AltitudeLayer {
    pub id: u8,
    pub name: String,
    pub min_altitude_m: f64,
    pub max_altitude_m: f64,
    pub purpose: String,
}

/// A named grouping of four docks, used for presentation only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuadrantZone {
    pub id: u8,
    pub name: String,
    pub docks: Vec<u32>,
}

/// Vertical layering and quadrant grouping of the site airspace.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AirspaceStructure {
    pub layers: Vec<AltitudeLayer>,
    pub quadrants: Vec<QuadrantZone>,
}

impl AirspaceStructure {
    /// The standard five-layer, four-quadrant site structure.
    pub fn standard() -> Self {
        let layer = |id, name: &str, min, max, purpose: &str| AltitudeLayer {
            id,
            name: name.to_string(),
            min_altitude_m: min,
            max_altitude_m: max,
            purpose: purpose.to_string(),
        };
        let quadrant = |id, name: &str, docks: &[u32]| QuadrantZone {
            id,
            name: name.to_string(),
            docks: docks.to_vec(),
        };
        Self {
            layers: vec![
                layer(1, "Ground Operations", 0.0, 5.0, "Vertical takeoff and landing"),
                layer(2, "Transition", 5.0, 10.0, "Climb and descent between bands"),
                layer(3, "Primary Transit", 10.0, 15.0, "Horizontal transit, even drone ids"),
                layer(4, "Secondary Transit", 15.0, 20.0, "Horizontal transit, odd drone ids"),
                layer(5, "Emergency Overflight", 20.0, 25.0, "Reserved for priority traffic"),
            ],
            quadrants: vec![
                quadrant(1, "North West", &[1, 2, 5, 6]),
                quadrant(2, "North East", &[3, 4, 7, 8]),
                quadrant(3, "South West", &[9, 10, 13, 14]),
                quadrant(4, "South East", &[11, 12, 15, 16]),
            ],
        }
    }
}
