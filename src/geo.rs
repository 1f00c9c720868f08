use std::collections::BTreeMap;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::MapConfig;

/// Metres per degree of latitude.
const METRES_PER_DEGREE: f64 = 111_320.0;

// ---------------------------------------------------------------------------
// Coordinates
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

/// Equirectangular projection around an origin, in metres. Accurate enough
/// at city scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalProjection {
    pub origin: GeoPoint,
    metres_per_lon_degree: f64,
}

impl LocalProjection {
    pub fn new(origin: GeoPoint) -> Self {
        Self {
            origin,
            metres_per_lon_degree: METRES_PER_DEGREE * origin.lat.to_radians().cos(),
        }
    }

    /// `[east, north]` offset of `point` from the origin.
    pub fn project(&self, point: GeoPoint) -> [f64; 2] {
        [
            (point.lon - self.origin.lon) * self.metres_per_lon_degree,
            (point.lat - self.origin.lat) * METRES_PER_DEGREE,
        ]
    }

    pub fn unproject(&self, xy: [f64; 2]) -> GeoPoint {
        GeoPoint {
            lat: self.origin.lat + xy[1] / METRES_PER_DEGREE,
            lon: self.origin.lon + xy[0] / self.metres_per_lon_degree,
        }
    }
}

// ---------------------------------------------------------------------------
// Synthetic customer locations
// ---------------------------------------------------------------------------

/// A normally distributed point cloud around the configured centre.
/// Seeded, so the same config always yields the same points.
pub fn synthetic_points(config: &MapConfig) -> Vec<GeoPoint> {
    let mut rng = StdRng::seed_from_u64(config.seed);
    (0..config.points)
        .map(|_| GeoPoint {
            lat: config.center_lat + gauss(&mut rng) * config.spread_deg,
            lon: config.center_lon + gauss(&mut rng) * config.spread_deg,
        })
        .collect()
}

/// Standard normal sample (Box-Muller).
fn gauss(rng: &mut impl Rng) -> f64 {
    let u1: f64 = rng.gen::<f64>().max(1e-15);
    let u2: f64 = rng.gen();
    (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
}

// ---------------------------------------------------------------------------
// Hexagonal binning
// ---------------------------------------------------------------------------

/// One occupied cell of a pointy-top hexagonal grid, in projected metres.
#[derive(Debug, Clone, PartialEq)]
pub struct HexBin {
    /// Axial grid coordinates `(q, r)`.
    pub cell: (i64, i64),
    pub center: [f64; 2],
    pub corners: [[f64; 2]; 6],
    pub count: usize,
}

/// Count projected points per hexagon of circumradius `radius`.
///
/// Bins are returned in axial-coordinate order; empty cells are omitted.
pub fn hexbin(points: &[[f64; 2]], radius: f64) -> Vec<HexBin> {
    let mut counts: BTreeMap<(i64, i64), usize> = BTreeMap::new();
    for &[x, y] in points {
        let q = (3f64.sqrt() / 3.0 * x - y / 3.0) / radius;
        let r = (2.0 / 3.0 * y) / radius;
        *counts.entry(axial_round(q, r)).or_insert(0) += 1;
    }

    counts
        .into_iter()
        .map(|(cell, count)| {
            let center = hex_center(cell, radius);
            HexBin {
                cell,
                center,
                corners: hex_corners(center, radius),
                count,
            }
        })
        .collect()
}

fn axial_round(q: f64, r: f64) -> (i64, i64) {
    let s = -q - r;
    let (mut rq, mut rr, rs) = (q.round(), r.round(), s.round());
    let (dq, dr, ds) = ((rq - q).abs(), (rr - r).abs(), (rs - s).abs());
    if dq > dr && dq > ds {
        rq = -rr - rs;
    } else if dr > ds {
        rr = -rq - rs;
    }
    (rq as i64, rr as i64)
}

fn hex_center((q, r): (i64, i64), radius: f64) -> [f64; 2] {
    let (q, r) = (q as f64, r as f64);
    [
        radius * 3f64.sqrt() * (q + r / 2.0),
        radius * 1.5 * r,
    ]
}

fn hex_corners(center: [f64; 2], radius: f64) -> [[f64; 2]; 6] {
    std::array::from_fn(|i| {
        let angle = (60.0 * i as f64 - 30.0).to_radians();
        [
            center[0] + radius * angle.cos(),
            center[1] + radius * angle.sin(),
        ]
    })
}

// ---------------------------------------------------------------------------
// Map layers
// ---------------------------------------------------------------------------

/// Everything the location panel draws: scatter points and density bins,
/// both in projected metres.
#[derive(Debug, Clone)]
pub struct MapLayers {
    pub projection: LocalProjection,
    pub points: Vec<[f64; 2]>,
    pub bins: Vec<HexBin>,
    pub max_count: usize,
}

impl MapLayers {
    pub fn build(config: &MapConfig) -> Self {
        let projection = LocalProjection::new(GeoPoint {
            lat: config.center_lat,
            lon: config.center_lon,
        });
        let points: Vec<[f64; 2]> = synthetic_points(config)
            .into_iter()
            .map(|p| projection.project(p))
            .collect();
        let bins = hexbin(&points, config.hex_radius_m);
        let max_count = bins.iter().map(|b| b.count).max().unwrap_or(0);
        log::debug!("map: {} points in {} hexagons", points.len(), bins.len());
        MapLayers {
            projection,
            points,
            bins,
            max_count,
        }
    }
}
