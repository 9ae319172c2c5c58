//! Hexagonal binning for the hotspot map.
//!
//! Cells live on an axial pointy-top grid over a simple equirectangular
//! projection (`x = lng * cos(lat)`, `y = lat`). Resolutions mirror the H3
//! ladder: level 0 has an edge of about 1107 km and every level divides the
//! edge by √7, so level 7 cells are roughly 1.2 km across.

use std::cell::Cell;
use std::collections::HashMap;

use log::warn;
use once_cell::unsync::OnceCell;
use thiserror::Error;

use crate::chart::Rgb;
use crate::records::HotspotFeature;
use crate::view::HexBin;

pub const MAX_RESOLUTION: u8 = 15;
const BASE_EDGE_KM: f64 = 1_107.712_591;
const KM_PER_DEGREE: f64 = 111.32;
const BOUNDS_PADDING: f64 = 0.1;

pub type CellId = (i64, i64);
pub type LatLng = (f64, f64);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HexError {
    #[error("hex resolution {0} is out of range (0..={MAX_RESOLUTION})")]
    InvalidResolution(u8),
}

pub trait HexIndexer {
    fn cell(&self, position: LatLng) -> CellId;
    fn boundary(&self, cell: CellId) -> Vec<LatLng>;
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HexGrid {
    resolution: u8,
    size: f64,
}

impl HexGrid {
    pub fn load(resolution: u8) -> Result<Self, HexError> {
        if resolution > MAX_RESOLUTION {
            return Err(HexError::InvalidResolution(resolution));
        }
        let edge_km = BASE_EDGE_KM / 7f64.sqrt().powi(i32::from(resolution));
        Ok(Self {
            resolution,
            size: edge_km / KM_PER_DEGREE,
        })
    }

    pub const fn resolution(&self) -> u8 {
        self.resolution
    }

    fn center(&self, (q, r): CellId) -> (f64, f64) {
        let (q, r) = (q as f64, r as f64);
        let x = self.size * 3f64.sqrt().mul_add(q, 3f64.sqrt() / 2.0 * r);
        let y = self.size * 1.5 * r;
        (x, y)
    }
}

fn project((lat, lng): LatLng) -> (f64, f64) {
    (lng * lat.to_radians().cos(), lat)
}

fn unproject((x, y): (f64, f64)) -> LatLng {
    let cos = y.to_radians().cos();
    let lng = if cos.abs() < f64::EPSILON { 0.0 } else { x / cos };
    (y, lng)
}

fn cube_round(q: f64, r: f64) -> CellId {
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

impl HexIndexer for HexGrid {
    fn cell(&self, position: LatLng) -> CellId {
        let (x, y) = project(position);
        let q = (3f64.sqrt() / 3.0).mul_add(x, -y / 3.0) / self.size;
        let r = (2.0 / 3.0 * y) / self.size;
        cube_round(q, r)
    }

    fn boundary(&self, cell: CellId) -> Vec<LatLng> {
        let (cx, cy) = self.center(cell);
        (0..6)
            .map(|corner| {
                let angle = (60.0 * f64::from(corner) - 30.0).to_radians();
                unproject((
                    self.size.mul_add(angle.cos(), cx),
                    self.size.mul_add(angle.sin(), cy),
                ))
            })
            .collect()
    }
}

/// Loads the grid on first use and remembers the outcome, failure included,
/// so a bad resolution is reported once per session.
#[derive(Debug)]
pub struct LazyHexIndexer {
    resolution: u8,
    grid: OnceCell<Result<HexGrid, HexError>>,
    attempts: Cell<u32>,
}

impl LazyHexIndexer {
    pub const fn new(resolution: u8) -> Self {
        Self {
            resolution,
            grid: OnceCell::new(),
            attempts: Cell::new(0),
        }
    }

    pub fn get(&self) -> Option<&HexGrid> {
        self.grid
            .get_or_init(|| {
                self.attempts.set(self.attempts.get() + 1);
                let loaded = HexGrid::load(self.resolution);
                if let Err(err) = &loaded {
                    warn!("hex grid unavailable, falling back to markers: {err}");
                }
                loaded
            })
            .as_ref()
            .ok()
    }

    pub fn is_loaded(&self) -> bool {
        self.grid.get().is_some()
    }

    pub fn load_attempts(&self) -> u32 {
        self.attempts.get()
    }
}

/// Yellow for the quietest cell, red for the busiest.
pub fn heat_color(value: f64, max: f64) -> Rgb {
    let t = if max > 0.0 { value / max } else { 0.0 };
    Rgb::YELLOW.lerp(Rgb::RED, t)
}

/// Sums feature weights per cell, in the order cells are first seen.
pub fn bin_features(features: &[HotspotFeature], indexer: &impl HexIndexer) -> Vec<HexBin> {
    let mut order: Vec<CellId> = Vec::new();
    let mut counts: HashMap<CellId, f64> = HashMap::new();
    for feature in features {
        let Some(position) = feature.position() else {
            continue;
        };
        let cell = indexer.cell(position);
        let count = counts.entry(cell).or_insert_with(|| {
            order.push(cell);
            0.0
        });
        *count += feature.weight();
    }

    let max = counts.values().copied().fold(0.0, f64::max);
    order
        .into_iter()
        .map(|cell| {
            let count = counts.get(&cell).copied().unwrap_or_default();
            HexBin {
                cell,
                boundary: indexer.boundary(cell),
                count,
                color: heat_color(count, max),
            }
        })
        .collect()
}

/// Bounding box of `points`, grown by 10% of its span on every side.
pub fn padded_bounds(points: impl IntoIterator<Item = LatLng>) -> Option<(LatLng, LatLng)> {
    let mut points = points.into_iter();
    let first = points.next()?;
    let (mut south_west, mut north_east) = (first, first);
    for (lat, lng) in points {
        south_west = (south_west.0.min(lat), south_west.1.min(lng));
        north_east = (north_east.0.max(lat), north_east.1.max(lng));
    }
    let pad_lat = (north_east.0 - south_west.0) * BOUNDS_PADDING;
    let pad_lng = (north_east.1 - south_west.1) * BOUNDS_PADDING;
    Some((
        (south_west.0 - pad_lat, south_west.1 - pad_lng),
        (north_east.0 + pad_lat, north_east.1 + pad_lng),
    ))
}
