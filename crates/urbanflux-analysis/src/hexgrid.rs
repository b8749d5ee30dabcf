//! Hexagonal grid over the city for heatmap binning.
//!
//! Pointy-top hexagons in axial coordinates on an equirectangular projection
//! centred on the city. At resolution 8 a cell has a 250 m circumradius
//! (about 433 m across flats); each coarser resolution is √7 larger.

use std::fmt;
use std::str::FromStr;

use urbanflux_core::config::defaults::{MAX_HEX_RESOLUTION, MIN_HEX_RESOLUTION};
use urbanflux_core::errors::AggregationError;

const REFERENCE_LAT: f64 = 40.7;
const REFERENCE_LNG: f64 = -74.0;
const METERS_PER_DEGREE_LAT: f64 = 111_320.0;
const BASE_RESOLUTION: u8 = 8;
const BASE_CIRCUMRADIUS_M: f64 = 250.0;

/// Axial cell coordinates at a given resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HexCell {
    pub resolution: u8,
    pub q: i64,
    pub r: i64,
}

impl fmt::Display for HexCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.resolution, self.q, self.r)
    }
}

impl FromStr for HexCell {
    type Err = String;

    /// Parse `"{res}-{q}-{r}"`; `q` and `r` may be negative (`8-120--45`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || format!("malformed cell index {s:?}");
        let (resolution, rest) = s.split_once('-').ok_or_else(bad)?;
        let resolution: u8 = resolution.parse().map_err(|_| bad())?;
        // The separator is the first '-' after the q value's optional sign.
        let split = rest
            .char_indices()
            .skip(1)
            .find(|(_, c)| *c == '-')
            .map(|(i, _)| i)
            .ok_or_else(bad)?;
        let q = rest[..split].parse().map_err(|_| bad())?;
        let r = rest[split + 1..].parse().map_err(|_| bad())?;
        Ok(Self { resolution, q, r })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HexGrid {
    resolution: u8,
    circumradius_m: f64,
}

impl HexGrid {
    pub fn new(resolution: u8) -> Result<Self, AggregationError> {
        if !(MIN_HEX_RESOLUTION..=MAX_HEX_RESOLUTION).contains(&resolution) {
            return Err(AggregationError::UnsupportedResolution { resolution });
        }
        let steps = i32::from(BASE_RESOLUTION) - i32::from(resolution);
        Ok(Self {
            resolution,
            circumradius_m: BASE_CIRCUMRADIUS_M * 7f64.sqrt().powi(steps),
        })
    }

    pub fn resolution(&self) -> u8 {
        self.resolution
    }

    /// Centre-to-vertex distance in meters.
    pub fn circumradius_m(&self) -> f64 {
        self.circumradius_m
    }

    /// The cell containing a coordinate.
    pub fn cell_for(&self, lat: f64, lng: f64) -> HexCell {
        let (x, y) = project(lat, lng);
        let size = self.circumradius_m;
        let q = (3f64.sqrt() / 3.0 * x - y / 3.0) / size;
        let r = (2.0 / 3.0 * y) / size;
        let (q, r) = cube_round(q, r);
        HexCell {
            resolution: self.resolution,
            q,
            r,
        }
    }

    /// Centre of a cell as `(lat, lng)`.
    pub fn center(&self, cell: HexCell) -> (f64, f64) {
        let size = self.circumradius_m;
        let (q, r) = (cell.q as f64, cell.r as f64);
        let x = size * 3f64.sqrt() * (q + r / 2.0);
        let y = size * 1.5 * r;
        unproject(x, y)
    }

    /// Text index of the cell containing a coordinate.
    pub fn index_for(&self, lat: f64, lng: f64) -> String {
        self.cell_for(lat, lng).to_string()
    }
}

fn meters_per_degree_lng() -> f64 {
    METERS_PER_DEGREE_LAT * REFERENCE_LAT.to_radians().cos()
}

fn project(lat: f64, lng: f64) -> (f64, f64) {
    (
        (lng - REFERENCE_LNG) * meters_per_degree_lng(),
        (lat - REFERENCE_LAT) * METERS_PER_DEGREE_LAT,
    )
}

fn unproject(x: f64, y: f64) -> (f64, f64) {
    (
        REFERENCE_LAT + y / METERS_PER_DEGREE_LAT,
        REFERENCE_LNG + x / meters_per_degree_lng(),
    )
}

/// Round fractional axial coordinates to the containing hexagon.
fn cube_round(q: f64, r: f64) -> (i64, i64) {
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
