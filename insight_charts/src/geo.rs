// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Named map regions and a Mercator projection fitted to a rectangle.

use alloc::string::String;
use alloc::vec::Vec;
use core::f64::consts::FRAC_PI_4;

use kurbo::{BezPath, Point, Rect};

#[cfg(not(feature = "std"))]
use crate::float::FloatExt;

/// Mercator diverges at the poles; latitudes are clamped to this bound.
pub const MAX_LATITUDE: f64 = 85.0;

/// A ring of `[longitude, latitude]` pairs in degrees.
pub type Ring = Vec<[f64; 2]>;

/// A named region made of one or more polygons, each an outer ring followed by holes.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GeoRegion {
    /// Name used to join the region with data.
    pub name: String,
    /// Polygons; each is a list of rings.
    pub polygons: Vec<Vec<Ring>>,
}

impl GeoRegion {
    /// Creates a region.
    pub fn new(name: impl Into<String>, polygons: Vec<Vec<Ring>>) -> Self {
        Self {
            name: name.into(),
            polygons,
        }
    }

    fn coords(&self) -> impl Iterator<Item = [f64; 2]> + '_ {
        self.polygons.iter().flatten().flatten().copied()
    }
}

fn mercator(lon: f64, lat: f64) -> (f64, f64) {
    let lat = lat.clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians();
    (lon.to_radians(), -(FRAC_PI_4 + lat * 0.5).tan().ln())
}

/// Spherical Mercator with a uniform scale and offset.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Mercator {
    scale: f64,
    offset: (f64, f64),
}

impl Mercator {
    /// Fits the projected bounds of `regions` into `target`, centered, preserving aspect.
    ///
    /// With nothing to fit the projection maps the origin to the center of `target`.
    pub fn fit(regions: &[GeoRegion], target: Rect) -> Self {
        let mut bounds: Option<Rect> = None;
        for [lon, lat] in regions.iter().flat_map(GeoRegion::coords) {
            if !(lon.is_finite() && lat.is_finite()) {
                continue;
            }
            let (x, y) = mercator(lon, lat);
            let p = Point::new(x, y);
            bounds = Some(bounds.map_or(Rect::from_points(p, p), |b| b.union_pt(p)));
        }
        let center = target.center();
        let Some(b) = bounds else {
            return Self {
                scale: 1.0,
                offset: (center.x, center.y),
            };
        };
        let sx = if b.width() > 0.0 { target.width() / b.width() } else { f64::INFINITY };
        let sy = if b.height() > 0.0 { target.height() / b.height() } else { f64::INFINITY };
        let scale = match sx.min(sy) {
            s if s.is_finite() => s,
            _ => 1.0,
        };
        let mid = b.center();
        Self {
            scale,
            offset: (center.x - mid.x * scale, center.y - mid.y * scale),
        }
    }

    /// Projects `[longitude, latitude]` degrees into scene coordinates.
    pub fn project(&self, lon: f64, lat: f64) -> Point {
        let (x, y) = mercator(lon, lat);
        Point::new(x * self.scale + self.offset.0, y * self.scale + self.offset.1)
    }

    /// Projects every ring of `region`.
    pub fn project_rings(&self, region: &GeoRegion) -> Vec<Vec<Point>> {
        region
            .polygons
            .iter()
            .flatten()
            .map(|ring| ring.iter().map(|&[lon, lat]| self.project(lon, lat)).collect())
            .collect()
    }
}

/// Outline path of projected rings; each ring is closed.
pub fn rings_path(rings: &[Vec<Point>]) -> BezPath {
    let mut path = BezPath::new();
    for ring in rings {
        let mut points = ring.iter();
        let Some(&first) = points.next() else {
            continue;
        };
        path.move_to(first);
        for &p in points {
            path.line_to(p);
        }
        path.close_path();
    }
    path
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    fn square(lon: f64, lat: f64, size: f64) -> GeoRegion {
        GeoRegion::new(
            "square",
            alloc::vec![alloc::vec![alloc::vec![
                [lon, lat],
                [lon + size, lat],
                [lon + size, lat + size],
                [lon, lat + size],
            ]]],
        )
    }

    #[test]
    fn fit_fills_the_target_without_distortion() {
        let target = Rect::new(0.0, 0.0, 400.0, 200.0);
        let region = square(-10.0, -10.0, 20.0);
        let proj = Mercator::fit(core::slice::from_ref(&region), target);
        let rings = proj.project_rings(&region);
        let bbox = rings[0]
            .iter()
            .fold(Rect::from_points(rings[0][0], rings[0][0]), |b, p| b.union_pt(*p));
        assert!((bbox.height() - 200.0).abs() < 1e-6, "height limits the fit");
        assert!(bbox.width() < 400.0);
        assert!((bbox.center().x - 200.0).abs() < 1e-6, "centered");
    }

    #[test]
    fn north_is_up_and_poles_are_clamped() {
        let proj = Mercator::fit(&[square(0.0, 0.0, 10.0)], Rect::new(0.0, 0.0, 100.0, 100.0));
        assert!(proj.project(5.0, 10.0).y < proj.project(5.0, 0.0).y);
        let pole = proj.project(0.0, 90.0);
        assert!(pole.y.is_finite());
        assert_eq!(pole, proj.project(0.0, MAX_LATITUDE));
    }

    #[test]
    fn empty_rings_are_skipped() {
        let path = rings_path(&[alloc::vec![], alloc::vec![Point::ZERO, Point::new(1.0, 0.0), Point::new(0.0, 1.0)]]);
        assert_eq!(path.elements().len(), 4);
    }
}
