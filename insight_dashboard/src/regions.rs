// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! World-region boundaries from GeoJSON.

use std::collections::HashMap;

use insight_charts::{GeoRegion, Ring};
use log::debug;
use serde::Deserialize;

type Position = Vec<f64>;

#[derive(Deserialize)]
struct FeatureCollection {
    features: Vec<Feature>,
}

#[derive(Deserialize)]
struct Feature {
    #[serde(default)]
    properties: Option<HashMap<String, serde_json::Value>>,
    #[serde(default)]
    geometry: Option<Geometry>,
}

/// Property keys that may hold the region name, by preference.
const NAME_KEYS: [&str; 3] = ["name", "NAME", "ADMIN"];

impl Feature {
    fn name(&self) -> Option<String> {
        let properties = self.properties.as_ref()?;
        NAME_KEYS
            .iter()
            .find_map(|key| properties.get(*key)?.as_str())
            .map(str::to_owned)
    }
}

#[derive(Deserialize)]
#[serde(tag = "type")]
enum Geometry {
    Polygon { coordinates: Vec<Vec<Position>> },
    MultiPolygon { coordinates: Vec<Vec<Vec<Position>>> },
    #[serde(other)]
    Unsupported,
}

fn ring(positions: Vec<Position>) -> Ring {
    positions
        .into_iter()
        .filter_map(|p| match p[..] {
            [lon, lat, ..] => Some([lon, lat]),
            _ => None,
        })
        .collect()
}

fn polygon(rings: Vec<Vec<Position>>) -> Vec<Ring> {
    rings.into_iter().map(ring).collect()
}

/// Parses a `FeatureCollection` of `Polygon` and `MultiPolygon` features named by
/// `properties.name`.
///
/// Features that share a name are merged into one region, in first-seen order. Features
/// without a name or with another geometry type are skipped.
pub fn parse_regions(json: &[u8]) -> Result<Vec<GeoRegion>, serde_json::Error> {
    let collection: FeatureCollection = serde_json::from_slice(json)?;
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut regions: Vec<GeoRegion> = Vec::new();
    for feature in collection.features {
        let Some(name) = feature.name() else {
            debug!("skipping unnamed feature");
            continue;
        };
        let polygons = match feature.geometry {
            Some(Geometry::Polygon { coordinates }) => vec![polygon(coordinates)],
            Some(Geometry::MultiPolygon { coordinates }) => {
                coordinates.into_iter().map(polygon).collect()
            }
            Some(Geometry::Unsupported) | None => {
                debug!("skipping feature {name:?} without polygons");
                continue;
            }
        };
        match index.get(&name) {
            Some(&i) => regions[i].polygons.extend(polygons),
            None => {
                index.insert(name.clone(), regions.len());
                regions.push(GeoRegion::new(name, polygons));
            }
        }
    }
    Ok(regions)
}
