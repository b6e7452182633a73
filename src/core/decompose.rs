//! Way decomposition into directed segment candidates
//!
//! Turns each way's ordered node sequence into directed segment drafts,
//! applying bounding-box filtering, minimum-length filtering and one-way
//! handling. Drafts accumulate in a single append-only arena shared across
//! all ways; positional ids are minted only after every way has been
//! decomposed, so the connection builder always sees stable numbering.

use std::collections::HashMap;

use crate::core::geo::{haversine_distance, BoundingBox, GeoPoint};
use crate::core::overpass::RawWay;
use crate::core::tags;

/// Segments shorter than this are discarded entirely, not merged
pub const MIN_SEGMENT_LENGTH_M: f64 = 5.0;

/// A directed segment candidate, not yet assigned its final id.
///
/// The endpoint OSM node ids are carried for the connection builder only;
/// they never appear in the output document. Adjacency is keyed on node
/// identity, not on coordinate equality.
#[derive(Debug, Clone)]
pub struct SegmentDraft {
    pub osm_way_id: i64,
    pub name: String,
    pub start: GeoPoint,
    pub end: GeoPoint,
    pub start_node: i64,
    pub end_node: i64,
    /// Meters, rounded to 1 decimal
    pub length: f64,
    /// Meters per second, rounded to 1 decimal
    pub max_speed: f64,
    pub lanes: u32,
}

/// Append-only arena of segment drafts.
///
/// Final segment ids are positions in this arena, so appends must stay
/// globally ordered; never renumber or reorder mid-construction.
#[derive(Debug, Default)]
pub struct SegmentArena {
    drafts: Vec<SegmentDraft>,
}

impl SegmentArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn drafts(&self) -> &[SegmentDraft] {
        &self.drafts
    }

    pub fn len(&self) -> usize {
        self.drafts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drafts.is_empty()
    }

    pub fn into_drafts(self) -> Vec<SegmentDraft> {
        self.drafts
    }

    /// Decompose one way into drafts, per consecutive node pair:
    /// skip pairs with missing node refs (incomplete map data), pairs with
    /// an endpoint outside the bounding box, and pairs shorter than
    /// [`MIN_SEGMENT_LENGTH_M`]. Bidirectional ways emit a reverse twin per
    /// pair, each direction carrying half the way's lane count.
    pub fn decompose_way(
        &mut self,
        way: &RawWay,
        nodes: &HashMap<i64, GeoPoint>,
        bbox: &BoundingBox,
    ) {
        let (speed_ms, way_lanes) =
            tags::classify(&way.highway, way.maxspeed.as_deref(), way.lanes.as_deref());
        let lanes = tags::directional_lanes(way_lanes, way.oneway);
        let max_speed = round1(speed_ms);

        for pair in way.nodes.windows(2) {
            let (start_id, end_id) = (pair[0], pair[1]);

            let start = match nodes.get(&start_id) {
                Some(p) => *p,
                None => continue,
            };
            let end = match nodes.get(&end_id) {
                Some(p) => *p,
                None => continue,
            };

            if !bbox.contains(start) || !bbox.contains(end) {
                continue;
            }

            let length = haversine_distance(start, end);
            if length < MIN_SEGMENT_LENGTH_M {
                continue;
            }
            let length = round1(length);

            self.drafts.push(SegmentDraft {
                osm_way_id: way.id,
                name: way.name.clone(),
                start,
                end,
                start_node: start_id,
                end_node: end_id,
                length,
                max_speed,
                lanes,
            });

            if !way.oneway {
                self.drafts.push(SegmentDraft {
                    osm_way_id: way.id,
                    name: way.name.clone(),
                    start: end,
                    end: start,
                    start_node: end_id,
                    end_node: start_id,
                    length,
                    max_speed,
                    lanes,
                });
            }
        }
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
