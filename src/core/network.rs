//! Network document model and assembly
//!
//! The serialized shape is a stable contract with the downstream simulator:
//! road ids are array positions, and `connections[].roadId` is resolved by
//! direct indexing into `roads`. Assembly therefore fails fast if numbering
//! ever diverges from position.

use std::io::{Read, Write};

use serde::{Deserialize, Serialize};

use crate::core::decompose::SegmentDraft;
use crate::core::error::{Error, Result};
use crate::core::geo::BoundingBox;

/// A probability-weighted turn onto another road segment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    #[serde(rename = "roadId")]
    pub road_id: usize,
    /// Originating lane; fixed to 0 in this design
    pub lane: u32,
    /// Turn probability in [0,1], 6 decimals
    pub probability: f64,
}

/// One directed edge of the road graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoadSegment {
    /// Equals the segment's position in `Network::roads`
    pub id: usize,
    #[serde(rename = "osmWayId")]
    pub osm_way_id: i64,
    pub name: String,
    #[serde(rename = "startLat")]
    pub start_lat: f64,
    #[serde(rename = "startLon")]
    pub start_lon: f64,
    #[serde(rename = "endLat")]
    pub end_lat: f64,
    #[serde(rename = "endLon")]
    pub end_lon: f64,
    /// Meters, 1 decimal
    pub length: f64,
    /// Meters per second, 1 decimal
    #[serde(rename = "maxSpeed")]
    pub max_speed: f64,
    pub lanes: u32,
    pub connections: Vec<Connection>,
}

/// The complete extracted road network
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Network {
    pub name: String,
    /// [minLon, minLat, maxLon, maxLat]
    pub bbox: [f64; 4],
    pub roads: Vec<RoadSegment>,
}

/// Compose the final network from drafts and their connection lists.
///
/// `connections` must be indexed like `drafts`; ids are minted here as list
/// positions and verified before the network is handed out.
pub fn assemble(
    name: &str,
    bbox: &BoundingBox,
    drafts: Vec<SegmentDraft>,
    connections: Vec<Vec<Connection>>,
) -> Result<Network> {
    debug_assert_eq!(drafts.len(), connections.len());

    let roads = drafts
        .into_iter()
        .zip(connections)
        .enumerate()
        .map(|(id, (draft, connections))| RoadSegment {
            id,
            osm_way_id: draft.osm_way_id,
            name: draft.name,
            start_lat: draft.start.lat,
            start_lon: draft.start.lon,
            end_lat: draft.end.lat,
            end_lon: draft.end.lon,
            length: draft.length,
            max_speed: draft.max_speed,
            lanes: draft.lanes,
            connections,
        })
        .collect();

    let network = Network {
        name: name.to_string(),
        bbox: bbox.to_array(),
        roads,
    };
    network.validate()?;
    Ok(network)
}

impl Network {
    /// Check the positional-id contract. A violation means a
    /// construction-order bug, and the network must not be emitted.
    pub fn validate(&self) -> Result<()> {
        for (position, road) in self.roads.iter().enumerate() {
            if road.id != position {
                return Err(Error::InconsistentNetwork(format!(
                    "road at position {position} carries id {}",
                    road.id
                )));
            }
        }
        Ok(())
    }

    /// Total number of turn connections across all roads
    pub fn connection_count(&self) -> usize {
        self.roads.iter().map(|r| r.connections.len()).sum()
    }

    /// Serialize as the pretty-printed network document
    pub fn to_writer_pretty<W: Write>(&self, writer: W) -> Result<()> {
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Read a network document back, re-checking the positional-id contract
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let network: Network = serde_json::from_reader(reader)?;
        network.validate()?;
        Ok(network)
    }
}
