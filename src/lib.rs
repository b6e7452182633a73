//! # Roadnet
//!
//! Converts OpenStreetMap road geometry into a directed graph of road
//! segments with physical attributes (length, speed limit, lane count) and
//! probabilistic turn connections, ready to feed a traffic microsimulation.
//!
//! The pipeline is a single-pass batch transformation:
//!
//! 1. Fetch raw nodes and ways for a bounding box from the Overpass API
//! 2. Decompose each way into directed, filtered segment drafts
//! 3. Join segments meeting at shared map nodes into turn connections
//! 4. Assemble and serialize the network document
//!
//! ```no_run
//! use roadnet::{extract, BoundingBox, OverpassConfig};
//!
//! # async fn run() -> roadnet::Result<()> {
//! let bbox = BoundingBox::parse("26.12,44.41,26.16,44.43")?;
//! let network = extract(&bbox, "Bucharest Dristor", &OverpassConfig::default()).await?;
//! network.to_writer_pretty(std::io::stdout())?;
//! # Ok(())
//! # }
//! ```

use log::info;

pub mod core;

pub use crate::core::decompose::SegmentArena;
pub use crate::core::error::{Error, Result};
pub use crate::core::geo::{BoundingBox, GeoPoint};
pub use crate::core::network::{Connection, Network, RoadSegment};
pub use crate::core::overpass::{MapData, OverpassConfig, RawWay};

/// Build a network from already-fetched map data. Pure transformation, no I/O.
///
/// Decomposition appends to a single arena across all ways; segment ids are
/// minted as arena positions only after every way is processed, so the
/// connection builder sees stable numbering.
pub fn build_network(data: &MapData, bbox: &BoundingBox, name: &str) -> Result<Network> {
    let mut arena = SegmentArena::new();
    for way in &data.ways {
        arena.decompose_way(way, &data.nodes, bbox);
    }
    info!(
        "Decomposed {} ways into {} road segments",
        data.ways.len(),
        arena.len()
    );

    let connections = core::connect::build_connections(arena.drafts());
    let network = core::network::assemble(name, bbox, arena.into_drafts(), connections)?;
    info!(
        "Network '{}': {} roads, {} connections",
        network.name,
        network.roads.len(),
        network.connection_count()
    );
    Ok(network)
}

/// Fetch map data for a bounding box and build the network.
///
/// The fetch is the only suspending step; it is bounded by the configured
/// timeout and never retried. Any fetch failure aborts the run.
pub async fn extract(bbox: &BoundingBox, name: &str, config: &OverpassConfig) -> Result<Network> {
    let data = core::overpass::fetch_map_data(bbox, config).await?;
    build_network(&data, bbox, name)
}
