//! Overpass API client for raw map data
//!
//! Fetches the nodes and ways inside a bounding box, restricted to the
//! supported road classes. One request, one caller-supplied timeout, no
//! retries: a fetch failure is fatal for the whole extraction run.

use std::collections::HashMap;
use std::time::Duration;

use log::{debug, info};
use once_cell::sync::Lazy;
use reqwest::{Client, ClientBuilder};
use serde::Deserialize;

use crate::core::error::{Error, Result};
use crate::core::geo::{BoundingBox, GeoPoint};
use crate::core::tags;

/// Shared HTTP client. The per-request timeout comes from `OverpassConfig`,
/// so only connection-level settings live here.
static GLOBAL_CLIENT: Lazy<Client> = Lazy::new(|| {
    ClientBuilder::new()
        .tcp_keepalive(Duration::from_secs(60))
        .connect_timeout(Duration::from_secs(10))
        .user_agent(concat!("roadnet/", env!("CARGO_PKG_VERSION")))
        .build()
        .expect("Failed to create HTTP client")
});

/// Configuration for the Overpass data source
#[derive(Debug, Clone)]
pub struct OverpassConfig {
    /// Overpass interpreter endpoint
    pub endpoint: String,

    /// Request timeout in seconds, also passed to the server-side query
    pub timeout_secs: u64,
}

impl Default for OverpassConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://overpass-api.de/api/interpreter".to_string(),
            timeout_secs: 60,
        }
    }
}

/// A way as fetched from the map source, tags still raw
#[derive(Debug, Clone)]
pub struct RawWay {
    pub id: i64,
    /// Ordered node references; may point at ids absent from the node set
    pub nodes: Vec<i64>,
    pub name: String,
    pub highway: String,
    pub maxspeed: Option<String>,
    pub lanes: Option<String>,
    pub oneway: bool,
}

/// Raw map data for one extraction run
#[derive(Debug, Default)]
pub struct MapData {
    pub nodes: HashMap<i64, GeoPoint>,
    pub ways: Vec<RawWay>,
}

#[derive(Debug, Deserialize)]
struct OverpassResponse {
    #[serde(default)]
    elements: Vec<Element>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum Element {
    Node {
        id: i64,
        lat: f64,
        lon: f64,
    },
    Way {
        id: i64,
        nodes: Vec<i64>,
        #[serde(default)]
        tags: HashMap<String, String>,
    },
    #[serde(other)]
    Other,
}

/// Build the Overpass QL query for a bounding box.
///
/// Overpass bbox clauses are (south, west, north, east), i.e. latitudes
/// first, unlike the minLon-first order used everywhere else in this crate.
fn build_query(bbox: &BoundingBox, timeout_secs: u64) -> String {
    let highway_filter = tags::ROAD_CLASSES.join("|");
    format!(
        "[out:json][timeout:{timeout}];\n\
         (\n\
           way[\"highway\"~\"^({filter})$\"]({min_lat},{min_lon},{max_lat},{max_lon});\n\
         );\n\
         out body;\n\
         >;\n\
         out skel qt;",
        timeout = timeout_secs,
        filter = highway_filter,
        min_lat = bbox.min_lat,
        min_lon = bbox.min_lon,
        max_lat = bbox.max_lat,
        max_lon = bbox.max_lon,
    )
}

/// Fetch raw nodes and ways for a bounding box.
///
/// Transport errors, timeouts and non-success responses all abort the run;
/// retrying or rate-limiting is the caller's business, not ours.
pub async fn fetch_map_data(bbox: &BoundingBox, config: &OverpassConfig) -> Result<MapData> {
    let query = build_query(bbox, config.timeout_secs);
    debug!("Overpass query:\n{query}");

    let response = GLOBAL_CLIENT
        .post(&config.endpoint)
        .timeout(Duration::from_secs(config.timeout_secs))
        .form(&[("data", query.as_str())])
        .send()
        .await?;

    if !response.status().is_success() {
        let status = response.status();
        return Err(Error::HttpError(format!(
            "Overpass request failed: {status}"
        )));
    }

    let body: OverpassResponse = response.json().await?;
    info!("Received {} elements from Overpass", body.elements.len());

    Ok(parse_elements(body))
}

/// Split the element stream into a node set and a way list
fn parse_elements(response: OverpassResponse) -> MapData {
    let mut data = MapData::default();

    for element in response.elements {
        match element {
            Element::Node { id, lat, lon } => {
                data.nodes.insert(id, GeoPoint::new(lat, lon));
            }
            Element::Way { id, nodes, tags } => {
                let highway = tags
                    .get("highway")
                    .cloned()
                    .unwrap_or_else(|| "unclassified".to_string());
                data.ways.push(RawWay {
                    id,
                    nodes,
                    name: tags.get("name").cloned().unwrap_or_default(),
                    highway,
                    maxspeed: tags.get("maxspeed").cloned(),
                    lanes: tags.get("lanes").cloned(),
                    oneway: tags::is_oneway(tags.get("oneway").map(String::as_str)),
                });
            }
            Element::Other => {}
        }
    }

    info!(
        "Parsed {} nodes and {} ways",
        data.nodes.len(),
        data.ways.len()
    );
    data
}
