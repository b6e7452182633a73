//! OSM tag semantics for drivable roads
//!
//! Maps the `highway` class to default speed limits and lane counts, and
//! applies explicit `maxspeed`/`lanes`/`oneway` tag overrides. The priority
//! table is part of the output contract: downstream simulation fidelity
//! depends on these exact values, so changing them is a breaking change.

/// Road classes eligible for extraction, in priority order. The Overpass
/// query is restricted to this set.
pub const ROAD_CLASSES: [&str; 14] = [
    "motorway",
    "motorway_link",
    "trunk",
    "trunk_link",
    "primary",
    "primary_link",
    "secondary",
    "secondary_link",
    "tertiary",
    "tertiary_link",
    "residential",
    "living_street",
    "unclassified",
    "service",
];

/// Default (speed limit km/h, lane count) for a highway class.
///
/// Unrecognized classes fall back to 30 km/h and a single lane.
pub fn class_defaults(highway: &str) -> (u32, u32) {
    match highway {
        "motorway" => (120, 3),
        "motorway_link" => (80, 1),
        "trunk" => (100, 2),
        "trunk_link" => (60, 1),
        "primary" => (50, 2),
        "primary_link" => (40, 1),
        "secondary" => (50, 2),
        "secondary_link" => (40, 1),
        "tertiary" => (40, 1),
        "tertiary_link" => (30, 1),
        "residential" => (30, 1),
        "living_street" => (20, 1),
        "unclassified" => (30, 1),
        "service" => (20, 1),
        _ => (30, 1),
    }
}

/// Classify a way: table defaults plus explicit tag overrides.
///
/// Returns (speed limit in m/s, way-level lane count). Unparseable override
/// values fall back to the table silently; map data is messy and a bad tag
/// must not abort the run.
pub fn classify(highway: &str, maxspeed: Option<&str>, lanes: Option<&str>) -> (f64, u32) {
    let (mut speed_kmh, mut lane_count) = class_defaults(highway);

    if let Some(raw) = maxspeed {
        if let Some(value) = parse_maxspeed(raw) {
            speed_kmh = value;
        }
    }

    if let Some(raw) = lanes {
        if let Ok(value) = raw.trim().parse::<u32>() {
            lane_count = value;
        }
    }

    (f64::from(speed_kmh) / 3.6, lane_count)
}

/// Parse an explicit `maxspeed` value, stripping unit suffixes.
///
/// The numeric value is used as km/h regardless of suffix: "50 mph" yields
/// 50, not 80. This mirrors the established output contract; consumers
/// calibrated against it, so no unit conversion is performed here.
fn parse_maxspeed(raw: &str) -> Option<u32> {
    let cleaned = raw.replace(" km/h", "").replace(" mph", "");
    cleaned.trim().parse::<u32>().ok().filter(|v| *v > 0)
}

/// Whether a `oneway` tag value marks the way as one-way.
///
/// Exact literal match: "Yes", "-1" etc. are treated as bidirectional.
pub fn is_oneway(tag: Option<&str>) -> bool {
    matches!(tag, Some("yes") | Some("1") | Some("true"))
}

/// Lane count carried by each directed segment of a way.
///
/// One-way ways keep their full count; bidirectional ways split it evenly,
/// floored but never below one lane per direction.
pub fn directional_lanes(lanes: u32, oneway: bool) -> u32 {
    if oneway {
        lanes.max(1)
    } else {
        (lanes / 2).max(1)
    }
}
