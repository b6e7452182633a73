//! Core library modules for roadnet
//!
//! This module contains the internal implementation details of the roadnet library.

pub mod connect;
pub mod decompose;
pub mod error;
pub mod geo;
pub mod network;
pub mod overpass;
pub mod tags;

// Re-export main types for internal use
pub use decompose::SegmentArena;
pub use network::Network;
pub use overpass::{MapData, OverpassConfig};
