#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Network operations for xscan
//!
//! This crate handles all HTTP traffic with the scan service: the
//! authentication handshake, version discovery and graph scans, on top of a
//! pooled client with retry logic.

mod client;
mod service;

pub use client::{NetClient, NetConfig};
pub use service::{
    authenticate, fetch_version, scan_graph, GRAPH_SCAN_PATH, PING_PATH, VERSION_PATH,
};
