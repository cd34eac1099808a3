//! Mailtrack - an email open/click tracking service
//!
//! This library provides the core functionality for the Mailtrack service:
//! issuing tracking pixels and tracked redirect links, ingesting beacon and
//! click events, and aggregating raw events into prefetch-corrected
//! open/click analytics.
//!
//! # Architecture
//! - `analytics`: genuine-open aggregation with the configurable grace window
//! - `services`: HTTP services (ingestion, issuance, reporting)
//! - `storage`: storage trait and SeaORM backend over the four event tables
//! - `config`: configuration management
//! - `system`: logging and system utilities
//! - `utils`: client IP extraction and the transparent pixel asset

pub mod analytics;
pub mod config;
pub mod errors;
pub mod services;
pub mod storage;
pub mod system;
pub mod utils;
