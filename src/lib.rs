//! # Solar Quote Engine
//!
//! Solar panel sizing and savings estimation behind a small HTTP API. The
//! pure [`estimator`] does the arithmetic; [`wizard`] drives the five-step
//! quote flow; [`geo`] and [`narrative`] wrap the mapping and AI
//! collaborators; [`report`] assembles the final quote document.

pub mod api;
pub mod config;
pub mod domain;
pub mod estimator;
pub mod geo;
pub mod narrative;
pub mod report;
pub mod telemetry;
pub mod wizard;
