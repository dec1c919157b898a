// src/metrics/mod.rs

//! Task health metrics.
//!
//! - [`registry`] defines the six gauges, the [`MetricsSink`] the core
//!   publishes into, and the shared [`GaugeRegistry`].
//! - [`server`] exposes the registry over HTTP for scraping.

pub mod registry;
pub mod server;

pub use registry::{Gauge, GaugeRegistry, MetricsSink};
pub use server::{bind, router, spawn_server};
