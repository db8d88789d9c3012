//! Host metrics publisher for live charts.
//!
//! Samples CPU, RAM and outbound traffic with `sysinfo`, keeps a rolling
//! window of readings and puts the whole window on the chart's `points`
//! key after every reading.
//!
//! # Key Expressions
//!
//! ```text
//! livechart/<chart>/points
//! ```
//!
//! Series published: `CPU` (%), `RAM` (%), `TCP Out` (MB per interval).

pub mod args;
pub mod collector;
pub mod config;
pub mod publisher;

pub use collector::{HostSample, SystemCollector};
pub use config::{ConfigError, NetworkConfig, PublisherConfig};
pub use publisher::ChartPublisher;
