//! LiveChart - multi-series line charts kept live from pushed snapshots.
//!
//! The widget core ([`widget`], [`host`]) is independent of the event
//! source; the application wires it to a Zenoh subscription.

pub mod app;
pub mod config;
pub mod data;
pub mod host;
pub mod message;
pub mod mock;
pub mod scale;
pub mod subscription;
pub mod view;
pub mod widget;

// Re-export commonly used types
pub use app::{LiveChartApp, Settings};
pub use config::{ChartConfig, ViewerConfig};
pub use host::{ChartHost, HostError};
pub use message::{ChartEvent, Message};
pub use widget::{ChartError, ChartHook, LiveChart, Surface, UpdateOutcome};
