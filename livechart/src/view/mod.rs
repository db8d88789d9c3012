//! View components for the LiveChart application.

pub mod chart;
pub mod dashboard;
pub mod formatting;
pub mod theme;
