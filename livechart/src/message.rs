use livechart_common::ParsedKeyExpr;

/// Messages for the LiveChart application.
#[derive(Debug, Clone)]
pub enum Message {
    /// A chart event received from the subscription.
    EventReceived(ChartEvent),

    /// Zenoh connection established.
    Connected,

    /// Zenoh connection lost or failed.
    Disconnected(String),

    /// User closed a chart.
    CloseChart(String),
}

/// A raw event addressed to one chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartEvent {
    /// Target chart id.
    pub chart: String,
    /// Event name, e.g. `points`.
    pub event: String,
    /// Undecoded payload.
    pub payload: Vec<u8>,
}

impl ChartEvent {
    pub fn new(chart: impl Into<String>, event: impl Into<String>, payload: Vec<u8>) -> Self {
        Self {
            chart: chart.into(),
            event: event.into(),
            payload,
        }
    }

    /// Build an event from a parsed key expression and its payload.
    pub fn from_key(key: ParsedKeyExpr<'_>, payload: Vec<u8>) -> Self {
        Self::new(key.chart, key.event, payload)
    }
}

impl std::fmt::Display for ChartEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{} ({} bytes)", self.chart, self.event, self.payload.len())
    }
}
