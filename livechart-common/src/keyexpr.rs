use crate::error::{Error, Result};
use crate::update::POINTS_EVENT;

/// Default key expression prefix for all LiveChart events.
pub const KEY_PREFIX: &str = "livechart";

/// Builder for LiveChart key expressions.
///
/// Key expressions follow the pattern:
/// `<prefix>/<chart_id>/<event>`
#[derive(Debug, Clone)]
pub struct KeyExprBuilder {
    prefix: String,
}

impl Default for KeyExprBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyExprBuilder {
    /// Create a builder using [`KEY_PREFIX`].
    pub fn new() -> Self {
        Self {
            prefix: KEY_PREFIX.to_string(),
        }
    }

    /// Create a builder with a custom prefix.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// The prefix used by this builder.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Build the key for a named event on one chart.
    ///
    /// # Example
    /// ```
    /// use livechart_common::keyexpr::KeyExprBuilder;
    ///
    /// let key = KeyExprBuilder::new().event_key("status", "points");
    /// assert_eq!(key, "livechart/status/points");
    /// ```
    pub fn event_key(&self, chart: &str, event: &str) -> String {
        format!("{}/{}/{}", self.prefix, chart, event)
    }

    /// Build the `points` key for a chart.
    ///
    /// # Example
    /// ```
    /// use livechart_common::keyexpr::KeyExprBuilder;
    ///
    /// let key = KeyExprBuilder::new().points_key("status");
    /// assert_eq!(key, "livechart/status/points");
    /// ```
    pub fn points_key(&self, chart: &str) -> String {
        self.event_key(chart, POINTS_EVENT)
    }

    /// Wildcard matching the `points` events of every chart.
    ///
    /// # Example
    /// ```
    /// use livechart_common::keyexpr::KeyExprBuilder;
    ///
    /// assert_eq!(KeyExprBuilder::new().points_wildcard(), "livechart/*/points");
    /// ```
    pub fn points_wildcard(&self) -> String {
        format!("{}/*/{}", self.prefix, POINTS_EVENT)
    }

    /// Wildcard matching every event of one chart.
    pub fn chart_wildcard(&self, chart: &str) -> String {
        format!("{}/{}/**", self.prefix, chart)
    }

    /// Split a key built by this builder into chart id and event name.
    ///
    /// Returns `None` when the prefix differs or the key has the wrong shape.
    pub fn parse<'a>(&self, key: &'a str) -> Option<ParsedKeyExpr<'a>> {
        let rest = key.strip_prefix(self.prefix.as_str())?.strip_prefix('/')?;
        let (chart, event) = rest.split_once('/')?;

        if chart.is_empty() || event.is_empty() || event.contains('/') {
            return None;
        }

        Some(ParsedKeyExpr { chart, event })
    }
}

/// Wildcard matching the `points` events of every chart under [`KEY_PREFIX`].
///
/// # Example
/// ```
/// use livechart_common::keyexpr::all_points_wildcard;
///
/// assert_eq!(all_points_wildcard(), "livechart/*/points");
/// ```
pub fn all_points_wildcard() -> String {
    KeyExprBuilder::new().points_wildcard()
}

/// Parse a key under [`KEY_PREFIX`] into chart id and event name.
pub fn parse_key_expr(key: &str) -> Option<ParsedKeyExpr<'_>> {
    let parts: Vec<&str> = key.split('/').collect();

    if parts.len() != 3 || parts[0] != KEY_PREFIX || parts[1].is_empty() || parts[2].is_empty() {
        return None;
    }

    Some(ParsedKeyExpr {
        chart: parts[1],
        event: parts[2],
    })
}

/// Parsed components of a LiveChart key expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedKeyExpr<'a> {
    pub chart: &'a str,
    pub event: &'a str,
}

/// Check that a chart id can be used as a single key expression chunk.
pub fn validate_chart_id(id: &str) -> Result<()> {
    if id.is_empty() {
        return Err(Error::KeyExpr("chart id must not be empty".to_string()));
    }

    if let Some(c) = id.chars().find(|c| matches!(c, '/' | '*' | '$' | '?' | '#' | ' ')) {
        return Err(Error::KeyExpr(format!(
            "chart id '{}' contains reserved character '{}'",
            id, c
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_builder() {
        let builder = KeyExprBuilder::new();

        assert_eq!(builder.points_key("status"), "livechart/status/points");
        assert_eq!(builder.event_key("status", "reset"), "livechart/status/reset");
        assert_eq!(builder.chart_wildcard("status"), "livechart/status/**");
        assert_eq!(builder.points_wildcard(), "livechart/*/points");
    }

    #[test]
    fn test_custom_prefix_parse() {
        let builder = KeyExprBuilder::with_prefix("site/a");
        let key = builder.points_key("cpu");
        assert_eq!(key, "site/a/cpu/points");

        let parsed = builder.parse(&key).unwrap();
        assert_eq!(parsed.chart, "cpu");
        assert_eq!(parsed.event, "points");

        assert!(builder.parse("site/b/cpu/points").is_none());
        assert!(builder.parse("site/a/cpu").is_none());
        assert!(builder.parse("site/a/cpu/points/extra").is_none());
    }

    #[test]
    fn test_parse_key_expr() {
        let parsed = parse_key_expr("livechart/status/points").unwrap();
        assert_eq!(parsed.chart, "status");
        assert_eq!(parsed.event, "points");
    }

    #[test]
    fn test_parse_invalid_key() {
        assert!(parse_key_expr("invalid/key").is_none());
        assert!(parse_key_expr("other/status/points").is_none());
        assert!(parse_key_expr("livechart//points").is_none());
        assert!(parse_key_expr("livechart/status/points/more").is_none());
    }

    #[test]
    fn test_validate_chart_id() {
        assert!(validate_chart_id("status").is_ok());
        assert!(validate_chart_id("server-01.cpu").is_ok());
        assert!(validate_chart_id("").is_err());
        assert!(validate_chart_id("a/b").is_err());
        assert!(validate_chart_id("all*").is_err());
    }
}
