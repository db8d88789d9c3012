//! Theme-aware color palette for chart views.
//!
//! Series colors come from configuration; everything around them adapts
//! to the light or dark theme.

use iced::{Color, Theme};

use crate::config::ColorSpec;

/// Get colors from the theme's extended palette.
pub struct ThemeColors<'a> {
    theme: &'a Theme,
}

impl<'a> ThemeColors<'a> {
    /// Create a new ThemeColors from a theme reference.
    pub fn new(theme: &'a Theme) -> Self {
        Self { theme }
    }

    fn palette(&self) -> &iced::theme::palette::Extended {
        self.theme.extended_palette()
    }

    // ========================================================================
    // Text Colors
    // ========================================================================

    /// Primary text color.
    pub fn text(&self) -> Color {
        self.palette().background.base.text
    }

    /// Muted/secondary text color.
    pub fn text_muted(&self) -> Color {
        self.palette().background.weak.text
    }

    /// Dimmed text (placeholders, empty states).
    pub fn text_dimmed(&self) -> Color {
        let text = self.text();
        let bg = self.palette().background.base.color;
        Color::from_rgb(
            text.r * 0.5 + bg.r * 0.5,
            text.g * 0.5 + bg.g * 0.5,
            text.b * 0.5 + bg.b * 0.5,
        )
    }

    // ========================================================================
    // Chart Colors
    // ========================================================================

    /// Plot area background.
    pub fn chart_background(&self) -> Color {
        if self.is_dark() {
            Color::from_rgb(0.08, 0.08, 0.1)
        } else {
            Color::from_rgb(0.98, 0.98, 0.99)
        }
    }

    /// Background around the plot area (axis gutters).
    pub fn chart_outer_background(&self) -> Color {
        if self.is_dark() {
            Color::from_rgb(0.1, 0.1, 0.12)
        } else {
            Color::from_rgb(0.95, 0.95, 0.96)
        }
    }

    /// Grid lines.
    pub fn chart_grid(&self) -> Color {
        if self.is_dark() {
            Color::from_rgb(0.2, 0.2, 0.25)
        } else {
            Color::from_rgb(0.85, 0.85, 0.88)
        }
    }

    /// Axis lines and tick labels.
    pub fn chart_label(&self) -> Color {
        if self.is_dark() {
            Color::from_rgb(0.5, 0.5, 0.5)
        } else {
            Color::from_rgb(0.4, 0.4, 0.4)
        }
    }

    /// Card background color.
    pub fn card_background(&self) -> Color {
        if self.is_dark() {
            Color::from_rgb(0.12, 0.12, 0.14)
        } else {
            Color::from_rgb(1.0, 1.0, 1.0)
        }
    }

    /// Default border color.
    pub fn border(&self) -> Color {
        if self.is_dark() {
            Color::from_rgb(0.25, 0.25, 0.3)
        } else {
            Color::from_rgb(0.8, 0.8, 0.82)
        }
    }

    // ========================================================================
    // Status Colors (consistent across themes for recognition)
    // ========================================================================

    /// Connected/online status.
    pub fn status_connected(&self) -> Color {
        Color::from_rgb(0.2, 0.8, 0.2)
    }

    /// Disconnected/offline status.
    pub fn status_disconnected(&self) -> Color {
        Color::from_rgb(0.8, 0.2, 0.2)
    }

    /// Warning status.
    pub fn status_warning(&self) -> Color {
        Color::from_rgb(0.9, 0.7, 0.2)
    }

    /// Check if the current theme is dark.
    pub fn is_dark(&self) -> bool {
        self.palette().is_dark
    }
}

/// Convenience function to create ThemeColors.
pub fn colors(theme: &Theme) -> ThemeColors<'_> {
    ThemeColors::new(theme)
}

/// Resolve a configured series color, falling back to gray.
pub fn series_color(spec: &ColorSpec) -> Color {
    match spec.rgb() {
        Some([r, g, b]) => Color::from_rgb8(r, g, b),
        None => Color::from_rgb(0.5, 0.5, 0.5),
    }
}
