//! Construction-time configuration for [`ProgressBar`](crate::ProgressBar).
//!
//! Options are applied once when the bar is built and are immutable
//! afterward. Validation that can fail (time-zone resolution) happens in
//! [`ProgressBar::with_options`](crate::ProgressBar::with_options), so a
//! misconfigured bar is never created.

use std::time::Duration;

use owo_colors::AnsiColors;

/// Glyph palettes for the horizontal bar.
#[derive(Clone, Copy, Debug)]
pub enum BarStyle {
    /// Full block (`█`) cells with light empty fill (`░`).
    FullBlock,
    /// Dark shade (`▓`) cells with light empty fill (`░`).
    DarkShade,
    /// Medium shade (`▒`) cells on light background.
    MediumShade,
    /// Dense braille wall, good for compact displays.
    Braille,
}

impl BarStyle {
    /// Glyph used for filled segments of the bar.
    pub fn filled_cell(self) -> &'static str {
        match self {
            BarStyle::FullBlock => "█",
            BarStyle::DarkShade => "▓",
            BarStyle::MediumShade => "▒",
            BarStyle::Braille => "⣿",
        }
    }

    /// Glyph used for empty segments of the bar.
    pub fn empty_cell(self) -> &'static str {
        match self {
            BarStyle::FullBlock | BarStyle::DarkShade | BarStyle::MediumShade => "░",
            BarStyle::Braille => " ",
        }
    }
}

/// Configuration toggles recognized at construction time.
///
/// Options are cheap to clone and can be reused across bars.
#[derive(Clone, Debug)]
pub struct BarOptions {
    /// Decimal places shown for the percentage.
    pub precision: usize,
    /// IANA zone name used for the start and end timestamps.
    pub time_zone: String,
    /// Minimum delay between emitted frames. A zero interval disarms the
    /// throttle gate entirely: only the final 100% frame is rendered.
    pub update_interval: Duration,
    /// Color of the bar body.
    pub color: AnsiColors,
    /// Glyph palette for filled and empty cells.
    pub style: BarStyle,
}

impl BarOptions {
    pub fn with_precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }

    pub fn with_time_zone(mut self, zone: impl Into<String>) -> Self {
        self.time_zone = zone.into();
        self
    }

    pub fn with_update_interval(mut self, interval: Duration) -> Self {
        self.update_interval = interval;
        self
    }

    pub fn with_color(mut self, color: AnsiColors) -> Self {
        self.color = color;
        self
    }

    pub fn with_style(mut self, style: BarStyle) -> Self {
        self.style = style;
        self
    }
}

impl Default for BarOptions {
    fn default() -> Self {
        Self {
            precision: 2,
            time_zone: "Asia/Shanghai".to_string(),
            update_interval: Duration::from_millis(1000),
            color: AnsiColors::BrightCyan,
            style: BarStyle::FullBlock,
        }
    }
}
