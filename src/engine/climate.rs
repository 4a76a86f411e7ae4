//! Tropical seasonal cycle and the daily cooling curve.

use serde::Serialize;
use strum::Display;

use super::diurnal::window;

/// Climate factor bounds before attenuation
pub const CLIMATE_RANGE: (f64, f64) = (0.8, 1.7);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Season {
    /// November to February: northeast monsoon, cooler and wetter
    Monsoon,
    /// March and April
    Transition,
    /// May to August: hottest, driest months
    Dry,
    /// September and October
    Variable,
}

impl Season {
    pub fn of_month(month: u32) -> Self {
        match month {
            3 | 4 => Season::Transition,
            5..=8 => Season::Dry,
            9 | 10 => Season::Variable,
            _ => Season::Monsoon,
        }
    }

    /// Range of the daily seasonal multiplier
    pub fn band(self) -> (f64, f64) {
        match self {
            Season::Monsoon => (0.9, 1.1),
            Season::Transition => (1.2, 1.5),
            Season::Dry => (1.3, 1.7),
            Season::Variable => (1.0, 1.3),
        }
    }
}

/// Air-conditioning demand over the day, elevated 10:00-17:00
pub fn cooling_shape(hour: f64) -> f64 {
    0.9 + 0.25 * window(hour, 10.0, 17.0, 0.7)
}

/// Combined seasonal and cooling multiplier.
///
/// `day_draw` in [0, 1) picks the day's position inside the season band.
/// The product is clamped to [`CLIMATE_RANGE`] and then pulled toward 1.0 by
/// `sensitivity`, so process-dominated loads barely follow the weather.
pub fn climate_factor(month: u32, hour: f64, day_draw: f64, sensitivity: f64) -> f64 {
    let (low, high) = Season::of_month(month).band();
    let seasonal = low + (high - low) * day_draw.clamp(0.0, 1.0);
    let raw = (seasonal * cooling_shape(hour)).clamp(CLIMATE_RANGE.0, CLIMATE_RANGE.1);
    1.0 + (raw - 1.0) * sensitivity.clamp(0.0, 1.0)
}
