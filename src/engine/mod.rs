//! Consumption model: composes diurnal, climate, weekly and holiday factors
//! with bounded noise into a single reading.
//!
//! ```text
//! y = max(0, base + (peak - base) * diurnal * climate * weekly * holiday + noise)
//! ```
//!
//! Every random draw is seeded from the building's noise seed and the
//! timestamp, so a reading never depends on which other readings were
//! computed before it.

pub mod calendar;
pub mod climate;
pub mod diurnal;

use chrono::{Datelike, NaiveDateTime, Timelike};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};
use serde::Serialize;

use crate::domain::{Building, HolidayWindow};
use crate::utils::{derive_seed, mix64, round_to, unit_f64};

/// Noise standard deviation as a fraction of the class variance
const NOISE_SCALE: f64 = 0.15;
/// Probability of a supply outage at any reading
const OUTAGE_PROBABILITY: f64 = 0.003;
/// Probability of a storm-driven demand spike at any reading
const STORM_PROBABILITY: f64 = 0.015;
const STORM_MULTIPLIER: (f64, f64) = (1.4, 2.2);

const DAY_SALT: u64 = 0x5EA5_0DA7;

/// Produces one consumption reading for a building at a timestamp.
///
/// Implementations must be pure in their inputs: the series expander calls
/// them from many threads in no particular order.
pub trait LoadModel: Send + Sync {
    fn value_at(&self, building: &Building, timestamp: NaiveDateTime) -> f64;
}

/// Rare disruption applied on top of the regular pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SpecialEvent {
    Outage,
    Storm,
}

/// Every factor behind one reading
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoadFactors {
    pub diurnal: f64,
    pub climate: f64,
    pub weekly: f64,
    pub holiday: f64,
    pub noise: f64,
    pub event: Option<SpecialEvent>,
    pub event_multiplier: f64,
    pub value: f64,
}

#[derive(Debug, Clone, Default)]
pub struct PatternEngine {
    holidays: Vec<HolidayWindow>,
    special_events: bool,
}

impl PatternEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_holidays(mut self, holidays: impl IntoIterator<Item = HolidayWindow>) -> Self {
        self.holidays.extend(holidays);
        self
    }

    /// Enable random outages and storm spikes
    pub fn with_special_events(mut self, enabled: bool) -> Self {
        self.special_events = enabled;
        self
    }

    pub fn holidays(&self) -> &[HolidayWindow] {
        &self.holidays
    }

    pub fn special_events(&self) -> bool {
        self.special_events
    }

    /// Position of the building's day inside the season band, in [0, 1)
    fn day_draw(building: &Building, timestamp: NaiveDateTime) -> f64 {
        let day = timestamp.date().num_days_from_ce() as u64;
        unit_f64(mix64(building.noise_seed ^ mix64(day ^ DAY_SALT)))
    }

    pub fn breakdown(&self, building: &Building, timestamp: NaiveDateTime) -> LoadFactors {
        let profile = &building.profile;
        let hour = timestamp.hour() as f64
            + timestamp.minute() as f64 / 60.0
            + timestamp.second() as f64 / 3600.0;

        let diurnal = diurnal::diurnal_factor(building.class, profile, hour);
        let climate = climate::climate_factor(
            timestamp.month(),
            hour,
            Self::day_draw(building, timestamp),
            profile.cooling_sensitivity,
        );
        let weekly = calendar::weekly_factor(building.class, profile.hours, timestamp);
        let holiday = calendar::holiday_factor(building.class, timestamp, &self.holidays);

        let mut rng = StdRng::seed_from_u64(derive_seed(
            building.noise_seed,
            timestamp.and_utc().timestamp() as u64,
        ));
        let noise = match Normal::new(0.0, NOISE_SCALE * profile.variance) {
            Ok(normal) => normal
                .sample(&mut rng)
                .clamp(-profile.variance, profile.variance),
            Err(_) => 0.0,
        };

        let (event, event_multiplier) = if self.special_events {
            let roll: f64 = rng.gen();
            if roll < OUTAGE_PROBABILITY {
                (Some(SpecialEvent::Outage), 0.0)
            } else if roll < OUTAGE_PROBABILITY + STORM_PROBABILITY {
                let spike = rng.gen_range(STORM_MULTIPLIER.0..=STORM_MULTIPLIER.1);
                (Some(SpecialEvent::Storm), spike)
            } else {
                (None, 1.0)
            }
        } else {
            (None, 1.0)
        };

        let raw = profile.base + profile.span() * diurnal * climate * weekly * holiday + noise;
        let value = round_to((raw * event_multiplier).max(0.0), 3);

        LoadFactors {
            diurnal,
            climate,
            weekly,
            holiday,
            noise,
            event,
            event_multiplier,
            value,
        }
    }
}

impl LoadModel for PatternEngine {
    fn value_at(&self, building: &Building, timestamp: NaiveDateTime) -> f64 {
        self.breakdown(building, timestamp).value
    }
}
