use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum::{Display, EnumIter, EnumString};

use super::{CustomLocation, LocationFilter, LocationScope};
use crate::error::{GenerationError, GenerationResult};

/// Dataset tag written into every metadata row unless the caller overrides it
pub const DEFAULT_DATASET: &str = "malaysia_electricity_v1";

/// Sampling frequency of a generated series.
///
/// Displayed with pandas-style offset aliases; a few spelled-out aliases are
/// accepted when parsing.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(try_from = "String", into = "String")]
pub enum Frequency {
    #[strum(to_string = "5T", serialize = "5min")]
    FiveMinutes,
    #[strum(to_string = "15T", serialize = "15min")]
    FifteenMinutes,
    #[strum(to_string = "30T", serialize = "30min")]
    ThirtyMinutes,
    #[strum(to_string = "1H", serialize = "H", serialize = "1h", serialize = "60min")]
    Hourly,
    #[strum(to_string = "2H", serialize = "2h")]
    TwoHourly,
    #[strum(to_string = "6H", serialize = "6h")]
    SixHourly,
    #[strum(to_string = "12H", serialize = "12h")]
    TwelveHourly,
    #[strum(to_string = "D", serialize = "1D", serialize = "1d")]
    Daily,
    #[strum(to_string = "W", serialize = "1W", serialize = "1w")]
    Weekly,
    #[strum(to_string = "MS", serialize = "M", serialize = "1M")]
    Monthly,
}

/// Distance between consecutive ticks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Fixed(Duration),
    /// Calendar months, anchored on the start timestamp
    Months(u32),
}

impl Frequency {
    pub fn parse(value: &str) -> GenerationResult<Self> {
        Frequency::from_str(value.trim())
            .map_err(|_| GenerationError::invalid(format!("unsupported frequency '{}'", value)))
    }

    pub fn step(self) -> Step {
        match self {
            Frequency::FiveMinutes => Step::Fixed(Duration::minutes(5)),
            Frequency::FifteenMinutes => Step::Fixed(Duration::minutes(15)),
            Frequency::ThirtyMinutes => Step::Fixed(Duration::minutes(30)),
            Frequency::Hourly => Step::Fixed(Duration::hours(1)),
            Frequency::TwoHourly => Step::Fixed(Duration::hours(2)),
            Frequency::SixHourly => Step::Fixed(Duration::hours(6)),
            Frequency::TwelveHourly => Step::Fixed(Duration::hours(12)),
            Frequency::Daily => Step::Fixed(Duration::days(1)),
            Frequency::Weekly => Step::Fixed(Duration::weeks(1)),
            Frequency::Monthly => Step::Months(1),
        }
    }
}

impl TryFrom<String> for Frequency {
    type Error = GenerationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Frequency::parse(&value)
    }
}

impl From<Frequency> for String {
    fn from(freq: Frequency) -> Self {
        freq.to_string()
    }
}

fn default_daytime_factor() -> f64 {
    0.6
}

fn default_evening_factor() -> f64 {
    1.4
}

/// Dates of the fasting month for one year, both ends inclusive.
///
/// The observance moves about eleven days earlier every year, so windows are
/// supplied as data rather than derived from a calendar algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HolidayWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
    /// Multiplier for fasting hours (04:00-17:59)
    #[serde(default = "default_daytime_factor")]
    pub daytime_factor: f64,
    /// Multiplier for the evening meal and night activity (18:00-23:59)
    #[serde(default = "default_evening_factor")]
    pub evening_factor: f64,
}

impl HolidayWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> GenerationResult<Self> {
        let window = Self {
            start,
            end,
            daytime_factor: default_daytime_factor(),
            evening_factor: default_evening_factor(),
        };
        window.validate()?;
        Ok(window)
    }

    pub fn with_factors(mut self, daytime_factor: f64, evening_factor: f64) -> GenerationResult<Self> {
        self.daytime_factor = daytime_factor;
        self.evening_factor = evening_factor;
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> GenerationResult<()> {
        if self.end < self.start {
            return Err(GenerationError::invalid(format!(
                "holiday window ends ({}) before it starts ({})",
                self.end, self.start
            )));
        }
        for factor in [self.daytime_factor, self.evening_factor] {
            if !factor.is_finite() || factor < 0.0 {
                return Err(GenerationError::invalid(
                    "holiday factors must be finite and non-negative",
                ));
            }
        }
        Ok(())
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// A validated request for one dataset.
///
/// Fields are private so that every instance has passed the checks in the
/// constructors: at least one building, `start < end`, a well-formed location
/// scope and valid holiday windows.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    num_buildings: usize,
    start: NaiveDateTime,
    end: NaiveDateTime,
    frequency: Frequency,
    scope: LocationScope,
    holidays: Vec<HolidayWindow>,
    seed: Option<u64>,
    dataset: String,
}

impl GenerationRequest {
    /// Request covering `start_date 00:00` through `end_date 00:00`
    pub fn new(
        num_buildings: usize,
        start_date: NaiveDate,
        end_date: NaiveDate,
        frequency: Frequency,
    ) -> GenerationResult<Self> {
        Self::between(
            num_buildings,
            start_date.and_time(NaiveTime::MIN),
            end_date.and_time(NaiveTime::MIN),
            frequency,
        )
    }

    pub fn between(
        num_buildings: usize,
        start: NaiveDateTime,
        end: NaiveDateTime,
        frequency: Frequency,
    ) -> GenerationResult<Self> {
        if num_buildings < 1 {
            return Err(GenerationError::invalid("num_buildings must be at least 1"));
        }
        if end <= start {
            return Err(GenerationError::invalid(format!(
                "end ({}) must be after start ({})",
                end, start
            )));
        }
        Ok(Self {
            num_buildings,
            start,
            end,
            frequency,
            scope: LocationScope::All,
            holidays: Vec::new(),
            seed: None,
            dataset: DEFAULT_DATASET.to_string(),
        })
    }

    /// Restrict buildings to catalog locations matching `filter`
    pub fn with_filter(mut self, filter: LocationFilter) -> GenerationResult<Self> {
        if matches!(self.scope, LocationScope::Custom(_)) {
            return Err(GenerationError::invalid(
                "a location filter cannot be combined with a custom location",
            ));
        }
        filter.validate()?;
        self.scope = LocationScope::Filter(filter);
        Ok(self)
    }

    /// Place every building in a caller-defined location
    pub fn with_custom_location(mut self, location: CustomLocation) -> GenerationResult<Self> {
        if matches!(self.scope, LocationScope::Filter(_)) {
            return Err(GenerationError::invalid(
                "a custom location cannot be combined with a location filter",
            ));
        }
        location.to_location()?;
        self.scope = LocationScope::Custom(location);
        Ok(self)
    }

    pub fn with_holiday(mut self, window: HolidayWindow) -> GenerationResult<Self> {
        window.validate()?;
        self.holidays.push(window);
        Ok(self)
    }

    pub fn with_holidays(
        self,
        windows: impl IntoIterator<Item = HolidayWindow>,
    ) -> GenerationResult<Self> {
        windows
            .into_iter()
            .try_fold(self, |request, window| request.with_holiday(window))
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_dataset(mut self, dataset: impl Into<String>) -> Self {
        self.dataset = dataset.into();
        self
    }

    pub fn num_buildings(&self) -> usize {
        self.num_buildings
    }

    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    pub fn end(&self) -> NaiveDateTime {
        self.end
    }

    pub fn frequency(&self) -> Frequency {
        self.frequency
    }

    pub fn scope(&self) -> &LocationScope {
        &self.scope
    }

    pub fn holidays(&self) -> &[HolidayWindow] {
        &self.holidays
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    pub fn dataset(&self) -> &str {
        &self.dataset
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[rstest]
    #[case("5T", Frequency::FiveMinutes)]
    #[case("15min", Frequency::FifteenMinutes)]
    #[case("30T", Frequency::ThirtyMinutes)]
    #[case("1H", Frequency::Hourly)]
    #[case("H", Frequency::Hourly)]
    #[case("2H", Frequency::TwoHourly)]
    #[case("6h", Frequency::SixHourly)]
    #[case("12H", Frequency::TwelveHourly)]
    #[case("D", Frequency::Daily)]
    #[case("W", Frequency::Weekly)]
    #[case("MS", Frequency::Monthly)]
    fn test_frequency_aliases(#[case] alias: &str, #[case] expected: Frequency) {
        assert_eq!(Frequency::parse(alias).unwrap(), expected);
    }

    #[test]
    fn test_unsupported_frequency() {
        let err = Frequency::parse("3T").unwrap_err();
        assert!(matches!(err, GenerationError::InvalidRequest(_)));
    }

    #[test]
    fn test_frequency_serde_uses_alias() {
        let json = serde_json::to_string(&Frequency::ThirtyMinutes).unwrap();
        assert_eq!(json, "\"30T\"");
        let parsed: Frequency = serde_json::from_str("\"1H\"").unwrap();
        assert_eq!(parsed, Frequency::Hourly);
        assert!(serde_json::from_str::<Frequency>("\"fortnightly\"").is_err());
    }

    #[test]
    fn test_request_requires_buildings() {
        let err = GenerationRequest::new(0, date(2024, 1, 1), date(2024, 1, 2), Frequency::Hourly)
            .unwrap_err();
        assert!(matches!(err, GenerationError::InvalidRequest(_)));
    }

    #[test]
    fn test_request_requires_ordered_dates() {
        let same = GenerationRequest::new(5, date(2024, 1, 1), date(2024, 1, 1), Frequency::Hourly);
        assert!(same.is_err());
        let reversed =
            GenerationRequest::new(5, date(2024, 1, 2), date(2024, 1, 1), Frequency::Hourly);
        assert!(reversed.is_err());
    }

    #[test]
    fn test_filter_and_custom_location_are_exclusive() {
        let request =
            GenerationRequest::new(5, date(2024, 1, 1), date(2024, 1, 2), Frequency::Hourly)
                .unwrap();

        let filtered = request
            .clone()
            .with_filter(LocationFilter::state("Selangor"))
            .unwrap();
        assert!(filtered
            .with_custom_location(CustomLocation::new("Bentong", 3.52, 101.91))
            .is_err());

        let custom = request
            .with_custom_location(CustomLocation::new("Bentong", 3.52, 101.91))
            .unwrap();
        assert!(custom.with_filter(LocationFilter::state("Selangor")).is_err());
    }

    #[test]
    fn test_custom_location_validated_at_construction() {
        let request =
            GenerationRequest::new(5, date(2024, 1, 1), date(2024, 1, 2), Frequency::Hourly)
                .unwrap();
        let err = request
            .clone()
            .with_custom_location(CustomLocation::new("Nowhere", 200.0, 101.0))
            .unwrap_err();
        assert!(matches!(err, GenerationError::InvalidRequest(_)));

        let blank = request
            .with_custom_location(CustomLocation::new("   ", 3.5, 101.9))
            .unwrap_err();
        assert!(matches!(blank, GenerationError::InvalidRequest(_)));
    }

    #[test]
    fn test_holiday_window() {
        let window = HolidayWindow::new(date(2024, 3, 11), date(2024, 4, 9)).unwrap();
        assert!(window.contains(date(2024, 3, 11)));
        assert!(window.contains(date(2024, 4, 9)));
        assert!(!window.contains(date(2024, 4, 10)));
        assert_eq!(window.daytime_factor, 0.6);
        assert_eq!(window.evening_factor, 1.4);

        assert!(HolidayWindow::new(date(2024, 4, 9), date(2024, 3, 11)).is_err());
        assert!(window.with_factors(-1.0, 1.4).is_err());
    }
}
