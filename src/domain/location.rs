use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use strum::{Display, EnumIter, EnumString};
use validator::Validate;

use crate::error::{GenerationError, GenerationResult};
use crate::utils::stable_hash;

/// Latitudes covered by Peninsular and East Malaysia
pub const MALAYSIA_LATITUDE: RangeInclusive<f64> = 0.8..=7.5;
/// Longitudes covered by Peninsular and East Malaysia
pub const MALAYSIA_LONGITUDE: RangeInclusive<f64> = 99.5..=119.5;

/// All generated timestamps are local to this zone
pub const TIMEZONE: Tz = chrono_tz::Asia::Kuala_Lumpur;

/// True when the coordinate pair is finite and inside Malaysia's bounding box
pub fn within_malaysia(latitude: f64, longitude: f64) -> bool {
    latitude.is_finite()
        && longitude.is_finite()
        && MALAYSIA_LATITUDE.contains(&latitude)
        && MALAYSIA_LONGITUDE.contains(&longitude)
}

/// Geographic region
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
    Display, EnumString, EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum Region {
    Central,
    Northern,
    Southern,
    #[serde(rename = "East Coast")]
    #[strum(to_string = "East Coast", serialize = "EastCoast")]
    EastCoast,
    #[serde(rename = "East Malaysia")]
    #[strum(to_string = "East Malaysia", serialize = "EastMalaysia")]
    EastMalaysia,
    /// User-supplied location outside the catalog
    #[default]
    Custom,
}

/// Urbanisation tier driving the building-class mix of a city
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum CityTier {
    Metropolis,
    Major,
    Medium,
    Small,
    Tourist,
    Industrial,
}

impl CityTier {
    /// Tier implied by population alone
    pub fn from_population(population: u32) -> Self {
        match population {
            p if p > 1_000_000 => CityTier::Metropolis,
            p if p > 500_000 => CityTier::Major,
            p if p > 200_000 => CityTier::Medium,
            _ => CityTier::Small,
        }
    }
}

/// A city or town buildings can be placed in
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    pub state: String,
    pub region: Region,
    pub population: u32,
    pub latitude: f64,
    pub longitude: f64,
    /// Overrides the population tier for tourist and industrial towns
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tier: Option<CityTier>,
}

impl Location {
    pub fn new(
        name: impl Into<String>,
        state: impl Into<String>,
        region: Region,
        population: u32,
        latitude: f64,
        longitude: f64,
    ) -> Self {
        Self {
            name: name.into(),
            state: state.into(),
            region,
            population,
            latitude,
            longitude,
            tier: None,
        }
    }

    pub fn with_tier(mut self, tier: CityTier) -> Self {
        self.tier = Some(tier);
        self
    }

    pub fn tier(&self) -> CityTier {
        self.tier
            .unwrap_or_else(|| CityTier::from_population(self.population))
    }

    pub fn timezone(&self) -> Tz {
        TIMEZONE
    }

    /// Three-letter state code used in building identifiers ("Selangor" -> "SEL")
    pub fn state_code(&self) -> String {
        let code: String = self
            .state
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .take(3)
            .collect::<String>()
            .to_ascii_uppercase();
        if code.is_empty() {
            "UNK".to_string()
        } else {
            code
        }
    }

    /// Stable location identifier derived from the name
    pub fn location_id(&self) -> String {
        format!("MY_{:05}", stable_hash(&self.name) % 100_000)
    }

    /// Check reference data invariants
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("location name cannot be empty".to_string());
        }
        if self.population == 0 {
            return Err(format!("{}: population must be positive", self.name));
        }
        if !within_malaysia(self.latitude, self.longitude) {
            return Err(format!(
                "{}: coordinates ({}, {}) outside Malaysia",
                self.name, self.latitude, self.longitude
            ));
        }
        Ok(())
    }
}

/// Optional geographic constraints on the candidate locations.
///
/// String fields compare case-insensitively; `"all"` or an empty string means
/// no constraint, matching what the selection widgets send.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationFilter {
    pub region: Option<String>,
    pub state: Option<String>,
    pub city: Option<String>,
    pub population_min: Option<u32>,
    pub population_max: Option<u32>,
}

fn constraint(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case("all"))
}

impl LocationFilter {
    pub fn region(region: impl Into<String>) -> Self {
        Self {
            region: Some(region.into()),
            ..Default::default()
        }
    }

    pub fn state(state: impl Into<String>) -> Self {
        Self {
            state: Some(state.into()),
            ..Default::default()
        }
    }

    pub fn city(city: impl Into<String>) -> Self {
        Self {
            city: Some(city.into()),
            ..Default::default()
        }
    }

    pub fn with_population(mut self, min: Option<u32>, max: Option<u32>) -> Self {
        self.population_min = min;
        self.population_max = max;
        self
    }

    pub fn validate(&self) -> GenerationResult<()> {
        if let (Some(min), Some(max)) = (self.population_min, self.population_max) {
            if min > max {
                return Err(GenerationError::invalid(format!(
                    "population_min ({}) exceeds population_max ({})",
                    min, max
                )));
            }
        }
        Ok(())
    }

    pub fn matches(&self, location: &Location) -> bool {
        if let Some(city) = constraint(&self.city) {
            if !location.name.eq_ignore_ascii_case(city) {
                return false;
            }
        }
        if let Some(state) = constraint(&self.state) {
            if !location.state.eq_ignore_ascii_case(state) {
                return false;
            }
        }
        if let Some(region) = constraint(&self.region) {
            if !location.region.to_string().eq_ignore_ascii_case(region) {
                return false;
            }
        }
        if self
            .population_min
            .is_some_and(|min| location.population < min)
        {
            return false;
        }
        if self
            .population_max
            .is_some_and(|max| location.population > max)
        {
            return false;
        }
        true
    }
}

fn default_custom_state() -> String {
    "Custom".to_string()
}

fn default_custom_population() -> u32 {
    100_000
}

/// A caller-defined location replacing the catalog entirely
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct CustomLocation {
    #[validate(length(min = 1, message = "custom location name cannot be empty"))]
    pub name: String,
    #[serde(default = "default_custom_state")]
    pub state: String,
    #[serde(default)]
    pub region: Region,
    #[serde(default = "default_custom_population")]
    #[validate(range(min = 1, message = "population must be positive"))]
    pub population: u32,
    #[validate(range(min = 0.8, max = 7.5, message = "latitude outside Malaysia"))]
    pub latitude: f64,
    #[validate(range(min = 99.5, max = 119.5, message = "longitude outside Malaysia"))]
    pub longitude: f64,
}

impl CustomLocation {
    pub fn new(name: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            name: name.into(),
            state: default_custom_state(),
            region: Region::Custom,
            population: default_custom_population(),
            latitude,
            longitude,
        }
    }

    pub fn with_population(mut self, population: u32) -> Self {
        self.population = population;
        self
    }

    pub fn with_state(mut self, state: impl Into<String>, region: Region) -> Self {
        self.state = state.into();
        self.region = region;
        self
    }

    /// Validate and convert into a catalog-style location
    pub fn to_location(&self) -> GenerationResult<Location> {
        // NaN slips through range checks, so finiteness is tested first
        if !self.latitude.is_finite() || !self.longitude.is_finite() {
            return Err(GenerationError::invalid(format!(
                "custom location '{}' has non-finite coordinates",
                self.name
            )));
        }
        self.validate()?;

        let location = Location::new(
            self.name.trim(),
            self.state.clone(),
            self.region,
            self.population,
            self.latitude,
            self.longitude,
        );
        // length checks run before trimming, so blank names surface here
        location.validate().map_err(GenerationError::InvalidRequest)?;
        Ok(location)
    }
}

/// Which locations a request may place buildings in
#[derive(Debug, Clone, Default, PartialEq)]
pub enum LocationScope {
    /// Every catalog location
    #[default]
    All,
    /// Catalog locations matching the filter
    Filter(LocationFilter),
    /// A single caller-defined location
    Custom(CustomLocation),
}
