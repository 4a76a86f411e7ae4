//! Static reference data: class profiles, the city registry and the per-tier
//! class mix.
//!
//! The catalog is an ordinary immutable value. Callers build one with
//! [`ReferenceCatalog::malaysia`] and share it behind an `Arc`.

pub mod cities;
pub mod distribution;
pub mod profiles;

pub use distribution::ClassDistribution;

use serde::Serialize;
use std::sync::Arc;
use strum::IntoEnumIterator;

use crate::domain::{BuildingClass, CityTier, ClassProfile, Location, LocationFilter, Region};
use crate::error::{GenerationError, GenerationResult};

/// Roster size used when previewing the class mix of a single city
const SUMMARY_BUILDINGS: usize = 100;

#[derive(Debug, Clone)]
pub struct ReferenceCatalog {
    classes: Vec<BuildingClass>,
    /// Indexed by `BuildingClass::index`
    profiles: Vec<ClassProfile>,
    /// Descending population, ties broken by name
    locations: Vec<Arc<Location>>,
}

/// Overview of one city as shown in location pickers
#[derive(Debug, Clone, Serialize)]
pub struct CitySummary {
    pub name: String,
    pub state: String,
    pub region: Region,
    pub population: u32,
    pub tier: CityTier,
    pub latitude: f64,
    pub longitude: f64,
    pub location_id: String,
    /// Class counts for a hypothetical 100-building roster
    pub building_mix: Vec<(BuildingClass, usize)>,
}

impl ReferenceCatalog {
    /// Catalog with the built-in Malaysian cities and default class profiles
    pub fn malaysia() -> Self {
        let profiles = BuildingClass::iter().map(profiles::default_profile).collect();
        let locations = cities::malaysian_cities().into_iter().map(Arc::new).collect();
        Self::assemble(profiles, locations)
    }

    /// Catalog over caller-provided locations with the default class profiles
    pub fn new(locations: Vec<Location>) -> GenerationResult<Self> {
        if locations.is_empty() {
            return Err(GenerationError::invalid("catalog needs at least one location"));
        }
        for location in &locations {
            location.validate().map_err(GenerationError::InvalidRequest)?;
        }

        let profiles = BuildingClass::iter().map(profiles::default_profile).collect();
        Ok(Self::assemble(
            profiles,
            locations.into_iter().map(Arc::new).collect(),
        ))
    }

    fn assemble(profiles: Vec<ClassProfile>, mut locations: Vec<Arc<Location>>) -> Self {
        locations.sort_by(|a, b| {
            b.population
                .cmp(&a.population)
                .then_with(|| a.name.cmp(&b.name))
        });
        Self {
            classes: BuildingClass::all(),
            profiles,
            locations,
        }
    }

    /// Replace the profile of one class
    pub fn with_profile(
        mut self,
        class: BuildingClass,
        profile: ClassProfile,
    ) -> GenerationResult<Self> {
        profile
            .validate()
            .map_err(|e| GenerationError::invalid(format!("{class}: {e}")))?;
        self.profiles[class.index()] = profile;
        Ok(self)
    }

    pub fn classes(&self) -> &[BuildingClass] {
        &self.classes
    }

    pub fn profile(&self, class: BuildingClass) -> &ClassProfile {
        &self.profiles[class.index()]
    }

    /// Locations matching `filter`, largest first
    pub fn locations(&self, filter: Option<&LocationFilter>) -> Vec<Arc<Location>> {
        self.locations
            .iter()
            .filter(|location| filter.map_or(true, |f| f.matches(location)))
            .cloned()
            .collect()
    }

    /// Case-insensitive lookup by city name
    pub fn location(&self, name: &str) -> Option<Arc<Location>> {
        let name = name.trim();
        self.locations
            .iter()
            .find(|location| location.name.eq_ignore_ascii_case(name))
            .cloned()
    }

    pub fn tier_of(&self, location: &Location) -> CityTier {
        location.tier()
    }

    pub fn class_distribution_for(&self, location: &Location) -> ClassDistribution {
        ClassDistribution::for_tier(self.tier_of(location))
    }

    /// Regions that have at least one catalog location, in declaration order
    pub fn regions(&self) -> Vec<Region> {
        Region::iter()
            .filter(|region| self.locations.iter().any(|l| l.region == *region))
            .collect()
    }

    /// Distinct state names, sorted
    pub fn states(&self) -> Vec<String> {
        let mut states: Vec<String> = self.locations.iter().map(|l| l.state.clone()).collect();
        states.sort();
        states.dedup();
        states
    }

    pub fn city_summary(&self, name: &str) -> GenerationResult<CitySummary> {
        let location = self.location(name).ok_or_else(|| {
            GenerationError::UnresolvableLocation(format!("unknown city '{}'", name))
        })?;
        let building_mix = self
            .class_distribution_for(&location)
            .apportion(SUMMARY_BUILDINGS)
            .into_iter()
            .filter(|(_, count)| *count > 0)
            .collect();

        Ok(CitySummary {
            name: location.name.clone(),
            state: location.state.clone(),
            region: location.region,
            population: location.population,
            tier: self.tier_of(&location),
            latitude: location.latitude,
            longitude: location.longitude,
            location_id: location.location_id(),
            building_mix,
        })
    }
}

impl Default for ReferenceCatalog {
    fn default() -> Self {
        Self::malaysia()
    }
}
