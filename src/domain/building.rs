use serde::{Deserialize, Serialize};
use std::sync::Arc;
use strum::{Display, EnumCount, EnumIter, EnumString, IntoEnumIterator};

use super::{Frequency, Location};

/// Load-shape archetype of a building
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    EnumCount,
)]
#[strum(ascii_case_insensitive)]
pub enum BuildingClass {
    Residential,
    Apartment,
    Commercial,
    Office,
    Retail,
    Restaurant,
    Hotel,
    Hospital,
    Clinic,
    School,
    Industrial,
    Factory,
    Warehouse,
}

impl BuildingClass {
    pub fn all() -> Vec<Self> {
        Self::iter().collect()
    }

    /// Position in declaration order, used to index per-class tables
    pub fn index(self) -> usize {
        self as usize
    }

    /// Homes rather than workplaces
    pub fn is_domestic(self) -> bool {
        matches!(self, BuildingClass::Residential | BuildingClass::Apartment)
    }
}

/// When a class draws its load over the week
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperatingHours {
    /// Occupied homes
    Domestic,
    /// Opening hours; affected by Friday prayers and weekends
    Business,
    /// 24h operation (hospitals, hotels, process industry)
    RoundTheClock,
}

/// Consumption parameters of a building class (kWh per reading)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassProfile {
    /// Minimum draw
    pub base: f64,
    /// Maximum draw before modifiers
    pub peak: f64,
    /// Noise amplitude
    pub variance: f64,
    /// Share of the daytime activity retained overnight (0-1)
    pub night_factor: f64,
    /// How strongly climate drives the load (0 = fixed process load, 1 = full cooling load)
    pub cooling_sensitivity: f64,
    pub hours: OperatingHours,
}

impl ClassProfile {
    /// Amplitude band modulated by the temporal factors
    pub fn span(&self) -> f64 {
        self.peak - self.base
    }

    pub fn validate(&self) -> Result<(), String> {
        let values = [
            self.base,
            self.peak,
            self.variance,
            self.night_factor,
            self.cooling_sensitivity,
        ];
        if values.iter().any(|v| !v.is_finite()) {
            return Err("profile values must be finite".to_string());
        }
        if self.base < 0.0 || self.base > self.peak {
            return Err(format!(
                "base ({}) must be between 0 and peak ({})",
                self.base, self.peak
            ));
        }
        if self.variance < 0.0 {
            return Err("variance cannot be negative".to_string());
        }
        if !(0.0..=1.0).contains(&self.night_factor) {
            return Err("night_factor must be between 0 and 1".to_string());
        }
        if !(0.0..=1.0).contains(&self.cooling_sensitivity) {
            return Err("cooling_sensitivity must be between 0 and 1".to_string());
        }
        Ok(())
    }
}

/// One synthetic building of a generation run.
///
/// Created by the roster builder and never mutated afterwards. The location is
/// shared with every other building placed in the same city.
#[derive(Debug, Clone)]
pub struct Building {
    pub unique_id: Arc<str>,
    pub building_id: String,
    pub location_id: String,
    pub location: Arc<Location>,
    pub class: BuildingClass,
    pub profile: ClassProfile,
    /// Number of real-world units this building stands in for
    pub cluster_size: u32,
    pub latitude: f64,
    pub longitude: f64,
    pub freq: Frequency,
    /// Seed for every random draw the pattern engine makes for this building
    pub noise_seed: u64,
}

/// Building metadata row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildingRecord {
    pub unique_id: String,
    pub dataset: String,
    pub building_id: String,
    pub location_id: String,
    pub latitude: f64,
    pub longitude: f64,
    pub location: String,
    pub state: String,
    pub region: String,
    pub population: u32,
    pub timezone: String,
    pub building_class: BuildingClass,
    pub cluster_size: u32,
    pub freq: String,
}

impl Building {
    pub fn record(&self, dataset: &str) -> BuildingRecord {
        BuildingRecord {
            unique_id: self.unique_id.to_string(),
            dataset: dataset.to_string(),
            building_id: self.building_id.clone(),
            location_id: self.location_id.clone(),
            latitude: self.latitude,
            longitude: self.longitude,
            location: self.location.name.clone(),
            state: self.location.state.clone(),
            region: self.location.region.to_string(),
            population: self.location.population,
            timezone: self.location.timezone().name().to_string(),
            building_class: self.class,
            cluster_size: self.cluster_size,
            freq: self.freq.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> ClassProfile {
        ClassProfile {
            base: 0.5,
            peak: 12.0,
            variance: 2.5,
            night_factor: 0.3,
            cooling_sensitivity: 1.0,
            hours: OperatingHours::Domestic,
        }
    }

    #[test]
    fn test_class_parsing() {
        assert_eq!("hospital".parse::<BuildingClass>().ok(), Some(BuildingClass::Hospital));
        assert_eq!(BuildingClass::Warehouse.to_string(), "Warehouse");
        assert!("Spaceport".parse::<BuildingClass>().is_err());
    }

    #[test]
    fn test_class_indexes_cover_all() {
        let all = BuildingClass::all();
        assert_eq!(all.len(), BuildingClass::COUNT);
        for (i, class) in all.iter().enumerate() {
            assert_eq!(class.index(), i);
        }
    }

    #[test]
    fn test_profile_validation() {
        assert!(profile().validate().is_ok());

        let inverted = ClassProfile { base: 20.0, ..profile() };
        assert!(inverted.validate().is_err());

        let night = ClassProfile { night_factor: 1.5, ..profile() };
        assert!(night.validate().is_err());

        let nan = ClassProfile { variance: f64::NAN, ..profile() };
        assert!(nan.validate().is_err());
    }

    #[test]
    fn test_record_carries_location_metadata() {
        let location = Arc::new(Location::new(
            "Ipoh",
            "Perak",
            super::super::Region::Northern,
            657_000,
            4.5975,
            101.0901,
        ));
        let building = Building {
            unique_id: Arc::from("00000000deadbeef"),
            building_id: "MY_PER_000001".to_string(),
            location_id: location.location_id(),
            location: location.clone(),
            class: BuildingClass::Office,
            profile: profile(),
            cluster_size: 12,
            latitude: 4.6,
            longitude: 101.1,
            freq: Frequency::Hourly,
            noise_seed: 7,
        };

        let record = building.record("malaysia_electricity_v1");
        assert_eq!(record.location, "Ipoh");
        assert_eq!(record.region, "Northern");
        assert_eq!(record.timezone, "Asia/Kuala_Lumpur");
        assert_eq!(record.freq, "1H");
        assert_eq!(record.building_class, BuildingClass::Office);
    }
}
