//! Per-class consumption parameters for a tropical climate.
//!
//! The figures are calibration data. What matters is their ordering: 24h
//! classes keep most of their load overnight (Hospital > Hotel > Industrial >
//! Residential > Office > School) and process-heavy classes respond weakly to
//! the cooling season.

use crate::domain::{BuildingClass, ClassProfile, OperatingHours};

pub fn default_profile(class: BuildingClass) -> ClassProfile {
    use BuildingClass::*;
    use OperatingHours::*;

    let (base, peak, variance, night_factor, cooling_sensitivity, hours) = match class {
        Residential => (0.5, 12.0, 2.5, 0.30, 1.0, Domestic),
        Apartment => (1.0, 15.0, 4.0, 0.40, 1.0, Domestic),
        Commercial => (5.0, 80.0, 15.0, 0.20, 1.0, Business),
        Office => (3.0, 45.0, 8.0, 0.10, 1.0, Business),
        Retail => (2.0, 35.0, 6.0, 0.15, 1.0, Business),
        Restaurant => (3.0, 60.0, 15.0, 0.20, 0.8, Business),
        Hotel => (8.0, 40.0, 8.0, 0.60, 1.0, RoundTheClock),
        Hospital => (25.0, 70.0, 12.0, 0.85, 0.6, RoundTheClock),
        Clinic => (2.0, 15.0, 3.0, 0.10, 0.9, Business),
        School => (1.0, 25.0, 5.0, 0.05, 0.9, Business),
        Industrial => (20.0, 200.0, 40.0, 0.70, 0.4, RoundTheClock),
        Factory => (30.0, 150.0, 35.0, 0.60, 0.3, RoundTheClock),
        Warehouse => (2.0, 30.0, 8.0, 0.40, 0.5, Business),
    };

    ClassProfile {
        base,
        peak,
        variance,
        night_factor,
        cooling_sensitivity,
        hours,
    }
}
