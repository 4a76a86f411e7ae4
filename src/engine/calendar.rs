//! Weekly rhythm and the fasting-month holiday adjustment.

use chrono::{Datelike, NaiveDateTime, Timelike, Weekday};

use crate::domain::{BuildingClass, HolidayWindow, OperatingHours};

pub fn is_weekend(weekday: Weekday) -> bool {
    matches!(weekday, Weekday::Sat | Weekday::Sun)
}

/// True during the Friday midday prayer break (12:00-15:59)
pub fn is_friday_prayer(timestamp: NaiveDateTime) -> bool {
    timestamp.weekday() == Weekday::Fri && (12..16).contains(&timestamp.hour())
}

fn weekend_factor(class: BuildingClass) -> f64 {
    use BuildingClass::*;
    match class {
        Residential | Apartment => 1.2,
        Office => 0.4,
        Commercial => 0.7,
        Clinic => 0.5,
        School => 0.1,
        Retail | Restaurant => 1.1,
        Warehouse => 0.8,
        Industrial | Factory => 0.85,
        Hotel | Hospital => 1.0,
    }
}

fn friday_factor(class: BuildingClass) -> f64 {
    use BuildingClass::*;
    match class {
        Office | Commercial | Clinic => 0.7,
        School => 0.3,
        Retail | Restaurant => 0.85,
        Warehouse => 0.8,
        _ => 1.0,
    }
}

/// True from Friday noon until midnight
pub fn is_friday_afternoon(timestamp: NaiveDateTime) -> bool {
    timestamp.weekday() == Weekday::Fri && timestamp.hour() >= 12
}

/// Day-of-week multiplier.
///
/// The Friday reduction only applies to classes that keep opening hours.
/// Homes draw their weekend load from Friday noon; 24h operations carry on
/// unchanged.
pub fn weekly_factor(class: BuildingClass, hours: OperatingHours, timestamp: NaiveDateTime) -> f64 {
    let weekday = timestamp.weekday();
    if is_weekend(weekday) {
        return weekend_factor(class);
    }
    match hours {
        OperatingHours::Business if is_friday_prayer(timestamp) => friday_factor(class),
        OperatingHours::Domestic if is_friday_afternoon(timestamp) => weekend_factor(class),
        _ => 1.0,
    }
}

/// Holiday multiplier for a timestamp. Only detached homes shift their load.
pub fn holiday_factor(
    class: BuildingClass,
    timestamp: NaiveDateTime,
    holidays: &[HolidayWindow],
) -> f64 {
    if class != BuildingClass::Residential {
        return 1.0;
    }
    let date = timestamp.date();
    let Some(window) = holidays.iter().find(|w| w.contains(date)) else {
        return 1.0;
    };

    match timestamp.hour() {
        4..=17 => window.daytime_factor,
        18..=23 => window.evening_factor,
        _ => 1.0,
    }
}
