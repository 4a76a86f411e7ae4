use chrono::NaiveDateTime;
use itertools::Itertools;
use serde::Serialize;
use std::collections::HashSet;
use uuid::Uuid;

use crate::domain::{Building, BuildingClass, ConsumptionPoint, Frequency, Region};
use crate::utils::round_to;

/// Dataset-wide statistics
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryStats {
    pub total_records: usize,
    pub buildings_count: usize,
    pub avg_consumption: f64,
    pub max_consumption: f64,
    pub min_consumption: f64,
    /// Readings exactly at zero (outages or fully clipped noise)
    pub zero_values: usize,
    pub unique_locations: usize,
}

impl SummaryStats {
    pub fn compute(buildings: &[Building], series: &[Vec<ConsumptionPoint>]) -> Self {
        let values = || series.iter().flatten().map(|p| p.y);
        let total_records = series.iter().map(Vec::len).sum::<usize>();

        let (min, max) = match values().minmax() {
            itertools::MinMaxResult::NoElements => (0.0, 0.0),
            itertools::MinMaxResult::OneElement(v) => (v, v),
            itertools::MinMaxResult::MinMax(min, max) => (min, max),
        };
        let avg = if total_records == 0 {
            0.0
        } else {
            values().sum::<f64>() / total_records as f64
        };

        let unique_locations = buildings
            .iter()
            .map(|b| b.location_id.as_str())
            .collect::<HashSet<_>>()
            .len();

        Self {
            total_records,
            buildings_count: buildings.len(),
            avg_consumption: round_to(avg, 3),
            max_consumption: max,
            min_consumption: min,
            zero_values: values().filter(|y| *y == 0.0).count(),
            unique_locations,
        }
    }
}

/// Per-location breakdown of a dataset
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationAnalysis {
    pub location: String,
    pub state: String,
    pub region: Region,
    pub population: u32,
    pub buildings: usize,
    pub avg_consumption: f64,
    pub total_consumption: f64,
}

/// Locations ordered by building count, largest first, ties by name
pub fn location_analysis(
    buildings: &[Building],
    series: &[Vec<ConsumptionPoint>],
) -> Vec<LocationAnalysis> {
    buildings
        .iter()
        .zip(series)
        .into_group_map_by(|(building, _)| building.location.name.clone())
        .into_values()
        .map(|group| {
            let location = &group[0].0.location;
            let (total, readings) = group.iter().fold((0.0, 0usize), |(sum, n), (_, points)| {
                (sum + points.iter().map(|p| p.y).sum::<f64>(), n + points.len())
            });
            LocationAnalysis {
                location: location.name.clone(),
                state: location.state.clone(),
                region: location.region,
                population: location.population,
                buildings: group.len(),
                avg_consumption: if readings == 0 {
                    0.0
                } else {
                    round_to(total / readings as f64, 3)
                },
                total_consumption: round_to(total, 3),
            }
        })
        .sorted_by(|a, b| {
            b.buildings
                .cmp(&a.buildings)
                .then_with(|| a.location.cmp(&b.location))
        })
        .collect()
}

/// Number of buildings per class, in class declaration order
pub fn class_counts(buildings: &[Building]) -> Vec<(BuildingClass, usize)> {
    buildings
        .iter()
        .map(|b| b.class)
        .counts()
        .into_iter()
        .sorted()
        .collect()
}

/// Everything about a run except the rows themselves
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationReport {
    pub run_id: Uuid,
    pub seed: u64,
    pub dataset: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub freq: Frequency,
    pub summary: SummaryStats,
    pub class_distribution: Vec<(BuildingClass, usize)>,
    pub locations: Vec<LocationAnalysis>,
}
