//! Building-class mix per city tier.

use serde::Serialize;
use strum::IntoEnumIterator;

use crate::domain::{BuildingClass, CityTier};

/// Class weights in `BuildingClass` declaration order
fn tier_table(tier: CityTier) -> [f64; 13] {
    // Residential, Apartment, Commercial, Office, Retail, Restaurant, Hotel,
    // Hospital, Clinic, School, Industrial, Factory, Warehouse
    match tier {
        CityTier::Metropolis => [
            0.42, 0.12, 0.10, 0.09, 0.07, 0.06, 0.04, 0.01, 0.02, 0.04, 0.02, 0.00, 0.01,
        ],
        CityTier::Major => [
            0.50, 0.10, 0.10, 0.06, 0.06, 0.05, 0.02, 0.01, 0.02, 0.04, 0.02, 0.01, 0.01,
        ],
        CityTier::Medium => [
            0.58, 0.06, 0.08, 0.04, 0.06, 0.04, 0.02, 0.008, 0.025, 0.06, 0.012, 0.005, 0.010,
        ],
        CityTier::Small => [
            0.68, 0.02, 0.06, 0.02, 0.06, 0.03, 0.005, 0.00, 0.025, 0.08, 0.01, 0.00, 0.01,
        ],
        CityTier::Tourist => [
            0.48, 0.06, 0.08, 0.02, 0.08, 0.10, 0.10, 0.005, 0.02, 0.04, 0.005, 0.00, 0.01,
        ],
        CityTier::Industrial => [
            0.40, 0.05, 0.06, 0.03, 0.04, 0.03, 0.01, 0.005, 0.02, 0.03, 0.17, 0.10, 0.055,
        ],
    }
}

/// Mapping from building class to its share of a city's buildings
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassDistribution {
    pub tier: CityTier,
    weights: Vec<(BuildingClass, f64)>,
}

impl ClassDistribution {
    pub fn for_tier(tier: CityTier) -> Self {
        let weights = BuildingClass::iter().zip(tier_table(tier)).collect();
        Self { tier, weights }
    }

    pub fn weight(&self, class: BuildingClass) -> f64 {
        self.weights
            .iter()
            .find(|(c, _)| *c == class)
            .map(|(_, w)| *w)
            .unwrap_or(0.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (BuildingClass, f64)> + '_ {
        self.weights.iter().copied()
    }

    pub fn total(&self) -> f64 {
        self.weights.iter().map(|(_, w)| w).sum()
    }

    /// Split `count` buildings across classes with the largest-remainder method.
    ///
    /// The result always sums to exactly `count`; ties on the fractional part
    /// go to the class declared first.
    pub fn apportion(&self, count: usize) -> Vec<(BuildingClass, usize)> {
        let total = self.total();
        if count == 0 || total <= 0.0 {
            return self.weights.iter().map(|(c, _)| (*c, 0)).collect();
        }

        let quotas: Vec<f64> = self
            .weights
            .iter()
            .map(|(_, w)| w / total * count as f64)
            .collect();
        let mut counts: Vec<usize> = quotas.iter().map(|q| q.floor() as usize).collect();

        let assigned: usize = counts.iter().sum();
        let mut order: Vec<usize> = (0..quotas.len()).collect();
        order.sort_by(|&a, &b| {
            let fa = quotas[a] - quotas[a].floor();
            let fb = quotas[b] - quotas[b].floor();
            fb.total_cmp(&fa).then(a.cmp(&b))
        });
        for &i in order.iter().cycle().take(count.saturating_sub(assigned)) {
            counts[i] += 1;
        }

        self.weights
            .iter()
            .zip(counts)
            .map(|((class, _), n)| (*class, n))
            .collect()
    }
}
