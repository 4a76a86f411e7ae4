//! Turns a requested building count and location scope into a concrete roster.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::sync::Arc;
use tracing::{debug, info};

use crate::catalog::ReferenceCatalog;
use crate::domain::{
    Building, BuildingClass, GenerationRequest, Location, LocationScope, MALAYSIA_LATITUDE,
    MALAYSIA_LONGITUDE,
};
use crate::error::{GenerationError, GenerationResult};
use crate::utils::{derive_seed, mix64};

/// Maximum coordinate offset from the city centre, in degrees
pub const COORDINATE_JITTER: f64 = 0.09;
/// Largest number of real units one synthetic building stands in for
pub const MAX_CLUSTER_SIZE: u32 = 250;

const NOISE_SALT: u64 = 0x6E6F_6973_655F_7631;

pub struct RosterBuilder<'a> {
    catalog: &'a ReferenceCatalog,
}

impl<'a> RosterBuilder<'a> {
    pub fn new(catalog: &'a ReferenceCatalog) -> Self {
        Self { catalog }
    }

    /// Build exactly `request.num_buildings()` buildings.
    ///
    /// Everything random (class order, jitter, cluster size, identifiers and
    /// noise seeds) derives from `seed`, so the same request and seed always
    /// give the same roster.
    pub fn build(&self, request: &GenerationRequest, seed: u64) -> GenerationResult<Vec<Building>> {
        let count = request.num_buildings();
        if count < 1 {
            return Err(GenerationError::invalid("num_buildings must be at least 1"));
        }

        let locations = self.resolve_locations(request.scope())?;
        let allocation = split_by_population(&locations, count);

        let mut rng = StdRng::seed_from_u64(seed);
        let mut buildings = Vec::with_capacity(count);

        for (location, share) in &allocation {
            let mut classes: Vec<BuildingClass> = self
                .catalog
                .class_distribution_for(location)
                .apportion(*share)
                .into_iter()
                .flat_map(|(class, n)| std::iter::repeat(class).take(n))
                .collect();
            classes.shuffle(&mut rng);

            debug!(
                location = %location.name,
                tier = %location.tier(),
                buildings = share,
                "placing buildings"
            );

            for class in classes {
                let sequence = buildings.len() as u64;
                buildings.push(self.place(location, class, sequence, seed, request, &mut rng));
            }
        }

        if buildings.len() != count {
            return Err(GenerationError::GenerationFailure(format!(
                "roster holds {} buildings, expected {}",
                buildings.len(),
                count
            )));
        }

        info!(
            buildings = buildings.len(),
            locations = allocation.len(),
            seed,
            "roster built"
        );
        Ok(buildings)
    }

    /// Candidate locations for a scope, largest population first
    pub fn resolve_locations(&self, scope: &LocationScope) -> GenerationResult<Vec<Arc<Location>>> {
        let locations = match scope {
            LocationScope::All => self.catalog.locations(None),
            LocationScope::Filter(filter) => {
                filter.validate()?;
                self.catalog.locations(Some(filter))
            }
            LocationScope::Custom(custom) => vec![Arc::new(custom.to_location()?)],
        };

        if locations.is_empty() {
            return Err(GenerationError::UnresolvableLocation(match scope {
                LocationScope::Filter(filter) => {
                    format!("no catalog location matches {:?}", filter)
                }
                _ => "catalog has no locations".to_string(),
            }));
        }
        Ok(locations)
    }

    fn place(
        &self,
        location: &Arc<Location>,
        class: BuildingClass,
        sequence: u64,
        seed: u64,
        request: &GenerationRequest,
        rng: &mut StdRng,
    ) -> Building {
        let raw = derive_seed(seed, sequence);

        let latitude = (location.latitude + rng.gen_range(-COORDINATE_JITTER..=COORDINATE_JITTER))
            .clamp(*MALAYSIA_LATITUDE.start(), *MALAYSIA_LATITUDE.end());
        let longitude = (location.longitude
            + rng.gen_range(-COORDINATE_JITTER..=COORDINATE_JITTER))
        .clamp(*MALAYSIA_LONGITUDE.start(), *MALAYSIA_LONGITUDE.end());

        Building {
            unique_id: Arc::from(format!("{:016x}", raw)),
            building_id: format!("MY_{}_{:06}", location.state_code(), sequence + 1),
            location_id: location.location_id(),
            location: Arc::clone(location),
            class,
            profile: *self.catalog.profile(class),
            cluster_size: rng.gen_range(1..=MAX_CLUSTER_SIZE),
            latitude,
            longitude,
            freq: request.frequency(),
            noise_seed: mix64(raw ^ NOISE_SALT),
        }
    }
}

/// Split `count` across locations proportionally to population.
///
/// Shares are floored and the remainder goes to the first (largest)
/// location. Locations left with no buildings are dropped.
pub fn split_by_population(
    locations: &[Arc<Location>],
    count: usize,
) -> Vec<(Arc<Location>, usize)> {
    let total: u128 = locations.iter().map(|l| l.population as u128).sum();
    if locations.is_empty() || count == 0 {
        return Vec::new();
    }

    let mut shares: Vec<usize> = if total == 0 {
        vec![0; locations.len()]
    } else {
        locations
            .iter()
            .map(|l| (count as u128 * l.population as u128 / total) as usize)
            .collect()
    };
    let assigned: usize = shares.iter().sum();
    shares[0] += count - assigned;

    locations
        .iter()
        .cloned()
        .zip(shares)
        .filter(|(_, share)| *share > 0)
        .collect()
}
