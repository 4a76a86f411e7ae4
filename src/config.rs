use anyhow::Result;
use chrono::NaiveDate;
use figment::{providers::{Env, Format, Toml}, Figment};
use serde::Deserialize;
use std::time::Duration;

use crate::domain::{CustomLocation, Frequency, GenerationRequest, HolidayWindow, LocationFilter};
use crate::error::{GenerationError, GenerationResult};
use crate::generator::GeneratorSettings;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub generator: GeneratorConfig,
    pub request: RequestConfig,
    #[serde(default)]
    pub holidays: Vec<HolidayWindow>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeneratorConfig {
    pub workers: usize,
    pub max_buildings: usize,
    pub max_rows: usize,
    pub timeout_seconds: u64,
    #[serde(default)]
    pub special_events: bool,
    pub dataset: String,
}

impl GeneratorConfig {
    pub fn settings(&self) -> GeneratorSettings {
        GeneratorSettings {
            workers: self.workers,
            max_buildings: self.max_buildings,
            max_rows: self.max_rows,
            special_events: self.special_events,
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RequestConfig {
    pub num_buildings: usize,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub freq: Frequency,
    pub seed: Option<u64>,
    pub location_filter: Option<LocationFilter>,
    pub custom_location: Option<CustomLocation>,
}

impl Config {
    pub fn figment() -> Figment {
        Figment::new()
            .merge(Toml::file("config/default.toml"))
            .merge(Env::prefixed("MYLOAD__").split("__"))
    }

    pub fn load() -> Result<Self> {
        Self::from_figment(Self::figment())
    }

    pub fn from_figment(figment: Figment) -> Result<Self> {
        Ok(figment.extract()?)
    }

    /// Validated request described by the `[request]` and `[[holidays]]` sections
    pub fn to_request(&self) -> GenerationResult<GenerationRequest> {
        let cfg = &self.request;
        let mut request =
            GenerationRequest::new(cfg.num_buildings, cfg.start_date, cfg.end_date, cfg.freq)?
                .with_holidays(self.holidays.iter().copied())?
                .with_dataset(self.generator.dataset.clone());

        request = match (&cfg.location_filter, &cfg.custom_location) {
            (Some(_), Some(_)) => {
                return Err(GenerationError::invalid(
                    "configure either request.location_filter or request.custom_location, not both",
                ))
            }
            (Some(filter), None) => request.with_filter(filter.clone())?,
            (None, Some(custom)) => request.with_custom_location(custom.clone())?,
            (None, None) => request,
        };

        if let Some(seed) = cfg.seed {
            request = request.with_seed(seed);
        }
        Ok(request)
    }
}
