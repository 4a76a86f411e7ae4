//! Request orchestration: validation, roster, series expansion and packaging.

pub mod report;

pub use report::{GenerationReport, LocationAnalysis, SummaryStats};

use rand::Rng;
use serde::Serialize;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::catalog::ReferenceCatalog;
use crate::domain::{BuildingClass, BuildingRecord, ConsumptionPoint, GenerationRequest};
use crate::engine::PatternEngine;
use crate::error::{ErrorBody, GenerationError, GenerationResult};
use crate::roster::RosterBuilder;
use crate::series::{SeriesExpander, TickGrid};

/// Limits and switches applied to every request
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorSettings {
    /// Worker threads for series expansion; 0 uses one per CPU
    pub workers: usize,
    pub max_buildings: usize,
    /// Upper bound on buildings x ticks
    pub max_rows: usize,
    pub special_events: bool,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            workers: 0,
            max_buildings: 10_000,
            max_rows: 50_000_000,
            special_events: false,
        }
    }
}

/// A complete dataset: both tables plus statistics
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedDataset {
    pub run_id: Uuid,
    /// Seed the run was generated from; replaying it reproduces the dataset
    pub seed: u64,
    pub dataset: String,
    pub buildings: Vec<BuildingRecord>,
    pub series: Vec<ConsumptionPoint>,
    pub summary: SummaryStats,
    pub class_distribution: Vec<(BuildingClass, usize)>,
    pub locations: Vec<LocationAnalysis>,
    #[serde(skip)]
    request: GenerationRequest,
}

impl GeneratedDataset {
    pub fn report(&self) -> GenerationReport {
        GenerationReport {
            run_id: self.run_id,
            seed: self.seed,
            dataset: self.dataset.clone(),
            start: self.request.start(),
            end: self.request.end(),
            freq: self.request.frequency(),
            summary: self.summary.clone(),
            class_distribution: self.class_distribution.clone(),
            locations: self.locations.clone(),
        }
    }
}

/// Success flag plus either a report or an error body
#[derive(Debug, Clone, Serialize)]
pub struct GenerationOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<GenerationReport>,
}

impl GenerationOutcome {
    pub fn from_result(result: &GenerationResult<GeneratedDataset>) -> Self {
        match result {
            Ok(dataset) => Self {
                success: true,
                error: None,
                report: Some(dataset.report()),
            },
            Err(error) => Self {
                success: false,
                error: Some(error.body()),
                report: None,
            },
        }
    }
}

pub struct Generator {
    catalog: Arc<ReferenceCatalog>,
    settings: GeneratorSettings,
    pool: rayon::ThreadPool,
}

impl Generator {
    pub fn new(catalog: Arc<ReferenceCatalog>, settings: GeneratorSettings) -> GenerationResult<Self> {
        let workers = if settings.workers == 0 {
            num_cpus::get()
        } else {
            settings.workers
        };
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("series-worker-{}", i))
            .build()?;

        info!(workers, max_buildings = settings.max_buildings, "generator ready");
        Ok(Self {
            catalog,
            settings,
            pool,
        })
    }

    pub fn catalog(&self) -> &ReferenceCatalog {
        &self.catalog
    }

    pub fn settings(&self) -> &GeneratorSettings {
        &self.settings
    }

    /// Generate a full dataset for `request`.
    ///
    /// Blocks the calling thread while the worker pool expands series. Any
    /// failure, including cancellation through `cancel`, discards all work.
    pub fn generate(
        &self,
        request: &GenerationRequest,
        cancel: &CancellationToken,
    ) -> GenerationResult<GeneratedDataset> {
        if cancel.is_cancelled() {
            return Err(GenerationError::Cancelled);
        }

        let count = request.num_buildings();
        if count > self.settings.max_buildings {
            return Err(GenerationError::invalid(format!(
                "num_buildings ({}) exceeds the limit of {}",
                count, self.settings.max_buildings
            )));
        }

        let grid = TickGrid::new(request.start(), request.end(), request.frequency())?;
        let rows = count.checked_mul(grid.expected_len()).unwrap_or(usize::MAX);
        if rows > self.settings.max_rows {
            return Err(GenerationError::invalid(format!(
                "request would produce {} rows, limit is {}",
                rows, self.settings.max_rows
            )));
        }

        let seed = match request.seed() {
            Some(seed) => seed,
            None => {
                let seed: u64 = rand::thread_rng().gen();
                info!(seed, "no seed supplied, drew one from entropy");
                seed
            }
        };
        let run_id = Uuid::new_v4();
        info!(
            %run_id,
            buildings = count,
            ticks = grid.expected_len(),
            freq = %request.frequency(),
            "starting generation"
        );

        let buildings = RosterBuilder::new(&self.catalog).build(request, seed)?;

        let engine = PatternEngine::new()
            .with_holidays(request.holidays().iter().copied())
            .with_special_events(self.settings.special_events);
        let series = SeriesExpander::new(&engine, grid)
            .expand_all(&buildings, &self.pool, cancel)
            .map_err(|err| {
                match &err {
                    GenerationError::Cancelled => warn!(%run_id, "generation cancelled"),
                    _ => error!(%run_id, error = %err, "generation failed"),
                }
                err
            })?;

        if cancel.is_cancelled() {
            warn!(%run_id, "cancelled after expansion, discarding dataset");
            return Err(GenerationError::Cancelled);
        }

        let summary = SummaryStats::compute(&buildings, &series);
        let class_distribution = report::class_counts(&buildings);
        let locations = report::location_analysis(&buildings, &series);
        let records = buildings
            .iter()
            .map(|b| b.record(request.dataset()))
            .collect();
        let mut rows = Vec::with_capacity(summary.total_records);
        for points in series {
            rows.extend(points);
        }

        info!(
            %run_id,
            rows = summary.total_records,
            avg = summary.avg_consumption,
            "generation complete"
        );

        Ok(GeneratedDataset {
            run_id,
            seed,
            dataset: request.dataset().to_string(),
            buildings: records,
            series: rows,
            summary,
            class_distribution,
            locations,
            request: request.clone(),
        })
    }

    /// [`Generator::generate`] wrapped in the external `{success, error}` envelope
    pub fn generate_outcome(
        &self,
        request: &GenerationRequest,
        cancel: &CancellationToken,
    ) -> GenerationOutcome {
        GenerationOutcome::from_result(&self.generate(request, cancel))
    }
}
