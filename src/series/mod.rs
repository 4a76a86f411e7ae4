//! Timestamp grid and per-building series expansion.

use chrono::{Datelike, Duration, Months, NaiveDateTime};
use rayon::prelude::*;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::domain::{Building, ConsumptionPoint, Frequency, Step};
use crate::engine::LoadModel;
use crate::error::{GenerationError, GenerationResult};

/// Regular timestamps from `start` through `end`.
///
/// `start` is always the first tick and `end` is included when it lands on
/// a tick. Monthly grids step by calendar months from `start`, clamping the
/// day to the end of shorter months.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickGrid {
    start: NaiveDateTime,
    end: NaiveDateTime,
    freq: Frequency,
    len: usize,
}

impl TickGrid {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime, freq: Frequency) -> GenerationResult<Self> {
        if end <= start {
            return Err(GenerationError::invalid(format!(
                "end ({}) must be after start ({})",
                end, start
            )));
        }

        let len = match freq.step() {
            Step::Fixed(step) => {
                let span = (end - start).num_seconds();
                (span / step.num_seconds()) as usize + 1
            }
            Step::Months(months) => {
                let mut elapsed = (end.year() - start.year()) * 12 + end.month() as i32
                    - start.month() as i32;
                while elapsed > 0
                    && start
                        .checked_add_months(Months::new(elapsed as u32))
                        .map_or(true, |tick| tick > end)
                {
                    elapsed -= 1;
                }
                (elapsed.max(0) as u32 / months) as usize + 1
            }
        };

        Ok(Self {
            start,
            end,
            freq,
            len,
        })
    }

    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    pub fn end(&self) -> NaiveDateTime {
        self.end
    }

    pub fn freq(&self) -> Frequency {
        self.freq
    }

    /// Number of ticks, computed by calendar arithmetic
    pub fn expected_len(&self) -> usize {
        self.len
    }

    /// The `index`-th tick, or `None` past the end of the grid
    pub fn tick(&self, index: usize) -> Option<NaiveDateTime> {
        if index >= self.len {
            return None;
        }
        match self.freq.step() {
            Step::Fixed(step) => self
                .start
                .checked_add_signed(Duration::seconds(step.num_seconds() * index as i64)),
            Step::Months(months) => self
                .start
                .checked_add_months(Months::new(months * index as u32)),
        }
    }

    pub fn iter(&self) -> Ticks {
        Ticks {
            grid: *self,
            next: 0,
        }
    }
}

impl IntoIterator for &TickGrid {
    type Item = NaiveDateTime;
    type IntoIter = Ticks;

    fn into_iter(self) -> Ticks {
        self.iter()
    }
}

/// Lazy iterator over a [`TickGrid`]; clone it to restart
#[derive(Debug, Clone)]
pub struct Ticks {
    grid: TickGrid,
    next: usize,
}

impl Iterator for Ticks {
    type Item = NaiveDateTime;

    fn next(&mut self) -> Option<Self::Item> {
        let tick = self.grid.tick(self.next)?;
        self.next += 1;
        Some(tick)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.grid.len.saturating_sub(self.next);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Ticks {}

/// Walks the grid for each building and asks the model for every reading
pub struct SeriesExpander<'a, M: LoadModel + ?Sized> {
    model: &'a M,
    grid: TickGrid,
}

impl<'a, M: LoadModel + ?Sized> SeriesExpander<'a, M> {
    pub fn new(model: &'a M, grid: TickGrid) -> Self {
        Self { model, grid }
    }

    pub fn grid(&self) -> &TickGrid {
        &self.grid
    }

    pub fn expand<'b>(
        &'b self,
        building: &'b Building,
    ) -> impl Iterator<Item = ConsumptionPoint> + 'b {
        let model: &'b M = self.model;
        self.grid.iter().map(move |timestamp| ConsumptionPoint {
            unique_id: building.unique_id.clone(),
            timestamp,
            y: model.value_at(building, timestamp),
        })
    }

    /// Expand every building on `pool`, one task per building.
    ///
    /// The token is checked before each building starts; once it fires, the
    /// whole expansion fails with [`GenerationError::Cancelled`] and no
    /// series are returned.
    pub fn expand_all(
        &self,
        buildings: &[Building],
        pool: &rayon::ThreadPool,
        cancel: &CancellationToken,
    ) -> GenerationResult<Vec<Vec<ConsumptionPoint>>> {
        let expected = self.grid.expected_len();

        let series = pool.install(|| {
            buildings
                .par_iter()
                .map(|building| {
                    if cancel.is_cancelled() {
                        return Err(GenerationError::Cancelled);
                    }
                    let points: Vec<ConsumptionPoint> = self.expand(building).collect();
                    if let Err(err) = self.check(building, &points, expected) {
                        error!(unique_id = %building.unique_id, error = %err, "series failed validation");
                        return Err(err);
                    }
                    debug!(unique_id = %building.unique_id, points = points.len(), "series expanded");
                    Ok(points)
                })
                .collect::<GenerationResult<Vec<_>>>()
        })?;

        info!(
            buildings = buildings.len(),
            points_per_building = expected,
            threads = pool.current_num_threads(),
            "series expansion complete"
        );
        Ok(series)
    }

    fn check(
        &self,
        building: &Building,
        points: &[ConsumptionPoint],
        expected: usize,
    ) -> GenerationResult<()> {
        if points.len() != expected {
            return Err(GenerationError::GenerationFailure(format!(
                "building {} produced {} points, expected {}",
                building.unique_id,
                points.len(),
                expected
            )));
        }
        if let Some(bad) = points.iter().find(|p| !p.y.is_finite() || p.y < 0.0) {
            return Err(GenerationError::GenerationFailure(format!(
                "building {} produced invalid reading {} at {}",
                building.unique_id, bad.y, bad.timestamp
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::profiles::default_profile;
    use crate::domain::{BuildingClass, Location, Region};
    use chrono::NaiveDate;
    use proptest::prelude::*;
    use rstest::rstest;
    use std::sync::Arc;

    fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    struct Constant(f64);

    impl LoadModel for Constant {
        fn value_at(&self, _building: &Building, _timestamp: NaiveDateTime) -> f64 {
            self.0
        }
    }

    fn buildings(n: u64) -> Vec<Building> {
        let location = Arc::new(Location::new("Ipoh", "Perak", Region::Northern, 657_000, 4.6, 101.1));
        (0..n)
            .map(|i| Building {
                unique_id: Arc::from(format!("{:016x}", i)),
                building_id: format!("MY_PER_{:06}", i + 1),
                location_id: location.location_id(),
                location: location.clone(),
                class: BuildingClass::Retail,
                profile: default_profile(BuildingClass::Retail),
                cluster_size: 1,
                latitude: 4.6,
                longitude: 101.1,
                freq: Frequency::Hourly,
                noise_seed: i,
            })
            .collect()
    }

    fn pool() -> rayon::ThreadPool {
        rayon::ThreadPoolBuilder::new().num_threads(2).build().unwrap()
    }

    #[rstest]
    #[case(Frequency::FiveMinutes, at(2024, 1, 1, 0), at(2024, 1, 2, 0), 289)]
    #[case(Frequency::FifteenMinutes, at(2024, 1, 1, 0), at(2024, 1, 2, 0), 97)]
    #[case(Frequency::ThirtyMinutes, at(2024, 1, 1, 0), at(2024, 1, 2, 0), 49)]
    #[case(Frequency::Hourly, at(2024, 1, 1, 0), at(2024, 1, 2, 0), 25)]
    #[case(Frequency::TwoHourly, at(2024, 1, 1, 0), at(2024, 1, 2, 0), 13)]
    #[case(Frequency::SixHourly, at(2024, 1, 1, 0), at(2024, 1, 2, 0), 5)]
    #[case(Frequency::TwelveHourly, at(2024, 1, 1, 0), at(2024, 1, 2, 0), 3)]
    #[case(Frequency::Daily, at(2024, 1, 1, 0), at(2024, 1, 31, 0), 31)]
    #[case(Frequency::Weekly, at(2024, 1, 1, 0), at(2024, 1, 31, 0), 5)]
    #[case(Frequency::Monthly, at(2024, 1, 1, 0), at(2024, 12, 1, 0), 12)]
    #[case(Frequency::Monthly, at(2024, 1, 1, 0), at(2024, 11, 30, 0), 11)]
    #[case(Frequency::Hourly, at(2024, 1, 1, 0), at(2024, 1, 1, 0) + Duration::minutes(30), 1)]
    #[case(Frequency::Hourly, at(2023, 1, 1, 0), at(2025, 1, 1, 0), 17_545)]
    fn test_expected_len(
        #[case] freq: Frequency,
        #[case] start: NaiveDateTime,
        #[case] end: NaiveDateTime,
        #[case] expected: usize,
    ) {
        let grid = TickGrid::new(start, end, freq).unwrap();
        assert_eq!(grid.expected_len(), expected);
        assert_eq!(grid.iter().count(), expected);
    }

    #[test]
    fn test_empty_or_reversed_range_rejected() {
        let t = at(2024, 1, 1, 0);
        assert!(matches!(
            TickGrid::new(t, t, Frequency::Hourly),
            Err(GenerationError::InvalidRequest(_))
        ));
        assert!(TickGrid::new(t, at(2023, 12, 31, 0), Frequency::Daily).is_err());
    }

    #[test]
    fn test_monthly_ticks_anchor_on_start() {
        let grid = TickGrid::new(at(2024, 1, 31, 0), at(2024, 4, 30, 0), Frequency::Monthly).unwrap();
        let days: Vec<u32> = grid.iter().map(|t| t.day()).collect();
        assert_eq!(days, vec![31, 29, 31, 30]);
    }

    #[test]
    fn test_grid_is_restartable() {
        let grid = TickGrid::new(at(2024, 1, 1, 0), at(2024, 1, 3, 0), Frequency::SixHourly).unwrap();
        let ticks = grid.iter();
        let first: Vec<_> = ticks.clone().collect();
        let second: Vec<_> = ticks.collect();
        assert_eq!(first, second);
        assert_eq!(first.first(), Some(&at(2024, 1, 1, 0)));
        assert_eq!(first.last(), Some(&at(2024, 1, 3, 0)));
        assert_eq!(grid.iter().len(), 9);
    }

    #[test]
    fn test_expand_assigns_building_id() {
        let grid = TickGrid::new(at(2024, 1, 1, 0), at(2024, 1, 2, 0), Frequency::Hourly).unwrap();
        let model = Constant(2.5);
        let expander = SeriesExpander::new(&model, grid);
        let fleet = buildings(1);
        let points: Vec<_> = expander.expand(&fleet[0]).collect();
        assert_eq!(points.len(), 25);
        assert!(points.iter().all(|p| p.unique_id == fleet[0].unique_id && p.y == 2.5));
    }

    #[test]
    fn test_expand_all_keeps_building_order() {
        let grid = TickGrid::new(at(2024, 1, 1, 0), at(2024, 1, 2, 0), Frequency::Hourly).unwrap();
        let model = Constant(1.0);
        let fleet = buildings(8);
        let series = SeriesExpander::new(&model, grid)
            .expand_all(&fleet, &pool(), &CancellationToken::new())
            .unwrap();
        assert_eq!(series.len(), 8);
        for (building, points) in fleet.iter().zip(&series) {
            assert_eq!(points.len(), 25);
            assert_eq!(points[0].unique_id, building.unique_id);
        }
    }

    #[test]
    fn test_cancelled_expansion_returns_nothing() {
        let grid = TickGrid::new(at(2024, 1, 1, 0), at(2024, 1, 2, 0), Frequency::Hourly).unwrap();
        let model = Constant(1.0);
        let cancel = CancellationToken::new();
        cancel.cancel();
        let err = SeriesExpander::new(&model, grid)
            .expand_all(&buildings(4), &pool(), &cancel)
            .unwrap_err();
        assert_eq!(err, GenerationError::Cancelled);
    }

    #[test]
    fn test_non_finite_reading_fails_generation() {
        let grid = TickGrid::new(at(2024, 1, 1, 0), at(2024, 1, 2, 0), Frequency::Hourly).unwrap();
        let model = Constant(f64::NAN);
        let err = SeriesExpander::new(&model, grid)
            .expand_all(&buildings(2), &pool(), &CancellationToken::new())
            .unwrap_err();
        assert!(matches!(err, GenerationError::GenerationFailure(_)));
    }

    proptest! {
        #[test]
        fn prop_fixed_grid_is_contiguous(
            freq_index in 0usize..9,
            start_offset in 0i64..100_000,
            span_minutes in 1i64..200_000,
        ) {
            let freqs = [
                Frequency::FiveMinutes,
                Frequency::FifteenMinutes,
                Frequency::ThirtyMinutes,
                Frequency::Hourly,
                Frequency::TwoHourly,
                Frequency::SixHourly,
                Frequency::TwelveHourly,
                Frequency::Daily,
                Frequency::Weekly,
            ];
            let freq = freqs[freq_index];
            let Step::Fixed(step) = freq.step() else { unreachable!() };
            let start = at(2024, 1, 1, 0) + Duration::minutes(start_offset);
            let end = start + Duration::minutes(span_minutes);

            let grid = TickGrid::new(start, end, freq).unwrap();
            let ticks: Vec<_> = grid.iter().collect();
            prop_assert_eq!(ticks.len(), grid.expected_len());
            prop_assert_eq!(ticks[0], start);
            prop_assert!(*ticks.last().unwrap() <= end);
            prop_assert!(*ticks.last().unwrap() + step > end);
            for pair in ticks.windows(2) {
                prop_assert_eq!(pair[1] - pair[0], step);
            }
        }
    }
}
