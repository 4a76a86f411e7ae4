use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::location::TIMEZONE;

/// One reading of one building: a time-series row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsumptionPoint {
    pub unique_id: Arc<str>,
    /// Local wall-clock time in Asia/Kuala_Lumpur
    pub timestamp: NaiveDateTime,
    /// Energy in kWh, never negative
    pub y: f64,
}

impl ConsumptionPoint {
    /// The reading's instant in UTC
    pub fn timestamp_utc(&self) -> Option<DateTime<Utc>> {
        self.timestamp
            .and_local_timezone(TIMEZONE)
            .earliest()
            .map(|local| local.with_timezone(&Utc))
    }
}
