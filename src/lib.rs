//! Synthetic electricity-consumption datasets for buildings in Malaysia.
//!
//! A [`generator::Generator`] turns a [`domain::GenerationRequest`] into a
//! building metadata table and a gap-free time series per building. Loads
//! follow the class's daily rhythm, the tropical seasons, the Malaysian
//! working week and the fasting month, plus bounded noise, and are fully
//! reproducible from the run seed.

pub mod catalog;
pub mod config;
pub mod domain;
pub mod engine;
pub mod error;
pub mod generator;
pub mod roster;
pub mod series;
pub mod telemetry;
pub mod utils;

pub use catalog::ReferenceCatalog;
pub use error::{GenerationError, GenerationResult};
pub use generator::{GeneratedDataset, GenerationOutcome, Generator, GeneratorSettings};
