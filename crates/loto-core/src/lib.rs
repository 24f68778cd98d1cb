// # loto-core
//
// Core library for the lottery results pipeline.
//
// ## Architecture Overview
//
// - **PageFetcher**: Trait for retrieving the raw results page
// - **TokenStrategy**: Trait for locating candidate numbers in a parsed page
// - **Extractor**: Validates candidates and assembles a `DrawResult`
// - **Pipeline**: One fetch followed by one extraction (`refresh()`)
// - **DrawCoordinator**: Timer-driven cycles and atomic publication
// - **DrawField**: The eight addressable fields of a draw
//
// ## Design Principles
//
// 1. **Separation of Concerns**: Fetching, scanning and publishing are separate
// 2. **Injected State**: The timer, last record and availability live in the coordinator
// 3. **Swappable Extraction**: The heuristic scan sits behind a trait
// 4. **Library-First**: The daemon is a thin layer over this crate
// 5. **Explicit Failure Policy**: Strict or lenient, never mixed

pub mod config;
pub mod draw;
pub mod engine;
pub mod error;
pub mod extract;
pub mod field;
pub mod pipeline;
pub mod state;
pub mod traits;

// Re-export core types for convenience
pub use config::{DrawDateConfig, ExtractionConfig, FailurePolicy, LotoConfig, SourceConfig};
pub use draw::{DrawResult, RecordOrigin};
pub use engine::{CoordinatorEvent, DrawCoordinator};
pub use error::{ConnectivityCause, Error, Result};
pub use extract::{DrawDateSource, Extractor, SelectorStrategy, SpanScanStrategy};
pub use field::{DrawField, FieldReading, FieldValue};
pub use pipeline::Pipeline;
pub use state::{SharedState, Snapshot};
pub use traits::{PageFetcher, PageFetcherFactory, TokenStrategy};
