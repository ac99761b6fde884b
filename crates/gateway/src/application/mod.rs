pub mod coordinator;

pub use coordinator::{IngestConfig, IngestCoordinator};
