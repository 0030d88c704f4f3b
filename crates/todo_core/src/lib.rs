//! Todo core: pure domain types for the ordered fetch pipeline.
mod config;
mod item;
mod store;
mod target;

pub use config::{
    RunConfig, DEFAULT_COUNT, DEFAULT_DEADLINE, DEFAULT_ENDPOINT, DEFAULT_HTTP_TIMEOUT,
    DEFAULT_INITIAL_CAPACITY, DEFAULT_WORKERS,
};
pub use item::{InvalidItem, Item};
pub use store::ResultStore;
pub use target::{FetchTarget, Sequence, StepGenerator, TargetGenerator};
