//! Todo engine: HTTP fetching and the ordered concurrent fetch pipeline.
mod decode;
mod fetch;
mod orchestrator;
mod types;

pub use decode::{decode_item, DecodeError};
pub use fetch::{FetchSettings, Fetcher, ReqwestFetcher};
pub use orchestrator::{Orchestrator, RunReport, StopCause};
pub use types::{FailureKind, FetchError, FetchOutput, TaskError};

pub use tokio_util::sync::CancellationToken;
