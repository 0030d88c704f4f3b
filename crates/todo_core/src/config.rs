use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "https://jsonplaceholder.typicode.com/todos";
pub const DEFAULT_COUNT: usize = 20;
pub const DEFAULT_WORKERS: usize = 5;
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_DEADLINE: Duration = Duration::from_secs(180);
pub const DEFAULT_INITIAL_CAPACITY: usize = 64;

/// Parameters for one run. Fixed once the run starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    /// Number of fetches to dispatch.
    pub count: usize,
    /// Maximum number of fetches in flight at once.
    pub worker_limit: usize,
    /// Per-request timeout, including connect and body read.
    pub http_timeout: Duration,
    /// Budget for the whole run, measured from the start of dispatch.
    pub overall_deadline: Duration,
    pub debug: bool,
    pub initial_capacity: usize,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            count: DEFAULT_COUNT,
            worker_limit: DEFAULT_WORKERS,
            http_timeout: DEFAULT_HTTP_TIMEOUT,
            overall_deadline: DEFAULT_DEADLINE,
            debug: false,
            initial_capacity: DEFAULT_INITIAL_CAPACITY,
        }
    }
}

impl RunConfig {
    /// Worker limit as used by the pool; zero would never dispatch anything.
    pub fn effective_workers(&self) -> usize {
        self.worker_limit.max(1)
    }
}
