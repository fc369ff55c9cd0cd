//! Bounded-concurrency cloning.
//!
//! - `executor`: one `git clone --depth 1` per repository
//! - `limiter`: the permit pool capping simultaneous clones
//! - `orchestrator`: schedules every repository and aggregates results

mod executor;
mod limiter;
mod orchestrator;

pub use executor::{CloneExecutor, GitCloner};
pub use limiter::{ConcurrencyLimiter, Permit};
pub use orchestrator::{CloneOrchestrator, CloneReport};
