//! Integration test suite for clone-org.
//!
//! These tests run the real components against local stand-ins: a fake
//! GitHub REST server on a loopback socket and git repositories in
//! temporary directories served over `file://`.
//!
//! # Test Categories
//!
//! - `github_lookup`: pagination, skipped pages, lookup failures
//! - `git_clone`: the real `git` executor against local origins
//! - `concurrency`: the permit pool bound under an instrumented executor
//! - `end_to_end`: a full run from lookup to the final state
//!
//! # CI Compatibility
//!
//! No network access is needed; `git` must be on `PATH`.


mod concurrency;
mod end_to_end;
mod github_lookup;
