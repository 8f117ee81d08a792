//! Integration tests for Speech-Harvest
//!
//! The crawler tests run against wiremock servers; the orchestrator tests
//! run small `sh` job scripts in temporary directories.

mod links_tests;
#[cfg(unix)]
mod orchestrator_tests;
