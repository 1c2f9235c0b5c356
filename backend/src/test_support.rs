//! Test utilities for the backend crate.
//!
//! Shared by unit tests in `src/` and the integration suites in `tests/`
//! (through the `test-support` feature).

mod clock;
pub mod fixtures;
pub mod http;
pub mod memory;

pub use clock::FixedClock;
