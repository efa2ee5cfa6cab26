//! ABOUTME: Shared test fixtures (sample commands, a deterministic clock) for other crates' tests
//! ABOUTME: Property tests for the cross-cutting invariants in spec §8 live under `tests/`

pub mod fixtures;

pub use fixtures::{sample_ai_command, FakeClock};
