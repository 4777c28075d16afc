//! Common utilities

pub mod time;

pub use time::{current_timestamp_nanos, MockTimeProvider, SystemTimeProvider, TimeProvider};
