//! Price deviation model

mod deviation;

pub use deviation::{deviation, deviation_of};
