// src/processing/mod.rs
pub mod indices;
pub mod parallel;
pub mod stats;

// Re-export main components
pub use parallel::{IndexCalculator, ParallelProcessor};
