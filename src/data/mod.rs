//! Data acquisition, persistence, and partitioning
//!
//! Downloading the raw dataset, CSV storage between stages, and the
//! train/inference split.

pub mod fetch;
pub mod partition;
pub mod store;

pub use fetch::DatasetFetcher;
pub use partition::{split_by_year, SeasonSplit};
