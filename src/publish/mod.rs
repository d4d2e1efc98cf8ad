//! Publishing predictions to the SQLite sink

pub mod sink;

pub use sink::{PredsSink, PublishedRow};
