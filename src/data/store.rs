//! CSV persistence for every tabular hand-off
//!
//! Pipeline stages communicate through files, so each stage can run as a
//! separate process. Row-level failures carry the file path and surface as
//! schema errors.

use crate::{EngineeredRecord, HoopsError, PredictionRecord, Result, SeasonRecord};
use serde::de::DeserializeOwned;
use serde::Serialize;

fn read_csv<T: DeserializeOwned>(path: &str) -> Result<Vec<T>> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut records = Vec::new();
    for row in reader.deserialize() {
        let record: T =
            row.map_err(|e| HoopsError::Schema(format!("Malformed row in {}: {}", path, e)))?;
        records.push(record);
    }
    Ok(records)
}

fn write_csv<T: Serialize>(path: &str, records: &[T]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}

/// Read the raw season dataset
pub fn read_season_records(path: &str) -> Result<Vec<SeasonRecord>> {
    read_csv(path)
}

/// Read the engineered dataset produced by the engineer stage
pub fn read_engineered_records(path: &str) -> Result<Vec<EngineeredRecord>> {
    read_csv(path)
}

/// Write the engineered dataset
pub fn write_engineered_records(path: &str, records: &[EngineeredRecord]) -> Result<()> {
    write_csv(path, records)
}

/// Read predictions for publishing
pub fn read_predictions(path: &str) -> Result<Vec<PredictionRecord>> {
    read_csv(path)
}

/// Write predictions from the predict stage
pub fn write_predictions(path: &str, records: &[PredictionRecord]) -> Result<()> {
    write_csv(path, records)
}
