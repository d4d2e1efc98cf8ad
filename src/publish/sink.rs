//! SQLite sink for published predictions

use crate::{PredictionRecord, Result};
use rusqlite::{params, Connection, TransactionBehavior};
use std::path::Path;

/// A published prediction as stored in the sink
#[derive(Debug, Clone, PartialEq)]
pub struct PublishedRow {
    /// Zero-based position at publish time; durable identity is the team
    pub id: i64,
    pub team: String,
    pub pred_factor: u8,
    pub pred_round: String,
}

/// The `preds` table and its full-replace publish
pub struct PredsSink {
    conn: Connection,
}

impl PredsSink {
    /// Open or create the sink at the given path
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        let sink = PredsSink { conn };
        sink.init_schema()?;
        Ok(sink)
    }

    /// Create an in-memory sink (for testing)
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let sink = PredsSink { conn };
        sink.init_schema()?;
        Ok(sink)
    }

    fn init_schema(&self) -> Result<()> {
        self.conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS preds (
                id INTEGER PRIMARY KEY,
                Team TEXT NOT NULL,
                pred_factor INTEGER NOT NULL,
                pred_round TEXT NOT NULL
            );
            "#,
        )?;
        Ok(())
    }

    /// Replace the table contents with this prediction set
    ///
    /// Delete and inserts run inside one immediate transaction: the write
    /// lock is taken up front, readers never observe the empty table, and
    /// any failure rolls back to the previous generation. Row ids are the
    /// zero-based input positions.
    pub fn publish(&mut self, predictions: &[PredictionRecord]) -> Result<usize> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        tx.execute("DELETE FROM preds", [])?;
        for (id, prediction) in predictions.iter().enumerate() {
            tx.execute(
                "INSERT INTO preds (id, Team, pred_factor, pred_round) VALUES (?1, ?2, ?3, ?4)",
                params![
                    id as i64,
                    prediction.team,
                    prediction.pred_factor,
                    prediction.pred_round
                ],
            )?;
        }
        tx.commit()?;

        log::info!("Published {} predictions", predictions.len());
        Ok(predictions.len())
    }

    /// Number of rows currently published
    pub fn count(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM preds", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// All published rows in id order
    pub fn fetch_all(&self) -> Result<Vec<PublishedRow>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, Team, pred_factor, pred_round FROM preds ORDER BY id")?;

        let rows = stmt
            .query_map([], |row| {
                Ok(PublishedRow {
                    id: row.get(0)?,
                    team: row.get(1)?,
                    pred_factor: row.get(2)?,
                    pred_round: row.get(3)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(rows)
    }
}
