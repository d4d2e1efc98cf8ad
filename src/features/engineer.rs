//! Feature engineering over raw season records
//!
//! Adds the conference strength and proportion features the model trains
//! on, and normalizes the play-in outcome label out of the vocabulary.

use crate::{EngineeredRecord, HoopsError, Result, SeasonRecord, INDEPENDENT_CONF};
use std::collections::HashMap;

/// Play-in label collapsed into `DIDNT_MAKE` before encoding
const PLAY_IN_LABEL: &str = "R68";

/// Sentinel conference rating for independent teams, which have no
/// conference to average over
const INDEPENDENT_POWER_RATING: f64 = 0.5;

/// Engineer model features for every record, preserving input order
///
/// Each team gets the mean power rating of its (year, conference) group,
/// win and wins-above-bubble proportions, and a normalized outcome label.
pub fn engineer_features(records: &[SeasonRecord]) -> Result<Vec<EngineeredRecord>> {
    // Sum power ratings per (year, conference) group in one pass
    let mut group_sums: HashMap<(i32, &str), (f64, u32)> = HashMap::new();
    for record in records {
        let entry = group_sums
            .entry((record.year, record.conf.as_str()))
            .or_insert((0.0, 0));
        entry.0 += record.power_rating;
        entry.1 += 1;
    }

    records
        .iter()
        .map(|record| {
            if record.games == 0 {
                return Err(HoopsError::Schema(format!(
                    "Team {} ({}) has zero games played",
                    record.team, record.year
                )));
            }

            let avg_conf_power_rating = if record.conf == INDEPENDENT_CONF {
                INDEPENDENT_POWER_RATING
            } else {
                let (sum, count) = group_sums[&(record.year, record.conf.as_str())];
                sum / count as f64
            };

            let postseason = if record.postseason == PLAY_IN_LABEL {
                "DIDNT_MAKE".to_string()
            } else {
                record.postseason.clone()
            };

            Ok(EngineeredRecord {
                team: record.team.clone(),
                year: record.year,
                conf: record.conf.clone(),
                games: record.games,
                wins: record.wins,
                wab: record.wab,
                power_rating: record.power_rating,
                postseason,
                adjoe: record.adjoe,
                adjde: record.adjde,
                efg_o: record.efg_o,
                efg_d: record.efg_d,
                tor: record.tor,
                tord: record.tord,
                orb: record.orb,
                drb: record.drb,
                ftr: record.ftr,
                ftrd: record.ftrd,
                two_po: record.two_po,
                two_pd: record.two_pd,
                three_po: record.three_po,
                three_pd: record.three_pd,
                adj_t: record.adj_t,
                avg_conf_power_rating,
                win_perc: record.wins as f64 / record.games as f64,
                wab_perc: record.wab / record.games as f64,
            })
        })
        .collect()
}
