//! Train/inference partition of the engineered dataset

use crate::{EngineeredRecord, HoopsError, Result};
use std::collections::HashSet;

/// The engineered dataset split by season year
#[derive(Debug, Clone)]
pub struct SeasonSplit {
    /// Every record outside the target year
    pub train: Vec<EngineeredRecord>,
    /// Every record in the target year, one per team
    pub inference: Vec<EngineeredRecord>,
}

/// Partition records into training data (every year but the target) and
/// the inference set (the target year), preserving input order within
/// each side
///
/// The split is disjoint and complete by construction. An empty inference
/// set means the target year is absent from the data; duplicate team names
/// inside it would make the published predictions ambiguous. Both fail.
pub fn split_by_year(records: Vec<EngineeredRecord>, target_year: i32) -> Result<SeasonSplit> {
    let mut train = Vec::new();
    let mut inference = Vec::new();

    for record in records {
        if record.year == target_year {
            inference.push(record);
        } else {
            train.push(record);
        }
    }

    if inference.is_empty() {
        return Err(HoopsError::Schema(format!(
            "No records found for target year {}",
            target_year
        )));
    }

    let mut seen = HashSet::new();
    for record in &inference {
        if !seen.insert(record.team.as_str()) {
            return Err(HoopsError::Schema(format!(
                "Duplicate team {} in target year {}",
                record.team, target_year
            )));
        }
    }

    Ok(SeasonSplit { train, inference })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_record(team: &str, year: i32) -> EngineeredRecord {
        EngineeredRecord {
            team: team.to_string(),
            year,
            conf: "ACC".to_string(),
            games: 30,
            wins: 24,
            wab: 6.0,
            power_rating: 25.0,
            postseason: "DIDNT_MAKE".to_string(),
            adjoe: 110.0,
            adjde: 95.0,
            efg_o: 52.0,
            efg_d: 48.0,
            tor: 17.0,
            tord: 20.0,
            orb: 30.0,
            drb: 28.0,
            ftr: 35.0,
            ftrd: 30.0,
            two_po: 52.0,
            two_pd: 47.0,
            three_po: 36.0,
            three_pd: 33.0,
            adj_t: 68.0,
            avg_conf_power_rating: 15.0,
            win_perc: 0.8,
            wab_perc: 0.2,
        }
    }

    #[test]
    fn test_split_is_disjoint_and_complete() {
        let records = vec![
            make_record("Duke", 2018),
            make_record("Duke", 2019),
            make_record("Duke", 2020),
            make_record("UNC", 2020),
            make_record("UNC", 2021),
        ];

        let split = split_by_year(records, 2020).unwrap();
        assert_eq!(split.train.len(), 3);
        assert_eq!(split.inference.len(), 2);
        assert!(split.train.iter().all(|r| r.year != 2020));
        assert!(split.inference.iter().all(|r| r.year == 2020));
    }

    #[test]
    fn test_order_preserved_within_sides() {
        let records = vec![
            make_record("Zeta", 2020),
            make_record("Duke", 2019),
            make_record("Alpha", 2020),
            make_record("UNC", 2018),
        ];

        let split = split_by_year(records, 2020).unwrap();
        assert_eq!(split.inference[0].team, "Zeta");
        assert_eq!(split.inference[1].team, "Alpha");
        assert_eq!(split.train[0].team, "Duke");
        assert_eq!(split.train[1].team, "UNC");
    }

    #[test]
    fn test_missing_target_year_rejected() {
        let records = vec![make_record("Duke", 2018), make_record("UNC", 2019)];
        assert!(matches!(
            split_by_year(records, 2020),
            Err(HoopsError::Schema(_))
        ));
    }

    #[test]
    fn test_duplicate_team_in_target_year_rejected() {
        let records = vec![
            make_record("Duke", 2019),
            make_record("Duke", 2020),
            make_record("Duke", 2020),
        ];
        assert!(matches!(
            split_by_year(records, 2020),
            Err(HoopsError::Schema(_))
        ));
    }

    #[test]
    fn test_same_team_across_years_allowed() {
        let records = vec![make_record("Duke", 2019), make_record("Duke", 2020)];
        let split = split_by_year(records, 2020).unwrap();
        assert_eq!(split.train.len(), 1);
        assert_eq!(split.inference.len(), 1);
    }
}
