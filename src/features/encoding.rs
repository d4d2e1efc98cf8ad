//! Ordinal encoding of postseason outcomes
//!
//! The eight tournament finishes form a fixed ladder from missing the
//! tournament (rank 0) up to winning it (rank 7). Encoding is by table,
//! never inferred from the data, so ranks stay stable across datasets.

use crate::{HoopsError, Result};
use std::fmt;

/// A postseason finish, ordered worst to best
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum OutcomeRank {
    DidntMake,
    RoundOf64,
    RoundOf32,
    SweetSixteen,
    EliteEight,
    FinalFour,
    Finals,
    Champions,
}

impl OutcomeRank {
    /// All ranks in ordinal order
    pub const ALL: [OutcomeRank; 8] = [
        OutcomeRank::DidntMake,
        OutcomeRank::RoundOf64,
        OutcomeRank::RoundOf32,
        OutcomeRank::SweetSixteen,
        OutcomeRank::EliteEight,
        OutcomeRank::FinalFour,
        OutcomeRank::Finals,
        OutcomeRank::Champions,
    ];

    /// The dataset label for this rank
    pub fn label(&self) -> &'static str {
        match self {
            OutcomeRank::DidntMake => "DIDNT_MAKE",
            OutcomeRank::RoundOf64 => "R64",
            OutcomeRank::RoundOf32 => "R32",
            OutcomeRank::SweetSixteen => "Sweet Sixteen",
            OutcomeRank::EliteEight => "Elite Eight",
            OutcomeRank::FinalFour => "Final Four",
            OutcomeRank::Finals => "Finals",
            OutcomeRank::Champions => "CHAMPS",
        }
    }

    /// Parse a dataset label; `R68` is not in the vocabulary because
    /// feature engineering folds it into `DIDNT_MAKE` first
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "DIDNT_MAKE" => Some(OutcomeRank::DidntMake),
            "R64" => Some(OutcomeRank::RoundOf64),
            "R32" => Some(OutcomeRank::RoundOf32),
            "Sweet Sixteen" => Some(OutcomeRank::SweetSixteen),
            "Elite Eight" => Some(OutcomeRank::EliteEight),
            "Final Four" => Some(OutcomeRank::FinalFour),
            "Finals" => Some(OutcomeRank::Finals),
            "CHAMPS" => Some(OutcomeRank::Champions),
            _ => None,
        }
    }

    /// This rank's position on the outcome ladder, 0-7
    pub fn ordinal(&self) -> u8 {
        *self as u8
    }

    pub fn from_ordinal(ordinal: u8) -> Option<Self> {
        Self::ALL.get(ordinal as usize).copied()
    }

    /// The result phrase published alongside the rank
    pub fn phrase(&self) -> &'static str {
        match self {
            OutcomeRank::DidntMake => {
                "Sorry, your team did not qualify for the tournament. Better luck next year!"
            }
            OutcomeRank::RoundOf64 => "Congrats! Your team made it to the Round of 64!",
            OutcomeRank::RoundOf32 => "Wow! Your team made it to the Round of 32!",
            OutcomeRank::SweetSixteen => "Sensational! Your team made it to the Sweet Sixteen!",
            OutcomeRank::EliteEight => "Amazing! Your team made it to the Elite Eight!",
            OutcomeRank::FinalFour => "Unbelievable! Your team made it to the Final Four!",
            OutcomeRank::Finals => "Holy cow! Your team made it to the Finals!",
            OutcomeRank::Champions => "YOUR TEAM WAS CROWNED CHAMPIONS!!!",
        }
    }
}

impl fmt::Display for OutcomeRank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Encode outcome labels to ordinal ranks, rejecting anything outside
/// the eight-value vocabulary
pub fn encode_labels(labels: &[&str]) -> Result<Vec<u8>> {
    labels
        .iter()
        .map(|label| {
            OutcomeRank::from_label(label)
                .map(|rank| rank.ordinal())
                .ok_or_else(|| HoopsError::Encoding(format!("Unknown outcome label: {}", label)))
        })
        .collect()
}

/// Decode an ordinal rank back to its outcome
pub fn decode_rank(ordinal: u8) -> Result<OutcomeRank> {
    OutcomeRank::from_ordinal(ordinal)
        .ok_or_else(|| HoopsError::Encoding(format!("Ordinal rank out of range: {}", ordinal)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordinals_cover_zero_to_seven() {
        for (i, rank) in OutcomeRank::ALL.iter().enumerate() {
            assert_eq!(rank.ordinal(), i as u8);
            assert_eq!(OutcomeRank::from_ordinal(i as u8), Some(*rank));
        }
        assert_eq!(OutcomeRank::from_ordinal(8), None);
    }

    #[test]
    fn test_label_round_trip() {
        for rank in OutcomeRank::ALL {
            assert_eq!(OutcomeRank::from_label(rank.label()), Some(rank));
        }
    }

    #[test]
    fn test_play_in_label_not_in_vocabulary() {
        assert_eq!(OutcomeRank::from_label("R68"), None);
        assert!(encode_labels(&["R64", "R68"]).is_err());
    }

    #[test]
    fn test_encode_labels() {
        let ranks = encode_labels(&["DIDNT_MAKE", "CHAMPS", "Sweet Sixteen"]).unwrap();
        assert_eq!(ranks, vec![0, 7, 3]);
    }

    #[test]
    fn test_decode_rank_phrases() {
        assert_eq!(
            decode_rank(0).unwrap().phrase(),
            "Sorry, your team did not qualify for the tournament. Better luck next year!"
        );
        assert_eq!(
            decode_rank(7).unwrap().phrase(),
            "YOUR TEAM WAS CROWNED CHAMPIONS!!!"
        );
        assert!(decode_rank(8).is_err());
    }

    #[test]
    fn test_ranks_order_by_finish() {
        assert!(OutcomeRank::DidntMake < OutcomeRank::RoundOf64);
        assert!(OutcomeRank::Finals < OutcomeRank::Champions);
    }
}
