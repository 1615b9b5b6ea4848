//! The rank ladder.
//!
//! Rank is never stored as an independent fact: it is always the highest
//! entry whose threshold is at or below the player's experience.
//!
//! | Index | Rank | Minimum experience |
//! |-------|------|--------------------|
//! | 0 | Street Rat | 0 |
//! | 1 | Errand Boy | 100 |
//! | 2 | Associate | 300 |
//! | 3 | Muscle | 800 |
//! | 4 | Enforcer | 2,000 |
//! | 5 | Caporegime | 5,000 |
//! | 6 | Underboss | 15,000 |
//! | 7 | Consigliere | 40,000 |
//! | 8 | Boss | 100,000 |
//! | 9 | Godfather | 250,000 |
//!
//! ```
//! use mobrank_logic::ranks::get_rank;
//!
//! assert_eq!(get_rank(99), "Street Rat");
//! assert_eq!(get_rank(100), "Errand Boy");
//! assert_eq!(get_rank(250_000), "Godfather");
//! ```

use serde::Serialize;

/// One rung of the ladder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RankEntry {
    pub name: &'static str,
    pub min_experience: u64,
}

/// The full ladder, ordered by strictly increasing threshold.
pub const RANKS: [RankEntry; 10] = [
    RankEntry {
        name: "Street Rat",
        min_experience: 0,
    },
    RankEntry {
        name: "Errand Boy",
        min_experience: 100,
    },
    RankEntry {
        name: "Associate",
        min_experience: 300,
    },
    RankEntry {
        name: "Muscle",
        min_experience: 800,
    },
    RankEntry {
        name: "Enforcer",
        min_experience: 2_000,
    },
    RankEntry {
        name: "Caporegime",
        min_experience: 5_000,
    },
    RankEntry {
        name: "Underboss",
        min_experience: 15_000,
    },
    RankEntry {
        name: "Consigliere",
        min_experience: 40_000,
    },
    RankEntry {
        name: "Boss",
        min_experience: 100_000,
    },
    RankEntry {
        name: "Godfather",
        min_experience: 250_000,
    },
];

/// Index of the top rank.
pub const TOP_RANK: usize = RANKS.len() - 1;

/// Index of the highest rank whose threshold is ≤ `experience`.
pub fn rank_index_for(experience: u64) -> usize {
    RANKS
        .iter()
        .rposition(|r| r.min_experience <= experience)
        .unwrap_or(0)
}

/// Rank entry for `experience`.
pub fn rank_for(experience: u64) -> &'static RankEntry {
    &RANKS[rank_index_for(experience)]
}

/// Rank name for `experience`. Total: every experience value has a rank.
pub fn get_rank(experience: u64) -> &'static str {
    rank_for(experience).name
}

/// Ladder position of a rank name, if it is one of ours.
pub fn rank_index(name: &str) -> Option<usize> {
    RANKS.iter().position(|r| r.name == name)
}

/// The rank after `index`, or `None` at the top.
pub fn next_rank(index: usize) -> Option<&'static RankEntry> {
    RANKS.get(index + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thresholds_strictly_increasing() {
        for pair in RANKS.windows(2) {
            assert!(pair[0].min_experience < pair[1].min_experience);
        }
        assert_eq!(RANKS[0].min_experience, 0);
    }

    #[test]
    fn boundary_lookups() {
        assert_eq!(get_rank(0), "Street Rat");
        assert_eq!(get_rank(99), "Street Rat");
        assert_eq!(get_rank(100), "Errand Boy");
        assert_eq!(get_rank(299), "Errand Boy");
        assert_eq!(get_rank(800), "Muscle");
        assert_eq!(get_rank(249_999), "Boss");
        assert_eq!(get_rank(250_000), "Godfather");
        assert_eq!(get_rank(u64::MAX), "Godfather");
    }

    #[test]
    fn every_threshold_maps_to_itself() {
        for (i, entry) in RANKS.iter().enumerate() {
            assert_eq!(rank_index_for(entry.min_experience), i);
            if entry.min_experience > 0 {
                assert_eq!(rank_index_for(entry.min_experience - 1), i - 1);
            }
        }
    }

    #[test]
    fn index_by_name() {
        assert_eq!(rank_index("Street Rat"), Some(0));
        assert_eq!(rank_index("Muscle"), Some(3));
        assert_eq!(rank_index("Godfather"), Some(TOP_RANK));
        assert_eq!(rank_index("Don"), None);
    }

    #[test]
    fn next_rank_stops_at_top() {
        assert_eq!(next_rank(0).map(|r| r.name), Some("Errand Boy"));
        assert!(next_rank(TOP_RANK).is_none());
    }
}
