//! Crime catalog and unlock gate.
//!
//! Crimes are static definitions keyed by a stable id. Each one unlocks at
//! a rank (see [`crate::ranks`]), pays out cash, experience and respect on
//! success, raises (or lowers) heat, and jails the player on failure.
//!
//! ```
//! use mobrank_logic::crimes::{find_crime, can_attempt};
//!
//! let bank = find_crime("rob_bank").unwrap();
//! assert!(!can_attempt(bank, 0));
//! assert!(can_attempt(bank, 15_000));
//! ```

use serde::Serialize;

use crate::ranks::{self, RANKS};

/// Cash effect of a successful crime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CashReward {
    /// Uniform draw in `[min, max]`, inclusive.
    Range { min: i64, max: i64 },
    /// Fixed delta. Negative values are costs.
    Fixed(i64),
}

impl CashReward {
    /// Up-front cash a player needs before attempting.
    pub fn cost(&self) -> i64 {
        match *self {
            CashReward::Fixed(delta) if delta < 0 => -delta,
            _ => 0,
        }
    }
}

/// A crime definition.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CrimeDef {
    pub id: &'static str,
    pub name: &'static str,
    /// Ladder index of the lowest rank allowed to attempt this crime.
    pub unlock_rank: usize,
    pub experience: u64,
    pub cash: CashReward,
    pub respect: i64,
    pub heat: i64,
    /// Seconds in jail on failure.
    pub jail_secs: i64,
    /// Base probability of success (0.0–1.0).
    pub success_rate: f64,
}

impl CrimeDef {
    pub fn unlock_rank_name(&self) -> &'static str {
        RANKS[self.unlock_rank].name
    }
}

const CRIMES: [CrimeDef; 12] = [
    CrimeDef {
        id: "pickpocket",
        name: "Pickpocket a tourist",
        unlock_rank: 0,
        experience: 10,
        cash: CashReward::Range { min: 10, max: 50 },
        respect: 0,
        heat: 1,
        jail_secs: 60,
        success_rate: 0.85,
    },
    CrimeDef {
        id: "shoplift",
        name: "Shoplift from the corner store",
        unlock_rank: 0,
        experience: 15,
        cash: CashReward::Range { min: 20, max: 80 },
        respect: 0,
        heat: 2,
        jail_secs: 120,
        success_rate: 0.75,
    },
    CrimeDef {
        id: "mug",
        name: "Mug a passer-by",
        unlock_rank: 1,
        experience: 25,
        cash: CashReward::Range { min: 50, max: 150 },
        respect: 1,
        heat: 3,
        jail_secs: 180,
        success_rate: 0.7,
    },
    CrimeDef {
        id: "bribe_cop",
        name: "Bribe a beat cop",
        unlock_rank: 2,
        experience: 20,
        cash: CashReward::Fixed(-200),
        respect: 1,
        heat: -10,
        jail_secs: 300,
        success_rate: 0.7,
    },
    CrimeDef {
        id: "steal_car",
        name: "Steal a car",
        unlock_rank: 2,
        experience: 50,
        cash: CashReward::Range { min: 200, max: 600 },
        respect: 2,
        heat: 5,
        jail_secs: 300,
        success_rate: 0.6,
    },
    CrimeDef {
        id: "extortion",
        name: "Shake down a shopkeeper",
        unlock_rank: 3,
        experience: 90,
        cash: CashReward::Range { min: 500, max: 1_200 },
        respect: 3,
        heat: 6,
        jail_secs: 420,
        success_rate: 0.55,
    },
    CrimeDef {
        id: "armed_robbery",
        name: "Armed robbery",
        unlock_rank: 4,
        experience: 160,
        cash: CashReward::Range {
            min: 1_000,
            max: 3_000,
        },
        respect: 5,
        heat: 10,
        jail_secs: 600,
        success_rate: 0.5,
    },
    CrimeDef {
        id: "smuggling",
        name: "Run contraband through the docks",
        unlock_rank: 5,
        experience: 300,
        cash: CashReward::Range {
            min: 2_500,
            max: 6_000,
        },
        respect: 8,
        heat: 12,
        jail_secs: 900,
        success_rate: 0.45,
    },
    CrimeDef {
        id: "rob_bank",
        name: "Rob a bank",
        unlock_rank: 6,
        experience: 600,
        cash: CashReward::Range {
            min: 8_000,
            max: 20_000,
        },
        respect: 12,
        heat: 20,
        jail_secs: 1_800,
        success_rate: 0.35,
    },
    CrimeDef {
        id: "casino_heist",
        name: "Hit the casino vault",
        unlock_rank: 7,
        experience: 1_200,
        cash: CashReward::Range {
            min: 20_000,
            max: 50_000,
        },
        respect: 20,
        heat: 25,
        jail_secs: 2_700,
        success_rate: 0.3,
    },
    CrimeDef {
        id: "hijack_shipment",
        name: "Hijack an armored shipment",
        unlock_rank: 8,
        experience: 2_500,
        cash: CashReward::Range {
            min: 50_000,
            max: 120_000,
        },
        respect: 35,
        heat: 30,
        jail_secs: 3_600,
        success_rate: 0.25,
    },
    CrimeDef {
        id: "take_over_city",
        name: "Take over the city's rackets",
        unlock_rank: 9,
        experience: 6_000,
        cash: CashReward::Range {
            min: 150_000,
            max: 400_000,
        },
        respect: 60,
        heat: 40,
        jail_secs: 7_200,
        success_rate: 0.2,
    },
];

/// Every crime, in unlock order.
pub fn catalog() -> &'static [CrimeDef] {
    &CRIMES
}

/// Look up a crime by id.
pub fn find_crime(id: &str) -> Option<&'static CrimeDef> {
    CRIMES.iter().find(|c| c.id == id)
}

/// Rank gate: the player's rank index must reach the crime's unlock rank.
pub fn can_attempt(crime: &CrimeDef, experience: u64) -> bool {
    ranks::rank_index_for(experience) >= crime.unlock_rank
}

/// Crimes a player with `experience` may attempt.
pub fn available_crimes(experience: u64) -> Vec<&'static CrimeDef> {
    CRIMES.iter().filter(|c| can_attempt(c, experience)).collect()
}
