use crate::types::{Draw, DRAW_SIZE};
use serde::{Deserialize, Serialize};

/// Lowest hit count that pays
pub const MIN_PRIZE_TIER: u8 = 11;

/// Where tier payouts come from during a backtest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayoutMode {
    /// Always use the configured table
    #[default]
    Fixed,
    /// Use the amounts published with the target draw, falling back to the table
    DrawReported,
}

/// Payout per winning combination, one field per tier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PayoutTable {
    pub eleven: f64,
    pub twelve: f64,
    pub thirteen: f64,
    pub fourteen: f64,
    pub fifteen: f64,
    pub ticket_price: f64,
}

impl Default for PayoutTable {
    fn default() -> Self {
        Self {
            eleven: 7.0,
            twelve: 14.0,
            thirteen: 35.0,
            fourteen: 1_700.0,
            fifteen: 1_500_000.0,
            ticket_price: 3.5,
        }
    }
}

impl PayoutTable {
    pub fn amount(&self, tier: u8) -> f64 {
        match tier {
            11 => self.eleven,
            12 => self.twelve,
            13 => self.thirteen,
            14 => self.fourteen,
            15 => self.fifteen,
            _ => 0.0,
        }
    }

    /// A bet of `size` numbers is played as every 15-number combination it contains.
    pub fn ticket_cost(&self, size: usize) -> f64 {
        combinations(size, DRAW_SIZE) as f64 * self.ticket_price
    }

    /// Total prize for a `size`-number bet that matched `hits` numbers of `target`.
    pub fn prize(&self, size: usize, hits: usize, target: &Draw, mode: PayoutMode) -> f64 {
        (MIN_PRIZE_TIER..=DRAW_SIZE as u8)
            .map(|tier| {
                let count = winning_combinations(size, hits, tier);
                if count == 0 {
                    return 0.0;
                }
                let amount = match mode {
                    PayoutMode::Fixed => self.amount(tier),
                    PayoutMode::DrawReported => target
                        .prize_for_tier(tier)
                        .unwrap_or_else(|| self.amount(tier)),
                };
                count as f64 * amount
            })
            .sum()
    }
}

/// Number of 15-number combinations inside a `size`-number bet with exactly
/// `tier` of the `hits` drawn numbers.
pub fn winning_combinations(size: usize, hits: usize, tier: u8) -> u64 {
    let tier = usize::from(tier);
    if hits > size || tier > DRAW_SIZE {
        return 0;
    }
    combinations(hits, tier) * combinations(size - hits, DRAW_SIZE - tier)
}

/// Binomial coefficient; zero when `k > n`.
pub fn combinations(n: usize, k: usize) -> u64 {
    if k > n {
        return 0;
    }
    let k = k.min(n - k);
    let mut result: u64 = 1;
    for i in 0..k {
        result = result * (n - i) as u64 / (i + 1) as u64;
    }
    result
}
