use crate::error::{DrawbiasError, Result};
use chrono::NaiveDate;
use rand::Rng;
use serde::ser::{Serialize, Serializer};
use serde::Deserialize;
use std::fmt;

/// Size of the number universe (1..=25)
pub const UNIVERSE_SIZE: u8 = 25;
/// Numbers per official draw
pub const DRAW_SIZE: usize = 15;
/// Largest bet the game accepts
pub const MAX_CANDIDATE_SIZE: usize = UNIVERSE_SIZE as usize;

/// Clamp a requested candidate size into the playable range.
pub fn clamp_size(size: usize) -> usize {
    size.clamp(DRAW_SIZE, MAX_CANDIDATE_SIZE)
}

/// Bit set over 1..=25. Bit `n - 1` is set when `n` is a member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct NumberSet(u32);

impl NumberSet {
    const MASK: u32 = (1 << UNIVERSE_SIZE) - 1;

    pub const fn empty() -> Self {
        Self(0)
    }

    pub const fn full() -> Self {
        Self(Self::MASK)
    }

    /// Build from numbers, silently skipping anything outside 1..=25.
    pub fn from_numbers<I: IntoIterator<Item = u8>>(numbers: I) -> Self {
        let mut set = Self::empty();
        for n in numbers {
            set.insert(n);
        }
        set
    }

    pub fn insert(&mut self, n: u8) -> bool {
        if !(1..=UNIVERSE_SIZE).contains(&n) {
            return false;
        }
        let bit = 1 << (n - 1);
        let fresh = self.0 & bit == 0;
        self.0 |= bit;
        fresh
    }

    pub fn remove(&mut self, n: u8) -> bool {
        if !(1..=UNIVERSE_SIZE).contains(&n) {
            return false;
        }
        let bit = 1 << (n - 1);
        let present = self.0 & bit != 0;
        self.0 &= !bit;
        present
    }

    pub fn contains(&self, n: u8) -> bool {
        (1..=UNIVERSE_SIZE).contains(&n) && self.0 & (1 << (n - 1)) != 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn is_full(&self) -> bool {
        self.0 == Self::MASK
    }

    pub fn intersection(&self, other: &NumberSet) -> NumberSet {
        NumberSet(self.0 & other.0)
    }

    pub fn union(&self, other: &NumberSet) -> NumberSet {
        NumberSet(self.0 | other.0)
    }

    pub fn difference(&self, other: &NumberSet) -> NumberSet {
        NumberSet(self.0 & !other.0)
    }

    pub fn symmetric_difference(&self, other: &NumberSet) -> NumberSet {
        NumberSet(self.0 ^ other.0)
    }

    pub fn complement(&self) -> NumberSet {
        NumberSet(!self.0 & Self::MASK)
    }

    /// Ascending iteration.
    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        let bits = self.0;
        (1..=UNIVERSE_SIZE).filter(move |n| bits & (1 << (n - 1)) != 0)
    }

    pub fn to_vec(&self) -> Vec<u8> {
        self.iter().collect()
    }

    pub fn sum(&self) -> u32 {
        self.iter().map(u32::from).sum()
    }

    /// Uniformly pick one member.
    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<u8> {
        let len = self.len();
        if len == 0 {
            return None;
        }
        let idx = rng.gen_range(0..len);
        self.iter().nth(idx)
    }
}

impl FromIterator<u8> for NumberSet {
    fn from_iter<I: IntoIterator<Item = u8>>(iter: I) -> Self {
        Self::from_numbers(iter)
    }
}

impl Serialize for NumberSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

impl fmt::Display for NumberSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined: Vec<String> = self.iter().map(|n| format!("{:02}", n)).collect();
        write!(f, "{}", joined.join(" "))
    }
}

/// Prize information published with a draw
#[derive(Debug, Clone, PartialEq, serde::Serialize, Deserialize)]
pub struct PrizeTier {
    pub tier: u8,
    pub winners: u32,
    pub amount: f64,
}

/// One historical draw result
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Draw {
    id: u32,
    numbers: NumberSet,
    date: String,
    prize_tiers: Vec<PrizeTier>,
}

impl Draw {
    pub fn new(id: u32, numbers: &[u8], date: impl Into<String>, prize_tiers: Vec<PrizeTier>) -> Result<Self> {
        if numbers.len() != DRAW_SIZE {
            return Err(DrawbiasError::InvalidDraw(format!(
                "draw {} has {} numbers, expected {}",
                id,
                numbers.len(),
                DRAW_SIZE
            )));
        }
        if let Some(n) = numbers.iter().find(|n| !(1..=UNIVERSE_SIZE).contains(*n)) {
            return Err(DrawbiasError::InvalidDraw(format!(
                "draw {} contains {} outside 1..={}",
                id, n, UNIVERSE_SIZE
            )));
        }
        let set = NumberSet::from_numbers(numbers.iter().copied());
        if set.len() != DRAW_SIZE {
            return Err(DrawbiasError::InvalidDraw(format!(
                "draw {} contains duplicate numbers",
                id
            )));
        }

        Ok(Self {
            id,
            numbers: set,
            date: date.into(),
            prize_tiers,
        })
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn numbers(&self) -> &NumberSet {
        &self.numbers
    }

    pub fn date(&self) -> &str {
        &self.date
    }

    pub fn prize_tiers(&self) -> &[PrizeTier] {
        &self.prize_tiers
    }

    /// Published payout for `tier` hits, if the draw carries one.
    pub fn prize_for_tier(&self, tier: u8) -> Option<f64> {
        self.prize_tiers.iter().find(|p| p.tier == tier).map(|p| p.amount)
    }

    /// Accepts `dd/mm/yyyy` (official results) or ISO dates.
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.date, "%d/%m/%Y")
            .or_else(|_| NaiveDate::parse_from_str(&self.date, "%Y-%m-%d"))
            .ok()
    }
}

/// A proposed bet: `m` distinct numbers, always sorted ascending
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Candidate {
    numbers: Vec<u8>,
    #[serde(skip)]
    set: NumberSet,
}

impl Candidate {
    /// Validate raw numbers coming from outside the engine.
    pub fn new(numbers: &[u8]) -> Result<Self> {
        if let Some(n) = numbers.iter().find(|n| !(1..=UNIVERSE_SIZE).contains(*n)) {
            return Err(DrawbiasError::InvalidCandidate(format!(
                "{} is outside 1..={}",
                n, UNIVERSE_SIZE
            )));
        }
        let set = NumberSet::from_numbers(numbers.iter().copied());
        if set.len() != numbers.len() {
            return Err(DrawbiasError::InvalidCandidate("duplicate numbers".to_string()));
        }
        if !(DRAW_SIZE..=MAX_CANDIDATE_SIZE).contains(&set.len()) {
            return Err(DrawbiasError::InvalidCandidate(format!(
                "size {} outside {}..={}",
                set.len(),
                DRAW_SIZE,
                MAX_CANDIDATE_SIZE
            )));
        }
        Ok(Self::from_set(set))
    }

    pub fn from_set(set: NumberSet) -> Self {
        Self {
            numbers: set.to_vec(),
            set,
        }
    }

    pub fn numbers(&self) -> &[u8] {
        &self.numbers
    }

    pub fn set(&self) -> &NumberSet {
        &self.set
    }

    pub fn len(&self) -> usize {
        self.numbers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.numbers.is_empty()
    }

    pub fn hits(&self, draw: &Draw) -> usize {
        self.set.intersection(draw.numbers()).len()
    }
}

impl fmt::Display for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.set)
    }
}

/// Owned draw history, newest first, unique ids
#[derive(Debug, Clone, Default)]
pub struct History {
    draws: Vec<Draw>,
}

impl History {
    pub fn from_draws(mut draws: Vec<Draw>) -> Self {
        draws.sort_by(|a, b| b.id.cmp(&a.id));
        draws.dedup_by_key(|d| d.id);
        Self { draws }
    }

    pub fn window(&self) -> HistoryWindow<'_> {
        HistoryWindow::new(&self.draws)
    }

    pub fn draws(&self) -> &[Draw] {
        &self.draws
    }

    pub fn len(&self) -> usize {
        self.draws.len()
    }

    pub fn is_empty(&self) -> bool {
        self.draws.is_empty()
    }

    pub fn find(&self, id: u32) -> Option<&Draw> {
        self.draws
            .binary_search_by(|d| id.cmp(&d.id))
            .ok()
            .map(|idx| &self.draws[idx])
    }
}

/// Read-only, newest-first view over draws handed to a strategy
#[derive(Debug, Clone, Copy)]
pub struct HistoryWindow<'a> {
    draws: &'a [Draw],
}

impl<'a> HistoryWindow<'a> {
    /// `draws` must already be ordered newest first.
    pub fn new(draws: &'a [Draw]) -> Self {
        debug_assert!(draws.windows(2).all(|w| w[0].id > w[1].id));
        Self { draws }
    }

    pub fn len(&self) -> usize {
        self.draws.len()
    }

    pub fn is_empty(&self) -> bool {
        self.draws.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&'a Draw> {
        self.draws.get(index)
    }

    pub fn latest(&self) -> Option<&'a Draw> {
        self.draws.first()
    }

    pub fn iter(&self) -> std::slice::Iter<'a, Draw> {
        self.draws.iter()
    }

    pub fn as_slice(&self) -> &'a [Draw] {
        self.draws
    }

    /// Sub-window `[start, start + len)`, clamped to the available draws.
    pub fn slice(&self, start: usize, len: usize) -> HistoryWindow<'a> {
        let start = start.min(self.draws.len());
        let end = start.saturating_add(len).min(self.draws.len());
        HistoryWindow::new(&self.draws[start..end])
    }

    /// Everything strictly older than `index`.
    pub fn older_than(&self, index: usize) -> HistoryWindow<'a> {
        let start = index.saturating_add(1).min(self.draws.len());
        HistoryWindow::new(&self.draws[start..])
    }

    /// The most recent `count` draws.
    pub fn recent(&self, count: usize) -> HistoryWindow<'a> {
        self.slice(0, count)
    }
}
