use crate::config::Rules;
use serde::{Deserialize, Serialize};

/// A kind of care. Each kind has its own secondary pane, its own pair of
/// actions and its own tip.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CareKind {
    Feed,
    Play,
    Groom,
}

impl CareKind {
    pub const ALL: [CareKind; 3] = [CareKind::Feed, CareKind::Play, CareKind::Groom];

    pub fn index(self) -> usize {
        match self {
            CareKind::Feed => 0,
            CareKind::Play => 1,
            CareKind::Groom => 2,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CareKind::Feed => "Feed",
            CareKind::Play => "Play",
            CareKind::Groom => "Groom",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Magnitude {
    Minor,
    Major,
}

/// Identifies one care button: which pane it lives on and how big it is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActionKey {
    pub kind: CareKind,
    pub magnitude: Magnitude,
}

impl ActionKey {
    pub fn new(kind: CareKind, magnitude: Magnitude) -> Self {
        Self { kind, magnitude }
    }
}

/// A fractional stat held in `[0, upper]`. Every mutation clamps.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StatValue {
    value: f32,
    upper: f32,
}

impl StatValue {
    pub fn new(value: f32, upper: f32) -> Self {
        let upper = upper.max(0.0);
        Self {
            value: value.clamp(0.0, upper),
            upper,
        }
    }

    pub fn get(self) -> f32 {
        self.value
    }

    pub fn upper(self) -> f32 {
        self.upper
    }

    pub fn add(&mut self, delta: f32) {
        self.value = (self.value + delta).clamp(0.0, self.upper);
    }

    /// Position within the bounds, `0.0..=1.0`.
    pub fn fraction(self) -> f32 {
        if self.upper <= 0.0 {
            return 0.0;
        }
        self.value / self.upper
    }
}

/// Daily spendable points. Never negative; spending is all-or-nothing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PointsBudget {
    remaining: u32,
    capacity: u32,
}

impl PointsBudget {
    pub fn full(capacity: u32) -> Self {
        Self {
            remaining: capacity,
            capacity,
        }
    }

    pub fn remaining(self) -> u32 {
        self.remaining
    }

    pub fn capacity(self) -> u32 {
        self.capacity
    }

    pub fn is_spent(self) -> bool {
        self.remaining == 0
    }

    /// Deducts `cost` if affordable. Returns false and leaves the budget
    /// untouched otherwise.
    pub fn try_spend(&mut self, cost: u32) -> bool {
        if cost > self.remaining {
            return false;
        }
        self.remaining -= cost;
        true
    }

    pub fn refill(&mut self) {
        self.remaining = self.capacity;
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DayScore(f32);

impl DayScore {
    pub fn get(self) -> f32 {
        self.0
    }

    pub fn add(&mut self, delta: f32) {
        self.0 += delta;
    }

    pub fn reset(&mut self) {
        self.0 = 0.0;
    }
}

/// The pet's economy state. Mutated only by the ledger.
#[derive(Clone, Debug, PartialEq)]
pub struct StatModel {
    pub points: PointsBudget,
    pub day_score: DayScore,
    pub happiness: StatValue,
    pub life: StatValue,
    pub day: u32,
}

impl StatModel {
    pub fn new(rules: &Rules) -> Self {
        Self {
            points: PointsBudget::full(rules.points_capacity),
            day_score: DayScore::default(),
            happiness: StatValue::new(rules.initial_happiness, rules.stat_upper_bound),
            life: StatValue::new(rules.initial_life, rules.stat_upper_bound),
            day: 1,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.life.get() <= 0.0
    }
}
