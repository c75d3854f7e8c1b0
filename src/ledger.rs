//! Point costs and day rollover.
//!
//! Care actions are looked up in a fixed catalogue of cues and priced by the
//! rules' per-size tariffs, then applied all-or-nothing against the day's
//! points. Rejections are silent: the caller gets `None` and nothing changes.
//! Side effects (cues, tips, floating text) are left to the driver so the
//! ledger only ever touches the [`StatModel`].

use crate::config::{Rules, Tariff};
use crate::model::{ActionKey, CareKind, Magnitude, StatModel};
use tracing::{debug, info, trace};

/// The named cues of one care button.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CareCues {
    pub key: ActionKey,
    pub label: &'static str,
    pub animation: &'static str,
    pub audio: &'static str,
    pub particles: &'static str,
    pub tip: CareKind,
}

const fn row(
    kind: CareKind,
    magnitude: Magnitude,
    label: &'static str,
    animation: &'static str,
    audio: &'static str,
    particles: &'static str,
) -> CareCues {
    CareCues {
        key: ActionKey { kind, magnitude },
        label,
        animation,
        audio,
        particles,
        tip: kind,
    }
}

pub const CATALOGUE: [CareCues; 6] = [
    row(CareKind::Feed, Magnitude::Minor, "Snack", "isEating", "munch", "crumbs"),
    row(CareKind::Feed, Magnitude::Major, "Feast", "isEating", "feast", "crumbs"),
    row(CareKind::Play, Magnitude::Minor, "Pat", "isRunning", "squeak", "sparkles"),
    row(CareKind::Play, Magnitude::Major, "Fetch", "isRunning", "fetch", "sparkles"),
    row(CareKind::Groom, Magnitude::Minor, "Brush", "isBathing", "brush", "bubbles"),
    row(CareKind::Groom, Magnitude::Major, "Bath", "isBathing", "splash", "bubbles"),
];

pub fn cues(key: ActionKey) -> &'static CareCues {
    let i = key.kind.index() * 2
        + match key.magnitude {
            Magnitude::Minor => 0,
            Magnitude::Major => 1,
        };
    &CATALOGUE[i]
}

/// Everything one care action does: its price, its rewards and its cues.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Effect {
    pub cost: u32,
    pub day_score: f32,
    pub happiness: f32,
    pub cues: &'static CareCues,
}

/// Result of a day rollover.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DayOutcome {
    pub day: u32,
    pub day_score: f32,
    pub life_delta: f32,
}

pub struct Ledger {
    minor: Tariff,
    major: Tariff,
    base_decay: f32,
    happiness_day_decay: f32,
}

impl Ledger {
    pub fn new(rules: &Rules) -> Self {
        Self {
            minor: rules.minor,
            major: rules.major,
            base_decay: rules.base_decay,
            happiness_day_decay: rules.happiness_day_decay,
        }
    }

    pub fn effect(&self, key: ActionKey) -> Effect {
        let tariff = match key.magnitude {
            Magnitude::Minor => self.minor,
            Magnitude::Major => self.major,
        };
        Effect {
            cost: tariff.cost,
            day_score: tariff.day_score,
            happiness: tariff.happiness,
            cues: cues(key),
        }
    }

    pub fn can_afford(&self, stats: &StatModel, key: ActionKey) -> bool {
        !stats.is_expired() && self.effect(key).cost <= stats.points.remaining()
    }

    pub fn can_advance_day(stats: &StatModel) -> bool {
        !stats.is_expired() && stats.points.is_spent()
    }

    pub fn apply_action(&self, stats: &mut StatModel, key: ActionKey) -> Option<Effect> {
        let fx = self.effect(key);
        if stats.is_expired() || !stats.points.try_spend(fx.cost) {
            trace!(?key, points = stats.points.remaining(), "action rejected");
            return None;
        }
        stats.day_score.add(fx.day_score);
        stats.happiness.add(fx.happiness);
        debug!(
            ?key,
            points = stats.points.remaining(),
            day_score = stats.day_score.get(),
            happiness = stats.happiness.get(),
            "action applied"
        );
        Some(fx)
    }

    /// Rolls the day over. Only has an effect once every point is spent.
    pub fn advance_day(&self, stats: &mut StatModel) -> Option<DayOutcome> {
        if !Self::can_advance_day(stats) {
            trace!(points = stats.points.remaining(), "advance day rejected");
            return None;
        }
        let day_score = stats.day_score.get();
        let life_delta = self.base_decay - day_score;
        stats.life.add(life_delta);
        stats.happiness.add(-self.happiness_day_decay);
        stats.points.refill();
        stats.day_score.reset();
        let outcome = DayOutcome {
            day: stats.day,
            day_score,
            life_delta,
        };
        stats.day += 1;
        info!(
            day = outcome.day,
            day_score,
            life_delta,
            life = stats.life.get(),
            "day advanced"
        );
        Some(outcome)
    }
}
