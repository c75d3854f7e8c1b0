//! Rising score text over the pet: one slot, replaced on every spawn.

use crate::config::Rules;

/// Which overlay is showing. Only one can be up at a time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FloatingKind {
    Action,
    DaySummary,
}

/// Sign of the shown delta; hosts pick the colour from it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tone {
    Gain,
    Loss,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FloatingScore {
    pub kind: FloatingKind,
    pub text: String,
    pub tone: Tone,
    /// Distance risen since spawn.
    pub offset: f32,
    pub remaining: f32,
    pub duration: f32,
}

impl FloatingScore {
    /// 1.0 at spawn, fading to 0.0.
    pub fn alpha(&self) -> f32 {
        if self.duration <= 0.0 {
            return 0.0;
        }
        (self.remaining / self.duration).clamp(0.0, 1.0)
    }
}

/// `+1`, `+2`: the happiness gain of a care action in display units.
pub fn action_text(happiness_delta: f32) -> String {
    format!("+{}", (happiness_delta * 10.0).round() as i32)
}

/// The day-end life change as displayed: scaled, rounded to one decimal,
/// with negative zero folded into zero.
fn shown_summary(life_delta: f32, scale: f32) -> f32 {
    let shown = (life_delta * scale * 10.0).round() / 10.0;
    if shown == 0.0 {
        0.0
    } else {
        shown
    }
}

/// e.g. `-0.4`.
pub fn summary_text(life_delta: f32, scale: f32) -> String {
    format!("{:+.1}", shown_summary(life_delta, scale))
}

/// Follows the rounded text, so `+0.0` is never drawn as a loss.
pub fn summary_tone(life_delta: f32, scale: f32) -> Tone {
    if shown_summary(life_delta, scale) >= 0.0 {
        Tone::Gain
    } else {
        Tone::Loss
    }
}

pub struct FloatingText {
    active: Option<FloatingScore>,
    rise: f32,
    action_duration: f32,
    summary_duration: f32,
}

impl FloatingText {
    pub fn new(rules: &Rules) -> Self {
        Self {
            active: None,
            rise: rules.floating_rise,
            action_duration: rules.floating_duration,
            summary_duration: rules.summary_duration,
        }
    }

    pub fn active(&self) -> Option<&FloatingScore> {
        self.active.as_ref()
    }

    /// Replaces whatever is showing.
    pub fn spawn(&mut self, kind: FloatingKind, text: String, tone: Tone) {
        let duration = match kind {
            FloatingKind::Action => self.action_duration,
            FloatingKind::DaySummary => self.summary_duration,
        };
        self.active = Some(FloatingScore {
            kind,
            text,
            tone,
            offset: 0.0,
            remaining: duration,
            duration,
        });
    }

    pub fn advance(&mut self, dt: f32) {
        let Some(score) = self.active.as_mut() else {
            return;
        };
        score.offset += self.rise * dt;
        score.remaining -= dt;
        if score.remaining <= 0.0 {
            self.active = None;
        }
    }
}
