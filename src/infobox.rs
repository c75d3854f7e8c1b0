//! Contextual tips shown in a single sliding infobox.
//!
//! Each care kind has one tip. A tip shows itself automatically after a care
//! action at most `infobox_cap` times per scene; showing a tip while another
//! is up swaps the content in place.

use crate::config::Rules;
use crate::model::CareKind;
use crate::panes::{Slide, SlideDir};
use tracing::{debug, trace};

pub fn tip_text(kind: CareKind) -> &'static str {
    match kind {
        CareKind::Feed => "A fed pet is a happy pet. A feast costs more points than a snack.",
        CareKind::Play => "Playtime earns the most toward today's score. Fetch is worth it.",
        CareKind::Groom => "A bath does more than a brush. Spend your last points before bed.",
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InfoboxPhase {
    Hidden,
    SlidingIn,
    Shown,
    SlidingOut,
}

pub struct Infobox {
    slide: Slide,
    phase: InfoboxPhase,
    current: Option<CareKind>,
    remaining: f32,
    appearances: [u8; 3],
    cap: u8,
    duration: f32,
    speed: f32,
}

impl Infobox {
    pub fn new(rules: &Rules) -> Self {
        Self {
            slide: Slide::collapsed(rules.infobox_hidden, rules.infobox_shown),
            phase: InfoboxPhase::Hidden,
            current: None,
            remaining: 0.0,
            appearances: [0; 3],
            cap: rules.infobox_cap,
            duration: rules.infobox_duration,
            speed: rules.slide_speed,
        }
    }

    pub fn phase(&self) -> InfoboxPhase {
        self.phase
    }

    pub fn current(&self) -> Option<CareKind> {
        self.current
    }

    pub fn slide(&self) -> &Slide {
        &self.slide
    }

    pub fn remaining(&self) -> f32 {
        self.remaining
    }

    pub fn appearances(&self, kind: CareKind) -> u8 {
        self.appearances[kind.index()]
    }

    /// Automatic tip after a care action. Does nothing once `kind` has used
    /// up its appearances.
    pub fn show_tip(&mut self, kind: CareKind) {
        let seen = &mut self.appearances[kind.index()];
        if *seen >= self.cap {
            trace!(?kind, "tip cap reached");
            return;
        }
        *seen += 1;
        debug!(?kind, appearance = *seen, "showing tip");
        self.present(kind);
    }

    /// Manual toggle from the info button. Hides the tip if it is the one
    /// showing, otherwise shows it without touching the appearance count.
    pub fn toggle(&mut self, kind: CareKind) {
        let visible = matches!(self.phase, InfoboxPhase::SlidingIn | InfoboxPhase::Shown);
        if visible && self.current == Some(kind) {
            self.phase = InfoboxPhase::SlidingOut;
        } else {
            self.present(kind);
        }
    }

    fn present(&mut self, kind: CareKind) {
        self.current = Some(kind);
        self.remaining = self.duration;
        if self.phase != InfoboxPhase::Shown {
            self.phase = InfoboxPhase::SlidingIn;
        }
    }

    pub fn advance(&mut self, dt: f32) {
        match self.phase {
            InfoboxPhase::Hidden => {}
            InfoboxPhase::SlidingIn => {
                self.remaining -= dt;
                if self.slide.step(SlideDir::Expand, self.speed) {
                    self.phase = InfoboxPhase::Shown;
                }
            }
            InfoboxPhase::Shown => {
                self.remaining -= dt;
                if self.remaining <= 0.0 {
                    self.phase = InfoboxPhase::SlidingOut;
                }
            }
            InfoboxPhase::SlidingOut => {
                if self.slide.step(SlideDir::Collapse, self.speed) {
                    self.phase = InfoboxPhase::Hidden;
                    self.current = None;
                }
            }
        }
    }
}
