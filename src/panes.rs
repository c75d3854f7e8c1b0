//! Sliding panel transitions.
//!
//! The bottom UI holds one main pane and one secondary pane per [`CareKind`].
//! At most one of them is shown at a time; switching between them is a small
//! state machine advanced by one fixed step per tick. The handle panel, which
//! slides the whole UI out of view, is independent of the pane group.
//!
//! A slide completes once its position crosses the target in the direction of
//! travel. The position is left where the last step put it, so a finished
//! slide may sit up to one step past its target.

use crate::config::Rules;
use crate::model::CareKind;
use tracing::{debug, trace};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SlideDir {
    Expand,
    Collapse,
}

/// A panel position travelling between a collapsed and an expanded value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Slide {
    pub position: f32,
    pub collapsed: f32,
    pub expanded: f32,
}

impl Slide {
    pub fn collapsed(collapsed: f32, expanded: f32) -> Self {
        Self {
            position: collapsed,
            collapsed,
            expanded,
        }
    }

    pub fn expanded(collapsed: f32, expanded: f32) -> Self {
        Self {
            position: expanded,
            collapsed,
            expanded,
        }
    }

    /// Moves one step toward the target of `dir`. Returns true once the
    /// position has reached or passed that target.
    pub fn step(&mut self, dir: SlideDir, speed: f32) -> bool {
        let (from, to) = match dir {
            SlideDir::Expand => (self.collapsed, self.expanded),
            SlideDir::Collapse => (self.expanded, self.collapsed),
        };
        if to >= from {
            self.position += speed;
            self.position >= to
        } else {
            self.position -= speed;
            self.position <= to
        }
    }

    /// 0.0 when fully collapsed, 1.0 when fully expanded.
    pub fn progress(&self) -> f32 {
        let span = self.expanded - self.collapsed;
        if span.abs() <= f32::EPSILON {
            return 1.0;
        }
        ((self.position - self.collapsed) / span).clamp(0.0, 1.0)
    }
}

/// Where the pane group is. `Main` and `Care` are settled; the rest are
/// mid-transition and carry where they are headed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PaneState {
    Main,
    CollapsingMain { next: CareKind },
    ExpandingCare(CareKind),
    Care(CareKind),
    CollapsingCare {
        from: CareKind,
        next: Option<CareKind>,
    },
    ExpandingMain,
}

impl PaneState {
    pub fn is_settled(self) -> bool {
        matches!(self, PaneState::Main | PaneState::Care(_))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PaneRequest {
    Main,
    Care(CareKind),
}

pub struct PaneCoordinator {
    state: PaneState,
    main: Slide,
    care: [Slide; 3],
    pending: Option<PaneRequest>,
    speed: f32,
}

impl PaneCoordinator {
    pub fn new(rules: &Rules) -> Self {
        let care = Slide::collapsed(rules.care_collapsed, rules.care_expanded);
        Self {
            state: PaneState::Main,
            main: Slide::expanded(rules.main_collapsed, rules.main_expanded),
            care: [care; 3],
            pending: None,
            speed: rules.slide_speed,
        }
    }

    pub fn state(&self) -> PaneState {
        self.state
    }

    pub fn main_slide(&self) -> &Slide {
        &self.main
    }

    pub fn care_slide(&self, kind: CareKind) -> &Slide {
        &self.care[kind.index()]
    }

    /// The care pane that is fully expanded, if any.
    pub fn expanded_care(&self) -> Option<CareKind> {
        match self.state {
            PaneState::Care(kind) => Some(kind),
            _ => None,
        }
    }

    pub fn pending(&self) -> Option<PaneRequest> {
        self.pending
    }

    pub fn request_pane(&mut self, kind: CareKind) {
        self.request(PaneRequest::Care(kind));
    }

    pub fn request_main_pane(&mut self) {
        self.request(PaneRequest::Main);
    }

    /// Starts `req` if the group is settled. Otherwise it replaces any earlier
    /// queued request and runs when the current transition finishes.
    fn request(&mut self, req: PaneRequest) {
        if self.state.is_settled() {
            self.start(req);
        } else {
            trace!(?req, state = ?self.state, "pane request queued");
            self.pending = Some(req);
        }
    }

    fn start(&mut self, req: PaneRequest) {
        self.state = match (self.state, req) {
            (PaneState::Main, PaneRequest::Care(next)) => PaneState::CollapsingMain { next },
            (PaneState::Care(from), PaneRequest::Care(next)) if from != next => {
                PaneState::CollapsingCare {
                    from,
                    next: Some(next),
                }
            }
            (PaneState::Care(from), PaneRequest::Main) => {
                PaneState::CollapsingCare { from, next: None }
            }
            (state, _) => state,
        };
    }

    pub fn advance(&mut self) {
        let speed = self.speed;
        match self.state {
            PaneState::Main | PaneState::Care(_) => {}
            PaneState::CollapsingMain { next } => {
                if self.main.step(SlideDir::Collapse, speed) {
                    self.state = PaneState::ExpandingCare(next);
                }
            }
            PaneState::ExpandingCare(kind) => {
                if self.care[kind.index()].step(SlideDir::Expand, speed) {
                    self.settle(PaneState::Care(kind));
                }
            }
            PaneState::CollapsingCare { from, next } => {
                if self.care[from.index()].step(SlideDir::Collapse, speed) {
                    self.state = match next {
                        Some(kind) => PaneState::ExpandingCare(kind),
                        None => PaneState::ExpandingMain,
                    };
                }
            }
            PaneState::ExpandingMain => {
                if self.main.step(SlideDir::Expand, speed) {
                    self.settle(PaneState::Main);
                }
            }
        }
    }

    fn settle(&mut self, state: PaneState) {
        debug!(?state, "pane transition finished");
        self.state = state;
        if let Some(req) = self.pending.take() {
            self.start(req);
        }
    }
}

/// The handle panel: one boolean-driven slide that hides or shows the UI.
pub struct HandlePanel {
    slide: Slide,
    hidden: bool,
    animating: bool,
    speed: f32,
}

impl HandlePanel {
    pub fn new(rules: &Rules) -> Self {
        Self {
            slide: Slide::expanded(rules.handle_hidden, rules.handle_shown),
            hidden: false,
            animating: false,
            speed: rules.slide_speed,
        }
    }

    pub fn slide(&self) -> &Slide {
        &self.slide
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    pub fn is_animating(&self) -> bool {
        self.animating
    }

    /// A toggle while already sliding is ignored.
    pub fn toggle(&mut self) {
        self.animating = true;
    }

    pub fn advance(&mut self) {
        if !self.animating {
            return;
        }
        let dir = if self.hidden {
            SlideDir::Expand
        } else {
            SlideDir::Collapse
        };
        if self.slide.step(dir, self.speed) {
            self.animating = false;
            self.hidden = !self.hidden;
            debug!(hidden = self.hidden, "handle slide finished");
        }
    }
}
