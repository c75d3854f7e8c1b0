//! The per-frame entry point.
//!
//! [`PetCore`] owns every piece of pet state and advances it once per
//! [`PetCore::tick`], always in the same order:
//!
//! 1. lifecycle poll
//! 2. spawn gate (until a pet is placed)
//! 3. stat display snapshot
//! 4. handle panel
//! 5. pane switch
//! 6. infobox
//! 7. floating text
//! 8. pending pet cue timeout
//!
//! User requests arrive between ticks and complete synchronously, so a tick
//! always sees the result of every request made before it.

use crate::config::Rules;
use crate::floating::{action_text, summary_text, summary_tone, FloatingKind, FloatingText, Tone};
use crate::infobox::Infobox;
use crate::ledger::{DayOutcome, Effect, Ledger};
use crate::model::{ActionKey, CareKind, StatModel};
use crate::panes::{HandlePanel, PaneCoordinator};
use tracing::{debug, info, trace};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Lifecycle {
    Running,
    Quit,
}

/// Everything the core asks of its surroundings: placement, lifecycle and
/// the cue sinks. The core only requests cues; it never plays them.
pub trait Host {
    fn poll_lifecycle(&mut self) -> Lifecycle {
        Lifecycle::Running
    }

    /// Whether placement is currently possible (tracking, permissions).
    fn can_spawn(&self) -> bool;

    /// Attempts to anchor the pet. True once an anchor exists.
    fn try_place(&mut self) -> bool;

    fn play_cue(&mut self, name: &str, active: bool);

    fn play_clip(&mut self, name: &str);

    fn play_effect(&mut self, name: &str);

    fn stop_effect(&mut self, name: &str);

    fn reset_scene(&mut self);
}

/// Read-only snapshot of the stats for rendering. Refreshed every tick.
#[derive(Clone, Debug, PartialEq)]
pub struct StatDisplay {
    pub day: u32,
    pub points: String,
    pub day_score: String,
    pub happiness: f32,
    pub life: f32,
    pub can_advance_day: bool,
    pub stats_visible: bool,
    pub expired: bool,
}

impl StatDisplay {
    fn from_stats(stats: &StatModel, stats_visible: bool) -> Self {
        Self {
            day: stats.day,
            points: format!("{}/{}", stats.points.remaining(), stats.points.capacity()),
            day_score: format!("{:.2}", stats.day_score.get()),
            happiness: stats.happiness.fraction(),
            life: stats.life.fraction(),
            can_advance_day: Ledger::can_advance_day(stats),
            stats_visible,
            expired: stats.is_expired(),
        }
    }
}

struct PendingCue {
    animation: &'static str,
    particles: &'static str,
    remaining: f32,
}

pub struct PetCore {
    rules: Rules,
    placed: bool,
    quitting: bool,
    stats: StatModel,
    ledger: Ledger,
    panes: PaneCoordinator,
    handle: HandlePanel,
    infobox: Infobox,
    floating: FloatingText,
    cue: Option<PendingCue>,
    stats_visible: bool,
    display: StatDisplay,
}

impl PetCore {
    pub fn new(rules: Rules) -> Self {
        let stats = StatModel::new(&rules);
        let display = StatDisplay::from_stats(&stats, true);
        Self {
            placed: false,
            quitting: false,
            ledger: Ledger::new(&rules),
            panes: PaneCoordinator::new(&rules),
            handle: HandlePanel::new(&rules),
            infobox: Infobox::new(&rules),
            floating: FloatingText::new(&rules),
            cue: None,
            stats_visible: true,
            display,
            stats,
            rules,
        }
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    pub fn is_placed(&self) -> bool {
        self.placed
    }

    pub fn is_quitting(&self) -> bool {
        self.quitting
    }

    pub fn stats(&self) -> &StatModel {
        &self.stats
    }

    pub fn display(&self) -> &StatDisplay {
        &self.display
    }

    pub fn panes(&self) -> &PaneCoordinator {
        &self.panes
    }

    pub fn handle(&self) -> &HandlePanel {
        &self.handle
    }

    pub fn infobox(&self) -> &Infobox {
        &self.infobox
    }

    pub fn floating(&self) -> &FloatingText {
        &self.floating
    }

    pub fn effect(&self, key: ActionKey) -> Effect {
        self.ledger.effect(key)
    }

    /// Whether `key` would be accepted right now. Hosts use it to grey out buttons.
    pub fn can_afford(&self, key: ActionKey) -> bool {
        self.placed && self.ledger.can_afford(&self.stats, key)
    }

    /// Name of the animation cue still waiting for its timeout.
    pub fn active_cue(&self) -> Option<&'static str> {
        self.cue.as_ref().map(|c| c.animation)
    }

    /// Called once an anchor exists. Activates the UI; repeated calls are ignored.
    pub fn on_pet_placed(&mut self) {
        if self.placed {
            return;
        }
        self.placed = true;
        self.display = StatDisplay::from_stats(&self.stats, self.stats_visible);
        info!("pet placed");
    }

    pub fn request_action(&mut self, key: ActionKey, host: &mut impl Host) {
        if !self.placed {
            trace!(?key, "action before placement ignored");
            return;
        }
        let Some(fx) = self.ledger.apply_action(&mut self.stats, key) else {
            return;
        };

        if let Some(prev) = self.cue.take() {
            host.play_cue(prev.animation, false);
            host.stop_effect(prev.particles);
        }
        let cues = fx.cues;
        host.play_cue(cues.animation, true);
        host.play_clip(cues.audio);
        host.play_effect(cues.particles);
        self.cue = Some(PendingCue {
            animation: cues.animation,
            particles: cues.particles,
            remaining: self.rules.cue_timeout,
        });

        self.infobox.show_tip(cues.tip);
        self.floating
            .spawn(FloatingKind::Action, action_text(fx.happiness), Tone::Gain);
    }

    pub fn advance_day(&mut self) -> Option<DayOutcome> {
        if !self.placed {
            return None;
        }
        let outcome = self.ledger.advance_day(&mut self.stats)?;
        let scale = self.rules.summary_scale;
        self.floating.spawn(
            FloatingKind::DaySummary,
            summary_text(outcome.life_delta, scale),
            summary_tone(outcome.life_delta, scale),
        );
        if self.stats.is_expired() {
            info!(day = outcome.day, "pet expired");
        }
        Some(outcome)
    }

    pub fn request_pane(&mut self, kind: CareKind) {
        if self.placed {
            self.panes.request_pane(kind);
        }
    }

    pub fn request_main_pane(&mut self) {
        if self.placed {
            self.panes.request_main_pane();
        }
    }

    pub fn toggle_handle(&mut self) {
        if self.placed {
            self.handle.toggle();
        }
    }

    pub fn toggle_infobox(&mut self, kind: CareKind) {
        if self.placed {
            self.infobox.toggle(kind);
        }
    }

    pub fn toggle_stats(&mut self) {
        if self.placed {
            self.stats_visible = !self.stats_visible;
        }
    }

    /// Asks the host to reset the scene and returns the core to its
    /// pre-placement state.
    pub fn reset_scene(&mut self, host: &mut impl Host) {
        host.reset_scene();
        *self = PetCore::new(self.rules.clone());
        info!("scene reset");
    }

    pub fn tick(&mut self, dt: f32, host: &mut impl Host) -> Lifecycle {
        if host.poll_lifecycle() == Lifecycle::Quit && !self.quitting {
            info!("lifecycle requested quit");
            self.quitting = true;
        }
        if self.quitting {
            return Lifecycle::Quit;
        }

        if !self.placed {
            if host.can_spawn() && host.try_place() {
                self.on_pet_placed();
            }
            if !self.placed {
                return Lifecycle::Running;
            }
        }

        self.display = StatDisplay::from_stats(&self.stats, self.stats_visible);
        self.handle.advance();
        self.panes.advance();
        self.infobox.advance(dt);
        self.floating.advance(dt);
        self.advance_cue(dt, host);

        Lifecycle::Running
    }

    fn advance_cue(&mut self, dt: f32, host: &mut impl Host) {
        let Some(cue) = self.cue.as_mut() else {
            return;
        };
        cue.remaining -= dt;
        if cue.remaining < 0.0 {
            debug!(cue = cue.animation, "cue timed out");
            host.play_cue(cue.animation, false);
            host.stop_effect(cue.particles);
            self.cue = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Magnitude;

    #[derive(Default)]
    struct Recorder {
        touch: bool,
        quit: bool,
        calls: Vec<String>,
    }

    impl Host for Recorder {
        fn poll_lifecycle(&mut self) -> Lifecycle {
            if self.quit {
                Lifecycle::Quit
            } else {
                Lifecycle::Running
            }
        }
        fn can_spawn(&self) -> bool {
            true
        }
        fn try_place(&mut self) -> bool {
            std::mem::take(&mut self.touch)
        }
        fn play_cue(&mut self, name: &str, active: bool) {
            self.calls.push(format!("cue {name} {active}"));
        }
        fn play_clip(&mut self, name: &str) {
            self.calls.push(format!("clip {name}"));
        }
        fn play_effect(&mut self, name: &str) {
            self.calls.push(format!("effect {name}"));
        }
        fn stop_effect(&mut self, name: &str) {
            self.calls.push(format!("stop {name}"));
        }
        fn reset_scene(&mut self) {
            self.calls.push("reset".into());
        }
    }

    fn placed() -> (PetCore, Recorder) {
        let mut core = PetCore::new(Rules::default());
        let mut host = Recorder {
            touch: true,
            ..Default::default()
        };
        core.tick(0.0, &mut host);
        assert!(core.is_placed());
        (core, host)
    }

    #[test]
    fn spawn_gate_places_on_touch() {
        let mut core = PetCore::new(Rules::default());
        let mut host = Recorder::default();
        core.tick(0.016, &mut host);
        assert!(!core.is_placed());
        host.touch = true;
        core.tick(0.016, &mut host);
        assert!(core.is_placed());
    }

    #[test]
    fn requests_before_placement_do_nothing() {
        let mut core = PetCore::new(Rules::default());
        let mut host = Recorder::default();
        core.request_action(ActionKey::new(CareKind::Feed, Magnitude::Minor), &mut host);
        core.request_pane(CareKind::Feed);
        assert_eq!(core.stats().points.remaining(), 10);
        assert!(core.panes().state().is_settled());
        assert!(host.calls.is_empty());
    }

    #[test]
    fn cue_reverts_after_timeout() {
        let (mut core, mut host) = placed();
        core.request_action(ActionKey::new(CareKind::Play, Magnitude::Major), &mut host);
        assert_eq!(
            host.calls,
            vec!["cue isRunning true", "clip fetch", "effect sparkles"]
        );
        assert_eq!(core.active_cue(), Some("isRunning"));

        for _ in 0..21 {
            core.tick(0.1, &mut host);
        }
        assert_eq!(core.active_cue(), Some("isRunning"));
        core.tick(0.1, &mut host);
        core.tick(0.1, &mut host);
        assert_eq!(core.active_cue(), None);
        assert_eq!(
            &host.calls[3..],
            &["cue isRunning false".to_string(), "stop sparkles".to_string()]
        );
    }

    #[test]
    fn new_cue_reverts_the_previous_one() {
        let (mut core, mut host) = placed();
        core.request_action(ActionKey::new(CareKind::Feed, Magnitude::Minor), &mut host);
        core.request_action(ActionKey::new(CareKind::Groom, Magnitude::Minor), &mut host);
        assert_eq!(
            host.calls,
            vec![
                "cue isEating true",
                "clip munch",
                "effect crumbs",
                "cue isEating false",
                "stop crumbs",
                "cue isBathing true",
                "clip brush",
                "effect bubbles",
            ]
        );
    }

    #[test]
    fn display_reads_back_after_tick() {
        let (mut core, mut host) = placed();
        core.request_action(ActionKey::new(CareKind::Feed, Magnitude::Major), &mut host);
        assert_eq!(core.display().points, "10/10");
        core.tick(0.016, &mut host);
        assert_eq!(core.display().points, "6/10");
        assert_eq!(core.display().day_score, "0.05");
    }

    #[test]
    fn three_majors_still_leave_the_day_finishable() {
        let (mut core, mut host) = placed();
        let feast = ActionKey::new(CareKind::Feed, Magnitude::Major);
        for _ in 0..3 {
            core.request_action(feast, &mut host);
        }
        assert_eq!(core.stats().points.remaining(), 2);
        assert!(!core.can_afford(feast));
        let snack = ActionKey::new(CareKind::Feed, Magnitude::Minor);
        assert!(core.can_afford(snack));
        core.request_action(snack, &mut host);
        assert!(core.advance_day().is_some());
        assert_eq!(core.stats().day, 2);
    }

    #[test]
    fn break_even_day_shows_neutral_gain() {
        let (mut core, mut host) = placed();
        for magnitude in [
            Magnitude::Minor,
            Magnitude::Minor,
            Magnitude::Major,
            Magnitude::Minor,
        ] {
            core.request_action(ActionKey::new(CareKind::Groom, magnitude), &mut host);
        }
        let outcome = core.advance_day().unwrap();
        assert!(outcome.life_delta.abs() < 1e-5);
        let summary = core.floating().active().unwrap();
        assert_eq!(summary.text, "+0.0");
        assert_eq!(summary.tone, Tone::Gain);
    }

    #[test]
    fn quit_stops_the_tick() {
        let (mut core, mut host) = placed();
        core.request_pane(CareKind::Feed);
        host.quit = true;
        assert_eq!(core.tick(0.016, &mut host), Lifecycle::Quit);
        assert!(core.is_quitting());
        assert_eq!(
            core.panes().main_slide().position,
            core.rules().main_expanded
        );
    }

    #[test]
    fn reset_restores_pre_placement() {
        let (mut core, mut host) = placed();
        core.request_action(ActionKey::new(CareKind::Feed, Magnitude::Major), &mut host);
        core.reset_scene(&mut host);
        assert!(!core.is_placed());
        assert_eq!(core.stats().points.remaining(), 10);
        assert!(core.floating().active().is_none());
        assert_eq!(host.calls.last().map(String::as_str), Some("reset"));
    }
}
