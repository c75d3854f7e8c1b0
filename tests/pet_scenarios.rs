//! End-to-end scenarios for [`PetCore`] driven through its public API.
//!
//! A recording host stands in for the AR session and cue sinks, and every
//! test advances the core with fixed 30 fps ticks.
//!
//! Covered scenarios:
//! 1. Unaffordable actions change nothing.
//! 2. A full day of spending, then the day rollover and its summary text.
//! 3. Stats stay in bounds across a long mixed session and days keep ending.
//! 4. Every requested pane eventually settles alone.
//! 5. Tips stop appearing after their second showing.

use arpet::config::Rules;
use arpet::driver::{Host, Lifecycle, PetCore};
use arpet::floating::{FloatingKind, Tone};
use arpet::infobox::InfoboxPhase;
use arpet::model::{ActionKey, CareKind, Magnitude};
use arpet::panes::PaneState;

const DT: f32 = 1.0 / 30.0;

// ── Helpers ───────────────────────────────────────────────────────────────────

#[derive(Default)]
struct RecordingHost {
    cues: Vec<(String, bool)>,
    clips: Vec<String>,
    resets: u32,
}

impl Host for RecordingHost {
    fn can_spawn(&self) -> bool {
        true
    }
    fn try_place(&mut self) -> bool {
        true
    }
    fn play_cue(&mut self, name: &str, active: bool) {
        self.cues.push((name.to_string(), active));
    }
    fn play_clip(&mut self, name: &str) {
        self.clips.push(name.to_string());
    }
    fn play_effect(&mut self, _name: &str) {}
    fn stop_effect(&mut self, _name: &str) {}
    fn reset_scene(&mut self) {
        self.resets += 1;
    }
}

/// A core with the pet already placed.
fn placed_core() -> (PetCore, RecordingHost) {
    let mut core = PetCore::new(Rules::default());
    let mut host = RecordingHost::default();
    assert_eq!(core.tick(DT, &mut host), Lifecycle::Running);
    assert!(core.is_placed());
    (core, host)
}

fn key(kind: CareKind, magnitude: Magnitude) -> ActionKey {
    ActionKey::new(kind, magnitude)
}

fn ticks(core: &mut PetCore, host: &mut RecordingHost, n: usize) {
    for _ in 0..n {
        core.tick(DT, host);
    }
}

fn settle(core: &mut PetCore, host: &mut RecordingHost) {
    let mut n = 0;
    while !core.panes().state().is_settled() {
        core.tick(DT, host);
        n += 1;
        assert!(n < 1000, "panes never settled");
    }
}

/// Tiny deterministic generator so the long session is reproducible.
struct SplitMix(u64);

impl SplitMix {
    fn next(&mut self) -> u64 {
        self.0 = self.0.wrapping_add(0x9E3779B97F4A7C15);
        let mut z = self.0;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
        z ^ (z >> 31)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[test]
fn unaffordable_action_changes_nothing() {
    let (mut core, mut host) = placed_core();
    core.request_action(key(CareKind::Feed, Magnitude::Major), &mut host);
    core.request_action(key(CareKind::Feed, Magnitude::Major), &mut host);
    assert_eq!(core.stats().points.remaining(), 2);

    let before = core.stats().clone();
    let clips = host.clips.len();
    for kind in CareKind::ALL {
        core.request_action(key(kind, Magnitude::Major), &mut host);
    }
    assert_eq!(core.stats(), &before);
    assert_eq!(host.clips.len(), clips);
}

#[test]
fn full_day_of_spending_then_rollover() {
    let (mut core, mut host) = placed_core();
    core.request_action(key(CareKind::Feed, Magnitude::Minor), &mut host);
    core.request_action(key(CareKind::Groom, Magnitude::Major), &mut host);
    core.request_action(key(CareKind::Play, Magnitude::Major), &mut host);
    core.request_action(key(CareKind::Feed, Magnitude::Major), &mut host);

    assert_eq!(core.stats().points.remaining(), 0);
    assert!((core.stats().day_score.get() - 0.11).abs() < 1e-5);
    assert_eq!(host.clips, vec!["munch", "splash", "fetch"]);
    assert_eq!(host.cues.first(), Some(&("isEating".to_string(), true)));
    assert_eq!(host.cues.last(), Some(&("isRunning".to_string(), true)));

    ticks(&mut core, &mut host, 1);
    assert!(core.display().can_advance_day);

    let life_before = core.stats().life.get();
    let outcome = core.advance_day().expect("budget is spent");
    assert!((outcome.life_delta - -0.03).abs() < 1e-5);
    assert!((core.stats().life.get() - (life_before - 0.03)).abs() < 1e-5);
    assert_eq!(core.stats().points.remaining(), 10);
    assert_eq!(core.stats().day_score.get(), 0.0);
    assert_eq!(core.stats().day, 2);

    let summary = core.floating().active().expect("summary is showing");
    assert_eq!(summary.kind, FloatingKind::DaySummary);
    assert_eq!(summary.text, "-0.3");
    assert_eq!(summary.tone, Tone::Loss);

    // A second rollover needs the budget spent again.
    assert!(core.advance_day().is_none());
}

#[test]
fn long_session_stays_in_bounds_and_keeps_finishing_days() {
    let (mut core, mut host) = placed_core();
    let mut rng = SplitMix(0xC0FFEE);
    let cap = core.rules().points_capacity;
    let all_keys: Vec<ActionKey> = CareKind::ALL
        .into_iter()
        .flat_map(|k| [key(k, Magnitude::Minor), key(k, Magnitude::Major)])
        .collect();
    let mut days_finished = 0;
    let mut last_day = core.stats().day;

    for _ in 0..5_000 {
        match rng.next() % 6 {
            0..=2 => {
                let kind = CareKind::ALL[(rng.next() % 3) as usize];
                let magnitude = if rng.next() % 2 == 0 {
                    Magnitude::Minor
                } else {
                    Magnitude::Major
                };
                core.request_action(key(kind, magnitude), &mut host);
            }
            3 => {
                if core.advance_day().is_some() {
                    days_finished += 1;
                }
            }
            4 => core.request_pane(CareKind::ALL[(rng.next() % 3) as usize]),
            _ => core.request_main_pane(),
        }
        core.tick(DT, &mut host);

        if core.stats().is_expired() {
            core.reset_scene(&mut host);
            core.tick(DT, &mut host);
            last_day = core.stats().day;
            continue;
        }

        let s = core.stats();
        assert!(s.points.remaining() <= cap);
        assert!((0.0..=1.0).contains(&s.happiness.get()));
        assert!((0.0..=1.0).contains(&s.life.get()));
        assert!(s.day >= last_day, "day went backwards");
        last_day = s.day;

        let can_act = all_keys.iter().any(|&k| core.can_afford(k));
        assert!(
            can_act || s.points.is_spent(),
            "stuck with {} points on day {}",
            s.points.remaining(),
            s.day
        );
    }
    assert!(days_finished > 50, "only {days_finished} days finished");
}

#[test]
fn requested_pane_settles_alone() {
    let (mut core, mut host) = placed_core();
    for kind in [CareKind::Groom, CareKind::Feed, CareKind::Play] {
        core.request_pane(kind);
        settle(&mut core, &mut host);
        assert_eq!(core.panes().state(), PaneState::Care(kind));
        for other in CareKind::ALL.into_iter().filter(|k| *k != kind) {
            assert_eq!(core.panes().care_slide(other).progress(), 0.0);
        }
        assert_eq!(core.panes().main_slide().progress(), 0.0);
    }

    core.request_main_pane();
    settle(&mut core, &mut host);
    assert_eq!(core.panes().state(), PaneState::Main);
    assert_eq!(core.panes().expanded_care(), None);
}

#[test]
fn tip_stops_after_two_showings() {
    let (mut core, mut host) = placed_core();
    let hide_ticks = 400;

    core.request_action(key(CareKind::Groom, Magnitude::Minor), &mut host);
    assert_eq!(core.infobox().current(), Some(CareKind::Groom));
    ticks(&mut core, &mut host, hide_ticks);
    assert_eq!(core.infobox().phase(), InfoboxPhase::Hidden);

    core.request_action(key(CareKind::Groom, Magnitude::Minor), &mut host);
    assert_eq!(core.infobox().phase(), InfoboxPhase::SlidingIn);
    ticks(&mut core, &mut host, hide_ticks);

    core.request_action(key(CareKind::Groom, Magnitude::Minor), &mut host);
    assert_eq!(core.infobox().appearances(CareKind::Groom), 2);
    assert_eq!(core.infobox().phase(), InfoboxPhase::Hidden);
    assert_eq!(core.infobox().current(), None);
}

#[test]
fn reset_returns_to_scanning() {
    let (mut core, mut host) = placed_core();
    core.request_action(key(CareKind::Play, Magnitude::Minor), &mut host);
    core.toggle_stats();
    core.reset_scene(&mut host);

    assert_eq!(host.resets, 1);
    assert!(!core.is_placed());
    assert!(core.display().stats_visible);
    assert_eq!(core.infobox().appearances(CareKind::Play), 0);
}
