use crate::config::{Rules, Settings};
use crate::driver::{Host, Lifecycle, PetCore};
use crate::input::{collect_input_nonblocking, map_event, Command};
use crate::model::ActionKey;
use crate::render::{draw_frame, Palette, Terminal};
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Simulated time for the surface scan before placement is allowed.
const SCAN_SECS: f32 = 1.5;
/// How long an audio clip stays captioned under the pet.
const CAPTION_SECS: f32 = 1.2;

/// Stands in for the AR session and the pet model: surface scanning, touch
/// placement, and the animation/audio/particle sinks, all shown as text.
#[derive(Default)]
pub struct TerminalHost {
    scan_elapsed: f32,
    touch: bool,
    quit: bool,
    clip: Option<(String, f32)>,
    effects: Vec<String>,
}

impl TerminalHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn touch(&mut self) {
        self.touch = true;
    }

    pub fn request_quit(&mut self) {
        self.quit = true;
    }

    /// Advances host-side timers. Called once per frame before the core tick.
    pub fn update(&mut self, dt: f32) {
        self.scan_elapsed += dt;
        if let Some((_, left)) = self.clip.as_mut() {
            *left -= dt;
            if *left <= 0.0 {
                self.clip = None;
            }
        }
    }

    pub fn caption(&self) -> Option<String> {
        let clip = self.clip.as_ref().map(|(name, _)| format!("♪ {name}"));
        match (clip, self.effects.is_empty()) {
            (Some(c), true) => Some(c),
            (Some(c), false) => Some(format!("{c}  * {}", self.effects.join(" "))),
            (None, false) => Some(format!("* {}", self.effects.join(" "))),
            (None, true) => None,
        }
    }
}

impl Host for TerminalHost {
    fn poll_lifecycle(&mut self) -> Lifecycle {
        if self.quit {
            Lifecycle::Quit
        } else {
            Lifecycle::Running
        }
    }

    fn can_spawn(&self) -> bool {
        self.scan_elapsed >= SCAN_SECS
    }

    fn try_place(&mut self) -> bool {
        std::mem::take(&mut self.touch)
    }

    fn play_cue(&mut self, name: &str, active: bool) {
        debug!(cue = name, active, "animation cue");
    }

    fn play_clip(&mut self, name: &str) {
        self.clip = Some((name.to_string(), CAPTION_SECS));
    }

    fn play_effect(&mut self, name: &str) {
        if !self.effects.iter().any(|e| e == name) {
            self.effects.push(name.to_string());
        }
    }

    fn stop_effect(&mut self, name: &str) {
        self.effects.retain(|e| e != name);
    }

    fn reset_scene(&mut self) {
        *self = TerminalHost::new();
    }
}

pub(crate) struct App {
    settings: Settings,
    core: PetCore,
    host: TerminalHost,
    term: Terminal,
}

impl App {
    fn init(settings: Settings, rules: Rules) -> anyhow::Result<Self> {
        let term = Terminal::begin()?;
        Ok(Self {
            settings,
            core: PetCore::new(rules),
            host: TerminalHost::new(),
            term,
        })
    }

    fn run(&mut self) -> anyhow::Result<()> {
        let fps = self.settings.fps_cap.clamp(10, 240);
        let frame_dt = Duration::from_secs_f32(1.0 / fps as f32);
        let mut last_frame = Instant::now();

        info!(fps, "session started");
        loop {
            self.term.resize_if_needed()?;

            // input: requests complete before this frame's tick
            for ev in collect_input_nonblocking(frame_dt)? {
                let placed = self.core.is_placed();
                let ui_hidden = self.core.handle().is_hidden();
                if let Some(cmd) = map_event(placed, ui_hidden, self.core.panes().state(), ev) {
                    self.dispatch(cmd);
                }
            }

            let now = Instant::now();
            let dt = now.saturating_duration_since(last_frame).as_secs_f32();
            last_frame = now;

            self.host.update(dt);
            if self.core.tick(dt, &mut self.host) == Lifecycle::Quit {
                break;
            }

            self.render_frame()?;
            spin_sleep(frame_dt, Instant::now());
        }

        self.term.end()?;
        info!(day = self.core.stats().day, "session ended");
        Ok(())
    }

    fn dispatch(&mut self, cmd: Command) {
        match cmd {
            Command::Touch => self.host.touch(),
            Command::OpenPane(kind) => self.core.request_pane(kind),
            Command::Back => self.core.request_main_pane(),
            Command::Care(magnitude) => {
                if let Some(kind) = self.core.panes().expanded_care() {
                    self.core
                        .request_action(ActionKey::new(kind, magnitude), &mut self.host);
                }
            }
            Command::ToggleHandle => self.core.toggle_handle(),
            Command::ToggleStats => self.core.toggle_stats(),
            Command::ToggleTip => {
                let kind = self
                    .core
                    .panes()
                    .expanded_care()
                    .or(self.core.infobox().current());
                if let Some(kind) = kind {
                    self.core.toggle_infobox(kind);
                }
            }
            Command::NextDay => {
                let _ = self.core.advance_day();
            }
            Command::Reset => self.core.reset_scene(&mut self.host),
            Command::Quit => self.host.request_quit(),
        }
    }

    fn render_frame(&mut self) -> anyhow::Result<()> {
        let caption = self.host.caption();
        draw_frame(
            &mut self.term.cur,
            &self.core,
            self.host.can_spawn(),
            caption.as_deref(),
            Palette::new(self.settings.enable_color),
        );
        self.term.present()?;
        Ok(())
    }
}

pub fn run(settings: Settings, rules: Rules) -> anyhow::Result<()> {
    let mut app = App::init(settings, rules)?;
    let result = app.run();
    if result.is_err() {
        // Leave the terminal usable even if the loop failed.
        let _ = app.term.end();
    }
    result
}

/* -----------------------------
   Frame pacing helper
------------------------------ */

fn spin_sleep(target: Duration, now: Instant) {
    let end = now + target;
    loop {
        let t = Instant::now();
        if t >= end {
            break;
        }
        let left = end - t;
        if left > Duration::from_millis(2) {
            std::thread::sleep(Duration::from_millis(1));
        } else {
            std::hint::spin_loop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placement_waits_for_scan_and_touch() {
        let mut host = TerminalHost::new();
        let mut core = PetCore::new(Rules::default());
        host.touch();
        host.update(0.5);
        core.tick(0.5, &mut host);
        assert!(!core.is_placed());
        host.update(1.5);
        core.tick(1.5, &mut host);
        assert!(core.is_placed());
    }

    #[test]
    fn caption_expires() {
        let mut host = TerminalHost::new();
        host.play_clip("munch");
        assert_eq!(host.caption().as_deref(), Some("♪ munch"));
        host.update(2.0);
        assert_eq!(host.caption(), None);
    }

    #[test]
    fn effects_show_until_stopped() {
        let mut host = TerminalHost::new();
        host.play_effect("bubbles");
        host.play_effect("bubbles");
        assert_eq!(host.caption().as_deref(), Some("* bubbles"));
        host.stop_effect("bubbles");
        assert_eq!(host.caption(), None);
    }
}
