use anyhow::{ensure, Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Per-user host settings. Command-line flags override these for a single run.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub fps_cap: u32,
    pub enable_color: bool,
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            fps_cap: 30,
            enable_color: true,
            log_level: "info".to_string(),
        }
    }
}

pub struct Paths {
    pub settings_path: PathBuf,
    pub rules_path: PathBuf,
    pub log_path: PathBuf,
}

pub fn project_paths() -> Result<Paths> {
    let proj = ProjectDirs::from("com", "arpet", "ARPet")
        .context("could not resolve project directories")?;
    let dir = proj.data_local_dir().to_path_buf();
    fs::create_dir_all(&dir)
        .with_context(|| format!("could not create data dir {}", dir.display()))?;
    Ok(Paths {
        settings_path: dir.join("settings.json"),
        rules_path: dir.join("rules.json"),
        log_path: dir.join("arpet.log"),
    })
}

pub fn load_settings(path: &Path) -> Settings {
    if let Ok(s) = fs::read_to_string(path) {
        if let Ok(v) = serde_json::from_str::<Settings>(&s) {
            return v;
        }
    }
    Settings::default()
}

pub fn save_settings_atomic(path: &Path, s: &Settings) -> Result<()> {
    let tmp = path.with_extension("json.tmp");
    let data = serde_json::to_vec_pretty(s)?;
    fs::write(&tmp, data)?;
    atomic_rename(&tmp, path)?;
    Ok(())
}

fn atomic_rename(from: &Path, to: &Path) -> Result<()> {
    // Rename-over-existing is not atomic on Windows; remove first.
    if to.exists() {
        let _ = fs::remove_file(to);
    }
    fs::rename(from, to)?;
    Ok(())
}

/// Price and reward of one care action size.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tariff {
    pub cost: u32,
    pub day_score: f32,
    pub happiness: f32,
}

/// Tunable constants of the pet core.
///
/// Every field has a default, so a rules file only needs the keys it changes.
/// Slide positions are in the host's layout units; the `slide_speed` is applied
/// once per tick, independent of frame time. Durations are in seconds.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Rules {
    // ── Economy ───────────────────────────────────────────────────────────────
    pub points_capacity: u32,
    pub base_decay: f32,
    pub happiness_day_decay: f32,
    pub stat_upper_bound: f32,
    pub initial_happiness: f32,
    pub initial_life: f32,
    pub minor: Tariff,
    pub major: Tariff,

    // ── Panels ────────────────────────────────────────────────────────────────
    pub slide_speed: f32,
    pub handle_shown: f32,
    pub handle_hidden: f32,
    pub main_expanded: f32,
    pub main_collapsed: f32,
    pub care_expanded: f32,
    pub care_collapsed: f32,

    // ── Infobox ───────────────────────────────────────────────────────────────
    pub infobox_shown: f32,
    pub infobox_hidden: f32,
    pub infobox_duration: f32,
    pub infobox_cap: u8,

    // ── Floating text ─────────────────────────────────────────────────────────
    pub floating_duration: f32,
    pub summary_duration: f32,
    pub floating_rise: f32,
    pub summary_scale: f32,

    // ── Pet cues ──────────────────────────────────────────────────────────────
    pub cue_timeout: f32,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            points_capacity: 10,
            base_decay: 0.08,
            happiness_day_decay: 0.05,
            stat_upper_bound: 1.0,
            initial_happiness: 0.5,
            initial_life: 0.5,
            minor: Tariff {
                cost: 2,
                day_score: 0.01,
                happiness: 0.1,
            },
            major: Tariff {
                cost: 4,
                day_score: 0.05,
                happiness: 0.2,
            },

            slide_speed: 25.0,
            handle_shown: -793.0,
            handle_hidden: -1059.0,
            main_expanded: 725.0,
            main_collapsed: 485.0,
            care_expanded: -83.0,
            care_collapsed: -334.0,

            infobox_shown: -140.0,
            infobox_hidden: -420.0,
            infobox_duration: 6.0,
            infobox_cap: 2,

            floating_duration: 1.5,
            summary_duration: 3.0,
            floating_rise: 40.0,
            summary_scale: 10.0,

            cue_timeout: 2.2,
        }
    }
}

impl Rules {
    /// Every reachable remainder must stay spendable, otherwise a day can end
    /// with points left over and never roll over. Holds when the capacity and
    /// the major cost are both whole multiples of the minor cost.
    pub fn validate(&self) -> Result<()> {
        let unit = self.minor.cost;
        ensure!(unit > 0, "minor action cost must be positive");
        ensure!(
            self.major.cost > 0 && self.major.cost % unit == 0,
            "major action cost {} is not a multiple of minor cost {unit}",
            self.major.cost
        );
        ensure!(
            self.points_capacity % unit == 0,
            "points capacity {} is not a multiple of minor cost {unit}",
            self.points_capacity
        );
        Ok(())
    }
}

/// Loads rules from `path`. A missing file yields the defaults; an unreadable,
/// malformed or unplayable one is an error.
pub fn load_rules(path: &Path) -> Result<Rules> {
    if !path.exists() {
        return Ok(Rules::default());
    }
    let s = fs::read_to_string(path)
        .with_context(|| format!("could not read rules file {}", path.display()))?;
    let rules = serde_json::from_str::<Rules>(&s)
        .with_context(|| format!("malformed rules file {}", path.display()))?;
    rules
        .validate()
        .with_context(|| format!("invalid tariffs in rules file {}", path.display()))?;
    Ok(rules)
}
