use crate::driver::PetCore;
use crate::floating::{FloatingKind, Tone};
use crate::infobox::tip_text;
use crate::model::{ActionKey, CareKind, Magnitude};
use crate::panes::{PaneState, Slide};
use crossterm::{
    cursor, execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{
        self, BeginSynchronizedUpdate, Clear, ClearType, DisableLineWrap, EnableLineWrap,
        EndSynchronizedUpdate, EnterAlternateScreen, LeaveAlternateScreen,
    },
};
use std::io::{self, Write};

/// Height of the bottom UI in rows, handle line included.
const UI_ROWS: i32 = 6;
const INFOBOX_W: i32 = 34;
const INFOBOX_H: i32 = 6;
/// Layout units of floating-text rise per terminal row.
const RISE_PER_ROW: f32 = 12.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Cell {
    pub(crate) ch: char,
    pub(crate) fg: Color,
    pub(crate) bg: Color,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            ch: ' ',
            fg: Color::White,
            bg: Color::Black,
        }
    }
}

pub(crate) struct CellBuffer {
    pub(crate) w: u16,
    pub(crate) h: u16,
    pub(crate) cells: Vec<Cell>,
}

impl CellBuffer {
    pub(crate) fn new(w: u16, h: u16) -> Self {
        Self {
            w,
            h,
            cells: vec![Cell::default(); (w as usize) * (h as usize)],
        }
    }
    pub(crate) fn idx(&self, x: u16, y: u16) -> usize {
        (y as usize) * (self.w as usize) + (x as usize)
    }
    /// Writes a cell; anything off-screen is dropped.
    pub(crate) fn put(&mut self, x: i32, y: i32, c: Cell) {
        if x < 0 || y < 0 || x >= self.w as i32 || y >= self.h as i32 {
            return;
        }
        let i = self.idx(x as u16, y as u16);
        self.cells[i] = c;
    }
    pub(crate) fn clear(&mut self, bg: Color) {
        for c in &mut self.cells {
            c.ch = ' ';
            c.fg = Color::White;
            c.bg = bg;
        }
    }
}

pub(crate) struct Terminal {
    pub(crate) out: io::Stdout,
    pub(crate) cols: u16,
    pub(crate) rows: u16,
    pub(crate) prev: CellBuffer,
    pub(crate) cur: CellBuffer,
}

impl Terminal {
    pub(crate) fn begin() -> anyhow::Result<Self> {
        let mut out = io::stdout();
        execute!(
            out,
            EnterAlternateScreen,
            cursor::Hide,
            DisableLineWrap,
            terminal::Clear(ClearType::All)
        )?;
        terminal::enable_raw_mode()?;

        let (cols, rows) = terminal::size()?;
        Ok(Self {
            out,
            cols,
            rows,
            prev: CellBuffer::new(cols, rows),
            cur: CellBuffer::new(cols, rows),
        })
    }

    pub(crate) fn end(&mut self) -> anyhow::Result<()> {
        queue!(
            self.out,
            BeginSynchronizedUpdate,
            ResetColor,
            Clear(ClearType::All),
            cursor::Show,
            EnableLineWrap,
            EndSynchronizedUpdate,
            LeaveAlternateScreen
        )?;
        self.out.flush()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    pub(crate) fn resize_if_needed(&mut self) -> anyhow::Result<bool> {
        let (c, r) = terminal::size()?;
        if c == self.cols && r == self.rows {
            return Ok(false);
        }
        self.cols = c;
        self.rows = r;
        self.prev = CellBuffer::new(c, r);
        self.cur = CellBuffer::new(c, r);
        queue!(self.out, Clear(ClearType::All))?;
        Ok(true)
    }

    pub(crate) fn present(&mut self) -> anyhow::Result<()> {
        queue!(self.out, BeginSynchronizedUpdate)?;

        let mut last_fg = None;
        let mut last_bg = None;

        for y in 0..self.rows {
            for x in 0..self.cols {
                let i = self.cur.idx(x, y);
                let c = self.cur.cells[i];
                if c == self.prev.cells[i] {
                    continue;
                }

                queue!(self.out, cursor::MoveTo(x, y))?;

                if last_fg != Some(c.fg) {
                    queue!(self.out, SetForegroundColor(c.fg))?;
                    last_fg = Some(c.fg);
                }
                if last_bg != Some(c.bg) {
                    queue!(self.out, SetBackgroundColor(c.bg))?;
                    last_bg = Some(c.bg);
                }

                queue!(self.out, Print(c.ch))?;
            }
        }

        queue!(self.out, ResetColor, EndSynchronizedUpdate)?;
        self.out.flush()?;
        self.prev.cells.copy_from_slice(&self.cur.cells);
        Ok(())
    }
}

/// Colours for one frame. Monochrome collapses everything to white.
#[derive(Clone, Copy)]
pub(crate) struct Palette {
    color: bool,
}

impl Palette {
    pub(crate) fn new(color: bool) -> Self {
        Self { color }
    }
    fn pick(self, c: Color) -> Color {
        if self.color {
            c
        } else {
            Color::White
        }
    }
}

/* -----------------------------
   Primitives
------------------------------ */

pub(crate) fn draw_text(buf: &mut CellBuffer, x: i32, y: i32, s: &str, fg: Color) {
    for (i, ch) in s.chars().enumerate() {
        buf.put(
            x + i as i32,
            y,
            Cell {
                ch,
                fg,
                bg: Color::Black,
            },
        );
    }
}

fn bar(value01: f32, width: usize) -> String {
    let v = value01.clamp(0.0, 1.0);
    let fill = (v * width as f32 + 0.5) as usize;
    let mut s = String::new();
    s.push('[');
    for i in 0..width {
        s.push(if i < fill { '█' } else { ' ' });
    }
    s.push(']');
    s
}

fn draw_box(buf: &mut CellBuffer, x0: i32, y0: i32, w: i32, h: i32, fg: Color) {
    if w < 2 || h < 2 {
        return;
    }
    let cell = |ch| Cell {
        ch,
        fg,
        bg: Color::Black,
    };
    for x in x0 + 1..x0 + w - 1 {
        buf.put(x, y0, cell('─'));
        buf.put(x, y0 + h - 1, cell('─'));
    }
    for y in y0 + 1..y0 + h - 1 {
        buf.put(x0, y, cell('│'));
        buf.put(x0 + w - 1, y, cell('│'));
        for x in x0 + 1..x0 + w - 1 {
            buf.put(x, y, cell(' '));
        }
    }
    buf.put(x0, y0, cell('┌'));
    buf.put(x0 + w - 1, y0, cell('┐'));
    buf.put(x0, y0 + h - 1, cell('└'));
    buf.put(x0 + w - 1, y0 + h - 1, cell('┘'));
}

/// Greedy word wrap to `width` columns.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();
    for word in text.split_whitespace() {
        if !line.is_empty() && line.chars().count() + 1 + word.chars().count() > width {
            lines.push(std::mem::take(&mut line));
        }
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(word);
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

/// Rows of a pane of `height` rows that are visible at this slide progress.
fn visible_rows(slide: &Slide, height: i32) -> i32 {
    (slide.progress() * height as f32).round() as i32
}

/* -----------------------------
   Scene
------------------------------ */

pub(crate) fn draw_frame(
    buf: &mut CellBuffer,
    core: &PetCore,
    can_spawn: bool,
    caption: Option<&str>,
    pal: Palette,
) {
    buf.clear(Color::Black);
    let cols = buf.w as i32;
    let rows = buf.h as i32;

    if !core.is_placed() {
        draw_scanning(buf, can_spawn, pal);
        return;
    }

    let d = core.display();
    let title = format!("ARPet  |  Day {}  |  Points {}", d.day, d.points);
    draw_text(buf, 1, 0, &title, pal.pick(Color::White));

    let pet_cx = cols / 2;
    let pet_top = ((rows - UI_ROWS) / 2 - 4).max(2);
    draw_pet_ascii(buf, core, pet_cx, pet_top, pal);

    if d.stats_visible {
        draw_stats(buf, core, pet_cx + 10, pet_top, pal);
    }
    if let Some(c) = caption {
        draw_text(buf, pet_cx - 8, pet_top + 8, c, pal.pick(Color::DarkCyan));
    }
    draw_floating(buf, core, pet_cx, pet_top - 1, pal);
    draw_infobox(buf, core, pal);
    draw_ui(buf, core, pal);

    if d.expired {
        let w = (cols - 2).min(44);
        let x0 = (cols - w) / 2;
        let y0 = pet_top + 2;
        draw_box(buf, x0, y0, w, 4, pal.pick(Color::Red));
        draw_text(buf, x0 + 2, y0 + 1, "Your pet's time has run out.", pal.pick(Color::Red));
        draw_text(buf, x0 + 2, y0 + 2, "Press r to start over.", pal.pick(Color::White));
    }
}

fn draw_scanning(buf: &mut CellBuffer, can_spawn: bool, pal: Palette) {
    let cols = buf.w as i32;
    let rows = buf.h as i32;
    let (msg, fg) = if can_spawn {
        ("Surface found. Press Space to place your pet.", Color::Green)
    } else {
        ("Scanning for surfaces...", Color::DarkGrey)
    };
    let x = (cols - msg.chars().count() as i32) / 2;
    draw_text(buf, x, rows / 2, msg, pal.pick(fg));
    draw_text(buf, 1, rows - 1, "q quit", pal.pick(Color::DarkGrey));
}

pub(crate) fn draw_pet_ascii(buf: &mut CellBuffer, core: &PetCore, cx: i32, top: i32, pal: Palette) {
    let mut grid = [
        "    /\\___/\\    ",
        "   (  o o  )   ",
        "   (   ^   )   ",
        "    \\ ___ /    ",
        "   /|     |\\   ",
        "  (_|_____|_)  ",
    ];

    let happiness = core.stats().happiness.get();
    if happiness < 0.3 {
        grid[3] = "    \\ --- /    ";
    }
    match core.active_cue() {
        Some("isEating") => grid[3] = "    \\ (O) /    ",
        Some("isRunning") => grid[5] = "  (_/_____\\_)  ",
        Some("isBathing") => grid[0] = "  o /\\___/\\ o  ",
        _ => {}
    }
    if core.display().expired {
        grid[1] = "   (  x x  )   ";
    }

    let fg = pal.pick(if happiness >= 0.6 {
        Color::Yellow
    } else {
        Color::White
    });
    let x0 = cx - 7;
    for (yy, line) in grid.iter().enumerate() {
        draw_text(buf, x0, top + yy as i32, line, fg);
    }
}

fn draw_stats(buf: &mut CellBuffer, core: &PetCore, x: i32, y: i32, pal: Palette) {
    let d = core.display();
    let fg = pal.pick(Color::White);
    draw_text(buf, x, y, &format!("Happy {}", bar(d.happiness, 10)), fg);
    draw_text(buf, x, y + 1, &format!("Life  {}", bar(d.life, 10)), fg);
    draw_text(buf, x, y + 2, &format!("Today {}", d.day_score), fg);
}

fn draw_floating(buf: &mut CellBuffer, core: &PetCore, cx: i32, base_y: i32, pal: Palette) {
    let Some(score) = core.floating().active() else {
        return;
    };
    let fg = match (score.tone, score.alpha() < 0.35) {
        (_, true) => Color::DarkGrey,
        (Tone::Gain, false) => Color::Green,
        (Tone::Loss, false) => Color::Red,
    };
    let text = match score.kind {
        FloatingKind::Action => score.text.clone(),
        FloatingKind::DaySummary => format!("life {}", score.text),
    };
    let y = base_y - (score.offset / RISE_PER_ROW) as i32;
    let x = cx - text.chars().count() as i32 / 2;
    draw_text(buf, x, y.max(1), &text, pal.pick(fg));
}

fn draw_infobox(buf: &mut CellBuffer, core: &PetCore, pal: Palette) {
    let infobox = core.infobox();
    let Some(kind) = infobox.current() else {
        return;
    };
    let cols = buf.w as i32;
    let shown = (infobox.slide().progress() * INFOBOX_W as f32).round() as i32;
    if shown <= 0 {
        return;
    }
    let x0 = cols - shown;
    let y0 = 1;
    let fg = pal.pick(Color::Cyan);
    draw_box(buf, x0, y0, INFOBOX_W, INFOBOX_H, fg);
    draw_text(buf, x0 + 2, y0, &format!(" {} tip ", kind.label()), fg);
    for (i, line) in wrap(tip_text(kind), (INFOBOX_W - 4) as usize)
        .iter()
        .take((INFOBOX_H - 2) as usize)
        .enumerate()
    {
        draw_text(buf, x0 + 2, y0 + 1 + i as i32, line, pal.pick(Color::White));
    }
}

fn draw_ui(buf: &mut CellBuffer, core: &PetCore, pal: Palette) {
    let rows = buf.h as i32;
    let cols = buf.w as i32;

    // The handle slides the whole UI below the bottom edge.
    let handle_rows = visible_rows(core.handle().slide(), UI_ROWS - 1);
    let top = rows - 1 - handle_rows;

    let handle_label = if core.handle().is_hidden() {
        " Tab show "
    } else {
        " Tab hide "
    };
    let rule: String = "▔".repeat(cols.max(0) as usize);
    draw_text(buf, 0, top, &rule, pal.pick(Color::DarkGrey));
    draw_text(buf, 2, top, handle_label, pal.pick(Color::Grey));

    let pane_h = UI_ROWS - 1;
    let pane_bottom = top + pane_h;
    let panes = core.panes();

    let main_rows = visible_rows(panes.main_slide(), pane_h);
    if main_rows > 0 {
        let lines = main_pane_lines(core);
        draw_pane(buf, &lines, pane_bottom, main_rows, pal);
    }
    for kind in CareKind::ALL {
        let care_rows = visible_rows(panes.care_slide(kind), pane_h);
        if care_rows > 0 {
            let lines = care_pane_lines(core, kind);
            draw_pane(buf, &lines, pane_bottom, care_rows, pal);
        }
    }
}

/// Draws the first `visible` lines of a pane so its top edge rises from
/// `bottom` as it expands.
fn draw_pane(buf: &mut CellBuffer, lines: &[(String, Color)], bottom: i32, visible: i32, pal: Palette) {
    let top = bottom - visible + 1;
    for (i, (line, fg)) in lines.iter().take(visible.max(0) as usize).enumerate() {
        draw_text(buf, 2, top + i as i32, line, pal.pick(*fg));
    }
}

fn main_pane_lines(core: &PetCore) -> Vec<(String, Color)> {
    let d = core.display();
    let next_day = if d.can_advance_day {
        ("n  Next day".to_string(), Color::Green)
    } else {
        ("n  Next day (spend all points first)".to_string(), Color::DarkGrey)
    };
    vec![
        ("1  Feed     2  Play     3  Groom".to_string(), Color::White),
        next_day,
        ("s  Stats    i  Tip".to_string(), Color::White),
        ("r  Reset    q  Quit".to_string(), Color::DarkGrey),
        (String::new(), Color::White),
    ]
}

fn care_pane_lines(core: &PetCore, kind: CareKind) -> Vec<(String, Color)> {
    let button = |magnitude: Magnitude, hotkey: char| {
        let key = ActionKey::new(kind, magnitude);
        let fx = core.effect(key);
        let fg = if core.can_afford(key) {
            Color::White
        } else {
            Color::DarkGrey
        };
        (format!("{hotkey}  {:<6} ({} pts)", fx.cues.label, fx.cost), fg)
    };
    let title = if core.panes().state() == PaneState::Care(kind) {
        Color::Yellow
    } else {
        Color::Grey
    };
    vec![
        (format!("[{}]", kind.label()), title),
        button(Magnitude::Minor, 'a'),
        button(Magnitude::Major, 'b'),
        ("i  Tip   Esc  Back".to_string(), Color::DarkGrey),
        (String::new(), Color::White),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_respects_width() {
        let lines = wrap("a fed pet is a happy pet", 10);
        assert!(lines.iter().all(|l| l.chars().count() <= 10));
        assert_eq!(lines.join(" "), "a fed pet is a happy pet");
    }

    #[test]
    fn put_ignores_off_screen_cells() {
        let mut buf = CellBuffer::new(4, 2);
        buf.put(-1, 0, Cell::default());
        buf.put(4, 1, Cell::default());
        buf.put(
            3,
            1,
            Cell {
                ch: 'x',
                ..Cell::default()
            },
        );
        assert_eq!(buf.cells[buf.idx(3, 1)].ch, 'x');
    }
}
