use crate::model::{CareKind, Magnitude};
use crate::panes::PaneState;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use std::time::Duration;

#[derive(Clone, Debug)]
pub(crate) struct InputEvent {
    pub(crate) key: KeyCode,
    pub(crate) mods: KeyModifiers,
}

/// What a key press asks of the pet core or the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Command {
    Touch,
    OpenPane(CareKind),
    Back,
    Care(Magnitude),
    ToggleHandle,
    ToggleStats,
    ToggleTip,
    NextDay,
    Reset,
    Quit,
}

pub(crate) fn collect_input_nonblocking(max_frame_time: Duration) -> anyhow::Result<Vec<InputEvent>> {
    let mut out = Vec::new();

    // poll with a tiny timeout so we stay responsive
    let timeout = std::cmp::min(Duration::from_millis(1), max_frame_time);
    while event::poll(timeout)? {
        if let Event::Key(k) = event::read()? {
            if k.kind == KeyEventKind::Press {
                out.push(InputEvent {
                    key: k.code,
                    mods: k.modifiers,
                });
                if out.len() >= 32 {
                    break;
                }
            }
        }
    }
    Ok(out)
}

/// Maps a key to a command. Buttons only exist on the pane that is showing,
/// so pane-specific keys depend on `panes`, and none of them are reachable
/// while the handle has slid the panel group away (`ui_hidden`).
pub(crate) fn map_event(
    placed: bool,
    ui_hidden: bool,
    panes: PaneState,
    ev: InputEvent,
) -> Option<Command> {
    if matches!(ev.key, KeyCode::Char('c') | KeyCode::Char('C'))
        && ev.mods.contains(KeyModifiers::CONTROL)
    {
        return Some(Command::Quit);
    }
    match ev.key {
        KeyCode::Char('q') | KeyCode::Char('Q') => return Some(Command::Quit),
        KeyCode::Char('r') | KeyCode::Char('R') if placed => return Some(Command::Reset),
        _ => {}
    }

    if !placed {
        return match ev.key {
            KeyCode::Char(' ') | KeyCode::Enter => Some(Command::Touch),
            _ => None,
        };
    }

    match ev.key {
        KeyCode::Tab => return Some(Command::ToggleHandle),
        KeyCode::Char('s') | KeyCode::Char('S') => return Some(Command::ToggleStats),
        KeyCode::Char('i') | KeyCode::Char('I') => return Some(Command::ToggleTip),
        _ => {}
    }
    if ui_hidden {
        return None;
    }

    match panes {
        PaneState::Main => match ev.key {
            KeyCode::Char('1') => Some(Command::OpenPane(CareKind::Feed)),
            KeyCode::Char('2') => Some(Command::OpenPane(CareKind::Play)),
            KeyCode::Char('3') => Some(Command::OpenPane(CareKind::Groom)),
            KeyCode::Char('n') | KeyCode::Char('N') => Some(Command::NextDay),
            _ => None,
        },
        PaneState::Care(_) => match ev.key {
            KeyCode::Char('a') | KeyCode::Char('A') => Some(Command::Care(Magnitude::Minor)),
            KeyCode::Char('b') | KeyCode::Char('B') => Some(Command::Care(Magnitude::Major)),
            KeyCode::Char('1') => Some(Command::OpenPane(CareKind::Feed)),
            KeyCode::Char('2') => Some(Command::OpenPane(CareKind::Play)),
            KeyCode::Char('3') => Some(Command::OpenPane(CareKind::Groom)),
            KeyCode::Esc | KeyCode::Backspace => Some(Command::Back),
            _ => None,
        },
        // Mid-slide: navigation still queues, buttons are not reachable.
        _ => match ev.key {
            KeyCode::Char('1') => Some(Command::OpenPane(CareKind::Feed)),
            KeyCode::Char('2') => Some(Command::OpenPane(CareKind::Play)),
            KeyCode::Char('3') => Some(Command::OpenPane(CareKind::Groom)),
            KeyCode::Esc | KeyCode::Backspace => Some(Command::Back),
            _ => None,
        },
    }
}
