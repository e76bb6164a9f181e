//! Terminal input and output for the interactive loop.

use crate::hud;
use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{execute, QueueableCommand};
use rec3d_render::{Frame, FrameSink, HeldKeys, InputSource, Key};
use std::io::{self, BufWriter, Stdout, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Owns the terminal while the loop runs: alternate screen, raw mode and a
/// buffered writer. Dropping it restores the terminal, including when
/// setup fails partway.
pub struct TerminalDisplay<W: Write = Stdout> {
    out: BufWriter<W>,
    presented: u64,
}

impl TerminalDisplay {
    pub fn new() -> io::Result<Self> {
        Self::open(io::stdout())
    }
}

impl<W: Write> TerminalDisplay<W> {
    /// Enters the alternate screen on `out` and switches the tty to raw
    /// mode. The guard exists before raw mode is requested, so an error
    /// after this point still leaves the alternate screen.
    pub fn open(out: W) -> io::Result<Self> {
        let mut display = Self {
            out: BufWriter::new(out),
            presented: 0,
        };
        execute!(display.out, EnterAlternateScreen, Hide)?;
        terminal::enable_raw_mode()?;
        execute!(display.out, Clear(ClearType::All))?;
        Ok(display)
    }
}

/// Keyboard events plus the shared quit flag set by the signal handler.
pub struct TerminalInput {
    tick: Duration,
    quit: Arc<AtomicBool>,
}

impl TerminalInput {
    pub fn new(tick: Duration, quit: Arc<AtomicBool>) -> Self {
        Self { tick, quit }
    }
}

impl InputSource for TerminalInput {
    /// Collects every key seen during one tick. Terminals report presses and
    /// auto-repeat, not releases, so a key counts as held for the tick in
    /// which it was reported.
    fn poll(&mut self) -> io::Result<HeldKeys> {
        let deadline = Instant::now() + self.tick;
        let mut keys = HeldKeys::none();

        loop {
            if self.quit.load(Ordering::SeqCst) {
                keys.press(Key::Quit);
            }
            if keys.is_held(Key::Quit) {
                break;
            }
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() || !event::poll(remaining)? {
                break;
            }
            if let Event::Key(key_event) = event::read()? {
                if key_event.kind == KeyEventKind::Release {
                    continue;
                }
                if let Some(key) = map_key(key_event) {
                    keys.press(key);
                }
            }
        }

        Ok(keys)
    }
}

impl<W: Write> FrameSink for TerminalDisplay<W> {
    fn present(&mut self, frame: &Frame) -> io::Result<()> {
        let (cols, _) = terminal::size()?;
        let cols = usize::from(cols);

        for (row, line) in frame.rows.iter().enumerate() {
            self.out.queue(MoveTo(0, screen_row(row)))?;
            write!(self.out, "{}", hud::center_line(line, cols))?;
            self.out.queue(Clear(ClearType::UntilNewLine))?;
        }
        self.out.queue(Clear(ClearType::FromCursorDown))?;

        self.presented += 1;
        let status = hud::status_line(&frame.pose, self.presented, cols);
        self.out.queue(MoveTo(0, screen_row(frame.rows.len() + 1)))?;
        write!(self.out, "{status}")?;

        self.out.flush()
    }
}

impl<W: Write> Drop for TerminalDisplay<W> {
    fn drop(&mut self) {
        if let Err(err) = terminal::disable_raw_mode() {
            tracing::warn!(%err, "failed to leave raw mode");
        }
        if let Err(err) = execute!(self.out, Show, LeaveAlternateScreen) {
            tracing::warn!(%err, "failed to leave alternate screen");
        }
    }
}

fn screen_row(row: usize) -> u16 {
    u16::try_from(row).unwrap_or(u16::MAX)
}

/// Maps a terminal key event to a loop key. Unbound keys give `None`.
pub fn map_key(event: KeyEvent) -> Option<Key> {
    match (event.modifiers, event.code) {
        (KeyModifiers::CONTROL, KeyCode::Char('c')) => Some(Key::Quit),
        (_, KeyCode::Esc) => Some(Key::Quit),
        (_, KeyCode::Up) => Some(Key::LookUp),
        (_, KeyCode::Down) => Some(Key::LookDown),
        (_, KeyCode::Left) => Some(Key::LookLeft),
        (_, KeyCode::Right) => Some(Key::LookRight),
        (modifiers, KeyCode::Char(c)) if !modifiers.contains(KeyModifiers::CONTROL) => {
            match c.to_ascii_lowercase() {
                'w' => Some(Key::Forward),
                's' => Some(Key::Backward),
                'a' => Some(Key::StrafeLeft),
                'd' => Some(Key::StrafeRight),
                'q' => Some(Key::Quit),
                _ => None,
            }
        }
        _ => None,
    }
}
