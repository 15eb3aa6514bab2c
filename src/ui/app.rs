//! Inspector application state and event loop

use crate::interpreter::diagnostics::Diagnostic;
use crate::interpreter::engine::Interpreter;
use crate::memory::{heap::Heap, scope::ScopeStack};
use crate::snapshot::OutputBuffer;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    Frame, Terminal,
};
use std::io;
use std::time::{Duration, Instant};

/// Which pane is currently focused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusedPane {
    Scopes,
    Heap,
    Output,
}

impl FocusedPane {
    /// Move focus to the next pane (scopes -> heap -> output)
    pub fn next(self) -> Self {
        match self {
            FocusedPane::Scopes => FocusedPane::Heap,
            FocusedPane::Heap => FocusedPane::Output,
            FocusedPane::Output => FocusedPane::Scopes,
        }
    }
}

/// The inspector state
pub struct App {
    /// Interpreter whose recorded history is being replayed
    pub interpreter: Interpreter,

    /// Fault the run stopped on, if any
    pub fault: Option<Diagnostic>,

    pub focused_pane: FocusedPane,

    /// Per-pane scroll offsets
    pub scope_scroll: usize,
    pub heap_scroll: usize,
    pub output_scroll: usize,

    pub should_quit: bool,

    /// Status message to display
    pub status_message: String,

    /// Whether auto-play mode is active
    pub is_playing: bool,

    /// Last time a step was taken in play mode
    pub last_play_time: Instant,
}

impl App {
    pub fn new(interpreter: Interpreter, fault: Option<Diagnostic>) -> Self {
        let status_message = match &fault {
            Some(diagnostic) => diagnostic.headline(),
            None => String::from("Ready!"),
        };

        App {
            interpreter,
            fault,
            focused_pane: FocusedPane::Scopes,
            scope_scroll: 0,
            heap_scroll: 0,
            output_scroll: 0,
            should_quit: false,
            status_message,
            is_playing: false,
            last_play_time: Instant::now(),
        }
    }

    /// Run the event loop until the user quits
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.should_quit {
                break;
            }

            if self.is_playing && self.last_play_time.elapsed() >= Duration::from_millis(500) {
                if self.interpreter.history_mut().step_forward() {
                    self.output_scroll = usize::MAX;
                } else {
                    self.is_playing = false;
                    self.status_message = "Playback complete".to_string();
                }
                self.last_play_time = Instant::now();
            }

            // Poll with a timeout so auto-play keeps ticking
            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key_event(key);
                    }
                }
            }
        }

        Ok(())
    }

    fn render(&mut self, frame: &mut Frame) {
        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(frame.area());

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(main_chunks[0]);

        // Left column: Scopes (top) | Output (bottom)
        let left_rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
            .split(columns[0]);

        let history = self.interpreter.history();
        let (heap, scopes, output, line, faulted): (&Heap, &ScopeStack, &OutputBuffer, usize, bool) =
            match history.current() {
                Some(snapshot) => (
                    &snapshot.heap,
                    &snapshot.scopes,
                    &snapshot.output,
                    snapshot.line,
                    snapshot.faulted,
                ),
                None => (
                    self.interpreter.heap(),
                    self.interpreter.scopes(),
                    self.interpreter.output(),
                    self.interpreter.current_line(),
                    self.fault.is_some(),
                ),
            };

        super::panes::render_scope_pane(
            frame,
            left_rows[0],
            scopes,
            heap,
            self.focused_pane == FocusedPane::Scopes,
            &mut self.scope_scroll,
        );

        super::panes::render_output_pane(
            frame,
            left_rows[1],
            output,
            self.focused_pane == FocusedPane::Output,
            &mut self.output_scroll,
        );

        super::panes::render_heap_pane(
            frame,
            columns[1],
            heap,
            self.focused_pane == FocusedPane::Heap,
            &mut self.heap_scroll,
        );

        let message = match (&self.fault, faulted) {
            (Some(diagnostic), true) => diagnostic.headline(),
            _ => self.status_message.clone(),
        };

        super::panes::render_status_bar(
            frame,
            main_chunks[1],
            super::panes::StatusRenderData {
                message: &message,
                current_step: history.position(),
                total_steps: history.len().max(1),
                line,
                faulted,
                is_playing: self.is_playing,
            },
        );
    }

    fn handle_key_event(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Tab => {
                self.focused_pane = self.focused_pane.next();
            }
            KeyCode::Left => {
                self.is_playing = false;
                self.status_message = if self.interpreter.history_mut().step_backward() {
                    "Stepped backward".to_string()
                } else {
                    "Already at the first step".to_string()
                };
            }
            KeyCode::Right => {
                self.is_playing = false;
                self.status_message = if self.interpreter.history_mut().step_forward() {
                    "Stepped forward".to_string()
                } else {
                    "Already at the last step".to_string()
                };
                self.output_scroll = usize::MAX;
            }
            KeyCode::Up => {
                let scroll = self.focused_scroll();
                *scroll = scroll.saturating_sub(1);
            }
            KeyCode::Down => {
                let scroll = self.focused_scroll();
                *scroll = scroll.saturating_add(1);
            }
            KeyCode::Char(' ') => {
                self.is_playing = !self.is_playing;
                self.status_message = if self.is_playing {
                    "Playing...".to_string()
                } else {
                    "Paused".to_string()
                };
            }
            KeyCode::Enter => {
                self.is_playing = false;
                self.interpreter.history_mut().jump_to_end();
                self.status_message = "Jumped to end".to_string();
                self.output_scroll = usize::MAX;
            }
            KeyCode::Backspace => {
                self.is_playing = false;
                self.interpreter.history_mut().rewind_to_start();
                self.status_message = "Jumped to start".to_string();
            }
            _ => {}
        }
    }

    fn focused_scroll(&mut self) -> &mut usize {
        match self.focused_pane {
            FocusedPane::Scopes => &mut self.scope_scroll,
            FocusedPane::Heap => &mut self.heap_scroll,
            FocusedPane::Output => &mut self.output_scroll,
        }
    }
}
