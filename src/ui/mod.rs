//! Terminal inspector built on [ratatui](https://github.com/ratatui-org/ratatui).
//!
//! The inspector replays the snapshots recorded by a finished (or faulted) run:
//!
//! - **[`app`]**: navigation state, keyboard event loop, pane focus
//! - **[`panes`]**: stateless render functions for the scope, heap, output and
//!   status panes
//! - **[`theme`]**: color palette shared by all panes
//!
//! Construct an [`App`] from an [`Interpreter`] that ran with snapshot recording
//! enabled and call [`App::run`] to start the event loop.
//!
//! [`Interpreter`]: crate::interpreter::engine::Interpreter
//! [`App::run`]: app::App::run

pub mod app;
pub mod panes;
pub mod theme;

pub use app::App;
