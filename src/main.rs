// Lingo: heap-simulating evaluator for JSON syntax trees

use std::fs;
use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use lingo::config::RunConfig;
use lingo::interpreter::constants::{DEFAULT_HEAP_SIZE, DEFAULT_SNAPSHOT_LIMIT};
use lingo::interpreter::diagnostics::{interrupt, Diagnostic};
use lingo::interpreter::engine::Interpreter;
use lingo::syntax::{lower_program, SyntaxNode};
use lingo::ui::App;

#[derive(Parser, Debug)]
#[command(name = "lingo", about = "Evaluate a JSON syntax tree over a simulated heap")]
struct Args {
    /// Syntax tree to execute (JSON)
    tree: PathBuf,

    /// Heap capacity in bytes
    #[arg(long = "heap-size", default_value_t = DEFAULT_HEAP_SIZE)]
    heap_size: usize,

    /// Keep temporaries alive until their scope ends
    #[arg(long = "no-sweep")]
    no_sweep: bool,

    /// Log every call, binding and free
    #[arg(long)]
    trace: bool,

    /// Open the heap inspector after the run
    #[arg(long)]
    inspect: bool,

    /// Memory budget for the inspector's history, in bytes
    #[arg(long = "snapshot-limit", default_value_t = DEFAULT_SNAPSHOT_LIMIT)]
    snapshot_limit: usize,
}

impl Args {
    fn run_config(&self) -> RunConfig {
        let mut config = RunConfig::default().with_heap_size(self.heap_size);
        if self.no_sweep {
            config = config.without_sweep();
        }
        if self.inspect {
            config.recording_snapshots(self.snapshot_limit)
        } else {
            config.echoing_output()
        }
    }
}

/// Install the fmt subscriber; `RUST_LOG` overrides the default level
fn init_tracing(trace: bool) {
    let default_level = if trace { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_level(true))
        .with(filter)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();

    // The inspector owns the terminal; log lines would corrupt it
    if !args.inspect {
        init_tracing(args.trace);
    }

    let text = fs::read_to_string(&args.tree)
        .with_context(|| format!("failed to read {}", args.tree.display()))?;
    let root = SyntaxNode::from_json(&text)
        .with_context(|| format!("{} is not a valid syntax tree", args.tree.display()))?;

    let program = match lower_program(&root) {
        Ok(program) => program,
        Err(err) => interrupt(&Diagnostic::from_error(&err)),
    };
    info!(statements = program.body.len(), "syntax tree lowered");

    let mut interpreter = Interpreter::new(program, args.run_config());
    let fault = interpreter.run().err().map(|err| interpreter.diagnose(&err));

    if !args.inspect {
        if let Some(diagnostic) = fault {
            interrupt(&diagnostic);
        }
        return Ok(());
    }

    interpreter.history_mut().rewind_to_start();
    inspect(interpreter, fault.clone())?;

    match fault {
        Some(diagnostic) => interrupt(&diagnostic),
        None => Ok(()),
    }
}

fn inspect(interpreter: Interpreter, fault: Option<Diagnostic>) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(interpreter, fault);
    let res = app.run(&mut terminal);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res.context("inspector failed")
}
