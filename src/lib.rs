//! # Introduction
//!
//! Lingo evaluates programs handed to it as a generic JSON syntax tree. Every
//! value a program touches lives in a small simulated heap: a fixed byte array
//! with a registry of generation-checked pointers, each owned by a scope context
//! or marked as a temporary. The heap can be replayed statement by statement in
//! a terminal inspector built with [ratatui](https://docs.rs/ratatui).
//!
//! ## Execution pipeline
//!
//! ```text
//! JSON → SyntaxNode → lowering → AST → Interpreter → (Snapshots → Inspector)
//! ```
//!
//! 1. [`syntax`]: the JSON node shape and its lowering into closed enums.
//! 2. [`interpreter`]: walks the AST, allocating every intermediate result on
//!    the heap and sweeping temporaries between statements.
//! 3. [`memory`]: the [`memory::heap::Heap`], the [`memory::scope::ScopeStack`]
//!    and the value and pointer types they share.
//! 4. [`snapshot`]: recorded per-statement states and the printed output.
//! 5. [`ui`]: the ratatui inspector; not part of the stable library API.
//!
//! ## Language
//!
//! Values: numbers (IEEE-754 doubles) and booleans.
//! Operators: `+ - * /`, `< > <= >= == !=`, `&& ||`, unary `+ -`, assignment
//! `=` and print `#`.
//! Control flow: blocks, `if/else`, `loop` with an optional condition, `break`,
//! user functions with `return`.

pub mod config;
pub mod interpreter;
pub mod memory;
pub mod snapshot;
pub mod syntax;
pub mod ui;
