//! Syntax-tree input
//!
//! This module turns the front end's generic tree into the typed AST:
//! - [`node`]: the generic [`node::SyntaxNode`] (label, description, children,
//!   properties, line), deserialized from JSON
//! - [`ast`]: closed enums for expressions and statements
//! - [`lower`]: the single pass from one to the other
//!
//! Tokenizing and tree building happen outside this crate.

pub mod ast;
pub mod lower;
pub mod node;

pub use lower::lower_program;
pub use node::SyntaxNode;
