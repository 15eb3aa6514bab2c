pub mod assign;
pub mod binary;
pub mod unary;

// All operators are `impl Interpreter` blocks; nothing to re-export
