//! Scope-context stack
//!
//! This module provides the lexical environments of a running program:
//! - [`ScopeStack`]: LIFO stack of contexts
//! - [`ScopeContext`]: one environment (variables, functions, captured return value)
//! - [`ScopeKind`]: what construct pushed the context
//!
//! # Lookup
//!
//! A context stores only its own bindings. Lookups walk from the innermost context
//! outward, so a child sees everything visible in its parent and can shadow a name
//! without touching the parent's map. The parent cannot gain bindings while the
//! child is on top, so the child always observes the parent as it was at push time.
//!
//! # Reclamation
//!
//! [`ScopeStack::pop`] frees every heap range owned by the popped context's id,
//! bound variables and leftover temporaries alike.

use super::heap::Heap;
use super::value::{ScopeId, Variable};
use crate::syntax::ast::FunctionDef;
use rustc_hash::FxHashMap;
use std::fmt;
use std::rc::Rc;
use tracing::debug;

/// Construct that pushed a scope context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    Global,
    Function,
    Block,
    Loop,
}

impl fmt::Display for ScopeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScopeKind::Global => write!(f, "global"),
            ScopeKind::Function => write!(f, "function"),
            ScopeKind::Block => write!(f, "block"),
            ScopeKind::Loop => write!(f, "loop"),
        }
    }
}

/// A lexical environment
#[derive(Debug, Clone)]
pub struct ScopeContext {
    id: ScopeId,
    kind: ScopeKind,
    name: String,
    variables: FxHashMap<String, Variable>,
    functions: FxHashMap<String, Rc<FunctionDef>>,
    return_value: Option<Variable>,
}

impl ScopeContext {
    fn new(id: ScopeId, kind: ScopeKind, name: String) -> Self {
        ScopeContext {
            id,
            kind,
            name,
            variables: FxHashMap::default(),
            functions: FxHashMap::default(),
            return_value: None,
        }
    }

    pub fn id(&self) -> ScopeId {
        self.id
    }

    pub fn kind(&self) -> ScopeKind {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Variables bound directly in this context, sorted by name
    pub fn variables(&self) -> Vec<(&str, &Variable)> {
        let mut vars: Vec<(&str, &Variable)> = self
            .variables
            .iter()
            .map(|(name, var)| (name.as_str(), var))
            .collect();
        vars.sort_by(|a, b| a.0.cmp(b.0));
        vars
    }

    /// Functions defined directly in this context, sorted by name
    pub fn functions(&self) -> Vec<&FunctionDef> {
        let mut defs: Vec<&FunctionDef> = self.functions.values().map(|def| def.as_ref()).collect();
        defs.sort_by(|a, b| a.name.cmp(&b.name));
        defs
    }

    pub fn return_value(&self) -> Option<Variable> {
        self.return_value
    }

    /// Get a variable bound directly in this context
    pub fn get_var(&self, name: &str) -> Option<&Variable> {
        self.variables.get(name)
    }
}

/// One line of a scope trace
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeFrame {
    pub id: ScopeId,
    pub kind: ScopeKind,
    pub name: String,
}

impl fmt::Display for ScopeFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} {})", self.name, self.kind, self.id)
    }
}

/// The scope-context stack
#[derive(Debug, Clone)]
pub struct ScopeStack {
    contexts: Vec<ScopeContext>,
    next_id: u32,
}

impl ScopeStack {
    pub fn new() -> Self {
        ScopeStack {
            contexts: Vec::new(),
            next_id: ScopeId::GLOBAL.0,
        }
    }

    /// Push a new context on top of the current one
    pub fn push(&mut self, kind: ScopeKind, name: &str) -> ScopeId {
        let id = ScopeId(self.next_id);
        self.next_id += 1;
        self.contexts
            .push(ScopeContext::new(id, kind, name.to_string()));
        id
    }

    /// Pop the top context and free every heap range it owns
    pub fn pop(&mut self, heap: &mut Heap) -> Option<ScopeContext> {
        let ctx = self.contexts.pop()?;
        for (name, var) in &ctx.variables {
            let owned_here = heap
                .ownership(var.pointer)
                .is_ok_and(|ownership| ownership.scope() == ctx.id);
            if owned_here {
                debug!(name = %name, pointer = %var.pointer, var_type = %var.var_type, scope = %ctx.name, "freeing");
            }
        }
        heap.free_owned_by(ctx.id);
        Some(ctx)
    }

    /// Read an ancestor context, 0 being the innermost
    pub fn peek(&self, depth: usize) -> Option<&ScopeContext> {
        let index = self.contexts.len().checked_sub(depth + 1)?;
        self.contexts.get(index)
    }

    /// Get the current (top) context
    pub fn current(&self) -> Option<&ScopeContext> {
        self.contexts.last()
    }

    /// Id of the current context (global id when the stack is empty)
    pub fn current_id(&self) -> ScopeId {
        self.contexts.last().map_or(ScopeId::GLOBAL, |ctx| ctx.id)
    }

    /// Look up a variable visible from the current context
    pub fn lookup_variable(&self, name: &str) -> Option<&Variable> {
        self.contexts
            .iter()
            .rev()
            .find_map(|ctx| ctx.variables.get(name))
    }

    /// Look up a function visible from the current context
    pub fn lookup_function(&self, name: &str) -> Option<Rc<FunctionDef>> {
        self.contexts
            .iter()
            .rev()
            .find_map(|ctx| ctx.functions.get(name))
            .cloned()
    }

    /// Bind a variable in the current context. Returns false if the stack is empty.
    pub fn bind_variable(&mut self, name: &str, var: Variable) -> bool {
        match self.contexts.last_mut() {
            Some(ctx) => {
                ctx.variables.insert(name.to_string(), var);
                true
            }
            None => false,
        }
    }

    /// Define a function in the current context. Returns false if the stack is empty.
    pub fn define_function(&mut self, def: Rc<FunctionDef>) -> bool {
        match self.contexts.last_mut() {
            Some(ctx) => {
                ctx.functions.insert(def.name.clone(), def);
                true
            }
            None => false,
        }
    }

    /// Number of function contexts on the stack
    pub fn call_depth(&self) -> usize {
        self.contexts
            .iter()
            .filter(|ctx| ctx.kind == ScopeKind::Function)
            .count()
    }

    /// Index of the innermost function context
    fn innermost_function(&self) -> Option<usize> {
        self.contexts
            .iter()
            .rposition(|ctx| ctx.kind == ScopeKind::Function)
    }

    /// Id of the context that was on top when the innermost function was called
    pub fn caller_id(&self) -> Option<ScopeId> {
        let index = self.innermost_function()?;
        index
            .checked_sub(1)
            .and_then(|caller| self.contexts.get(caller))
            .map(|ctx| ctx.id)
    }

    /// Store a return value on the innermost function context.
    ///
    /// Returns false when no function is executing.
    pub fn set_return_value(&mut self, value: Option<Variable>) -> bool {
        match self.innermost_function() {
            Some(index) => {
                self.contexts[index].return_value = value;
                true
            }
            None => false,
        }
    }

    /// Oldest scope whose temporaries may be swept between statements: the
    /// innermost function context, or the bottom of the stack
    pub fn sweep_floor(&self) -> ScopeId {
        match self.innermost_function() {
            Some(index) => self.contexts[index].id,
            None => self.contexts.first().map_or(ScopeId::GLOBAL, |ctx| ctx.id),
        }
    }

    /// Scope trace, innermost first
    pub fn trace(&self) -> Vec<ScopeFrame> {
        self.contexts
            .iter()
            .rev()
            .map(|ctx| ScopeFrame {
                id: ctx.id,
                kind: ctx.kind,
                name: ctx.name.clone(),
            })
            .collect()
    }

    /// All contexts, outermost first
    pub fn contexts(&self) -> &[ScopeContext] {
        &self.contexts
    }

    /// Get the depth of the stack
    pub fn depth(&self) -> usize {
        self.contexts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contexts.is_empty()
    }
}

impl Default for ScopeStack {
    fn default() -> Self {
        Self::new()
    }
}
