// Execution engine for the evaluator

use crate::config::RunConfig;
use crate::interpreter::constants::GLOBAL_SCOPE_NAME;
use crate::interpreter::errors::RuntimeError;
use crate::memory::heap::Heap;
use crate::memory::scope::{ScopeKind, ScopeStack};
use crate::memory::value::{Ownership, ScopeId, Value, Variable};
use crate::snapshot::{OutputBuffer, Snapshot, SnapshotManager};
use crate::syntax::ast::{Program, Stmt};
use std::rc::Rc;
use tracing::{debug, info};

/// Control-flow signal left behind by `break` and `return`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ControlFlow {
    Normal,
    Break,
    Return,
}

/// The main interpreter that executes a lowered program
pub struct Interpreter {
    /// Lowered program
    program: Rc<Program>,

    /// Simulated heap backing every runtime value
    pub(crate) heap: Heap,

    /// Lexical environments, global at the bottom
    pub(crate) scopes: ScopeStack,

    /// Values written by `#`
    pub(crate) output: OutputBuffer,

    pub(crate) config: RunConfig,

    /// Source line of the node being executed
    pub(crate) current_line: usize,

    /// Pending `break` / `return`
    pub(crate) control_flow: ControlFlow,

    /// Per-statement history for the inspector
    snapshots: SnapshotManager,

    /// Whether execution has finished
    finished: bool,
}

impl Interpreter {
    /// Create a new interpreter with the global scope already pushed
    pub fn new(program: Program, config: RunConfig) -> Self {
        let mut scopes = ScopeStack::new();
        scopes.push(ScopeKind::Global, GLOBAL_SCOPE_NAME);

        Interpreter {
            program: Rc::new(program),
            heap: Heap::new(config.heap_size),
            scopes,
            output: OutputBuffer::new(),
            snapshots: SnapshotManager::new(config.snapshot_limit),
            config,
            current_line: 0,
            control_flow: ControlFlow::Normal,
            finished: false,
        }
    }

    /// Run the program from start to finish
    ///
    /// On a fault the scope stack and heap are left exactly as they were at the
    /// failing node, so [`Interpreter::diagnose`] can report them.
    pub fn run(&mut self) -> Result<(), RuntimeError> {
        info!("starting execution");
        let program = Rc::clone(&self.program);

        self.take_snapshot()?;
        if let Err(err) = self.execute(&program.body) {
            self.record_fault();
            return Err(err);
        }

        self.control_flow = ControlFlow::Normal;
        self.finished = true;
        info!(
            occupied = self.heap.occupied(),
            capacity = self.heap.capacity(),
            "program executed"
        );
        Ok(())
    }

    /// Execute a statement list in the current scope.
    ///
    /// Stops early when a statement leaves a `break` or `return` pending.
    pub fn execute(&mut self, stmts: &[Stmt]) -> Result<(), RuntimeError> {
        for stmt in stmts {
            self.execute_statement(stmt)?;
            if self.control_flow != ControlFlow::Normal {
                return Ok(());
            }
            self.finish_statement()?;
        }
        Ok(())
    }

    /// Free every temporary on the heap, regardless of owning scope.
    ///
    /// Returns the number of pointers freed.
    pub fn sweep_temporaries(&mut self) -> usize {
        self.heap.sweep_temporaries()
    }

    /// Decode the value behind a variable
    pub fn read_value(&self, var: Variable) -> Result<Value, RuntimeError> {
        Ok(self.heap.read_value(var.pointer, var.var_type)?)
    }

    /// Look up a binding visible from the current scope
    pub fn variable(&self, name: &str) -> Option<Variable> {
        self.scopes.lookup_variable(name).copied()
    }

    /// Look up a binding and decode its value
    pub fn value_of(&self, name: &str) -> Option<Value> {
        let var = self.variable(name)?;
        self.read_value(var).ok()
    }

    /// Sweep, then snapshot, after one statement of the current list
    fn finish_statement(&mut self) -> Result<(), RuntimeError> {
        if self.config.sweep_temporaries {
            let floor = self.scopes.sweep_floor();
            let swept = self.heap.sweep_temporaries_from(floor);
            if swept > 0 {
                debug!(swept, floor = %floor, "swept temporaries");
            }
        }
        self.take_snapshot()
    }

    /// Run `body` inside a fresh scope context.
    ///
    /// The context is popped when `body` returns normally, including after a
    /// `break` or `return`. A fault leaves it on the stack for the report.
    pub(crate) fn with_scope<T>(
        &mut self,
        kind: ScopeKind,
        name: &str,
        body: impl FnOnce(&mut Self, ScopeId) -> Result<T, RuntimeError>,
    ) -> Result<T, RuntimeError> {
        let id = self.enter_scope(kind, name);
        let result = body(self, id)?;
        self.exit_scope();
        Ok(result)
    }

    fn enter_scope(&mut self, kind: ScopeKind, name: &str) -> ScopeId {
        let id = self.scopes.push(kind, name);
        debug!(scope = name, id = %id, kind = %kind, "enter scope");
        id
    }

    fn exit_scope(&mut self) {
        if let Some(ctx) = self.scopes.pop(&mut self.heap) {
            debug!(scope = ctx.name(), id = %ctx.id(), "exit scope");
        }
    }

    /// Allocate a fresh temporary in the current scope holding `value`
    pub(crate) fn alloc_value(&mut self, value: Value) -> Result<Variable, RuntimeError> {
        let var_type = value.var_type();
        let owner = Ownership::Temporary(self.scopes.current_id());
        let pointer = self.heap.allocate(var_type.size(), owner)?;
        self.heap.write_value(pointer, value)?;
        Ok(Variable::new(pointer, var_type))
    }

    /// Copy a variable's bytes into a new allocation with the given ownership
    pub(crate) fn duplicate(
        &mut self,
        var: Variable,
        ownership: Ownership,
    ) -> Result<Variable, RuntimeError> {
        self.heap.validate(var.pointer)?;
        let pointer = self.heap.allocate(var.pointer.size(), ownership)?;
        self.heap.copy(var.pointer, pointer)?;
        Ok(Variable::new(pointer, var.var_type))
    }

    /// Hand a value to a binding in `scope`.
    ///
    /// Temporaries are adopted in place. Storage that already backs another
    /// binding is copied first so two names never share one range.
    pub(crate) fn take_ownership(
        &mut self,
        var: Variable,
        scope: ScopeId,
    ) -> Result<Variable, RuntimeError> {
        match self.heap.ownership(var.pointer)? {
            Ownership::Temporary(_) => {
                self.heap.adopt(var.pointer, scope)?;
                Ok(var)
            }
            Ownership::Owned(_) => self.duplicate(var, Ownership::Owned(scope)),
        }
    }

    /// Hand a value to `scope` as a temporary (used for return values)
    pub(crate) fn detach_to(
        &mut self,
        var: Variable,
        scope: ScopeId,
    ) -> Result<Variable, RuntimeError> {
        match self.heap.ownership(var.pointer)? {
            Ownership::Temporary(_) => {
                self.heap.release(var.pointer, scope)?;
                Ok(var)
            }
            Ownership::Owned(_) => self.duplicate(var, Ownership::Temporary(scope)),
        }
    }

    /// Free the temporaries among `vars`; bound storage is left alone
    pub(crate) fn discard(&mut self, vars: &[Variable]) {
        for var in vars {
            let temporary = self
                .heap
                .ownership(var.pointer)
                .is_ok_and(|ownership| ownership.is_temporary());
            if temporary && self.heap.free(var.pointer).is_err() {
                debug!(pointer = %var.pointer, "operand already released");
            }
        }
    }

    /// Take a snapshot of the current execution state
    fn take_snapshot(&mut self) -> Result<(), RuntimeError> {
        if !self.config.record_snapshots {
            return Ok(());
        }

        let snapshot = self.capture(false);
        self.snapshots
            .push(snapshot)
            .map_err(|_| RuntimeError::SnapshotLimitExceeded {
                current: self.snapshots.memory_usage(),
                limit: self.snapshots.memory_limit(),
            })
    }

    /// Record the state at a fault as the final snapshot
    fn record_fault(&mut self) {
        if !self.config.record_snapshots {
            return;
        }

        let snapshot = self.capture(true);
        if let Err(message) = self.snapshots.push(snapshot) {
            debug!(%message, "fault snapshot dropped");
        }
    }

    fn capture(&self, faulted: bool) -> Snapshot {
        Snapshot {
            heap: self.heap.clone(),
            scopes: self.scopes.clone(),
            output: self.output.clone(),
            line: self.current_line,
            faulted,
        }
    }

    // ========== Getter methods for the driver and UI ==========

    /// Get the current source line
    pub fn current_line(&self) -> usize {
        self.current_line
    }

    /// Get a reference to the heap
    pub fn heap(&self) -> &Heap {
        &self.heap
    }

    /// Get a reference to the scope stack
    pub fn scopes(&self) -> &ScopeStack {
        &self.scopes
    }

    /// Get a reference to the printed output
    pub fn output(&self) -> &OutputBuffer {
        &self.output
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Get the recorded history
    pub fn history(&self) -> &SnapshotManager {
        &self.snapshots
    }

    /// Get the recorded history for cursor movement
    pub fn history_mut(&mut self) -> &mut SnapshotManager {
        &mut self.snapshots
    }

    /// Check if execution has finished
    pub fn is_finished(&self) -> bool {
        self.finished
    }
}
