//! # Code Generation Context
//!
//! Shared state threaded through `expression_generator`/`statement_generator`/
//! `module_generator`: the register allocator, the library registry, a label
//! counter, and a record of which builtin-inline snippets have already been
//! emitted once per script.
//!
//! Unlike the analyzer's [`crate::compiler::scope::ScopeTree`], codegen keeps
//! its own lightweight name→register environment rather than reusing the
//! analyzer's scope tree: the two passes build and discard their bookkeeping
//! independently, and elaboration has already proven every name resolves, so
//! codegen only needs "which register holds this local right now", not the
//! full declaration metadata (see DESIGN.md).

use crate::compiler::library::LibraryRegistry;
use crate::compiler::register::{RegId, RegisterAllocator};
use crate::compiler::CompileOptions;
use std::collections::{HashMap, HashSet};

pub struct CodeGenContext {
    pub registers: RegisterAllocator,
    pub registry: LibraryRegistry,
    pub options: CompileOptions,
    label_counter: usize,
    builtins_emitted: HashSet<&'static str>,
    builtins_pending: Vec<&'static str>,
}

impl CodeGenContext {
    pub fn new(options: CompileOptions) -> Self {
        Self {
            registers: RegisterAllocator::new(options.register_bank_size),
            registry: LibraryRegistry::standard(),
            options,
            label_counter: 0,
            builtins_emitted: HashSet::new(),
            builtins_pending: Vec::new(),
        }
    }

    pub fn next_label(&mut self, hint: &str) -> String {
        let n = self.label_counter;
        self.label_counter += 1;
        format!("L_{}_{}", hint, n)
    }

    /// Returns `true` the first time `snippet` is requested, so the caller
    /// emits a "first use" marker; also queues the snippet's canned body for
    /// `module_generator` to append via [`Self::drain_pending_builtins`].
    pub fn mark_builtin_emitted(&mut self, snippet: &'static str) -> bool {
        let first = self.builtins_emitted.insert(snippet);
        if first {
            self.builtins_pending.push(snippet);
        }
        first
    }

    /// Takes every builtin snippet requested since the last drain, so its
    /// body can be appended to the enclosing module's assembly exactly once.
    pub fn drain_pending_builtins(&mut self) -> Vec<&'static str> {
        std::mem::take(&mut self.builtins_pending)
    }
}

/// A stack of name→register bindings for the locals and parameters currently
/// in scope, plus the set of global names declared on the enclosing module.
///
/// Alongside each binding, tracks the declared source type name (`"string"`,
/// `"array"`, `"storagelist"`, ...) when one is known, so a container method
/// call on a plain identifier receiver (`name.length()`) can dispatch to the
/// owning library by the receiver's actual type rather than guessing from
/// the method name alone.
#[derive(Debug, Default)]
pub struct VarEnv {
    scopes: Vec<HashMap<String, RegId>>,
    types: Vec<HashMap<String, String>>,
    globals: HashSet<String>,
    global_types: HashMap<String, String>,
}

impl VarEnv {
    pub fn new(globals: impl IntoIterator<Item = (String, String)>) -> Self {
        let global_types: HashMap<String, String> = globals.into_iter().collect();
        let globals = global_types.keys().cloned().collect();
        Self {
            scopes: vec![HashMap::new()],
            types: vec![HashMap::new()],
            globals,
            global_types,
        }
    }

    pub fn push_scope(&mut self) {
        self.scopes.push(HashMap::new());
        self.types.push(HashMap::new());
    }

    /// Pops the innermost scope, returning the registers it bound so the
    /// caller can release them.
    pub fn pop_scope(&mut self) -> Vec<RegId> {
        self.types.pop();
        self.scopes.pop().unwrap_or_default().into_values().collect()
    }

    pub fn bind(&mut self, name: String, reg: RegId) {
        self.bind_typed(name, reg, None);
    }

    /// Binds `name` to `reg`, recording `type_name` (the declared source
    /// type, when known) for later lookup via [`Self::type_of`].
    pub fn bind_typed(&mut self, name: String, reg: RegId, type_name: Option<String>) {
        if let Some(ty) = type_name {
            self.types.last_mut().expect("at least one scope").insert(name.clone(), ty);
        }
        self.scopes.last_mut().expect("at least one scope").insert(name, reg);
    }

    pub fn lookup(&self, name: &str) -> Option<RegId> {
        self.scopes.iter().rev().find_map(|s| s.get(name).copied())
    }

    pub fn is_global(&self, name: &str) -> bool {
        self.globals.contains(name)
    }

    /// The declared source type name of `name`, if this environment ever
    /// recorded one — checks globals first, then the local scope stack.
    pub fn type_of(&self, name: &str) -> Option<&str> {
        self.global_types
            .get(name)
            .or_else(|| self.types.iter().rev().find_map(|s| s.get(name)))
            .map(String::as_str)
    }
}
