//! Compile-time symbol tables with transactional rollback.
//!
//! The parser keeps three tables:
//!
//! - prototypes: name → arity for declared functions (seeded with intrinsics)
//! - functions: name → arity for defined functions
//! - variables: ordered names visible in the function body being parsed
//!
//! Every mutation is recorded in an undo journal. [`SymbolTables::checkpoint`]
//! captures the journal length and [`SymbolTables::rollback`] unwinds to it,
//! so a failed grammar alternative leaves no stray entries behind.

use rustc_hash::FxHashMap;

/// Journal position returned by [`SymbolTables::checkpoint`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkpoint(usize);

#[derive(Debug)]
enum UndoEntry {
    Prototype(String, Option<usize>),
    Function(String, Option<usize>),
    Variable,
    VariablesCleared(Vec<String>),
}

#[derive(Debug, Default)]
pub struct SymbolTables {
    prototypes: FxHashMap<String, usize>,
    functions: FxHashMap<String, usize>,
    variables: Vec<String>,
    journal: Vec<UndoEntry>,
}

impl SymbolTables {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn prototype_arity(&self, name: &str) -> Option<usize> {
        self.prototypes.get(name).copied()
    }

    pub fn function_arity(&self, name: &str) -> Option<usize> {
        self.functions.get(name).copied()
    }

    /// Arity of anything callable by `name`; declarations win over definitions.
    pub fn callable_arity(&self, name: &str) -> Option<usize> {
        self.prototype_arity(name)
            .or_else(|| self.function_arity(name))
    }

    pub fn declare_prototype(&mut self, name: &str, arity: usize) {
        let previous = self.prototypes.insert(name.to_string(), arity);
        self.journal
            .push(UndoEntry::Prototype(name.to_string(), previous));
    }

    pub fn define_function(&mut self, name: &str, arity: usize) {
        let previous = self.functions.insert(name.to_string(), arity);
        self.journal
            .push(UndoEntry::Function(name.to_string(), previous));
    }

    /// Start a new function body: no variables are visible.
    pub fn clear_variables(&mut self) {
        let previous = std::mem::take(&mut self.variables);
        self.journal.push(UndoEntry::VariablesCleared(previous));
    }

    /// Returns `false` without modifying anything if `name` is already visible.
    pub fn declare_variable(&mut self, name: &str) -> bool {
        if self.has_variable(name) {
            return false;
        }
        self.variables.push(name.to_string());
        self.journal.push(UndoEntry::Variable);
        true
    }

    pub fn has_variable(&self, name: &str) -> bool {
        self.variables.iter().any(|v| v == name)
    }

    pub fn variables(&self) -> &[String] {
        &self.variables
    }

    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint(self.journal.len())
    }

    /// Undo every mutation made since `checkpoint`.
    pub fn rollback(&mut self, checkpoint: Checkpoint) {
        while self.journal.len() > checkpoint.0 {
            let Some(entry) = self.journal.pop() else {
                break;
            };
            match entry {
                UndoEntry::Prototype(name, previous) => {
                    restore(&mut self.prototypes, name, previous)
                }
                UndoEntry::Function(name, previous) => {
                    restore(&mut self.functions, name, previous)
                }
                UndoEntry::Variable => {
                    self.variables.pop();
                }
                UndoEntry::VariablesCleared(previous) => self.variables = previous,
            }
        }
    }

    /// Forget the journal. Only valid when no checkpoint is outstanding.
    pub fn commit(&mut self) {
        self.journal.clear();
    }
}

fn restore(table: &mut FxHashMap<String, usize>, name: String, previous: Option<usize>) {
    match previous {
        Some(arity) => {
            table.insert(name, arity);
        }
        None => {
            table.remove(&name);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rollback_undoes_everything_since_checkpoint() {
        let mut tables = SymbolTables::new();
        tables.declare_prototype("printnum", 1);
        tables.declare_variable("a");

        let cp = tables.checkpoint();
        tables.declare_prototype("f", 2);
        tables.define_function("g", 0);
        tables.clear_variables();
        tables.declare_variable("b");
        tables.rollback(cp);

        assert_eq!(tables.prototype_arity("printnum"), Some(1));
        assert_eq!(tables.prototype_arity("f"), None);
        assert_eq!(tables.function_arity("g"), None);
        assert_eq!(tables.variables(), ["a".to_string()]);
    }

    #[test]
    fn test_rollback_restores_overwritten_arity() {
        let mut tables = SymbolTables::new();
        tables.declare_prototype("f", 1);

        let cp = tables.checkpoint();
        tables.declare_prototype("f", 3);
        assert_eq!(tables.prototype_arity("f"), Some(3));

        tables.rollback(cp);
        assert_eq!(tables.prototype_arity("f"), Some(1));
    }

    #[test]
    fn test_duplicate_variable_rejected() {
        let mut tables = SymbolTables::new();

        assert!(tables.declare_variable("x"));
        assert!(!tables.declare_variable("x"));
        assert_eq!(tables.variables().len(), 1);
    }

    #[test]
    fn test_callable_prefers_prototype() {
        let mut tables = SymbolTables::new();
        tables.define_function("f", 2);
        assert_eq!(tables.callable_arity("f"), Some(2));

        tables.declare_prototype("f", 2);
        tables.define_function("h", 0);
        assert_eq!(tables.callable_arity("h"), Some(0));
        assert_eq!(tables.callable_arity("nope"), None);
    }

    #[test]
    fn test_commit_keeps_state() {
        let mut tables = SymbolTables::new();
        tables.define_function("main", 0);
        tables.commit();

        let cp = tables.checkpoint();
        tables.rollback(cp);
        assert_eq!(tables.function_arity("main"), Some(0));
    }
}
