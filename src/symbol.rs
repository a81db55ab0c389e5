//! The generator's symbol table: an ordered, append-only buffer of
//! declarations, looked up back-to-front so the most recent declaration of
//! a name wins.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    Const,
    Var,
    Proc,
}

#[derive(Debug, Clone)]
pub struct Symbol {
    pub kind: SymbolKind,
    pub name: String,
    pub value: i64,
    pub level: i64,
    pub address: i64,
}

/// Ordered, 1-based symbol table. Index 0 is never occupied; a lookup
/// result of `None` corresponds to the reference's `i == 0` sentinel for
/// "undeclared".
#[derive(Debug, Default)]
pub struct SymbolTable {
    entries: Vec<Symbol>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    pub fn declare_const(&mut self, name: impl Into<String>, value: i64) {
        self.entries.push(Symbol {
            kind: SymbolKind::Const,
            name: name.into(),
            value,
            level: -1,
            address: -1,
        });
    }

    /// Declares a variable at the given frame-relative address and returns
    /// that address (the caller advances `CSA`).
    pub fn declare_var(&mut self, name: impl Into<String>, address: i64) {
        self.entries.push(Symbol {
            kind: SymbolKind::Var,
            name: name.into(),
            value: 0,
            level: 0,
            address,
        });
    }

    /// Scans from the most recently declared entry backwards, matching the
    /// reference's `for (i = TP - 1; i > 0; --i)` loop. Shadowing therefore
    /// favors the latest declaration of a name.
    pub fn lookup(&self, name: &str) -> Option<&Symbol> {
        self.entries.iter().rev().find(|s| s.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_favors_the_most_recent_declaration() {
        let mut table = SymbolTable::new();
        table.declare_var("x", 4);
        table.declare_var("x", 5);
        let found = table.lookup("x").unwrap();
        assert_eq!(found.address, 5);
    }

    #[test]
    fn lookup_of_undeclared_name_is_none() {
        let table = SymbolTable::new();
        assert!(table.lookup("missing").is_none());
    }

    #[test]
    fn const_entries_carry_no_frame_address() {
        let mut table = SymbolTable::new();
        table.declare_const("pi", 3);
        let found = table.lookup("pi").unwrap();
        assert_eq!(found.level, -1);
        assert_eq!(found.address, -1);
        assert_eq!(found.value, 3);
    }
}
