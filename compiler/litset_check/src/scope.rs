//! Module-level name bindings that can lead to a set.

use litset_ir::{Module, Name, StmtKind, StringInterner};
use rustc_hash::FxHashMap;

use crate::cache::SetKey;

#[derive(Clone, Debug, Eq, PartialEq)]
enum Binding {
    /// A class in this module or a name imported from another module.
    Symbol(SetKey),
    /// `import a.b as c` binds `c` to `a.b`; `import a.b` binds `a` to `a`.
    Module(String),
}

/// Top-level bindings of one module.
#[derive(Clone, Debug, Default)]
pub struct ModuleScope {
    bindings: FxHashMap<Name, Binding>,
}

impl ModuleScope {
    /// Collect class definitions and imports. Later bindings shadow
    /// earlier ones, as they would at runtime.
    pub fn build(module_path: &str, module: &Module, interner: &StringInterner) -> Self {
        let mut bindings = FxHashMap::default();
        for stmt in &module.body {
            match &stmt.kind {
                StmtKind::Class(class) => {
                    let key = SetKey::new(module_path, interner.lookup(class.name));
                    bindings.insert(class.name, Binding::Symbol(key));
                }
                StmtKind::Import(import) => {
                    let source = join(&import.module, interner);
                    if import.names.is_empty() {
                        match (import.alias, import.module.first()) {
                            (Some(alias), _) => {
                                bindings.insert(alias, Binding::Module(source));
                            }
                            (None, Some(&head)) => {
                                bindings.insert(head, Binding::Module(interner.lookup(head).to_owned()));
                            }
                            (None, None) => {}
                        }
                    } else {
                        for &(name, alias) in &import.names {
                            let key = SetKey::new(source.clone(), interner.lookup(name));
                            bindings.insert(alias.unwrap_or(name), Binding::Symbol(key));
                        }
                    }
                }
                _ => {}
            }
        }
        ModuleScope { bindings }
    }

    /// Resolve the leading segments of `path` to a set.
    ///
    /// Returns the key and how many segments named it; the rest are
    /// attribute accesses on the set. `is_set` decides which candidate
    /// keys actually denote sets.
    pub fn resolve(
        &self,
        path: &[Name],
        interner: &StringInterner,
        is_set: impl Fn(&SetKey) -> bool,
    ) -> Option<(SetKey, usize)> {
        let (&head, rest) = path.split_first()?;
        match self.bindings.get(&head)? {
            Binding::Symbol(key) => is_set(key).then(|| (key.clone(), 1)),
            Binding::Module(module) => {
                let mut module = module.clone();
                for (i, &segment) in rest.iter().enumerate() {
                    let key = SetKey::new(module.clone(), interner.lookup(segment));
                    if is_set(&key) {
                        return Some((key, i + 2));
                    }
                    module.push('.');
                    module.push_str(interner.lookup(segment));
                }
                None
            }
        }
    }
}

fn join(segments: &[Name], interner: &StringInterner) -> String {
    let mut out = String::new();
    for (i, &segment) in segments.iter().enumerate() {
        if i > 0 {
            out.push('.');
        }
        out.push_str(interner.lookup(segment));
    }
    out
}
