//! Type rendering for diagnostics.

use crate::{Idx, Pool, TypeData};

impl Pool {
    /// Human-readable form: `Literal["GET", "POST"] | None`.
    pub fn format_type(&self, idx: Idx) -> String {
        let mut buf = String::new();
        self.format_type_into(idx, &mut buf);
        buf
    }

    pub fn format_type_into(&self, idx: Idx, buf: &mut String) {
        litset_ir::stack::ensure_sufficient_stack(|| match self.data(idx) {
            TypeData::Str => buf.push_str("str"),
            TypeData::Int => buf.push_str("int"),
            TypeData::Bool => buf.push_str("bool"),
            TypeData::Bytes => buf.push_str("bytes"),
            TypeData::NoneType => buf.push_str("None"),
            TypeData::Object => buf.push_str("object"),
            TypeData::Unknown => buf.push_str("Any"),
            TypeData::Never => buf.push_str("Never"),
            TypeData::Literal(value) => {
                buf.push_str("Literal[");
                buf.push_str(&value.to_string());
                buf.push(']');
            }
            TypeData::Union(members) => self.format_union(members, buf),
            TypeData::SetObject(name) => {
                buf.push_str("type[");
                buf.push_str(name);
                buf.push(']');
            }
            TypeData::Instance(name) => buf.push_str(name),
            TypeData::Generic { name, args } => {
                buf.push_str(name);
                buf.push('[');
                for (i, &arg) in args.iter().enumerate() {
                    if i > 0 {
                        buf.push_str(", ");
                    }
                    self.format_type_into(arg, buf);
                }
                buf.push(']');
            }
            TypeData::ClassOf(inner) => {
                buf.push_str("type[");
                self.format_type_into(*inner, buf);
                buf.push(']');
            }
        });
    }

    /// Literal members collapse into one `Literal[...]` at the position of
    /// the first of them.
    fn format_union(&self, members: &[Idx], buf: &mut String) {
        let literals: Vec<String> = members
            .iter()
            .filter_map(|&m| match self.data(m) {
                TypeData::Literal(value) => Some(value.to_string()),
                _ => None,
            })
            .collect();
        let mut wrote_literals = false;
        let mut first = true;
        for &member in members {
            let is_literal = matches!(self.data(member), TypeData::Literal(_));
            if is_literal && wrote_literals {
                continue;
            }
            if !first {
                buf.push_str(" | ");
            }
            first = false;
            if is_literal {
                buf.push_str("Literal[");
                buf.push_str(&literals.join(", "));
                buf.push(']');
                wrote_literals = true;
            } else {
                self.format_type_into(member, buf);
            }
        }
    }
}
