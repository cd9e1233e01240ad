//! Set building: merging a base set with newly declared members.

use std::sync::Arc;

use litset_ir::Span;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::error::DefinitionError;
use crate::member::{DeclaredMember, LiteralMember};
use crate::set::LiteralSet;

/// Which members `allow_aliases=False` applies to.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum AliasScope {
    /// Only members declared by this definition are checked (against
    /// everything before them, inherited members included).
    #[default]
    NewMembers,
    /// Aliases already present in the base are rejected too.
    IncludingInherited,
}

/// Everything needed to build one set. Consumed by `SetBuilder::build`.
#[derive(Clone, Debug)]
pub struct ExtensionRequest {
    pub name: String,
    /// Literal-set bases in declaration order.
    pub bases: Vec<Arc<LiteralSet>>,
    pub own_members: Vec<DeclaredMember>,
    pub extend: bool,
    /// `None` inherits from the base (root default `true`).
    pub allow_aliases: Option<bool>,
    /// `None` inherits from the base (root default `false`).
    pub call_to_validate: Option<bool>,
    /// Where the definition's name is written.
    pub span: Span,
}

impl ExtensionRequest {
    pub fn new(name: impl Into<String>) -> Self {
        ExtensionRequest {
            name: name.into(),
            bases: Vec::new(),
            own_members: Vec::new(),
            extend: false,
            allow_aliases: None,
            call_to_validate: None,
            span: Span::DUMMY,
        }
    }

    #[must_use]
    pub fn with_base(mut self, base: Arc<LiteralSet>) -> Self {
        self.bases.push(base);
        self
    }

    #[must_use]
    pub fn with_members(mut self, members: impl IntoIterator<Item = DeclaredMember>) -> Self {
        self.own_members.extend(members);
        self
    }

    #[must_use]
    pub fn extending(mut self, extend: bool) -> Self {
        self.extend = extend;
        self
    }

    #[must_use]
    pub fn allow_aliases(mut self, allow: bool) -> Self {
        self.allow_aliases = Some(allow);
        self
    }

    #[must_use]
    pub fn call_to_validate(mut self, enabled: bool) -> Self {
        self.call_to_validate = Some(enabled);
        self
    }

    #[must_use]
    pub fn at(mut self, span: Span) -> Self {
        self.span = span;
        self
    }
}

/// Builds `LiteralSet`s under a fixed alias policy.
#[derive(Copy, Clone, Debug, Default)]
pub struct SetBuilder {
    alias_scope: AliasScope,
}

impl SetBuilder {
    pub fn new(alias_scope: AliasScope) -> Self {
        SetBuilder { alias_scope }
    }

    pub fn alias_scope(&self) -> AliasScope {
        self.alias_scope
    }

    #[tracing::instrument(level = "debug", skip_all, fields(set = %request.name))]
    pub fn build(&self, request: ExtensionRequest) -> Result<LiteralSet, DefinitionError> {
        let ExtensionRequest {
            name,
            bases,
            own_members,
            extend,
            allow_aliases,
            call_to_validate,
            span,
        } = request;

        let populated: Vec<&Arc<LiteralSet>> = bases.iter().filter(|b| !b.is_empty()).collect();
        if populated.len() > 1 {
            return Err(DefinitionError::MultipleBases {
                set: name,
                bases: populated.iter().map(|b| b.name().to_owned()).collect(),
                span,
            });
        }
        let base = populated.first().copied().or_else(|| bases.first());

        if let Some(base) = base {
            if !base.is_empty() && !extend {
                return Err(DefinitionError::ExtensionRequired {
                    set: name,
                    base: base.name().to_owned(),
                    span,
                });
            }
        }

        let allow_aliases = allow_aliases
            .or_else(|| base.map(|b| b.allow_aliases()))
            .unwrap_or(true);
        let call_to_validate = call_to_validate
            .or_else(|| base.map(|b| b.call_to_validate()))
            .unwrap_or(false);

        let inherited: &[LiteralMember] = match base {
            Some(base) if extend => base.members(),
            _ => &[],
        };
        let base_name = base.map(|b| b.name().to_owned());

        if !allow_aliases && self.alias_scope == AliasScope::IncludingInherited {
            if let Some(err) = first_inherited_alias(&name, inherited, span) {
                return Err(err);
            }
        }

        let mut members: Vec<LiteralMember> = inherited.to_vec();
        let inherited_names: FxHashSet<&str> = inherited.iter().map(|m| m.name.as_str()).collect();
        let mut canonical: FxHashMap<&litset_ir::LiteralValue, &str> = FxHashMap::default();
        for member in inherited {
            canonical.entry(&member.value).or_insert(member.name.as_str());
        }
        let mut own_spans: FxHashMap<&str, Span> = FxHashMap::default();

        for declared in &own_members {
            let member = &declared.member;
            if inherited_names.contains(member.name.as_str()) {
                return Err(DefinitionError::NameConflict {
                    set: name,
                    member: member.name.clone(),
                    base: base_name.unwrap_or_default(),
                    span: declared.span,
                });
            }
            if let Some(&previous) = own_spans.get(member.name.as_str()) {
                return Err(DefinitionError::Redefined {
                    set: name,
                    member: member.name.clone(),
                    span: declared.span,
                    previous,
                });
            }
            own_spans.insert(&member.name, declared.span);

            match canonical.get(&member.value) {
                Some(&existing) if !allow_aliases => {
                    return Err(DefinitionError::DuplicateValue {
                        set: name,
                        value: member.value.clone(),
                        alias: member.name.clone(),
                        canonical: existing.to_owned(),
                        span: declared.span,
                    });
                }
                Some(_) => {}
                None => {
                    canonical.insert(&member.value, &member.name);
                }
            }
        }
        members.extend(own_members.iter().map(|d| d.member.clone()));

        tracing::debug!(
            members = members.len(),
            inherited = inherited.len(),
            allow_aliases,
            call_to_validate,
            "built literal set"
        );
        Ok(LiteralSet::assemble(
            name,
            base_name,
            allow_aliases,
            call_to_validate,
            members,
        ))
    }

    /// `A | B`: every member of `left`, then `right`'s members. A name in
    /// both keeps `left`'s position and takes `right`'s value.
    pub fn union(&self, left: &LiteralSet, right: &LiteralSet) -> LiteralSet {
        let mut members: Vec<LiteralMember> = left.members().to_vec();
        for member in right.members() {
            match members.iter_mut().find(|m| m.name == member.name) {
                Some(existing) => existing.value = member.value.clone(),
                None => members.push(member.clone()),
            }
        }
        LiteralSet::assemble(
            format!("{}|{}", left.name(), right.name()),
            None,
            true,
            false,
            members,
        )
    }

    /// `A & B`: members of `left` whose value `right` also contains.
    pub fn intersection(&self, left: &LiteralSet, right: &LiteralSet) -> LiteralSet {
        let members = left
            .members()
            .iter()
            .filter(|m| right.contains(&m.value))
            .cloned()
            .collect();
        LiteralSet::assemble(
            format!("{}&{}", left.name(), right.name()),
            None,
            true,
            false,
            members,
        )
    }
}

fn first_inherited_alias(
    set: &str,
    inherited: &[LiteralMember],
    span: Span,
) -> Option<DefinitionError> {
    let mut canonical: FxHashMap<&litset_ir::LiteralValue, &str> = FxHashMap::default();
    for member in inherited {
        if let Some(&existing) = canonical.get(&member.value) {
            return Some(DefinitionError::DuplicateValue {
                set: set.to_owned(),
                value: member.value.clone(),
                alias: member.name.clone(),
                canonical: existing.to_owned(),
                span,
            });
        }
        canonical.insert(&member.value, &member.name);
    }
    None
}

#[cfg(test)]
mod tests;
