//! Check configuration.

use litset_diagnostic::DiagnosticConfig;
use litset_sets::{AliasScope, SetBuilder, ROOT_MARKER};
use litset_types::{BroadArgumentPolicy, TypeResolver};
use thiserror::Error;

/// Policy knobs for one checking session.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CheckConfig {
    /// Base-class names that make a class a root literal set. Matched
    /// against the last segment of a dotted base (`enums.LiteralEnum`).
    pub root_markers: Vec<String>,
    pub broad_arguments: BroadArgumentPolicy,
    pub alias_scope: AliasScope,
    pub diagnostics: DiagnosticConfig,
}

impl Default for CheckConfig {
    fn default() -> Self {
        CheckConfig {
            root_markers: vec![ROOT_MARKER.to_owned()],
            broad_arguments: BroadArgumentPolicy::default(),
            alias_scope: AliasScope::default(),
            diagnostics: DiagnosticConfig::default(),
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum ConfigError {
    #[error("LITSET_BROAD_ARGS must be `union` or `reject`, got `{0}`")]
    BroadArgs(String),
    #[error("LITSET_ALIAS_SCOPE must be `new` or `inherited`, got `{0}`")]
    AliasScope(String),
    #[error("LITSET_ERROR_LIMIT must be a non-negative integer, got `{0}`")]
    ErrorLimit(String),
}

impl CheckConfig {
    /// Defaults overridden by `LITSET_BROAD_ARGS`, `LITSET_ALIAS_SCOPE`,
    /// `LITSET_ROOT_MARKERS` (comma-separated) and `LITSET_ERROR_LIMIT`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as `from_env`, reading variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = CheckConfig::default();
        if let Some(value) = lookup("LITSET_BROAD_ARGS") {
            config.broad_arguments = match value.trim() {
                "union" => BroadArgumentPolicy::FullUnion,
                "reject" => BroadArgumentPolicy::Reject,
                _ => return Err(ConfigError::BroadArgs(value)),
            };
        }
        if let Some(value) = lookup("LITSET_ALIAS_SCOPE") {
            config.alias_scope = match value.trim() {
                "new" => AliasScope::NewMembers,
                "inherited" => AliasScope::IncludingInherited,
                _ => return Err(ConfigError::AliasScope(value)),
            };
        }
        if let Some(value) = lookup("LITSET_ROOT_MARKERS") {
            let markers: Vec<String> = value
                .split(',')
                .map(str::trim)
                .filter(|m| !m.is_empty())
                .map(str::to_owned)
                .collect();
            if !markers.is_empty() {
                config.root_markers = markers;
            }
        }
        if let Some(value) = lookup("LITSET_ERROR_LIMIT") {
            config.diagnostics.error_limit = value
                .trim()
                .parse()
                .map_err(|_| ConfigError::ErrorLimit(value.clone()))?;
        }
        Ok(config)
    }

    pub fn is_root_marker(&self, name: &str) -> bool {
        self.root_markers.iter().any(|m| m == name)
    }

    pub fn builder(&self) -> SetBuilder {
        SetBuilder::new(self.alias_scope)
    }

    pub fn resolver(&self) -> TypeResolver {
        TypeResolver::new(self.broad_arguments)
    }
}
