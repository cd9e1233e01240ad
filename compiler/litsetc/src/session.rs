//! Sessions: one interner, one set cache, many checks.

use std::path::{Component, Path};
use std::sync::Arc;

use litset_check::{
    build_sets, check_module, collect_definitions, CheckConfig, CheckedModule, SetCache, SetKey,
    SourceUnit,
};
use litset_ir::{SharedInterner, StringInterner};
use litset_sets::PersistedTable;
use rayon::prelude::*;

use crate::SessionError;

/// A file to check, identified by its dotted module path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceFile {
    pub module: String,
    pub source: String,
    /// Shown in rendered diagnostics.
    pub display: String,
}

impl SourceFile {
    pub fn new(module: impl Into<String>, source: impl Into<String>) -> Self {
        let module = module.into();
        SourceFile {
            display: module.clone(),
            module,
            source: source.into(),
        }
    }

    /// Read `path`, naming the module after its location below `root`.
    pub fn read(path: &Path, root: &Path) -> Result<Self, SessionError> {
        let source = std::fs::read_to_string(path).map_err(|source| SessionError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let relative = path.strip_prefix(root).unwrap_or(path);
        Ok(SourceFile {
            module: module_path(relative),
            source,
            display: path.display().to_string(),
        })
    }
}

/// Dotted module path for a relative file path: `app/http.py` is
/// `app.http`, and a package's `__init__` file names the package.
pub fn module_path(relative: &Path) -> String {
    let mut segments: Vec<String> = relative
        .with_extension("")
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();
    if segments.len() > 1 && segments.last().is_some_and(|s| s == "__init__") {
        segments.pop();
    }
    segments.join(".")
}

/// Shared state for checking files.
///
/// Sets built by one call stay in the cache for the next, so modules can
/// be checked one at a time as long as the modules they import were
/// checked (or loaded from disk) first.
pub struct Session {
    interner: SharedInterner,
    cache: Arc<SetCache>,
    config: CheckConfig,
}

impl Session {
    pub fn new(config: CheckConfig) -> Self {
        Session::with_cache(config, Arc::new(SetCache::new()))
    }

    /// Session configured from `LITSET_*` environment variables.
    pub fn from_env() -> Result<Self, SessionError> {
        Ok(Session::new(CheckConfig::from_env()?))
    }

    pub fn with_cache(config: CheckConfig, cache: Arc<SetCache>) -> Self {
        Session {
            interner: SharedInterner::new(),
            cache,
            config,
        }
    }

    pub fn config(&self) -> &CheckConfig {
        &self.config
    }

    pub fn cache(&self) -> &Arc<SetCache> {
        &self.cache
    }

    pub fn interner(&self) -> &StringInterner {
        &self.interner
    }

    pub fn check_source(&self, module: &str, source: &str) -> CheckedModule {
        let file = SourceFile::new(module, source);
        let mut checked = self.check_files(std::slice::from_ref(&file));
        checked.remove(0)
    }

    /// Check `files` together: imports between them resolve regardless of
    /// order. Results are returned in input order.
    #[tracing::instrument(level = "debug", skip_all, fields(files = files.len()))]
    pub fn check_files(&self, files: &[SourceFile]) -> Vec<CheckedModule> {
        let interner: &StringInterner = &self.interner;
        let units: Vec<SourceUnit> = files
            .par_iter()
            .map(|file| SourceUnit::parse(file.module.as_str(), file.source.as_str(), interner))
            .collect();

        let definitions = collect_definitions(&units, interner, &self.config, &self.cache);
        let report = build_sets(&units, &definitions, interner, &self.config, &self.cache);
        tracing::debug!(
            built = report.built.len(),
            failed = report.failed.len(),
            "sets built"
        );

        units
            .par_iter()
            .zip(report.diagnostics)
            .map(|(unit, diagnostics)| {
                check_module(unit, interner, &self.config, &self.cache, diagnostics)
            })
            .collect()
    }

    /// Write every built set to `path`. Returns how many were written.
    pub fn save_cache(&self, path: &Path) -> Result<usize, SessionError> {
        let mut table = PersistedTable::new();
        for (key, fingerprint, set) in self.cache.built_entries() {
            table.push(key.to_string(), fingerprint, &set);
        }
        let bytes = table.encode().map_err(|source| SessionError::Persist {
            path: path.to_path_buf(),
            source,
        })?;
        std::fs::write(path, bytes).map_err(|source| SessionError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), sets = table.entries.len(), "saved set cache");
        Ok(table.entries.len())
    }

    /// Load sets written by [`Session::save_cache`]. Nothing is added
    /// unless the whole file decodes and validates.
    pub fn load_cache(&self, path: &Path) -> Result<usize, SessionError> {
        let bytes = std::fs::read(path).map_err(|source| SessionError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let persist_error = |source| SessionError::Persist {
            path: path.to_path_buf(),
            source,
        };
        let table = PersistedTable::decode(&bytes).map_err(persist_error)?;

        let mut loaded = Vec::with_capacity(table.entries.len());
        for (name, fingerprint, persisted) in table.entries {
            let key = SetKey::parse(&name).ok_or_else(|| SessionError::InvalidKey(name.clone()))?;
            let set = persisted.into_set().map_err(persist_error)?;
            loaded.push((key, fingerprint, Arc::new(set)));
        }

        let count = loaded.len();
        for (key, fingerprint, set) in loaded {
            self.cache.insert_built(key, fingerprint, set);
        }
        tracing::debug!(path = %path.display(), sets = count, "loaded set cache");
        Ok(count)
    }
}

impl Default for Session {
    fn default() -> Self {
        Session::new(CheckConfig::default())
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
