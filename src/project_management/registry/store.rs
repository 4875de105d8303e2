use std::collections::BTreeSet;
use std::fs;

use regex::Regex;
use tracing::debug;

use crate::code_generation::core::naming::REGISTRY_KEY_PREFIX;
use crate::project_management::config::workspace::Workspace;
use crate::project_management::registry::staged::read_if_exists;
use crate::project_management::registry::swagger::{parse_manifest, render_manifest, SwaggerEntry};
use crate::shared::error::BimaError;

/// Read access to the registered modules of a workspace. Nothing is cached:
/// every call re-parses the files on disk.
pub struct RegistryStore<'a> {
    workspace: &'a Workspace,
}

impl<'a> RegistryStore<'a> {
    pub fn new(workspace: &'a Workspace) -> Self {
        Self { workspace }
    }

    fn key_pattern() -> Result<Regex, BimaError> {
        Regex::new(&format!(r"{}[A-Za-z0-9_]+", regex::escape(REGISTRY_KEY_PREFIX)))
            .map_err(|e| BimaError::Validation(format!("Invalid registry key pattern: {}", e)))
    }

    /// Registry keys in the order they appear in `content`, without duplicates.
    pub fn keys_in(content: &str) -> Result<Vec<String>, BimaError> {
        let mut keys: Vec<String> = Vec::new();
        for found in Self::key_pattern()?.find_iter(content) {
            let key = found.as_str().to_string();
            if !keys.contains(&key) {
                keys.push(key);
            }
        }
        Ok(keys)
    }

    /// Every `module:<name>` key found in the module list and the provider source.
    pub fn list_registered_keys(&self) -> Result<BTreeSet<String>, BimaError> {
        let mut keys = BTreeSet::new();
        for path in [self.workspace.modules_yaml(), self.workspace.provider_source()] {
            if let Some(content) = read_if_exists(&path)? {
                keys.extend(Self::keys_in(&content)?);
            }
        }
        debug!(count = keys.len(), "registered modules");
        Ok(keys)
    }

    pub fn is_registered(&self, key: &str) -> Result<bool, BimaError> {
        Ok(self.list_registered_keys()?.contains(key))
    }

    /// Entries of `swaggers/modules.json`; a missing manifest is empty.
    pub fn read_swagger_manifest(&self) -> Result<Vec<SwaggerEntry>, BimaError> {
        match read_if_exists(&self.workspace.swagger_manifest())? {
            Some(content) => parse_manifest(&content),
            None => Ok(Vec::new()),
        }
    }

    pub fn write_swagger_manifest(&self, entries: &[SwaggerEntry]) -> Result<(), BimaError> {
        let path = self.workspace.swagger_manifest();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| BimaError::io("create", parent, e))?;
        }
        fs::write(&path, render_manifest(entries)?).map_err(|e| BimaError::io("write", &path, e))
    }
}
