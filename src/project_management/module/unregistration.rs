use std::path::PathBuf;

use tracing::info;

use crate::code_generation::core::naming::ModuleNames;
use crate::code_generation::core::template_emitter::TemplateEmitter;
use crate::project_management::config::workspace::Workspace;
use crate::project_management::module::registration::current_micros;
use crate::project_management::registry::line_editor::LineEditor;
use crate::project_management::registry::provider;
use crate::project_management::registry::staged::{read_if_exists, remove_best_effort, StagedChanges};
use crate::project_management::registry::store::RegistryStore;
use crate::project_management::registry::swagger::{remove_and_bust, render_manifest};
use crate::shared::error::BimaError;

#[derive(Debug)]
pub enum RemovalOutcome {
    /// Nothing matched the key; the workspace was not touched.
    NotRegistered { key: String },
    Removed {
        key: String,
        /// Files that could not be deleted.
        leftovers: Vec<PathBuf>,
    },
    DryRun { key: String, diff: String },
}

/// Removes a module's footprint from every artifact that references it.
pub struct UnregistrationEngine<'a> {
    workspace: &'a Workspace,
    clock: fn() -> i64,
}

impl<'a> UnregistrationEngine<'a> {
    pub fn new(workspace: &'a Workspace) -> Self {
        Self {
            workspace,
            clock: current_micros,
        }
    }

    pub fn with_clock(mut self, clock: fn() -> i64) -> Self {
        self.clock = clock;
        self
    }

    pub fn remove(&self, name: &str, dry_run: bool) -> Result<RemovalOutcome, BimaError> {
        let names = ModuleNames::from_input(name);
        if name.trim().is_empty() || names.snake_singular.is_empty() {
            return Err(BimaError::Validation("Usage: bima module remove <name>".to_string()));
        }

        let key = names.registry_key.clone();
        if !RegistryStore::new(self.workspace).is_registered(&key)? {
            return Ok(RemovalOutcome::NotRegistered { key });
        }

        let staged = self.stage(&names)?;
        if dry_run {
            let diff = staged.render_diff(self.workspace.root());
            return Ok(RemovalOutcome::DryRun { key, diff });
        }
        staged.commit()?;

        let leftovers = self.delete_files(&names);
        info!(module = %key, leftovers = leftovers.len(), "module removed");

        Ok(RemovalOutcome::Removed { key, leftovers })
    }

    fn stage(&self, names: &ModuleNames) -> Result<StagedChanges, BimaError> {
        let workspace = self.workspace;
        let emitter = TemplateEmitter::new(workspace.go_module());
        let package_path = names.package_path(workspace.go_module());
        let needles = [names.registry_key.as_str(), package_path.as_str()];
        let mut staged = StagedChanges::new();

        let manifest_path = workspace.swagger_manifest();
        if let Some(original) = read_if_exists(&manifest_path)? {
            let entries = RegistryStore::new(workspace).read_swagger_manifest()?;
            let retained = remove_and_bust(entries, &names.pascal_singular, (self.clock)());
            staged.write(&manifest_path, Some(original), render_manifest(&retained)?);
        }

        let yaml_path = workspace.modules_yaml();
        if let Some(original) = read_if_exists(&yaml_path)? {
            let yaml = LineEditor::remove_lines(&original, &needles)?;
            staged.write(&yaml_path, Some(original), yaml);
        }

        let provider_path = workspace.provider_source();
        if let Some(original) = read_if_exists(&provider_path)? {
            let source = provider::without_module(&original, &emitter, &names.registry_key)?
                .unwrap_or_else(|| original.clone());
            let source = LineEditor::remove_lines(&source, &needles)?;
            staged.write(&provider_path, Some(original), source);
        }

        Ok(staged)
    }

    fn delete_files(&self, names: &ModuleNames) -> Vec<PathBuf> {
        let workspace = self.workspace;
        let mut targets = vec![
            workspace.package_dir(&names.plural_snake),
            workspace.proto_source(&names.snake_singular),
        ];
        targets.extend(workspace.binding_files(&names.snake_singular));
        targets.push(workspace.swagger_document(&names.snake_singular));

        targets
            .iter()
            .filter_map(|path| remove_best_effort(path))
            .collect()
    }
}
