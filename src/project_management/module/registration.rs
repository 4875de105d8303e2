use std::path::PathBuf;

use tracing::{debug, info};

use crate::code_generation::core::template_emitter::TemplateEmitter;
use crate::project_management::config::workspace::Workspace;
use crate::project_management::module::field_builder::FieldBuilder;
use crate::project_management::module::models::ModuleModel;
use crate::project_management::registry::line_editor::LineEditor;
use crate::project_management::registry::provider;
use crate::project_management::registry::staged::{read_if_exists, StagedChanges};
use crate::project_management::registry::store::RegistryStore;
use crate::project_management::registry::swagger::{next_stamp, render_manifest, SwaggerEntry};
use crate::shared::error::BimaError;
use crate::shared::prompter::Prompter;

pub const ADD_COLUMN_PROMPT: &str = "Add new column?";
const MODULES_YAML_HEADER: &str = "modules:\n";

#[derive(Debug)]
pub enum RegistrationOutcome {
    Registered {
        key: String,
        /// The module list the key was appended to.
        location: PathBuf,
        artifacts: Vec<PathBuf>,
    },
    AlreadyRegistered {
        key: String,
    },
    DryRun {
        key: String,
        diff: String,
    },
}

pub fn current_micros() -> i64 {
    chrono::Utc::now().timestamp_micros()
}

/// Builds a module interactively and writes its footprint into the workspace.
pub struct RegistrationEngine<'a> {
    workspace: &'a Workspace,
    prompter: &'a dyn Prompter,
    driver: String,
    clock: fn() -> i64,
}

impl<'a> RegistrationEngine<'a> {
    pub fn new(workspace: &'a Workspace, prompter: &'a dyn Prompter, driver: &str) -> Self {
        Self {
            workspace,
            prompter,
            driver: driver.to_string(),
            clock: current_micros,
        }
    }

    /// Replace the microsecond clock used for Swagger cache busting.
    pub fn with_clock(mut self, clock: fn() -> i64) -> Self {
        self.clock = clock;
        self
    }

    pub fn add(
        &self,
        name: &str,
        api_version: Option<&str>,
        dry_run: bool,
    ) -> Result<RegistrationOutcome, BimaError> {
        let mut model = ModuleModel::new(name, api_version, &self.driver);
        if name.trim().is_empty() || model.names().snake_singular.is_empty() {
            return Err(BimaError::Validation("Usage: bima module add <name>".to_string()));
        }

        let provider_path = self.workspace.provider_source();
        if !provider_path.exists() {
            return Err(BimaError::Validation(format!(
                "{} not found, run this command inside a bima application",
                self.workspace.relative(&provider_path).display()
            )));
        }

        let key = model.names().registry_key.clone();
        if RegistryStore::new(self.workspace).is_registered(&key)? {
            return Ok(RegistrationOutcome::AlreadyRegistered { key });
        }

        self.collect_fields(&mut model)?;
        model.ensure_emittable()?;

        let staged = self.stage(&model)?;
        if dry_run {
            let diff = staged.render_diff(self.workspace.root());
            return Ok(RegistrationOutcome::DryRun { key, diff });
        }

        let artifacts = staged.commit()?;
        info!(module = %key, "module registered");

        Ok(RegistrationOutcome::Registered {
            key,
            location: self.workspace.modules_yaml(),
            artifacts,
        })
    }

    /// Ask for columns until the user declines another one.
    pub fn collect_fields(&self, model: &mut ModuleModel) -> Result<(), BimaError> {
        let builder = FieldBuilder::new(self.prompter);
        while self.prompter.ask_yes_no(ADD_COLUMN_PROMPT, true)? {
            let spec = builder.build(model)?;
            let field = model.push_field(spec)?;
            debug!(column = field.name(), ordinal = field.ordinal(), "column added");
        }
        Ok(())
    }

    fn stage(&self, model: &ModuleModel) -> Result<StagedChanges, BimaError> {
        let workspace = self.workspace;
        let names = model.names();
        let emitter = TemplateEmitter::new(workspace.go_module());
        let mut staged = StagedChanges::new();

        let proto = workspace.proto_source(&names.snake_singular);
        staged.write(&proto, read_if_exists(&proto)?, emitter.proto(model)?);

        let package = workspace.package_dir(&names.plural_snake);
        let model_go = package.join("model.go");
        staged.write(&model_go, read_if_exists(&model_go)?, emitter.model_source(model)?);
        let module_go = package.join("module.go");
        staged.write(&module_go, read_if_exists(&module_go)?, emitter.module_source(model)?);

        let yaml_path = workspace.modules_yaml();
        let yaml_original = read_if_exists(&yaml_path)?;
        let yaml = LineEditor::append_line(
            yaml_original.as_deref().unwrap_or(MODULES_YAML_HEADER),
            &TemplateEmitter::yaml_entry(names),
        );
        staged.write(&yaml_path, yaml_original, yaml);

        let provider_path = workspace.provider_source();
        let provider_original = read_if_exists(&provider_path)?.unwrap_or_default();
        let provider_source =
            match provider::with_module(&provider_original, &emitter, &names.registry_key)? {
                Some(regenerated) => regenerated,
                None => {
                    let import = emitter.provider_import(names);
                    let source = LineEditor::insert_import(&provider_original, &import)
                        .unwrap_or_else(|| LineEditor::append_line(&provider_original, &import));
                    LineEditor::append_line(&source, &TemplateEmitter::provider_wiring(names))
                }
            };
        staged.write(&provider_path, Some(provider_original), provider_source);

        let manifest_path = workspace.swagger_manifest();
        let manifest_original = read_if_exists(&manifest_path)?;
        let mut entries: Vec<SwaggerEntry> = RegistryStore::new(workspace)
            .read_swagger_manifest()?
            .into_iter()
            .filter(|entry| entry.name != names.pascal_singular)
            .collect();
        let stamp = next_stamp(&entries, (self.clock)());
        entries.push(SwaggerEntry::new(
            &names.pascal_singular,
            &format!("{}.swagger.json", names.snake_singular),
            stamp,
        ));
        staged.write(&manifest_path, manifest_original, render_manifest(&entries)?);

        Ok(staged)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::shared::prompter::scripted::{Answer, ScriptedPrompter};
    use tempfile::TempDir;

    fn setup() -> (TempDir, Workspace) {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir_all(root.join("configs")).unwrap();
        fs::create_dir_all(root.join("swaggers")).unwrap();
        fs::write(root.join("configs/modules.yaml"), "modules:\n    - module:customer\n").unwrap();
        fs::write(
            root.join("configs/provider.go"),
            "package configs\n\t{Name: \"module:customer\", Module: customers.Module},\n",
        )
        .unwrap();
        fs::write(
            root.join("swaggers/modules.json"),
            r#"[{"name":"Customer","url":"customer.swagger.json?v=100"}]"#,
        )
        .unwrap();
        let workspace = Workspace::new(root, "example.com/app");
        (temp_dir, workspace)
    }

    fn order_answers() -> Vec<Answer> {
        let mut answers = ScriptedPrompter::column("total", "double", true);
        answers.push(Answer::YesNo(false));
        answers
    }

    #[test]
    fn test_add_writes_every_artifact() {
        let (temp_dir, workspace) = setup();
        let root = temp_dir.path();
        let prompter = ScriptedPrompter::new(order_answers());

        let outcome = RegistrationEngine::new(&workspace, &prompter, "mysql")
            .with_clock(|| 50)
            .add("Order", None, false)
            .unwrap();

        match outcome {
            RegistrationOutcome::Registered { key, location, artifacts } => {
                assert_eq!(key, "module:order");
                assert_eq!(location, root.join("configs/modules.yaml"));
                assert_eq!(artifacts.len(), 6);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }

        assert_eq!(
            fs::read_to_string(root.join("configs/modules.yaml")).unwrap(),
            "modules:\n    - module:customer\n    - module:order\n"
        );
        let provider = fs::read_to_string(root.join("configs/provider.go")).unwrap();
        assert!(provider.ends_with(
            "\t\"example.com/app/orders\"\n\t{Name: \"module:order\", Module: orders.Module},\n"
        ));
        let proto = fs::read_to_string(root.join("protos/order.proto")).unwrap();
        assert!(proto.contains("double total = 2;"));
        assert!(root.join("orders/model.go").exists());
        assert!(root.join("orders/module.go").exists());
        assert_eq!(
            fs::read_to_string(root.join("swaggers/modules.json")).unwrap(),
            r#"[{"name":"Customer","url":"customer.swagger.json?v=100"},{"name":"Order","url":"order.swagger.json?v=101"}]"#
        );
        assert_eq!(prompter.remaining(), 0);
    }

    const MANAGED_PROVIDER: &str = "package configs

import (
	// start auto generated imports by bima.
	\"example.com/app/customers\"
	// end auto generated imports by bima.
)

var Modules = []Module{
	// start auto registered modules by bima.
	{Name: \"module:customer\", Module: customers.Module},
	// end auto registered modules by bima.
}
";

    #[test]
    fn test_managed_provider_keeps_modules_missing_from_the_list() {
        let (temp_dir, workspace) = setup();
        let root = temp_dir.path();
        fs::remove_file(root.join("configs/modules.yaml")).unwrap();
        fs::write(root.join("configs/provider.go"), MANAGED_PROVIDER).unwrap();
        let prompter = ScriptedPrompter::new(order_answers());

        RegistrationEngine::new(&workspace, &prompter, "")
            .with_clock(|| 50)
            .add("Order", None, false)
            .unwrap();

        let provider = fs::read_to_string(root.join("configs/provider.go")).unwrap();
        assert!(provider.contains(
            "\t\"example.com/app/customers\"\n\t\"example.com/app/orders\"\n\t// end auto generated imports by bima."
        ));
        assert!(provider.contains(
            "\t{Name: \"module:customer\", Module: customers.Module},\n\t{Name: \"module:order\", Module: orders.Module},\n"
        ));
        assert_eq!(
            fs::read_to_string(root.join("configs/modules.yaml")).unwrap(),
            "modules:\n    - module:order\n"
        );
    }

    #[test]
    fn test_legacy_import_goes_into_the_import_block() {
        let (temp_dir, workspace) = setup();
        let root = temp_dir.path();
        fs::write(
            root.join("configs/provider.go"),
            "package configs\n\nimport (\n\t\"example.com/app/customers\"\n)\n\n\t{Name: \"module:customer\", Module: customers.Module},\n",
        )
        .unwrap();
        let prompter = ScriptedPrompter::new(order_answers());

        RegistrationEngine::new(&workspace, &prompter, "")
            .add("Order", None, false)
            .unwrap();

        assert_eq!(
            fs::read_to_string(root.join("configs/provider.go")).unwrap(),
            "package configs\n\nimport (\n\t\"example.com/app/customers\"\n\t\"example.com/app/orders\"\n)\n\n\t{Name: \"module:customer\", Module: customers.Module},\n\t{Name: \"module:order\", Module: orders.Module},\n"
        );
    }

    #[test]
    fn test_reserved_column_is_never_emitted() {
        let (temp_dir, workspace) = setup();
        let root = temp_dir.path();
        let prompter = ScriptedPrompter::new(vec![
            Answer::YesNo(true),
            Answer::Text("id"),
            Answer::Text("code"),
            Answer::Choice("int64"),
            Answer::YesNo(true),
            Answer::YesNo(false),
        ]);

        RegistrationEngine::new(&workspace, &prompter, "")
            .add("Order", None, false)
            .unwrap();

        let proto = fs::read_to_string(root.join("protos/order.proto")).unwrap();
        assert!(proto.contains("string id = 1;"));
        assert!(proto.contains("int64 code = 2;"));
        assert!(!proto.contains("int64 id"));
        assert_eq!(prompter.notices.borrow().as_slice(), ["Column id is reserved"]);
    }

    #[test]
    fn test_module_without_columns_writes_nothing() {
        let (temp_dir, workspace) = setup();
        let root = temp_dir.path();
        let yaml_before = fs::read_to_string(root.join("configs/modules.yaml")).unwrap();
        let prompter = ScriptedPrompter::new(vec![Answer::YesNo(false)]);

        let err = RegistrationEngine::new(&workspace, &prompter, "")
            .add("Order", None, false)
            .unwrap_err();

        assert!(matches!(err, BimaError::NoFields { .. }));
        assert!(err.is_graceful());
        assert_eq!(fs::read_to_string(root.join("configs/modules.yaml")).unwrap(), yaml_before);
        assert!(!root.join("protos").exists());
        assert!(!root.join("orders").exists());
    }

    #[test]
    fn test_empty_name_is_a_usage_error() {
        let (_temp_dir, workspace) = setup();
        let prompter = ScriptedPrompter::new(vec![]);

        let err = RegistrationEngine::new(&workspace, &prompter, "")
            .add("  ", None, false)
            .unwrap_err();

        assert_eq!(err.to_string(), "Usage: bima module add <name>");
    }

    #[test]
    fn test_existing_module_is_not_registered_twice() {
        let (_temp_dir, workspace) = setup();
        let prompter = ScriptedPrompter::new(vec![]);

        let outcome = RegistrationEngine::new(&workspace, &prompter, "")
            .add("customers", None, false)
            .unwrap();

        assert!(matches!(
            outcome,
            RegistrationOutcome::AlreadyRegistered { ref key } if key == "module:customer"
        ));
    }

    #[test]
    fn test_dry_run_leaves_workspace_untouched() {
        let (temp_dir, workspace) = setup();
        let root = temp_dir.path();
        let prompter = ScriptedPrompter::new(order_answers());

        let outcome = RegistrationEngine::new(&workspace, &prompter, "")
            .add("Order", Some("v2"), true)
            .unwrap();

        match outcome {
            RegistrationOutcome::DryRun { diff, .. } => {
                assert!(diff.contains("--- protos/order.proto (new)"));
                assert!(diff.contains("+     - module:order"));
                assert!(diff.contains("/api/v2/orders"));
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert!(!root.join("protos/order.proto").exists());
        assert_eq!(
            fs::read_to_string(root.join("configs/modules.yaml")).unwrap(),
            "modules:\n    - module:customer\n"
        );
    }

    #[test]
    fn test_collect_fields_assigns_ordinals_in_order() {
        let (_temp_dir, workspace) = setup();
        let mut answers = ScriptedPrompter::column("first name", "string", true);
        answers.extend(ScriptedPrompter::column("age", "int32", false));
        answers.push(Answer::YesNo(false));
        let prompter = ScriptedPrompter::new(answers);
        let mut model = ModuleModel::new("Person", None, "");

        RegistrationEngine::new(&workspace, &prompter, "")
            .collect_fields(&mut model)
            .unwrap();

        let ordinals: Vec<u32> = model.fields().iter().map(|f| f.ordinal()).collect();
        assert_eq!(ordinals, vec![2, 3]);
        assert_eq!(model.fields()[0].title_case(), "Firstname");
        assert!(!model.fields()[1].is_required());
    }

    #[test]
    fn test_missing_provider_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let workspace = Workspace::new(temp_dir.path(), "example.com/app");
        let prompter = ScriptedPrompter::new(vec![]);

        let err = RegistrationEngine::new(&workspace, &prompter, "")
            .add("Order", None, false)
            .unwrap_err();

        assert!(err.is_graceful());
        assert_eq!(prompter.remaining(), 0);
    }
}
