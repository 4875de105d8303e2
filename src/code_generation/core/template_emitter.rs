use askama::Template;

use crate::code_generation::core::naming::ModuleNames;
use crate::project_management::module::models::{Field, ModuleModel};
use crate::shared::error::BimaError;

const DEFAULT_DRIVER_LABEL: &str = "default";

#[derive(Template)]
#[template(path = "module/module.proto", escape = "none")]
struct ProtoTemplate<'a> {
    names: &'a ModuleNames,
    go_module: &'a str,
    api_version: &'a str,
    fields: &'a [Field],
}

#[derive(Template)]
#[template(path = "module/model.go", escape = "none")]
struct ModelTemplate<'a> {
    names: &'a ModuleNames,
    driver: &'a str,
    fields: &'a [Field],
}

#[derive(Template)]
#[template(path = "module/module.go", escape = "none")]
struct ModuleTemplate<'a> {
    names: &'a ModuleNames,
    go_module: &'a str,
}

/// Renders the text artifacts of a module. Nothing here touches the disk.
pub struct TemplateEmitter<'a> {
    go_module: &'a str,
}

impl<'a> TemplateEmitter<'a> {
    pub fn new(go_module: &'a str) -> Self {
        Self { go_module }
    }

    /// Full `protos/<snake>.proto` source.
    pub fn proto(&self, model: &ModuleModel) -> Result<String, BimaError> {
        model.ensure_emittable()?;
        let template = ProtoTemplate {
            names: model.names(),
            go_module: self.go_module,
            api_version: model.api_version(),
            fields: model.fields(),
        };
        Ok(with_trailing_newline(template.render()?))
    }

    /// `<plural>/model.go`
    pub fn model_source(&self, model: &ModuleModel) -> Result<String, BimaError> {
        model.ensure_emittable()?;
        let driver = if model.driver().is_empty() {
            DEFAULT_DRIVER_LABEL
        } else {
            model.driver()
        };
        let template = ModelTemplate {
            names: model.names(),
            driver,
            fields: model.fields(),
        };
        Ok(with_trailing_newline(template.render()?))
    }

    /// `<plural>/module.go`
    pub fn module_source(&self, model: &ModuleModel) -> Result<String, BimaError> {
        let template = ModuleTemplate {
            names: model.names(),
            go_module: self.go_module,
        };
        Ok(with_trailing_newline(template.render()?))
    }

    /// Import line of the module package inside `configs/provider.go`.
    pub fn provider_import(&self, names: &ModuleNames) -> String {
        format!("\t\"{}\"", names.package_path(self.go_module))
    }

    /// Entry of the module list inside `configs/provider.go`.
    pub fn provider_wiring(names: &ModuleNames) -> String {
        format!(
            "\t{{Name: \"{}\", Module: {}.Module}},",
            names.registry_key, names.plural_snake
        )
    }

    pub fn yaml_entry(names: &ModuleNames) -> String {
        format!("    - {}", names.registry_key)
    }
}

pub(crate) fn with_trailing_newline(mut rendered: String) -> String {
    if !rendered.ends_with('\n') {
        rendered.push('\n');
    }
    rendered
}
