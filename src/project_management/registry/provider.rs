use crate::code_generation::core::naming::{ModuleNames, REGISTRY_KEY_PREFIX};
use crate::code_generation::core::template_emitter::TemplateEmitter;
use crate::project_management::registry::line_editor::LineEditor;
use crate::project_management::registry::store::RegistryStore;
use crate::shared::error::BimaError;

pub const IMPORTS_START: &str = "// start auto generated imports by bima.";
pub const IMPORTS_END: &str = "// end auto generated imports by bima.";
pub const MODULES_START: &str = "// start auto registered modules by bima.";
pub const MODULES_END: &str = "// end auto registered modules by bima.";

/// Whether `configs/provider.go` carries both regions maintained by bima.
pub fn has_managed_regions(content: &str) -> bool {
    [IMPORTS_START, IMPORTS_END, MODULES_START, MODULES_END]
        .iter()
        .all(|marker| content.contains(marker))
}

/// Keys wired in the modules region, in source order. `None` when the
/// source has no managed regions.
pub fn wired_keys(content: &str) -> Result<Option<Vec<String>>, BimaError> {
    if !has_managed_regions(content) {
        return Ok(None);
    }
    match LineEditor::region(content, MODULES_START, MODULES_END) {
        Some(region) => RegistryStore::keys_in(&region).map(Some),
        None => Ok(None),
    }
}

/// Managed regions with `key` wired after every module already present.
pub fn with_module(
    content: &str,
    emitter: &TemplateEmitter,
    key: &str,
) -> Result<Option<String>, BimaError> {
    let mut keys = match wired_keys(content)? {
        Some(keys) => keys,
        None => return Ok(None),
    };
    if !keys.iter().any(|k| k == key) {
        keys.push(key.to_string());
    }
    Ok(regenerate(content, emitter, &keys))
}

/// Managed regions with every module except `key`.
pub fn without_module(
    content: &str,
    emitter: &TemplateEmitter,
    key: &str,
) -> Result<Option<String>, BimaError> {
    let keys: Vec<String> = match wired_keys(content)? {
        Some(keys) => keys.into_iter().filter(|k| k != key).collect(),
        None => return Ok(None),
    };
    Ok(regenerate(content, emitter, &keys))
}

/// Rewrite both managed regions from `keys`, in the given order.
///
/// Returns `None` when the source has no managed regions, in which case the
/// caller falls back to appending or deleting single lines.
pub fn regenerate(content: &str, emitter: &TemplateEmitter, keys: &[String]) -> Option<String> {
    if !has_managed_regions(content) {
        return None;
    }

    let names: Vec<ModuleNames> = keys
        .iter()
        .filter_map(|key| key.strip_prefix(REGISTRY_KEY_PREFIX))
        .map(ModuleNames::from_input)
        .collect();

    let imports: Vec<String> = names
        .iter()
        .map(|n| emitter.provider_import(n).trim_start().to_string())
        .collect();
    let modules: Vec<String> = names
        .iter()
        .map(|n| TemplateEmitter::provider_wiring(n).trim_start().to_string())
        .collect();

    let content = LineEditor::replace_region(content, IMPORTS_START, IMPORTS_END, &imports)?;
    LineEditor::replace_region(&content, MODULES_START, MODULES_END, &modules)
}
