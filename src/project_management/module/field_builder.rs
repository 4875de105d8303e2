use tracing::debug;

use crate::code_generation::core::type_map::{TypeMap, WireType};
use crate::project_management::module::models::{
    normalize_field_name, reserved_column, FieldSpec, ModuleModel,
};
use crate::shared::error::BimaError;
use crate::shared::prompter::Prompter;

/// How many times a single prompt is asked before giving up.
pub const MAX_PROMPT_ATTEMPTS: usize = 3;

/// Result of one prompt attempt: an accepted value or the reason it was rejected.
type Attempt<T> = Result<Result<T, String>, BimaError>;

/// Interactive collection of a single column.
pub struct FieldBuilder<'a> {
    prompter: &'a dyn Prompter,
}

impl<'a> FieldBuilder<'a> {
    pub fn new(prompter: &'a dyn Prompter) -> Self {
        Self { prompter }
    }

    /// Column name; rejects empty names, reserved names and names already
    /// used in `module`.
    pub fn prompt_name(&self, module: &ModuleModel) -> Result<String, BimaError> {
        self.with_retries("Input column name?", || {
            let name = normalize_field_name(&self.prompter.ask_text("Input column name?")?);
            if name.is_empty() {
                return Ok(Err("Column name is required".to_string()));
            }
            if let Some(reserved) = reserved_column(&name) {
                return Ok(Err(format!("Column {} is reserved", reserved)));
            }
            if module.has_field(&name) {
                return Ok(Err(format!("Column {} already exists", name)));
            }
            Ok(Ok(name))
        })
    }

    pub fn prompt_wire_type(&self) -> Result<WireType, BimaError> {
        let options = WireType::names();
        self.with_retries("Input data type?", || {
            let choice = self.prompter.ask_choice("Input data type?", &options)?;
            let host = match TypeMap::resolve(&choice) {
                Ok(host) => host,
                Err(err) => return Ok(Err(err.to_string())),
            };
            debug!(wire_type = %choice, host, "data type selected");
            Ok(choice.parse::<WireType>().map_err(|e| e.to_string()))
        })
    }

    pub fn prompt_required(&self) -> Result<bool, BimaError> {
        self.with_retries("Is column required?", || {
            Ok(Ok(self.prompter.ask_yes_no("Is column required?", true)?))
        })
    }

    pub fn build(&self, module: &ModuleModel) -> Result<FieldSpec, BimaError> {
        let name = self.prompt_name(module)?;
        let wire_type = self.prompt_wire_type()?;
        let required = self.prompt_required()?;

        debug!(column = %name, %wire_type, required, "collected column");

        Ok(FieldSpec {
            name,
            wire_type,
            required,
        })
    }

    fn with_retries<T>(
        &self,
        prompt: &str,
        mut attempt: impl FnMut() -> Attempt<T>,
    ) -> Result<T, BimaError> {
        for round in 1..=MAX_PROMPT_ATTEMPTS {
            match attempt() {
                Ok(Ok(value)) => return Ok(value),
                Ok(Err(reason)) => self.prompter.notify(&reason),
                Err(err @ BimaError::Interaction { .. }) => {
                    debug!(prompt, round, error = %err, "prompt failed");
                    self.prompter.notify(&err.to_string());
                }
                Err(err) => return Err(err),
            }
        }

        Err(BimaError::Validation(format!(
            "No valid answer for '{}' after {} attempts",
            prompt, MAX_PROMPT_ATTEMPTS
        )))
    }
}
