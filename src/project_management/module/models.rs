use crate::code_generation::core::naming::{to_snake_case, to_title_case, ModuleNames};
use crate::code_generation::core::type_map::{TypeMap, WireType};
use crate::shared::error::BimaError;

pub const DEFAULT_API_VERSION: &str = "v1";

/// Tag number of the first user column; 1 belongs to the implicit `id`.
pub const FIRST_FIELD_ORDINAL: u32 = 2;

/// Columns every generated module already declares (`id` holds tag 1,
/// the timestamps are part of `model.go`).
pub const RESERVED_COLUMNS: [&str; 3] = ["id", "created_at", "updated_at"];

/// One column as entered by the user, before it is placed in a module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: String,
    pub wire_type: WireType,
    pub required: bool,
}

impl FieldSpec {
    pub fn new(name: &str, wire_type: WireType) -> Self {
        Self {
            name: normalize_field_name(name),
            wire_type,
            required: true,
        }
    }

    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }
}

/// A column of a module with its wire-format tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    name: String,
    wire_type: WireType,
    required: bool,
    ordinal: u32,
}

impl Field {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn wire_type(&self) -> WireType {
        self.wire_type
    }

    /// Always derived from the wire type.
    pub fn host_type(&self) -> &'static str {
        TypeMap::host_type(self.wire_type)
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn ordinal(&self) -> u32 {
        self.ordinal
    }

    pub fn title_case(&self) -> String {
        to_title_case(&self.name)
    }

    pub fn snake_case(&self) -> String {
        to_snake_case(&self.name)
    }
}

/// Strip every whitespace character from a column label.
pub fn normalize_field_name(name: &str) -> String {
    name.split_whitespace().collect()
}

/// The reserved column `name` collides with, if any.
pub fn reserved_column(name: &str) -> Option<&'static str> {
    let candidate = to_snake_case(&normalize_field_name(name));
    RESERVED_COLUMNS.iter().copied().find(|reserved| *reserved == candidate)
}

/// In-memory form of a module for the duration of one `module add`.
#[derive(Debug, Clone)]
pub struct ModuleModel {
    names: ModuleNames,
    api_version: String,
    driver: String,
    fields: Vec<Field>,
}

impl ModuleModel {
    pub fn new(name: &str, api_version: Option<&str>, driver: &str) -> Self {
        let api_version = api_version
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .unwrap_or(DEFAULT_API_VERSION);

        Self {
            names: ModuleNames::from_input(name),
            api_version: api_version.to_string(),
            driver: driver.to_string(),
            fields: Vec::new(),
        }
    }

    pub fn names(&self) -> &ModuleNames {
        &self.names
    }

    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    pub fn driver(&self) -> &str {
        &self.driver
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Whether a column with the same normalized name already exists.
    pub fn has_field(&self, name: &str) -> bool {
        let candidate = to_snake_case(&normalize_field_name(name));
        self.fields.iter().any(|f| f.snake_case() == candidate)
    }

    pub fn next_ordinal(&self) -> u32 {
        FIRST_FIELD_ORDINAL + self.fields.len() as u32
    }

    /// Append a column, assigning the next tag number.
    pub fn push_field(&mut self, spec: FieldSpec) -> Result<&Field, BimaError> {
        let name = normalize_field_name(&spec.name);
        if name.is_empty() {
            return Err(BimaError::Validation("Column name is required".to_string()));
        }
        if let Some(reserved) = reserved_column(&name) {
            return Err(BimaError::Validation(format!("Column {} is reserved", reserved)));
        }
        if self.has_field(&name) {
            return Err(BimaError::Validation(format!("Column {} already exists", name)));
        }

        let ordinal = self.next_ordinal();
        self.fields.push(Field {
            name,
            wire_type: spec.wire_type,
            required: spec.required,
            ordinal,
        });

        Ok(&self.fields[self.fields.len() - 1])
    }

    /// Gate checked before any artifact is rendered or written.
    pub fn ensure_emittable(&self) -> Result<(), BimaError> {
        if self.fields.is_empty() {
            return Err(BimaError::NoFields {
                module: self.names.pascal_singular.clone(),
            });
        }
        Ok(())
    }
}
