use convert_case::{Case, Casing};

/// Prefix of every registry key, e.g. `module:order`.
pub const REGISTRY_KEY_PREFIX: &str = "module:";

const IRREGULAR: &[(&str, &str)] = &[
    ("person", "people"),
    ("child", "children"),
    ("man", "men"),
    ("woman", "women"),
    ("mouse", "mice"),
    ("goose", "geese"),
    ("alias", "aliases"),
    ("canvas", "canvases"),
    ("gas", "gases"),
    ("cache", "caches"),
    ("excuse", "excuses"),
];

const UNCOUNTABLE: &[&str] = &["data", "information", "equipment", "news", "series", "species"];

/// Every projection of a module name used across the generated artifacts.
///
/// All of them are derived from one input so the proto file, the package
/// directory, the YAML list, the provider source and the Swagger manifest
/// always agree on the keys of a module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleNames {
    /// Type name, e.g. `OrderItem`.
    pub pascal_singular: String,
    /// Proto file and registry key component, e.g. `order_item`.
    pub snake_singular: String,
    /// Package directory, e.g. `order_items`.
    pub plural_snake: String,
    /// `module:order_item`
    pub registry_key: String,
}

impl ModuleNames {
    pub fn from_input(name: &str) -> Self {
        let snake_singular = singular_snake(name);
        let plural_snake = pluralize_last_word(&snake_singular);
        let pascal_singular = snake_singular.to_case(Case::Pascal);
        let registry_key = format!("{}{}", REGISTRY_KEY_PREFIX, snake_singular);

        Self {
            pascal_singular,
            snake_singular,
            plural_snake,
            registry_key,
        }
    }

    /// Go import path of the module package inside the application.
    pub fn package_path(&self, go_module: &str) -> String {
        format!("{}/{}", go_module.trim_end_matches('/'), self.plural_snake)
    }
}

/// `first name` -> `FirstName`, `firstName` -> `FirstName`
pub fn to_title_case(name: &str) -> String {
    name.trim().to_case(Case::Pascal)
}

/// `FirstName` -> `first_name`
pub fn to_snake_case(name: &str) -> String {
    name.trim().to_case(Case::Snake)
}

/// Snake case with the last word reduced to its singular form.
pub fn singular_snake(name: &str) -> String {
    map_last_word(&to_snake_case(name), singularize)
}

fn pluralize_last_word(snake: &str) -> String {
    map_last_word(snake, pluralize)
}

fn map_last_word(snake: &str, f: fn(&str) -> String) -> String {
    match snake.rsplit_once('_') {
        Some((head, last)) => format!("{}_{}", head, f(last)),
        None => f(snake),
    }
}

/// Plural of a single lowercase word (simple English rules).
pub fn pluralize(word: &str) -> String {
    if word.is_empty() || UNCOUNTABLE.contains(&word) {
        return word.to_string();
    }
    if let Some((_, plural)) = IRREGULAR.iter().find(|(singular, _)| *singular == word) {
        return plural.to_string();
    }
    if word.ends_with('s')
        || word.ends_with('x')
        || word.ends_with('z')
        || word.ends_with("sh")
        || word.ends_with("ch")
    {
        format!("{word}es")
    } else if word.ends_with('y')
        && !word.ends_with("ay")
        && !word.ends_with("ey")
        && !word.ends_with("oy")
        && !word.ends_with("uy")
    {
        format!("{}ies", &word[..word.len() - 1])
    } else {
        format!("{word}s")
    }
}

/// Singular of a single lowercase word; words that already look singular pass through.
pub fn singularize(word: &str) -> String {
    if UNCOUNTABLE.contains(&word) {
        return word.to_string();
    }
    if let Some((singular, _)) = IRREGULAR.iter().find(|(_, plural)| *plural == word) {
        return singular.to_string();
    }
    if IRREGULAR.iter().any(|(singular, _)| *singular == word) {
        return word.to_string();
    }
    if let Some(stem) = word.strip_suffix("ies") {
        if !stem.is_empty() {
            return format!("{stem}y");
        }
    }
    // bus -> buses, status -> statuses; house -> houses keeps its `e`.
    if let Some(stem) = word.strip_suffix("uses") {
        if stem.ends_with(|c: char| c.is_ascii_alphabetic() && !"aeiou".contains(c)) {
            return format!("{stem}us");
        }
    }
    for suffix in ["sses", "shes", "ches", "xes", "zes"] {
        if word.ends_with(suffix) {
            return word[..word.len() - 2].to_string();
        }
    }
    if word.ends_with("ss") || word.ends_with("us") || word.ends_with("is") {
        return word.to_string();
    }
    match word.strip_suffix('s') {
        Some(stem) if !stem.is_empty() => stem.to_string(),
        _ => word.to_string(),
    }
}
