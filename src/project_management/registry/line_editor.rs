use regex::Regex;

use crate::shared::error::BimaError;

/// String-level edits on generated text files (YAML list, provider source),
/// preserving everything the edit does not touch.
pub struct LineEditor;

impl LineEditor {
    /// Append `line` to `content` following its trailing-newline convention.
    ///
    /// With a trailing newline the line is appended as `line\n`; without one
    /// it is appended as `\nline`. [`LineEditor::remove_lines`] restores the
    /// original content byte for byte in both cases.
    pub fn append_line(content: &str, line: &str) -> String {
        let mut result = String::with_capacity(content.len() + line.len() + 1);
        result.push_str(content);
        if content.is_empty() || content.ends_with('\n') {
            result.push_str(line);
            result.push('\n');
        } else {
            result.push('\n');
            result.push_str(line);
        }
        result
    }

    /// Pattern matching a whole line containing `needle`, together with the
    /// single line break before it. `needle` must end on a word boundary, so
    /// `module:order` does not match `module:order_item`.
    fn line_pattern(needle: &str) -> Result<Regex, BimaError> {
        Regex::new(&format!(r"(?m)(?:\r?\n)^.*{}\b.*$", regex::escape(needle)))
            .map_err(|e| BimaError::Validation(format!("Invalid pattern for '{}': {}", needle, e)))
    }

    fn first_line_pattern(needle: &str) -> Result<Regex, BimaError> {
        Regex::new(&format!(r"\A.*{}\b.*(?:\r?\n|\z)", regex::escape(needle)))
            .map_err(|e| BimaError::Validation(format!("Invalid pattern for '{}': {}", needle, e)))
    }

    /// Delete every line that contains any of `needles`.
    pub fn remove_lines(content: &str, needles: &[&str]) -> Result<String, BimaError> {
        let mut result = content.to_string();
        for needle in needles {
            result = Self::line_pattern(needle)?.replace_all(&result, "").into_owned();
            result = Self::first_line_pattern(needle)?.replace(&result, "").into_owned();
        }
        Ok(result)
    }

    /// Insert `line` right before the closing `)` of the first `import (`
    /// block. Returns `None` when `content` has no such block.
    pub fn insert_import(content: &str, line: &str) -> Option<String> {
        let lines: Vec<&str> = content.split_inclusive('\n').collect();
        let open = lines.iter().position(|l| l.trim() == "import (")?;
        let close = open + 1 + lines[open + 1..].iter().position(|l| l.trim_start().starts_with(')'))?;

        let mut result = String::with_capacity(content.len() + line.len() + 1);
        for l in &lines[..close] {
            result.push_str(l);
        }
        result.push_str(line);
        result.push('\n');
        for l in &lines[close..] {
            result.push_str(l);
        }
        Some(result)
    }

    fn region_bounds(lines: &[&str], start: &str, end: &str) -> Option<(usize, usize)> {
        let open = lines.iter().position(|l| l.contains(start))?;
        let close = open + 1 + lines[open + 1..].iter().position(|l| l.contains(end))?;
        Some((open, close))
    }

    /// Text between the marker lines `start` and `end`, markers excluded.
    pub fn region(content: &str, start: &str, end: &str) -> Option<String> {
        let lines: Vec<&str> = content.split_inclusive('\n').collect();
        let (open, close) = Self::region_bounds(&lines, start, end)?;
        Some(lines[open + 1..close].concat())
    }

    /// Replace the lines between the marker lines `start` and `end` with
    /// `body`, indented like the start marker. Returns `None` when either
    /// marker is missing.
    pub fn replace_region(content: &str, start: &str, end: &str, body: &[String]) -> Option<String> {
        let lines: Vec<&str> = content.split_inclusive('\n').collect();
        let (open, close) = Self::region_bounds(&lines, start, end)?;

        let indent: String = lines[open]
            .chars()
            .take_while(|c| *c == ' ' || *c == '\t')
            .collect();

        let mut result = String::with_capacity(content.len());
        for line in &lines[..=open] {
            result.push_str(line);
        }
        for line in body {
            result.push_str(&indent);
            result.push_str(line);
            result.push('\n');
        }
        for line in &lines[close..] {
            result.push_str(line);
        }

        Some(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_with_trailing_newline() {
        let yaml = "modules:\n    - module:customer\n";
        let result = LineEditor::append_line(yaml, "    - module:order");
        assert_eq!(result, "modules:\n    - module:customer\n    - module:order\n");
    }

    #[test]
    fn test_append_without_trailing_newline() {
        let yaml = "modules:\n    - module:customer";
        let result = LineEditor::append_line(yaml, "    - module:order");
        assert_eq!(result, "modules:\n    - module:customer\n    - module:order");
    }

    #[test]
    fn test_append_then_remove_restores_content() {
        for original in [
            "modules:\n    - module:customer\n",
            "modules:\n    - module:customer",
            "",
        ] {
            let appended = LineEditor::append_line(original, "    - module:order");
            let removed = LineEditor::remove_lines(&appended, &["module:order"]).unwrap();
            assert_eq!(removed, original);
        }
    }

    #[test]
    fn test_remove_keeps_blank_lines() {
        for original in ["a\n\n", "modules:\n\n    - module:customer\n\n"] {
            let appended = LineEditor::append_line(original, "    - module:x");
            let removed = LineEditor::remove_lines(&appended, &["module:x"]).unwrap();
            assert_eq!(removed, original);
        }
        let removed = LineEditor::remove_lines("a\n\n    - module:x\n", &["module:x"]).unwrap();
        assert_eq!(removed, "a\n\n");
    }

    #[test]
    fn test_remove_respects_word_boundary() {
        let yaml = "modules:\n    - module:order\n    - module:order_item\n";
        let result = LineEditor::remove_lines(yaml, &["module:order"]).unwrap();
        assert_eq!(result, "modules:\n    - module:order_item\n");
    }

    #[test]
    fn test_remove_multiple_needles() {
        let source = "import (\n\t\"example.com/app/orders\"\n\t\"example.com/app/customers\"\n)\n\t{Name: \"module:order\", Module: orders.Module},\n";
        let result =
            LineEditor::remove_lines(source, &["module:order", "example.com/app/orders"]).unwrap();
        assert_eq!(result, "import (\n\t\"example.com/app/customers\"\n)\n");
    }

    #[test]
    fn test_remove_first_line() {
        let result = LineEditor::remove_lines("- module:order\n- module:customer\n", &["module:order"]).unwrap();
        assert_eq!(result, "- module:customer\n");
    }

    #[test]
    fn test_insert_import_goes_inside_the_block() {
        let source = "package configs\n\nimport (\n\t\"example.com/app/customers\"\n)\n\n\t{Name: \"module:customer\"},\n";
        let result = LineEditor::insert_import(source, "\t\"example.com/app/orders\"").unwrap();
        assert_eq!(
            result,
            "package configs\n\nimport (\n\t\"example.com/app/customers\"\n\t\"example.com/app/orders\"\n)\n\n\t{Name: \"module:customer\"},\n"
        );
        assert_eq!(
            LineEditor::remove_lines(&result, &["example.com/app/orders"]).unwrap(),
            source
        );
    }

    #[test]
    fn test_insert_import_without_block() {
        assert!(LineEditor::insert_import("package configs\n", "\t\"a\"").is_none());
        assert!(LineEditor::insert_import("import \"fmt\"\n", "\t\"a\"").is_none());
    }

    #[test]
    fn test_region() {
        let source = "x\n\t// start\n\t{a},\n\t{b},\n\t// end\n";
        assert_eq!(LineEditor::region(source, "// start", "// end").unwrap(), "\t{a},\n\t{b},\n");
        assert!(LineEditor::region("x\n", "// start", "// end").is_none());
    }

    #[test]
    fn test_replace_region() {
        let source = "var Modules = []Module{\n\t// start\n\t{old},\n\t// end\n}\n";
        let result = LineEditor::replace_region(
            source,
            "// start",
            "// end",
            &["{a},".to_string(), "{b},".to_string()],
        )
        .unwrap();
        assert_eq!(result, "var Modules = []Module{\n\t// start\n\t{a},\n\t{b},\n\t// end\n}\n");
    }

    #[test]
    fn test_replace_region_without_markers() {
        assert!(LineEditor::replace_region("package configs\n", "// start", "// end", &[]).is_none());
        assert!(LineEditor::replace_region("// start\n", "// start", "// end", &[]).is_none());
    }
}
