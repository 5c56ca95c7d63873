//! Interpolating dashboard template variables into query text.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::escape::lucene_escape;

/// Placeholder produced for a multi-value variable with nothing selected.
pub const EMPTY_SELECTION: &str = "__empty__";

/// The current value of a template variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TemplateValue {
    /// A single selected value.
    Text(String),
    /// Several selected values.
    Multi(Vec<String>),
    /// A numeric value.
    Number(f64),
    /// A boolean value.
    Bool(bool),
}

impl From<&str> for TemplateValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<Vec<String>> for TemplateValue {
    fn from(values: Vec<String>) -> Self {
        Self::Multi(values)
    }
}

/// Renders a variable value for substitution into a query.
///
/// `variable_query` is the variable's definition, a JSON object whose `field` names the field
/// the values belong to. With a field, multiple values become `"a" OR field:"b"`; without one
/// (or when the definition is not valid JSON) they become `IN ["a" "b"]`.
pub fn format_template_value(value: &TemplateValue, variable_query: Option<&str>) -> String {
    match value {
        TemplateValue::Text(text) => lucene_escape(text),
        TemplateValue::Number(number) => lucene_escape(&number.to_string()),
        TemplateValue::Bool(flag) => lucene_escape(&flag.to_string()),
        TemplateValue::Multi(values) if values.is_empty() => EMPTY_SELECTION.to_string(),
        TemplateValue::Multi(values) => {
            let quoted: Vec<String> = values
                .iter()
                .map(|v| format!("\"{}\"", lucene_escape(v)))
                .collect();
            match variable_query.and_then(field_name) {
                Some(field) => quoted.join(&format!(" OR {field}:")),
                None => format!("IN [{}]", quoted.join(" ")),
            }
        }
    }
}

/// Reads the string `field` of a variable definition.
fn field_name(definition: &str) -> Option<String> {
    let parsed: Value = serde_json::from_str(definition).ok()?;
    parsed.get("field")?.as_str().map(str::to_string)
}
