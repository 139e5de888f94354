use serde::{Deserialize, Serialize};

use crate::http::VALUE_SEPARATOR;
use crate::http::headers::HeaderPair;

/// Value of a structured header: one string, or a sequence when the schema
/// marks the header as multi-valued.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HeaderValue {
    Single(String),
    Multi(Vec<String>),
}

impl Default for HeaderValue {
    fn default() -> Self {
        HeaderValue::Single(String::new())
    }
}

impl HeaderValue {
    /// Builds a value from a text line, splitting on commas when `is_array`.
    pub fn from_text(text: &str, is_array: bool) -> Self {
        if is_array {
            HeaderValue::Multi(text.split(VALUE_SEPARATOR).map(str::to_string).collect())
        } else {
            HeaderValue::Single(text.to_string())
        }
    }

    /// Empty value of the shape dictated by `is_array`.
    pub fn empty(is_array: bool) -> Self {
        if is_array {
            HeaderValue::Multi(Vec::new())
        } else {
            HeaderValue::Single(String::new())
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            HeaderValue::Single(v) => v.is_empty(),
            HeaderValue::Multi(v) => v.is_empty(),
        }
    }

    pub fn items(&self) -> Vec<&str> {
        match self {
            HeaderValue::Single(v) => vec![v.as_str()],
            HeaderValue::Multi(v) => v.iter().map(String::as_str).collect(),
        }
    }

    /// Flattened single-line form used by the serializer.
    pub fn to_text(&self) -> String {
        match self {
            HeaderValue::Single(v) => v.clone(),
            HeaderValue::Multi(v) => v.join(VALUE_SEPARATOR),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HeaderSchema {
    pub enabled: bool,
    pub is_custom: bool,
    pub is_array: bool,
    #[serde(rename = "type")]
    pub type_name: String,
    pub input_label: String,
    pub input_type: String,
    pub required: bool,
    pub pattern: Option<String>,
    pub enum_values: Vec<String>,
    pub default_value: Option<String>,
    pub examples: Vec<String>,
    pub description: Option<String>,
}

impl Default for HeaderSchema {
    fn default() -> Self {
        Self {
            enabled: true,
            is_custom: false,
            is_array: false,
            type_name: "string".to_string(),
            input_label: String::new(),
            input_type: String::new(),
            required: false,
            pattern: None,
            enum_values: Vec::new(),
            default_value: None,
            examples: Vec::new(),
            description: None,
        }
    }
}

/// One entry of the structured model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeaderRecord {
    pub name: String,
    #[serde(default)]
    pub value: HeaderValue,
    #[serde(default)]
    pub schema: HeaderSchema,
}

impl HeaderRecord {
    pub fn new(name: impl Into<String>, value: HeaderValue, schema: HeaderSchema) -> Self {
        Self {
            name: name.into(),
            value,
            schema,
        }
    }

    /// Record not backed by the description model, created from a text line.
    ///
    /// `defaults` supplies the schema fields a caller wants on every custom
    /// header. The custom flag and the enabled flag are always forced on.
    pub fn custom(pair: &HeaderPair, defaults: &CustomDefaults) -> Self {
        let schema = HeaderSchema {
            enabled: true,
            is_custom: true,
            type_name: defaults.type_name.clone(),
            input_label: defaults.input_label.clone(),
            ..HeaderSchema::default()
        };
        Self {
            name: pair.name.clone(),
            value: HeaderValue::Single(pair.value.clone()),
            schema,
        }
    }

    pub fn matches(&self, name: &str) -> bool {
        crate::http::same_name(&self.name, name)
    }

    pub fn to_pair(&self) -> HeaderPair {
        HeaderPair::new(self.name.clone(), self.value.to_text())
    }
}

/// Schema defaults applied to custom headers created from text.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CustomDefaults {
    pub type_name: String,
    pub input_label: String,
}

impl Default for CustomDefaults {
    fn default() -> Self {
        Self {
            type_name: "string".to_string(),
            input_label: "Header value".to_string(),
        }
    }
}
