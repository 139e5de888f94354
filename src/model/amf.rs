//! AMF JSON-LD header nodes to view model. Expanded and compact (`@context`)
//! forms are accepted, `{"@id": ...}` links are resolved through an index.

use indexmap::IndexMap;
use serde_json::Value;
use thiserror::Error;

use crate::model::record::{HeaderRecord, HeaderSchema, HeaderValue};
use crate::model::ViewModel;

const NAME: &[&str] = &[
    "http://a.ml/vocabularies/apiContract#paramName",
    "http://a.ml/vocabularies/core#name",
    "http://raml.org/vocabularies/http#paramName",
    "http://schema.org/name",
];
const REQUIRED: &[&str] = &[
    "http://a.ml/vocabularies/apiContract#required",
    "http://raml.org/vocabularies/http#required",
];
const DESCRIPTION: &[&str] = &[
    "http://a.ml/vocabularies/core#description",
    "http://schema.org/description",
];
const SCHEMA: &[&str] = &[
    "http://a.ml/vocabularies/shapes#schema",
    "http://raml.org/vocabularies/http#schema",
];
const ITEMS: &[&str] = &[
    "http://a.ml/vocabularies/shapes#items",
    "http://raml.org/vocabularies/shapes#items",
];
const ARRAY_SHAPE: &[&str] = &[
    "http://a.ml/vocabularies/shapes#ArrayShape",
    "http://raml.org/vocabularies/shapes#ArrayShape",
];
const DATATYPE: &[&str] = &["http://www.w3.org/ns/shacl#datatype"];
const DEFAULT_VALUE: &[&str] = &["http://www.w3.org/ns/shacl#defaultValueStr"];
const PATTERN: &[&str] = &["http://www.w3.org/ns/shacl#pattern"];
const ENUM: &[&str] = &["http://www.w3.org/ns/shacl#in"];
const EXAMPLES: &[&str] = &[
    "http://a.ml/vocabularies/apiContract#examples",
    "http://a.ml/vocabularies/document#examples",
];
const EXAMPLE_VALUE: &[&str] = &[
    "http://a.ml/vocabularies/core#raw",
    "http://a.ml/vocabularies/document#raw",
    "http://a.ml/vocabularies/document#value",
];
const DATA_VALUE: &[&str] = &["http://a.ml/vocabularies/data#value"];
const RDF_MEMBER: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#_";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmfError {
    #[error("header node is not a JSON object")]
    NotAnObject,
    #[error("header node {0} has no name")]
    MissingName(String),
}

/// Builds [`HeaderRecord`]s from AMF header nodes.
#[derive(Debug, Default, Clone)]
pub struct ViewModelBuilder {
    /// Strips documentation from built records.
    pub no_docs: bool,
    context: IndexMap<String, String>,
    index: IndexMap<String, Value>,
}

impl ViewModelBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the whole AMF document so compact keys and `@id` links can
    /// be resolved.
    pub fn set_amf(&mut self, amf: Option<&Value>) {
        self.context.clear();
        self.index.clear();
        let Some(amf) = amf else {
            return;
        };

        let root = match amf {
            Value::Array(items) => items.first(),
            other => Some(other),
        };
        if let Some(Value::Object(ctx)) = root.and_then(|r| r.get("@context")) {
            for (prefix, ns) in ctx {
                if let Value::String(ns) = ns {
                    self.context.insert(prefix.clone(), ns.clone());
                }
            }
        }

        self.index_nodes(amf);
        log::debug!(
            "indexed {} AMF nodes, {} context prefixes",
            self.index.len(),
            self.context.len()
        );
    }

    fn index_nodes(&mut self, value: &Value) {
        match value {
            Value::Array(items) => items.iter().for_each(|v| self.index_nodes(v)),
            Value::Object(map) => {
                if let Some(Value::String(id)) = map.get("@id") {
                    // Bare links carry nothing worth indexing.
                    if map.len() > 1 && !self.index.contains_key(id) {
                        self.index.insert(id.clone(), value.clone());
                    }
                }
                map.values().for_each(|v| self.index_nodes(v));
            }
            _ => {}
        }
    }

    /// Turns a list of AMF header nodes into the view model.
    pub fn compute_view_model(&self, headers: &Value) -> ViewModel {
        let nodes: Vec<&Value> = match headers {
            Value::Array(items) => items.iter().collect(),
            Value::Null => Vec::new(),
            other => vec![other],
        };

        let mut model = Vec::with_capacity(nodes.len());
        for node in nodes {
            match self.header_from_node(node) {
                Ok(record) => model.push(self.build_property(record)),
                Err(err) => log::warn!("skipping header node: {err}"),
            }
        }
        model
    }

    /// Attaches presentation metadata to a record.
    pub fn build_property(&self, mut record: HeaderRecord) -> HeaderRecord {
        let schema = &mut record.schema;
        if schema.input_label.is_empty() {
            schema.input_label = if record.name.is_empty() {
                "Header value".to_string()
            } else {
                record.name.clone()
            };
        }
        if schema.input_type.is_empty() {
            schema.input_type = input_type(&schema.type_name).to_string();
        }
        if self.no_docs {
            schema.description = None;
        }
        if record.value.is_empty() {
            if let Some(default) = &schema.default_value {
                record.value = HeaderValue::from_text(default, schema.is_array);
            }
        }
        record
    }

    fn header_from_node(&self, node: &Value) -> Result<HeaderRecord, AmfError> {
        let node = self.resolve(node);
        if !node.is_object() {
            return Err(AmfError::NotAnObject);
        }

        let name = self
            .scalar(node, NAME)
            .ok_or_else(|| AmfError::MissingName(node_id(node)))?;

        let mut schema = HeaderSchema {
            required: self.scalar(node, REQUIRED).is_some_and(|v| v == "true"),
            description: self.scalar(node, DESCRIPTION),
            ..HeaderSchema::default()
        };

        if let Some(shape) = self.first(node, SCHEMA) {
            self.apply_shape(shape, &mut schema);
        }

        let value = HeaderValue::empty(schema.is_array);
        Ok(HeaderRecord::new(name, value, schema))
    }

    fn apply_shape(&self, shape: &Value, schema: &mut HeaderSchema) {
        let mut shape = self.resolve(shape);

        if self.has_type(shape, ARRAY_SHAPE) {
            schema.is_array = true;
            if let Some(items) = self.first(shape, ITEMS) {
                // Constraints of interest live on the item shape.
                shape = self.resolve(items);
            }
        }

        if let Some(dt) = self.first(shape, DATATYPE).and_then(|v| self.id_of(v)) {
            schema.type_name = dt.rsplit('#').next().unwrap_or(&dt).to_string();
        }
        schema.default_value = self.scalar(shape, DEFAULT_VALUE);
        schema.pattern = self.scalar(shape, PATTERN);

        if let Some(list) = self.first(shape, ENUM) {
            schema.enum_values = self.list_literals(list);
        }

        let examples = self
            .all(shape, EXAMPLES)
            .into_iter()
            .filter_map(|ex| self.scalar(self.resolve(ex), EXAMPLE_VALUE))
            .collect::<Vec<_>>();
        schema.examples = examples;
    }

    fn resolve<'a>(&'a self, node: &'a Value) -> &'a Value {
        if let Value::Object(map) = node {
            if map.len() == 1 {
                if let Some(Value::String(id)) = map.get("@id") {
                    if let Some(target) = self.index.get(id) {
                        return target;
                    }
                }
            }
        }
        node
    }

    /// Every key `iri` may appear under: the IRI itself and any compact
    /// `prefix:local` form declared by the document context.
    fn keys_for(&self, iri: &str) -> Vec<String> {
        let mut keys = vec![iri.to_string()];
        for (prefix, ns) in &self.context {
            if let Some(local) = iri.strip_prefix(ns.as_str()) {
                keys.push(format!("{prefix}:{local}"));
            }
        }
        keys
    }

    fn all<'a>(&'a self, node: &'a Value, iris: &[&str]) -> Vec<&'a Value> {
        for iri in iris {
            for key in self.keys_for(iri) {
                match node.get(&key) {
                    Some(Value::Array(items)) => return items.iter().collect(),
                    Some(v) => return vec![v],
                    None => {}
                }
            }
        }
        Vec::new()
    }

    fn first<'a>(&'a self, node: &'a Value, iris: &[&str]) -> Option<&'a Value> {
        self.all(node, iris).into_iter().next()
    }

    fn scalar(&self, node: &Value, iris: &[&str]) -> Option<String> {
        self.first(node, iris).and_then(literal)
    }

    fn id_of(&self, value: &Value) -> Option<String> {
        match value {
            Value::String(s) => Some(s.clone()),
            Value::Object(map) => map.get("@id").and_then(Value::as_str).map(str::to_string),
            _ => None,
        }
    }

    fn has_type(&self, node: &Value, types: &[&str]) -> bool {
        let declared: Vec<&str> = match node.get("@type") {
            Some(Value::Array(items)) => items.iter().filter_map(Value::as_str).collect(),
            Some(Value::String(s)) => vec![s.as_str()],
            _ => return false,
        };
        types.iter().any(|t| {
            let keys = self.keys_for(t);
            declared.iter().any(|d| keys.iter().any(|k| k == d))
        })
    }

    /// Literal members of an `rdf:Seq` (or a plain JSON-LD list).
    fn list_literals(&self, list: &Value) -> Vec<String> {
        let list = self.resolve(list);
        let members: Vec<&Value> = match list {
            Value::Array(items) => items.iter().collect(),
            Value::Object(map) => {
                if let Some(Value::Array(items)) = map.get("@list") {
                    items.iter().collect()
                } else {
                    let mut members: Vec<(usize, &Value)> = map
                        .iter()
                        .filter_map(|(k, v)| {
                            let n = self
                                .keys_for(RDF_MEMBER)
                                .iter()
                                .find_map(|p| k.strip_prefix(p.as_str()))?
                                .parse::<usize>()
                                .ok()?;
                            Some((n, v))
                        })
                        .collect();
                    members.sort_by_key(|(n, _)| *n);
                    members.into_iter().map(|(_, v)| v).collect()
                }
            }
            _ => Vec::new(),
        };

        members
            .into_iter()
            .filter_map(|m| {
                let m = match m {
                    Value::Array(items) => items.first()?,
                    other => other,
                };
                let m = self.resolve(m);
                literal(m).or_else(|| self.scalar(m, DATA_VALUE))
            })
            .collect()
    }
}

/// String form of a JSON-LD literal (`{"@value": ...}`, or a bare scalar).
fn literal(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Object(map) => map.get("@value").and_then(literal),
        Value::Array(items) => items.first().and_then(literal),
        Value::Null => None,
    }
}

fn node_id(node: &Value) -> String {
    node.get("@id")
        .and_then(Value::as_str)
        .unwrap_or("<anonymous>")
        .to_string()
}

fn input_type(type_name: &str) -> &'static str {
    match type_name {
        "integer" | "number" | "long" | "double" | "float" => "number",
        "boolean" => "boolean",
        "date" | "dateTime" | "time" | "dateTimeOnly" => "date",
        _ => "text",
    }
}
