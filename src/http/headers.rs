use serde::{Deserialize, Serialize};

use crate::http::same_name;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderPair {
    pub name: String,
    pub value: String,
}

impl HeaderPair {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderList {
    headers: Vec<HeaderPair>,
}

impl HeaderList {
    pub fn new() -> Self {
        Self {
            headers: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.headers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, HeaderPair> {
        self.headers.iter()
    }

    pub fn push(&mut self, name: &str, value: &str) {
        self.headers.push(HeaderPair::new(name, value));
    }

    /// Value of the first header named `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|h| same_name(&h.name, name))
            .map(|h| h.value.as_str())
    }

    /// Overwrites the first header named `name` or appends a new one.
    ///
    /// The stored name keeps its original casing when the header already
    /// exists.
    pub fn set(&mut self, name: &str, value: &str) {
        match self.headers.iter_mut().find(|h| same_name(&h.name, name)) {
            Some(h) => {
                if h.value != value {
                    h.value = value.to_string();
                }
            }
            None => self.push(name, value),
        }
    }

    /// Removes the first header named `name`. Returns `false` if nothing
    /// matched.
    pub fn remove(&mut self, name: &str) -> bool {
        match self.headers.iter().position(|h| same_name(&h.name, name)) {
            Some(i) => {
                self.headers.remove(i);
                true
            }
            None => false,
        }
    }

    pub fn into_vec(self) -> Vec<HeaderPair> {
        self.headers
    }

    /// Serializes the list as `name: value` lines joined with `\n`.
    ///
    /// Pairs with both an empty name and an empty value are skipped.
    pub fn stringify(&self) -> String {
        let mut result = String::new();
        for h in &self.headers {
            if h.name.is_empty() && h.value.is_empty() {
                continue;
            }
            if !result.is_empty() {
                result.push('\n');
            }
            result.push_str(&format!("{}: {}", h.name, h.value));
        }
        result
    }
}

impl From<Vec<HeaderPair>> for HeaderList {
    fn from(headers: Vec<HeaderPair>) -> Self {
        Self { headers }
    }
}

impl FromIterator<HeaderPair> for HeaderList {
    fn from_iter<I: IntoIterator<Item = HeaderPair>>(iter: I) -> Self {
        Self {
            headers: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a HeaderList {
    type Item = &'a HeaderPair;
    type IntoIter = std::slice::Iter<'a, HeaderPair>;

    fn into_iter(self) -> Self::IntoIter {
        self.headers.iter()
    }
}
