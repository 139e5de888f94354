//! Content-Type tracking in both directions between the text and the
//! dedicated field.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::editor::events::EditorEvent;
use crate::editor::{HeadersEditor, UpdateSource};
use crate::http::CONTENT_TYPE;
use crate::http::parser;

static CONTENT_TYPE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?im)^[\t\r]*content-type[\t\r]*:[\t\r]*([^\n]*)$")
        .expect("content-type pattern is valid")
});

/// Trimmed value of the first `content-type` line, if any and non-empty.
pub fn detect(text: &str) -> Option<String> {
    let value = CONTENT_TYPE_RE.captures(text)?.get(1)?.as_str().trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Rewrites the first content-type header of `text` to `content_type`, or
/// appends a `Content-Type` line.
pub fn upsert(text: &str, content_type: &str) -> String {
    let mut list = parser::parse(text);
    list.set(CONTENT_TYPE, content_type);
    list.stringify()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrackerState {
    #[default]
    Synced,
    /// The tracker is writing the headers text itself.
    Updating,
}

impl HeadersEditor {
    /// Mirrors the content-type line of a freshly committed value.
    pub(crate) fn detect_content_type(&mut self, value: &str) {
        if self.tracker == TrackerState::Updating {
            return;
        }
        match detect(value) {
            Some(ct) => self.apply_content_type(Some(ct), UpdateSource::Text),
            None => {
                if self.content_type.is_some() {
                    self.apply_content_type(None, UpdateSource::Text);
                }
            }
        }
    }

    /// Stores a new tracked content type and propagates it.
    ///
    /// A change that came from the text is not written back to it. A change
    /// that came from an external notification is not echoed to listeners.
    pub(crate) fn apply_content_type(&mut self, content_type: Option<String>, source: UpdateSource) {
        let content_type = content_type.filter(|ct| !ct.is_empty());
        if self.content_type == content_type {
            return;
        }
        self.content_type = content_type.clone();

        if self.config.read_only {
            return;
        }

        let Some(ct) = content_type else {
            self.notify_content_type(String::new(), source);
            return;
        };

        if source != UpdateSource::Text {
            let headers = upsert(self.value.as_deref().unwrap_or(""), &ct);
            self.tracker = TrackerState::Updating;
            self.write_back(headers);
            self.tracker = TrackerState::Synced;
        }

        self.notify_content_type(ct, source);
    }

    fn notify_content_type(&mut self, value: String, source: UpdateSource) {
        if source == UpdateSource::External {
            return;
        }
        self.events.dispatch(EditorEvent::ContentTypeChanged { value });
    }
}
