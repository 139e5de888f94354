use crate::editor::events::{EditorEvent, Notification};
use crate::editor::{HeadersEditor, UpdateSource};
use crate::http::parser;

impl HeadersEditor {
    /// Applies an incoming notification. Notifications whose default was
    /// prevented are ignored.
    pub fn handle(&mut self, notification: &Notification) {
        if notification.default_prevented() {
            log::debug!("ignoring cancelled {}", notification.event.name());
            return;
        }

        match &notification.event {
            EditorEvent::HeadersChanged { value } => self.replace_headers(value),
            EditorEvent::HeaderChanged { name, value } => self.upsert_header(name, value),
            EditorEvent::HeaderDeleted { name } => self.delete_header(name),
            EditorEvent::ContentTypeChanged { value } => {
                self.apply_content_type(Some(value.clone()), UpdateSource::External)
            }
            EditorEvent::ValueChanged { .. } | EditorEvent::InvalidChanged { .. } => {
                log::debug!("{} is not an accepted notification", notification.event.name());
            }
        }
    }

    /// Replaces the whole text verbatim.
    pub fn replace_headers(&mut self, value: &str) {
        self.set_values(value.to_string(), UpdateSource::External);
    }

    /// Sets one header, overwriting the first case-insensitive match or
    /// appending a new line.
    pub fn upsert_header(&mut self, name: &str, value: &str) {
        if name.is_empty() {
            log::warn!("request-header-changed without a header name");
            return;
        }
        let mut list = parser::parse(self.value().unwrap_or(""));
        list.set(name, value);
        self.set_values(list.stringify(), UpdateSource::External);
    }

    /// Removes the first case-insensitive match. No-op when absent.
    pub fn delete_header(&mut self, name: &str) {
        if name.is_empty() {
            log::warn!("request-header-deleted without a header name");
            return;
        }
        let mut list = parser::parse(self.value().unwrap_or(""));
        if !list.remove(name) {
            return;
        }
        self.set_values(list.stringify(), UpdateSource::External);
    }
}
