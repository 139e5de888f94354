//! Headers editor core: keeps the headers text, the view model and the
//! tracked content type in sync.

pub mod content_type;
pub mod events;
pub mod handlers;
pub mod panel;
pub mod reconcile;

use indexmap::IndexMap;
use serde_json::Value;

use crate::config::EditorConfig;
use crate::http::parser;
use crate::http::validator::{Validator, ValidatorError};
use crate::model::amf::ViewModelBuilder;
use crate::model::{HeaderRecord, ViewModel};
use content_type::TrackerState;
use events::{EditorEvent, EventBus, Notification};
use panel::{Panel, SourceView};

/// Provenance of a write to the headers text or to the content type.
///
/// `Text` writes come from the visible panel and are announced with a
/// cancelable `request-headers-changed`. `Model` writes are computed by the
/// editor and never reconciled back. `External` writes are reconciled into
/// the model and mirrored in the source view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateSource {
    Text,
    Model,
    External,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Commit {
    Unchanged,
    Applied,
    Cancelled,
}

#[derive(Debug)]
pub struct HeadersEditor {
    config: EditorConfig,
    builder: ViewModelBuilder,
    amf_headers: Option<Value>,

    value: Option<String>,
    content_type: Option<String>,
    view_model: Option<ViewModel>,

    panel: Panel,
    tracker: TrackerState,
    invalid: bool,
    events: EventBus,
}

impl Default for HeadersEditor {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl HeadersEditor {
    pub fn new(config: EditorConfig) -> Self {
        let mut builder = ViewModelBuilder::new();
        builder.no_docs = config.no_docs;
        Self {
            config,
            builder,
            amf_headers: None,
            value: None,
            content_type: None,
            view_model: None,
            panel: Panel::Form,
            tracker: TrackerState::Synced,
            invalid: false,
            events: EventBus::new(),
        }
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// Replaces the headers text as the host would. The model is reconciled
    /// from the new text.
    pub fn set_value(&mut self, value: impl Into<String>) {
        self.set_values(value.into(), UpdateSource::External);
    }

    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    /// Sets the tracked content type as the host would. The headers text is
    /// updated and listeners are notified.
    pub fn set_content_type(&mut self, content_type: Option<String>) {
        self.apply_content_type(content_type, UpdateSource::Model);
    }

    pub fn view_model(&self) -> &[HeaderRecord] {
        self.view_model.as_deref().unwrap_or(&[])
    }

    /// Replaces the view model. The text is rebuilt from it.
    pub fn set_view_model(&mut self, model: ViewModel) {
        self.view_model = Some(model);
        self.sync_value_from_model();
    }

    /// Registers the whole AMF document used to resolve header nodes.
    pub fn set_amf(&mut self, amf: Option<&Value>) {
        self.builder.set_amf(amf);
    }

    /// Replaces the view model with one built from AMF header nodes.
    pub fn set_amf_headers(&mut self, headers: Option<Value>) {
        self.amf_headers = headers;
        self.rebuild_view_model();
    }

    pub fn set_no_docs(&mut self, no_docs: bool) {
        if self.config.no_docs == no_docs {
            return;
        }
        self.config.no_docs = no_docs;
        self.builder.no_docs = no_docs;
        if self.amf_headers.is_some() {
            self.rebuild_view_model();
        }
    }

    fn rebuild_view_model(&mut self) {
        let model = match &self.amf_headers {
            Some(headers) => self.builder.compute_view_model(headers),
            None => Vec::new(),
        };
        log::debug!("view model rebuilt with {} header(s)", model.len());
        self.view_model = Some(model);
        self.sync_value_from_model();
    }

    /// Commits the serialized model without reconciling it back.
    fn sync_value_from_model(&mut self) {
        let value = self.model_to_value(None);
        self.set_values(value, UpdateSource::Model);
    }

    pub fn read_only(&self) -> bool {
        self.config.read_only
    }

    pub fn set_read_only(&mut self, read_only: bool) {
        self.config.read_only = read_only;
    }

    pub fn allow_disable_params(&self) -> bool {
        self.config.allow_disable_params
    }

    pub fn set_allow_disable_params(&mut self, allow: bool) {
        self.config.allow_disable_params = allow;
    }

    pub fn set_auto_validate(&mut self, auto_validate: bool) {
        self.config.auto_validate = auto_validate;
    }

    pub fn invalid(&self) -> bool {
        self.invalid
    }

    pub fn source_mode(&self) -> bool {
        self.panel.is_source()
    }

    pub fn panel(&self) -> &Panel {
        &self.panel
    }

    pub fn source_view(&self) -> Option<&SourceView> {
        match &self.panel {
            Panel::Source(view) => Some(view),
            Panel::Form => None,
        }
    }

    pub fn add_listener(&mut self, listener: impl FnMut(&mut Notification) + 'static) {
        self.events.add_listener(listener);
    }

    /// Switches between the form and the source view.
    ///
    /// The source view receives the serialized model once the host had time
    /// to mount it. Leaving the source view reconciles the model from the
    /// current text.
    pub async fn set_source_mode(&mut self, source: bool) {
        if self.config.no_source_editor || self.source_mode() == source {
            return;
        }

        if source {
            self.panel = Panel::Source(SourceView::new());
            panel::wait_for_mount(self.config.mount_delay).await;
            let value = self.model_to_value(None);
            if let Panel::Source(view) = &mut self.panel {
                view.mount(&value);
            }
            self.commit_value(value, UpdateSource::Model);
        } else {
            self.panel = Panel::Form;
            self.reconcile_from_text(None);
        }
        log::debug!("source mode {}", source);
    }

    /// Serializes `model`, or the current view model when `None`.
    pub fn model_to_value(&self, model: Option<&[HeaderRecord]>) -> String {
        let model = model.or(self.view_model.as_deref()).unwrap_or(&[]);
        reconcile::model_to_value(model, self.config.allow_disable_params)
    }

    /// Merges `text` (or the current value when `None`) into the view model.
    ///
    /// Does nothing when there is neither a value nor a model.
    pub fn reconcile_from_text(&mut self, text: Option<&str>) {
        let text = match text.or(self.value.as_deref()) {
            Some(text) => text.to_string(),
            None if self.view_model.is_none() => return,
            None => String::new(),
        };

        let pairs = parser::parse_valid(&text);
        let mut model = self.view_model.take().unwrap_or_default();
        let builder = &self.builder;
        let defaults = &self.config.custom_defaults;
        reconcile::merge(
            &mut model,
            &pairs,
            self.config.allow_disable_params,
            |pair| builder.build_property(HeaderRecord::custom(pair, defaults)),
        );
        self.view_model = Some(model);
    }

    /// Text typed into the source view.
    pub fn source_edited(&mut self, text: impl Into<String>) {
        if self.config.read_only {
            return;
        }
        let text = text.into();
        if let Panel::Source(view) = &mut self.panel {
            view.set_value(&text);
        }
        if self.commit_value(text.clone(), UpdateSource::Text) == Commit::Applied {
            self.reconcile_from_text(Some(&text));
        }
    }

    /// Model committed by the form view. The text follows the model.
    pub fn form_edited(&mut self, model: ViewModel) {
        if self.config.read_only {
            return;
        }
        let value = reconcile::model_to_value(&model, self.config.allow_disable_params);
        self.view_model = Some(model);
        self.commit_value(value, UpdateSource::Text);
    }

    /// Single write path for the headers text.
    fn commit_value(&mut self, value: String, source: UpdateSource) -> Commit {
        if self.value.as_deref() == Some(value.as_str()) {
            return Commit::Unchanged;
        }
        self.value = Some(value.clone());
        self.events.dispatch(EditorEvent::ValueChanged {
            value: value.clone(),
        });

        self.detect_content_type(&value);

        let commit = match source {
            UpdateSource::Text => {
                let n = self.events.dispatch(EditorEvent::HeadersChanged { value });
                if n.default_prevented() {
                    log::debug!("request-headers-changed cancelled by listener");
                    Commit::Cancelled
                } else {
                    Commit::Applied
                }
            }
            UpdateSource::Model => Commit::Applied,
            UpdateSource::External => {
                self.reconcile_from_text(Some(&value));
                Commit::Applied
            }
        };

        if self.config.auto_validate {
            self.validate();
        }
        commit
    }

    /// Commits a value computed outside of the visible panel and mirrors it
    /// in the source view.
    fn set_values(&mut self, value: String, source: UpdateSource) {
        if self.commit_value(value.clone(), source) == Commit::Unchanged {
            return;
        }
        if let Panel::Source(view) = &mut self.panel {
            view.set_value(&value);
        }
    }

    /// Text rewritten by the editor itself; the model follows.
    pub(crate) fn write_back(&mut self, value: String) {
        self.set_values(value, UpdateSource::Model);
        self.reconcile_from_text(None);
    }

    /// Per-record validation errors of the view model, keyed by header name.
    pub fn validation_report(&self) -> IndexMap<String, ValidatorError> {
        let mut report = IndexMap::new();
        for record in self.view_model() {
            if let Err(err) = Validator::validate_record(record) {
                report.entry(record.name.clone()).or_insert(err);
            }
        }
        report
    }

    /// Advisory validation. Updates [`invalid`](Self::invalid) and never
    /// blocks a write.
    pub fn validate(&mut self) -> bool {
        let valid = match &self.panel {
            Panel::Source(view) => match Validator::validate_text(view.value()) {
                Ok(()) => true,
                Err(err) => {
                    log::debug!("headers text is invalid: {err}");
                    false
                }
            },
            Panel::Form => {
                let report = self.validation_report();
                for (name, err) in &report {
                    log::debug!("header {name} is invalid: {err}");
                }
                report.is_empty()
            }
        };
        self.set_invalid(!valid);
        valid
    }

    fn set_invalid(&mut self, invalid: bool) {
        if self.invalid == invalid {
            return;
        }
        self.invalid = invalid;
        self.events.dispatch(EditorEvent::InvalidChanged { invalid });
    }
}
