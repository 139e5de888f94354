use serde::Serialize;

/// Notifications exchanged between the editor and its host.
///
/// The editor emits `value-changed`, `request-headers-changed`,
/// `content-type-changed` and `invalid-changed`. It accepts
/// `request-headers-changed`, `request-header-changed`,
/// `request-header-deleted` and `content-type-changed` through
/// [`HeadersEditor::handle`](crate::editor::HeadersEditor::handle).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum EditorEvent {
    ValueChanged { value: String },
    #[serde(rename = "request-headers-changed")]
    HeadersChanged { value: String },
    #[serde(rename = "request-header-changed")]
    HeaderChanged { name: String, value: String },
    #[serde(rename = "request-header-deleted")]
    HeaderDeleted { name: String },
    ContentTypeChanged { value: String },
    InvalidChanged { invalid: bool },
}

impl EditorEvent {
    pub fn name(&self) -> &'static str {
        match self {
            EditorEvent::ValueChanged { .. } => "value-changed",
            EditorEvent::HeadersChanged { .. } => "request-headers-changed",
            EditorEvent::HeaderChanged { .. } => "request-header-changed",
            EditorEvent::HeaderDeleted { .. } => "request-header-deleted",
            EditorEvent::ContentTypeChanged { .. } => "content-type-changed",
            EditorEvent::InvalidChanged { .. } => "invalid-changed",
        }
    }

    pub fn is_cancelable(&self) -> bool {
        !matches!(
            self,
            EditorEvent::ValueChanged { .. } | EditorEvent::InvalidChanged { .. }
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub event: EditorEvent,
    default_prevented: bool,
}

impl Notification {
    pub fn new(event: EditorEvent) -> Self {
        Self {
            event,
            default_prevented: false,
        }
    }

    /// Cancels the default action. No-op on non-cancelable events.
    pub fn prevent_default(&mut self) {
        if self.event.is_cancelable() {
            self.default_prevented = true;
        }
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }
}

pub type Listener = Box<dyn FnMut(&mut Notification)>;

#[derive(Default)]
pub struct EventBus {
    listeners: Vec<Listener>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_listener(&mut self, listener: impl FnMut(&mut Notification) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Delivers `event` to every listener in registration order and returns
    /// the notification so the caller can check for cancellation.
    pub fn dispatch(&mut self, event: EditorEvent) -> Notification {
        log::trace!("dispatching {}", event.name());
        let mut notification = Notification::new(event);
        for listener in self.listeners.iter_mut() {
            listener(&mut notification);
        }
        notification
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
