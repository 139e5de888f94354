use std::time::Duration;

/// The view currently shown by the editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Panel {
    /// Form bound to the structured model.
    Form,
    /// Text view bound to the headers blob.
    Source(SourceView),
}

impl Panel {
    pub fn is_source(&self) -> bool {
        matches!(self, Panel::Source(_))
    }
}

/// Bound state of the raw text view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceView {
    value: String,
    mounted: bool,
}

impl SourceView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn set_value(&mut self, value: &str) {
        if self.value != value {
            self.value = value.to_string();
        }
    }

    /// One-time initialization once the host has finished mounting the view.
    pub fn mount(&mut self, value: &str) {
        self.mounted = true;
        self.set_value(value);
    }
}

/// Waits for the host to mount a freshly created view.
pub async fn wait_for_mount(delay: Duration) {
    if !delay.is_zero() {
        async_std::task::sleep(delay).await;
    }
}
