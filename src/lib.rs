//! Synchronization core of an HTTP headers editor.

pub mod config;
pub mod editor;
pub mod http;
pub mod model;

pub use config::EditorConfig;
pub use editor::{HeadersEditor, UpdateSource};
pub use model::{HeaderRecord, HeaderSchema, HeaderValue};
