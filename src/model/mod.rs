pub mod amf;
pub mod record;

pub use record::{CustomDefaults, HeaderRecord, HeaderSchema, HeaderValue};

/// Ordered structured model. Names are not unique; lookups use the first
/// case-insensitive match.
pub type ViewModel = Vec<HeaderRecord>;
