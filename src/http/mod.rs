pub mod headers;
pub mod parser;
pub mod validator;

/// Name used when a `Content-Type` header has to be synthesized.
pub const CONTENT_TYPE: &str = "Content-Type";

/// Separator used when a multi-valued header is flattened to one line.
pub const VALUE_SEPARATOR: &str = ",";

/// Case-insensitive header name comparison.
pub fn same_name(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b)
}

/// Returns `true` if `c` is allowed in a header field name (RFC 7230 `tchar`).
pub fn is_token_char(c: char) -> bool {
    c.is_ascii_alphanumeric()
        || matches!(
            c,
            '!' | '#' | '$' | '%' | '&' | '\'' | '*' | '+' | '-' | '.' | '^' | '_' | '`' | '|' | '~'
        )
}
