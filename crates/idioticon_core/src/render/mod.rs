//! HTML rendering for glossary icons.
//!
//! # Responsibility
//! - Describe icon themes (wrapper tag, icon tag, class, symbol).
//! - Render term tooltips and resolve `load_terms` bindings for templates.
//!
//! # Invariants
//! - All term text is HTML-escaped before it is emitted.
//! - A term that cannot be resolved renders as an empty string.

pub mod tags;
pub mod theme;

/// Escapes text for use in HTML element content and quoted attributes.
pub fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            other => escaped.push(other),
        }
    }
    escaped
}
