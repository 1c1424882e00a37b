//! Pango markup escaping
//!
//! Row and group titles come straight from the user's config file. Toolkits
//! that render them as markup must never see a raw `&` or `<`.

use std::fmt;
use std::fmt::Write as _;

/// Escape text for use inside Pango markup, like `g_markup_escape_text`.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\'' => out.push_str("&#39;"),
            '"' => out.push_str("&quot;"),
            c if is_restricted(c) => {
                let _ = write!(out, "&#x{:x};", c as u32);
            }
            _ => out.push(c),
        }
    }
    out
}

/// C0 and C1 controls that markup cannot carry raw. Tab, newline, carriage
/// return and NEL pass through.
fn is_restricted(c: char) -> bool {
    matches!(
        c as u32,
        0x01..=0x08 | 0x0b..=0x0c | 0x0e..=0x1f | 0x7f..=0x84 | 0x86..=0x9f
    )
}

/// Display text that has already been escaped.
///
/// Keeps the plain source around for front ends that draw text verbatim.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Markup {
    escaped: String,
    plain: String,
}

impl Markup {
    pub fn escape(plain: impl Into<String>) -> Self {
        let plain = plain.into();
        Self {
            escaped: escape(&plain),
            plain,
        }
    }

    /// Escaped form, safe to hand to a markup-interpreting widget
    pub fn as_str(&self) -> &str {
        &self.escaped
    }

    /// The original, unescaped text
    pub fn plain(&self) -> &str {
        &self.plain
    }

    pub fn is_empty(&self) -> bool {
        self.plain.is_empty()
    }
}

impl fmt::Display for Markup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.escaped)
    }
}
