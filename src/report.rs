//! The `<Prtg>` error document returned to the monitoring agent.

use std::fmt;

/// Error code written for every failure. PRTG only distinguishes "error" from "no error".
pub const ERROR_CODE: u32 = 1;

/// A failure report, serialized as `<Prtg><Error>1</Error><Text>...</Text></Prtg>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorReport {
    pub code: u32,
    pub message: String,
}

impl ErrorReport {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            code: ERROR_CODE,
            message: message.into(),
        }
    }

    /// Serialize to the single-line XML document PRTG parses.
    #[must_use]
    pub fn to_xml(&self) -> String {
        format!(
            "<Prtg><Error>{}</Error><Text>{}</Text></Prtg>",
            self.code,
            escape_text(&self.message)
        )
    }
}

impl fmt::Display for ErrorReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_xml())
    }
}

/// Escape a string for use as XML element content.
///
/// Characters outside the XML 1.0 `Char` production (most C0 controls, such as the
/// ANSI escape PowerShell 7 puts in its error output) are replaced with U+FFFD.
#[must_use]
pub fn escape_text(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            c if is_xml_char(c) => escaped.push(c),
            _ => escaped.push(char::REPLACEMENT_CHARACTER),
        }
    }
    escaped
}

fn is_xml_char(c: char) -> bool {
    matches!(c,
        '\t' | '\n' | '\r'
        | '\u{20}'..='\u{D7FF}'
        | '\u{E000}'..='\u{FFFD}'
        | '\u{10000}'..='\u{10FFFF}')
}
