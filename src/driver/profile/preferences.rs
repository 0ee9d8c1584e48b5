//! `user.js` preference lines.
//!
//! ```
//! use vehicle_history_reports::driver::profile::{FirefoxPreference, PreferenceValue};
//!
//! let pref = FirefoxPreference::new("permissions.default.image", PreferenceValue::Int(2))
//!     .with_comment("Block images");
//!
//! assert_eq!(
//!     pref.to_user_pref_line(),
//!     "// Block images\nuser_pref(\"permissions.default.image\", 2);"
//! );
//! ```

// ============================================================================
// PreferenceValue
// ============================================================================

/// Value of a Firefox preference.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PreferenceValue {
    /// `true` / `false`.
    Bool(bool),
    /// Integer literal.
    Int(i32),
    /// Quoted string.
    String(String),
}

impl PreferenceValue {
    /// Renders the value as a JavaScript literal.
    #[must_use]
    pub fn to_js_string(&self) -> String {
        match self {
            Self::Bool(b) => b.to_string(),
            Self::Int(i) => i.to_string(),
            Self::String(s) => format!("\"{}\"", escape_js_string(s)),
        }
    }
}

impl From<bool> for PreferenceValue {
    #[inline]
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i32> for PreferenceValue {
    #[inline]
    fn from(value: i32) -> Self {
        Self::Int(value)
    }
}

impl From<&str> for PreferenceValue {
    #[inline]
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

// ============================================================================
// FirefoxPreference
// ============================================================================

/// One `user_pref(...)` entry, optionally preceded by a comment line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FirefoxPreference {
    /// Preference name.
    pub key: String,
    /// Preference value.
    pub value: PreferenceValue,
    /// Comment written above the line.
    pub comment: Option<String>,
}

impl FirefoxPreference {
    /// Creates a preference without comment.
    #[must_use]
    pub fn new(key: impl Into<String>, value: impl Into<PreferenceValue>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            comment: None,
        }
    }

    /// Attaches a comment.
    #[must_use]
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// Renders the entry for `user.js`.
    #[must_use]
    pub fn to_user_pref_line(&self) -> String {
        let line = format!(
            "user_pref(\"{}\", {});",
            escape_js_string(&self.key),
            self.value.to_js_string()
        );

        match &self.comment {
            Some(comment) => format!("// {comment}\n{line}"),
            None => line,
        }
    }
}

fn escape_js_string(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
        .replace('\t', "\\t")
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_literals() {
        assert_eq!(PreferenceValue::Bool(false).to_js_string(), "false");
        assert_eq!(PreferenceValue::Int(-1).to_js_string(), "-1");
        assert_eq!(
            PreferenceValue::String("localhost, 127.0.0.1".into()).to_js_string(),
            "\"localhost, 127.0.0.1\""
        );
    }

    #[test]
    fn test_string_escaping() {
        assert_eq!(
            escape_js_string("C:\\proxy\n\"pac\""),
            "C:\\\\proxy\\n\\\"pac\\\""
        );
    }

    #[test]
    fn test_line_without_comment() {
        let pref = FirefoxPreference::new("network.proxy.http_port", 3128);
        assert_eq!(
            pref.to_user_pref_line(),
            "user_pref(\"network.proxy.http_port\", 3128);"
        );
    }

    #[test]
    fn test_line_with_comment() {
        let pref = FirefoxPreference::new("browser.shell.checkDefaultBrowser", false)
            .with_comment("No default browser prompt");
        let line = pref.to_user_pref_line();

        assert!(line.starts_with("// No default browser prompt\n"));
        assert!(line.ends_with("user_pref(\"browser.shell.checkDefaultBrowser\", false);"));
    }
}
