//! Element locators understood by the extension.

use std::fmt;

// ============================================================================
// By
// ============================================================================

/// How the extension should locate an element.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum By {
    /// Element `id`.
    Id(String),
    /// XPath expression.
    XPath(String),
}

impl By {
    /// ID locator.
    #[inline]
    pub fn id(id: impl Into<String>) -> Self {
        Self::Id(id.into())
    }

    /// XPath locator.
    #[inline]
    pub fn xpath(expr: impl Into<String>) -> Self {
        Self::XPath(expr.into())
    }

    /// Strategy name on the wire.
    #[must_use]
    pub fn strategy(&self) -> &'static str {
        match self {
            Self::Id(_) => "id",
            Self::XPath(_) => "xpath",
        }
    }

    /// Locator value.
    #[must_use]
    pub fn value(&self) -> &str {
        match self {
            Self::Id(v) | Self::XPath(v) => v,
        }
    }
}

impl fmt::Display for By {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.strategy(), self.value())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategies() {
        assert_eq!(By::id("vin_input").strategy(), "id");
        assert_eq!(By::xpath("//div").strategy(), "xpath");
    }

    #[test]
    fn test_display_names_strategy_and_value() {
        let by = By::xpath(r#"//*[@id="nhtsa-26"]"#);
        assert_eq!(by.to_string(), r#"xpath=//*[@id="nhtsa-26"]"#);
        assert_eq!(by.value(), r#"//*[@id="nhtsa-26"]"#);
    }
}
