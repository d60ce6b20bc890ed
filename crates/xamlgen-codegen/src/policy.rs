//! Feature policies for operations a config can switch off.

use crate::fragment::Fragment;

/// Whether an operation renders its real body or a fixed stub.
///
/// Selected once per feature flag. A disabled operation still renders a
/// method so every member the view binds to exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeaturePolicy {
    Enabled,
    /// Carries the message for the `NotSupportedException` stub.
    Disabled(String),
}

impl FeaturePolicy {
    pub fn from_flag(enabled: bool, stub_message: impl Into<String>) -> Self {
        if enabled {
            FeaturePolicy::Enabled
        } else {
            FeaturePolicy::Disabled(stub_message.into())
        }
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self, FeaturePolicy::Enabled)
    }

    /// Render the body, or the stub when disabled.
    pub fn render(&self, body: impl FnOnce() -> Fragment) -> Fragment {
        match self {
            FeaturePolicy::Enabled => body(),
            FeaturePolicy::Disabled(message) => stub(message),
        }
    }
}

/// The fixed not-supported statement.
pub fn stub(message: &str) -> Fragment {
    Fragment::body([format!(
        "throw new NotSupportedException(\"{}\");",
        message.replace('"', "\\\"")
    )])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_renders_stub() {
        let policy = FeaturePolicy::from_flag(false, "Adding items is disabled.");
        let body = policy.render(|| Fragment::body(["Items.Add(item);"]));
        assert_eq!(
            body.lines(),
            ["throw new NotSupportedException(\"Adding items is disabled.\");"]
        );
    }

    #[test]
    fn test_enabled_renders_body() {
        let policy = FeaturePolicy::from_flag(true, "unused");
        assert!(policy.is_enabled());
        let body = policy.render(|| Fragment::body(["Items.Add(item);"]));
        assert_eq!(body.lines(), ["Items.Add(item);"]);
    }
}
