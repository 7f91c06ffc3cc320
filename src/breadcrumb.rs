//! The breadcrumb record mirrored by [`BreadcrumbMirror`].
//!
//! A [`Breadcrumb`] is a timestamped diagnostic event used to reconstruct the
//! sequence of actions leading up to an error. It is produced by whatever
//! telemetry source feeds the mirror, so every field is optional. The mirror
//! itself never inspects breadcrumbs; it only stores and copies them.
//!
//! Breadcrumbs are plain values: cloning one produces a fully independent
//! copy, including its [`data`](Breadcrumb::data) map.
//!
//! [`BreadcrumbMirror`]: crate::BreadcrumbMirror

use alloc::string::String;
use core::fmt;

use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Free-form structured data attached to a breadcrumb.
///
/// Keys keep their insertion order, so data renders in the order the source
/// recorded it.
pub type BreadcrumbData = IndexMap<String, Value, FxBuildHasher>;

/// Severity of a breadcrumb.
///
/// Serialized in lowercase (`"debug"`, `"info"`, `"warning"`, `"error"`,
/// `"fatal"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    /// Fine-grained diagnostic detail.
    Debug,
    /// Routine events such as navigation or user actions.
    Info,
    /// Something unexpected that did not fail.
    Warning,
    /// A failed operation.
    Error,
    /// A failure the process cannot recover from.
    Fatal,
}

impl Level {
    /// Returns the lowercase name used in serialized breadcrumbs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Level::Debug => "debug",
            Level::Info => "info",
            Level::Warning => "warning",
            Level::Error => "error",
            Level::Fatal => "fatal",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single diagnostic event.
///
/// # Examples
///
/// ```
/// use crumbtrail::{Breadcrumb, Level};
///
/// let breadcrumb = Breadcrumb::new("Clicked button")
///     .with_level(Level::Info)
///     .with_category("ui.action")
///     .with_timestamp(1_710_000_000.0)
///     .with_data("route", "/project/_/dashboard");
///
/// assert_eq!(breadcrumb.to_string(), "[info] ui.action: Clicked button");
/// assert_eq!(breadcrumb.data["route"], "/project/_/dashboard");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Breadcrumb {
    /// Seconds since the Unix epoch at which the event was recorded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<f64>,
    /// Human-readable description of the event.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Severity of the event.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<Level>,
    /// Dotted category such as `ui.action` or `http`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Additional structured data.
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub data: BreadcrumbData,
}

impl Breadcrumb {
    /// Creates a breadcrumb carrying only a message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::default()
        }
    }

    /// Sets the severity.
    #[must_use]
    pub fn with_level(mut self, level: Level) -> Self {
        self.level = Some(level);
        self
    }

    /// Sets the category.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Sets the timestamp, in seconds since the Unix epoch.
    #[must_use]
    pub fn with_timestamp(mut self, timestamp: f64) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Sets the timestamp to the current wall-clock time.
    ///
    /// A clock set before the Unix epoch leaves the timestamp unset.
    #[cfg(feature = "std")]
    #[must_use]
    pub fn with_timestamp_now(mut self) -> Self {
        self.timestamp = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .ok()
            .map(|elapsed| elapsed.as_secs_f64());
        self
    }

    /// Adds one entry to the structured data, replacing any previous value for
    /// the same key.
    #[must_use]
    pub fn with_data(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }
}

impl fmt::Display for Breadcrumb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(level) = self.level {
            write!(f, "[{level}] ")?;
        }
        match (&self.category, &self.message) {
            (Some(category), Some(message)) => write!(f, "{category}: {message}"),
            (Some(category), None) => f.write_str(category),
            (None, Some(message)) => f.write_str(message),
            (None, None) => f.write_str("<empty breadcrumb>"),
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use serde_json::json;

    use super::*;

    #[test]
    fn test_display_variants() {
        assert_eq!(Breadcrumb::new("hello").to_string(), "hello");
        assert_eq!(
            Breadcrumb::default().with_category("http").to_string(),
            "http"
        );
        assert_eq!(
            Breadcrumb::new("boom")
                .with_level(Level::Error)
                .with_category("db")
                .to_string(),
            "[error] db: boom"
        );
        assert_eq!(Breadcrumb::default().to_string(), "<empty breadcrumb>");
    }

    #[test]
    fn test_serializes_like_a_telemetry_breadcrumb() {
        let breadcrumb = Breadcrumb::new("Clicked button")
            .with_level(Level::Warning)
            .with_category("ui.action")
            .with_timestamp(1_710_000_000.0)
            .with_data("route", "/project/_/dashboard")
            .with_data("attempt", 2);

        let value = serde_json::to_value(&breadcrumb).unwrap();
        assert_eq!(
            value,
            json!({
                "timestamp": 1_710_000_000.0,
                "message": "Clicked button",
                "level": "warning",
                "category": "ui.action",
                "data": { "route": "/project/_/dashboard", "attempt": 2 },
            })
        );
    }

    #[test]
    fn test_missing_fields_are_omitted_and_defaulted() {
        let breadcrumb = Breadcrumb::new("test");
        assert_eq!(
            serde_json::to_string(&breadcrumb).unwrap(),
            r#"{"message":"test"}"#
        );

        let parsed: Breadcrumb = serde_json::from_str(r#"{"message":"test"}"#).unwrap();
        assert_eq!(parsed, breadcrumb);
    }

    #[test]
    fn test_data_keeps_insertion_order() {
        let breadcrumb = Breadcrumb::new("ordered")
            .with_data("zeta", 1)
            .with_data("alpha", 2)
            .with_data("mid", 3);

        let keys: alloc::vec::Vec<&str> = breadcrumb.data.keys().map(String::as_str).collect();
        assert_eq!(keys, ["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_clones_are_independent() {
        let original = Breadcrumb::new("original").with_data("key", "value");
        let mut copy = original.clone();
        copy.data.insert("key".to_string(), json!("changed"));
        copy.message = None;

        assert_eq!(original.data["key"], "value");
        assert_eq!(original.message.as_deref(), Some("original"));
    }
}
