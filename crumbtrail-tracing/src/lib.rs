#![deny(
    missing_docs,
    unsafe_code,
    rustdoc::invalid_rust_codeblocks,
    rustdoc::broken_intra_doc_links,
    missing_copy_implementations,
    unused_doc_comments
)]

//! Tracing events as crumbtrail breadcrumbs.
//!
//! This crate turns a `tracing` subscriber into the event source of a
//! [`BreadcrumbMirror`]: every event that passes the layer's level filter is
//! converted into a [`Breadcrumb`] and pushed into the mirror.
//!
//! # How It Works
//!
//! You add [`BreadcrumbLayer`] to your tracing subscriber alongside your
//! existing layers (formatting, filtering, log forwarding, etc.). While your
//! other layers do their work, `BreadcrumbLayer` quietly records each event in
//! the mirror, which keeps only the most recent ones.
//!
//! | tracing                    | breadcrumb                    |
//! |----------------------------|-------------------------------|
//! | `message` field            | `message`                     |
//! | other fields               | `data`                        |
//! | target                     | `category`                    |
//! | `TRACE`, `DEBUG`           | [`Level::Debug`]              |
//! | `INFO`                     | [`Level::Info`]               |
//! | `WARN`                     | [`Level::Warning`]            |
//! | `ERROR`                    | [`Level::Error`]              |
//!
//! Events emitted by the crumbtrail crates themselves are never mirrored.
//!
//! # Quick Start
//!
//! ```
//! use crumbtrail::BreadcrumbMirror;
//! use crumbtrail_tracing::BreadcrumbLayer;
//! use tracing_subscriber::{Registry, layer::SubscriberExt};
//!
//! let mirror = BreadcrumbMirror::default();
//!
//! let subscriber = Registry::default()
//!     .with(BreadcrumbLayer::new(mirror.clone()))
//!     .with(tracing_subscriber::fmt::layer());
//!
//! tracing::subscriber::with_default(subscriber, || {
//!     tracing::info!(route = "/settings", "navigated");
//! });
//!
//! let breadcrumbs = mirror.read_mirror();
//! assert_eq!(breadcrumbs[0].message.as_deref(), Some("navigated"));
//! assert_eq!(breadcrumbs[0].data["route"], "/settings");
//! ```
//!
//! # Environment Variables
//!
//! - `CRUMBTRAIL_TRACING` - Comma-separated options:
//!   - `debug` - Also mirror `DEBUG` events
//!   - `trace` - Mirror events of every level

use std::{fmt, sync::OnceLock};

use crumbtrail::{Breadcrumb, BreadcrumbData, BreadcrumbMirror, Level};
use serde_json::Value;
use tracing::{
    Event, Subscriber,
    field::{Field, Visit},
};
use tracing_subscriber::layer::{Context, Layer};

/// A tracing layer that mirrors events into a [`BreadcrumbMirror`].
///
/// # Examples
///
/// ```
/// use crumbtrail::BreadcrumbMirror;
/// use crumbtrail_tracing::BreadcrumbLayer;
/// use tracing_subscriber::{Registry, layer::SubscriberExt};
///
/// let mirror = BreadcrumbMirror::default();
/// let subscriber = Registry::default()
///     .with(BreadcrumbLayer::new(mirror.clone()).with_min_level(tracing::Level::DEBUG));
///
/// tracing::subscriber::set_global_default(subscriber).expect("failed to set subscriber");
/// ```
#[derive(Clone, Debug)]
pub struct BreadcrumbLayer {
    mirror: BreadcrumbMirror,
    min_level: tracing::Level,
}

#[derive(Debug)]
struct CrumbtrailTracingEnvOptions {
    min_level: tracing::Level,
}

impl CrumbtrailTracingEnvOptions {
    fn get() -> &'static Self {
        static CRUMBTRAIL_TRACING_FLAGS: OnceLock<CrumbtrailTracingEnvOptions> = OnceLock::new();

        CRUMBTRAIL_TRACING_FLAGS.get_or_init(|| {
            let mut min_level = tracing::Level::INFO;

            if let Some(var) = std::env::var_os("CRUMBTRAIL_TRACING") {
                for v in var.to_string_lossy().split(',') {
                    let v = v.trim();
                    if v.eq_ignore_ascii_case("trace") {
                        min_level = tracing::Level::TRACE;
                    } else if v.eq_ignore_ascii_case("debug") && min_level < tracing::Level::DEBUG
                    {
                        min_level = tracing::Level::DEBUG;
                    }
                }
            }

            CrumbtrailTracingEnvOptions { min_level }
        })
    }
}

impl BreadcrumbLayer {
    /// Creates a layer that pushes into `mirror`.
    ///
    /// Events at `INFO` and above are mirrored unless `CRUMBTRAIL_TRACING`
    /// says otherwise.
    pub fn new(mirror: BreadcrumbMirror) -> Self {
        Self {
            mirror,
            min_level: CrumbtrailTracingEnvOptions::get().min_level,
        }
    }

    /// Sets the most verbose level that is still mirrored.
    #[must_use]
    pub fn with_min_level(mut self, level: tracing::Level) -> Self {
        self.min_level = level;
        self
    }

    /// Returns the mirror this layer pushes into.
    pub fn mirror(&self) -> &BreadcrumbMirror {
        &self.mirror
    }
}

/// Returns `true` for targets belonging to the crumbtrail crates, whose own
/// diagnostics must not feed back into the mirror.
fn is_own_target(target: &str) -> bool {
    let root = target.split("::").next().unwrap_or(target);
    matches!(
        root,
        "crumbtrail" | "crumbtrail_internals" | "crumbtrail_tracing" | "crumbtrail_rootcause"
    )
}

fn breadcrumb_level(level: tracing::Level) -> Level {
    match level {
        tracing::Level::ERROR => Level::Error,
        tracing::Level::WARN => Level::Warning,
        tracing::Level::INFO => Level::Info,
        _ => Level::Debug,
    }
}

/// Collects the fields of an event into a message and structured data.
#[derive(Default)]
struct BreadcrumbVisitor {
    message: Option<String>,
    data: BreadcrumbData,
}

impl BreadcrumbVisitor {
    fn record_value(&mut self, field: &Field, value: Value) {
        if field.name() == "message" {
            self.message = Some(match value {
                Value::String(message) => message,
                other => other.to_string(),
            });
        } else {
            self.data.insert(field.name().to_owned(), value);
        }
    }
}

impl Visit for BreadcrumbVisitor {
    fn record_f64(&mut self, field: &Field, value: f64) {
        self.record_value(field, Value::from(value));
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.record_value(field, Value::from(value));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.record_value(field, Value::from(value));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.record_value(field, Value::from(value));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.record_value(field, Value::from(value));
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.record_value(field, Value::String(format!("{value:?}")));
    }
}

impl<S> Layer<S> for BreadcrumbLayer
where
    S: Subscriber,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        if *metadata.level() > self.min_level || is_own_target(metadata.target()) {
            return;
        }

        let mut visitor = BreadcrumbVisitor::default();
        event.record(&mut visitor);

        let mut breadcrumb = Breadcrumb::default()
            .with_timestamp_now()
            .with_level(breadcrumb_level(*metadata.level()))
            .with_category(metadata.target());
        breadcrumb.message = visitor.message;
        breadcrumb.data = visitor.data;

        self.mirror.mirror_push(breadcrumb);
    }
}
