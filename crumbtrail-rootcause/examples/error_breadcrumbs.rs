//! Breadcrumbs from tracing events in rootcause error reports.
//!
//! Tracing events are mirrored into a bounded breadcrumb window. Right before
//! the failing request is reported, the window is captured; the report created
//! afterwards claims the capture and shows it.

use crumbtrail::{BreadcrumbMirror, MirrorConfig};
use crumbtrail_rootcause::SnapshotCollector;
use crumbtrail_tracing::BreadcrumbLayer;
use rootcause::{hooks::Hooks, prelude::*};
use tracing_subscriber::{Registry, layer::SubscriberExt};

#[derive(Debug, thiserror::Error)]
#[error("upstream timed out")]
struct TimeoutError;

#[derive(Debug, thiserror::Error)]
#[error("request failed")]
struct RequestError;

fn call_upstream(mirror: &BreadcrumbMirror) -> Result<(), Report<TimeoutError>> {
    tracing::warn!(target: "app::upstream", attempt = 3, "retry budget exhausted");
    // Capture now: the report assembled below claims this window.
    mirror.take_snapshot();
    Err(report!(TimeoutError))
}

#[tracing::instrument(skip(mirror))]
fn handle_request(mirror: &BreadcrumbMirror, path: &str) -> Result<(), Report<RequestError>> {
    tracing::info!(target: "app::http", path, "request received");
    call_upstream(mirror).context(RequestError)?;
    Ok(())
}

fn main() {
    let mirror = BreadcrumbMirror::new(MirrorConfig::from_env());

    let subscriber = Registry::default()
        .with(BreadcrumbLayer::new(mirror.clone()))
        .with(tracing_subscriber::fmt::layer());
    tracing::subscriber::set_global_default(subscriber).expect("failed to set default subscriber");

    Hooks::new()
        .report_creation_hook(SnapshotCollector::new(mirror.clone()))
        .install()
        .expect("failed to install hooks");

    for index in 0..3 {
        tracing::info!(target: "app::session", index, "heartbeat");
    }

    if let Err(report) = handle_request(&mirror, "/api/orders") {
        println!("{report}");
        println!();
        println!(
            "The mirror still holds {} breadcrumbs; {} were evicted.",
            mirror.len(),
            mirror.evicted_count()
        );
    }
}
