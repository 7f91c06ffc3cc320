//! Installs [`SnapshotCollector`] as a global hook. Hooks can only be
//! installed once per process, so everything lives in a single test.

use crumbtrail::{Breadcrumb, BreadcrumbMirror, Level};
use crumbtrail_rootcause::SnapshotCollector;
use rootcause::{Report, hooks::Hooks, prelude::ResultExt, report};

#[derive(Debug, thiserror::Error)]
#[error("payment declined")]
struct PaymentError;

#[derive(Debug, thiserror::Error)]
#[error("checkout failed")]
struct CheckoutError;

fn charge() -> Result<(), Report<PaymentError>> {
    Err(report!(PaymentError))
}

#[test]
fn test_snapshot_attached_to_first_report_only() {
    let mirror = BreadcrumbMirror::with_capacity(3).unwrap();

    Hooks::new()
        .report_creation_hook(SnapshotCollector::new(mirror.clone()))
        .install()
        .expect("failed to install hooks");

    mirror.mirror_push(Breadcrumb::new("Opened cart").with_category("navigation"));
    let before = report!("no snapshot yet");
    assert!(!before.to_string().contains("Breadcrumbs:"));

    mirror.mirror_push(
        Breadcrumb::new("Pressed pay")
            .with_category("ui.action")
            .with_level(Level::Info),
    );
    mirror.take_snapshot();
    mirror.mirror_push(Breadcrumb::new("Request sent").with_category("http"));

    let report = charge().context(CheckoutError).unwrap_err();
    let output = report.to_string();

    assert!(output.contains("checkout failed"));
    assert!(output.contains("payment declined"));
    assert_eq!(output.matches("Breadcrumbs:").count(), 1);
    assert!(output.contains("navigation: Opened cart"));
    assert!(output.contains("[info] ui.action: Pressed pay"));
    assert!(!output.contains("Request sent"));
    assert!(!mirror.has_pending_snapshot());

    let after = report!("snapshot already claimed");
    assert!(!after.to_string().contains("Breadcrumbs:"));
}
