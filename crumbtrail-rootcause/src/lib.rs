#![deny(
    missing_docs,
    unsafe_code,
    rustdoc::invalid_rust_codeblocks,
    rustdoc::broken_intra_doc_links,
    missing_copy_implementations,
    unused_doc_comments
)]

//! Breadcrumb snapshots for rootcause error reports.
//!
//! This crate is the consuming side of the crumbtrail snapshot protocol. One
//! call site decides that the current breadcrumb window matters and calls
//! [`BreadcrumbMirror::take_snapshot`]; when the next error report is created,
//! the snapshot is claimed and attached to it. Each snapshot ends up in at most
//! one report, and a report created while no snapshot is pending simply gets no
//! breadcrumbs.
//!
//! # Quick Start
//!
//! ```
//! use crumbtrail::{Breadcrumb, BreadcrumbMirror};
//! use crumbtrail_rootcause::SnapshotCollector;
//! use rootcause::hooks::Hooks;
//!
//! let mirror = BreadcrumbMirror::default();
//!
//! // Attach the pending snapshot (if any) to every report that gets created
//! Hooks::new()
//!     .report_creation_hook(SnapshotCollector::new(mirror.clone()))
//!     .install()
//!     .expect("failed to install hooks");
//!
//! mirror.mirror_push(Breadcrumb::new("Opened settings").with_category("navigation"));
//! mirror.take_snapshot();
//!
//! let report = rootcause::report!("failed to save settings");
//! println!("{report}");
//! ```
//!
//! Output:
//! ```text
//!  ● failed to save settings
//!  ├ src/main.rs:14
//!  ╰ Breadcrumbs:
//!    │ navigation: Opened settings
//!    ╰─
//! ```
//!
//! ## Manual Attachment
//!
//! To claim the snapshot at an explicit call site instead of on every report
//! creation:
//!
//! ```
//! use crumbtrail::{Breadcrumb, BreadcrumbMirror};
//! use crumbtrail_rootcause::BreadcrumbsExt;
//! use rootcause::{Report, report};
//!
//! fn operation() -> Result<(), Report> {
//!     Err(report!("operation failed"))
//! }
//!
//! let mirror = BreadcrumbMirror::default();
//! mirror.mirror_push(Breadcrumb::new("Started operation"));
//! mirror.take_snapshot();
//!
//! let result = operation().attach_breadcrumbs(&mirror);
//! assert!(result.is_err());
//! assert!(!mirror.has_pending_snapshot());
//! ```
//!
//! # Environment Variables
//!
//! - `CRUMBTRAIL_ROOTCAUSE` - Comma-separated options:
//!   - `leafs` - Only claim snapshots for leaf reports (reports without
//!     children)

use std::{fmt, sync::OnceLock};

use crumbtrail::{Breadcrumb, BreadcrumbMirror};
use rootcause::{
    Report, ReportMut,
    handlers::{
        AttachmentFormattingPlacement, AttachmentFormattingStyle, AttachmentHandler,
        FormattingFunction,
    },
    hooks::report_creation::ReportCreationHook,
    markers::{self, Dynamic, ObjectMarkerFor},
    report_attachment::ReportAttachment,
};

/// A claimed breadcrumb snapshot, oldest first, as attached to a report.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Breadcrumbs(pub Vec<Breadcrumb>);

impl fmt::Display for Breadcrumbs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, breadcrumb) in self.0.iter().enumerate() {
            if index > 0 {
                writeln!(f)?;
            }
            write!(f, "{breadcrumb}")?;
        }
        Ok(())
    }
}

impl From<Vec<Breadcrumb>> for Breadcrumbs {
    fn from(breadcrumbs: Vec<Breadcrumb>) -> Self {
        Self(breadcrumbs)
    }
}

/// Handler for formatting [`Breadcrumbs`] attachments.
#[derive(Copy, Clone)]
pub struct BreadcrumbsHandler;

impl AttachmentHandler<Breadcrumbs> for BreadcrumbsHandler {
    fn display(value: &Breadcrumbs, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(value, f)
    }

    fn debug(value: &Breadcrumbs, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(value, f)
    }

    fn preferred_formatting_style(
        value: &Breadcrumbs,
        _report_formatting_function: FormattingFunction,
    ) -> AttachmentFormattingStyle {
        AttachmentFormattingStyle {
            placement: if value.0.is_empty() {
                AttachmentFormattingPlacement::Hidden
            } else {
                AttachmentFormattingPlacement::InlineWithHeader {
                    header: "Breadcrumbs:".into(),
                }
            },
            priority: 8, // Below backtraces (10) and tracing spans (9)
            ..Default::default()
        }
    }
}

/// Report creation hook that claims the pending snapshot of a mirror.
///
/// Every time a report is created, the hook claims the mirror's pending
/// snapshot and attaches it as a [`Breadcrumbs`] attachment. Claiming empties
/// the mirror's snapshot slot, so only the first report created after
/// [`BreadcrumbMirror::take_snapshot`] receives the breadcrumbs.
///
/// # Examples
///
/// ```
/// use crumbtrail::BreadcrumbMirror;
/// use crumbtrail_rootcause::SnapshotCollector;
/// use rootcause::hooks::Hooks;
///
/// let mirror = BreadcrumbMirror::default();
///
/// // Only the report closest to the failure receives the breadcrumbs
/// let mut collector = SnapshotCollector::new(mirror);
/// collector.capture_for_reports_with_children = false;
///
/// let hooks = Hooks::new().report_creation_hook(collector);
/// # drop(hooks);
/// ```
#[derive(Clone, Debug)]
pub struct SnapshotCollector {
    mirror: BreadcrumbMirror,
    /// Whether reports that already have children may claim the snapshot.
    ///
    /// When `false`, only leaf reports claim it, which leaves the snapshot on
    /// the report closest to the original failure.
    pub capture_for_reports_with_children: bool,
}

#[derive(Debug)]
struct CrumbtrailRootcauseEnvOptions {
    leafs_only: bool,
}

impl CrumbtrailRootcauseEnvOptions {
    fn get() -> &'static Self {
        static CRUMBTRAIL_ROOTCAUSE_FLAGS: OnceLock<CrumbtrailRootcauseEnvOptions> =
            OnceLock::new();

        CRUMBTRAIL_ROOTCAUSE_FLAGS.get_or_init(|| {
            let mut leafs_only = false;

            if let Some(var) = std::env::var_os("CRUMBTRAIL_ROOTCAUSE") {
                for v in var.to_string_lossy().split(',') {
                    if v.trim().eq_ignore_ascii_case("leafs") {
                        leafs_only = true;
                    }
                }
            }

            CrumbtrailRootcauseEnvOptions { leafs_only }
        })
    }
}

impl SnapshotCollector {
    /// Creates a collector that claims snapshots from `mirror`.
    ///
    /// Configuration is controlled by the `CRUMBTRAIL_ROOTCAUSE` environment
    /// variable.
    pub fn new(mirror: BreadcrumbMirror) -> Self {
        let env_options = CrumbtrailRootcauseEnvOptions::get();

        Self {
            mirror,
            capture_for_reports_with_children: !env_options.leafs_only,
        }
    }

    /// Returns the mirror this collector claims from.
    pub fn mirror(&self) -> &BreadcrumbMirror {
        &self.mirror
    }

    fn claim(&self, is_leaf: bool) -> Option<Breadcrumbs> {
        if !(self.capture_for_reports_with_children || is_leaf) {
            return None;
        }
        claim_non_empty(&self.mirror)
    }
}

/// Claims the pending snapshot, treating an empty one like a missing one.
fn claim_non_empty(mirror: &BreadcrumbMirror) -> Option<Breadcrumbs> {
    let breadcrumbs = mirror.claim_snapshot().filter(|snapshot| !snapshot.is_empty())?;
    tracing::debug!(
        breadcrumbs = breadcrumbs.len(),
        "attaching breadcrumb snapshot to report"
    );
    Some(Breadcrumbs(breadcrumbs))
}

impl ReportCreationHook for SnapshotCollector {
    fn on_local_creation(&self, mut report: ReportMut<'_, Dynamic, markers::Local>) {
        if let Some(breadcrumbs) = self.claim(report.children().is_empty()) {
            let attachment = ReportAttachment::new_custom::<BreadcrumbsHandler>(breadcrumbs);
            report.attachments_mut().push(attachment.into_dynamic());
        }
    }

    fn on_sendsync_creation(&self, mut report: ReportMut<'_, Dynamic, markers::SendSync>) {
        if let Some(breadcrumbs) = self.claim(report.children().is_empty()) {
            let attachment = ReportAttachment::new_custom::<BreadcrumbsHandler>(breadcrumbs);
            report.attachments_mut().push(attachment.into_dynamic());
        }
    }
}

/// Extension trait for claiming a snapshot into a report.
///
/// # Examples
///
/// ```
/// use crumbtrail::{Breadcrumb, BreadcrumbMirror};
/// use crumbtrail_rootcause::BreadcrumbsExt;
/// use rootcause::report;
///
/// let mirror = BreadcrumbMirror::default();
/// mirror.mirror_push(Breadcrumb::new("Loaded page"));
/// mirror.take_snapshot();
///
/// let report = report!("render failed").attach_breadcrumbs(&mirror);
/// assert!(report.to_string().contains("Loaded page"));
/// ```
pub trait BreadcrumbsExt: Sized {
    /// Claims the pending snapshot of `mirror` and attaches it, if there is
    /// one.
    fn attach_breadcrumbs(self, mirror: &BreadcrumbMirror) -> Self;
}

impl<C: ?Sized, T> BreadcrumbsExt for Report<C, markers::Mutable, T>
where
    Breadcrumbs: ObjectMarkerFor<T>,
{
    fn attach_breadcrumbs(mut self, mirror: &BreadcrumbMirror) -> Self {
        if let Some(breadcrumbs) = claim_non_empty(mirror) {
            self = self.attach_custom::<BreadcrumbsHandler, _>(breadcrumbs);
        }
        self
    }
}

impl<C: ?Sized, V, T> BreadcrumbsExt for Result<V, Report<C, markers::Mutable, T>>
where
    Breadcrumbs: ObjectMarkerFor<T>,
{
    fn attach_breadcrumbs(self, mirror: &BreadcrumbMirror) -> Self {
        match self {
            Ok(v) => Ok(v),
            Err(report) => Err(report.attach_breadcrumbs(mirror)),
        }
    }
}
