use accessly::consent::CONSENT_VERSION;
use accessly::prefs::CONSENT_FILE;
use accessly::{ConsentDecision, HostPage, MemoryPage, Surface, Widget, WidgetConfig};
use std::path::Path;
use tempfile::tempdir;

fn widget_with_store(dir: &Path) -> Widget {
    let config = WidgetConfig {
        site_id: Some("acme-prod-01".into()),
        storage_dir: Some(dir.to_path_buf()),
        ..WidgetConfig::default()
    };
    accessly::init(config, Box::new(MemoryPage::new()))
}

#[test]
fn fresh_load_shows_the_banner() {
    let dir = tempdir().unwrap();
    let widget = widget_with_store(dir.path());
    assert!(widget.is_open(Surface::ConsentBanner));
    assert!(widget.page().unwrap().surface_visible(Surface::ConsentBanner));
    assert!(widget.consent().is_none());
}

#[test]
fn decision_dismisses_banner_and_persists() {
    let dir = tempdir().unwrap();

    let mut widget = widget_with_store(dir.path());
    let record = widget.set_consent(ConsentDecision::Accepted).unwrap();
    assert_eq!(record.version, CONSENT_VERSION);
    assert!(!widget.is_open(Surface::ConsentBanner));
    assert!(!widget.page().unwrap().surface_visible(Surface::ConsentBanner));
    drop(widget);

    // Same store on the next page load: banner stays suppressed.
    let reloaded = widget_with_store(dir.path());
    assert!(!reloaded.is_open(Surface::ConsentBanner));
    assert_eq!(
        reloaded.consent().map(|r| r.decision),
        Some(ConsentDecision::Accepted)
    );
}

#[test]
fn rejection_also_suppresses_the_banner() {
    let dir = tempdir().unwrap();
    let mut widget = widget_with_store(dir.path());
    widget.set_consent(ConsentDecision::Rejected);
    drop(widget);

    let reloaded = widget_with_store(dir.path());
    assert!(!reloaded.is_open(Surface::ConsentBanner));
}

#[test]
fn version_mismatch_reopens_the_banner() {
    let dir = tempdir().unwrap();
    std::fs::write(
        dir.path().join(CONSENT_FILE),
        format!(
            r#"{{"decision":"accepted","timestamp":"2025-11-02T09:14:00+01:00","version":{}}}"#,
            CONSENT_VERSION - 1
        ),
    )
    .unwrap();

    let widget = widget_with_store(dir.path());
    assert!(widget.is_open(Surface::ConsentBanner));
    assert!(widget.consent().is_none());
}

#[test]
fn banner_can_be_reopened_by_the_host_page() {
    let dir = tempdir().unwrap();
    let mut widget = widget_with_store(dir.path());
    widget.set_consent(ConsentDecision::Partial);
    assert!(!widget.is_open(Surface::ConsentBanner));

    widget.show_banner();
    assert!(widget.is_open(Surface::ConsentBanner));
    // Re-opening the banner never clears the recorded decision.
    assert!(widget.consent().is_some());
}
