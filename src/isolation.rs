//! Widget chrome isolation.
//!
//! The widget applies page-wide visual transforms, and its own controls
//! must stay exempt from them: high-contrast mode must not also mute the
//! panel that controls it. Cancelling the widget's feature values to
//! neutral is not enough (the chrome would still inherit whatever the page
//! expression is), so the guard asserts a dedicated paint boundary on the
//! widget root and pins its own filter empty.

use crate::page::HostPage;

/// Assert the widget root's isolated paint boundary. Idempotent; the
/// controller re-asserts it on every render so a host stylesheet that
/// restyles the root cannot permanently defeat it.
pub fn protect(page: &mut dyn HostPage) {
    if !page.widget_root_isolated() {
        tracing::debug!("asserting widget root paint isolation");
    }
    page.isolate_widget_root();
    page.set_widget_root_filter("");
}

/// Whether the widget chrome is currently exempt from page-wide effects.
pub fn is_protected(page: &dyn HostPage) -> bool {
    page.widget_root_isolated() && page.widget_root_filter().is_empty()
}
