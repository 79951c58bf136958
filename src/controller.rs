//! Orchestration root.
//!
//! Every input path (pointer, keyboard or programmatic API) funnels into a
//! controller method, which mutates the preference store and then runs a
//! single full re-render. A render always replaces the previous output
//! (page filter, root attributes, surface visibility) instead of appending
//! to it, so applying the same state twice is byte-identical.

use crate::consent::{ConsentDecision, ConsentRecord};
use crate::features::{self, Channel, FeatureValue};
use crate::filter::{self, EffectExpression};
use crate::isolation;
use crate::overlay::{OverlayManager, Surface};
use crate::page::{Heading, HostPage};
use crate::prefs::PreferenceStore;
use crate::report::ConsentReporter;
use crate::shortcut::{KeyEvent, ShortcutAction, ShortcutHandler};
use std::time::{Duration, Instant};

/// How long the keyboard-shortcut guide stays up before dismissing itself.
pub const SHORTCUT_GUIDE_TTL: Duration = Duration::from_secs(12);

pub struct WidgetController {
    prefs: PreferenceStore,
    overlays: OverlayManager,
    shortcuts: ShortcutHandler,
    page: Box<dyn HostPage>,
    reporter: Option<ConsentReporter>,
    panel_focus: usize,
}

impl WidgetController {
    /// Wire up the engine against a host page: assert chrome isolation,
    /// decide banner visibility from the stored consent, and render the
    /// persisted state.
    pub fn new(
        prefs: PreferenceStore,
        shortcuts: ShortcutHandler,
        page: Box<dyn HostPage>,
        reporter: Option<ConsentReporter>,
    ) -> Self {
        let mut controller = Self {
            prefs,
            overlays: OverlayManager::new(),
            shortcuts,
            page,
            reporter,
            panel_focus: 0,
        };
        if controller.prefs.consent().is_none() {
            controller.overlays.open(Surface::ConsentBanner);
        }
        controller.render();
        controller
    }

    pub fn get(&self, id: &str) -> Option<FeatureValue> {
        self.prefs.get(id)
    }

    pub fn set_feature(&mut self, id: &str, value: FeatureValue) {
        self.prefs.set(id, value);
        self.render();
    }

    pub fn reset_all(&mut self) {
        self.prefs.reset_all();
        self.render();
    }

    pub fn is_open(&self, surface: Surface) -> bool {
        self.overlays.is_open(surface)
    }

    pub fn open(&mut self, surface: Surface) {
        if surface == Surface::ShortcutGuide {
            self.overlays
                .open_with_auto_dismiss(surface, SHORTCUT_GUIDE_TTL, Instant::now());
        } else {
            self.overlays.open(surface);
        }
        self.render();
    }

    pub fn close(&mut self, surface: Surface) {
        self.overlays.close(surface);
        self.render();
    }

    pub fn toggle(&mut self, surface: Surface) {
        if self.overlays.is_open(surface) {
            self.close(surface);
        } else {
            self.open(surface);
        }
    }

    /// Handle a key press. Returns whether the widget consumed the event;
    /// unconsumed events belong to the host page.
    pub fn handle_key(&mut self, event: &KeyEvent) -> bool {
        let overlay_open = self.overlays.active().is_some();
        let Some(action) = self.shortcuts.handle_key(event, overlay_open) else {
            return false;
        };
        match action {
            ShortcutAction::TogglePanel => self.toggle(Surface::Panel),
            ShortcutAction::ToggleShortcutGuide => self.toggle(Surface::ShortcutGuide),
            ShortcutAction::ToggleReadingGuide => self.toggle(Surface::ReadingGuide),
            ShortcutAction::ToggleStructureMap => self.toggle(Surface::StructureMap),
            ShortcutAction::CloseActiveOverlay => {
                self.overlays.close_active();
                self.render();
            }
            ShortcutAction::CycleFocus => {
                self.panel_focus = (self.panel_focus + 1) % features::REGISTRY.len();
            }
        }
        true
    }

    /// Index of the panel control that currently holds widget focus.
    pub fn focused_control(&self) -> usize {
        self.panel_focus
    }

    /// Record an explicit consent decision: persist, dismiss the banner and
    /// fire the optional report. Reporting failures never block dismissal.
    pub fn set_consent(&mut self, decision: ConsentDecision) -> ConsentRecord {
        let record = self.prefs.set_consent(decision);
        self.overlays.close(Surface::ConsentBanner);
        if let Some(reporter) = &self.reporter {
            reporter.report(&record);
        }
        self.render();
        record
    }

    pub fn consent(&self) -> Option<&ConsentRecord> {
        self.prefs.consent()
    }

    /// Re-open the consent banner, e.g. from the host page's "privacy
    /// settings" link.
    pub fn show_banner(&mut self) {
        self.overlays.open(Surface::ConsentBanner);
        self.render();
    }

    /// Pointer movement drives the reading guide while it is visible.
    pub fn pointer_moved(&mut self, y: f32) {
        if self.overlays.is_open(Surface::ReadingGuide) {
            self.page.move_reading_guide(y);
        }
    }

    /// Advance cooperative timers (shortcut-guide auto-dismiss).
    pub fn tick(&mut self, now: Instant) {
        if self.overlays.tick(now).is_some() {
            self.render();
        }
    }

    /// Host page outline backing the structure-map surface.
    pub fn structure_outline(&self) -> Vec<Heading> {
        self.page.headings()
    }

    /// The currently composed page-wide effect expression.
    pub fn effect_expression(&self) -> EffectExpression {
        filter::compose(self.prefs.features())
    }

    pub fn page(&self) -> &dyn HostPage {
        self.page.as_ref()
    }

    fn render(&mut self) {
        let css = self.effect_expression().to_css();
        self.page.set_page_filter(&css);

        for spec in features::REGISTRY {
            if spec.channel != Channel::Attribute {
                continue;
            }
            let value = self
                .prefs
                .get(spec.id)
                .unwrap_or_else(|| features::default_value(spec));
            let attr = attribute_name(spec.id);
            if value == features::default_value(spec) {
                self.page.set_root_attribute(&attr, None);
            } else {
                self.page
                    .set_root_attribute(&attr, Some(&attribute_value(&value)));
            }
        }

        for surface in Surface::ALL {
            self.page
                .set_surface_visible(surface, self.overlays.is_open(surface));
        }

        // Re-asserted every pass: host stylesheets may try to restyle the
        // widget root between renders.
        isolation::protect(self.page.as_mut());
    }
}

fn attribute_name(id: features::FeatureId) -> String {
    format!("data-accessly-{}", id.replace('_', "-"))
}

fn attribute_value(value: &FeatureValue) -> String {
    match value {
        FeatureValue::Bool(b) => b.to_string(),
        FeatureValue::Percent(v) => v.to_string(),
        FeatureValue::Mode(m) => m.clone(),
    }
}
