//! Widget initialization and the host-facing handle.
//!
//! A host page gets exactly one [`Widget`] per initialization: a narrow
//! capability surface over the single live controller. Initialization never
//! throws into host code: a missing or malformed site identifier produces a
//! disabled widget whose operations are inert no-ops.

use crate::consent::{ConsentDecision, ConsentRecord};
use crate::controller::WidgetController;
use crate::features::FeatureValue;
use crate::overlay::Surface;
use crate::page::{Heading, HostPage};
use crate::prefs::PreferenceStore;
use crate::report::ConsentReporter;
use crate::shortcut::{BindingStrings, KeyEvent, ShortcutHandler};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Instant;
use url::Url;

static SITE_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_-]{5,63}$").expect("site id pattern"));

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WidgetConfig {
    /// Site identifier the widget script was addressed with.
    pub site_id: Option<String>,
    /// Origin of the embedding page; scopes the preference store.
    pub origin: Option<String>,
    /// Optional consent-report endpoint.
    pub report_endpoint: Option<String>,
    /// Explicit store directory (tests, embedders with their own layout).
    #[serde(default)]
    pub storage_dir: Option<PathBuf>,
    #[serde(default)]
    pub debug_logging: bool,
    #[serde(default)]
    pub bindings: BindingStrings,
}

impl WidgetConfig {
    /// Extract configuration from the delivery URL of the widget script,
    /// e.g. `https://cdn.example.com/widget.js?site=acme-prod-01`.
    pub fn from_script_src(src: &str) -> Self {
        let parsed = Url::parse(src)
            .or_else(|_| Url::parse("https://localhost/").and_then(|base| base.join(src)));
        match parsed {
            Ok(url) => Self::from_query(url.query().unwrap_or_default()),
            Err(e) => {
                tracing::error!(src, error = %e, "unparseable widget script src");
                Self::default()
            }
        }
    }

    /// Extract configuration from a raw query/attribute string, e.g.
    /// `site=acme-prod-01&report=https%3A%2F%2Fapi.example.com%2Fconsent`.
    pub fn from_query(query: &str) -> Self {
        let mut config = Self::default();
        for pair in query.split('&').filter(|p| !p.is_empty()) {
            let (key, raw) = pair.split_once('=').unwrap_or((pair, ""));
            let value = match urlencoding::decode(raw) {
                Ok(v) => v.into_owned(),
                Err(e) => {
                    tracing::warn!(key, error = %e, "skipping undecodable parameter");
                    continue;
                }
            };
            match key {
                "site" => config.site_id = Some(value),
                "report" => config.report_endpoint = Some(value),
                "origin" => config.origin = Some(value),
                _ => {}
            }
        }
        config
    }

    fn valid_site_id(&self) -> Option<&str> {
        let id = self.site_id.as_deref()?;
        if SITE_ID.is_match(id) {
            Some(id)
        } else {
            tracing::error!(site = id, "site identifier rejected");
            None
        }
    }
}

/// The one namespaced object exposed to the host page.
pub struct Widget {
    controller: Option<WidgetController>,
}

/// Initialize the widget against a host page. Degrades to a disabled
/// instance (never panics, never throws into host code) when the site
/// identifier is missing or malformed.
pub fn init(config: WidgetConfig, page: Box<dyn HostPage>) -> Widget {
    crate::logging::init(config.debug_logging);

    let Some(site_id) = config.valid_site_id() else {
        tracing::error!("widget disabled: no valid site identifier");
        return Widget { controller: None };
    };

    let prefs = if let Some(dir) = &config.storage_dir {
        PreferenceStore::open(dir)
    } else if let Some(origin) = &config.origin {
        PreferenceStore::for_origin(origin)
    } else {
        tracing::debug!("no origin available; preferences are session-only");
        PreferenceStore::in_memory()
    };

    let reporter = config.report_endpoint.as_deref().and_then(|endpoint| {
        match Url::parse(endpoint) {
            Ok(url) => Some(ConsentReporter::new(url, site_id)),
            Err(e) => {
                tracing::warn!(endpoint, error = %e, "consent reporting disabled");
                None
            }
        }
    });

    let shortcuts = ShortcutHandler::from_strings(&config.bindings);
    let controller = WidgetController::new(prefs, shortcuts, page, reporter);
    tracing::info!(site = site_id, "widget initialized");
    Widget { controller: Some(controller) }
}

impl Widget {
    pub fn is_enabled(&self) -> bool {
        self.controller.is_some()
    }

    pub fn show_banner(&mut self) {
        if let Some(c) = &mut self.controller {
            c.show_banner();
        }
    }

    pub fn set_consent(&mut self, decision: ConsentDecision) -> Option<ConsentRecord> {
        self.controller.as_mut().map(|c| c.set_consent(decision))
    }

    pub fn consent(&self) -> Option<&ConsentRecord> {
        self.controller.as_ref().and_then(|c| c.consent())
    }

    pub fn get(&self, id: &str) -> Option<FeatureValue> {
        self.controller.as_ref().and_then(|c| c.get(id))
    }

    pub fn set_feature(&mut self, id: &str, value: FeatureValue) {
        if let Some(c) = &mut self.controller {
            c.set_feature(id, value);
        }
    }

    pub fn reset_all(&mut self) {
        if let Some(c) = &mut self.controller {
            c.reset_all();
        }
    }

    pub fn toggle_panel(&mut self) {
        self.toggle(Surface::Panel);
    }

    pub fn toggle(&mut self, surface: Surface) {
        if let Some(c) = &mut self.controller {
            c.toggle(surface);
        }
    }

    pub fn is_open(&self, surface: Surface) -> bool {
        self.controller
            .as_ref()
            .map(|c| c.is_open(surface))
            .unwrap_or(false)
    }

    /// Returns whether the widget consumed the key event.
    pub fn handle_key(&mut self, event: &KeyEvent) -> bool {
        match &mut self.controller {
            Some(c) => c.handle_key(event),
            None => false,
        }
    }

    pub fn pointer_moved(&mut self, y: f32) {
        if let Some(c) = &mut self.controller {
            c.pointer_moved(y);
        }
    }

    pub fn tick(&mut self, now: Instant) {
        if let Some(c) = &mut self.controller {
            c.tick(now);
        }
    }

    pub fn structure_outline(&self) -> Vec<Heading> {
        self.controller
            .as_ref()
            .map(|c| c.structure_outline())
            .unwrap_or_default()
    }

    /// Serialized page-wide effect expression currently applied.
    pub fn effect_css(&self) -> String {
        self.controller
            .as_ref()
            .map(|c| c.effect_expression().to_css())
            .unwrap_or_default()
    }

    /// Read access to the driven host page (diagnostics, tests).
    pub fn page(&self) -> Option<&dyn HostPage> {
        self.controller.as_ref().map(|c| c.page())
    }
}
