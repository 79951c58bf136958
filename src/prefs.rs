//! Durable preference and consent storage.
//!
//! Two logical documents are kept per origin: the feature preferences and
//! the consent record. Only departures from a feature's default are ever
//! written, so an absent entry (or an absent file) always behaves as the
//! default. Every storage failure degrades to in-memory state for the
//! session: toggles keep working, they just do not survive a reload.

use crate::consent::{ConsentDecision, ConsentRecord};
use crate::features::{self, FeatureState, FeatureValue};
use std::path::{Path, PathBuf};

pub const PREFS_FILE: &str = "preferences.json";
pub const CONSENT_FILE: &str = "consent.json";

pub struct PreferenceStore {
    state: FeatureState,
    consent: Option<ConsentRecord>,
    /// `None` means storage is unavailable and the store is session-only.
    dir: Option<PathBuf>,
}

impl PreferenceStore {
    /// Session-only store with no persistence.
    pub fn in_memory() -> Self {
        Self { state: FeatureState::new(), consent: None, dir: None }
    }

    /// Open (or create) the store rooted at `dir`. Unreadable or malformed
    /// files fall back to defaults; the path is kept so later writes can
    /// still succeed.
    pub fn open(dir: &Path) -> Self {
        let state = match load_prefs(&dir.join(PREFS_FILE)) {
            Ok(state) => state,
            Err(e) => {
                tracing::warn!(dir = %dir.display(), error = %e, "preferences unreadable; using defaults");
                FeatureState::new()
            }
        };
        let consent = match load_consent(&dir.join(CONSENT_FILE)) {
            Ok(consent) => consent,
            Err(e) => {
                tracing::warn!(dir = %dir.display(), error = %e, "consent record unreadable; treating as absent");
                None
            }
        };
        Self { state, consent, dir: Some(dir.to_path_buf()) }
    }

    /// Store scoped to a browser origin, rooted under the platform data
    /// directory. Falls back to a session-only store when no data directory
    /// can be resolved.
    pub fn for_origin(origin: &str) -> Self {
        match dirs_next::data_dir() {
            Some(base) => {
                let dir = base.join("accessly").join(slug::slugify(origin));
                Self::open(&dir)
            }
            None => {
                tracing::warn!(origin, "no data directory; preferences are session-only");
                Self::in_memory()
            }
        }
    }

    /// Current value of a feature, or its declared default when unset.
    /// Unknown ids return `None`.
    pub fn get(&self, id: &str) -> Option<FeatureValue> {
        let spec = features::spec(id)?;
        Some(
            self.state
                .get(id)
                .cloned()
                .unwrap_or_else(|| features::default_value(spec)),
        )
    }

    /// Set a feature value. Out-of-range values clamp rather than reject;
    /// setting a feature back to its default removes the stored entry.
    /// Unknown ids are ignored with a log line.
    pub fn set(&mut self, id: &str, value: FeatureValue) {
        let Some(spec) = features::spec(id) else {
            tracing::warn!(feature = id, "ignoring unknown feature id");
            return;
        };
        let value = features::clamp(spec, value);
        if value == features::default_value(spec) {
            self.state.remove(id);
        } else {
            self.state.insert(id.to_string(), value);
        }
        self.persist_prefs();
    }

    /// Restore every feature to its default.
    pub fn reset_all(&mut self) {
        self.state.clear();
        self.persist_prefs();
    }

    /// View of the stored departures from default.
    pub fn features(&self) -> &FeatureState {
        &self.state
    }

    /// The persisted consent record, if a current-version one exists.
    pub fn consent(&self) -> Option<&ConsentRecord> {
        self.consent.as_ref()
    }

    /// Record an explicit consent decision and persist it.
    pub fn set_consent(&mut self, decision: ConsentDecision) -> ConsentRecord {
        let record = ConsentRecord::new(decision);
        self.consent = Some(record.clone());
        if let Some(dir) = &self.dir {
            write_json(&dir.join(CONSENT_FILE), &record);
        }
        record
    }

    fn persist_prefs(&self) {
        if let Some(dir) = &self.dir {
            write_json(&dir.join(PREFS_FILE), &self.state);
        }
    }
}

fn load_prefs(path: &Path) -> anyhow::Result<FeatureState> {
    let content = std::fs::read_to_string(path).unwrap_or_default();
    if content.is_empty() {
        return Ok(FeatureState::new());
    }
    let raw: FeatureState = serde_json::from_str(&content)?;
    // Re-validate on the way in: entries written by an older widget version
    // may be out of range or reference features that no longer exist.
    let mut state = FeatureState::new();
    for (id, value) in raw {
        let Some(spec) = features::spec(&id) else {
            tracing::warn!(feature = %id, "dropping stored preference for unknown feature");
            continue;
        };
        let value = features::clamp(spec, value);
        if value != features::default_value(spec) {
            state.insert(id, value);
        }
    }
    Ok(state)
}

fn load_consent(path: &Path) -> anyhow::Result<Option<ConsentRecord>> {
    let content = std::fs::read_to_string(path).unwrap_or_default();
    if content.is_empty() {
        return Ok(None);
    }
    let record: ConsentRecord = serde_json::from_str(&content)?;
    if !record.is_current() {
        tracing::info!(
            stored = record.version,
            current = crate::consent::CONSENT_VERSION,
            "consent schema changed; decision must be asked again"
        );
        return Ok(None);
    }
    Ok(Some(record))
}

/// Best-effort pretty-printed JSON write; failures are logged, never raised.
fn write_json<T: serde::Serialize>(path: &Path, value: &T) {
    let json = match serde_json::to_string_pretty(value) {
        Ok(json) => json,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "failed to serialize store document");
            return;
        }
    };
    if let Some(parent) = path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    if let Err(e) = std::fs::write(path, json) {
        tracing::warn!(path = %path.display(), error = %e, "failed to persist store document; state is session-only");
    }
}
