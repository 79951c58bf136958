use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Stable identifier of a togglable accessibility feature.
pub type FeatureId = &'static str;

pub const BRIGHTNESS: FeatureId = "brightness";
pub const CONTRAST: FeatureId = "contrast";
pub const SATURATION: FeatureId = "saturation";
pub const GRAYSCALE: FeatureId = "grayscale";
pub const INVERT_COLORS: FeatureId = "invert_colors";
pub const HIGH_CONTRAST: FeatureId = "high_contrast";
pub const COLOR_PROFILE: FeatureId = "color_profile";
pub const FONT_SCALE: FeatureId = "font_scale";
pub const REDUCE_MOTION: FeatureId = "reduce_motion";
pub const HIDE_IMAGES: FeatureId = "hide_images";
pub const HIGHLIGHT_LINKS: FeatureId = "highlight_links";
pub const READABLE_FONT: FeatureId = "readable_font";
pub const CURSOR: FeatureId = "cursor";

pub const PROFILE_NORMAL: &str = "normal";
pub const PROFILE_PROTANOPIA: &str = "protanopia";
pub const PROFILE_DEUTERANOPIA: &str = "deuteranopia";
pub const PROFILE_TRITANOPIA: &str = "tritanopia";

pub const CURSOR_NORMAL: &str = "normal";
pub const CURSOR_LARGE: &str = "large";
pub const CURSOR_EXTRA_LARGE: &str = "extra-large";

/// Current value of a feature. The JSON form mirrors the variant payload
/// directly, so stored preferences read as `{"brightness": 150,
/// "grayscale": true, "cursor": "large"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeatureValue {
    Bool(bool),
    Percent(u16),
    Mode(String),
}

/// Value space of a feature. Percents carry their valid range and the
/// neutral default; modes carry the allowed variants.
#[derive(Debug, Clone, Copy)]
pub enum FeatureKind {
    Bool {
        default: bool,
    },
    Percent {
        min: u16,
        max: u16,
        default: u16,
    },
    Mode {
        variants: &'static [&'static str],
        default: &'static str,
    },
}

/// How a feature reaches the host page once it departs from its default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    /// Contributes a term to the composed page-wide filter expression.
    Filter,
    /// Rendered as a `data-accessly-*` attribute on the page root.
    Attribute,
}

#[derive(Debug, Clone, Copy)]
pub struct FeatureSpec {
    pub id: FeatureId,
    pub kind: FeatureKind,
    pub channel: Channel,
}

/// Every feature the engine knows about. Declaration order is the canonical
/// compose order for filter terms; changing it changes the serialized
/// expression, so additions go at the end of their channel group.
pub static REGISTRY: &[FeatureSpec] = &[
    FeatureSpec {
        id: BRIGHTNESS,
        kind: FeatureKind::Percent { min: 50, max: 200, default: 100 },
        channel: Channel::Filter,
    },
    FeatureSpec {
        id: CONTRAST,
        kind: FeatureKind::Percent { min: 50, max: 200, default: 100 },
        channel: Channel::Filter,
    },
    FeatureSpec {
        id: SATURATION,
        kind: FeatureKind::Percent { min: 0, max: 200, default: 100 },
        channel: Channel::Filter,
    },
    FeatureSpec {
        id: GRAYSCALE,
        kind: FeatureKind::Bool { default: false },
        channel: Channel::Filter,
    },
    FeatureSpec {
        id: INVERT_COLORS,
        kind: FeatureKind::Bool { default: false },
        channel: Channel::Filter,
    },
    FeatureSpec {
        id: HIGH_CONTRAST,
        kind: FeatureKind::Bool { default: false },
        channel: Channel::Filter,
    },
    FeatureSpec {
        id: COLOR_PROFILE,
        kind: FeatureKind::Mode {
            variants: &[
                PROFILE_NORMAL,
                PROFILE_PROTANOPIA,
                PROFILE_DEUTERANOPIA,
                PROFILE_TRITANOPIA,
            ],
            default: PROFILE_NORMAL,
        },
        channel: Channel::Filter,
    },
    FeatureSpec {
        id: FONT_SCALE,
        kind: FeatureKind::Percent { min: 75, max: 200, default: 100 },
        channel: Channel::Attribute,
    },
    FeatureSpec {
        id: REDUCE_MOTION,
        kind: FeatureKind::Bool { default: false },
        channel: Channel::Attribute,
    },
    FeatureSpec {
        id: HIDE_IMAGES,
        kind: FeatureKind::Bool { default: false },
        channel: Channel::Attribute,
    },
    FeatureSpec {
        id: HIGHLIGHT_LINKS,
        kind: FeatureKind::Bool { default: false },
        channel: Channel::Attribute,
    },
    FeatureSpec {
        id: READABLE_FONT,
        kind: FeatureKind::Bool { default: false },
        channel: Channel::Attribute,
    },
    FeatureSpec {
        id: CURSOR,
        kind: FeatureKind::Mode {
            variants: &[CURSOR_NORMAL, CURSOR_LARGE, CURSOR_EXTRA_LARGE],
            default: CURSOR_NORMAL,
        },
        channel: Channel::Attribute,
    },
];

static INDEX: Lazy<HashMap<&'static str, &'static FeatureSpec>> =
    Lazy::new(|| REGISTRY.iter().map(|s| (s.id, s)).collect());

/// Look up a feature spec by id.
pub fn spec(id: &str) -> Option<&'static FeatureSpec> {
    INDEX.get(id).copied()
}

/// The declared default value of a feature.
pub fn default_value(spec: &FeatureSpec) -> FeatureValue {
    match spec.kind {
        FeatureKind::Bool { default } => FeatureValue::Bool(default),
        FeatureKind::Percent { default, .. } => FeatureValue::Percent(default),
        FeatureKind::Mode { default, .. } => FeatureValue::Mode(default.to_string()),
    }
}

/// Coerce a value into the feature's valid space. Out-of-range percents
/// clamp to the nearest bound; unknown mode variants and mismatched value
/// types fall back to the default.
pub fn clamp(spec: &FeatureSpec, value: FeatureValue) -> FeatureValue {
    match (&spec.kind, value) {
        (FeatureKind::Bool { .. }, FeatureValue::Bool(b)) => FeatureValue::Bool(b),
        (FeatureKind::Percent { min, max, .. }, FeatureValue::Percent(v)) => {
            let clamped = v.clamp(*min, *max);
            if clamped != v {
                tracing::debug!(feature = spec.id, from = v, to = clamped, "percent clamped");
            }
            FeatureValue::Percent(clamped)
        }
        (FeatureKind::Mode { variants, default }, FeatureValue::Mode(m)) => {
            if variants.contains(&m.as_str()) {
                FeatureValue::Mode(m)
            } else {
                tracing::warn!(feature = spec.id, variant = %m, "unknown mode variant; using default");
                FeatureValue::Mode(default.to_string())
            }
        }
        (_, other) => {
            tracing::warn!(feature = spec.id, value = ?other, "value type mismatch; using default");
            default_value(spec)
        }
    }
}

/// Mapping from feature id to its current value. Only departures from the
/// default are ever stored; an absent entry always means the default.
pub type FeatureState = HashMap<String, FeatureValue>;
