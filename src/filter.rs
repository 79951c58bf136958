//! Composition of feature state into the page-wide effect expression.
//!
//! A feature contributes a term only when its value departs from the
//! declared default: the all-default state composes to the empty
//! expression, so a neutral widget never forces a new compositing context
//! on the host page. Term order follows [`crate::features::REGISTRY`]
//! declaration order and the serialized form is byte-stable.

use crate::features::{self, Channel, FeatureState, FeatureValue};
use std::fmt;

/// One named visual transform, e.g. `brightness(1.5)`.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterTerm {
    /// Feature that produced the term.
    pub feature: features::FeatureId,
    /// CSS filter function name.
    pub function: &'static str,
    /// Pre-formatted function argument.
    pub argument: String,
}

impl fmt::Display for FilterTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.function, self.argument)
    }
}

/// Ordered list of active transforms.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EffectExpression {
    pub terms: Vec<FilterTerm>,
}

impl EffectExpression {
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Serialize as a CSS filter chain. Empty expression serializes to the
    /// empty string, never to `none` or a chain of no-op terms.
    pub fn to_css(&self) -> String {
        let parts: Vec<String> = self.terms.iter().map(|t| t.to_string()).collect();
        parts.join(" ")
    }
}

/// Derive the effect expression for the given feature state. Pure: the same
/// state always yields the same expression.
pub fn compose(state: &FeatureState) -> EffectExpression {
    let mut terms = Vec::new();
    for spec in features::REGISTRY {
        if spec.channel != Channel::Filter {
            continue;
        }
        let default = features::default_value(spec);
        let value = state.get(spec.id).cloned().unwrap_or_else(|| default.clone());
        if value == default {
            continue;
        }
        if let Some(term) = term_for(spec.id, &value) {
            terms.push(term);
        }
    }
    EffectExpression { terms }
}

fn term_for(id: features::FeatureId, value: &FeatureValue) -> Option<FilterTerm> {
    let term = |function: &'static str, argument: String| {
        Some(FilterTerm { feature: id, function, argument })
    };
    match (id, value) {
        (features::BRIGHTNESS, FeatureValue::Percent(v)) => term("brightness", ratio(*v)),
        (features::CONTRAST, FeatureValue::Percent(v)) => term("contrast", ratio(*v)),
        (features::SATURATION, FeatureValue::Percent(v)) => term("saturate", ratio(*v)),
        (features::GRAYSCALE, FeatureValue::Bool(true)) => term("grayscale", "1".into()),
        (features::INVERT_COLORS, FeatureValue::Bool(true)) => term("invert", "1".into()),
        (features::HIGH_CONTRAST, FeatureValue::Bool(true)) => term("contrast", "1.35".into()),
        (features::COLOR_PROFILE, FeatureValue::Mode(profile)) => {
            let degrees = match profile.as_str() {
                features::PROFILE_PROTANOPIA => "-10deg",
                features::PROFILE_DEUTERANOPIA => "10deg",
                features::PROFILE_TRITANOPIA => "35deg",
                _ => return None,
            };
            term("hue-rotate", degrees.into())
        }
        _ => None,
    }
}

fn ratio(percent: u16) -> String {
    format!("{}", f64::from(percent) / 100.0)
}
