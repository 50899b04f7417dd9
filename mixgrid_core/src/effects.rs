// Copyright 2026 the Mixgrid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Entrance and exit effect parsing.
//!
//! Effects are configured as a space-separated list of tokens such as
//! `"fade scale(0.5) translateY(-20%) stagger(30ms)"`. Each token is either a
//! bare name, which uses the default magnitude, or a name with a single
//! parenthesized argument.

use alloc::string::String;

use crate::config::AnimationConfig;
use crate::style::{TransformChannel, TransformValue, Transforms, Unit, parse_leading_float};

/// Stagger step used when `stagger` appears without an argument.
pub const DEFAULT_STAGGER_MS: f64 = 100.0;

/// The parsed effects for one direction (entering or leaving).
#[derive(Clone, Debug, PartialEq)]
pub struct EffectSet {
    /// Opacity to fade from (entering) or to (leaving); `None` without `fade`.
    pub opacity: Option<f64>,
    /// Effect magnitude per channel; inactive channels hold identity values.
    pub transforms: Transforms,
    active: [bool; 7],
}

impl Default for EffectSet {
    fn default() -> Self {
        Self {
            opacity: None,
            transforms: Transforms::identity(),
            active: [false; 7],
        }
    }
}

impl EffectSet {
    /// Parses an effects string. `negate` flips the sign of every transform
    /// except `scale` (used for reversed exit effects).
    #[must_use]
    pub fn parse(effects: &str, negate: bool) -> Self {
        let mut out = Self::default();
        for token in effects.split_whitespace() {
            let (name, arg) = split_token(token);
            if name == "fade" {
                out.opacity = Some(arg.and_then(parse_leading_float).unwrap_or(0.0));
                continue;
            }
            let Some(channel) = TransformChannel::from_name(name) else {
                continue;
            };
            let default = channel.default_effect();
            let mut value = match arg {
                Some(arg) => TransformValue::new(
                    parse_leading_float(arg).unwrap_or(default.value),
                    Unit::from_suffix(arg).unwrap_or(default.unit),
                ),
                None => default,
            };
            if negate && channel != TransformChannel::Scale {
                value.value = -value.value;
            }
            out.transforms.set(channel, value);
            out.active[channel as usize] = true;
        }
        out
    }

    /// Whether the given transform channel takes part in this effect.
    #[inline]
    #[must_use]
    pub fn is_active(&self, channel: TransformChannel) -> bool {
        self.active[channel as usize]
    }

    /// Whether any transform channel is active.
    #[must_use]
    pub fn has_transforms(&self) -> bool {
        self.active.iter().any(|a| *a)
    }

    /// The CSS transform functions of the active channels.
    #[must_use]
    pub fn transform_css(&self) -> String {
        self.transforms.to_css(|c| self.is_active(c))
    }
}

/// Entrance and exit effects plus stagger, as derived from an
/// [`AnimationConfig`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Effects {
    /// Applied to entering targets.
    pub effects_in: EffectSet,
    /// Applied to leaving targets.
    pub effects_out: EffectSet,
    /// Per-index transition delay step in milliseconds.
    pub stagger_ms: f64,
}

impl Effects {
    /// Parses the effect strings of `config`.
    #[must_use]
    pub fn from_config(config: &AnimationConfig) -> Self {
        let effects_in = config
            .effects_in
            .as_deref()
            .unwrap_or(config.effects.as_str());
        let effects_out = config
            .effects_out
            .as_deref()
            .unwrap_or(config.effects.as_str());
        Self {
            effects_in: EffectSet::parse(effects_in, false),
            effects_out: EffectSet::parse(effects_out, config.reverse_out),
            stagger_ms: parse_stagger(&config.effects),
        }
    }

    /// Whether showing or hiding produces any visible effect.
    #[must_use]
    pub fn has_effect(&self) -> bool {
        self.effects_in.has_transforms()
            || self.effects_out.has_transforms()
            || self.effects_in.opacity.is_some()
            || self.effects_out.opacity.is_some()
    }

    /// Whether targets fade, i.e. opacity must be written and transitioned.
    #[must_use]
    pub fn is_fading(&self) -> bool {
        self.effects_in.opacity.is_some() || self.effects_out.opacity.is_some()
    }
}

fn parse_stagger(effects: &str) -> f64 {
    effects
        .split_whitespace()
        .map(split_token)
        .find(|(name, _)| *name == "stagger")
        .map_or(0.0, |(_, arg)| {
            arg.and_then(parse_leading_float)
                .unwrap_or(DEFAULT_STAGGER_MS)
        })
}

/// Splits `name(arg)` into `("name", Some("arg"))`.
fn split_token(token: &str) -> (&str, Option<&str>) {
    match token.find('(') {
        Some(open) => {
            let rest = &token[open + 1..];
            let arg = rest.strip_suffix(')').unwrap_or(rest);
            (&token[..open], Some(arg))
        }
        None => (token, None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_names_use_defaults() {
        let set = EffectSet::parse("fade scale", false);
        assert_eq!(set.opacity, Some(0.0));
        assert!(set.is_active(TransformChannel::Scale));
        assert_eq!(set.transforms.get(TransformChannel::Scale).value, 0.01);
        assert!(!set.is_active(TransformChannel::TranslateX));
        assert_eq!(set.transform_css(), "scale(0.01)");
    }

    #[test]
    fn arguments_carry_units() {
        let set = EffectSet::parse("fade(0.25) translateY(-20%) rotateZ(45deg)", false);
        assert_eq!(set.opacity, Some(0.25));
        assert_eq!(
            set.transforms.get(TransformChannel::TranslateY),
            TransformValue::new(-20.0, Unit::Percent)
        );
        assert_eq!(set.transform_css(), "translateY(-20%) rotateZ(45deg)");
    }

    #[test]
    fn negated_exit_keeps_scale() {
        let set = EffectSet::parse("scale(0.5) translateX(10px)", true);
        assert_eq!(set.transforms.get(TransformChannel::Scale).value, 0.5);
        assert_eq!(set.transforms.get(TransformChannel::TranslateX).value, -10.0);
    }

    #[test]
    fn stagger_defaults_and_parses() {
        assert_eq!(parse_stagger("fade"), 0.0);
        assert_eq!(parse_stagger("fade stagger"), DEFAULT_STAGGER_MS);
        assert_eq!(parse_stagger("stagger(30ms) fade"), 30.0);
    }

    #[test]
    fn has_effect_requires_something() {
        let config = AnimationConfig {
            effects: String::from("stagger(20ms)"),
            ..AnimationConfig::default()
        };
        assert!(!Effects::from_config(&config).has_effect());
        assert!(Effects::from_config(&AnimationConfig::default()).has_effect());
    }
}
