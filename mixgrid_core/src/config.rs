// Copyright 2026 the Mixgrid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Mixer configuration.
//!
//! [`MixerConfig`] groups every tunable the mixer reads. All sections
//! implement [`Default`] with the values documented on each field; the
//! [`MixerConfig::instant`] preset disables animation entirely.

use alloc::string::String;

/// Animation behavior.
#[derive(Clone, Debug, PartialEq)]
pub struct AnimationConfig {
    /// Whether operations animate at all. Default `true`.
    pub enable: bool,
    /// Effects used for both directions. Default `"fade scale"`.
    pub effects: String,
    /// Entrance effects, overriding [`effects`](Self::effects).
    pub effects_in: Option<String>,
    /// Exit effects, overriding [`effects`](Self::effects).
    pub effects_out: Option<String>,
    /// Transition duration in milliseconds. Default `600`.
    pub duration: u32,
    /// CSS easing for every property except opacity. Default `"ease"`.
    pub easing: String,
    /// Whether to apply a perspective to the container. Default `true`.
    pub apply_perspective: bool,
    /// Container perspective distance. Default `"3000px"`.
    pub perspective_distance: String,
    /// Container perspective origin. Default `"50% 50%"`.
    pub perspective_origin: String,
    /// Whether calls made while mixing are queued. Default `true`.
    pub queue: bool,
    /// Maximum number of queued calls. Default `3`.
    pub queue_limit: usize,
    /// Whether the container height/width transitions. Default `true`.
    pub animate_resize_container: bool,
    /// Whether target width/height/margins transition. Default `false`.
    pub animate_resize_targets: bool,
    /// Whether exit transforms (except scale) are negated. Default `false`.
    pub reverse_out: bool,
    /// Whether entering and leaving targets travel with the layout.
    /// Default `true`.
    pub nudge: bool,
    /// Whether the container height is fixed while animating. Default `true`.
    pub clamp_height: bool,
    /// Whether the container width is fixed while animating. Default `true`.
    pub clamp_width: bool,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            enable: true,
            effects: String::from("fade scale"),
            effects_in: None,
            effects_out: None,
            duration: 600,
            easing: String::from("ease"),
            apply_perspective: true,
            perspective_distance: String::from("3000px"),
            perspective_origin: String::from("50% 50%"),
            queue: true,
            queue_limit: 3,
            animate_resize_container: true,
            animate_resize_targets: false,
            reverse_out: false,
            nudge: true,
            clamp_height: true,
            clamp_width: true,
        }
    }
}

impl AnimationConfig {
    /// The effective queue capacity: zero when queueing is disabled.
    #[must_use]
    pub fn effective_queue_limit(&self) -> usize {
        if self.queue { self.queue_limit } else { 0 }
    }
}

/// Diagnostics.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DebugConfig {
    /// Forward lifecycle events to the report sink. Default `false`.
    pub enable: bool,
    /// Forward non-fatal warnings to the report sink. Default `true`.
    pub show_warnings: bool,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            enable: false,
            show_warnings: true,
        }
    }
}

/// Container and target layout.
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutConfig {
    /// Class applied to the container on load. Default empty.
    pub container_class_name: String,
    /// Display value written to shown targets. Default `"block"`.
    pub display: String,
    /// Whether targets may be any descendant rather than direct children.
    /// Default `true`.
    pub allow_nested_targets: bool,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            container_class_name: String::new(),
            display: String::from("block"),
            allow_nested_targets: true,
        }
    }
}

/// State applied when the mixer is created.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadConfig {
    /// Initial filter. Default `"all"`.
    pub filter: String,
    /// Initial sort. Default `"default:asc"`.
    pub sort: String,
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            filter: String::from("all"),
            sort: String::from("default:asc"),
        }
    }
}

/// Selectors.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectorConfig {
    /// Selector identifying targets. Default `".mix"`.
    pub target: String,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            target: String::from(".mix"),
        }
    }
}

/// Toggle behavior.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ControlsConfig {
    /// Filter applied when the last toggle is switched off, `"all"` or
    /// `"none"`. Default `"all"`.
    pub toggle_default: String,
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self {
            toggle_default: String::from("all"),
        }
    }
}

/// Class names written to the container.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClassNames {
    /// Added when a filter matches nothing. Default
    /// `"mixitup-container-failed"`.
    pub container_failed: String,
}

impl Default for ClassNames {
    fn default() -> Self {
        Self {
            container_failed: String::from("mixitup-container-failed"),
        }
    }
}

/// Complete mixer configuration.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MixerConfig {
    /// Animation behavior.
    pub animation: AnimationConfig,
    /// Diagnostics.
    pub debug: DebugConfig,
    /// Layout.
    pub layout: LayoutConfig,
    /// Initial state.
    pub load: LoadConfig,
    /// Selectors.
    pub selectors: SelectorConfig,
    /// Toggles.
    pub controls: ControlsConfig,
    /// Class names.
    pub class_names: ClassNames,
}

impl MixerConfig {
    /// Configuration with animation disabled; every operation commits
    /// synchronously.
    #[must_use]
    pub fn instant() -> Self {
        Self {
            animation: AnimationConfig {
                enable: false,
                ..AnimationConfig::default()
            },
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_queue_has_no_capacity() {
        let mut config = AnimationConfig::default();
        assert_eq!(config.effective_queue_limit(), 3);
        config.queue = false;
        assert_eq!(config.effective_queue_limit(), 0);
    }

    #[test]
    fn instant_preset_only_disables_animation() {
        let config = MixerConfig::instant();
        assert!(!config.animation.enable);
        assert_eq!(config.animation.duration, 600);
        assert_eq!(config.selectors.target, ".mix");
    }
}
