// Copyright 2026 the Mixgrid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Position, opacity and transform snapshots.
//!
//! A [`StyleSnapshot`] records everything the engine needs to know about one
//! element at one instant: its offset position, box size, the two margins that
//! absorb size changes, opacity, display, and one [`TransformValue`] per
//! [`TransformChannel`]. Snapshots are plain values; the difference between two
//! snapshots is itself a snapshot (see [`StyleSnapshot::delta`]).

use alloc::format;
use alloc::string::String;
use core::fmt;

/// A CSS length or angle unit attached to a transform value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Unit {
    /// Unitless (used by `scale`).
    #[default]
    None,
    /// Pixels.
    Px,
    /// Percent of the element's own box.
    Percent,
    /// Font-relative `em`.
    Em,
    /// Root font-relative `rem`.
    Rem,
    /// Viewport height percent.
    Vh,
    /// Viewport width percent.
    Vw,
    /// Degrees.
    Deg,
}

impl Unit {
    /// Every unit with a non-empty suffix, longest suffix first so that `rem`
    /// is tried before `em`.
    const SUFFIXED: [Self; 7] = [
        Self::Rem,
        Self::Deg,
        Self::Px,
        Self::Em,
        Self::Vh,
        Self::Vw,
        Self::Percent,
    ];

    /// Returns the CSS suffix for this unit.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "",
            Self::Px => "px",
            Self::Percent => "%",
            Self::Em => "em",
            Self::Rem => "rem",
            Self::Vh => "vh",
            Self::Vw => "vw",
            Self::Deg => "deg",
        }
    }

    /// Identifies the unit a CSS value ends with, if any.
    #[must_use]
    pub fn from_suffix(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::SUFFIXED
            .into_iter()
            .find(|unit| value.ends_with(unit.as_str()))
    }
}

/// One value of a transform channel.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TransformValue {
    /// Numeric magnitude.
    pub value: f64,
    /// Unit suffix.
    pub unit: Unit,
}

impl TransformValue {
    /// Creates a value with the given unit.
    #[inline]
    #[must_use]
    pub const fn new(value: f64, unit: Unit) -> Self {
        Self { value, unit }
    }
}

impl fmt::Display for TransformValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.value, self.unit.as_str())
    }
}

/// The independently animated transform functions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TransformChannel {
    /// `scale()`
    Scale,
    /// `translateX()`
    TranslateX,
    /// `translateY()`
    TranslateY,
    /// `translateZ()`
    TranslateZ,
    /// `rotateX()`
    RotateX,
    /// `rotateY()`
    RotateY,
    /// `rotateZ()`
    RotateZ,
}

impl TransformChannel {
    /// All channels, in the order they are written into a `transform` value.
    pub const ALL: [Self; 7] = [
        Self::Scale,
        Self::TranslateX,
        Self::TranslateY,
        Self::TranslateZ,
        Self::RotateX,
        Self::RotateY,
        Self::RotateZ,
    ];

    /// The CSS function name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Scale => "scale",
            Self::TranslateX => "translateX",
            Self::TranslateY => "translateY",
            Self::TranslateZ => "translateZ",
            Self::RotateX => "rotateX",
            Self::RotateY => "rotateY",
            Self::RotateZ => "rotateZ",
        }
    }

    /// Looks a channel up by its CSS function name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.name() == name)
    }

    /// The value that leaves an element untransformed.
    #[must_use]
    pub const fn identity(self) -> TransformValue {
        match self {
            Self::Scale => TransformValue::new(1.0, Unit::None),
            Self::TranslateX | Self::TranslateY | Self::TranslateZ => {
                TransformValue::new(0.0, Unit::Px)
            }
            Self::RotateX | Self::RotateY | Self::RotateZ => TransformValue::new(0.0, Unit::Deg),
        }
    }

    /// The effect value used when an effect names this channel without an
    /// argument, e.g. `"scale"` on its own.
    #[must_use]
    pub const fn default_effect(self) -> TransformValue {
        match self {
            Self::Scale => TransformValue::new(0.01, Unit::None),
            Self::TranslateX | Self::TranslateY | Self::TranslateZ => {
                TransformValue::new(20.0, Unit::Px)
            }
            Self::RotateX | Self::RotateY => TransformValue::new(90.0, Unit::Deg),
            Self::RotateZ => TransformValue::new(180.0, Unit::Deg),
        }
    }

    const fn index(self) -> usize {
        self as usize
    }
}

/// One [`TransformValue`] per [`TransformChannel`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transforms([TransformValue; 7]);

impl Transforms {
    /// Every channel at its identity value.
    #[must_use]
    pub fn identity() -> Self {
        let mut values = [TransformValue::default(); 7];
        for channel in TransformChannel::ALL {
            values[channel.index()] = channel.identity();
        }
        Self(values)
    }

    /// Every channel at zero, keeping identity units. Used for deltas.
    #[must_use]
    pub fn zero() -> Self {
        let mut out = Self::identity();
        for channel in TransformChannel::ALL {
            out.0[channel.index()].value = 0.0;
        }
        out
    }

    /// Returns the value of a channel.
    #[inline]
    #[must_use]
    pub fn get(&self, channel: TransformChannel) -> TransformValue {
        self.0[channel.index()]
    }

    /// Sets the value of a channel.
    #[inline]
    pub fn set(&mut self, channel: TransformChannel, value: TransformValue) {
        self.0[channel.index()] = value;
    }

    /// Serializes the given channels as space-separated CSS transform
    /// functions, in [`TransformChannel::ALL`] order.
    #[must_use]
    pub fn to_css(&self, channels: impl Fn(TransformChannel) -> bool) -> String {
        let mut out = String::new();
        for channel in TransformChannel::ALL.into_iter().filter(|c| channels(*c)) {
            if !out.is_empty() {
                out.push(' ');
            }
            out.push_str(&format!("{}({})", channel.name(), self.get(channel)));
        }
        out
    }
}

impl Default for Transforms {
    fn default() -> Self {
        Self::identity()
    }
}

/// A position, size, opacity and transform snapshot of one element.
///
/// `x`/`y` are offsets relative to the nearest positioned ancestor, so that
/// positions read from the same container can be subtracted directly.
#[derive(Clone, Debug, PartialEq)]
pub struct StyleSnapshot {
    /// Horizontal offset in pixels.
    pub x: f64,
    /// Vertical offset in pixels.
    pub y: f64,
    /// Border-box width in pixels.
    pub width: f64,
    /// Border-box height in pixels.
    pub height: f64,
    /// Computed right margin in pixels.
    pub margin_right: f64,
    /// Computed bottom margin in pixels.
    pub margin_bottom: f64,
    /// Opacity in `[0, 1]`.
    pub opacity: f64,
    /// Display value, empty when unset.
    pub display: String,
    /// Per-channel transform values.
    pub transforms: Transforms,
}

impl Default for StyleSnapshot {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: 0.0,
            height: 0.0,
            margin_right: 0.0,
            margin_bottom: 0.0,
            opacity: 1.0,
            display: String::new(),
            transforms: Transforms::identity(),
        }
    }
}

impl StyleSnapshot {
    /// A snapshot where every numeric field is zero, used as a delta seed.
    #[must_use]
    pub fn zero() -> Self {
        Self {
            opacity: 0.0,
            transforms: Transforms::zero(),
            ..Self::default()
        }
    }

    /// Returns `to - self` field by field. Transform units are taken from
    /// `to`, falling back to `self` when `to` is unitless.
    #[must_use]
    pub fn delta(&self, to: &Self) -> Self {
        let mut transforms = Transforms::zero();
        for channel in TransformChannel::ALL {
            let a = self.transforms.get(channel);
            let b = to.transforms.get(channel);
            let unit = if b.unit == Unit::None { a.unit } else { b.unit };
            transforms.set(channel, TransformValue::new(b.value - a.value, unit));
        }
        Self {
            x: to.x - self.x,
            y: to.y - self.y,
            width: to.width - self.width,
            height: to.height - self.height,
            margin_right: to.margin_right - self.margin_right,
            margin_bottom: to.margin_bottom - self.margin_bottom,
            opacity: to.opacity - self.opacity,
            display: to.display.clone(),
            transforms,
        }
    }

    /// Returns `self + delta * factor`.
    #[must_use]
    pub fn lerp(&self, delta: &Self, factor: f64) -> Self {
        let mut transforms = self.transforms;
        for channel in TransformChannel::ALL {
            let base = self.transforms.get(channel);
            let step = delta.transforms.get(channel);
            transforms.set(
                channel,
                TransformValue::new(base.value + step.value * factor, base.unit),
            );
        }
        Self {
            x: self.x + delta.x * factor,
            y: self.y + delta.y * factor,
            width: self.width + delta.width * factor,
            height: self.height + delta.height * factor,
            margin_right: self.margin_right + delta.margin_right * factor,
            margin_bottom: self.margin_bottom + delta.margin_bottom * factor,
            opacity: self.opacity + delta.opacity * factor,
            display: self.display.clone(),
            transforms,
        }
    }

    /// Whether position or size differ from `other`.
    #[must_use]
    pub fn differs_in_position(&self, other: &Self) -> bool {
        self.x != other.x || self.y != other.y
    }

    /// Whether any transform channel renders differently from `other`. Zero
    /// lengths are equal whatever their unit.
    #[must_use]
    pub fn differs_in_transforms(&self, other: &Self) -> bool {
        TransformChannel::ALL.into_iter().any(|channel| {
            let a = self.transforms.get(channel);
            let b = other.transforms.get(channel);
            a.value != b.value || (a.value != 0.0 && a.unit != b.unit)
        })
    }

    /// Whether width, height, or the absorbing margins differ from `other`.
    #[must_use]
    pub fn differs_in_size(&self, other: &Self) -> bool {
        self.width != other.width
            || self.height != other.height
            || self.margin_right != other.margin_right
            || self.margin_bottom != other.margin_bottom
    }
}

/// Formats a CSS `translate(x, y)` function in pixels.
#[must_use]
pub fn translate_css(x: f64, y: f64) -> String {
    format!("translate({x}px, {y}px)")
}

/// Formats a pixel length.
#[must_use]
pub fn px(value: f64) -> String {
    format!("{value}px")
}

/// Parses the leading number of a CSS value (`"12.5px"` → `12.5`), like
/// `parseFloat`.
#[must_use]
pub fn parse_leading_float(value: &str) -> Option<f64> {
    let value = value.trim();
    let mut end = 0;
    let mut seen_digit = false;
    let mut seen_dot = false;
    for (i, ch) in value.char_indices() {
        match ch {
            '+' | '-' if i == 0 => {}
            '.' if !seen_dot => seen_dot = true,
            '0'..='9' => seen_digit = true,
            _ => break,
        }
        end = i + ch.len_utf8();
    }
    if !seen_digit {
        return None;
    }
    value[..end].parse().ok()
}
