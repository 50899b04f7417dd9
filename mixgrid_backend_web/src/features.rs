// Copyright 2026 the Mixgrid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Capability detection.

use alloc::string::String;

use mixgrid_core::host::Capabilities;
use wasm_bindgen::JsValue;
use web_sys::Document;

/// Which transition implementation the probe found.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransitionSupport {
    /// Unprefixed properties.
    Standard,
    /// `-webkit-` prefixed properties only.
    Webkit,
    /// No CSS transitions.
    Unsupported,
}

impl TransitionSupport {
    /// The capabilities this support level implies.
    #[must_use]
    pub fn capabilities(self) -> Capabilities {
        match self {
            Self::Standard => Capabilities::standard(),
            Self::Webkit => Capabilities {
                transitions: true,
                transform_property: String::from("-webkit-transform"),
                transform_rule: String::from("-webkit-transform"),
                transition_property: String::from("-webkit-transition"),
                perspective_property: String::from("-webkit-perspective"),
                perspective_origin_property: String::from("-webkit-perspective-origin"),
                transition_end_event: String::from("webkitTransitionEnd"),
            },
            Self::Unsupported => Capabilities::without_transitions(),
        }
    }
}

/// Probes the style object of `document.body`.
#[must_use]
pub fn probe(document: &Document) -> TransitionSupport {
    let Some(body) = document.body() else {
        return TransitionSupport::Standard;
    };
    let style = body.style();
    let style: &js_sys::Object = style.as_ref();
    let has = |name: &str| js_sys::Reflect::has(style, &JsValue::from_str(name)).unwrap_or(false);
    if has("transition") {
        TransitionSupport::Standard
    } else if has("webkitTransition") {
        TransitionSupport::Webkit
    } else {
        TransitionSupport::Unsupported
    }
}

/// Detects the capabilities of the current document. Call once and share
/// the result between mixers.
#[must_use]
pub fn detect() -> Capabilities {
    let support = web_sys::window()
        .and_then(|w| w.document())
        .map_or(TransitionSupport::Standard, |d| probe(&d));
    tracing::debug!(?support, "capabilities detected");
    support.capabilities()
}
