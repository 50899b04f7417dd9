// Copyright 2026 the Mixgrid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Web backend for mixgrid.
//!
//! This crate connects [`mixgrid_core`] to browser APIs:
//!
//! - [`DomHost`]: the [`Host`] implementation over a container element
//! - [`FrameRequest`]: one-shot `requestAnimationFrame` scheduling
//! - [`TransitionBridge`]: `transitionend` delivery per target
//! - [`detect`]: capability detection, shared by every mixer on the page
//! - [`WebMixer`]: a mixer with frames and transition events routed back
//!   into it, returning JS promises
//!
//! ```rust,ignore
//! let capabilities = Rc::new(mixgrid_backend_web::detect());
//! let registry = Registry::shared();
//! let mixer = WebMixer::new(container, MixerConfig::default(), capabilities, registry)?;
//! let promise = mixer.filter(".category-a", true)?;
//! ```

#![no_std]

extern crate alloc;

mod convert;
mod driver;
mod events;
mod features;
mod host;
mod raf;

pub use convert::{filter_label, state_to_js};
pub use driver::{WebMixer, to_js_promise};
pub use events::TransitionBridge;
pub use features::{TransitionSupport, detect, probe};
pub use host::DomHost;
pub use mixgrid_core::host::Host;
pub use raf::FrameRequest;

/// Milliseconds from `performance.now()`.
#[must_use]
pub fn now() -> f64 {
    raf::performance_now()
}
