// Copyright 2026 the Mixgrid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Wiring of a [`Mixer`] to browser callbacks.

use alloc::rc::{Rc, Weak};
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};

use js_sys::Promise;
use mixgrid_core::config::MixerConfig;
use mixgrid_core::error::MixError;
use mixgrid_core::filter::FilterCommand;
use mixgrid_core::host::{Capabilities, Host};
use mixgrid_core::mixer::Mixer;
use mixgrid_core::promise::MixPromise;
use mixgrid_core::registry::SharedRegistry;
use mixgrid_core::sort::SortCommand;
use mixgrid_core::state::State;
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::future_to_promise;
use web_sys::HtmlElement;

use crate::convert::state_to_js;
use crate::events::TransitionBridge;
use crate::host::DomHost;
use crate::raf::FrameRequest;

type SharedMixer = Rc<RefCell<Mixer<DomHost>>>;

/// Browser callbacks that arrived while the mixer was borrowed.
///
/// They are replayed by the next borrow, so a frame or the last
/// `transitionend` of an operation is never lost.
#[derive(Debug)]
struct Backlog<E> {
    frame: Cell<bool>,
    ends: RefCell<Vec<(E, String)>>,
}

impl<E> Default for Backlog<E> {
    fn default() -> Self {
        Self {
            frame: Cell::new(false),
            ends: RefCell::new(Vec::new()),
        }
    }
}

impl<E: Clone> Backlog<E> {
    fn defer_frame(&self) {
        self.frame.set(true);
    }

    fn defer_end(&self, el: &E, property: &str) {
        self.ends
            .borrow_mut()
            .push((el.clone(), String::from(property)));
    }

    /// Takes everything recorded so far, oldest first.
    fn take(&self) -> (bool, Vec<(E, String)>) {
        (
            self.frame.replace(false),
            core::mem::take(&mut *self.ends.borrow_mut()),
        )
    }

    /// Delivers the deferred callbacks, the frame first.
    fn replay<H: Host<Element = E>>(&self, mixer: &mut Mixer<H>) {
        let (frame, ends) = self.take();
        if frame {
            mixer.advance_frame();
        }
        for (el, property) in &ends {
            mixer.handle_transition_end(el, property);
        }
    }
}

/// A mixer bound to a DOM container, with animation frames and
/// `transitionend` events routed back into it.
///
/// Hooks and callbacks run while the mixer is borrowed and must not call
/// back into the same `WebMixer`. Frames and `transitionend` events that
/// fire during such a borrow are held back and delivered when it ends.
pub struct WebMixer {
    mixer: SharedMixer,
    backlog: Rc<Backlog<HtmlElement>>,
    frames: FrameRequest,
    bridge: TransitionBridge,
}

impl core::fmt::Debug for WebMixer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("WebMixer")
            .field("mixer", &self.mixer.try_borrow().ok())
            .finish_non_exhaustive()
    }
}

impl WebMixer {
    /// Creates a mixer over `container` and connects it to the browser.
    pub fn new(
        container: HtmlElement,
        config: MixerConfig,
        capabilities: Rc<Capabilities>,
        registry: SharedRegistry,
    ) -> Result<Self, MixError> {
        let host = DomHost::new(container, &capabilities);
        let frames = host.frames().clone();
        let bridge = host.bridge().clone();
        let mixer = Rc::new(RefCell::new(Mixer::with_registry(
            host,
            config,
            capabilities,
            registry,
        )?));

        let backlog = Rc::new(Backlog::default());

        let weak = Rc::downgrade(&mixer);
        let deferred = Rc::clone(&backlog);
        frames.set_callback(move |_timestamp| {
            let delivered = with_mixer(&weak, &deferred, Mixer::advance_frame);
            if !delivered {
                tracing::debug!("mixer busy, frame deferred");
                deferred.defer_frame();
            }
        });
        let weak = Rc::downgrade(&mixer);
        let deferred = Rc::clone(&backlog);
        bridge.set_forward(move |el, property| {
            let delivered = with_mixer(&weak, &deferred, |m| {
                m.handle_transition_end(el, property);
            });
            if !delivered {
                tracing::debug!(property, "mixer busy, transition end deferred");
                deferred.defer_end(el, property);
            }
        });

        Ok(Self {
            mixer,
            backlog,
            frames,
            bridge,
        })
    }

    /// Runs `f` with the mixer borrowed mutably.
    ///
    /// # Panics
    ///
    /// Panics if called from inside a hook or callback of this mixer.
    pub fn with<R>(&self, f: impl FnOnce(&mut Mixer<DomHost>) -> R) -> R {
        let mut mixer = self.mixer.borrow_mut();
        let result = f(&mut mixer);
        self.backlog.replay(&mut mixer);
        result
    }

    /// Filters by a selector (`"all"`, `"none"` or any CSS selector).
    pub fn filter(&self, selector: &str, animate: bool) -> Result<Promise, MixError> {
        let promise = self.with(|m| m.filter(FilterCommand::parse(selector), animate))?;
        Ok(to_js_promise(promise))
    }

    /// Sorts by a sort string such as `"published:desc name"`.
    pub fn sort(&self, sort: &str, animate: bool) -> Result<Promise, MixError> {
        let promise = self.with(|m| m.sort(SortCommand::parse(sort), animate))?;
        Ok(to_js_promise(promise))
    }

    /// Replaces the container class.
    pub fn change_layout(&self, class: &str, animate: bool) -> Result<Promise, MixError> {
        let promise = self.with(|m| m.change_layout(class, animate))?;
        Ok(to_js_promise(promise))
    }

    /// Adds a toggle selector.
    pub fn toggle_on(&self, selector: &str, animate: bool) -> Result<Promise, MixError> {
        let promise = self.with(|m| m.toggle_on(selector, animate))?;
        Ok(to_js_promise(promise))
    }

    /// Removes a toggle selector.
    pub fn toggle_off(&self, selector: &str, animate: bool) -> Result<Promise, MixError> {
        let promise = self.with(|m| m.toggle_off(selector, animate))?;
        Ok(to_js_promise(promise))
    }

    /// Appends elements as new targets.
    pub fn append(&self, elements: Vec<HtmlElement>, animate: bool) -> Result<Promise, MixError> {
        let promise = self.with(|m| m.append(elements, animate))?;
        Ok(to_js_promise(promise))
    }

    /// The committed state as a plain JS object.
    #[must_use]
    pub fn state(&self) -> JsValue {
        state_to_js(&self.mixer.borrow().get_state())
    }

    /// Destroys the mixer and disconnects browser callbacks.
    pub fn destroy(&self, hide_all: bool) -> Result<(), MixError> {
        self.with(|m| m.destroy(hide_all))?;
        self.frames.release();
        self.bridge.clear_forward();
        Ok(())
    }
}

impl Drop for WebMixer {
    fn drop(&mut self) {
        self.frames.release();
        self.bridge.clear_forward();
    }
}

/// Runs `f` and any backlog if the mixer can be borrowed. Returns `false`
/// when it is busy; a dropped mixer counts as delivered.
fn with_mixer(
    weak: &Weak<RefCell<Mixer<DomHost>>>,
    backlog: &Backlog<HtmlElement>,
    f: impl FnOnce(&mut Mixer<DomHost>),
) -> bool {
    let Some(mixer) = weak.upgrade() else {
        return true;
    };
    let Ok(mut mixer) = mixer.try_borrow_mut() else {
        return false;
    };
    f(&mut mixer);
    backlog.replay(&mut mixer);
    true
}

/// Converts a [`MixPromise`] into a JS promise resolving with the state
/// object, or rejecting when the call was discarded.
#[must_use]
pub fn to_js_promise(promise: MixPromise<State<HtmlElement>>) -> Promise {
    future_to_promise(async move {
        match promise.await {
            Ok(state) => Ok(state_to_js(&state)),
            Err(cancelled) => Err(JsValue::from_str(&cancelled.to_string())),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backlog_keeps_callbacks_in_arrival_order() {
        let backlog = Backlog::<u8>::default();
        backlog.defer_end(&2, "transform");
        backlog.defer_frame();
        backlog.defer_end(&1, "opacity");
        backlog.defer_frame();

        let (frame, ends) = backlog.take();
        assert!(frame);
        assert_eq!(
            ends,
            [(2, String::from("transform")), (1, String::from("opacity"))]
        );
        assert_eq!(backlog.take(), (false, Vec::new()));
    }
}
