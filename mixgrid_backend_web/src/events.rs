// Copyright 2026 the Mixgrid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! `transitionend` delivery.
//!
//! One shared listener closure is attached to every subscribed element.
//! Events that bubbled up from an element's descendants are dropped; the
//! rest are forwarded with the element and the transitioned property name.

use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::string::String;
use core::cell::RefCell;

use wasm_bindgen::JsCast as _;
use wasm_bindgen::closure::Closure;
use web_sys::{Event, HtmlElement, TransitionEvent};

type Forward = Box<dyn FnMut(&HtmlElement, &str)>;

struct BridgeInner {
    event_name: String,
    listener: Closure<dyn FnMut(Event)>,
    forward: Rc<RefCell<Option<Forward>>>,
}

/// Subscribes elements to transition-completion events.
#[derive(Clone)]
pub struct TransitionBridge {
    inner: Rc<BridgeInner>,
}

impl core::fmt::Debug for TransitionBridge {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TransitionBridge")
            .field("event_name", &self.inner.event_name)
            .finish_non_exhaustive()
    }
}

impl TransitionBridge {
    /// Creates a bridge listening for `event_name` (`transitionend` or a
    /// vendor-prefixed variant).
    #[must_use]
    pub fn new(event_name: &str) -> Self {
        let forward: Rc<RefCell<Option<Forward>>> = Rc::new(RefCell::new(None));
        let sink = Rc::clone(&forward);
        let listener = Closure::wrap(Box::new(move |event: Event| {
            let (Some(target), Some(current)) = (event.target(), event.current_target()) else {
                return;
            };
            if target != current {
                return;
            }
            let Ok(el) = current.dyn_into::<HtmlElement>() else {
                return;
            };
            let property = event
                .dyn_ref::<TransitionEvent>()
                .map(TransitionEvent::property_name)
                .unwrap_or_default();
            match sink.try_borrow_mut() {
                Ok(mut slot) => {
                    if let Some(forward) = slot.as_mut() {
                        forward(&el, &property);
                    }
                }
                Err(_) => tracing::warn!(%property, "transition end dropped during delivery"),
            }
        }) as Box<dyn FnMut(Event)>);

        Self {
            inner: Rc::new(BridgeInner {
                event_name: String::from(event_name),
                listener,
                forward,
            }),
        }
    }

    /// Installs the receiver of forwarded events.
    pub fn set_forward(&self, forward: impl FnMut(&HtmlElement, &str) + 'static) {
        *self.inner.forward.borrow_mut() = Some(Box::new(forward));
    }

    /// Drops the receiver. Subscribed elements stay subscribed but their
    /// events go nowhere.
    pub fn clear_forward(&self) {
        self.inner.forward.borrow_mut().take();
    }

    /// Starts listening on `el`.
    pub fn subscribe(&self, el: &HtmlElement) {
        let _ = el.add_event_listener_with_callback(
            &self.inner.event_name,
            self.inner.listener.as_ref().unchecked_ref(),
        );
    }

    /// Stops listening on `el`.
    pub fn unsubscribe(&self, el: &HtmlElement) {
        let _ = el.remove_event_listener_with_callback(
            &self.inner.event_name,
            self.inner.listener.as_ref().unchecked_ref(),
        );
    }
}
