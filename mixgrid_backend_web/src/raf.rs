// Copyright 2026 the Mixgrid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! One-shot `requestAnimationFrame` requests.
//!
//! The mixer asks for exactly one frame per animated operation (between its
//! start and end style writes), so unlike a render loop [`FrameRequest`]
//! does not re-register itself. Repeated requests before the frame arrives
//! collapse into one callback.

use alloc::boxed::Box;
use alloc::rc::Rc;
use core::cell::{Cell, RefCell};

use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;

// Direct global bindings instead of `web_sys::Window` methods, so no Window
// object has to be fetched per request.
#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = performance, js_name = "now")]
    pub(crate) fn performance_now() -> f64;

    #[wasm_bindgen(js_name = "requestAnimationFrame")]
    fn request_animation_frame(callback: &JsValue) -> i32;

    #[wasm_bindgen(js_name = "cancelAnimationFrame")]
    fn cancel_animation_frame(id: i32);
}

type FrameClosure = Closure<dyn FnMut(f64)>;

struct FrameInner {
    /// The JS closure handed to `requestAnimationFrame`, created lazily.
    closure: RefCell<Option<FrameClosure>>,
    /// Receives the frame timestamp in milliseconds.
    callback: RefCell<Option<Box<dyn FnMut(f64)>>>,
    pending: Cell<bool>,
    raf_id: Cell<i32>,
}

/// A cloneable handle that schedules single animation frames.
///
/// Clones share the same pending request and callback.
#[derive(Clone)]
pub struct FrameRequest {
    inner: Rc<FrameInner>,
}

impl core::fmt::Debug for FrameRequest {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FrameRequest")
            .field("pending", &self.inner.pending.get())
            .field("has_callback", &self.inner.callback.borrow().is_some())
            .finish()
    }
}

impl Default for FrameRequest {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameRequest {
    /// Creates a handle with no callback.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Rc::new(FrameInner {
                closure: RefCell::new(None),
                callback: RefCell::new(None),
                pending: Cell::new(false),
                raf_id: Cell::new(0),
            }),
        }
    }

    /// Installs the frame callback, replacing any previous one.
    pub fn set_callback(&self, callback: impl FnMut(f64) + 'static) {
        *self.inner.callback.borrow_mut() = Some(Box::new(callback));
    }

    /// Schedules one callback before the next paint. A request that is
    /// already pending is reused.
    pub fn request(&self) {
        if self.inner.pending.get() {
            return;
        }
        self.inner.pending.set(true);

        let mut closure = self.inner.closure.borrow_mut();
        let closure = closure.get_or_insert_with(|| {
            let inner = Rc::downgrade(&self.inner);
            Closure::wrap(Box::new(move |timestamp_ms: f64| {
                let Some(inner) = inner.upgrade() else {
                    return;
                };
                if !inner.pending.replace(false) {
                    return;
                }
                // Taken out for the call so the callback may request again.
                let callback = inner.callback.borrow_mut().take();
                if let Some(mut callback) = callback {
                    callback(timestamp_ms);
                    let mut slot = inner.callback.borrow_mut();
                    if slot.is_none() {
                        *slot = Some(callback);
                    }
                }
            }) as Box<dyn FnMut(f64)>)
        });
        let id = request_animation_frame(closure.as_ref().unchecked_ref());
        self.inner.raf_id.set(id);
    }

    /// Cancels a pending request.
    pub fn cancel(&self) {
        if self.inner.pending.replace(false) {
            cancel_animation_frame(self.inner.raf_id.get());
        }
    }

    /// Whether a request is pending.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.inner.pending.get()
    }

    /// Drops the callback and the JS closure. Pending requests are
    /// cancelled.
    pub fn release(&self) {
        self.cancel();
        self.inner.callback.borrow_mut().take();
        self.inner.closure.borrow_mut().take();
    }
}
