// Copyright 2026 the Mixgrid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Conversion of committed states into plain JS objects.

use alloc::string::String;

use js_sys::{Array, Object, Reflect};
use mixgrid_core::filter::{FilterAction, FilterCommand, FilterPredicate};
use mixgrid_core::state::State;
use wasm_bindgen::JsValue;
use web_sys::HtmlElement;

/// A readable label for a filter: the selector, `"all"`, `"none"`, or an
/// empty string for element-based filters. Hiding filters are prefixed
/// with `!`.
#[must_use]
pub fn filter_label<E>(filter: &FilterCommand<E>) -> String {
    let label = match &filter.predicate {
        FilterPredicate::All => "all",
        FilterPredicate::None => "none",
        FilterPredicate::Selector(s) => s.as_str(),
        FilterPredicate::Element(_) | FilterPredicate::Collection(_) => "",
    };
    match filter.action {
        FilterAction::Show => String::from(label),
        FilterAction::Hide => alloc::format!("!{label}"),
    }
}

fn elements(list: &[HtmlElement]) -> Array {
    list.iter().collect()
}

fn set(obj: &Object, key: &str, value: &JsValue) {
    let _ = Reflect::set(obj, &JsValue::from_str(key), value);
}

/// Builds a camel-cased JS object mirroring `state`.
#[must_use]
pub fn state_to_js(state: &State<HtmlElement>) -> JsValue {
    let obj = Object::new();
    set(&obj, "id", &JsValue::from_f64(state.id as f64));
    set(
        &obj,
        "activeFilter",
        &JsValue::from_str(&filter_label(&state.active_filter)),
    );
    set(
        &obj,
        "activeSort",
        &JsValue::from_str(&state.active_sort.sort_string),
    );
    set(
        &obj,
        "activeContainerClass",
        &JsValue::from_str(&state.active_container_class),
    );
    set(&obj, "targets", &elements(&state.targets));
    set(&obj, "show", &elements(&state.show));
    set(&obj, "hide", &elements(&state.hide));
    set(&obj, "matching", &elements(&state.matching));
    for (key, total) in [
        ("totalTargets", state.total_targets),
        ("totalShow", state.total_show),
        ("totalHide", state.total_hide),
        ("totalMatching", state.total_matching),
    ] {
        set(&obj, key, &JsValue::from(u32::try_from(total).unwrap_or(u32::MAX)));
    }
    set(&obj, "hasFailed", &JsValue::from_bool(state.has_failed));
    set(
        &obj,
        "triggerElement",
        &state
            .trigger_element
            .as_ref()
            .map_or(JsValue::NULL, |el| el.clone().into()),
    );
    obj.into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_follow_predicate_and_action() {
        assert_eq!(filter_label(&FilterCommand::<u8>::all()), "all");
        assert_eq!(filter_label(&FilterCommand::<u8>::none()), "none");
        assert_eq!(filter_label(&FilterCommand::<u8>::parse(".a")), ".a");
        assert_eq!(filter_label(&FilterCommand::<u8>::parse(".a").hiding()), "!.a");
        assert_eq!(filter_label(&FilterCommand::element(3_u8)), "");
    }
}
