#![cfg(target_arch = "wasm32")]

use quiply_web::dom::{El, EventClosures};
use std::cell::Cell;
use std::rc::Rc;
use wasm_bindgen::UnwrapThrowExt;
use wasm_bindgen_test::{wasm_bindgen_test, wasm_bindgen_test_configure};
use web_sys::Event;

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn builder_assembles_detached_subtrees() {
	let el = El::new("section")
		.class("wrap")
		.attr("data-kind", "probe")
		.text("hello")
		.child(El::new("span").class("inner").text("world"))
		.into_element();

	assert_eq!(el.tag_name(), "SECTION");
	assert_eq!(el.class_name(), "wrap");
	assert_eq!(el.get_attribute("data-kind").as_deref(), Some("probe"));
	assert!(el.parent_node().is_none());
	assert_eq!(el.child_element_count(), 1);
	assert_eq!(el.text_content().unwrap_throw(), "helloworld");
}

#[wasm_bindgen_test]
fn boolean_attributes_appear_only_when_set() {
	let disabled = El::new("button").flag("disabled", true).into_element();
	let enabled = El::new("button").flag("disabled", false).into_element();

	assert!(disabled.has_attribute("disabled"));
	assert!(!enabled.has_attribute("disabled"));
}

#[wasm_bindgen_test]
fn listeners_registered_through_the_arena_fire() {
	let events = EventClosures::new();
	let clicks = Rc::new(Cell::new(0_u32));
	let el = {
		let clicks = Rc::clone(&clicks);
		El::new("button")
			.on(&events, "click", move |_| clicks.set(clicks.get() + 1))
			.into_element()
	};

	el.dispatch_event(&Event::new("click").unwrap_throw()).unwrap_throw();
	el.dispatch_event(&Event::new("click").unwrap_throw()).unwrap_throw();

	assert_eq!(clicks.get(), 2);
}
