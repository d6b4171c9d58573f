#![cfg(target_arch = "wasm32")]

use quiply_web::component::{Component, ElSlot};
use quiply_web::dom::{El, EventClosures};
use std::cell::Cell;
use std::rc::Rc;
use wasm_bindgen::UnwrapThrowExt;
use wasm_bindgen_test::{wasm_bindgen_test, wasm_bindgen_test_configure};
use web_sys::Element;

wasm_bindgen_test_configure!(run_in_browser);

struct ProbeInner {
	count: Cell<u32>,
	el: ElSlot,
	events: EventClosures,
}

#[derive(Clone)]
struct Probe(Rc<ProbeInner>);
impl Probe {
	fn new() -> Self {
		Self(Rc::new(ProbeInner {
			count: Cell::new(0),
			el: ElSlot::default(),
			events: EventClosures::new(),
		}))
	}
}
impl Component for Probe {
	type Inner = ProbeInner;

	fn from_inner(inner: Rc<Self::Inner>) -> Self {
		Self(inner)
	}

	fn inner(&self) -> &Rc<Self::Inner> {
		&self.0
	}

	fn el(&self) -> &ElSlot {
		&self.0.el
	}

	fn events(&self) -> &EventClosures {
		&self.0.events
	}

	fn render(&self) -> Element {
		self.0.events.reset();
		let el = El::new("div")
			.class("probe")
			.text(&self.0.count.get().to_string())
			.into_element();
		*self.0.el.borrow_mut() = Some(el.clone());
		el
	}
}

fn body() -> web_sys::HtmlElement {
	let body = web_sys::window()
		.unwrap_throw()
		.document()
		.unwrap_throw()
		.body()
		.unwrap_throw();
	body.set_inner_html("");
	body
}

#[wasm_bindgen_test]
fn update_replaces_the_attached_subtree_in_place() {
	let body = body();
	let probe = Probe::new();
	body.append_child(&probe.render()).unwrap_throw();

	probe.0.count.set(3);
	probe.update();

	assert_eq!(body.child_element_count(), 1);
	let shown = body
		.query_selector(".probe")
		.unwrap_throw()
		.expect_throw("probe should be attached");
	assert_eq!(shown.text_content().unwrap_throw(), "3");
}

#[wasm_bindgen_test]
fn update_before_any_render_does_nothing() {
	let probe = Probe::new();
	probe.update();
	assert!(probe.0.el.borrow().is_none());
}

#[wasm_bindgen_test]
fn update_on_a_never_attached_subtree_is_a_no_op() {
	let body = body();
	let probe = Probe::new();
	let _detached = probe.render();

	probe.update();

	assert_eq!(body.child_element_count(), 0);
}

#[wasm_bindgen_test]
fn update_after_removal_is_a_no_op() {
	let body = body();
	let probe = Probe::new();
	let el = probe.render();
	body.append_child(&el).unwrap_throw();
	el.remove();

	// A stale async callback firing after navigation lands here.
	probe.0.count.set(9);
	probe.update();

	assert_eq!(body.child_element_count(), 0);
}
