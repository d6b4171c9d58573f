use crate::dom::EventClosures;
use crate::router::Params;
use async_trait::async_trait;
use core::cell::RefCell;
use std::rc::Rc;
use tracing::trace;
use wasm_bindgen::UnwrapThrowExt;
use web_sys::{Element, Event};

/// Slot holding a component's currently attached subtree, if any.
pub type ElSlot = RefCell<Option<Element>>;

/// Uniform lifecycle of every page and interactive widget.
///
/// A component is a cheap-clone handle around [`Rc`]-shared state. `render` builds a
/// brand-new detached subtree for the current internal state and may run any number of
/// times; `load` runs once per navigation to pull remote data in, re-rendering when done;
/// `update` swaps the previously attached subtree for a fresh render *in place*.
///
/// There is no cancellation anywhere in the client: an async callback from a page the user
/// already left simply finds its subtree detached and `update` degrades to a no-op. That
/// single rule is what makes stale futures safe.
///
/// Composition: a parent's `render` embeds child subtrees via their own `render`, and a
/// child's `update` only ever replaces the child's subtree, never the parent's.
#[async_trait(?Send)]
pub trait Component: Clone + Sized + 'static {
	type Inner;

	fn from_inner(inner: Rc<Self::Inner>) -> Self;
	fn inner(&self) -> &Rc<Self::Inner>;

	fn el(&self) -> &ElSlot;
	fn events(&self) -> &EventClosures;

	fn render(&self) -> Element;

	async fn load(&self, _params: &Params) {}

	fn update(&self) {
		let old = self.el().borrow().clone();
		let old = match old {
			Some(old) => old,
			None => return,
		};
		let parent = match old.parent_node() {
			Some(parent) => parent,
			None => {
				trace!("update on a detached subtree, skipping");
				return;
			}
		};
		let new = self.render();
		parent.replace_child(&new, &old).unwrap_throw();
	}
}

/// Wraps a component method as a DOM event handler.
///
/// The closure captures the component weakly; events that race a component's teardown are
/// dropped instead of resurrecting it.
pub fn hook<C: Component>(component: &C, action: impl Fn(&C, &Event) + 'static) -> impl FnMut(Event) + 'static {
	let weak = Rc::downgrade(component.inner());
	move |event: Event| match weak.upgrade() {
		Some(inner) => action(&C::from_inner(inner), &event),
		None => trace!("event for a dropped component, ignoring"),
	}
}
