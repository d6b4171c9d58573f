use crate::api::Quip;
use crate::app::Ctx;
use crate::component::{hook, Component, ElSlot};
use crate::dom::{self, El, EventClosures, ToastKind};
use core::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::{JsCast, UnwrapThrowExt};
use wasm_bindgen_futures::spawn_local;
use web_sys::{Element, HtmlInputElement, HtmlTextAreaElement};

const MAX_CONTENT_LENGTH: usize = 1000;
const MAX_DEFINITION_LENGTH: usize = 500;
const MAX_EXAMPLES_LENGTH: usize = 1000;

pub struct CreateQuipInner {
	ctx: Rc<Ctx>,
	on_created: Rc<dyn Fn(Quip)>,
	content: RefCell<String>,
	definition: RefCell<String>,
	examples: RefCell<String>,
	show_extras: Cell<bool>,
	busy: Cell<bool>,
	el: ElSlot,
	events: EventClosures,
}

/// Quip composer shown at the top of the feed for authenticated users.
#[derive(Clone)]
pub struct CreateQuip(Rc<CreateQuipInner>);
impl CreateQuip {
	pub fn new(ctx: Rc<Ctx>, on_created: impl Fn(Quip) + 'static) -> Self {
		Self(Rc::new(CreateQuipInner {
			ctx,
			on_created: Rc::new(on_created),
			content: RefCell::new(String::new()),
			definition: RefCell::new(String::new()),
			examples: RefCell::new(String::new()),
			show_extras: Cell::new(false),
			busy: Cell::new(false),
			el: ElSlot::default(),
			events: EventClosures::new(),
		}))
	}

	#[allow(clippy::cast_possible_wrap)]
	fn remaining(&self) -> i64 {
		MAX_CONTENT_LENGTH as i64 - self.0.content.borrow().chars().count() as i64
	}

	fn counter_class(remaining: i64) -> &'static str {
		if remaining < 0 {
			"create-quip-counter error"
		} else if remaining < 20 {
			"create-quip-counter warning"
		} else {
			"create-quip-counter"
		}
	}

	fn submit_blocked(&self) -> bool {
		self.0.busy.get() || self.0.content.borrow().trim().is_empty() || self.remaining() < 0
	}

	fn render_extras(&self) -> El {
		let toggle = El::new("label")
			.class("create-quip-toggle")
			.on(
				&self.0.events,
				"click",
				hook(self, |this, _| {
					this.0.show_extras.set(!this.0.show_extras.get());
					this.update();
				}),
			)
			.child(El::new("span").text(if self.0.show_extras.get() { "▼" } else { "▶" }))
			.child(El::new("span").text("Add definition & examples"));

		let fields = if self.0.show_extras.get() {
			let definition = self.0.definition.borrow().clone();
			let examples = self.0.examples.borrow().clone();
			Some(
				El::new("div")
					.class("flex flex-col gap-md")
					.child(
						El::new("div")
							.class("flex flex-col gap-sm")
							.child(
								El::new("input")
									.class("form-input")
									.attr("type", "text")
									.attr("placeholder", "Definition (optional)")
									.attr("maxlength", &MAX_DEFINITION_LENGTH.to_string())
									.value(&definition)
									.on(
										&self.0.events,
										"input",
										hook(self, |this, event| {
											if let Some(input) =
												event.target().and_then(|target| target.dyn_into::<HtmlInputElement>().ok())
											{
												*this.0.definition.borrow_mut() = input.value();
											}
										}),
									),
							)
							.child(El::new("div").class("text-secondary text-sm").text(&format!(
								"{} characters remaining",
								MAX_DEFINITION_LENGTH.saturating_sub(definition.chars().count())
							))),
					)
					.child(
						El::new("div")
							.class("flex flex-col gap-sm")
							.child(
								El::new("input")
									.class("form-input")
									.attr("type", "text")
									.attr("placeholder", "Usage example (optional)")
									.attr("maxlength", &MAX_EXAMPLES_LENGTH.to_string())
									.value(&examples)
									.on(
										&self.0.events,
										"input",
										hook(self, |this, event| {
											if let Some(input) =
												event.target().and_then(|target| target.dyn_into::<HtmlInputElement>().ok())
											{
												*this.0.examples.borrow_mut() = input.value();
											}
										}),
									),
							)
							.child(El::new("div").class("text-secondary text-sm").text(&format!(
								"{} characters remaining",
								MAX_EXAMPLES_LENGTH.saturating_sub(examples.chars().count())
							))),
					),
			)
		} else {
			None
		};

		El::new("div").class("create-quip-extras").child(toggle).child_opt(fields)
	}

	/// Counter and submit button track keystrokes directly; the full subtree is only
	/// rebuilt on structural changes.
	fn refresh_counter(&self) {
		let el = match self.0.el.borrow().clone() {
			Some(el) => el,
			None => return,
		};
		let remaining = self.remaining();
		if let Some(counter) = el.query_selector(".create-quip-counter").unwrap_throw() {
			counter.set_text_content(Some(&remaining.to_string()));
			counter.set_class_name(Self::counter_class(remaining));
		}
		if let Some(button) = el.query_selector(".btn-primary").unwrap_throw() {
			if self.submit_blocked() {
				button.set_attribute("disabled", "").unwrap_throw();
			} else {
				button.remove_attribute("disabled").unwrap_throw();
			}
		}
	}

	fn handle_submit(&self) {
		if self.0.content.borrow().trim().is_empty() || self.0.busy.get() {
			return;
		}
		self.0.busy.set(true);
		self.update();

		let this = self.clone();
		spawn_local(async move {
			let content = this.0.content.borrow().trim().to_owned();
			let definition = this.0.definition.borrow().trim().to_owned();
			let examples = this.0.examples.borrow().trim().to_owned();
			let result = this
				.0
				.ctx
				.api
				.create_quip(
					&content,
					Some(definition.as_str()).filter(|definition| !definition.is_empty()),
					Some(examples.as_str()).filter(|examples| !examples.is_empty()),
				)
				.await;
			match result {
				Ok(quip) => {
					this.0.content.borrow_mut().clear();
					this.0.definition.borrow_mut().clear();
					this.0.examples.borrow_mut().clear();
					this.0.show_extras.set(false);
					dom::toast("Quip posted!", ToastKind::Success);
					(this.0.on_created)(quip);
				}
				Err(err) => dom::toast(&err.to_string(), ToastKind::Error),
			}
			this.0.busy.set(false);
			this.update();
		});
	}
}

impl Component for CreateQuip {
	type Inner = CreateQuipInner;

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
		if !self.0.ctx.store.is_authenticated() {
			let el = El::new("div").into_element();
			*self.0.el.borrow_mut() = Some(el.clone());
			return el;
		}
		let username = self.0.ctx.store.user().map(|user| user.username).unwrap_or_default();
		let content = self.0.content.borrow().clone();
		let remaining = self.remaining();

		let el = El::new("div")
			.class("create-quip")
			.child(
				El::new("div")
					.class("create-quip-header")
					.child(El::new("div").class("create-quip-avatar").text(&dom::initials(&username)))
					.child(
						El::new("span")
							.class("text-secondary")
							.text(&format!("What's your quip, {}?", username)),
					),
			)
			.child(
				El::new("textarea")
					.class("create-quip-input form-textarea")
					.attr("placeholder", "Share a witty phrase, idiom, or quip...")
					.attr("maxlength", &MAX_CONTENT_LENGTH.to_string())
					.value(&content)
					.on(
						&self.0.events,
						"input",
						hook(self, |this, event| {
							if let Some(area) = event.target().and_then(|target| target.dyn_into::<HtmlTextAreaElement>().ok()) {
								*this.0.content.borrow_mut() = area.value();
								this.refresh_counter();
							}
						}),
					),
			)
			.child(self.render_extras())
			.child(
				El::new("div")
					.class("create-quip-footer")
					.child(El::new("span").class(Self::counter_class(remaining)).text(&remaining.to_string()))
					.child(
						El::new("button")
							.class("btn btn-primary")
							.flag("disabled", self.submit_blocked())
							.on(&self.0.events, "click", hook(self, |this, _| this.handle_submit()))
							.text(if self.0.busy.get() { "Posting..." } else { "Quip it!" }),
					),
			)
			.into_element();
		*self.0.el.borrow_mut() = Some(el.clone());
		el
	}
}
