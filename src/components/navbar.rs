use crate::api::User;
use crate::app::Ctx;
use crate::component::{hook, Component, ElSlot};
use crate::dom::{self, El, EventClosures};
use core::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::{closure::Closure, JsCast, UnwrapThrowExt};
use web_sys::{AddEventListenerOptions, Element, Event};

pub struct NavbarInner {
	ctx: Rc<Ctx>,
	dropdown_open: Cell<bool>,
	el: ElSlot,
	events: EventClosures,
	// Document-level once-listener closing the dropdown on an outside click. Kept out of
	// the render arena: it outlives the render that armed it.
	doc_close: RefCell<Option<Closure<dyn FnMut(Event)>>>,
}

/// Top navigation bar: logo, theme toggle and either auth links or the user menu.
/// Re-rendered by bootstrap on every `"user"` channel notification.
#[derive(Clone)]
pub struct Navbar(Rc<NavbarInner>);
impl Navbar {
	#[must_use]
	pub fn new(ctx: Rc<Ctx>) -> Self {
		Self(Rc::new(NavbarInner {
			ctx,
			dropdown_open: Cell::new(false),
			el: ElSlot::default(),
			events: EventClosures::new(),
			doc_close: RefCell::new(None),
		}))
	}

	fn render_theme_toggle(&self) -> El {
		El::new("button")
			.class("theme-toggle")
			.attr("title", "Toggle theme")
			.on(&self.0.events, "click", hook(self, |this, _| this.toggle_theme()))
			.text(if dom::theme_is_dark() { "☀️" } else { "🌙" })
	}

	fn toggle_theme(&self) {
		let theme = if dom::theme_is_dark() { "light" } else { "dark" };
		dom::apply_theme(theme);
		dom::storage_set(dom::THEME_KEY, theme);
		self.update();
	}

	fn render_user_menu(&self, user: &User) -> El {
		let username = user.username.clone();
		let dropdown = El::new("div")
			.class(if self.0.dropdown_open.get() { "dropdown open" } else { "dropdown" })
			.child(
				El::new("div")
					.class("navbar-user")
					.on(
						&self.0.events,
						"click",
						hook(self, |this, event| {
							event.stop_propagation();
							this.toggle_dropdown();
						}),
					)
					.child(El::new("div").class("navbar-avatar").text(&dom::initials(&username)))
					.child(El::new("span").class("navbar-username").text(&username)),
			)
			.child(
				El::new("div")
					.class("dropdown-menu")
					.child(
						El::new("button")
							.class("dropdown-item")
							.on(
								&self.0.events,
								"click",
								hook(self, move |this, _| {
									this.0.ctx.router.navigate(&format!("/users/{}", username));
									this.close_dropdown();
								}),
							)
							.text("👤 Profile"),
					)
					.child(El::new("div").class("dropdown-divider"))
					.child(
						El::new("button")
							.class("dropdown-item danger")
							.on(&self.0.events, "click", hook(self, |this, _| this.handle_logout()))
							.text("🚪 Log out"),
					),
			);
		self.arm_outside_close();
		dropdown
	}

	fn arm_outside_close(&self) {
		let document = dom::document();
		if let Some(old) = self.0.doc_close.borrow_mut().take() {
			document
				.remove_event_listener_with_callback("click", old.as_ref().unchecked_ref())
				.unwrap_throw();
		}
		let closure = Closure::wrap(Box::new(hook(self, |this: &Self, _: &Event| this.close_dropdown()))
			as Box<dyn FnMut(Event)>);
		let options = AddEventListenerOptions::new();
		options.set_once(true);
		document
			.add_event_listener_with_callback_and_add_event_listener_options(
				"click",
				closure.as_ref().unchecked_ref(),
				&options,
			)
			.unwrap_throw();
		*self.0.doc_close.borrow_mut() = Some(closure);
	}

	fn toggle_dropdown(&self) {
		self.0.dropdown_open.set(!self.0.dropdown_open.get());
		self.update();
	}

	fn close_dropdown(&self) {
		if self.0.dropdown_open.get() {
			self.0.dropdown_open.set(false);
			self.update();
		}
	}

	fn handle_logout(&self) {
		self.0.ctx.api.logout();
		self.0.ctx.store.set_user(None);
		self.0.ctx.router.navigate("/");
		self.close_dropdown();
	}
}

fn render_auth_buttons() -> El {
	El::new("div")
		.class("flex gap-sm")
		.child(El::new("a").class("btn btn-ghost btn-sm").attr("href", "#/login").text("Log in"))
		.child(
			El::new("a")
				.class("btn btn-primary btn-sm")
				.attr("href", "#/register")
				.text("Sign up"),
		)
}

impl Component for Navbar {
	type Inner = NavbarInner;

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
		let user = self.0.ctx.store.user();
		let el = El::new("nav")
			.class("navbar")
			.child(
				El::new("div")
					.class("navbar-content")
					.child(El::new("a").class("navbar-logo").attr("href", "#/").text("Quiply"))
					.child(
						El::new("div")
							.class("navbar-actions")
							.child(self.render_theme_toggle())
							.child(match &user {
								Some(user) => self.render_user_menu(user),
								None => render_auth_buttons(),
							}),
					),
			)
			.into_element();
		*self.0.el.borrow_mut() = Some(el.clone());
		el
	}
}
