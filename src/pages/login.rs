use crate::api::{ApiError, User};
use crate::app::Ctx;
use crate::component::{hook, Component, ElSlot};
use crate::dom::{self, El, EventClosures, ToastKind};
use async_trait::async_trait;
use core::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Element, HtmlInputElement};

pub struct LoginPageInner {
	ctx: Rc<Ctx>,
	username: RefCell<String>,
	password: RefCell<String>,
	busy: Cell<bool>,
	error: RefCell<Option<String>>,
	el: ElSlot,
	events: EventClosures,
}

#[derive(Clone)]
pub struct LoginPage(Rc<LoginPageInner>);
impl LoginPage {
	#[must_use]
	pub fn new(ctx: Rc<Ctx>) -> Self {
		Self(Rc::new(LoginPageInner {
			ctx,
			username: RefCell::new(String::new()),
			password: RefCell::new(String::new()),
			busy: Cell::new(false),
			error: RefCell::new(None),
			el: ElSlot::default(),
			events: EventClosures::new(),
		}))
	}

	fn render_form(&self) -> El {
		El::new("form")
			.class("auth-form")
			.on(
				&self.0.events,
				"submit",
				hook(self, |this, event| {
					event.prevent_default();
					this.handle_submit();
				}),
			)
			.child_opt(
				self.0
					.error
					.borrow()
					.as_deref()
					.map(|error| El::new("div").class("form-error mb-md").text(error)),
			)
			.child(
				El::new("div")
					.class("form-group")
					.child(El::new("label").class("form-label").attr("for", "username").text("Username"))
					.child(
						El::new("input")
							.class("form-input")
							.attr("type", "text")
							.attr("id", "username")
							.attr("placeholder", "Enter your username")
							.flag("required", true)
							.value(&self.0.username.borrow())
							.on(
								&self.0.events,
								"input",
								hook(self, |this, event| {
									if let Some(input) = event.target().and_then(|target| target.dyn_into::<HtmlInputElement>().ok()) {
										*this.0.username.borrow_mut() = input.value();
									}
								}),
							),
					),
			)
			.child(
				El::new("div")
					.class("form-group")
					.child(El::new("label").class("form-label").attr("for", "password").text("Password"))
					.child(
						El::new("input")
							.class("form-input")
							.attr("type", "password")
							.attr("id", "password")
							.attr("placeholder", "Enter your password")
							.flag("required", true)
							.value(&self.0.password.borrow())
							.on(
								&self.0.events,
								"input",
								hook(self, |this, event| {
									if let Some(input) = event.target().and_then(|target| target.dyn_into::<HtmlInputElement>().ok()) {
										*this.0.password.borrow_mut() = input.value();
									}
								}),
							),
					),
			)
			.child(
				El::new("button")
					.class("btn btn-primary btn-lg")
					.attr("style", "width: 100%")
					.attr("type", "submit")
					.flag("disabled", self.0.busy.get())
					.text(if self.0.busy.get() { "Logging in..." } else { "Log in" }),
			)
	}

	fn handle_submit(&self) {
		let username = self.0.username.borrow().clone();
		let password = self.0.password.borrow().clone();
		if username.is_empty() || password.is_empty() {
			return;
		}
		self.0.busy.set(true);
		*self.0.error.borrow_mut() = None;
		self.update();

		let this = self.clone();
		spawn_local(async move {
			let result: Result<User, ApiError> = async {
				this.0.ctx.api.login(&username, &password).await?;
				this.0.ctx.api.me().await
			}
			.await;
			match result {
				Ok(user) => {
					this.0.ctx.store.set_user(Some(user));
					dom::toast("Welcome back!", ToastKind::Success);
					this.0.ctx.router.navigate("/");
				}
				Err(err) => *this.0.error.borrow_mut() = Some(err.to_string()),
			}
			this.0.busy.set(false);
			this.update();
		});
	}
}

#[async_trait(?Send)]
impl Component for LoginPage {
	type Inner = LoginPageInner;

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
			.class("auth-container")
			.child(
				El::new("div")
					.class("auth-card animate-fade-in")
					.child(
						El::new("div")
							.class("auth-header")
							.child(El::new("h1").class("auth-title").text("Welcome back"))
							.child(El::new("p").class("auth-subtitle").text("Log in to share your wit")),
					)
					.child(self.render_form())
					.child(
						El::new("div")
							.class("auth-footer")
							.text("Don't have an account? ")
							.child(El::new("a").attr("href", "#/register").text("Sign up")),
					),
			)
			.into_element();
		*self.0.el.borrow_mut() = Some(el.clone());
		el
	}
}
