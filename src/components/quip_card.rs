use crate::api::Quip;
use crate::app::Ctx;
use crate::component::{hook, Component, ElSlot};
use crate::dom::{self, El, EventClosures, ToastKind};
use crate::mutate;
use core::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Element, Event};

/// A quip shared between a page's list and the cards rendering it, so a reaction's
/// in-place counter adjustment survives the page re-rendering its list.
pub type SharedQuip = Rc<RefCell<Quip>>;

pub struct QuipCardInner {
	ctx: Rc<Ctx>,
	quip: SharedQuip,
	on_delete: RefCell<Option<Rc<dyn Fn(u64)>>>,
	el: ElSlot,
	events: EventClosures,
}

/// One quip: header, content, optional definition/usage blocks and the reaction row.
#[derive(Clone)]
pub struct QuipCard(Rc<QuipCardInner>);
impl QuipCard {
	#[must_use]
	pub fn new(ctx: Rc<Ctx>, quip: SharedQuip) -> Self {
		Self(Rc::new(QuipCardInner {
			ctx,
			quip,
			on_delete: RefCell::new(None),
			el: ElSlot::default(),
			events: EventClosures::new(),
		}))
	}

	/// Notified with the quip id after a successful delete, so the owning list can forget it.
	#[must_use]
	pub fn on_delete(self, callback: impl Fn(u64) + 'static) -> Self {
		*self.0.on_delete.borrow_mut() = Some(Rc::new(callback));
		self
	}

	fn is_owner(&self, quip: &Quip) -> bool {
		match (self.0.ctx.store.user().and_then(|user| user.id), quip.user_id) {
			(Some(me), Some(owner)) => me == owner,
			_ => false,
		}
	}

	fn render_header(&self, quip: &Quip) -> El {
		let username = quip.author_name().to_owned();
		El::new("header")
			.class("quip-header")
			.child(El::new("div").class("quip-avatar").text(&dom::initials(&username)))
			.child(
				El::new("div")
					.class("quip-meta")
					.child(
						El::new("a")
							.class("quip-author")
							.attr("href", &format!("#/users/{}", username))
							.text(&username),
					)
					.child(El::new("div").class("quip-time").text(&dom::format_time(&quip.created_at))),
			)
			.child_opt(if self.is_owner(quip) {
				Some(
					El::new("button")
						.class("quip-delete-btn")
						.attr("title", "Delete quip")
						.on(
							&self.0.events,
							"click",
							hook(self, |this, event| {
								event.stop_propagation();
								this.handle_delete();
							}),
						)
						.text("🗑️"),
				)
			} else {
				None
			})
	}

	fn render_actions(&self, quip: &Quip) -> El {
		let id = quip.id;
		El::new("footer")
			.class("quip-actions")
			.child(self.render_action(
				if quip.is_upped { "❤️" } else { "🤍" },
				quip.ups_count,
				quip.is_upped,
				hook(self, |this, _| this.handle_up()),
			))
			.child(self.render_action(
				"💬",
				quip.comments_count,
				false,
				hook(self, move |this, _| {
					this.0.ctx.router.navigate(&format!("/quips/{}", id));
				}),
			))
			.child(self.render_action(
				if quip.is_reposted { "✅" } else { "🔄" },
				quip.reposts_count,
				quip.is_reposted,
				hook(self, |this, _| this.handle_repost()),
			))
	}

	fn render_action(&self, icon: &str, count: u32, active: bool, handler: impl FnMut(Event) + 'static) -> El {
		let action = El::new("button")
			.class(if active { "quip-action active" } else { "quip-action" })
			.on(&self.0.events, "click", handler)
			.child(El::new("span").class("quip-action-icon").text(icon));
		if count > 0 {
			action.child(El::new("span").text(&count.to_string()))
		} else {
			action
		}
	}

	fn handle_up(&self) {
		if !self.0.ctx.require_auth() {
			return;
		}
		let (id, activated) = {
			let mut quip = self.0.quip.borrow_mut();
			let quip = &mut *quip;
			mutate::flip(&mut quip.is_upped, &mut quip.ups_count);
			(quip.id, quip.is_upped)
		};
		self.update();
		let ctx = Rc::clone(&self.0.ctx);
		spawn_local(async move {
			mutate::settle(if activated {
				ctx.api.up_quip(id).await
			} else {
				ctx.api.remove_up_quip(id).await
			});
		});
	}

	fn handle_repost(&self) {
		if !self.0.ctx.require_auth() {
			return;
		}
		let (id, activated) = {
			let mut quip = self.0.quip.borrow_mut();
			let quip = &mut *quip;
			mutate::flip(&mut quip.is_reposted, &mut quip.reposts_count);
			(quip.id, quip.is_reposted)
		};
		self.update();
		let ctx = Rc::clone(&self.0.ctx);
		spawn_local(async move {
			let result = if activated {
				ctx.api.repost_quip(id).await
			} else {
				ctx.api.remove_repost_quip(id).await
			};
			if mutate::settle(result) {
				dom::toast(if activated { "Reposted!" } else { "Repost removed" }, ToastKind::Success);
			}
		});
	}

	fn handle_delete(&self) {
		if !dom::confirm("Are you sure you want to delete this quip?") {
			return;
		}
		let id = self.0.quip.borrow().id;
		let this = self.clone();
		spawn_local(async move {
			match this.0.ctx.api.delete_quip(id).await {
				Ok(()) => {
					dom::toast("Quip deleted", ToastKind::Success);
					if let Some(el) = this.0.el.borrow().clone() {
						el.remove();
					}
					let callback = this.0.on_delete.borrow().clone();
					if let Some(callback) = callback {
						callback(id);
					}
				}
				Err(err) => dom::toast(&err.to_string(), ToastKind::Error),
			}
		});
	}
}

fn render_definition(text: &str) -> El {
	El::new("div")
		.class("quip-definition")
		.child(El::new("div").class("quip-definition-label").text("Definition"))
		.child(El::new("div").class("quip-definition-text").text(text))
}

fn render_usage(text: &str) -> El {
	El::new("div")
		.class("quip-examples")
		.child(El::new("div").class("quip-examples-label").text("Usage"))
		.child(El::new("div").class("quip-examples-text").text(text))
}

impl Component for QuipCard {
	type Inner = QuipCardInner;

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
		let quip = self.0.quip.borrow().clone();
		let el = El::new("article")
			.class("quip-card animate-fade-in")
			.child(self.render_header(&quip))
			.child(El::new("div").class("quip-content").text(&quip.content))
			.child_opt(quip.definition.as_deref().map(render_definition))
			.child_opt(quip.usage_examples.as_deref().map(render_usage))
			.child(self.render_actions(&quip))
			.into_element();
		*self.0.el.borrow_mut() = Some(el.clone());
		el
	}
}
