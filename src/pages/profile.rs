use super::report_fetch_error;
use crate::api::User;
use crate::app::Ctx;
use crate::component::{hook, Component, ElSlot};
use crate::components::{QuipCard, SharedQuip};
use crate::dom::{self, El, EventClosures};
use crate::router::Params;
use async_trait::async_trait;
use core::cell::{Cell, RefCell};
use futures::try_join;
use std::rc::Rc;
use web_sys::Element;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Tab {
	Quips,
	Reposts,
}

pub struct ProfilePageInner {
	ctx: Rc<Ctx>,
	user: RefCell<Option<User>>,
	quips: RefCell<Vec<SharedQuip>>,
	reposts: RefCell<Vec<SharedQuip>>,
	active_tab: Cell<Tab>,
	loading: Cell<bool>,
	cards: RefCell<Vec<QuipCard>>,
	el: ElSlot,
	events: EventClosures,
}

/// A user's profile: stat header plus their quips and reposts behind tabs. The snapshot is
/// re-fetched on every visit.
#[derive(Clone)]
pub struct ProfilePage(Rc<ProfilePageInner>);
impl ProfilePage {
	#[must_use]
	pub fn new(ctx: Rc<Ctx>) -> Self {
		Self(Rc::new(ProfilePageInner {
			ctx,
			user: RefCell::new(None),
			quips: RefCell::new(Vec::new()),
			reposts: RefCell::new(Vec::new()),
			active_tab: Cell::new(Tab::Quips),
			loading: Cell::new(true),
			cards: RefCell::new(Vec::new()),
			el: ElSlot::default(),
			events: EventClosures::new(),
		}))
	}

	fn render_stat(value: u32, label: &str) -> El {
		El::new("div")
			.class("profile-stat")
			.child(El::new("div").class("profile-stat-value").text(&value.to_string()))
			.child(El::new("div").class("profile-stat-label").text(label))
	}

	fn render_header(&self, user: &User) -> El {
		let stats = user.stats.clone().unwrap_or_default();
		El::new("header")
			.class("profile-header")
			.child(El::new("div").class("profile-avatar").text(&dom::initials(&user.username)))
			.child(El::new("h1").class("profile-username").text(&format!("@{}", user.username)))
			.child_opt(
				user.bio
					.as_deref()
					.map(|bio| El::new("p").class("profile-bio").text(bio)),
			)
			.child(
				El::new("div")
					.class("profile-stats")
					.child(Self::render_stat(stats.total_quips, "Quips"))
					.child(Self::render_stat(stats.total_ups, "Ups"))
					.child(Self::render_stat(stats.total_reposts, "Re-quipped")),
			)
	}

	fn render_tab(&self, tab: Tab, label: &str) -> El {
		let active = self.0.active_tab.get() == tab;
		El::new("button")
			.class(if active { "profile-tab active" } else { "profile-tab" })
			.on(
				&self.0.events,
				"click",
				hook(self, move |this, _| {
					this.0.active_tab.set(tab);
					this.update();
				}),
			)
			.text(label)
	}

	fn render_tabs(&self) -> El {
		El::new("div")
			.class("profile-tabs")
			.child(self.render_tab(Tab::Quips, &format!("Quips ({})", self.0.quips.borrow().len())))
			.child(self.render_tab(Tab::Reposts, &format!("Reposts ({})", self.0.reposts.borrow().len())))
	}

	fn render_content(&self) -> El {
		let items = match self.0.active_tab.get() {
			Tab::Quips => self.0.quips.borrow().clone(),
			Tab::Reposts => self.0.reposts.borrow().clone(),
		};
		if items.is_empty() {
			let title = match self.0.active_tab.get() {
				Tab::Quips => "No quips yet",
				Tab::Reposts => "No reposts yet",
			};
			return dom::empty_state("📝", title, None);
		}
		let mut list = El::new("div").class("feed-list");
		for quip in &items {
			let card = QuipCard::new(Rc::clone(&self.0.ctx), Rc::clone(quip));
			list = list.append(&card.render());
			self.0.cards.borrow_mut().push(card);
		}
		list
	}

	fn render_profile(&self, user: &User) -> El {
		El::new("div")
			.child(self.render_header(user))
			.child(self.render_tabs())
			.child(self.render_content())
	}
}

#[async_trait(?Send)]
impl Component for ProfilePage {
	type Inner = ProfilePageInner;

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
		self.0.cards.borrow_mut().clear();

		let user = self.0.user.borrow().clone();
		let body = if self.0.loading.get() {
			dom::spinner()
		} else if let Some(user) = &user {
			self.render_profile(user)
		} else {
			dom::empty_state("👤", "User not found", Some("This user doesn't exist."))
		};

		let el = El::new("div").class("profile-page").child(body).into_element();
		*self.0.el.borrow_mut() = Some(el.clone());
		el
	}

	async fn load(&self, params: &Params) {
		self.0.loading.set(true);
		self.update();

		let username = params.get("username").cloned().unwrap_or_default();
		let api = &self.0.ctx.api;
		match try_join!(api.user(&username), api.user_quips(&username), api.user_reposts(&username)) {
			Ok((user, quips, reposts)) => {
				*self.0.user.borrow_mut() = Some(user);
				*self.0.quips.borrow_mut() = quips.into_iter().map(|quip| Rc::new(RefCell::new(quip))).collect();
				*self.0.reposts.borrow_mut() = reposts.into_iter().map(|quip| Rc::new(RefCell::new(quip))).collect();
			}
			Err(err) => report_fetch_error(&err),
		}

		self.0.loading.set(false);
		self.update();
	}
}
