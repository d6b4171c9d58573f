use crate::api::Quip;
use crate::app::Ctx;
use crate::component::{hook, Component, ElSlot};
use crate::components::{CreateQuip, QuipCard, SharedQuip};
use crate::dom::{self, El, EventClosures, ToastKind};
use crate::router::Params;
use async_trait::async_trait;
use core::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen_futures::spawn_local;
use web_sys::Element;

/// A full page from the gateway; fewer means there is nothing left to fetch.
const PAGE_SIZE: usize = 20;

pub struct FeedPageInner {
	ctx: Rc<Ctx>,
	quips: RefCell<Vec<SharedQuip>>,
	sort: RefCell<String>,
	page: Cell<u32>,
	loading: Cell<bool>,
	has_more: Cell<bool>,
	composer: RefCell<Option<CreateQuip>>,
	cards: RefCell<Vec<QuipCard>>,
	el: ElSlot,
	events: EventClosures,
}

/// The home feed: sortable quip list with paging and the composer on top.
#[derive(Clone)]
pub struct FeedPage(Rc<FeedPageInner>);
impl FeedPage {
	#[must_use]
	pub fn new(ctx: Rc<Ctx>) -> Self {
		Self(Rc::new(FeedPageInner {
			ctx,
			quips: RefCell::new(Vec::new()),
			sort: RefCell::new("smart".to_owned()),
			page: Cell::new(1),
			loading: Cell::new(true),
			has_more: Cell::new(true),
			composer: RefCell::new(None),
			cards: RefCell::new(Vec::new()),
			el: ElSlot::default(),
			events: EventClosures::new(),
		}))
	}

	async fn fetch_page(&self) {
		let sort = self.0.sort.borrow().clone();
		let page = self.0.page.get();
		match self.0.ctx.api.quips(&sort, page).await {
			Ok(quips) => {
				self.0.has_more.set(quips.len() >= PAGE_SIZE);
				let mut shared: Vec<SharedQuip> = quips.into_iter().map(|quip| Rc::new(RefCell::new(quip))).collect();
				let mut list = self.0.quips.borrow_mut();
				if page == 1 {
					*list = shared;
				} else {
					list.append(&mut shared);
				}
			}
			Err(err) => dom::toast(&err.to_string(), ToastKind::Error),
		}
		self.0.loading.set(false);
		self.update();
	}

	fn handle_sort(&self, sort: &str) {
		if *self.0.sort.borrow() == sort {
			return;
		}
		*self.0.sort.borrow_mut() = sort.to_owned();
		self.0.page.set(1);
		self.0.quips.borrow_mut().clear();
		self.0.loading.set(true);
		self.update();
		let this = self.clone();
		spawn_local(async move { this.fetch_page().await });
	}

	fn handle_more(&self) {
		self.0.page.set(self.0.page.get() + 1);
		self.0.loading.set(true);
		self.update();
		let this = self.clone();
		spawn_local(async move { this.fetch_page().await });
	}

	fn quip_created(&self, quip: Quip) {
		self.0.quips.borrow_mut().insert(0, Rc::new(RefCell::new(quip)));
		self.update();
	}

	fn quip_deleted(&self, id: u64) {
		// The card already removed its own subtree; only the backing list needs pruning.
		self.0.quips.borrow_mut().retain(|quip| quip.borrow().id != id);
	}

	fn render_sort_button(&self, value: &'static str, label: &str) -> El {
		let active = *self.0.sort.borrow() == value;
		El::new("button")
			.class(if active { "feed-sort-btn active" } else { "feed-sort-btn" })
			.on(&self.0.events, "click", hook(self, move |this, _| this.handle_sort(value)))
			.text(label)
	}

	fn render_header(&self) -> El {
		El::new("header")
			.class("feed-header")
			.child(El::new("h1").class("feed-title").text("Feed"))
			.child(
				El::new("div")
					.class("feed-sort")
					.child(self.render_sort_button("smart", "🔥 Smart"))
					.child(self.render_sort_button("new", "🕐 New")),
			)
	}
}

#[async_trait(?Send)]
impl Component for FeedPage {
	type Inner = FeedPageInner;

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
		*self.0.composer.borrow_mut() = None;

		let loading = self.0.loading.get();
		let quips = self.0.quips.borrow().clone();
		let mut list = El::new("div").class("feed-list");

		if self.0.ctx.store.is_authenticated() {
			let weak = Rc::downgrade(&self.0);
			let composer = CreateQuip::new(Rc::clone(&self.0.ctx), move |quip| {
				if let Some(inner) = weak.upgrade() {
					FeedPage(inner).quip_created(quip);
				}
			});
			list = list.append(&composer.render());
			*self.0.composer.borrow_mut() = Some(composer);
		}

		for quip in &quips {
			let weak = Rc::downgrade(&self.0);
			let card = QuipCard::new(Rc::clone(&self.0.ctx), Rc::clone(quip)).on_delete(move |id| {
				if let Some(inner) = weak.upgrade() {
					FeedPage(inner).quip_deleted(id);
				}
			});
			list = list.append(&card.render());
			self.0.cards.borrow_mut().push(card);
		}

		if loading {
			list = list.child(dom::spinner());
		}
		if !loading && quips.is_empty() {
			list = list.child(dom::empty_state(
				"✨",
				"No quips yet",
				Some("Be the first to share something witty!"),
			));
		}
		if !loading && self.0.has_more.get() {
			list = list.child(
				El::new("button")
					.class("btn btn-secondary")
					.attr("style", "width: 100%; margin-top: var(--spacing-md)")
					.on(&self.0.events, "click", hook(self, |this, _| this.handle_more()))
					.text("Load more"),
			);
		}

		let el = El::new("div")
			.class("feed-page")
			.child(self.render_header())
			.child(list)
			.into_element();
		*self.0.el.borrow_mut() = Some(el.clone());
		el
	}

	async fn load(&self, params: &Params) {
		*self.0.sort.borrow_mut() = params.get("sort").cloned().unwrap_or_else(|| "smart".to_owned());
		self.0.page.set(1);
		self.0.quips.borrow_mut().clear();
		self.0.has_more.set(true);
		self.0.loading.set(true);
		// The freshly attached subtree already shows the loading state; the first update
		// happens when the page arrives.
		self.fetch_page().await;
	}
}
