use super::report_fetch_error;
use crate::app::Ctx;
use crate::component::{Component, ElSlot};
use crate::components::{CommentsSection, QuipCard, SharedQuip};
use crate::dom::{self, El, EventClosures};
use crate::router::Params;
use async_trait::async_trait;
use core::cell::{Cell, RefCell};
use std::rc::Rc;
use tracing::warn;
use wasm_bindgen_futures::spawn_local;
use web_sys::Element;

pub struct QuipDetailPageInner {
	ctx: Rc<Ctx>,
	quip: RefCell<Option<SharedQuip>>,
	loading: Cell<bool>,
	card: RefCell<Option<QuipCard>>,
	comments: RefCell<Option<CommentsSection>>,
	el: ElSlot,
	events: EventClosures,
}

/// A single quip with its comment thread. A quip that cannot be fetched renders as an
/// in-page not-found state.
#[derive(Clone)]
pub struct QuipDetailPage(Rc<QuipDetailPageInner>);
impl QuipDetailPage {
	#[must_use]
	pub fn new(ctx: Rc<Ctx>) -> Self {
		Self(Rc::new(QuipDetailPageInner {
			ctx,
			quip: RefCell::new(None),
			loading: Cell::new(true),
			card: RefCell::new(None),
			comments: RefCell::new(None),
			el: ElSlot::default(),
			events: EventClosures::new(),
		}))
	}

	fn render_quip(&self, quip: &SharedQuip) -> El {
		let card = QuipCard::new(Rc::clone(&self.0.ctx), Rc::clone(quip));
		let body = El::new("div").append(&card.render());
		*self.0.card.borrow_mut() = Some(card);

		let mut comments_card = El::new("div").class("card mt-lg");
		if let Some(section) = &*self.0.comments.borrow() {
			comments_card = comments_card.append(&section.render());
		}
		body.child(comments_card)
	}
}

#[async_trait(?Send)]
impl Component for QuipDetailPage {
	type Inner = QuipDetailPageInner;

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
		*self.0.card.borrow_mut() = None;

		let quip = self.0.quip.borrow().clone();
		let body = if self.0.loading.get() {
			dom::spinner()
		} else if let Some(quip) = &quip {
			self.render_quip(quip)
		} else {
			dom::empty_state("🔍", "Quip not found", Some("This quip may have been deleted."))
		};

		let el = El::new("div")
			.class("quip-detail-page content-wrapper")
			.child(El::new("a").attr("href", "#/").class("btn btn-ghost mb-lg").text("← Back to feed"))
			.child(body)
			.into_element();
		*self.0.el.borrow_mut() = Some(el.clone());
		el
	}

	async fn load(&self, params: &Params) {
		self.0.loading.set(true);
		self.update();

		match params.get("id").and_then(|id| id.parse::<u64>().ok()) {
			Some(id) => match self.0.ctx.api.quip(id).await {
				Ok(quip) => {
					*self.0.quip.borrow_mut() = Some(Rc::new(RefCell::new(quip)));
					let section = CommentsSection::new(Rc::clone(&self.0.ctx), id);
					// The thread loads without blocking the page.
					let fetching = section.clone();
					spawn_local(async move { fetching.fetch().await });
					*self.0.comments.borrow_mut() = Some(section);
				}
				Err(err) => report_fetch_error(&err),
			},
			None => warn!("non-numeric quip id in route"),
		}

		self.0.loading.set(false);
		self.update();
	}
}
