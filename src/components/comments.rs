use crate::api::Comment;
use crate::app::Ctx;
use crate::component::{hook, Component, ElSlot};
use crate::dom::{self, El, EventClosures, ToastKind};
use crate::{mutate, tree};
use core::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::{JsCast, UnwrapThrowExt};
use wasm_bindgen_futures::spawn_local;
use web_sys::{Element, HtmlTextAreaElement};

const MAX_COMMENT_LENGTH: usize = 1000;
/// Nesting depth past which the Reply affordance disappears. Deeper chains still render
/// fully nested.
const MAX_REPLY_DEPTH: usize = 3;

pub struct CommentsSectionInner {
	ctx: Rc<Ctx>,
	quip_id: u64,
	comments: RefCell<Vec<Comment>>,
	loading: Cell<bool>,
	reply_to: Cell<Option<u64>>,
	draft: RefCell<String>,
	el: ElSlot,
	events: EventClosures,
}

/// Threaded comments under a quip: list, per-comment up-votes and the reply form.
#[derive(Clone)]
pub struct CommentsSection(Rc<CommentsSectionInner>);
impl CommentsSection {
	#[must_use]
	pub fn new(ctx: Rc<Ctx>, quip_id: u64) -> Self {
		Self(Rc::new(CommentsSectionInner {
			ctx,
			quip_id,
			comments: RefCell::new(Vec::new()),
			loading: Cell::new(true),
			reply_to: Cell::new(None),
			draft: RefCell::new(String::new()),
			el: ElSlot::default(),
			events: EventClosures::new(),
		}))
	}

	pub async fn fetch(&self) {
		match self.0.ctx.api.comments(self.0.quip_id).await {
			Ok(comments) => *self.0.comments.borrow_mut() = comments,
			Err(err) => dom::toast(&err.to_string(), ToastKind::Error),
		}
		self.0.loading.set(false);
		self.update();
	}

	fn render_comment(&self, comment: &Comment, depth: usize) -> El {
		let username = comment.author_name().to_owned();
		let id = comment.id;
		let actions = El::new("div")
			.class("comment-actions")
			.child(
				El::new("button")
					.class("comment-action")
					.on(&self.0.events, "click", hook(self, move |this, _| this.handle_up(id)))
					.text(if comment.is_upped { "❤️" } else { "🤍" })
					.text(&format!(" {}", comment.ups_count)),
			)
			.child_opt(if depth < MAX_REPLY_DEPTH {
				Some(
					El::new("button")
						.class("comment-action")
						.on(&self.0.events, "click", hook(self, move |this, _| this.set_reply(id)))
						.text("Reply"),
				)
			} else {
				None
			});

		let mut body = El::new("div")
			.class("comment-body")
			.child(
				El::new("div")
					.class("comment-header")
					.child(El::new("span").class("comment-author").text(&username))
					.child(El::new("span").class("comment-time").text(&dom::format_time(&comment.created_at))),
			)
			.child(El::new("div").class("comment-content").text(&comment.content))
			.child(actions);
		if let Some(replies) = &comment.replies {
			if !replies.is_empty() {
				let mut list = El::new("div").class("comment-replies");
				for reply in replies {
					list = list.child(self.render_comment(reply, depth + 1));
				}
				body = body.child(list);
			}
		}

		El::new("div")
			.class("comment")
			.child(El::new("div").class("comment-avatar").text(&dom::initials(&username)))
			.child(body)
	}

	fn render_form(&self) -> El {
		if !self.0.ctx.store.is_authenticated() {
			return El::new("div").class("comment-form").child(
				El::new("p")
					.class("text-secondary text-center")
					.text("Please ")
					.child(El::new("a").attr("href", "#/login").text("log in"))
					.text(" to comment."),
			);
		}
		let username = self.0.ctx.store.user().map(|user| user.username).unwrap_or_default();
		let draft = self.0.draft.borrow().clone();
		let remaining = MAX_COMMENT_LENGTH.saturating_sub(draft.chars().count());

		let banner = self.0.reply_to.get().map(|_| {
			El::new("div")
				.class("text-secondary text-sm flex items-center gap-sm")
				.text("Replying to comment")
				.child(
					El::new("button")
						.class("btn btn-ghost btn-sm")
						.attr("type", "button")
						.on(&self.0.events, "click", hook(self, |this, _| this.clear_reply()))
						.text("✕"),
				)
		});

		let textarea = El::new("textarea")
			.class("comment-form-input")
			.attr("placeholder", "Write a comment...")
			.attr("rows", "2")
			.attr("maxlength", &MAX_COMMENT_LENGTH.to_string())
			.value(&draft)
			.on(
				&self.0.events,
				"input",
				hook(self, |this, event| {
					if let Some(area) = event.target().and_then(|target| target.dyn_into::<HtmlTextAreaElement>().ok()) {
						*this.0.draft.borrow_mut() = area.value();
						this.refresh_budget();
					}
				}),
			);

		El::new("form")
			.class("comment-form")
			.on(
				&self.0.events,
				"submit",
				hook(self, |this, event| {
					event.prevent_default();
					this.handle_submit();
				}),
			)
			.child(El::new("div").class("comment-avatar").text(&dom::initials(&username)))
			.child(
				El::new("div")
					.class("flex-1 flex flex-col gap-sm")
					.child_opt(banner)
					.child(
						El::new("div")
							.class("flex flex-col gap-sm")
							.child(textarea)
							.child(
								El::new("div")
									.class("comment-form-count text-secondary text-sm text-right")
									.text(&format!("{} characters remaining", remaining)),
							),
					),
			)
			.child(
				El::new("button")
					.class("btn btn-primary btn-sm")
					.attr("type", "submit")
					.flag("disabled", draft.trim().is_empty())
					.text("Post"),
			)
	}

	/// Keeps the remaining-character label and submit button in step with the draft
	/// without rebuilding the whole subtree on every keystroke.
	fn refresh_budget(&self) {
		let el = match self.0.el.borrow().clone() {
			Some(el) => el,
			None => return,
		};
		let remaining = MAX_COMMENT_LENGTH.saturating_sub(self.0.draft.borrow().chars().count());
		if let Some(label) = el.query_selector(".comment-form-count").unwrap_throw() {
			label.set_text_content(Some(&format!("{} characters remaining", remaining)));
		}
		if let Some(button) = el.query_selector(".btn-primary").unwrap_throw() {
			if self.0.draft.borrow().trim().is_empty() {
				button.set_attribute("disabled", "").unwrap_throw();
			} else {
				button.remove_attribute("disabled").unwrap_throw();
			}
		}
	}

	fn set_reply(&self, id: u64) {
		self.0.reply_to.set(Some(id));
		self.update();
	}

	fn clear_reply(&self) {
		self.0.reply_to.set(None);
		self.update();
	}

	fn handle_up(&self, id: u64) {
		if !self.0.ctx.require_auth() {
			return;
		}
		let activated = {
			let mut comments = self.0.comments.borrow_mut();
			match tree::find_mut(&mut comments, id) {
				Some(comment) => {
					mutate::flip(&mut comment.is_upped, &mut comment.ups_count);
					comment.is_upped
				}
				None => return,
			}
		};
		self.update();
		let ctx = Rc::clone(&self.0.ctx);
		spawn_local(async move {
			mutate::settle(if activated {
				ctx.api.up_comment(id).await
			} else {
				ctx.api.remove_up_comment(id).await
			});
		});
	}

	fn handle_submit(&self) {
		let content = self.0.draft.borrow().trim().to_owned();
		if content.is_empty() {
			return;
		}
		let this = self.clone();
		spawn_local(async move {
			let reply_to = this.0.reply_to.get();
			match this.0.ctx.api.create_comment(this.0.quip_id, &content, reply_to).await {
				Ok(comment) => {
					this.0.comments.borrow_mut().push(comment);
					this.0.draft.borrow_mut().clear();
					this.0.reply_to.set(None);
					dom::toast("Comment posted!", ToastKind::Success);
					this.update();
				}
				// The draft stays put so the user can retry.
				Err(err) => dom::toast(&err.to_string(), ToastKind::Error),
			}
		});
	}
}

impl Component for CommentsSection {
	type Inner = CommentsSectionInner;

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
		let comments = self.0.comments.borrow().clone();
		let body = if self.0.loading.get() {
			dom::spinner()
		} else if comments.is_empty() {
			dom::empty_state("💬", "No comments yet", Some("Be the first to comment!"))
		} else {
			let mut list = El::new("div").class("comments-list");
			for comment in tree::build_tree(comments.clone()) {
				list = list.child(self.render_comment(&comment, 0));
			}
			list
		};
		let el = El::new("div")
			.class("comments-section")
			.child(
				El::new("h3")
					.class("comments-header")
					.text(&format!("Comments ({})", comments.len())),
			)
			.child(body)
			.child(self.render_form())
			.into_element();
		*self.0.el.borrow_mut() = Some(el.clone());
		el
	}
}
