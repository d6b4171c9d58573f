use crate::api::User;
use core::cell::{Cell, RefCell};
use hashbrown::HashMap;
use std::rc::Rc;
use tracing::trace;

/// Handle for one subscription, accepted by [`Store::off`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListenerId(u32);

type Callback = Rc<dyn Fn(Option<&User>)>;

/// Process-wide session state with named notification channels.
///
/// The session identity is the only truly shared mutable state in the client; everything
/// else is owned by the page that fetched it. Notification is synchronous and runs in
/// subscription order, so every observer of a change sees the same post-update value
/// before any other event can interleave.
///
/// The store itself persists nothing; token storage is the gateway's concern.
#[derive(Default)]
pub struct Store {
	user: RefCell<Option<User>>,
	channels: RefCell<HashMap<String, Vec<(u32, Callback)>>>,
	next_listener: Cell<u32>,
}
impl Store {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	/// Current identity, as a snapshot.
	#[must_use]
	pub fn user(&self) -> Option<User> {
		self.user.borrow().clone()
	}

	#[must_use]
	pub fn is_authenticated(&self) -> bool {
		self.user.borrow().is_some()
	}

	/// Replaces the session identity and notifies the `"user"` channel.
	pub fn set_user(&self, user: Option<User>) {
		*self.user.borrow_mut() = user;
		self.emit("user");
	}

	/// Subscribing to a channel nothing emits on is valid; the callback just never runs.
	pub fn on(&self, channel: &str, callback: impl Fn(Option<&User>) + 'static) -> ListenerId {
		let id = self.next_listener.get();
		self.next_listener.set(id + 1);
		self.channels
			.borrow_mut()
			.entry(channel.to_owned())
			.or_default()
			.push((id, Rc::new(callback)));
		ListenerId(id)
	}

	pub fn off(&self, channel: &str, listener: ListenerId) {
		if let Some(subscribers) = self.channels.borrow_mut().get_mut(channel) {
			subscribers.retain(|(id, _)| *id != listener.0);
		}
	}

	fn emit(&self, channel: &str) {
		// The callback list is snapshotted first so a subscriber may (un)subscribe
		// without invalidating the iteration.
		let subscribers: Vec<Callback> = self
			.channels
			.borrow()
			.get(channel)
			.map(|subscribers| subscribers.iter().map(|(_, callback)| Rc::clone(callback)).collect())
			.unwrap_or_default();
		trace!(channel, subscribers = subscribers.len(), "emit");
		let user = self.user.borrow().clone();
		for callback in subscribers {
			callback(user.as_ref());
		}
	}
}
