use core::cell::RefCell;
use tracing::warn;
use wasm_bindgen::{closure::Closure, JsCast, JsValue, UnwrapThrowExt};
use web_sys::{Document, Element, Event, Storage, Window};

pub const THEME_KEY: &str = "theme";

pub fn window() -> Window {
	web_sys::window().expect_throw("no `window` in this environment")
}

pub fn document() -> Document {
	window().document().expect_throw("no `document` on `window`")
}

/// Owns the [`Closure`]s handed to [***addEventListener***](https://developer.mozilla.org/en-US/docs/Web/API/EventTarget/addEventListener)
/// during one `render` pass.
///
/// Each component holds one arena and clears it at the start of every render: the superseded
/// subtree is discarded in the same synchronous step, so its listeners can never fire again
/// once their closures are dropped.
#[derive(Default)]
pub struct EventClosures(RefCell<Vec<Closure<dyn FnMut(Event)>>>);
impl EventClosures {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	pub fn reset(&self) {
		self.0.borrow_mut().clear();
	}

	fn retain(&self, closure: Closure<dyn FnMut(Event)>) {
		self.0.borrow_mut().push(closure);
	}
}

/// Builder for a detached [`web_sys::Element`] subtree.
pub struct El(Element);
impl El {
	#[must_use]
	pub fn new(tag: &str) -> Self {
		Self(document().create_element(tag).unwrap_throw())
	}

	#[must_use]
	pub fn class(self, class: &str) -> Self {
		self.0.set_class_name(class);
		self
	}

	#[must_use]
	pub fn attr(self, name: &str, value: &str) -> Self {
		self.0.set_attribute(name, value).unwrap_throw();
		self
	}

	/// Boolean attribute: present when `on`, absent otherwise.
	#[must_use]
	pub fn flag(self, name: &str, on: bool) -> Self {
		if on {
			self.attr(name, "")
		} else {
			self
		}
	}

	/// Sets the *DOM property* `value` on form controls, falling back to the attribute.
	#[must_use]
	pub fn value(self, value: &str) -> Self {
		if let Some(input) = self.0.dyn_ref::<web_sys::HtmlInputElement>() {
			input.set_value(value);
		} else if let Some(area) = self.0.dyn_ref::<web_sys::HtmlTextAreaElement>() {
			area.set_value(value);
		} else {
			self.0.set_attribute("value", value).unwrap_throw();
		}
		self
	}

	#[must_use]
	pub fn text(self, text: &str) -> Self {
		self.0
			.append_child(document().create_text_node(text).as_ref())
			.unwrap_throw();
		self
	}

	#[must_use]
	pub fn child(self, child: El) -> Self {
		self.0.append_child(&child.0).unwrap_throw();
		self
	}

	#[must_use]
	pub fn child_opt(self, child: Option<El>) -> Self {
		match child {
			Some(child) => self.child(child),
			None => self,
		}
	}

	/// Embeds an already-built subtree, typically another component's `render` output.
	#[must_use]
	pub fn append(self, element: &Element) -> Self {
		self.0.append_child(element).unwrap_throw();
		self
	}

	#[must_use]
	pub fn on(self, events: &EventClosures, kind: &str, handler: impl FnMut(Event) + 'static) -> Self {
		let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
		self.0
			.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref())
			.unwrap_throw();
		events.retain(closure);
		self
	}

	#[must_use]
	pub fn into_element(self) -> Element {
		self.0
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
	Info,
	Success,
	Error,
}
impl ToastKind {
	fn class(self) -> &'static str {
		match self {
			ToastKind::Info => "toast info",
			ToastKind::Success => "toast success",
			ToastKind::Error => "toast error",
		}
	}
}

const TOAST_MILLIS: i32 = 3000;

/// Transient, non-blocking notification. Auto-dismissed after three seconds.
pub fn toast(message: &str, kind: ToastKind) {
	let document = document();
	let body = match document.body() {
		Some(body) => body,
		None => return warn!("toast before <body> exists: {}", message),
	};
	let container = match document.query_selector(".toast-container").unwrap_throw() {
		Some(container) => container,
		None => {
			let container = El::new("div").class("toast-container").into_element();
			body.append_child(&container).unwrap_throw();
			container
		}
	};
	let toast = El::new("div").class(kind.class()).text(message).into_element();
	container.append_child(&toast).unwrap_throw();

	let dismiss = Closure::once_into_js(move || {
		toast.remove();
		if container.child_element_count() == 0 {
			container.remove();
		}
	});
	window()
		.set_timeout_with_callback_and_timeout_and_arguments_0(dismiss.unchecked_ref(), TOAST_MILLIS)
		.unwrap_throw();
}

#[must_use]
pub fn spinner() -> El {
	El::new("div").class("loading-container").child(El::new("div").class("spinner"))
}

#[must_use]
pub fn empty_state(icon: &str, title: &str, text: Option<&str>) -> El {
	El::new("div")
		.class("empty-state")
		.child(El::new("div").class("empty-state-icon").text(icon))
		.child(El::new("div").class("empty-state-title").text(title))
		.child_opt(text.map(|text| El::new("div").class("empty-state-text").text(text)))
}

const MONTHS: [&str; 12] = [
	"Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Relative timestamp: `just now`, `5m`, `3h`, `2d`, then `Mon D`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
#[must_use]
pub fn format_time(timestamp: &str) -> String {
	let date = js_sys::Date::new(&JsValue::from_str(timestamp));
	let diff = (js_sys::Date::now() - date.get_time()) / 1000.0;
	if diff < 60.0 {
		"just now".to_owned()
	} else if diff < 3600.0 {
		format!("{}m", (diff / 60.0) as u32)
	} else if diff < 86_400.0 {
		format!("{}h", (diff / 3600.0) as u32)
	} else if diff < 604_800.0 {
		format!("{}d", (diff / 86_400.0) as u32)
	} else {
		let month = MONTHS.get(date.get_month() as usize).copied().unwrap_or("?");
		format!("{} {}", month, date.get_date())
	}
}

#[must_use]
pub fn initials(username: &str) -> String {
	username
		.chars()
		.next()
		.map_or_else(|| "?".to_owned(), |first| first.to_uppercase().to_string())
}

fn storage() -> Option<Storage> {
	window().local_storage().ok().flatten()
}

#[must_use]
pub fn storage_get(key: &str) -> Option<String> {
	storage().and_then(|storage| storage.get_item(key).ok().flatten())
}

pub fn storage_set(key: &str, value: &str) {
	if let Some(storage) = storage() {
		storage.set_item(key, value).unwrap_throw();
	}
}

pub fn storage_remove(key: &str) {
	if let Some(storage) = storage() {
		storage.remove_item(key).unwrap_throw();
	}
}

pub fn apply_theme(theme: &str) {
	if let Some(root) = document().document_element() {
		root.set_attribute("data-theme", theme).unwrap_throw();
	}
}

#[must_use]
pub fn theme_is_dark() -> bool {
	document()
		.document_element()
		.and_then(|root| root.get_attribute("data-theme"))
		.map_or(true, |theme| theme != "light")
}

#[must_use]
pub fn prefers_dark() -> bool {
	window()
		.match_media("(prefers-color-scheme: dark)")
		.ok()
		.flatten()
		.map_or(false, |query| query.matches())
}

#[must_use]
pub fn confirm(message: &str) -> bool {
	window().confirm_with_message(message).unwrap_or(false)
}
