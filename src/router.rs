use crate::dom;
use core::cell::RefCell;
use core::future::Future;
use futures::future::{FutureExt, LocalBoxFuture};
use hashbrown::HashMap;
use std::rc::Rc;
use tracing::{instrument, trace, warn};
use wasm_bindgen::{closure::Closure, JsCast, UnwrapThrowExt};

/// Route captures merged with query-string pairs.
pub type Params = HashMap<String, String>;

type Handler = Rc<dyn Fn(RouteContext) -> LocalBoxFuture<'static, ()>>;
type Guard = Rc<dyn Fn(RouteContext) -> LocalBoxFuture<'static, bool>>;

/// Per-navigation context handed to guards and the matched handler.
#[derive(Clone)]
pub struct RouteContext {
	pub path: String,
	pub params: Params,
	pub router: Rc<Router>,
}

struct Route {
	pattern: String,
	handler: Handler,
}

/// Successful resolution of a path against the route table.
pub struct RouteMatch {
	pub pattern: String,
	pub params: Params,
	index: usize,
}

/// Hash-fragment router.
///
/// Routes are registered once at startup and immutable afterwards; matching is
/// insertion-ordered, so of two ambiguous patterns the first registered wins. Dispatch is
/// *not* reentrancy-guarded: a fragment change while a handler is still awaiting starts a
/// second dispatch, and the last render to complete owns the visible page. Stale renders
/// are defused by the component lifecycle instead (see [`crate::component::Component::update`]).
pub struct Router {
	routes: RefCell<Vec<Route>>,
	exact: RefCell<HashMap<String, usize>>,
	before: RefCell<Vec<Guard>>,
	current: RefCell<Option<String>>,
	hashchange: RefCell<Option<Closure<dyn FnMut()>>>,
}
impl Router {
	#[must_use]
	pub fn new() -> Rc<Self> {
		Rc::new(Self {
			routes: RefCell::new(Vec::new()),
			exact: RefCell::new(HashMap::new()),
			before: RefCell::new(Vec::new()),
			current: RefCell::new(None),
			hashchange: RefCell::new(None),
		})
	}

	pub fn add_route<H, F>(self: &Rc<Self>, pattern: &str, handler: H) -> Rc<Self>
	where
		H: Fn(RouteContext) -> F + 'static,
		F: Future<Output = ()> + 'static,
	{
		let mut routes = self.routes.borrow_mut();
		let index = routes.len();
		routes.push(Route {
			pattern: pattern.to_owned(),
			handler: Rc::new(move |context| handler(context).boxed_local()),
		});
		self.exact.borrow_mut().entry(pattern.to_owned()).or_insert(index);
		Rc::clone(self)
	}

	/// Appends a guard. Guards run in registration order before every dispatch; returning
	/// `false` vetoes the navigation silently.
	pub fn before_each<G, F>(self: &Rc<Self>, guard: G) -> Rc<Self>
	where
		G: Fn(RouteContext) -> F + 'static,
		F: Future<Output = bool> + 'static,
	{
		self.before
			.borrow_mut()
			.push(Rc::new(move |context| guard(context).boxed_local()));
		Rc::clone(self)
	}

	/// Sets the location fragment; the browser's `hashchange` event drives the dispatch.
	pub fn navigate(&self, path: &str) {
		trace!(path, "navigate");
		dom::window().location().set_hash(path).unwrap_throw();
	}

	/// Path of the last completed match.
	#[must_use]
	pub fn current(&self) -> Option<String> {
		self.current.borrow().clone()
	}

	/// Installs the `hashchange` listener and runs the initial dispatch.
	pub fn start(self: &Rc<Self>) {
		let router = Rc::clone(self);
		let closure = Closure::wrap(Box::new(move || {
			wasm_bindgen_futures::spawn_local(Rc::clone(&router).dispatch());
		}) as Box<dyn FnMut()>);
		dom::window()
			.add_event_listener_with_callback("hashchange", closure.as_ref().unchecked_ref())
			.unwrap_throw();
		*self.hashchange.borrow_mut() = Some(closure);
		wasm_bindgen_futures::spawn_local(Rc::clone(self).dispatch());
	}

	/// Exact-string hit in the route table first, then first-registered segment match.
	#[must_use]
	pub fn match_route(&self, path: &str) -> Option<RouteMatch> {
		let routes = self.routes.borrow();
		if let Some(&index) = self.exact.borrow().get(path) {
			return Some(RouteMatch {
				pattern: routes[index].pattern.clone(),
				params: Params::new(),
				index,
			});
		}
		routes.iter().enumerate().find_map(|(index, route)| {
			bind_segments(&route.pattern, path).map(|params| RouteMatch {
				pattern: route.pattern.clone(),
				params,
				index,
			})
		})
	}

	#[instrument(skip(self))]
	pub async fn dispatch(self: Rc<Self>) {
		let hash = dom::window().location().hash().unwrap_throw();
		let (path, query) = parse_hash(&hash);
		let matched = match self.match_route(&path) {
			Some(matched) => matched,
			None => {
				warn!(%path, "no matching route, redirecting home");
				self.navigate("/");
				return;
			}
		};
		trace!(%path, pattern = %matched.pattern, "dispatch");

		let mut params = matched.params;
		// Query pairs merge after route captures and overwrite them on collision.
		for (key, value) in query {
			params.insert(key, decode_component(&value));
		}
		let context = RouteContext {
			path: path.clone(),
			params,
			router: Rc::clone(&self),
		};

		let guards: Vec<Guard> = self.before.borrow().iter().map(Rc::clone).collect();
		for guard in guards {
			if !guard(context.clone()).await {
				trace!("guard vetoed navigation");
				return;
			}
		}

		let handler = Rc::clone(&self.routes.borrow()[matched.index].handler);
		*self.current.borrow_mut() = Some(path);
		handler(context).await;
	}
}

/// Splits a location fragment into its path and raw query pairs. An empty fragment is the
/// root path; query values are *not* decoded here, that happens at dispatch.
#[must_use]
pub fn parse_hash(hash: &str) -> (String, Vec<(String, String)>) {
	let hash = hash.strip_prefix('#').unwrap_or(hash);
	let hash = if hash.is_empty() { "/" } else { hash };
	let mut parts = hash.splitn(2, '?');
	let path = parts.next().unwrap_or(hash);
	let query = parts.next().unwrap_or("");

	let mut pairs = Vec::new();
	if !query.is_empty() {
		for pair in query.split('&') {
			let mut pair = pair.splitn(2, '=');
			let key = pair.next().unwrap_or("");
			let value = pair.next().unwrap_or("");
			pairs.push((key.to_owned(), value.to_owned()));
		}
	}
	(path.to_owned(), pairs)
}

fn bind_segments(pattern: &str, path: &str) -> Option<Params> {
	let pattern_segments: Vec<&str> = pattern.split('/').collect();
	let path_segments: Vec<&str> = path.split('/').collect();
	if pattern_segments.len() != path_segments.len() {
		return None;
	}
	let mut params = Params::new();
	for (pattern_segment, path_segment) in pattern_segments.iter().zip(&path_segments) {
		if let Some(name) = pattern_segment.strip_prefix(':') {
			params.insert(name.to_owned(), (*path_segment).to_owned());
		} else if pattern_segment != path_segment {
			return None;
		}
	}
	Some(params)
}

fn decode_component(value: &str) -> String {
	js_sys::decode_uri_component(value).map_or_else(|_| value.to_owned(), String::from)
}
