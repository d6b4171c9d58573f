use crate::api::{self, Api};
use crate::component::Component;
use crate::components::Navbar;
use crate::dom::{self, El};
use crate::pages::{FeedPage, LoginPage, ProfilePage, QuipDetailPage, RegisterPage};
use crate::router::{Params, RouteContext, Router};
use crate::state::Store;
use core::cell::RefCell;
use std::any::Any;
use std::rc::Rc;
use tracing::{info, trace, warn};
use wasm_bindgen::{closure::Closure, JsCast, UnwrapThrowExt};
use web_sys::Element;

/// The one owned context object. Built once at bootstrap and passed to every component at
/// construction; there are no global singletons.
pub struct Ctx {
	pub api: Api,
	pub store: Store,
	pub router: Rc<Router>,
}
impl Ctx {
	#[must_use]
	pub fn new() -> Rc<Self> {
		Rc::new(Self {
			api: Api::new(),
			store: Store::new(),
			router: Router::new(),
		})
	}

	/// Gate for protected actions: unauthenticated users are sent to the login page and
	/// `false` is returned, with no request sent and no error surfaced.
	pub fn require_auth(&self) -> bool {
		if self.store.is_authenticated() {
			true
		} else {
			trace!("auth required, redirecting to login");
			self.router.navigate("/login");
			false
		}
	}
}

struct AppInner {
	ctx: Rc<Ctx>,
	navbar: Navbar,
	main: RefCell<Option<Element>>,
	// The active page is retained here; dropping it tears down its event closures.
	current: RefCell<Option<Box<dyn Any>>>,
	logout: RefCell<Option<Closure<dyn FnMut()>>>,
}

/// Application bootstrap: restores the session, wires the route table and the logout
/// signal, renders the shell and starts the router.
#[derive(Clone)]
pub struct App(Rc<AppInner>);
impl App {
	pub async fn boot() {
		info!("booting");
		let ctx = Ctx::new();
		let app = App(Rc::new(AppInner {
			navbar: Navbar::new(Rc::clone(&ctx)),
			ctx,
			main: RefCell::new(None),
			current: RefCell::new(None),
			logout: RefCell::new(None),
		}));
		app.init_theme();
		app.restore_session().await;
		app.install_routes();
		app.render_shell();
		app.install_signals();
		app.0.ctx.router.start();
	}

	fn ctx(&self) -> Rc<Ctx> {
		Rc::clone(&self.0.ctx)
	}

	fn init_theme(&self) {
		let theme = dom::storage_get(dom::THEME_KEY)
			.unwrap_or_else(|| if dom::prefers_dark() { "dark" } else { "light" }.to_owned());
		dom::apply_theme(&theme);
	}

	async fn restore_session(&self) {
		if self.0.ctx.api.token().is_none() {
			return;
		}
		match self.0.ctx.api.me().await {
			Ok(user) => {
				info!(username = %user.username, "session restored");
				self.0.ctx.store.set_user(Some(user));
			}
			Err(err) => {
				warn!(error = %err, "stored token is stale, discarding");
				self.0.ctx.api.set_token(None);
			}
		}
	}

	fn install_routes(&self) {
		let router = Rc::clone(&self.0.ctx.router);
		router
			.add_route("/", {
				let app = self.clone();
				move |route: RouteContext| {
					let app = app.clone();
					async move {
						app.show_page(FeedPage::new(app.ctx()), &route.params).await;
					}
				}
			})
			.add_route("/login", {
				let app = self.clone();
				move |route: RouteContext| {
					let app = app.clone();
					async move {
						if app.0.ctx.store.is_authenticated() {
							route.router.navigate("/");
							return;
						}
						app.show_page(LoginPage::new(app.ctx()), &Params::new()).await;
					}
				}
			})
			.add_route("/register", {
				let app = self.clone();
				move |route: RouteContext| {
					let app = app.clone();
					async move {
						if app.0.ctx.store.is_authenticated() {
							route.router.navigate("/");
							return;
						}
						app.show_page(RegisterPage::new(app.ctx()), &Params::new()).await;
					}
				}
			})
			.add_route("/quips/:id", {
				let app = self.clone();
				move |route: RouteContext| {
					let app = app.clone();
					async move {
						app.show_page(QuipDetailPage::new(app.ctx()), &route.params).await;
					}
				}
			})
			.add_route("/users/:username", {
				let app = self.clone();
				move |route: RouteContext| {
					let app = app.clone();
					async move {
						app.show_page(ProfilePage::new(app.ctx()), &route.params).await;
					}
				}
			});
	}

	fn render_shell(&self) {
		let root = dom::document()
			.get_element_by_id("app")
			.expect_throw("missing #app mount point");
		root.set_inner_html("");
		root.set_class_name("app-container");
		root.append_child(&self.0.navbar.render()).unwrap_throw();
		let main = El::new("main").class("main-content").into_element();
		root.append_child(&main).unwrap_throw();
		*self.0.main.borrow_mut() = Some(main);
	}

	fn install_signals(&self) {
		let navbar = self.0.navbar.clone();
		self.0.ctx.store.on("user", move |_| navbar.update());

		let ctx = self.ctx();
		let closure = Closure::wrap(Box::new(move || {
			info!("logged out, returning home");
			ctx.store.set_user(None);
			ctx.router.navigate("/");
		}) as Box<dyn FnMut()>);
		dom::window()
			.add_event_listener_with_callback(api::LOGOUT_EVENT, closure.as_ref().unchecked_ref())
			.unwrap_throw();
		*self.0.logout.borrow_mut() = Some(closure);
	}

	async fn show_page<P: Component>(&self, page: P, params: &Params) {
		*self.0.current.borrow_mut() = Some(Box::new(page.clone()));
		let main = self.0.main.borrow().clone().expect_throw("shell not rendered");
		main.set_inner_html("");
		main.append_child(&page.render()).unwrap_throw();
		page.load(params).await;
	}
}
