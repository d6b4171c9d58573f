#![cfg(target_arch = "wasm32")]

use quiply_web::router::{Params, Router};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::UnwrapThrowExt;
use wasm_bindgen_test::{wasm_bindgen_test, wasm_bindgen_test_configure};

wasm_bindgen_test_configure!(run_in_browser);

fn set_hash(hash: &str) {
	web_sys::window()
		.unwrap_throw()
		.location()
		.set_hash(hash)
		.unwrap_throw();
}

fn current_hash() -> String {
	web_sys::window().unwrap_throw().location().hash().unwrap_throw()
}

#[wasm_bindgen_test]
async fn dispatch_merges_captures_and_decoded_query() {
	let seen: Rc<RefCell<Option<Params>>> = Rc::new(RefCell::new(None));
	let router = Router::new();
	{
		let seen = Rc::clone(&seen);
		router.add_route("/quips/:id", move |context| {
			let seen = Rc::clone(&seen);
			async move {
				*seen.borrow_mut() = Some(context.params);
			}
		});
	}

	// The query's `id` collides with the route capture and wins.
	set_hash("/quips/42?id=99&tag=a%20b");
	Rc::clone(&router).dispatch().await;

	let params = seen.borrow_mut().take().expect_throw("handler should have run");
	assert_eq!(params.get("id").map(String::as_str), Some("99"));
	assert_eq!(params.get("tag").map(String::as_str), Some("a b"));
	assert_eq!(router.current().as_deref(), Some("/quips/42"));
}

#[wasm_bindgen_test]
async fn capture_binds_when_no_query_interferes() {
	let seen: Rc<RefCell<Option<Params>>> = Rc::new(RefCell::new(None));
	let router = Router::new();
	{
		let seen = Rc::clone(&seen);
		router.add_route("/quips/:id", move |context| {
			let seen = Rc::clone(&seen);
			async move {
				*seen.borrow_mut() = Some(context.params);
			}
		});
	}

	set_hash("/quips/42");
	Rc::clone(&router).dispatch().await;

	let params = seen.borrow_mut().take().expect_throw("handler should have run");
	assert_eq!(params.get("id").map(String::as_str), Some("42"));
}

#[wasm_bindgen_test]
async fn unknown_path_redirects_home() {
	let called = Rc::new(RefCell::new(false));
	let router = Router::new();
	{
		let called = Rc::clone(&called);
		router.add_route("/", move |_| {
			let called = Rc::clone(&called);
			async move {
				*called.borrow_mut() = true;
			}
		});
	}

	set_hash("/definitely/not/registered");
	Rc::clone(&router).dispatch().await;

	assert_eq!(current_hash(), "#/");
	// The redirect re-enters through `hashchange`; without a started listener no
	// handler runs as part of this dispatch.
	assert!(!*called.borrow());
}

#[wasm_bindgen_test]
async fn guards_run_in_order_and_a_false_vetoes_silently() {
	let log: Rc<RefCell<Vec<&'static str>>> = Rc::new(RefCell::new(Vec::new()));
	let router = Router::new();
	for (name, verdict) in [("first", true), ("second", false), ("third", true)] {
		let log = Rc::clone(&log);
		router.before_each(move |_| {
			let log = Rc::clone(&log);
			async move {
				log.borrow_mut().push(name);
				verdict
			}
		});
	}
	{
		let log = Rc::clone(&log);
		router.add_route("/", move |_| {
			let log = Rc::clone(&log);
			async move {
				log.borrow_mut().push("handler");
			}
		});
	}

	set_hash("/");
	Rc::clone(&router).dispatch().await;

	// The veto short-circuits the third guard and the handler.
	assert_eq!(*log.borrow(), vec!["first", "second"]);
	assert!(router.current().is_none());
}

#[wasm_bindgen_test]
async fn passing_guards_reach_the_handler() {
	let log: Rc<RefCell<Vec<&'static str>>> = Rc::new(RefCell::new(Vec::new()));
	let router = Router::new();
	{
		let log = Rc::clone(&log);
		router.before_each(move |_| {
			let log = Rc::clone(&log);
			async move {
				log.borrow_mut().push("guard");
				true
			}
		});
	}
	{
		let log = Rc::clone(&log);
		router.add_route("/login", move |_| {
			let log = Rc::clone(&log);
			async move {
				log.borrow_mut().push("handler");
			}
		});
	}

	set_hash("/login");
	Rc::clone(&router).dispatch().await;

	assert_eq!(*log.borrow(), vec!["guard", "handler"]);
	assert_eq!(router.current().as_deref(), Some("/login"));
}
