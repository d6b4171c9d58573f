#![cfg(target_arch = "wasm32")]

use quiply_web::api::{Api, User, LOGOUT_EVENT};
use quiply_web::state::Store;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, UnwrapThrowExt};
use wasm_bindgen_test::{wasm_bindgen_test, wasm_bindgen_test_configure};

wasm_bindgen_test_configure!(run_in_browser);

fn user() -> User {
	User {
		id: Some(1),
		username: "nia".to_owned(),
		email: None,
		bio: None,
		stats: None,
	}
}

#[wasm_bindgen_test]
fn logout_clears_the_token_and_signals_the_store_reset() {
	let api = Api::new();
	api.set_token(Some("stale-token".to_owned()));

	let store = Rc::new(Store::new());
	store.set_user(Some(user()));

	// Bootstrap's wiring, in miniature: the logout signal resets the store.
	let listener = {
		let store = Rc::clone(&store);
		Closure::wrap(Box::new(move || store.set_user(None)) as Box<dyn FnMut()>)
	};
	let window = web_sys::window().unwrap_throw();
	window
		.add_event_listener_with_callback(LOGOUT_EVENT, listener.as_ref().unchecked_ref())
		.unwrap_throw();

	api.logout();

	assert!(api.token().is_none());
	assert!(quiply_web::dom::storage_get("token").is_none());
	// The signal dispatches synchronously, so the store is already reset.
	assert!(!store.is_authenticated());

	window
		.remove_event_listener_with_callback(LOGOUT_EVENT, listener.as_ref().unchecked_ref())
		.unwrap_throw();
}

#[wasm_bindgen_test]
fn the_token_persists_across_gateway_instances() {
	let api = Api::new();
	api.set_token(Some("persisted".to_owned()));

	assert_eq!(Api::new().token().as_deref(), Some("persisted"));

	api.set_token(None);
	assert!(Api::new().token().is_none());
}
