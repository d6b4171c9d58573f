#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod api;
pub mod app;
pub mod component;
pub mod components;
pub mod dom;
pub mod mutate;
pub mod pages;
pub mod router;
pub mod state;
pub mod tree;

use wasm_bindgen::prelude::wasm_bindgen;

#[wasm_bindgen(start)]
pub fn start() {
	tracing_wasm::set_as_global_default();
	wasm_bindgen_futures::spawn_local(app::App::boot());
}
