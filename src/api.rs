use crate::dom;
use core::cell::RefCell;
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{instrument, trace, warn};
use wasm_bindgen::{JsCast, JsValue, UnwrapThrowExt};
use wasm_bindgen_futures::JsFuture;
use web_sys::{CustomEvent, Headers, Request, RequestInit, Response};

const API_BASE: &str = "https://api.quiply.yan-toples.ru/api/v1";
const TOKEN_KEY: &str = "token";

/// Dispatched on `window` whenever the held token stops being valid, so bootstrap can
/// reset the session without the gateway holding a reference to the store or router.
pub const LOGOUT_EVENT: &str = "auth:logout";

#[derive(Debug, Error)]
pub enum ApiError {
	/// Non-2xx response. `message` is the body's `error` field when present.
	#[error("{message}")]
	Status { message: String, status: u16, body: Value },
	#[error("request failed: {0}")]
	Network(String),
	#[error("malformed payload: {0}")]
	Decode(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserRef {
	#[serde(default)]
	pub id: Option<u64>,
	pub username: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
	#[serde(default)]
	pub id: Option<u64>,
	pub username: String,
	#[serde(default)]
	pub email: Option<String>,
	#[serde(default)]
	pub bio: Option<String>,
	#[serde(default)]
	pub stats: Option<UserStats>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserStats {
	#[serde(default)]
	pub total_quips: u32,
	#[serde(default, alias = "total_quip_ups")]
	pub total_ups: u32,
	#[serde(default)]
	pub total_reposts: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Quip {
	pub id: u64,
	#[serde(default)]
	pub user_id: Option<u64>,
	#[serde(default)]
	pub username: Option<String>,
	#[serde(default)]
	pub author: Option<UserRef>,
	pub content: String,
	#[serde(default)]
	pub definition: Option<String>,
	#[serde(default)]
	pub usage_examples: Option<String>,
	#[serde(default)]
	pub created_at: String,
	#[serde(default, alias = "quip_ups_count")]
	pub ups_count: u32,
	#[serde(default)]
	pub is_upped: bool,
	#[serde(default)]
	pub reposts_count: u32,
	#[serde(default)]
	pub is_reposted: bool,
	#[serde(default)]
	pub comments_count: u32,
}
impl Quip {
	#[must_use]
	pub fn author_name(&self) -> &str {
		self.username
			.as_deref()
			.or_else(|| self.author.as_ref().map(|author| author.username.as_str()))
			.unwrap_or("Unknown")
	}
}

#[derive(Debug, Clone, Deserialize)]
pub struct Comment {
	pub id: u64,
	#[serde(default, alias = "parent_comment_id")]
	pub parent_id: Option<u64>,
	#[serde(default)]
	pub username: Option<String>,
	#[serde(default)]
	pub author: Option<UserRef>,
	pub content: String,
	#[serde(default)]
	pub created_at: String,
	#[serde(default, alias = "comment_ups_count")]
	pub ups_count: u32,
	#[serde(default)]
	pub is_upped: bool,
	/// Present when the payload arrived pre-nested; reconciled by [`crate::tree`] otherwise.
	#[serde(default)]
	pub replies: Option<Vec<Comment>>,
}
impl Comment {
	#[must_use]
	pub fn author_name(&self) -> &str {
		self.username
			.as_deref()
			.or_else(|| self.author.as_ref().map(|author| author.username.as_str()))
			.unwrap_or("Unknown")
	}
}

#[derive(Debug, Deserialize)]
struct LoginPayload {
	token: String,
}

/// The backend answers with a bare value, a `{"data": …}` envelope or a `{"quips": […]}`
/// keyed list depending on the endpoint's vintage. All three collapse here so no consumer
/// ever sniffs payload shapes.
#[derive(Deserialize)]
#[serde(untagged)]
enum Payload<T> {
	Enveloped { data: T },
	Keyed { quips: T },
	Bare(T),
}
impl<T> Payload<T> {
	fn into_inner(self) -> T {
		match self {
			Payload::Enveloped { data } => data,
			Payload::Keyed { quips } => quips,
			Payload::Bare(value) => value,
		}
	}
}

fn decode<T: DeserializeOwned>(value: Value) -> Result<T, ApiError> {
	Ok(serde_json::from_value::<Payload<T>>(value)?.into_inner())
}

fn as_network(err: JsValue) -> ApiError {
	ApiError::Network(format!("{:?}", err))
}

/// Single entry point to the Quiply REST API.
///
/// Owns the bearer token, including its persistence in
/// [***localStorage***](https://developer.mozilla.org/en-US/docs/Web/API/Window/localStorage);
/// a 401 from any endpoint clears the token and raises [`LOGOUT_EVENT`] before the call
/// fails like any other non-2xx response.
pub struct Api {
	token: RefCell<Option<String>>,
}
impl Default for Api {
	fn default() -> Self {
		Self::new()
	}
}
impl Api {
	#[must_use]
	pub fn new() -> Self {
		Self {
			token: RefCell::new(dom::storage_get(TOKEN_KEY)),
		}
	}

	#[must_use]
	pub fn token(&self) -> Option<String> {
		self.token.borrow().clone()
	}

	pub fn set_token(&self, token: Option<String>) {
		match &token {
			Some(token) => dom::storage_set(TOKEN_KEY, token),
			None => dom::storage_remove(TOKEN_KEY),
		}
		*self.token.borrow_mut() = token;
	}

	pub fn logout(&self) {
		self.set_token(None);
		signal_logout();
	}

	#[instrument(skip(self, body))]
	async fn request(&self, method: &str, path: &str, body: Option<Value>) -> Result<Value, ApiError> {
		let init = RequestInit::new();
		init.set_method(method);
		let headers = Headers::new().map_err(as_network)?;
		headers.set("Content-Type", "application/json").map_err(as_network)?;
		if let Some(token) = &*self.token.borrow() {
			headers
				.set("Authorization", &format!("Bearer {}", token))
				.map_err(as_network)?;
		}
		init.set_headers(&headers);
		if let Some(body) = &body {
			init.set_body(&JsValue::from_str(&body.to_string()));
		}
		let request = Request::new_with_str_and_init(&format!("{}{}", API_BASE, path), &init).map_err(as_network)?;

		let response = JsFuture::from(dom::window().fetch_with_request(&request))
			.await
			.map_err(as_network)?;
		let response: Response = response.dyn_into().unwrap_throw();

		if response.status() == 401 {
			warn!("401 from the gateway, dropping the session");
			self.set_token(None);
			signal_logout();
		}

		let text = JsFuture::from(response.text().map_err(as_network)?)
			.await
			.map_err(as_network)?;
		let text = text.as_string().unwrap_or_default();
		// Delete and reaction endpoints may answer 2xx with an empty body.
		let value: Value = if text.is_empty() {
			Value::Null
		} else {
			serde_json::from_str(&text)?
		};

		if !response.ok() {
			let message = value
				.get("error")
				.and_then(Value::as_str)
				.unwrap_or("Request failed")
				.to_owned();
			return Err(ApiError::Status {
				message,
				status: response.status(),
				body: value,
			});
		}
		trace!(status = response.status(), "ok");
		Ok(value)
	}

	pub async fn register(&self, username: &str, email: &str, password: &str) -> Result<(), ApiError> {
		self.request(
			"POST",
			"/auth/register",
			Some(json!({ "username": username, "email": email, "password": password })),
		)
		.await
		.map(|_| ())
	}

	/// On success the returned token is stored and used for every following request.
	pub async fn login(&self, username: &str, password: &str) -> Result<(), ApiError> {
		let value = self
			.request(
				"POST",
				"/auth/login",
				Some(json!({ "username": username, "password": password })),
			)
			.await?;
		let payload: LoginPayload = decode(value)?;
		self.set_token(Some(payload.token));
		Ok(())
	}

	pub async fn me(&self) -> Result<User, ApiError> {
		decode(self.request("GET", "/auth/me", None).await?)
	}

	pub async fn quips(&self, sort: &str, page: u32) -> Result<Vec<Quip>, ApiError> {
		decode(
			self.request("GET", &format!("/quips?sort={}&page={}", sort, page), None)
				.await?,
		)
	}

	pub async fn quip(&self, id: u64) -> Result<Quip, ApiError> {
		decode(self.request("GET", &format!("/quips/{}", id), None).await?)
	}

	pub async fn delete_quip(&self, id: u64) -> Result<(), ApiError> {
		self.request("DELETE", &format!("/quips/{}", id), None).await.map(|_| ())
	}

	pub async fn create_quip(
		&self,
		content: &str,
		definition: Option<&str>,
		usage_examples: Option<&str>,
	) -> Result<Quip, ApiError> {
		decode(
			self.request(
				"POST",
				"/quips",
				Some(json!({
					"content": content,
					"definition": definition,
					"usage_examples": usage_examples,
				})),
			)
			.await?,
		)
	}

	pub async fn up_quip(&self, id: u64) -> Result<(), ApiError> {
		self.request("POST", &format!("/quips/{}/up", id), None).await.map(|_| ())
	}

	pub async fn remove_up_quip(&self, id: u64) -> Result<(), ApiError> {
		self.request("DELETE", &format!("/quips/{}/up", id), None)
			.await
			.map(|_| ())
	}

	pub async fn repost_quip(&self, id: u64) -> Result<(), ApiError> {
		self.request("POST", &format!("/quips/{}/repost", id), None)
			.await
			.map(|_| ())
	}

	pub async fn remove_repost_quip(&self, id: u64) -> Result<(), ApiError> {
		self.request("DELETE", &format!("/quips/{}/repost", id), None)
			.await
			.map(|_| ())
	}

	pub async fn comments(&self, quip_id: u64) -> Result<Vec<Comment>, ApiError> {
		decode(
			self.request("GET", &format!("/quips/{}/comments", quip_id), None)
				.await?,
		)
	}

	pub async fn create_comment(&self, quip_id: u64, content: &str, parent_id: Option<u64>) -> Result<Comment, ApiError> {
		decode(
			self.request(
				"POST",
				&format!("/quips/{}/comments", quip_id),
				Some(json!({ "content": content, "parent_id": parent_id })),
			)
			.await?,
		)
	}

	pub async fn up_comment(&self, id: u64) -> Result<(), ApiError> {
		self.request("POST", &format!("/quips/comments/{}/up", id), None)
			.await
			.map(|_| ())
	}

	pub async fn remove_up_comment(&self, id: u64) -> Result<(), ApiError> {
		self.request("DELETE", &format!("/quips/comments/{}/up", id), None)
			.await
			.map(|_| ())
	}

	pub async fn user(&self, username: &str) -> Result<User, ApiError> {
		decode(self.request("GET", &format!("/users/{}", username), None).await?)
	}

	pub async fn user_quips(&self, username: &str) -> Result<Vec<Quip>, ApiError> {
		decode(
			self.request("GET", &format!("/users/{}/quips", username), None)
				.await?,
		)
	}

	pub async fn user_reposts(&self, username: &str) -> Result<Vec<Quip>, ApiError> {
		decode(
			self.request("GET", &format!("/users/{}/reposts", username), None)
				.await?,
		)
	}
}

fn signal_logout() {
	let event = CustomEvent::new(LOGOUT_EVENT).unwrap_throw();
	dom::window().dispatch_event(&event).unwrap_throw();
}
