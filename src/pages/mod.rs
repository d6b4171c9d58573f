mod detail;
mod feed;
mod login;
mod profile;
mod register;

pub use detail::QuipDetailPage;
pub use feed::FeedPage;
pub use login::LoginPage;
pub use profile::ProfilePage;
pub use register::RegisterPage;

use crate::api::ApiError;
use crate::dom::{self, ToastKind};
use tracing::trace;

/// A missing entity renders as an in-page not-found state instead of a notification;
/// every other fetch failure surfaces as a toast.
fn report_fetch_error(err: &ApiError) {
	match err {
		ApiError::Status { status: 404, .. } => trace!("entity not found"),
		err => dom::toast(&err.to_string(), ToastKind::Error),
	}
}
