use crate::api::ApiError;
use crate::dom::{self, ToastKind};
use tracing::warn;

/// Speculative toggle transition: activating increments the counter, deactivating
/// decrements it but never below zero.
pub fn flip(active: &mut bool, count: &mut u32) {
	if *active {
		*active = false;
		*count = count.saturating_sub(1);
	} else {
		*active = true;
		*count += 1;
	}
}

/// Settles an optimistic mutation once the gateway answered. Failures surface as a toast
/// and the speculative state deliberately stays in place; the next full fetch reconciles.
/// Returns whether the request succeeded.
pub fn settle(result: Result<(), ApiError>) -> bool {
	match result {
		Ok(()) => true,
		Err(err) => {
			warn!(error = %err, "reaction failed, keeping speculative state");
			dom::toast(&err.to_string(), ToastKind::Error);
			false
		}
	}
}
