mod comments;
mod create_quip;
mod navbar;
mod quip_card;

pub use comments::CommentsSection;
pub use create_quip::CreateQuip;
pub use navbar::Navbar;
pub use quip_card::{QuipCard, SharedQuip};
