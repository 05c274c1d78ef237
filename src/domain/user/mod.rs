pub mod entity;
pub mod invariants;

pub use entity::User;
pub use invariants::{validate_bio, validate_display_name, validate_email, validate_user, validate_username};
