mod health;
mod validate;

pub use health::{health_check, metrics};
pub use validate::validate_medical_book;
