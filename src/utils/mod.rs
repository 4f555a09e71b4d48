pub mod error;
pub mod redact;

pub use redact::sanitize_error;
