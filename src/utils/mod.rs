pub mod error;

pub use error::KtpError;
