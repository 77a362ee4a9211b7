pub mod client;
pub mod protocol;

pub use client::{ApiClient, FaceAuthApi};
pub use protocol::{AuthCall, AuthResult, CustomFields, SignupOptions};
