//! Data models for LoLLMs SSO responses.
//!
//! The backend decides the claim set, so responses stay close to raw JSON.

mod introspection;

pub use introspection::IntrospectionResponse;
pub(crate) use introspection::{is_truthy, truthy_message};
