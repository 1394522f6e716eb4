//! LoLLMs SSO Client
//!
//! Client side of the LoLLMs single-sign-on redirect flow: send the user to the
//! LoLLMs login page, capture the token from the redirect back, keep it in
//! local storage, and verify it against the instance's introspection endpoint.
//!
//! # Features
//!
//! - **Injected surfaces**: navigation and storage sit behind small traits, so
//!   the flow runs in tests, CLIs, or any host with a URL bar
//! - **File or memory storage**: [`FileStorage`] persists tokens across runs
//! - **Backend validation**: inactive tokens are cleared automatically
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use lollms_sso_client::{Config, MemoryNavigator, MemoryStorage, SsoClient};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::new("https://lollms.example.com", "my-app")?;
//!     let navigator = Arc::new(MemoryNavigator::parse("https://my-app.example.com/cb?token=abc")?);
//!     let client = SsoClient::new(config, navigator, Arc::new(MemoryStorage::new()))?;
//!
//!     if client.handle_redirect()?.is_some() {
//!         let claims = client.introspect().await?;
//!         println!("{claims}");
//!     }
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod navigator;
pub mod storage;

pub use client::SsoClient;
pub use config::Config;
pub use error::{IntrospectionFailure, SsoError, SsoResult};
pub use models::IntrospectionResponse;
pub use navigator::{MemoryNavigator, Navigator, SystemNavigator};
pub use storage::{FileStorage, MemoryStorage, TokenStorage};
