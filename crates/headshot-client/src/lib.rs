//! Client for the headshot backend API.
//!
//! This crate is the orchestration layer between a front end and the
//! headshot backend, which owns accounts, payments and image generation.
//! It provides:
//!
//! - **[`ApiClient`]**: `get`/`post`/`put`/`delete` with a cookie-backed
//!   session, response-envelope unwrapping and transparent recovery from an
//!   expired access token.
//! - **Session circuit breaker** ([`SessionState`]): once a token refresh
//!   fails, later 401s are surfaced immediately until the next login.
//! - **Typed services** for auth, headshots, payments and administration.
//!
//! # Architecture
//!
//! ```text
//! services (auth, headshots, payment, admin)
//!    └── ApiClient
//!        ├── reqwest::Client (cookie jar: accessToken, refreshToken)
//!        ├── envelope        ({ success, message, data?, error? })
//!        └── SessionState    (refresh-failure flag)
//! ```
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use headshot_client::{ApiClient, ClientConfig};
//!
//! # async fn example() -> headshot_client::Result<()> {
//! let client = ApiClient::new(ClientConfig::from_env()?)?;
//!
//! match client.get::<serde_json::Value>("/auth/me", None).await {
//!     Ok(me) => println!("{me}"),
//!     Err(e) if e.is_session_expired() => println!("please log in again"),
//!     Err(e) => println!("request failed ({}): {}", e.status(), e.message()),
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod envelope;
pub mod error;
pub mod models;
pub mod request;
pub mod services;
pub mod session;

// Re-export key types at the crate root for convenience.
pub use client::{ApiClient, REFRESH_ENDPOINT};
pub use config::{ClientConfig, ConfigOverrides};
pub use envelope::ApiResponse;
pub use error::{ApiError, NETWORK_ERROR_STATUS, Result};
pub use request::{FormPart, RequestBody, RequestOptions};
pub use session::{MemorySessionState, SessionState};
