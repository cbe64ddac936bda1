//! Typed wrappers over the backend routes.
//!
//! Each service borrows an [`ApiClient`] and maps one method to one route,
//! so every call goes through the same envelope unwrapping and session
//! refresh.
//!
//! ```rust,no_run
//! use headshot_client::{ApiClient, ClientConfig};
//! use headshot_client::models::LoginInput;
//!
//! # async fn example() -> headshot_client::Result<()> {
//! let client = ApiClient::new(ClientConfig::from_env()?)?;
//! client
//!     .auth()
//!     .login(&LoginInput {
//!         email: "ada@example.com".into(),
//!         password: "hunter2".into(),
//!     })
//!     .await?;
//! let page = client.headshots().list(&Default::default()).await?;
//! println!("{} headshots", page.headshots.len());
//! # Ok(())
//! # }
//! ```

pub mod admin;
pub mod auth;
pub mod headshots;
pub mod payment;

pub use admin::{AdminOrderService, AdminUserService};
pub use auth::AuthService;
pub use headshots::HeadshotService;
pub use payment::PaymentService;

use crate::client::ApiClient;

impl ApiClient {
    /// Registration, login and email verification.
    pub fn auth(&self) -> AuthService<'_> {
        AuthService::new(self)
    }

    /// Headshot styles, uploads and listing.
    pub fn headshots(&self) -> HeadshotService<'_> {
        HeadshotService::new(self)
    }

    /// Credit packages and payments.
    pub fn payment(&self) -> PaymentService<'_> {
        PaymentService::new(self)
    }

    /// Administrator user management.
    pub fn admin_users(&self) -> AdminUserService<'_> {
        AdminUserService::new(self)
    }

    /// Administrator order management.
    pub fn admin_orders(&self) -> AdminOrderService<'_> {
        AdminOrderService::new(self)
    }
}
