//! Credit packages and payments.

use crate::client::ApiClient;
use crate::error::Result;
use crate::models::{CreditPackage, Order, PaymentRequest, PaymentResult};
use crate::request::{RequestBody, RequestOptions};

/// Payment routes under `/payment`.
#[derive(Debug, Clone, Copy)]
pub struct PaymentService<'a> {
    client: &'a ApiClient,
}

impl<'a> PaymentService<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Purchasable credit packages. A reply without data yields an empty
    /// list.
    pub async fn packages(&self) -> Result<Vec<CreditPackage>> {
        let packages: Option<Vec<CreditPackage>> =
            self.client.get("/payment/packages", None).await?;
        Ok(packages.unwrap_or_default())
    }

    /// Start a payment. Card payments answer with a `redirect_url` to a
    /// hosted checkout; mobile-money payments complete asynchronously.
    pub async fn process(&self, request: &PaymentRequest) -> Result<PaymentResult> {
        self.client
            .post("/payment/process", Some(RequestBody::json(request)?), None)
            .await
    }

    /// The current user's most recent orders.
    pub async fn history(&self, limit: u32) -> Result<Vec<Order>> {
        self.client
            .get(
                "/payment/history",
                Some(RequestOptions::new().query("limit", limit)),
            )
            .await
    }
}
