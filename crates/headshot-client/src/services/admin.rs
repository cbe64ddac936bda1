//! Administrator user and order management.

use crate::client::ApiClient;
use crate::error::Result;
use crate::models::{
    CreditGrant, CreditGrantResult, ManualOrder, Order, OrderList, OrderQuery, RoleChange, User,
    UserList,
};
use crate::request::{RequestBody, RequestOptions};

/// User management routes under `/admin/users`.
#[derive(Debug, Clone, Copy)]
pub struct AdminUserService<'a> {
    client: &'a ApiClient,
}

impl<'a> AdminUserService<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Every account.
    pub async fn list(&self) -> Result<UserList> {
        self.client.get("/admin/users", None).await
    }

    /// Change an account's role.
    pub async fn update_role(&self, change: &RoleChange) -> Result<User> {
        self.client
            .put("/admin/users/role", Some(RequestBody::json(change)?), None)
            .await
    }

    /// Grant credits to an account.
    pub async fn add_credits(&self, grant: &CreditGrant) -> Result<CreditGrantResult> {
        self.client
            .post("/admin/users/credits", Some(RequestBody::json(grant)?), None)
            .await
    }

    /// Delete an account.
    pub async fn delete(&self, user_id: &str) -> Result<()> {
        self.client
            .delete::<serde_json::Value>(&format!("/admin/users/{user_id}"), None)
            .await?;
        Ok(())
    }
}

/// Order management routes under `/admin/orders`.
#[derive(Debug, Clone, Copy)]
pub struct AdminOrderService<'a> {
    client: &'a ApiClient,
}

impl<'a> AdminOrderService<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// One page of orders, optionally filtered by status and platform.
    pub async fn list(&self, query: &OrderQuery) -> Result<OrderList> {
        let options = RequestOptions::new()
            .query("limit", query.limit)
            .query("page", query.page)
            .query_opt("status", query.status.map(|s| s.as_str()))
            .query_opt("platform", query.platform.map(|p| p.as_str()));
        self.client.get("/admin/orders", Some(options)).await
    }

    /// Record an order on behalf of a user (e.g. a cash payment).
    pub async fn create_manual(&self, order: &ManualOrder) -> Result<Order> {
        self.client
            .post("/admin/orders/manual", Some(RequestBody::json(order)?), None)
            .await
    }
}
