//! Domain types exchanged with the backend.
//!
//! Field names follow the backend's camelCase JSON; identifiers arrive as
//! `_id`, `id` or both (see [`RecordId`]).

use std::fmt;
use std::ops::Deref;

use chrono::{DateTime, Utc};
use serde::de::{self, Deserializer};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Identifiers
// ---------------------------------------------------------------------------

/// Identifier of a backend record.
///
/// Flattened into its record: read from `_id` or `id` (`_id` wins when both
/// are present), written back as `_id`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Deref for RecordId {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for RecordId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for RecordId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for RecordId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl PartialEq<str> for RecordId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for RecordId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Both identifier keys as they may appear on the wire.
#[derive(Deserialize)]
struct WireId {
    #[serde(rename = "_id")]
    mongo: Option<String>,
    id: Option<String>,
}

impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let wire = WireId::deserialize(deserializer)?;
        wire.mongo
            .or(wire.id)
            .map(Self)
            .ok_or_else(|| de::Error::missing_field("_id"))
    }
}

impl Serialize for RecordId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry("_id", &self.0)?;
        map.end()
    }
}

// ---------------------------------------------------------------------------
// Users and auth
// ---------------------------------------------------------------------------

/// Role of an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum UserRole {
    /// Administrator with access to user and order management.
    Admin,
    /// Regular customer.
    User,
}

impl UserRole {
    /// Wire name of the role.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "ADMIN",
            Self::User => "USER",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An account as returned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(flatten)]
    pub id: RecordId,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub role: UserRole,
    #[serde(default)]
    pub credits: i64,
    #[serde(default)]
    pub is_email_verified: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Registration form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterInput {
    pub email: String,
    pub password: String,
    pub name: String,
}

/// Login form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

/// `{ user }` payload returned by register, login and `/auth/me`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserPayload {
    pub user: User,
}

/// Payload returned by the email verification endpoints.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VerifyEmailResult {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: String,
}

// ---------------------------------------------------------------------------
// Headshots
// ---------------------------------------------------------------------------

/// Generation state of a headshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeadshotStatus {
    Pending,
    Processing,
    Completed,
    Failed,
    /// A state this client does not know about.
    #[serde(other)]
    Unknown,
}

impl HeadshotStatus {
    /// Wire name of the status.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for HeadshotStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A generated (or in-progress) headshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Headshot {
    #[serde(flatten)]
    pub id: RecordId,
    pub status: HeadshotStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// A style the backend can render headshots in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleInfo {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Filters for listing headshots.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HeadshotQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub status: Option<HeadshotStatus>,
}

/// A page of headshots.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HeadshotList {
    #[serde(default)]
    pub headshots: Vec<Headshot>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
}

impl HeadshotList {
    /// `true` while any listed headshot is still being generated.
    pub fn has_processing(&self) -> bool {
        self.headshots
            .iter()
            .any(|h| h.status == HeadshotStatus::Processing)
    }
}

/// A photo upload requesting headshots in one or more styles.
#[derive(Debug, Clone, PartialEq)]
pub struct PhotoUpload {
    /// File name reported to the backend.
    pub file_name: String,
    /// MIME type of the photo, e.g. `image/jpeg`.
    pub mime: Option<String>,
    /// Photo contents.
    pub bytes: Vec<u8>,
    /// Style identifiers to generate.
    pub styles: Vec<String>,
    /// Optional free-text prompt.
    pub prompt: Option<String>,
}

/// Result of a photo upload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResult {
    #[serde(default)]
    pub headshots: Vec<Headshot>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credits_used: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remaining_credits: Option<i64>,
}

/// `{ headshot }` payload of the single-headshot endpoint.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct HeadshotPayload {
    pub headshot: Headshot,
}

// ---------------------------------------------------------------------------
// Payments and orders
// ---------------------------------------------------------------------------

/// Payment provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PaymentPlatform {
    Stripe,
    Evc,
    Zaad,
    Sahal,
    Ebir,
    Local,
}

impl PaymentPlatform {
    /// Wire name of the platform.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Stripe => "STRIPE",
            Self::Evc => "EVC",
            Self::Zaad => "ZAAD",
            Self::Sahal => "SAHAL",
            Self::Ebir => "EBIR",
            Self::Local => "LOCAL",
        }
    }
}

impl fmt::Display for PaymentPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle state of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PaymentStatus {
    Pending,
    Processing,
    Completed,
    Failed,
    Refunded,
    /// A state this client does not know about.
    #[serde(other)]
    Unknown,
}

impl PaymentStatus {
    /// Wire name of the status.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Processing => "PROCESSING",
            Self::Completed => "COMPLETED",
            Self::Failed => "FAILED",
            Self::Refunded => "REFUNDED",
            Self::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A purchasable bundle of credits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditPackage {
    #[serde(flatten)]
    pub id: RecordId,
    pub name: String,
    pub credits: i64,
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Request to pay for a credit package.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    pub package_id: String,
    pub platform: PaymentPlatform,
    /// Mobile-money phone number, for local platforms.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cancel_url: Option<String>,
}

/// Result of starting a payment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentResult {
    /// Hosted checkout page to send the user to, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<Order>,
}

/// A reference that the backend returns either as a bare id or populated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Reference {
    Id(String),
    Object(ReferencedObject),
}

/// The populated form of a [`Reference`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReferencedObject {
    #[serde(flatten)]
    pub id: RecordId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Reference {
    /// Best human-readable label: email, then name, then id.
    pub fn label(&self) -> &str {
        match self {
            Self::Id(id) => id,
            Self::Object(obj) => obj
                .email
                .as_deref()
                .or(obj.name.as_deref())
                .unwrap_or(obj.id.as_str()),
        }
    }
}

/// A credit purchase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(flatten)]
    pub id: RecordId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<Reference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package: Option<Reference>,
    #[serde(default)]
    pub amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credits: Option<i64>,
    pub status: PaymentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<PaymentPlatform>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Paging metadata on list replies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub total: u64,
    pub page: u64,
    pub limit: u64,
    pub pages: u64,
}

// ---------------------------------------------------------------------------
// Admin
// ---------------------------------------------------------------------------

/// All accounts, as returned by the admin user list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserList {
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub total: u64,
}

/// Change of an account's role.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleChange {
    pub user_id: String,
    pub role: UserRole,
}

/// Credit grant to an account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditGrant {
    pub user_id: String,
    pub credits: i64,
}

/// Result of a credit grant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditGrantResult {
    pub user: User,
    pub added_credits: i64,
}

/// Filters for the admin order list.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderQuery {
    pub limit: u32,
    pub page: u32,
    pub status: Option<PaymentStatus>,
    pub platform: Option<PaymentPlatform>,
}

impl Default for OrderQuery {
    fn default() -> Self {
        Self {
            limit: 10,
            page: 1,
            status: None,
            platform: None,
        }
    }
}

/// A page of orders.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderList {
    #[serde(default)]
    pub orders: Vec<Order>,
    #[serde(default)]
    pub pagination: Pagination,
}

/// An order created by an administrator on behalf of a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManualOrder {
    pub user_id: String,
    pub package_id: String,
    pub amount: f64,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn user_from_backend_json() {
        let user: User = serde_json::from_value(json!({
            "_id": "u1",
            "email": "ada@example.com",
            "name": "Ada",
            "role": "ADMIN",
            "credits": 12,
            "isEmailVerified": true,
            "createdAt": "2025-03-01T10:00:00.000Z"
        }))
        .unwrap();

        assert_eq!(user.id, "u1");
        assert_eq!(user.role, UserRole::Admin);
        assert_eq!(user.credits, 12);
        assert!(user.is_email_verified);
        assert!(user.is_active.is_none());
        assert!(user.created_at.is_some());
    }

    #[test]
    fn user_accepts_plain_id() {
        let user: User = serde_json::from_value(json!({
            "id": "u2",
            "email": "bob@example.com",
            "role": "USER"
        }))
        .unwrap();
        assert_eq!(user.id, "u2");
        assert_eq!(user.credits, 0);
    }

    #[test]
    fn user_with_both_id_keys() {
        let user: User = serde_json::from_value(json!({
            "_id": "u1",
            "id": "u1",
            "email": "ada@example.com",
            "role": "USER"
        }))
        .unwrap();
        assert_eq!(user.id, "u1");

        let order: Order = serde_json::from_value(json!({
            "_id": "o1",
            "id": "o1",
            "user": { "_id": "u1", "id": "u1", "email": "ada@example.com" },
            "status": "PENDING"
        }))
        .unwrap();
        assert_eq!(order.id, "o1");
        assert_eq!(order.user.unwrap().label(), "ada@example.com");
    }

    #[test]
    fn underscore_id_wins_over_plain_id() {
        let pkg: CreditPackage = serde_json::from_value(json!({
            "_id": "p1",
            "id": "legacy",
            "name": "Starter",
            "credits": 10,
            "price": 9.99
        }))
        .unwrap();
        assert_eq!(pkg.id, "p1");
    }

    #[test]
    fn record_without_id_is_rejected() {
        let err = serde_json::from_value::<Headshot>(json!({ "status": "pending" })).unwrap_err();
        assert!(err.to_string().contains("_id"));
    }

    #[test]
    fn id_is_written_back_once() {
        let h: Headshot = serde_json::from_value(json!({ "id": "h1", "status": "completed" })).unwrap();
        assert_eq!(
            serde_json::to_value(&h).unwrap(),
            json!({ "_id": "h1", "status": "completed" })
        );
    }

    #[test]
    fn unknown_payment_status_is_tolerated() {
        let orders: Vec<Order> = serde_json::from_value(json!([
            { "_id": "o1", "status": "COMPLETED" },
            { "_id": "o2", "status": "CHARGEBACK" }
        ]))
        .unwrap();
        assert_eq!(orders[1].status, PaymentStatus::Unknown);
    }

    #[test]
    fn unknown_headshot_status_is_tolerated() {
        let h: Headshot =
            serde_json::from_value(json!({ "_id": "h1", "status": "queued" })).unwrap();
        assert_eq!(h.status, HeadshotStatus::Unknown);
    }

    #[test]
    fn processing_detection() {
        let list: HeadshotList = serde_json::from_value(json!({
            "headshots": [
                { "_id": "h1", "status": "completed" },
                { "_id": "h2", "status": "processing" }
            ]
        }))
        .unwrap();
        assert!(list.has_processing());
        assert!(!HeadshotList::default().has_processing());
    }

    #[test]
    fn order_references_both_shapes() {
        let order: Order = serde_json::from_value(json!({
            "_id": "o1",
            "user": { "_id": "u1", "email": "ada@example.com" },
            "package": "p1",
            "amount": 10,
            "status": "COMPLETED",
            "platform": "STRIPE"
        }))
        .unwrap();

        assert_eq!(order.user.as_ref().unwrap().label(), "ada@example.com");
        assert_eq!(order.package.as_ref().unwrap().label(), "p1");
        assert_eq!(order.platform, Some(PaymentPlatform::Stripe));
        assert_eq!(order.amount, 10.0);
    }

    #[test]
    fn payment_request_omits_absent_fields() {
        let req = PaymentRequest {
            package_id: "p1".into(),
            platform: PaymentPlatform::Evc,
            phone: Some("252610000000".into()),
            success_url: None,
            cancel_url: None,
        };
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({ "packageId": "p1", "platform": "EVC", "phone": "252610000000" })
        );
    }

    #[test]
    fn wire_names_match_serde() {
        for status in [
            PaymentStatus::Pending,
            PaymentStatus::Processing,
            PaymentStatus::Completed,
            PaymentStatus::Failed,
            PaymentStatus::Refunded,
        ] {
            assert_eq!(serde_json::to_value(status).unwrap(), json!(status.as_str()));
        }
        assert_eq!(
            serde_json::to_value(HeadshotStatus::Processing).unwrap(),
            json!("processing")
        );
        assert_eq!(UserRole::Admin.to_string(), "ADMIN");
    }
}
