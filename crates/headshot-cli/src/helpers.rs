//! Shared helper functions used across CLI subcommands.
//!
//! Includes tracing initialization, argument parsers, output formatting and
//! the mapping from client errors to user-facing messages.

use std::path::Path;

use headshot_client::ApiError;
use headshot_client::models::{HeadshotStatus, PaymentStatus};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing_subscriber::EnvFilter;

// ---------------------------------------------------------------------------
// Tracing
// ---------------------------------------------------------------------------

/// Initialize the tracing subscriber with the given default log level.
///
/// Logs go to stderr so that stdout stays machine-readable JSON.
pub fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

// ---------------------------------------------------------------------------
// Argument parsing
// ---------------------------------------------------------------------------

/// Parse a wire enum (`"STRIPE"`, `"ADMIN"`, ...) case-insensitively.
///
/// Only for enums without a catch-all variant; a `#[serde(other)]` fallback
/// would accept the first casing tried.
pub fn parse_wire<T: DeserializeOwned>(raw: &str) -> Result<T, String> {
    let trimmed = raw.trim();
    [trimmed.to_uppercase(), trimmed.to_lowercase()]
        .into_iter()
        .find_map(decode_wire)
        .ok_or_else(|| format!("unrecognised value {raw:?}"))
}

/// Parse a headshot status from its lowercase wire form, rejecting values
/// the backend does not know.
pub fn parse_headshot_status(raw: &str) -> Result<HeadshotStatus, String> {
    match decode_wire(raw.trim().to_lowercase()) {
        Some(HeadshotStatus::Unknown) | None => Err(format!(
            "unrecognised status {raw:?} (expected pending, processing, completed or failed)"
        )),
        Some(status) => Ok(status),
    }
}

/// Parse an order status from its uppercase wire form, rejecting values the
/// backend does not know.
pub fn parse_payment_status(raw: &str) -> Result<PaymentStatus, String> {
    match decode_wire(raw.trim().to_uppercase()) {
        Some(PaymentStatus::Unknown) | None => Err(format!(
            "unrecognised status {raw:?} \
             (expected pending, processing, completed, failed or refunded)"
        )),
        Some(status) => Ok(status),
    }
}

fn decode_wire<T: DeserializeOwned>(candidate: String) -> Option<T> {
    serde_json::from_value(serde_json::Value::String(candidate)).ok()
}

/// MIME type for a photo, from its extension.
pub fn guess_image_mime(path: &Path) -> Option<String> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    let mime = match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "webp" => "image/webp",
        "heic" => "image/heic",
        _ => return None,
    };
    Some(mime.to_owned())
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// Print `value` as pretty JSON on stdout.
pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// The message shown for a failed command.
///
/// Session expiry and connectivity problems get actionable hints; other
/// errors show the backend's status and message.
pub fn describe_error(err: &anyhow::Error, base_url: &str) -> String {
    let Some(api) = err.downcast_ref::<ApiError>() else {
        return format!("Error: {err:#}");
    };

    if api.is_session_expired() {
        "Your session has expired. Log in again with --email and --password \
         (or HEADSHOT_EMAIL / HEADSHOT_PASSWORD)."
            .to_owned()
    } else if api.is_network() {
        format!(
            "Could not reach the backend at {base_url}. Check your connection \
             and --api-url / HEADSHOT_API_URL."
        )
    } else if api.status() == 0 {
        format!("Error: {}", api.message())
    } else {
        format!("Error ({}): {}", api.status(), api.message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use headshot_client::models::{PaymentPlatform, UserRole};

    #[test]
    fn wire_values_are_case_insensitive() {
        assert_eq!(parse_wire::<UserRole>("admin"), Ok(UserRole::Admin));
        assert_eq!(
            parse_wire::<PaymentPlatform>(" Zaad "),
            Ok(PaymentPlatform::Zaad)
        );
        assert!(parse_wire::<PaymentPlatform>("paypal").is_err());
    }

    #[test]
    fn unknown_headshot_status_is_rejected() {
        assert_eq!(
            parse_headshot_status("COMPLETED"),
            Ok(HeadshotStatus::Completed)
        );
        assert_eq!(
            parse_headshot_status("processing"),
            Ok(HeadshotStatus::Processing)
        );
        assert!(parse_headshot_status("queued").is_err());
        assert!(parse_headshot_status("unknown").is_err());
    }

    #[test]
    fn payment_status_is_case_insensitive_and_strict() {
        assert_eq!(
            parse_payment_status("refunded"),
            Ok(PaymentStatus::Refunded)
        );
        assert_eq!(
            parse_payment_status("COMPLETED"),
            Ok(PaymentStatus::Completed)
        );
        assert!(parse_payment_status("settled").is_err());
    }

    #[test]
    fn mime_from_extension() {
        assert_eq!(
            guess_image_mime(Path::new("me.JPG")).as_deref(),
            Some("image/jpeg")
        );
        assert_eq!(guess_image_mime(Path::new("me.txt")), None);
        assert_eq!(guess_image_mime(Path::new("me")), None);
    }

    #[test]
    fn error_messages() {
        let backend = anyhow::Error::new(ApiError::Backend {
            status: 404,
            message: "Package not found".into(),
            data: None,
        });
        assert_eq!(
            describe_error(&backend, "http://x"),
            "Error (404): Package not found"
        );

        let expired = anyhow::Error::new(ApiError::Unauthenticated {
            method: "GET".into(),
            endpoint: "/auth/me".into(),
        });
        assert!(describe_error(&expired, "http://x").contains("session has expired"));

        let other = anyhow::anyhow!("cannot read photo");
        assert_eq!(describe_error(&other, "http://x"), "Error: cannot read photo");
    }
}
