//! CLI entry point for the headshot backend.
//!
//! This binary provides the `headshot` command. Each invocation builds a
//! fresh client (optionally logging in first with `--email`/`--password`),
//! runs one subcommand and prints the result as JSON.

mod cli;
mod helpers;

use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::Parser;
use headshot_client::models::{
    CreditGrant, HeadshotQuery, HeadshotStatus, LoginInput, ManualOrder, OrderQuery,
    PaymentRequest, PhotoUpload, RegisterInput, RoleChange,
};
use headshot_client::{ApiClient, ClientConfig, ConfigOverrides};
use tracing::{debug, info};

use cli::{AdminAction, Cli, Commands, GlobalArgs, HeadshotAction, PaymentAction};
use helpers::{describe_error, guess_image_mime, init_tracing, print_json};

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> ExitCode {
    // A missing .env file is fine.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(if cli.global.verbose { "debug" } else { "warn" });

    let config = match resolve_config(&cli.global) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", describe_error(&e, "<unconfigured>"));
            return ExitCode::FAILURE;
        }
    };
    let base_url = config.base_url.clone();

    match run(cli, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            debug!(error = ?e, "command failed");
            eprintln!("{}", describe_error(&e, &base_url));
            ExitCode::FAILURE
        }
    }
}

/// Resolve client settings: flag > config file > environment > default.
fn resolve_config(global: &GlobalArgs) -> Result<ClientConfig> {
    let mut config = ClientConfig::from_env()?;

    if let Some(path) = &global.config {
        let overrides = ConfigOverrides::load(path)?;
        config = config.with_overrides(overrides);
        debug!(path = %path.display(), "config file applied");
    }

    if let Some(url) = &global.api_url {
        config = config.with_overrides(ConfigOverrides {
            base_url: Some(url.clone()),
            ..ConfigOverrides::default()
        });
    }

    config.parsed_base_url()?;
    Ok(config)
}

async fn run(cli: Cli, config: ClientConfig) -> Result<()> {
    let client = ApiClient::new(config)?;
    let global = cli.global;

    match cli.command {
        Commands::Login => {
            let input = credentials(&global)?;
            let user = client.auth().login(&input).await?;
            print_json(&user)
        }
        Commands::Register { name } => {
            let LoginInput { email, password } = credentials(&global)?;
            let user = client
                .auth()
                .register(&RegisterInput {
                    email,
                    password,
                    name,
                })
                .await?;
            print_json(&user)
        }
        Commands::VerifyEmail { token } => {
            print_json(&client.auth().verify_email(&token).await?)
        }
        Commands::ResendVerification { email } => {
            print_json(&client.auth().resend_verification(&email).await?)
        }
        Commands::Me => {
            login_if_requested(&client, &global).await?;
            print_json(&client.auth().current_user().await?)
        }
        Commands::Logout => {
            login_if_requested(&client, &global).await?;
            client.auth().logout().await?;
            print_json(&serde_json::json!({ "loggedOut": true }))
        }
        Commands::Headshots { action } => {
            login_if_requested(&client, &global).await?;
            cmd_headshots(&client, action).await
        }
        Commands::Payment { action } => {
            login_if_requested(&client, &global).await?;
            cmd_payment(&client, action).await
        }
        Commands::Admin { action } => {
            login_if_requested(&client, &global).await?;
            cmd_admin(&client, action).await
        }
    }
}

/// `--email` and `--password`, both required.
fn credentials(global: &GlobalArgs) -> Result<LoginInput> {
    match (&global.email, &global.password) {
        (Some(email), Some(password)) => Ok(LoginInput {
            email: email.clone(),
            password: password.clone(),
        }),
        _ => bail!("--email and --password (or HEADSHOT_EMAIL / HEADSHOT_PASSWORD) are required"),
    }
}

/// Log in first when credentials were supplied; the session cookies only
/// live as long as this process.
async fn login_if_requested(client: &ApiClient, global: &GlobalArgs) -> Result<()> {
    if global.email.is_none() && global.password.is_none() {
        return Ok(());
    }
    let input = credentials(global)?;
    client.auth().login(&input).await?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Subcommand: headshots
// ---------------------------------------------------------------------------

async fn cmd_headshots(client: &ApiClient, action: HeadshotAction) -> Result<()> {
    let headshots = client.headshots();

    match action {
        HeadshotAction::Styles => print_json(&headshots.styles().await?),
        HeadshotAction::Upload {
            photo,
            styles,
            prompt,
        } => {
            let bytes = std::fs::read(&photo)
                .with_context(|| format!("cannot read photo {}", photo.display()))?;
            let file_name = photo
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("photo")
                .to_owned();
            let upload = PhotoUpload {
                mime: guess_image_mime(&photo),
                file_name,
                bytes,
                styles,
                prompt,
            };
            info!(file = %upload.file_name, styles = upload.styles.len(), "uploading photo");
            print_json(&headshots.upload(&upload).await?)
        }
        HeadshotAction::List {
            page,
            limit,
            status,
        } => {
            let query = HeadshotQuery {
                page,
                limit,
                status,
            };
            print_json(&headshots.list(&query).await?)
        }
        HeadshotAction::Get { id } => print_json(&headshots.get(&id).await?),
        HeadshotAction::Delete { id } => {
            headshots.delete(&id).await?;
            print_json(&serde_json::json!({ "deleted": id }))
        }
        HeadshotAction::Watch { interval } => {
            let last = headshots
                .watch(
                    &HeadshotQuery::default(),
                    Duration::from_secs(interval.max(1)),
                    |page| {
                        let processing = page
                            .headshots
                            .iter()
                            .filter(|h| h.status == HeadshotStatus::Processing)
                            .count();
                        eprintln!(
                            "{} headshots, {processing} processing",
                            page.headshots.len()
                        );
                    },
                )
                .await?;
            print_json(&last)
        }
    }
}

// ---------------------------------------------------------------------------
// Subcommand: payment
// ---------------------------------------------------------------------------

async fn cmd_payment(client: &ApiClient, action: PaymentAction) -> Result<()> {
    let payment = client.payment();

    match action {
        PaymentAction::Packages => print_json(&payment.packages().await?),
        PaymentAction::Buy {
            package_id,
            platform,
            phone,
            success_url,
            cancel_url,
        } => {
            let result = payment
                .process(&PaymentRequest {
                    package_id,
                    platform,
                    phone,
                    success_url,
                    cancel_url,
                })
                .await?;
            print_json(&result)?;
            if let Some(url) = &result.redirect_url {
                eprintln!("Open {url} to complete the payment.");
            }
            Ok(())
        }
        PaymentAction::History { limit } => print_json(&payment.history(limit).await?),
    }
}

// ---------------------------------------------------------------------------
// Subcommand: admin
// ---------------------------------------------------------------------------

async fn cmd_admin(client: &ApiClient, action: AdminAction) -> Result<()> {
    match action {
        AdminAction::Users => print_json(&client.admin_users().list().await?),
        AdminAction::SetRole { user_id, role } => {
            let change = RoleChange { user_id, role };
            print_json(&client.admin_users().update_role(&change).await?)
        }
        AdminAction::AddCredits { user_id, credits } => {
            let grant = CreditGrant { user_id, credits };
            print_json(&client.admin_users().add_credits(&grant).await?)
        }
        AdminAction::DeleteUser { user_id } => {
            client.admin_users().delete(&user_id).await?;
            print_json(&serde_json::json!({ "deleted": user_id }))
        }
        AdminAction::Orders {
            limit,
            page,
            status,
            platform,
        } => {
            let query = OrderQuery {
                limit,
                page,
                status,
                platform,
            };
            print_json(&client.admin_orders().list(&query).await?)
        }
        AdminAction::ManualOrder {
            user_id,
            package_id,
            amount,
        } => {
            let order = ManualOrder {
                user_id,
                package_id,
                amount,
            };
            print_json(&client.admin_orders().create_manual(&order).await?)
        }
    }
}
