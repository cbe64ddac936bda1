//! CLI argument definitions for `headshot`.
//!
//! All `clap` structures live here so that `main.rs` stays focused on
//! dispatching subcommands.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use headshot_client::models::{HeadshotStatus, PaymentPlatform, PaymentStatus, UserRole};

use crate::helpers::{parse_headshot_status, parse_payment_status, parse_wire};

/// Headshot -- AI professional headshots from the command line.
#[derive(Parser)]
#[command(
    name = "headshot",
    version,
    about = "Headshot -- AI professional headshots from the command line",
    long_about = "Talks to the headshot backend: account management, photo uploads, \
                  credit purchases and administration. Output is JSON."
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by every subcommand.
#[derive(Args)]
pub struct GlobalArgs {
    /// Backend base URL (overrides config file and HEADSHOT_API_URL).
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// TOML file with client settings.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log in with this email before running the command.
    #[arg(long, global = true, env = "HEADSHOT_EMAIL")]
    pub email: Option<String>,

    /// Password for --email.
    #[arg(long, global = true, env = "HEADSHOT_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Enable debug logging.
    #[arg(long, short, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Log in and show the account.
    Login,

    /// Create an account with --email and --password.
    Register {
        /// Display name.
        #[arg(long)]
        name: String,
    },

    /// Confirm an email address.
    VerifyEmail {
        /// Token from the verification mail.
        token: String,
    },

    /// Send another verification mail.
    ResendVerification {
        /// Address to send it to.
        email: String,
    },

    /// Show the logged-in account.
    Me,

    /// End the session on the backend.
    Logout,

    /// Manage headshots.
    Headshots {
        #[command(subcommand)]
        action: HeadshotAction,
    },

    /// Buy credits and view past orders.
    Payment {
        #[command(subcommand)]
        action: PaymentAction,
    },

    /// Administrator commands.
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
}

/// Actions on headshots.
#[derive(Subcommand)]
pub enum HeadshotAction {
    /// List the available styles.
    Styles,
    /// Upload a photo and start generation.
    Upload {
        /// Path to the photo.
        photo: PathBuf,
        /// Style to generate (repeatable).
        #[arg(long = "style", short, required = true)]
        styles: Vec<String>,
        /// Free-text prompt.
        #[arg(long)]
        prompt: Option<String>,
    },
    /// List your headshots.
    List {
        #[arg(long)]
        page: Option<u32>,
        #[arg(long)]
        limit: Option<u32>,
        /// pending, processing, completed or failed.
        #[arg(long, value_parser = parse_headshot_status)]
        status: Option<HeadshotStatus>,
    },
    /// Show one headshot.
    Get {
        id: String,
    },
    /// Delete a headshot.
    Delete {
        id: String,
    },
    /// Poll until no headshot is processing.
    Watch {
        /// Seconds between polls.
        #[arg(long, default_value_t = 5)]
        interval: u64,
    },
}

/// Actions on payments.
#[derive(Subcommand)]
pub enum PaymentAction {
    /// List credit packages.
    Packages,
    /// Pay for a credit package.
    Buy {
        /// Package id.
        package_id: String,
        /// STRIPE, EVC, ZAAD, SAHAL, EBIR or LOCAL.
        #[arg(long, value_parser = parse_wire::<PaymentPlatform>)]
        platform: PaymentPlatform,
        /// Mobile-money phone number.
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        success_url: Option<String>,
        #[arg(long)]
        cancel_url: Option<String>,
    },
    /// Show recent orders.
    History {
        #[arg(long, default_value_t = 10)]
        limit: u32,
    },
}

/// Administrator actions.
#[derive(Subcommand)]
pub enum AdminAction {
    /// List all users.
    Users,
    /// Change a user's role.
    SetRole {
        user_id: String,
        /// ADMIN or USER.
        #[arg(value_parser = parse_wire::<UserRole>)]
        role: UserRole,
    },
    /// Grant credits to a user.
    AddCredits {
        user_id: String,
        credits: i64,
    },
    /// Delete a user.
    DeleteUser {
        user_id: String,
    },
    /// List orders.
    Orders {
        #[arg(long, default_value_t = 10)]
        limit: u32,
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, value_parser = parse_payment_status)]
        status: Option<PaymentStatus>,
        #[arg(long, value_parser = parse_wire::<PaymentPlatform>)]
        platform: Option<PaymentPlatform>,
    },
    /// Record an order on behalf of a user.
    ManualOrder {
        user_id: String,
        package_id: String,
        amount: f64,
    },
}
