//! Himsols CLI - Storefront pages in the terminal.
//!
//! # Usage
//!
//! ```bash
//! # Browse trees, optionally by category
//! himsols catalog --category Medicinal
//!
//! # Show the demo cart after some edits
//! himsols cart dec:1 add:5
//!
//! # Place an order
//! himsols checkout --name "Ravi" --mobile 9876543210 --address "12 MG Road" --pincode 560001
//!
//! # Send a contact message (waits for the form to reset)
//! himsols contact --name Asha --mobile 9876543210 --message "Need saplings"
//!
//! # Request a service
//! himsols service-request conservation --name Asha --mobile 9876543210 --address "Ward 4"
//!
//! # Interactive session
//! himsols session
//! ```
//!
//! # Commands
//!
//! - `catalog` - List trees
//! - `services` - List services and service-request types
//! - `cart` - Show the demo cart
//! - `checkout` - Check out the demo cart
//! - `contact`, `login`, `signup`, `service-request` - Submit a form
//! - `session` - Interactive session over stdin

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Args, Parser, Subcommand};
use himsols_cli::commands::{self, cart::CartOp};
use himsols_cli::{CliConfig, Output, session};
use himsols_core::{FormKind, RequestForm};
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "himsols")]
#[command(author, version, about = "Himsols storefront in the terminal")]
struct Cli {
    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List trees in the catalog
    Catalog {
        /// Only show this category
        #[arg(short, long)]
        category: Option<String>,
    },
    /// List services, service-request types and urgency levels
    Services,
    /// Show the demo cart after applying operations
    Cart {
        /// Operations such as `inc:1`, `dec:1`, `rm:3`, `add:5`
        ops: Vec<CartOp>,
    },
    /// Check out the demo cart
    Checkout(CheckoutArgs),
    /// Send a contact message
    Contact(ContactArgs),
    /// Log in
    Login(LoginArgs),
    /// Create an account
    Signup(SignupArgs),
    /// Request a service
    ServiceRequest(ServiceRequestArgs),
    /// Interactive session over stdin
    Session,
}

#[derive(Args)]
struct CheckoutArgs {
    /// Cart operations applied before checkout
    #[arg(long = "op")]
    ops: Vec<CartOp>,
    #[arg(long, default_value = "")]
    name: String,
    #[arg(long, default_value = "")]
    mobile: String,
    #[arg(long, default_value = "")]
    email: String,
    #[arg(long, default_value = "")]
    address: String,
    #[arg(long, default_value = "")]
    pincode: String,
    #[arg(long, default_value = "")]
    notes: String,
}

#[derive(Args)]
struct ContactArgs {
    #[arg(long, default_value = "")]
    name: String,
    #[arg(long, default_value = "")]
    mobile: String,
    #[arg(long, default_value = "")]
    email: String,
    #[arg(long, default_value = "")]
    message: String,
    /// Exit right after submitting instead of waiting for the reset
    #[arg(long)]
    no_wait: bool,
}

#[derive(Args)]
struct LoginArgs {
    #[arg(long, default_value = "")]
    email: String,
    #[arg(long, default_value = "")]
    password: String,
}

#[derive(Args)]
struct SignupArgs {
    #[arg(long, default_value = "")]
    name: String,
    #[arg(long, default_value = "")]
    email: String,
    #[arg(long, default_value = "")]
    mobile: String,
    #[arg(long, default_value = "")]
    password: String,
    #[arg(long, default_value = "")]
    confirm_password: String,
}

#[derive(Args)]
struct ServiceRequestArgs {
    /// `waste-management`, `conservation`, or `events`
    service_type: String,
    #[arg(long, default_value = "")]
    name: String,
    #[arg(long, default_value = "")]
    mobile: String,
    #[arg(long, default_value = "")]
    email: String,
    #[arg(long, default_value = "")]
    address: String,
    #[arg(long, default_value = "")]
    pincode: String,
    /// `low`, `medium`, `high`, or `urgent`
    #[arg(long, default_value = "")]
    urgency: String,
    #[arg(long, default_value = "")]
    description: String,
    #[arg(long, default_value = "")]
    preferred_date: String,
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &CliConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match CliConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing_subscriber::fmt().with_writer(std::io::stderr).init();
            tracing::error!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    // Sentry must be initialized before the tracing subscriber
    let _sentry_guard = init_sentry(&config);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "himsols=info,himsols_cli=info,himsols_core=info".into());

    // Logs go to stderr so `--json` output stays parseable
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli, &config).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: &CliConfig) -> Result<(), Box<dyn std::error::Error>> {
    let output = Output::from_json_flag(cli.json);
    match cli.command {
        Commands::Catalog { category } => {
            commands::catalog::trees(category.as_deref(), output)?;
        }
        Commands::Services => commands::catalog::services(output)?,
        Commands::Cart { ops } => commands::cart::show(&ops, output)?,
        Commands::Checkout(args) => {
            let fields = [
                ("name", args.name),
                ("mobile", args.mobile),
                ("email", args.email),
                ("address", args.address),
                ("pincode", args.pincode),
                ("notes", args.notes),
            ];
            let ids = config.request_ids.build();
            commands::cart::checkout(&args.ops, &fields, ids.as_ref(), output)?;
        }
        Commands::Contact(args) => {
            let fields = [
                ("name", args.name),
                ("mobile", args.mobile),
                ("email", args.email),
                ("message", args.message),
            ];
            let form = RequestForm::new(FormKind::Contact);
            commands::forms::submit(form, &fields, config, !args.no_wait, output).await?;
        }
        Commands::Login(args) => {
            let fields = [("email", args.email), ("password", args.password)];
            let form = RequestForm::new(FormKind::Login);
            commands::forms::submit(form, &fields, config, false, output).await?;
        }
        Commands::Signup(args) => {
            let fields = [
                ("name", args.name),
                ("email", args.email),
                ("mobile", args.mobile),
                ("password", args.password),
                ("confirmPassword", args.confirm_password),
            ];
            let form = RequestForm::new(FormKind::Signup);
            commands::forms::submit(form, &fields, config, false, output).await?;
        }
        Commands::ServiceRequest(args) => {
            let fields = [
                ("name", args.name),
                ("mobile", args.mobile),
                ("email", args.email),
                ("address", args.address),
                ("pincode", args.pincode),
                ("urgency", args.urgency),
                ("description", args.description),
                ("preferredDate", args.preferred_date),
            ];
            let form = RequestForm::service_request(&args.service_type);
            commands::forms::submit(form, &fields, config, false, output).await?;
        }
        Commands::Session => session::run(config).await?,
    }
    Ok(())
}
