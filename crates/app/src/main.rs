//! SimpleText command-line front
//!
//! Thin surface over the identity provider and the entitlement tracker: it
//! signs identities in and out, renders tracker fields, and adapts user
//! input into the tracker's operations. All state lives in the shared
//! key-value store under the configured data directory.

mod config;
mod settings;

use std::io::Read;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use simpletext_entitlement::{
    EntitlementError, EntitlementRecord, EntitlementTracker, PaymentDetailsInput, UsageReport,
};
use simpletext_identity::{IdentityProvider, SocialProvider};
use simpletext_shared::{now_ms, FileStore, KeyValueStore, MemoryStore, PlanType};

use config::{AppConfig, StoreBackend};
use settings::{AppSettings, ColorScheme, FontScale, ThemePreference};

#[derive(Parser)]
#[command(name = "simpletext", version, about = "SimpleText account and subscription tool")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Sign in with an email address
    Signin {
        email: String,
        #[arg(long, default_value = "")]
        password: String,
    },
    /// Create an account
    Signup {
        name: String,
        email: String,
        #[arg(long, default_value = "")]
        password: String,
    },
    /// Sign in through a social provider (google or apple)
    Social { provider: SocialProvider },
    /// Sign out and discard the resident entitlement record
    Signout,
    /// Show the signed-in user and subscription state
    Status,
    /// Show the plan table
    Plans,
    /// Record a plan purchase that has already been authorized
    Subscribe {
        plan: PlanType,
        #[arg(long)]
        card_last4: Option<String>,
        #[arg(long)]
        card_brand: Option<String>,
        #[arg(long)]
        expiry_month: Option<u8>,
        #[arg(long)]
        expiry_year: Option<u16>,
    },
    /// Cancel the paid plan and revert to free
    Cancel,
    /// Charge tokens against the free-plan ceiling
    UseTokens {
        /// Plain token count
        #[arg(long, conflicts_with = "report")]
        tokens: Option<u64>,
        /// Read a completion-API usage report (JSON) from stdin instead
        #[arg(long)]
        report: bool,
    },
    /// Zero the usage counter for a new billing cycle
    ResetUsage,
    /// Show or change preferences
    Settings {
        #[arg(long)]
        theme: Option<ThemePreference>,
        #[arg(long)]
        font_size: Option<FontScale>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let config = AppConfig::from_env().context("loading configuration")?;
    let store: Arc<dyn KeyValueStore> = match config.store_backend {
        StoreBackend::File => Arc::new(FileStore::new(&config.data_dir)),
        StoreBackend::Memory => Arc::new(MemoryStore::new()),
    };

    let mut identity = IdentityProvider::new(store.clone());
    identity.load().await;
    let mut tracker = EntitlementTracker::new(store.clone());

    match cli.command {
        Command::Signin { email, password } => {
            let user = identity.sign_in(&email, &password).await?;
            let record = tracker.load_or_init(&user.id).await;
            println!("Signed in as {} <{}>", user.name, user.email);
            print_record(&record);
        }
        Command::Signup {
            name,
            email,
            password,
        } => {
            let user = identity.sign_up(&name, &email, &password).await?;
            let record = tracker.load_or_init(&user.id).await;
            println!("Welcome, {}!", user.name);
            print_record(&record);
        }
        Command::Social { provider } => {
            let user = identity.social_sign_in(provider).await;
            let record = tracker.load_or_init(&user.id).await;
            println!("Signed in as {} <{}>", user.name, user.email);
            print_record(&record);
        }
        Command::Signout => {
            if let Some(user) = identity.current_user() {
                let id = user.id;
                tracker.sign_out(&id);
            }
            identity.sign_out().await;
            println!("Signed out");
        }
        Command::Status => {
            let user = identity.require_user()?.clone();
            let record = tracker.load_or_init(&user.id).await;
            println!("Signed in as {} <{}>", user.name, user.email);
            print_record(&record);
        }
        Command::Plans => {
            for plan in [PlanType::Free, PlanType::Monthly, PlanType::Yearly] {
                let details = plan.details();
                let price = match plan {
                    PlanType::Free => "free".to_string(),
                    PlanType::Monthly => format!("{}/month", format_cents(details.price_monthly_cents)),
                    PlanType::Yearly => format!("{}/year", format_cents(details.price_yearly_cents)),
                };
                println!(
                    "{:<8} {:>10} tokens   {}",
                    details.name, details.token_limit, price
                );
            }
        }
        Command::Subscribe {
            plan,
            card_last4,
            card_brand,
            expiry_month,
            expiry_year,
        } => {
            let user = identity.require_user()?.clone();
            tracker.load_or_init(&user.id).await;

            let supplied_any = card_last4.is_some()
                || card_brand.is_some()
                || expiry_month.is_some()
                || expiry_year.is_some();
            let payment = supplied_any.then_some(PaymentDetailsInput {
                card_last4,
                card_brand,
                expiry_month,
                expiry_year,
            });

            tracker.subscribe_to_plan(&user.id, plan, payment).await?;
            println!("Subscribed to the {} plan", plan.display_name());
            if let Some(record) = tracker.record(&user.id) {
                print_record(record);
            }
        }
        Command::Cancel => {
            let user = identity.require_user()?.clone();
            tracker.load_or_init(&user.id).await;
            tracker.cancel_subscription(&user.id).await?;
            println!("Subscription cancelled");
            if let Some(record) = tracker.record(&user.id) {
                print_record(record);
            }
        }
        Command::UseTokens { tokens, report } => {
            let user = identity.require_user()?.clone();
            tracker.load_or_init(&user.id).await;

            let amount = if report {
                let mut raw = String::new();
                std::io::stdin()
                    .read_to_string(&mut raw)
                    .context("reading usage report from stdin")?;
                let parsed: UsageReport =
                    serde_json::from_str(&raw).context("parsing usage report")?;
                parsed.total_tokens()
            } else {
                tokens.context("pass --tokens <count> or --report")?
            };

            match tracker.use_tokens(&user.id, amount).await {
                Ok(()) => {
                    if let Some(record) = tracker.record(&user.id) {
                        print_record(record);
                    }
                }
                Err(EntitlementError::TokenLimitReached {
                    requested,
                    used,
                    limit,
                }) => {
                    println!(
                        "Token limit reached: {} used of {}, {} more requested. Upgrade to keep going.",
                        used, limit, requested
                    );
                    return Ok(ExitCode::from(2));
                }
                Err(e) => return Err(e.into()),
            }
        }
        Command::ResetUsage => {
            let user = identity.require_user()?.clone();
            tracker.load_or_init(&user.id).await;
            tracker.reset_token_usage(&user.id).await?;
            println!("Token usage reset");
        }
        Command::Settings { theme, font_size } => {
            let mut settings = AppSettings::load(store.as_ref()).await;
            let changed = theme.is_some() || font_size.is_some();
            if let Some(theme) = theme {
                settings.theme = theme;
            }
            if let Some(font_size) = font_size {
                settings.font_size_level = font_size;
            }
            if changed {
                settings.save(store.as_ref()).await;
            }

            // The host scheme is assumed light in the terminal
            let effective = settings.theme.resolve(ColorScheme::Light);
            let sizes = settings.font_size_level.sizes();
            println!("Theme:     {} (effective: {:?})", settings.theme, effective);
            println!(
                "Font size: {} ({}pt body, {}pt headings)",
                settings.font_size_level, sizes.normal, sizes.xlarge
            );
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn print_record(record: &EntitlementRecord) {
    println!("Plan:      {}", record.plan_type.display_name());
    if record.plan_type.meters_tokens() {
        println!(
            "Tokens:    {} / {} used",
            record.token_usage, record.token_limit
        );
    } else {
        println!("Tokens:    unlimited");
    }
    if record.expiry_date != 0 {
        println!("Renews:    {}", format_ms(record.expiry_date));
    }
    let trial_days = record.remaining_trial_days_at(now_ms());
    if trial_days > 0 {
        println!("Trial:     {} day(s) left", trial_days);
    }
    if let Some(card) = &record.payment_details {
        println!(
            "Card:      {} ending in {} ({:02}/{})",
            card.card_brand, card.card_last4, card.expiry_month, card.expiry_year
        );
    }
}

fn format_cents(cents: i64) -> String {
    format!("${}.{:02}", cents / 100, cents % 100)
}

fn format_ms(ms: i64) -> String {
    OffsetDateTime::from_unix_timestamp_nanos(i128::from(ms) * 1_000_000)
        .ok()
        .and_then(|t| t.format(&Rfc3339).ok())
        .unwrap_or_else(|| ms.to_string())
}
