//! CLI administration tool for chlorine-calculator.
//!
//! Provides commands for managing API tokens, correcting chlorine data,
//! auditing data freshness and performing database operations without
//! requiring HTTP API access.
//!
//! # Usage
//!
//! ```bash
//! # Create a new API token
//! cargo run --bin admin -- token create
//!
//! # Revoke a token
//! cargo run --bin admin -- token revoke "Data team"
//!
//! # Correct the chlorine average of a utility
//! cargo run --bin admin -- chlorine set TN0000511 --ppm 1.63 --source "2024 CCR"
//!
//! # List utilities with outdated or missing data
//! cargo run --bin admin -- audit --stale-after-days 180
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! Same as the server (see [`chlorine_calculator::config`]). In particular
//! `TOKEN_SIGNING_SECRET` must match the server's, otherwise created tokens
//! will not authenticate.

use chlorine_calculator::config::{self, Config};
use chlorine_calculator::domain::audit::{DEFAULT_STALE_AFTER_DAYS, Freshness};
use chlorine_calculator::domain::entities::{ChlorineData, NewChlorineData, Record, RecordKey};
use chlorine_calculator::infrastructure::persistence::{
    PgChlorineRepository, PgRecordStore, PgTokenRepository, PgUtilityRepository,
};
use chlorine_calculator::server;
use chlorine_calculator::state::{AppState, Repositories};

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::{Confirm, Input};
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for managing chlorine-calculator.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Manage API tokens
    Token {
        #[command(subcommand)]
        action: TokenAction,
    },

    /// Inspect or correct chlorine data
    Chlorine {
        #[command(subcommand)]
        action: ChlorineAction,
    },

    /// Report utilities with outdated or missing chlorine data
    Audit {
        /// Age in days after which data counts as outdated
        #[arg(long, default_value_t = DEFAULT_STALE_AFTER_DAYS)]
        stale_after_days: i64,

        /// Print the full report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Delete chlorine data marked as estimated
    CleanupEstimated {
        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Show row counts
    Stats,

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// Token management subcommands.
#[derive(Subcommand)]
enum TokenAction {
    /// Create a new API token
    Create {
        /// Token name (e.g., "Data team", "CCR importer")
        #[arg(short, long)]
        name: Option<String>,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// List all tokens
    List,

    /// Revoke a token
    Revoke {
        /// Token name or ID to revoke
        name_or_id: String,
    },
}

/// Chlorine data subcommands.
#[derive(Subcommand)]
enum ChlorineAction {
    /// Show the stored chlorine record of a utility
    Show { pwsid: String },

    /// Insert or replace the chlorine record of a utility
    Set {
        pwsid: String,

        /// Average free chlorine in PPM
        #[arg(long)]
        ppm: f64,

        #[arg(long)]
        min: Option<f64>,

        #[arg(long)]
        max: Option<f64>,

        #[arg(long)]
        samples: Option<i32>,

        /// Report date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Where the figures come from, e.g. "2024 Consumer Confidence Report"
        #[arg(long)]
        source: String,

        #[arg(long)]
        url: Option<String>,

        #[arg(long)]
        notes: Option<String>,

        /// Overwrite existing data even when the replacement policy keeps it
        #[arg(long)]
        force: bool,
    },

    /// Delete the chlorine record of a utility
    Delete {
        pwsid: String,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Show database info
    Info,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = config::load_from_env().context("Invalid configuration")?;
    let pool = server::connect_database(&config).await?;

    let state = app_state(&config, &pool).await;

    match cli.command {
        Commands::Token { action } => handle_token_action(action, &state).await?,
        Commands::Chlorine { action } => handle_chlorine_action(action, &state).await?,
        Commands::Audit {
            stale_after_days,
            json,
        } => handle_audit(&state, stale_after_days, json).await?,
        Commands::CleanupEstimated { yes } => handle_cleanup(&state, yes).await?,
        Commands::Stats => handle_stats(&pool).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

/// Builds the same services the server runs, so cache invalidation and
/// validation rules apply to CLI writes too.
async fn app_state(config: &Config, pool: &PgPool) -> AppState {
    let pool = Arc::new(pool.clone());
    let repositories = Repositories {
        utilities: Arc::new(PgUtilityRepository::new(pool.clone())),
        chlorine: Arc::new(PgChlorineRepository::new(pool.clone())),
        records: Arc::new(PgRecordStore::new(pool.clone())),
        tokens: Arc::new(PgTokenRepository::new(pool)),
    };

    AppState::new(
        repositories,
        server::connect_cache(config).await,
        config.token_signing_secret.clone(),
        config.default_glass_volume_liters,
    )
}

/// Dispatches token management commands.
async fn handle_token_action(action: TokenAction, state: &AppState) -> Result<()> {
    match action {
        TokenAction::Create { name, yes } => create_token(state, name, yes).await,
        TokenAction::List => list_tokens(state).await,
        TokenAction::Revoke { name_or_id } => revoke_token(state, name_or_id).await,
    }
}

/// Creates a new API token with interactive prompts.
///
/// Only the HMAC of the token is stored; the raw value is shown once.
async fn create_token(state: &AppState, name: Option<String>, skip_confirm: bool) -> Result<()> {
    println!("{}", "🔑 Create API Token".bright_blue().bold());
    println!();

    let token_name = match name {
        Some(n) => n,
        None => Input::new()
            .with_prompt("Token name")
            .with_initial_text("Data team")
            .interact_text()?,
    };

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt(format!("Create token '{token_name}'?"))
            .default(true)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    let (raw, token) = state.auth_service.issue_token(&token_name).await?;

    println!();
    println!("{}", "✅ Token created successfully!".green().bold());
    println!();
    println!("  ID:    {}", token.id.to_string().bright_black());
    println!("  Name:  {}", token.name.cyan());
    println!("  Token: {}", raw.bright_yellow().bold());
    println!();
    println!(
        "{}",
        "⚠️  IMPORTANT: Save this token now! You won't be able to see it again."
            .red()
            .bold()
    );
    println!();
    println!("{}", "Example:".bright_white());
    println!(
        "  curl -H \"Authorization: Bearer {}\" http://localhost:3000/api/admin/audit",
        raw.bright_yellow()
    );
    println!();

    Ok(())
}

/// Lists all API tokens with status indicators.
async fn list_tokens(state: &AppState) -> Result<()> {
    println!("{}", "📋 API Tokens".bright_blue().bold());
    println!();

    let tokens = state.auth_service.list_tokens().await?;

    if tokens.is_empty() {
        println!("{}", "  No tokens found".yellow());
        println!();
        println!(
            "  Create one with: {} admin token create",
            "cargo run --bin".bright_cyan()
        );
        return Ok(());
    }

    println!(
        "  {:<4} {:<30} {:<17} {:<17} {:<10}",
        "ID".bright_white().bold(),
        "Name".bright_white().bold(),
        "Created".bright_white().bold(),
        "Last used".bright_white().bold(),
        "Status".bright_white().bold()
    );
    println!("  {}", "─".repeat(84).bright_black());

    for token in &tokens {
        let status = if token.is_revoked() {
            "REVOKED".red()
        } else {
            "ACTIVE".green()
        };
        let last_used = token
            .last_used_at
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "never".to_string());

        println!(
            "  {:<4} {:<30} {:<17} {:<17} {}",
            token.id.to_string().bright_black(),
            token.name.cyan(),
            token
                .created_at
                .format("%Y-%m-%d %H:%M")
                .to_string()
                .bright_black(),
            last_used.bright_black(),
            status
        );
    }

    println!();
    println!(
        "  Total: {}",
        tokens.len().to_string().bright_white().bold()
    );
    println!();

    Ok(())
}

/// Revokes a token by name or ID after confirmation (default: No).
async fn revoke_token(state: &AppState, name_or_id: String) -> Result<()> {
    println!("{}", "🔒 Revoke API Token".bright_blue().bold());
    println!();

    let confirmed = Confirm::new()
        .with_prompt(format!("Revoke token '{name_or_id}'?"))
        .default(false)
        .interact()?;

    if !confirmed {
        println!("{}", "❌ Cancelled".red());
        return Ok(());
    }

    let token = state.auth_service.revoke(&name_or_id).await?;

    println!();
    println!(
        "{} {} ({})",
        "✅ Token revoked:".green().bold(),
        token.name.cyan(),
        token.id.to_string().bright_black()
    );
    println!();

    Ok(())
}

/// Dispatches chlorine data commands.
async fn handle_chlorine_action(action: ChlorineAction, state: &AppState) -> Result<()> {
    match action {
        ChlorineAction::Show { pwsid } => {
            let data = state.chlorine_service.chlorine_for_utility(&pwsid).await?;
            let quality = state.record_service.assess(&as_new(&data)).await?;

            println!("{}", "💧 Chlorine Data".bright_blue().bold());
            println!();
            println!(
                "  Utility:    {} ({})",
                data.utility_name.as_deref().unwrap_or("-").cyan(),
                data.pwsid
            );
            println!(
                "  Average:    {} ppm",
                data.average_chlorine_ppm.to_string().bright_green().bold()
            );
            println!(
                "  Range:      {} - {} ppm",
                fmt_opt(data.min_chlorine_ppm),
                fmt_opt(data.max_chlorine_ppm)
            );
            println!("  Samples:    {}", fmt_opt(data.sample_count));
            println!("  Updated:    {}", data.last_updated);
            println!("  Source:     {}", data.data_source);
            if let Some(url) = &data.source_url {
                println!("  URL:        {}", url.bright_black());
            }
            println!("  Confidence: {}", quality.confidence);
            for warning in &quality.warnings {
                println!("  {} {}", "⚠️ ".yellow(), warning.yellow());
            }
            println!();
        }
        ChlorineAction::Set {
            pwsid,
            ppm,
            min,
            max,
            samples,
            date,
            source,
            url,
            notes,
            force,
        } => {
            let record = Record::Chlorine(NewChlorineData {
                pwsid,
                utility_name: None,
                average_chlorine_ppm: ppm,
                min_chlorine_ppm: min,
                max_chlorine_ppm: max,
                sample_count: samples,
                last_updated: date.unwrap_or_else(|| Utc::now().date_naive()),
                data_source: source,
                notes,
                source_url: url,
                confidence: None,
            });

            let outcome = state.record_service.upsert(record, force).await?;

            println!("{}", "✅ Chlorine data stored".green().bold());
            if let Some(quality) = outcome.quality {
                println!("  Confidence: {}", quality.confidence);
                for warning in &quality.warnings {
                    println!("  {} {}", "⚠️ ".yellow(), warning.yellow());
                }
            }
            if let Some(replacement) = outcome.replacement {
                println!("  Replaced existing data: {}", replacement.reason.bright_black());
            }
        }
        ChlorineAction::Delete { pwsid, yes } => {
            if !yes {
                let confirmed = Confirm::new()
                    .with_prompt(format!("Delete chlorine data of {pwsid}?"))
                    .default(false)
                    .interact()?;

                if !confirmed {
                    println!("{}", "❌ Cancelled".red());
                    return Ok(());
                }
            }

            state
                .record_service
                .delete(RecordKey::Chlorine { pwsid })
                .await?;
            println!("{}", "✅ Chlorine data deleted".green().bold());
        }
    }

    Ok(())
}

/// Prints the freshness audit as a table or JSON.
async fn handle_audit(state: &AppState, stale_after_days: i64, json: bool) -> Result<()> {
    let report = state
        .chlorine_service
        .audit(Utc::now().date_naive(), stale_after_days)
        .await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("{}", "🔍 Chlorine Data Audit".bright_blue().bold());
    println!();

    for entry in &report.utilities {
        let status = match entry.status {
            Freshness::Recent => "RECENT".green(),
            Freshness::Outdated => "OUTDATED".yellow(),
            Freshness::Missing => "MISSING".red(),
        };
        println!(
            "  {:<10} {:<10} {}",
            status,
            entry.pwsid.bright_black(),
            entry.utility_name.cyan()
        );
        for issue in &entry.issues {
            println!("             {}", issue.bright_black());
        }
    }

    let summary = &report.summary;
    println!();
    println!("  Utilities:  {}", summary.total_utilities.to_string().bright_white().bold());
    println!("  Recent:     {}", summary.recent.to_string().green());
    println!("  Outdated:   {}", summary.outdated.to_string().yellow());
    println!("  Missing:    {}", summary.missing.to_string().red());
    println!("  Estimated:  {}", summary.estimated.to_string().yellow());
    println!();

    Ok(())
}

/// Deletes estimated chlorine data after confirmation.
async fn handle_cleanup(state: &AppState, skip_confirm: bool) -> Result<()> {
    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Delete all chlorine data marked as estimated?")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    let removed = state.record_service.cleanup_estimated().await?;

    if removed.is_empty() {
        println!("{}", "  No estimated data found".yellow());
        return Ok(());
    }

    println!(
        "{} {}",
        "✅ Removed estimated data for".green().bold(),
        removed.len().to_string().bright_white().bold()
    );
    for pwsid in &removed {
        println!("  {}", pwsid.bright_black());
    }

    Ok(())
}

/// Displays table row counts.
async fn handle_stats(pool: &PgPool) -> Result<()> {
    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();

    let utilities: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM water_utilities WHERE is_active = TRUE")
            .fetch_one(pool)
            .await?;

    let zip_codes: i64 = sqlx::query_scalar("SELECT COUNT(DISTINCT zip_code) FROM zip_code_mapping")
        .fetch_one(pool)
        .await?;

    let chlorine: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM chlorine_data")
        .fetch_one(pool)
        .await?;

    let tokens: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM api_tokens WHERE revoked_at IS NULL")
            .fetch_one(pool)
            .await?;

    println!("  Active utilities: {}", utilities.to_string().bright_green().bold());
    println!("  ZIP codes:        {}", zip_codes.to_string().bright_green().bold());
    println!("  Chlorine records: {}", chlorine.to_string().bright_green().bold());
    println!("  Active tokens:    {}", tokens.to_string().bright_green().bold());
    println!();

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            println!("{}", "✅ Database connection OK".green().bold());
        }
        DbAction::Info => {
            println!("{}", "ℹ️  Database Information".bright_blue().bold());
            println!();

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;

            println!("  PostgreSQL: {}", version.bright_white());
            println!();
        }
    }

    Ok(())
}

fn as_new(data: &ChlorineData) -> NewChlorineData {
    NewChlorineData {
        pwsid: data.pwsid.clone(),
        utility_name: data.utility_name.clone(),
        average_chlorine_ppm: data.average_chlorine_ppm,
        min_chlorine_ppm: data.min_chlorine_ppm,
        max_chlorine_ppm: data.max_chlorine_ppm,
        sample_count: data.sample_count,
        last_updated: data.last_updated,
        data_source: data.data_source.clone(),
        notes: data.notes.clone(),
        source_url: data.source_url.clone(),
        confidence: data.confidence,
    }
}

fn fmt_opt<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}
