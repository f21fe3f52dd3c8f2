//! Sift CLI - assisted transaction categorization
//!
//! Usage:
//!   sift status                     Check backend health
//!   sift transactions --limit 50    List transactions
//!   sift suggest "STARBUCKS #123"   Fetch suggestions for a description
//!   sift categorize --apply         Fill unassigned fields from suggestions

mod cli;
mod commands;

#[cfg(test)]
mod tests;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use sift_client::api::ApiClient;
use sift_client::recorder::SelectionRecorder;
use sift_client::suggestions::SuggestionFetcher;
use sift_core::metrics::SessionMetrics;
use sift_core::prefs::PrefsStore;
use sift_core::ClientConfig;

use cli::*;
use commands::TransactionFlags;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let config = match &cli.config {
        Some(path) => ClientConfig::load_from(path)?,
        None => ClientConfig::load()?,
    };
    let api = ApiClient::new(&config)?;

    match cli.command {
        Commands::Status => commands::cmd_status(&api, &config).await,
        Commands::Accounts { action } => match action {
            None | Some(AccountsAction::List) => commands::cmd_accounts_list(&api).await,
            Some(AccountsAction::Add { name, kind }) => {
                commands::cmd_accounts_add(&api, &name, kind.as_deref()).await
            }
        },
        Commands::Payees { action } => match action {
            None | Some(EntityAction::List) => commands::cmd_payees_list(&api).await,
            Some(EntityAction::Add { name }) => commands::cmd_payees_add(&api, &name).await,
        },
        Commands::Categories { action } => match action {
            None | Some(EntityAction::List) => commands::cmd_categories_list(&api).await,
            Some(EntityAction::Add { name }) => commands::cmd_categories_add(&api, &name).await,
        },
        Commands::Transactions {
            search,
            account,
            unassigned_payee,
            unassigned_category,
            from,
            to,
            sort,
            order,
            limit,
            offset,
            remember,
        } => {
            let flags = TransactionFlags {
                search,
                account,
                unassigned_payee,
                unassigned_category,
                from,
                to,
                sort,
                order,
            };
            let prefs = PrefsStore::new()?;
            commands::cmd_transactions_list(&api, &prefs, &flags, limit, offset, remember).await
        }
        Commands::Edit {
            transaction_id,
            field,
            id,
            name,
            clear,
        } => {
            let recorder = SelectionRecorder::new(api.clone());
            commands::cmd_edit(
                &api,
                &recorder,
                transaction_id,
                &field,
                id.as_deref(),
                name.as_deref(),
                clear,
            )
            .await
        }
        Commands::Suggest {
            description,
            amount,
            account,
            json,
        } => {
            let fetcher = SuggestionFetcher::new(api.clone(), &config);
            commands::cmd_suggest(&api, &fetcher, &description, amount, account, json).await
        }
        Commands::Categorize {
            field,
            limit,
            apply,
        } => {
            let fetcher = SuggestionFetcher::new(api.clone(), &config);
            let recorder = SelectionRecorder::new(api.clone());
            let metrics = SessionMetrics::new();
            commands::cmd_categorize(&api, &fetcher, &recorder, &metrics, &field, limit, apply)
                .await
        }
        Commands::Export {
            output,
            search,
            account,
            from,
            to,
        } => {
            commands::cmd_export(
                &api,
                output.as_deref(),
                search,
                account,
                from.as_deref(),
                to.as_deref(),
            )
            .await
        }
    }
}
