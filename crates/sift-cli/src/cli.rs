//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI
//! arguments. The actual command implementations are in the `commands`
//! module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Sift - assisted categorization for your finance backend
#[derive(Parser)]
#[command(name = "sift")]
#[command(about = "Terminal client for AI-assisted transaction categorization", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Config file path (defaults to <config dir>/sift/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show resolved configuration and backend health
    Status,

    /// Manage accounts
    Accounts {
        #[command(subcommand)]
        action: Option<AccountsAction>,
    },

    /// Manage payees
    Payees {
        #[command(subcommand)]
        action: Option<EntityAction>,
    },

    /// Manage categories
    Categories {
        #[command(subcommand)]
        action: Option<EntityAction>,
    },

    /// List transactions
    Transactions {
        /// Search descriptions
        #[arg(long)]
        search: Option<String>,

        /// Filter by account id
        #[arg(long)]
        account: Option<i64>,

        /// Only transactions missing a payee
        #[arg(long)]
        unassigned_payee: bool,

        /// Only transactions missing a category
        #[arg(long)]
        unassigned_category: bool,

        /// Start date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,

        /// End date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,

        /// Sort field: date, amount, description
        #[arg(long)]
        sort: Option<String>,

        /// Sort order: asc or desc
        #[arg(long)]
        order: Option<String>,

        /// Max results
        #[arg(short, long, default_value = "20")]
        limit: i64,

        /// Offset for pagination
        #[arg(long, default_value = "0")]
        offset: i64,

        /// Save these filters as the view default
        #[arg(long)]
        remember: bool,
    },

    /// Update the payee or category of one transaction
    Edit {
        /// Transaction id
        transaction_id: i64,

        /// Field to update: payee or category
        field: String,

        /// Entity id to assign
        #[arg(long)]
        id: Option<String>,

        /// Entity display name
        #[arg(long)]
        name: Option<String>,

        /// Clear the field instead of assigning
        #[arg(long)]
        clear: bool,
    },

    /// Fetch suggestions for a description
    Suggest {
        /// Transaction description
        description: String,

        /// Transaction amount
        #[arg(short, long)]
        amount: Option<f64>,

        /// Account id for context
        #[arg(long)]
        account: Option<i64>,

        /// Print raw suggestion JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Walk unassigned transactions and fill fields from suggestions
    Categorize {
        /// Field to fill: payee, category, or both
        #[arg(long, default_value = "both")]
        field: String,

        /// Max transactions to process
        #[arg(short, long, default_value = "25")]
        limit: i64,

        /// Apply top high-confidence suggestions (default: print only)
        #[arg(long)]
        apply: bool,
    },

    /// Export transactions to CSV
    Export {
        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Search descriptions
        #[arg(long)]
        search: Option<String>,

        /// Filter by account id
        #[arg(long)]
        account: Option<i64>,

        /// Start date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,

        /// End date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum AccountsAction {
    /// List accounts
    List,

    /// Add an account
    Add {
        /// Account name
        name: String,

        /// Account kind: checking, savings, credit
        #[arg(short, long)]
        kind: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum EntityAction {
    /// List entries
    List,

    /// Add an entry
    Add {
        /// Display name
        name: String,
    },
}
