//! Account commands and the status command

use anyhow::Result;

use sift_client::api::{ApiClient, NewAccount};
use sift_core::ClientConfig;

use super::truncate;

/// Show resolved configuration and backend health
pub async fn cmd_status(api: &ApiClient, config: &ClientConfig) -> Result<()> {
    println!();
    println!("⚙️  Sift status");
    println!("   Backend:       {}", config.base_url);
    println!(
        "   API key:       {}",
        if config.api_key.is_some() {
            "configured"
        } else {
            "none"
        }
    );
    println!("   Timeout:       {}s", config.timeout.as_secs());
    println!(
        "   Cache TTL:     {}s",
        config.suggestion_cache_ttl.as_secs()
    );

    let healthy = api.health().await;
    println!(
        "   Health:        {}",
        if healthy { "✅ reachable" } else { "❌ unreachable" }
    );

    Ok(())
}

/// List all accounts
pub async fn cmd_accounts_list(api: &ApiClient) -> Result<()> {
    let accounts = api.list_accounts().await?;

    if accounts.is_empty() {
        println!("No accounts found. Add one with:");
        println!("  sift accounts add <name> --kind checking|savings|credit");
        return Ok(());
    }

    println!();
    println!("🏦 Accounts");
    println!("   ─────────────────────────────────────────────────────────");
    println!(
        "   {:>4} │ {:24} │ {:8} │ {:>12}",
        "ID", "Name", "Kind", "Balance"
    );
    println!("   ─────┼──────────────────────────┼──────────┼─────────────");

    for account in accounts {
        let kind = account.kind.map(|k| k.as_str()).unwrap_or("-");
        let balance = account
            .balance
            .map(|b| format!("{:.2}", b))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "   {:>4} │ {:24} │ {:8} │ {:>12}",
            account.id,
            truncate(&account.name, 24),
            kind,
            balance
        );
    }

    Ok(())
}

/// Add a new account
pub async fn cmd_accounts_add(api: &ApiClient, name: &str, kind: Option<&str>) -> Result<()> {
    let kind = kind
        .map(|k| {
            k.parse().map_err(|e: String| {
                anyhow::anyhow!("{} (valid kinds: checking, savings, credit)", e)
            })
        })
        .transpose()?;

    let account = api
        .create_account(&NewAccount {
            name: name.to_string(),
            kind,
        })
        .await?;

    println!("✅ Created account '{}' (id: {})", account.name, account.id);
    Ok(())
}
