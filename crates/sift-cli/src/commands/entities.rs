//! Payee and category commands

use anyhow::Result;

use sift_client::api::ApiClient;

use super::truncate;

/// List all payees
pub async fn cmd_payees_list(api: &ApiClient) -> Result<()> {
    let payees = api.list_payees().await?;

    if payees.is_empty() {
        println!("No payees found.");
        return Ok(());
    }

    println!();
    println!("👥 Payees");
    for payee in payees {
        println!("   {} (id: {})", truncate(&payee.name, 40), payee.id);
    }

    Ok(())
}

/// Add a new payee
pub async fn cmd_payees_add(api: &ApiClient, name: &str) -> Result<()> {
    let payee = api.create_payee(name).await?;
    println!("✅ Created payee '{}' (id: {})", payee.name, payee.id);
    Ok(())
}

/// List all categories
pub async fn cmd_categories_list(api: &ApiClient) -> Result<()> {
    let categories = api.list_categories().await?;

    if categories.is_empty() {
        println!("No categories found.");
        return Ok(());
    }

    println!();
    println!("🏷️  Categories");
    for category in categories {
        println!("   {} (id: {})", truncate(&category.name, 40), category.id);
    }

    Ok(())
}

/// Add a new category
pub async fn cmd_categories_add(api: &ApiClient, name: &str) -> Result<()> {
    let category = api.create_category(name).await?;
    println!(
        "✅ Created category '{}' (id: {})",
        category.name, category.id
    );
    Ok(())
}
