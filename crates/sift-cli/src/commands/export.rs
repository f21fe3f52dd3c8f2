//! Local CSV export

use std::path::Path;

use anyhow::Result;

use sift_client::api::{ApiClient, TransactionQuery};
use sift_core::models::Transaction;

use super::parse_date;

/// Fetch the filtered transaction set and write it as CSV
pub async fn cmd_export(
    api: &ApiClient,
    output: Option<&Path>,
    search: Option<String>,
    account: Option<i64>,
    from: Option<&str>,
    to: Option<&str>,
) -> Result<()> {
    let query = TransactionQuery {
        search,
        account_id: account,
        from: from.map(parse_date).transpose()?,
        to: to.map(parse_date).transpose()?,
        ..TransactionQuery::default()
    };

    let transactions = api.export_transactions(&query).await?;

    match output {
        Some(path) => {
            let writer = csv::Writer::from_path(path)?;
            write_csv(writer, &transactions)?;
            println!("✅ Exported {} transactions to {}", transactions.len(), path.display());
        }
        None => {
            let writer = csv::Writer::from_writer(std::io::stdout());
            write_csv(writer, &transactions)?;
        }
    }

    Ok(())
}

fn write_csv<W: std::io::Write>(
    mut writer: csv::Writer<W>,
    transactions: &[Transaction],
) -> Result<()> {
    writer.write_record([
        "id",
        "account_id",
        "date",
        "description",
        "amount",
        "payee",
        "category",
        "notes",
    ])?;

    for tx in transactions {
        writer.write_record([
            tx.id.to_string(),
            tx.account_id.to_string(),
            tx.date.to_string(),
            tx.description.clone(),
            format!("{:.2}", tx.amount),
            tx.payee_name.clone().unwrap_or_default(),
            tx.category_name.clone().unwrap_or_default(),
            tx.notes.clone().unwrap_or_default(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}
