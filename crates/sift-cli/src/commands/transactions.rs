//! Transaction commands (list, edit)

use anyhow::{bail, Result};

use sift_client::api::{ApiClient, TransactionQuery};
use sift_client::recorder::SelectionRecorder;
use sift_core::models::{FieldKind, SelectionMethod};
use sift_core::prefs::PrefsStore;
use sift_core::selection::{SelectionContext, SelectionEvent};
use sift_core::view::{FilterState, SortField, SortOrder};

use super::{parse_date, truncate};

/// Raw filter flags from the command line
#[derive(Debug, Default)]
pub struct TransactionFlags {
    pub search: Option<String>,
    pub account: Option<i64>,
    pub unassigned_payee: bool,
    pub unassigned_category: bool,
    pub from: Option<String>,
    pub to: Option<String>,
    pub sort: Option<String>,
    pub order: Option<String>,
}

impl TransactionFlags {
    /// Overlay explicit flags onto saved filter state
    pub fn apply_to(&self, mut filters: FilterState) -> Result<FilterState> {
        if self.search.is_some() {
            filters = filters.with_search(self.search.clone());
        }
        if self.account.is_some() {
            filters = filters.with_account(self.account);
        }
        if self.unassigned_payee {
            filters.unassigned_payee = true;
        }
        if self.unassigned_category {
            filters.unassigned_category = true;
        }
        if self.from.is_some() || self.to.is_some() {
            let from = self.from.as_deref().map(parse_date).transpose()?;
            let to = self.to.as_deref().map(parse_date).transpose()?;
            filters = filters.with_date_range(from, to);
        }
        if let Some(sort) = self.sort.as_deref() {
            filters.sort_field = match sort {
                "date" => SortField::Date,
                "amount" => SortField::Amount,
                "description" => SortField::Description,
                other => bail!("Unknown sort field '{}' (date, amount, description)", other),
            };
        }
        if let Some(order) = self.order.as_deref() {
            filters.sort_order = match order {
                "asc" => SortOrder::Asc,
                "desc" => SortOrder::Desc,
                other => bail!("Unknown sort order '{}' (asc, desc)", other),
            };
        }
        Ok(filters)
    }
}

/// List transactions, starting from the view's saved filters
pub async fn cmd_transactions_list(
    api: &ApiClient,
    prefs: &PrefsStore,
    flags: &TransactionFlags,
    limit: i64,
    offset: i64,
    remember: bool,
) -> Result<()> {
    let mut view_prefs = prefs.load("transactions");
    let filters = flags.apply_to(view_prefs.filters.clone())?;

    if remember {
        view_prefs.filters = filters.clone();
        prefs.save("transactions", &view_prefs)?;
        println!("💾 Saved filters for the transactions view");
    }

    let mut query = TransactionQuery::from(&filters);
    query.limit = Some(limit);
    query.offset = Some(offset);

    let page = api.list_transactions(&query).await?;

    if page.transactions.is_empty() {
        println!("No transactions match.");
        return Ok(());
    }

    println!();
    println!("💳 Transactions ({} total)", page.total);
    println!("   ──────────────────────────────────────────────────────────────────────────");
    println!(
        "   {:>5} │ {:10} │ {:30} │ {:>10} │ {:14} │ {}",
        "ID", "Date", "Description", "Amount", "Payee", "Category"
    );
    println!("   ──────┼────────────┼────────────────────────────────┼────────────┼────────────────┼──────────");

    for tx in &page.transactions {
        println!(
            "   {:>5} │ {:10} │ {:30} │ {:>10.2} │ {:14} │ {}",
            tx.id,
            tx.date.to_string(),
            truncate(&tx.description, 30),
            tx.amount,
            truncate(tx.payee_name.as_deref().unwrap_or("-"), 14),
            tx.category_name.as_deref().unwrap_or("-"),
        );
    }

    if (offset + limit) < page.total {
        println!(
            "   … {} more (use --offset {})",
            page.total - offset - limit,
            offset + limit
        );
    }

    Ok(())
}

/// Update one field of one transaction, recording the selection
pub async fn cmd_edit(
    api: &ApiClient,
    recorder: &SelectionRecorder,
    transaction_id: i64,
    field: &str,
    value_id: Option<&str>,
    value_name: Option<&str>,
    clear: bool,
) -> Result<()> {
    let field: FieldKind = field
        .parse()
        .map_err(|e: String| anyhow::anyhow!("{} (valid fields: payee, category)", e))?;

    if clear {
        api.update_transaction_field(transaction_id, field, None, None)
            .await?;
        println!("✅ Cleared {} on transaction {}", field, transaction_id);
        return Ok(());
    }

    let (Some(id), Some(name)) = (value_id, value_name) else {
        bail!("Provide --id and --name, or --clear");
    };

    let tx = api.get_transaction(transaction_id).await?;
    let updated = api
        .update_transaction_field(transaction_id, field, Some(id), Some(name))
        .await?;

    // A direct edit has no suggestion list on screen; the event still goes
    // out so the service learns from manual choices
    let event = SelectionEvent::from_choice(
        SelectionContext {
            transaction_id,
            field_kind: field,
            description: tx.description,
            amount: Some(tx.amount),
            account_kind: None,
        },
        &[],
        id,
        name,
        SelectionMethod::Manual,
    );
    recorder.record_blocking(&event).await;

    println!(
        "✅ Set {} = '{}' on transaction {}",
        field,
        name,
        updated.id
    );
    Ok(())
}
