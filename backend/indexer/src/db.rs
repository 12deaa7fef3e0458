//! Database layer — migrations, queries, cursor management, and the
//! event-stream supply replay.

use std::collections::BTreeMap;

use serde::Serialize;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use tracing::info;

use crate::errors::{IndexerError, Result};
use crate::events::{EventRecord, LedgerEvent};

/// Establish a SQLite connection pool and run pending migrations.
pub async fn init_pool(database_url: &str) -> Result<SqlitePool> {
    // Make sure the file is created if it doesn't exist yet.
    let url = if database_url.starts_with("sqlite:") {
        database_url.to_string()
    } else {
        format!("sqlite:{database_url}")
    };

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;
    info!("Database migrations applied successfully");
    Ok(pool)
}

// ─────────────────────────────────────────────────────────
// Cursor helpers
// ─────────────────────────────────────────────────────────

/// Read the last-seen ledger from the cursor row.
/// Returns `0` when no cursor has been persisted yet.
pub async fn get_last_ledger(pool: &SqlitePool) -> Result<i64> {
    let row: Option<(i64,)> = sqlx::query_as("SELECT last_ledger FROM indexer_cursor WHERE id = 1")
        .fetch_optional(pool)
        .await?;
    Ok(row.map(|(v,)| v).unwrap_or(0))
}

/// Persist the last-seen ledger (and optionally a pagination cursor string).
pub async fn save_cursor(
    pool: &SqlitePool,
    last_ledger: i64,
    last_cursor: Option<&str>,
) -> Result<()> {
    sqlx::query("UPDATE indexer_cursor SET last_ledger = ?1, last_cursor = ?2 WHERE id = 1")
        .bind(last_ledger)
        .bind(last_cursor)
        .execute(pool)
        .await?;
    Ok(())
}

/// Read back the raw cursor string (used to resume pagination mid-ledger).
pub async fn get_cursor_string(pool: &SqlitePool) -> Result<Option<String>> {
    let row: Option<(Option<String>,)> =
        sqlx::query_as("SELECT last_cursor FROM indexer_cursor WHERE id = 1")
            .fetch_optional(pool)
            .await?;
    Ok(row.and_then(|(v,)| v))
}

// ─────────────────────────────────────────────────────────
// Event writes
// ─────────────────────────────────────────────────────────

/// Persist a page of decoded events. Events carrying an `event_id` the
/// database has already seen are silently ignored, which makes re-polling
/// an overlapping ledger range idempotent.
pub async fn insert_events(pool: &SqlitePool, events: &[LedgerEvent]) -> Result<usize> {
    let mut count = 0usize;
    for ev in events {
        let rows_affected = sqlx::query(
            r#"
            INSERT OR IGNORE INTO events
                (event_id, event_type, batch_id, project, commodity, actor,
                 counterparty, amount, batch_supply, aggregate_supply, detail,
                 ledger, timestamp, contract_id, tx_hash)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)
            "#,
        )
        .bind(&ev.event_id)
        .bind(&ev.event_type)
        .bind(&ev.batch_id)
        .bind(&ev.project)
        .bind(&ev.commodity)
        .bind(&ev.actor)
        .bind(&ev.counterparty)
        .bind(&ev.amount)
        .bind(&ev.batch_supply)
        .bind(&ev.aggregate_supply)
        .bind(&ev.detail)
        .bind(ev.ledger)
        .bind(ev.timestamp)
        .bind(&ev.contract_id)
        .bind(&ev.tx_hash)
        .execute(pool)
        .await?
        .rows_affected();

        count += rows_affected as usize;
    }
    Ok(count)
}

// ─────────────────────────────────────────────────────────
// Event reads
// ─────────────────────────────────────────────────────────

const EVENT_COLUMNS: &str = r#"
    id, event_id, event_type, batch_id, project, commodity, actor,
    counterparty, amount, batch_supply, aggregate_supply, detail,
    ledger, timestamp, contract_id, tx_hash, created_at
"#;

/// Fetch all events for a given batch, ordered by ledger ascending.
pub async fn get_events_for_batch(pool: &SqlitePool, batch_id: &str) -> Result<Vec<EventRecord>> {
    let rows = sqlx::query_as::<_, EventRecord>(&format!(
        "SELECT {EVENT_COLUMNS} FROM events WHERE batch_id = ?1 ORDER BY ledger ASC, id ASC"
    ))
    .bind(batch_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Fetch all events, ordered by ledger ascending.
pub async fn get_all_events(pool: &SqlitePool) -> Result<Vec<EventRecord>> {
    let rows = sqlx::query_as::<_, EventRecord>(&format!(
        "SELECT {EVENT_COLUMNS} FROM events ORDER BY ledger ASC, id ASC"
    ))
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

// ─────────────────────────────────────────────────────────
// Supply replay
// ─────────────────────────────────────────────────────────

/// Aggregate supply of one (project, commodity) group, reconstructed from
/// the event stream.
#[derive(Debug, Clone, Serialize)]
pub struct GroupSupply {
    pub project: String,
    pub commodity: String,
    /// Σ(created + minted − burned) replayed over the stored events.
    pub replayed_supply: String,
    /// The aggregate supply the contract reported in its latest
    /// supply-moving event for this group.
    pub reported_supply: Option<String>,
    /// Whether the replay agrees with the contract's own accounting.
    /// A `false` here means events were missed or the ledger drifted.
    pub consistent: bool,
}

/// Replay every supply-moving event in order and compute the aggregate
/// supply per (project, commodity) group.
///
/// The contract also stamps each such event with its post-operation
/// aggregate, so the replayed figure is cross-checked against the last
/// reported one.
pub async fn replay_group_supplies(pool: &SqlitePool) -> Result<Vec<GroupSupply>> {
    let rows: Vec<(String, Option<String>, Option<String>, Option<String>, Option<String>)> =
        sqlx::query_as(
            r#"
            SELECT event_type, project, commodity, amount, aggregate_supply
            FROM   events
            WHERE  event_type IN ('batch_created', 'units_minted', 'units_burned')
            ORDER  BY ledger ASC, id ASC
            "#,
        )
        .fetch_all(pool)
        .await?;

    let mut groups: BTreeMap<(String, String), (i128, Option<String>)> = BTreeMap::new();

    for (event_type, project, commodity, amount, aggregate) in rows {
        let (Some(project), Some(commodity)) = (project, commodity) else {
            continue;
        };
        let amount: i128 = amount
            .as_deref()
            .unwrap_or("0")
            .parse()
            .map_err(|_| IndexerError::Replay(format!("unparseable amount in {event_type}")))?;

        let entry = groups.entry((project, commodity)).or_insert((0, None));
        match event_type.as_str() {
            "units_burned" => entry.0 -= amount,
            _ => entry.0 += amount,
        }
        if aggregate.is_some() {
            entry.1 = aggregate;
        }
    }

    Ok(groups
        .into_iter()
        .map(|((project, commodity), (replayed, reported))| {
            let consistent = match reported.as_deref() {
                Some(r) => r.parse::<i128>().map(|r| r == replayed).unwrap_or(false),
                None => false,
            };
            GroupSupply {
                project,
                commodity,
                replayed_supply: replayed.to_string(),
                reported_supply: reported,
                consistent,
            }
        })
        .collect())
}
