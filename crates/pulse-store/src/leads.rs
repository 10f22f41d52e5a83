use tracing::{instrument, warn};

use pulse_core::ids::LeadId;
use pulse_core::lead::{Lead, LeadStatus};

use crate::database::Database;
use crate::error::StoreError;
use crate::row_helpers;

/// Rows per insert chunk. Chunks commit independently so one bad chunk
/// does not block the rest of a bulk load.
pub const BATCH_CHUNK_SIZE: usize = 50;

const LEAD_COLUMNS: &str = "id, source_url, source_trust, company_name, normalized_company, \
     industry_sector, location, raw_text_snippet, extracted_keywords, \
     recommended_product, secondary_product, reason, confidence_score, \
     urgency_score, priority_score, is_verified, next_action, status, created_at";

/// Outcome of a chunked bulk insert.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub inserted: usize,
    pub failed_chunks: usize,
}

/// Repository for lead rows.
pub struct LeadRepo {
    db: Database,
}

impl LeadRepo {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Insert a single lead.
    #[instrument(skip(self, lead), fields(lead_id = %lead.id))]
    pub fn insert(&self, lead: &Lead) -> Result<(), StoreError> {
        self.db.with_conn(|conn| insert_one(conn, lead))
    }

    /// Bulk insert in chunks of [`BATCH_CHUNK_SIZE`], one transaction per
    /// chunk. A failed chunk is logged and skipped; later chunks still run.
    #[instrument(skip(self, leads), fields(total = leads.len()))]
    pub fn insert_batch(&self, leads: &[Lead]) -> Result<BatchReport, StoreError> {
        let mut report = BatchReport::default();

        for (n, chunk) in leads.chunks(BATCH_CHUNK_SIZE).enumerate() {
            let outcome = self.db.with_conn(|conn| {
                let tx = conn
                    .unchecked_transaction()
                    .map_err(|e| StoreError::Database(e.to_string()))?;
                for lead in chunk {
                    insert_one(&tx, lead)?;
                }
                tx.commit().map_err(|e| StoreError::Database(e.to_string()))?;
                Ok(chunk.len())
            });

            match outcome {
                Ok(count) => report.inserted += count,
                Err(e) => {
                    warn!(chunk = n, error = %e, "batch chunk failed, continuing");
                    report.failed_chunks += 1;
                }
            }
        }

        Ok(report)
    }

    /// Get a lead by id.
    #[instrument(skip(self), fields(lead_id = %id))]
    pub fn get(&self, id: &LeadId) -> Result<Lead, StoreError> {
        self.db.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {LEAD_COLUMNS} FROM leads WHERE id = ?1"
            ))?;
            let mut rows = stmt.query([id.as_str()])?;
            match rows.next()? {
                Some(row) => row_to_lead(row),
                None => Err(StoreError::NotFound(format!("lead {id}"))),
            }
        })
    }

    /// The highest-priority lead still in `new` status, if any.
    ///
    /// Ties break by earliest created_at then id, so repeated calls over an
    /// unchanged store return the same lead.
    #[instrument(skip(self))]
    pub fn top_new(&self) -> Result<Option<Lead>, StoreError> {
        self.db.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {LEAD_COLUMNS} FROM leads WHERE status = 'new'
                 ORDER BY priority_score DESC, created_at ASC, id ASC LIMIT 1"
            ))?;
            let mut rows = stmt.query([])?;
            match rows.next()? {
                Some(row) => Ok(Some(row_to_lead(row)?)),
                None => Ok(None),
            }
        })
    }

    /// Atomically claim a lead for dispatch: `new -> processing`.
    ///
    /// Returns whether this caller won the row. The conditional UPDATE is
    /// the single check-and-set that keeps concurrent dispatchers from
    /// double-sending the same lead.
    #[instrument(skip(self), fields(lead_id = %id))]
    pub fn claim(&self, id: &LeadId) -> Result<bool, StoreError> {
        self.db.with_conn(|conn| {
            let changed = conn.execute(
                "UPDATE leads SET status = 'processing' WHERE id = ?1 AND status = 'new'",
                [id.as_str()],
            )?;
            Ok(changed == 1)
        })
    }

    /// Conditional rollback after a failed delivery: `processing -> new`.
    #[instrument(skip(self), fields(lead_id = %id))]
    pub fn release(&self, id: &LeadId) -> Result<bool, StoreError> {
        self.db.with_conn(|conn| {
            let changed = conn.execute(
                "UPDATE leads SET status = 'new' WHERE id = ?1 AND status = 'processing'",
                [id.as_str()],
            )?;
            Ok(changed == 1)
        })
    }

    /// List leads, optionally filtered by status, ordered by priority.
    #[instrument(skip(self))]
    pub fn list(&self, status: Option<&LeadStatus>, limit: u32) -> Result<Vec<Lead>, StoreError> {
        self.db.with_conn(|conn| {
            let status_text = status.map(|s| s.to_string());
            let (sql, params): (String, Vec<&dyn rusqlite::types::ToSql>) = match &status_text {
                Some(s) => (
                    format!(
                        "SELECT {LEAD_COLUMNS} FROM leads WHERE status = ?1
                         ORDER BY priority_score DESC, created_at ASC LIMIT ?2"
                    ),
                    vec![s, &limit],
                ),
                None => (
                    format!(
                        "SELECT {LEAD_COLUMNS} FROM leads
                         ORDER BY priority_score DESC, created_at ASC LIMIT ?1"
                    ),
                    vec![&limit],
                ),
            };

            let mut stmt = conn.prepare(&sql)?;
            let mut rows = stmt.query(params.as_slice())?;
            let mut results = Vec::new();
            while let Some(row) = rows.next()? {
                results.push(row_to_lead(row)?);
            }
            Ok(results)
        })
    }

    /// Count leads per status.
    #[instrument(skip(self))]
    pub fn count_by_status(&self) -> Result<Vec<(LeadStatus, u64)>, StoreError> {
        self.db.with_conn(|conn| {
            let mut stmt =
                conn.prepare("SELECT status, COUNT(*) FROM leads GROUP BY status")?;
            let mut rows = stmt.query([])?;
            let mut counts = Vec::new();
            while let Some(row) = rows.next()? {
                let raw: String = row_helpers::get(row, 0, "leads", "status")?;
                let count: u64 = row_helpers::get(row, 1, "leads", "count")?;
                counts.push((row_helpers::parse_enum(&raw, "leads", "status")?, count));
            }
            Ok(counts)
        })
    }
}

fn insert_one(conn: &rusqlite::Connection, lead: &Lead) -> Result<(), StoreError> {
    let keywords = serde_json::to_string(&lead.extracted_keywords)?;
    conn.execute(
        "INSERT INTO leads (id, source_url, source_trust, company_name, normalized_company,
             industry_sector, location, raw_text_snippet, extracted_keywords,
             recommended_product, secondary_product, reason, confidence_score,
             urgency_score, priority_score, is_verified, next_action, status, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19)",
        rusqlite::params![
            lead.id.as_str(),
            lead.source_url,
            lead.source_trust,
            lead.company_name,
            lead.normalized_company,
            lead.industry_sector,
            lead.location,
            lead.raw_text_snippet,
            keywords,
            lead.recommended_product,
            lead.secondary_product,
            lead.reason,
            lead.confidence_score,
            lead.urgency_score,
            lead.priority_score,
            lead.is_verified,
            lead.next_action,
            lead.status.to_string(),
            lead.created_at,
        ],
    )?;
    Ok(())
}

fn row_to_lead(row: &rusqlite::Row<'_>) -> Result<Lead, StoreError> {
    let keywords_raw: String = row_helpers::get(row, 8, "leads", "extracted_keywords")?;
    let extracted_keywords: Vec<String> =
        serde_json::from_str(&keywords_raw).map_err(|e| StoreError::CorruptRow {
            table: "leads",
            column: "extracted_keywords",
            detail: format!("invalid JSON: {e}"),
        })?;
    let status_raw: String = row_helpers::get(row, 17, "leads", "status")?;

    Ok(Lead {
        id: LeadId::from_raw(row_helpers::get::<String>(row, 0, "leads", "id")?),
        source_url: row_helpers::get(row, 1, "leads", "source_url")?,
        source_trust: row_helpers::get_u8(row, 2, "leads", "source_trust")?,
        company_name: row_helpers::get(row, 3, "leads", "company_name")?,
        normalized_company: row_helpers::get(row, 4, "leads", "normalized_company")?,
        industry_sector: row_helpers::get(row, 5, "leads", "industry_sector")?,
        location: row_helpers::get(row, 6, "leads", "location")?,
        raw_text_snippet: row_helpers::get(row, 7, "leads", "raw_text_snippet")?,
        extracted_keywords,
        recommended_product: row_helpers::get(row, 9, "leads", "recommended_product")?,
        secondary_product: row_helpers::get(row, 10, "leads", "secondary_product")?,
        reason: row_helpers::get(row, 11, "leads", "reason")?,
        confidence_score: row_helpers::get(row, 12, "leads", "confidence_score")?,
        urgency_score: row_helpers::get_u8(row, 13, "leads", "urgency_score")?,
        priority_score: row_helpers::get(row, 14, "leads", "priority_score")?,
        is_verified: row_helpers::get(row, 15, "leads", "is_verified")?,
        next_action: row_helpers::get(row, 16, "leads", "next_action")?,
        status: row_helpers::parse_enum(&status_raw, "leads", "status")?,
        created_at: row_helpers::get(row, 18, "leads", "created_at")?,
    })
}
