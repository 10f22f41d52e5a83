/// SQL DDL for the lead store.
/// WAL mode + foreign keys enabled at connection time.
pub const SCHEMA_VERSION: u32 = 1;

pub const CREATE_TABLES: &str = r#"
CREATE TABLE IF NOT EXISTS leads (
    id TEXT PRIMARY KEY,
    source_url TEXT NOT NULL,
    source_trust INTEGER NOT NULL,
    company_name TEXT NOT NULL,
    normalized_company TEXT NOT NULL,
    industry_sector TEXT NOT NULL,
    location TEXT NOT NULL,
    raw_text_snippet TEXT NOT NULL,
    extracted_keywords TEXT NOT NULL,
    recommended_product TEXT NOT NULL,
    secondary_product TEXT NOT NULL,
    reason TEXT NOT NULL,
    confidence_score REAL NOT NULL,
    urgency_score INTEGER NOT NULL,
    priority_score REAL NOT NULL,
    is_verified INTEGER NOT NULL DEFAULT 0,
    next_action TEXT NOT NULL DEFAULT '',
    status TEXT NOT NULL DEFAULT 'new',
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_leads_status_priority ON leads(status, priority_score DESC);
CREATE INDEX IF NOT EXISTS idx_leads_created ON leads(created_at);

CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER NOT NULL
);
"#;

pub const PRAGMAS: &str = r#"
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;
PRAGMA busy_timeout = 5000;
PRAGMA synchronous = NORMAL;
"#;
