//! Tabular batch-file interface for leads.
//!
//! Hand-rolled quote-aware CSV: the column set is fixed and small, and
//! the only hard cases are commas and quotes inside snippets. Fields
//! must not contain raw newlines; the writer flattens them to spaces.

use std::path::Path;

use anyhow::{Context, Result};

use pulse_core::ids::LeadId;
use pulse_core::lead::{Lead, LeadStatus};

pub const HEADER: &str = "id,source_url,source_trust,company_name,normalized_company,\
industry_sector,location,raw_text_snippet,extracted_keywords,recommended_product,\
secondary_product,reason,confidence_score,urgency_score,priority_score,is_verified,\
next_action,status,created_at";

const COLUMN_COUNT: usize = 19;

/// A row that failed to parse, with its 1-based line number.
#[derive(Clone, Debug)]
pub struct RowReject {
    pub line: usize,
    pub detail: String,
}

/// Write leads to a CSV file.
pub fn write_leads(path: &Path, leads: &[Lead]) -> Result<()> {
    let mut out = String::with_capacity(leads.len() * 256);
    out.push_str(HEADER);
    out.push('\n');
    for lead in leads {
        out.push_str(&render_row(lead));
        out.push('\n');
    }
    std::fs::write(path, out).with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

/// Read leads from a CSV file. Malformed rows are excluded and reported;
/// the rest of the file continues.
pub fn read_leads(path: &Path) -> Result<(Vec<Lead>, Vec<RowReject>)> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;

    let mut leads = Vec::new();
    let mut rejects = Vec::new();

    for (idx, line) in content.lines().enumerate() {
        if idx == 0 || line.trim().is_empty() {
            continue;
        }
        match parse_row(line) {
            Ok(lead) => leads.push(lead),
            Err(detail) => rejects.push(RowReject { line: idx + 1, detail }),
        }
    }

    Ok((leads, rejects))
}

fn render_row(lead: &Lead) -> String {
    let fields = [
        lead.id.as_str().to_string(),
        lead.source_url.clone(),
        lead.source_trust.to_string(),
        lead.company_name.clone(),
        lead.normalized_company.clone(),
        lead.industry_sector.clone(),
        lead.location.clone(),
        lead.raw_text_snippet.clone(),
        lead.extracted_keywords.join(", "),
        lead.recommended_product.clone(),
        lead.secondary_product.clone(),
        lead.reason.clone(),
        lead.confidence_score.to_string(),
        lead.urgency_score.to_string(),
        lead.priority_score.to_string(),
        lead.is_verified.to_string(),
        lead.next_action.clone(),
        lead.status.to_string(),
        lead.created_at.clone(),
    ];
    fields
        .iter()
        .map(|f| escape_field(f))
        .collect::<Vec<_>>()
        .join(",")
}

fn escape_field(field: &str) -> String {
    let flat = field.replace(['\n', '\r'], " ");
    if flat.contains(',') || flat.contains('"') {
        format!("\"{}\"", flat.replace('"', "\"\""))
    } else {
        flat
    }
}

fn parse_row(line: &str) -> Result<Lead, String> {
    let fields = split_record(line)?;
    if fields.len() != COLUMN_COUNT {
        return Err(format!("expected {COLUMN_COUNT} columns, got {}", fields.len()));
    }

    let source_trust: u8 = fields[2]
        .parse()
        .map_err(|_| format!("bad source_trust: {}", fields[2]))?;
    let confidence_score: f64 = fields[12]
        .parse()
        .map_err(|_| format!("bad confidence_score: {}", fields[12]))?;
    let urgency_score: u8 = fields[13]
        .parse()
        .map_err(|_| format!("bad urgency_score: {}", fields[13]))?;
    let priority_score: f64 = fields[14]
        .parse()
        .map_err(|_| format!("bad priority_score: {}", fields[14]))?;
    let is_verified: bool = fields[15]
        .parse()
        .map_err(|_| format!("bad is_verified: {}", fields[15]))?;
    let status: LeadStatus = fields[17]
        .parse()
        .map_err(|e| format!("bad status: {e}"))?;

    let extracted_keywords = if fields[8].is_empty() {
        Vec::new()
    } else {
        fields[8].split(',').map(|k| k.trim().to_string()).collect()
    };

    Ok(Lead {
        id: LeadId::from_raw(fields[0].clone()),
        source_url: fields[1].clone(),
        source_trust,
        company_name: fields[3].clone(),
        normalized_company: fields[4].clone(),
        industry_sector: fields[5].clone(),
        location: fields[6].clone(),
        raw_text_snippet: fields[7].clone(),
        extracted_keywords,
        recommended_product: fields[9].clone(),
        secondary_product: fields[10].clone(),
        reason: fields[11].clone(),
        confidence_score,
        urgency_score,
        priority_score,
        is_verified,
        next_action: fields[16].clone(),
        status,
        created_at: fields[18].clone(),
    })
}

/// Quote-aware split of one CSV record.
fn split_record(line: &str) -> Result<Vec<String>, String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    current.push('"');
                } else {
                    in_quotes = false;
                }
            }
            '"' if current.is_empty() => in_quotes = true,
            '"' => return Err("unexpected quote mid-field".to_string()),
            ',' if !in_quotes => {
                fields.push(std::mem::take(&mut current));
            }
            _ => current.push(c),
        }
    }

    if in_quotes {
        return Err("unterminated quoted field".to_string());
    }
    fields.push(current);
    Ok(fields)
}
