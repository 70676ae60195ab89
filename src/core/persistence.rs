//! CSV files kept between runs: the seen record and the dated export.

use crate::core::Storage;
use crate::domain::model::{Opportunity, SeenSet};
use crate::utils::error::{AlertError, Result};
use chrono::NaiveDate;
use serde::Serialize;

pub const SEEN_FILE: &str = "seen_opportunities.csv";
pub const NOTICE_ID_COLUMN: &str = "Notice ID";

pub fn export_file_name(run_date: NaiveDate) -> String {
    format!("sam_opps_{}.csv", run_date.format("%Y%m%d"))
}

#[derive(Debug, Serialize)]
struct ExportRow<'a> {
    #[serde(rename = "Notice ID")]
    notice_id: &'a str,
    #[serde(rename = "Title")]
    title: &'a str,
    #[serde(rename = "Solicitation Number")]
    solicitation_number: &'a str,
    #[serde(rename = "Posted")]
    posted: &'a str,
    #[serde(rename = "Due")]
    due: &'a str,
    #[serde(rename = "Agency")]
    agency: &'a str,
    #[serde(rename = "Link")]
    link: String,
}

impl<'a> From<&'a Opportunity> for ExportRow<'a> {
    fn from(opp: &'a Opportunity) -> Self {
        Self {
            notice_id: &opp.notice_id,
            title: &opp.title,
            solicitation_number: &opp.solicitation_number,
            posted: &opp.posted_date,
            due: &opp.response_deadline,
            agency: &opp.agency,
            link: opp.detail_link(),
        }
    }
}

pub fn parse_seen(data: &[u8]) -> Result<SeenSet> {
    let mut reader = csv::Reader::from_reader(data);

    let column = reader
        .headers()?
        .iter()
        .position(|h| h.trim() == NOTICE_ID_COLUMN)
        .ok_or_else(|| AlertError::ProcessingError {
            message: format!("seen record has no '{}' column", NOTICE_ID_COLUMN),
        })?;

    let mut seen = SeenSet::new();
    for row in reader.records() {
        let row = row?;
        if let Some(id) = row.get(column) {
            seen.insert(id);
        }
    }

    Ok(seen)
}

pub fn render_seen(seen: &SeenSet) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record([NOTICE_ID_COLUMN])?;
    for id in seen.iter() {
        writer.write_record([id])?;
    }
    finish(writer)
}

pub fn render_export(matches: &[Opportunity]) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for opp in matches {
        writer.serialize(ExportRow::from(opp))?;
    }
    finish(writer)
}

fn finish(writer: csv::Writer<Vec<u8>>) -> Result<Vec<u8>> {
    writer.into_inner().map_err(|e| {
        let err = e.error();
        AlertError::IoError(std::io::Error::new(err.kind(), err.to_string()))
    })
}

/// Load the seen record. A missing or unreadable record means "first run"
/// and yields `None` instead of an error.
pub async fn load_seen<S: Storage>(storage: &S) -> Option<SeenSet> {
    if !storage.exists(SEEN_FILE).await {
        tracing::info!("No seen record at {}, treating as first run", SEEN_FILE);
        return None;
    }

    let loaded = match storage.read_file(SEEN_FILE).await {
        Ok(data) => parse_seen(&data),
        Err(e) => Err(e),
    };

    match loaded {
        Ok(seen) => {
            tracing::debug!("Loaded {} seen identifiers", seen.len());
            Some(seen)
        }
        Err(e) => {
            tracing::warn!("⚠️ Seen record is unreadable ({}), treating as first run", e);
            None
        }
    }
}

pub async fn write_seen<S: Storage>(storage: &S, seen: &SeenSet) -> Result<()> {
    let data = render_seen(seen)?;
    storage.write_file(SEEN_FILE, &data).await
}

/// Write the dated export and return its file name.
pub async fn write_export<S: Storage>(
    storage: &S,
    run_date: NaiveDate,
    matches: &[Opportunity],
) -> Result<String> {
    let name = export_file_name(run_date);
    let data = render_export(matches)?;
    storage.write_file(&name, &data).await?;
    Ok(name)
}
