//! JSON-file cache of enriched businesses, one file per (niche, city) search,
//! plus JSON/CSV output of record lists.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::ValueEnum;
use leadgen_core::{BusinessRecord, SearchQuery};
use tokio::io::AsyncWriteExt;

pub(crate) struct LeadStore {
    dir: PathBuf,
}

impl LeadStore {
    pub(crate) fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Cache file for `query`. Characters outside letters, digits, `_` and
    /// `-` in the cache key become `-`.
    pub(crate) fn path_for(&self, query: &SearchQuery) -> PathBuf {
        let stem: String = query
            .cache_key()
            .chars()
            .map(|c| {
                if c.is_alphanumeric() || c == '_' || c == '-' {
                    c
                } else {
                    '-'
                }
            })
            .collect();
        self.dir.join(format!("{stem}.json"))
    }

    /// Loads the cached records for `query`; a missing file is an empty cache.
    pub(crate) async fn load(&self, query: &SearchQuery) -> anyhow::Result<Vec<BusinessRecord>> {
        let path = self.path_for(query);
        let raw = match tokio::fs::read(&path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e).with_context(|| format!("failed to read {}", path.display())),
        };
        serde_json::from_slice(&raw).with_context(|| format!("corrupt cache file {}", path.display()))
    }

    /// Replaces the cache for `query`. Writes a sibling temp file and renames
    /// it over the target so readers never see a partial file.
    pub(crate) async fn save(
        &self,
        query: &SearchQuery,
        records: &[BusinessRecord],
    ) -> anyhow::Result<PathBuf> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .with_context(|| format!("failed to create {}", self.dir.display()))?;

        let path = self.path_for(query);
        let tmp = path.with_extension("json.tmp");
        let body = serde_json::to_vec_pretty(records)?;
        tokio::fs::write(&tmp, body)
            .await
            .with_context(|| format!("failed to write {}", tmp.display()))?;
        tokio::fs::rename(&tmp, &path)
            .await
            .with_context(|| format!("failed to move cache into {}", path.display()))?;

        tracing::debug!(path = %path.display(), records = records.len(), "cache saved");
        Ok(path)
    }
}

/// Businesses in `found` not already in `cached`, also dropping repeats
/// within `found` itself.
pub(crate) fn filter_new(cached: &[BusinessRecord], found: Vec<BusinessRecord>) -> Vec<BusinessRecord> {
    let mut fresh: Vec<BusinessRecord> = Vec::new();
    for business in found {
        let seen = cached
            .iter()
            .chain(fresh.iter())
            .any(|known| known.is_same_business(&business));
        if !seen {
            fresh.push(business);
        }
    }
    fresh
}

/// Records carrying a WhatsApp number.
pub(crate) fn whatsapp_leads(records: Vec<BusinessRecord>) -> Vec<BusinessRecord> {
    records
        .into_iter()
        .filter(|b| b.whatsapp.as_deref().is_some_and(|w| !w.trim().is_empty()))
        .collect()
}

/// On-disk format of an exported search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub(crate) enum ExportFormat {
    #[default]
    Json,
    /// Spreadsheet-friendly CSV with Portuguese column headers.
    Csv,
}

/// Column order of the CSV export. The first seven match the legacy
/// spreadsheets; `whatsapp` and `instagram` come after them.
pub(crate) const CSV_COLUMNS: [&str; 9] = [
    "nome", "telefone", "email", "site", "linkedin", "facebook", "endereco", "whatsapp", "instagram",
];

/// Excel only detects UTF-8 in a CSV that starts with a byte-order mark.
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Renders `records` as CSV in [`CSV_COLUMNS`] order. Absent fields are empty cells.
pub(crate) fn to_csv(records: &[BusinessRecord]) -> anyhow::Result<Vec<u8>> {
    let mut out = UTF8_BOM.to_vec();
    {
        let mut writer = csv::Writer::from_writer(&mut out);
        writer.write_record(CSV_COLUMNS)?;
        for b in records {
            let cell = |v: &Option<String>| v.clone().unwrap_or_default();
            writer.write_record([
                b.name.clone(),
                cell(&b.phone),
                cell(&b.email),
                cell(&b.website),
                cell(&b.linkedin),
                cell(&b.facebook),
                cell(&b.address),
                cell(&b.whatsapp),
                cell(&b.instagram),
            ])?;
        }
        writer.flush()?;
    }
    Ok(out)
}

/// Writes `records` as pretty JSON to `output`, or to stdout.
pub(crate) async fn write_records(
    output: Option<&Path>,
    records: &[BusinessRecord],
) -> anyhow::Result<()> {
    write_export(output, records, ExportFormat::Json).await
}

/// Writes `records` in `format` to `output`, or to stdout.
pub(crate) async fn write_export(
    output: Option<&Path>,
    records: &[BusinessRecord],
    format: ExportFormat,
) -> anyhow::Result<()> {
    let body = match format {
        ExportFormat::Json => {
            let mut body = serde_json::to_vec_pretty(records)?;
            body.push(b'\n');
            body
        }
        ExportFormat::Csv => to_csv(records)?,
    };
    match output {
        Some(path) => tokio::fs::write(path, body)
            .await
            .with_context(|| format!("failed to write {}", path.display())),
        None => {
            let mut stdout = tokio::io::stdout();
            stdout.write_all(&body).await?;
            stdout.flush().await?;
            Ok(())
        }
    }
}

/// Reads a JSON array of business records.
pub(crate) async fn read_records(input: &Path) -> anyhow::Result<Vec<BusinessRecord>> {
    let raw = tokio::fs::read(input)
        .await
        .with_context(|| format!("failed to read {}", input.display()))?;
    serde_json::from_slice(&raw)
        .with_context(|| format!("{} is not a JSON array of business records", input.display()))
}
