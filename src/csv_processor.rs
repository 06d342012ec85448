use indexmap::IndexMap;

use anyhow::Context;

use crate::config;
use crate::model::{Category, Record, Snapshot};
use crate::normalize;

/// Column names for the total-assets table, which is scraped without a header row.
const ASSETS_HEADER: [&str; 2] = ["種類", "残高"];

/// Pairs each data row with the header row, position by position.
///
/// Rows shorter or longer than the header are cut to the shorter of the two.
pub fn project(header: &[String], rows: &[Vec<String>]) -> Vec<IndexMap<String, String>> {
    rows.iter()
        .map(|row| header.iter().cloned().zip(row.iter().cloned()).collect())
        .collect()
}

/// Attaches the derived balance to a projected row.
///
/// Rows without the section's amount column get a zero balance.
pub fn enrich(category: Category, fields: IndexMap<String, String>) -> Record {
    let balance = fields
        .get(config::balance_field(category))
        .map(|raw| normalize::normalize(raw))
        .unwrap_or_default();
    Record { fields, balance }
}

/// Reads one scraped table dumped as CSV, trimming every cell.
///
/// # Arguments
/// * `path` - CSV file, one table row per line.
/// * `has_header` - Whether the first row holds the column names.
///
/// # Returns
/// * `anyhow::Result<(Vec<String>, Vec<Vec<String>>)>` - Header row (empty when absent) and data rows.
pub fn read_table<P: AsRef<std::path::Path>>(
    path: P,
    has_header: bool,
) -> anyhow::Result<(Vec<String>, Vec<Vec<String>>)> {
    let file = std::fs::File::open(path.as_ref())
        .with_context(|| format!("Failed to open {}", path.as_ref().display()))?;
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(file);

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        rows.push(record.iter().map(|cell| cell.trim().to_string()).collect::<Vec<_>>());
    }

    let header = if has_header && !rows.is_empty() {
        rows.remove(0)
    } else {
        Vec::new()
    };
    anyhow::Ok((header, rows))
}

/// Builds the records of one section from its CSV dump in `dir`.
///
/// A missing file means the section was not on the page; it yields no records.
pub fn read_section<P: AsRef<std::path::Path>>(dir: P, category: Category) -> anyhow::Result<Vec<Record>> {
    if category == Category::Summary {
        return read_summary(dir);
    }

    let path = dir.as_ref().join(format!("{}.csv", category.file_stem()));
    if !path.exists() {
        log::debug!("No {} table at {}", category.file_stem(), path.display());
        return anyhow::Ok(Vec::new());
    }

    let rows = if category == Category::Assets {
        let (_, rows) = read_table(&path, false)?;
        let header: Vec<String> = ASSETS_HEADER.iter().map(|h| h.to_string()).collect();
        project(&header, &rows)
    } else {
        let (header, rows) = read_table(&path, true)?;
        project(&header, &rows)
    };

    let records: Vec<Record> = rows.into_iter().map(|fields| enrich(category, fields)).collect();
    log::debug!("{}: {} records", category.file_stem(), records.len());
    anyhow::Ok(records)
}

/// Builds the single total-assets record from the raw heading text in `summary.txt`.
fn read_summary<P: AsRef<std::path::Path>>(dir: P) -> anyhow::Result<Vec<Record>> {
    let path = dir.as_ref().join("summary.txt");
    if !path.exists() {
        log::debug!("No summary heading at {}", path.display());
        return anyhow::Ok(Vec::new());
    }

    let raw = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let mut fields = IndexMap::new();
    fields.insert("種類".to_string(), "資産総額".to_string());
    fields.insert("残高".to_string(), normalize::clean_heading(&raw));
    let record = Record {
        fields,
        balance: normalize::normalize(&raw),
    };
    anyhow::Ok(vec![record])
}

/// Assembles a snapshot from every section dumped into `dir`.
///
/// # Arguments
/// * `dir` - Directory the scraper wrote its section tables to.
/// * `time` - Capture time in the fixed snapshot format.
pub fn build_snapshot<P: AsRef<std::path::Path>>(dir: P, time: String) -> anyhow::Result<Snapshot> {
    if !dir.as_ref().is_dir() {
        anyhow::bail!("Input directory {} does not exist", dir.as_ref().display());
    }

    let mut snapshot = Snapshot::new(time);
    for category in Category::ALL {
        *snapshot.section_mut(category) = read_section(dir.as_ref(), category)?;
    }
    anyhow::Ok(snapshot)
}
