use crate::error::{Error, Result};
use crate::models::job::EnrichedJobRecord;
use crate::services::job_store::JobSink;
use async_trait::async_trait;
use calamine::{open_workbook, Reader, Xlsx};
use chrono::NaiveDate;
use rust_xlsxwriter::{Format, Workbook};
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

pub const COLUMNS: [(&str, f64); 6] = [
    ("Date of Contact", 16.0),
    ("Employer", 30.0),
    ("Job Title", 40.0),
    ("Method of Contact", 22.0),
    ("Type of Contact", 16.0),
    ("Result of Contact", 24.0),
];

/// One line of the job application log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicationLogRow {
    pub date_of_contact: String,
    pub employer: String,
    pub job_title: String,
    pub method_of_contact: String,
    pub type_of_contact: String,
    pub result_of_contact: String,
}

impl ApplicationLogRow {
    pub fn from_record(record: &EnrichedJobRecord, contacted_on: NaiveDate) -> Self {
        Self {
            date_of_contact: contacted_on.format("%m/%d/%Y").to_string(),
            employer: record.company_name.clone().unwrap_or_else(|| "N/A".to_string()),
            job_title: record.title.clone().unwrap_or_else(|| "N/A".to_string()),
            method_of_contact: record.via.clone(),
            type_of_contact: "Application".to_string(),
            result_of_contact: "Waiting for response".to_string(),
        }
    }

    fn cells(&self) -> [&str; 6] {
        [
            self.date_of_contact.as_str(),
            self.employer.as_str(),
            self.job_title.as_str(),
            self.method_of_contact.as_str(),
            self.type_of_contact.as_str(),
            self.result_of_contact.as_str(),
        ]
    }

    fn from_cells(cells: &[String]) -> Self {
        let cell = |i: usize| cells.get(i).cloned().unwrap_or_default();
        Self {
            date_of_contact: cell(0),
            employer: cell(1),
            job_title: cell(2),
            method_of_contact: cell(3),
            type_of_contact: cell(4),
            result_of_contact: cell(5),
        }
    }
}

pub struct ExportService;

impl ExportService {
    /// Reads the data rows (header excluded) of the first worksheet.
    pub fn read_log(path: &Path) -> Result<Vec<ApplicationLogRow>> {
        let mut workbook: Xlsx<_> = open_workbook(path)?;
        let range = match workbook.worksheet_range_at(0) {
            Some(range) => range?,
            None => return Ok(Vec::new()),
        };

        let rows = range
            .rows()
            .skip(1)
            .map(|row| row.iter().map(|cell| cell.to_string()).collect::<Vec<_>>())
            .filter(|cells| cells.iter().any(|c| !c.is_empty()))
            .map(|cells| ApplicationLogRow::from_cells(&cells))
            .collect();
        Ok(rows)
    }

    /// Writes the header and every row, replacing the file.
    pub fn write_log(path: &Path, rows: &[ApplicationLogRow]) -> Result<()> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name("Applications")?;

        let header_format = Format::new().set_bold();
        for (i, (name, width)) in COLUMNS.iter().enumerate() {
            worksheet.set_column_width(i as u16, *width)?;
            worksheet.write_string_with_format(0, i as u16, *name, &header_format)?;
        }

        for (idx, row) in rows.iter().enumerate() {
            let row_num = idx as u32 + 1;
            for (col, value) in row.cells().iter().enumerate() {
                worksheet.write_string(row_num, col as u16, *value)?;
            }
        }

        workbook.save(path)?;
        Ok(())
    }

    /// Appends one row, creating the file when it does not exist yet.
    pub fn append_row(path: &Path, row: ApplicationLogRow) -> Result<usize> {
        let mut rows = if path.exists() {
            Self::read_log(path)?
        } else {
            Vec::new()
        };
        rows.push(row);
        Self::write_log(path, &rows)?;
        Ok(rows.len())
    }
}

/// Spreadsheet sink keeping a local log of applications.
pub struct SpreadsheetLog {
    path: PathBuf,
    // The file is rewritten in full on every append.
    write_lock: Mutex<()>,
}

impl SpreadsheetLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl JobSink for SpreadsheetLog {
    fn name(&self) -> &'static str {
        "spreadsheet"
    }

    async fn save(&self, record: &EnrichedJobRecord) -> Result<()> {
        let row = ApplicationLogRow::from_record(record, chrono::Local::now().date_naive());
        let path = self.path.clone();

        let _guard = self.write_lock.lock().await;
        let created = !path.exists();
        let total = tokio::task::spawn_blocking(move || ExportService::append_row(&path, row))
            .await
            .map_err(|e| Error::Internal(format!("Spreadsheet task failed: {}", e)))??;

        if created {
            tracing::info!(path = %self.path.display(), title = record.display_title(), "Created spreadsheet and saved job");
        } else {
            tracing::info!(path = %self.path.display(), title = record.display_title(), rows = total, "Appended job to spreadsheet");
        }
        Ok(())
    }
}
