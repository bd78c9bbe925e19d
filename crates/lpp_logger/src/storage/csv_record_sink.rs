use crate::domain::{DomainResult, RecordSink, SensorRecord, CSV_HEADERS};
use anyhow::Context;
use async_trait::async_trait;
use std::fs::OpenOptions;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::{debug, info, instrument};

/// Appends sensor records to a CSV file, one row per uplink
///
/// The file is opened and closed for every record so it can be rotated or
/// copied while the logger is running.
pub struct CsvRecordSink {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl CsvRecordSink {
    /// Prepare the sink, writing the header row only if the file does not exist yet
    pub fn open(path: impl Into<PathBuf>) -> DomainResult<Self> {
        let path = path.into();

        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => {
                let mut writer = csv::Writer::from_writer(file);
                writer
                    .write_record(CSV_HEADERS)
                    .with_context(|| format!("failed to write header to {}", path.display()))?;
                writer
                    .flush()
                    .with_context(|| format!("failed to flush {}", path.display()))?;
                info!(path = %path.display(), "created sensor log");
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                debug!(path = %path.display(), "appending to existing sensor log");
            }
            Err(e) => {
                return Err(anyhow::Error::new(e)
                    .context(format!("failed to create {}", path.display()))
                    .into());
            }
        }

        Ok(Self {
            path,
            write_lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn append_row(path: &Path, row: &[String]) -> anyhow::Result<()> {
        let file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(path)
            .with_context(|| format!("failed to open {}", path.display()))?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        writer.write_record(row)?;
        writer.flush()?;
        Ok(())
    }
}

#[async_trait]
impl RecordSink for CsvRecordSink {
    #[instrument(name = "csv_write", skip_all, fields(path = %self.path.display()))]
    async fn write(&self, record: &SensorRecord) -> DomainResult<()> {
        let row = record.to_row();
        let path = self.path.clone();

        let _guard = self.write_lock.lock().await;
        tokio::task::spawn_blocking(move || Self::append_row(&path, &row))
            .await
            .context("CSV writer task failed")??;

        debug!(dev_eui = %record.dev_eui, "appended row");
        Ok(())
    }
}
