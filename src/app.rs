use std::path::Path;

use plotters::style::RGBColor;
use uuid::Uuid;

use crate::color::generate_palette;
use crate::data::loader::load_table;
use crate::data::model::Table;
use crate::data::select::select_column;
use crate::data::split::{PartitionKind, SPLIT_SEED, split_table};
use crate::error::{PipelineError, RenderError};
use crate::render::plot::{Histogram, render_png};
use crate::render::preview::{PREVIEW_ROWS, preview_html};
use crate::render::storage::MediaStorage;
use crate::state::{
    ChartPanel, DivisionReport, PageContext, chart_caption, panel_description, panel_title,
};

/// Directory under the media root that receives charts.
pub const GRAPHS_DIR: &str = "graphs";

/// An uploaded file: the client's filename and its raw contents.
#[derive(Debug, Clone)]
pub struct Upload {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Short random identifier grouping one request's chart files.
pub fn new_uid() -> String {
    let mut uid = Uuid::new_v4().simple().to_string();
    uid.truncate(8);
    uid
}

// ---------------------------------------------------------------------------
// Request handler
// ---------------------------------------------------------------------------

/// Turns one upload into four charts and a summary. Holds no per-request state.
pub struct DivisionApp<S> {
    storage: S,
}

impl<S: MediaStorage> DivisionApp<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Handle one request. No upload means the empty form; any failure becomes
    /// a single message and no charts.
    pub fn handle(&self, upload: Option<&Upload>) -> PageContext {
        let Some(upload) = upload else {
            return PageContext::default();
        };
        match self.process(upload) {
            Ok(report) => PageContext::with_report(report),
            Err(e) => {
                log::error!("Failed to process {}: {e}", upload.filename);
                PageContext::with_error(format!("Error processing the file: {e}"))
            }
        }
    }

    /// Load, choose a column, split, and render every chart.
    pub fn process(&self, upload: &Upload) -> Result<DivisionReport, PipelineError> {
        log::info!("Processing {} ({} bytes)", upload.filename, upload.bytes.len());

        let table = load_table(&upload.bytes, &upload.filename)?;
        if table.is_empty() {
            return Err(RenderError::NoRows.into());
        }
        let column = select_column(&table)?;
        let parts = split_table(&table, SPLIT_SEED);
        // Fail before any file is written when a partition came out empty.
        for (kind, part) in [
            (PartitionKind::Train, &parts.train),
            (PartitionKind::Test, &parts.test),
            (PartitionKind::Validation, &parts.validation),
        ] {
            if part.is_empty() {
                return Err(RenderError::EmptyColumn {
                    column: column.clone(),
                    partition: kind.slug().to_string(),
                }
                .into());
            }
        }
        let uid = new_uid();

        let palette = generate_palette(PartitionKind::ALL.len());
        let mut charts = Vec::with_capacity(PartitionKind::ALL.len());
        for (kind, color) in PartitionKind::ALL.into_iter().zip(palette) {
            let partition = parts.table(kind, &table);
            charts.push(self.render_chart(partition, &column, kind, &uid, color)?);
        }

        log::info!(
            "{}: charted '{column}' over {} rows ({} train / {} val / {} test)",
            upload.filename,
            table.len(),
            parts.train.len(),
            parts.validation.len(),
            parts.test.len(),
        );

        Ok(DivisionReport {
            uid,
            charts,
            columns: table.column_names(),
            total_rows: table.len(),
            train_rows: parts.train.len(),
            val_rows: parts.validation.len(),
            test_rows: parts.test.len(),
            sample_data: preview_html(&table, PREVIEW_ROWS),
            protocol_column: column,
        })
    }

    /// Draw and store the histogram of `column` for one partition.
    pub fn render_chart(
        &self,
        table: &Table,
        column: &str,
        kind: PartitionKind,
        uid: &str,
        color: RGBColor,
    ) -> Result<ChartPanel, RenderError> {
        let empty = || RenderError::EmptyColumn {
            column: column.to_string(),
            partition: kind.slug().to_string(),
        };
        let histogram = Histogram::from_column(table.column(column).ok_or_else(empty)?);
        if histogram.is_empty() {
            return Err(empty());
        }

        log::debug!(
            "{}: {} values of '{column}' in {} bins",
            kind.slug(),
            histogram.total(),
            histogram.bins.len()
        );
        let png = render_png(&histogram, &chart_caption(kind, column), color)?;
        let relative = Path::new(GRAPHS_DIR).join(format!("dist_{}_{uid}.png", kind.slug()));
        let path = self.storage.save(&relative, &png)?;

        Ok(ChartPanel {
            partition: kind,
            title: panel_title(kind).to_string(),
            description: panel_description(kind, column),
            url: self.storage.url(&relative),
            path,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::path::PathBuf;

    use crate::config::MediaConfig;
    use crate::render::storage::FsStorage;

    /// Keeps written files in memory.
    #[derive(Default)]
    struct MemoryStorage {
        files: RefCell<Vec<(PathBuf, Vec<u8>)>>,
    }

    impl MediaStorage for MemoryStorage {
        fn save(&self, relative: &Path, bytes: &[u8]) -> Result<PathBuf, RenderError> {
            self.files
                .borrow_mut()
                .push((relative.to_path_buf(), bytes.to_vec()));
            Ok(relative.to_path_buf())
        }

        fn url(&self, relative: &Path) -> String {
            format!("/media/{}", relative.display())
        }
    }

    fn kdd_upload(rows: usize) -> Upload {
        let protocols = ["tcp", "udp", "icmp"];
        let mut csv = String::from("protocol_type,duration\n");
        for i in 0..rows {
            csv.push_str(&format!("{},{}\n", protocols[i % 3], i * 7));
        }
        Upload {
            filename: "kdd.csv".into(),
            bytes: csv.into_bytes(),
        }
    }

    #[test]
    fn hundred_row_scenario() {
        let dir = tempfile::tempdir().unwrap();
        let app = DivisionApp::new(FsStorage::new(MediaConfig::new(dir.path(), "/media/")));

        let report = app.process(&kdd_upload(100)).unwrap();

        assert_eq!(report.protocol_column, "protocol_type");
        assert_eq!(report.total_rows, 100);
        assert_eq!(report.test_rows, 20);
        assert_eq!(report.val_rows, 10);
        assert_eq!(report.train_rows, 70);
        assert_eq!(report.columns, vec!["protocol_type", "duration"]);
        assert_eq!(report.uid.len(), 8);

        assert_eq!(report.charts.len(), 4);
        for (chart, slug) in report.charts.iter().zip(["df", "train", "test", "val"]) {
            let name = format!("dist_{slug}_{}.png", report.uid);
            assert_eq!(chart.path, dir.path().join("graphs").join(&name));
            assert_eq!(chart.url, format!("/media/graphs/{name}"));
            assert!(chart.path.is_file());
        }
        let val = &report.charts[3];
        assert_eq!(val.partition, PartitionKind::Validation);
        assert_eq!(val.title, "Distribution: validation set");
    }

    #[test]
    fn tiny_tables_still_get_four_charts() {
        for rows in [3, 4] {
            let app = DivisionApp::new(MemoryStorage::default());
            let report = app.process(&kdd_upload(rows)).unwrap();
            assert_eq!(report.test_rows, 1, "rows = {rows}");
            assert_eq!(report.val_rows, 1, "rows = {rows}");
            assert_eq!(report.train_rows, rows - 2, "rows = {rows}");
            assert_eq!(app.storage.files.borrow().len(), 4);
        }
    }

    #[test]
    fn empty_partition_fails_before_writing() {
        let app = DivisionApp::new(MemoryStorage::default());
        let err = app.process(&kdd_upload(1)).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Render(RenderError::EmptyColumn { ref partition, .. }) if partition == "train"
        ));
        assert!(app.storage.files.borrow().is_empty());
    }

    #[test]
    fn preview_holds_eight_rows() {
        let app = DivisionApp::new(MemoryStorage::default());
        let report = app.process(&kdd_upload(30)).unwrap();
        assert_eq!(report.sample_data.matches("<tr>").count(), PREVIEW_ROWS);
    }

    #[test]
    fn same_table_twice_gives_distinct_paths_and_identical_images() {
        let storage = MemoryStorage::default();
        let app = DivisionApp::new(storage);
        let upload = kdd_upload(50);
        let table = load_table(&upload.bytes, &upload.filename).unwrap();
        let color = generate_palette(1)[0];

        let a = app
            .render_chart(&table, "protocol_type", PartitionKind::Full, "aaaaaaaa", color)
            .unwrap();
        let b = app
            .render_chart(&table, "protocol_type", PartitionKind::Full, "bbbbbbbb", color)
            .unwrap();

        assert_ne!(a.path, b.path);
        let files = app.storage.files.borrow();
        assert_eq!(files.len(), 2);
        assert_eq!(files[0].1, files[1].1);
    }

    #[test]
    fn zero_row_upload_is_a_render_error() {
        let app = DivisionApp::new(MemoryStorage::default());
        let upload = Upload {
            filename: "empty.csv".into(),
            bytes: b"protocol_type,duration\n".to_vec(),
        };
        let err = app.process(&upload).unwrap_err();
        assert!(matches!(err, PipelineError::Render(RenderError::NoRows)));

        let empty = Upload {
            filename: "empty.csv".into(),
            bytes: Vec::new(),
        };
        let err = app.process(&empty).unwrap_err();
        assert!(matches!(err, PipelineError::Render(RenderError::NoRows)));
    }

    #[test]
    fn all_missing_column_is_a_render_error() {
        let app = DivisionApp::new(MemoryStorage::default());
        let upload = Upload {
            filename: "gaps.csv".into(),
            bytes: b"protocol_type,duration\n,1\n,2\n,3\n,4\n,5\n".to_vec(),
        };
        let err = app.process(&upload).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Render(RenderError::EmptyColumn { .. })
        ));
        assert!(app.storage.files.borrow().is_empty());
    }

    #[test]
    fn handle_without_upload_is_empty_form() {
        let app = DivisionApp::new(MemoryStorage::default());
        assert!(app.handle(None).is_empty());
    }

    #[test]
    fn handle_reports_failures_as_one_message() {
        let app = DivisionApp::new(MemoryStorage::default());
        let upload = Upload {
            filename: "bad.csv".into(),
            bytes: b"a,b\n1,2,3\n".to_vec(),
        };
        let page = app.handle(Some(&upload));
        assert!(page.report.is_none());
        let message = page.error.unwrap();
        assert!(message.starts_with("Error processing the file: "));
        assert!(message.contains("expected 2 fields, saw 3"));
    }

    #[test]
    fn uid_is_short_hex() {
        let uid = new_uid();
        assert_eq!(uid.len(), 8);
        assert!(uid.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(new_uid(), new_uid());
    }
}
