use std::path::PathBuf;

use serde::Serialize;

use crate::data::split::PartitionKind;

// ---------------------------------------------------------------------------
// Per-request output handed to the page template
// ---------------------------------------------------------------------------

/// One rendered histogram and the text shown around it.
#[derive(Debug, Clone, Serialize)]
pub struct ChartPanel {
    pub partition: PartitionKind,
    pub title: String,
    pub description: String,
    pub url: String,
    pub path: PathBuf,
}

/// Everything produced for a successfully processed upload.
#[derive(Debug, Clone, Serialize)]
pub struct DivisionReport {
    /// Identifier shared by this request's chart files.
    pub uid: String,
    pub charts: Vec<ChartPanel>,
    pub columns: Vec<String>,
    pub total_rows: usize,
    pub train_rows: usize,
    pub val_rows: usize,
    pub test_rows: usize,
    /// HTML table with the first rows of the dataset.
    pub sample_data: String,
    /// Column the charts were drawn for.
    pub protocol_column: String,
}

/// The page state for one request: empty form, results, or an error.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PageContext {
    #[serde(flatten)]
    pub report: Option<DivisionReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PageContext {
    pub fn with_report(report: DivisionReport) -> Self {
        Self {
            report: Some(report),
            error: None,
        }
    }

    pub fn with_error(message: String) -> Self {
        Self {
            report: None,
            error: Some(message),
        }
    }

    /// Whether this is the initial, empty form.
    pub fn is_empty(&self) -> bool {
        self.report.is_none() && self.error.is_none()
    }
}

/// Heading shown above a partition's chart.
pub fn panel_title(partition: PartitionKind) -> &'static str {
    match partition {
        PartitionKind::Full => "Distribution: full dataset",
        PartitionKind::Train => "Distribution: train set",
        PartitionKind::Test => "Distribution: test set",
        PartitionKind::Validation => "Distribution: validation set",
    }
}

/// Sentence shown under a partition's chart.
pub fn panel_description(partition: PartitionKind, column: &str) -> String {
    match partition {
        PartitionKind::Full => {
            format!("Histogram of column **{column}** over the original dataset.")
        }
        PartitionKind::Train => "Histogram of the same column on the training set.".to_string(),
        PartitionKind::Test => "Histogram of the same column on the test set.".to_string(),
        PartitionKind::Validation => {
            "Histogram of the same column on the validation set.".to_string()
        }
    }
}

/// Caption drawn on the chart itself.
pub fn chart_caption(partition: PartitionKind, column: &str) -> String {
    format!(
        "Distribution in {} - Column: {column}",
        partition.caption_name()
    )
}
