use std::path::PathBuf;

use thiserror::Error;

/// The upload could not be parsed under any attempted format.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("invalid CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("input is not valid UTF-8 text")]
    Encoding,

    #[error("line {line}: expected {expected} fields, saw {found}")]
    RaggedRow {
        line: usize,
        expected: usize,
        found: usize,
    },
}

#[derive(Debug, Error)]
pub enum SelectionError {
    #[error("the dataset has no columns")]
    NoColumns,
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("the dataset has no rows to plot")]
    NoRows,

    #[error("column '{column}' has no values to plot in the {partition} partition")]
    EmptyColumn { column: String, partition: String },

    #[error("drawing chart failed: {0}")]
    Draw(String),

    #[error("encoding PNG failed: {0}")]
    Encode(#[from] image::ImageError),

    #[error("writing {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Any failure of a single upload, surfaced to the caller as one message.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Selection(#[from] SelectionError),

    #[error(transparent)]
    Render(#[from] RenderError),
}
