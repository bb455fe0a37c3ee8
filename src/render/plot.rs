use std::collections::BTreeMap;
use std::io::Cursor;

use image::{ImageFormat, RgbImage};
use plotters::prelude::*;
use plotters::series::Histogram as BarSeries;

use crate::data::model::{Column, Value};
use crate::error::RenderError;

/// Pixel size of every rendered chart.
pub const CHART_SIZE: (u32, u32) = (600, 400);

// ---------------------------------------------------------------------------
// Discrete count histogram
// ---------------------------------------------------------------------------

/// One bar: a distinct value and how often it occurs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bin {
    pub label: String,
    pub count: usize,
}

/// One bin per distinct non-missing value, ordered by value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Histogram {
    pub bins: Vec<Bin>,
}

impl Histogram {
    pub fn from_column(column: &Column) -> Self {
        let mut counts: BTreeMap<&Value, usize> = BTreeMap::new();
        for value in column.present() {
            *counts.entry(value).or_default() += 1;
        }
        let bins = counts
            .into_iter()
            .map(|(value, count)| Bin {
                label: value.to_string(),
                count,
            })
            .collect();
        Histogram { bins }
    }

    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    /// Number of values counted.
    pub fn total(&self) -> usize {
        self.bins.iter().map(|b| b.count).sum()
    }

    pub fn max_count(&self) -> usize {
        self.bins.iter().map(|b| b.count).max().unwrap_or(0)
    }
}

// ---------------------------------------------------------------------------
// PNG rendering
// ---------------------------------------------------------------------------

fn draw_error<E: std::fmt::Display>(e: E) -> RenderError {
    RenderError::Draw(e.to_string())
}

/// Draw `histogram` as a bar chart and return it PNG-encoded.
pub fn render_png(
    histogram: &Histogram,
    title: &str,
    color: RGBColor,
) -> Result<Vec<u8>, RenderError> {
    if histogram.is_empty() {
        return Err(RenderError::Draw("nothing to draw".into()));
    }

    let (width, height) = CHART_SIZE;
    let mut buffer = vec![0u8; (width * height * 3) as usize];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
        root.fill(&WHITE).map_err(draw_error)?;

        let n_bins = histogram.bins.len();
        let peak = histogram.max_count();
        let y_max = peak + peak / 10 + 1;

        let mut chart = ChartBuilder::on(&root)
            .caption(title, ("sans-serif", 18))
            .margin(15)
            .x_label_area_size(60)
            .y_label_area_size(50)
            .build_cartesian_2d((0..n_bins).into_segmented(), 0usize..y_max)
            .map_err(draw_error)?;

        let bin_label = |v: &SegmentValue<usize>| match v {
            SegmentValue::CenterOf(i) => histogram
                .bins
                .get(*i)
                .map(|b| b.label.clone())
                .unwrap_or_default(),
            _ => String::new(),
        };

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(n_bins)
            .x_label_formatter(&bin_label)
            .y_desc("Count")
            .draw()
            .map_err(draw_error)?;

        chart
            .draw_series(
                BarSeries::vertical(&chart)
                    .style(color.filled())
                    .margin(6)
                    .data(histogram.bins.iter().enumerate().map(|(i, b)| (i, b.count))),
            )
            .map_err(draw_error)?;

        root.present().map_err(draw_error)?;
    }

    let image = RgbImage::from_raw(width, height, buffer)
        .ok_or_else(|| RenderError::Draw("pixel buffer has the wrong size".into()))?;
    let mut png = Cursor::new(Vec::new());
    image.write_to(&mut png, ImageFormat::Png)?;
    Ok(png.into_inner())
}
