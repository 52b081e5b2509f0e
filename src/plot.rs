//! SVG diagnostic plots: one confound channel against volume index with
//! artifact volumes marked.

use std::fmt::Write as _;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::confounds::ConfoundTable;
use crate::error::{PlotError, SchemaError};
use crate::identifier::Identifier;

pub const DEFAULT_INDICATORS: [&str; 3] = ["framewise_displacement", "global_signal", "std_dvars"];

const MARKER_COLOR: &str = "#E4B80E";
const MARGIN_PX: f64 = 60.0;

#[derive(Debug, Clone, PartialEq)]
pub struct FigureOptions {
    pub height_in: f64,
    pub width_in: f64,
    pub dpi: u32,
}

impl Default for FigureOptions {
    fn default() -> Self {
        Self {
            height_in: 5.5,
            width_in: 7.0,
            dpi: 250,
        }
    }
}

impl FigureOptions {
    fn px(&self, inches: f64) -> f64 {
        inches * self.dpi as f64
    }

    fn pt(&self, points: f64) -> f64 {
        points / 72.0 * self.dpi as f64
    }
}

pub struct SvgPlotter<'a> {
    output_dir: PathBuf,
    identifier: &'a Identifier,
    data: &'a ConfoundTable,
    labels: &'a [u8],
    options: FigureOptions,
}

impl<'a> SvgPlotter<'a> {
    /// Creates `root/sub-*/ses-wave*/func` for the run's figures.
    pub fn new(
        root: &std::path::Path,
        identifier: &'a Identifier,
        data: &'a ConfoundTable,
        labels: &'a [u8],
        options: FigureOptions,
    ) -> Result<Self> {
        if labels.len() != data.n_volumes() {
            return Err(SchemaError::LengthMismatch {
                expected: data.n_volumes(),
                got: labels.len(),
            }
            .into());
        }
        let output_dir = identifier.func_dir(root);
        std::fs::create_dir_all(&output_dir)
            .with_context(|| format!("failed to create {}", output_dir.display()))?;
        Ok(Self {
            output_dir,
            identifier,
            data,
            labels,
            options,
        })
    }

    pub fn output_path(&self, column: &str) -> PathBuf {
        self.output_dir
            .join(format!("{}-{}.svg", self.identifier.file_stem(), column))
    }

    pub fn plot(&self, column: &str) -> Result<PathBuf> {
        let svg = self.render(column)?;
        let path = self.output_path(column);
        std::fs::write(&path, svg).with_context(|| format!("failed to write {}", path.display()))?;
        Ok(path)
    }

    pub fn render(&self, column: &str) -> Result<String> {
        let values = self
            .data
            .column(column)
            .ok_or_else(|| PlotError::InvalidColumn(column.to_string()))?;

        let opts = &self.options;
        let width = opts.px(opts.width_in);
        let height = opts.px(opts.height_in);
        let plot_w = (width - 2.0 * MARGIN_PX).max(1.0);
        let plot_h = (height - 2.0 * MARGIN_PX).max(1.0);

        let (mut lo, mut hi) = values
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            });
        if !lo.is_finite() || !hi.is_finite() {
            lo = 0.0;
            hi = 1.0;
        }
        if hi - lo < f64::EPSILON {
            lo -= 1.0;
            hi += 1.0;
        }
        let last = values.len().saturating_sub(1).max(1) as f64;
        let x_of = |v: usize| MARGIN_PX + v as f64 / last * plot_w;
        let y_of = |y: f64| MARGIN_PX + (hi - y) / (hi - lo) * plot_h;

        let mut svg = String::new();
        writeln!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w:.0}" height="{h:.0}" viewBox="0 0 {w:.0} {h:.0}">"#,
            w = width,
            h = height
        )?;
        writeln!(svg, r#"<rect width="100%" height="100%" fill="white"/>"#)?;
        writeln!(
            svg,
            r##"<g stroke="#dddddd" stroke-width="1"><line x1="{x0:.2}" y1="{y1:.2}" x2="{x1:.2}" y2="{y1:.2}"/><line x1="{x0:.2}" y1="{y0:.2}" x2="{x0:.2}" y2="{y1:.2}"/></g>"##,
            x0 = MARGIN_PX,
            x1 = MARGIN_PX + plot_w,
            y0 = MARGIN_PX,
            y1 = MARGIN_PX + plot_h
        )?;

        let points: Vec<String> = values
            .iter()
            .enumerate()
            .map(|(v, &y)| format!("{:.2},{:.2}", x_of(v), y_of(y)))
            .collect();
        writeln!(
            svg,
            r#"<polyline fill="none" stroke="black" stroke-width="{:.2}" points="{}"/>"#,
            opts.pt(0.75),
            points.join(" ")
        )?;

        let radius = opts.pt(8.0);
        let font = opts.pt(7.0);
        for (v, (&y, &label)) in values.iter().zip(self.labels).enumerate() {
            if label != 1 {
                continue;
            }
            let (cx, cy) = (x_of(v), y_of(y));
            writeln!(
                svg,
                r#"<circle cx="{cx:.2}" cy="{cy:.2}" r="{radius:.2}" fill="{MARKER_COLOR}"/><text x="{cx:.2}" y="{cy:.2}" font-size="{font:.2}" text-anchor="middle" dominant-baseline="central">{v}</text>"#
            )?;
        }

        let label_font = opts.pt(10.0);
        writeln!(
            svg,
            r#"<text x="{:.2}" y="{:.2}" font-size="{:.2}" text-anchor="middle">volume</text>"#,
            MARGIN_PX + plot_w / 2.0,
            height - MARGIN_PX / 4.0,
            label_font
        )?;
        writeln!(
            svg,
            r#"<text x="{x:.2}" y="{y:.2}" font-size="{f:.2}" text-anchor="middle" transform="rotate(-90 {x:.2} {y:.2})">{column}</text>"#,
            x = MARGIN_PX / 3.0,
            y = MARGIN_PX + plot_h / 2.0,
            f = label_font
        )?;
        writeln!(svg, "</svg>")?;
        Ok(svg)
    }
}
