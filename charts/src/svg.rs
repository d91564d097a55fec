//! SVG backend
//!
//! Draws grouped bar charts as standalone SVG documents.

use crate::{ChartData, ChartKind, ChartRenderer, ChartResult};
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

const WIDTH: f64 = 800.0;
const HEIGHT: f64 = 480.0;
const MARGIN_LEFT: f64 = 80.0;
const MARGIN_RIGHT: f64 = 30.0;
const MARGIN_TOP: f64 = 60.0;
const MARGIN_BOTTOM: f64 = 70.0;
const Y_TICKS: usize = 5;
/// Headroom above the tallest bar, as a multiple of it.
const Y_HEADROOM: f64 = 1.2;
const CAPACITY_COLOR: &str = "#d3d3d3";

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

fn tick_label(value: f64, y_max: f64) -> String {
    if y_max >= 10.0 {
        format!("{:.0}", value)
    } else {
        format!("{:.1}", value)
    }
}

#[derive(Debug, Clone, Default)]
pub struct SvgChartRenderer;

impl SvgChartRenderer {
    pub fn new() -> Self {
        Self
    }

    /// Render `data` to an SVG document.
    pub fn render(&self, data: &ChartData) -> String {
        let plot_w = WIDTH - MARGIN_LEFT - MARGIN_RIGHT;
        let plot_h = HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;
        let bottom = MARGIN_TOP + plot_h;

        let tallest = data.max_value();
        let y_max = if tallest > 0.0 {
            tallest * Y_HEADROOM
        } else {
            1.0
        };
        let y_of = |v: f64| bottom - v / y_max * plot_h;

        let mut svg = String::new();
        let _ = writeln!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" font-family="sans-serif">"#,
            w = WIDTH,
            h = HEIGHT
        );
        let _ = writeln!(
            svg,
            r#"<rect x="0" y="0" width="{}" height="{}" fill="white"/>"#,
            WIDTH, HEIGHT
        );
        let _ = writeln!(
            svg,
            r#"<text x="{:.1}" y="30" text-anchor="middle" font-size="18">{}</text>"#,
            WIDTH / 2.0,
            escape(&data.title)
        );

        // Grid and y axis labels
        for i in 0..=Y_TICKS {
            let value = y_max * i as f64 / Y_TICKS as f64;
            let y = y_of(value);
            let _ = writeln!(
                svg,
                r##"<line x1="{:.1}" y1="{y:.1}" x2="{:.1}" y2="{y:.1}" stroke="#eeeeee"/>"##,
                MARGIN_LEFT,
                MARGIN_LEFT + plot_w,
                y = y
            );
            let _ = writeln!(
                svg,
                r#"<text x="{:.1}" y="{:.1}" text-anchor="end" font-size="11">{}</text>"#,
                MARGIN_LEFT - 6.0,
                y + 4.0,
                tick_label(value, y_max)
            );
        }

        let groups = data.categories.len().max(1) as f64;
        let group_w = plot_w / groups;
        let series_count = data.series.len().max(1) as f64;
        let bar_w = group_w * 0.7 / series_count;

        for (ci, category) in data.categories.iter().enumerate() {
            let group_x = MARGIN_LEFT + group_w * ci as f64 + group_w * 0.15;

            if let Some(capacity) = data.capacity.as_ref().and_then(|c| c.get(ci)) {
                let y = y_of(*capacity);
                let _ = writeln!(
                    svg,
                    r#"<rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" fill="{}" fill-opacity="0.5"/>"#,
                    group_x,
                    y,
                    group_w * 0.7,
                    bottom - y,
                    CAPACITY_COLOR
                );
            }

            for (si, series) in data.series.iter().enumerate() {
                let Some(&value) = series.values.get(ci) else {
                    continue;
                };
                let x = group_x + bar_w * si as f64;
                let y = y_of(value);
                let _ = writeln!(
                    svg,
                    r#"<rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" fill="{}" fill-opacity="0.8"/>"#,
                    x,
                    y,
                    bar_w,
                    bottom - y,
                    escape(&series.color)
                );
                if let Some(note) = series.annotations.get(ci).filter(|n| !n.is_empty()) {
                    let _ = writeln!(
                        svg,
                        r#"<text x="{:.1}" y="{:.1}" text-anchor="middle" font-size="12">{}</text>"#,
                        x + bar_w / 2.0,
                        y - 5.0,
                        escape(note)
                    );
                }
            }

            let _ = writeln!(
                svg,
                r#"<text x="{:.1}" y="{:.1}" text-anchor="middle" font-size="13">{}</text>"#,
                MARGIN_LEFT + group_w * (ci as f64 + 0.5),
                bottom + 20.0,
                escape(category)
            );
        }

        // Axes
        let _ = writeln!(
            svg,
            r#"<line x1="{x:.1}" y1="{:.1}" x2="{x:.1}" y2="{:.1}" stroke="black"/>"#,
            MARGIN_TOP,
            bottom,
            x = MARGIN_LEFT
        );
        let _ = writeln!(
            svg,
            r#"<line x1="{:.1}" y1="{y:.1}" x2="{:.1}" y2="{y:.1}" stroke="black"/>"#,
            MARGIN_LEFT,
            MARGIN_LEFT + plot_w,
            y = bottom
        );
        let _ = writeln!(
            svg,
            r#"<text x="20" y="{y:.1}" text-anchor="middle" font-size="13" transform="rotate(-90 20 {y:.1})">{}</text>"#,
            escape(&data.y_label),
            y = MARGIN_TOP + plot_h / 2.0
        );
        if !data.x_label.is_empty() {
            let _ = writeln!(
                svg,
                r#"<text x="{:.1}" y="{:.1}" text-anchor="middle" font-size="13">{}</text>"#,
                MARGIN_LEFT + plot_w / 2.0,
                HEIGHT - 15.0,
                escape(&data.x_label)
            );
        }

        // Legend
        let mut legend: Vec<(&str, &str)> = Vec::new();
        if data.capacity.is_some() {
            legend.push(("Max Capacity", CAPACITY_COLOR));
        }
        legend.extend(data.series.iter().map(|s| (s.label.as_str(), s.color.as_str())));
        for (i, (label, color)) in legend.iter().enumerate() {
            let y = MARGIN_TOP + 18.0 * i as f64;
            let x = WIDTH - MARGIN_RIGHT - 150.0;
            let _ = writeln!(
                svg,
                r#"<rect x="{:.1}" y="{:.1}" width="12" height="12" fill="{}"/>"#,
                x,
                y,
                escape(color)
            );
            let _ = writeln!(
                svg,
                r#"<text x="{:.1}" y="{:.1}" font-size="12">{}</text>"#,
                x + 18.0,
                y + 10.0,
                escape(label)
            );
        }

        svg.push_str("</svg>\n");
        svg
    }
}

impl ChartRenderer for SvgChartRenderer {
    fn name(&self) -> &str {
        "svg"
    }

    fn draw(&self, kind: ChartKind, data: &ChartData, output_dir: &Path) -> ChartResult<PathBuf> {
        data.validate(kind)?;
        fs::create_dir_all(output_dir)?;
        let path = output_dir.join(format!("{}.svg", kind.file_stem()));
        fs::write(&path, self.render(data))?;
        info!("Generated: {}", path.display());
        Ok(path)
    }
}
