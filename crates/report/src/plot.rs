use std::fmt::{self, Write as _};
use std::path::Path;

use tracing::info;

use crate::error::ReportError;
use crate::select::Metric;
use crate::summary::{resolution_label, SummaryTable};

const WIDTH: f64 = 1500.0;
const HEIGHT: f64 = 1200.0;
const PANEL_W: f64 = WIDTH / 2.0;
const PANEL_H: f64 = HEIGHT / 2.0;

const MARGIN_LEFT: f64 = 90.0;
const MARGIN_RIGHT: f64 = 30.0;
const MARGIN_TOP: f64 = 60.0;
const MARGIN_BOTTOM: f64 = 110.0;

const PALETTE: [&str; 6] = ["#87CEEB", "#90EE90", "#FA8072", "#DDA0DD", "#F0E68C", "#B0C4DE"];

#[derive(Clone, Copy)]
struct Panel {
    x: f64,
    y: f64,
}

impl Panel {
    fn left(self) -> f64 {
        self.x + MARGIN_LEFT
    }

    fn right(self) -> f64 {
        self.x + PANEL_W - MARGIN_RIGHT
    }

    fn top(self) -> f64 {
        self.y + MARGIN_TOP
    }

    fn bottom(self) -> f64 {
        self.y + PANEL_H - MARGIN_BOTTOM
    }

    fn plot_w(self) -> f64 {
        self.right() - self.left()
    }

    fn plot_h(self) -> f64 {
        self.bottom() - self.top()
    }
}

/// Linear mapping from data range to pixel range.
#[derive(Clone, Copy)]
struct Axis {
    min: f64,
    max: f64,
}

impl Axis {
    fn from_zero(values: impl Iterator<Item = f64>) -> Self {
        let max = values.fold(0.0_f64, f64::max);
        Self {
            min: 0.0,
            max: if max > 0.0 { max * 1.1 } else { 1.0 },
        }
    }

    fn padded(values: impl Iterator<Item = f64>) -> Self {
        let (lo, hi) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
        if !lo.is_finite() {
            return Self { min: 0.0, max: 1.0 };
        }
        let pad = if hi > lo { (hi - lo) * 0.1 } else { lo.abs().max(1.0) * 0.05 };
        Self {
            min: lo - pad,
            max: hi + pad,
        }
    }

    fn fraction(self, value: f64) -> f64 {
        (value - self.min) / (self.max - self.min)
    }

    fn ticks(self, n: usize) -> impl Iterator<Item = f64> {
        (0..=n).map(move |i| self.min + (self.max - self.min) * i as f64 / n as f64)
    }
}

fn tick_label(value: f64, span: f64) -> String {
    if span >= 50.0 {
        format!("{value:.0}")
    } else if span >= 5.0 {
        format!("{value:.1}")
    } else {
        format!("{value:.2}")
    }
}

fn color(index: usize) -> &'static str {
    PALETTE[index % PALETTE.len()]
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Renders the 2x2 comparison figure: accuracy, training time and AUC bars
/// grouped by model, plus an accuracy-vs-time scatter.
pub fn render_svg(table: &SummaryTable) -> String {
    let mut svg = String::new();
    draw(&mut svg, table).expect("write to String is infallible");
    svg
}

pub fn write_svg_file(table: &SummaryTable, path: &Path) -> Result<(), ReportError> {
    std::fs::write(path, render_svg(table))?;
    info!(rows = table.len(), path = %path.display(), "comparison plot written");
    Ok(())
}

fn draw(svg: &mut String, table: &SummaryTable) -> fmt::Result {
    writeln!(svg, "<?xml version=\"1.0\" encoding=\"UTF-8\"?>")?;
    writeln!(
        svg,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{WIDTH}\" height=\"{HEIGHT}\" viewBox=\"0 0 {WIDTH} {HEIGHT}\" font-family=\"sans-serif\">"
    )?;
    writeln!(svg, "  <rect width=\"100%\" height=\"100%\" fill=\"white\"/>")?;

    let models = table.models();
    let resolutions = table.resolutions();

    bar_panel(
        svg,
        Panel { x: 0.0, y: 0.0 },
        "Model Accuracy by Image Size",
        "Accuracy (%)",
        Metric::Accuracy,
        table,
        &models,
        &resolutions,
    )?;
    bar_panel(
        svg,
        Panel { x: PANEL_W, y: 0.0 },
        "Training Time by Image Size",
        "Training Time (seconds)",
        Metric::TrainingTime,
        table,
        &models,
        &resolutions,
    )?;
    bar_panel(
        svg,
        Panel { x: 0.0, y: PANEL_H },
        "AUC Score by Image Size",
        "AUC Score",
        Metric::Auc,
        table,
        &models,
        &resolutions,
    )?;
    scatter_panel(
        svg,
        Panel {
            x: PANEL_W,
            y: PANEL_H,
        },
        table,
        &resolutions,
    )?;

    writeln!(svg, "</svg>")
}

fn frame(
    svg: &mut String,
    panel: Panel,
    title: &str,
    x_label: Option<&str>,
    y_label: &str,
) -> fmt::Result {
    writeln!(svg, "  <g class=\"panel\">")?;
    writeln!(
        svg,
        "    <text x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"middle\" font-size=\"18\" font-weight=\"bold\">{}</text>",
        panel.left() + panel.plot_w() / 2.0,
        panel.y + 35.0,
        escape(title)
    )?;
    writeln!(
        svg,
        "    <line x1=\"{l:.1}\" y1=\"{b:.1}\" x2=\"{r:.1}\" y2=\"{b:.1}\" stroke=\"#333\"/>",
        l = panel.left(),
        r = panel.right(),
        b = panel.bottom()
    )?;
    writeln!(
        svg,
        "    <line x1=\"{l:.1}\" y1=\"{t:.1}\" x2=\"{l:.1}\" y2=\"{b:.1}\" stroke=\"#333\"/>",
        l = panel.left(),
        t = panel.top(),
        b = panel.bottom()
    )?;
    let (cx, cy) = (panel.x + 22.0, panel.top() + panel.plot_h() / 2.0);
    writeln!(
        svg,
        "    <text x=\"{cx:.1}\" y=\"{cy:.1}\" text-anchor=\"middle\" font-size=\"14\" transform=\"rotate(-90 {cx:.1} {cy:.1})\">{}</text>",
        escape(y_label)
    )?;
    if let Some(x_label) = x_label {
        writeln!(
            svg,
            "    <text x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"middle\" font-size=\"14\">{}</text>",
            panel.left() + panel.plot_w() / 2.0,
            panel.bottom() + 50.0,
            escape(x_label)
        )?;
    }
    Ok(())
}

fn y_ticks(svg: &mut String, panel: Panel, axis: Axis, grid: bool) -> fmt::Result {
    for value in axis.ticks(5) {
        let y = panel.bottom() - axis.fraction(value) * panel.plot_h();
        writeln!(
            svg,
            "    <text x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"end\" font-size=\"11\">{}</text>",
            panel.left() - 6.0,
            y + 4.0,
            tick_label(value, axis.max - axis.min)
        )?;
        if grid {
            writeln!(
                svg,
                "    <line x1=\"{:.1}\" y1=\"{y:.1}\" x2=\"{:.1}\" y2=\"{y:.1}\" stroke=\"#999\" stroke-opacity=\"0.3\"/>",
                panel.left(),
                panel.right()
            )?;
        }
    }
    Ok(())
}

fn legend(svg: &mut String, panel: Panel, resolutions: &[u32]) -> fmt::Result {
    let x = panel.right() - 110.0;
    let mut y = panel.top() + 10.0;
    writeln!(
        svg,
        "    <text x=\"{x:.1}\" y=\"{y:.1}\" font-size=\"12\" font-weight=\"bold\">Image Size</text>"
    )?;
    for (i, &resolution) in resolutions.iter().enumerate() {
        y += 18.0;
        writeln!(
            svg,
            "    <rect x=\"{x:.1}\" y=\"{:.1}\" width=\"12\" height=\"12\" fill=\"{}\"/>",
            y - 10.0,
            color(i)
        )?;
        writeln!(
            svg,
            "    <text x=\"{:.1}\" y=\"{y:.1}\" font-size=\"12\">{}</text>",
            x + 18.0,
            resolution_label(resolution)
        )?;
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn bar_panel(
    svg: &mut String,
    panel: Panel,
    title: &str,
    y_label: &str,
    metric: Metric,
    table: &SummaryTable,
    models: &[&str],
    resolutions: &[u32],
) -> fmt::Result {
    frame(svg, panel, title, None, y_label)?;
    let axis = Axis::from_zero(table.iter().map(|r| r.value(metric)));
    y_ticks(svg, panel, axis, false)?;

    let group_w = panel.plot_w() / models.len().max(1) as f64;
    let bar_w = group_w * 0.8 / resolutions.len().max(1) as f64;

    for (i, model) in models.iter().enumerate() {
        let group_x = panel.left() + i as f64 * group_w;
        for (j, &resolution) in resolutions.iter().enumerate() {
            // Absent pairs leave a gap in the group.
            let Some(row) = table.get(model, resolution) else {
                continue;
            };
            // Bars grow up from zero; a negative value draws as an empty bar.
            let h = axis.fraction(row.value(metric)).max(0.0) * panel.plot_h();
            writeln!(
                svg,
                "    <rect x=\"{:.1}\" y=\"{:.1}\" width=\"{bar_w:.1}\" height=\"{h:.1}\" fill=\"{}\" stroke=\"#333\" stroke-width=\"0.5\"><title>{} {}: {}</title></rect>",
                group_x + group_w * 0.1 + j as f64 * bar_w,
                panel.bottom() - h,
                color(j),
                escape(model),
                resolution_label(resolution),
                metric.format_value(row.value(metric))
            )?;
        }

        let (lx, ly) = (group_x + group_w / 2.0, panel.bottom() + 18.0);
        writeln!(
            svg,
            "    <text x=\"{lx:.1}\" y=\"{ly:.1}\" text-anchor=\"end\" font-size=\"12\" transform=\"rotate(-45 {lx:.1} {ly:.1})\">{}</text>",
            escape(model)
        )?;
    }

    legend(svg, panel, resolutions)?;
    writeln!(svg, "  </g>")
}

fn scatter_panel(
    svg: &mut String,
    panel: Panel,
    table: &SummaryTable,
    resolutions: &[u32],
) -> fmt::Result {
    frame(
        svg,
        panel,
        "Accuracy vs Training Time",
        Some("Training Time (seconds)"),
        "Accuracy (%)",
    )?;
    let x_axis = Axis::padded(table.iter().map(|r| r.training_time));
    let y_axis = Axis::padded(table.iter().map(|r| r.accuracy));
    y_ticks(svg, panel, y_axis, true)?;

    for value in x_axis.ticks(5) {
        let x = panel.left() + x_axis.fraction(value) * panel.plot_w();
        writeln!(
            svg,
            "    <text x=\"{x:.1}\" y=\"{:.1}\" text-anchor=\"middle\" font-size=\"11\">{}</text>",
            panel.bottom() + 18.0,
            tick_label(value, x_axis.max - x_axis.min)
        )?;
        writeln!(
            svg,
            "    <line x1=\"{x:.1}\" y1=\"{:.1}\" x2=\"{x:.1}\" y2=\"{:.1}\" stroke=\"#999\" stroke-opacity=\"0.3\"/>",
            panel.top(),
            panel.bottom()
        )?;
    }

    for (j, &resolution) in resolutions.iter().enumerate() {
        for row in table.for_resolution(resolution) {
            let x = panel.left() + x_axis.fraction(row.training_time) * panel.plot_w();
            let y = panel.bottom() - y_axis.fraction(row.accuracy) * panel.plot_h();
            writeln!(
                svg,
                "    <circle cx=\"{x:.1}\" cy=\"{y:.1}\" r=\"8\" fill=\"{}\" fill-opacity=\"0.7\"/>",
                color(j)
            )?;
            writeln!(
                svg,
                "    <text x=\"{:.1}\" y=\"{:.1}\" font-size=\"10\">{}</text>",
                x + 5.0,
                y - 5.0,
                escape(&row.model_name)
            )?;
        }
    }

    legend(svg, panel, resolutions)?;
    writeln!(svg, "  </g>")
}
