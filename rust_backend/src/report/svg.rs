use chrono::{Duration, NaiveDateTime, Timelike};

use super::ReportOptions;
use crate::core::domain::{OccupancySeries, RollingRateSeries, TimeWindow};

const OCCUPANCY_COLOUR: &str = "#1f77b4";
const RATE_COLOUR: &str = "#ff7f0e";

/// Pixel size of a chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartSize {
    pub width: u32,
    pub height: u32,
}

impl ChartSize {
    pub const SMALL: ChartSize = ChartSize {
        width: 250,
        height: 170,
    };
    pub const LARGE: ChartSize = ChartSize {
        width: 800,
        height: 500,
    };

    fn margin(&self) -> f64 {
        self.height as f64 * 0.12
    }
}

/// Maps timestamps and values to pixel coordinates inside the plot area.
struct Frame {
    view: TimeWindow,
    left: f64,
    right: f64,
    top: f64,
    bottom: f64,
}

impl Frame {
    fn new(size: ChartSize, view: TimeWindow) -> Self {
        let margin = size.margin();
        Self {
            view,
            left: margin,
            right: size.width as f64 - margin,
            top: margin * 0.5,
            bottom: size.height as f64 - margin,
        }
    }

    fn x(&self, t: NaiveDateTime) -> f64 {
        let span = self.view.length().num_seconds().max(1) as f64;
        let offset = (t - self.view.start).num_seconds() as f64;
        self.left + (self.right - self.left) * offset / span
    }

    /// Values above `axis_max` are clipped to the top of the plot.
    fn y(&self, value: f64, axis_max: u32) -> f64 {
        let max = f64::from(axis_max.max(1));
        let ratio = value.clamp(0.0, max) / max;
        self.bottom - (self.bottom - self.top) * ratio
    }

    /// Visible range, end inclusive so the closing instant is drawn.
    fn shows(&self, t: NaiveDateTime) -> bool {
        self.view.start <= t && t <= self.view.end
    }
}

/// Render one day's occupancy (primary axis, step line) and rolling sales
/// rate (secondary axis) as a standalone SVG document.
///
/// Returns `None` for a day without occupancy data: such a day gets no chart
/// rather than a flat line at zero.
pub fn render_day_chart(
    occupancy: &OccupancySeries,
    rates: &RollingRateSeries,
    options: &ReportOptions,
) -> Option<String> {
    if occupancy.is_empty() {
        return None;
    }

    let size = options.chart_size();
    let view = options.view_window(rates.day).ok()?;
    let frame = Frame::new(size, view);

    let mut svg = format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\" font-family=\"DejaVu Sans, sans-serif\" font-size=\"{fs}\">\n",
        w = size.width,
        h = size.height,
        fs = (size.height / 17).max(8)
    );
    svg.push_str(&format!(
        "<rect x=\"{:.1}\" y=\"{:.1}\" width=\"{:.1}\" height=\"{:.1}\" fill=\"none\" stroke=\"#000000\" stroke-width=\"0.5\"/>\n",
        frame.left,
        frame.top,
        frame.right - frame.left,
        frame.bottom - frame.top
    ));

    svg.push_str(&hour_ticks(&frame));
    svg.push_str(&axis_labels(&frame, options));

    let mut occupancy_points = Vec::new();
    let mut previous: Option<i64> = None;
    for point in occupancy.points.iter().filter(|p| frame.shows(p.timestamp)) {
        let x = frame.x(point.timestamp);
        if let Some(prev) = previous.filter(|prev| *prev != point.value) {
            occupancy_points.push(format!(
                "{:.1},{:.1}",
                x,
                frame.y(prev as f64, options.occupancy_axis_max)
            ));
        }
        occupancy_points.push(format!(
            "{:.1},{:.1}",
            x,
            frame.y(point.value as f64, options.occupancy_axis_max)
        ));
        previous = Some(point.value);
    }
    svg.push_str(&polyline("occupancy", OCCUPANCY_COLOUR, &occupancy_points));

    let rate_points: Vec<String> = rates
        .points
        .iter()
        .filter(|p| frame.shows(p.timestamp))
        .map(|p| {
            format!(
                "{:.1},{:.1}",
                frame.x(p.timestamp),
                frame.y(f64::from(p.count), options.rate_axis_max)
            )
        })
        .collect();
    svg.push_str(&polyline("rate", RATE_COLOUR, &rate_points));

    svg.push_str("</svg>\n");
    Some(svg)
}

fn polyline(class: &str, colour: &str, points: &[String]) -> String {
    format!(
        "<polyline class=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"1\" points=\"{}\"/>\n",
        class,
        colour,
        points.join(" ")
    )
}

/// Tick and `%H` label on every even hour inside the view.
fn hour_ticks(frame: &Frame) -> String {
    let mut out = String::new();
    let first_hour = frame.view.start.date().and_hms_opt(frame.view.start.hour(), 0, 0);
    let Some(mut t) = first_hour else {
        return out;
    };
    if t < frame.view.start {
        t += Duration::hours(1);
    }

    while t <= frame.view.end {
        if t.hour() % 2 == 0 {
            let x = frame.x(t);
            out.push_str(&format!(
                "<line x1=\"{x:.1}\" y1=\"{b:.1}\" x2=\"{x:.1}\" y2=\"{tb:.1}\" stroke=\"#000000\" stroke-width=\"0.5\"/>\n",
                x = x,
                b = frame.bottom,
                tb = frame.bottom + 3.0
            ));
            out.push_str(&format!(
                "<text x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"middle\">{}</text>\n",
                x,
                frame.bottom + 3.0 + frame.top,
                t.format("%H")
            ));
        }
        t += Duration::hours(1);
    }
    out
}

fn axis_labels(frame: &Frame, options: &ReportOptions) -> String {
    let mut out = String::new();
    for (value, anchor, x, axis_max) in [
        (0, "end", frame.left - 2.0, options.occupancy_axis_max),
        (options.occupancy_axis_max, "end", frame.left - 2.0, options.occupancy_axis_max),
        (0, "start", frame.right + 2.0, options.rate_axis_max),
        (options.rate_axis_max, "start", frame.right + 2.0, options.rate_axis_max),
    ] {
        out.push_str(&format!(
            "<text x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"{}\" dominant-baseline=\"middle\">{}</text>\n",
            x,
            frame.y(f64::from(value), axis_max),
            anchor,
            value
        ));
    }
    out
}
