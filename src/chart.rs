use askama::Template;
use serde::Serialize;
use std::collections::BTreeMap;
use std::f64::consts::PI;
use tracing::{debug, error};

/// Slice colors for the category chart, reused in order when categories outnumber them.
pub const PALETTE: [&str; 4] = [
    "rgba(255, 99, 132, 0.7)",
    "rgba(54, 162, 235, 0.7)",
    "rgba(255, 206, 86, 0.7)",
    "rgba(75, 192, 192, 0.7)",
];

pub const DAILY_SERIES_LABEL: &str = "Messages Sent";
const DAILY_LINE_COLOR: &str = "rgba(75, 192, 192, 1)";
const DAILY_FILL_COLOR: &str = "rgba(75, 192, 192, 0.2)";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Canvas {
    CategoryChart,
    DailyChart,
}

impl Canvas {
    pub fn element_id(self) -> &'static str {
        match self {
            Self::CategoryChart => "category-chart",
            Self::DailyChart => "daily-chart",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Pie,
    Line,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub labels: Vec<String>,
    pub values: Vec<u64>,
    pub colors: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub series_label: Option<String>,
    pub begin_at_zero: bool,
    pub integer_ticks: bool,
}

pub fn category_chart(counts: &BTreeMap<String, u64>) -> ChartSpec {
    let labels: Vec<String> = counts.keys().cloned().collect();
    let colors = (0..labels.len())
        .map(|idx| PALETTE[idx % PALETTE.len()].to_string())
        .collect();
    ChartSpec {
        kind: ChartKind::Pie,
        values: counts.values().copied().collect(),
        labels,
        colors,
        series_label: None,
        begin_at_zero: false,
        integer_ticks: false,
    }
}

/// Dates are ISO-8601, so lexical order is chronological order.
pub fn daily_chart<'a, I>(counts: I) -> ChartSpec
where
    I: IntoIterator<Item = (&'a String, &'a u64)>,
{
    let mut points: Vec<(&String, u64)> = counts.into_iter().map(|(date, n)| (date, *n)).collect();
    points.sort_by(|a, b| a.0.cmp(b.0));
    ChartSpec {
        kind: ChartKind::Line,
        labels: points.iter().map(|(date, _)| (*date).clone()).collect(),
        values: points.iter().map(|(_, n)| *n).collect(),
        colors: vec![DAILY_LINE_COLOR.to_string(), DAILY_FILL_COLOR.to_string()],
        series_label: Some(DAILY_SERIES_LABEL.to_string()),
        begin_at_zero: true,
        integer_ticks: true,
    }
}

/// A chart drawn onto one canvas. Dropped through [`ChartInstance::destroy`].
#[derive(Debug, Serialize)]
pub struct ChartInstance {
    pub id: u64,
    pub canvas: Canvas,
    pub spec: ChartSpec,
    #[serde(skip)]
    svg: String,
}

impl ChartInstance {
    pub fn svg(&self) -> &str {
        &self.svg
    }

    fn destroy(self) {
        debug!(id = self.id, canvas = self.canvas.element_id(), "destroying chart");
    }
}

/// Owns the live chart for each canvas.
#[derive(Debug, Default)]
pub struct ChartContext {
    category: Option<ChartInstance>,
    daily: Option<ChartInstance>,
    created: u64,
    destroyed: u64,
}

impl ChartContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Destroy whatever is drawn on `canvas`, then draw `spec` there.
    pub fn replace(&mut self, canvas: Canvas, spec: ChartSpec) -> &ChartInstance {
        self.created += 1;
        let id = self.created;
        let slot = match canvas {
            Canvas::CategoryChart => &mut self.category,
            Canvas::DailyChart => &mut self.daily,
        };
        if let Some(previous) = slot.take() {
            previous.destroy();
            self.destroyed += 1;
        }
        let svg = render_svg(&spec);
        debug!(id, canvas = canvas.element_id(), points = spec.values.len(), "creating chart");
        slot.insert(ChartInstance { id, canvas, spec, svg })
    }

    pub fn get(&self, canvas: Canvas) -> Option<&ChartInstance> {
        match canvas {
            Canvas::CategoryChart => self.category.as_ref(),
            Canvas::DailyChart => self.daily.as_ref(),
        }
    }

    pub fn live_count(&self) -> usize {
        usize::from(self.category.is_some()) + usize::from(self.daily.is_some())
    }

    pub fn created(&self) -> u64 {
        self.created
    }

    pub fn destroyed(&self) -> u64 {
        self.destroyed
    }
}

pub fn render_svg(spec: &ChartSpec) -> String {
    let rendered = match spec.kind {
        ChartKind::Pie => pie_svg(spec).render(),
        ChartKind::Line => line_svg(spec).render(),
    };
    rendered.unwrap_or_else(|err| {
        error!("error rendering chart: {err}");
        String::new()
    })
}

fn color_at(spec: &ChartSpec, idx: usize) -> &str {
    spec.colors
        .get(idx)
        .map_or(PALETTE[idx % PALETTE.len()], String::as_str)
}

struct PieSlice<'a> {
    color: &'a str,
    /// The slice covers the whole pie and is drawn as a circle.
    full: bool,
    path: String,
}

struct LegendEntry<'a> {
    y: usize,
    swatch_y: usize,
    color: &'a str,
    label: &'a str,
    value: u64,
}

#[derive(Template)]
#[template(path = "charts/pie.html")]
struct PieSvg<'a> {
    cx: f64,
    cy: f64,
    radius: f64,
    slices: Vec<PieSlice<'a>>,
    legend: Vec<LegendEntry<'a>>,
}

fn pie_svg(spec: &ChartSpec) -> PieSvg<'_> {
    const CX: f64 = 130.0;
    const CY: f64 = 130.0;
    const R: f64 = 110.0;

    let total = spec.values.iter().fold(0u64, |acc, value| acc.saturating_add(*value));
    let mut svg = PieSvg {
        cx: CX,
        cy: CY,
        radius: R,
        slices: Vec::new(),
        legend: Vec::new(),
    };
    if total == 0 {
        return svg;
    }

    let mut angle = -PI / 2.0;
    for (idx, value) in spec.values.iter().enumerate() {
        let color = color_at(spec, idx);
        if *value == total {
            svg.slices.push(PieSlice {
                color,
                full: true,
                path: String::new(),
            });
            continue;
        }
        if *value == 0 {
            continue;
        }
        let sweep = 2.0 * PI * (*value as f64) / (total as f64);
        let (x1, y1) = (CX + R * angle.cos(), CY + R * angle.sin());
        angle += sweep;
        let (x2, y2) = (CX + R * angle.cos(), CY + R * angle.sin());
        let large = u8::from(sweep > PI);
        svg.slices.push(PieSlice {
            color,
            full: false,
            path: format!("M {CX} {CY} L {x1:.2} {y1:.2} A {R} {R} 0 {large} 1 {x2:.2} {y2:.2} Z"),
        });
    }

    svg.legend = spec
        .labels
        .iter()
        .zip(&spec.values)
        .enumerate()
        .map(|(idx, (label, value))| LegendEntry {
            y: 30 + idx * 22,
            swatch_y: 20 + idx * 22,
            color: color_at(spec, idx),
            label,
            value: *value,
        })
        .collect();
    svg
}

struct Tick {
    y: String,
    text_y: String,
    value: u64,
}

struct Point<'a> {
    x: String,
    y: String,
    /// Empty when the x-axis label is thinned out.
    label: &'a str,
}

#[derive(Template)]
#[template(path = "charts/line.html")]
struct LineSvg<'a> {
    left: f64,
    right: f64,
    tick_x: f64,
    label_y: f64,
    ticks: Vec<Tick>,
    area: String,
    line: String,
    stroke: &'a str,
    fill: &'a str,
    points: Vec<Point<'a>>,
}

fn line_svg(spec: &ChartSpec) -> LineSvg<'_> {
    const WIDTH: f64 = 600.0;
    const HEIGHT: f64 = 260.0;
    const PADDING_X: f64 = 44.0;
    const PADDING_Y: f64 = 34.0;
    const TOP: f64 = 24.0;
    const TICKS: u64 = 4;

    let mut svg = LineSvg {
        left: PADDING_X,
        right: WIDTH - PADDING_X,
        tick_x: PADDING_X - 10.0,
        label_y: HEIGHT - PADDING_Y + 18.0,
        ticks: Vec::new(),
        area: String::new(),
        line: String::new(),
        stroke: spec.colors.first().map_or(DAILY_LINE_COLOR, String::as_str),
        fill: spec.colors.get(1).map_or("none", String::as_str),
        points: Vec::new(),
    };
    if spec.values.is_empty() {
        return svg;
    }

    let max = spec.values.iter().copied().max().unwrap_or(0);
    let step = max.div_ceil(TICKS).max(1);
    let axis_max = step.saturating_mul(TICKS) as f64;
    let x_step = if spec.values.len() > 1 {
        (WIDTH - PADDING_X * 2.0) / (spec.values.len() - 1) as f64
    } else {
        0.0
    };
    let scale_y = (HEIGHT - TOP - PADDING_Y) / axis_max;
    let x = |idx: usize| PADDING_X + idx as f64 * x_step;
    let y = |value: u64| HEIGHT - PADDING_Y - value as f64 * scale_y;

    svg.ticks = (0..=TICKS)
        .map(|tick| {
            let value = step.saturating_mul(tick);
            Tick {
                y: format!("{:.2}", y(value)),
                text_y: format!("{:.2}", y(value) + 4.0),
                value,
            }
        })
        .collect();

    let line: Vec<String> = spec
        .values
        .iter()
        .enumerate()
        .map(|(idx, value)| {
            let op = if idx == 0 { 'M' } else { 'L' };
            format!("{op} {:.2} {:.2}", x(idx), y(*value))
        })
        .collect();
    svg.line = line.join(" ");
    let baseline = y(0);
    let last = spec.values.len() - 1;
    svg.area = format!(
        "{} L {:.2} {baseline:.2} L {:.2} {baseline:.2} Z",
        svg.line,
        x(last),
        x(0)
    );

    let label_every = if spec.values.len() > 8 { 2 } else { 1 };
    svg.points = spec
        .values
        .iter()
        .enumerate()
        .map(|(idx, value)| {
            let label = match spec.labels.get(idx) {
                Some(label) if idx % label_every == 0 => {
                    label.get(5..).filter(|s| !s.is_empty()).unwrap_or(label)
                }
                _ => "",
            };
            Point {
                x: format!("{:.2}", x(idx)),
                y: format!("{:.2}", y(*value)),
                label,
            }
        })
        .collect();
    svg
}
