use eframe::egui::Color32;
use thiserror::Error;

use super::assignment::{AxisSide, SeriesAssignment};
use super::model::Table;

/// Fraction of the data span added on each side of an axis without limits.
const AUTO_MARGIN: f64 = 0.05;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, PartialEq)]
pub enum PlotError {
    #[error("Add at least one series to plot.")]
    NothingToPlot,

    #[error("Choose a column for the X axis.")]
    NoXColumn,

    #[error("Enter a numeric value for {field}.")]
    InvalidNumber { field: String },
}

impl PlotError {
    pub fn title(&self) -> &'static str {
        match self {
            PlotError::NothingToPlot => "No series",
            PlotError::NoXColumn => "Select X column",
            PlotError::InvalidNumber { .. } => "Invalid value",
        }
    }
}

// ---------------------------------------------------------------------------
// Axis options: raw text from the panel → validated numbers
// ---------------------------------------------------------------------------

/// Text entries of one axis as the user typed them.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisInput {
    pub min: String,
    pub max: String,
    pub scale: String,
    pub log: bool,
}

impl Default for AxisInput {
    fn default() -> Self {
        Self {
            min: String::new(),
            max: String::new(),
            scale: "1".to_string(),
            log: false,
        }
    }
}

fn parse_optional(text: &str, field: String) -> Result<Option<f64>, PlotError> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }
    text.parse::<f64>()
        .map(Some)
        .map_err(|_| PlotError::InvalidNumber { field })
}

impl AxisInput {
    /// Validate the entries. `name` prefixes field names in error messages.
    pub fn parse(&self, name: &str) -> Result<AxisOptions, PlotError> {
        Ok(AxisOptions {
            scale: parse_optional(&self.scale, format!("{name} scale"))?.unwrap_or(1.0),
            min: parse_optional(&self.min, format!("{name} minimum"))?,
            max: parse_optional(&self.max, format!("{name} maximum"))?,
            log: self.log,
        })
    }
}

/// Validated options of one axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisOptions {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub scale: f64,
    pub log: bool,
}

impl Default for AxisOptions {
    fn default() -> Self {
        Self {
            min: None,
            max: None,
            scale: 1.0,
            log: false,
        }
    }
}

impl AxisOptions {
    /// Data value → plot coordinate. `None` when log scaling rejects it.
    pub fn apply(&self, value: f64) -> Option<f64> {
        self.to_axis(value * self.scale)
    }

    /// Scaled value (or limit) → plot coordinate.
    fn to_axis(&self, value: f64) -> Option<f64> {
        if !self.log {
            Some(value)
        } else if value > 0.0 {
            Some(value.log10())
        } else {
            None
        }
    }

    /// Plot coordinate → value shown on tick labels.
    pub fn from_axis(&self, coord: f64) -> f64 {
        if self.log {
            10f64.powf(coord)
        } else {
            coord
        }
    }

    fn limits(&self) -> (Option<f64>, Option<f64>) {
        (
            self.min.and_then(|v| self.to_axis(v)),
            self.max.and_then(|v| self.to_axis(v)),
        )
    }
}

/// Everything from the "Plot Options" section, as typed.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotInput {
    pub x_label: String,
    pub left_label: String,
    pub right_label: String,
    pub show_legend: bool,
    pub x: AxisInput,
    pub left: AxisInput,
    pub right: AxisInput,
}

impl Default for PlotInput {
    fn default() -> Self {
        Self {
            x_label: "X Axis".to_string(),
            left_label: "Left Axis".to_string(),
            right_label: "Right Axis".to_string(),
            show_legend: true,
            x: AxisInput::default(),
            left: AxisInput::default(),
            right: AxisInput::default(),
        }
    }
}

impl PlotInput {
    pub fn parse(&self) -> Result<PlotOptions, PlotError> {
        Ok(PlotOptions {
            x_label: self.x_label.trim().to_string(),
            left_label: self.left_label.trim().to_string(),
            right_label: self.right_label.trim().to_string(),
            show_legend: self.show_legend,
            x: self.x.parse("X axis")?,
            left: self.left.parse("Left axis")?,
            right: self.right.parse("Right axis")?,
        })
    }
}

/// Validated plot options.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotOptions {
    pub x_label: String,
    pub left_label: String,
    pub right_label: String,
    pub show_legend: bool,
    pub x: AxisOptions,
    pub left: AxisOptions,
    pub right: AxisOptions,
}

impl Default for PlotOptions {
    fn default() -> Self {
        Self {
            x_label: String::new(),
            left_label: String::new(),
            right_label: String::new(),
            show_legend: true,
            x: AxisOptions::default(),
            left: AxisOptions::default(),
            right: AxisOptions::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Right axis mapping
// ---------------------------------------------------------------------------

/// Linear map from the right axis range onto the left axis range.
///
/// Both Y axes share one plot coordinate system; right-axis series are
/// drawn through `forward` and their tick labels read back through `inverse`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisMap {
    pub from: (f64, f64),
    pub to: (f64, f64),
}

impl AxisMap {
    pub fn identity(range: (f64, f64)) -> Self {
        Self {
            from: range,
            to: range,
        }
    }

    pub fn forward(&self, v: f64) -> f64 {
        self.to.0 + (v - self.from.0) * (self.to.1 - self.to.0) / (self.from.1 - self.from.0)
    }

    pub fn inverse(&self, v: f64) -> f64 {
        self.from.0 + (v - self.to.0) * (self.from.1 - self.from.0) / (self.to.1 - self.to.0)
    }
}

// ---------------------------------------------------------------------------
// PlotRequest
// ---------------------------------------------------------------------------

/// One line ready for drawing, in plot coordinates of its own axis.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedSeries {
    pub label: String,
    pub side: AxisSide,
    pub color: Color32,
    pub points: Vec<[f64; 2]>,
}

/// Fully resolved input of the renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotRequest {
    pub series: Vec<ResolvedSeries>,
    pub x_label: String,
    pub left_label: String,
    /// Present only when some series uses the right axis.
    pub right_label: Option<String>,
    pub show_legend: bool,
    pub x_axis: AxisOptions,
    pub left_axis: AxisOptions,
    pub right_axis: AxisOptions,
    pub right_map: Option<AxisMap>,
    x_range: Option<(f64, f64)>,
    y_range: Option<(f64, f64)>,
    /// Non-fatal problems met while resolving (skipped series, dropped points).
    pub warnings: Vec<String>,
}

impl PlotRequest {
    /// Combine loaded tables, the user's assignment and the plot options.
    pub fn resolve(
        tables: &[Table],
        assignment: &SeriesAssignment,
        options: &PlotOptions,
    ) -> Result<Self, PlotError> {
        if assignment.series().is_empty() {
            return Err(PlotError::NothingToPlot);
        }
        let x_column = assignment.x_column().ok_or(PlotError::NoXColumn)?;

        let mut series = Vec::new();
        let mut warnings = Vec::new();

        for spec in assignment.series() {
            let Some(table) = tables.get(spec.table_index) else {
                warnings.push(format!("Series '{}' refers to a closed dataset.", spec.label));
                continue;
            };
            let Some(ys) = table.column(&spec.column) else {
                warnings.push(format!(
                    "Column '{}' no longer exists in dataset '{}'.",
                    spec.column, table.name
                ));
                continue;
            };
            let Some(xs) = table.column(x_column) else {
                warnings.push(format!(
                    "Column '{x_column}' not found in dataset '{}'.",
                    table.name
                ));
                continue;
            };

            let y_axis = match spec.side {
                AxisSide::Left => &options.left,
                AxisSide::Right => &options.right,
            };

            let mut dropped = 0usize;
            let points: Vec<[f64; 2]> = xs
                .iter()
                .zip(ys)
                .filter_map(|(&x, &y)| match (options.x.apply(x), y_axis.apply(y)) {
                    (Some(x), Some(y)) => Some([x, y]),
                    _ => {
                        dropped += 1;
                        None
                    }
                })
                .collect();

            if dropped > 0 {
                warnings.push(format!(
                    "Dropped {dropped} non-positive point(s) from '{}' on a log axis.",
                    spec.label
                ));
            }

            series.push(ResolvedSeries {
                label: spec.label.clone(),
                side: spec.side,
                color: spec.color,
                points,
            });
        }

        for w in &warnings {
            log::warn!("{w}");
        }

        let values = |side: Option<AxisSide>, idx: usize| -> Vec<f64> {
            series
                .iter()
                .filter(|s| side.map_or(true, |side| s.side == side))
                .flat_map(|s| s.points.iter().map(move |p| p[idx]))
                .collect()
        };

        let x_range = axis_range(&values(None, 0), options.x.limits());
        let left_range = axis_range(&values(Some(AxisSide::Left), 1), options.left.limits());
        let has_left = series.iter().any(|s| s.side == AxisSide::Left);
        let has_right = series.iter().any(|s| s.side == AxisSide::Right);

        let right_map = if has_right {
            axis_range(&values(Some(AxisSide::Right), 1), options.right.limits()).map(|from| {
                match left_range.filter(|_| has_left) {
                    Some(to) => AxisMap { from, to },
                    None => AxisMap::identity(from),
                }
            })
        } else {
            None
        };

        let y_range = if has_left {
            left_range
        } else {
            right_map.map(|m| m.to)
        };

        let or_default = |label: &str, fallback: &str| {
            if label.is_empty() {
                fallback.to_string()
            } else {
                label.to_string()
            }
        };

        log::info!(
            "Resolved {} series against X column '{x_column}'",
            series.len()
        );

        Ok(Self {
            x_label: or_default(&options.x_label, x_column),
            left_label: or_default(&options.left_label, "Left Axis"),
            right_label: has_right.then(|| or_default(&options.right_label, "Right Axis")),
            show_legend: options.show_legend && !series.is_empty(),
            x_axis: options.x,
            left_axis: options.left,
            right_axis: options.right,
            right_map,
            x_range,
            y_range,
            series,
            warnings,
        })
    }

    /// Points of `series` in the shared plot coordinate system.
    pub fn display_points(&self, series: &ResolvedSeries) -> Vec<[f64; 2]> {
        match (series.side, self.right_map) {
            (AxisSide::Right, Some(map)) => series
                .points
                .iter()
                .map(|&[x, y]| [x, map.forward(y)])
                .collect(),
            _ => series.points.clone(),
        }
    }

    /// Initial view: `(min, max)` corners, or `None` when there is nothing to show.
    pub fn bounds(&self) -> Option<([f64; 2], [f64; 2])> {
        let (x0, x1) = self.x_range?;
        let (y0, y1) = self.y_range?;
        Some(([x0, y0], [x1, y1]))
    }

    pub fn x_tick(&self, coord: f64) -> String {
        format_tick(self.x_axis.from_axis(coord))
    }

    pub fn left_tick(&self, coord: f64) -> String {
        format_tick(self.left_axis.from_axis(coord))
    }

    pub fn right_tick(&self, coord: f64) -> String {
        let coord = self.right_map.map_or(coord, |m| m.inverse(coord));
        format_tick(self.right_axis.from_axis(coord))
    }
}

// -- helpers --

/// Axis extent: explicit limits win, otherwise the data extent plus a margin.
///
/// A lone limit beyond the data keeps its role; the open end is placed one
/// data span (at least 1) away from it.
fn axis_range(values: &[f64], (min, max): (Option<f64>, Option<f64>)) -> Option<(f64, f64)> {
    let finite = values.iter().copied().filter(|v| v.is_finite());
    let extent = finite.fold(None, |acc: Option<(f64, f64)>, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    });

    let (lo, hi) = match (min, max, extent) {
        (Some(lo), Some(hi), _) => (lo, hi),
        (min, max, Some((lo, hi))) => {
            let span = hi - lo;
            let margin = if span > 0.0 { span * AUTO_MARGIN } else { 0.5 };
            let width = span.max(1.0);
            match (min, max) {
                (Some(min), None) if min >= hi + margin => (min, min + width),
                (None, Some(max)) if max <= lo - margin => (max - width, max),
                (min, max) => (min.unwrap_or(lo - margin), max.unwrap_or(hi + margin)),
            }
        }
        _ => return None,
    };

    Some(if lo < hi {
        (lo, hi)
    } else if lo > hi {
        (hi, lo)
    } else {
        (lo - 0.5, hi + 0.5)
    })
}

fn format_tick(v: f64) -> String {
    let a = v.abs();
    if a != 0.0 && !(1e-3..1e5).contains(&a) {
        return format!("{v:.2e}");
    }
    let s = format!("{v:.4}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" {
        "0".to_string()
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::parse_table;

    fn assigned(tables: &[Table], x: &str, ys: &[(usize, &str, AxisSide)]) -> SeriesAssignment {
        let mut asg = SeriesAssignment::default();
        asg.set_x_column(x);
        for &(t, col, side) in ys {
            asg.add_series(tables, Some(t), Some(col), side, "").unwrap();
        }
        asg
    }

    #[test]
    fn two_point_example() {
        let tables = vec![parse_table("demo", "x y\n1 2\n3 4\n").unwrap()];
        let asg = assigned(&tables, "x", &[(0, "y", AxisSide::Left)]);

        let req = PlotRequest::resolve(&tables, &asg, &PlotOptions::default()).unwrap();

        assert_eq!(req.series.len(), 1);
        assert_eq!(req.series[0].points, vec![[1.0, 2.0], [3.0, 4.0]]);
        assert_eq!(req.series[0].label, "demo: y");
        assert_eq!(req.x_label, "x");
        assert_eq!(req.left_label, "Left Axis");
        assert_eq!(req.right_label, None);
        assert!(req.warnings.is_empty());
    }

    #[test]
    fn x_against_itself_is_the_identity_line() {
        let tables = vec![parse_table("demo", "x y\n1 2\n3 4\n").unwrap()];
        let asg = assigned(&tables, "x", &[(0, "x", AxisSide::Left)]);

        let req = PlotRequest::resolve(&tables, &asg, &PlotOptions::default()).unwrap();

        assert_eq!(req.series[0].points, vec![[1.0, 1.0], [3.0, 3.0]]);
    }

    #[test]
    fn incomplete_assignment_is_rejected() {
        let tables = vec![parse_table("demo", "x y\n1 2\n").unwrap()];
        let mut asg = SeriesAssignment::default();
        assert_eq!(
            PlotRequest::resolve(&tables, &asg, &PlotOptions::default()),
            Err(PlotError::NothingToPlot)
        );

        asg.set_x_column("x");
        asg.add_series(&tables, Some(0), Some("y"), AxisSide::Left, "")
            .unwrap();
        asg.set_x_column("");
        assert_eq!(
            PlotRequest::resolve(&tables, &asg, &PlotOptions::default()),
            Err(PlotError::NoXColumn)
        );
    }

    #[test]
    fn series_without_x_column_is_skipped_with_warning() {
        let tables = vec![
            parse_table("a", "t u\n0 1\n1 2\n").unwrap(),
            parse_table("b", "s v\n0 3\n1 4\n").unwrap(),
        ];
        let mut asg = assigned(&tables, "t", &[(0, "u", AxisSide::Left)]);
        asg.set_x_column("s");
        asg.add_series(&tables, Some(1), Some("v"), AxisSide::Left, "")
            .unwrap();
        asg.set_x_column("t");

        let req = PlotRequest::resolve(&tables, &asg, &PlotOptions::default()).unwrap();

        assert_eq!(req.series.len(), 1);
        assert_eq!(req.series[0].label, "a: u");
        assert_eq!(req.warnings, vec!["Column 't' not found in dataset 'b'."]);
    }

    #[test]
    fn scale_factors_apply_per_axis() {
        let tables = vec![parse_table("d", "x l r\n1 2 3\n").unwrap()];
        let asg = assigned(
            &tables,
            "x",
            &[(0, "l", AxisSide::Left), (0, "r", AxisSide::Right)],
        );
        let mut options = PlotOptions::default();
        options.x.scale = 2.0;
        options.left.scale = 10.0;
        options.right.scale = -1.0;

        let req = PlotRequest::resolve(&tables, &asg, &options).unwrap();

        assert_eq!(req.series[0].points, vec![[2.0, 20.0]]);
        assert_eq!(req.series[1].points, vec![[2.0, -3.0]]);
        assert_eq!(req.right_label.as_deref(), Some("Right Axis"));
    }

    #[test]
    fn log_axis_drops_non_positive_points() {
        let tables = vec![parse_table("d", "x y\n1 100\n2 0\n3 -5\n4 1000\n").unwrap()];
        let asg = assigned(&tables, "x", &[(0, "y", AxisSide::Left)]);
        let mut options = PlotOptions::default();
        options.left.log = true;

        let req = PlotRequest::resolve(&tables, &asg, &options).unwrap();

        let pts = &req.series[0].points;
        assert_eq!(pts.len(), 2);
        assert_eq!((pts[0][0], pts[1][0]), (1.0, 4.0));
        assert!((pts[0][1] - 2.0).abs() < 1e-12);
        assert!((pts[1][1] - 3.0).abs() < 1e-12);
        assert_eq!(req.warnings.len(), 1);
        assert_eq!(req.left_tick(2.0), "100");
    }

    #[test]
    fn right_axis_is_mapped_onto_left_range() {
        let tables = vec![parse_table("d", "x l r\n0 0 0\n1 10 100\n").unwrap()];
        let asg = assigned(
            &tables,
            "x",
            &[(0, "l", AxisSide::Left), (0, "r", AxisSide::Right)],
        );
        let mut options = PlotOptions::default();
        options.left.min = Some(0.0);
        options.left.max = Some(10.0);
        options.right.min = Some(0.0);
        options.right.max = Some(100.0);

        let req = PlotRequest::resolve(&tables, &asg, &options).unwrap();
        let map = req.right_map.unwrap();

        assert_eq!(map.from, (0.0, 100.0));
        assert_eq!(map.to, (0.0, 10.0));
        assert_eq!(req.display_points(&req.series[1]), vec![[0.0, 0.0], [1.0, 10.0]]);
        assert_eq!(req.right_tick(5.0), "50");
        assert!((map.inverse(map.forward(37.0)) - 37.0).abs() < 1e-9);
    }

    #[test]
    fn right_only_plot_uses_its_own_range() {
        let tables = vec![parse_table("d", "x r\n0 5\n1 7\n").unwrap()];
        let asg = assigned(&tables, "x", &[(0, "r", AxisSide::Right)]);
        let req = PlotRequest::resolve(&tables, &asg, &PlotOptions::default()).unwrap();

        let map = req.right_map.unwrap();
        assert_eq!(map.from, map.to);
        assert_eq!(req.display_points(&req.series[0]), req.series[0].points);
    }

    #[test]
    fn bounds_use_limits_and_margins() {
        let tables = vec![parse_table("d", "x y\n0 0\n10 20\n").unwrap()];
        let asg = assigned(&tables, "x", &[(0, "y", AxisSide::Left)]);
        let mut options = PlotOptions::default();
        options.x.min = Some(-5.0);

        let req = PlotRequest::resolve(&tables, &asg, &options).unwrap();
        let (min, max) = req.bounds().unwrap();

        assert_eq!(min[0], -5.0);
        assert!((max[0] - 10.5).abs() < 1e-9);
        assert!((min[1] + 1.0).abs() < 1e-9);
        assert!((max[1] - 21.0).abs() < 1e-9);
    }

    #[test]
    fn lone_limit_beyond_the_data_keeps_its_role() {
        let tables = vec![parse_table("d", "x y\n0 0\n10 20\n").unwrap()];
        let asg = assigned(&tables, "x", &[(0, "y", AxisSide::Left)]);

        let mut options = PlotOptions::default();
        options.left.min = Some(100.0);
        let req = PlotRequest::resolve(&tables, &asg, &options).unwrap();
        let (min, max) = req.bounds().unwrap();
        assert_eq!(min[1], 100.0);
        assert_eq!(max[1], 120.0);

        let mut options = PlotOptions::default();
        options.x.max = Some(-50.0);
        let req = PlotRequest::resolve(&tables, &asg, &options).unwrap();
        let (min, max) = req.bounds().unwrap();
        assert_eq!(max[0], -50.0);
        assert_eq!(min[0], -60.0);
    }

    #[test]
    fn reversed_explicit_limits_are_swapped() {
        let tables = vec![parse_table("d", "x y\n0 0\n10 20\n").unwrap()];
        let asg = assigned(&tables, "x", &[(0, "y", AxisSide::Left)]);
        let mut options = PlotOptions::default();
        options.left.min = Some(5.0);
        options.left.max = Some(-5.0);

        let req = PlotRequest::resolve(&tables, &asg, &options).unwrap();
        let (min, max) = req.bounds().unwrap();

        assert_eq!((min[1], max[1]), (-5.0, 5.0));
    }

    #[test]
    fn bounds_ignore_non_finite_points() {
        let tables = vec![parse_table("d", "x y\n0 1\n1 nan\n2 inf\n3 3\n").unwrap()];
        let asg = assigned(&tables, "x", &[(0, "y", AxisSide::Left)]);

        let req = PlotRequest::resolve(&tables, &asg, &PlotOptions::default()).unwrap();
        let (min, max) = req.bounds().unwrap();

        assert!(min.iter().chain(max.iter()).all(|v| v.is_finite()));
        assert!((min[0] + 0.15).abs() < 1e-9);
        assert!((max[0] - 3.15).abs() < 1e-9);
        assert!((min[1] - 0.9).abs() < 1e-9);
        assert!((max[1] - 3.1).abs() < 1e-9);
    }

    #[test]
    fn x_label_entry_falls_back_to_column_name_when_blank() {
        let tables = vec![parse_table("demo", "time y\n1 2\n").unwrap()];
        let asg = assigned(&tables, "time", &[(0, "y", AxisSide::Left)]);

        let typed = PlotInput::default().parse().unwrap();
        let req = PlotRequest::resolve(&tables, &asg, &typed).unwrap();
        assert_eq!(req.x_label, "X Axis");

        let blank = PlotInput {
            x_label: "   ".into(),
            ..PlotInput::default()
        };
        let req = PlotRequest::resolve(&tables, &asg, &blank.parse().unwrap()).unwrap();
        assert_eq!(req.x_label, "time");
    }

    #[test]
    fn axis_input_validation() {
        let input = AxisInput {
            min: " 1.5 ".into(),
            max: String::new(),
            scale: String::new(),
            log: true,
        };
        assert_eq!(
            input.parse("X axis"),
            Ok(AxisOptions {
                min: Some(1.5),
                max: None,
                scale: 1.0,
                log: true
            })
        );

        let bad = AxisInput {
            max: "ten".into(),
            ..AxisInput::default()
        };
        assert_eq!(
            bad.parse("Left axis"),
            Err(PlotError::InvalidNumber {
                field: "Left axis maximum".into()
            })
        );
    }

    #[test]
    fn tick_formatting() {
        assert_eq!(format_tick(0.0), "0");
        assert_eq!(format_tick(2.5), "2.5");
        assert_eq!(format_tick(-3.0), "-3");
        assert_eq!(format_tick(123456.0), "1.23e5");
    }
}
