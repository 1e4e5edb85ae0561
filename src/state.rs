use std::path::PathBuf;

use eframe::egui::Color32;

use crate::data::assignment::{default_label, AssignmentError, AxisSide, SeriesAssignment};
use crate::data::loader::{load_files, LoaderOptions};
use crate::data::model::Table;
use crate::data::request::{PlotInput, PlotRequest};

// ---------------------------------------------------------------------------
// User-visible messages
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// A message shown in a dialog until the user dismisses it.
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub title: String,
    pub message: String,
    pub severity: Severity,
}

impl Notice {
    pub fn new(severity: Severity, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            severity,
        }
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
#[derive(Default)]
pub struct AppState {
    /// Loaded tables in the order they were opened.
    pub tables: Vec<Table>,

    /// Table highlighted in the data list.
    pub selected_table: Option<usize>,

    /// Column highlighted in the column list.
    pub selected_column: Option<String>,

    /// Column → axis roles.
    pub assignment: SeriesAssignment,

    /// Custom label for the next series.
    pub series_label: String,

    /// Selected entry (global series index) in the left / right series lists.
    pub selected_left: Option<usize>,
    pub selected_right: Option<usize>,

    /// Plot options as typed.
    pub plot_input: PlotInput,

    /// Last resolved plot.
    pub plot: Option<PlotRequest>,

    /// Set when a new plot was resolved and the view should jump to its bounds.
    pub reset_view: bool,

    /// Whether the data preview is shown.
    pub show_preview: bool,

    /// Pending dialog.
    pub notice: Option<Notice>,

    pub loader_options: LoaderOptions,
}

impl AppState {
    /// Load files, keep every good table and report every bad one.
    pub fn load_paths(&mut self, paths: &[PathBuf]) {
        if paths.is_empty() {
            return;
        }
        let report = load_files(paths, &self.loader_options);

        if !report.failures.is_empty() {
            let message = report
                .failures
                .into_iter()
                .map(|e| {
                    let e = anyhow::Error::from(e);
                    log::error!("Failed to load file: {e:#}");
                    format!("{e:#}")
                })
                .collect::<Vec<_>>()
                .join("\n");
            self.notice = Some(Notice::new(Severity::Error, "Failed to load data", message));
        }

        if report.tables.is_empty() {
            return;
        }

        let start = self.tables.len();
        for table in &report.tables {
            log::info!(
                "Loaded '{}' with columns {:?} ({} rows)",
                table.name,
                table.column_names(),
                table.n_rows()
            );
        }
        self.tables.extend(report.tables);
        self.select_table(start);
    }

    /// Highlight a table and offer its columns.
    pub fn select_table(&mut self, index: usize) {
        let Some(table) = self.tables.get(index) else {
            return;
        };
        let keep_x = self
            .assignment
            .x_column()
            .is_some_and(|x| table.contains(x));
        let first = table.column_names().first().map(|s| s.to_string());

        self.selected_table = Some(index);
        self.selected_column = None;
        if !keep_x {
            self.assignment.set_x_column(first.unwrap_or_default());
        }
    }

    pub fn selected_table(&self) -> Option<&Table> {
        self.selected_table.and_then(|i| self.tables.get(i))
    }

    /// Highlight a column and prefill the label entry.
    pub fn select_column(&mut self, column: &str) {
        if let Some(table) = self.selected_table() {
            self.series_label = default_label(table, column);
        }
        self.selected_column = Some(column.to_string());
    }

    /// Drop the highlighted table and every series that used it.
    pub fn close_selected_table(&mut self) {
        let Some(index) = self.selected_table.filter(|&i| i < self.tables.len()) else {
            return;
        };
        let table = self.tables.remove(index);
        log::info!("Closed '{}'", table.name);

        self.assignment.remove_table(index);
        self.plot = None;
        self.selected_left = None;
        self.selected_right = None;
        self.selected_column = None;
        self.selected_table = None;
        if !self.tables.is_empty() {
            self.select_table(index.min(self.tables.len() - 1));
        }
    }

    /// Assign the highlighted column to one Y axis.
    pub fn add_series(&mut self, side: AxisSide) {
        let result = self.assignment.add_series(
            &self.tables,
            self.selected_table,
            self.selected_column.as_deref(),
            side,
            &self.series_label,
        );
        match result {
            Ok(()) => self.series_label.clear(),
            Err(e) => {
                let severity = match e {
                    AssignmentError::MissingColumn { .. } => Severity::Error,
                    _ => Severity::Info,
                };
                self.notice = Some(Notice::new(severity, e.title(), e.to_string()));
            }
        }
    }

    pub fn selected_series(&self, side: AxisSide) -> Option<usize> {
        match side {
            AxisSide::Left => self.selected_left,
            AxisSide::Right => self.selected_right,
        }
    }

    pub fn select_series(&mut self, side: AxisSide, index: usize) {
        match side {
            AxisSide::Left => self.selected_left = Some(index),
            AxisSide::Right => self.selected_right = Some(index),
        }
    }

    /// Remove the highlighted series of one side.
    pub fn remove_selected_series(&mut self, side: AxisSide) {
        let Some(index) = self.selected_series(side) else {
            return;
        };
        if let Some(removed) = self.assignment.remove_series(index) {
            log::info!("Removed series '{}'", removed.label);
        }
        self.selected_left = None;
        self.selected_right = None;
    }

    pub fn set_series_color(&mut self, index: usize, color: Color32) {
        self.assignment.set_color(index, color);
    }

    /// Resolve the assignment into a plot, or explain why not.
    pub fn plot(&mut self) {
        let resolved = self.plot_input.parse().and_then(|options| {
            PlotRequest::resolve(&self.tables, &self.assignment, &options)
        });

        match resolved {
            Ok(request) => {
                if !request.warnings.is_empty() {
                    self.notice = Some(Notice::new(
                        Severity::Warning,
                        "Plot warnings",
                        request.warnings.join("\n"),
                    ));
                }
                self.plot = Some(request);
                self.reset_view = true;
            }
            Err(e) => {
                log::warn!("Plot rejected: {e}");
                self.notice = Some(Notice::new(Severity::Info, e.title(), e.to_string()));
            }
        }
    }

    pub fn clear_plot(&mut self) {
        self.plot = None;
    }

    /// Forget the configuration: X column, every series and the plot.
    pub fn reset(&mut self) {
        self.assignment.reset();
        self.selected_left = None;
        self.selected_right = None;
        self.series_label.clear();
        self.plot = None;
        if let Some(index) = self.selected_table {
            self.select_table(index);
        }
    }
}
