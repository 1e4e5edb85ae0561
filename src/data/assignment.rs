use eframe::egui::Color32;
use thiserror::Error;

use super::model::Table;
use crate::color::ColorCycle;

// ---------------------------------------------------------------------------
// Axis side
// ---------------------------------------------------------------------------

/// Which Y axis a series is drawn against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisSide {
    Left,
    Right,
}

impl AxisSide {
    pub fn label(self) -> &'static str {
        match self {
            AxisSide::Left => "Left",
            AxisSide::Right => "Right",
        }
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Reasons a series cannot be added. Each maps to a short dialog.
#[derive(Debug, Error, PartialEq)]
pub enum AssignmentError {
    #[error("Choose a dataset before adding a series.")]
    NoTable,

    #[error("Choose a column before adding a series.")]
    NoColumn,

    #[error("Choose a column to use for the X axis.")]
    NoXColumn,

    #[error("Dataset '{table}' does not contain column '{column}'.")]
    MissingColumn { table: String, column: String },
}

impl AssignmentError {
    /// Dialog title for this error.
    pub fn title(&self) -> &'static str {
        match self {
            AssignmentError::NoTable => "Select dataset",
            AssignmentError::NoColumn => "Select column",
            AssignmentError::NoXColumn => "Select X column",
            AssignmentError::MissingColumn { .. } => "Column unavailable",
        }
    }
}

// ---------------------------------------------------------------------------
// SeriesAssignment
// ---------------------------------------------------------------------------

/// One Y series: a column of a loaded table drawn against one Y axis.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesSpec {
    pub table_index: usize,
    pub column: String,
    pub side: AxisSide,
    pub label: String,
    pub color: Color32,
}

/// The user's mapping of columns to plot roles.
///
/// A single X column is shared by every series, so each plotted series has
/// exactly one X assignment.
#[derive(Debug, Clone, Default)]
pub struct SeriesAssignment {
    x_column: Option<String>,
    series: Vec<SeriesSpec>,
    colors: ColorCycle,
}

/// Default series label: `"<table>: <column>"`.
pub fn default_label(table: &Table, column: &str) -> String {
    format!("{}: {column}", table.name)
}

impl SeriesAssignment {
    pub fn x_column(&self) -> Option<&str> {
        self.x_column.as_deref()
    }

    /// Choose the X column; an empty name clears it.
    pub fn set_x_column(&mut self, name: impl Into<String>) {
        let name = name.into();
        self.x_column = if name.is_empty() { None } else { Some(name) };
    }

    pub fn series(&self) -> &[SeriesSpec] {
        &self.series
    }

    /// Series on one side, each paired with its index in [`Self::series`].
    pub fn series_on(&self, side: AxisSide) -> Vec<(usize, &SeriesSpec)> {
        self.series
            .iter()
            .enumerate()
            .filter(|(_, s)| s.side == side)
            .collect()
    }

    /// Assign `column` of `tables[table_index]` to a Y axis.
    ///
    /// The X column must already be chosen and present in the same table.
    /// Using the X column itself as Y is allowed and plots `y = x`.
    pub fn add_series(
        &mut self,
        tables: &[Table],
        table_index: Option<usize>,
        column: Option<&str>,
        side: AxisSide,
        label: &str,
    ) -> Result<(), AssignmentError> {
        let table = table_index
            .and_then(|i| tables.get(i))
            .ok_or(AssignmentError::NoTable)?;
        let table_index = table_index.ok_or(AssignmentError::NoTable)?;
        let column = column
            .filter(|c| !c.is_empty())
            .ok_or(AssignmentError::NoColumn)?;
        let x_column = self.x_column.as_deref().ok_or(AssignmentError::NoXColumn)?;

        for required in [x_column, column] {
            if !table.contains(required) {
                return Err(AssignmentError::MissingColumn {
                    table: table.name.clone(),
                    column: required.to_string(),
                });
            }
        }

        let label = match label.trim() {
            "" => default_label(table, column),
            custom => custom.to_string(),
        };

        log::info!(
            "Assigned {}/{column} to the {} axis as '{label}'",
            table.name,
            side.label().to_lowercase()
        );

        self.series.push(SeriesSpec {
            table_index,
            column: column.to_string(),
            side,
            label,
            color: self.colors.next_color(),
        });
        Ok(())
    }

    pub fn remove_series(&mut self, index: usize) -> Option<SeriesSpec> {
        (index < self.series.len()).then(|| self.series.remove(index))
    }

    pub fn set_color(&mut self, index: usize, color: Color32) {
        if let Some(s) = self.series.get_mut(index) {
            s.color = color;
        }
    }

    /// Forget every series of a closed table and shift later table indices.
    pub fn remove_table(&mut self, table_index: usize) {
        self.series.retain(|s| s.table_index != table_index);
        for s in &mut self.series {
            if s.table_index > table_index {
                s.table_index -= 1;
            }
        }
    }

    /// Both an X column and at least one Y series are assigned.
    pub fn can_plot(&self) -> bool {
        self.x_column.is_some() && !self.series.is_empty()
    }

    pub fn reset(&mut self) {
        self.x_column = None;
        self.series.clear();
        self.colors.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::parse_table;

    fn tables() -> Vec<Table> {
        vec![
            parse_table("run1", "t a b\n0 1 2\n1 3 4\n").unwrap(),
            parse_table("run2", "t c\n0 5\n1 6\n").unwrap(),
        ]
    }

    #[test]
    fn plot_needs_x_and_y() {
        let tables = tables();
        let mut asg = SeriesAssignment::default();
        assert!(!asg.can_plot());

        asg.set_x_column("t");
        assert!(!asg.can_plot());

        asg.add_series(&tables, Some(0), Some("a"), AxisSide::Left, "")
            .unwrap();
        assert!(asg.can_plot());
    }

    #[test]
    fn add_series_validates_selection() {
        let tables = tables();
        let mut asg = SeriesAssignment::default();

        assert_eq!(
            asg.add_series(&tables, None, Some("a"), AxisSide::Left, ""),
            Err(AssignmentError::NoTable)
        );
        assert_eq!(
            asg.add_series(&tables, Some(7), Some("a"), AxisSide::Left, ""),
            Err(AssignmentError::NoTable)
        );
        assert_eq!(
            asg.add_series(&tables, Some(0), None, AxisSide::Left, ""),
            Err(AssignmentError::NoColumn)
        );
        assert_eq!(
            asg.add_series(&tables, Some(0), Some("a"), AxisSide::Left, ""),
            Err(AssignmentError::NoXColumn)
        );

        asg.set_x_column("a");
        assert_eq!(
            asg.add_series(&tables, Some(1), Some("c"), AxisSide::Left, ""),
            Err(AssignmentError::MissingColumn {
                table: "run2".into(),
                column: "a".into()
            })
        );
        assert!(asg.series().is_empty());
    }

    #[test]
    fn labels_default_to_table_and_column() {
        let tables = tables();
        let mut asg = SeriesAssignment::default();
        asg.set_x_column("t");
        asg.add_series(&tables, Some(0), Some("a"), AxisSide::Left, "  ")
            .unwrap();
        asg.add_series(&tables, Some(1), Some("c"), AxisSide::Right, "pressure")
            .unwrap();

        assert_eq!(asg.series()[0].label, "run1: a");
        assert_eq!(asg.series()[1].label, "pressure");
        assert_ne!(asg.series()[0].color, asg.series()[1].color);

        let right = asg.series_on(AxisSide::Right);
        assert_eq!(right.len(), 1);
        assert_eq!(right[0].0, 1);
    }

    #[test]
    fn same_column_on_both_axes_is_accepted() {
        let tables = tables();
        let mut asg = SeriesAssignment::default();
        asg.set_x_column("a");
        asg.add_series(&tables, Some(0), Some("a"), AxisSide::Left, "")
            .unwrap();
        assert!(asg.can_plot());
    }

    #[test]
    fn closing_a_table_reindexes_series() {
        let mut more = tables();
        more.push(parse_table("run3", "t d\n0 1\n").unwrap());
        let mut asg = SeriesAssignment::default();
        asg.set_x_column("t");
        asg.add_series(&more, Some(0), Some("a"), AxisSide::Left, "")
            .unwrap();
        asg.add_series(&more, Some(1), Some("c"), AxisSide::Left, "")
            .unwrap();
        asg.add_series(&more, Some(2), Some("d"), AxisSide::Right, "")
            .unwrap();

        asg.remove_table(1);

        let idx: Vec<usize> = asg.series().iter().map(|s| s.table_index).collect();
        assert_eq!(idx, vec![0, 1]);
        assert_eq!(asg.series()[1].column, "d");
    }

    #[test]
    fn remove_and_reset() {
        let tables = tables();
        let mut asg = SeriesAssignment::default();
        asg.set_x_column("t");
        asg.add_series(&tables, Some(0), Some("a"), AxisSide::Left, "")
            .unwrap();
        let first_color = asg.series()[0].color;
        asg.add_series(&tables, Some(0), Some("b"), AxisSide::Left, "")
            .unwrap();

        assert_eq!(asg.remove_series(0).map(|s| s.column), Some("a".into()));
        assert_eq!(asg.remove_series(5), None);
        asg.set_color(0, Color32::BLACK);
        assert_eq!(asg.series()[0].color, Color32::BLACK);

        asg.reset();
        assert_eq!(asg.x_column(), None);
        assert!(asg.series().is_empty());

        asg.set_x_column("t");
        asg.add_series(&tables, Some(0), Some("a"), AxisSide::Left, "")
            .unwrap();
        assert_eq!(asg.series()[0].color, first_color);
    }
}
