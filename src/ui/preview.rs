use eframe::egui::Ui;
use egui_extras::{Column, TableBuilder};

use crate::data::model::Table;

const ROW_HEIGHT: f32 = 18.0;

/// Scrollable grid of the selected table's values.
pub fn table_preview(ui: &mut Ui, table: &Table) {
    ui.horizontal(|ui: &mut Ui| {
        ui.strong(&table.name);
        ui.weak(format!("{} columns x {} rows", table.n_columns(), table.n_rows()));
        if let Some(path) = &table.path {
            ui.weak(path.display().to_string());
        }
    });

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .column(Column::auto().at_least(40.0))
        .columns(Column::auto().at_least(70.0), table.n_columns())
        .header(ROW_HEIGHT + 2.0, |mut header| {
            header.col(|ui: &mut Ui| {
                ui.strong("#");
            });
            for column in table.columns() {
                header.col(|ui: &mut Ui| {
                    ui.strong(&column.name);
                });
            }
        })
        .body(|body| {
            body.rows(ROW_HEIGHT, table.n_rows(), |mut row| {
                let index = row.index();
                row.col(|ui: &mut Ui| {
                    ui.weak(index.to_string());
                });
                for value in table.row(index).unwrap_or_default() {
                    row.col(|ui: &mut Ui| {
                        ui.label(value.to_string());
                    });
                }
            });
        });
}
