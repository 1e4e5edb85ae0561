use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::color;
use crate::data::assignment::AxisSide;
use crate::data::request::AxisInput;
use crate::state::{AppState, Notice, Severity};

// ---------------------------------------------------------------------------
// Left side panel – data, columns, series and plot options
// ---------------------------------------------------------------------------

/// Render the left control panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            egui::CollapsingHeader::new(RichText::new("Data").strong())
                .default_open(true)
                .show(ui, |ui: &mut Ui| data_section(ui, state));

            egui::CollapsingHeader::new(RichText::new("Columns").strong())
                .default_open(true)
                .show(ui, |ui: &mut Ui| column_section(ui, state));

            egui::CollapsingHeader::new(RichText::new("Series").strong())
                .default_open(true)
                .show(ui, |ui: &mut Ui| {
                    series_list(ui, state, AxisSide::Left);
                    ui.add_space(6.0);
                    series_list(ui, state, AxisSide::Right);
                });

            egui::CollapsingHeader::new(RichText::new("Plot Options").strong())
                .default_open(true)
                .show(ui, |ui: &mut Ui| plot_options_section(ui, state));
        });
}

fn data_section(ui: &mut Ui, state: &mut AppState) {
    if ui.button("Open Files…").clicked() {
        open_file_dialog(state);
    }

    let summary = match state.selected_table() {
        Some(t) => format!("Selected: {}", t.name),
        None if state.tables.is_empty() => "No datasets loaded".to_string(),
        None => format!("{} dataset(s) loaded", state.tables.len()),
    };
    ui.label(summary);

    let names: Vec<String> = state.tables.iter().map(|t| t.name.clone()).collect();
    ScrollArea::vertical()
        .id_salt("dataset_list")
        .max_height(110.0)
        .show(ui, |ui: &mut Ui| {
            for (i, name) in names.iter().enumerate() {
                if ui
                    .selectable_label(state.selected_table == Some(i), name)
                    .clicked()
                {
                    state.select_table(i);
                }
            }
        });

    ui.horizontal(|ui: &mut Ui| {
        let has_selection = state.selected_table.is_some();
        if ui
            .add_enabled(has_selection, egui::Button::new("Close"))
            .clicked()
        {
            state.close_selected_table();
        }
        ui.checkbox(&mut state.show_preview, "Preview");
    });
}

fn column_section(ui: &mut Ui, state: &mut AppState) {
    let columns: Vec<String> = state
        .selected_table()
        .map(|t| t.column_names().into_iter().map(String::from).collect())
        .unwrap_or_default();

    ui.label("Use column for X axis:");
    let current_x = state.assignment.x_column().unwrap_or_default().to_string();
    egui::ComboBox::from_id_salt("x_column")
        .selected_text(&current_x)
        .show_ui(ui, |ui: &mut Ui| {
            for col in &columns {
                if ui.selectable_label(current_x == *col, col).clicked() {
                    state.assignment.set_x_column(col.clone());
                }
            }
        });

    ui.add_space(4.0);
    ui.label("Available columns:");
    ScrollArea::vertical()
        .id_salt("column_list")
        .max_height(130.0)
        .show(ui, |ui: &mut Ui| {
            for col in &columns {
                let selected = state.selected_column.as_deref() == Some(col.as_str());
                if ui.selectable_label(selected, col).clicked() {
                    state.select_column(col);
                }
            }
        });

    ui.horizontal(|ui: &mut Ui| {
        if ui.button("Add to Left Axis").clicked() {
            state.add_series(AxisSide::Left);
        }
        if ui.button("Add to Right Axis").clicked() {
            state.add_series(AxisSide::Right);
        }
    });

    ui.label("Custom label (optional):");
    ui.text_edit_singleline(&mut state.series_label);
}

fn series_list(ui: &mut Ui, state: &mut AppState, side: AxisSide) {
    ui.strong(format!("{} Axis Series", side.label()));

    let entries: Vec<(usize, String, Color32)> = state
        .assignment
        .series_on(side)
        .into_iter()
        .map(|(i, s)| {
            let table = state
                .tables
                .get(s.table_index)
                .map_or("?", |t| t.name.as_str());
            let text = format!(
                "{} [{}/{}] ({})",
                s.label,
                table,
                s.column,
                color::to_hex(s.color)
            );
            (i, text, s.color)
        })
        .collect();

    if entries.is_empty() {
        ui.weak("none");
    }

    for (index, text, mut color) in entries {
        ui.horizontal(|ui: &mut Ui| {
            if ui.color_edit_button_srgba(&mut color).changed() {
                state.set_series_color(index, color);
            }
            let selected = state.selected_series(side) == Some(index);
            if ui
                .selectable_label(selected, RichText::new(text).color(color))
                .clicked()
            {
                state.select_series(side, index);
            }
        });
    }

    let can_remove = state.selected_series(side).is_some();
    if ui
        .add_enabled(can_remove, egui::Button::new("Remove"))
        .clicked()
    {
        state.remove_selected_series(side);
    }
}

fn axis_options(ui: &mut Ui, id: &str, title: &str, axis: &mut AxisInput) {
    ui.label(RichText::new(title).italics());
    egui::Grid::new(id).num_columns(4).show(ui, |ui: &mut Ui| {
        ui.label("Min:");
        ui.add(egui::TextEdit::singleline(&mut axis.min).desired_width(60.0));
        ui.label("Max:");
        ui.add(egui::TextEdit::singleline(&mut axis.max).desired_width(60.0));
        ui.end_row();

        ui.label("Scale:");
        ui.add(egui::TextEdit::singleline(&mut axis.scale).desired_width(60.0));
        ui.checkbox(&mut axis.log, "Log scale");
        ui.end_row();
    });
}

fn plot_options_section(ui: &mut Ui, state: &mut AppState) {
    let input = &mut state.plot_input;
    egui::Grid::new("axis_labels")
        .num_columns(2)
        .show(ui, |ui: &mut Ui| {
            ui.label("X label:");
            ui.text_edit_singleline(&mut input.x_label);
            ui.end_row();
            ui.label("Left axis label:");
            ui.text_edit_singleline(&mut input.left_label);
            ui.end_row();
            ui.label("Right axis label:");
            ui.text_edit_singleline(&mut input.right_label);
            ui.end_row();
        });
    ui.checkbox(&mut input.show_legend, "Show legend");

    ui.add_space(4.0);
    axis_options(ui, "x_axis_options", "X Axis Options", &mut input.x);
    axis_options(ui, "left_axis_options", "Left Axis Options", &mut input.left);
    axis_options(ui, "right_axis_options", "Right Axis Options", &mut input.right);

    ui.add_space(6.0);
    ui.horizontal(|ui: &mut Ui| {
        let ready = state.assignment.can_plot();
        if ui.add_enabled(ready, egui::Button::new("Plot")).clicked() {
            state.plot();
        }
        if ui.button("Clear").clicked() {
            state.clear_plot();
        }
        if ui.button("Reset").clicked() {
            state.reset();
        }
    });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui
                .add_enabled(state.selected_table.is_some(), egui::Button::new("Close"))
                .clicked()
            {
                state.close_selected_table();
                ui.close_menu();
            }
        });

        ui.separator();

        ui.label(format!(
            "{} dataset(s), {} series",
            state.tables.len(),
            state.assignment.series().len()
        ));
    });
}

// ---------------------------------------------------------------------------
// Notice dialog
// ---------------------------------------------------------------------------

/// Show the pending notice, if any, until the user presses OK.
pub fn notice_window(ctx: &egui::Context, state: &mut AppState) {
    let Some(Notice {
        title,
        message,
        severity,
    }) = state.notice.clone()
    else {
        return;
    };

    let color = match severity {
        Severity::Info => ctx.style().visuals.text_color(),
        Severity::Warning => Color32::from_rgb(230, 160, 0),
        Severity::Error => Color32::RED,
    };

    let mut dismissed = false;
    egui::Window::new(title)
        .id(egui::Id::new("notice_window"))
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui: &mut Ui| {
            ui.label(RichText::new(message).color(color));
            ui.add_space(6.0);
            ui.vertical_centered(|ui: &mut Ui| {
                if ui.button("OK").clicked() {
                    dismissed = true;
                }
            });
        });

    if dismissed {
        state.notice = None;
    }
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let files = rfd::FileDialog::new()
        .set_title("Select space-delimited files")
        .add_filter("Data files", &["txt", "dat", "csv", "tsv"])
        .add_filter("All files", &["*"])
        .pick_files();

    if let Some(paths) = files {
        log::debug!("Opening {} file(s)", paths.len());
        state.load_paths(&paths);
    }
}
