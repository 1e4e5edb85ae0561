use eframe::egui;

use crate::state::AppState;
use crate::ui::{panels, plot, preview};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct GuiPlotterApp {
    pub state: AppState,
}

impl eframe::App for GuiPlotterApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: data, columns, series, options ----
        egui::SidePanel::left("control_panel")
            .default_width(300.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Bottom panel: data preview ----
        if self.state.show_preview {
            if let Some(table) = self.state.selected_table() {
                egui::TopBottomPanel::bottom("preview_panel")
                    .resizable(true)
                    .default_height(200.0)
                    .show(ctx, |ui| {
                        preview::table_preview(ui, table);
                    });
            }
        }

        // ---- Central panel: plot ----
        egui::CentralPanel::default().show(ctx, |ui| {
            plot::series_plot(ui, &mut self.state);
        });

        // ---- Dialogs ----
        panels::notice_window(ctx, &mut self.state);
    }
}
