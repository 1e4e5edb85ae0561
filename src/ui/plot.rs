use eframe::egui::Ui;
use egui_plot::{AxisHints, HPlacement, Legend, Line, Plot, PlotBounds, PlotPoints};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Series plot (central panel)
// ---------------------------------------------------------------------------

/// Render the last resolved plot in the central panel.
pub fn series_plot(ui: &mut Ui, state: &mut AppState) {
    let Some(request) = &state.plot else {
        ui.centered_and_justified(|ui: &mut Ui| {
            let hint = if state.tables.is_empty() {
                "Open a file to plot columns  (File → Open…)"
            } else {
                "Assign columns to axes, then press Plot"
            };
            ui.heading(hint);
        });
        return;
    };

    let mut y_axes = vec![AxisHints::new_y()
        .label(request.left_label.clone())
        .formatter(|mark, _range| request.left_tick(mark.value))];
    if let Some(right_label) = &request.right_label {
        y_axes.push(
            AxisHints::new_y()
                .label(right_label.clone())
                .placement(HPlacement::Right)
                .formatter(|mark, _range| request.right_tick(mark.value)),
        );
    }

    let mut plot = Plot::new("series_plot")
        .x_axis_label(request.x_label.clone())
        .x_axis_formatter(|mark, _range| request.x_tick(mark.value))
        .custom_y_axes(y_axes)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true);
    if request.show_legend {
        plot = plot.legend(Legend::default());
    }

    let reset_view = std::mem::take(&mut state.reset_view);
    if reset_view {
        plot = plot.reset();
    }

    plot.show(ui, |plot_ui| {
        if reset_view {
            if let Some((min, max)) = request.bounds() {
                plot_ui.set_plot_bounds(PlotBounds::from_min_max(min, max));
            }
        }

        for series in &request.series {
            let points = PlotPoints::new(request.display_points(series));
            let line = Line::new(points)
                .name(&series.label)
                .color(series.color)
                .width(1.5);
            plot_ui.line(line);
        }
    });
}
