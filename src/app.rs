use std::sync::Arc;

use eframe::egui::{self, Ui};

use crate::data::model::PenguinDataset;
use crate::state::{AppState, DataTab, HistogramTab};
use crate::ui::{panels, plot, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct PenguinApp {
    pub state: AppState,
}

impl PenguinApp {
    pub fn new(dataset: Arc<PenguinDataset>) -> Self {
        Self {
            state: AppState::new(dataset),
        }
    }
}

/// A titled card around `add_contents`.
fn card(ui: &mut Ui, title: &str, add_contents: impl FnOnce(&mut Ui)) {
    egui::Frame::group(ui.style()).show(ui, |ui: &mut Ui| {
        ui.set_width(ui.available_width());
        ui.strong(title);
        ui.separator();
        add_contents(ui);
    });
}

impl eframe::App for PenguinApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let state = &mut self.state;

        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, state);
        });

        // ---- Left side panel: inputs ----
        egui::SidePanel::left("input_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, state);
            });

        // ---- Central panel: charts and data ----
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui: &mut Ui| {
                ui.columns(2, |cols| {
                    card(&mut cols[0], "Plotly Scatterplot: Species", |ui| {
                        plot::scatterplot(ui, state);
                    });

                    card(&mut cols[1], "Histograms", |ui| {
                        ui.horizontal(|ui: &mut Ui| {
                            ui.selectable_value(
                                &mut state.histogram_tab,
                                HistogramTab::Plotly,
                                "Plotly Histogram",
                            );
                            ui.selectable_value(
                                &mut state.histogram_tab,
                                HistogramTab::Seaborn,
                                "Seaborn Histogram",
                            );
                        });
                        match state.histogram_tab {
                            HistogramTab::Plotly => plot::plotly_histogram(ui, state),
                            HistogramTab::Seaborn => plot::seaborn_histogram(ui, state),
                        }
                    });
                });

                ui.add_space(8.0);

                card(ui, "Data", |ui| {
                    ui.horizontal(|ui: &mut Ui| {
                        ui.selectable_value(&mut state.data_tab, DataTab::Grid, "Data Grid");
                        ui.selectable_value(&mut state.data_tab, DataTab::Table, "Data Table");
                    });
                    match state.data_tab {
                        DataTab::Grid => table::data_grid(ui, state),
                        DataTab::Table => table::data_table(ui, state),
                    }
                });
            });
        });
    }
}
