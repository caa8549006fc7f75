use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::config::{LINK_TEXT, LINK_URL};
use crate::data::model::{Attribute, Species};
use crate::state::{AppState, PLOTLY_BIN_RANGE, SEABORN_BIN_RANGE};

// ---------------------------------------------------------------------------
// Left side panel – input controls
// ---------------------------------------------------------------------------

/// Render the sidebar. Every control writes through the state setters so
/// only the outputs that depend on it are recomputed.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Sidebar");
    ui.separator();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Attribute selector ----
            ui.strong("Select Attribute for Histograms:");
            let current = state.inputs().selected_attribute;
            egui::ComboBox::from_id_salt("selected_attribute")
                .selected_text(current.column())
                .width(ui.available_width())
                .show_ui(ui, |ui: &mut Ui| {
                    for attribute in Attribute::ALL {
                        if ui
                            .selectable_label(current == attribute, attribute.column())
                            .clicked()
                        {
                            state.set_attribute(attribute);
                        }
                    }
                });
            ui.add_space(8.0);

            // ---- Bin counts ----
            ui.strong("Bin Count for Plotly Chart");
            let mut plotly_bins = state.inputs().plotly_bin_count;
            if ui
                .add(egui::DragValue::new(&mut plotly_bins).range(PLOTLY_BIN_RANGE))
                .changed()
            {
                state.set_plotly_bin_count(plotly_bins);
            }
            ui.add_space(8.0);

            ui.strong("Bin Count for Seaborn Chart");
            let mut seaborn_bins = state.inputs().seaborn_bin_count;
            if ui
                .add(egui::Slider::new(&mut seaborn_bins, SEABORN_BIN_RANGE))
                .changed()
            {
                state.set_seaborn_bin_count(seaborn_bins);
            }
            ui.add_space(8.0);

            // ---- Species checkboxes (inline) ----
            ui.strong("Select Species:");
            ui.horizontal_wrapped(|ui: &mut Ui| {
                for species in Species::CHECKBOX_ORDER {
                    let mut checked = state.inputs().selected_species.contains(&species);
                    let text = RichText::new(species.as_str()).color(state.colors.color_for(species));
                    if ui.checkbox(&mut checked, text).changed() {
                        state.set_species_checked(species, checked);
                    }
                }
            });

            ui.separator();
            ui.hyperlink_to(LINK_TEXT, LINK_URL);
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Export filtered rows…").clicked() {
                export_file_dialog(state);
                ui.close_menu();
            }
            if ui.button("Quit").clicked() {
                ui.ctx().send_viewport_cmd(egui::ViewportCommand::Close);
            }
        });

        ui.separator();

        let total = state.dataset().len();
        let visible = state.filtered_rows().len();
        ui.label(format!("{total} penguins loaded, {visible} visible"));

        if let Some(msg) = &state.status_message {
            ui.separator();
            let color = if msg.starts_with("Error") {
                Color32::RED
            } else {
                ui.visuals().weak_text_color()
            };
            ui.label(RichText::new(msg).color(color));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn export_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Export filtered penguins")
        .set_file_name("penguins_filtered.csv")
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .save_file();

    if let Some(path) = file {
        match state.export_filtered(&path) {
            Ok(n) => {
                state.status_message = Some(format!("Exported {n} rows to {}", path.display()));
            }
            Err(e) => {
                log::error!("Failed to export: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}
