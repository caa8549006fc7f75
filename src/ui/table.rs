use eframe::egui::{self, Align, Layout, RichText, ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::model::COLUMNS;
use crate::state::AppState;

const ROW_HEIGHT: f32 = 18.0;
const TABLE_HEIGHT: f32 = 280.0;

// ---------------------------------------------------------------------------
// Data Grid: virtualised, resizable, sortable
// ---------------------------------------------------------------------------

pub fn data_grid(ui: &mut Ui, state: &mut AppState) {
    let sort = state.inputs().grid_sort;
    let mut clicked: Option<usize> = None;
    if let Some(key) = sort {
        let direction = if key.ascending { "ascending" } else { "descending" };
        ui.label(RichText::new(format!("sorted by {} ({direction})", key.column_name())).weak());
    }

    let rows = state.data_grid();
    if rows.is_empty() {
        ui.label("No rows match the current species selection.");
        return;
    }

    TableBuilder::new(ui)
        .id_salt("data_grid")
        .striped(true)
        .resizable(true)
        .cell_layout(Layout::left_to_right(Align::Center))
        .columns(Column::auto().at_least(70.0), COLUMNS.len())
        .min_scrolled_height(0.0)
        .max_scroll_height(TABLE_HEIGHT)
        .header(22.0, |mut header| {
            for (col, name) in COLUMNS.iter().enumerate() {
                header.col(|ui| {
                    let arrow = match sort {
                        Some(key) if key.column == col && key.ascending => " ▲",
                        Some(key) if key.column == col => " ▼",
                        _ => "",
                    };
                    if ui
                        .button(RichText::new(format!("{name}{arrow}")).strong())
                        .on_hover_text("Click to sort")
                        .clicked()
                    {
                        clicked = Some(col);
                    }
                });
            }
        })
        .body(|body| {
            body.rows(ROW_HEIGHT, rows.len(), |mut row| {
                let cells = &rows[row.index()];
                for cell in cells {
                    row.col(|ui| {
                        ui.label(cell.as_str());
                    });
                }
            });
        });

    if let Some(col) = clicked {
        state.toggle_grid_sort(col);
    }
}

// ---------------------------------------------------------------------------
// Data Table: plain striped grid with row numbers
// ---------------------------------------------------------------------------

pub fn data_table(ui: &mut Ui, state: &mut AppState) {
    let summary = state.summary();
    ui.label(RichText::new(summary).weak());

    let rows = state.data_table();
    ScrollArea::both()
        .id_salt("data_table_scroll")
        .max_height(TABLE_HEIGHT)
        .auto_shrink([false, true])
        .show(ui, |ui: &mut Ui| {
            egui::Grid::new("data_table")
                .striped(true)
                .num_columns(COLUMNS.len() + 1)
                .show(ui, |ui: &mut Ui| {
                    ui.strong("#");
                    for name in COLUMNS {
                        ui.strong(name);
                    }
                    ui.end_row();

                    for (i, cells) in rows.iter().enumerate() {
                        ui.label(RichText::new((i + 1).to_string()).weak());
                        for cell in cells {
                            ui.label(cell.as_str());
                        }
                        ui.end_row();
                    }
                });
        });
}
