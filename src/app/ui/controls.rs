use eframe::egui::{self, Color32, Ui};

use crate::graph::{EndpointSelector, TaxonomyEntry, fuzzy_filter};
use crate::sim::Simulation;
use crate::tree::LinkType;

use super::super::ViewModel;

const SELECTOR_DROPDOWN_LIMIT: usize = 40;

/// Commits a finished edit; true only when the trimmed draft differs from the active selector.
fn commit_selector(draft: &mut String, committed: &mut String) -> bool {
    *draft = draft.trim().to_owned();
    if draft == committed {
        return false;
    }
    committed.clone_from(draft);
    true
}

/// Text field plus a fuzzy-filtered dropdown over `entries`; returns true when the selector changed.
fn selector_field(
    ui: &mut Ui,
    id_salt: &str,
    label: &str,
    draft: &mut String,
    committed: &mut String,
    entries: &[TaxonomyEntry],
) -> bool {
    let mut changed = false;

    ui.label(label);
    let response = ui
        .text_edit_singleline(draft)
        .on_hover_text("`all:<type>`, `group:<base>` or an exact identity. Type to filter the list.");
    if response.lost_focus() {
        changed |= commit_selector(draft, committed);
    }

    let matches = fuzzy_filter(entries, draft, SELECTOR_DROPDOWN_LIMIT);
    egui::ComboBox::from_id_salt(id_salt)
        .width(ui.available_width())
        .selected_text(format!("{} matching", matches.len()))
        .show_ui(ui, |ui| {
            for entry in matches {
                let selected = entry.value == *committed;
                if ui.selectable_label(selected, entry.label.as_str()).clicked() && !selected {
                    draft.clone_from(&entry.value);
                    committed.clone_from(&entry.value);
                    changed = true;
                }
            }
        });

    if !draft.trim().is_empty() && EndpointSelector::parse(draft) == EndpointSelector::Nothing {
        ui.colored_label(
            Color32::from_rgb(241, 146, 94),
            "Selector is malformed and matches nothing.",
        );
    }

    changed
}

impl ViewModel {
    pub(in crate::app) fn draw_controls(&mut self, ui: &mut Ui) {
        ui.heading("Graph Controls");
        ui.separator();
        ui.add_space(4.0);

        let mut changed = false;

        ui.label("Relation types");
        for ltype in LinkType::ALL {
            let mut shown = !self.options.ignored.contains(&ltype);
            if ui
                .checkbox(&mut shown, ltype.label())
                .on_hover_text("Include links of this type when building the graph.")
                .changed()
            {
                if shown {
                    self.options.ignored.remove(&ltype);
                } else {
                    self.options.ignored.insert(ltype);
                }
                changed = true;
            }
        }

        ui.separator();

        changed |= selector_field(
            ui,
            "select_a",
            "Endpoint A (by type)",
            &mut self.selector_drafts[0],
            &mut self.options.select_a,
            &self.builder.taxonomies().by_type,
        );
        ui.add_space(4.0);
        changed |= selector_field(
            ui,
            "select_b",
            "Endpoint B (groups and standards)",
            &mut self.selector_drafts[1],
            &mut self.options.select_b,
            &self.builder.taxonomies().grouped,
        );

        changed |= ui
            .checkbox(&mut self.options.show_all, "Show all documents")
            .on_hover_text("When off, only links touching a selected endpoint are kept.")
            .changed();

        if ui.button("Clear selectors").clicked() {
            self.selector_drafts.iter_mut().for_each(String::clear);
            if !self.options.select_a.is_empty() || !self.options.select_b.is_empty() {
                self.options.select_a.clear();
                self.options.select_b.clear();
                changed = true;
            }
        }

        ui.separator();
        ui.label("Layout");
        ui.horizontal(|ui| {
            if ui
                .button("Reheat")
                .on_hover_text("Restart the force simulation from the current positions.")
                .clicked()
            {
                self.simulation.reheat();
            }
            if ui
                .button("Re-frame camera")
                .on_hover_text("Align and frame the layout again once it has settled.")
                .clicked()
            {
                self.framer.reset();
                self.reframe_requested = true;
            }
        });
        ui.label(format!(
            "alpha {:.3}  |  charge {:.0}",
            self.simulation.alpha(),
            self.simulation.charge_strength()
        ));
        if !self.schedule.is_finished() {
            ui.label("Expanding layout...");
        } else if !self.framer.has_framed() {
            ui.label("Camera frames once the layout settles.");
        }
        ui.label(format!("dominant component: {} nodes", self.dominant.len()));

        ui.collapsing("Camera", |ui| {
            ui.checkbox(&mut self.camera.rotate_enabled, "Rotate (primary drag)");
            ui.checkbox(&mut self.camera.pan_enabled, "Pan (secondary drag)");
            ui.checkbox(&mut self.camera.zoom_enabled, "Zoom (scroll)");
            ui.add(egui::Slider::new(&mut self.camera.damping, 0.02..=0.5).text("Damping"));
            ui.label(format!(
                "distance {:.0} (range {:.0}..{:.0})",
                self.camera.distance(),
                self.camera.min_distance,
                self.camera.max_distance
            ));
            let look_at = self.camera.pose().look_at;
            ui.label(format!(
                "looking at ({:.0}, {:.0}, {:.0})",
                look_at.x, look_at.y, look_at.z
            ));
        });

        if changed {
            self.graph_dirty = true;
        }
    }
}
