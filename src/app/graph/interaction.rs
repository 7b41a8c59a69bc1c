use std::time::Instant;

use eframe::egui::{self, Pos2, Rect, Ui};

use super::super::ViewModel;

impl ViewModel {
    pub(in crate::app) fn handle_orbit_input(
        &mut self,
        ui: &Ui,
        rect: Rect,
        response: &egui::Response,
    ) {
        if response.dragged_by(egui::PointerButton::Primary) {
            self.camera.rotate(response.drag_delta());
        }

        if response.dragged_by(egui::PointerButton::Secondary)
            || response.dragged_by(egui::PointerButton::Middle)
        {
            self.camera.pan(response.drag_delta(), rect.height());
        }

        if response.hovered() {
            let scroll = ui.input(|input| input.raw_scroll_delta.y);
            if scroll.abs() > f32::EPSILON {
                self.camera.zoom(scroll);
            }
        }
    }

    /// Nearest projected node under the pointer.
    pub(in crate::app) fn hovered_index(
        ui: &Ui,
        visible_indices: &[usize],
        screen_positions: &[Option<Pos2>],
        screen_radii: &[f32],
    ) -> Option<(usize, f32)> {
        let pointer = ui.input(|input| input.pointer.hover_pos())?;
        visible_indices
            .iter()
            .filter_map(|&index| {
                let distance = screen_positions[index]?.distance(pointer);
                (distance <= screen_radii[index].max(4.0)).then_some((index, distance))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
    }

    /// Feeds pointer transitions into the focus state machine.
    pub(in crate::app) fn apply_hover(&mut self, hovered: Option<String>, now: Instant) {
        if self.hovered == hovered {
            return;
        }

        match &hovered {
            Some(id) => self.focus.hover_enter(id, now),
            None => self.focus.hover_exit(),
        }
        self.hovered = hovered;
    }

    pub(in crate::app) fn apply_background_click(&mut self) {
        self.focus.background_click();
    }
}
