use std::time::Instant;

use eframe::egui::{self, Align2, Color32, FontId, Rect, Sense, Stroke, Ui, vec2};

use crate::camera::{FrameOutcome, Viewport};
use crate::focus::{EdgeEmphasis, NodeEmphasis};
use crate::graph::Graph;
use crate::sim::{SimEvent, Simulation};
use crate::util::truncate_label;

use super::super::orbit::OrbitCamera;
use super::super::render_utils::{
    HOVER_COLOR, LABEL_COLOR, blend_color, circle_visible, dim_color, draw_background, link_color,
    node_radius, type_color,
};
use super::super::{ViewModel, ViewScratch};

const LABEL_MAX_CHARS: usize = 36;

impl ViewModel {
    fn update_screen_space(
        camera: &OrbitCamera,
        graph: &Graph,
        rect: Rect,
        scratch: &mut ViewScratch,
    ) {
        let count = graph.node_count();
        scratch.screen_positions.clear();
        scratch.screen_positions.resize(count, None);
        scratch.screen_radii.clear();
        scratch.screen_radii.resize(count, 0.0);
        scratch.depths.clear();
        scratch.depths.resize(count, f64::INFINITY);
        scratch.visible_indices.clear();

        for (index, node) in graph.nodes.iter().enumerate() {
            let Some(projected) = node
                .finite_position()
                .and_then(|position| camera.project(rect, &position))
            else {
                continue;
            };

            let radius = (node_radius(node.size) * projected.scale).clamp(1.5, 48.0);
            scratch.screen_positions[index] = Some(projected.screen);
            scratch.screen_radii[index] = radius;
            scratch.depths[index] = projected.depth;
            if circle_visible(rect, projected.screen, radius) {
                scratch.visible_indices.push(index);
            }
        }

        // Far nodes first so nearer ones paint over them.
        scratch.draw_order.clear();
        scratch.draw_order.extend(scratch.visible_indices.iter().copied());
        let depths = &scratch.depths;
        scratch
            .draw_order
            .sort_by(|a, b| depths[*b].total_cmp(&depths[*a]));
    }

    /// Applies due strength stages and advances the layout one tick; returns true while it moves.
    fn advance_simulation(&mut self, now: Instant, viewport: &Viewport) -> bool {
        if let Some(charge) = self.schedule.poll(now) {
            log::debug!("charge strength -> {charge}");
            self.simulation.set_charge_strength(charge);
            self.simulation.reheat();
        }

        let event = self.simulation.tick(&mut self.graph.nodes);
        let settled = event == SimEvent::Settled;
        if settled || (self.reframe_requested && self.simulation.is_settled()) {
            self.reframe_requested = false;
            self.frame_camera(viewport);
        }

        event != SimEvent::Idle
    }

    fn frame_camera(&mut self, viewport: &Viewport) {
        let Some(outcome) = self
            .framer
            .on_settle(&mut self.graph.nodes, &self.dominant, viewport)
        else {
            return;
        };

        match outcome {
            FrameOutcome::Framed(frame) => {
                self.camera.set_zoom_bounds(frame.zoom);
                self.camera.set_pose(frame.pose);
            }
            FrameOutcome::FitAll => {
                let points = self
                    .graph
                    .nodes
                    .iter()
                    .filter_map(|node| node.finite_position())
                    .collect::<Vec<_>>();
                self.camera.fit_all(&points);
            }
        }
    }

    pub(in crate::app) fn draw_graph(&mut self, ui: &mut Ui) {
        let now = Instant::now();
        if self.graph_dirty {
            self.rebuild_graph(now);
        }

        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        let painter = ui.painter_at(rect);
        draw_background(&painter, rect);

        let viewport = Viewport {
            width: f64::from(rect.width()),
            height: f64::from(rect.height()),
            fov_y_degrees: self.fov_degrees,
        };

        self.handle_orbit_input(ui, rect, &response);
        let simulation_moving = self.advance_simulation(now, &viewport);
        let camera_moving = self.camera.step();

        if self.graph.is_empty() {
            painter.text(
                rect.center(),
                Align2::CENTER_CENTER,
                "No documents match the current relation types and selectors.",
                FontId::proportional(14.0),
                LABEL_COLOR,
            );
            return;
        }

        Self::update_screen_space(&self.camera, &self.graph, rect, &mut self.render.view_scratch);
        let scratch = &self.render.view_scratch;
        let hovered = Self::hovered_index(
            ui,
            &scratch.visible_indices,
            &scratch.screen_positions,
            &scratch.screen_radii,
        );
        let hovered_index = hovered.map(|(index, _)| index);

        if hovered.is_some() {
            ui.output_mut(|output| {
                output.cursor_icon = egui::CursorIcon::PointingHand;
            });
        }
        if response.clicked_by(egui::PointerButton::Primary) && hovered.is_none() {
            self.apply_background_click();
        }
        let hovered_id = hovered_index.map(|index| self.graph.nodes[index].id.clone());
        self.apply_hover(hovered_id, now);
        self.focus.poll(now, &self.adjacency);

        let scratch = &self.render.view_scratch;
        for edge in &self.render.edges {
            let (Some(start), Some(end)) =
                (scratch.screen_positions[edge.from], scratch.screen_positions[edge.to])
            else {
                continue;
            };

            let color = link_color(edge.ltype);
            let stroke = match self.focus.edge_emphasis(&edge.key) {
                EdgeEmphasis::Normal => Stroke::new(1.1, color.gamma_multiply(0.6)),
                EdgeEmphasis::Incident => Stroke::new(2.6, color),
                EdgeEmphasis::Faint => Stroke::new(0.5, dim_color(color, 0.25)),
            };
            painter.line_segment([start, end], stroke);
        }

        for &index in &scratch.draw_order {
            let node = &self.graph.nodes[index];
            let Some(position) = scratch.screen_positions[index] else {
                continue;
            };
            let radius = scratch.screen_radii[index];

            let base_color = type_color(node.doctype);
            let emphasis = self.focus.node_emphasis(&node.id);
            let color = match emphasis {
                NodeEmphasis::Hovered => blend_color(base_color, HOVER_COLOR, 0.85),
                NodeEmphasis::Neighbor | NodeEmphasis::Normal => base_color,
                NodeEmphasis::Dimmed => dim_color(base_color, 0.2),
            };

            painter.circle_filled(position, radius, color);
            painter.circle_stroke(
                position,
                radius,
                Stroke::new(1.0, Color32::from_rgba_unmultiplied(15, 15, 15, 190)),
            );
            if node.is_group() {
                painter.circle_stroke(
                    position,
                    radius + 2.5,
                    Stroke::new(1.0, color.gamma_multiply(0.7)),
                );
            }

            let should_draw_label = matches!(emphasis, NodeEmphasis::Hovered | NodeEmphasis::Neighbor)
                || hovered_index == Some(index)
                || radius > 16.0;
            if should_draw_label {
                painter.text(
                    position + vec2(radius + 5.0, 0.0),
                    Align2::LEFT_CENTER,
                    truncate_label(&node.name, LABEL_MAX_CHARS),
                    FontId::proportional(12.0),
                    LABEL_COLOR,
                );
            }
        }

        if let Some(index) = hovered_index {
            let node = &self.graph.nodes[index];
            let panel_text = format!(
                "{}  |  {}  |  size {}  |  links {}",
                truncate_label(&node.name, LABEL_MAX_CHARS),
                node.doctype.label(),
                node.size,
                self.adjacency.degree(&node.id)
            );
            painter.text(
                rect.left_top() + vec2(10.0, 10.0),
                Align2::LEFT_TOP,
                panel_text,
                FontId::proportional(13.0),
                Color32::from_gray(240),
            );
        }

        if simulation_moving || camera_moving || response.dragged() {
            ui.ctx().request_repaint();
        } else if let Some(deadline) = [self.focus.pending_deadline(), self.schedule.next_deadline()]
            .into_iter()
            .flatten()
            .min()
        {
            ui.ctx()
                .request_repaint_after(deadline.saturating_duration_since(now));
        }
    }
}
