use eframe::egui::{self, RichText, Ui};

use super::super::ViewModel;

impl ViewModel {
    pub(in crate::app) fn draw_details(&mut self, ui: &mut Ui) {
        ui.heading("Node Details");
        ui.add_space(6.0);

        let focused = self.focus.spotlight().map(|spotlight| spotlight.node.as_str());
        let Some(node_id) = focused.or(self.hovered.as_deref()) else {
            ui.label("Hover a node and hold still to focus its neighborhood.");
            return;
        };
        let Some(node) = self.graph.node(node_id) else {
            ui.label("The node is no longer part of the graph.");
            return;
        };

        ui.label(RichText::new(node.name.as_str()).strong());
        ui.small(node.id.as_str());
        ui.add_space(6.0);

        ui.label(format!("Type: {}", node.doctype.label()));
        ui.label(format!("Size: {}", node.size));
        ui.label(format!("Links: {}", self.adjacency.degree(&node.id)));
        if self.dominant.contains(&node.id) {
            ui.label("Part of the dominant component");
        }

        if node.is_group() {
            if let Some(group) = self.builder.flattened().group(&node.id) {
                ui.label(format!("Appearances in the tree: {}", group.occurrences));
            }
            ui.separator();
            ui.label(RichText::new(format!("Members ({})", node.members.len())).strong());
            egui::ScrollArea::vertical()
                .id_salt("group_members_scroll")
                .max_height(220.0)
                .auto_shrink([false, true])
                .show(ui, |ui| {
                    for member in &node.members {
                        ui.label(member.as_str());
                    }
                });
        }

        ui.separator();
        ui.label(RichText::new("Neighbors").strong());
        let mut neighbors = self
            .adjacency
            .neighbors(&node.id)
            .into_iter()
            .flatten()
            .filter_map(|id| self.graph.node(id))
            .collect::<Vec<_>>();
        if neighbors.is_empty() {
            ui.label("No linked documents in the current graph.");
            return;
        }
        neighbors.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));

        egui::ScrollArea::vertical()
            .id_salt("neighbors_scroll")
            .auto_shrink([false, false])
            .show(ui, |ui| {
                for neighbor in neighbors {
                    ui.label(format!("{}  [{}]", neighbor.name, neighbor.doctype.label()))
                        .on_hover_text(neighbor.id.as_str());
                }
            });
    }
}
