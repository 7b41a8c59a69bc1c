use eframe::egui::{Color32, Painter, Pos2, Rect};

use crate::tree::{DocumentType, LinkType};

pub(super) const HOVER_COLOR: Color32 = Color32::from_rgb(255, 164, 101);
pub(super) const LABEL_COLOR: Color32 = Color32::from_gray(238);

pub(super) fn blend_color(base: Color32, overlay: Color32, amount: f32) -> Color32 {
    let amount = amount.clamp(0.0, 1.0);
    let inverse = 1.0 - amount;

    Color32::from_rgba_unmultiplied(
        ((base.r() as f32 * inverse) + (overlay.r() as f32 * amount)) as u8,
        ((base.g() as f32 * inverse) + (overlay.g() as f32 * amount)) as u8,
        ((base.b() as f32 * inverse) + (overlay.b() as f32 * amount)) as u8,
        ((base.a() as f32 * inverse) + (overlay.a() as f32 * amount)) as u8,
    )
}

pub(super) fn dim_color(color: Color32, factor: f32) -> Color32 {
    let factor = factor.clamp(0.0, 1.0);
    Color32::from_rgba_unmultiplied(
        (color.r() as f32 * factor) as u8,
        (color.g() as f32 * factor) as u8,
        (color.b() as f32 * factor) as u8,
        (color.a() as f32 * (0.45 + (factor * 0.55))) as u8,
    )
}

pub(super) fn draw_background(painter: &Painter, rect: Rect) {
    painter.rect_filled(rect, 0.0, Color32::from_rgb(19, 23, 29));
}

pub(super) fn circle_visible(rect: Rect, position: Pos2, radius: f32) -> bool {
    !(position.x + radius < rect.left()
        || position.x - radius > rect.right()
        || position.y + radius < rect.top()
        || position.y - radius > rect.bottom())
}

pub(super) fn type_color(doctype: DocumentType) -> Color32 {
    match doctype {
        DocumentType::Standard => Color32::from_rgb(103, 196, 255),
        DocumentType::Cre => Color32::from_rgb(246, 137, 92),
        DocumentType::Tool => Color32::from_rgb(140, 214, 132),
        DocumentType::Unknown => Color32::from_rgb(150, 150, 160),
    }
}

pub(super) fn link_color(ltype: LinkType) -> Color32 {
    match ltype {
        LinkType::Contains => Color32::from_rgb(247, 194, 111),
        LinkType::Related => Color32::from_rgb(160, 140, 230),
        LinkType::LinkedTo => Color32::from_rgb(110, 170, 210),
        LinkType::Same => Color32::from_rgb(120, 200, 170),
        LinkType::Extensible => Color32::from_rgb(210, 130, 180),
    }
}

/// World-space radius; grows with the square root of the node's size weight.
pub(super) fn node_radius(size: u32) -> f32 {
    5.0 + ((size.max(1) as f32).sqrt() - 1.0) * 3.2
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dimming_keeps_some_alpha() {
        let dimmed = dim_color(Color32::from_rgb(200, 100, 50), 0.0);
        assert_eq!((dimmed.r(), dimmed.g(), dimmed.b()), (0, 0, 0));
        assert!(dimmed.a() > 0);
    }

    #[test]
    fn radius_grows_with_size() {
        assert_eq!(node_radius(0), node_radius(1));
        assert!(node_radius(16) > node_radius(4));
    }
}
