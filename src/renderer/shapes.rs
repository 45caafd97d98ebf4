//! Shape generation for 2D primitives
//!
//! Everything is emitted as a triangle list in screen pixels.

use glam::Vec2;
use std::f32::consts::{FRAC_PI_2, PI};

use super::vertex::Vertex;
use crate::sim::Rect;

/// Two triangles covering `rect`
pub fn rect(rect: &Rect, color: [f32; 4]) -> Vec<Vertex> {
    let (x0, y0, x1, y1) = (rect.x, rect.y, rect.right(), rect.bottom());
    vec![
        Vertex::new(x0, y0, color),
        Vertex::new(x1, y0, color),
        Vertex::new(x0, y1, color),
        Vertex::new(x0, y1, color),
        Vertex::new(x1, y0, color),
        Vertex::new(x1, y1, color),
    ]
}

/// Border of `thickness` drawn inside `r`
pub fn rect_outline(r: &Rect, color: [f32; 4], thickness: f32) -> Vec<Vertex> {
    let t = thickness.min(r.width / 2.0).min(r.height / 2.0);
    let mut vertices = Vec::with_capacity(24);
    vertices.extend(rect(&Rect::new(r.x, r.y, r.width, t), color));
    vertices.extend(rect(&Rect::new(r.x, r.bottom() - t, r.width, t), color));
    vertices.extend(rect(&Rect::new(r.x, r.y + t, t, r.height - 2.0 * t), color));
    vertices.extend(rect(
        &Rect::new(r.right() - t, r.y + t, t, r.height - 2.0 * t),
        color,
    ));
    vertices
}

/// Rectangle with quarter-circle corners; `roundness` in [0, 1] of the short side
pub fn rounded_rect(
    r: &Rect,
    roundness: f32,
    color: [f32; 4],
    corner_segments: u32,
) -> Vec<Vertex> {
    let radius = roundness.clamp(0.0, 1.0) * r.width.min(r.height) / 2.0;
    if radius <= 0.0 || corner_segments == 0 {
        return rect(r, color);
    }

    let mut vertices = Vec::with_capacity(18 + 12 * corner_segments as usize);
    // Centre column plus the two side strips between the corners
    vertices.extend(rect(
        &Rect::new(r.x + radius, r.y, r.width - 2.0 * radius, r.height),
        color,
    ));
    vertices.extend(rect(
        &Rect::new(r.x, r.y + radius, radius, r.height - 2.0 * radius),
        color,
    ));
    vertices.extend(rect(
        &Rect::new(r.right() - radius, r.y + radius, radius, r.height - 2.0 * radius),
        color,
    ));

    let corners = [
        (Vec2::new(r.x + radius, r.y + radius), PI),
        (Vec2::new(r.right() - radius, r.y + radius), PI + FRAC_PI_2),
        (Vec2::new(r.right() - radius, r.bottom() - radius), 0.0),
        (Vec2::new(r.x + radius, r.bottom() - radius), FRAC_PI_2),
    ];
    for (center, start) in corners {
        vertices.extend(fan(
            center,
            radius,
            start,
            FRAC_PI_2,
            color,
            color,
            corner_segments,
        ));
    }
    vertices
}

/// Triangle fan from `start` sweeping `span` radians
fn fan(
    center: Vec2,
    radius: f32,
    start: f32,
    span: f32,
    center_color: [f32; 4],
    edge_color: [f32; 4],
    segments: u32,
) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);
    for i in 0..segments {
        let theta1 = start + (i as f32 / segments as f32) * span;
        let theta2 = start + ((i + 1) as f32 / segments as f32) * span;

        vertices.push(Vertex::at(center, center_color));
        vertices.push(Vertex::at(center + radius * Vec2::from_angle(theta1), edge_color));
        vertices.push(Vertex::at(center + radius * Vec2::from_angle(theta2), edge_color));
    }
    vertices
}

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    fan(center, radius, 0.0, 2.0 * PI, color, color, segments)
}

/// Filled circle fading from `inner` at the centre to `outer` at the edge
pub fn circle_gradient(
    center: Vec2,
    radius: f32,
    inner: [f32; 4],
    outer: [f32; 4],
    segments: u32,
) -> Vec<Vertex> {
    fan(center, radius, 0.0, 2.0 * PI, inner, outer, segments)
}

/// Segment count that keeps circles smooth without wasting vertices
pub fn segments_for(radius: f32) -> u32 {
    (radius * 0.75).clamp(8.0, 48.0) as u32
}
