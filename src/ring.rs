//! Progress ring geometry.
//!
//! The ring is drawn as a stroked circle whose dash offset hides the
//! elapsed share of the circumference: offset `0` is a full ring, offset
//! `RING_CIRCUMFERENCE` an empty one.

use crate::surface::{Node, Selector, Surface};
use std::f64::consts::PI;

pub const RING_RADIUS: f64 = 72.0;
pub const RING_CIRCUMFERENCE: f64 = 2.0 * PI * RING_RADIUS;
pub const RING_STROKE: f64 = 8.0;
const RING_SIZE: f64 = 2.0 * RING_RADIUS + 2.0 * RING_STROKE;
const RING_CENTER: f64 = RING_SIZE / 2.0;

pub const FILL_CLASS: &str = "progress-ring-fill";
const GRADIENT_ID: &str = "ring-gradient";

/// Dash offset for `remaining` out of `total` seconds.
///
/// Not clamped: `remaining > total` gives a negative offset. A zero total
/// renders as an empty ring.
pub fn ring_offset(remaining: u32, total: u32) -> f64 {
    if total == 0 {
        return RING_CIRCUMFERENCE;
    }
    RING_CIRCUMFERENCE * (1.0 - f64::from(remaining) / f64::from(total))
}

/// Filled share of the ring for an offset, clamped for widgets that need it.
pub fn ring_fill_ratio(offset: f64) -> f64 {
    (1.0 - offset / RING_CIRCUMFERENCE).clamp(0.0, 1.0)
}

fn circle(class: &str) -> Node {
    Node::new("circle")
        .class(class)
        .attr("cx", RING_CENTER.to_string())
        .attr("cy", RING_CENTER.to_string())
        .attr("r", RING_RADIUS.to_string())
        .attr("fill", "none")
        .attr("stroke-width", RING_STROKE.to_string())
}

pub fn progress_ring(remaining: u32, total: u32) -> Node {
    let gradient = Node::new("linearGradient")
        .with_id(GRADIENT_ID)
        .attr("x1", "0%")
        .attr("y1", "0%")
        .attr("x2", "100%")
        .attr("y2", "100%")
        .child(Node::new("stop").attr("offset", "0%").attr("stop-color", "#F59E0B"))
        .child(Node::new("stop").attr("offset", "100%").attr("stop-color", "#FB923C"));

    Node::new("svg")
        .class("progress-ring")
        .attr("width", RING_SIZE.to_string())
        .attr("height", RING_SIZE.to_string())
        .attr("viewBox", format!("0 0 {RING_SIZE} {RING_SIZE}"))
        .child(Node::new("defs").child(gradient))
        .child(circle("progress-ring-bg").attr("stroke", "rgba(255, 255, 255, 0.1)"))
        .child(
            circle(FILL_CLASS)
                .attr("stroke", format!("url(#{GRADIENT_ID})"))
                .attr("stroke-linecap", "round")
                .attr("stroke-dasharray", RING_CIRCUMFERENCE.to_string())
                .attr("stroke-dashoffset", ring_offset(remaining, total).to_string())
                .attr("transform", format!("rotate(-90 {RING_CENTER} {RING_CENTER})")),
        )
}

pub fn progress_ring_svg(remaining: u32, total: u32) -> String {
    progress_ring(remaining, total).to_markup()
}

/// Moves the fill ring of an already mounted surface. No-op without one.
pub fn update_progress_ring(surface: &mut Surface, remaining: u32, total: u32) {
    surface.set_attr(
        &Selector::class(FILL_CLASS),
        "stroke-dashoffset",
        ring_offset(remaining, total).to_string(),
    );
}

/// Offset currently set on the mounted fill ring.
pub fn mounted_offset(surface: &Surface) -> Option<f64> {
    surface
        .attr(&Selector::class(FILL_CLASS), "stroke-dashoffset")?
        .parse()
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn full_and_empty_ring() {
        assert!(ring_offset(1500, 1500).abs() < EPS);
        assert!((ring_offset(0, 1500) - RING_CIRCUMFERENCE).abs() < EPS);
        assert!((ring_offset(750, 1500) - RING_CIRCUMFERENCE * 0.5).abs() < EPS);
    }

    #[test]
    fn zero_total_is_empty_ring() {
        assert!((ring_offset(0, 0) - RING_CIRCUMFERENCE).abs() < EPS);
        assert!((ring_offset(10, 0) - RING_CIRCUMFERENCE).abs() < EPS);
    }

    #[test]
    fn offset_decreases_as_remaining_grows() {
        for total in [1, 7, 60, 1500, 3600] {
            let mut previous = f64::INFINITY;
            for remaining in 0..=total {
                let offset = ring_offset(remaining, total);
                assert!(offset < previous, "total={total} remaining={remaining}");
                previous = offset;
            }
        }
    }

    #[test]
    fn overfull_snapshot_is_not_clamped() {
        assert!(ring_offset(2000, 1000) < 0.0);
        assert_eq!(ring_fill_ratio(ring_offset(2000, 1000)), 1.0);
    }

    #[test]
    fn svg_carries_both_circles_and_gradient() {
        let svg = progress_ring_svg(750, 1500);
        assert!(svg.starts_with("<svg class=\"progress-ring\""));
        assert!(svg.contains("class=\"progress-ring-bg\""));
        assert!(svg.contains("class=\"progress-ring-fill\""));
        assert!(svg.contains("<linearGradient id=\"ring-gradient\""));
        assert!(svg.contains(&format!("stroke-dasharray=\"{RING_CIRCUMFERENCE}\"")));
        assert!(svg.contains(&format!("stroke-dashoffset=\"{}\"", RING_CIRCUMFERENCE * 0.5)));
        assert_eq!(svg.matches(&format!("r=\"{RING_RADIUS}\"")).count(), 2);
    }

    #[test]
    fn update_sets_offset_on_mounted_fill() {
        let mut surface = Surface::new();
        surface.replace_children(vec![Node::new("svg").child(Node::new("circle").class(FILL_CLASS))]);
        update_progress_ring(&mut surface, 750, 1500);
        let offset = mounted_offset(&surface).unwrap();
        assert!((offset - RING_CIRCUMFERENCE * 0.5).abs() < 1e-5);

        update_progress_ring(&mut surface, 0, 0);
        assert!((mounted_offset(&surface).unwrap() - RING_CIRCUMFERENCE).abs() < 1e-5);
    }

    #[test]
    fn update_without_fill_is_noop() {
        let mut surface = Surface::new();
        update_progress_ring(&mut surface, 750, 1500);
        assert!(surface.is_empty());
        assert_eq!(mounted_offset(&surface), None);
    }
}
