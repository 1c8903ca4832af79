//! Drop-target resolution for a drag in progress.
//!
//! Column areas win over task cards so that a task can be dropped into an
//! empty column, or below the last card of a column.

use std::cmp::Ordering;

use super::target::{DropTarget, DropTargetId, Point, Rect};

/// A drop target hit, with the value it was ranked by.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Collision {
    pub id: DropTargetId,
    pub value: f64,
}

/// Targets containing the pointer, nearest first.
///
/// Distance is the mean distance from the pointer to the target's corners.
pub fn pointer_within(pointer: Point, targets: &[DropTarget]) -> Vec<Collision> {
    let mut hits: Vec<Collision> = targets
        .iter()
        .filter(|t| t.rect.contains(pointer))
        .map(|t| {
            let total: f64 = t.rect.corners().iter().map(|c| c.distance(&pointer)).sum();
            Collision {
                id: t.id,
                value: total / 4.0,
            }
        })
        .collect();
    hits.sort_by(|a, b| a.value.partial_cmp(&b.value).unwrap_or(Ordering::Equal));
    hits
}

/// Targets overlapping the dragged rect, largest overlap ratio first.
pub fn rect_intersection(dragged: &Rect, targets: &[DropTarget]) -> Vec<Collision> {
    let mut hits: Vec<Collision> = targets
        .iter()
        .filter_map(|t| {
            let ratio = dragged.intersection_ratio(&t.rect);
            (ratio > 0.0).then_some(Collision {
                id: t.id,
                value: ratio,
            })
        })
        .collect();
    hits.sort_by(|a, b| b.value.partial_cmp(&a.value).unwrap_or(Ordering::Equal));
    hits
}

fn prefer_column(hits: &[Collision]) -> Option<DropTargetId> {
    hits.iter()
        .find(|c| c.id.is_column())
        .or_else(|| hits.first())
        .map(|c| c.id)
}

/// Resolve the drop target for the current pointer and dragged rect.
///
/// Pointer-containment hits take priority over rect-intersection hits;
/// within either kind a column target is preferred over a task target.
/// Returns `None` when nothing is hit.
pub fn column_first_collision(
    pointer: Option<Point>,
    dragged: &Rect,
    targets: &[DropTarget],
) -> Option<DropTargetId> {
    if let Some(pointer) = pointer {
        let hits = pointer_within(pointer, targets);
        if !hits.is_empty() {
            return prefer_column(&hits);
        }
    }
    let hits = rect_intersection(dragged, targets);
    prefer_column(&hits)
}
