pub mod collision;
pub mod controller;
pub mod target;

pub use collision::{column_first_collision, pointer_within, rect_intersection, Collision};
pub use controller::{DragController, DragPhase, MoveIntent};
pub use target::{DropTarget, DropTargetId, Point, Rect, COLUMN_PREFIX};
