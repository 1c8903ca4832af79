use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tasky_core::TaskyError;

use crate::{ColumnId, TaskId};

/// Prefix distinguishing column drop areas from task cards in string ids.
pub const COLUMN_PREFIX: &str = "col-";

/// What a drop target stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DropTargetId {
    Column(ColumnId),
    Task(TaskId),
}

impl DropTargetId {
    pub fn is_column(&self) -> bool {
        matches!(self, Self::Column(_))
    }
}

impl fmt::Display for DropTargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Column(id) => write!(f, "{}{}", COLUMN_PREFIX, id),
            Self::Task(id) => write!(f, "{}", id),
        }
    }
}

impl FromStr for DropTargetId {
    type Err = TaskyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || TaskyError::Validation(format!("Invalid drop target: {s}"));
        match s.strip_prefix(COLUMN_PREFIX) {
            Some(rest) => rest.parse().map(Self::Column).map_err(|_| invalid()),
            None => s.parse().map(Self::Task).map_err(|_| invalid()),
        }
    }
}

impl Serialize for DropTargetId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DropTargetId {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Point) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Edges are inclusive.
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.left && point.x <= self.right() && point.y >= self.top && point.y <= self.bottom()
    }

    pub fn corners(&self) -> [Point; 4] {
        [
            Point::new(self.left, self.top),
            Point::new(self.right(), self.top),
            Point::new(self.left, self.bottom()),
            Point::new(self.right(), self.bottom()),
        ]
    }

    /// Overlap area divided by the union area; 0 when the rects do not overlap.
    pub fn intersection_ratio(&self, other: &Rect) -> f64 {
        let left = self.left.max(other.left);
        let top = self.top.max(other.top);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        if left >= right || top >= bottom {
            return 0.0;
        }
        let overlap = (right - left) * (bottom - top);
        let union = self.area() + other.area() - overlap;
        if union <= 0.0 {
            0.0
        } else {
            overlap / union
        }
    }
}

/// A droppable region registered for the current drag.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DropTarget {
    pub id: DropTargetId,
    pub rect: Rect,
}

impl DropTarget {
    pub fn column(id: ColumnId, rect: Rect) -> Self {
        Self {
            id: DropTargetId::Column(id),
            rect,
        }
    }

    pub fn task(id: TaskId, rect: Rect) -> Self {
        Self {
            id: DropTargetId::Task(id),
            rect,
        }
    }
}
