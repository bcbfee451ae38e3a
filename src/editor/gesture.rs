//! Direct-manipulation gesture state
//!
//! One gesture at a time, system-wide. Drag moves a field, resize grows it
//! from its top-left anchor; neither can run while the other is active.

use crate::geometry::{BrowserRect, Point, Size};
use crate::types::FieldId;

#[derive(Debug, Clone, PartialEq, Default)]
pub enum Gesture {
    #[default]
    Idle,
    Dragging {
        field: FieldId,
        /// Pointer position minus field origin at grab time.
        anchor_offset: Point,
    },
    Resizing {
        field: FieldId,
        pointer_origin: Point,
        anchor_size: Size,
    },
}

impl Gesture {
    pub fn drag(field: FieldId, pointer: Point, rect: &BrowserRect) -> Self {
        let origin = rect.origin();
        Gesture::Dragging {
            field,
            anchor_offset: Point::new(pointer.x - origin.x, pointer.y - origin.y),
        }
    }

    pub fn resize(field: FieldId, pointer: Point, rect: &BrowserRect) -> Self {
        Gesture::Resizing {
            field,
            pointer_origin: pointer,
            anchor_size: rect.size(),
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, Gesture::Idle)
    }

    pub fn field(&self) -> Option<&FieldId> {
        match self {
            Gesture::Idle => None,
            Gesture::Dragging { field, .. } | Gesture::Resizing { field, .. } => Some(field),
        }
    }

    /// Applies a pointer move to `rect`. Drags only touch the position and
    /// never go negative; resizes only touch the size and respect `min`.
    pub fn apply(&self, pointer: Point, rect: &mut BrowserRect, min: Size) {
        match self {
            Gesture::Idle => {}
            Gesture::Dragging { anchor_offset, .. } => {
                rect.x = (pointer.x - anchor_offset.x).max(0.0);
                rect.y = (pointer.y - anchor_offset.y).max(0.0);
            }
            Gesture::Resizing { pointer_origin, anchor_size, .. } => {
                rect.width = (anchor_size.width + pointer.x - pointer_origin.x).max(min.width);
                rect.height = (anchor_size.height + pointer.y - pointer_origin.y).max(min.height);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MIN: Size = Size::new(50.0, 30.0);

    #[test]
    fn test_drag_keeps_grab_offset() {
        let mut rect = BrowserRect::new(100.0, 100.0, 150.0, 40.0);
        let gesture = Gesture::drag(FieldId::new("f"), Point::new(110.0, 105.0), &rect);

        gesture.apply(Point::new(210.0, 305.0), &mut rect, MIN);
        assert_eq!(rect, BrowserRect::new(200.0, 300.0, 150.0, 40.0));

        gesture.apply(Point::new(0.0, 0.0), &mut rect, MIN);
        assert_eq!((rect.x, rect.y), (0.0, 0.0));
    }

    #[test]
    fn test_resize_is_anchored_and_floored() {
        let mut rect = BrowserRect::new(100.0, 100.0, 150.0, 40.0);
        let gesture = Gesture::resize(FieldId::new("f"), Point::new(250.0, 140.0), &rect);

        gesture.apply(Point::new(300.0, 160.0), &mut rect, MIN);
        assert_eq!(rect, BrowserRect::new(100.0, 100.0, 200.0, 60.0));

        gesture.apply(Point::new(0.0, 0.0), &mut rect, MIN);
        assert_eq!(rect, BrowserRect::new(100.0, 100.0, 50.0, 30.0));
    }
}
