use crate::models::Point;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PointerId(pub u32);

/// A pointer event in canvas space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub pointer_id: PointerId,
    pub position: Point,
}

impl PointerEvent {
    pub fn new(pointer_id: PointerId, position: Point) -> Self {
        Self {
            pointer_id,
            position,
        }
    }

    /// Build from a raw client coordinate and the drawing surface's
    /// bounding-box origin
    pub fn from_client(pointer_id: PointerId, client: Point, surface_origin: Point) -> Self {
        Self::new(pointer_id, client.relative_to(surface_origin))
    }
}

/// Which gesture, if any, owns the pointer stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Capture {
    #[default]
    Idle,
    Drawing {
        pointer_id: PointerId,
    },
    Erasing {
        pointer_id: PointerId,
    },
}

impl Capture {
    pub fn is_active(&self) -> bool {
        !matches!(self, Capture::Idle)
    }

    /// True if this capture belongs to `pointer_id`
    pub fn owns(&self, pointer_id: PointerId) -> bool {
        match self {
            Capture::Idle => false,
            Capture::Drawing { pointer_id: owner } | Capture::Erasing { pointer_id: owner } => {
                *owner == pointer_id
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capture_ownership() {
        let capture = Capture::Erasing {
            pointer_id: PointerId(1),
        };
        assert!(capture.is_active());
        assert!(capture.owns(PointerId(1)));
        assert!(!capture.owns(PointerId(2)));
        assert!(!Capture::Idle.owns(PointerId(1)));
    }

    #[test]
    fn test_from_client_maps_into_canvas_space() {
        let event = PointerEvent::from_client(
            PointerId(7),
            Point::new(310.0, 220.0),
            Point::new(300.0, 200.0),
        );
        assert_eq!(event.position, Point::new(10.0, 20.0));
    }
}
