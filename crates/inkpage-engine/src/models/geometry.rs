use std::fmt::Write;

/// A point in canvas space. Origin is the top-left corner of the drawing surface.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Map a raw input coordinate into the space of a surface whose
    /// bounding box starts at `origin`.
    pub fn relative_to(self, origin: Point) -> Point {
        Point::new(self.x - origin.x, self.y - origin.y)
    }

    pub fn distance_to(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Point::new(x, y)
    }
}

/// Build SVG-style path data: a move-to on the first point followed by a
/// line-to for every later point, in order. No smoothing.
///
/// ```
/// # use inkpage_engine::models::{Point, path_data};
/// let points = [Point::new(0.0, 0.0), Point::new(10.0, 0.0), Point::new(10.0, 10.0)];
/// assert_eq!(path_data(&points), "M 0,0 L 10,0 L 10,10");
/// ```
pub fn path_data(points: &[Point]) -> String {
    let mut d = String::new();
    for (index, point) in points.iter().enumerate() {
        if index > 0 {
            d.push(' ');
        }
        let verb = if index == 0 { 'M' } else { 'L' };
        // Writing into a String cannot fail
        let _ = write!(d, "{verb} {},{}", point.x, point.y);
    }
    d
}
