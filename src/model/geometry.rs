//! Image-space and world-space point types.

use serde::{Deserialize, Serialize};

/// A point in image (pixel) coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point2 {
    /// Column coordinate
    pub x: f64,
    /// Row coordinate
    pub y: f64,
}

impl Point2 {
    /// Create a new image-space point.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Return this point shifted by the given offsets.
    pub fn offset(&self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

/// A point in patient (world) coordinates.
///
/// Serialized as a `[x, y, z]` triple to match the rendering layer's vectors.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "[f64; 3]", into = "[f64; 3]")]
pub struct Point3 {
    /// X component
    pub x: f64,
    /// Y component
    pub y: f64,
    /// Z component
    pub z: f64,
}

impl Point3 {
    /// Create a new world-space point.
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Components as an array.
    pub fn to_array(self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    /// Component-wise difference `self - other`.
    pub fn sub(&self, other: &Point3) -> Point3 {
        Point3::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }

    /// `self + direction * scale`.
    pub fn scale_and_add(&self, direction: &Point3, scale: f64) -> Point3 {
        Point3::new(
            self.x + direction.x * scale,
            self.y + direction.y * scale,
            self.z + direction.z * scale,
        )
    }

    /// Dot product.
    pub fn dot(&self, other: &Point3) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Cross product.
    pub fn cross(&self, other: &Point3) -> Point3 {
        Point3::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    /// Euclidean length.
    pub fn length(&self) -> f64 {
        self.dot(self).sqrt()
    }

    /// Euclidean distance to another point.
    pub fn distance_to(&self, other: &Point3) -> f64 {
        self.sub(other).length()
    }
}

impl From<[f64; 3]> for Point3 {
    fn from([x, y, z]: [f64; 3]) -> Self {
        Self { x, y, z }
    }
}

impl From<Point3> for [f64; 3] {
    fn from(point: Point3) -> Self {
        point.to_array()
    }
}

/// Perimeter of a polyline, including the closing segment when `closed`.
pub fn polyline_length(points: &[Point3], closed: bool) -> f64 {
    let mut length: f64 = points.windows(2).map(|w| w[0].distance_to(&w[1])).sum();
    if closed && points.len() > 2 {
        length += points[points.len() - 1].distance_to(&points[0]);
    }
    length
}

/// Area enclosed by a planar polygon in 3D.
///
/// Uses the vector form of the shoelace formula, so the result does not
/// depend on the orientation of the plane.
pub fn planar_polygon_area(vertices: &[Point3]) -> f64 {
    if vertices.len() < 3 {
        return 0.0;
    }

    let mut sum = Point3::default();
    let n = vertices.len();
    for i in 0..n {
        let j = (i + 1) % n;
        let c = vertices[i].cross(&vertices[j]);
        sum = Point3::new(sum.x + c.x, sum.y + c.y, sum.z + c.z);
    }
    sum.length() / 2.0
}
