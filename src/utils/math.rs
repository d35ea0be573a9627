//! # Game Mathematics
//!
//! Small 2D vector type and convex polygon overlap used by the simulation.
//!
//! Angles are expressed in degrees, counter-clockwise from the positive x
//! axis, and normalized to `[0, 360)`. The world frame is y-up.

use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

/// A 2D float vector used for positions, velocities and accelerations.
///
/// # Examples
///
/// ```
/// use dungeonlife::Vector2;
///
/// let v = Vector2::new(3.0, 4.0);
/// assert_eq!(v.length(), 5.0);
/// assert_eq!(Vector2::from_angle(90.0, 2.0).y.round(), 2.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector2 {
    pub x: f32,
    pub y: f32,
}

impl Vector2 {
    /// The zero vector.
    pub const ZERO: Vector2 = Vector2 { x: 0.0, y: 0.0 };

    /// Creates a new vector.
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Builds a vector of the given length pointing at `degrees`.
    pub fn from_angle(degrees: f32, length: f32) -> Self {
        let radians = degrees.to_radians();
        Self::new(length * radians.cos(), length * radians.sin())
    }

    /// Euclidean length.
    pub fn length(self) -> f32 {
        self.length_squared().sqrt()
    }

    /// Squared length, cheaper when only comparing.
    pub fn length_squared(self) -> f32 {
        self.x * self.x + self.y * self.y
    }

    /// Distance to another point.
    pub fn distance(self, other: Vector2) -> f32 {
        (other - self).length()
    }

    /// Returns true if both components are exactly zero.
    pub fn is_zero(self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }

    /// Heading of this vector in degrees, in `[0, 360)`.
    ///
    /// The zero vector reports 0°.
    pub fn angle(self) -> f32 {
        let degrees = self.y.atan2(self.x).to_degrees();
        if degrees < 0.0 {
            degrees + 360.0
        } else {
            degrees
        }
    }

    /// Returns this vector rescaled to `length`, keeping its heading.
    ///
    /// The zero vector stays zero.
    pub fn with_length(self, length: f32) -> Self {
        let current = self.length();
        if current == 0.0 {
            return Self::ZERO;
        }
        self * (length / current)
    }

    /// Returns a vector of the same length pointing at `degrees`.
    pub fn with_angle(self, degrees: f32) -> Self {
        Self::from_angle(degrees, self.length())
    }

    /// Rotates counter-clockwise by `degrees`.
    pub fn rotated(self, degrees: f32) -> Self {
        let (sin, cos) = degrees.to_radians().sin_cos();
        Self::new(self.x * cos - self.y * sin, self.x * sin + self.y * cos)
    }

    /// Dot product.
    pub fn dot(self, other: Vector2) -> f32 {
        self.x * other.x + self.y * other.y
    }
}

impl Add for Vector2 {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self::new(self.x + other.x, self.y + other.y)
    }
}

impl AddAssign for Vector2 {
    fn add_assign(&mut self, other: Self) {
        self.x += other.x;
        self.y += other.y;
    }
}

impl Sub for Vector2 {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self::new(self.x - other.x, self.y - other.y)
    }
}

impl SubAssign for Vector2 {
    fn sub_assign(&mut self, other: Self) {
        self.x -= other.x;
        self.y -= other.y;
    }
}

impl Mul<f32> for Vector2 {
    type Output = Self;

    fn mul(self, scalar: f32) -> Self {
        Self::new(self.x * scalar, self.y * scalar)
    }
}

impl Neg for Vector2 {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub min: Vector2,
    pub max: Vector2,
}

impl Rect {
    /// Returns true if the two boxes share interior area.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.min.x < other.max.x
            && other.min.x < self.max.x
            && self.min.y < other.max.y
            && other.min.y < self.max.y
    }
}

/// A convex polygon given by its vertices in order.
///
/// Actors keep their hit polygon in local space and translate it to their
/// current position before testing overlap.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Polygon {
    pub vertices: Vec<Vector2>,
}

impl Polygon {
    /// Creates a polygon from its vertices.
    pub fn new(vertices: Vec<Vector2>) -> Self {
        Self { vertices }
    }

    /// Axis-aligned rectangle polygon with its lower-left corner at `origin`.
    pub fn rectangle(origin: Vector2, width: f32, height: f32) -> Self {
        Self::new(vec![
            origin,
            origin + Vector2::new(width, 0.0),
            origin + Vector2::new(width, height),
            origin + Vector2::new(0.0, height),
        ])
    }

    /// Returns a copy moved by `offset`.
    pub fn translated(&self, offset: Vector2) -> Polygon {
        Polygon::new(self.vertices.iter().map(|v| *v + offset).collect())
    }

    /// Bounding box, or `None` for an empty polygon.
    pub fn bounding_box(&self) -> Option<Rect> {
        let first = *self.vertices.first()?;
        let mut rect = Rect {
            min: first,
            max: first,
        };
        for v in &self.vertices[1..] {
            rect.min.x = rect.min.x.min(v.x);
            rect.min.y = rect.min.y.min(v.y);
            rect.max.x = rect.max.x.max(v.x);
            rect.max.y = rect.max.y.max(v.y);
        }
        Some(rect)
    }

    /// Separating-axis overlap test for convex polygons.
    ///
    /// Polygons that merely touch along an edge do not overlap. A bounding
    /// box rejection runs first.
    pub fn overlaps(&self, other: &Polygon) -> bool {
        let (Some(a), Some(b)) = (self.bounding_box(), other.bounding_box()) else {
            return false;
        };
        if !a.overlaps(&b) {
            return false;
        }
        if self.vertices.len() < 3 || other.vertices.len() < 3 {
            return false;
        }

        self.edge_normals()
            .chain(other.edge_normals())
            .all(|axis| {
                let (min_a, max_a) = self.project(axis);
                let (min_b, max_b) = other.project(axis);
                min_a < max_b && min_b < max_a
            })
    }

    fn edge_normals(&self) -> impl Iterator<Item = Vector2> + '_ {
        let n = self.vertices.len();
        (0..n).map(move |i| {
            let edge = self.vertices[(i + 1) % n] - self.vertices[i];
            Vector2::new(-edge.y, edge.x)
        })
    }

    fn project(&self, axis: Vector2) -> (f32, f32) {
        self.vertices
            .iter()
            .map(|v| v.dot(axis))
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), p| {
                (lo.min(p), hi.max(p))
            })
    }
}
