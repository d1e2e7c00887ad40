//! Axis-Aligned Bounding Boxes
//!
//! The uniform overlap primitive for the whole simulation: maze walls,
//! door and hazard volumes, the goal and midpoint volumes, and the
//! player body are all tested as axis-aligned boxes.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// An axis-aligned box stored as min/max corners.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    /// Minimum corner.
    pub min: Vec3,
    /// Maximum corner.
    pub max: Vec3,
}

impl Aabb {
    /// Build a box from its center and full extents.
    pub fn from_center_size(center: Vec3, size: Vec3) -> Self {
        let half = size * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Build the bounding cube of a sphere.
    pub fn from_sphere(center: Vec3, radius: f32) -> Self {
        Self::from_center_size(center, Vec3::splat(radius * 2.0))
    }

    /// Center of the box.
    #[inline]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Half-extents along each axis.
    #[inline]
    pub fn half_extents(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }

    /// Return this box grown by `margin` on every face.
    ///
    /// Used to make overlap tests forgiving (goal detection, door
    /// footprints) the same way on every call site.
    pub fn expanded(&self, margin: f32) -> Self {
        let m = Vec3::splat(margin);
        Self {
            min: self.min - m,
            max: self.max + m,
        }
    }

    /// Do two boxes overlap?
    #[inline]
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
            && self.min.z <= other.max.z
            && self.max.z >= other.min.z
    }

    /// Is a point inside (or on the surface of) the box?
    #[inline]
    pub fn contains_point(&self, p: Vec3) -> bool {
        p.x >= self.min.x
            && p.x <= self.max.x
            && p.y >= self.min.y
            && p.y <= self.max.y
            && p.z >= self.min.z
            && p.z <= self.max.z
    }

    /// Penetration depth along each axis, assuming the boxes overlap.
    ///
    /// Each component is the smaller of the two one-sided overlaps on
    /// that axis; the minimum component identifies the collision
    /// normal axis.
    pub fn overlap_depths(&self, other: &Aabb) -> Vec3 {
        Vec3::new(
            (self.max.x - other.min.x).min(other.max.x - self.min.x),
            (self.max.y - other.min.y).min(other.max.y - self.min.y),
            (self.max.z - other.min.z).min(other.max.z - self.min.z),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intersects() {
        let a = Aabb::from_center_size(Vec3::ZERO, Vec3::splat(2.0));
        let b = Aabb::from_center_size(Vec3::new(1.5, 0.0, 0.0), Vec3::splat(2.0));
        let c = Aabb::from_center_size(Vec3::new(3.0, 0.0, 0.0), Vec3::splat(2.0));

        assert!(a.intersects(&b));
        assert!(b.intersects(&a));
        assert!(!a.intersects(&c));
    }

    #[test]
    fn test_touching_boxes_intersect() {
        let a = Aabb::from_center_size(Vec3::ZERO, Vec3::splat(2.0));
        let b = Aabb::from_center_size(Vec3::new(2.0, 0.0, 0.0), Vec3::splat(2.0));
        assert!(a.intersects(&b));
    }

    #[test]
    fn test_contains_point() {
        let a = Aabb::from_center_size(Vec3::ZERO, Vec3::splat(2.0));
        assert!(a.contains_point(Vec3::new(0.5, -0.5, 0.9)));
        assert!(!a.contains_point(Vec3::new(1.1, 0.0, 0.0)));
    }

    #[test]
    fn test_overlap_depths_min_axis() {
        let a = Aabb::from_center_size(Vec3::ZERO, Vec3::splat(2.0));
        // Offset mostly along x: x overlap should be the smallest
        let b = Aabb::from_center_size(Vec3::new(1.8, 0.2, 0.1), Vec3::splat(2.0));
        let depths = a.overlap_depths(&b);

        assert!(depths.x < depths.y);
        assert!(depths.x < depths.z);
        assert!((depths.x - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_expanded() {
        let a = Aabb::from_center_size(Vec3::ZERO, Vec3::splat(2.0));
        let e = a.expanded(0.5);
        assert_eq!(e.min, Vec3::splat(-1.5));
        assert_eq!(e.max, Vec3::splat(1.5));
    }
}
