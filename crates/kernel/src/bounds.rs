use glam::Vec3;

/// Axis-aligned bounding box, derived on demand and never stored.
///
/// The box is the untransformed local cuboid re-centered at the body's
/// current position. Body orientation is ignored: bodies spin, their
/// collision bounds do not. This is a deliberate simplification carried over
/// from the observed behavior, not an oversight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn from_center_half_extents(center: Vec3, half_extents: Vec3) -> Self {
        Self {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    /// Interval overlap on all three axes.
    ///
    /// Closed-interval convention: boxes that exactly share a boundary plane
    /// count as overlapping. Applied consistently so the collision pass stays
    /// deterministic.
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x
            && other.min.x <= self.max.x
            && self.min.y <= other.max.y
            && other.min.y <= self.max.y
            && self.min.z <= other.max.z
            && other.min.z <= self.max.z
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cube_at(x: f32, half: f32) -> Aabb {
        Aabb::from_center_half_extents(Vec3::new(x, 0.0, 0.0), Vec3::splat(half))
    }

    #[test]
    fn corners_from_center() {
        let b = Aabb::from_center_half_extents(Vec3::new(1.0, 2.0, 3.0), Vec3::splat(0.5));
        assert_eq!(b.min, Vec3::new(0.5, 1.5, 2.5));
        assert_eq!(b.max, Vec3::new(1.5, 2.5, 3.5));
    }

    #[test]
    fn overlapping_boxes_intersect() {
        let a = cube_at(0.0, 0.5);
        let b = cube_at(0.4, 0.5);
        assert!(a.intersects(&b));
    }

    #[test]
    fn disjoint_boxes_do_not_intersect() {
        let a = cube_at(0.0, 0.5);
        let b = cube_at(2.0, 0.5);
        assert!(!a.intersects(&b));
        // Disjoint on one axis is enough
        let c = Aabb::from_center_half_extents(Vec3::new(0.0, 5.0, 0.0), Vec3::splat(0.5));
        assert!(!a.intersects(&c));
    }

    #[test]
    fn intersection_is_symmetric() {
        let cases = [
            (cube_at(0.0, 0.5), cube_at(0.3, 0.5)),
            (cube_at(0.0, 0.5), cube_at(1.0, 0.5)),
            (cube_at(0.0, 0.5), cube_at(5.0, 0.5)),
            (cube_at(-1.0, 2.0), cube_at(0.5, 0.1)),
        ];
        for (a, b) in cases {
            assert_eq!(a.intersects(&b), b.intersects(&a));
        }
    }

    #[test]
    fn touching_boxes_count_as_overlapping() {
        // a.max.x == b.min.x exactly, all other axes overlapping
        let a = cube_at(0.0, 0.5);
        let b = cube_at(1.0, 0.5);
        assert!(a.intersects(&b));
        assert!(b.intersects(&a));
    }

    #[test]
    fn contained_box_intersects() {
        let outer = cube_at(0.0, 2.0);
        let inner = cube_at(0.1, 0.2);
        assert!(outer.intersects(&inner));
        assert!(inner.intersects(&outer));
    }
}
