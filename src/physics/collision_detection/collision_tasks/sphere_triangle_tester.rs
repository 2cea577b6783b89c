use crate::physics::collision_detection::collision_result::CollisionResult;
use glam::Vec3;

/// Triangle prepared for sphere tests: corners, unit normal, and the margin and penetration scaled for this triangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CheckTriangle {
    pub a: Vec3,
    pub b: Vec3,
    pub c: Vec3,
    /// Unit face normal. Points toward the front face when `penetration` is positive.
    pub normal: Vec3,
    pub margin: f32,
    /// Thickness behind the front face that still counts as contact. Zero means the triangle is two-sided.
    pub penetration: f32,
    valid: bool,
}

impl CheckTriangle {
    /// Prepares a triangle.
    ///
    /// A negative penetration flips the front face and is stored as its magnitude. Zero-area and non-finite triangles
    /// are kept but marked invalid.
    pub fn new(a: Vec3, b: Vec3, c: Vec3, margin: f32, penetration: f32) -> Self {
        let mut normal = (b - a).cross(c - a);
        let length = normal.length();
        let valid = a.is_finite()
            && b.is_finite()
            && c.is_finite()
            && margin.is_finite()
            && penetration.is_finite()
            && length > f32::EPSILON;
        if valid {
            normal /= length;
        }
        let mut penetration = if penetration.abs() < f32::EPSILON {
            0.0
        } else {
            penetration
        };
        if penetration < 0.0 {
            normal = -normal;
            penetration = -penetration;
        }
        Self {
            a,
            b,
            c,
            normal,
            margin,
            penetration,
            valid,
        }
    }

    /// Gets whether the triangle can take part in collision tests.
    #[inline(always)]
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Finds the point on the triangle closest to `p`.
    ///
    /// # Returns
    ///
    /// * The closest point and whether it lies strictly inside the face rather than on an edge or corner.
    pub fn closest_point(&self, p: Vec3) -> (Vec3, bool) {
        let (a, b, c) = (self.a, self.b, self.c);
        let ab = b - a;
        let ac = c - a;
        let ap = p - a;
        let d1 = ab.dot(ap);
        let d2 = ac.dot(ap);
        if d1 <= 0.0 && d2 <= 0.0 {
            return (a, false);
        }

        let bp = p - b;
        let d3 = ab.dot(bp);
        let d4 = ac.dot(bp);
        if d3 >= 0.0 && d4 <= d3 {
            return (b, false);
        }

        let vc = d1 * d4 - d3 * d2;
        if vc <= 0.0 && d1 >= 0.0 && d3 <= 0.0 {
            let v = d1 / (d1 - d3);
            return (a + ab * v, false);
        }

        let cp = p - c;
        let d5 = ab.dot(cp);
        let d6 = ac.dot(cp);
        if d6 >= 0.0 && d5 <= d6 {
            return (c, false);
        }

        let vb = d5 * d2 - d1 * d6;
        if vb <= 0.0 && d2 >= 0.0 && d6 <= 0.0 {
            let w = d2 / (d2 - d6);
            return (a + ac * w, false);
        }

        let va = d3 * d6 - d5 * d4;
        if va <= 0.0 && (d4 - d3) >= 0.0 && (d5 - d6) >= 0.0 {
            let w = (d4 - d3) / ((d4 - d3) + (d5 - d6));
            return (b + (c - b) * w, false);
        }

        let denominator = 1.0 / (va + vb + vc);
        let v = vb * denominator;
        let w = vc * denominator;
        (a + ab * v + ac * w, true)
    }
}

/// Pair tester for sphere vs triangle collisions.
pub struct SphereTriangleTester;

impl SphereTriangleTester {
    /// Tests a sphere against a triangle dilated by its margin.
    ///
    /// # Arguments
    ///
    /// * `center` - Center of the sphere.
    /// * `radius` - Radius of the sphere, margin already applied.
    /// * `triangle` - Prepared triangle.
    ///
    /// # Returns
    ///
    /// * A contact with side A on the sphere and side B on the triangle, or `None` for invalid triangles, spheres out
    ///   of reach, spheres behind a one-sided triangle, and any non-finite outcome.
    pub fn test(center: Vec3, radius: f32, triangle: &CheckTriangle) -> Option<CollisionResult> {
        if !triangle.is_valid() || !center.is_finite() || !radius.is_finite() {
            return None;
        }
        let radius_with_margin = radius + triangle.margin;
        let mut normal = triangle.normal;
        let mut distance_from_plane = (center - triangle.a).dot(normal);
        if triangle.penetration > 0.0 {
            if distance_from_plane < -triangle.penetration {
                return None;
            }
        } else if distance_from_plane < 0.0 {
            distance_from_plane = -distance_from_plane;
            normal = -normal;
        }
        if distance_from_plane >= radius_with_margin {
            return None;
        }

        let (closest, is_face) = triangle.closest_point(center);
        let (separation, outward) = if is_face {
            (distance_from_plane, normal)
        } else {
            let offset = center - closest;
            let distance = offset.length();
            if distance >= radius_with_margin || distance <= f32::EPSILON {
                return None;
            }
            (distance, offset / distance)
        };

        let result = CollisionResult {
            pos_a: center - outward * radius,
            pos_b: closest + outward * triangle.margin,
            normal_on_b: -outward,
            depth: separation - radius_with_margin,
            collider_a: 0,
            collider_b: 0,
        };
        if result.pos_a.is_finite()
            && result.pos_b.is_finite()
            && result.normal_on_b.is_finite()
            && result.depth.is_finite()
        {
            Some(result)
        } else {
            None
        }
    }
}
