use crate::physics::collision_detection::collision_result::CollisionResult;
use glam::Vec3;

/// Pair tester for sphere vs sphere collisions.
pub struct SpherePairTester;

impl SpherePairTester {
    /// Tests two spheres for overlap.
    ///
    /// # Arguments
    ///
    /// * `center_a` - Center of sphere A.
    /// * `radius_a` - Radius of sphere A, margin already applied.
    /// * `center_b` - Center of sphere B.
    /// * `radius_b` - Radius of sphere B, margin already applied.
    ///
    /// # Returns
    ///
    /// * A contact with its normal pointing from A to B and a negative depth, or `None` when the spheres are apart,
    ///   share a center, or any input is non-finite. Collider indices are left at zero for the caller to fill in.
    #[inline(always)]
    pub fn test(center_a: Vec3, radius_a: f32, center_b: Vec3, radius_b: f32) -> Option<CollisionResult> {
        let offset = center_b - center_a;
        let distance = offset.length();
        let bound = radius_a + radius_b;
        // NaN fails both comparisons and is rejected here as well.
        if !(distance < bound) || !(distance > f32::EPSILON) {
            return None;
        }
        let normal = offset / distance;
        let result = CollisionResult {
            pos_a: center_a + normal * radius_a,
            pos_b: center_b - normal * radius_b,
            normal_on_b: normal,
            depth: distance - bound,
            collider_a: 0,
            collider_b: 0,
        };
        if result.pos_a.is_finite() && result.pos_b.is_finite() && result.depth.is_finite() {
            Some(result)
        } else {
            None
        }
    }
}
