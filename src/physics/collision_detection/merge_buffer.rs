use super::collision_result::CollisionResult;
use crate::physics::collidables::collider_shape::ColliderShape;
use crate::physics::skinned_mesh_body::SkinnedMeshBody;
use glam::Vec3;

/// Weighted accumulation of primitive contacts for one (bone of A, bone of B) pair.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MergeCell {
    /// Sum of the squared contact weights.
    pub weight: f32,
    /// Sum of contact normals, each scaled by its weight cubed. Carries the sign of the depth.
    pub normal: Vec3,
    /// Sum of side A positions, each scaled by its squared weight.
    pub pos_a: Vec3,
    /// Sum of side B positions, each scaled by its squared weight.
    pub pos_b: Vec3,
}

/// Dense grid of merge cells indexed by (bone of A, bone of B).
#[derive(Debug, Clone, Default)]
pub struct MergeBuffer {
    cells: Vec<MergeCell>,
    bone_count_a: usize,
    bone_count_b: usize,
}

impl MergeBuffer {
    /// Creates an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resizes the grid to `bone_count_a * bone_count_b` cells and zeroes every cell.
    pub fn alloc(&mut self, bone_count_a: usize, bone_count_b: usize) {
        self.bone_count_a = bone_count_a;
        self.bone_count_b = bone_count_b;
        self.cells.clear();
        self.cells
            .resize(bone_count_a * bone_count_b, MergeCell::default());
    }

    /// Gets the number of bones on side A.
    #[inline(always)]
    pub fn bone_count_a(&self) -> usize {
        self.bone_count_a
    }

    /// Gets the number of bones on side B.
    #[inline(always)]
    pub fn bone_count_b(&self) -> usize {
        self.bone_count_b
    }

    /// Gets the cell of a bone pair.
    #[inline(always)]
    pub fn get(&self, bone_a: usize, bone_b: usize) -> &MergeCell {
        &self.cells[bone_a * self.bone_count_b + bone_b]
    }

    #[inline(always)]
    fn get_mut(&mut self, bone_a: usize, bone_b: usize) -> &mut MergeCell {
        &mut self.cells[bone_a * self.bone_count_b + bone_b]
    }

    /// Accumulates a run's contacts into the cells of the bones influencing each contact's colliders.
    ///
    /// Contacts must be ordered deepest first. Accumulation stops at the first contact that is not penetrating, and
    /// also at the first contact whose colliders are both rigid (flexibility below epsilon): the rest of the list is
    /// abandoned in that case, not just the one contact.
    ///
    /// Each qualifying contact adds into the cell of every pair of bones whose influence weight exceeds that bone's
    /// threshold, unless both bones are kinematic. With `w = flexible * depth`, a cell gains `w²` of weight, `normal *
    /// w³` of normal, and each position scaled by `w²`.
    ///
    /// # Arguments
    ///
    /// * `body_a` - Body owning `shape_a`.
    /// * `shape_a` - Shape on side A of the contacts.
    /// * `body_b` - Body owning `shape_b`.
    /// * `shape_b` - Shape on side B of the contacts.
    /// * `contacts` - Contacts of the run, in the caller's A/B ordering.
    pub fn do_merge(
        &mut self,
        body_a: &SkinnedMeshBody,
        shape_a: &ColliderShape,
        body_b: &SkinnedMeshBody,
        shape_b: &ColliderShape,
        contacts: &[CollisionResult],
    ) {
        let bones_a = body_a.skinned_bones();
        let bones_b = body_b.skinned_bones();
        for contact in contacts {
            if contact.depth >= -f32::EPSILON {
                break;
            }
            let collider_a = contact.collider_a as usize;
            let collider_b = contact.collider_b as usize;
            let flexible = shape_a
                .collider(collider_a)
                .flexible
                .max(shape_b.collider(collider_b).flexible);
            if flexible < f32::EPSILON {
                return;
            }

            let w = flexible * contact.depth;
            let w2 = w * w;
            for influence_a in shape_a.bone_influences(collider_a) {
                let bone_a = &bones_a[influence_a.bone as usize];
                if influence_a.weight <= bone_a.weight_threshold {
                    continue;
                }
                for influence_b in shape_b.bone_influences(collider_b) {
                    let bone_b = &bones_b[influence_b.bone as usize];
                    if influence_b.weight <= bone_b.weight_threshold {
                        continue;
                    }
                    if bone_a.is_kinematic && bone_b.is_kinematic {
                        continue;
                    }
                    let cell = self.get_mut(influence_a.bone as usize, influence_b.bone as usize);
                    cell.weight += w2;
                    cell.normal += contact.normal_on_b * w * w2;
                    cell.pos_a += contact.pos_a * w2;
                    cell.pos_b += contact.pos_b * w2;
                }
            }
        }
    }
}
