use super::algorithm_settings::CandidateRefinement;
use super::collision_result::{CollisionResult, ResultOrientation};
use super::collision_tasks::sphere_pair_tester::SpherePairTester;
use super::collision_tasks::sphere_triangle_tester::{CheckTriangle, SphereTriangleTester};
use crate::physics::collidables::collider::{ColliderKind, VertexPos};
use crate::physics::collidables::collider_shape::{ColliderShape, ShapeKind};

/// Primitive test run on each candidate collider pair. Side A is always a sphere.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NarrowPhaseTest {
    SpherePair,
    SphereTriangle,
}

impl NarrowPhaseTest {
    /// Picks the test for a sphere shape against a target of the given kind.
    #[inline(always)]
    pub fn for_target(target: ShapeKind) -> Self {
        match target {
            ShapeKind::PerVertex => NarrowPhaseTest::SpherePair,
            ShapeKind::PerTriangle => NarrowPhaseTest::SphereTriangle,
        }
    }
}

/// Choices fixed for one shape pair run: which primitive test, how results map back to the caller's ordering, and how
/// candidates are refined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollisionCheckStrategy {
    pub test: NarrowPhaseTest,
    pub orientation: ResultOrientation,
    pub refinement: CandidateRefinement,
}

impl CollisionCheckStrategy {
    /// Creates a strategy.
    #[inline(always)]
    pub fn new(test: NarrowPhaseTest, orientation: ResultOrientation, refinement: CandidateRefinement) -> Self {
        Self {
            test,
            orientation,
            refinement,
        }
    }
}

/// Everything a worker needs to test colliders of a sphere shape against colliders of a target shape.
///
/// Side A is the sphere (per-vertex) shape, side B is the target shape. Results carry A/B in that order; the sink
/// mirrors them afterwards if the run is swapped.
#[derive(Debug, Clone, Copy)]
pub struct CollisionCheckContext<'a> {
    pub vertices_a: &'a [VertexPos],
    pub shape_a: &'a ColliderShape,
    pub vertices_b: &'a [VertexPos],
    pub shape_b: &'a ColliderShape,
    pub strategy: CollisionCheckStrategy,
}

impl<'a> CollisionCheckContext<'a> {
    /// Creates a context, picking the primitive test from the target shape's kind.
    pub fn new(
        vertices_a: &'a [VertexPos],
        shape_a: &'a ColliderShape,
        vertices_b: &'a [VertexPos],
        shape_b: &'a ColliderShape,
        orientation: ResultOrientation,
        refinement: CandidateRefinement,
    ) -> Self {
        Self {
            vertices_a,
            shape_a,
            vertices_b,
            shape_b,
            strategy: CollisionCheckStrategy::new(
                NarrowPhaseTest::for_target(shape_b.kind()),
                orientation,
                refinement,
            ),
        }
    }

    /// Tests sphere collider `a` of shape A against collider `b` of shape B.
    ///
    /// # Returns
    ///
    /// * The contact with collider indices filled in, or `None` when the colliders do not touch or either collider is
    ///   not of the kind the strategy expects.
    pub fn check_collide(&self, a: usize, b: usize) -> Option<CollisionResult> {
        let ColliderKind::Point { vertex } = self.shape_a.collider(a).kind else {
            return None;
        };
        let sphere = self.vertices_a[vertex as usize];
        let radius = sphere.margin_multiplier() * self.shape_a.properties().margin;

        let result = match (self.strategy.test, self.shape_b.collider(b).kind) {
            (NarrowPhaseTest::SpherePair, ColliderKind::Point { vertex }) => {
                let other = self.vertices_b[vertex as usize];
                SpherePairTester::test(
                    sphere.pos(),
                    radius,
                    other.pos(),
                    other.margin_multiplier() * self.shape_b.properties().margin,
                )
            }
            (NarrowPhaseTest::SphereTriangle, ColliderKind::Triangle { vertices }) => {
                let triangle = self.check_triangle(vertices);
                SphereTriangleTester::test(sphere.pos(), radius, &triangle)
            }
            _ => None,
        }?;

        Some(CollisionResult {
            collider_a: a as u32,
            collider_b: b as u32,
            ..result
        })
    }

    /// Resolves a triangle collider of shape B. Margin and penetration are scaled by the mean multiplier of its corners.
    #[inline]
    fn check_triangle(&self, [i0, i1, i2]: [u32; 3]) -> CheckTriangle {
        let (p0, p1, p2) = (
            self.vertices_b[i0 as usize],
            self.vertices_b[i1 as usize],
            self.vertices_b[i2 as usize],
        );
        let multiplier = (p0.margin_multiplier() + p1.margin_multiplier() + p2.margin_multiplier()) / 3.0;
        let properties = self.shape_b.properties();
        CheckTriangle::new(
            p0.pos(),
            p1.pos(),
            p2.pos(),
            multiplier * properties.margin,
            multiplier * properties.penetration,
        )
    }
}
