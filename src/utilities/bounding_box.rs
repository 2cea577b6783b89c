use glam::Vec3;

/// Provides simple axis-aligned bounding box functionality.
///
/// The default box is empty: its minimum sits at `f32::MAX` and its maximum at `f32::MIN`, so it intersects nothing
/// and merging anything into it yields that thing.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    /// Location with the lowest X, Y, and Z coordinates in the axis-aligned bounding box.
    pub min: Vec3,
    /// Location with the highest X, Y, and Z coordinates in the axis-aligned bounding box.
    pub max: Vec3,
}

const _: () = {
    assert!(std::mem::size_of::<BoundingBox>() == 24);
    assert!(std::mem::offset_of!(BoundingBox, min) == 0);
    assert!(std::mem::offset_of!(BoundingBox, max) == 12);
};

impl Default for BoundingBox {
    #[inline(always)]
    fn default() -> Self {
        Self::EMPTY
    }
}

impl BoundingBox {
    /// Bounding box containing nothing.
    pub const EMPTY: Self = Self {
        min: Vec3::splat(f32::MAX),
        max: Vec3::splat(f32::MIN),
    };

    /// Constructs a bounding box from the specified minimum and maximum.
    #[inline(always)]
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Determines if a bounding box intersects another bounding box. Touching boxes count as intersecting.
    #[inline(always)]
    pub fn intersects(&self, other: &Self) -> bool {
        Self::intersects_bounds(self.min, self.max, other.min, other.max)
    }

    /// Determines if a bounding box intersects another bounding box.
    #[inline(always)]
    pub fn intersects_bounds(min_a: Vec3, max_a: Vec3, min_b: Vec3, max_b: Vec3) -> bool {
        let no_intersection_on_axes = max_a.cmplt(min_b) | max_b.cmplt(min_a);
        !no_intersection_on_axes.any()
    }

    /// Gets whether the box contains no volume at all, as is the case for `BoundingBox::EMPTY`.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.max.cmplt(self.min).any()
    }

    /// Grows this box to contain another box.
    #[inline(always)]
    pub fn merge(&mut self, other: &Self) {
        self.min = self.min.min(other.min);
        self.max = self.max.max(other.max);
    }

    /// Expands the box by `margin` along every axis in both directions.
    #[inline(always)]
    pub fn dilated(&self, margin: f32) -> Self {
        let margin = Vec3::splat(margin);
        Self {
            min: self.min - margin,
            max: self.max + margin,
        }
    }

    /// Creates a bounding box around a sphere.
    ///
    /// A sphere with a non-finite center or radius produces an empty box so that broken geometry is never tested.
    #[inline]
    pub fn from_sphere(center: Vec3, radius: f32) -> Self {
        if !center.is_finite() || !radius.is_finite() {
            return Self::EMPTY;
        }
        let radius = Vec3::splat(radius);
        Self {
            min: center - radius,
            max: center + radius,
        }
    }

    /// Creates the smallest possible bounding box that contains a list of points.
    ///
    /// An empty list, or any non-finite point, yields an empty box.
    pub fn from_points(points: &[Vec3]) -> Self {
        let mut result = Self::EMPTY;
        for point in points {
            if !point.is_finite() {
                return Self::EMPTY;
            }
            result.min = result.min.min(*point);
            result.max = result.max.max(*point);
        }
        result
    }
}

impl std::fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.min, self.max)
    }
}
