pub mod collider;
pub mod collider_shape;
