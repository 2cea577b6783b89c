pub mod bodies;
pub mod body_properties;
pub mod collidables;
pub mod collision_detection;
pub mod handles;
pub mod skinned_mesh_body;
pub mod trees;
