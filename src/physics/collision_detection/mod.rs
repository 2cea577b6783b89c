pub mod algorithm_settings;
pub mod candidate_refiner;
pub mod collision_checker;
pub mod collision_result;
pub mod collision_result_sink;
pub mod collision_task_registry;
pub mod collision_tasks;
pub mod contact_manifold;
pub mod manifold_emitter;
pub mod merge_buffer;
pub mod pair_dispatcher;
pub mod skinned_mesh_algorithm;
