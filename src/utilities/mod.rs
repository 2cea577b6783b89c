pub mod bounding_box;
pub mod memory;
pub mod thread_dispatcher;
