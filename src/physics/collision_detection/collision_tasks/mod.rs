pub mod sphere_pair_tester;
pub mod sphere_triangle_tester;
