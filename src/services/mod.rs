pub mod exercises;
pub mod nutrition;
pub mod workout;
