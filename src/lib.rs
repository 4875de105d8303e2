pub mod cli;
pub mod code_generation;
pub mod project_management;
pub mod shared;
