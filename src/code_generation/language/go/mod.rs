pub mod scaffold_generator;
pub mod toolchain;
