pub mod error;
pub mod logging;
pub mod prompter;
pub mod shell;
pub mod utils;
