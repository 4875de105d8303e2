pub mod build;
pub mod clean;
pub mod completion;
pub mod create;
pub mod debug;
pub mod dump;
pub mod generate;
pub mod makesure;
pub mod module;
pub mod run;
pub mod shared;
pub mod update;
pub mod upgrade;
pub mod version;
