pub mod line_editor;
pub mod provider;
pub mod staged;
pub mod store;
pub mod swagger;
