pub mod field_builder;
pub mod models;
pub mod registration;
pub mod unregistration;
