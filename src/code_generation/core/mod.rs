pub mod naming;
pub mod template_emitter;
pub mod type_map;
