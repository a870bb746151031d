pub mod common;
pub mod coordinator;
pub mod layout_engine;
pub mod model;
