pub mod api;
pub mod execution;
pub mod model;
pub mod service;
