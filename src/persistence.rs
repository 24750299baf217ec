pub mod repo;
pub mod table;
