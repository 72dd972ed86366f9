pub mod json;
pub mod migrations;
pub mod repository;
