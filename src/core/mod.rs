pub mod catalog;
pub mod compose;
pub mod repository;
pub mod text;
pub mod token;
pub mod weighted;
