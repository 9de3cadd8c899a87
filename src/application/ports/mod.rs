pub mod files_repository;
pub mod object_storage;
pub mod restaurant_repository;
