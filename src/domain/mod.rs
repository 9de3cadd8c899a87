pub mod files;
pub mod restaurants;
