pub mod restaurant_file;
pub mod usage;
