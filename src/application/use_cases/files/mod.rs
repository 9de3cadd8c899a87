pub mod list_files;
pub mod upload_file;
