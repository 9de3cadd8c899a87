mod fs_port_impl;
mod paths;
mod s3_port_impl;
pub use paths::*;
pub mod fs {
    pub use super::fs_port_impl::*;
}
pub mod s3 {
    pub use super::s3_port_impl::*;
}
