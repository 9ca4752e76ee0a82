//! CLI command implementations

pub mod blend_modes;
pub mod init;
pub mod path;
pub mod render;
