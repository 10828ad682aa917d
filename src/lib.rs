pub mod api;
pub mod backend;
pub mod config;
pub mod error;
pub mod feedback;
pub mod geometry;
pub mod landmarks;
pub mod mesh;
pub mod scorer;
pub mod session;
pub mod timeline;
// cmd and reports are binary modules (see main.rs).
