//! Administrative management of content and shelves

pub mod auth;
pub mod handlers;
pub mod service;

pub use service::AdminService;
