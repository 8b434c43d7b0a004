pub mod api;
pub mod domain;
pub mod handler;
pub mod repository;
pub mod services;

// re-exports for ease
pub use repository::*;
pub use services::*;
