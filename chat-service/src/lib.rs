pub mod config;
pub mod error;
pub mod handlers;
pub mod lambda;
pub mod models;
pub mod services;
pub mod startup;
pub mod utils;

pub use error::ChatError;
pub use handlers::ChatHandler;
