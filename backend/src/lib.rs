pub mod processor;
pub mod routes;
pub mod store;
pub mod queries;
pub mod cors;
pub mod error;
pub mod catchers;
pub mod config;
pub use shared::{models::*, error::*};

#[cfg(test)]
mod tests;
