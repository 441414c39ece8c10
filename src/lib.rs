pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod server;
pub mod tools;

pub use client::{Photo, SearchResponse, UnsplashClient};
pub use config::{Config, ResponseFormat};
pub use error::{Error, Result};
pub use server::Server;
pub use tools::{SearchOutcome, SearchPhotosInput, SearchTool};
