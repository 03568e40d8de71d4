pub mod error;
pub mod fetch;
pub mod image_crawler;
pub mod models;
pub mod pipeline;
