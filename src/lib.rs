pub mod types;
pub mod config;
pub mod data;
pub mod resolver;
pub mod centroid;
pub mod hover;
pub mod stats;
pub mod view;
pub mod server;
