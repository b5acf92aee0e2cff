pub mod configuration;
pub mod dao;
pub mod error;
pub mod feed;
pub mod handler;
pub mod helpers;
pub mod migration;
pub mod model;
pub mod provider;
pub mod types;
