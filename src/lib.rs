pub mod client;
pub mod config;
pub mod datasource;
pub mod error;
pub mod handlers;
pub mod metadata;
pub mod models;
pub mod query_builder;
pub mod shaping;
pub mod status;

use std::sync::Arc;

use datasource::Datasource;

#[derive(Clone)]
pub struct AppState {
    pub datasource: Arc<Datasource>,
}
