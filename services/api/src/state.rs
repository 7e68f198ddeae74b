//! Application state shared across handlers

use std::sync::Arc;

use crate::config::AppConfig;
use crate::image_store::ImageStore;
use crate::repositories::{UserStore, VinylStore};
use crate::session::SessionStore;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub users: Arc<dyn UserStore>,
    pub vinyls: Arc<dyn VinylStore>,
    pub sessions: Arc<dyn SessionStore>,
    pub images: Arc<dyn ImageStore>,
}
