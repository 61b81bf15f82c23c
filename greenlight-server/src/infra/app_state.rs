use std::{fmt, sync::Arc};

use greenlight_config::Config;
use greenlight_core::database::ports::movies::MoviesRepository;

use crate::infra::background::BackgroundTasks;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub movies: Arc<dyn MoviesRepository>,
    pub background: BackgroundTasks,
}

impl AppState {
    pub fn new(config: Arc<Config>, movies: Arc<dyn MoviesRepository>) -> Self {
        Self {
            config,
            movies,
            background: BackgroundTasks::new(),
        }
    }
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("environment", &self.config.environment)
            .field("background", &self.background)
            .finish_non_exhaustive()
    }
}
