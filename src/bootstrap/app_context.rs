use std::sync::Arc;

use crate::application::ports::files_repository::FilesRepository;
use crate::application::ports::object_storage::ObjectStorage;
use crate::application::ports::restaurant_repository::RestaurantRepository;
use crate::bootstrap::config::Config;

#[derive(Clone)]
pub struct AppContext {
    pub cfg: Config,
    services: Arc<AppServices>,
}

pub struct AppServices {
    restaurant_repo: Arc<dyn RestaurantRepository>,
    files_repo: Arc<dyn FilesRepository>,
    object_storage: Arc<dyn ObjectStorage>,
}

impl AppServices {
    pub fn new(
        restaurant_repo: Arc<dyn RestaurantRepository>,
        files_repo: Arc<dyn FilesRepository>,
        object_storage: Arc<dyn ObjectStorage>,
    ) -> Self {
        Self {
            restaurant_repo,
            files_repo,
            object_storage,
        }
    }
}

impl AppContext {
    pub fn new(cfg: Config, services: AppServices) -> Self {
        Self {
            cfg,
            services: Arc::new(services),
        }
    }

    pub fn restaurant_repo(&self) -> Arc<dyn RestaurantRepository> {
        self.services.restaurant_repo.clone()
    }

    pub fn files_repo(&self) -> Arc<dyn FilesRepository> {
        self.services.files_repo.clone()
    }

    pub fn object_storage(&self) -> Arc<dyn ObjectStorage> {
        self.services.object_storage.clone()
    }
}
