use crate::application::ports::files_repository::FilesRepository;
use crate::application::ports::restaurant_repository::RestaurantRepository;
use crate::domain::files::usage::StorageUsage;

#[derive(thiserror::Error, Debug)]
pub enum ListFilesError {
    #[error("restaurant not found")]
    RestaurantNotFound,
    #[error("failed to list restaurant files")]
    Internal(#[source] anyhow::Error),
}

pub struct ListFiles<'a, R, F>
where
    R: RestaurantRepository + ?Sized,
    F: FilesRepository + ?Sized,
{
    pub restaurants: &'a R,
    pub files: &'a F,
}

impl<'a, R, F> ListFiles<'a, R, F>
where
    R: RestaurantRepository + ?Sized,
    F: FilesRepository + ?Sized,
{
    pub async fn execute(
        &self,
        user_id: &str,
        restaurant_id: &str,
        limit: Option<i64>,
    ) -> Result<StorageUsage, ListFilesError> {
        let restaurant = self
            .restaurants
            .find_owned(restaurant_id, user_id)
            .await
            .map_err(ListFilesError::Internal)?
            .ok_or(ListFilesError::RestaurantNotFound)?;
        let files = self
            .files
            .list_for_restaurant(&restaurant.id, limit)
            .await
            .map_err(ListFilesError::Internal)?;
        Ok(StorageUsage::from_files(files))
    }
}
