use crate::application::ports::files_repository::FilesRepository;
use crate::application::ports::object_storage::ObjectStorage;
use crate::application::ports::restaurant_repository::RestaurantRepository;
use crate::domain::files::restaurant_file::{NewRestaurantFile, RestaurantFile, object_key};
use crate::domain::files::usage::{QuotaCheck, bytes_to_mb, check_quota};
use crate::domain::restaurants::restaurant::Restaurant;

#[derive(thiserror::Error, Debug)]
pub enum UploadFileError {
    #[error("restaurant not found")]
    RestaurantNotFound,
    #[error("no file in payload")]
    MissingFile,
    #[error("storage quota exceeded ({available_mb}MB available)")]
    QuotaExceeded { available_mb: f64 },
    #[error("failed to write object")]
    Upload(#[source] anyhow::Error),
    #[error("failed to save file metadata")]
    Save(#[source] anyhow::Error),
    #[error("failed to prepare upload")]
    Internal(#[source] anyhow::Error),
}

/// A file taken from the multipart payload.
#[derive(Debug, Clone)]
pub struct IncomingFile {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Binary write followed by metadata insert. Every failure after the write
/// has started deletes the object again before the error is returned.
pub struct UploadFile<'a, R, F, S>
where
    R: RestaurantRepository + ?Sized,
    F: FilesRepository + ?Sized,
    S: ObjectStorage + ?Sized,
{
    pub restaurants: &'a R,
    pub files: &'a F,
    pub storage: &'a S,
}

/// Restaurant ownership and account usage, resolved before the payload is read.
#[derive(Debug, Clone)]
pub struct UploadTarget {
    pub restaurant: Restaurant,
    pub used_bytes: i64,
}

impl<'a, R, F, S> UploadFile<'a, R, F, S>
where
    R: RestaurantRepository + ?Sized,
    F: FilesRepository + ?Sized,
    S: ObjectStorage + ?Sized,
{
    pub async fn execute(
        &self,
        user_id: &str,
        restaurant_id: &str,
        file: Option<IncomingFile>,
    ) -> Result<RestaurantFile, UploadFileError> {
        let target = self.authorize(user_id, restaurant_id).await?;
        self.store(target, file).await
    }

    pub async fn authorize(
        &self,
        user_id: &str,
        restaurant_id: &str,
    ) -> Result<UploadTarget, UploadFileError> {
        let restaurant = self
            .restaurants
            .find_owned(restaurant_id, user_id)
            .await
            .map_err(UploadFileError::Internal)?
            .ok_or(UploadFileError::RestaurantNotFound)?;

        // Quota is account-wide: every restaurant of this user counts.
        let used_bytes = self
            .files
            .total_bytes_for_owner(user_id)
            .await
            .map_err(UploadFileError::Internal)?;
        Ok(UploadTarget {
            restaurant,
            used_bytes,
        })
    }

    pub async fn store(
        &self,
        target: UploadTarget,
        file: Option<IncomingFile>,
    ) -> Result<RestaurantFile, UploadFileError> {
        let UploadTarget {
            restaurant,
            used_bytes,
        } = target;
        let current_usage_mb = bytes_to_mb(used_bytes);

        let file = file.ok_or(UploadFileError::MissingFile)?;
        let size = file.bytes.len() as i64;
        if let QuotaCheck::Exceeded { available_mb } = check_quota(current_usage_mb, size) {
            tracing::info!(
                restaurant_id = %restaurant.id,
                current_usage_mb,
                size,
                "storage_quota_exceeded"
            );
            return Err(UploadFileError::QuotaExceeded { available_mb });
        }

        let key = object_key(
            &restaurant.id,
            chrono::Utc::now(),
            uuid::Uuid::new_v4(),
            &file.filename,
        );

        if let Err(err) = self
            .storage
            .put_object(&key, file.bytes, &file.content_type)
            .await
        {
            tracing::error!(error = ?err, key = %key, "object_upload_failed");
            self.discard_object(&key).await;
            return Err(UploadFileError::Upload(err));
        }

        let record = NewRestaurantFile {
            name: file.filename,
            size,
            content_type: file.content_type,
            url: self.storage.public_url(&key),
            restaurant_id: restaurant.id.clone(),
        };
        match self.files.insert_file(&record).await {
            Ok(saved) => {
                tracing::info!(
                    restaurant_id = %restaurant.id,
                    file_id = %saved.id,
                    size,
                    "restaurant_file_uploaded"
                );
                Ok(saved)
            }
            Err(err) => {
                tracing::error!(error = ?err, key = %key, "insert_restaurant_file_failed");
                self.discard_object(&key).await;
                Err(UploadFileError::Save(err))
            }
        }
    }

    async fn discard_object(&self, key: &str) {
        if let Err(err) = self.storage.delete_object(key).await {
            tracing::error!(error = ?err, key = %key, "object_cleanup_failed");
        }
    }
}
