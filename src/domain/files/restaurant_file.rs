use chrono::{DateTime, Datelike, Utc};

/// Metadata row for a binary asset stored in object storage.
#[derive(Debug, Clone, PartialEq)]
pub struct RestaurantFile {
    pub id: String,
    pub name: String,
    pub size: i64,
    pub content_type: String,
    pub url: String,
    pub restaurant_id: String,
    pub created_at: DateTime<Utc>,
}

/// Fields persisted once the binary write has succeeded.
#[derive(Debug, Clone)]
pub struct NewRestaurantFile {
    pub name: String,
    pub size: i64,
    pub content_type: String,
    pub url: String,
    pub restaurant_id: String,
}

/// `restaurants/{restaurant_id}/{year}/{month}/{uuid}-{filename}`
///
/// The month is not zero padded.
pub fn object_key(
    restaurant_id: &str,
    uploaded_at: DateTime<Utc>,
    unique: uuid::Uuid,
    original_filename: &str,
) -> String {
    format!(
        "restaurants/{}/{}/{}/{}-{}",
        restaurant_id,
        uploaded_at.year(),
        uploaded_at.month(),
        unique,
        original_filename
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn key_is_partitioned_by_restaurant_and_month() {
        let at = Utc.with_ymd_and_hms(2024, 3, 9, 12, 0, 0).unwrap();
        let id = uuid::Uuid::parse_str("6f1c2a1e-8d1b-4f3e-9a55-0c7f1e2b3c4d").unwrap();
        let key = object_key("rest_1", at, id, "menu.pdf");
        assert_eq!(
            key,
            "restaurants/rest_1/2024/3/6f1c2a1e-8d1b-4f3e-9a55-0c7f1e2b3c4d-menu.pdf"
        );
    }

    #[test]
    fn fresh_ids_never_collide_for_same_filename() {
        let at = Utc::now();
        let a = object_key("r", at, uuid::Uuid::new_v4(), "logo.png");
        let b = object_key("r", at, uuid::Uuid::new_v4(), "logo.png");
        assert_ne!(a, b);
        assert!(a.ends_with("-logo.png"));
    }
}
