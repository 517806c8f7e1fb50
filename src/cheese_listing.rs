//! The cheese listing resource.
//!
//! One persisted entity exposed at `/cheeses`: stored fields, strict write
//! payloads, and a read representation with two derived fields computed at
//! response-assembly time.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, DbErr, entity::prelude::*};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{FieldPolicy, FilterDescriptor, FilterKind};
use crate::resource::{CrudResource, ReplaceIntoActiveModel};
use crate::validation::{Validatable, ValidationError};

/// Stored descriptions at or above this length are truncated in
/// `short_description`.
pub const SHORT_DESCRIPTION_LIMIT: usize = 40;

/// Maximum accepted title length, in characters.
pub const TITLE_MAX_LENGTH: usize = 255;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Deserialize, Serialize)]
#[sea_orm(table_name = "cheese_listings")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub price: i32,
    pub created_at: DateTime<Utc>,
    pub is_published: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Read representation of a listing.
///
/// The raw `description` and `created_at` columns never appear here; their
/// derived counterparts (`short_description`, `created_at_ago`) do.
#[derive(ToSchema, Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct CheeseListing {
    pub id: i32,
    pub title: String,
    pub short_description: String,
    /// Price in the minor currency unit (cents).
    pub price: i32,
    pub created_at_ago: String,
    pub is_published: bool,
}

/// Create payload.
///
/// Strict deserialization: unknown members, including the read-only `id`
/// and `created_at`, reject the whole payload. The description travels
/// under the wire name `custom_description`.
#[derive(ToSchema, Serialize, Deserialize, Clone, Debug)]
#[serde(deny_unknown_fields)]
pub struct CheeseListingCreate {
    pub title: String,
    #[serde(default, rename = "custom_description")]
    pub description: Option<String>,
    #[serde(default)]
    pub price: i32,
    #[serde(default)]
    pub is_published: bool,
}

impl From<CheeseListingCreate> for ActiveModel {
    fn from(create: CheeseListingCreate) -> Self {
        Self {
            id: ActiveValue::NotSet,
            title: ActiveValue::Set(create.title),
            description: ActiveValue::Set(nl2br(&create.description.unwrap_or_default())),
            price: ActiveValue::Set(create.price),
            created_at: ActiveValue::Set(Utc::now()),
            is_published: ActiveValue::Set(create.is_published),
        }
    }
}

/// Replace payload. Same shape as create; absent optional members reset to
/// their defaults, and `id`/`created_at` are never touched.
#[derive(ToSchema, Serialize, Deserialize, Clone, Debug)]
#[serde(deny_unknown_fields)]
pub struct CheeseListingUpdate {
    pub title: String,
    #[serde(default, rename = "custom_description")]
    pub description: Option<String>,
    #[serde(default)]
    pub price: i32,
    #[serde(default)]
    pub is_published: bool,
}

impl ReplaceIntoActiveModel<ActiveModel> for CheeseListingUpdate {
    fn replace_into_activemodel(self, mut existing: ActiveModel) -> Result<ActiveModel, DbErr> {
        existing.title = ActiveValue::Set(self.title);
        existing.description = ActiveValue::Set(nl2br(&self.description.unwrap_or_default()));
        existing.price = ActiveValue::Set(self.price);
        existing.is_published = ActiveValue::Set(self.is_published);
        Ok(existing)
    }
}

fn validate_title(title: &str) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    if title.trim().is_empty() {
        errors.push(ValidationError::new("title", "Title must not be empty"));
    }
    if title.chars().count() > TITLE_MAX_LENGTH {
        errors.push(ValidationError::new(
            "title",
            format!("Title must be at most {TITLE_MAX_LENGTH} characters"),
        ));
    }
    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

impl Validatable for CheeseListingCreate {
    fn validate(&self) -> Result<(), Vec<ValidationError>> {
        validate_title(&self.title)
    }
}

impl Validatable for CheeseListingUpdate {
    fn validate(&self) -> Result<(), Vec<ValidationError>> {
        validate_title(&self.title)
    }
}

/// Insert a `<br />` marker before every line break, keeping the break.
///
/// `\r\n` and `\n\r` count as a single break. The transform is not
/// idempotent: input that already contains markers gains another set on the
/// next write.
#[must_use]
pub fn nl2br(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\n' || c == '\r' {
            out.push_str("<br />");
            out.push(c);
            // Consume the second half of a two-character break.
            if let Some(&next) = chars.peek() {
                if (c == '\n' && next == '\r') || (c == '\r' && next == '\n') {
                    out.push(next);
                    chars.next();
                }
            }
        } else {
            out.push(c);
        }
    }
    out
}

/// First [`SHORT_DESCRIPTION_LIMIT`] characters of the stored description,
/// with a `...` suffix when truncation happened. Counts characters of the
/// stored string, markup included.
#[must_use]
pub fn short_description(description: &str) -> String {
    if description.chars().count() < SHORT_DESCRIPTION_LIMIT {
        return description.to_owned();
    }
    let truncated: String = description.chars().take(SHORT_DESCRIPTION_LIMIT).collect();
    format!("{truncated}...")
}

/// Humanized age of a record ("3 hours ago"), relative to `now`.
///
/// Sub-second ages clamp to "1 second ago". Months are 30 days, years 365.
#[must_use]
pub fn created_at_ago(created_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - created_at).num_seconds().max(1);
    let (amount, unit) = if seconds < 60 {
        (seconds, "second")
    } else if seconds < 3_600 {
        (seconds / 60, "minute")
    } else if seconds < 86_400 {
        (seconds / 3_600, "hour")
    } else if seconds < 2_592_000 {
        (seconds / 86_400, "day")
    } else if seconds < 31_536_000 {
        (seconds / 2_592_000, "month")
    } else {
        (seconds / 31_536_000, "year")
    };
    if amount == 1 {
        format!("1 {unit} ago")
    } else {
        format!("{amount} {unit}s ago")
    }
}

/// Visibility of every field the API knows about.
const FIELDS: &[FieldPolicy] = &[
    FieldPolicy {
        name: "id",
        readable: true,
        writable: false,
    },
    FieldPolicy {
        name: "title",
        readable: true,
        writable: true,
    },
    FieldPolicy {
        name: "description",
        readable: false,
        writable: true,
    },
    FieldPolicy {
        name: "short_description",
        readable: true,
        writable: false,
    },
    FieldPolicy {
        name: "price",
        readable: true,
        writable: true,
    },
    FieldPolicy {
        name: "created_at",
        readable: false,
        writable: false,
    },
    FieldPolicy {
        name: "created_at_ago",
        readable: true,
        writable: false,
    },
    FieldPolicy {
        name: "is_published",
        readable: true,
        writable: true,
    },
];

#[async_trait]
impl CrudResource for CheeseListing {
    type EntityType = Entity;
    type ColumnType = Column;
    type ActiveModelType = ActiveModel;
    type CreateModel = CheeseListingCreate;
    type UpdateModel = CheeseListingUpdate;

    const ID_COLUMN: Self::ColumnType = Column::Id;
    const RESOURCE_NAME_SINGULAR: &'static str = "cheese";
    const RESOURCE_NAME_PLURAL: &'static str = "cheeses";

    fn from_model(model: Model, now: DateTime<Utc>) -> Self {
        Self {
            id: model.id,
            title: model.title,
            short_description: short_description(&model.description),
            price: model.price,
            created_at_ago: created_at_ago(model.created_at, now),
            is_published: model.is_published,
        }
    }

    fn filter_descriptors() -> Vec<FilterDescriptor<Column>> {
        vec![
            FilterDescriptor::new("is_published", FilterKind::BooleanExact, Column::IsPublished),
            FilterDescriptor::new("title", FilterKind::PartialMatch, Column::Title),
            FilterDescriptor::new("description", FilterKind::PartialMatch, Column::Description),
            FilterDescriptor::new("price", FilterKind::Range, Column::Price),
        ]
    }

    fn field_policies() -> &'static [FieldPolicy] {
        FIELDS
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_nl2br_inserts_marker_before_newline() {
        assert_eq!(nl2br("Soft\nCheese"), "Soft<br />\nCheese");
    }

    #[test]
    fn test_nl2br_handles_all_break_flavors() {
        assert_eq!(nl2br("a\r\nb"), "a<br />\r\nb");
        assert_eq!(nl2br("a\n\rb"), "a<br />\n\rb");
        assert_eq!(nl2br("a\rb"), "a<br />\rb");
        assert_eq!(nl2br("a\nb\nc"), "a<br />\nb<br />\nc");
    }

    #[test]
    fn test_nl2br_leaves_plain_text_alone() {
        assert_eq!(nl2br("just cheese"), "just cheese");
        assert_eq!(nl2br(""), "");
    }

    #[test]
    fn test_nl2br_is_not_idempotent() {
        let once = nl2br("a\nb");
        let twice = nl2br(&once);
        assert_eq!(twice, "a<br /><br />\nb");
    }

    #[test]
    fn test_short_description_identity_below_limit() {
        let d = "Soft<br />\nCheese";
        assert_eq!(short_description(d), d);
    }

    #[test]
    fn test_short_description_truncates_at_limit() {
        let d = "x".repeat(40);
        let short = short_description(&d);
        assert_eq!(short, format!("{}...", "x".repeat(40)));
        assert_eq!(short.chars().count(), 43);
    }

    #[test]
    fn test_short_description_length_bound() {
        for len in [0usize, 10, 39, 40, 41, 100] {
            let d = "y".repeat(len);
            assert!(short_description(&d).chars().count() <= 43);
        }
    }

    #[test]
    fn test_short_description_counts_markup_characters() {
        // 35 visible chars, but markup pushes the stored string over the limit.
        let stored = nl2br(&format!("{}\n{}", "a".repeat(20), "b".repeat(15)));
        assert!(stored.chars().count() >= SHORT_DESCRIPTION_LIMIT);
        assert!(short_description(&stored).ends_with("..."));
    }

    #[test]
    fn test_created_at_ago_units() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let cases = [
            (now - chrono::Duration::seconds(30), "30 seconds ago"),
            (now - chrono::Duration::minutes(1), "1 minute ago"),
            (now - chrono::Duration::hours(3), "3 hours ago"),
            (now - chrono::Duration::days(2), "2 days ago"),
            (now - chrono::Duration::days(60), "2 months ago"),
            (now - chrono::Duration::days(800), "2 years ago"),
        ];
        for (created_at, expected) in cases {
            assert_eq!(created_at_ago(created_at, now), expected);
        }
    }

    #[test]
    fn test_created_at_ago_clamps_to_one_second() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        assert_eq!(created_at_ago(now, now), "1 second ago");
    }

    #[test]
    fn test_validate_title_rejects_empty() {
        let payload = CheeseListingCreate {
            title: "  ".to_string(),
            description: None,
            price: 0,
            is_published: false,
        };
        let errors = payload.validate().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "title");
    }

    #[test]
    fn test_validate_title_rejects_overlong() {
        let payload = CheeseListingCreate {
            title: "t".repeat(256),
            description: None,
            price: 0,
            is_published: false,
        };
        assert!(payload.validate().is_err());

        let payload = CheeseListingCreate {
            title: "t".repeat(255),
            description: None,
            price: 0,
            is_published: false,
        };
        assert!(payload.validate().is_ok());
    }

    #[test]
    fn test_create_payload_rejects_read_only_fields() {
        let result: Result<CheeseListingCreate, _> =
            serde_json::from_str(r#"{"title": "Brie", "id": 1}"#);
        assert!(result.is_err());

        let result: Result<CheeseListingCreate, _> =
            serde_json::from_str(r#"{"title": "Brie", "created_at": "2024-01-01T00:00:00Z"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_create_payload_reads_custom_description() {
        let payload: CheeseListingCreate =
            serde_json::from_str(r#"{"title": "Brie", "custom_description": "Soft"}"#).unwrap();
        assert_eq!(payload.description.as_deref(), Some("Soft"));

        // The storage name is not accepted on the wire.
        let result: Result<CheeseListingCreate, _> =
            serde_json::from_str(r#"{"title": "Brie", "description": "Soft"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_visibility_table_agrees_with_write_payloads() {
        // The stored description travels under a different wire name.
        fn wire_name(field: &str) -> &str {
            if field == "description" {
                "custom_description"
            } else {
                field
            }
        }
        fn sample_value(field: &str) -> serde_json::Value {
            match field {
                "price" | "id" => serde_json::json!(1),
                "is_published" => serde_json::json!(true),
                _ => serde_json::json!("x"),
            }
        }

        for policy in CheeseListing::field_policies() {
            let mut object = serde_json::Map::new();
            object.insert("title".to_string(), serde_json::json!("Brie"));
            object.insert(
                wire_name(policy.name).to_string(),
                sample_value(policy.name),
            );
            let body = serde_json::Value::Object(object);

            let create: Result<CheeseListingCreate, _> = serde_json::from_value(body.clone());
            assert_eq!(
                create.is_ok(),
                policy.writable,
                "create payload disagrees with the visibility table for `{}`",
                policy.name
            );
            let update: Result<CheeseListingUpdate, _> = serde_json::from_value(body);
            assert_eq!(
                update.is_ok(),
                policy.writable,
                "replace payload disagrees with the visibility table for `{}`",
                policy.name
            );
        }
    }

    #[test]
    fn test_read_model_hides_raw_fields() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let model = Model {
            id: 1,
            title: "Brie".to_string(),
            description: nl2br("Soft\nCheese"),
            price: 500,
            created_at: now - chrono::Duration::hours(3),
            is_published: true,
        };
        let listing = CheeseListing::from_model(model, now);
        let value = serde_json::to_value(&listing).unwrap();
        let object = value.as_object().unwrap();
        assert!(object.contains_key("short_description"));
        assert!(object.contains_key("created_at_ago"));
        assert!(!object.contains_key("description"));
        assert!(!object.contains_key("created_at"));
        assert_eq!(object["short_description"], "Soft<br />\nCheese");
        assert_eq!(object["created_at_ago"], "3 hours ago");
    }
}
