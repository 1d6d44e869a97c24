//! Boundary decoding of `governo_itens` rows.
//!
//! Both adapters map remote rows into [`GovernoItemRow`] and then validate
//! them into domain items, so a schema drift surfaces as
//! `DomainError::Decode` instead of a silently wrong menu.

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use sqlx::FromRow;

use governo_core::domain::GovernoItem;
use governo_core::error::DomainError;

/// Raw row, before validation
#[derive(Debug, Clone, Deserialize, FromRow)]
pub struct GovernoItemRow {
    #[serde(deserialize_with = "opaque_id")]
    pub id: String,
    pub title: String,
    pub slug: String,
    pub order: i32,
    pub active: bool,
}

impl TryFrom<GovernoItemRow> for GovernoItem {
    type Error = validator::ValidationErrors;

    fn try_from(row: GovernoItemRow) -> Result<Self, Self::Error> {
        GovernoItem::new(row.id, row.title, row.slug, row.order, row.active)
    }
}

/// Accept text, numeric, or uuid-as-text ids; the id stays opaque.
fn opaque_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Integer(i64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(text) => text,
        RawId::Integer(n) => n.to_string(),
    })
}

/// Validate rows in order, failing on the first bad one.
pub fn decode_rows(rows: Vec<GovernoItemRow>) -> Result<Vec<GovernoItem>, DomainError> {
    rows.into_iter()
        .enumerate()
        .map(|(index, row)| {
            GovernoItem::try_from(row).map_err(|e| DomainError::Decode {
                index,
                reason: e.to_string(),
            })
        })
        .collect()
}

/// Decode a PostgREST response body, which must be a JSON array of rows.
pub fn decode_json(body: Value) -> Result<Vec<GovernoItem>, DomainError> {
    let Value::Array(values) = body else {
        return Err(DomainError::MalformedResponse(
            "expected a JSON array of rows".to_string(),
        ));
    };

    let rows = values
        .into_iter()
        .enumerate()
        .map(|(index, value)| {
            serde_json::from_value::<GovernoItemRow>(value).map_err(|e| DomainError::Decode {
                index,
                reason: e.to_string(),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    decode_rows(rows)
}
