//! Server-side rendering of the "last updated" label

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use governo_core::domain::{DateInput, TimeLabel};
use governo_core::error::TimeLabelError;

use crate::response::{time_label_failure, ApiFailure, ApiResponse};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct TimeLabelQuery {
    pub date: Option<String>,
    pub label: Option<String>,
    pub class_name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TimeLabelDto {
    pub label: String,
    pub text: String,
    pub datetime: String,
    pub html: String,
}

/// Render handler - GET /api/v1/time-label?date=...
///
/// `data` is null when no date is given.
pub async fn render(
    State(state): State<AppState>,
    Query(query): Query<TimeLabelQuery>,
) -> Result<Json<ApiResponse<Option<TimeLabelDto>>>, ApiFailure> {
    let mut label = TimeLabel::new(query.date.map(DateInput::from)).with_locale(state.locale.clone());
    if let Some(text) = query.label {
        label = label.with_label(text);
    }
    if let Some(class_name) = query.class_name {
        label = label.with_class_name(class_name);
    }

    let rendered = label
        .render()
        .and_then(|rendered| match rendered {
            Some(r) => r.to_html().map(|html| {
                Some(TimeLabelDto {
                    label: r.label,
                    text: r.text,
                    datetime: r.datetime,
                    html,
                })
            }),
            None => Ok(None),
        })
        .map_err(|e| {
            match &e {
                TimeLabelError::InvalidDate { .. } => warn!("Time label rejected: {}", e),
                TimeLabelError::Render(_) => error!("Time label rendering failed: {}", e),
            }
            time_label_failure(&e)
        })?;

    Ok(Json(ApiResponse::success(rendered)))
}
