//! Request/response contract exposed to UI callers.
//!
//! Responses serialize to `{success: true, data}` or
//! `{success: false, error}`, matching the extension messaging shape.

use serde::Serialize;

use crate::db::Database;
use crate::models::{DailyRecord, HistoryEntry};
use crate::stats::{fetch_daily_stats, fetch_history, Period};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> QueryResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Period-bucketed daily records for the stats views.
pub async fn get_study_stats(db: &Database, period: &str) -> QueryResponse<Vec<DailyRecord>> {
    let period: Period = match period.parse() {
        Ok(period) => period,
        Err(err) => return QueryResponse::err(err.to_string()),
    };

    match fetch_daily_stats(db, period).await {
        Ok(days) => QueryResponse::ok(days),
        Err(err) => QueryResponse::err(err.to_string()),
    }
}

/// Paginated recent watch segments for the history list.
pub async fn get_study_history(
    db: &Database,
    limit: u32,
    offset: u32,
) -> QueryResponse<Vec<HistoryEntry>> {
    match fetch_history(db, limit, offset).await {
        Ok(entries) => QueryResponse::ok(entries),
        Err(err) => QueryResponse::err(err.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn bad_period_yields_error_response() {
        let db = Database::in_memory().unwrap();
        let response = get_study_stats(&db, "decade").await;
        assert!(!response.success);
        assert!(response.data.is_none());
        assert!(response.error.unwrap().contains("decade"));
    }

    #[tokio::test]
    async fn responses_serialize_to_the_wire_shape() {
        let db = Database::in_memory().unwrap();
        let response = get_study_history(&db, 5, 0).await;
        assert!(response.success);

        let wire = serde_json::to_value(&response).unwrap();
        assert_eq!(wire["success"], true);
        assert!(wire.get("error").is_none());
        assert!(wire["data"].is_array());

        let failure: QueryResponse<()> = QueryResponse::err("boom");
        let wire = serde_json::to_value(&failure).unwrap();
        assert_eq!(wire["success"], false);
        assert_eq!(wire["error"], "boom");
        assert!(wire.get("data").is_none());
    }
}
