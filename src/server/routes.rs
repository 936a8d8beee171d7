use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use rusqlite::types::Value;
use serde::{Deserialize, Serialize};
use crate::server::page::{ErrorPage, HtmlTemplate, LandingPage};
use crate::server::AppState;
use crate::storage::{Row, SqliteStore, Table};
use crate::Error;
use std::sync::Arc;

#[derive(Deserialize)]
pub struct ListParams {
    /// Comma separated projection, e.g. `name,price`
    pub columns: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

type JsonError = (StatusCode, Json<ErrorResponse>);

/// Run a blocking store call off the async runtime
async fn with_store<T, F>(state: &AppState, f: F) -> crate::Result<T>
where
    F: FnOnce(&SqliteStore) -> crate::Result<T> + Send + 'static,
    T: Send + 'static,
{
    let store = state.store.clone();
    match tokio::task::spawn_blocking(move || f(&store)).await {
        Ok(result) => result,
        Err(e) => Err(Error::Io(std::io::Error::other(e))),
    }
}

fn json_error(err: Error) -> JsonError {
    match err {
        Error::InvalidArgument(msg) => (StatusCode::BAD_REQUEST, Json(ErrorResponse { error: msg })),
        other => {
            tracing::error!("Request failed: {}", other);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse { error: "internal error".to_string() }),
            )
        }
    }
}

pub fn value_to_json(value: Value) -> serde_json::Value {
    match value {
        Value::Null => serde_json::Value::Null,
        Value::Integer(i) => i.into(),
        Value::Real(f) => serde_json::Number::from_f64(f)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        Value::Text(s) => s.into(),
        Value::Blob(b) => b.into(),
    }
}

pub fn row_to_json(row: Row) -> serde_json::Value {
    serde_json::Value::Object(
        row.into_iter()
            .map(|(column, value)| (column, value_to_json(value)))
            .collect(),
    )
}

pub async fn home(State(state): State<Arc<AppState>>) -> Response {
    let page = with_store(&state, |store| {
        Ok(LandingPage {
            news: store.list()?,
            services: store.list()?,
            reviews: store.list()?,
            ..Default::default()
        })
    })
    .await;

    match page {
        Ok(page) => HtmlTemplate(page).into_response(),
        Err(e) => {
            tracing::error!("Failed to load landing page: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, HtmlTemplate(ErrorPage::default())).into_response()
        }
    }
}

pub async fn list_rows(
    State(state): State<Arc<AppState>>,
    Path(table): Path<String>,
    Query(params): Query<ListParams>,
) -> Result<Json<serde_json::Value>, JsonError> {
    let table: Table = table.parse().map_err(|e: Error| {
        (StatusCode::NOT_FOUND, Json(ErrorResponse { error: e.to_string() }))
    })?;

    let columns: Vec<String> = params
        .columns
        .as_deref()
        .map(|c| {
            c.split(',')
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(String::from)
                .collect()
        })
        .unwrap_or_default();

    let rows = with_store(&state, move |store| {
        let columns: Vec<&str> = columns.iter().map(String::as_str).collect();
        store.select(table, Some(columns.as_slice()), Some("1 = 1 ORDER BY id"), &[])
    })
    .await
    .map_err(json_error)?;

    Ok(Json(serde_json::Value::Array(rows.into_iter().map(row_to_json).collect())))
}

pub async fn get_stats(State(state): State<Arc<AppState>>) -> Result<Json<serde_json::Value>, JsonError> {
    let stats = with_store(&state, |store| store.stats()).await.map_err(json_error)?;

    Ok(Json(serde_json::to_value(&stats).map_err(|e| {
        tracing::error!("Failed to serialize stats: {}", e);
        (StatusCode::INTERNAL_SERVER_ERROR, Json(ErrorResponse { error: "internal error".to_string() }))
    })?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{NewsItem, Service};
    use tempfile::TempDir;

    async fn body_text(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn temp_state() -> (TempDir, Arc<AppState>) {
        let dir = TempDir::new().unwrap();
        let store = SqliteStore::open(&dir.path().join("studio.db")).unwrap();
        (dir, Arc::new(AppState { store }))
    }

    #[test]
    fn test_value_to_json() {
        assert_eq!(value_to_json(Value::Null), serde_json::Value::Null);
        assert_eq!(value_to_json(Value::Integer(7)), serde_json::json!(7));
        assert_eq!(value_to_json(Value::Text("hoop".into())), serde_json::json!("hoop"));
        assert_eq!(value_to_json(Value::Real(f64::NAN)), serde_json::Value::Null);
    }

    #[test]
    fn test_json_error_hides_storage_details() {
        let (status, body) = json_error(Error::Storage(rusqlite::Error::QueryReturnedNoRows));
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.0.error, "internal error");

        let (status, _) = json_error(Error::invalid("bad column"));
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_home_renders_stored_records() {
        let (_dir, state) = temp_state();
        state
            .store
            .save(&NewsItem { name: "Showcase".into(), text: "June 1".into(), ..Default::default() })
            .unwrap();
        state
            .store
            .save(&Service { name: "Silks".into(), price: "350".into(), ..Default::default() })
            .unwrap();

        let response = home(State(state)).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_text(response).await;
        assert!(body.contains("Showcase"));
        assert!(body.contains("Silks"));
    }

    #[tokio::test]
    async fn test_home_failure_renders_generic_page() {
        let (dir, state) = temp_state();
        let db = dir.path().join("studio.db");
        std::fs::remove_file(&db).unwrap();
        std::fs::create_dir(&db).unwrap();

        let response = home(State(state)).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_text(response).await;
        assert!(body.contains("Something went wrong"));
        assert!(!body.to_lowercase().contains("database"));
    }

    #[tokio::test]
    async fn test_list_rows_on_legacy_table_hides_engine_text() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("legacy.db");
        {
            let conn = rusqlite::Connection::open(&path).unwrap();
            conn.execute(
                "CREATE TABLE service (id INTEGER PRIMARY KEY AUTOINCREMENT, name TEXT, description TEXT, price TEXT)",
                [],
            )
            .unwrap();
        }
        let store = SqliteStore::open(&path).unwrap();
        let state = Arc::new(AppState { store });

        let (status, Json(body)) = list_rows(
            State(state),
            Path("service".to_string()),
            Query(ListParams { columns: Some("img".into()) }),
        )
        .await
        .unwrap_err();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(!body.error.contains("no such column"));
    }

    #[tokio::test]
    async fn test_list_rows() {
        let (_dir, state) = temp_state();
        state
            .store
            .save(&Service { name: "Silks".into(), price: "350".into(), ..Default::default() })
            .unwrap();

        let Json(all) = list_rows(
            State(state.clone()),
            Path("service".to_string()),
            Query(ListParams { columns: None }),
        )
        .await
        .unwrap();
        assert_eq!(all[0]["name"], "Silks");
        assert_eq!(all[0]["img"], serde_json::Value::Null);

        let Json(projected) = list_rows(
            State(state.clone()),
            Path("service".to_string()),
            Query(ListParams { columns: Some("name, price".into()) }),
        )
        .await
        .unwrap();
        assert_eq!(projected[0].as_object().unwrap().len(), 2);

        let (status, _) = list_rows(
            State(state.clone()),
            Path("sqlite_master".to_string()),
            Query(ListParams { columns: None }),
        )
        .await
        .unwrap_err();
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = list_rows(
            State(state),
            Path("service".to_string()),
            Query(ListParams { columns: Some("password".into()) }),
        )
        .await
        .unwrap_err();
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_stats_route() {
        let (_dir, state) = temp_state();
        let Json(stats) = get_stats(State(state)).await.unwrap();
        assert_eq!(stats["clients"], 0);
    }
}
