use axum::{
    extract::{rejection::JsonRejection, State},
    http::header,
    response::{Html, IntoResponse},
    Json,
};
use serde::{Deserialize, Serialize};

use super::error::{ApiError, ApiResult};
use super::export::records_to_csv;
use super::AppContext;
use crate::store::check_text_length;
use crate::Sentiment;

pub const CSV_FILENAME: &str = "sentiments.csv";

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub sentiment: Sentiment,
}

/// Runs model and store calls off the async workers.
async fn blocking<F, T>(work: F) -> ApiResult<T>
where
    F: FnOnce() -> ApiResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| ApiError::Internal(format!("Blocking task failed: {}", e)))?
}

pub async fn home(State(context): State<AppContext>) -> ApiResult<Html<String>> {
    Ok(Html(context.views.index()?))
}

pub async fn analyze(
    State(context): State<AppContext>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> ApiResult<Json<AnalyzeResponse>> {
    let Json(request) = payload?;
    check_text_length(&request.text)?;

    let (id, sentiment) = blocking(move || {
        let sentiment = context.classifier.classify(&request.text)?;
        let id = context.store.insert(&request.text, sentiment)?;
        Ok((id, sentiment))
    })
    .await?;

    log::info!("Stored record {} with sentiment {}", id, sentiment);
    Ok(Json(AnalyzeResponse { sentiment }))
}

pub async fn records(State(context): State<AppContext>) -> ApiResult<Html<String>> {
    let store = context.store.clone();
    let records = blocking(move || Ok(store.fetch_all()?)).await?;
    Ok(Html(context.views.records(&records)?))
}

pub async fn download(State(context): State<AppContext>) -> ApiResult<impl IntoResponse> {
    let body = blocking(move || {
        let records = context.store.fetch_all()?;
        Ok(records_to_csv(&records)?)
    })
    .await?;

    let disposition = format!("attachment; filename={}", CSV_FILENAME);
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    ))
}
