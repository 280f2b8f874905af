//! Student listing handler.

use axum::{extract::State, Extension, Json};
use tracing::instrument;

use crate::db::Student;
use crate::error::AppError;
use crate::middleware::RequestId;
use crate::state::AppState;

/// Every row of the `student` table as a JSON array, in storage order.
///
/// Store logs emitted while listing are tagged with the caller's request id.
#[instrument(name = "students::list", skip_all, fields(request_id = %request_id.0))]
pub async fn list(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
) -> Result<Json<Vec<Student>>, AppError> {
    let students = state.store.list_students().await?;
    tracing::debug!(count = students.len(), "Listing students");
    Ok(Json(students))
}
