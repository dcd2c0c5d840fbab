use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use super::auth::Claims;
use super::{ApiError, ApiResult};
use crate::models::complaint::{CreateComplaintRequest, UpdateComplaintStatusRequest};
use crate::models::notification::NewNotification;
use crate::models::{Complaint, ComplaintStatus, NotificationPriority};
use crate::notify;
use crate::AppState;

pub async fn create_complaint(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<CreateComplaintRequest>,
) -> ApiResult<(StatusCode, Json<Complaint>)> {
    let tenant_id = claims.user_id()?;

    if payload.title.trim().is_empty() || payload.description.trim().is_empty() {
        return Err(ApiError::ValidationError(
            "Title and description are required".to_string(),
        ));
    }

    let complaint = sqlx::query_as::<_, Complaint>(
        r#"
        INSERT INTO complaints (id, tenant_id, room_id, title, description, status)
        VALUES ($1, $2, $3, $4, $5, 'PENDING')
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(tenant_id)
    .bind(payload.room_id)
    .bind(payload.title.trim())
    .bind(payload.description.trim())
    .fetch_one(&state.db)
    .await?;

    Ok((StatusCode::CREATED, Json(complaint)))
}

pub async fn my_complaints(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> ApiResult<Json<Vec<Complaint>>> {
    let tenant_id = claims.user_id()?;

    let complaints = sqlx::query_as::<_, Complaint>(
        "SELECT * FROM complaints WHERE tenant_id = $1 ORDER BY created_at DESC",
    )
    .bind(tenant_id)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(complaints))
}

#[derive(Debug, Deserialize)]
pub struct ListComplaintsQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub status: Option<ComplaintStatus>,
}

#[derive(Debug, Serialize)]
pub struct ListComplaintsResponse {
    pub complaints: Vec<Complaint>,
    pub total: i64,
    pub page: u32,
    pub limit: u32,
}

pub async fn list_complaints(
    State(state): State<AppState>,
    Query(params): Query<ListComplaintsQuery>,
) -> ApiResult<Json<ListComplaintsResponse>> {
    let page = params.page.unwrap_or(1).max(1);
    let limit = params.limit.unwrap_or(20).min(100);
    let offset = (page - 1) * limit;

    let mut count_qb = sqlx::QueryBuilder::new("SELECT COUNT(*) FROM complaints WHERE 1=1");
    let mut qb = sqlx::QueryBuilder::new("SELECT * FROM complaints WHERE 1=1");
    for builder in [&mut count_qb, &mut qb] {
        if let Some(status) = params.status {
            builder.push(" AND status = ").push_bind(status);
        }
    }
    qb.push(" ORDER BY created_at DESC LIMIT ")
        .push_bind(limit as i64)
        .push(" OFFSET ")
        .push_bind(offset as i64);

    let total: i64 = count_qb.build_query_scalar().fetch_one(&state.db).await?;
    let complaints: Vec<Complaint> = qb.build_query_as().fetch_all(&state.db).await?;

    Ok(Json(ListComplaintsResponse {
        complaints,
        total,
        page,
        limit,
    }))
}

/// Admin status change. RESOLVED and REJECTED are terminal: any attempt to
/// move away from them is rejected.
pub async fn update_complaint_status(
    State(state): State<AppState>,
    Path(complaint_id): Path<Uuid>,
    Json(payload): Json<UpdateComplaintStatusRequest>,
) -> ApiResult<Json<Complaint>> {
    let mut tx = state.db.begin().await?;

    let complaint =
        sqlx::query_as::<_, Complaint>("SELECT * FROM complaints WHERE id = $1 FOR UPDATE")
            .bind(complaint_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(ApiError::NotFound)?;

    if !complaint.status.can_transition_to(payload.status) {
        return Err(ApiError::ValidationError(format!(
            "Complaint cannot move from {:?} to {:?}",
            complaint.status, payload.status
        )));
    }

    let complaint = sqlx::query_as::<_, Complaint>(
        r#"
        UPDATE complaints
        SET status = $1, admin_note = COALESCE($2, admin_note), updated_at = NOW()
        WHERE id = $3
        RETURNING *
        "#,
    )
    .bind(payload.status)
    .bind(&payload.admin_note)
    .bind(complaint_id)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    if let Err(err) = notify::publish(
        &state.db,
        &state.hub,
        NewNotification {
            user_id: complaint.tenant_id,
            notification_type: "complaint".to_string(),
            title: "Cập nhật khiếu nại".to_string(),
            message: format!("Khiếu nại \"{}\" đã chuyển sang {:?}.", complaint.title, complaint.status),
            priority: NotificationPriority::Medium,
            action_url: Some("/complaints".to_string()),
        },
    )
    .await
    {
        warn!("Failed to deliver complaint-status notification: {}", err);
    }

    Ok(Json(complaint))
}
