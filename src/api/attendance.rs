use actix_web::{web, HttpResponse, ResponseError};
use crate::database::MongoDB;
use crate::models::{AttendanceListQuery, AttendanceResponse, MarkAttendanceRequest};
use crate::services::attendance_service;
use crate::services::auth_service::Claims;
use crate::utils::error::AppError;

#[utoipa::path(
    post,
    path = "/api/v1/attendance/mark",
    tag = "Attendance",
    request_body = MarkAttendanceRequest,
    responses(
        (status = 200, description = "Attendance record after the mark", body = AttendanceResponse),
        (status = 400, description = "Unknown user/course, malformed date, or future date")
    ),
    security(("bearer_auth" = []))
)]
pub async fn mark(
    user: web::ReqData<Claims>,
    db: web::Data<MongoDB>,
    request: web::Json<MarkAttendanceRequest>,
) -> HttpResponse {
    log::info!(
        "POST /attendance/mark - user: {}, course: {}, actor: {}",
        request.user_id,
        request.course_id,
        user.sub
    );

    match attendance_service::mark(&db, &request, &user).await {
        Ok(record) => HttpResponse::Ok().json(record),
        // All caller-input failures surface as 400 {"detail": ...} here,
        // including missing user/course.
        Err(AppError::DatabaseError(msg)) => AppError::DatabaseError(msg).error_response(),
        Err(e) => HttpResponse::BadRequest().json(serde_json::json!({
            "detail": e.to_string()
        })),
    }
}

pub async fn list(
    _user: web::ReqData<Claims>,
    query: web::Query<AttendanceListQuery>,
    db: web::Data<MongoDB>,
) -> HttpResponse {
    match attendance_service::list(&db, &query).await {
        Ok(records) => HttpResponse::Ok().json(records),
        Err(e) => e.error_response(),
    }
}
