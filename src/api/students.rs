use actix_web::{web, HttpResponse, ResponseError};
use crate::api::forbidden;
use crate::database::MongoDB;
use crate::models::{CreateStudentRequest, StudentListQuery, UpdateUserRequest};
use crate::services::auth_service::Claims;
use crate::services::user_service;

pub async fn list_students(
    user: web::ReqData<Claims>,
    query: web::Query<StudentListQuery>,
    db: web::Data<MongoDB>,
) -> HttpResponse {
    if !user.role.can_manage_users() {
        return forbidden();
    }

    match user_service::list_students(&db, &query).await {
        Ok(students) => HttpResponse::Ok().json(students),
        Err(e) => e.error_response(),
    }
}

pub async fn create_student(
    user: web::ReqData<Claims>,
    db: web::Data<MongoDB>,
    request: web::Json<CreateStudentRequest>,
) -> HttpResponse {
    if !user.role.can_manage_users() {
        return forbidden();
    }

    match user_service::create_student(&db, request.into_inner()).await {
        Ok(_) => HttpResponse::Created().json(serde_json::json!({
            "message": "Student created Successfully"
        })),
        Err(e) => e.error_response(),
    }
}

pub async fn update_student(
    user: web::ReqData<Claims>,
    path: web::Path<String>,
    db: web::Data<MongoDB>,
    request: web::Json<UpdateUserRequest>,
) -> HttpResponse {
    if !user.role.can_manage_users() {
        return forbidden();
    }

    match user_service::update_user(&db, &path.into_inner(), &request).await {
        Ok(updated) => HttpResponse::Ok().json(updated),
        Err(e) => e.error_response(),
    }
}
