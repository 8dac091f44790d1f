use actix_web::{web, HttpResponse, ResponseError};
use crate::database::MongoDB;
use crate::models::{CourseListQuery, CourseResponse, CreateCourseRequest, UpdateCourseRequest};
use crate::services::auth_service::Claims;
use crate::services::{course_service, rating_service};

#[utoipa::path(
    get,
    path = "/api/v1/courses",
    tag = "Courses",
    params(
        ("page" = Option<u64>, Query, description = "1-based page number"),
        ("records" = Option<i64>, Query, description = "Page size, default 10, max 20")
    ),
    responses(
        (status = 200, description = "Paginated course list", body = [CourseResponse])
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_courses(
    _user: web::ReqData<Claims>,
    query: web::Query<CourseListQuery>,
    db: web::Data<MongoDB>,
) -> HttpResponse {
    match course_service::list(&db, &query).await {
        Ok(courses) => HttpResponse::Ok().json(courses),
        Err(e) => e.error_response(),
    }
}

pub async fn get_course(
    _user: web::ReqData<Claims>,
    path: web::Path<String>,
    db: web::Data<MongoDB>,
) -> HttpResponse {
    match course_service::get(&db, &path.into_inner()).await {
        Ok(course) => HttpResponse::Ok().json(course),
        Err(e) => e.error_response(),
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/courses",
    tag = "Courses",
    request_body = CreateCourseRequest,
    responses(
        (status = 201, description = "Course created", body = CourseResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_course(
    user: web::ReqData<Claims>,
    db: web::Data<MongoDB>,
    request: web::Json<CreateCourseRequest>,
) -> HttpResponse {
    match course_service::create(&db, &request, &user.sub).await {
        Ok(course) => HttpResponse::Created().json(course),
        Err(e) => e.error_response(),
    }
}

pub async fn update_course(
    _user: web::ReqData<Claims>,
    path: web::Path<String>,
    db: web::Data<MongoDB>,
    request: web::Json<UpdateCourseRequest>,
) -> HttpResponse {
    match course_service::update(&db, &path.into_inner(), &request).await {
        Ok(course) => HttpResponse::Ok().json(course),
        Err(e) => e.error_response(),
    }
}

pub async fn delete_course(
    _user: web::ReqData<Claims>,
    path: web::Path<String>,
    db: web::Data<MongoDB>,
) -> HttpResponse {
    match course_service::delete(&db, &path.into_inner()).await {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({
            "message": "Course deleted successfully"
        })),
        Err(e) => e.error_response(),
    }
}

/// Public aggregate; no token required.
pub async fn overall_rating(path: web::Path<String>, db: web::Data<MongoDB>) -> HttpResponse {
    match rating_service::overall_rating(&db, &path.into_inner()).await {
        Ok(rating) => HttpResponse::Ok().json(rating),
        Err(e) => e.error_response(),
    }
}
