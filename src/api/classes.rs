use actix_web::{web, HttpResponse, ResponseError};
use crate::database::MongoDB;
use crate::models::CreateClassRequest;
use crate::services::auth_service::Claims;
use crate::services::class_service;

pub async fn list_classes(_user: web::ReqData<Claims>, db: web::Data<MongoDB>) -> HttpResponse {
    match class_service::list(&db).await {
        Ok(classes) => HttpResponse::Ok().json(classes),
        Err(e) => e.error_response(),
    }
}

pub async fn get_class(
    _user: web::ReqData<Claims>,
    path: web::Path<String>,
    db: web::Data<MongoDB>,
) -> HttpResponse {
    match class_service::get(&db, &path.into_inner()).await {
        Ok(class) => HttpResponse::Ok().json(class),
        Err(e) => e.error_response(),
    }
}

pub async fn create_class(
    _user: web::ReqData<Claims>,
    db: web::Data<MongoDB>,
    request: web::Json<CreateClassRequest>,
) -> HttpResponse {
    match class_service::create(&db, &request).await {
        Ok(class) => HttpResponse::Created().json(class),
        Err(e) => e.error_response(),
    }
}

pub async fn update_class(
    _user: web::ReqData<Claims>,
    path: web::Path<String>,
    db: web::Data<MongoDB>,
    request: web::Json<CreateClassRequest>,
) -> HttpResponse {
    match class_service::update(&db, &path.into_inner(), &request).await {
        Ok(class) => HttpResponse::Ok().json(class),
        Err(e) => e.error_response(),
    }
}

pub async fn delete_class(
    _user: web::ReqData<Claims>,
    path: web::Path<String>,
    db: web::Data<MongoDB>,
) -> HttpResponse {
    match class_service::delete(&db, &path.into_inner()).await {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({
            "message": "Class deleted successfully"
        })),
        Err(e) => e.error_response(),
    }
}
