use actix_web::{web, HttpResponse, ResponseError};
use serde::Deserialize;
use crate::database::MongoDB;
use crate::models::{
    CreateSectionRequest, CreateSubSectionRequest, UpdateSectionRequest, UpdateSubSectionRequest,
};
use crate::services::auth_service::Claims;
use crate::services::section_service;

#[derive(Debug, Deserialize)]
pub struct SectionListQuery {
    pub course_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SubSectionListQuery {
    pub course_section_id: Option<String>,
}

pub async fn list_sections(
    _user: web::ReqData<Claims>,
    query: web::Query<SectionListQuery>,
    db: web::Data<MongoDB>,
) -> HttpResponse {
    match section_service::list_sections(&db, query.course_id.as_deref()).await {
        Ok(sections) => HttpResponse::Ok().json(sections),
        Err(e) => e.error_response(),
    }
}

pub async fn create_section(
    user: web::ReqData<Claims>,
    db: web::Data<MongoDB>,
    request: web::Json<CreateSectionRequest>,
) -> HttpResponse {
    match section_service::create_section(&db, &request, &user.sub).await {
        Ok(section) => HttpResponse::Created().json(section),
        Err(e) => e.error_response(),
    }
}

pub async fn update_section(
    _user: web::ReqData<Claims>,
    path: web::Path<String>,
    db: web::Data<MongoDB>,
    request: web::Json<UpdateSectionRequest>,
) -> HttpResponse {
    match section_service::update_section(&db, &path.into_inner(), &request).await {
        Ok(section) => HttpResponse::Ok().json(section),
        Err(e) => e.error_response(),
    }
}

pub async fn delete_section(
    _user: web::ReqData<Claims>,
    path: web::Path<String>,
    db: web::Data<MongoDB>,
) -> HttpResponse {
    match section_service::delete_section(&db, &path.into_inner()).await {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({
            "message": "Section deleted successfully"
        })),
        Err(e) => e.error_response(),
    }
}

pub async fn list_sub_sections(
    _user: web::ReqData<Claims>,
    query: web::Query<SubSectionListQuery>,
    db: web::Data<MongoDB>,
) -> HttpResponse {
    match section_service::list_sub_sections(&db, query.course_section_id.as_deref()).await {
        Ok(subs) => HttpResponse::Ok().json(subs),
        Err(e) => e.error_response(),
    }
}

pub async fn create_sub_section(
    user: web::ReqData<Claims>,
    db: web::Data<MongoDB>,
    request: web::Json<CreateSubSectionRequest>,
) -> HttpResponse {
    match section_service::create_sub_section(&db, &request, &user.sub).await {
        Ok(sub) => HttpResponse::Created().json(sub),
        Err(e) => e.error_response(),
    }
}

pub async fn update_sub_section(
    _user: web::ReqData<Claims>,
    path: web::Path<String>,
    db: web::Data<MongoDB>,
    request: web::Json<UpdateSubSectionRequest>,
) -> HttpResponse {
    match section_service::update_sub_section(&db, &path.into_inner(), &request).await {
        Ok(sub) => HttpResponse::Ok().json(sub),
        Err(e) => e.error_response(),
    }
}

pub async fn delete_sub_section(
    _user: web::ReqData<Claims>,
    path: web::Path<String>,
    db: web::Data<MongoDB>,
) -> HttpResponse {
    match section_service::delete_sub_section(&db, &path.into_inner()).await {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({
            "message": "SubSection deleted successfully"
        })),
        Err(e) => e.error_response(),
    }
}
