use actix_web::{web, HttpResponse, ResponseError};
use crate::api::forbidden;
use crate::database::MongoDB;
use crate::models::UpdateUserRequest;
use crate::services::auth_service::Claims;
use crate::services::user_service;

pub async fn list_users(user: web::ReqData<Claims>, db: web::Data<MongoDB>) -> HttpResponse {
    if !user.role.can_manage_users() {
        return forbidden();
    }

    match user_service::list_users(&db).await {
        Ok(users) => HttpResponse::Ok().json(users),
        Err(e) => e.error_response(),
    }
}

pub async fn get_user(
    _user: web::ReqData<Claims>,
    path: web::Path<String>,
    db: web::Data<MongoDB>,
) -> HttpResponse {
    match user_service::get_user(&db, &path.into_inner()).await {
        Ok(user) => HttpResponse::Ok().json(user),
        Err(e) => e.error_response(),
    }
}

pub async fn update_user(
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

pub async fn delete_user(
    user: web::ReqData<Claims>,
    path: web::Path<String>,
    db: web::Data<MongoDB>,
) -> HttpResponse {
    if !user.role.can_manage_users() {
        return forbidden();
    }

    let user_id = path.into_inner();
    match user_service::delete_user(&db, &user_id).await {
        Ok(()) => {
            log::info!("User deleted: {}", user_id);
            HttpResponse::Ok().json(serde_json::json!({
                "message": "User deleted successfully"
            }))
        }
        Err(e) => e.error_response(),
    }
}
