use actix_web::{web, HttpResponse, ResponseError};
use crate::database::MongoDB;
use crate::models::CreateRatingRequest;
use crate::services::auth_service::Claims;
use crate::services::rating_service;

pub async fn post_review(
    user: web::ReqData<Claims>,
    db: web::Data<MongoDB>,
    request: web::Json<CreateRatingRequest>,
) -> HttpResponse {
    match rating_service::post_review(&db, &request, &user.sub).await {
        Ok(_) => HttpResponse::Created().json(serde_json::json!({
            "message": "Review posted successfully"
        })),
        Err(e) => e.error_response(),
    }
}
