pub mod attendance;
pub mod auth;
pub mod classes;
pub mod courses;
pub mod employees;
pub mod health;
pub mod ratings;
pub mod sections;
pub mod students;
pub mod swagger;
pub mod users;

/// Role-gate rejection, same body the admin screens always returned.
pub(crate) fn forbidden() -> actix_web::HttpResponse {
    actix_web::HttpResponse::Forbidden().json(serde_json::json!({
        "detail": "You are not authorized to perform this action."
    }))
}
