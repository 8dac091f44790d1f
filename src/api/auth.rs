use actix_web::{web, HttpRequest, HttpResponse, ResponseError};
use crate::database::MongoDB;
use crate::services::auth_service::{
    self, AuthResponse, Claims, LoginRequest, LogoutRequest, RefreshTokenRequest, RegisterRequest,
    ResetPasswordRequest, SendOtpRequest, VerifyOtpRequest,
};
use crate::utils::error::AppError;

#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    tag = "Auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Registration successful", body = AuthResponse),
        (status = 400, description = "Email already exists")
    )
)]
pub async fn register(
    db: web::Data<MongoDB>,
    request: web::Json<RegisterRequest>,
) -> HttpResponse {
    log::info!("POST /auth/register - email: {}", request.email);

    match auth_service::register(&db, &request).await {
        Ok(response) => {
            log::info!("Registration successful: {}", request.email);
            HttpResponse::Created().json(response)
        }
        Err(e) => {
            log::warn!("Registration failed: {} - {}", request.email, e);
            e.error_response()
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(db: web::Data<MongoDB>, request: web::Json<LoginRequest>) -> HttpResponse {
    log::info!("POST /auth/login - email: {}", request.email);

    match auth_service::login(&db, &request).await {
        Ok(response) => {
            log::info!("Login successful: {}", request.email);
            HttpResponse::Ok().json(response)
        }
        Err(e) => {
            log::warn!("Login failed: {} - {}", request.email, e);
            e.error_response()
        }
    }
}

pub async fn refresh_token(
    db: web::Data<MongoDB>,
    request: web::Json<RefreshTokenRequest>,
) -> HttpResponse {
    log::info!("POST /auth/refresh");

    match auth_service::refresh(&db, &request).await {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(e) => {
            log::warn!("Token refresh failed: {}", e);
            e.error_response()
        }
    }
}

pub async fn logout(db: web::Data<MongoDB>, request: web::Json<LogoutRequest>) -> HttpResponse {
    log::info!("POST /auth/logout");

    match auth_service::logout(&db, &request).await {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({
            "message": "Logout successful"
        })),
        Err(e) => e.error_response(),
    }
}

pub async fn send_otp(db: web::Data<MongoDB>, request: web::Json<SendOtpRequest>) -> HttpResponse {
    log::info!("POST /auth/send-otp - email: {}", request.email);

    match auth_service::send_otp(&db, &request).await {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({
            "message": "OTP sent successfully."
        })),
        Err(e) => {
            log::warn!("OTP send failed: {} - {}", request.email, e);
            e.error_response()
        }
    }
}

pub async fn verify_otp(
    db: web::Data<MongoDB>,
    request: web::Json<VerifyOtpRequest>,
) -> HttpResponse {
    log::info!("POST /auth/verify-otp - email: {}", request.email);

    match auth_service::verify_otp(&db, &request).await {
        Ok(token) => HttpResponse::Ok().json(serde_json::json!({
            "message": "OTP verified successfully.",
            "token": token
        })),
        Err(e) => e.error_response(),
    }
}

/// The 12-char reset token from verify-otp travels in the Authorization
/// header, with or without a Bearer prefix.
pub async fn reset_password(
    db: web::Data<MongoDB>,
    req: HttpRequest,
    request: web::Json<ResetPasswordRequest>,
) -> HttpResponse {
    log::info!("POST /auth/reset-password - email: {}", request.email);

    let reset_token = req
        .headers()
        .get("Authorization")
        .and_then(|value| value.to_str().ok())
        .map(|value| value.strip_prefix("Bearer ").unwrap_or(value).to_string());

    let reset_token = match reset_token {
        Some(token) => token,
        None => {
            return AppError::Unauthorized("Reset token is required".to_string()).error_response()
        }
    };

    match auth_service::reset_password(&db, &request, &reset_token).await {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({
            "message": "Password reset successfully."
        })),
        Err(e) => e.error_response(),
    }
}

pub async fn get_me(db: web::Data<MongoDB>, user: web::ReqData<Claims>) -> HttpResponse {
    log::info!("GET /auth/me - user: {}", user.sub);

    match auth_service::get_current_user(&db, &user.sub).await {
        Ok(profile) => HttpResponse::Ok().json(profile),
        Err(e) => e.error_response(),
    }
}
