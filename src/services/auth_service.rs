use crate::database::{collections, MongoDB};
use crate::models::{BlacklistedToken, OtpRecord, User, UserResponse, UserRole};
use crate::services::mail_service;
use crate::utils::{error::AppError, password};
use bcrypt::{hash, verify, DEFAULT_COST};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use mongodb::bson::{doc, oid::ObjectId, DateTime as BsonDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// JWT Claims
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String, // user_id
    pub email: String,
    pub role: UserRole,
    pub iat: usize,
    pub exp: usize,
    pub jti: String,
    pub iss: String,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: Option<UserRole>,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

#[derive(Debug, Deserialize)]
pub struct LogoutRequest {
    pub access_token: String,
}

#[derive(Debug, Deserialize)]
pub struct SendOtpRequest {
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct VerifyOtpRequest {
    pub email: String,
    pub otp: String,
}

#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    pub email: String,
    pub new_password: String,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct AuthResponse {
    pub success: bool,
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_in: i64,
    pub user: UserInfo,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct UserInfo {
    pub id: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: UserRole,
}

impl From<&User> for UserInfo {
    fn from(user: &User) -> Self {
        UserInfo {
            id: user.user_id.clone(),
            email: user.email.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            role: user.role,
        }
    }
}

fn get_jwt_secret() -> String {
    std::env::var("JWT_SECRET").unwrap_or_else(|_| "default-secret-change-me".to_string())
}

fn get_jwt_issuer() -> String {
    std::env::var("JWT_ISSUER").unwrap_or_else(|_| "elearning-service".to_string())
}

const ACCESS_TOKEN_HOURS: i64 = 24;
const REFRESH_TOKEN_DAYS: i64 = 30;

fn issue_token(user: &User, lifetime: Duration) -> Result<(String, i64), AppError> {
    let now = Utc::now();
    let exp = now + lifetime;

    let claims = Claims {
        sub: user.user_id.clone(),
        email: user.email.clone(),
        role: user.role,
        iat: now.timestamp() as usize,
        exp: exp.timestamp() as usize,
        jti: Uuid::new_v4().to_string(),
        iss: get_jwt_issuer(),
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(get_jwt_secret().as_ref()),
    )
    .map_err(|e| AppError::DatabaseError(format!("Failed to generate token: {}", e)))?;

    Ok((token, (exp - now).num_seconds()))
}

pub fn generate_access_token(user: &User) -> Result<(String, i64), AppError> {
    issue_token(user, Duration::hours(ACCESS_TOKEN_HOURS))
}

pub fn generate_refresh_token(user: &User) -> Result<String, AppError> {
    issue_token(user, Duration::days(REFRESH_TOKEN_DAYS)).map(|(token, _)| token)
}

pub fn verify_token(token: &str) -> Result<Claims, AppError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[get_jwt_issuer()]);

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(get_jwt_secret().as_ref()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| AppError::Unauthorized(format!("Invalid token: {}", e)))
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub async fn register(db: &MongoDB, request: &RegisterRequest) -> Result<AuthResponse, AppError> {
    let collection = db.collection::<User>(collections::USERS);
    let email = normalize_email(&request.email);

    if collection.find_one(doc! { "email": &email }).await?.is_some() {
        return Err(AppError::Conflict("Email already exists".to_string()));
    }

    let hashed = hash(&request.password, DEFAULT_COST)
        .map_err(|e| AppError::DatabaseError(format!("Failed to hash password: {}", e)))?;

    let new_user = User {
        _id: None,
        user_id: ObjectId::new().to_hex(),
        email,
        password: Some(hashed),
        first_name: request.first_name.clone(),
        middle_name: None,
        last_name: request.last_name.clone(),
        contact: None,
        emergency_contact: None,
        emergency_contact_name: None,
        language: None,
        gender: None,
        date_of_birth: None,
        address: None,
        zip_code: None,
        bio: None,
        role: request.role.unwrap_or(UserRole::Student),
        employee_type: None,
        position: None,
        class_id: None,
        mother_first_name: None,
        mother_middle_name: None,
        mother_last_name: None,
        father_first_name: None,
        father_middle_name: None,
        father_last_name: None,
        mother_contact_no: None,
        father_contact_no: None,
        parent_mail: None,
        attendance: 0,
        leaves: 0,
        created_at: Some(BsonDateTime::now()),
        updated_at: Some(BsonDateTime::now()),
    };

    collection.insert_one(&new_user).await?;

    log::info!("User registered successfully: {}", new_user.email);

    let (access_token, expires_in) = generate_access_token(&new_user)?;
    let refresh_token = generate_refresh_token(&new_user)?;

    Ok(AuthResponse {
        success: true,
        access_token,
        refresh_token: Some(refresh_token),
        expires_in,
        user: UserInfo::from(&new_user),
    })
}

pub async fn login(db: &MongoDB, request: &LoginRequest) -> Result<AuthResponse, AppError> {
    let collection = db.collection::<User>(collections::USERS);
    let email = normalize_email(&request.email);

    let user = collection
        .find_one(doc! { "email": &email })
        .await?
        .ok_or_else(|| AppError::Unauthorized("Invalid Credentials".to_string()))?;

    let stored = user
        .password
        .as_ref()
        .ok_or_else(|| AppError::Unauthorized("Invalid Credentials".to_string()))?;

    let valid = verify(&request.password, stored)
        .map_err(|e| AppError::DatabaseError(format!("Password verification error: {}", e)))?;

    if !valid {
        return Err(AppError::Unauthorized("Invalid Credentials".to_string()));
    }

    let (access_token, expires_in) = generate_access_token(&user)?;
    let refresh_token = generate_refresh_token(&user)?;

    Ok(AuthResponse {
        success: true,
        access_token,
        refresh_token: Some(refresh_token),
        expires_in,
        user: UserInfo::from(&user),
    })
}

pub async fn refresh(db: &MongoDB, request: &RefreshTokenRequest) -> Result<AuthResponse, AppError> {
    let claims = verify_token(&request.refresh_token)?;

    let collection = db.collection::<User>(collections::USERS);
    let user = collection
        .find_one(doc! { "user_id": &claims.sub })
        .await?
        .ok_or_else(|| AppError::Unauthorized("User not found".to_string()))?;

    let (access_token, expires_in) = generate_access_token(&user)?;
    let refresh_token = generate_refresh_token(&user)?;

    Ok(AuthResponse {
        success: true,
        access_token,
        refresh_token: Some(refresh_token),
        expires_in,
        user: UserInfo::from(&user),
    })
}

/// Logout blacklists the access token; the middleware refuses it from
/// then on.
pub async fn logout(db: &MongoDB, request: &LogoutRequest) -> Result<(), AppError> {
    let collection = db.collection::<BlacklistedToken>(collections::BLACKLIST);

    if collection
        .find_one(doc! { "token": &request.access_token })
        .await?
        .is_some()
    {
        return Err(AppError::Conflict(
            "Access token already blacklisted".to_string(),
        ));
    }

    collection
        .insert_one(&BlacklistedToken {
            _id: None,
            token: request.access_token.clone(),
            blacklisted_at: BsonDateTime::now(),
        })
        .await?;

    Ok(())
}

pub async fn is_blacklisted(db: &MongoDB, token: &str) -> Result<bool, AppError> {
    let collection = db.collection::<BlacklistedToken>(collections::BLACKLIST);
    Ok(collection.find_one(doc! { "token": token }).await?.is_some())
}

/// Generates a fresh 4-digit OTP for the email, replacing any previous
/// one, and mails it.
pub async fn send_otp(db: &MongoDB, request: &SendOtpRequest) -> Result<(), AppError> {
    let email = normalize_email(&request.email);

    let users = db.collection::<User>(collections::USERS);
    if users.find_one(doc! { "email": &email }).await?.is_none() {
        return Err(AppError::InvalidInput(
            "You are not a registered user".to_string(),
        ));
    }

    let otp = password::generate_otp();

    let otps = db.collection::<OtpRecord>(collections::OTPS);
    let options = mongodb::options::UpdateOptions::builder().upsert(true).build();
    otps.update_one(
        doc! { "email": &email },
        doc! {
            "$set": {
                "otp": &otp,
                "token": mongodb::bson::Bson::Null,
                "updated_at": BsonDateTime::now(),
            },
            "$setOnInsert": {
                "email": &email,
                "created_at": BsonDateTime::now(),
            }
        },
    )
    .with_options(options)
    .await?;

    mail_service::send_mail(
        &email,
        "Password Reset OTP",
        &format!("Your OTP for password reset is: {}", otp),
    )
    .await?;

    Ok(())
}

/// Trades a valid (email, otp) pair for a reset token. The OTP is cleared
/// so it cannot be replayed.
pub async fn verify_otp(db: &MongoDB, request: &VerifyOtpRequest) -> Result<String, AppError> {
    let email = normalize_email(&request.email);
    let otps = db.collection::<OtpRecord>(collections::OTPS);

    let record = otps
        .find_one(doc! { "email": &email, "otp": &request.otp })
        .await?
        .filter(|record| !record.otp.is_empty())
        .ok_or_else(|| AppError::InvalidInput("Invalid OTP.".to_string()))?;

    let token = password::generate_password(12);

    otps.update_one(
        doc! { "email": &record.email },
        doc! {
            "$set": {
                "otp": "",
                "token": &token,
                "updated_at": BsonDateTime::now(),
            }
        },
    )
    .await?;

    Ok(token)
}

pub async fn reset_password(
    db: &MongoDB,
    request: &ResetPasswordRequest,
    reset_token: &str,
) -> Result<(), AppError> {
    let email = normalize_email(&request.email);
    let otps = db.collection::<OtpRecord>(collections::OTPS);

    let record = otps
        .find_one(doc! { "email": &email, "token": reset_token })
        .await?
        .ok_or_else(|| AppError::InvalidInput("Failed to reset password".to_string()))?;

    let hashed = hash(&request.new_password, DEFAULT_COST)
        .map_err(|e| AppError::DatabaseError(format!("Failed to hash password: {}", e)))?;

    let users = db.collection::<User>(collections::USERS);
    let updated = users
        .update_one(
            doc! { "email": &email },
            doc! { "$set": { "password": &hashed, "updated_at": BsonDateTime::now() } },
        )
        .await?;

    if updated.matched_count == 0 {
        return Err(AppError::NotFound("User not found".to_string()));
    }

    otps.delete_one(doc! { "email": &record.email }).await?;

    log::info!("Password reset completed for {}", email);

    Ok(())
}

pub async fn get_current_user(db: &MongoDB, user_id: &str) -> Result<UserResponse, AppError> {
    let collection = db.collection::<User>(collections::USERS);

    let user = collection
        .find_one(doc! { "user_id": user_id })
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(UserResponse::from(user))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user(role: UserRole) -> User {
        User {
            _id: None,
            user_id: ObjectId::new().to_hex(),
            email: "teacher@example.com".into(),
            password: None,
            first_name: Some("Grace".into()),
            middle_name: None,
            last_name: Some("Hopper".into()),
            contact: None,
            emergency_contact: None,
            emergency_contact_name: None,
            language: None,
            gender: None,
            date_of_birth: None,
            address: None,
            zip_code: None,
            bio: None,
            role,
            employee_type: None,
            position: None,
            class_id: None,
            mother_first_name: None,
            mother_middle_name: None,
            mother_last_name: None,
            father_first_name: None,
            father_middle_name: None,
            father_last_name: None,
            mother_contact_no: None,
            father_contact_no: None,
            parent_mail: None,
            attendance: 0,
            leaves: 0,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn access_token_round_trips() {
        let user = sample_user(UserRole::Teacher);
        let (token, expires_in) = generate_access_token(&user).unwrap();
        assert!(expires_in > 0);

        let claims = verify_token(&token).unwrap();
        assert_eq!(claims.sub, user.user_id);
        assert_eq!(claims.email, user.email);
        assert_eq!(claims.role, UserRole::Teacher);
    }

    #[test]
    fn tampered_token_is_rejected() {
        let user = sample_user(UserRole::Student);
        let (token, _) = generate_access_token(&user).unwrap();

        let mut tampered = token;
        tampered.pop();
        tampered.push('x');
        assert!(verify_token(&tampered).is_err());
    }

    #[test]
    fn garbage_token_is_rejected() {
        assert!(verify_token("not-a-jwt").is_err());
    }

    #[test]
    fn bcrypt_hash_verifies() {
        let hashed = hash("s3cret", 4).unwrap();
        assert!(verify("s3cret", &hashed).unwrap());
        assert!(!verify("wrong", &hashed).unwrap());
    }
}
