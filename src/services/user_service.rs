use crate::database::{collections, MongoDB};
use crate::models::{
    CreateEmployeeRequest, CreateStudentRequest, EmployeeListQuery, ParentInfo, StudentListQuery,
    UpdateUserRequest, User, UserProfile, UserResponse, UserRole,
};
use crate::services::mail_service;
use crate::utils::{error::AppError, password};
use bcrypt::{hash, DEFAULT_COST};
use futures::stream::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, to_bson, DateTime as BsonDateTime, Document};

const EMPLOYEE_ROLES: [&str; 4] = ["teacher", "admin", "other", "driver"];

pub async fn find_by_id(db: &MongoDB, user_id: &str) -> Result<User, AppError> {
    let collection = db.collection::<User>(collections::USERS);
    collection
        .find_one(doc! { "user_id": user_id })
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))
}

pub async fn list_users(db: &MongoDB) -> Result<Vec<UserResponse>, AppError> {
    let collection = db.collection::<User>(collections::USERS);
    let users: Vec<User> = collection.find(doc! {}).await?.try_collect().await?;
    Ok(users.into_iter().map(UserResponse::from).collect())
}

pub async fn get_user(db: &MongoDB, user_id: &str) -> Result<UserResponse, AppError> {
    find_by_id(db, user_id).await.map(UserResponse::from)
}

/// Employees are every non-student role; the query can narrow to one
/// role, employment type or position.
pub async fn list_employees(
    db: &MongoDB,
    query: &EmployeeListQuery,
) -> Result<Vec<UserResponse>, AppError> {
    let mut filter = match query.user_type {
        Some(role) => doc! { "role": role.to_string() },
        None => doc! { "role": { "$in": EMPLOYEE_ROLES.to_vec() } },
    };
    if let Some(employee_type) = query.employee_type {
        let value = to_bson(&employee_type)
            .map_err(|e| AppError::InvalidInput(format!("Invalid employee_type: {}", e)))?;
        filter.insert("employee_type", value);
    }
    if let Some(position) = &query.position {
        filter.insert("position", position);
    }

    let collection = db.collection::<User>(collections::USERS);
    let users: Vec<User> = collection.find(filter).await?.try_collect().await?;
    Ok(users.into_iter().map(UserResponse::from).collect())
}

pub async fn list_students(
    db: &MongoDB,
    query: &StudentListQuery,
) -> Result<Vec<UserResponse>, AppError> {
    let mut filter = doc! { "role": "student" };
    if let Some(class_id) = &query.class_name {
        filter.insert("class_id", class_id);
    }

    let collection = db.collection::<User>(collections::USERS);
    let users: Vec<User> = collection.find(filter).await?.try_collect().await?;
    Ok(users.into_iter().map(UserResponse::from).collect())
}

async fn create_with_generated_password(
    db: &MongoDB,
    email: &str,
    profile: UserProfile,
    parent_info: ParentInfo,
    default_role: UserRole,
) -> Result<UserResponse, AppError> {
    let collection = db.collection::<User>(collections::USERS);
    let email = email.trim().to_lowercase();

    if collection.find_one(doc! { "email": &email }).await?.is_some() {
        return Err(AppError::Conflict("Email already exists".to_string()));
    }

    let generated = password::generate_password(8);
    let hashed = hash(&generated, DEFAULT_COST)
        .map_err(|e| AppError::DatabaseError(format!("Failed to hash password: {}", e)))?;

    let user = User {
        _id: None,
        user_id: ObjectId::new().to_hex(),
        email: email.clone(),
        password: Some(hashed),
        first_name: profile.first_name,
        middle_name: profile.middle_name,
        last_name: profile.last_name,
        contact: profile.contact,
        emergency_contact: profile.emergency_contact,
        emergency_contact_name: profile.emergency_contact_name,
        language: profile.language,
        gender: profile.gender,
        date_of_birth: profile.date_of_birth,
        address: profile.address,
        zip_code: profile.zip_code,
        bio: profile.bio,
        role: profile.role.unwrap_or(default_role),
        employee_type: profile.employee_type,
        position: profile.position,
        class_id: profile.class_id,
        mother_first_name: parent_info.mother_first_name,
        mother_middle_name: parent_info.mother_middle_name,
        mother_last_name: parent_info.mother_last_name,
        father_first_name: parent_info.father_first_name,
        father_middle_name: parent_info.father_middle_name,
        father_last_name: parent_info.father_last_name,
        mother_contact_no: parent_info.mother_contact_no,
        father_contact_no: parent_info.father_contact_no,
        parent_mail: parent_info.parent_mail,
        attendance: 0,
        leaves: profile.leaves.unwrap_or(0),
        created_at: Some(BsonDateTime::now()),
        updated_at: Some(BsonDateTime::now()),
    };

    collection.insert_one(&user).await?;

    mail_service::send_welcome_mail(&email, &user.fullname(), &generated).await?;

    log::info!("Provisioned {} account for {}", user.role, email);

    Ok(UserResponse::from(user))
}

pub async fn create_employee(
    db: &MongoDB,
    request: CreateEmployeeRequest,
) -> Result<UserResponse, AppError> {
    create_with_generated_password(
        db,
        &request.email,
        request.profile,
        ParentInfo::default(),
        UserRole::Teacher,
    )
    .await
}

pub async fn create_student(
    db: &MongoDB,
    request: CreateStudentRequest,
) -> Result<UserResponse, AppError> {
    let mut profile = request.basic_info.profile;
    // A student account is always a student, whatever the payload says.
    profile.role = Some(UserRole::Student);
    create_with_generated_password(
        db,
        &request.basic_info.email,
        profile,
        request.parent_info,
        UserRole::Student,
    )
    .await
}

/// Applies the provided profile fields. The stored password hash is never
/// part of the update document.
pub async fn update_user(
    db: &MongoDB,
    user_id: &str,
    request: &UpdateUserRequest,
) -> Result<UserResponse, AppError> {
    let mut changes: Document = mongodb::bson::to_document(&request.profile)
        .map_err(|e| AppError::InvalidInput(format!("Invalid update payload: {}", e)))?;
    changes.remove("password");
    changes.insert("updated_at", BsonDateTime::now());

    let collection = db.collection::<User>(collections::USERS);
    let options = mongodb::options::FindOneAndUpdateOptions::builder()
        .return_document(mongodb::options::ReturnDocument::After)
        .build();

    collection
        .find_one_and_update(doc! { "user_id": user_id }, doc! { "$set": changes })
        .with_options(options)
        .await?
        .map(UserResponse::from)
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))
}

pub async fn delete_user(db: &MongoDB, user_id: &str) -> Result<(), AppError> {
    let collection = db.collection::<User>(collections::USERS);
    let result = collection.delete_one(doc! { "user_id": user_id }).await?;

    if result.deleted_count == 0 {
        return Err(AppError::NotFound("User not found".to_string()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Gender;

    #[test]
    fn update_document_never_contains_password() {
        let profile = UserProfile {
            first_name: Some("Ada".into()),
            gender: Some(Gender::Female),
            ..Default::default()
        };
        let mut document = mongodb::bson::to_document(&profile).unwrap();
        document.remove("password");

        assert!(document.get("password").is_none());
        assert_eq!(document.get_str("first_name").unwrap(), "Ada");
        // Absent optional fields must not overwrite stored values.
        assert!(document.get("last_name").is_none());
    }
}
