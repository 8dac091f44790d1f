use mongodb::bson::{oid::ObjectId, DateTime as BsonDateTime};
use serde::{Deserialize, Serialize};

/// Closed role set. Authorization decisions go through the capability
/// methods below instead of comparing raw strings at call sites.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Student,
    Teacher,
    Admin,
    Driver,
    Other,
}

impl UserRole {
    pub fn can_manage_users(&self) -> bool {
        matches!(self, UserRole::Admin)
    }

    /// Only admins may change the status of an attendance record that
    /// already exists for the day.
    pub fn can_override_attendance(&self) -> bool {
        matches!(self, UserRole::Admin)
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            UserRole::Student => "student",
            UserRole::Teacher => "teacher",
            UserRole::Admin => "admin",
            UserRole::Driver => "driver",
            UserRole::Other => "other",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmployeeType {
    PartTime,
    FullTime,
}

/// User document (students, teachers, admins, drivers).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub _id: Option<ObjectId>,
    pub user_id: String,
    /// Stored lowercased; lookups normalize at the edge.
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    pub first_name: Option<String>,
    pub middle_name: Option<String>,
    pub last_name: Option<String>,
    pub contact: Option<String>,
    pub emergency_contact: Option<String>,
    pub emergency_contact_name: Option<String>,
    pub language: Option<String>,
    pub gender: Option<Gender>,
    pub date_of_birth: Option<chrono::NaiveDate>,
    pub address: Option<String>,
    pub zip_code: Option<String>,
    pub bio: Option<String>,
    #[serde(default = "default_role")]
    pub role: UserRole,
    pub employee_type: Option<EmployeeType>,
    pub position: Option<String>,
    pub class_id: Option<String>,
    pub mother_first_name: Option<String>,
    pub mother_middle_name: Option<String>,
    pub mother_last_name: Option<String>,
    pub father_first_name: Option<String>,
    pub father_middle_name: Option<String>,
    pub father_last_name: Option<String>,
    pub mother_contact_no: Option<String>,
    pub father_contact_no: Option<String>,
    pub parent_mail: Option<String>,
    /// Aggregate counter maintained elsewhere; the marking workflow never
    /// touches it.
    #[serde(default)]
    pub attendance: i32,
    #[serde(default)]
    pub leaves: i32,
    pub created_at: Option<BsonDateTime>,
    pub updated_at: Option<BsonDateTime>,
}

fn default_role() -> UserRole {
    UserRole::Student
}

impl User {
    pub fn fullname(&self) -> String {
        [&self.first_name, &self.middle_name, &self.last_name]
            .iter()
            .filter_map(|part| part.as_deref())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Profile payload shared by employee/student creation and updates. Every
/// field is optional; absent fields are left untouched on update.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub middle_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emergency_contact: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emergency_contact_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<chrono::NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zip_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<UserRole>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employee_type: Option<EmployeeType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub leaves: Option<i32>,
}

/// Parent block for student registration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParentInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mother_first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mother_middle_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mother_last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub father_first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub father_middle_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub father_last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mother_contact_no: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub father_contact_no: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_mail: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateEmployeeRequest {
    pub email: String,
    #[serde(flatten)]
    pub profile: UserProfile,
}

#[derive(Debug, Deserialize)]
pub struct CreateStudentRequest {
    pub basic_info: StudentBasicInfo,
    #[serde(default)]
    pub parent_info: ParentInfo,
}

#[derive(Debug, Deserialize)]
pub struct StudentBasicInfo {
    pub email: String,
    #[serde(flatten)]
    pub profile: UserProfile,
}

#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    #[serde(flatten)]
    pub profile: UserProfile,
}

#[derive(Debug, Deserialize)]
pub struct EmployeeListQuery {
    pub user_type: Option<UserRole>,
    pub employee_type: Option<EmployeeType>,
    pub position: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct StudentListQuery {
    pub class_name: Option<String>,
}

/// Public view of a user. The password hash never leaves the service.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub first_name: Option<String>,
    pub middle_name: Option<String>,
    pub last_name: Option<String>,
    pub contact: Option<String>,
    pub emergency_contact: Option<String>,
    pub emergency_contact_name: Option<String>,
    pub language: Option<String>,
    #[schema(value_type = Option<String>)]
    pub gender: Option<Gender>,
    #[schema(value_type = Option<String>)]
    pub date_of_birth: Option<chrono::NaiveDate>,
    pub address: Option<String>,
    pub zip_code: Option<String>,
    pub bio: Option<String>,
    pub role: UserRole,
    #[schema(value_type = Option<String>)]
    pub employee_type: Option<EmployeeType>,
    pub position: Option<String>,
    pub class_id: Option<String>,
    pub mother_first_name: Option<String>,
    pub mother_middle_name: Option<String>,
    pub mother_last_name: Option<String>,
    pub father_first_name: Option<String>,
    pub father_middle_name: Option<String>,
    pub father_last_name: Option<String>,
    pub mother_contact_no: Option<String>,
    pub father_contact_no: Option<String>,
    pub parent_mail: Option<String>,
    pub attendance: i32,
    pub leaves: i32,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        UserResponse {
            id: user.user_id,
            email: user.email,
            first_name: user.first_name,
            middle_name: user.middle_name,
            last_name: user.last_name,
            contact: user.contact,
            emergency_contact: user.emergency_contact,
            emergency_contact_name: user.emergency_contact_name,
            language: user.language,
            gender: user.gender,
            date_of_birth: user.date_of_birth,
            address: user.address,
            zip_code: user.zip_code,
            bio: user.bio,
            role: user.role,
            employee_type: user.employee_type,
            position: user.position,
            class_id: user.class_id,
            mother_first_name: user.mother_first_name,
            mother_middle_name: user.mother_middle_name,
            mother_last_name: user.mother_last_name,
            father_first_name: user.father_first_name,
            father_middle_name: user.father_middle_name,
            father_last_name: user.father_last_name,
            mother_contact_no: user.mother_contact_no,
            father_contact_no: user.father_contact_no,
            parent_mail: user.parent_mail,
            attendance: user.attendance,
            leaves: user.leaves,
            created_at: user
                .created_at
                .and_then(|dt| dt.try_to_rfc3339_string().ok()),
            updated_at: user
                .updated_at
                .and_then(|dt| dt.try_to_rfc3339_string().ok()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&UserRole::Admin).unwrap(), "\"admin\"");
        let role: UserRole = serde_json::from_str("\"driver\"").unwrap();
        assert_eq!(role, UserRole::Driver);
    }

    #[test]
    fn unknown_role_is_rejected() {
        assert!(serde_json::from_str::<UserRole>("\"superuser\"").is_err());
    }

    #[test]
    fn only_admin_can_override_attendance() {
        assert!(UserRole::Admin.can_override_attendance());
        for role in [
            UserRole::Student,
            UserRole::Teacher,
            UserRole::Driver,
            UserRole::Other,
        ] {
            assert!(!role.can_override_attendance());
        }
    }

    #[test]
    fn fullname_skips_missing_parts() {
        let mut user = sample_user();
        user.first_name = Some("Ada".into());
        user.middle_name = None;
        user.last_name = Some("Lovelace".into());
        assert_eq!(user.fullname(), "Ada Lovelace");
    }

    fn sample_user() -> User {
        User {
            _id: None,
            user_id: "u1".into(),
            email: "ada@example.com".into(),
            password: None,
            first_name: None,
            middle_name: None,
            last_name: None,
            contact: None,
            emergency_contact: None,
            emergency_contact_name: None,
            language: None,
            gender: None,
            date_of_birth: None,
            address: None,
            zip_code: None,
            bio: None,
            role: UserRole::Student,
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
}
