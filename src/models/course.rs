use mongodb::bson::{oid::ObjectId, DateTime as BsonDateTime};
use serde::{Deserialize, Serialize};

/// Course document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseDetails {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub _id: Option<ObjectId>,
    pub title: String,
    pub description: Option<String>,
    pub class_id: Option<String>,
    /// Class time in minutes.
    #[serde(default = "default_duration")]
    pub duration_minutes: i64,
    pub created_by: Option<String>,
    pub created_at: Option<BsonDateTime>,
    pub updated_at: Option<BsonDateTime>,
}

fn default_duration() -> i64 {
    60
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct CreateCourseRequest {
    pub title: String,
    pub description: Option<String>,
    pub class_id: Option<String>,
    pub duration_minutes: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateCourseRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct CourseListQuery {
    pub page: Option<u64>,
    pub records: Option<i64>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct CourseResponse {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub class_id: Option<String>,
    pub duration_minutes: i64,
    pub created_by: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl From<CourseDetails> for CourseResponse {
    fn from(course: CourseDetails) -> Self {
        CourseResponse {
            id: course._id.map(|id| id.to_hex()).unwrap_or_default(),
            title: course.title,
            description: course.description,
            class_id: course.class_id,
            duration_minutes: course.duration_minutes,
            created_by: course.created_by,
            created_at: course
                .created_at
                .and_then(|dt| dt.try_to_rfc3339_string().ok()),
            updated_at: course
                .updated_at
                .and_then(|dt| dt.try_to_rfc3339_string().ok()),
        }
    }
}
