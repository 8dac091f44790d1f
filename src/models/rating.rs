use mongodb::bson::{oid::ObjectId, DateTime as BsonDateTime};
use serde::{Deserialize, Serialize};

/// Star rating + review a user left on a course.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseRating {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub _id: Option<ObjectId>,
    pub user_id: String,
    pub course_id: String,
    pub star: i32,
    pub comment: Option<String>,
    pub created_at: Option<BsonDateTime>,
    pub updated_at: Option<BsonDateTime>,
}

#[derive(Debug, Deserialize)]
pub struct CreateRatingRequest {
    pub course_id: String,
    pub star: i32,
    pub comment: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RatingResponse {
    pub id: String,
    pub user_id: String,
    pub course_id: String,
    pub star: i32,
    pub comment: Option<String>,
    pub created_at: Option<String>,
}

impl From<CourseRating> for RatingResponse {
    fn from(rating: CourseRating) -> Self {
        RatingResponse {
            id: rating._id.map(|id| id.to_hex()).unwrap_or_default(),
            user_id: rating.user_id,
            course_id: rating.course_id,
            star: rating.star,
            comment: rating.comment,
            created_at: rating
                .created_at
                .and_then(|dt| dt.try_to_rfc3339_string().ok()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct OverallRatingResponse {
    pub overall_rating: f64,
}
