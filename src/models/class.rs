use mongodb::bson::{oid::ObjectId, DateTime as BsonDateTime};
use serde::{Deserialize, Serialize};

/// School class (e.g. "Grade 10-B"), referenced by users and courses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassDetails {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub _id: Option<ObjectId>,
    pub name: String,
    pub created_at: Option<BsonDateTime>,
    pub updated_at: Option<BsonDateTime>,
}

#[derive(Debug, Deserialize)]
pub struct CreateClassRequest {
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct ClassResponse {
    pub id: String,
    pub name: String,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl From<ClassDetails> for ClassResponse {
    fn from(class: ClassDetails) -> Self {
        ClassResponse {
            id: class._id.map(|id| id.to_hex()).unwrap_or_default(),
            name: class.name,
            created_at: class
                .created_at
                .and_then(|dt| dt.try_to_rfc3339_string().ok()),
            updated_at: class
                .updated_at
                .and_then(|dt| dt.try_to_rfc3339_string().ok()),
        }
    }
}
