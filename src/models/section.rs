use mongodb::bson::{oid::ObjectId, DateTime as BsonDateTime};
use serde::{Deserialize, Serialize};

/// Section inside a course.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseSection {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub _id: Option<ObjectId>,
    pub section: String,
    pub course_id: Option<String>,
    pub created_by: Option<String>,
    pub created_at: Option<BsonDateTime>,
    pub updated_at: Option<BsonDateTime>,
}

/// Lesson/material inside a section. Media files live on external
/// storage; only the URL is kept here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseSubSection {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub _id: Option<ObjectId>,
    pub sub_section_name: String,
    pub course_section_id: Option<String>,
    pub description: Option<String>,
    pub media_url: Option<String>,
    pub created_by: Option<String>,
    pub created_at: Option<BsonDateTime>,
    pub updated_at: Option<BsonDateTime>,
}

#[derive(Debug, Deserialize)]
pub struct CreateSectionRequest {
    pub section: String,
    pub course_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateSectionRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub course_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateSubSectionRequest {
    pub sub_section_name: String,
    pub course_section_id: Option<String>,
    pub description: Option<String>,
    pub media_url: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateSubSectionRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_section_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub course_section_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SectionResponse {
    pub id: String,
    pub section: String,
    pub course_id: Option<String>,
    pub created_by: Option<String>,
    pub created_at: Option<String>,
}

impl From<CourseSection> for SectionResponse {
    fn from(section: CourseSection) -> Self {
        SectionResponse {
            id: section._id.map(|id| id.to_hex()).unwrap_or_default(),
            section: section.section,
            course_id: section.course_id,
            created_by: section.created_by,
            created_at: section
                .created_at
                .and_then(|dt| dt.try_to_rfc3339_string().ok()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SubSectionResponse {
    pub id: String,
    pub sub_section_name: String,
    pub course_section_id: Option<String>,
    pub description: Option<String>,
    pub media_url: Option<String>,
    pub created_by: Option<String>,
    pub created_at: Option<String>,
}

impl From<CourseSubSection> for SubSectionResponse {
    fn from(sub: CourseSubSection) -> Self {
        SubSectionResponse {
            id: sub._id.map(|id| id.to_hex()).unwrap_or_default(),
            sub_section_name: sub.sub_section_name,
            course_section_id: sub.course_section_id,
            description: sub.description,
            media_url: sub.media_url,
            created_by: sub.created_by,
            created_at: sub
                .created_at
                .and_then(|dt| dt.try_to_rfc3339_string().ok()),
        }
    }
}
