use mongodb::bson::{oid::ObjectId, DateTime as BsonDateTime};
use serde::{Deserialize, Serialize};

/// Closed attendance status set. The original store accepted free-form
/// strings; invalid values are now rejected at deserialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AttendanceStatus {
    Present,
    Absent,
    Late,
    Excused,
}

impl std::fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            AttendanceStatus::Present => "present",
            AttendanceStatus::Absent => "absent",
            AttendanceStatus::Late => "late",
            AttendanceStatus::Excused => "excused",
        };
        write!(f, "{}", s)
    }
}

/// One ledger row: a user's status for a course on one calendar day.
///
/// `date` is the day key (`YYYY-MM-DD`); the unique index on
/// (user_id, course_id, date) upholds the at-most-one invariant under
/// concurrent marking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendanceRecord {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub _id: Option<ObjectId>,
    pub user_id: String,
    pub course_id: String,
    pub date: String,
    pub date_time: BsonDateTime,
    pub status: AttendanceStatus,
    pub created_at: Option<BsonDateTime>,
    pub updated_at: Option<BsonDateTime>,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct MarkAttendanceRequest {
    pub user_id: String,
    pub course_id: String,
    pub status: AttendanceStatus,
    /// Optional `YYYY-MM-DD`; validated against the server date but the
    /// lookup key is always today.
    pub date_time: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AttendanceListQuery {
    pub user_id: Option<String>,
    pub course_id: Option<String>,
    pub date: Option<String>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct AttendanceResponse {
    pub id: String,
    pub user: String,
    pub course: String,
    pub date_time: String,
    pub status: AttendanceStatus,
}

impl From<AttendanceRecord> for AttendanceResponse {
    fn from(record: AttendanceRecord) -> Self {
        AttendanceResponse {
            id: record._id.map(|id| id.to_hex()).unwrap_or_default(),
            user: record.user_id,
            course: record.course_id,
            date_time: record
                .date_time
                .try_to_rfc3339_string()
                .unwrap_or_default(),
            status: record.status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&AttendanceStatus::Present).unwrap(),
            "\"present\""
        );
        let status: AttendanceStatus = serde_json::from_str("\"excused\"").unwrap();
        assert_eq!(status, AttendanceStatus::Excused);
    }

    #[test]
    fn free_form_status_is_rejected() {
        assert!(serde_json::from_str::<AttendanceStatus>("\"sick\"").is_err());
    }

    #[test]
    fn response_exposes_spec_fields() {
        let record = AttendanceRecord {
            _id: Some(ObjectId::new()),
            user_id: "u7".into(),
            course_id: "c3".into(),
            date: "2026-08-29".into(),
            date_time: BsonDateTime::now(),
            status: AttendanceStatus::Present,
            created_at: None,
            updated_at: None,
        };
        let response = AttendanceResponse::from(record);
        assert_eq!(response.user, "u7");
        assert_eq!(response.course, "c3");
        assert_eq!(response.status, AttendanceStatus::Present);
        assert!(!response.id.is_empty());
        assert!(!response.date_time.is_empty());
    }
}
