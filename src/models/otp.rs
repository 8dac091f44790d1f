use mongodb::bson::{oid::ObjectId, DateTime as BsonDateTime};
use serde::{Deserialize, Serialize};

/// Password-reset state, one document per email (unique index). `otp` is
/// cleared once verified; `token` authorizes the final reset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OtpRecord {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub _id: Option<ObjectId>,
    pub email: String,
    pub otp: String,
    pub token: Option<String>,
    pub created_at: Option<BsonDateTime>,
    pub updated_at: Option<BsonDateTime>,
}

/// Access token revoked by logout. Checked by the auth middleware on
/// every protected request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlacklistedToken {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub _id: Option<ObjectId>,
    pub token: String,
    pub blacklisted_at: BsonDateTime,
}
