use crate::database::{collections, MongoDB};
use crate::models::{
    AttendanceListQuery, AttendanceRecord, AttendanceResponse, CourseDetails,
    MarkAttendanceRequest,
};
use crate::services::auth_service::Claims;
use crate::utils::error::{is_duplicate_key, AppError};
use chrono::{NaiveDate, Utc};
use futures::stream::TryStreamExt;
use mongodb::bson::{doc, to_bson, DateTime as BsonDateTime, Document};
use mongodb::options::{FindOneAndUpdateOptions, ReturnDocument};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parses a requested mark date and rejects anything after `today`.
/// Past and present dates pass; the lookup key stays "today" either way.
pub fn validate_requested_date(raw: &str, today: NaiveDate) -> Result<NaiveDate, AppError> {
    let parsed = NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .map_err(|_| AppError::InvalidInput("Invalid date format".to_string()))?;

    if parsed > today {
        return Err(AppError::PolicyRejected(
            "Cannot update status for future dates".to_string(),
        ));
    }

    Ok(parsed)
}

/// Marks attendance for (user, course) on the current server day.
///
/// Find-or-create runs as one atomic upsert against the unique
/// (user_id, course_id, date) index:
/// - any actor creates the day's record with the supplied status when
///   none exists;
/// - when a record exists, only an admin actor overwrites its status —
///   for everyone else the upsert is `$setOnInsert`-only, so the stored
///   record comes back untouched.
pub async fn mark(
    db: &MongoDB,
    request: &MarkAttendanceRequest,
    actor: &Claims,
) -> Result<AttendanceResponse, AppError> {
    let users = db.collection::<crate::models::User>(collections::USERS);
    if users
        .find_one(doc! { "user_id": &request.user_id })
        .await?
        .is_none()
    {
        return Err(AppError::NotFound("User not found".to_string()));
    }

    let courses = db.collection::<CourseDetails>(collections::COURSES);
    let course_oid = mongodb::bson::oid::ObjectId::parse_str(&request.course_id)
        .map_err(|_| AppError::NotFound("Course not found".to_string()))?;
    if courses.find_one(doc! { "_id": course_oid }).await?.is_none() {
        return Err(AppError::NotFound("Course not found".to_string()));
    }

    let today = Utc::now().date_naive();
    if let Some(raw) = &request.date_time {
        validate_requested_date(raw, today)?;
    }

    let day_key = today.format(DATE_FORMAT).to_string();
    let status = to_bson(&request.status)
        .map_err(|e| AppError::InvalidInput(format!("Invalid status: {}", e)))?;

    let filter = doc! {
        "user_id": &request.user_id,
        "course_id": &request.course_id,
        "date": &day_key,
    };

    let on_insert = doc! {
        "user_id": &request.user_id,
        "course_id": &request.course_id,
        "date": &day_key,
        "date_time": BsonDateTime::now(),
        "created_at": BsonDateTime::now(),
    };

    let update = if actor.role.can_override_attendance() {
        doc! {
            "$set": { "status": &status, "updated_at": BsonDateTime::now() },
            "$setOnInsert": on_insert,
        }
    } else {
        let mut on_insert_with_status: Document = on_insert;
        on_insert_with_status.insert("status", &status);
        on_insert_with_status.insert("updated_at", BsonDateTime::now());
        doc! { "$setOnInsert": on_insert_with_status }
    };

    let options = FindOneAndUpdateOptions::builder()
        .upsert(true)
        .return_document(ReturnDocument::After)
        .build();

    let collection = db.collection::<AttendanceRecord>(collections::ATTENDANCE);

    let record = match collection
        .find_one_and_update(filter.clone(), update.clone())
        .with_options(options.clone())
        .await
    {
        Ok(record) => record,
        // Two concurrent first marks can race on the unique index; the
        // loser retries and lands on the winner's row.
        Err(e) if is_duplicate_key(&e) => {
            collection
                .find_one_and_update(filter, update)
                .with_options(options)
                .await?
        }
        Err(e) => return Err(e.into()),
    };

    let record = record.ok_or_else(|| {
        AppError::DatabaseError("Attendance upsert returned no document".to_string())
    })?;

    log::info!(
        "Attendance marked: user={} course={} date={} status={} actor_role={}",
        record.user_id,
        record.course_id,
        record.date,
        record.status,
        actor.role
    );

    Ok(AttendanceResponse::from(record))
}

pub async fn list(
    db: &MongoDB,
    query: &AttendanceListQuery,
) -> Result<Vec<AttendanceResponse>, AppError> {
    let mut filter = doc! {};
    if let Some(user_id) = &query.user_id {
        filter.insert("user_id", user_id);
    }
    if let Some(course_id) = &query.course_id {
        filter.insert("course_id", course_id);
    }
    if let Some(date) = &query.date {
        NaiveDate::parse_from_str(date, DATE_FORMAT)
            .map_err(|_| AppError::InvalidInput("Invalid date format".to_string()))?;
        filter.insert("date", date);
    }

    let collection = db.collection::<AttendanceRecord>(collections::ATTENDANCE);
    let records: Vec<AttendanceRecord> = collection.find(filter).await?.try_collect().await?;
    Ok(records.into_iter().map(AttendanceResponse::from).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AttendanceStatus, UserRole};

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn present_and_past_dates_are_accepted() {
        let today = day("2026-08-29");
        assert_eq!(
            validate_requested_date("2026-08-29", today).unwrap(),
            today
        );
        assert_eq!(
            validate_requested_date("2026-08-01", today).unwrap(),
            day("2026-08-01")
        );
    }

    #[test]
    fn future_date_is_rejected() {
        let today = day("2026-08-29");
        let err = validate_requested_date("2026-08-30", today).unwrap_err();
        assert!(matches!(err, AppError::PolicyRejected(_)));
        assert_eq!(err.to_string(), "Cannot update status for future dates");
    }

    #[test]
    fn malformed_date_is_rejected() {
        let today = day("2026-08-29");
        for raw in ["29-08-2026", "2026/08/29", "tomorrow", ""] {
            let err = validate_requested_date(raw, today).unwrap_err();
            assert!(matches!(err, AppError::InvalidInput(_)), "raw: {}", raw);
            assert_eq!(err.to_string(), "Invalid date format");
        }
    }

    // The upsert properties need a running MongoDB; run with
    // `cargo test -- --ignored` against a disposable database.
    mod with_database {
        use super::*;
        use crate::database::MongoDB;
        use crate::models::MarkAttendanceRequest;
        use crate::services::{auth_service, user_service};
        use mongodb::bson::{doc, oid::ObjectId};

        async fn test_db() -> MongoDB {
            dotenv::dotenv().ok();
            let uri = std::env::var("TEST_DATABASE_URL")
                .unwrap_or_else(|_| "mongodb://localhost:27017/elearning_test".to_string());
            MongoDB::new(&uri).await.expect("test MongoDB")
        }

        fn claims(role: UserRole) -> auth_service::Claims {
            auth_service::Claims {
                sub: ObjectId::new().to_hex(),
                email: "actor@example.com".into(),
                role,
                iat: 0,
                exp: usize::MAX,
                jti: "test".into(),
                iss: "elearning-service".into(),
            }
        }

        async fn seed_user_and_course(db: &MongoDB) -> (String, String) {
            let user_id = ObjectId::new().to_hex();
            db.collection::<mongodb::bson::Document>(crate::database::collections::USERS)
                .insert_one(doc! {
                    "user_id": &user_id,
                    "email": format!("{}@example.com", user_id),
                    "role": "student",
                    "attendance": 0,
                    "leaves": 0,
                })
                .await
                .unwrap();

            let course = db
                .collection::<mongodb::bson::Document>(crate::database::collections::COURSES)
                .insert_one(doc! { "title": "Algebra", "duration_minutes": 60 })
                .await
                .unwrap();
            let course_id = course.inserted_id.as_object_id().unwrap().to_hex();

            (user_id, course_id)
        }

        #[tokio::test]
        #[ignore]
        async fn first_mark_creates_then_non_admin_is_noop_then_admin_overrides() {
            let db = test_db().await;
            let (user_id, course_id) = seed_user_and_course(&db).await;

            let request = MarkAttendanceRequest {
                user_id: user_id.clone(),
                course_id: course_id.clone(),
                status: AttendanceStatus::Present,
                date_time: None,
            };

            // First mark by a student creates the record.
            let created = mark(&db, &request, &claims(UserRole::Student)).await.unwrap();
            assert_eq!(created.status, AttendanceStatus::Present);

            // A second non-admin mark with a different status is a no-op
            // and returns the stored status.
            let request = MarkAttendanceRequest {
                status: AttendanceStatus::Absent,
                user_id: user_id.clone(),
                course_id: course_id.clone(),
                date_time: None,
            };
            let unchanged = mark(&db, &request, &claims(UserRole::Student)).await.unwrap();
            assert_eq!(unchanged.id, created.id);
            assert_eq!(unchanged.status, AttendanceStatus::Present);

            // An admin mark overwrites the status on the same record.
            let overridden = mark(&db, &request, &claims(UserRole::Admin)).await.unwrap();
            assert_eq!(overridden.id, created.id);
            assert_eq!(overridden.status, AttendanceStatus::Absent);
        }

        #[tokio::test]
        #[ignore]
        async fn unknown_user_or_course_creates_nothing() {
            let db = test_db().await;
            let (user_id, course_id) = seed_user_and_course(&db).await;

            let request = MarkAttendanceRequest {
                user_id: ObjectId::new().to_hex(),
                course_id: course_id.clone(),
                status: AttendanceStatus::Present,
                date_time: None,
            };
            let err = mark(&db, &request, &claims(UserRole::Admin)).await.unwrap_err();
            assert_eq!(err.to_string(), "User not found");

            let request = MarkAttendanceRequest {
                user_id: user_id.clone(),
                course_id: ObjectId::new().to_hex(),
                status: AttendanceStatus::Present,
                date_time: None,
            };
            let err = mark(&db, &request, &claims(UserRole::Admin)).await.unwrap_err();
            assert_eq!(err.to_string(), "Course not found");

            let records = list(
                &db,
                &AttendanceListQuery {
                    user_id: Some(user_id),
                    course_id: None,
                    date: None,
                },
            )
            .await
            .unwrap();
            assert!(records.is_empty());

            // Keep the seeded user out of other assertions.
            let _ = user_service::delete_user(&db, &request.user_id).await;
        }
    }
}
