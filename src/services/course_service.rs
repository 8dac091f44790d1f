use crate::database::{collections, MongoDB};
use crate::models::{
    CourseDetails, CourseListQuery, CourseResponse, CreateCourseRequest, UpdateCourseRequest,
};
use crate::utils::error::AppError;
use futures::stream::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, DateTime as BsonDateTime};
use mongodb::options::FindOptions;

const DEFAULT_PAGE_SIZE: i64 = 10;
const MAX_PAGE_SIZE: i64 = 20;

fn parse_id(id: &str) -> Result<ObjectId, AppError> {
    ObjectId::parse_str(id).map_err(|_| AppError::NotFound("Course not found".to_string()))
}

/// Page size defaults to 10 and is capped at 20 (`records` query param).
pub fn page_window(query: &CourseListQuery) -> (u64, i64) {
    let records = query
        .records
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE);
    let page = query.page.unwrap_or(1).max(1);
    let skip = (page - 1) * records as u64;
    (skip, records)
}

pub async fn list(db: &MongoDB, query: &CourseListQuery) -> Result<Vec<CourseResponse>, AppError> {
    let (skip, limit) = page_window(query);
    let options = FindOptions::builder()
        .sort(doc! { "created_at": -1 })
        .skip(skip)
        .limit(limit)
        .build();

    let collection = db.collection::<CourseDetails>(collections::COURSES);
    let courses: Vec<CourseDetails> = collection
        .find(doc! {})
        .with_options(options)
        .await?
        .try_collect()
        .await?;

    Ok(courses.into_iter().map(CourseResponse::from).collect())
}

pub async fn get(db: &MongoDB, id: &str) -> Result<CourseResponse, AppError> {
    let collection = db.collection::<CourseDetails>(collections::COURSES);
    collection
        .find_one(doc! { "_id": parse_id(id)? })
        .await?
        .map(CourseResponse::from)
        .ok_or_else(|| AppError::NotFound("Course not found".to_string()))
}

pub async fn create(
    db: &MongoDB,
    request: &CreateCourseRequest,
    created_by: &str,
) -> Result<CourseResponse, AppError> {
    let collection = db.collection::<CourseDetails>(collections::COURSES);

    let course = CourseDetails {
        _id: None,
        title: request.title.clone(),
        description: request.description.clone(),
        class_id: request.class_id.clone(),
        duration_minutes: request.duration_minutes.unwrap_or(60),
        created_by: Some(created_by.to_string()),
        created_at: Some(BsonDateTime::now()),
        updated_at: Some(BsonDateTime::now()),
    };

    let result = collection.insert_one(&course).await?;
    let id = result
        .inserted_id
        .as_object_id()
        .map(|id| id.to_hex())
        .unwrap_or_default();

    log::info!("Course created: {} ({})", course.title, id);

    Ok(CourseResponse {
        id,
        title: course.title,
        description: course.description,
        class_id: course.class_id,
        duration_minutes: course.duration_minutes,
        created_by: course.created_by,
        created_at: course.created_at.and_then(|dt| dt.try_to_rfc3339_string().ok()),
        updated_at: course.updated_at.and_then(|dt| dt.try_to_rfc3339_string().ok()),
    })
}

pub async fn update(
    db: &MongoDB,
    id: &str,
    request: &UpdateCourseRequest,
) -> Result<CourseResponse, AppError> {
    let mut changes = mongodb::bson::to_document(request)
        .map_err(|e| AppError::InvalidInput(format!("Invalid update payload: {}", e)))?;
    changes.insert("updated_at", BsonDateTime::now());

    let collection = db.collection::<CourseDetails>(collections::COURSES);
    let options = mongodb::options::FindOneAndUpdateOptions::builder()
        .return_document(mongodb::options::ReturnDocument::After)
        .build();

    collection
        .find_one_and_update(doc! { "_id": parse_id(id)? }, doc! { "$set": changes })
        .with_options(options)
        .await?
        .map(CourseResponse::from)
        .ok_or_else(|| AppError::NotFound("Course not found".to_string()))
}

pub async fn delete(db: &MongoDB, id: &str) -> Result<(), AppError> {
    let collection = db.collection::<CourseDetails>(collections::COURSES);
    let result = collection.delete_one(doc! { "_id": parse_id(id)? }).await?;

    if result.deleted_count == 0 {
        return Err(AppError::NotFound("Course not found".to_string()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_window_defaults_and_caps() {
        let query = CourseListQuery {
            page: None,
            records: None,
        };
        assert_eq!(page_window(&query), (0, 10));

        let query = CourseListQuery {
            page: Some(3),
            records: Some(5),
        };
        assert_eq!(page_window(&query), (10, 5));

        // `records` above the cap clamps to 20; page 0 is treated as 1.
        let query = CourseListQuery {
            page: Some(0),
            records: Some(100),
        };
        assert_eq!(page_window(&query), (0, 20));
    }
}
