use crate::database::{collections, MongoDB};
use crate::models::{
    CourseSection, CourseSubSection, CreateSectionRequest, CreateSubSectionRequest,
    SectionResponse, SubSectionResponse, UpdateSectionRequest, UpdateSubSectionRequest,
};
use crate::utils::error::AppError;
use futures::stream::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, DateTime as BsonDateTime};
use mongodb::options::{FindOneAndUpdateOptions, ReturnDocument};

fn parse_id(id: &str, what: &str) -> Result<ObjectId, AppError> {
    ObjectId::parse_str(id).map_err(|_| AppError::NotFound(format!("{} not found", what)))
}

pub async fn list_sections(
    db: &MongoDB,
    course_id: Option<&str>,
) -> Result<Vec<SectionResponse>, AppError> {
    let filter = match course_id {
        Some(course_id) => doc! { "course_id": course_id },
        None => doc! {},
    };

    let collection = db.collection::<CourseSection>(collections::SECTIONS);
    let sections: Vec<CourseSection> = collection.find(filter).await?.try_collect().await?;
    Ok(sections.into_iter().map(SectionResponse::from).collect())
}

pub async fn create_section(
    db: &MongoDB,
    request: &CreateSectionRequest,
    created_by: &str,
) -> Result<SectionResponse, AppError> {
    let collection = db.collection::<CourseSection>(collections::SECTIONS);

    let section = CourseSection {
        _id: None,
        section: request.section.clone(),
        course_id: request.course_id.clone(),
        created_by: Some(created_by.to_string()),
        created_at: Some(BsonDateTime::now()),
        updated_at: Some(BsonDateTime::now()),
    };

    let result = collection.insert_one(&section).await?;

    Ok(SectionResponse {
        id: result
            .inserted_id
            .as_object_id()
            .map(|id| id.to_hex())
            .unwrap_or_default(),
        section: section.section,
        course_id: section.course_id,
        created_by: section.created_by,
        created_at: section
            .created_at
            .and_then(|dt| dt.try_to_rfc3339_string().ok()),
    })
}

pub async fn update_section(
    db: &MongoDB,
    id: &str,
    request: &UpdateSectionRequest,
) -> Result<SectionResponse, AppError> {
    let mut changes = mongodb::bson::to_document(request)
        .map_err(|e| AppError::InvalidInput(format!("Invalid update payload: {}", e)))?;
    changes.insert("updated_at", BsonDateTime::now());

    let collection = db.collection::<CourseSection>(collections::SECTIONS);
    let options = FindOneAndUpdateOptions::builder()
        .return_document(ReturnDocument::After)
        .build();

    collection
        .find_one_and_update(
            doc! { "_id": parse_id(id, "Section")? },
            doc! { "$set": changes },
        )
        .with_options(options)
        .await?
        .map(SectionResponse::from)
        .ok_or_else(|| AppError::NotFound("Section not found".to_string()))
}

pub async fn delete_section(db: &MongoDB, id: &str) -> Result<(), AppError> {
    let collection = db.collection::<CourseSection>(collections::SECTIONS);
    let result = collection
        .delete_one(doc! { "_id": parse_id(id, "Section")? })
        .await?;

    if result.deleted_count == 0 {
        return Err(AppError::NotFound("Section not found".to_string()));
    }

    Ok(())
}

pub async fn list_sub_sections(
    db: &MongoDB,
    section_id: Option<&str>,
) -> Result<Vec<SubSectionResponse>, AppError> {
    let filter = match section_id {
        Some(section_id) => doc! { "course_section_id": section_id },
        None => doc! {},
    };

    let collection = db.collection::<CourseSubSection>(collections::SUB_SECTIONS);
    let subs: Vec<CourseSubSection> = collection.find(filter).await?.try_collect().await?;
    Ok(subs.into_iter().map(SubSectionResponse::from).collect())
}

pub async fn create_sub_section(
    db: &MongoDB,
    request: &CreateSubSectionRequest,
    created_by: &str,
) -> Result<SubSectionResponse, AppError> {
    let collection = db.collection::<CourseSubSection>(collections::SUB_SECTIONS);

    let sub = CourseSubSection {
        _id: None,
        sub_section_name: request.sub_section_name.clone(),
        course_section_id: request.course_section_id.clone(),
        description: request.description.clone(),
        media_url: request.media_url.clone(),
        created_by: Some(created_by.to_string()),
        created_at: Some(BsonDateTime::now()),
        updated_at: Some(BsonDateTime::now()),
    };

    let result = collection.insert_one(&sub).await?;

    Ok(SubSectionResponse {
        id: result
            .inserted_id
            .as_object_id()
            .map(|id| id.to_hex())
            .unwrap_or_default(),
        sub_section_name: sub.sub_section_name,
        course_section_id: sub.course_section_id,
        description: sub.description,
        media_url: sub.media_url,
        created_by: sub.created_by,
        created_at: sub.created_at.and_then(|dt| dt.try_to_rfc3339_string().ok()),
    })
}

pub async fn update_sub_section(
    db: &MongoDB,
    id: &str,
    request: &UpdateSubSectionRequest,
) -> Result<SubSectionResponse, AppError> {
    let mut changes = mongodb::bson::to_document(request)
        .map_err(|e| AppError::InvalidInput(format!("Invalid update payload: {}", e)))?;
    changes.insert("updated_at", BsonDateTime::now());

    let collection = db.collection::<CourseSubSection>(collections::SUB_SECTIONS);
    let options = FindOneAndUpdateOptions::builder()
        .return_document(ReturnDocument::After)
        .build();

    collection
        .find_one_and_update(
            doc! { "_id": parse_id(id, "SubSection")? },
            doc! { "$set": changes },
        )
        .with_options(options)
        .await?
        .map(SubSectionResponse::from)
        .ok_or_else(|| AppError::NotFound("SubSection not found".to_string()))
}

pub async fn delete_sub_section(db: &MongoDB, id: &str) -> Result<(), AppError> {
    let collection = db.collection::<CourseSubSection>(collections::SUB_SECTIONS);
    let result = collection
        .delete_one(doc! { "_id": parse_id(id, "SubSection")? })
        .await?;

    if result.deleted_count == 0 {
        return Err(AppError::NotFound("SubSection not found".to_string()));
    }

    Ok(())
}
