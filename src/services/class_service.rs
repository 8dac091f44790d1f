use crate::database::{collections, MongoDB};
use crate::models::{ClassDetails, ClassResponse, CreateClassRequest};
use crate::utils::error::AppError;
use futures::stream::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, DateTime as BsonDateTime};

fn parse_id(id: &str) -> Result<ObjectId, AppError> {
    ObjectId::parse_str(id).map_err(|_| AppError::NotFound("Class not found".to_string()))
}

pub async fn list(db: &MongoDB) -> Result<Vec<ClassResponse>, AppError> {
    let collection = db.collection::<ClassDetails>(collections::CLASSES);
    let classes: Vec<ClassDetails> = collection.find(doc! {}).await?.try_collect().await?;
    Ok(classes.into_iter().map(ClassResponse::from).collect())
}

pub async fn get(db: &MongoDB, id: &str) -> Result<ClassResponse, AppError> {
    let collection = db.collection::<ClassDetails>(collections::CLASSES);
    collection
        .find_one(doc! { "_id": parse_id(id)? })
        .await?
        .map(ClassResponse::from)
        .ok_or_else(|| AppError::NotFound("Class not found".to_string()))
}

pub async fn create(db: &MongoDB, request: &CreateClassRequest) -> Result<ClassResponse, AppError> {
    let collection = db.collection::<ClassDetails>(collections::CLASSES);

    let class = ClassDetails {
        _id: None,
        name: request.name.clone(),
        created_at: Some(BsonDateTime::now()),
        updated_at: Some(BsonDateTime::now()),
    };

    let result = collection.insert_one(&class).await?;

    Ok(ClassResponse {
        id: result
            .inserted_id
            .as_object_id()
            .map(|id| id.to_hex())
            .unwrap_or_default(),
        name: class.name,
        created_at: class.created_at.and_then(|dt| dt.try_to_rfc3339_string().ok()),
        updated_at: class.updated_at.and_then(|dt| dt.try_to_rfc3339_string().ok()),
    })
}

pub async fn update(
    db: &MongoDB,
    id: &str,
    request: &CreateClassRequest,
) -> Result<ClassResponse, AppError> {
    let collection = db.collection::<ClassDetails>(collections::CLASSES);
    let options = mongodb::options::FindOneAndUpdateOptions::builder()
        .return_document(mongodb::options::ReturnDocument::After)
        .build();

    collection
        .find_one_and_update(
            doc! { "_id": parse_id(id)? },
            doc! { "$set": { "name": &request.name, "updated_at": BsonDateTime::now() } },
        )
        .with_options(options)
        .await?
        .map(ClassResponse::from)
        .ok_or_else(|| AppError::NotFound("Class not found".to_string()))
}

pub async fn delete(db: &MongoDB, id: &str) -> Result<(), AppError> {
    let collection = db.collection::<ClassDetails>(collections::CLASSES);
    let result = collection.delete_one(doc! { "_id": parse_id(id)? }).await?;

    if result.deleted_count == 0 {
        return Err(AppError::NotFound("Class not found".to_string()));
    }

    Ok(())
}
