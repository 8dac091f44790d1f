use crate::database::{collections, MongoDB};
use crate::models::{CourseRating, CreateRatingRequest, OverallRatingResponse, RatingResponse};
use crate::utils::error::AppError;
use futures::stream::TryStreamExt;
use mongodb::bson::{doc, DateTime as BsonDateTime};

const MAX_STARS: i32 = 5;

/// Stores a review. The user comes from the verified token, never from
/// the payload.
pub async fn post_review(
    db: &MongoDB,
    request: &CreateRatingRequest,
    user_id: &str,
) -> Result<RatingResponse, AppError> {
    if !(0..=MAX_STARS).contains(&request.star) {
        return Err(AppError::InvalidInput(format!(
            "Star rating must be between 0 and {}",
            MAX_STARS
        )));
    }

    let collection = db.collection::<CourseRating>(collections::RATINGS);

    let rating = CourseRating {
        _id: None,
        user_id: user_id.to_string(),
        course_id: request.course_id.clone(),
        star: request.star,
        comment: request.comment.clone(),
        created_at: Some(BsonDateTime::now()),
        updated_at: Some(BsonDateTime::now()),
    };

    let result = collection.insert_one(&rating).await?;

    Ok(RatingResponse {
        id: result
            .inserted_id
            .as_object_id()
            .map(|id| id.to_hex())
            .unwrap_or_default(),
        user_id: rating.user_id,
        course_id: rating.course_id,
        star: rating.star,
        comment: rating.comment,
        created_at: rating
            .created_at
            .and_then(|dt| dt.try_to_rfc3339_string().ok()),
    })
}

/// Arithmetic mean of stars for a course; 0 when the course has no
/// ratings.
pub async fn overall_rating(
    db: &MongoDB,
    course_id: &str,
) -> Result<OverallRatingResponse, AppError> {
    let collection = db.collection::<CourseRating>(collections::RATINGS);
    let ratings: Vec<CourseRating> = collection
        .find(doc! { "course_id": course_id })
        .await?
        .try_collect()
        .await?;

    Ok(OverallRatingResponse {
        overall_rating: mean_stars(&ratings),
    })
}

fn mean_stars(ratings: &[CourseRating]) -> f64 {
    if ratings.is_empty() {
        return 0.0;
    }
    let total: i64 = ratings.iter().map(|r| r.star as i64).sum();
    total as f64 / ratings.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rating(star: i32) -> CourseRating {
        CourseRating {
            _id: None,
            user_id: "u1".into(),
            course_id: "c1".into(),
            star,
            comment: None,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn unrated_course_averages_to_zero() {
        assert_eq!(mean_stars(&[]), 0.0);
    }

    #[test]
    fn mean_is_arithmetic() {
        let ratings = [rating(5), rating(4), rating(3)];
        assert!((mean_stars(&ratings) - 4.0).abs() < f64::EPSILON);
    }
}
