use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;

use crate::db::{Database, ReviewQuery};
use crate::error::{
    json_error_handler, path_error_handler, query_error_handler, ApiError, ApiResult,
};
use crate::models::{NewReview, VoteUpdate};

// Query string of GET /api/reviews
#[derive(Debug, Default, Deserialize)]
pub struct ReviewListParams {
    pub sort_by: Option<String>,
    pub order: Option<String>,
    pub limit: Option<u32>,
    pub p: Option<u32>,
    pub category: Option<String>,
}

// Register every route plus the extractor error handlers and the
// "path not found" fallback
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::PathConfig::default().error_handler(path_error_handler))
        .app_data(web::QueryConfig::default().error_handler(query_error_handler))
        .app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .service(
            web::scope("/api")
                .route("/categories", web::get().to(get_categories))
                .route("/reviews", web::get().to(get_reviews))
                .route("/reviews", web::post().to(post_review))
                .route("/reviews/{review_id}", web::get().to(get_review))
                .route("/reviews/{review_id}", web::patch().to(patch_review))
                .route("/reviews/{review_id}", web::delete().to(delete_review))
                .route(
                    "/reviews/{review_id}/comments",
                    web::get().to(get_review_comments),
                )
                .route("/users", web::get().to(get_users))
                .route("/users/{username}", web::get().to(get_user)),
        )
        .default_service(web::to(path_not_found));
}

pub async fn path_not_found() -> ApiResult<HttpResponse> {
    Err(ApiError::RouteNotFound)
}

pub async fn get_categories(db: web::Data<Database>) -> ApiResult<HttpResponse> {
    let categories = db.fetch_categories().await?;
    Ok(HttpResponse::Ok().json(json!({ "categories": categories })))
}

pub async fn get_reviews(
    db: web::Data<Database>,
    params: web::Query<ReviewListParams>,
) -> ApiResult<HttpResponse> {
    let params = params.into_inner();
    log::debug!("[API] list reviews: {:?}", params);

    // whitelist checks happen here, before the store is touched
    let query = ReviewQuery::from_params(
        params.sort_by.as_deref(),
        params.order.as_deref(),
        params.limit,
        params.p,
        params.category,
    )?;
    let reviews = db.fetch_reviews(&query).await?;
    Ok(HttpResponse::Ok().json(json!({ "reviews": reviews })))
}

pub async fn post_review(
    db: web::Data<Database>,
    review: web::Json<NewReview>,
) -> ApiResult<HttpResponse> {
    log::debug!(
        "[API] new review '{}' by {} in {}",
        review.title,
        review.owner,
        review.category
    );
    let created = db.insert_review(&review).await?;
    Ok(HttpResponse::Created().json(json!({ "review": created })))
}

pub async fn get_review(
    db: web::Data<Database>,
    review_id: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    let review = db.fetch_review(review_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(json!({ "review": review })))
}

pub async fn patch_review(
    db: web::Data<Database>,
    review_id: web::Path<i64>,
    update: web::Json<VoteUpdate>,
) -> ApiResult<HttpResponse> {
    let review = db
        .increment_review_votes(review_id.into_inner(), update.inc_votes)
        .await?;
    Ok(HttpResponse::Ok().json(json!({ "review": review })))
}

pub async fn delete_review(
    db: web::Data<Database>,
    review_id: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    db.remove_review(review_id.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

pub async fn get_review_comments(
    db: web::Data<Database>,
    review_id: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    let comments = db.fetch_review_comments(review_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(json!({ "comments": comments })))
}

pub async fn get_users(db: web::Data<Database>) -> ApiResult<HttpResponse> {
    let users = db.fetch_users().await?;
    Ok(HttpResponse::Ok().json(json!({ "users": users })))
}

pub async fn get_user(
    db: web::Data<Database>,
    username: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let user = db.fetch_user(&username).await?;
    Ok(HttpResponse::Ok().json(json!({ "user": user })))
}
