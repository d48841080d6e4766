//! Back-office JSON API.
//!
//! Content management for services, their options and choices, bookings,
//! testimonials, FAQs, plans, zones, pages, media metadata and site
//! settings. Authentication sits in front of this router at the deployment
//! boundary; handlers only validate and write.
//!
//! Every write invalidates the caches its data feeds.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

use crate::booking::queries as booking_queries;
use crate::cache::CacheStats;
use crate::catalog::{self, queries as catalog_queries, queries::ServiceDraft};
use crate::db::{self, queries::PageDraft};
use crate::error::{ApiResult, AppError};
use crate::models::content::{TESTIMONIAL_APPROVED, TESTIMONIAL_REJECTED};
use crate::models::service::OPTION_KIND_SELECT;
use crate::models::{
    content::SETTING_KEYS, BookingRow, FaqRow, MediaRow, OptionChoiceRow, PageRow, PlanRow,
    ServiceOption, ServiceOptionRow, ServiceRow, SiteSettingRow, TestimonialRow, ZoneRow,
    BOOKING_STATUSES,
};
use crate::AppState;

/// Back-office router, nested under `/api/admin`
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/services", get(list_services).post(create_service))
        .route("/services/:id", put(update_service).delete(delete_service))
        .route(
            "/services/:id/options",
            get(list_options).post(create_option),
        )
        .route("/options/:id", put(update_option).delete(delete_option))
        .route("/options/:id/move", post(move_option))
        .route("/options/:id/choices", post(create_choice))
        .route("/choices/:id", put(update_choice).delete(delete_choice))
        .route("/bookings", get(list_bookings))
        .route("/bookings/:id/status", put(update_booking_status))
        .route(
            "/testimonials",
            get(list_testimonials).post(create_testimonial),
        )
        .route(
            "/testimonials/:id",
            put(update_testimonial).delete(delete_testimonial),
        )
        .route("/testimonials/:id/approve", post(approve_testimonial))
        .route("/testimonials/:id/reject", post(reject_testimonial))
        .route("/faqs", get(list_faqs).post(create_faq))
        .route("/faqs/:id", put(update_faq).delete(delete_faq))
        .route("/plans", get(list_plans).post(create_plan))
        .route("/plans/:id", put(update_plan).delete(delete_plan))
        .route("/zones", get(list_zones).post(create_zone))
        .route("/zones/:id", put(update_zone).delete(delete_zone))
        .route("/pages", get(list_pages).post(create_page))
        .route("/pages/:id", put(update_page).delete(delete_page))
        .route("/media", get(list_media))
        .route("/media/:id", put(update_media).delete(delete_media))
        .route("/settings/:key", get(get_setting).put(put_setting))
        .route("/cache/stats", get(cache_stats))
        .route("/cache/invalidate", post(invalidate_cache))
}

/// URL-safe slug from a display name; French accents are folded
fn slugify(input: &str) -> String {
    let mut slug = String::new();
    for c in input.to_lowercase().chars() {
        match c {
            'a'..='z' | '0'..='9' => slug.push(c),
            'à' | 'â' | 'ä' => slug.push('a'),
            'é' | 'è' | 'ê' | 'ë' => slug.push('e'),
            'î' | 'ï' => slug.push('i'),
            'ô' | 'ö' => slug.push('o'),
            'ù' | 'û' | 'ü' => slug.push('u'),
            'ç' => slug.push('c'),
            'œ' => slug.push_str("oe"),
            _ => {
                if !slug.is_empty() && !slug.ends_with('-') {
                    slug.push('-');
                }
            }
        }
    }
    slug.trim_end_matches('-').to_string()
}

fn require(field: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{field} is required")));
    }
    Ok(())
}

// ==================== services ====================

#[derive(Debug, Deserialize)]
struct ServicePayload {
    name: String,
    #[serde(default)]
    slug: Option<String>,
    #[serde(default)]
    page_title: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    price: Option<String>,
    #[serde(default)]
    base_price: Option<Decimal>,
    #[serde(default)]
    image_url: Option<String>,
}

impl ServicePayload {
    fn into_draft(self) -> Result<ServiceDraft, AppError> {
        require("name", &self.name)?;
        let slug = match self.slug {
            Some(slug) if !slug.trim().is_empty() => slug,
            _ => slugify(&self.name),
        };
        Ok(ServiceDraft {
            name: self.name,
            slug,
            page_title: self.page_title,
            description: self.description,
            price: self.price,
            base_price: self.base_price,
            image_url: self.image_url,
        })
    }
}

async fn list_services(State(state): State<AppState>) -> ApiResult<Json<Vec<ServiceRow>>> {
    Ok(Json(catalog_queries::list_services(&state.db).await?))
}

async fn create_service(
    State(state): State<AppState>,
    Json(payload): Json<ServicePayload>,
) -> ApiResult<(StatusCode, Json<ServiceRow>)> {
    let draft = payload.into_draft()?;
    let service = catalog_queries::insert_service(&state.db, &draft).await?;
    state.cache.invalidate_catalogs();
    Ok((StatusCode::CREATED, Json(service)))
}

async fn update_service(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<ServicePayload>,
) -> ApiResult<Json<ServiceRow>> {
    let draft = payload.into_draft()?;
    let service = catalog_queries::update_service(&state.db, id, &draft).await?;
    state.cache.invalidate_catalogs();
    Ok(Json(service))
}

async fn delete_service(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    catalog_queries::delete_service(&state.db, id).await?;
    state.cache.invalidate_catalogs();
    Ok(StatusCode::NO_CONTENT)
}

// ==================== options & choices ====================

fn default_option_kind() -> String {
    OPTION_KIND_SELECT.to_string()
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize)]
struct OptionPayload {
    name: String,
    #[serde(rename = "type", default = "default_option_kind")]
    kind: String,
    #[serde(default = "default_true")]
    is_required: bool,
}

async fn list_options(
    State(state): State<AppState>,
    Path(service_id): Path<i64>,
) -> ApiResult<Json<Vec<ServiceOption>>> {
    Ok(Json(catalog::load_options(&state.db, service_id).await?))
}

/// Create an option; creating the first option of a service switches the
/// service to configurable pricing
async fn create_option(
    State(state): State<AppState>,
    Path(service_id): Path<i64>,
    Json(payload): Json<OptionPayload>,
) -> ApiResult<(StatusCode, Json<ServiceOptionRow>)> {
    require("name", &payload.name)?;

    let display_order = catalog_queries::count_options(&state.db, service_id).await? as i32;
    let option = catalog_queries::insert_option(
        &state.db,
        service_id,
        &payload.name,
        &payload.kind,
        payload.is_required,
        display_order,
    )
    .await?;
    catalog_queries::set_has_options(&state.db, service_id, true).await?;
    state.cache.invalidate_catalogs();

    Ok((StatusCode::CREATED, Json(option)))
}

async fn update_option(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<OptionPayload>,
) -> ApiResult<Json<ServiceOptionRow>> {
    require("name", &payload.name)?;
    let option = catalog_queries::update_option(
        &state.db,
        id,
        &payload.name,
        &payload.kind,
        payload.is_required,
    )
    .await?;
    state.cache.invalidate_catalogs();
    Ok(Json(option))
}

async fn delete_option(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    catalog_queries::delete_option(&state.db, id).await?;
    state.cache.invalidate_catalogs();
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
struct MovePayload {
    direction: String,
}

async fn move_option(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<MovePayload>,
) -> ApiResult<Json<serde_json::Value>> {
    let up = match payload.direction.as_str() {
        "up" => true,
        "down" => false,
        other => {
            return Err(AppError::Validation(format!("unknown direction '{other}'")).into());
        }
    };

    let moved = catalog::move_option(&state.db, id, up).await?;
    if moved {
        state.cache.invalidate_catalogs();
    }
    Ok(Json(serde_json::json!({ "moved": moved })))
}

#[derive(Debug, Deserialize)]
struct ChoicePayload {
    label: String,
    #[serde(default)]
    price_modifier: Decimal,
}

async fn create_choice(
    State(state): State<AppState>,
    Path(option_id): Path<i64>,
    Json(payload): Json<ChoicePayload>,
) -> ApiResult<(StatusCode, Json<OptionChoiceRow>)> {
    require("label", &payload.label)?;

    // option must exist; a dangling choice would never be reachable
    catalog_queries::option_by_id(&state.db, option_id).await?;

    let display_order = catalog_queries::count_choices(&state.db, option_id).await? as i32;
    let choice = catalog_queries::insert_choice(
        &state.db,
        option_id,
        &payload.label,
        payload.price_modifier,
        display_order,
    )
    .await?;
    state.cache.invalidate_catalogs();

    Ok((StatusCode::CREATED, Json(choice)))
}

async fn update_choice(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<ChoicePayload>,
) -> ApiResult<Json<OptionChoiceRow>> {
    require("label", &payload.label)?;
    let choice =
        catalog_queries::update_choice(&state.db, id, &payload.label, payload.price_modifier)
            .await?;
    state.cache.invalidate_catalogs();
    Ok(Json(choice))
}

async fn delete_choice(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    catalog_queries::delete_choice(&state.db, id).await?;
    state.cache.invalidate_catalogs();
    Ok(StatusCode::NO_CONTENT)
}

// ==================== bookings ====================

#[derive(Debug, Deserialize)]
struct StatusPayload {
    status: String,
}

async fn list_bookings(State(state): State<AppState>) -> ApiResult<Json<Vec<BookingRow>>> {
    Ok(Json(booking_queries::list_bookings(&state.db).await?))
}

async fn update_booking_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<StatusPayload>,
) -> ApiResult<Json<BookingRow>> {
    if !BOOKING_STATUSES.contains(&payload.status.as_str()) {
        return Err(AppError::Validation(format!("unknown status '{}'", payload.status)).into());
    }
    let booking =
        booking_queries::update_booking_status(&state.db, id, &payload.status).await?;
    Ok(Json(booking))
}

// ==================== testimonials ====================

fn default_rating() -> i32 {
    5
}

#[derive(Debug, Deserialize)]
struct TestimonialPayload {
    author: String,
    #[serde(default)]
    role: Option<String>,
    #[serde(default = "default_rating")]
    rating: i32,
    text: String,
    #[serde(default)]
    photo_url: Option<String>,
}

impl TestimonialPayload {
    fn validate(&self) -> Result<(), AppError> {
        require("author", &self.author)?;
        require("text", &self.text)?;
        if !(1..=5).contains(&self.rating) {
            return Err(AppError::Validation("rating must be between 1 and 5".to_string()));
        }
        Ok(())
    }
}

async fn list_testimonials(State(state): State<AppState>) -> ApiResult<Json<Vec<TestimonialRow>>> {
    Ok(Json(db::list_testimonials(&state.db).await?))
}

/// Admin-created testimonials go live immediately
async fn create_testimonial(
    State(state): State<AppState>,
    Json(payload): Json<TestimonialPayload>,
) -> ApiResult<(StatusCode, Json<TestimonialRow>)> {
    payload.validate()?;
    let row = db::insert_testimonial(
        &state.db,
        &payload.author,
        payload.role.as_deref(),
        payload.rating,
        &payload.text,
        payload.photo_url.as_deref(),
        TESTIMONIAL_APPROVED,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(row)))
}

async fn update_testimonial(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<TestimonialPayload>,
) -> ApiResult<Json<TestimonialRow>> {
    payload.validate()?;
    let row = db::update_testimonial(
        &state.db,
        id,
        &payload.author,
        payload.role.as_deref(),
        payload.rating,
        &payload.text,
    )
    .await?;
    Ok(Json(row))
}

async fn approve_testimonial(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<TestimonialRow>> {
    Ok(Json(
        db::set_testimonial_status(&state.db, id, TESTIMONIAL_APPROVED).await?,
    ))
}

async fn reject_testimonial(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<TestimonialRow>> {
    Ok(Json(
        db::set_testimonial_status(&state.db, id, TESTIMONIAL_REJECTED).await?,
    ))
}

async fn delete_testimonial(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    db::delete_testimonial(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ==================== faqs ====================

#[derive(Debug, Deserialize)]
struct FaqPayload {
    question: String,
    answer: String,
}

async fn list_faqs(State(state): State<AppState>) -> ApiResult<Json<Vec<FaqRow>>> {
    Ok(Json(db::list_faqs(&state.db).await?))
}

async fn create_faq(
    State(state): State<AppState>,
    Json(payload): Json<FaqPayload>,
) -> ApiResult<(StatusCode, Json<FaqRow>)> {
    require("question", &payload.question)?;
    require("answer", &payload.answer)?;
    let row = db::insert_faq(&state.db, &payload.question, &payload.answer).await?;
    Ok((StatusCode::CREATED, Json(row)))
}

async fn update_faq(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<FaqPayload>,
) -> ApiResult<Json<FaqRow>> {
    require("question", &payload.question)?;
    require("answer", &payload.answer)?;
    let row = db::update_faq(&state.db, id, &payload.question, &payload.answer).await?;
    Ok(Json(row))
}

async fn delete_faq(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<StatusCode> {
    db::delete_faq(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ==================== plans ====================

#[derive(Debug, Deserialize)]
struct PlanPayload {
    name: String,
    price_label: String,
    points: Vec<String>,
    #[serde(default)]
    popular: bool,
}

impl PlanPayload {
    /// Non-empty, trimmed selling points; a plan with none is rejected
    fn clean_points(&self) -> Result<serde_json::Value, AppError> {
        let points: Vec<&str> = self
            .points
            .iter()
            .map(|p| p.trim())
            .filter(|p| !p.is_empty())
            .collect();
        if points.is_empty() {
            return Err(AppError::Validation(
                "a plan needs at least one selling point".to_string(),
            ));
        }
        Ok(serde_json::json!(points))
    }
}

async fn list_plans(State(state): State<AppState>) -> ApiResult<Json<Vec<PlanRow>>> {
    Ok(Json(db::list_plans(&state.db).await?))
}

async fn create_plan(
    State(state): State<AppState>,
    Json(payload): Json<PlanPayload>,
) -> ApiResult<(StatusCode, Json<PlanRow>)> {
    require("name", &payload.name)?;
    require("price_label", &payload.price_label)?;
    let points = payload.clean_points()?;
    let row = db::insert_plan(
        &state.db,
        &payload.name,
        &payload.price_label,
        &points,
        payload.popular,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(row)))
}

async fn update_plan(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<PlanPayload>,
) -> ApiResult<Json<PlanRow>> {
    require("name", &payload.name)?;
    require("price_label", &payload.price_label)?;
    let points = payload.clean_points()?;
    let row = db::update_plan(
        &state.db,
        id,
        &payload.name,
        &payload.price_label,
        &points,
        payload.popular,
    )
    .await?;
    Ok(Json(row))
}

async fn delete_plan(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<StatusCode> {
    db::delete_plan(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ==================== zones ====================

#[derive(Debug, Deserialize)]
struct ZonePayload {
    name: String,
    #[serde(default)]
    description: Option<String>,
}

async fn list_zones(State(state): State<AppState>) -> ApiResult<Json<Vec<ZoneRow>>> {
    Ok(Json(db::list_zones(&state.db).await?))
}

async fn create_zone(
    State(state): State<AppState>,
    Json(payload): Json<ZonePayload>,
) -> ApiResult<(StatusCode, Json<ZoneRow>)> {
    require("name", &payload.name)?;
    let row = db::insert_zone(&state.db, &payload.name, payload.description.as_deref()).await?;
    Ok((StatusCode::CREATED, Json(row)))
}

async fn update_zone(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<ZonePayload>,
) -> ApiResult<Json<ZoneRow>> {
    require("name", &payload.name)?;
    let row = db::update_zone(&state.db, id, &payload.name, payload.description.as_deref()).await?;
    Ok(Json(row))
}

async fn delete_zone(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<StatusCode> {
    db::delete_zone(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ==================== pages ====================

fn default_category() -> String {
    "page".to_string()
}

#[derive(Debug, Deserialize)]
struct PagePayload {
    title: String,
    #[serde(default)]
    slug: Option<String>,
    #[serde(default)]
    content: String,
    #[serde(default)]
    meta_description: Option<String>,
    #[serde(default = "default_category")]
    category: String,
    #[serde(default)]
    show_in_navbar: bool,
    #[serde(default)]
    navbar_order: i32,
    #[serde(default = "empty_json_array")]
    images: serde_json::Value,
    #[serde(default)]
    is_published: bool,
}

fn empty_json_array() -> serde_json::Value {
    serde_json::json!([])
}

impl PagePayload {
    fn into_draft(self) -> Result<PageDraft, AppError> {
        require("title", &self.title)?;
        let slug = match self.slug {
            Some(slug) if !slug.trim().is_empty() => slug,
            _ => slugify(&self.title),
        };
        Ok(PageDraft {
            slug,
            title: self.title,
            content: self.content,
            meta_description: self.meta_description,
            category: self.category,
            show_in_navbar: self.show_in_navbar,
            navbar_order: self.navbar_order,
            images: self.images,
            is_published: self.is_published,
        })
    }
}

async fn list_pages(State(state): State<AppState>) -> ApiResult<Json<Vec<PageRow>>> {
    Ok(Json(db::list_pages(&state.db).await?))
}

async fn create_page(
    State(state): State<AppState>,
    Json(payload): Json<PagePayload>,
) -> ApiResult<(StatusCode, Json<PageRow>)> {
    let draft = payload.into_draft()?;
    let row = db::insert_page(&state.db, &draft).await?;
    state.cache.invalidate_page(&row.slug).await;
    Ok((StatusCode::CREATED, Json(row)))
}

async fn update_page(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<PagePayload>,
) -> ApiResult<Json<PageRow>> {
    let draft = payload.into_draft()?;
    let row = db::update_page(&state.db, id, &draft).await?;
    state.cache.invalidate_page(&row.slug).await;
    Ok(Json(row))
}

async fn delete_page(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<StatusCode> {
    db::delete_page(&state.db, id).await?;
    state.cache.pages.invalidate_all();
    Ok(StatusCode::NO_CONTENT)
}

// ==================== media ====================

#[derive(Debug, Deserialize)]
struct MediaPayload {
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    page_id: Option<i64>,
}

async fn list_media(State(state): State<AppState>) -> ApiResult<Json<Vec<MediaRow>>> {
    Ok(Json(db::list_media(&state.db).await?))
}

async fn update_media(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<MediaPayload>,
) -> ApiResult<Json<MediaRow>> {
    let row = db::update_media(
        &state.db,
        id,
        payload.description.as_deref(),
        payload.page_id,
    )
    .await?;
    Ok(Json(row))
}

async fn delete_media(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<StatusCode> {
    db::delete_media(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ==================== settings & cache ====================

fn check_setting_key(key: &str) -> Result<(), AppError> {
    if !SETTING_KEYS.contains(&key) {
        return Err(AppError::Validation(format!("unknown setting key '{key}'")));
    }
    Ok(())
}

async fn get_setting(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> ApiResult<Json<serde_json::Value>> {
    check_setting_key(&key)?;
    let value = db::get_site_setting(&state.db, &key)
        .await?
        .unwrap_or(serde_json::Value::Null);
    Ok(Json(value))
}

async fn put_setting(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Json(value): Json<serde_json::Value>,
) -> ApiResult<Json<SiteSettingRow>> {
    check_setting_key(&key)?;
    let row = db::upsert_site_setting(&state.db, &key, &value).await?;
    state.cache.invalidate_setting(&key).await;
    Ok(Json(row))
}

async fn cache_stats(State(state): State<AppState>) -> Json<CacheStats> {
    Json(state.cache.stats())
}

async fn invalidate_cache(State(state): State<AppState>) -> StatusCode {
    state.cache.invalidate_all();
    StatusCode::NO_CONTENT
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_folds_accents() {
        assert_eq!(slugify("Nettoyage auto à Genève"), "nettoyage-auto-a-geneve");
        assert_eq!(slugify("Fin de chantier"), "fin-de-chantier");
        assert_eq!(slugify("  Vitres & façades  "), "vitres-facades");
    }

    #[test]
    fn test_slugify_collapses_separator_runs() {
        assert_eq!(slugify("a --- b"), "a-b");
        assert_eq!(slugify("déjà-vu"), "deja-vu");
    }
}
