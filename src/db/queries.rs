//! Database queries for editorial content and site settings

use sqlx::PgPool;

use crate::error::{AppError, Result};
use crate::models::{FaqRow, MediaRow, PageRow, PlanRow, SiteSettingRow, TestimonialRow, ZoneRow};

const PAGE_COLUMNS: &str = r#"
    id, slug, title, content, meta_description, category,
    show_in_navbar, navbar_order, images, is_published, created_at
"#;

/// Get a published page by slug
pub async fn get_published_page(pool: &PgPool, slug: &str) -> Result<PageRow> {
    let page = sqlx::query_as::<_, PageRow>(&format!(
        r#"
        SELECT {PAGE_COLUMNS}
        FROM pages
        WHERE slug = $1
          AND is_published = true
        "#
    ))
    .bind(slug)
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::NotFound)?;

    Ok(page)
}

/// All pages, for the back-office listing
pub async fn list_pages(pool: &PgPool) -> Result<Vec<PageRow>> {
    let pages = sqlx::query_as::<_, PageRow>(&format!(
        r#"
        SELECT {PAGE_COLUMNS}
        FROM pages
        ORDER BY created_at ASC
        "#
    ))
    .fetch_all(pool)
    .await?;

    Ok(pages)
}

/// Published pages marked for the navigation bar, in navbar order
pub async fn nav_pages(pool: &PgPool) -> Result<Vec<PageRow>> {
    let pages = sqlx::query_as::<_, PageRow>(&format!(
        r#"
        SELECT {PAGE_COLUMNS}
        FROM pages
        WHERE is_published = true
          AND show_in_navbar = true
        ORDER BY navbar_order ASC, title ASC
        "#
    ))
    .fetch_all(pool)
    .await?;

    Ok(pages)
}

/// Testimonials with the given status, newest first
pub async fn testimonials_by_status(pool: &PgPool, status: &str) -> Result<Vec<TestimonialRow>> {
    let rows = sqlx::query_as::<_, TestimonialRow>(
        r#"
        SELECT id, author, role, rating, text, photo_url, status, created_at
        FROM testimonials
        WHERE status = $1
        ORDER BY created_at DESC
        "#,
    )
    .bind(status)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// All testimonials for moderation, newest first
pub async fn list_testimonials(pool: &PgPool) -> Result<Vec<TestimonialRow>> {
    let rows = sqlx::query_as::<_, TestimonialRow>(
        r#"
        SELECT id, author, role, rating, text, photo_url, status, created_at
        FROM testimonials
        ORDER BY created_at DESC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// All FAQs in creation order
pub async fn list_faqs(pool: &PgPool) -> Result<Vec<FaqRow>> {
    let rows = sqlx::query_as::<_, FaqRow>(
        r#"
        SELECT id, question, answer, created_at
        FROM faqs
        ORDER BY created_at ASC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// All pricing plans in creation order
pub async fn list_plans(pool: &PgPool) -> Result<Vec<PlanRow>> {
    let rows = sqlx::query_as::<_, PlanRow>(
        r#"
        SELECT id, name, price_label, points, popular, created_at
        FROM plans
        ORDER BY created_at ASC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// All intervention zones, alphabetical
pub async fn list_zones(pool: &PgPool) -> Result<Vec<ZoneRow>> {
    let rows = sqlx::query_as::<_, ZoneRow>(
        r#"
        SELECT id, name, description, created_at
        FROM zones
        ORDER BY name ASC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// All media rows, newest first
pub async fn list_media(pool: &PgPool) -> Result<Vec<MediaRow>> {
    let rows = sqlx::query_as::<_, MediaRow>(
        r#"
        SELECT id, name, url, page_id, description, size,
               mime_type, image_type, after_url, created_at
        FROM media
        ORDER BY created_at DESC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Get one site setting value by key
pub async fn get_site_setting(pool: &PgPool, key: &str) -> Result<Option<serde_json::Value>> {
    let row = sqlx::query_as::<_, SiteSettingRow>(
        r#"
        SELECT key, value
        FROM site_settings
        WHERE key = $1
        "#,
    )
    .bind(key)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|r| r.value))
}

pub async fn insert_testimonial(
    pool: &PgPool,
    author: &str,
    role: Option<&str>,
    rating: i32,
    text: &str,
    photo_url: Option<&str>,
    status: &str,
) -> Result<TestimonialRow> {
    let row = sqlx::query_as::<_, TestimonialRow>(
        r#"
        INSERT INTO testimonials (author, role, rating, text, photo_url, status)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id, author, role, rating, text, photo_url, status, created_at
        "#,
    )
    .bind(author)
    .bind(role)
    .bind(rating)
    .bind(text)
    .bind(photo_url)
    .bind(status)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

pub async fn update_testimonial(
    pool: &PgPool,
    id: i64,
    author: &str,
    role: Option<&str>,
    rating: i32,
    text: &str,
) -> Result<TestimonialRow> {
    let row = sqlx::query_as::<_, TestimonialRow>(
        r#"
        UPDATE testimonials
        SET author = $2, role = $3, rating = $4, text = $5
        WHERE id = $1
        RETURNING id, author, role, rating, text, photo_url, status, created_at
        "#,
    )
    .bind(id)
    .bind(author)
    .bind(role)
    .bind(rating)
    .bind(text)
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::NotFound)?;

    Ok(row)
}

/// Moderation: move a testimonial to approved / rejected / pending
pub async fn set_testimonial_status(
    pool: &PgPool,
    id: i64,
    status: &str,
) -> Result<TestimonialRow> {
    let row = sqlx::query_as::<_, TestimonialRow>(
        r#"
        UPDATE testimonials
        SET status = $2
        WHERE id = $1
        RETURNING id, author, role, rating, text, photo_url, status, created_at
        "#,
    )
    .bind(id)
    .bind(status)
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::NotFound)?;

    Ok(row)
}

pub async fn delete_testimonial(pool: &PgPool, id: i64) -> Result<()> {
    delete_by_id(pool, "testimonials", id).await
}

pub async fn insert_faq(pool: &PgPool, question: &str, answer: &str) -> Result<FaqRow> {
    let row = sqlx::query_as::<_, FaqRow>(
        r#"
        INSERT INTO faqs (question, answer)
        VALUES ($1, $2)
        RETURNING id, question, answer, created_at
        "#,
    )
    .bind(question)
    .bind(answer)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

pub async fn update_faq(pool: &PgPool, id: i64, question: &str, answer: &str) -> Result<FaqRow> {
    let row = sqlx::query_as::<_, FaqRow>(
        r#"
        UPDATE faqs
        SET question = $2, answer = $3
        WHERE id = $1
        RETURNING id, question, answer, created_at
        "#,
    )
    .bind(id)
    .bind(question)
    .bind(answer)
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::NotFound)?;

    Ok(row)
}

pub async fn delete_faq(pool: &PgPool, id: i64) -> Result<()> {
    delete_by_id(pool, "faqs", id).await
}

pub async fn insert_plan(
    pool: &PgPool,
    name: &str,
    price_label: &str,
    points: &serde_json::Value,
    popular: bool,
) -> Result<PlanRow> {
    let row = sqlx::query_as::<_, PlanRow>(
        r#"
        INSERT INTO plans (name, price_label, points, popular)
        VALUES ($1, $2, $3, $4)
        RETURNING id, name, price_label, points, popular, created_at
        "#,
    )
    .bind(name)
    .bind(price_label)
    .bind(points)
    .bind(popular)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

pub async fn update_plan(
    pool: &PgPool,
    id: i64,
    name: &str,
    price_label: &str,
    points: &serde_json::Value,
    popular: bool,
) -> Result<PlanRow> {
    let row = sqlx::query_as::<_, PlanRow>(
        r#"
        UPDATE plans
        SET name = $2, price_label = $3, points = $4, popular = $5
        WHERE id = $1
        RETURNING id, name, price_label, points, popular, created_at
        "#,
    )
    .bind(id)
    .bind(name)
    .bind(price_label)
    .bind(points)
    .bind(popular)
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::NotFound)?;

    Ok(row)
}

pub async fn delete_plan(pool: &PgPool, id: i64) -> Result<()> {
    delete_by_id(pool, "plans", id).await
}

pub async fn insert_zone(pool: &PgPool, name: &str, description: Option<&str>) -> Result<ZoneRow> {
    let row = sqlx::query_as::<_, ZoneRow>(
        r#"
        INSERT INTO zones (name, description)
        VALUES ($1, $2)
        RETURNING id, name, description, created_at
        "#,
    )
    .bind(name)
    .bind(description)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

pub async fn update_zone(
    pool: &PgPool,
    id: i64,
    name: &str,
    description: Option<&str>,
) -> Result<ZoneRow> {
    let row = sqlx::query_as::<_, ZoneRow>(
        r#"
        UPDATE zones
        SET name = $2, description = $3
        WHERE id = $1
        RETURNING id, name, description, created_at
        "#,
    )
    .bind(id)
    .bind(name)
    .bind(description)
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::NotFound)?;

    Ok(row)
}

pub async fn delete_zone(pool: &PgPool, id: i64) -> Result<()> {
    delete_by_id(pool, "zones", id).await
}

/// Editable page fields as they arrive from the back-office
#[derive(Debug, Clone)]
pub struct PageDraft {
    pub slug: String,
    pub title: String,
    pub content: String,
    pub meta_description: Option<String>,
    pub category: String,
    pub show_in_navbar: bool,
    pub navbar_order: i32,
    pub images: serde_json::Value,
    pub is_published: bool,
}

pub async fn insert_page(pool: &PgPool, draft: &PageDraft) -> Result<PageRow> {
    let row = sqlx::query_as::<_, PageRow>(&format!(
        r#"
        INSERT INTO pages (slug, title, content, meta_description, category,
                           show_in_navbar, navbar_order, images, is_published)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        RETURNING {PAGE_COLUMNS}
        "#
    ))
    .bind(&draft.slug)
    .bind(&draft.title)
    .bind(&draft.content)
    .bind(&draft.meta_description)
    .bind(&draft.category)
    .bind(draft.show_in_navbar)
    .bind(draft.navbar_order)
    .bind(&draft.images)
    .bind(draft.is_published)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

pub async fn update_page(pool: &PgPool, id: i64, draft: &PageDraft) -> Result<PageRow> {
    let row = sqlx::query_as::<_, PageRow>(&format!(
        r#"
        UPDATE pages
        SET slug = $2, title = $3, content = $4, meta_description = $5, category = $6,
            show_in_navbar = $7, navbar_order = $8, images = $9, is_published = $10
        WHERE id = $1
        RETURNING {PAGE_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(&draft.slug)
    .bind(&draft.title)
    .bind(&draft.content)
    .bind(&draft.meta_description)
    .bind(&draft.category)
    .bind(draft.show_in_navbar)
    .bind(draft.navbar_order)
    .bind(&draft.images)
    .bind(draft.is_published)
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::NotFound)?;

    Ok(row)
}

pub async fn delete_page(pool: &PgPool, id: i64) -> Result<()> {
    delete_by_id(pool, "pages", id).await
}

/// Update the editable metadata of a media row (the file itself lives in
/// external storage and is not touched here)
pub async fn update_media(
    pool: &PgPool,
    id: i64,
    description: Option<&str>,
    page_id: Option<i64>,
) -> Result<MediaRow> {
    let row = sqlx::query_as::<_, MediaRow>(
        r#"
        UPDATE media
        SET description = $2, page_id = $3
        WHERE id = $1
        RETURNING id, name, url, page_id, description, size,
                  mime_type, image_type, after_url, created_at
        "#,
    )
    .bind(id)
    .bind(description)
    .bind(page_id)
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::NotFound)?;

    Ok(row)
}

pub async fn delete_media(pool: &PgPool, id: i64) -> Result<()> {
    delete_by_id(pool, "media", id).await
}

/// Shared DELETE-by-id for the simple content tables
async fn delete_by_id(pool: &PgPool, table: &str, id: i64) -> Result<()> {
    let result = sqlx::query(&format!("DELETE FROM {table} WHERE id = $1"))
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound);
    }
    Ok(())
}

/// Insert or replace one site setting
pub async fn upsert_site_setting(
    pool: &PgPool,
    key: &str,
    value: &serde_json::Value,
) -> Result<SiteSettingRow> {
    let row = sqlx::query_as::<_, SiteSettingRow>(
        r#"
        INSERT INTO site_settings (key, value)
        VALUES ($1, $2)
        ON CONFLICT (key) DO UPDATE SET value = EXCLUDED.value
        RETURNING key, value
        "#,
    )
    .bind(key)
    .bind(value)
    .fetch_one(pool)
    .await?;

    Ok(row)
}
