//! Database queries for the service catalog.

use sqlx::PgPool;

use crate::error::{AppError, Result};
use crate::models::{OptionChoiceRow, ServiceOptionRow, ServiceRow};

const SERVICE_COLUMNS: &str = r#"
    id, name, slug, page_title, description,
    price, base_price, image_url, has_options, created_at
"#;

/// Get a service by its URL slug
pub async fn service_by_slug(pool: &PgPool, slug: &str) -> Result<ServiceRow> {
    let service = sqlx::query_as::<_, ServiceRow>(&format!(
        r#"
        SELECT {SERVICE_COLUMNS}
        FROM services
        WHERE slug = $1
        "#
    ))
    .bind(slug)
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::NotFound)?;

    Ok(service)
}

/// Get a service by id (back-office lookups)
pub async fn service_by_id(pool: &PgPool, id: i64) -> Result<ServiceRow> {
    let service = sqlx::query_as::<_, ServiceRow>(&format!(
        r#"
        SELECT {SERVICE_COLUMNS}
        FROM services
        WHERE id = $1
        "#
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::NotFound)?;

    Ok(service)
}

/// All services, alphabetical (storefront listing and booking form)
pub async fn list_services(pool: &PgPool) -> Result<Vec<ServiceRow>> {
    let services = sqlx::query_as::<_, ServiceRow>(&format!(
        r#"
        SELECT {SERVICE_COLUMNS}
        FROM services
        ORDER BY name ASC
        "#
    ))
    .fetch_all(pool)
    .await?;

    Ok(services)
}

/// Options of one service in display order; the id tie-break keeps equal
/// display_order values in insertion order
pub async fn options_for_service(pool: &PgPool, service_id: i64) -> Result<Vec<ServiceOptionRow>> {
    let options = sqlx::query_as::<_, ServiceOptionRow>(
        r#"
        SELECT id, service_id, name, type, is_required, display_order
        FROM service_options
        WHERE service_id = $1
        ORDER BY display_order ASC, id ASC
        "#,
    )
    .bind(service_id)
    .fetch_all(pool)
    .await?;

    Ok(options)
}

/// Choices of every option of one service, display-ordered with the same
/// insertion-order tie-break
pub async fn choices_for_service(pool: &PgPool, service_id: i64) -> Result<Vec<OptionChoiceRow>> {
    let choices = sqlx::query_as::<_, OptionChoiceRow>(
        r#"
        SELECT c.id, c.option_id, c.label, c.price_modifier, c.display_order
        FROM service_option_choices c
        JOIN service_options o ON o.id = c.option_id
        WHERE o.service_id = $1
        ORDER BY c.display_order ASC, c.id ASC
        "#,
    )
    .bind(service_id)
    .fetch_all(pool)
    .await?;

    Ok(choices)
}

/// Editable service fields as they arrive from the back-office
#[derive(Debug, Clone)]
pub struct ServiceDraft {
    pub name: String,
    pub slug: String,
    pub page_title: Option<String>,
    pub description: Option<String>,
    pub price: Option<String>,
    pub base_price: Option<rust_decimal::Decimal>,
    pub image_url: Option<String>,
}

pub async fn insert_service(pool: &PgPool, draft: &ServiceDraft) -> Result<ServiceRow> {
    let service = sqlx::query_as::<_, ServiceRow>(&format!(
        r#"
        INSERT INTO services (name, slug, page_title, description, price, base_price, image_url)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING {SERVICE_COLUMNS}
        "#
    ))
    .bind(&draft.name)
    .bind(&draft.slug)
    .bind(&draft.page_title)
    .bind(&draft.description)
    .bind(&draft.price)
    .bind(draft.base_price)
    .bind(&draft.image_url)
    .fetch_one(pool)
    .await?;

    Ok(service)
}

pub async fn update_service(pool: &PgPool, id: i64, draft: &ServiceDraft) -> Result<ServiceRow> {
    let service = sqlx::query_as::<_, ServiceRow>(&format!(
        r#"
        UPDATE services
        SET name = $2, slug = $3, page_title = $4, description = $5,
            price = $6, base_price = $7, image_url = $8
        WHERE id = $1
        RETURNING {SERVICE_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(&draft.name)
    .bind(&draft.slug)
    .bind(&draft.page_title)
    .bind(&draft.description)
    .bind(&draft.price)
    .bind(draft.base_price)
    .bind(&draft.image_url)
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::NotFound)?;

    Ok(service)
}

/// Delete a service; options and choices cascade in the database
pub async fn delete_service(pool: &PgPool, id: i64) -> Result<()> {
    let result = sqlx::query("DELETE FROM services WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound);
    }
    Ok(())
}

pub async fn set_has_options(pool: &PgPool, service_id: i64, has_options: bool) -> Result<()> {
    sqlx::query("UPDATE services SET has_options = $2 WHERE id = $1")
        .bind(service_id)
        .bind(has_options)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn option_by_id(pool: &PgPool, id: i64) -> Result<ServiceOptionRow> {
    let option = sqlx::query_as::<_, ServiceOptionRow>(
        r#"
        SELECT id, service_id, name, type, is_required, display_order
        FROM service_options
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::NotFound)?;

    Ok(option)
}

pub async fn count_options(pool: &PgPool, service_id: i64) -> Result<i64> {
    let count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM service_options WHERE service_id = $1")
            .bind(service_id)
            .fetch_one(pool)
            .await?;

    Ok(count)
}

pub async fn insert_option(
    pool: &PgPool,
    service_id: i64,
    name: &str,
    kind: &str,
    is_required: bool,
    display_order: i32,
) -> Result<ServiceOptionRow> {
    let option = sqlx::query_as::<_, ServiceOptionRow>(
        r#"
        INSERT INTO service_options (service_id, name, type, is_required, display_order)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, service_id, name, type, is_required, display_order
        "#,
    )
    .bind(service_id)
    .bind(name)
    .bind(kind)
    .bind(is_required)
    .bind(display_order)
    .fetch_one(pool)
    .await?;

    Ok(option)
}

pub async fn update_option(
    pool: &PgPool,
    id: i64,
    name: &str,
    kind: &str,
    is_required: bool,
) -> Result<ServiceOptionRow> {
    let option = sqlx::query_as::<_, ServiceOptionRow>(
        r#"
        UPDATE service_options
        SET name = $2, type = $3, is_required = $4
        WHERE id = $1
        RETURNING id, service_id, name, type, is_required, display_order
        "#,
    )
    .bind(id)
    .bind(name)
    .bind(kind)
    .bind(is_required)
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::NotFound)?;

    Ok(option)
}

/// Delete an option; its choices cascade in the database
pub async fn delete_option(pool: &PgPool, id: i64) -> Result<()> {
    let result = sqlx::query("DELETE FROM service_options WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound);
    }
    Ok(())
}

/// Renumber the display order of a whole service's options in one
/// transaction (used by the back-office reorder arrows)
pub async fn renumber_options(pool: &PgPool, ordered_ids: &[i64]) -> Result<()> {
    let mut tx = pool.begin().await?;

    for (position, option_id) in ordered_ids.iter().enumerate() {
        sqlx::query("UPDATE service_options SET display_order = $2 WHERE id = $1")
            .bind(option_id)
            .bind(position as i32)
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;
    Ok(())
}

pub async fn count_choices(pool: &PgPool, option_id: i64) -> Result<i64> {
    let count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM service_option_choices WHERE option_id = $1")
            .bind(option_id)
            .fetch_one(pool)
            .await?;

    Ok(count)
}

pub async fn insert_choice(
    pool: &PgPool,
    option_id: i64,
    label: &str,
    price_modifier: rust_decimal::Decimal,
    display_order: i32,
) -> Result<OptionChoiceRow> {
    let choice = sqlx::query_as::<_, OptionChoiceRow>(
        r#"
        INSERT INTO service_option_choices (option_id, label, price_modifier, display_order)
        VALUES ($1, $2, $3, $4)
        RETURNING id, option_id, label, price_modifier, display_order
        "#,
    )
    .bind(option_id)
    .bind(label)
    .bind(price_modifier)
    .bind(display_order)
    .fetch_one(pool)
    .await?;

    Ok(choice)
}

pub async fn update_choice(
    pool: &PgPool,
    id: i64,
    label: &str,
    price_modifier: rust_decimal::Decimal,
) -> Result<OptionChoiceRow> {
    let choice = sqlx::query_as::<_, OptionChoiceRow>(
        r#"
        UPDATE service_option_choices
        SET label = $2, price_modifier = $3
        WHERE id = $1
        RETURNING id, option_id, label, price_modifier, display_order
        "#,
    )
    .bind(id)
    .bind(label)
    .bind(price_modifier)
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::NotFound)?;

    Ok(choice)
}

pub async fn delete_choice(pool: &PgPool, id: i64) -> Result<()> {
    let result = sqlx::query("DELETE FROM service_option_choices WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound);
    }
    Ok(())
}
