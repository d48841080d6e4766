//! Database queries for bookings.

use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::{BookingRow, NewBooking};

/// Insert one booking row. The payload arrives fully assembled; the
/// database assigns id, status and creation timestamp.
pub async fn insert_booking(pool: &PgPool, booking: &NewBooking) -> Result<BookingRow> {
    let row = sqlx::query_as::<_, BookingRow>(
        r#"
        INSERT INTO bookings (
            name, email, phone,
            service_id, service_name, base_price, total_price,
            city, address, date, time, notes, selected_options
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
        RETURNING
            id, name, email, phone,
            service_id, service_name, base_price, total_price,
            city, address, date, time, notes, selected_options,
            status, created_at
        "#,
    )
    .bind(&booking.name)
    .bind(&booking.email)
    .bind(&booking.phone)
    .bind(booking.service_id)
    .bind(&booking.service_name)
    .bind(booking.base_price)
    .bind(booking.total_price)
    .bind(&booking.city)
    .bind(&booking.address)
    .bind(booking.date)
    .bind(&booking.time)
    .bind(&booking.notes)
    .bind(&booking.selected_options)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

/// All bookings, newest first (back-office listing)
pub async fn list_bookings(pool: &PgPool) -> Result<Vec<BookingRow>> {
    let rows = sqlx::query_as::<_, BookingRow>(
        r#"
        SELECT
            id, name, email, phone,
            service_id, service_name, base_price, total_price,
            city, address, date, time, notes, selected_options,
            status, created_at
        FROM bookings
        ORDER BY created_at DESC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Update the status of one booking; the only mutation bookings support
pub async fn update_booking_status(pool: &PgPool, id: Uuid, status: &str) -> Result<BookingRow> {
    let row = sqlx::query_as::<_, BookingRow>(
        r#"
        UPDATE bookings
        SET status = $2
        WHERE id = $1
        RETURNING
            id, name, email, phone,
            service_id, service_name, base_price, total_price,
            city, address, date, time, notes, selected_options,
            status, created_at
        "#,
    )
    .bind(id)
    .bind(status)
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::NotFound)?;

    Ok(row)
}
