//! Booking workflow
//!
//! The core path of the system: validate the requested event and menu
//! selections, snapshot catalog prices, compute line and booking totals,
//! and persist the booking with its lines in one transaction. Date
//! exclusivity (one event served per calendar day) is enforced by the
//! store's partial unique index, not by a pre-query.

pub mod money;

use std::collections::HashMap;

use chrono::NaiveDate;
use sqlx::SqlitePool;

use crate::auth::CurrentUser;
use crate::db::repository::booking::{self, NewBooking, NewBookingLine};
use crate::db::repository::menu_item;
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, validate_optional_text, validate_required_text,
};
use crate::utils::{AppError, AppResult};
use shared::models::{Booking, BookingCreate, BookingStatus, BookingWithLines};

/// Validate the `YYYY-MM-DD` event date format
fn validate_event_date(date: &str) -> AppResult<()> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map(|_| ())
        .map_err(|_| AppError::validation(format!("Invalid event date: {date}")))
}

/// Create a booking for `user_id`.
///
/// Prices are copied from the catalog at this moment; later catalog edits
/// never change an existing booking. Either the booking and every line are
/// persisted, or nothing is.
pub async fn create_booking(
    pool: &SqlitePool,
    user_id: i64,
    req: &BookingCreate,
) -> AppResult<BookingWithLines> {
    validate_required_text(&req.event_type, "event_type", MAX_NAME_LEN)?;
    validate_required_text(&req.event_venue, "event_venue", MAX_NAME_LEN)?;
    validate_optional_text(&req.special_instructions, "special_instructions", MAX_NOTE_LEN)?;
    validate_event_date(&req.event_date)?;
    if req.guest_count < 1 {
        return Err(AppError::validation("guest_count must be at least 1"));
    }
    if req.menu_items.is_empty() {
        return Err(AppError::validation(
            "A booking must select at least one menu item",
        ));
    }
    for line in &req.menu_items {
        money::validate_quantity(line.quantity)?;
    }

    // Resolve all requested items in one query and snapshot their prices
    let ids: Vec<i64> = req.menu_items.iter().map(|l| l.item_id).collect();
    let items = menu_item::find_by_ids(pool, &ids).await?;
    let by_id: HashMap<i64, _> = items.into_iter().map(|item| (item.id, item)).collect();

    let mut lines = Vec::with_capacity(req.menu_items.len());
    let mut line_totals = Vec::with_capacity(req.menu_items.len());
    for input in &req.menu_items {
        let item = by_id.get(&input.item_id).ok_or_else(|| {
            AppError::validation(format!("Menu item {} does not exist", input.item_id))
        })?;
        if !item.is_available {
            return Err(AppError::validation(format!(
                "Menu item '{}' is not available",
                item.name
            )));
        }

        let line_total = money::line_total(item.unit_price, input.quantity)?;
        line_totals.push(line_total);
        lines.push(NewBookingLine {
            menu_item_id: item.id,
            quantity: input.quantity,
            unit_price: item.unit_price,
            line_total,
        });
    }

    let total_amount = money::booking_total(&line_totals)?;

    let created = booking::create(
        pool,
        &NewBooking {
            user_id,
            event_type: req.event_type.clone(),
            event_date: req.event_date.clone(),
            event_venue: req.event_venue.clone(),
            guest_count: req.guest_count,
            special_instructions: req.special_instructions.clone(),
            total_amount,
        },
        &lines,
    )
    .await?;

    tracing::info!(
        booking_id = created.id,
        booking_code = %created.booking_code,
        event_date = %created.event_date,
        total_amount = created.total_amount,
        "Booking created"
    );

    let lines = booking::find_lines(pool, created.id).await?;
    Ok(BookingWithLines {
        booking: created,
        lines,
    })
}

/// Fetch a booking for the caller, without leaking other users' bookings.
///
/// A booking owned by someone else looks exactly like a missing one.
pub async fn get_booking_for(
    pool: &SqlitePool,
    caller: &CurrentUser,
    booking_id: i64,
) -> AppResult<BookingWithLines> {
    let found = booking::find_with_lines(pool, booking_id).await?;
    match found {
        Some(b) if caller.can_access(b.booking.user_id) => Ok(b),
        _ => Err(AppError::not_found(format!("Booking {booking_id}"))),
    }
}

/// Transition a booking's status.
///
/// Admins may set any status. Owners may only cancel a booking that is
/// still pending or confirmed; everything else is an admin operation.
pub async fn update_status(
    pool: &SqlitePool,
    caller: &CurrentUser,
    booking_id: i64,
    new_status: BookingStatus,
) -> AppResult<Booking> {
    let existing = booking::find_by_id(pool, booking_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Booking {booking_id}")))?;

    if !caller.can_access(existing.user_id) {
        return Err(AppError::forbidden(
            "Only the booking owner or an administrator may change its status",
        ));
    }

    if !caller.is_admin() {
        let owner_may = new_status == BookingStatus::Cancelled
            && matches!(
                existing.status,
                BookingStatus::Pending | BookingStatus::Confirmed
            );
        if !owner_may {
            return Err(AppError::forbidden(
                "Customers may only cancel a pending or confirmed booking",
            ));
        }
    }

    let updated = booking::update_status(pool, booking_id, new_status).await?;
    tracing::info!(
        booking_id,
        from = %existing.status,
        to = %updated.status,
        by = caller.id,
        "Booking status changed"
    );
    Ok(updated)
}

/// Delete a booking and its lines (owner or admin).
pub async fn delete_booking(
    pool: &SqlitePool,
    caller: &CurrentUser,
    booking_id: i64,
) -> AppResult<bool> {
    let existing = booking::find_by_id(pool, booking_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Booking {booking_id}")))?;

    if !caller.can_access(existing.user_id) {
        return Err(AppError::forbidden(
            "Only the booking owner or an administrator may delete it",
        ));
    }

    let deleted = booking::delete(pool, booking_id).await?;
    if deleted {
        tracing::info!(booking_id, by = caller.id, "Booking deleted");
    }
    Ok(deleted)
}
