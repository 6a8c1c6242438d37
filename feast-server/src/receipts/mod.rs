//! Receipt generation
//!
//! A receipt is a pure function of its booking: `subtotal` is the booking
//! total, tax is a fixed 12%, and the receipt number is the next integer
//! in a store-wide monotonic sequence. One receipt per booking, enforced
//! by the UNIQUE `booking_id` column.

pub mod render;

use sqlx::SqlitePool;

use crate::auth::CurrentUser;
use crate::bookings::money;
use crate::db::repository::booking;
use crate::db::repository::receipt::{self, NewReceipt};
use crate::utils::validation::{MAX_SHORT_TEXT_LEN, validate_optional_text};
use crate::utils::{AppError, AppResult};
use shared::models::{PaymentStatus, Receipt, ReceiptDetail, ReceiptGenerate};

/// Generate the receipt for a booking (admin or booking owner).
pub async fn generate(
    pool: &SqlitePool,
    caller: &CurrentUser,
    req: &ReceiptGenerate,
) -> AppResult<ReceiptDetail> {
    validate_optional_text(&req.payment_method, "payment_method", MAX_SHORT_TEXT_LEN)?;

    let booking = booking::find_by_id(pool, req.booking_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Booking {}", req.booking_id)))?;

    if !caller.can_access(booking.user_id) {
        return Err(AppError::forbidden(
            "Only the booking owner or an administrator may generate its receipt",
        ));
    }

    let subtotal = booking.total_amount;
    let (tax_amount, total_amount) = money::tax_breakdown(subtotal)?;

    let created = receipt::create(
        pool,
        &NewReceipt {
            booking_id: booking.id,
            subtotal,
            tax_rate: money::TAX_RATE,
            tax_amount,
            total_amount,
            payment_method: req.payment_method.clone(),
            payment_status: req.payment_status.unwrap_or(PaymentStatus::Pending),
        },
    )
    .await?;

    tracing::info!(
        receipt_id = created.id,
        receipt_number = created.receipt_number,
        booking_id = booking.id,
        total_amount = created.total_amount,
        "Receipt generated"
    );

    receipt::find_detail_by_id(pool, created.id)
        .await?
        .ok_or_else(|| AppError::internal("Receipt vanished after creation"))
}

/// Fetch a receipt for the caller, without leaking other users' receipts.
pub async fn get_receipt_for(
    pool: &SqlitePool,
    caller: &CurrentUser,
    receipt_id: i64,
) -> AppResult<ReceiptDetail> {
    let detail = receipt::find_detail_by_id(pool, receipt_id).await?;
    match detail {
        Some(d) => {
            let booking = booking::find_by_id(pool, d.booking_id)
                .await?
                .ok_or_else(|| AppError::not_found(format!("Receipt {receipt_id}")))?;
            if caller.can_access(booking.user_id) {
                Ok(d)
            } else {
                Err(AppError::not_found(format!("Receipt {receipt_id}")))
            }
        }
        None => Err(AppError::not_found(format!("Receipt {receipt_id}"))),
    }
}

/// Overwrite the payment status (admin or booking owner); no transition
/// graph is enforced.
pub async fn update_payment_status(
    pool: &SqlitePool,
    caller: &CurrentUser,
    receipt_id: i64,
    status: PaymentStatus,
) -> AppResult<Receipt> {
    let existing = receipt::find_by_id(pool, receipt_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Receipt {receipt_id}")))?;

    let booking = booking::find_by_id(pool, existing.booking_id)
        .await?
        .ok_or_else(|| AppError::internal("Receipt references a missing booking"))?;

    if !caller.can_access(booking.user_id) {
        return Err(AppError::forbidden(
            "Only the booking owner or an administrator may update payment status",
        ));
    }

    let updated = receipt::update_payment_status(pool, receipt_id, status).await?;
    tracing::info!(
        receipt_id,
        status = %updated.payment_status,
        by = caller.id,
        "Receipt payment status changed"
    );
    Ok(updated)
}
