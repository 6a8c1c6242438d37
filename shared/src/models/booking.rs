//! Booking Model

use serde::{Deserialize, Serialize};

/// Booking lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
            BookingStatus::Completed => "completed",
        }
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Booking entity (a reserved catering event)
///
/// `event_date` is a calendar date in `YYYY-MM-DD` form. At most one
/// non-cancelled booking may exist per event date system-wide; the store
/// enforces this with a partial unique index.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Booking {
    pub id: i64,
    pub booking_code: String,
    pub user_id: i64,
    pub event_type: String,
    pub event_date: String,
    pub event_venue: String,
    pub guest_count: i64,
    pub special_instructions: Option<String>,
    pub status: BookingStatus,
    pub total_amount: f64,
    pub created_at: i64,
    pub updated_at: i64,
}

/// One menu selection attached to a booking, joined with the menu item's
/// display fields.
///
/// `unit_price` is a snapshot taken at booking time; catalog price changes
/// never retroactively alter a booking.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct BookingLineDetail {
    pub id: i64,
    pub booking_id: i64,
    pub menu_item_id: i64,
    pub item_name: String,
    pub category: String,
    pub quantity: i64,
    pub unit_price: f64,
    pub line_total: f64,
}

/// Booking joined with the owning customer's name (admin listings)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct BookingWithCustomer {
    pub id: i64,
    pub booking_code: String,
    pub user_id: i64,
    pub customer_name: String,
    pub event_type: String,
    pub event_date: String,
    pub event_venue: String,
    pub guest_count: i64,
    pub special_instructions: Option<String>,
    pub status: BookingStatus,
    pub total_amount: f64,
    pub created_at: i64,
    pub updated_at: i64,
}

/// A booking with its resolved line details
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingWithLines {
    #[serde(flatten)]
    pub booking: Booking,
    pub lines: Vec<BookingLineDetail>,
}

/// Requested menu selection when creating a booking
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingLineInput {
    pub item_id: i64,
    pub quantity: i64,
}

/// Create booking payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingCreate {
    pub event_type: String,
    pub event_date: String,
    pub event_venue: String,
    pub guest_count: i64,
    pub special_instructions: Option<String>,
    pub menu_items: Vec<BookingLineInput>,
}

/// Status transition request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingStatusUpdate {
    pub status: BookingStatus,
}
