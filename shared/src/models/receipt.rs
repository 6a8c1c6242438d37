//! Receipt Model

use serde::{Deserialize, Serialize};

/// Payment status of a receipt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
pub enum PaymentStatus {
    Pending,
    Paid,
    Failed,
    Refunded,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Paid => "paid",
            PaymentStatus::Failed => "failed",
            PaymentStatus::Refunded => "refunded",
        }
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Receipt entity
///
/// Derived 1:1 from a booking. `receipt_number` is a monotonically
/// increasing integer allocated at generation time; `tax_rate` is fixed
/// at generation and stored with the row.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Receipt {
    pub id: i64,
    pub receipt_code: String,
    pub receipt_number: i64,
    pub booking_id: i64,
    pub subtotal: f64,
    pub tax_rate: f64,
    pub tax_amount: f64,
    pub total_amount: f64,
    pub payment_method: Option<String>,
    pub payment_status: PaymentStatus,
    pub issued_date: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Receipt with denormalized customer and event fields, ready to render
/// without further joins.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct ReceiptDetail {
    pub id: i64,
    pub receipt_code: String,
    pub receipt_number: i64,
    pub booking_id: i64,
    pub subtotal: f64,
    pub tax_rate: f64,
    pub tax_amount: f64,
    pub total_amount: f64,
    pub payment_method: Option<String>,
    pub payment_status: PaymentStatus,
    pub issued_date: i64,
    pub created_at: i64,
    pub updated_at: i64,
    pub booking_code: String,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: Option<String>,
    pub event_type: String,
    pub event_date: String,
    pub event_venue: String,
    pub guest_count: i64,
}

/// Generate receipt payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReceiptGenerate {
    pub booking_id: i64,
    pub payment_method: Option<String>,
    pub payment_status: Option<PaymentStatus>,
}

/// Payment status overwrite request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentStatusUpdate {
    pub status: PaymentStatus,
}
