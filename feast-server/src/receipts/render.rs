//! Printable HTML receipt rendering
//!
//! The server is the source of truth for receipt presentation; clients
//! open this page and print it as-is.

use shared::models::{BookingLineDetail, ReceiptDetail};

/// Format a millisecond timestamp as `YYYY-MM-DD HH:MM` UTC.
fn format_timestamp(millis: i64) -> String {
    chrono::DateTime::from_timestamp_millis(millis)
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "-".to_string())
}

fn escape_html(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Render a receipt with its booking lines as a standalone printable page.
pub fn render_html(receipt: &ReceiptDetail, lines: &[BookingLineDetail]) -> String {
    let mut rows = String::new();
    for line in lines {
        rows.push_str(&format!(
            "<tr><td>{}</td><td class=\"num\">{}</td><td class=\"num\">{:.2}</td>\
             <td class=\"num\">{:.2}</td></tr>\n",
            escape_html(&line.item_name),
            line.quantity,
            line.unit_price,
            line.line_total
        ));
    }

    let payment_method = receipt
        .payment_method
        .as_deref()
        .unwrap_or("unspecified");

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>Receipt {code}</title>
<style>
body {{ font-family: "Helvetica Neue", Arial, sans-serif; max-width: 480px; margin: 2em auto; color: #222; }}
h1 {{ font-size: 1.2em; border-bottom: 2px solid #222; padding-bottom: 0.4em; }}
table {{ width: 100%; border-collapse: collapse; margin: 1em 0; }}
th, td {{ text-align: left; padding: 0.3em 0.2em; border-bottom: 1px solid #ddd; }}
td.num, th.num {{ text-align: right; }}
.totals td {{ border: none; padding: 0.15em 0.2em; }}
.grand {{ font-weight: bold; border-top: 2px solid #222; }}
.meta {{ color: #555; font-size: 0.9em; }}
@media print {{ body {{ margin: 0; }} }}
</style>
</head>
<body>
<h1>Official Receipt</h1>
<p class="meta">
Receipt No. {number}<br>
{code} · issued {issued}<br>
Booking {booking_code} · {event_type} on {event_date} at {event_venue} ({guest_count} guests)
</p>
<p class="meta">
Billed to: {customer_name} &lt;{customer_email}&gt;<br>
Payment: {payment_method} · status: {payment_status}
</p>
<table>
<thead><tr><th>Item</th><th class="num">Qty</th><th class="num">Unit</th><th class="num">Total</th></tr></thead>
<tbody>
{rows}</tbody>
</table>
<table class="totals">
<tr><td>Subtotal</td><td class="num">{subtotal:.2}</td></tr>
<tr><td>Tax ({tax_rate:.0}%)</td><td class="num">{tax_amount:.2}</td></tr>
<tr class="grand"><td>Total</td><td class="num">{total:.2}</td></tr>
</table>
<p class="meta">Thank you for celebrating with us.</p>
</body>
</html>
"#,
        code = escape_html(&receipt.receipt_code),
        number = receipt.receipt_number,
        issued = format_timestamp(receipt.issued_date),
        booking_code = escape_html(&receipt.booking_code),
        event_type = escape_html(&receipt.event_type),
        event_date = escape_html(&receipt.event_date),
        event_venue = escape_html(&receipt.event_venue),
        guest_count = receipt.guest_count,
        customer_name = escape_html(&receipt.customer_name),
        customer_email = escape_html(&receipt.customer_email),
        payment_method = escape_html(payment_method),
        payment_status = receipt.payment_status,
        rows = rows,
        subtotal = receipt.subtotal,
        tax_rate = receipt.tax_rate * 100.0,
        tax_amount = receipt.tax_amount,
        total = receipt.total_amount,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::PaymentStatus;

    fn sample_receipt() -> ReceiptDetail {
        ReceiptDetail {
            id: 1,
            receipt_code: "RCP-20260801120000-0001".to_string(),
            receipt_number: 7,
            booking_id: 2,
            subtotal: 350.0,
            tax_rate: 0.12,
            tax_amount: 42.0,
            total_amount: 392.0,
            payment_method: Some("cash".to_string()),
            payment_status: PaymentStatus::Pending,
            issued_date: 1_754_042_400_000,
            created_at: 1_754_042_400_000,
            updated_at: 1_754_042_400_000,
            booking_code: "BK-20260801115900-0002".to_string(),
            customer_name: "Maria Santos".to_string(),
            customer_email: "maria@example.com".to_string(),
            customer_phone: None,
            event_type: "Wedding".to_string(),
            event_date: "2026-09-12".to_string(),
            event_venue: "Garden Pavilion".to_string(),
            guest_count: 120,
        }
    }

    #[test]
    fn renders_totals_and_codes() {
        let lines = vec![BookingLineDetail {
            id: 1,
            booking_id: 2,
            menu_item_id: 3,
            item_name: "Lechon Belly".to_string(),
            category: "Mains".to_string(),
            quantity: 3,
            unit_price: 100.0,
            line_total: 300.0,
        }];
        let html = render_html(&sample_receipt(), &lines);
        assert!(html.contains("RCP-20260801120000-0001"));
        assert!(html.contains("Receipt No. 7"));
        assert!(html.contains("Lechon Belly"));
        assert!(html.contains("392.00"));
        assert!(html.contains("Tax (12%)"));
    }

    #[test]
    fn escapes_markup_in_names() {
        let mut receipt = sample_receipt();
        receipt.customer_name = "<script>alert(1)</script>".to_string();
        let html = render_html(&receipt, &[]);
        assert!(!html.contains("<script>alert"));
        assert!(html.contains("&lt;script&gt;"));
    }
}
