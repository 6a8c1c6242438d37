//! End-to-end booking and receipt flow against an in-memory store.

use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;

use feast_server::auth::{CurrentUser, password};
use feast_server::bookings;
use feast_server::db::MIGRATOR;
use feast_server::db::repository::{RepoError, menu_item, message, user};
use feast_server::receipts;
use feast_server::utils::AppError;
use shared::models::{
    BookingCreate, BookingLineInput, BookingStatus, MenuItemCreate, MenuItemUpdate, MessageStatus,
    ReceiptGenerate, User, UserCreate, UserRole,
};

async fn setup_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("open in-memory database");
    MIGRATOR.run(&pool).await.expect("run migrations");
    pool
}

async fn create_user(pool: &SqlitePool, username: &str, email: &str, role: UserRole) -> User {
    let hash = password::hash_password("a long enough password").expect("hash password");
    user::create(
        pool,
        &UserCreate {
            username: username.to_string(),
            email: email.to_string(),
            password: String::new(),
            first_name: "Test".to_string(),
            last_name: username.to_string(),
            phone: None,
        },
        &hash,
        role,
    )
    .await
    .expect("create user")
}

fn as_current(user: &User) -> CurrentUser {
    CurrentUser {
        id: user.id,
        username: user.username.clone(),
        role: user.role,
    }
}

async fn create_item(pool: &SqlitePool, name: &str, price: f64) -> shared::models::MenuItem {
    menu_item::create(
        pool,
        &MenuItemCreate {
            name: name.to_string(),
            description: None,
            category: "Mains".to_string(),
            unit_price: price,
            image_url: None,
            is_available: Some(true),
        },
    )
    .await
    .expect("create menu item")
}

fn booking_request(date: &str, lines: Vec<BookingLineInput>) -> BookingCreate {
    BookingCreate {
        event_type: "Wedding".to_string(),
        event_date: date.to_string(),
        event_venue: "Garden Pavilion".to_string(),
        guest_count: 120,
        special_instructions: None,
        menu_items: lines,
    }
}

#[tokio::test]
async fn booking_totals_and_receipt_flow() {
    let pool = setup_pool().await;
    let customer = create_user(&pool, "maria", "maria@example.com", UserRole::Customer).await;
    let caller = as_current(&customer);

    let lechon = create_item(&pool, "Lechon Belly", 100.0).await;
    let lumpia = create_item(&pool, "Lumpia Platter", 50.0).await;

    // 3 × ₱100 + 1 × ₱50 = ₱350
    let created = bookings::create_booking(
        &pool,
        customer.id,
        &booking_request(
            "2026-09-12",
            vec![
                BookingLineInput {
                    item_id: lechon.id,
                    quantity: 3,
                },
                BookingLineInput {
                    item_id: lumpia.id,
                    quantity: 1,
                },
            ],
        ),
    )
    .await
    .expect("create booking");

    assert_eq!(created.booking.total_amount, 350.0);
    assert_eq!(created.booking.status, BookingStatus::Pending);
    assert!(created.booking.booking_code.starts_with("BK-"));
    assert_eq!(created.lines.len(), 2);

    let line_sum: f64 = created.lines.iter().map(|l| l.line_total).sum();
    assert_eq!(line_sum, created.booking.total_amount);

    // Receipt: 12% tax on the booking total
    let receipt = receipts::generate(
        &pool,
        &caller,
        &ReceiptGenerate {
            booking_id: created.booking.id,
            payment_method: Some("cash".to_string()),
            payment_status: None,
        },
    )
    .await
    .expect("generate receipt");

    assert_eq!(receipt.subtotal, 350.0);
    assert_eq!(receipt.tax_amount, 42.0);
    assert_eq!(receipt.total_amount, 392.0);
    assert_eq!(receipt.receipt_number, 1);
    assert!(receipt.receipt_code.starts_with("RCP-"));
    assert_eq!(receipt.customer_email, "maria@example.com");
    assert_eq!(receipt.event_date, "2026-09-12");

    // A second receipt for the same booking is refused
    let again = receipts::generate(
        &pool,
        &caller,
        &ReceiptGenerate {
            booking_id: created.booking.id,
            payment_method: None,
            payment_status: None,
        },
    )
    .await;
    assert!(matches!(again, Err(AppError::Conflict(_))));

    // Numbers increase strictly under sequential generation
    let second = bookings::create_booking(
        &pool,
        customer.id,
        &booking_request(
            "2026-09-13",
            vec![BookingLineInput {
                item_id: lumpia.id,
                quantity: 2,
            }],
        ),
    )
    .await
    .expect("create second booking");

    let second_receipt = receipts::generate(
        &pool,
        &caller,
        &ReceiptGenerate {
            booking_id: second.booking.id,
            payment_method: None,
            payment_status: None,
        },
    )
    .await
    .expect("generate second receipt");

    assert_eq!(second_receipt.receipt_number, 2);
}

#[tokio::test]
async fn one_booking_per_event_date() {
    let pool = setup_pool().await;
    let customer = create_user(&pool, "maria", "maria@example.com", UserRole::Customer).await;
    let item = create_item(&pool, "Paella", 80.0).await;
    let line = || {
        vec![BookingLineInput {
            item_id: item.id,
            quantity: 1,
        }]
    };

    let first = bookings::create_booking(
        &pool,
        customer.id,
        &booking_request("2026-10-01", line()),
    )
    .await
    .expect("first booking");

    // Same date is taken
    let conflict =
        bookings::create_booking(&pool, customer.id, &booking_request("2026-10-01", line())).await;
    assert!(matches!(conflict, Err(AppError::Conflict(_))));

    // Cancelling the first frees the date
    bookings::update_status(
        &pool,
        &as_current(&customer),
        first.booking.id,
        BookingStatus::Cancelled,
    )
    .await
    .expect("cancel booking");

    let retry =
        bookings::create_booking(&pool, customer.id, &booking_request("2026-10-01", line())).await;
    assert!(retry.is_ok());

    // Re-activating the cancelled booking would double-book the date
    let admin = create_user(&pool, "admin", "admin@feast.local", UserRole::Admin).await;
    let reactivate = bookings::update_status(
        &pool,
        &as_current(&admin),
        first.booking.id,
        BookingStatus::Confirmed,
    )
    .await;
    assert!(matches!(reactivate, Err(AppError::Conflict(_))));
}

#[tokio::test]
async fn booking_keeps_price_snapshot() {
    let pool = setup_pool().await;
    let customer = create_user(&pool, "maria", "maria@example.com", UserRole::Customer).await;
    let item = create_item(&pool, "Kare-Kare", 120.0).await;

    let created = bookings::create_booking(
        &pool,
        customer.id,
        &booking_request(
            "2026-11-05",
            vec![BookingLineInput {
                item_id: item.id,
                quantity: 2,
            }],
        ),
    )
    .await
    .expect("create booking");
    assert_eq!(created.booking.total_amount, 240.0);

    // Catalog price change after the fact
    menu_item::update(
        &pool,
        item.id,
        &MenuItemUpdate {
            unit_price: Some(999.0),
            ..Default::default()
        },
    )
    .await
    .expect("update price");

    let reloaded = bookings::get_booking_for(&pool, &as_current(&customer), created.booking.id)
        .await
        .expect("reload booking");
    assert_eq!(reloaded.booking.total_amount, 240.0);
    assert_eq!(reloaded.lines[0].unit_price, 120.0);
}

#[tokio::test]
async fn unavailable_or_unknown_items_are_rejected() {
    let pool = setup_pool().await;
    let customer = create_user(&pool, "maria", "maria@example.com", UserRole::Customer).await;
    let item = create_item(&pool, "Sisig", 90.0).await;

    // Unknown item
    let unknown = bookings::create_booking(
        &pool,
        customer.id,
        &booking_request(
            "2026-12-01",
            vec![BookingLineInput {
                item_id: 999_999,
                quantity: 1,
            }],
        ),
    )
    .await;
    assert!(matches!(unknown, Err(AppError::Validation(_))));

    // Empty selection
    let empty =
        bookings::create_booking(&pool, customer.id, &booking_request("2026-12-01", vec![])).await;
    assert!(matches!(empty, Err(AppError::Validation(_))));

    // Unavailable item
    menu_item::update(
        &pool,
        item.id,
        &MenuItemUpdate {
            is_available: Some(false),
            ..Default::default()
        },
    )
    .await
    .expect("disable item");

    let unavailable = bookings::create_booking(
        &pool,
        customer.id,
        &booking_request(
            "2026-12-01",
            vec![BookingLineInput {
                item_id: item.id,
                quantity: 1,
            }],
        ),
    )
    .await;
    assert!(matches!(unavailable, Err(AppError::Validation(_))));

    // Malformed date
    let bad_date = bookings::create_booking(
        &pool,
        customer.id,
        &booking_request(
            "12/01/2026",
            vec![BookingLineInput {
                item_id: item.id,
                quantity: 1,
            }],
        ),
    )
    .await;
    assert!(matches!(bad_date, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn referenced_menu_item_cannot_be_deleted() {
    let pool = setup_pool().await;
    let customer = create_user(&pool, "maria", "maria@example.com", UserRole::Customer).await;
    let referenced = create_item(&pool, "Pancit", 60.0).await;
    let unreferenced = create_item(&pool, "Halo-Halo", 45.0).await;

    bookings::create_booking(
        &pool,
        customer.id,
        &booking_request(
            "2026-10-20",
            vec![BookingLineInput {
                item_id: referenced.id,
                quantity: 4,
            }],
        ),
    )
    .await
    .expect("create booking");

    let blocked = menu_item::delete(&pool, referenced.id).await;
    assert!(matches!(blocked, Err(RepoError::Referenced(_))));

    let ok = menu_item::delete(&pool, unreferenced.id).await;
    assert_eq!(ok.unwrap(), true);
}

#[tokio::test]
async fn duplicate_registration_is_refused() {
    let pool = setup_pool().await;
    create_user(&pool, "maria", "maria@example.com", UserRole::Customer).await;

    let hash = password::hash_password("another password!").expect("hash");
    // Same email, different username
    let dup_email = user::create(
        &pool,
        &UserCreate {
            username: "maria2".to_string(),
            email: "maria@example.com".to_string(),
            password: String::new(),
            first_name: "Maria".to_string(),
            last_name: "Santos".to_string(),
            phone: None,
        },
        &hash,
        UserRole::Customer,
    )
    .await;
    assert!(matches!(dup_email, Err(RepoError::Duplicate(_))));

    // Same username, different email
    let dup_username = user::create(
        &pool,
        &UserCreate {
            username: "maria".to_string(),
            email: "maria2@example.com".to_string(),
            password: String::new(),
            first_name: "Maria".to_string(),
            last_name: "Santos".to_string(),
            phone: None,
        },
        &hash,
        UserRole::Customer,
    )
    .await;
    assert!(matches!(dup_username, Err(RepoError::Duplicate(_))));
}

#[tokio::test]
async fn bookings_do_not_leak_across_users() {
    let pool = setup_pool().await;
    let alice = create_user(&pool, "alice", "alice@example.com", UserRole::Customer).await;
    let bob = create_user(&pool, "bob", "bob@example.com", UserRole::Customer).await;
    let admin = create_user(&pool, "admin", "admin@feast.local", UserRole::Admin).await;
    let item = create_item(&pool, "Adobo", 70.0).await;

    let created = bookings::create_booking(
        &pool,
        alice.id,
        &booking_request(
            "2026-10-02",
            vec![BookingLineInput {
                item_id: item.id,
                quantity: 1,
            }],
        ),
    )
    .await
    .expect("create booking");

    // Bob sees nothing, the admin sees everything
    let as_bob = bookings::get_booking_for(&pool, &as_current(&bob), created.booking.id).await;
    assert!(matches!(as_bob, Err(AppError::NotFound(_))));

    let as_admin = bookings::get_booking_for(&pool, &as_current(&admin), created.booking.id).await;
    assert!(as_admin.is_ok());

    // Bob cannot mutate Alice's booking either
    let bob_update = bookings::update_status(
        &pool,
        &as_current(&bob),
        created.booking.id,
        BookingStatus::Cancelled,
    )
    .await;
    assert!(matches!(bob_update, Err(AppError::Forbidden(_))));

    let bob_delete = bookings::delete_booking(&pool, &as_current(&bob), created.booking.id).await;
    assert!(matches!(bob_delete, Err(AppError::Forbidden(_))));
}

#[tokio::test]
async fn owners_may_only_cancel() {
    let pool = setup_pool().await;
    let customer = create_user(&pool, "maria", "maria@example.com", UserRole::Customer).await;
    let admin = create_user(&pool, "admin", "admin@feast.local", UserRole::Admin).await;
    let item = create_item(&pool, "Bistek", 85.0).await;

    let created = bookings::create_booking(
        &pool,
        customer.id,
        &booking_request(
            "2026-10-03",
            vec![BookingLineInput {
                item_id: item.id,
                quantity: 2,
            }],
        ),
    )
    .await
    .expect("create booking");

    // Owner cannot jump to completed
    let owner_complete = bookings::update_status(
        &pool,
        &as_current(&customer),
        created.booking.id,
        BookingStatus::Completed,
    )
    .await;
    assert!(matches!(owner_complete, Err(AppError::Forbidden(_))));

    // Admin can
    let admin_confirm = bookings::update_status(
        &pool,
        &as_current(&admin),
        created.booking.id,
        BookingStatus::Confirmed,
    )
    .await
    .expect("admin confirm");
    assert_eq!(admin_confirm.status, BookingStatus::Confirmed);

    // Owner can still cancel a confirmed booking
    let cancelled = bookings::update_status(
        &pool,
        &as_current(&customer),
        created.booking.id,
        BookingStatus::Cancelled,
    )
    .await
    .expect("owner cancel");
    assert_eq!(cancelled.status, BookingStatus::Cancelled);
}

#[tokio::test]
async fn deleting_a_booking_removes_its_lines() {
    let pool = setup_pool().await;
    let customer = create_user(&pool, "maria", "maria@example.com", UserRole::Customer).await;
    let item = create_item(&pool, "Caldereta", 95.0).await;

    let created = bookings::create_booking(
        &pool,
        customer.id,
        &booking_request(
            "2026-10-04",
            vec![BookingLineInput {
                item_id: item.id,
                quantity: 3,
            }],
        ),
    )
    .await
    .expect("create booking");

    let deleted = bookings::delete_booking(&pool, &as_current(&customer), created.booking.id)
        .await
        .expect("delete booking");
    assert!(deleted);

    let remaining: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM booking_items WHERE booking_id = ?")
            .bind(created.booking.id)
            .fetch_one(&pool)
            .await
            .expect("count lines");
    assert_eq!(remaining, 0);

    // The item became deletable again
    assert_eq!(menu_item::delete(&pool, item.id).await.unwrap(), true);
}

#[tokio::test]
async fn booking_with_receipt_cannot_be_deleted() {
    let pool = setup_pool().await;
    let customer = create_user(&pool, "maria", "maria@example.com", UserRole::Customer).await;
    let caller = as_current(&customer);
    let item = create_item(&pool, "Inihaw", 75.0).await;

    let created = bookings::create_booking(
        &pool,
        customer.id,
        &booking_request(
            "2026-10-05",
            vec![BookingLineInput {
                item_id: item.id,
                quantity: 1,
            }],
        ),
    )
    .await
    .expect("create booking");

    receipts::generate(
        &pool,
        &caller,
        &ReceiptGenerate {
            booking_id: created.booking.id,
            payment_method: None,
            payment_status: None,
        },
    )
    .await
    .expect("generate receipt");

    let blocked = bookings::delete_booking(&pool, &caller, created.booking.id).await;
    assert!(matches!(blocked, Err(AppError::Conflict(_))));
}

#[tokio::test]
async fn message_lifecycle() {
    let pool = setup_pool().await;
    let customer = create_user(&pool, "maria", "maria@example.com", UserRole::Customer).await;

    let created = message::create(
        &pool,
        customer.id,
        "Menu question",
        "Do you offer a vegetarian set?",
    )
    .await
    .expect("create message");
    assert_eq!(created.status, MessageStatus::Unread);
    assert!(created.message_code.starts_with("MSG-"));
    assert!(created.admin_response.is_none());

    // Explicit read, then a reply
    let read = message::update_status(&pool, created.id, MessageStatus::Read)
        .await
        .expect("mark read");
    assert_eq!(read.status, MessageStatus::Read);

    let replied = message::respond(&pool, created.id, "Yes, we have a full vegetarian set.")
        .await
        .expect("respond");
    assert_eq!(replied.status, MessageStatus::Replied);
    assert_eq!(
        replied.admin_response.as_deref(),
        Some("Yes, we have a full vegetarian set.")
    );

    // Own inbox shows the reply
    let inbox = message::find_by_user(&pool, customer.id)
        .await
        .expect("own inbox");
    assert_eq!(inbox.len(), 1);
    assert_eq!(inbox[0].status, MessageStatus::Replied);
}
