mod common;

use chrono::NaiveDate;
use common::test_state;
use freelancer_dashboard::{
    db,
    errors::AppError,
    models::{ClientInput, InvoiceInput},
    AppState,
};

async fn new_user(state: &AppState, email: &str) -> i64 {
    db::create_user(state, email, "not-a-real-hash", "").await.unwrap().id
}

fn invoice_input(client_id: i64, amount: f64) -> InvoiceInput {
    let issued = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
    InvoiceInput {
        client_id,
        project_id: None,
        amount,
        tax_rate: 20.0,
        status: "pending".to_owned(),
        issue_date: issued,
        due_date: issued,
        notes: None,
    }
}

#[tokio::test]
async fn invoice_numbers_are_per_user() {
    let state = test_state().await;
    let ann = new_user(&state, "ann@example.com").await;
    let ben = new_user(&state, "ben@example.com").await;

    let first = db::create_invoice(&state, ann, &invoice_input(1, 10.0)).await.unwrap();
    let second = db::create_invoice(&state, ann, &invoice_input(1, 20.0)).await.unwrap();
    assert_eq!(first.invoice_number, "INV-000001");
    assert_eq!(second.invoice_number, "INV-000002");

    let bens = db::create_invoice(&state, ben, &invoice_input(1, 30.0)).await.unwrap();
    assert_eq!(bens.invoice_number, "INV-000001");
    assert!((bens.total_amount - 36.0).abs() < 1e-9);

    let third = db::create_invoice(&state, ann, &invoice_input(1, 40.0)).await.unwrap();
    assert_eq!(third.invoice_number, "INV-000003");
}

#[tokio::test]
async fn numbering_continues_after_highest_number() {
    let state = test_state().await;
    let ann = new_user(&state, "ann@example.com").await;

    let mut ids = Vec::new();
    for amount in [10.0, 20.0, 30.0] {
        ids.push(db::create_invoice(&state, ann, &invoice_input(1, amount)).await.unwrap().id);
    }
    db::delete_invoice(&state, ann, &ids[0]).await.unwrap();

    let next = db::create_invoice(&state, ann, &invoice_input(1, 50.0)).await.unwrap();
    assert_eq!(next.invoice_number, "INV-000004");
}

#[tokio::test]
async fn foreign_updates_report_not_found() {
    let state = test_state().await;
    let ann = new_user(&state, "ann@example.com").await;
    let ben = new_user(&state, "ben@example.com").await;

    let client = db::create_client(
        &state,
        ann,
        &ClientInput {
            name: "Wayne".to_owned(),
            email: "bruce@wayne.test".to_owned(),
            phone: None,
        },
    )
    .await
    .unwrap();
    let invoice = db::create_invoice(&state, ann, &invoice_input(client.id, 10.0)).await.unwrap();

    let err = db::update_invoice(&state, ben, &invoice.id, &invoice_input(client.id, 99.0))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound));
    assert!(db::get_invoice(&state, ben, &invoice.id).await.unwrap().is_none());
    assert_eq!(db::count_clients(&state, ben).await.unwrap(), 0);

    db::delete_client(&state, ben, client.id).await.unwrap();
    assert_eq!(db::count_clients(&state, ann).await.unwrap(), 1);
}
