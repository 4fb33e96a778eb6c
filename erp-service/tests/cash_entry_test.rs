mod common;

use common::{data, TestApp};
use serde_json::json;

#[tokio::test]
#[ignore = "requires MongoDB at MONGODB_URI; run with `cargo test -- --ignored`"]
async fn income_list_paginates() {
    let app = TestApp::spawn().await;

    for i in 1..=25 {
        app.create(
            "/incomes",
            &json!({
                "title": format!("Sale {}", i),
                "category": "sales",
                "amount": 100,
                "transaction_date": "2025-03-01"
            }),
        )
        .await;
    }

    let response = app
        .get("/incomes?page=3&limit=10")
        .send()
        .await
        .expect("Failed to execute request");
    let page = data(response).await;
    assert_eq!(page["total_count"], 25);
    assert_eq!(page["total_pages"], 3);
    assert_eq!(page["page"], 3);
    assert_eq!(page["list"].as_array().unwrap().len(), 5);

    app.cleanup().await;
}

#[tokio::test]
#[ignore = "requires MongoDB at MONGODB_URI; run with `cargo test -- --ignored`"]
async fn incomes_and_expenses_are_separate_ledgers() {
    let app = TestApp::spawn().await;

    let income = app
        .create("/incomes", &json!({ "title": "Consulting", "amount": 5000 }))
        .await;
    assert_eq!(income["kind"], "income");
    let expense = app
        .create("/expenses", &json!({ "title": "Rent", "category": "office", "amount": 1200 }))
        .await;
    assert_eq!(expense["kind"], "expense");

    let income_id = income["entry_id"].as_str().unwrap();
    let response = app
        .get(&format!("/expenses/{}", income_id))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status().as_u16(), 404);

    let response = app
        .get("/expenses?category=office")
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(data(response).await["total_count"], 1);

    let response = app
        .get("/finance/summary")
        .send()
        .await
        .expect("Failed to execute request");
    let summary = data(response).await;
    assert_eq!(summary["income"]["all_time"]["total_amount"], 5000.0);
    assert_eq!(summary["expense"]["all_time"]["total_amount"], 1200.0);
    assert_eq!(summary["net"]["all_time"]["amount"], 3800.0);
    assert_eq!(summary["net"]["today"]["amount"], 3800.0);

    app.cleanup().await;
}

#[tokio::test]
#[ignore = "requires MongoDB at MONGODB_URI; run with `cargo test -- --ignored`"]
async fn entry_update_and_delete() {
    let app = TestApp::spawn().await;

    let created = app
        .create("/expenses", &json!({ "title": "Fuel", "amount": 800 }))
        .await;
    let id = created["entry_id"].as_str().unwrap();

    let response = app
        .put(&format!("/expenses/{}", id), &json!({ "amount": 950.5, "note": "two trips" }))
        .send()
        .await
        .expect("Failed to execute request");
    let updated = data(response).await;
    assert_eq!(updated["amount"], 950.5);
    assert_eq!(updated["note"], "two trips");
    assert_eq!(updated["title"], "Fuel");

    let response = app
        .delete(&format!("/expenses/{}", id))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status().as_u16(), 200);

    let response = app
        .delete(&format!("/expenses/{}", id))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status().as_u16(), 404);

    app.cleanup().await;
}

#[tokio::test]
#[ignore = "requires MongoDB at MONGODB_URI; run with `cargo test -- --ignored`"]
async fn expense_report_groups_by_day() {
    let app = TestApp::spawn().await;

    for (date, amount) in [("2025-04-02", 10), ("2025-04-01", 20), ("2025-04-02", 30)] {
        app.create(
            "/expenses",
            &json!({ "title": "Supplies", "amount": amount, "transaction_date": date }),
        )
        .await;
    }

    let response = app
        .get("/expenses/report?start_date=2025-04-01&end_date=2025-04-30")
        .send()
        .await
        .expect("Failed to execute request");
    let report = data(response).await;
    assert_eq!(report["granularity"], "day");
    assert_eq!(report["rows"][0]["period"], "2025-04-01");
    assert_eq!(report["rows"][1]["period"], "2025-04-02");
    assert_eq!(report["rows"][1]["total_amount"], 40.0);
    assert_eq!(report["total"]["total_amount"], 60.0);

    app.cleanup().await;
}
