mod common;

use common::{body, data, TestApp};
use serde_json::json;

fn receipt(date: &str) -> serde_json::Value {
    json!({
        "customer_name": "Acme Co., Ltd.",
        "receipt_date": date,
        "items": [
            { "description": "Consulting", "quantity": 2, "unit_price": 50 },
            { "description": "Setup fee", "quantity": 1, "unit_price": 100 }
        ],
        "discount": 20
    })
}

#[tokio::test]
#[ignore = "requires MongoDB at MONGODB_URI; run with `cargo test -- --ignored`"]
async fn create_receipt_numbers_sequentially_and_computes_totals() {
    let app = TestApp::spawn().await;

    let first = app.create("/receipts", &receipt("2025-03-10")).await;
    let second = app.create("/receipts", &receipt("2025-03-11")).await;

    assert_eq!(first["receipt_no"], "RC-2025-001");
    assert_eq!(second["receipt_no"], "RC-2025-002");

    assert_eq!(first["sub_total"], 200.0);
    assert_eq!(first["discount"], 20.0);
    assert_eq!(first["total_vat"], 12.6);
    assert_eq!(first["total_amount"], 192.6);
    assert_eq!(first["items"][0]["total"], 100.0);
    assert_eq!(first["created_by"], common::TEST_USER_ID);

    app.cleanup().await;
}

#[tokio::test]
#[ignore = "requires MongoDB at MONGODB_URI; run with `cargo test -- --ignored`"]
async fn next_number_peeks_without_reserving() {
    let app = TestApp::spawn().await;

    app.create("/receipts", &receipt("2025-01-05")).await;

    let response = app
        .get("/receipts/next-number?date=2025-12-31")
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status().as_u16(), 200);
    assert_eq!(data(response).await["receipt_no"], "RC-2025-002");

    // A new year starts its own sequence
    let response = app
        .get("/receipts/next-number?date=2026-01-01")
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(data(response).await["receipt_no"], "RC-2026-001");

    app.cleanup().await;
}

#[tokio::test]
#[ignore = "requires MongoDB at MONGODB_URI; run with `cargo test -- --ignored`"]
async fn manual_number_must_be_unique() {
    let app = TestApp::spawn().await;

    let mut request = receipt("2025-04-01");
    request["receipt_no"] = json!("MANUAL-1");
    let created = app.create("/receipts", &request).await;
    assert_eq!(created["receipt_no"], "MANUAL-1");

    let response = app
        .post("/receipts", &request)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status().as_u16(), 409);
    assert_eq!(body(response).await["data"]["code"], "CONFLICT");

    app.cleanup().await;
}

#[tokio::test]
#[ignore = "requires MongoDB at MONGODB_URI; run with `cargo test -- --ignored`"]
async fn deleted_receipt_disappears_and_frees_tail_number() {
    let app = TestApp::spawn().await;

    app.create("/receipts", &receipt("2025-05-01")).await;
    let second = app.create("/receipts", &receipt("2025-05-02")).await;
    let id = second["receipt_id"].as_str().unwrap();

    let response = app
        .delete(&format!("/receipts/{}", id))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status().as_u16(), 200);

    let response = app
        .get(&format!("/receipts/{}", id))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status().as_u16(), 404);

    let response = app.get("/receipts").send().await.expect("Failed to execute request");
    assert_eq!(data(response).await["total_count"], 1);

    let third = app.create("/receipts", &receipt("2025-05-03")).await;
    assert_eq!(third["receipt_no"], "RC-2025-002");

    app.cleanup().await;
}

#[tokio::test]
#[ignore = "requires MongoDB at MONGODB_URI; run with `cargo test -- --ignored`"]
async fn update_recomputes_totals_and_keeps_number() {
    let app = TestApp::spawn().await;

    let created = app.create("/receipts", &receipt("2025-06-01")).await;
    let id = created["receipt_id"].as_str().unwrap();

    let response = app
        .put(
            &format!("/receipts/{}", id),
            &json!({ "items": [{ "description": "Audit", "quantity": 1, "unit_price": 1000 }], "discount": 0 }),
        )
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status().as_u16(), 200);

    let updated = data(response).await;
    assert_eq!(updated["receipt_no"], created["receipt_no"]);
    assert_eq!(updated["sub_total"], 1000.0);
    assert_eq!(updated["total_vat"], 70.0);
    assert_eq!(updated["total_amount"], 1070.0);

    app.cleanup().await;
}

#[tokio::test]
#[ignore = "requires MongoDB at MONGODB_URI; run with `cargo test -- --ignored`"]
async fn summary_and_report_bucket_receipts() {
    let app = TestApp::spawn().await;

    app.create("/receipts", &receipt("2025-01-15")).await;
    app.create("/receipts", &receipt("2025-01-20")).await;
    app.create("/receipts", &receipt("2025-02-01")).await;

    let response = app
        .get("/receipts/summary")
        .send()
        .await
        .expect("Failed to execute request");
    let summary = data(response).await;
    assert_eq!(summary["all_time"]["count"], 3);
    assert_eq!(summary["all_time"]["total_amount"], 577.8);

    let response = app
        .get("/receipts/report?report=month")
        .send()
        .await
        .expect("Failed to execute request");
    let report = data(response).await;
    assert_eq!(report["granularity"], "month");
    assert_eq!(report["rows"][0]["period"], "2025-01");
    assert_eq!(report["rows"][0]["count"], 2);
    assert_eq!(report["rows"][1]["period"], "2025-02");
    assert_eq!(report["total"]["count"], 3);

    app.cleanup().await;
}

#[tokio::test]
#[ignore = "requires MongoDB at MONGODB_URI; run with `cargo test -- --ignored`"]
async fn concurrent_creates_get_distinct_numbers() {
    let app = TestApp::spawn().await;
    let body = receipt("2025-06-01");

    let (a, b, c) = tokio::join!(
        app.post("/receipts", &body).send(),
        app.post("/receipts", &body).send(),
        app.post("/receipts", &body).send(),
    );

    let mut numbers = Vec::new();
    for response in [a, b, c] {
        let response = response.expect("Failed to execute request");
        assert_eq!(response.status().as_u16(), 201);
        numbers.push(data(response).await["receipt_no"].as_str().unwrap().to_string());
    }
    numbers.sort();
    assert_eq!(numbers, vec!["RC-2025-001", "RC-2025-002", "RC-2025-003"]);

    app.cleanup().await;
}
