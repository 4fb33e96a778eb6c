mod common;

use common::{data, TestApp};
use serde_json::json;

#[tokio::test]
#[ignore = "requires MongoDB at MONGODB_URI; run with `cargo test -- --ignored`"]
async fn receivable_collection_flow() {
    let app = TestApp::spawn().await;

    let created = app
        .create(
            "/receivables",
            &json!({
                "invoice_no": "INV-2025-001",
                "customer_name": "Bangkok Trading",
                "amount": 1000,
                "issue_date": "2025-02-01",
                "due_date": "2025-02-28"
            }),
        )
        .await;
    assert_eq!(created["status"], "pending");
    assert_eq!(created["balance"], 1000.0);
    let id = created["receivable_id"].as_str().unwrap();

    let payment = app
        .create(
            &format!("/receivables/{}/payments", id),
            &json!({ "amount": 400, "payment_date": "2025-02-10", "reference": "TRF-88" }),
        )
        .await;
    assert_eq!(payment["balance"], 600.0);
    assert_eq!(payment["status"], "partial");
    assert_eq!(payment["transaction"]["type"], "receivable");
    assert_eq!(payment["transaction"]["payment_date"], "2025-02-10");

    // Logged payments show up in the cross-ledger transaction list
    let response = app
        .get("/payment-transactions?type=receivable")
        .send()
        .await
        .expect("Failed to execute request");
    let page = data(response).await;
    assert_eq!(page["total_count"], 1);
    assert_eq!(page["list"][0]["reference"], "TRF-88");

    let response = app
        .get("/payment-transactions?type=payable")
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(data(response).await["total_count"], 0);

    app.cleanup().await;
}

#[tokio::test]
#[ignore = "requires MongoDB at MONGODB_URI; run with `cargo test -- --ignored`"]
async fn due_date_before_issue_date_is_rejected() {
    let app = TestApp::spawn().await;

    let response = app
        .post(
            "/receivables",
            &json!({
                "invoice_no": "INV-X",
                "customer_name": "Bangkok Trading",
                "amount": 10,
                "issue_date": "2025-03-10",
                "due_date": "2025-03-01"
            }),
        )
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status().as_u16(), 422);

    app.cleanup().await;
}
