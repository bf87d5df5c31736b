//! REST integration test macro for invoice stores.
//!
//! The `rest_integration_tests!` macro generates HTTP-level tests that drive an
//! `InvoiceStore` through full round-trips:
//! JSON → HTTP request → validation → handler → service → store → JSON.
//!
//! # Generated Tests
//!
//! ## CRUD
//! - `test_rest_create`: POST 201, owner stamped from the query
//! - `test_rest_get_is_owner_scoped`: owner 200, other user 404
//! - `test_rest_list_pagination`: 25 invoices, limit 10, page 3
//! - `test_rest_list_empty`
//! - `test_rest_list_projection`
//! - `test_rest_list_sort`
//! - `test_rest_update_is_shallow`
//! - `test_rest_delete_twice`: 204 then 404
//!
//! ## Validation
//! - `test_rest_invalid_email`, `test_rest_missing_user_id`,
//!   `test_rest_bad_invoice_id`, `test_rest_body_user_id_rejected`,
//!   `test_rest_malformed_json`, `test_rest_bad_paging`
//!
//! ## Misc
//! - `test_rest_health`

/// Generate a REST integration test suite for an invoice store.
///
/// `$store_factory` must produce an `impl InvoiceStore + 'static`.
#[macro_export]
macro_rules! rest_integration_tests {
    ($store_factory:expr) => {
        mod rest_integration_tests {
            use super::*;
            use axum::http::StatusCode;
            use axum_test::TestServer;
            use invoices::core::id::RecordId;
            use serde_json::{Value, json};

            async fn make_server() -> TestServer {
                let store = $store_factory;
                let router = storage_harness::integration::build_test_router(store);
                TestServer::new(router).unwrap()
            }

            fn collection(owner: &RecordId) -> String {
                format!("/invoices?userId={}", owner)
            }

            fn item(owner: &RecordId, id: &str) -> String {
                format!("/invoices/{}?userId={}", id, owner)
            }

            async fn create(server: &TestServer, owner: &RecordId, body: Value) -> Value {
                let response = server.post(&collection(owner)).json(&body).await;
                assert_eq!(response.status_code(), StatusCode::CREATED);
                response.json::<Value>()
            }

            fn id_of(invoice: &Value) -> String {
                invoice["id"].as_str().unwrap().to_string()
            }

            // ==============================================================
            // CRUD
            // ==============================================================

            #[tokio::test]
            async fn test_rest_create() {
                let server = make_server().await;
                let owner = RecordId::new();

                let created = create(&server, &owner, create_body("INV001")).await;

                assert_eq!(created["userId"], json!(owner.to_string()));
                assert_eq!(created["invoiceNumber"], "INV001");
                assert_eq!(created["items"][0]["rate"].as_f64(), Some(3200.0));
                assert_eq!(created["items"][0]["quantity"].as_f64(), Some(1.0));
                assert!(RecordId::parse_str(created["id"].as_str().unwrap()).is_ok());
                assert!(created["createdAt"].is_string());
                assert!(created["updatedAt"].is_string());
            }

            #[tokio::test]
            async fn test_rest_create_normalizes_input() {
                let server = make_server().await;
                let owner = RecordId::new();

                let created = create(
                    &server,
                    &owner,
                    json!({
                        "date": "2024-01-15",
                        "due": "250.5",
                        "recipient": {"companyName": "Globex", "email": " AP@Globex.IO "},
                        "paymentRecords": [{"amount": 10, "note": ""}]
                    }),
                )
                .await;

                assert_eq!(created["recipient"]["email"], "ap@globex.io");
                assert_eq!(created["due"].as_f64(), Some(250.5));
                assert!(created["date"].as_str().unwrap().starts_with("2024-01-15T00:00:00"));
                assert_eq!(created["paymentRecords"][0]["notes"], "");
            }

            #[tokio::test]
            async fn test_rest_get_is_owner_scoped() {
                let server = make_server().await;
                let (u1, u2) = (RecordId::new(), RecordId::new());
                let created = create(&server, &u1, create_body("INV001")).await;
                let id = id_of(&created);

                let response = server.get(&item(&u1, &id)).await;
                assert_eq!(response.status_code(), StatusCode::OK);
                assert_eq!(response.json::<Value>(), created);

                let response = server.get(&item(&u2, &id)).await;
                assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
                let body = response.json::<Value>();
                assert_eq!(body["code"], "INVOICE_NOT_FOUND");
                assert_eq!(body["message"], "Invoice not found");
            }

            #[tokio::test]
            async fn test_rest_get_unknown_id() {
                let server = make_server().await;
                let response = server
                    .get(&item(&RecordId::new(), &RecordId::new().to_string()))
                    .await;
                assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
            }

            #[tokio::test]
            async fn test_rest_list_pagination() {
                let server = make_server().await;
                let owner = RecordId::new();
                for n in 0..25 {
                    create(&server, &owner, create_body(&format!("INV{:03}", n))).await;
                }

                let response = server
                    .get(&format!("{}&limit=10&page=3", collection(&owner)))
                    .await;
                assert_eq!(response.status_code(), StatusCode::OK);

                let page = response.json::<Value>();
                assert_eq!(page["results"].as_array().unwrap().len(), 5);
                assert_eq!(page["page"], 3);
                assert_eq!(page["limit"], 10);
                assert_eq!(page["totalPages"], 3);
                assert_eq!(page["totalResults"], 25);
            }

            #[tokio::test]
            async fn test_rest_list_empty() {
                let server = make_server().await;
                let response = server.get(&collection(&RecordId::new())).await;
                assert_eq!(response.status_code(), StatusCode::OK);

                let page = response.json::<Value>();
                assert_eq!(page["results"], json!([]));
                assert_eq!(page["totalResults"], 0);
                assert_eq!(page["totalPages"], 0);
                assert_eq!(page["page"], 1);
                assert_eq!(page["limit"], 10);
            }

            #[tokio::test]
            async fn test_rest_list_projection() {
                let server = make_server().await;
                let owner = RecordId::new();
                create(
                    &server,
                    &owner,
                    json!({
                        "invoiceNumber": "INV001",
                        "date": "2024-01-15T00:00:00Z",
                        "due": 100,
                        "issuer": {"companyName": "Acme"},
                        "recipient": {"companyName": "Globex", "email": "ap@globex.io"},
                        "items": [{"description": "Design", "rate": 3200, "quantity": 1}],
                        "paymentRecords": [{"amount": 50, "method": "card"}]
                    }),
                )
                .await;

                let page = server.get(&collection(&owner)).await.json::<Value>();
                let summary = &page["results"][0];

                assert_eq!(summary["invoiceNumber"], "INV001");
                assert!(summary["date"].is_string());
                assert_eq!(summary["recipient"], json!({"companyName": "Globex"}));
                assert_eq!(summary["items"][0]["rate"].as_f64(), Some(3200.0));
                assert!(summary["items"][0].get("description").is_none());
                assert_eq!(summary["paymentRecords"][0]["amount"].as_f64(), Some(50.0));
                assert!(summary["paymentRecords"][0].get("method").is_none());
                assert!(summary.get("issuer").is_none());
                assert!(summary.get("due").is_none());
                assert!(summary.get("userId").is_none());
            }

            #[tokio::test]
            async fn test_rest_list_sort() {
                let server = make_server().await;
                let owner = RecordId::new();
                for (number, due) in [("A", 10), ("B", 30), ("C", 20)] {
                    create(&server, &owner, json!({"invoiceNumber": number, "due": due})).await;
                }

                let page = server
                    .get(&format!("{}&sortBy=due:desc", collection(&owner)))
                    .await
                    .json::<Value>();
                let numbers: Vec<_> = page["results"]
                    .as_array()
                    .unwrap()
                    .iter()
                    .map(|r| r["invoiceNumber"].as_str().unwrap().to_string())
                    .collect();
                assert_eq!(numbers, vec!["B", "C", "A"]);
            }

            #[tokio::test]
            async fn test_rest_update_is_shallow() {
                let server = make_server().await;
                let owner = RecordId::new();
                let created = create(
                    &server,
                    &owner,
                    json!({
                        "invoiceNumber": "INV001",
                        "issuer": {
                            "companyName": "Acme",
                            "address": {"street": "1 Main St", "city": "Springfield"}
                        },
                        "items": [{"description": "Design", "rate": 3200, "quantity": 1}]
                    }),
                )
                .await;
                let id = id_of(&created);

                let response = server.patch(&item(&owner, &id)).json(&json!({"due": 500})).await;
                assert_eq!(response.status_code(), StatusCode::OK);
                let updated = response.json::<Value>();
                assert_eq!(updated["due"].as_f64(), Some(500.0));
                assert_eq!(updated["items"], created["items"]);
                assert_eq!(updated["issuer"], created["issuer"]);
                assert_eq!(updated["userId"], created["userId"]);

                let updated = server
                    .patch(&item(&owner, &id))
                    .json(&json!({"issuer": {"companyName": "X"}}))
                    .await
                    .json::<Value>();
                assert_eq!(updated["issuer"], json!({"companyName": "X"}));

                let fetched = server.get(&item(&owner, &id)).await.json::<Value>();
                assert_eq!(fetched, updated);
            }

            #[tokio::test]
            async fn test_rest_update_other_owner() {
                let server = make_server().await;
                let owner = RecordId::new();
                let created = create(&server, &owner, create_body("INV001")).await;

                let response = server
                    .patch(&item(&RecordId::new(), &id_of(&created)))
                    .json(&json!({"due": 1}))
                    .await;
                assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
            }

            #[tokio::test]
            async fn test_rest_delete_twice() {
                let server = make_server().await;
                let owner = RecordId::new();
                let created = create(&server, &owner, create_body("INV001")).await;
                let id = id_of(&created);

                let response = server.delete(&item(&owner, &id)).await;
                assert_eq!(response.status_code(), StatusCode::NO_CONTENT);
                assert!(response.as_bytes().is_empty());

                let response = server.delete(&item(&owner, &id)).await;
                assert_eq!(response.status_code(), StatusCode::NOT_FOUND);

                let response = server.get(&item(&owner, &id)).await;
                assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
            }

            // ==============================================================
            // Validation
            // ==============================================================

            #[tokio::test]
            async fn test_rest_invalid_email() {
                let server = make_server().await;
                let owner = RecordId::new();

                let response = server
                    .post(&collection(&owner))
                    .json(&json!({"recipient": {"email": "not-an-email"}}))
                    .await;
                assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

                let body = response.json::<Value>();
                assert_eq!(body["code"], "VALIDATION_ERROR");
                assert!(body["message"].as_str().unwrap().contains("recipient.email"));
                assert_eq!(body["details"]["fields"][0]["field"], "recipient.email");

                // Nothing was stored
                let page = server.get(&collection(&owner)).await.json::<Value>();
                assert_eq!(page["totalResults"], 0);
            }

            #[tokio::test]
            async fn test_rest_missing_user_id() {
                let server = make_server().await;
                let response = server.post("/invoices").json(&create_body("INV001")).await;
                assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
                assert_eq!(response.json::<Value>()["message"], "\"userId\" is required");
            }

            #[tokio::test]
            async fn test_rest_bad_invoice_id() {
                let server = make_server().await;
                let response = server.get(&item(&RecordId::new(), "abc")).await;
                assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

                let response = server.get("/invoices/5ebac534954b54139806c112?userId=zzz").await;
                assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
            }

            #[tokio::test]
            async fn test_rest_body_user_id_rejected() {
                let server = make_server().await;
                let owner = RecordId::new();
                let response = server
                    .post(&collection(&owner))
                    .json(&json!({"userId": RecordId::new().to_string()}))
                    .await;
                assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
                assert_eq!(response.json::<Value>()["message"], "\"userId\" is not allowed");
            }

            #[tokio::test]
            async fn test_rest_malformed_json() {
                let server = make_server().await;
                let response = server
                    .post(&collection(&RecordId::new()))
                    .content_type("application/json")
                    .text("{\"invoiceNumber\": ")
                    .await;
                assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
                assert_eq!(response.json::<Value>()["code"], "VALIDATION_ERROR");
            }

            #[tokio::test]
            async fn test_rest_huge_page_is_empty() {
                let server = make_server().await;
                let owner = RecordId::new();
                create(&server, &owner, create_body("INV001")).await;

                let response = server
                    .get(&format!(
                        "{}&page=9223372036854775807&limit=2",
                        collection(&owner)
                    ))
                    .await;
                assert_eq!(response.status_code(), StatusCode::OK);
                let page = response.json::<Value>();
                assert_eq!(page["results"], json!([]));
                assert_eq!(page["totalResults"], 1);
                assert_eq!(page["page"], json!(9223372036854775807u64));
            }

            #[tokio::test]
            async fn test_rest_bad_paging() {
                let server = make_server().await;
                let owner = RecordId::new();

                for query in ["limit=0", "page=0", "limit=abc", "sortBy=password:asc", "status=paid"] {
                    let response = server.get(&format!("{}&{}", collection(&owner), query)).await;
                    assert_eq!(
                        response.status_code(),
                        StatusCode::BAD_REQUEST,
                        "query {} should be rejected",
                        query
                    );
                }
            }

            // ==============================================================
            // Misc
            // ==============================================================

            #[tokio::test]
            async fn test_rest_health() {
                let server = make_server().await;
                for path in ["/health", "/healthz"] {
                    let response = server.get(path).await;
                    assert_eq!(response.status_code(), StatusCode::OK);
                    assert_eq!(response.json::<Value>(), json!({"status": "ok"}));
                }
            }
        }
    };
}
