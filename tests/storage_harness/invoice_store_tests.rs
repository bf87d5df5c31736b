//! Macro-generated test suite for `InvoiceStore` contract validation.
//!
//! # Usage
//!
//! ```rust,ignore
//! #[macro_use]
//! mod storage_harness;
//!
//! use storage_harness::*;
//! use invoices::storage::InMemoryInvoiceStore;
//!
//! invoice_store_tests!(InMemoryInvoiceStore::new());
//! ```
//!
//! # Generated Tests
//!
//! ## Insert & owner-scoped lookup
//! - `test_insert_assigns_id_and_timestamps`
//! - `test_find_owned_roundtrip`: every field survives storage
//! - `test_find_owned_other_owner`: mismatched owner looks missing
//! - `test_find_owned_missing`
//!
//! ## Pagination
//! - `test_paginate_empty`
//! - `test_paginate_scoped_to_owner`
//! - `test_paginate_pages`: 25 invoices, limit 10, page 3
//! - `test_paginate_huge_page_is_empty`: skip far beyond the match count
//! - `test_paginate_default_order`
//! - `test_paginate_sort_desc_then_asc`
//! - `test_paginate_unfiltered`
//!
//! ## Replace & delete
//! - `test_replace_owned_refreshes_updated_at`
//! - `test_replace_owned_other_owner`
//! - `test_delete_owned`
//! - `test_delete_owned_other_owner`
//!
//! ## Concurrency
//! - `test_concurrent_inserts`

/// Generate a full `InvoiceStore` conformance test suite.
///
/// `$factory` must evaluate to a fresh, empty store implementing
/// `InvoiceStore + Clone + 'static`. It is re-evaluated for each test.
#[macro_export]
macro_rules! invoice_store_tests {
    ($factory:expr) => {
        mod invoice_store_contract_tests {
            use super::*;
            use invoices::core::id::RecordId;
            use invoices::core::query::{InvoiceFilter, ListOptions, SortKey, SortSpec};
            use invoices::core::store::InvoiceStore;
            use invoices::entities::invoice::{InvoiceFields, NewInvoice};

            // ==================================================================
            // Insert & find
            // ==================================================================

            #[tokio::test]
            async fn test_insert_assigns_id_and_timestamps() {
                let store = $factory;
                let owner = RecordId::new();

                let a = store.insert(new_invoice(owner, "INV001")).await.unwrap();
                let b = store.insert(new_invoice(owner, "INV002")).await.unwrap();

                assert_ne!(a.id, b.id);
                assert_eq!(a.user_id, Some(owner));
                assert_eq!(a.created_at, a.updated_at);
            }

            #[tokio::test]
            async fn test_find_owned_roundtrip() {
                let store = $factory;
                let owner = RecordId::new();
                let created = store.insert(new_invoice(owner, "INV001")).await.unwrap();

                let found = store.find_owned(&owner, &created.id).await.unwrap();
                assert_eq!(found, Some(created));
            }

            #[tokio::test]
            async fn test_find_owned_other_owner() {
                let store = $factory;
                let owner = RecordId::new();
                let created = store.insert(new_invoice(owner, "INV001")).await.unwrap();

                let found = store.find_owned(&RecordId::new(), &created.id).await.unwrap();
                assert!(found.is_none());
            }

            #[tokio::test]
            async fn test_find_owned_missing() {
                let store = $factory;
                let found = store
                    .find_owned(&RecordId::new(), &RecordId::new())
                    .await
                    .unwrap();
                assert!(found.is_none());
            }

            #[tokio::test]
            async fn test_insert_bare_invoice() {
                let store = $factory;
                let created = store.insert(NewInvoice::default()).await.unwrap();
                assert!(created.user_id.is_none());
                assert!(created.items.is_empty());
                assert!(created.invoice_number.is_none());
            }

            // ==================================================================
            // Pagination
            // ==================================================================

            #[tokio::test]
            async fn test_paginate_empty() {
                let store = $factory;
                let page = store
                    .paginate(&InvoiceFilter::owned_by(RecordId::new()), &ListOptions::default())
                    .await
                    .unwrap();
                assert!(page.results.is_empty());
                assert_eq!(page.total_results, 0);
                assert_eq!(page.total_pages, 0);
                assert_eq!(page.page, 1);
                assert_eq!(page.limit, 10);
            }

            #[tokio::test]
            async fn test_paginate_scoped_to_owner() {
                let store = $factory;
                let (a, b) = (RecordId::new(), RecordId::new());
                store.insert(new_invoice(a, "A1")).await.unwrap();
                store.insert(new_invoice(a, "A2")).await.unwrap();
                store.insert(new_invoice(b, "B1")).await.unwrap();

                let page = store
                    .paginate(&InvoiceFilter::owned_by(a), &ListOptions::default())
                    .await
                    .unwrap();
                assert_eq!(page.total_results, 2);
                assert!(page.results.iter().all(|i| i.user_id == Some(a)));
            }

            #[tokio::test]
            async fn test_paginate_pages() {
                let store = $factory;
                let owner = RecordId::new();
                for n in 0..25 {
                    store
                        .insert(new_invoice(owner, &format!("INV{:03}", n)))
                        .await
                        .unwrap();
                }

                let options = ListOptions::new(
                    vec![SortSpec::asc(SortKey::InvoiceNumber)],
                    Some(10),
                    Some(3),
                );
                let page = store
                    .paginate(&InvoiceFilter::owned_by(owner), &options)
                    .await
                    .unwrap();

                assert_eq!(page.results.len(), 5);
                assert_eq!(page.total_results, 25);
                assert_eq!(page.total_pages, 3);
                assert_eq!(page.page, 3);
                assert_eq!(page.results[0].invoice_number.as_deref(), Some("INV020"));
                assert_eq!(page.results[4].invoice_number.as_deref(), Some("INV024"));
            }

            #[tokio::test]
            async fn test_paginate_past_last_page() {
                let store = $factory;
                let owner = RecordId::new();
                store.insert(new_invoice(owner, "INV001")).await.unwrap();

                let page = store
                    .paginate(
                        &InvoiceFilter::owned_by(owner),
                        &ListOptions::new(vec![], Some(10), Some(5)),
                    )
                    .await
                    .unwrap();
                assert!(page.results.is_empty());
                assert_eq!(page.total_results, 1);
                assert_eq!(page.total_pages, 1);
            }

            #[tokio::test]
            async fn test_paginate_huge_page_is_empty() {
                let store = $factory;
                let owner = RecordId::new();
                store.insert(new_invoice(owner, "INV001")).await.unwrap();

                let page = store
                    .paginate(
                        &InvoiceFilter::owned_by(owner),
                        &ListOptions::new(vec![], Some(2), Some(i64::MAX as u64)),
                    )
                    .await
                    .unwrap();
                assert!(page.results.is_empty());
                assert_eq!(page.total_results, 1);
                assert_eq!(page.page, i64::MAX as u64);
            }

            #[tokio::test]
            async fn test_paginate_default_order() {
                let store = $factory;
                let owner = RecordId::new();
                for number in ["C", "A", "B"] {
                    store.insert(new_invoice(owner, number)).await.unwrap();
                }

                let page = store
                    .paginate(&InvoiceFilter::owned_by(owner), &ListOptions::default())
                    .await
                    .unwrap();
                let numbers: Vec<_> = page
                    .results
                    .iter()
                    .map(|i| i.invoice_number.clone().unwrap())
                    .collect();
                assert_eq!(numbers, vec!["C", "A", "B"]);
            }

            #[tokio::test]
            async fn test_paginate_sort_desc_then_asc() {
                let store = $factory;
                let owner = RecordId::new();
                for (number, due) in [("A", 10.0), ("B", 30.0), ("C", 10.0)] {
                    let mut fields = sample_fields(number);
                    fields.due = Some(due);
                    store
                        .insert(NewInvoice::owned_by(owner, fields))
                        .await
                        .unwrap();
                }

                let options = ListOptions::new(
                    SortSpec::parse_list("due:desc,invoiceNumber:asc").unwrap(),
                    None,
                    None,
                );
                let page = store
                    .paginate(&InvoiceFilter::owned_by(owner), &options)
                    .await
                    .unwrap();
                let numbers: Vec<_> = page
                    .results
                    .iter()
                    .map(|i| i.invoice_number.clone().unwrap())
                    .collect();
                assert_eq!(numbers, vec!["B", "A", "C"]);
            }

            #[tokio::test]
            async fn test_paginate_sort_nested_field() {
                let store = $factory;
                let owner = RecordId::new();
                for (number, company) in [("1", "Zeta"), ("2", "Alpha"), ("3", "Mu")] {
                    let mut fields = sample_fields(number);
                    if let Some(recipient) = fields.recipient.as_mut() {
                        recipient.company_name = Some(company.to_string());
                    }
                    store
                        .insert(NewInvoice::owned_by(owner, fields))
                        .await
                        .unwrap();
                }

                let options = ListOptions::new(
                    vec![SortSpec::asc(SortKey::RecipientCompanyName)],
                    None,
                    None,
                );
                let page = store
                    .paginate(&InvoiceFilter::owned_by(owner), &options)
                    .await
                    .unwrap();
                let numbers: Vec<_> = page
                    .results
                    .iter()
                    .map(|i| i.invoice_number.clone().unwrap())
                    .collect();
                assert_eq!(numbers, vec!["2", "3", "1"]);
            }

            #[tokio::test]
            async fn test_paginate_unfiltered() {
                let store = $factory;
                store.insert(new_invoice(RecordId::new(), "A")).await.unwrap();
                store.insert(new_invoice(RecordId::new(), "B")).await.unwrap();

                let page = store
                    .paginate(&InvoiceFilter::default(), &ListOptions::default())
                    .await
                    .unwrap();
                assert_eq!(page.total_results, 2);
            }

            // ==================================================================
            // Replace & delete
            // ==================================================================

            #[tokio::test]
            async fn test_replace_owned_refreshes_updated_at() {
                let store = $factory;
                let owner = RecordId::new();
                let mut invoice = store.insert(new_invoice(owner, "INV001")).await.unwrap();
                let created_at = invoice.created_at;

                tokio::time::sleep(std::time::Duration::from_millis(5)).await;
                invoice.apply_patch(InvoiceFields {
                    due: Some(500.0),
                    ..Default::default()
                });
                let replaced = store.replace_owned(invoice.clone()).await.unwrap().unwrap();

                assert_eq!(replaced.due, Some(500.0));
                assert_eq!(replaced.created_at, created_at);
                assert!(replaced.updated_at > created_at);

                let stored = store.find_owned(&owner, &invoice.id).await.unwrap().unwrap();
                assert_eq!(stored, replaced);
            }

            #[tokio::test]
            async fn test_replace_owned_other_owner() {
                let store = $factory;
                let owner = RecordId::new();
                let mut invoice = store.insert(new_invoice(owner, "INV001")).await.unwrap();

                invoice.user_id = Some(RecordId::new());
                invoice.due = Some(1.0);
                assert!(store.replace_owned(invoice.clone()).await.unwrap().is_none());

                let stored = store.find_owned(&owner, &invoice.id).await.unwrap().unwrap();
                assert_eq!(stored.due, Some(3200.0));
            }

            #[tokio::test]
            async fn test_delete_owned() {
                let store = $factory;
                let owner = RecordId::new();
                let invoice = store.insert(new_invoice(owner, "INV001")).await.unwrap();

                let removed = store.delete_owned(&owner, &invoice.id).await.unwrap();
                assert_eq!(removed.map(|i| i.id), Some(invoice.id));
                assert!(store.find_owned(&owner, &invoice.id).await.unwrap().is_none());
                assert!(store.delete_owned(&owner, &invoice.id).await.unwrap().is_none());
            }

            #[tokio::test]
            async fn test_delete_owned_other_owner() {
                let store = $factory;
                let owner = RecordId::new();
                let invoice = store.insert(new_invoice(owner, "INV001")).await.unwrap();

                let removed = store.delete_owned(&RecordId::new(), &invoice.id).await.unwrap();
                assert!(removed.is_none());
                assert!(store.find_owned(&owner, &invoice.id).await.unwrap().is_some());
            }

            // ==================================================================
            // Concurrency
            // ==================================================================

            #[tokio::test]
            async fn test_concurrent_inserts() {
                let store = $factory;
                let owner = RecordId::new();

                let handles: Vec<_> = (0..10)
                    .map(|n| {
                        let store = store.clone();
                        tokio::spawn(async move {
                            store
                                .insert(new_invoice(owner, &format!("INV{:03}", n)))
                                .await
                                .unwrap()
                        })
                    })
                    .collect();
                for handle in handles {
                    handle.await.unwrap();
                }

                let page = store
                    .paginate(&InvoiceFilter::owned_by(owner), &ListOptions::default())
                    .await
                    .unwrap();
                assert_eq!(page.total_results, 10);
            }
        }
    };
}
