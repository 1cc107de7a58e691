//! Integration tests for the service layer over real repository implementations.
//!
//! Tests: Service → Repository → Mapper → Domain
//!
//! Verifies:
//! - invoices are assembled with and without their items
//! - cursor pagination walks every collection without gaps or overlaps
//! - association add/remove and delete report affected-row outcomes
//! - relational rules (owner must exist, unique pairs, cascades) hold
//!
//! The in-memory backend runs everywhere. The Postgres variants need a live
//! database and are ignored unless run with `--ignored` and `DATABASE_URL`.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use proptest::prelude::*;

    use stockroom_core::{Cursor, InvoiceId, ItemId, StoreError, UserId};
    use stockroom_invoicing::{AddItemsRequest, CreateInvoice, InvoiceService, UpdateInvoice};
    use stockroom_items::{CreateItem, ItemService, UpdateItem};
    use stockroom_persons::{CreatePerson, PersonService, UpdatePerson};

    use crate::stores::Stores;

    struct Services {
        persons: PersonService,
        items: ItemService,
        invoices: InvoiceService,
    }

    fn services_for(stores: Stores) -> Services {
        Services {
            persons: PersonService::new(Arc::clone(&stores.persons)),
            items: ItemService::new(Arc::clone(&stores.items)),
            invoices: InvoiceService::new(Arc::clone(&stores.invoices)),
        }
    }

    fn setup() -> Services {
        services_for(Stores::in_memory())
    }

    async fn test_user(svc: &Services) -> UserId {
        let person = svc
            .persons
            .create(CreatePerson {
                name: "Ada Lovelace".to_string(),
                email: "ada@example.com".to_string(),
                created_by: "test".to_string(),
            })
            .await
            .unwrap();
        UserId::from(person.id)
    }

    async fn test_item(svc: &Services, name: &str) -> ItemId {
        svc.items
            .create(CreateItem {
                name: name.to_string(),
                description: format!("{name} description"),
                unit_price: 4.25,
                created_by: "test".to_string(),
            })
            .await
            .unwrap()
            .id
    }

    async fn test_invoice(svc: &Services, user_id: UserId, total: f64) -> InvoiceId {
        svc.invoices
            .create_invoice(CreateInvoice {
                user_id,
                total,
                paid: false,
                created_by: "test".to_string(),
            })
            .await
            .unwrap()
            .id
    }

    // ----- Invoice scenarios -----

    #[tokio::test]
    async fn created_invoice_reads_back_without_items() {
        let svc = setup();
        let user = test_user(&svc).await;
        let id = test_invoice(&svc, user, 10.0).await;

        let invoice = svc.invoices.get_invoice(id, false).await.unwrap();
        assert!(invoice.items.is_empty());
        assert_eq!(invoice.total, 10.0);
        assert_eq!(invoice.user_id, user);
        assert_eq!(invoice.audit_info.created_by, "test");
        assert_eq!(invoice.audit_info.last_changed_by, "test");
    }

    #[tokio::test]
    async fn added_items_come_back_in_association_order() {
        let svc = setup();
        let user = test_user(&svc).await;
        let invoice_id = test_invoice(&svc, user, 8.5).await;
        let item1 = test_item(&svc, "bolt").await;
        let item2 = test_item(&svc, "nut").await;

        let result = svc
            .invoices
            .add_items_to_invoice(AddItemsRequest {
                invoice_id,
                items: vec![item2, item1],
            })
            .await
            .unwrap();
        assert!(result.success);
        assert_eq!(result.items, vec![item2, item1]);

        let invoice = svc.invoices.get_invoice(invoice_id, true).await.unwrap();
        let ids: Vec<ItemId> = invoice.items.iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![item2, item1]);
        assert_eq!(invoice.items[1].name, "bolt");
        assert_eq!(invoice.items[1].audit_info.created_by, "test");
    }

    #[tokio::test]
    async fn with_items_on_invoice_without_items_is_empty_list() {
        let svc = setup();
        let user = test_user(&svc).await;
        let id = test_invoice(&svc, user, 1.0).await;

        let invoice = svc.invoices.get_invoice(id, true).await.unwrap();
        assert_eq!(invoice.id, id);
        assert!(invoice.items.is_empty());
    }

    #[tokio::test]
    async fn first_page_returns_two_lowest_sequence_ids() {
        let svc = setup();
        let user = test_user(&svc).await;
        let mut created = Vec::new();
        for n in 0..5 {
            created.push(test_invoice(&svc, user, n as f64).await);
        }

        let cursor = Cursor::from_query(Some("0"), Some("2"));
        let page = svc.invoices.get_all_invoices(cursor).await.unwrap();

        let ids: Vec<InvoiceId> = page.iter().map(|i| i.id).collect();
        assert_eq!(ids, created[..2].to_vec());
        assert!(page[0].seq < page[1].seq);
    }

    #[tokio::test]
    async fn removing_a_pair_never_added_is_soft_failure() {
        let svc = setup();
        let user = test_user(&svc).await;
        let invoice_id = test_invoice(&svc, user, 3.0).await;
        let item_id = test_item(&svc, "washer").await;

        let result = svc
            .invoices
            .remove_item_from_invoice(invoice_id, item_id)
            .await
            .unwrap();
        assert!(!result.success);
        assert_eq!(result.items, vec![item_id]);
        assert_eq!(result.invoice_id, invoice_id);
    }

    #[tokio::test]
    async fn remove_item_twice_is_idempotent() {
        let svc = setup();
        let user = test_user(&svc).await;
        let invoice_id = test_invoice(&svc, user, 3.0).await;
        let item_id = test_item(&svc, "washer").await;
        svc.invoices
            .add_items_to_invoice(AddItemsRequest {
                invoice_id,
                items: vec![item_id],
            })
            .await
            .unwrap();

        let first = svc
            .invoices
            .remove_item_from_invoice(invoice_id, item_id)
            .await
            .unwrap();
        let second = svc
            .invoices
            .remove_item_from_invoice(invoice_id, item_id)
            .await
            .unwrap();

        assert!(first.success);
        assert!(!second.success);
        let invoice = svc.invoices.get_invoice(invoice_id, true).await.unwrap();
        assert!(invoice.items.is_empty());
    }

    #[tokio::test]
    async fn deleting_unknown_invoice_reports_not_deleted() {
        let svc = setup();
        let id = InvoiceId::new();

        let result = svc.invoices.delete_invoice(id).await.unwrap();
        assert_eq!(result.id, id);
        assert!(!result.deleted);
    }

    #[tokio::test]
    async fn delete_invoice_then_fetch_is_not_found() {
        let svc = setup();
        let user = test_user(&svc).await;
        let id = test_invoice(&svc, user, 2.0).await;

        assert!(svc.invoices.delete_invoice(id).await.unwrap().deleted);
        assert_eq!(
            svc.invoices.get_invoice(id, false).await.unwrap_err(),
            StoreError::NotFound
        );
        assert_eq!(
            svc.invoices.get_invoice(id, true).await.unwrap_err(),
            StoreError::NotFound
        );
    }

    #[tokio::test]
    async fn update_invoice_overwrites_total_paid_and_editor() {
        let svc = setup();
        let user = test_user(&svc).await;
        let id = test_invoice(&svc, user, 2.0).await;
        let before = svc.invoices.get_invoice(id, false).await.unwrap();

        let updated = svc
            .invoices
            .update_invoice(UpdateInvoice {
                id,
                total: 99.5,
                paid: true,
                last_changed_by: "auditor".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(updated.seq, before.seq);
        assert_eq!(updated.total, 99.5);
        assert!(updated.paid);
        assert_eq!(updated.audit_info.last_changed_by, "auditor");
        assert_eq!(updated.audit_info.created_by, "test");
        assert!(updated.items.is_empty());
    }

    #[tokio::test]
    async fn update_unknown_invoice_is_not_found() {
        let svc = setup();
        let err = svc
            .invoices
            .update_invoice(UpdateInvoice {
                id: InvoiceId::new(),
                total: 1.0,
                paid: false,
                last_changed_by: "x".to_string(),
            })
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn invoices_for_user_only_lists_that_user() {
        let svc = setup();
        let alice = test_user(&svc).await;
        let bob = test_user(&svc).await;
        let a1 = test_invoice(&svc, alice, 1.0).await;
        test_invoice(&svc, bob, 2.0).await;
        let a2 = test_invoice(&svc, alice, 3.0).await;

        let listed = svc.invoices.get_invoices_for_user(alice).await.unwrap();
        let ids: Vec<InvoiceId> = listed.iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![a1, a2]);

        let nobody = svc.invoices.get_invoices_for_user(UserId::new()).await.unwrap();
        assert!(nobody.is_empty());
    }

    #[tokio::test]
    async fn invoice_for_unknown_user_violates_constraint() {
        let svc = setup();
        let err = svc
            .invoices
            .create_invoice(CreateInvoice {
                user_id: UserId::new(),
                total: 1.0,
                paid: false,
                created_by: "test".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Constraint(_)));
    }

    #[tokio::test]
    async fn duplicate_association_is_conflict_and_batch_is_all_or_nothing() {
        let svc = setup();
        let user = test_user(&svc).await;
        let invoice_id = test_invoice(&svc, user, 3.0).await;
        let first = test_item(&svc, "gear").await;
        let second = test_item(&svc, "spring").await;

        svc.invoices
            .add_items_to_invoice(AddItemsRequest {
                invoice_id,
                items: vec![first],
            })
            .await
            .unwrap();

        let err = svc
            .invoices
            .add_items_to_invoice(AddItemsRequest {
                invoice_id,
                items: vec![second, first],
            })
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));

        let invoice = svc.invoices.get_invoice(invoice_id, true).await.unwrap();
        let ids: Vec<ItemId> = invoice.items.iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![first]);
    }

    #[tokio::test]
    async fn associating_unknown_item_violates_constraint() {
        let svc = setup();
        let user = test_user(&svc).await;
        let invoice_id = test_invoice(&svc, user, 3.0).await;

        let err = svc
            .invoices
            .add_items_to_invoice(AddItemsRequest {
                invoice_id,
                items: vec![ItemId::new()],
            })
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Constraint(_)));
    }

    #[tokio::test]
    async fn empty_item_list_associates_nothing() {
        let svc = setup();
        let user = test_user(&svc).await;
        let invoice_id = test_invoice(&svc, user, 3.0).await;

        let result = svc
            .invoices
            .add_items_to_invoice(AddItemsRequest {
                invoice_id,
                items: Vec::new(),
            })
            .await
            .unwrap();
        assert!(!result.success);
    }

    #[tokio::test]
    async fn deleting_an_item_drops_it_from_invoices() {
        let svc = setup();
        let user = test_user(&svc).await;
        let invoice_id = test_invoice(&svc, user, 3.0).await;
        let keep = test_item(&svc, "keep").await;
        let drop = test_item(&svc, "drop").await;
        svc.invoices
            .add_items_to_invoice(AddItemsRequest {
                invoice_id,
                items: vec![keep, drop],
            })
            .await
            .unwrap();

        assert!(svc.items.delete(drop).await.unwrap().deleted);

        let invoice = svc.invoices.get_invoice(invoice_id, true).await.unwrap();
        let ids: Vec<ItemId> = invoice.items.iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![keep]);
    }

    // ----- Persons and items -----

    #[tokio::test]
    async fn person_lifecycle() {
        let svc = setup();
        let created = svc
            .persons
            .create(CreatePerson {
                name: "Grace".to_string(),
                email: "grace@example.com".to_string(),
                created_by: "admin".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(created.seq, 1);

        let updated = svc
            .persons
            .update(UpdatePerson {
                id: created.id,
                name: "Grace Hopper".to_string(),
                email: "hopper@example.com".to_string(),
                last_changed_by: "editor".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(updated.name, "Grace Hopper");
        assert_eq!(updated.audit_info.created_by, "admin");
        assert_eq!(updated.audit_info.last_changed_by, "editor");

        assert_eq!(svc.persons.get(created.id).await.unwrap(), updated);
        assert!(svc.persons.delete(created.id).await.unwrap().deleted);
        assert!(!svc.persons.delete(created.id).await.unwrap().deleted);
        assert_eq!(svc.persons.get(created.id).await.unwrap_err(), StoreError::NotFound);
    }

    #[tokio::test]
    async fn person_owning_invoices_cannot_be_deleted() {
        let svc = setup();
        let user = test_user(&svc).await;
        test_invoice(&svc, user, 1.0).await;

        let person_id = svc.persons.get_all(None).await.unwrap()[0].id;
        let err = svc.persons.delete(person_id).await.unwrap_err();
        assert!(matches!(err, StoreError::Constraint(_)));
    }

    #[tokio::test]
    async fn item_update_and_pagination() {
        let svc = setup();
        let mut ids = Vec::new();
        for name in ["a", "b", "c"] {
            ids.push(test_item(&svc, name).await);
        }

        let updated = svc
            .items
            .update(UpdateItem {
                id: ids[1],
                name: "b2".to_string(),
                description: "changed".to_string(),
                unit_price: 7.0,
                last_changed_by: "editor".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(updated.unit_price, 7.0);

        let first = svc.items.get_all(Some(Cursor::new(0, 2))).await.unwrap();
        assert_eq!(first.len(), 2);
        let rest = svc
            .items
            .get_all(Some(Cursor::new(first[1].seq, 2)))
            .await
            .unwrap();
        assert_eq!(rest.len(), 1);
        assert_eq!(rest[0].id, ids[2]);

        let empty = svc.items.get_all(Some(Cursor::new(0, 0))).await.unwrap();
        assert!(empty.is_empty());
    }

    // ----- Properties -----

    fn walk_all_pages(svc: &Services, page_size: i64) -> Vec<InvoiceId> {
        let rt = tokio::runtime::Runtime::new().unwrap();
        rt.block_on(async {
            let mut walked = Vec::new();
            let mut last_id = 0;
            loop {
                let page = svc
                    .invoices
                    .get_all_invoices(Some(Cursor::new(last_id, page_size)))
                    .await
                    .unwrap();
                match page.last() {
                    None => break,
                    Some(last) => last_id = last.seq,
                }
                walked.extend(page.into_iter().map(|i| i.id));
            }
            walked
        })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(24))]

        /// Paging to completion yields exactly the unpaginated listing.
        #[test]
        fn paging_covers_unpaginated_listing(
            count in 0usize..25,
            deleted in prop::collection::vec(any::<bool>(), 25),
            page_size in 1i64..7,
        ) {
            let svc = setup();
            let rt = tokio::runtime::Runtime::new().unwrap();
            let all = rt.block_on(async {
                let user = test_user(&svc).await;
                for n in 0..count {
                    let id = test_invoice(&svc, user, n as f64).await;
                    if deleted[n] {
                        svc.invoices.delete_invoice(id).await.unwrap();
                    }
                }
                svc.invoices.get_all_invoices(None).await.unwrap()
            });
            drop(rt);

            let everything: Vec<InvoiceId> = all.iter().map(|i| i.id).collect();
            let wide: Vec<InvoiceId> = {
                let rt = tokio::runtime::Runtime::new().unwrap();
                rt.block_on(svc.invoices.get_all_invoices(Some(Cursor::new(0, i64::from(i32::MAX)))))
                    .unwrap()
                    .into_iter()
                    .map(|i| i.id)
                    .collect()
            };

            prop_assert_eq!(&wide, &everything);
            prop_assert_eq!(walk_all_pages(&svc, page_size), everything);
        }
    }

    // ----- Postgres -----

    mod postgres {
        use super::*;
        use crate::config::DbConfig;
        use crate::db::connect;

        async fn postgres_services() -> Option<Services> {
            let url = std::env::var("DATABASE_URL").ok()?;
            let database = connect(&DbConfig::new(url)).await.unwrap();
            database.migrate().await.unwrap();
            Some(services_for(Stores::postgres(&database)))
        }

        #[tokio::test]
        #[ignore = "requires DATABASE_URL"]
        async fn postgres_round_trip_with_items() {
            let Some(svc) = postgres_services().await else {
                return;
            };
            let user = test_user(&svc).await;
            let invoice_id = test_invoice(&svc, user, 10.0).await;
            let item1 = test_item(&svc, "pg-bolt").await;
            let item2 = test_item(&svc, "pg-nut").await;

            let bare = svc.invoices.get_invoice(invoice_id, true).await.unwrap();
            assert!(bare.items.is_empty());

            svc.invoices
                .add_items_to_invoice(AddItemsRequest {
                    invoice_id,
                    items: vec![item1, item2],
                })
                .await
                .unwrap();
            let full = svc.invoices.get_invoice(invoice_id, true).await.unwrap();
            let ids: Vec<ItemId> = full.items.iter().map(|i| i.id).collect();
            assert_eq!(ids, vec![item1, item2]);

            let dup = svc
                .invoices
                .add_items_to_invoice(AddItemsRequest {
                    invoice_id,
                    items: vec![item1],
                })
                .await
                .unwrap_err();
            assert!(matches!(dup, StoreError::Conflict(_)));

            assert!(svc.invoices.remove_item_from_invoice(invoice_id, item1).await.unwrap().success);
            assert!(!svc.invoices.remove_item_from_invoice(invoice_id, item1).await.unwrap().success);
            assert!(svc.invoices.delete_invoice(invoice_id).await.unwrap().deleted);
            assert!(!svc.invoices.delete_invoice(invoice_id).await.unwrap().deleted);
        }

        #[tokio::test]
        #[ignore = "requires DATABASE_URL"]
        async fn postgres_missing_invoice_is_not_found() {
            let Some(svc) = postgres_services().await else {
                return;
            };
            let id = InvoiceId::new();
            assert_eq!(svc.invoices.get_invoice(id, false).await.unwrap_err(), StoreError::NotFound);
            assert_eq!(svc.invoices.get_invoice(id, true).await.unwrap_err(), StoreError::NotFound);
        }
    }
}
