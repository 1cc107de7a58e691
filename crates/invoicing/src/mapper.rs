//! Row-to-domain mapping for invoices.
//!
//! Timestamps are formatted (RFC 3339, second precision, `Z`) here, not in the
//! storage layer. None of these functions fail: they only see row sets that
//! storage already returned successfully.

use stockroom_core::AuditInfo;
use stockroom_items::Item;

use crate::invoice::Invoice;
use crate::record::{InvoiceItemJoinRecord, InvoiceRecord};

/// 1:1 mapping with an empty `items` list.
pub fn map_single(record: InvoiceRecord) -> Invoice {
    invoice_from(record, Vec::new())
}

/// Maps each record in order. Empty input gives an empty list.
pub fn map_collection<I>(records: I) -> Vec<Invoice>
where
    I: IntoIterator<Item = InvoiceRecord>,
{
    records.into_iter().map(map_single).collect()
}

/// Assembles one invoice from its join rows.
///
/// Invoice columns come from the first row. Every row that carries an item
/// contributes one `Item`, in row order; rows without one are skipped.
/// Returns `None` for an empty row set.
pub fn map_with_items(rows: Vec<InvoiceItemJoinRecord>) -> Option<Invoice> {
    let mut rows = rows.into_iter();
    let first = rows.next()?;

    let mut items = Vec::new();
    items.extend(first.item.map(Item::from));
    items.extend(rows.filter_map(|row| row.item).map(Item::from));

    Some(invoice_from(first.invoice, items))
}

fn invoice_from(record: InvoiceRecord, items: Vec<Item>) -> Invoice {
    Invoice {
        seq: record.seq,
        id: record.id,
        user_id: record.user_id,
        total: record.total,
        paid: record.paid,
        items,
        audit_info: AuditInfo::new(
            record.created_by,
            record.created_at,
            record.last_changed_by,
            record.last_update,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use proptest::prelude::*;
    use stockroom_core::{InvoiceId, ItemId, UserId, format_timestamp};
    use stockroom_items::ItemRecord;

    fn test_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2023, 5, 17, 8, 30, 0).unwrap()
    }

    fn test_invoice(seq: i64) -> InvoiceRecord {
        InvoiceRecord {
            seq,
            id: InvoiceId::new(),
            user_id: UserId::new(),
            total: 10.0,
            paid: false,
            created_by: "clerk".to_string(),
            created_at: test_time(),
            last_changed_by: "auditor".to_string(),
            last_update: test_time() + Duration::hours(1),
        }
    }

    fn test_item(seq: i64) -> ItemRecord {
        ItemRecord {
            seq,
            id: ItemId::new(),
            name: format!("item-{seq}"),
            description: "widget".to_string(),
            unit_price: 2.5,
            created_by: "stock".to_string(),
            created_at: test_time() - Duration::days(3),
            last_changed_by: "stock".to_string(),
            last_update: test_time() - Duration::days(2),
        }
    }

    #[test]
    fn map_single_has_no_items() {
        let record = test_invoice(1);
        let invoice = map_single(record.clone());

        assert!(invoice.items.is_empty());
        assert_eq!(invoice.id, record.id);
        assert_eq!(invoice.user_id, record.user_id);
        assert_eq!(invoice.audit_info.created_at, "2023-05-17T08:30:00Z");
        assert_eq!(invoice.audit_info.last_update, "2023-05-17T09:30:00Z");
        assert_eq!(invoice.audit_info.last_changed_by, "auditor");
    }

    #[test]
    fn map_collection_of_nothing_is_empty_list() {
        let mapped = map_collection(Vec::<InvoiceRecord>::new());
        assert!(mapped.is_empty());
    }

    #[test]
    fn map_collection_preserves_order() {
        let records = vec![test_invoice(5), test_invoice(2), test_invoice(9)];
        let seqs: Vec<i64> = map_collection(records).iter().map(|i| i.seq).collect();
        assert_eq!(seqs, vec![5, 2, 9]);
    }

    #[test]
    fn map_with_items_on_empty_rows_is_none() {
        assert!(map_with_items(Vec::new()).is_none());
    }

    #[test]
    fn map_with_items_single_null_row_gives_empty_items() {
        let record = test_invoice(4);
        let invoice =
            map_with_items(vec![InvoiceItemJoinRecord::new(record.clone(), None)]).unwrap();

        assert_eq!(invoice.seq, 4);
        assert_eq!(invoice.id, record.id);
        assert!(invoice.items.is_empty());
    }

    #[test]
    fn map_with_items_uses_item_audit_columns() {
        let record = test_invoice(1);
        let item = test_item(7);
        let invoice = map_with_items(vec![InvoiceItemJoinRecord::new(
            record.clone(),
            Some(item.clone()),
        )])
        .unwrap();

        assert_eq!(invoice.items.len(), 1);
        let mapped = &invoice.items[0];
        assert_eq!(mapped.id, item.id);
        assert_eq!(mapped.audit_info.created_by, "stock");
        assert_eq!(mapped.audit_info.created_at, format_timestamp(item.created_at));
        assert_eq!(invoice.audit_info.created_by, "clerk");
    }

    prop_compose! {
        fn arb_invoice()(
            seq in 1i64..1_000_000,
            total in 0.0f64..100_000.0,
            paid in any::<bool>(),
            created_offset in 0i64..1_000_000_000,
            update_offset in 0i64..1_000_000,
        ) -> InvoiceRecord {
            let created_at = Utc.timestamp_opt(created_offset, 0).unwrap();
            InvoiceRecord {
                seq,
                id: InvoiceId::new(),
                user_id: UserId::new(),
                total,
                paid,
                created_by: "clerk".to_string(),
                created_at,
                last_changed_by: "clerk".to_string(),
                last_update: created_at + Duration::seconds(update_offset),
            }
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn map_single_copies_every_scalar(record in arb_invoice()) {
            let invoice = map_single(record.clone());

            prop_assert!(invoice.items.is_empty());
            prop_assert_eq!(invoice.seq, record.seq);
            prop_assert_eq!(invoice.id, record.id);
            prop_assert_eq!(invoice.user_id, record.user_id);
            prop_assert_eq!(invoice.total, record.total);
            prop_assert_eq!(invoice.paid, record.paid);
            prop_assert_eq!(invoice.audit_info.created_at, format_timestamp(record.created_at));
            prop_assert_eq!(invoice.audit_info.last_update, format_timestamp(record.last_update));
        }

        #[test]
        fn map_with_items_keeps_present_items_in_row_order(
            record in arb_invoice(),
            present in prop::collection::vec(any::<bool>(), 1..24),
        ) {
            let rows: Vec<InvoiceItemJoinRecord> = present
                .iter()
                .enumerate()
                .map(|(n, &has_item)| {
                    let item = has_item.then(|| test_item(n as i64 + 1));
                    InvoiceItemJoinRecord::new(record.clone(), item)
                })
                .collect();
            let expected: Vec<ItemId> = rows
                .iter()
                .filter_map(|r| r.item.as_ref().map(|i| i.id))
                .collect();

            let invoice = map_with_items(rows).unwrap();
            let got: Vec<ItemId> = invoice.items.iter().map(|i| i.id).collect();

            prop_assert_eq!(got.len(), present.iter().filter(|p| **p).count());
            prop_assert_eq!(got, expected);
            prop_assert_eq!(invoice.id, record.id);
        }
    }
}
