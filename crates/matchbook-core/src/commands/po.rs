use std::path::Path;

use crate::commands::reconcile::store_summary;
use crate::contracts::envelope::{SuccessEnvelope, success};
use crate::contracts::types::{PoListData, PoListRow, PoShowData};
use crate::store::PoStore;
use crate::{CoreError, CoreResult};

pub fn list(po_source: &str) -> CoreResult<SuccessEnvelope> {
    let store = PoStore::load(Path::new(po_source))?;

    let rows = store
        .orders()
        .iter()
        .map(|order| PoListRow {
            po_number: order.po_number.clone(),
            supplier: order.supplier.clone(),
            order_date: order.order_date.clone(),
            currency: order.currency.clone(),
            status: order.status.clone(),
            line_item_count: order.line_items.len() as i64,
            total: order.total,
        })
        .collect::<Vec<PoListRow>>();

    let data = PoListData {
        store: store_summary(po_source, &store),
        rows,
    };
    success("po list", data)
}

pub fn show(po_source: &str, po_number: &str) -> CoreResult<SuccessEnvelope> {
    let store = PoStore::load(Path::new(po_source))?;

    let Some(order) = store.get_by_number(po_number) else {
        return Err(CoreError::po_not_found(po_number));
    };

    let data = PoShowData {
        store: store_summary(po_source, &store),
        po: order.clone(),
    };
    success("po show", data)
}
