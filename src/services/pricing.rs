//! Price snapshot taken when an order is placed.
//!
//! Lines carry a copy of the unit price, so later catalog edits never
//! reach an existing order.

use std::collections::{HashMap, HashSet};

use rust_decimal::Decimal;

use crate::config::ORDER_LINE_QUANTITY;
use crate::domain::NewOrderItem;

/// Requested ids without repeats, in first-seen order.
pub fn distinct_ids(requested: &[i32]) -> Vec<i32> {
    let mut seen = HashSet::with_capacity(requested.len());
    requested
        .iter()
        .copied()
        .filter(|id| seen.insert(*id))
        .collect()
}

/// One line per requested id that has a current price.
///
/// Unknown ids are dropped. Repeated ids each get their own line.
pub fn snapshot(requested: &[i32], prices: &HashMap<i32, Decimal>) -> Vec<NewOrderItem> {
    requested
        .iter()
        .filter_map(|id| {
            prices.get(id).map(|price| NewOrderItem {
                product_id: *id,
                quantity: ORDER_LINE_QUANTITY,
                price: *price,
            })
        })
        .collect()
}
