use crate::aggregate::SalesTotals;

/// One row of the bestseller ranking. Ranks are 1-based and contiguous, even
/// when totals tie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedEntry {
    pub rank: u64,
    pub product_name: String,
    pub total_quantity: i64,
}

/// Select the top `top_k` products by total quantity sold.
///
/// Orders by quantity descending; products with equal totals keep the order
/// in which they first appeared in the input. Returns
/// `min(top_k, distinct products)` entries, so `top_k = 0` and an empty
/// aggregation both yield an empty ranking.
pub fn top(totals: &SalesTotals, top_k: usize) -> Vec<RankedEntry> {
    let mut products: Vec<_> = totals.iter().collect();
    products.sort_by(|a, b| {
        b.1.quantity
            .cmp(&a.1.quantity)
            .then_with(|| a.1.first_seen.cmp(&b.1.first_seen))
    });
    products.truncate(top_k);

    products
        .into_iter()
        .enumerate()
        .map(|(index, (_, total))| RankedEntry {
            rank: index as u64 + 1,
            product_name: total.description.clone(),
            total_quantity: total.quantity,
        })
        .collect()
}
