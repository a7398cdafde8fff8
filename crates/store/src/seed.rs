//! Demo stock used when `SMARTSHELF_SEED_DEMO` is on.

use smartshelf_inventory::StockItemDraft;

/// Starting stock for a fresh demo store.
pub fn demo_stock_items() -> Vec<StockItemDraft> {
    vec![
        StockItemDraft::new("Chicken Biryani", "Meal", 50, "plates", 20).with_unit_price(450),
        StockItemDraft::new("Lays Chips", "Snack", 15, "packets", 30).with_unit_price(50),
        StockItemDraft::new("Coca Cola", "Drink", 100, "bottles", 40).with_unit_price(120),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_stock_has_one_low_item() {
        let drafts = demo_stock_items();
        assert_eq!(drafts.len(), 3);

        let low: Vec<_> = drafts
            .iter()
            .filter(|d| d.quantity <= d.reorder_level)
            .map(|d| d.name.as_str())
            .collect();
        assert_eq!(low, vec!["Lays Chips"]);
    }
}
