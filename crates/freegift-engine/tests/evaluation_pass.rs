//! End-to-end checks of the gift flow: grant, repeat passes, reorder.

use freegift_core::{Cart, CartLine, CoreError, LineId, Product, PromotionRule, StoreId};
use freegift_engine::{
    reorder, Catalog, GiftProvisioner, InMemoryCatalog, OrderLineRecord, RuleEvaluator,
};

fn catalog() -> InMemoryCatalog {
    let mut catalog = InMemoryCatalog::new();
    catalog.insert_stocked(Product::new("A", "Widget", 1000), 100);
    let mut tote = Product::new("FREE1", "Tote bag", 1500);
    tote.tax_rate_bps = 825;
    tote.weight_grams = 400;
    catalog.insert_stocked(tote, 100);
    catalog
}

fn cart_with(catalog: &InMemoryCatalog, sku: &str, qty: i64) -> (Cart, LineId) {
    let product = catalog.get_by_sku(sku).unwrap();
    let mut cart = Cart::new(StoreId::default());
    let id = cart.add_line(CartLine::from_product(&product, StoreId::default(), qty));
    (cart, id)
}

#[test]
fn grant_scenario() {
    let catalog = catalog();
    let provisioner = GiftProvisioner::new(&catalog, &catalog);
    let (mut cart, a) = cart_with(&catalog, "A", 2);
    let mut r1 = PromotionRule::gift("R1", "FREE1", 3.0);
    assert!(!r1.consumed);

    provisioner.handle_rule_match(&mut cart, a, &mut r1).unwrap();

    assert_eq!(cart.line_count(), 2);
    let (_, gift) = cart.lines().find(|(_, line)| line.sku == "FREE1").unwrap();
    assert_eq!(gift.quantity, 3);
    assert_eq!(gift.unit_price().cents(), 0);
    assert!(gift.is_gift);
    assert!(r1.consumed);

    let before = cart.clone();
    provisioner.handle_rule_match(&mut cart, a, &mut r1).unwrap();
    assert_eq!(cart.line_count(), 2);
    assert_eq!(cart.line_ids(), before.line_ids());
}

#[test]
fn gift_pricing_ignores_catalog_price() {
    let catalog = catalog();
    let provisioner = GiftProvisioner::new(&catalog, &catalog);

    let gift = provisioner
        .build_gift_line("FREE1", StoreId::default(), 4)
        .unwrap();

    assert_eq!(gift.unit_price().cents(), 0);
    assert_eq!(gift.custom_price_cents, Some(0));
    assert_eq!(gift.row_total().cents(), 0);
    assert_eq!(gift.reference_price().cents(), 1500);
    assert_eq!(gift.tax_rate_bps, 0);
    assert_eq!(gift.discount_cents, 0);
    assert_eq!(gift.row_weight_grams, 0);
}

#[test]
fn same_sku_gifts_stay_distinct() {
    let catalog = catalog();
    let provisioner = GiftProvisioner::new(&catalog, &catalog);
    let (mut cart, a) = cart_with(&catalog, "A", 1);
    let mut r1 = PromotionRule::gift("R1", "FREE1", 1.0);
    let mut r2 = PromotionRule::gift("R2", "FREE1", 2.0);

    provisioner.handle_rule_match(&mut cart, a, &mut r1).unwrap();
    provisioner.handle_rule_match(&mut cart, a, &mut r2).unwrap();

    let gifts: Vec<_> = cart.gift_lines().map(|(_, line)| line).collect();
    assert_eq!(gifts.len(), 2);
    assert_ne!(gifts[0].options.gift_token, gifts[1].options.gift_token);
    assert_eq!(gifts[0].quantity + gifts[1].quantity, 3);
}

#[test]
fn non_positive_quantity_grants_nothing() {
    let catalog = catalog();
    let provisioner = GiftProvisioner::new(&catalog, &catalog);

    for amount in [0.0, -1.0] {
        let (mut cart, a) = cart_with(&catalog, "A", 1);
        let mut rule = PromotionRule::gift("R1", "FREE1", amount);

        let granted = provisioner.handle_rule_match(&mut cart, a, &mut rule).unwrap();

        assert!(granted.is_none());
        assert_eq!(cart.line_count(), 1);
    }
}

#[test]
fn deleted_gift_product_leaves_no_partial_state() {
    let mut catalog = catalog();
    let (mut cart, _) = cart_with(&catalog, "A", 1);
    catalog.remove("FREE1");
    let evaluator = RuleEvaluator::new().with_handler(GiftProvisioner::new(&catalog, &catalog));
    let mut rules = vec![PromotionRule::gift("R1", "FREE1", 1.0)];

    let err = evaluator.run_pass(&mut cart, &mut rules).unwrap_err();

    assert!(err.is_product_lookup());
    assert_eq!(cart.line_count(), 1);
    assert_eq!(cart.gift_lines().count(), 0);
    assert!(!rules[0].consumed);
}

#[test]
fn gift_survives_order_and_reorder() {
    let catalog = catalog();
    let evaluator = RuleEvaluator::new().with_handler(GiftProvisioner::new(&catalog, &catalog));
    let (mut cart, _) = cart_with(&catalog, "A", 2);
    let mut rules = vec![PromotionRule::gift("R1", "FREE1", 3.0)];
    evaluator.run_pass(&mut cart, &mut rules).unwrap();

    let order: Vec<OrderLineRecord> = cart
        .lines()
        .map(|(_, line)| OrderLineRecord::from_cart_line(line).unwrap())
        .collect();

    let mut reordered = Cart::new(StoreId::default());
    reorder(&mut reordered, &order, &catalog).unwrap();

    let (_, gift) = reordered.gift_lines().next().unwrap();
    assert_eq!(gift.sku, "FREE1");
    assert_eq!(gift.quantity, 3);
    assert_eq!(gift.unit_price().cents(), 0);
    assert_eq!(reordered.subtotal().cents(), 2000);

    // The next pass replaces the reordered gift instead of adding a second one.
    evaluator.run_pass(&mut reordered, &mut rules).unwrap();
    assert_eq!(reordered.gift_lines().count(), 1);
    assert_eq!(reordered.line_count(), 2);
}

#[test]
fn missing_trigger_line_is_reported() {
    let catalog = catalog();
    let provisioner = GiftProvisioner::new(&catalog, &catalog);
    let mut cart = Cart::new(StoreId::default());
    let mut rule = PromotionRule::gift("R1", "FREE1", 1.0);

    let err = provisioner
        .handle_rule_match(&mut cart, LineId::new(1), &mut rule)
        .unwrap_err();
    assert!(matches!(err, CoreError::LineNotFound(_)));
}
