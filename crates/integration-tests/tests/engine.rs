//! Pricing, checkout and status rules working together, the way the
//! storefront and admin services chain them.

#![allow(clippy::unwrap_used)]

use std::collections::BTreeMap;

use chrono::{TimeDelta, TimeZone, Utc};

use souq_core::catalog::{
    CustomOptionGroup, OptionValue, Product, ProductOptions, QuantityOffer, ShippingZone, Stock,
};
use souq_core::orders::{
    CheckoutRequest, DuplicateGuard, InventoryEffect, InventoryError, RecentOrder,
    ValidationError, plan_status_change,
};
use souq_core::pricing::{OptionSelections, ShippingCost, ShippingTable, quote};
use souq_core::{OrderStatus, Price, ProductId, ProductTypeId, RequesterFingerprint, ShippingZoneId};

fn caftan(stock: Stock) -> Product {
    let now = Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap();
    Product {
        id: ProductId::generate(),
        product_type_id: ProductTypeId::generate(),
        name: "Caftan brodé".to_owned(),
        description: None,
        description_content: Vec::new(),
        base_price: Price::from_whole(8000),
        price_before_discount: Some(Price::from_whole(9500)),
        images: Vec::new(),
        options: ProductOptions {
            sizes: vec![
                OptionValue::new("M", Price::ZERO),
                OptionValue::new("XL", Price::from_whole(700)),
            ],
            colors: Vec::new(),
            custom_options: vec![CustomOptionGroup {
                option_name: "Broderie".to_owned(),
                values: vec![
                    OptionValue::new("Simple", Price::ZERO),
                    OptionValue::new("Fil d'or", Price::from_whole(1500)),
                ],
            }],
        },
        quantity_offers: vec![QuantityOffer::new(2, Price::from_whole(15000))],
        min_quantity: 1,
        stock,
        created_at: now,
        updated_at: now,
    }
}

fn zones() -> Vec<ShippingZone> {
    vec![ShippingZone {
        id: ShippingZoneId::generate(),
        wilaya: "Constantine".to_owned(),
        office_price: Price::from_whole(450),
        home_price: Price::from_whole(750),
        communes: vec!["El Khroub".to_owned(), "Hamma Bouziane".to_owned()],
    }]
}

fn order_form(quantity: u32) -> CheckoutRequest {
    CheckoutRequest {
        customer_name: "Amina Boudiaf".to_owned(),
        customer_phone: "0661234567".to_owned(),
        wilaya: "Constantine".to_owned(),
        commune: Some("El Khroub".to_owned()),
        ship_to_home: true,
        quantity,
        selections: OptionSelections {
            size: Some("XL".to_owned()),
            color: None,
            custom: BTreeMap::from([("Broderie".to_owned(), "Fil d'or".to_owned())]),
        },
    }
}

#[test]
fn test_checkout_then_price() {
    let product = caftan(Stock::Limited(10));
    let zones = zones();
    let checkout = order_form(3)
        .validate(&product, zones.first())
        .unwrap();

    let priced = quote(
        &product,
        &checkout.selections,
        checkout.quantity,
        Some(checkout.destination.target()),
        &ShippingTable::from_zones(&zones),
    )
    .unwrap();

    // 8000 + 700 + 1500
    assert_eq!(priced.unit_price, Price::from_whole(10200));
    // one bundle of two at its flat price, one unit at the adjusted price
    assert_eq!(priced.tiers.full_sets, 1);
    assert_eq!(priced.tiers.remainder, 1);
    assert_eq!(priced.subtotal, Price::from_whole(25200));
    assert_eq!(
        priced.shipping,
        Some(ShippingCost::Configured(Price::from_whole(750)))
    );
    assert_eq!(priced.total, Price::from_whole(25950));
    assert!(priced.unmatched_options.is_empty());
}

#[test]
fn test_office_pickup_in_unconfigured_wilaya() {
    let product = caftan(Stock::Unlimited);
    let mut form = order_form(1);
    form.wilaya = "Illizi".to_owned();
    form.ship_to_home = false;
    form.commune = None;

    let checkout = form.validate(&product, None).unwrap();
    let priced = quote(
        &product,
        &checkout.selections,
        checkout.quantity,
        Some(checkout.destination.target()),
        &ShippingTable::from_zones(&zones()),
    )
    .unwrap();

    assert!(priced.shipping_unconfigured());
    assert_eq!(priced.total, priced.subtotal);
}

#[test]
fn test_unknown_option_value_is_priced_neutral() {
    let product = caftan(Stock::Unlimited);
    let mut form = order_form(1);
    form.selections
        .custom
        .insert("Broderie".to_owned(), "Perles".to_owned());

    let checkout = form.validate(&product, zones().first()).unwrap();
    let priced = quote(
        &product,
        &checkout.selections,
        1,
        None,
        &ShippingTable::default(),
    )
    .unwrap();

    assert_eq!(priced.unit_price, Price::from_whole(8700));
    assert_eq!(priced.unmatched_options.len(), 1);
    assert_eq!(priced.shipping, None);
}

#[test]
fn test_checkout_refuses_more_than_stock() {
    let product = caftan(Stock::Limited(2));
    assert_eq!(
        order_form(3).validate(&product, zones().first()),
        Err(ValidationError::ExceedsStock {
            available: 2,
            requested: 3
        })
    );
}

#[test]
fn test_commune_outside_zone_refused() {
    let product = caftan(Stock::Unlimited);
    let mut form = order_form(1);
    form.commune = Some("Bab Ezzouar".to_owned());
    assert!(matches!(
        form.validate(&product, zones().first()),
        Err(ValidationError::UnknownCommune { .. })
    ));
}

#[test]
fn test_duplicate_window_per_product_and_requester() {
    let now = Utc.with_ymd_and_hms(2025, 3, 1, 18, 0, 0).unwrap();
    let product_id = ProductId::generate();
    let requester = RequesterFingerprint::new("203.0.113.9");
    let guard = DuplicateGuard::from_hours(6);

    let recent = vec![RecentOrder {
        product_id,
        fingerprint: requester.clone(),
        created_at: now - TimeDelta::hours(5),
    }];

    assert!(guard.is_duplicate(product_id, &requester, &recent, now));
    // another product from the same requester is fine
    assert!(!guard.is_duplicate(ProductId::generate(), &requester, &recent, now));
    // another requester is fine
    assert!(!guard.is_duplicate(
        product_id,
        &RequesterFingerprint::new("203.0.113.10"),
        &recent,
        now
    ));
    // the window has passed
    assert!(!guard.is_duplicate(product_id, &requester, &recent, now + TimeDelta::hours(2)));
}

#[test]
fn test_order_lifecycle_stock() {
    let ordered = 2;
    let mut stock = Stock::Limited(5);
    let mut status = OrderStatus::Pending;

    for next in [
        OrderStatus::Confirmed,
        OrderStatus::Shipped,
        OrderStatus::Delivered,
    ] {
        let change = plan_status_change(status, next, ordered, Some(stock)).unwrap();
        if let InventoryEffect::Decremented { after, .. } = change.inventory {
            stock = Stock::Limited(after);
        }
        status = change.to;
    }
    assert_eq!(stock, Stock::Limited(3));

    // saving delivered again changes nothing
    let again = plan_status_change(status, OrderStatus::Delivered, ordered, Some(stock)).unwrap();
    assert!(again.is_noop());
    assert_eq!(again.inventory, InventoryEffect::Unchanged);

    // returned then redelivered decrements a second time
    let returned = plan_status_change(status, OrderStatus::Returned, ordered, Some(stock)).unwrap();
    assert_eq!(returned.inventory, InventoryEffect::Unchanged);
    let redelivered =
        plan_status_change(returned.to, OrderStatus::Delivered, ordered, Some(stock)).unwrap();
    assert_eq!(
        redelivered.inventory,
        InventoryEffect::Decremented {
            before: 3,
            after: 1
        }
    );
}

#[test]
fn test_delivery_blocked_when_stock_ran_out() {
    assert_eq!(
        plan_status_change(
            OrderStatus::Shipped,
            OrderStatus::Delivered,
            4,
            Some(Stock::Limited(1))
        ),
        Err(InventoryError::Insufficient {
            available: 1,
            requested: 4
        })
    );
}

#[test]
fn test_delivery_of_deleted_or_unlimited_product() {
    let orphaned =
        plan_status_change(OrderStatus::Shipped, OrderStatus::Delivered, 1, None).unwrap();
    assert_eq!(orphaned.inventory, InventoryEffect::Orphaned);

    let exempt = plan_status_change(
        OrderStatus::Shipped,
        OrderStatus::Delivered,
        1,
        Some(Stock::Unlimited),
    )
    .unwrap();
    assert_eq!(exempt.inventory, InventoryEffect::Exempt);
}
