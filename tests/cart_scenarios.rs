//! Integration tests for cart behaviour as a shopper sees it.
//!
//! The scenario tests walk through a shopping session step by step. The
//! property tests drive the cart with random operation sequences and check
//! that the derived totals and the published snapshots always agree with the
//! line items.

use std::{cell::RefCell, rc::Rc};

use proptest::prelude::*;
use testresult::TestResult;

use fruteria::{
    cart::{Cart, CartSnapshot},
    items::NewLineItem,
    prices::pesos,
    products::Category,
};

fn strawberries() -> NewLineItem {
    NewLineItem::new("a", "Strawberries", pesos(5_000), Category::Fruit)
}

#[test]
fn add_update_remove_session() -> TestResult {
    let mut cart = Cart::default();

    cart.add_item(strawberries())?;
    cart.add_item(strawberries())?;

    let snapshot = cart.snapshot();
    let line = snapshot.get("a").ok_or("strawberries missing")?;

    assert_eq!(snapshot.items().len(), 1);
    assert_eq!(line.quantity().get(), 2);
    assert_eq!(snapshot.total_item_count(), 2);
    assert_eq!(snapshot.total_price(), pesos(10_000));

    cart.update_quantity("a", 5);

    assert_eq!(cart.total_item_count(), 5);
    assert_eq!(cart.total_price(), pesos(25_000));

    let removed = cart.remove_item("a").ok_or("strawberries not removed")?;

    assert_eq!(removed.quantity().get(), 5);
    assert!(cart.is_empty());
    assert_eq!(cart.total_item_count(), 0);
    assert_eq!(cart.total_price(), pesos(0));

    Ok(())
}

#[test]
fn distinct_products_sum_their_prices() -> TestResult {
    let mut cart = Cart::default();

    cart.add_item(NewLineItem::new("x", "Lulo", pesos(3_000), Category::Fruit))?;
    cart.add_item(NewLineItem::new("y", "Aguacate", pesos(7_000), Category::Vegetable))?;

    let snapshot = cart.snapshot();
    let ids: Vec<&str> = snapshot.items().iter().map(|item| item.id().as_str()).collect();

    assert_eq!(ids, vec!["x", "y"]);
    assert_eq!(snapshot.total_item_count(), 2);
    assert_eq!(snapshot.total_price(), pesos(10_000));

    Ok(())
}

#[test]
fn zero_quantity_update_removes_line() -> TestResult {
    let mut cart = Cart::default();

    cart.add_item(strawberries())?;
    cart.update_quantity("a", 0);

    assert!(cart.get("a").is_none());
    assert!(cart.snapshot().is_empty());

    Ok(())
}

#[test]
fn observers_see_every_change_in_order() -> TestResult {
    let mut cart = Cart::default();
    let seen: Rc<RefCell<Vec<(u64, i64)>>> = Rc::default();

    let recorder = Rc::clone(&seen);
    cart.subscribe(move |snapshot: &CartSnapshot| {
        recorder.borrow_mut().push((
            snapshot.total_item_count(),
            snapshot.total_price().to_minor_units(),
        ));
    });

    cart.add_item(strawberries())?;
    cart.add_item(strawberries())?;
    cart.update_quantity("a", 5);
    cart.remove_item("a");
    cart.clear();

    let minor = pesos(1).to_minor_units();

    assert_eq!(
        *seen.borrow(),
        vec![
            (1, 5_000 * minor),
            (2, 10_000 * minor),
            (5, 25_000 * minor),
            (0, 0),
        ]
    );

    Ok(())
}

#[test]
fn unsubscribed_observer_is_not_called() -> TestResult {
    let mut cart = Cart::default();
    let calls = Rc::new(RefCell::new(0_u32));

    let counter = Rc::clone(&calls);
    let key = cart.subscribe(move |_: &CartSnapshot| *counter.borrow_mut() += 1);

    cart.add_item(strawberries())?;

    assert!(cart.unsubscribe(key));

    cart.add_item(strawberries())?;

    assert_eq!(*calls.borrow(), 1);
    assert!(!cart.unsubscribe(key));

    Ok(())
}

#[derive(Debug, Clone)]
enum Op {
    Add(usize),
    Update(usize, i64),
    Increment(usize),
    Decrement(usize),
    Remove(usize),
    Clear,
}

const IDS: [&str; 4] = ["a", "b", "c", "d"];

fn product(index: usize) -> NewLineItem {
    let id = IDS.get(index % IDS.len()).copied().unwrap_or("a");
    let price = 1_000 * i64::try_from(index % IDS.len() + 1).unwrap_or(1);

    NewLineItem::new(id, format!("Producto {id}"), pesos(price), Category::Other)
}

fn id(index: usize) -> &'static str {
    IDS.get(index % IDS.len()).copied().unwrap_or("a")
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..IDS.len()).prop_map(Op::Add),
        (0..IDS.len(), -3_i64..20).prop_map(|(index, quantity)| Op::Update(index, quantity)),
        (0..IDS.len()).prop_map(Op::Increment),
        (0..IDS.len()).prop_map(Op::Decrement),
        (0..IDS.len()).prop_map(Op::Remove),
        Just(Op::Clear),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        ..ProptestConfig::default()
    })]

    /// Property: adding the same product n times yields a single line with
    /// quantity n, keeping the name and price from the first call.
    #[test]
    fn repeated_adds_accumulate_quantity(times in 1_u32..50) {
        let mut cart = Cart::default();

        cart.add_item(strawberries())?;

        for _ in 1..times {
            cart.add_item(NewLineItem::new("a", "Renamed", pesos(1), Category::Other))?;
        }

        let snapshot = cart.snapshot();
        let line = snapshot.get("a").ok_or_else(|| TestCaseError::fail("line missing"))?;

        prop_assert_eq!(snapshot.items().len(), 1);
        prop_assert_eq!(line.quantity().get(), times);
        prop_assert_eq!(line.name(), "Strawberries");
        prop_assert_eq!(line.unit_price(), &pesos(5_000));
        prop_assert_eq!(snapshot.total_price(), pesos(5_000 * i64::from(times)));
    }

    /// Property: after any sequence of operations the totals match the line
    /// items, ids are unique, every quantity is positive, and the last
    /// published snapshot equals the current one.
    #[test]
    fn totals_always_match_line_items(ops in prop::collection::vec(op_strategy(), 0..40)) {
        let mut cart = Cart::default();
        let last: Rc<RefCell<Option<CartSnapshot>>> = Rc::default();

        let recorder = Rc::clone(&last);
        cart.subscribe(move |snapshot: &CartSnapshot| {
            *recorder.borrow_mut() = Some(snapshot.clone());
        });

        for op in ops {
            match op {
                Op::Add(index) => cart.add_item(product(index))?,
                Op::Update(index, quantity) => cart.update_quantity(id(index), quantity),
                Op::Increment(index) => cart.increment(id(index)),
                Op::Decrement(index) => cart.decrement(id(index)),
                Op::Remove(index) => {
                    cart.remove_item(id(index));
                }
                Op::Clear => cart.clear(),
            }

            let snapshot = cart.snapshot();

            let count: u64 = snapshot
                .items()
                .iter()
                .map(|item| u64::from(item.quantity().get()))
                .sum();
            let total: i64 = snapshot
                .items()
                .iter()
                .map(|item| item.unit_price().to_minor_units() * i64::from(item.quantity().get()))
                .sum();

            prop_assert_eq!(snapshot.total_item_count(), count);
            prop_assert_eq!(snapshot.total_price().to_minor_units(), total);

            let mut ids: Vec<&str> = snapshot.items().iter().map(|item| item.id().as_str()).collect();
            ids.sort_unstable();
            ids.dedup();

            prop_assert_eq!(ids.len(), snapshot.items().len());

            if let Some(published) = last.borrow().as_ref() {
                prop_assert_eq!(published, &snapshot);
            }
        }
    }

    /// Property: clear always leaves an empty cart with zero totals.
    #[test]
    fn clear_always_empties(adds in prop::collection::vec(0..IDS.len(), 0..20)) {
        let mut cart = Cart::default();

        for index in adds {
            cart.add_item(product(index))?;
        }

        cart.clear();

        prop_assert!(cart.is_empty());
        prop_assert_eq!(cart.total_item_count(), 0);
        prop_assert_eq!(cart.total_price(), pesos(0));
    }
}
