//! Memoized selectors and watching derived values

use std::sync::Arc;

use reducto::{from_fn, Action, Selector, Store};

#[derive(Clone, Debug)]
struct Cart {
    items: Vec<(String, u32, u32)>,
    discount_percent: u32,
}

#[derive(Debug)]
enum CartAction {
    Add { name: String, price: u32 },
    Discount(u32),
}

impl Action for CartAction {
    fn kind(&self) -> &'static str {
        match self {
            CartAction::Add { .. } => "cart/add",
            CartAction::Discount(_) => "cart/discount",
        }
    }
}

fn main() {
    println!("=== Selectors ===\n");

    let store = Store::new(
        from_fn(|cart: &Arc<Cart>, action: &CartAction| match action {
            CartAction::Add { name, price } => reducto::update::produce(cart, |c| {
                match c.items.iter_mut().find(|(n, _, _)| n == name) {
                    Some(item) => item.2 += 1,
                    None => c.items.push((name.clone(), *price, 1)),
                }
            }),
            CartAction::Discount(percent) => {
                reducto::update::produce(cart, |c| c.discount_percent = *percent)
            }
        }),
        Cart {
            items: Vec::new(),
            discount_percent: 0,
        },
    );

    let subtotal = Selector::new(|cart: &Cart| {
        cart.items
            .iter()
            .map(|(_, price, qty)| price * qty)
            .sum::<u32>()
    });
    let item_count = Selector::new(|cart: &Cart| cart.items.iter().map(|(_, _, qty)| qty).sum::<u32>());
    let free_shipping = subtotal.map(|total| *total >= 50);

    let _watch = store.watch(free_shipping.clone(), |eligible| {
        println!("   [watch] free shipping: {eligible}");
    });
    let _count = store.watch(item_count, |count| {
        println!("   [watch] items in cart: {count}");
    });

    store
        .dispatch(CartAction::Add {
            name: "book".into(),
            price: 20,
        })
        .unwrap();
    store
        .dispatch(CartAction::Add {
            name: "book".into(),
            price: 20,
        })
        .unwrap();
    store
        .dispatch(CartAction::Add {
            name: "pen".into(),
            price: 15,
        })
        .unwrap();
    store.dispatch(CartAction::Discount(10)).unwrap();

    let state = store.state();
    let total = subtotal.get(&state) * (100 - state.discount_percent) / 100;
    println!("\nSubtotal: {}", store.select(&subtotal));
    println!("Total after discount: {total}");
    println!("Subtotal recomputations: {}", subtotal.recomputations());
}
