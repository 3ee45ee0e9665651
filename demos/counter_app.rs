//! Counter application: dispatch, subscribe, hooks and reentrancy rejection
//!
//! Run with `RUST_LOG=reducto=trace` to see the store's own log events.

use std::sync::Arc;

use reducto::{after_fn, Action, Slice, Store, StoreConfig};
use tracing_subscriber::EnvFilter;

#[derive(Clone, Debug, PartialEq)]
struct CounterState {
    count: i32,
    step: i32,
}

#[derive(Debug)]
enum CounterAction {
    Increment,
    Decrement,
    SetStep(i32),
    Reset,
}

impl Action for CounterAction {
    fn kind(&self) -> &'static str {
        match self {
            CounterAction::Increment => "counter/increment",
            CounterAction::Decrement => "counter/decrement",
            CounterAction::SetStep(_) => "counter/setStep",
            CounterAction::Reset => "counter/reset",
        }
    }
}

struct Counter;

impl Slice for Counter {
    const NAME: &'static str = "counter";
    type State = CounterState;
    type Action = CounterAction;

    fn initial_state() -> CounterState {
        CounterState { count: 0, step: 1 }
    }

    fn reduce(state: &Arc<CounterState>, action: &CounterAction) -> Arc<CounterState> {
        match action {
            CounterAction::Increment => reducto::update::produce(state, |s| s.count += s.step),
            CounterAction::Decrement => reducto::update::produce(state, |s| s.count -= s.step),
            CounterAction::SetStep(step) => {
                reducto::update::produce_if_changed(state, |s| s.step = *step)
            }
            CounterAction::Reset => {
                reducto::update::produce_if_changed(state, |s| s.count = 0)
            }
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .init();
}

fn main() {
    init_tracing();

    println!("=== Counter Application ===\n");

    let store = Store::builder(Counter::reducer(), Counter::initial_state())
        .config(StoreConfig::named("counter-app"))
        .hook(after_fn(|action: &CounterAction, state: &Arc<CounterState>| {
            println!("   [hook] {} -> {:?}", action.kind(), state);
        }))
        .build();

    let subscription = store.subscribe(|state| {
        println!("   [subscriber] Count: {}, Step: {}", state.count, state.step);
    });

    println!("1. Incrementing twice");
    store.dispatch(CounterAction::Increment).unwrap();
    store.dispatch(CounterAction::Increment).unwrap();

    println!("\n2. Changing step to 5 and decrementing");
    store.dispatch(CounterAction::SetStep(5)).unwrap();
    store.dispatch(CounterAction::Decrement).unwrap();

    println!("\n3. Setting the same step again (state identity preserved)");
    let before = store.state();
    store.dispatch(CounterAction::SetStep(5)).unwrap();
    println!("   same Arc: {}", Arc::ptr_eq(&before, &store.state()));

    println!("\n4. Dispatching from a subscriber is rejected");
    let inner = store.clone();
    let nested = store.subscribe(move |_| {
        if let Err(err) = inner.dispatch(CounterAction::Reset) {
            println!("   [nested] {err}");
        }
    });
    store.dispatch(CounterAction::Increment).unwrap();
    nested.unsubscribe();

    println!("\n5. Unsubscribing and resetting");
    subscription.unsubscribe();
    store.dispatch(CounterAction::Reset).unwrap();

    println!("\nFinal state: {:?}", store.state());
}
