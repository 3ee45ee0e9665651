//! Todo application built from two slices combined into one root reducer

use std::sync::Arc;

use reducto::{combine, scope, Action, Combined, Slice, Store};
use tracing_subscriber::EnvFilter;

#[derive(Clone, Debug, PartialEq)]
struct TodoItem {
    id: usize,
    title: String,
    completed: bool,
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum TodoFilter {
    All,
    Active,
    Completed,
}

#[derive(Debug)]
enum TodoAction {
    Add(String),
    Toggle(usize),
    ClearCompleted,
}

impl Action for TodoAction {
    fn kind(&self) -> &'static str {
        match self {
            TodoAction::Add(_) => "todos/add",
            TodoAction::Toggle(_) => "todos/toggle",
            TodoAction::ClearCompleted => "todos/clearCompleted",
        }
    }
}

#[derive(Debug)]
enum FilterAction {
    Show(TodoFilter),
}

impl Action for FilterAction {
    fn kind(&self) -> &'static str {
        "filter/show"
    }
}

struct Todos;

impl Slice for Todos {
    const NAME: &'static str = "todos";
    type State = Vec<TodoItem>;
    type Action = TodoAction;

    fn initial_state() -> Vec<TodoItem> {
        Vec::new()
    }

    fn reduce(state: &Arc<Vec<TodoItem>>, action: &TodoAction) -> Arc<Vec<TodoItem>> {
        match action {
            TodoAction::Add(title) => reducto::update::produce(state, |todos| {
                let id = todos.len();
                todos.push(TodoItem {
                    id,
                    title: title.clone(),
                    completed: false,
                });
            }),
            TodoAction::Toggle(id) => reducto::update::produce_if_changed(state, |todos| {
                if let Some(todo) = todos.iter_mut().find(|t| t.id == *id) {
                    todo.completed = !todo.completed;
                }
            }),
            TodoAction::ClearCompleted => {
                reducto::update::produce_if_changed(state, |todos| todos.retain(|t| !t.completed))
            }
        }
    }
}

struct Filter;

impl Slice for Filter {
    const NAME: &'static str = "filter";
    type State = TodoFilter;
    type Action = FilterAction;

    fn initial_state() -> TodoFilter {
        TodoFilter::All
    }

    fn reduce(state: &Arc<TodoFilter>, action: &FilterAction) -> Arc<TodoFilter> {
        match action {
            FilterAction::Show(filter) => reducto::update::set_if_changed(state, *filter),
        }
    }
}

#[derive(Debug)]
enum AppAction {
    Todos(TodoAction),
    Filter(FilterAction),
}

impl Action for AppAction {
    fn kind(&self) -> &'static str {
        match self {
            AppAction::Todos(action) => action.kind(),
            AppAction::Filter(action) => action.kind(),
        }
    }
}

#[derive(Clone, Debug)]
struct AppState {
    todos: Arc<Vec<TodoItem>>,
    filter: Arc<TodoFilter>,
}

impl AppState {
    fn visible(&self) -> Vec<&TodoItem> {
        match *self.filter {
            TodoFilter::All => self.todos.iter().collect(),
            TodoFilter::Active => self.todos.iter().filter(|t| !t.completed).collect(),
            TodoFilter::Completed => self.todos.iter().filter(|t| t.completed).collect(),
        }
    }
}

fn root_reducer() -> Combined<AppState, AppAction> {
    combine::<AppState, AppAction>()
        .partition(
            Todos::NAME,
            |s: &AppState| &s.todos,
            |s: &mut AppState, v| s.todos = v,
            scope(Todos::reducer(), |a: &AppAction| match a {
                AppAction::Todos(inner) => Some(inner),
                _ => None,
            }),
        )
        .partition(
            Filter::NAME,
            |s: &AppState| &s.filter,
            |s: &mut AppState, v| s.filter = v,
            scope(Filter::reducer(), |a: &AppAction| match a {
                AppAction::Filter(inner) => Some(inner),
                _ => None,
            }),
        )
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    println!("=== Todo Slices ===\n");

    let reducer = root_reducer();
    println!("Partitions: {:?}\n", reducer.partition_names());

    let store = Store::new(
        reducer,
        AppState {
            todos: Arc::new(Todos::initial_state()),
            filter: Arc::new(Filter::initial_state()),
        },
    );

    let _subscription = store.subscribe(|state| {
        let visible: Vec<_> = state.visible().iter().map(|t| t.title.as_str()).collect();
        println!("   [{:?}] {:?}", state.filter, visible);
    });

    for title in ["Learn reducers", "Write slices", "Ship it"] {
        store
            .dispatch(AppAction::Todos(TodoAction::Add(title.to_string())))
            .unwrap();
    }

    let before = store.state();
    store.dispatch(AppAction::Todos(TodoAction::Toggle(0))).unwrap();
    let after = store.state();
    println!(
        "\nfilter partition reused after toggle: {}",
        Arc::ptr_eq(&before.filter, &after.filter)
    );

    store
        .dispatch(AppAction::Filter(FilterAction::Show(TodoFilter::Active)))
        .unwrap();
    store
        .dispatch(AppAction::Filter(FilterAction::Show(TodoFilter::Completed)))
        .unwrap();
    store
        .dispatch(AppAction::Todos(TodoAction::ClearCompleted))
        .unwrap();

    println!("\nFinal state: {:#?}", store.state());
}
