//! Behavioral tests for the generic store
//!
//! Covers determinism, notification order, failure isolation and
//! re-entrant dispatch.

use libcrowdfund::store::Store;
use std::cell::RefCell;
use std::io;
use std::rc::Rc;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, Default, PartialEq)]
struct Counter {
    count: i64,
}

#[derive(Debug, Clone, PartialEq)]
enum CounterAction {
    Inc,
    Add(i64),
    /// Not handled by the reducer: identity transition
    Noop,
}

fn counter(state: Counter, action: CounterAction) -> Counter {
    match action {
        CounterAction::Inc => Counter {
            count: state.count + 1,
        },
        CounterAction::Add(n) => Counter {
            count: state.count + n,
        },
        CounterAction::Noop => state,
    }
}

/// Shared log that subscribers append to
type Log = Rc<RefCell<Vec<String>>>;

fn new_log() -> Log {
    Rc::new(RefCell::new(Vec::new()))
}

#[test]
fn test_three_increments_scenario() {
    let store = Store::new(counter, Counter { count: 0 });
    let calls = Rc::new(RefCell::new(0));

    let sink = Rc::clone(&calls);
    store.subscribe(move || *sink.borrow_mut() += 1);

    for _ in 0..3 {
        store.dispatch(CounterAction::Inc).unwrap();
    }

    assert_eq!(*store.get_state(), Counter { count: 3 });
    assert_eq!(*calls.borrow(), 3);
}

#[test]
fn test_state_is_left_fold_of_actions() {
    let actions = vec![
        CounterAction::Add(5),
        CounterAction::Inc,
        CounterAction::Noop,
        CounterAction::Add(-8),
        CounterAction::Inc,
        CounterAction::Add(40),
    ];

    let store = Store::new(counter, Counter::default());
    for action in actions.clone() {
        store.dispatch(action).unwrap();
    }

    let expected = actions.into_iter().fold(Counter::default(), counter);
    assert_eq!(*store.get_state(), expected);
    assert_eq!(expected.count, 39);
}

#[test]
fn test_subscribers_called_in_registration_order_once_per_dispatch() {
    let store = Store::new(counter, Counter::default());
    let log = new_log();

    for name in ["a", "b", "c"] {
        let log = Rc::clone(&log);
        store.subscribe(move || log.borrow_mut().push(name.to_string()));
    }

    store.dispatch(CounterAction::Inc).unwrap();
    store.dispatch(CounterAction::Inc).unwrap();

    assert_eq!(*log.borrow(), vec!["a", "b", "c", "a", "b", "c"]);
}

#[test]
fn test_same_callback_registered_twice_runs_twice() {
    let store = Store::new(counter, Counter::default());
    let calls = Rc::new(RefCell::new(0));

    let callback = {
        let calls = Rc::clone(&calls);
        move || *calls.borrow_mut() += 1
    };
    store.subscribe(callback.clone());
    store.subscribe(callback);

    store.dispatch(CounterAction::Inc).unwrap();
    assert_eq!(*calls.borrow(), 2);
}

#[test]
fn test_identity_action_still_notifies() {
    let store = Store::new(counter, Counter { count: 9 });
    let calls = Rc::new(RefCell::new(0));
    let sink = Rc::clone(&calls);
    store.subscribe(move || *sink.borrow_mut() += 1);

    store.dispatch(CounterAction::Noop).unwrap();

    assert_eq!(*store.get_state(), Counter { count: 9 });
    assert_eq!(*calls.borrow(), 1);
}

#[test]
fn test_subscribers_observe_post_transition_state() {
    let store = Store::new(counter, Counter::default());
    let seen = new_log();

    let reader = store.clone();
    let sink = Rc::clone(&seen);
    store.subscribe(move || sink.borrow_mut().push(reader.get_state().count.to_string()));

    store.dispatch(CounterAction::Add(2)).unwrap();
    store.dispatch(CounterAction::Add(3)).unwrap();

    assert_eq!(*seen.borrow(), vec!["2", "5"]);
}

#[test]
fn test_selected_id_can_be_cleared() {
    #[derive(Debug, Clone, Default)]
    struct Selection {
        selected_id: Option<String>,
    }

    enum SelectionAction {
        SetSelected(Option<String>),
    }

    let store = Store::from_default(|_: Selection, action: SelectionAction| match action {
        SelectionAction::SetSelected(id) => Selection { selected_id: id },
    });

    store
        .dispatch(SelectionAction::SetSelected(Some("x".to_string())))
        .unwrap();
    assert_eq!(store.get_state().selected_id.as_deref(), Some("x"));

    store.dispatch(SelectionAction::SetSelected(None)).unwrap();
    assert_eq!(store.get_state().selected_id, None);
}

#[test]
fn test_failing_reducer_leaves_state_and_skips_notification() {
    let store = Store::fallible(
        |state: Counter, delta: i64| {
            if state.count + delta < 0 {
                Err(format!("cannot go below zero by {}", delta))
            } else {
                Ok(Counter {
                    count: state.count + delta,
                })
            }
        },
        Counter { count: 1 },
    );
    let calls = Rc::new(RefCell::new(0));
    let sink = Rc::clone(&calls);
    store.subscribe(move || *sink.borrow_mut() += 1);

    let err = store.dispatch(-5).unwrap_err();

    assert_eq!(err, "cannot go below zero by -5");
    assert_eq!(store.get_state().count, 1);
    assert_eq!(*calls.borrow(), 0);

    store.dispatch(-1).unwrap();
    assert_eq!(store.get_state().count, 0);
    assert_eq!(*calls.borrow(), 1);
}

#[test]
fn test_panicking_reducer_leaves_state_untouched() {
    let store = Store::new(
        |state: Counter, delta: i64| {
            if delta == 0 {
                panic!("zero step");
            }
            Counter {
                count: state.count + delta,
            }
        },
        Counter { count: 4 },
    );
    let calls = Rc::new(RefCell::new(0));
    let sink = Rc::clone(&calls);
    store.subscribe(move || *sink.borrow_mut() += 1);

    let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        store.dispatch(0).unwrap();
    }));

    assert!(outcome.is_err());
    assert_eq!(store.get_state().count, 4);
    assert_eq!(*calls.borrow(), 0);

    // The store is still usable afterwards
    store.dispatch(1).unwrap();
    assert_eq!(store.get_state().count, 5);
}

#[test]
fn test_panicking_subscriber_does_not_stop_the_pass() {
    let store = Store::new(counter, Counter::default());
    let log = new_log();

    let first = Rc::clone(&log);
    store.subscribe(move || first.borrow_mut().push("first".to_string()));
    store.subscribe(|| panic!("widget exploded"));
    let last = Rc::clone(&log);
    store.subscribe(move || last.borrow_mut().push("last".to_string()));

    store.dispatch(CounterAction::Inc).unwrap();
    store.dispatch(CounterAction::Inc).unwrap();

    assert_eq!(*log.borrow(), vec!["first", "last", "first", "last"]);
    assert_eq!(store.get_state().count, 2);
}

#[test]
fn test_nested_dispatch_completes_before_outer_pass_resumes() {
    let store = Store::new(counter, Counter::default());
    let log = new_log();

    // Subscriber A: on the first dispatch only, dispatch again from inside.
    {
        let store_handle = store.clone();
        let log = Rc::clone(&log);
        store.subscribe(move || {
            let count = store_handle.get_state().count;
            log.borrow_mut().push(format!("a:{}", count));
            if count == 1 {
                store_handle.dispatch(CounterAction::Add(10)).unwrap();
            }
        });
    }

    // Subscriber B: records what it sees.
    {
        let store_handle = store.clone();
        let log = Rc::clone(&log);
        store.subscribe(move || {
            log.borrow_mut()
                .push(format!("b:{}", store_handle.get_state().count));
        });
    }

    store.dispatch(CounterAction::Inc).unwrap();

    // Outer pass: a sees 1 and dispatches; the nested pass runs a and b with
    // 11; then the outer pass resumes with b, which also sees 11.
    assert_eq!(*log.borrow(), vec!["a:1", "a:11", "b:11", "b:11"]);
    assert_eq!(store.get_state().count, 11);
}

#[test]
fn test_unsubscribe_keeps_order_of_others() {
    let store = Store::new(counter, Counter::default());
    let log = new_log();

    let mut subscriptions = Vec::new();
    for name in ["a", "b", "c"] {
        let log = Rc::clone(&log);
        subscriptions.push(store.subscribe(move || log.borrow_mut().push(name.to_string())));
    }

    let b = subscriptions.remove(1);
    assert!(b.unsubscribe());
    assert_eq!(store.subscriber_count(), 2);

    store.dispatch(CounterAction::Inc).unwrap();
    assert_eq!(*log.borrow(), vec!["a", "c"]);
}

#[test]
fn test_unsubscribe_during_pass_does_not_disturb_it() {
    let store = Store::new(counter, Counter::default());
    let log = new_log();
    let victim: Rc<RefCell<Option<libcrowdfund::Subscription>>> = Rc::new(RefCell::new(None));

    {
        let log = Rc::clone(&log);
        let victim = Rc::clone(&victim);
        store.subscribe(move || {
            log.borrow_mut().push("remover".to_string());
            if let Some(subscription) = victim.borrow_mut().take() {
                subscription.unsubscribe();
            }
        });
    }
    {
        let log = Rc::clone(&log);
        let subscription = store.subscribe(move || log.borrow_mut().push("victim".to_string()));
        *victim.borrow_mut() = Some(subscription);
    }

    store.dispatch(CounterAction::Inc).unwrap();
    store.dispatch(CounterAction::Inc).unwrap();

    // The in-flight pass still reaches the victim; the next one does not.
    assert_eq!(*log.borrow(), vec!["remover", "victim", "remover"]);
}

#[test]
fn test_subscribe_during_pass_takes_effect_next_dispatch() {
    let store = Store::new(counter, Counter::default());
    let log = new_log();

    {
        let store_handle = store.clone();
        let log = Rc::clone(&log);
        store.subscribe(move || {
            if store_handle.get_state().count == 1 {
                let log = Rc::clone(&log);
                store_handle.subscribe(move || log.borrow_mut().push("late".to_string()));
            }
        });
    }

    store.dispatch(CounterAction::Inc).unwrap();
    assert!(log.borrow().is_empty());

    store.dispatch(CounterAction::Inc).unwrap();
    assert_eq!(*log.borrow(), vec!["late"]);
}

/// In-memory sink for formatted log events
#[derive(Clone, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn test_panicking_subscriber_is_logged_with_its_id() {
    let logs = LogBuffer::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .finish();

    let store = Store::new(counter, Counter::default());
    let _quiet = store.subscribe(|| {});
    let faulty = store.subscribe(|| panic!("widget exploded"));

    tracing::subscriber::with_default(subscriber, || {
        store.dispatch(CounterAction::Inc).unwrap();
    });

    let output = logs.contents();
    let line = output
        .lines()
        .find(|line| line.contains("Subscriber panicked during notification"))
        .expect("panic was not logged");
    assert!(line.contains("ERROR"));
    assert!(line.contains(&format!("subscriber={}", faulty.id())));
    assert!(line.contains("widget exploded"));
    assert_eq!(store.get_state().count, 1);
}

