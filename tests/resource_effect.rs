//! End-to-end tests for the resource effect lifecycle.
//!
//! The fixture mirrors a chat connection: created per room, updated in
//! place when the user options change, disconnected on room change or
//! unmount. Every observable callback appends to a shared event log.

use std::cell::RefCell;
use std::rc::Rc;

use spark_hooks::{deps, use_memo, use_resource_effect, BoxError, CommitError, Root};

type Log = Rc<RefCell<Vec<String>>>;

fn log(events: &Log, entry: String) {
    events.borrow_mut().push(entry);
}

fn drain(events: &Log) -> Vec<String> {
    std::mem::take(&mut *events.borrow_mut())
}

// =============================================================================
// Connection fixture
// =============================================================================

/// Chat connection resource. Options are set after construction, by the
/// update pass that always follows create.
struct Connection {
    room_id: i64,
    username: RefCell<Option<String>>,
    events: Log,
}

impl Connection {
    fn open(room_id: i64, events: Log) -> Self {
        let conn = Connection {
            room_id,
            username: RefCell::new(None),
            events,
        };
        log(&conn.events, format!("create({}, {})", conn.room_id, conn.user()));
        conn
    }

    fn user(&self) -> String {
        self.username.borrow().clone().unwrap_or_else(|| "none".to_string())
    }

    fn set_username(&self, username: &str) {
        *self.username.borrow_mut() = Some(username.to_string());
        log(&self.events, format!("update({}, {})", self.room_id, self.user()));
    }

    fn disconnect(&self) {
        log(&self.events, format!("disconnect({}, {})", self.room_id, self.user()));
    }
}

/// The component body: one memo for the options, one resource effect for
/// the connection. Create deps key the resource to the room; update deps
/// key the in-place mutation to the memoized options.
fn chat_room(events: &Log, room_id: i64, username: &'static str) -> impl FnOnce() + 'static {
    let events = events.clone();
    move || {
        let opts = use_memo(move || username.to_string(), deps![username]);
        let create_events = events.clone();
        let update_opts = opts.clone();
        use_resource_effect(
            move || Ok(Connection::open(room_id, create_events)),
            deps![room_id],
            move |conn: Rc<Connection>| {
                conn.set_username(&update_opts);
                Ok(conn)
            },
            deps![opts],
            |conn: Rc<Connection>| {
                conn.disconnect();
                Ok(())
            },
        );
    }
}

// =============================================================================
// Lifecycle
// =============================================================================

#[test]
fn test_mount_update_replace_unmount() {
    let events: Log = Rc::new(RefCell::new(Vec::new()));
    let mut root = Root::new();

    // First mount creates, then immediately updates.
    root.render(chat_room(&events, 1, "Jack"));
    assert_eq!(drain(&events), vec!["create(1, none)", "update(1, Jack)"]);

    // Only the username changed: update in place, no create, no
    // disconnect, same connection.
    root.render(chat_room(&events, 1, "Lauren"));
    assert_eq!(drain(&events), vec!["update(1, Lauren)"]);

    // Room changed: full replacement, internally ordered. The fresh
    // connection has no username until the update pass that follows create.
    root.render(chat_room(&events, 2, "Lauren"));
    assert_eq!(
        drain(&events),
        vec!["disconnect(1, Lauren)", "create(2, none)", "update(2, Lauren)"]
    );

    // Unmount disconnects the current room/user pair.
    root.unmount();
    assert_eq!(drain(&events), vec!["disconnect(2, Lauren)"]);

    assert!(root.take_errors().is_empty());
}

#[test]
fn test_unchanged_deps_invoke_nothing() {
    let events: Log = Rc::new(RefCell::new(Vec::new()));
    let mut root = Root::new();

    root.render(chat_room(&events, 1, "Jack"));
    drain(&events);

    // Same props, three more commits: zero callbacks.
    for _ in 0..3 {
        root.render(chat_room(&events, 1, "Jack"));
    }
    assert!(drain(&events).is_empty());
    assert!(root.take_errors().is_empty());
}

#[test]
fn test_memo_keeps_token_identity_across_commits() {
    let events: Log = Rc::new(RefCell::new(Vec::new()));
    let mut root = Root::new();

    root.render(chat_room(&events, 1, "Jack"));
    drain(&events);

    // The memo recomputes only when username changes; while it is stable
    // the update deps compare unchanged by token identity.
    root.render(chat_room(&events, 1, "Jack"));
    assert!(drain(&events).is_empty());

    root.render(chat_room(&events, 1, "Lauren"));
    assert_eq!(drain(&events), vec!["update(1, Lauren)"]);
}

#[test]
fn test_discarded_render_has_no_observable_effect() {
    let events: Log = Rc::new(RefCell::new(Vec::new()));
    let mut root = Root::new();

    root.render(chat_room(&events, 1, "Jack"));
    drain(&events);

    // Speculative render pass, dropped before commit.
    let pending = root.prepare(chat_room(&events, 2, "Lauren"));
    drop(pending);
    assert!(drain(&events).is_empty());

    // Committed state is still room 1 / Jack: the same props are a no-op,
    // and a real room change still destroys the room-1 connection.
    root.render(chat_room(&events, 1, "Jack"));
    assert!(drain(&events).is_empty());

    root.render(chat_room(&events, 2, "Jack"));
    assert_eq!(
        drain(&events),
        vec!["disconnect(1, Jack)", "create(2, none)", "update(2, Jack)"]
    );
}

#[test]
fn test_remount_after_unmount_is_fresh() {
    let events: Log = Rc::new(RefCell::new(Vec::new()));
    let mut root = Root::new();

    root.render(chat_room(&events, 1, "Jack"));
    root.unmount();
    drain(&events);

    root.render(chat_room(&events, 1, "Jack"));
    assert_eq!(drain(&events), vec!["create(1, none)", "update(1, Jack)"]);
}

// =============================================================================
// Failure semantics
// =============================================================================

/// Component whose create fails while `fail` is true.
fn flaky_room(events: &Log, room_id: i64, fail: bool) -> impl FnOnce() + 'static {
    let events = events.clone();
    move || {
        let create_events = events.clone();
        use_resource_effect(
            move || {
                if fail {
                    Err(BoxError::from("connection refused"))
                } else {
                    Ok(Connection::open(room_id, create_events))
                }
            },
            deps![room_id],
            |conn: Rc<Connection>| {
                conn.set_username("Jack");
                Ok(conn)
            },
            deps![room_id],
            |conn: Rc<Connection>| {
                conn.disconnect();
                Ok(())
            },
        );
    }
}

#[test]
fn test_create_failure_surfaces_and_never_destroys() {
    let events: Log = Rc::new(RefCell::new(Vec::new()));
    let mut root = Root::new();

    root.render(flaky_room(&events, 1, true));
    assert!(drain(&events).is_empty());
    assert!(matches!(
        root.take_errors().as_slice(),
        [CommitError::CreateFailed { slot: 0, .. }]
    ));

    // Same deps: no retry, no callbacks.
    root.render(flaky_room(&events, 1, true));
    assert!(drain(&events).is_empty());
    assert!(root.take_errors().is_empty());

    // Deps change: recreate without destroying the never-created handle.
    root.render(flaky_room(&events, 2, false));
    assert_eq!(drain(&events), vec!["create(2, none)", "update(2, Jack)"]);
    assert!(root.take_errors().is_empty());

    root.unmount();
    assert_eq!(drain(&events), vec!["disconnect(2, Jack)"]);
}

#[test]
fn test_update_failure_keeps_resource_alive() {
    let events: Log = Rc::new(RefCell::new(Vec::new()));
    let mut root = Root::new();

    let render = |events: &Log, attempt: i64, fail_update: bool| {
        let events = events.clone();
        move || {
            let create_events = events.clone();
            use_resource_effect(
                move || Ok(Connection::open(7, create_events)),
                deps![7],
                move |conn: Rc<Connection>| {
                    if fail_update {
                        Err(BoxError::from("update failed"))
                    } else {
                        conn.set_username("Jack");
                        Ok(conn)
                    }
                },
                deps![attempt],
                |conn: Rc<Connection>| {
                    conn.disconnect();
                    Ok(())
                },
            );
        }
    };

    root.render(render(&events, 1, false));
    drain(&events);

    root.render(render(&events, 2, true));
    assert!(matches!(
        root.take_errors().as_slice(),
        [CommitError::UpdateFailed { slot: 0, .. }]
    ));

    // The handle survived the failed update and is destroyed on unmount.
    root.unmount();
    assert_eq!(drain(&events), vec!["disconnect(7, Jack)"]);
}

// =============================================================================
// Multiple call sites
// =============================================================================

#[test]
fn test_sibling_slots_run_in_declaration_order() {
    let events: Log = Rc::new(RefCell::new(Vec::new()));
    let mut root = Root::new();

    let render = |events: &Log, room_a: i64, room_b: i64| {
        let events = events.clone();
        move || {
            let (a, b) = (events.clone(), events.clone());
            use_resource_effect(
                move || Ok(Connection::open(room_a, a)),
                deps![room_a],
                |conn: Rc<Connection>| {
                    conn.set_username("A");
                    Ok(conn)
                },
                deps![room_a],
                |conn: Rc<Connection>| {
                    conn.disconnect();
                    Ok(())
                },
            );
            use_resource_effect(
                move || Ok(Connection::open(room_b, b)),
                deps![room_b],
                |conn: Rc<Connection>| {
                    conn.set_username("B");
                    Ok(conn)
                },
                deps![room_b],
                |conn: Rc<Connection>| {
                    conn.disconnect();
                    Ok(())
                },
            );
        }
    };

    root.render(render(&events, 1, 2));
    assert_eq!(
        drain(&events),
        vec!["create(1, none)", "update(1, A)", "create(2, none)", "update(2, B)"]
    );

    // Each slot's replacement is internally ordered; slots execute in
    // declaration order within the commit.
    root.render(render(&events, 3, 4));
    assert_eq!(
        drain(&events),
        vec![
            "disconnect(1, A)",
            "create(3, none)",
            "update(3, A)",
            "disconnect(2, B)",
            "create(4, none)",
            "update(4, B)",
        ]
    );

    // Only the second slot changes: the first stays untouched.
    root.render(render(&events, 3, 5));
    assert_eq!(
        drain(&events),
        vec!["disconnect(4, B)", "create(5, none)", "update(5, B)"]
    );

    root.unmount();
    assert_eq!(drain(&events), vec!["disconnect(3, A)", "disconnect(5, B)"]);
}

#[test]
fn test_hook_kind_change_remounts_call_site() {
    let events: Log = Rc::new(RefCell::new(Vec::new()));
    let mut root = Root::new();

    root.render(chat_room(&events, 1, "Jack"));
    drain(&events);

    // Slot 0 was a memo; now render a body whose slot 0 is a resource
    // effect. The violation is reported and the old slots are released.
    let create_events = events.clone();
    root.render(move || {
        use_resource_effect(
            move || Ok(Connection::open(9, create_events)),
            deps![9],
            |conn: Rc<Connection>| {
                conn.set_username("Kate");
                Ok(conn)
            },
            deps![9],
            |conn: Rc<Connection>| {
                conn.disconnect();
                Ok(())
            },
        );
    });

    let errors = root.take_errors();
    assert!(errors
        .iter()
        .any(|e| matches!(e, CommitError::HookOrderViolation { .. })));
    // The new call site mounts in declaration order; the removed trailing
    // call site is released after the staged hooks, exactly once.
    assert_eq!(
        drain(&events),
        vec!["create(9, none)", "update(9, Kate)", "disconnect(1, Jack)"]
    );

    root.unmount();
    assert_eq!(drain(&events), vec!["disconnect(9, Kate)"]);
}
