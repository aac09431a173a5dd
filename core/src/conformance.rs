//! Backend-agnostic conformance suite for `TodoStore` implementations.
//!
//! # Design
//! Each check receives a freshly constructed, empty store, drives it through
//! one scenario, and asserts on the observable results. Store errors that
//! are not part of the scenario propagate as `Err` so the failing operation
//! shows up in the test output.
//!
//! A backend is correct if and only if it passes every check unmodified.
//! Use [`todo_store_conformance!`](crate::todo_store_conformance) to get one
//! named `#[test]` per check:
//!
//! ```ignore
//! todo_core::todo_store_conformance!(memory_conformance, InMemoryTodoStore::new());
//! ```

use std::collections::HashSet;

use uuid::Uuid;

use crate::error::{StoreError, StoreResult};
use crate::store::TodoStore;
use crate::types::Todo;

/// Run every check, building a fresh store for each one.
pub fn run_all<S, F>(mut factory: F) -> StoreResult<()>
where
    S: TodoStore,
    F: FnMut() -> S,
{
    can_get_all_todos_in_creation_order(&factory())?;
    can_create_get_and_update_by_title(&factory())?;
    can_update_todo_by_id(&factory())?;
    can_delete_todo_by_id(&factory())?;
    assigns_unique_ids(&factory())?;
    update_title_and_status_are_isolated(&factory())?;
    get_by_title_miss_returns_zero_value(&factory())?;
    get_by_title_prefers_last_created(&factory())?;
    updates_of_unknown_id_return_zero_value(&factory())?;
    delete_of_unknown_id_is_not_found(&factory())?;
    replace_with_colliding_id_is_rejected(&factory())?;
    Ok(())
}

fn assert_fresh(todo: &Todo, title: &str) {
    assert!(!todo.is_unset(), "created todo must carry an id");
    assert_eq!(todo.title, title, "created todo title");
    assert!(!todo.completed, "created todo must start open");
}

pub fn can_get_all_todos_in_creation_order<S: TodoStore + ?Sized>(sut: &S) -> StoreResult<()> {
    assert!(sut.get_todo_all()?.is_empty(), "fresh store must be empty");

    let want = ["Todo1", "Todo2", "Todo3"];
    for title in want {
        sut.create_todo(title)?;
    }

    let got = sut.get_todo_all()?;
    let titles: Vec<&str> = got.iter().map(|todo| todo.title.as_str()).collect();
    assert_eq!(titles, want, "get_todo_all() order");
    assert!(got.iter().all(|todo| !todo.completed));
    Ok(())
}

pub fn can_create_get_and_update_by_title<S: TodoStore + ?Sized>(sut: &S) -> StoreResult<()> {
    let new_todo = sut.create_todo("Todo_new")?;
    assert_fresh(&new_todo, "Todo_new");
    let got = sut.get_todo_by_title("Todo_new")?;
    assert_eq!(got, new_todo, "get_todo_by_title()");

    let want = Todo {
        title: "Todo_updated".to_string(),
        ..got
    };
    let updated = sut.update_todo_title(want.id, "Todo_updated")?;
    assert_eq!(updated, want, "update_todo_title()");
    assert_eq!(sut.get_todo_by_title("Todo_updated")?, want, "get_todo_by_title()");

    let want = Todo {
        completed: true,
        ..want
    };
    let updated = sut.update_todo_status(want.id, true)?;
    assert_eq!(updated, want, "update_todo_status()");
    assert_eq!(sut.get_todo_by_title("Todo_updated")?, want, "get_todo_by_title()");
    Ok(())
}

pub fn can_update_todo_by_id<S: TodoStore + ?Sized>(sut: &S) -> StoreResult<()> {
    let new_todo = sut.create_todo("Todo_new")?;
    assert_fresh(&new_todo, "Todo_new");
    let got = sut.get_todo_by_id(new_todo.id)?;
    assert_eq!(got, new_todo, "get_todo_by_id()");

    let want = Todo {
        id: got.id,
        title: "Todo_updated".to_string(),
        completed: true,
    };
    let updated = sut.update_todo_by_id(want.id, want.clone())?;
    assert_eq!(updated, want, "update_todo_by_id()");
    assert_eq!(sut.get_todo_by_id(updated.id)?, want, "get_todo_by_id()");
    Ok(())
}

pub fn can_delete_todo_by_id<S: TodoStore + ?Sized>(sut: &S) -> StoreResult<()> {
    let new_todo = sut.create_todo("Delete_this")?;
    assert_fresh(&new_todo, "Delete_this");
    let got = sut.get_todo_by_id(new_todo.id)?;
    assert_eq!(got, new_todo, "get_todo_by_id()");

    let deleted = sut.delete_todo_by_id(got.id)?;
    assert_eq!(deleted, new_todo, "delete_todo_by_id()");

    match sut.get_todo_by_id(got.id) {
        Err(StoreError::NotFound(id)) => assert_eq!(id, got.id),
        other => panic!("get_todo_by_id() after delete: expected NotFound, got {other:?}"),
    }
    assert!(sut.get_todo_all()?.is_empty(), "get_todo_all() after delete");
    Ok(())
}

pub fn assigns_unique_ids<S: TodoStore + ?Sized>(sut: &S) -> StoreResult<()> {
    let mut seen = HashSet::new();
    for _ in 0..16 {
        let todo = sut.create_todo("same title")?;
        assert!(seen.insert(todo.id), "duplicate id {}", todo.id);
    }

    // An id freed by a delete must not be handed out again.
    let victim = sut.get_todo_all()?[3].id;
    sut.delete_todo_by_id(victim)?;
    let next = sut.create_todo("after delete")?;
    assert!(seen.insert(next.id), "reused id {}", next.id);
    Ok(())
}

pub fn update_title_and_status_are_isolated<S: TodoStore + ?Sized>(sut: &S) -> StoreResult<()> {
    let todo = sut.create_todo("Todo_new")?;

    let done = sut.update_todo_status(todo.id, true)?;
    assert_eq!(done.title, "Todo_new", "status update must keep title");
    assert!(done.completed);

    let renamed = sut.update_todo_title(todo.id, "Renamed")?;
    assert!(renamed.completed, "title update must keep status");
    assert_eq!(renamed.title, "Renamed");

    let want = Todo {
        id: todo.id,
        title: "Renamed".to_string(),
        completed: true,
    };
    assert_eq!(sut.get_todo_by_id(todo.id)?, want);
    Ok(())
}

pub fn get_by_title_miss_returns_zero_value<S: TodoStore + ?Sized>(sut: &S) -> StoreResult<()> {
    sut.create_todo("present")?;
    assert_eq!(sut.get_todo_by_title("absent")?, Todo::default());
    Ok(())
}

pub fn get_by_title_prefers_last_created<S: TodoStore + ?Sized>(sut: &S) -> StoreResult<()> {
    sut.create_todo("dup")?;
    sut.create_todo("other")?;
    let last = sut.create_todo("dup")?;
    assert_eq!(sut.get_todo_by_title("dup")?, last);
    Ok(())
}

pub fn updates_of_unknown_id_return_zero_value<S: TodoStore + ?Sized>(
    sut: &S,
) -> StoreResult<()> {
    let existing = sut.create_todo("untouched")?;
    let unknown = Uuid::new_v4();

    assert_eq!(sut.update_todo_title(unknown, "x")?, Todo::default());
    assert_eq!(sut.update_todo_status(unknown, true)?, Todo::default());
    assert_eq!(
        sut.update_todo_by_id(unknown, Todo::new("x"))?,
        Todo::default()
    );
    assert_eq!(sut.get_todo_all()?, vec![existing], "store must be unchanged");
    Ok(())
}

pub fn delete_of_unknown_id_is_not_found<S: TodoStore + ?Sized>(sut: &S) -> StoreResult<()> {
    let unknown = Uuid::new_v4();
    match sut.delete_todo_by_id(unknown) {
        Err(StoreError::NotFound(id)) => assert_eq!(id, unknown),
        other => panic!("delete_todo_by_id() of unknown id: expected NotFound, got {other:?}"),
    }
    Ok(())
}

pub fn replace_with_colliding_id_is_rejected<S: TodoStore + ?Sized>(
    sut: &S,
) -> StoreResult<()> {
    let a = sut.create_todo("a")?;
    let b = sut.create_todo("b")?;

    let clash = Todo {
        id: b.id,
        title: "x".to_string(),
        completed: true,
    };
    match sut.update_todo_by_id(a.id, clash) {
        Err(StoreError::Validation(_)) => {}
        other => panic!("update_todo_by_id() onto a live id: expected Validation, got {other:?}"),
    }
    assert_eq!(sut.get_todo_all()?, vec![a.clone(), b], "store must be unchanged");

    // A fresh id is stored verbatim at the target's position.
    let moved = Todo::new("moved");
    assert_eq!(sut.update_todo_by_id(a.id, moved.clone())?, moved);
    assert!(matches!(sut.get_todo_by_id(a.id), Err(StoreError::NotFound(_))));
    assert_eq!(sut.get_todo_all()?[0], moved);
    Ok(())
}

/// Expand to a module with one `#[test]` per conformance check.
///
/// `$factory` is evaluated once per test and must produce a fresh, empty
/// store. It is expanded inside the generated module, which glob-imports the
/// parent's names.
#[macro_export]
macro_rules! todo_store_conformance {
    ($name:ident, $factory:expr) => {
        mod $name {
            #[allow(unused_imports)]
            use super::*;

            $crate::todo_store_conformance!(
                @checks $factory;
                can_get_all_todos_in_creation_order,
                can_create_get_and_update_by_title,
                can_update_todo_by_id,
                can_delete_todo_by_id,
                assigns_unique_ids,
                update_title_and_status_are_isolated,
                get_by_title_miss_returns_zero_value,
                get_by_title_prefers_last_created,
                updates_of_unknown_id_return_zero_value,
                delete_of_unknown_id_is_not_found,
                replace_with_colliding_id_is_rejected,
            );
        }
    };
    (@checks $factory:expr; $($check:ident),* $(,)?) => {
        $(
            #[test]
            fn $check() {
                let store = $factory;
                if let Err(err) = $crate::conformance::$check(&store) {
                    panic!("{}: {}", stringify!($check), err);
                }
            }
        )*
    };
}
