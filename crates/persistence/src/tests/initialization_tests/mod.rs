// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Backend initialization tests.
//!
//! Every other persistence test opens its database through
//! `Persistence::new_in_memory()`, so migrations and foreign key
//! enforcement are exercised throughout; these tests pin the basics.

use super::{create_test_employee, create_test_persistence};
use crate::{Persistence, PersistenceError};

#[test]
fn test_persistence_initialization() {
    let result: Result<Persistence, PersistenceError> = Persistence::new_in_memory();
    assert!(result.is_ok());
}

#[test]
fn test_foreign_key_enforcement_is_enabled() {
    let mut persistence: Persistence = create_test_persistence();
    assert!(persistence.verify_foreign_key_enforcement().is_ok());
}

#[test]
fn test_multiple_in_memory_instances_are_isolated() {
    let mut db1: Persistence = create_test_persistence();
    let mut db2: Persistence = create_test_persistence();

    create_test_employee(&mut db1, "Alice", false);

    assert_eq!(db1.list_employees().unwrap().len(), 1);
    assert!(
        db2.list_employees().unwrap().is_empty(),
        "db2 must not see rows written to db1"
    );
}

#[test]
fn test_migrations_applied_on_initialization() {
    let mut persistence: Persistence = create_test_persistence();

    assert!(persistence.list_holidays().unwrap().is_empty());
    assert!(persistence.list_reassignments(None).unwrap().is_empty());
    assert!(persistence.get_audit_timeline(1).unwrap().is_empty());
}
