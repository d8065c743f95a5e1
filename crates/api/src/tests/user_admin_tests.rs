// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::auth::Caller;
use crate::error::ApiError;
use crate::request_response::UserInfo;
use crate::tests::{create_caller, create_test_store};
use crate::{change_role, delete_user, list_users, set_suspended};
use wash_track_domain::Role;
use wash_track_persistence::SqliteStore;

#[test]
fn test_admin_sees_all_users() {
    let mut store: SqliteStore = create_test_store();
    let admin: Caller = create_caller(&mut store, Role::Admin);
    create_caller(&mut store, Role::Manager);
    create_caller(&mut store, Role::Staff);

    let users: Vec<UserInfo> = list_users(&mut store, &admin).unwrap();

    assert_eq!(users.len(), 3);
}

#[test]
fn test_manager_sees_only_staff() {
    let mut store: SqliteStore = create_test_store();
    create_caller(&mut store, Role::Admin);
    let manager: Caller = create_caller(&mut store, Role::Manager);
    let staff: Caller = create_caller(&mut store, Role::Staff);

    let users: Vec<UserInfo> = list_users(&mut store, &manager).unwrap();

    assert_eq!(users.len(), 1);
    assert_eq!(users[0].id, staff.user_id);
    assert_eq!(users[0].role, "staff");
}

#[test]
fn test_admin_promotes_staff_to_manager() {
    let mut store: SqliteStore = create_test_store();
    let admin: Caller = create_caller(&mut store, Role::Admin);
    let staff: Caller = create_caller(&mut store, Role::Staff);

    let updated: UserInfo = change_role(&mut store, &admin, staff.user_id, "manager").unwrap();

    assert_eq!(updated.role, "manager");
}

#[test]
fn test_admin_cannot_change_own_role() {
    let mut store: SqliteStore = create_test_store();
    let admin: Caller = create_caller(&mut store, Role::Admin);

    let result = change_role(&mut store, &admin, admin.user_id, "staff");

    assert!(matches!(result, Err(ApiError::InvalidInput { .. })));
}

#[test]
fn test_unknown_role_value_is_rejected() {
    let mut store: SqliteStore = create_test_store();
    let admin: Caller = create_caller(&mut store, Role::Admin);
    let staff: Caller = create_caller(&mut store, Role::Staff);

    let result = change_role(&mut store, &admin, staff.user_id, "superuser");

    assert!(matches!(result, Err(ApiError::InvalidInput { .. })));
}

#[test]
fn test_change_role_on_missing_user_is_not_found() {
    let mut store: SqliteStore = create_test_store();
    let admin: Caller = create_caller(&mut store, Role::Admin);

    let result = change_role(&mut store, &admin, 9999, "manager");

    assert!(matches!(result, Err(ApiError::ResourceNotFound { .. })));
}

#[test]
fn test_suspend_and_reinstate() {
    let mut store: SqliteStore = create_test_store();
    let admin: Caller = create_caller(&mut store, Role::Admin);
    let staff: Caller = create_caller(&mut store, Role::Staff);

    let suspended: UserInfo = set_suspended(&mut store, &admin, staff.user_id, true).unwrap();
    assert!(suspended.suspended);

    let restored: UserInfo = set_suspended(&mut store, &admin, staff.user_id, false).unwrap();
    assert!(!restored.suspended);
}

#[test]
fn test_delete_user_then_listing_shrinks() {
    let mut store: SqliteStore = create_test_store();
    let admin: Caller = create_caller(&mut store, Role::Admin);
    let staff: Caller = create_caller(&mut store, Role::Staff);

    delete_user(&mut store, &admin, staff.user_id).unwrap();

    let users: Vec<UserInfo> = list_users(&mut store, &admin).unwrap();
    assert_eq!(users.len(), 1);
    assert!(matches!(
        delete_user(&mut store, &admin, staff.user_id),
        Err(ApiError::ResourceNotFound { .. })
    ));
}

#[test]
fn test_manager_cannot_administer_users() {
    let mut store: SqliteStore = create_test_store();
    let manager: Caller = create_caller(&mut store, Role::Manager);
    let staff: Caller = create_caller(&mut store, Role::Staff);

    assert!(matches!(
        change_role(&mut store, &manager, staff.user_id, "manager"),
        Err(ApiError::Unauthorized { .. })
    ));
    assert!(matches!(
        set_suspended(&mut store, &manager, staff.user_id, true),
        Err(ApiError::Unauthorized { .. })
    ));
    assert!(matches!(
        delete_user(&mut store, &manager, staff.user_id),
        Err(ApiError::Unauthorized { .. })
    ));
}

#[test]
fn test_user_listing_never_carries_password_hash() {
    let mut store: SqliteStore = create_test_store();
    let admin: Caller = create_caller(&mut store, Role::Admin);

    let users: Vec<UserInfo> = list_users(&mut store, &admin).unwrap();
    let payload: String = serde_json::to_string(&users).unwrap();

    assert!(!payload.contains("password"));
}
