// Copyright (C) 2026 NPLBAM contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{
    AccountForm, AccountFormError, AccountFormValidator, AccountInfo, AccountPolicy,
    AccountValidation,
};

fn create_test_form(
    username: &str,
    password: &str,
    password_verify: &str,
    user_level: &str,
    rescue_id: &str,
    pound_id: &str,
) -> AccountForm {
    AccountForm {
        username: username.to_string(),
        password: password.to_string(),
        password_verify: password_verify.to_string(),
        user_level: user_level.to_string(),
        rescue_id: rescue_id.to_string(),
        pound_id: pound_id.to_string(),
    }
}

fn create_valid_form() -> AccountForm {
    create_test_form("alice", "Password1!", "Password1!", "2", "", "")
}

#[test]
fn test_valid_new_account() {
    let validator: AccountFormValidator = AccountFormValidator::default();

    let result: AccountValidation = validator.validate(&create_valid_form(), false);

    assert!(result.is_valid());
    assert!(result.errors.is_empty());
    assert!(result.account.valid);
    assert_eq!(result.account.username, "alice");
    assert!(result.account.password_set);
    assert_eq!(result.account.password, "Password1!");
    assert_eq!(result.account.user_level, 2);
    assert!(!result.account.rescue_set);
    assert!(!result.account.pound_set);
}

#[test]
fn test_editing_with_blank_password_keeps_existing_password() {
    let validator: AccountFormValidator = AccountFormValidator::default();
    let form: AccountForm = create_test_form("alice", "", "", "2", "", "");

    let result: AccountValidation = validator.validate(&form, true);

    assert!(result.is_valid());
    assert!(result.errors.is_empty());
    assert!(!result.account.password_set);
    assert!(result.account.password.is_empty());
}

#[test]
fn test_editing_with_new_password_checks_strength() {
    let validator: AccountFormValidator = AccountFormValidator::default();
    let form: AccountForm = create_test_form("alice", "password", "password", "2", "", "");

    let result: AccountValidation = validator.validate(&form, true);

    assert!(!result.is_valid());
    assert!(result.account.password_set);
    assert_eq!(
        result.errors,
        vec![AccountFormError::InsufficientEntropy {
            required: 64,
            found: 37
        }]
    );
}

#[test]
fn test_new_account_with_blank_password_is_rejected() {
    let validator: AccountFormValidator = AccountFormValidator::default();
    let form: AccountForm = create_test_form("alice", "", "", "2", "", "");

    let result: AccountValidation = validator.validate(&form, false);

    assert!(!result.is_valid());
    assert!(result.account.password_set);
    // The strength check still runs against the empty password
    assert_eq!(
        result.errors,
        vec![
            AccountFormError::PasswordRequired,
            AccountFormError::InsufficientEntropy {
                required: 64,
                found: 0
            },
        ]
    );
}

#[test]
fn test_blank_password_with_confirmation_on_edit_is_a_mismatch() {
    let validator: AccountFormValidator = AccountFormValidator::default();
    let form: AccountForm = create_test_form("alice", "", "Password1!", "2", "", "");

    let result: AccountValidation = validator.validate(&form, true);

    assert!(!result.is_valid());
    assert!(!result.account.password_set);
    assert_eq!(result.errors, vec![AccountFormError::PasswordMismatch]);
}

#[test]
fn test_multiple_errors_are_all_reported_in_order() {
    let validator: AccountFormValidator = AccountFormValidator::default();
    let form: AccountForm = create_test_form("", "abc", "xyz", "99", "abc", "");

    let result: AccountValidation = validator.validate(&form, false);

    assert!(!result.is_valid());
    assert_eq!(
        result.errors,
        vec![
            AccountFormError::UsernameRequired,
            AccountFormError::PasswordMismatch,
            AccountFormError::InsufficientEntropy {
                required: 64,
                found: 14
            },
            AccountFormError::UserLevelOutOfBounds { level: 99, max: 5 },
            AccountFormError::RescueIdNotANumber,
        ]
    );

    let messages: Vec<String> = result.messages();
    assert_eq!(messages.len(), 5);
    assert_eq!(messages[0], "A username is required.");
    assert_eq!(messages[1], "The passwords entered do not match.");
    assert!(messages[2].contains("64 bits"));
    assert!(messages[2].contains("14 bits of entropy"));
    assert_eq!(messages[3], "User level is out of bounds");
    assert_eq!(
        messages[4],
        "Rescue ID field filled out, and is not a number."
    );

    // Entered values are kept for redisplay
    assert_eq!(result.account.user_level, 99);
    assert!(result.account.rescue_set);
    assert_eq!(result.account.rescue_id, 0);
    assert!(!result.account.pound_set);
}

#[test]
fn test_user_level_not_a_number() {
    let validator: AccountFormValidator = AccountFormValidator::default();

    for raw in ["", "two", "2.5", "0x2"] {
        let mut form: AccountForm = create_valid_form();
        form.user_level = raw.to_string();

        let result: AccountValidation = validator.validate(&form, false);

        assert_eq!(
            result.errors,
            vec![AccountFormError::UserLevelNotANumber],
            "user level {raw:?}"
        );
        assert_eq!(result.account.user_level, 0);
        assert!(!result.account.valid);
    }
}

#[test]
fn test_user_level_bounds() {
    let validator: AccountFormValidator = AccountFormValidator::default();

    for (raw, expected, in_bounds) in [
        ("0", 0, true),
        ("5", 5, true),
        (" 3 ", 3, true),
        ("+4", 4, true),
        ("6", 6, false),
        ("-1", -1, false),
    ] {
        let mut form: AccountForm = create_valid_form();
        form.user_level = raw.to_string();

        let result: AccountValidation = validator.validate(&form, false);

        assert_eq!(result.account.user_level, expected, "user level {raw:?}");
        assert_eq!(result.is_valid(), in_bounds, "user level {raw:?}");
    }
}

#[test]
fn test_user_level_too_large_for_i64_is_out_of_bounds() {
    let validator: AccountFormValidator = AccountFormValidator::default();

    for (raw, expected) in [
        ("99999999999999999999", i64::MAX),
        ("-99999999999999999999", i64::MIN),
    ] {
        let mut form: AccountForm = create_valid_form();
        form.user_level = raw.to_string();

        let result: AccountValidation = validator.validate(&form, false);

        assert_eq!(
            result.errors,
            vec![AccountFormError::UserLevelOutOfBounds {
                level: expected,
                max: 5
            }],
            "user level {raw:?}"
        );
        assert_eq!(result.messages(), vec![String::from("User level is out of bounds")]);
        assert_eq!(result.account.user_level, expected);
    }
}

#[test]
fn test_ids_too_large_for_i64_are_out_of_range() {
    let validator: AccountFormValidator = AccountFormValidator::default();
    let form: AccountForm = create_test_form(
        "alice",
        "Password1!",
        "Password1!",
        "2",
        "99999999999999999999",
        "-99999999999999999999",
    );

    let result: AccountValidation = validator.validate(&form, false);

    assert_eq!(
        result.errors,
        vec![
            AccountFormError::RescueIdOutOfRange,
            AccountFormError::PoundIdOutOfRange,
        ]
    );
    assert!(result.account.rescue_set);
    assert_eq!(result.account.rescue_id, 0);
    assert!(result.account.pound_set);
    assert_eq!(result.account.pound_id, 0);
}

#[test]
fn test_ids_at_i64_limits_are_accepted() {
    let validator: AccountFormValidator = AccountFormValidator::default();
    let form: AccountForm = create_test_form(
        "alice",
        "Password1!",
        "Password1!",
        "2",
        "9223372036854775807",
        "-9223372036854775808",
    );

    let result: AccountValidation = validator.validate(&form, false);

    assert!(result.is_valid());
    assert_eq!(result.account.rescue_id, i64::MAX);
    assert_eq!(result.account.pound_id, i64::MIN);
}

#[test]
fn test_user_level_bounds_follow_policy() {
    let validator: AccountFormValidator = AccountFormValidator::new(AccountPolicy::new(2, 64));
    let mut form: AccountForm = create_valid_form();
    form.user_level = String::from("3");

    let result: AccountValidation = validator.validate(&form, false);

    assert_eq!(
        result.errors,
        vec![AccountFormError::UserLevelOutOfBounds { level: 3, max: 2 }]
    );
}

#[test]
fn test_entropy_minimum_follows_policy() {
    let lenient: AccountFormValidator = AccountFormValidator::new(AccountPolicy::new(5, 30));
    let mut form: AccountForm = create_valid_form();
    form.password = String::from("password");
    form.password_verify = String::from("password");

    assert!(lenient.validate(&form, false).is_valid());

    let strict: AccountFormValidator = AccountFormValidator::new(AccountPolicy::new(5, 66));
    let result: AccountValidation = strict.validate(&create_valid_form(), false);
    assert_eq!(
        result.errors,
        vec![AccountFormError::InsufficientEntropy {
            required: 66,
            found: 65
        }]
    );
}

#[test]
fn test_optional_ids_are_parsed() {
    let validator: AccountFormValidator = AccountFormValidator::default();
    let form: AccountForm = create_test_form("alice", "Password1!", "Password1!", "2", "42", "7");

    let result: AccountValidation = validator.validate(&form, false);

    assert!(result.is_valid());
    assert!(result.account.rescue_set);
    assert_eq!(result.account.rescue_id, 42);
    assert!(result.account.pound_set);
    assert_eq!(result.account.pound_id, 7);
}

#[test]
fn test_pound_id_not_a_number() {
    let validator: AccountFormValidator = AccountFormValidator::default();
    let form: AccountForm =
        create_test_form("alice", "Password1!", "Password1!", "2", "", "pound");

    let result: AccountValidation = validator.validate(&form, false);

    assert_eq!(result.errors, vec![AccountFormError::PoundIdNotANumber]);
    assert_eq!(
        result.messages(),
        vec![String::from(
            "Pound ID field filled out, and is not a number."
        )]
    );
    assert!(result.account.pound_set);
    assert_eq!(result.account.pound_id, 0);
    assert!(!result.account.rescue_set);
}

#[test]
fn test_whitespace_only_id_is_filled_out() {
    let validator: AccountFormValidator = AccountFormValidator::default();
    let mut form: AccountForm = create_valid_form();
    form.rescue_id = String::from("  ");

    let result: AccountValidation = validator.validate(&form, false);

    assert_eq!(result.errors, vec![AccountFormError::RescueIdNotANumber]);
    assert!(result.account.rescue_set);
}

#[test]
fn test_blank_ids_reset_between_calls() {
    let validator: AccountFormValidator = AccountFormValidator::default();
    let with_id: AccountForm = create_test_form("alice", "Password1!", "Password1!", "2", "42", "");
    let without_id: AccountForm = create_valid_form();

    let first: AccountValidation = validator.validate(&with_id, false);
    let second: AccountValidation = validator.validate(&without_id, false);

    assert!(first.account.rescue_set);
    assert!(!second.account.rescue_set);
    assert_eq!(second.account.rescue_id, 0);
}

#[test]
fn test_validation_is_idempotent() {
    let validator: AccountFormValidator = AccountFormValidator::default();
    let form: AccountForm = create_test_form("", "abc", "xyz", "99", "abc", "x");

    let first: AccountValidation = validator.validate(&form, false);
    let second: AccountValidation = validator.validate(&form, false);

    assert_eq!(first, second);
    assert_eq!(first.messages(), second.messages());
}

#[test]
fn test_into_parts_returns_messages() {
    let validator: AccountFormValidator = AccountFormValidator::default();
    let mut form: AccountForm = create_valid_form();
    form.username = String::new();

    let (account, messages): (AccountInfo, Vec<String>) =
        validator.validate(&form, false).into_parts();

    assert!(!account.valid);
    assert_eq!(messages, vec![String::from("A username is required.")]);
}

#[test]
fn test_account_form_reads_wire_field_names() {
    let form: AccountForm = serde_json::from_str(
        r#"{"username":"bob","password":"pw","passwordVerify":"pw","userLVL":"1","rescueID":"3"}"#,
    )
    .unwrap();

    assert_eq!(form.username, "bob");
    assert_eq!(form.password_verify, "pw");
    assert_eq!(form.user_level, "1");
    assert_eq!(form.rescue_id, "3");
    // Missing fields read as empty
    assert!(form.pound_id.is_empty());
}

#[test]
fn test_password_is_never_exposed() {
    let validator: AccountFormValidator = AccountFormValidator::default();
    let form: AccountForm = create_valid_form();
    let result: AccountValidation = validator.validate(&form, false);

    let debug: String = format!("{result:?} {form:?}");
    assert!(!debug.contains("Password1!"));

    let json: serde_json::Value = serde_json::to_value(&result.account).unwrap();
    assert!(json.get("password").is_none());
    assert_eq!(json["password_set"], true);
    assert_eq!(json["user_level"], 2);
}
