// Copyright (C) 2026 NPLBAM contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Account form validation.
//!
//! The new account and edit account pages submit the same six fields.
//! [`AccountFormValidator::validate`] checks all of them in one pass and
//! reports every violation, so the user can fix the whole form at once.

use serde::{Deserialize, Serialize};
use std::num::IntErrorKind;
use tracing::debug;

use crate::error::AccountFormError;
use crate::password_strength::{PasswordStrength, PasswordStrengthEstimator};
use crate::policy::AccountPolicy;

/// Raw account form fields, as submitted.
///
/// Field names on the wire match the form inputs. Missing fields are
/// read as empty strings.
#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AccountForm {
    /// The requested username.
    pub username: String,
    /// The new password. Empty on an edit means "keep the current one".
    pub password: String,
    /// Confirmation of `password`.
    #[serde(rename = "passwordVerify")]
    pub password_verify: String,
    /// The user level, as typed.
    #[serde(rename = "userLVL")]
    pub user_level: String,
    /// Optional rescue association, as typed.
    #[serde(rename = "rescueID")]
    pub rescue_id: String,
    /// Optional pound association, as typed.
    #[serde(rename = "poundID")]
    pub pound_id: String,
}

impl std::fmt::Debug for AccountForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountForm")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("password_verify", &"<redacted>")
            .field("user_level", &self.user_level)
            .field("rescue_id", &self.rescue_id)
            .field("pound_id", &self.pound_id)
            .finish()
    }
}

/// The outcome of validating one account form.
///
/// Always fully populated, even when `valid` is false, so the form can be
/// redisplayed with what the user entered.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct AccountInfo {
    /// True iff no violation was found.
    pub valid: bool,
    /// The submitted username.
    pub username: String,
    /// False only when an existing account is edited with a blank password.
    pub password_set: bool,
    /// The submitted password. Empty when `password_set` is false.
    #[serde(skip_serializing)]
    pub password: String,
    /// The parsed user level, or 0 if it could not be parsed.
    pub user_level: i64,
    /// Whether the rescue ID field was filled in.
    pub rescue_set: bool,
    /// The rescue ID. Only meaningful when `rescue_set` is true.
    pub rescue_id: i64,
    /// Whether the pound ID field was filled in.
    pub pound_set: bool,
    /// The pound ID. Only meaningful when `pound_set` is true.
    pub pound_id: i64,
}

impl std::fmt::Debug for AccountInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountInfo")
            .field("valid", &self.valid)
            .field("username", &self.username)
            .field("password_set", &self.password_set)
            .field("password", &"<redacted>")
            .field("user_level", &self.user_level)
            .field("rescue_set", &self.rescue_set)
            .field("rescue_id", &self.rescue_id)
            .field("pound_set", &self.pound_set)
            .field("pound_id", &self.pound_id)
            .finish()
    }
}

/// An [`AccountInfo`] together with the violations that were found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountValidation {
    /// The validated account.
    pub account: AccountInfo,
    /// Violations, in the order the checks ran.
    pub errors: Vec<AccountFormError>,
}

impl AccountValidation {
    /// Whether the form passed every check.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.account.valid
    }

    /// The user-facing error messages, in check order.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }

    /// Splits the result into the account and its error messages.
    #[must_use]
    pub fn into_parts(self) -> (AccountInfo, Vec<String>) {
        let messages: Vec<String> = self.messages();
        (self.account, messages)
    }
}

/// Validates account forms against an [`AccountPolicy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AccountFormValidator {
    policy: AccountPolicy,
    estimator: PasswordStrengthEstimator,
}

impl AccountFormValidator {
    /// Creates a validator for the given policy.
    #[must_use]
    pub const fn new(policy: AccountPolicy) -> Self {
        Self {
            policy,
            estimator: PasswordStrengthEstimator::from_policy(&policy),
        }
    }

    /// The policy this validator enforces.
    #[must_use]
    pub const fn policy(&self) -> &AccountPolicy {
        &self.policy
    }

    /// The estimator used for the strength check.
    #[must_use]
    pub const fn estimator(&self) -> &PasswordStrengthEstimator {
        &self.estimator
    }

    /// Validates a submitted account form.
    ///
    /// Every check runs regardless of earlier failures:
    ///
    /// 1. username is present
    /// 2. password is present (a blank password on an edit keeps the old one)
    /// 3. password and confirmation match
    /// 4. password strength, unless the password is being kept
    /// 5. user level is an integer within the policy bounds
    /// 6. rescue ID, if filled in, is an integer
    /// 7. pound ID, if filled in, is an integer
    ///
    /// # Arguments
    ///
    /// * `form` - The submitted fields
    /// * `editing_existing` - True when updating an existing account
    #[must_use]
    pub fn validate(&self, form: &AccountForm, editing_existing: bool) -> AccountValidation {
        let mut errors: Vec<AccountFormError> = Vec::new();

        if form.username.is_empty() {
            errors.push(AccountFormError::UsernameRequired);
        }

        let mut password_set: bool = true;
        if form.password.is_empty() {
            if editing_existing {
                password_set = false;
            } else {
                errors.push(AccountFormError::PasswordRequired);
            }
        }

        if form.password != form.password_verify {
            errors.push(AccountFormError::PasswordMismatch);
        }

        if password_set {
            let strength: PasswordStrength = self.estimator.estimate(&form.password);
            if !strength.meets_minimum {
                errors.push(AccountFormError::InsufficientEntropy {
                    required: strength.minimum_bits,
                    found: strength.entropy_bits,
                });
            }
        }

        let user_level: i64 = match parse_integer(&form.user_level) {
            ParsedInteger::Value(level) | ParsedInteger::Overflow(level) => {
                if !self.policy.contains_user_level(level) {
                    errors.push(AccountFormError::UserLevelOutOfBounds {
                        level,
                        max: self.policy.user_level_max,
                    });
                }
                level
            }
            ParsedInteger::Invalid => {
                errors.push(AccountFormError::UserLevelNotANumber);
                0
            }
        };

        let (rescue_set, rescue_id): (bool, i64) = parse_optional_id(
            &form.rescue_id,
            AccountFormError::RescueIdNotANumber,
            AccountFormError::RescueIdOutOfRange,
            &mut errors,
        );
        let (pound_set, pound_id): (bool, i64) = parse_optional_id(
            &form.pound_id,
            AccountFormError::PoundIdNotANumber,
            AccountFormError::PoundIdOutOfRange,
            &mut errors,
        );

        let account: AccountInfo = AccountInfo {
            valid: errors.is_empty(),
            username: form.username.clone(),
            password_set,
            password: if password_set {
                form.password.clone()
            } else {
                String::new()
            },
            user_level,
            rescue_set,
            rescue_id,
            pound_set,
            pound_id,
        };

        debug!(
            editing_existing,
            valid = account.valid,
            error_count = errors.len(),
            "Validated account form"
        );

        AccountValidation { account, errors }
    }
}

/// An integer form field after parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParsedInteger {
    /// The field holds an `i64`.
    Value(i64),
    /// The field is a whole number too large for an `i64`, clamped to
    /// `i64::MIN` or `i64::MAX`.
    Overflow(i64),
    /// The field is empty or not a whole number.
    Invalid,
}

/// Parses an integer field, ignoring surrounding whitespace.
fn parse_integer(raw: &str) -> ParsedInteger {
    match raw.trim().parse::<i64>() {
        Ok(value) => ParsedInteger::Value(value),
        Err(err) => match err.kind() {
            IntErrorKind::PosOverflow => ParsedInteger::Overflow(i64::MAX),
            IntErrorKind::NegOverflow => ParsedInteger::Overflow(i64::MIN),
            _ => ParsedInteger::Invalid,
        },
    }
}

/// Parses an optional ID field.
///
/// Returns `(set, id)`. An empty field is unset. A filled-in field is set
/// even when it is rejected, in which case the ID is 0 and either
/// `not_a_number` or `out_of_range` is recorded.
fn parse_optional_id(
    raw: &str,
    not_a_number: AccountFormError,
    out_of_range: AccountFormError,
    errors: &mut Vec<AccountFormError>,
) -> (bool, i64) {
    if raw.is_empty() {
        return (false, 0);
    }

    match parse_integer(raw) {
        ParsedInteger::Value(id) => (true, id),
        ParsedInteger::Overflow(_) => {
            errors.push(out_of_range);
            (true, 0)
        }
        ParsedInteger::Invalid => {
            errors.push(not_a_number);
            (true, 0)
        }
    }
}
