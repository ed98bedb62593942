// Copyright (C) 2026 NPLBAM contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Account form validation for the NPLBAM shelter system.
//!
//! This crate holds the only self-contained logic behind the account
//! pages: a password entropy estimator and a single-pass validator for
//! the new/edit account form. Both are pure and synchronous. Persisting a
//! valid account (and hashing its password) is the caller's job.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod account_form;
mod error;
mod password_strength;
mod policy;

#[cfg(test)]
mod tests;

pub use account_form::{AccountForm, AccountFormValidator, AccountInfo, AccountValidation};
pub use error::AccountFormError;
pub use password_strength::{CharacterClass, PasswordStrength, PasswordStrengthEstimator};
pub use policy::{AccountPolicy, MIN_PASSWORD_ENTROPY_BITS, USER_LEVEL_MAX};
