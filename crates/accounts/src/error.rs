// Copyright (C) 2026 NPLBAM contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Account form validation errors.
//!
//! Each variant is one violation found in a submitted account form. The
//! `Display` text is shown to the user verbatim.

use thiserror::Error;

/// A single violation found while validating an account form.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AccountFormError {
    /// The username field was left empty.
    #[error("A username is required.")]
    UsernameRequired,

    /// The password field was left empty on a new account.
    #[error("A password is required.")]
    PasswordRequired,

    /// Password and confirmation differ.
    #[error("The passwords entered do not match.")]
    PasswordMismatch,

    /// The password is below the entropy threshold.
    #[error(
        "Password does not meet minimum strength requirement of {required} bits. It contains {found} bits of entropy. Please either increase its length, or add characters from different character sets. (For example: Add some numbers, or maybe a symbol.)"
    )]
    InsufficientEntropy {
        /// The policy minimum, in bits.
        required: u32,
        /// The measured entropy, in bits.
        found: u32,
    },

    /// The user level field is empty or not an integer.
    #[error("user level wasn't entered or was not a number.")]
    UserLevelNotANumber,

    /// The user level parsed but lies outside `0..=max`.
    #[error("User level is out of bounds")]
    UserLevelOutOfBounds {
        /// The level that was entered.
        level: i64,
        /// The policy maximum.
        max: u8,
    },

    /// The rescue ID field is filled in but not an integer.
    #[error("Rescue ID field filled out, and is not a number.")]
    RescueIdNotANumber,

    /// The rescue ID is a whole number too large to store.
    #[error("Rescue ID is out of range.")]
    RescueIdOutOfRange,

    /// The pound ID field is filled in but not an integer.
    #[error("Pound ID field filled out, and is not a number.")]
    PoundIdNotANumber,

    /// The pound ID is a whole number too large to store.
    #[error("Pound ID is out of range.")]
    PoundIdOutOfRange,
}
