// Copyright (C) 2026 NPLBAM contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Account policy configuration.

use serde::{Deserialize, Serialize};

/// Highest user level (role tier) an account may hold. Levels run `0..=5`.
pub const USER_LEVEL_MAX: u8 = 5;

/// Minimum password entropy, in bits.
///
/// Matches the point at which `KeePass` 2 shows a password as green.
pub const MIN_PASSWORD_ENTROPY_BITS: u32 = 64;

/// Thresholds applied when validating account forms.
///
/// A policy is built once (usually from the command line) and handed to
/// the estimator and validator at construction time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountPolicy {
    /// Inclusive upper bound on the user level.
    pub user_level_max: u8,
    /// Minimum acceptable password entropy, in bits.
    pub min_password_entropy_bits: u32,
}

impl Default for AccountPolicy {
    fn default() -> Self {
        Self {
            user_level_max: USER_LEVEL_MAX,
            min_password_entropy_bits: MIN_PASSWORD_ENTROPY_BITS,
        }
    }
}

impl AccountPolicy {
    /// Creates a policy from explicit thresholds.
    #[must_use]
    pub const fn new(user_level_max: u8, min_password_entropy_bits: u32) -> Self {
        Self {
            user_level_max,
            min_password_entropy_bits,
        }
    }

    /// Returns whether `level` lies within `0..=user_level_max`.
    #[must_use]
    pub fn contains_user_level(&self, level: i64) -> bool {
        (0..=i64::from(self.user_level_max)).contains(&level)
    }
}
