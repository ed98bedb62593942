// Copyright (C) 2026 NPLBAM contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Password strength estimation.
//!
//! Strength is the classic brute-force entropy estimate
//! `floor(length * log2(charset_size))`, where the charset is the sum of
//! the sizes of every character class that appears in the password.

use serde::Serialize;
use tracing::debug;

use crate::policy::{AccountPolicy, MIN_PASSWORD_ENTROPY_BITS};

/// A class of characters contributing to the charset size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CharacterClass {
    /// `0-9`
    Digit,
    /// `a-z`
    Lowercase,
    /// `A-Z`
    Uppercase,
    /// The 32 ASCII punctuation characters.
    Symbol,
    /// The space character.
    Space,
}

impl CharacterClass {
    /// Every class, in the order they are checked.
    pub const ALL: [Self; 5] = [
        Self::Digit,
        Self::Lowercase,
        Self::Uppercase,
        Self::Symbol,
        Self::Space,
    ];

    /// Number of distinct characters in this class.
    #[must_use]
    pub const fn size(self) -> u32 {
        match self {
            Self::Digit => 10,
            Self::Lowercase | Self::Uppercase => 26,
            Self::Symbol => 32,
            Self::Space => 1,
        }
    }

    /// Returns whether `c` belongs to this class.
    #[must_use]
    pub fn matches(self, c: char) -> bool {
        match self {
            Self::Digit => c.is_ascii_digit(),
            Self::Lowercase => c.is_ascii_lowercase(),
            Self::Uppercase => c.is_ascii_uppercase(),
            Self::Symbol => c.is_ascii_punctuation(),
            Self::Space => c == ' ',
        }
    }

    /// Returns whether any character of `password` belongs to this class.
    #[must_use]
    pub fn present_in(self, password: &str) -> bool {
        password.chars().any(|c| self.matches(c))
    }

    /// Returns the classes that count towards the charset of `password`.
    ///
    /// The space class is counted whenever the symbol class is, whether or
    /// not the password contains a space. Existing entropy figures assume
    /// this.
    #[must_use]
    pub fn counted_in(password: &str) -> Vec<Self> {
        let mut classes: Vec<Self> = [Self::Digit, Self::Lowercase, Self::Uppercase, Self::Symbol]
            .into_iter()
            .filter(|class| class.present_in(password))
            .collect();

        if classes.contains(&Self::Symbol) {
            classes.push(Self::Space);
        }

        classes
    }
}

/// The result of estimating a password's strength.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PasswordStrength {
    /// Estimated entropy, floored to whole bits.
    pub entropy_bits: u32,
    /// Sum of the sizes of the counted character classes.
    pub charset_size: u32,
    /// The classes that made up `charset_size`.
    pub classes: Vec<CharacterClass>,
    /// The threshold the estimate was compared against.
    pub minimum_bits: u32,
    /// Whether `entropy_bits >= minimum_bits`.
    pub meets_minimum: bool,
}

/// Estimates password entropy against a fixed minimum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordStrengthEstimator {
    min_entropy_bits: u32,
}

impl Default for PasswordStrengthEstimator {
    fn default() -> Self {
        Self::new(MIN_PASSWORD_ENTROPY_BITS)
    }
}

impl PasswordStrengthEstimator {
    /// Creates an estimator with the given minimum, in bits.
    #[must_use]
    pub const fn new(min_entropy_bits: u32) -> Self {
        Self { min_entropy_bits }
    }

    /// Creates an estimator using the policy's entropy minimum.
    #[must_use]
    pub const fn from_policy(policy: &AccountPolicy) -> Self {
        Self::new(policy.min_password_entropy_bits)
    }

    /// The minimum entropy a password needs, in bits.
    #[must_use]
    pub const fn min_entropy_bits(&self) -> u32 {
        self.min_entropy_bits
    }

    /// Estimates the strength of `password`.
    ///
    /// An empty password has zero entropy and never meets the minimum. A
    /// non-empty password made only of characters outside every class
    /// (for example a lone space) is treated the same way.
    #[must_use]
    pub fn estimate(&self, password: &str) -> PasswordStrength {
        let length: usize = password.chars().count();
        if length == 0 {
            return self.zero_entropy(Vec::new());
        }

        let classes: Vec<CharacterClass> = CharacterClass::counted_in(password);
        let charset_size: u32 = classes.iter().copied().map(CharacterClass::size).sum();
        if charset_size == 0 {
            return self.zero_entropy(classes);
        }

        let entropy_bits: u32 = brute_force_bits(length, charset_size);
        let meets_minimum: bool = entropy_bits >= self.min_entropy_bits;

        debug!(
            length,
            charset_size,
            entropy_bits,
            meets_minimum,
            "Estimated password strength"
        );

        PasswordStrength {
            entropy_bits,
            charset_size,
            classes,
            minimum_bits: self.min_entropy_bits,
            meets_minimum,
        }
    }

    /// Estimates `password` and returns `(entropy_bits, meets_minimum)`.
    #[must_use]
    pub fn estimate_pair(&self, password: &str) -> (u32, bool) {
        let strength: PasswordStrength = self.estimate(password);
        (strength.entropy_bits, strength.meets_minimum)
    }

    const fn zero_entropy(&self, classes: Vec<CharacterClass>) -> PasswordStrength {
        PasswordStrength {
            entropy_bits: 0,
            charset_size: 0,
            classes,
            minimum_bits: self.min_entropy_bits,
            meets_minimum: false,
        }
    }
}

/// `floor(length * log2(charset_size))`, saturating at `u32::MAX`.
///
/// `charset_size` must be non-zero.
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
fn brute_force_bits(length: usize, charset_size: u32) -> u32 {
    let bits: f64 = f64::from(charset_size).log2() * length as f64;
    bits.floor().min(f64::from(u32::MAX)) as u32
}
