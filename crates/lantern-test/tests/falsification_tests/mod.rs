//! Popperian Falsification Tests for Lantern
//!
//! Each test in this module attempts to falsify a specific claim about Lantern.
//! A passing test means the claim survived the falsification attempt.

// Allow test-specific patterns that are denied in production code
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]
#![allow(clippy::float_cmp)]

mod ordering;
mod persistence;
mod presentation;
mod settings;
