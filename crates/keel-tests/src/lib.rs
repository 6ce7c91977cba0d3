#![deny(unsafe_code)]

//! # keel-tests
//!
//! Cross-crate integration suite for the keel workspace. The library
//! target is intentionally empty; every test lives under `tests/`,
//! grouped into `e2e/`, `adversarial/` and `property/` modules pulled in
//! by the runner files.
