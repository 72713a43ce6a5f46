#![allow(dead_code)]

#[path = "../../src/test_support/mod.rs"]
mod test_support;

pub(crate) use test_support::*;
