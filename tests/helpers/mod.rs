#![allow(dead_code)]

#[path = "../test_helpers.rs"]
pub mod test_helpers;

pub mod api_test_helper;
pub mod stubs;
