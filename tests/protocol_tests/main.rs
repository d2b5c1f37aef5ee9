//! Protocol Tests

mod result_tests;
