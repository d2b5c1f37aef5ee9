//! Argument Encoding Tests

mod flatten_tests;
