//! Reply Decoder Tests

mod composite_tests;
mod round_trip_tests;
