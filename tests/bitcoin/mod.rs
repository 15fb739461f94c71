//! Decoder integration tests

pub mod decode_flow_test;
