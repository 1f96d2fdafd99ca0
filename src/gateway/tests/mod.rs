//! Unit tests for the gateway dispatcher.

mod dispatch_tests;
