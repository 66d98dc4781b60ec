//! API integration tests
//!
//! Integration tests for all API endpoints

mod auth_test;
mod items_test;
mod members_test;
