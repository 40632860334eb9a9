//! Integration tests: storage providers wired through the browser service.

mod browser_test;
mod helpers;
mod storage_test;
