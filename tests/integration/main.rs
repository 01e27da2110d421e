//! Integration tests

mod config_test;
mod monitor_test;
mod ws_test;
