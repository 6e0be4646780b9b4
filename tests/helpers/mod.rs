#![allow(dead_code)]

pub mod log_capture;
pub mod stub_server;
