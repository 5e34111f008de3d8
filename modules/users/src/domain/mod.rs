pub mod error;
pub mod patch;
pub mod permission_patch;
pub mod ports;
pub mod repo;
pub mod service;
pub mod validation;
