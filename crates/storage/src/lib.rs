#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

pub mod cached;
pub mod local_storage;
pub mod memory;
pub mod rest;
