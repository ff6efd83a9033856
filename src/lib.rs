// src/lib.rs

//! dailykiosk: content rotation and routing engine for a JSON feed kiosk.

pub mod app;
pub mod error;
pub mod models;
pub mod render;
pub mod rotation;
pub mod router;
pub mod services;
pub mod storage;
pub mod utils;
pub mod views;
