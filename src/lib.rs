//! Booking API for a training gym: member registration, trainer lookup and
//! session scheduling with per-trainer overlap and daily-capacity rules.

pub mod api;
pub mod config;
pub mod database;
pub mod errors;
pub mod models;
pub mod services;

pub use errors::BookingError;
