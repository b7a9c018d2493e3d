// API routes and handlers

pub mod health;
pub mod members;
pub mod routes;
pub mod sessions;
pub mod trainers;
