//! REST-Handler Module

pub mod users;
