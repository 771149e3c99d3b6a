//! Forecast dashboard - city and current-location forecast cards in the terminal
//!
//! This library exposes the application's modules for the binary and for testing.

pub mod action;
pub mod api;
pub mod components;
pub mod config;
pub mod effect;
pub mod forecast;
pub mod geo;
pub mod icons;
pub mod reducer;
pub mod state;
