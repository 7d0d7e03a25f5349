//! Liga Stats - Conversational Statistics Engine
//!
//! This crate turns free-text chat messages from an amateur-league fan app
//! into structured player statistic updates. Messages like "llevo 10 goles
//! en 15 partidos" are classified, parsed, authorized, and applied to the
//! persisted stat line of the claimed author.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod telemetry;
