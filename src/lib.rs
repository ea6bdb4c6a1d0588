//! Cardio Triage - Two-phase cardiology pre-visit interview
//!
//! This crate runs a structured patient interview, asks a language model
//! for follow-up questions and a triage report, and exports the report for
//! the cardiologist.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
