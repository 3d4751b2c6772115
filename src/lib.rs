//! Portfolio Pulse - project portfolio tracking
//!
//! This crate rolls sub-action completion up into action, planning and
//! project progress, keeps a cycle-free graph of action dependencies, and
//! measures KPI metrics per project, notifying once per threshold breach.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
