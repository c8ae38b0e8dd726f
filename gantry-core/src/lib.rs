//! Gantry Core
//!
//! Core types for the Gantry workflow run tracking client.
//!
//! This crate contains:
//! - Domain types: runs, tasks, and node view-models
//! - DTOs: payloads exchanged with the workflow engine's HTTP API

pub mod domain;
pub mod dto;
