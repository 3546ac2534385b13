//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Own exactly one transaction scope per use-case call.
//! - Keep CLI layers decoupled from storage details.

pub mod catalog_service;
pub mod loan_service;
pub mod report_service;
