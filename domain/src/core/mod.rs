//! Core domain concepts shared across all subdomains.
//!
//! - [`case::CaseStudy`]: a validated case to put before the jury
//! - [`error::DomainError`]: domain-level errors

pub mod case;
pub mod error;
