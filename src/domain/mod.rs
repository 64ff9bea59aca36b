//! Core domain models for depgroup
//!
//! This module contains the fundamental types used throughout the application:
//! - Ecosystem identifiers
//! - Dependency update candidates and their change types
//! - Update proposals
//! - Plan summary structures

mod dependency;
mod ecosystem;
mod proposal;
mod summary;

pub use dependency::{DependencyType, DependencyUpdate, UpdateType};
pub use ecosystem::Ecosystem;
pub use proposal::UpdateProposal;
pub use summary::{DeclarationPlan, PlanSummary};
