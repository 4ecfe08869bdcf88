//! recruit - Student Organization Recruitment
//!
//! A reducer-backed store for recruitment data persisted to local key-value
//! storage, a five-step registration wizard gated by student id verification,
//! and a terminal front end for students and interviewers.

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod presentation;

pub use application::*;
pub use domain::*;
