//! Command handlers for the formsmith binary

pub mod check;
pub mod context;
pub mod draft;
pub mod fill;
pub mod forms;
