//! Data models for Destina
//!
//! - City: the user-supplied lookup key and its display form
//! - Recommendations: the four categorized buckets parsed from model output

pub mod city;
pub mod recommendations;

pub use city::CityName;
pub use recommendations::{Category, Recommendations};
