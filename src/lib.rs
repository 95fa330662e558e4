//! Contact Surface Area Library
//!
//! Estimates the contact surface area between two closed triangulated surfaces.

pub mod config;
pub mod contact;
pub mod error;
pub mod io;
pub mod mesh;

pub use error::{CsaError, Result};
