//! Bookshop application library
//!
//! Hosts the bookshop import/export module and shared formatting helpers.

pub mod modules;
pub mod utils;

pub use modules::bookshop;
