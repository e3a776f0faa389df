//! File item server library.
//!
//! Accepts items with one attachment and any number of images through
//! multipart upload, stores the bytes on disk under generated names, and
//! serves them back inline or as downloads carrying the original filename.

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod services;
