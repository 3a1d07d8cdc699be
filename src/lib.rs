//! Fridge - BasePaint magnets on a shared canvas
//!
//! This library provides functionality to:
//! - Decode and encode the hex pixel streams used for canvases and magnets
//! - Place magnets on a 256x256 canvas and composite them (painter's order)
//! - Pack an arrangement into a compact URL-safe share string and back
//! - Mask magnet pixels out of a base canvas
//! - Render canvases and magnet previews to PNG

pub mod cli;
pub mod compositor;
pub mod config;
pub mod error;
pub mod geometry;
pub mod mask;
pub mod models;
pub mod palette;
pub mod pixels;
pub mod render;
pub mod share;
