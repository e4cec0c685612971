//! Tickmark Core Types and Definitions
//!
//! This crate provides the foundational types for Tickmark timing diagrams.
//! It includes:
//!
//! - **Waveform**: The signal data model ([`waveform::Dataset`]) that the
//!   layout engine consumes
//! - **Colors**: Color handling with CSS color support ([`color::Color`])
//! - **Geometry**: Basic geometric types ([`geometry`] module)
//! - **Draw**: The [`draw::GraphicsContext`] contract every rendering backend
//!   implements, plus shared state and text metrics

pub mod color;
pub mod draw;
pub mod geometry;
pub mod waveform;
