//! Core types and configuration for skiff.
//!
//! This crate defines the `skiff.toml` schema ([`SkiffConfig`]), the
//! per-run parameters ([`RunConfig`]), image tag resolution, and the
//! git revision lookup used to derive default tags.

pub mod config;
pub mod error;
pub mod image;
pub mod revision;

pub use config::{BuildConfig, ProjectConfig, RegistryConfig, RunConfig, SkiffConfig, Strategy};
pub use error::{Error, Result};
pub use image::{ImageReference, resolve_tag};
pub use revision::short_sha;
