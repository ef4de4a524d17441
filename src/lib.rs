//! cardsmith composes self-contained social-card HTML documents from
//! untrusted HTTP request parameters. An external rasterizer turns the
//! documents into PNG or JPEG images.

pub mod application;
pub mod config;
pub mod domain;
pub mod infra;
pub mod presentation;
