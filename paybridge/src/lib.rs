#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! Provider-agnostic payment abstraction layer.
//!
//! This crate presents one stable surface for payment operations and routes
//! every call to a pluggable backend. Applications code against the
//! normalized data model and the [`Paybridge`](client::Paybridge) facade;
//! which processor actually moves the money is a configuration detail
//! resolved through the provider registry at startup.
//!
//! # Overview
//!
//! A backend implements the capability traits in [`provider`] and registers
//! a factory under a name. [`Paybridge::try_new`](client::Paybridge::try_new)
//! looks the name up in the process-wide registry, constructs the provider
//! from its [`ProviderConfig`](config::ProviderConfig), and wraps every
//! operation in the uniform [`ApiResponse`](types::ApiResponse) envelope.
//! Provider errors never propagate raw: [`error::classify`] maps each one to
//! a [`PaymentError`](error::PaymentError) kind first.
//!
//! # Modules
//!
//! - [`client`] - The [`Paybridge`](client::Paybridge) facade
//! - [`config`] - Provider credentials and facade settings
//! - [`error`] - The [`PaymentError`](error::PaymentError) taxonomy and classification
//! - [`provider`] - Capability traits a backend implements
//! - [`registry`] - Name-to-factory provider registry
//! - [`types`] - Normalized entities, requests, and envelopes

pub mod client;
pub mod config;
pub mod error;
pub mod provider;
pub mod registry;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use client::Paybridge;
pub use config::{BridgeConfig, LogLevel, ProviderConfig};
pub use error::{BoxError, PaymentError, ProviderFailure, classify};
pub use provider::Provider;
pub use registry::{ProviderFactory, ProviderRegistry, RegistryError};
