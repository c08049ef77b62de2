#![forbid(unsafe_code)]

//! Checker gateway: adapts external spelling/grammar services into a
//! uniform stream of [`Span`](threadsmith_core::Span)s.
//!
//! The gateway sits between the orchestrator and whatever checking backend
//! is configured. It owns the response cache and the social-media filter
//! tables explicitly (no module-level globals), classifies raw matches
//! into disjoint spelling and grammar span lists, and fails open: a dead
//! service yields an empty result plus an observable
//! [`CheckerHealth::Unavailable`] flag, never an error the UI has to
//! catch.

pub mod cache;
pub mod dictionary;
pub mod filters;
pub mod gateway;
pub mod http;
pub mod service;
pub mod wire;

pub use dictionary::{DictionaryStore, MemoryDictionary};
pub use gateway::{CheckOutcome, CheckerGateway, CheckerHealth, GatewayConfig};
pub use http::HttpChecker;
pub use service::{CheckError, CheckerService};
pub use wire::{RawMatch, RawResponse};
