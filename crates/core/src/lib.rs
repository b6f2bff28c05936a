//! Domain core for the authoring platform.
//!
//! Holds the shared primitive types, the domain error taxonomy, the document
//! kind enumeration, and the deterministic prompt-composition logic used by
//! the generation orchestrator. This crate performs no I/O.

pub mod document;
pub mod error;
pub mod prompts;
pub mod types;
