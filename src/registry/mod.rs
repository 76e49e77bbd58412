//! # Step Registry
//!
//! Ordered, immutable step descriptors for a wizard flow.
//!
//! ## Overview
//!
//! The registry module holds the declarative description of a flow: one
//! [`StepDescriptor`] per step, in presentation order. The registry is built
//! once by the caller and never mutated while a flow is active; every other
//! component addresses steps by their position in this registry.
//!
//! ## Usage
//!
//! ```rust
//! use stepflow_core::registry::{StepDescriptor, StepRegistry};
//!
//! let registry = StepRegistry::new(vec![
//!     StepDescriptor::new("account", "Account details").with_fields(["email", "password"]),
//!     StepDescriptor::new("profile", "Profile").with_fields(["display_name"]).optional(),
//!     StepDescriptor::new("review", "Review & confirm"),
//! ]).unwrap();
//!
//! assert_eq!(registry.len(), 3);
//! assert_eq!(registry.index_of("profile"), Some(1));
//! ```

pub mod step_registry;

pub use step_registry::{StepDescriptor, StepRegistry};
