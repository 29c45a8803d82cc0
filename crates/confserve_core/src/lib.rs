//! Configuration resolution pipeline.
//!
//! For one request the pipeline runs strictly in sequence:
//!
//! 1. [`loader`]: acquire a snapshot per backend and discover the documents
//!    matching the requested applications and profiles, in snapshot order.
//! 2. [`ordering`]: rank the discovered property sources from weakest to
//!    strongest precedence.
//! 3. [`merge`]: fold the ordered sources into one reconciled map under the
//!    per-type override rules (scalar overwrite, one-level map merge, list
//!    replacement), with [`list_cleanup`] enforcing list replacement when
//!    sources arrive pre-flattened.
//! 4. [`placeholder`]: expand templates and substitute `${…}` references,
//!    consulting the external secret resolver for prefixed names.
//! 5. [`reconcile`]: orchestrates the above and applies caller-supplied
//!    injections around the merge and resolve steps.
//!
//! Nothing here holds cross-request state; backends and the secret resolver
//! own whatever sharing they need.

pub mod errors;
pub mod flatten;
pub mod injection;
pub mod list_cleanup;
pub mod loader;
pub mod merge;
pub mod names;
pub mod ordering;
pub mod placeholder;
pub mod reconcile;
pub mod request;
pub mod source;

pub use config_backend::JsonMap;
pub use errors::ResolveError;
pub use injection::InjectedProperties;
pub use loader::load_configurations;
pub use merge::Duplicate;
pub use reconcile::{Reconciler, ResolutionMetadata};
pub use request::ResolutionRequest;
pub use source::{PropertySource, Source};
