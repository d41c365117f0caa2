//! # wavelab-core
//!
//! Shared primitives for the wavelab physics engines.
//!
//! Currently this is just [`ChangeNotifier`], the explicit "state changed"
//! signal both engines fire after a completed step or recompute. Renderers
//! either subscribe a callback or poll the revision counter; the signal
//! carries no payload.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod notify;

pub use notify::ChangeNotifier;
