//! Backend-neutral cipher capability contract for cipherkat.
//!
//! This crate provides:
//! - Transformation descriptors (algorithm/mode/padding + block size)
//! - The [`CipherBackend`] trait every pluggable backend implements
//! - Single-use [`CipherSession`]s with an explicit state machine
//! - [`ByteCursor`], the cursor-bounded region of the buffer representation
//! - [`BackendRegistry`], resolving a configured identifier to a constructor

#![forbid(unsafe_code)]

pub mod backend;
pub mod config;
pub mod cursor;
pub mod error;
pub mod registry;
pub mod session;
pub mod transformation;

pub use backend::CipherBackend;
pub use config::CipherConfig;
pub use cursor::ByteCursor;
pub use error::{CipherError, FactoryError};
pub use registry::{BackendConstructor, BackendRegistry};
pub use session::{CipherSession, Representation, SessionState};
pub use transformation::{Direction, Mode, Padding, Transformation};
