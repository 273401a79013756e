//! Oxips: IPS and IPS32 binary patches in Rust.
//!
//! The crate provides:
//! - The patch model and wire codec (`ips`)
//! - A greedy patch generator (`diff`)
//! - Random-access source adapters (`io`)
//!
//! # Quick Start
//!
//! ```
//! use oxips::ips::{self, Patch};
//!
//! let source = b"hello old world";
//! let target = b"hello new world";
//!
//! let patch = Patch::create(source, target);
//! let bytes = patch.to_bytes();
//!
//! let parsed = ips::parse(&bytes).unwrap();
//! let rebuilt = ips::apply_to_vec(&parsed, source).unwrap();
//! assert_eq!(rebuilt, target);
//! ```

pub mod diff;
pub mod error;
pub mod io;
pub mod ips;

pub use diff::{
    DiffOptions, create, create_from_sources, create_with_options, try_create_with_options,
};
pub use error::{Error, FormatError, InvalidRecordError};
pub use io::{ByteSource, SeekSource};
pub use ips::{Patch, Record, Variant, apply, parse, serialize};
