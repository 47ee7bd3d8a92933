//! A safe decoder for versioned vISA kernel bytecode containers.
//!
//! This crate is intended for decoding **untrusted** kernel blobs without
//! panicking or reading out of bounds. It walks a container byte-for-byte —
//! header, per-routine declaration sections, and the instruction stream — and
//! replays everything it decodes into a caller-supplied [`ProgramBuilder`].
//!
//! The decoder itself builds no IR: variable declarations, operands, and
//! instructions become calls on the builder, which hands back opaque handles
//! that later references resolve through. Any malformed byte is a hard error;
//! decoding never skips or resynchronizes.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

/// Attribute registry and attribute payload decoding.
pub mod attrs;
/// The [`ProgramBuilder`] trait and its argument types.
pub mod builder;
mod cursor;
/// Declaration-section decoding and per-routine handle tables.
pub mod decl;
mod error;
/// Container header decoding.
pub mod header;
mod inst;
/// Opcode tables, operand encodings, and fixed enumerations.
pub mod isa;
mod operand;
mod routine;
/// Version pair and version-gated encoding differences.
pub mod version;

/// Helpers for building synthetic bytecode containers in tests.
///
/// This module is only available when compiling this crate's own tests, or
/// when the `test-utils` feature is enabled. It is **not** considered part of
/// the stable decoding API.
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use crate::attrs::{AttrKind, AttrValue, Attribute};
pub use crate::builder::{
    Immediate, InputVar, LifetimeRef, Predication, ProgramBuilder, Region, StateVar, VarRef,
};
pub use crate::error::{DecodeError, Result};
pub use crate::header::{read_header, FunctionRecord, GenBinary, Header, KernelRecord};
pub use crate::isa::{
    Align, AtomicOp, AtomicWidth, Category, EMask, ExecSize, FenceMask, LabelKind, Modifier,
    Opcode, PredControl, VisaType,
};
pub use crate::routine::read_program;
pub use crate::version::Version;
