use thiserror::Error;

/// Convenience alias used across the crate.
pub type Result<T> = std::result::Result<T, DecodeError>;

/// A fatal failure while decoding a vISA binary.
///
/// Decoding is all-or-nothing: the first violation aborts the whole decode and
/// nothing further is replayed into the builder. Every variant carries enough
/// context to locate the fault in the input stream.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// A read ran past the end of the input (or the routine window).
    #[error("unexpected end of input at offset {offset}: needed {needed} more bytes, {remaining} remain")]
    UnexpectedEnd {
        /// Byte offset at which the read started.
        offset: usize,
        /// Number of bytes the read required.
        needed: usize,
        /// Number of bytes that were actually available.
        remaining: usize,
    },

    /// The container does not start with the `CISA` magic number.
    #[error("bad magic number {found:#010x}, expected 0x41534943 (\"CISA\")")]
    BadMagic {
        /// The value found at offset 0.
        found: u32,
    },

    /// The container's version is not one this decoder supports.
    #[error("unsupported vISA version {major}.{minor}")]
    UnsupportedVersion {
        /// Major version byte.
        major: u8,
        /// Minor version byte.
        minor: u8,
    },

    /// A deprecated count field that must be zero held a non-zero value.
    #[error("deprecated {what} count must be zero, found {found}")]
    DeprecatedNonZero {
        /// Which deprecated field was non-zero.
        what: &'static str,
        /// The value found.
        found: u32,
    },

    /// A routine's `[offset, offset + size)` window does not fit in the input.
    #[error("routine '{name}' spans {offset}..{end} but the input is {len} bytes")]
    RoutineOutOfBounds {
        /// Routine name from the container header.
        name: String,
        /// Start of the routine window.
        offset: usize,
        /// End of the routine window.
        end: usize,
        /// Total input length.
        len: usize,
    },

    /// An opcode byte that names no known instruction (including reserved gaps).
    #[error("unknown opcode byte {opcode:#04x} at offset {offset}")]
    UnknownOpcode {
        /// The offending byte.
        opcode: u8,
        /// Offset of the opcode byte.
        offset: usize,
    },

    /// A scalar field held a value outside its enumeration.
    #[error("invalid {what} encoding {value:#x} at offset {offset}")]
    InvalidEncoding {
        /// Which enumeration was being decoded.
        what: &'static str,
        /// The out-of-range value.
        value: u32,
        /// Offset just past the offending field.
        offset: usize,
    },

    /// A stream index did not resolve in its declaration table.
    #[error("{table} index {index} out of range ({len} entries)")]
    IndexOutOfRange {
        /// Which table the index was resolved against.
        table: &'static str,
        /// The offending index.
        index: u32,
        /// Number of entries in the table.
        len: usize,
    },

    /// A general variable aliased a slot that has not been declared yet.
    #[error("general variable {index} aliases variable {alias}, which is not yet declared")]
    AliasNotYetDeclared {
        /// Table index of the declaration being read.
        index: u32,
        /// The alias index it referenced.
        alias: u32,
    },

    /// A string-pool entry overran the per-string length limit.
    #[error("string {index} exceeds the maximum length of {max} bytes")]
    OversizedString {
        /// Index of the string in the pool.
        index: u32,
        /// The enforced maximum, including the terminator.
        max: usize,
    },

    /// Labels cannot carry attributes.
    #[error("label {index} declares {count} attributes; label attributes are not supported")]
    LabelAttributes {
        /// Table index of the label.
        index: u32,
        /// Number of attributes it declared.
        count: u8,
    },

    /// An attribute name that is not in the registry.
    #[error("unknown attribute '{name}'")]
    UnknownAttribute {
        /// The attribute name as found in the string pool.
        name: String,
    },

    /// A numeric attribute with a payload size other than 0, 1, 2, or 4 bytes.
    #[error("attribute '{name}' has unsupported payload size {size}")]
    BadAttributeSize {
        /// The attribute name.
        name: String,
        /// The declared payload size.
        size: u8,
    },

    /// More samplers were declared than the format's table can hold.
    #[error("sampler count {count} exceeds the maximum of 31")]
    TooManySamplers {
        /// The declared sampler count.
        count: u8,
    },

    /// The builder reported a failure; the decode aborts.
    #[error("builder error: {0}")]
    Builder(String),
}

impl DecodeError {
    /// Wraps a builder-side failure message.
    pub fn builder(msg: impl Into<String>) -> Self {
        DecodeError::Builder(msg.into())
    }
}
