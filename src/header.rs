//! Container-header decoding.
//!
//! The header names every kernel and function in the object and the byte
//! window each routine's body occupies. Routine windows are validated here so
//! the per-routine decoders can trust their bounds.

use tracing::debug;

use crate::cursor::Cursor;
use crate::error::{DecodeError, Result};
use crate::isa::MAGIC;
use crate::version::Version;

/// A generated-binary record attached to a kernel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenBinary {
    /// Target platform encoding.
    pub platform: u8,
    /// Offset of the binary in the container.
    pub offset: u32,
    /// Size of the binary in bytes.
    pub size: u32,
}

/// A kernel record from the container header.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KernelRecord {
    /// Kernel name.
    pub name: String,
    /// Offset of the kernel body in the container.
    pub offset: u32,
    /// Size of the kernel body in bytes.
    pub size: u32,
    /// Offset of the input-binding table, for callers that patch payloads.
    pub input_offset: u32,
    /// Pre-compiled binaries shipped alongside the kernel.
    pub gen_binaries: Vec<GenBinary>,
}

/// A function record from the container header.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FunctionRecord {
    /// Function name.
    pub name: String,
    /// Offset of the function body in the container.
    pub offset: u32,
    /// Size of the function body in bytes.
    pub size: u32,
    /// Linkage byte; carried through undecoded.
    pub linkage: u8,
}

/// The decoded container header.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Header {
    /// Format version of the container.
    pub version: Version,
    /// Kernels, in header order.
    pub kernels: Vec<KernelRecord>,
    /// Functions, in header order.
    pub functions: Vec<FunctionRecord>,
}

fn read_name(cursor: &mut Cursor<'_>, version: Version) -> Result<String> {
    let len = cursor.name_length(version)?;
    let bytes = cursor.take(len)?;
    Ok(String::from_utf8_lossy(bytes).into_owned())
}

fn check_window(name: &str, offset: u32, size: u32, len: usize) -> Result<()> {
    let start = offset as usize;
    let end = start.checked_add(size as usize);
    match end {
        Some(end) if end <= len => Ok(()),
        _ => Err(DecodeError::RoutineOutOfBounds {
            name: name.to_owned(),
            offset: start,
            end: start.saturating_add(size as usize),
            len,
        }),
    }
}

fn check_reloc(cursor: &mut Cursor<'_>, what: &'static str) -> Result<()> {
    let count = cursor.u16()?;
    if count != 0 {
        return Err(DecodeError::DeprecatedNonZero {
            what,
            found: u32::from(count),
        });
    }
    Ok(())
}

/// Decodes the container header at the start of `buf`.
pub fn read_header(buf: &[u8]) -> Result<Header> {
    let mut cursor = Cursor::at(buf, 0);

    let magic = cursor.u32()?;
    if magic != MAGIC {
        return Err(DecodeError::BadMagic { found: magic });
    }
    let major = cursor.u8()?;
    let minor = cursor.u8()?;
    let version = Version::new(major, minor)?;
    debug!(%version, "container header");

    let num_kernels = cursor.u16()?;
    let mut kernels = Vec::with_capacity(num_kernels as usize);
    for _ in 0..num_kernels {
        let name = read_name(&mut cursor, version)?;
        let offset = cursor.u32()?;
        let size = cursor.u32()?;
        let input_offset = cursor.u32()?;
        check_window(&name, offset, size, buf.len())?;
        check_reloc(&mut cursor, "variable relocation")?;
        check_reloc(&mut cursor, "function relocation")?;
        let num_gen_binaries = cursor.u8()?;
        let mut gen_binaries = Vec::with_capacity(num_gen_binaries as usize);
        for _ in 0..num_gen_binaries {
            gen_binaries.push(GenBinary {
                platform: cursor.u8()?,
                offset: cursor.u32()?,
                size: cursor.u32()?,
            });
        }
        kernels.push(KernelRecord {
            name,
            offset,
            size,
            input_offset,
            gen_binaries,
        });
    }

    let num_filescope = cursor.u16()?;
    if num_filescope != 0 {
        return Err(DecodeError::DeprecatedNonZero {
            what: "file-scope variable",
            found: u32::from(num_filescope),
        });
    }

    let num_functions = cursor.u16()?;
    let mut functions = Vec::with_capacity(num_functions as usize);
    for _ in 0..num_functions {
        let linkage = cursor.u8()?;
        let name = read_name(&mut cursor, version)?;
        let offset = cursor.u32()?;
        let size = cursor.u32()?;
        check_window(&name, offset, size, buf.len())?;
        check_reloc(&mut cursor, "variable relocation")?;
        check_reloc(&mut cursor, "function relocation")?;
        functions.push(FunctionRecord {
            name,
            offset,
            size,
            linkage,
        });
    }

    Ok(Header {
        version,
        kernels,
        functions,
    })
}
