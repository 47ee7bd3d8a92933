//! Whole-program decoding: the container header plus every kernel and
//! function body, replayed into a [`ProgramBuilder`].

use tracing::debug;

use crate::builder::ProgramBuilder;
use crate::cursor::Cursor;
use crate::decl::read_decl_section;
use crate::error::{DecodeError, Result};
use crate::header::{read_header, Header};
use crate::inst::read_instruction;
use crate::version::Version;

fn code_window<'a>(
    name: &str,
    window: &'a [u8],
    entry: u32,
    size: u32,
) -> Result<&'a [u8]> {
    let start = entry as usize;
    let end = start.saturating_add(size as usize);
    if end > window.len() {
        return Err(DecodeError::RoutineOutOfBounds {
            name: name.to_owned(),
            offset: start,
            end,
            len: window.len(),
        });
    }
    Ok(&window[start..end])
}

fn read_routine<B: ProgramBuilder + ?Sized>(
    name: &str,
    window: &[u8],
    version: Version,
    builder: &mut B,
    is_kernel: bool,
) -> Result<()> {
    let mut cursor = Cursor::at(window, 0);
    let decl = read_decl_section(&mut cursor, version, builder, is_kernel)?;
    let code = code_window(name, window, decl.code_entry, decl.code_size)?;
    let mut cursor = Cursor::at(code, 0);
    while cursor.pos() < code.len() {
        read_instruction(&mut cursor, version, builder, &decl.tables)?;
    }
    Ok(())
}

/// Decodes an entire program, driving `builder` through every kernel and
/// function in container order.
///
/// The header is returned so callers can inspect versioning and per-routine
/// metadata (input offsets, generated binaries) alongside whatever the
/// builder produced.
pub fn read_program<B: ProgramBuilder + ?Sized>(buf: &[u8], builder: &mut B) -> Result<Header> {
    let header = read_header(buf)?;
    debug!(
        kernels = header.kernels.len(),
        functions = header.functions.len(),
        "decoding program"
    );
    for kernel in &header.kernels {
        let window = &buf[kernel.offset as usize..(kernel.offset + kernel.size) as usize];
        builder.begin_kernel(&kernel.name)?;
        read_routine(&kernel.name, window, header.version, builder, true)?;
    }
    for function in &header.functions {
        let window = &buf[function.offset as usize..(function.offset + function.size) as usize];
        builder.begin_function(&function.name)?;
        read_routine(&function.name, window, header.version, builder, false)?;
    }
    Ok(header)
}
