//! Operand decoding.
//!
//! A vector operand starts with a tag byte carrying the operand class in its
//! low three bits and a modifier in the next three; the class selects the
//! layout of the bytes that follow. Raw operands and instruction predicates
//! have their own fixed layouts. Decoded operands are constructed through the
//! builder immediately, so the decoder never holds an operand representation
//! of its own.

use crate::builder::{Immediate, Predication, ProgramBuilder, Region, StateVar};
use crate::cursor::Cursor;
use crate::decl::RoutineTables;
use crate::error::{DecodeError, Result};
use crate::isa::{EMask, ExecSize, Modifier, OperandClass, PredControl, VisaType};
use crate::version::Version;

/// How the operand being read is used; selects between the source,
/// destination, and address-of constructions of each class.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OperandUse {
    /// Plain source operand.
    Src,
    /// Destination operand; only the horizontal stride of the region applies.
    Dst,
    /// Address-of view, as in the first source of `addr_add`.
    AddressOf,
}

/// Decodes a region nibble: the null marker or a stride/width value.
pub fn region_component(nibble: u8, offset: usize) -> Result<Option<u8>> {
    Ok(match nibble {
        0 => None,
        1 => Some(0),
        2 => Some(1),
        3 => Some(2),
        4 => Some(4),
        5 => Some(8),
        6 => Some(16),
        7 => Some(32),
        _ => {
            return Err(DecodeError::InvalidEncoding {
                what: "region stride",
                value: u32::from(nibble),
                offset,
            })
        }
    })
}

/// Reads an execution-size byte: lane count in the low nibble, execution mask
/// in the high nibble.
pub fn read_exec_size(cursor: &mut Cursor<'_>, version: Version) -> Result<(EMask, ExecSize)> {
    let byte = cursor.u8()?;
    let offset = cursor.pos();
    let size = ExecSize::from_u8(byte & 0xF, offset)?;
    let emask = version.decode_emask(byte >> 4, offset)?;
    Ok((emask, size))
}

/// Reads an instruction predicate field. Zero means unpredicated.
pub fn read_predication<B: ProgramBuilder + ?Sized>(
    cursor: &mut Cursor<'_>,
    tables: &RoutineTables<B>,
) -> Result<Option<Predication<B>>> {
    let raw = cursor.u16()?;
    if raw == 0 {
        return Ok(None);
    }
    let offset = cursor.pos();
    let id = u32::from(raw & 0x0FFF);
    let control = PredControl::from_u8(((raw >> 13) & 0x3) as u8, offset)?;
    let invert = raw & 0x8000 != 0;
    Ok(Some(Predication {
        var: tables.predicate(id)?,
        invert,
        control,
    }))
}

/// Reads a raw operand: a variable index plus a register-relative offset.
/// Index zero is the null raw operand.
pub fn read_raw_operand<B: ProgramBuilder + ?Sized>(
    cursor: &mut Cursor<'_>,
    version: Version,
    builder: &mut B,
    tables: &RoutineTables<B>,
) -> Result<B::RawOperand> {
    let index = cursor.var_index(version)?;
    let offset = cursor.u16()?;
    if index == 0 {
        builder.null_raw_operand()
    } else {
        let var = tables.general(index)?;
        builder.raw_operand(var, offset)
    }
}

/// Reads the predicate destination of a `cmp`: a tag byte followed by a
/// predicate-variable field.
pub fn read_pred_var<B: ProgramBuilder + ?Sized>(
    cursor: &mut Cursor<'_>,
    tables: &RoutineTables<B>,
) -> Result<B::PredVar> {
    let tag = cursor.u8()?;
    let offset = cursor.pos();
    let class = OperandClass::from_u8(tag & 0x7, offset)?;
    if class != OperandClass::Predicate {
        return Err(DecodeError::InvalidEncoding {
            what: "operand class",
            value: u32::from(tag & 0x7),
            offset,
        });
    }
    let index = cursor.u16()?;
    tables.predicate(u32::from(index & 0x0FFF))
}

/// Reads a vector operand and constructs it through the builder.
///
/// `size` is the enclosing instruction's execution size; predicate and
/// address operands derive their width from it.
pub fn read_vector_operand<B: ProgramBuilder + ?Sized>(
    cursor: &mut Cursor<'_>,
    version: Version,
    builder: &mut B,
    tables: &RoutineTables<B>,
    size: ExecSize,
    operand_use: OperandUse,
) -> Result<B::Operand> {
    let tag = cursor.u8()?;
    let tag_offset = cursor.pos();
    let class = OperandClass::from_u8(tag & 0x7, tag_offset)?;
    let modifier = Modifier::from_u8((tag >> 3) & 0x7, tag_offset)?;

    match class {
        OperandClass::General => {
            let index = cursor.var_index(version)?;
            let var = tables.general(index)?;
            let row = cursor.u8()?;
            let col = cursor.u8()?;
            let region_bits = cursor.u16()?;
            let region_offset = cursor.pos();
            let horiz = region_component(((region_bits >> 8) & 0xF) as u8, region_offset)?;
            match operand_use {
                OperandUse::AddressOf => builder.address_of_general(var, row, col),
                OperandUse::Dst => builder.dst_general(var, horiz, row, col),
                OperandUse::Src => {
                    let region = Region {
                        vert: region_component((region_bits & 0xF) as u8, region_offset)?,
                        width: region_component(((region_bits >> 4) & 0xF) as u8, region_offset)?,
                        horiz,
                    };
                    builder.src_general(var, modifier, region, row, col)
                }
            }
        }
        OperandClass::Address => {
            let index = cursor.u16()?;
            let var = tables.address(u32::from(index))?;
            let offset = cursor.u8()?;
            let width = ExecSize::from_u8(cursor.u8()? & 0xF, cursor.pos())?;
            builder.address_operand(var, offset, width, operand_use == OperandUse::Dst)
        }
        OperandClass::Predicate => {
            let index = cursor.u16()?;
            let id = u32::from(index & 0x0FFF);
            let var = tables.predicate(id)?;
            if operand_use == OperandUse::Dst {
                builder.predicate_dst(var, size)
            } else {
                builder.predicate_src(var, size)
            }
        }
        OperandClass::Indirect => {
            let index = cursor.u16()?;
            let addr = tables.address(u32::from(index))?;
            let addr_offset = cursor.u8()?;
            let indirect_offset = cursor.i16()?;
            let bit_property = cursor.u8()?;
            let ty = VisaType::from_u8(bit_property & 0xF, cursor.pos())?;
            let region_bits = cursor.u16()?;
            let region_offset = cursor.pos();
            let horiz = region_component(((region_bits >> 8) & 0xF) as u8, region_offset)?;
            if operand_use == OperandUse::Dst {
                builder.indirect_dst(addr, addr_offset, indirect_offset, horiz, ty)
            } else {
                let region = Region {
                    vert: region_component((region_bits & 0xF) as u8, region_offset)?,
                    width: region_component(((region_bits >> 4) & 0xF) as u8, region_offset)?,
                    horiz,
                };
                builder.indirect_src(addr, modifier, addr_offset, indirect_offset, region, ty)
            }
        }
        OperandClass::Immediate => {
            let ty = VisaType::from_u8(cursor.u8()? & 0xF, cursor.pos())?;
            let bits = match ty.immediate_bytes() {
                8 => cursor.u64()?,
                _ => u64::from(cursor.u32()?),
            };
            builder.immediate(Immediate { ty, bits })
        }
        OperandClass::State => {
            let state_class = cursor.u8()?;
            let index = u32::from(cursor.u16()?);
            let offset = cursor.u8()?;
            let var = match state_class {
                0 => StateVar::Surface(tables.surface(index)?),
                1 => StateVar::Sampler(tables.sampler(index)?),
                _ => {
                    return Err(DecodeError::InvalidEncoding {
                        what: "state operand class",
                        value: u32::from(state_class),
                        offset: cursor.pos(),
                    })
                }
            };
            if operand_use == OperandUse::AddressOf {
                // The encoded offset counts words.
                builder.address_of_state(var, u16::from(offset) * 2)
            } else {
                builder.state_operand(var, offset, operand_use == OperandUse::Dst)
            }
        }
        OperandClass::AddressOf => Err(DecodeError::InvalidEncoding {
            what: "operand class",
            value: u32::from(tag & 0x7),
            offset: tag_offset,
        }),
    }
}
