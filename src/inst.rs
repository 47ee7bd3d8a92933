//! Instruction decoding.
//!
//! One encoded instruction is an opcode byte followed by a body whose layout
//! is fixed by the opcode's category (and, for `svm`, `va`, and the LSC
//! opcodes, by a further sub-opcode). Each decoded instruction is appended to
//! the builder before the next one is read; nothing is buffered.

use tracing::trace;

use crate::builder::{
    AvsArgs, Immediate, LifetimeRef, LscAddr, LscBlock2dArgs, LscBlock2dShape, LscCaching,
    LscDataShape, LscTypedArgs, LscTypedBlock2dArgs, LscUntypedArgs, ProgramBuilder, RawSendgArgs,
    RtWriteArgs, Sample3dArgs, Sample3dFlags,
};
use crate::cursor::Cursor;
use crate::decl::RoutineTables;
use crate::error::{DecodeError, Result};
use crate::isa::{
    decode_atomic, Category, CompareRelation, ExecSize, FenceMask, LscSubOp, MinMax, Modifier,
    Opcode, OperandClass, Sampler3dOp, SvmSubOp, VaPlusField, VaPlusSubOp, VaSubOp, VisaType,
};
use crate::operand::{
    read_exec_size, read_pred_var, read_predication, read_raw_operand, read_vector_operand,
    OperandUse,
};
use crate::version::Version;

fn vsrc<B: ProgramBuilder + ?Sized>(
    c: &mut Cursor<'_>,
    v: Version,
    b: &mut B,
    t: &RoutineTables<B>,
    size: ExecSize,
) -> Result<B::Operand> {
    read_vector_operand(c, v, b, t, size, OperandUse::Src)
}

fn vdst<B: ProgramBuilder + ?Sized>(
    c: &mut Cursor<'_>,
    v: Version,
    b: &mut B,
    t: &RoutineTables<B>,
    size: ExecSize,
) -> Result<B::Operand> {
    read_vector_operand(c, v, b, t, size, OperandUse::Dst)
}

fn raw<B: ProgramBuilder + ?Sized>(
    c: &mut Cursor<'_>,
    v: Version,
    b: &mut B,
    t: &RoutineTables<B>,
) -> Result<B::RawOperand> {
    read_raw_operand(c, v, b, t)
}

fn surface_byte<B: ProgramBuilder + ?Sized>(
    c: &mut Cursor<'_>,
    t: &RoutineTables<B>,
) -> Result<B::SurfaceVar> {
    let index = c.u8()?;
    t.surface(u32::from(index))
}

fn sampler_byte<B: ProgramBuilder + ?Sized>(
    c: &mut Cursor<'_>,
    t: &RoutineTables<B>,
) -> Result<B::SamplerVar> {
    let index = c.u8()?;
    t.sampler(u32::from(index))
}

/// The destination tag's modifier field carries the saturation flag.
fn peek_saturate(c: &Cursor<'_>) -> Result<bool> {
    Ok((c.peek_u8()? >> 3) & 0x7 == Modifier::Sat as u8)
}

/// Decodes an oword-count field: an exponent in `0..=4`.
fn oword_count(value: u8, offset: usize) -> Result<u8> {
    if value > 4 {
        return Err(DecodeError::InvalidEncoding {
            what: "oword count",
            value: u32::from(value),
            offset,
        });
    }
    Ok(1 << value)
}

/// Decodes one instruction at the cursor and appends it to the builder.
pub fn read_instruction<B: ProgramBuilder + ?Sized>(
    cursor: &mut Cursor<'_>,
    version: Version,
    builder: &mut B,
    tables: &RoutineTables<B>,
) -> Result<()> {
    let offset = cursor.pos();
    let opcode = Opcode::from_u8(cursor.u8()?, offset)?;
    trace!(op = opcode.name(), offset, "instruction");
    match opcode.category() {
        Category::Mov
        | Category::Arith
        | Category::Logic
        | Category::Address
        | Category::Compare => read_common(cursor, version, builder, tables, opcode),
        Category::Flow | Category::SimdFlow => read_flow(cursor, version, builder, tables, opcode),
        Category::Sync => read_sync(cursor, version, builder, tables, opcode),
        Category::DataPort => read_dataport(cursor, version, builder, tables, opcode),
        Category::Sampler => read_sampler(cursor, version, builder, tables, opcode),
        Category::Svm => read_svm(cursor, version, builder, tables),
        Category::Misc => read_misc(cursor, version, builder, tables, opcode),
        Category::Lsc => read_lsc(cursor, version, builder, tables, opcode),
    }
}

fn read_common<B: ProgramBuilder + ?Sized>(
    c: &mut Cursor<'_>,
    v: Version,
    b: &mut B,
    t: &RoutineTables<B>,
    op: Opcode,
) -> Result<()> {
    let (emask, size) = read_exec_size(c, v)?;
    let pred = if op.has_predicate() {
        read_predication(c, t)?
    } else {
        None
    };

    match op.category() {
        Category::Compare => {
            let sub = c.u8()?;
            let rel = CompareRelation::from_u8(sub & 0x7, c.pos())?;
            if c.peek_u8()? & 0x7 == OperandClass::General as u8 {
                let dst = vdst(c, v, b, t, size)?;
                let src0 = vsrc(c, v, b, t, size)?;
                let src1 = vsrc(c, v, b, t, size)?;
                b.append_compare(rel, emask, size, dst, src0, src1)
            } else {
                let dst = read_pred_var(c, t)?;
                let src0 = vsrc(c, v, b, t, size)?;
                let src1 = vsrc(c, v, b, t, size)?;
                b.append_compare_to_predicate(rel, emask, size, dst, src0, src1)
            }
        }
        Category::Address => {
            let dst = vdst(c, v, b, t, size)?;
            let src0 = read_vector_operand(c, v, b, t, size, OperandUse::AddressOf)?;
            let src1 = vsrc(c, v, b, t, size)?;
            b.append_addr_add(emask, size, dst, src0, src1)
        }
        Category::Mov => {
            if op == Opcode::Fminmax {
                let sub = MinMax::from_u8(c.u8()?, c.pos())?;
                let saturate = peek_saturate(c)?;
                let dst = vdst(c, v, b, t, size)?;
                let src0 = vsrc(c, v, b, t, size)?;
                let src1 = vsrc(c, v, b, t, size)?;
                b.append_min_max(sub, emask, size, saturate, dst, src0, src1)
            } else {
                let saturate = peek_saturate(c)?;
                let dst = vdst(c, v, b, t, size)?;
                let src0 = vsrc(c, v, b, t, size)?;
                let src1 = if op.src_count() > 1 {
                    Some(vsrc(c, v, b, t, size)?)
                } else {
                    None
                };
                b.append_data_movement(op, pred, emask, size, saturate, dst, src0, src1)
            }
        }
        Category::Arith => {
            if matches!(op, Opcode::Addc | Opcode::Subb) {
                let dst = vdst(c, v, b, t, size)?;
                let carry_borrow = vdst(c, v, b, t, size)?;
                let src0 = vsrc(c, v, b, t, size)?;
                let src1 = vsrc(c, v, b, t, size)?;
                b.append_two_dst_arithmetic(op, pred, emask, size, dst, carry_borrow, src0, src1)
            } else {
                let saturate = peek_saturate(c)?;
                let dst = vdst(c, v, b, t, size)?;
                let src0 = vsrc(c, v, b, t, size)?;
                let src1 = if op.src_count() > 1 {
                    Some(vsrc(c, v, b, t, size)?)
                } else {
                    None
                };
                let src2 = if op.src_count() > 2 {
                    Some(vsrc(c, v, b, t, size)?)
                } else {
                    None
                };
                b.append_arithmetic(op, pred, emask, size, saturate, dst, src0, src1, src2)
            }
        }
        Category::Logic => {
            let saturate = peek_saturate(c)?;
            let dst = vdst(c, v, b, t, size)?;
            if op == Opcode::Bfn {
                let src0 = vsrc(c, v, b, t, size)?;
                let src1 = vsrc(c, v, b, t, size)?;
                let src2 = vsrc(c, v, b, t, size)?;
                let func_ctrl = c.u8()?;
                b.append_bfn(func_ctrl, pred, emask, size, saturate, dst, src0, src1, src2)
            } else {
                let src0 = vsrc(c, v, b, t, size)?;
                let mut rest = [None, None, None];
                for slot in rest.iter_mut().take(op.src_count().saturating_sub(1)) {
                    *slot = Some(vsrc(c, v, b, t, size)?);
                }
                let [src1, src2, src3] = rest;
                b.append_logic(op, pred, emask, size, saturate, dst, src0, src1, src2, src3)
            }
        }
        _ => unreachable!("non-common category routed to common handler"),
    }
}

fn read_flow<B: ProgramBuilder + ?Sized>(
    c: &mut Cursor<'_>,
    v: Version,
    b: &mut B,
    t: &RoutineTables<B>,
    op: Opcode,
) -> Result<()> {
    match op {
        Opcode::Subroutine | Opcode::Label => {
            let id = c.u16()?;
            let label = t.label(u32::from(id))?;
            b.append_label(label)
        }
        Opcode::Jmp | Opcode::Call | Opcode::Goto => {
            let (emask, size) = read_exec_size(c, v)?;
            let pred = read_predication(c, t)?;
            let id = c.u16()?;
            let label = t.label(u32::from(id))?;
            match op {
                Opcode::Jmp => b.append_jmp(pred, emask, size, label),
                Opcode::Call => b.append_call(pred, emask, size, label),
                _ => b.append_goto(pred, emask, size, label),
            }
        }
        Opcode::Ret | Opcode::Fret => {
            let (emask, size) = read_exec_size(c, v)?;
            let pred = read_predication(c, t)?;
            if op == Opcode::Ret {
                b.append_ret(pred, emask, size)
            } else {
                b.append_fret(pred, emask, size)
            }
        }
        Opcode::Fcall => {
            let (emask, size) = read_exec_size(c, v)?;
            let pred = read_predication(c, t)?;
            let id = c.u16()?;
            let arg_size = c.u8()?;
            let return_size = c.u8()?;
            let callee = t.string(u32::from(id))?;
            b.append_fcall(pred, emask, size, callee, arg_size, return_size)
        }
        Opcode::Ifcall => {
            let (emask, size) = read_exec_size(c, v)?;
            let pred = read_predication(c, t)?;
            let address = vsrc(c, v, b, t, size)?;
            let arg_size = c.u8()?;
            let return_size = c.u8()?;
            b.append_ifcall(pred, emask, size, address, arg_size, return_size)
        }
        Opcode::Faddr => {
            let id = c.u16()?;
            let symbol = t.string(u32::from(id))?.to_owned();
            let dst = vdst(c, v, b, t, ExecSize::Simd1)?;
            b.append_faddr(&symbol, dst)
        }
        Opcode::Switchjmp => {
            let (emask, size) = read_exec_size(c, v)?;
            let num_labels = c.u8()?;
            if num_labels == 0 || num_labels > 32 {
                return Err(DecodeError::InvalidEncoding {
                    what: "switchjmp label count",
                    value: u32::from(num_labels),
                    offset: c.pos(),
                });
            }
            let index = vsrc(c, v, b, t, size)?;
            let mut targets = Vec::with_capacity(num_labels as usize);
            for _ in 0..num_labels {
                let id = c.u16()?;
                targets.push(t.label(u32::from(id))?);
            }
            b.append_switch_jmp(emask, size, index, &targets)
        }
        _ => unreachable!("non-flow opcode routed to flow handler"),
    }
}

fn read_sync<B: ProgramBuilder + ?Sized>(
    c: &mut Cursor<'_>,
    v: Version,
    b: &mut B,
    t: &RoutineTables<B>,
    op: Opcode,
) -> Result<()> {
    match op {
        Opcode::Barrier => b.append_barrier(),
        Opcode::Yield => b.append_yield(),
        Opcode::SamplerCacheFlush => b.append_sampler_cache_flush(),
        Opcode::Fence => {
            let mask = FenceMask::from_bits_retain(c.u8()?);
            b.append_fence(mask)
        }
        Opcode::Wait => {
            let mask = if v.wait_has_mask() {
                Some(vsrc(c, v, b, t, ExecSize::Simd1)?)
            } else {
                None
            };
            b.append_wait(mask)
        }
        Opcode::Sbarrier => {
            let mode = c.u8()?;
            b.append_split_barrier(mode != 0)
        }
        Opcode::Nbarrier => {
            let mode = c.u8()?;
            let id = vsrc(c, v, b, t, ExecSize::Simd1)?;
            let barrier_type = vsrc(c, v, b, t, ExecSize::Simd1)?;
            let num_producers = vsrc(c, v, b, t, ExecSize::Simd1)?;
            let num_consumers = vsrc(c, v, b, t, ExecSize::Simd1)?;
            if mode == 0 {
                b.append_nbarrier_wait(id)
            } else {
                b.append_nbarrier_signal(id, barrier_type, num_producers, num_consumers)
            }
        }
        _ => unreachable!("non-sync opcode routed to sync handler"),
    }
}

fn read_dataport<B: ProgramBuilder + ?Sized>(
    c: &mut Cursor<'_>,
    v: Version,
    b: &mut B,
    t: &RoutineTables<B>,
    op: Opcode,
) -> Result<()> {
    match op {
        Opcode::MediaLd | Opcode::MediaSt => {
            let modifier = c.u8()?;
            let surface = surface_byte(c, t)?;
            let plane = c.u8()?;
            let block_width = c.u8()?;
            let block_height = c.u8()?;
            let x_offset = vsrc(c, v, b, t, ExecSize::Simd1)?;
            let y_offset = vsrc(c, v, b, t, ExecSize::Simd1)?;
            let message = raw(c, v, b, t)?;
            if op == Opcode::MediaLd {
                b.append_media_load(
                    modifier,
                    surface,
                    plane,
                    block_width,
                    block_height,
                    x_offset,
                    y_offset,
                    message,
                )
            } else {
                b.append_media_store(
                    modifier,
                    surface,
                    plane,
                    block_width,
                    block_height,
                    x_offset,
                    y_offset,
                    message,
                )
            }
        }
        Opcode::OwordLd | Opcode::OwordLdUnaligned | Opcode::OwordSt => {
            let num_owords = oword_count(c.u8()? & 0x7, c.pos())?;
            if op != Opcode::OwordSt {
                // The modifier byte is dead in the load forms.
                let _ = c.u8()?;
            }
            let surface = surface_byte(c, t)?;
            let offset = vsrc(c, v, b, t, ExecSize::Simd1)?;
            let message = raw(c, v, b, t)?;
            if op == Opcode::OwordSt {
                b.append_oword_store(num_owords, surface, offset, message)
            } else {
                b.append_oword_load(
                    num_owords,
                    op == Opcode::OwordLdUnaligned,
                    surface,
                    offset,
                    message,
                )
            }
        }
        Opcode::Gather | Opcode::Scatter => {
            let elt_bytes = match c.u8()? & 0x3 {
                0 => 1,
                1 => 2,
                2 => 4,
                other => {
                    return Err(DecodeError::InvalidEncoding {
                        what: "gather element size",
                        value: u32::from(other),
                        offset: c.pos(),
                    })
                }
            };
            if op == Opcode::Gather {
                let _ = c.u8()?;
            }
            let elts_byte = c.u8()?;
            let num_elts = match elts_byte & 0x3 {
                0 => 8,
                1 => 16,
                2 => 1,
                other => {
                    return Err(DecodeError::InvalidEncoding {
                        what: "gather element count",
                        value: u32::from(other),
                        offset: c.pos(),
                    })
                }
            };
            let emask = v.decode_emask(elts_byte >> 4, c.pos())?;
            let surface = surface_byte(c, t)?;
            let global_offset = vsrc(c, v, b, t, ExecSize::Simd1)?;
            let element_offsets = raw(c, v, b, t)?;
            let message = raw(c, v, b, t)?;
            if op == Opcode::Gather {
                b.append_gather(
                    emask,
                    elt_bytes,
                    num_elts,
                    surface,
                    global_offset,
                    element_offsets,
                    message,
                )
            } else {
                b.append_scatter(
                    emask,
                    elt_bytes,
                    num_elts,
                    surface,
                    global_offset,
                    element_offsets,
                    message,
                )
            }
        }
        Opcode::Gather4Typed | Opcode::Scatter4Typed => {
            read_typed_gather4(c, v, b, t, op)
        }
        Opcode::Gather4Scaled | Opcode::Scatter4Scaled => {
            let (emask, size) = read_exec_size(c, v)?;
            let pred = read_predication(c, t)?;
            let channel_mask = c.u8()?;
            let _scale = c.u16()?;
            let surface = surface_byte(c, t)?;
            let global_offset = vsrc(c, v, b, t, ExecSize::Simd1)?;
            let offsets = raw(c, v, b, t)?;
            let message = raw(c, v, b, t)?;
            if op == Opcode::Gather4Scaled {
                b.append_gather4_scaled(
                    pred,
                    emask,
                    size,
                    channel_mask,
                    surface,
                    global_offset,
                    offsets,
                    message,
                )
            } else {
                b.append_scatter4_scaled(
                    pred,
                    emask,
                    size,
                    channel_mask,
                    surface,
                    global_offset,
                    offsets,
                    message,
                )
            }
        }
        Opcode::GatherScaled | Opcode::ScatterScaled => {
            let (emask, size) = read_exec_size(c, v)?;
            let pred = read_predication(c, t)?;
            let _block_size = c.u8()?;
            let num_blocks = c.u8()?;
            let _scale = c.u16()?;
            let surface = surface_byte(c, t)?;
            let global_offset = vsrc(c, v, b, t, ExecSize::Simd1)?;
            let offsets = raw(c, v, b, t)?;
            let message = raw(c, v, b, t)?;
            if op == Opcode::GatherScaled {
                b.append_gather_scaled(
                    pred,
                    emask,
                    size,
                    num_blocks,
                    surface,
                    global_offset,
                    offsets,
                    message,
                )
            } else {
                b.append_scatter_scaled(
                    pred,
                    emask,
                    size,
                    num_blocks,
                    surface,
                    global_offset,
                    offsets,
                    message,
                )
            }
        }
        Opcode::QwGather | Opcode::QwScatter => {
            let (emask, size) = read_exec_size(c, v)?;
            let pred = read_predication(c, t)?;
            let num_blocks = c.u8()?;
            let surface = surface_byte(c, t)?;
            let offsets = raw(c, v, b, t)?;
            let message = raw(c, v, b, t)?;
            if op == Opcode::QwGather {
                b.append_qw_gather(pred, emask, size, num_blocks, surface, offsets, message)
            } else {
                b.append_qw_scatter(pred, emask, size, num_blocks, surface, offsets, message)
            }
        }
        Opcode::DwordAtomic => {
            let (atomic_op, width) = decode_atomic(c.u8()?, c.pos())?;
            let (emask, size) = read_exec_size(c, v)?;
            let pred = read_predication(c, t)?;
            let surface = surface_byte(c, t)?;
            let offsets = raw(c, v, b, t)?;
            let src0 = raw(c, v, b, t)?;
            let src1 = raw(c, v, b, t)?;
            let dst = raw(c, v, b, t)?;
            b.append_dword_atomic(
                pred, emask, size, atomic_op, width, surface, offsets, src0, src1, dst,
            )
        }
        Opcode::TypedAtomic3d => {
            let (atomic_op, width) = decode_atomic(c.u8()?, c.pos())?;
            let (emask, size) = read_exec_size(c, v)?;
            let pred = read_predication(c, t)?;
            let surface = surface_byte(c, t)?;
            let u = raw(c, v, b, t)?;
            let vo = raw(c, v, b, t)?;
            let r = raw(c, v, b, t)?;
            let lod = raw(c, v, b, t)?;
            let src0 = raw(c, v, b, t)?;
            let src1 = raw(c, v, b, t)?;
            let dst = raw(c, v, b, t)?;
            b.append_typed_atomic(
                pred, emask, size, atomic_op, width, surface, u, vo, r, lod, src0, src1, dst,
            )
        }
        Opcode::RtWrite3d => {
            let (emask, size) = read_exec_size(c, v)?;
            let pred = read_predication(c, t)?;
            let mode = c.u16()?;
            let surface = surface_byte(c, t)?;
            let r1_header = raw(c, v, b, t)?;
            let sample_index = if mode & (1 << 11) != 0 {
                Some(vsrc(c, v, b, t, size)?)
            } else {
                None
            };
            let cps_counter = if mode & (1 << 8) != 0 {
                Some(vsrc(c, v, b, t, size)?)
            } else {
                None
            };
            let rt_index = if mode & (1 << 2) != 0 {
                Some(vsrc(c, v, b, t, size)?)
            } else {
                None
            };
            let src0_alpha = if mode & (1 << 3) != 0 {
                Some(raw(c, v, b, t)?)
            } else {
                None
            };
            let output_mask = if mode & (1 << 4) != 0 {
                Some(raw(c, v, b, t)?)
            } else {
                None
            };
            let red = raw(c, v, b, t)?;
            let green = raw(c, v, b, t)?;
            let blue = raw(c, v, b, t)?;
            let alpha = raw(c, v, b, t)?;
            let depth = if mode & (1 << 5) != 0 {
                Some(raw(c, v, b, t)?)
            } else {
                None
            };
            let stencil = if mode & (1 << 6) != 0 {
                Some(raw(c, v, b, t)?)
            } else {
                None
            };
            b.append_rt_write(
                pred,
                emask,
                size,
                mode,
                surface,
                RtWriteArgs {
                    r1_header,
                    sample_index,
                    cps_counter,
                    rt_index,
                    src0_alpha,
                    output_mask,
                    red,
                    green,
                    blue,
                    alpha,
                    depth,
                    stencil,
                },
            )
        }
        _ => unreachable!("non-dataport opcode routed to dataport handler"),
    }
}

fn read_typed_gather4<B: ProgramBuilder + ?Sized>(
    c: &mut Cursor<'_>,
    v: Version,
    b: &mut B,
    t: &RoutineTables<B>,
    op: Opcode,
) -> Result<()> {
    let (pred, emask, size, channel_mask, surface, u, vo, r, lod);
    if v.typed_gather4_new_layout() {
        let es = read_exec_size(c, v)?;
        emask = es.0;
        size = es.1;
        pred = read_predication(c, t)?;
        channel_mask = c.u8()?;
        surface = surface_byte(c, t)?;
        u = raw(c, v, b, t)?;
        vo = raw(c, v, b, t)?;
        r = raw(c, v, b, t)?;
        lod = raw(c, v, b, t)?;
    } else {
        // Legacy layout: the channel mask precedes the execution-size byte,
        // is stored complemented, and the lane count must be the encoded
        // zero, meaning eight.
        let mask_byte = c.u8()?;
        let exec_byte = c.u8()?;
        if exec_byte & 0xF != 0 {
            return Err(DecodeError::InvalidEncoding {
                what: "execution size",
                value: u32::from(exec_byte & 0xF),
                offset: c.pos(),
            });
        }
        emask = v.decode_emask(exec_byte >> 4, c.pos())?;
        size = ExecSize::Simd8;
        pred = None;
        channel_mask = !mask_byte & 0xF;
        surface = surface_byte(c, t)?;
        u = raw(c, v, b, t)?;
        vo = raw(c, v, b, t)?;
        r = raw(c, v, b, t)?;
        lod = b.null_raw_operand()?;
    }
    let message = raw(c, v, b, t)?;
    if op == Opcode::Gather4Typed {
        b.append_gather4_typed(pred, emask, size, channel_mask, surface, u, vo, r, lod, message)
    } else {
        b.append_scatter4_typed(pred, emask, size, channel_mask, surface, u, vo, r, lod, message)
    }
}

fn read_misc<B: ProgramBuilder + ?Sized>(
    c: &mut Cursor<'_>,
    v: Version,
    b: &mut B,
    t: &RoutineTables<B>,
    op: Opcode,
) -> Result<()> {
    match op {
        Opcode::File => {
            let index = if v.wide_indices() {
                c.u32()?
            } else {
                u32::from(c.u16()?)
            };
            let name = t.string(index)?.to_owned();
            b.append_file(&name)
        }
        Opcode::Loc => {
            let line = c.u32()?;
            b.append_loc(line)
        }
        Opcode::RawSend => {
            let modifier = c.u8()?;
            let (emask, size) = read_exec_size(c, v)?;
            let pred = read_predication(c, t)?;
            let ex_msg_desc = c.u32()?;
            let num_src = c.u8()?;
            let num_dst = c.u8()?;
            let desc = vsrc(c, v, b, t, size)?;
            let src = raw(c, v, b, t)?;
            let dst = raw(c, v, b, t)?;
            b.append_raw_send(
                pred, emask, size, modifier, ex_msg_desc, num_src, num_dst, desc, src, dst,
            )
        }
        Opcode::RawSends => {
            let modifier = c.u8()?;
            let (emask, size) = read_exec_size(c, v)?;
            let pred = read_predication(c, t)?;
            let num_src0 = c.u8()?;
            let num_src1 = c.u8()?;
            let num_dst = c.u8()?;
            let ffid = if v.raw_sends_has_ffid() { c.u8()? } else { 0 };
            let ex_msg_desc = vsrc(c, v, b, t, size)?;
            let desc = vsrc(c, v, b, t, size)?;
            let src0 = raw(c, v, b, t)?;
            let src1 = raw(c, v, b, t)?;
            let dst = raw(c, v, b, t)?;
            b.append_raw_sends(
                pred,
                emask,
                size,
                modifier & 0x2 != 0,
                num_src0,
                num_src1,
                num_dst,
                ffid,
                ex_msg_desc,
                desc,
                src0,
                src1,
                dst,
            )
        }
        Opcode::RawSendg => {
            let modifier = c.u8()?;
            let (emask, size) = read_exec_size(c, v)?;
            let sfid = c.u32()?;
            let pred = read_predication(c, t)?;
            let dst = raw(c, v, b, t)?;
            let dst_len = c.u32()?;
            let src0 = raw(c, v, b, t)?;
            let src0_len = c.u32()?;
            let src1 = raw(c, v, b, t)?;
            let src1_len = c.u32()?;
            let ind0 = vsrc(c, v, b, t, size)?;
            let ind1 = vsrc(c, v, b, t, size)?;
            let desc_lo = c.u32()?;
            let desc_hi = c.u32()?;
            b.append_raw_sendg(
                pred,
                emask,
                size,
                RawSendgArgs {
                    is_conditional: modifier & 0x1 != 0,
                    is_eot: modifier & 0x2 != 0,
                    sfid,
                    dst,
                    dst_len,
                    src0,
                    src0_len,
                    src1,
                    src1_len,
                    ind0,
                    ind1,
                    desc_lo,
                    desc_hi,
                },
            )
        }
        Opcode::VmeIme => {
            let stream_mode = c.u8()?;
            let search_ctrl = c.u8()?;
            let uni_input = raw(c, v, b, t)?;
            let ime_input = raw(c, v, b, t)?;
            let surface = surface_byte(c, t)?;
            let ref0 = raw(c, v, b, t)?;
            let ref1 = raw(c, v, b, t)?;
            let cost_center = raw(c, v, b, t)?;
            let output = raw(c, v, b, t)?;
            b.append_vme_ime(
                stream_mode,
                search_ctrl,
                uni_input,
                ime_input,
                surface,
                ref0,
                ref1,
                cost_center,
                output,
            )
        }
        Opcode::VmeFbr => {
            let uni_input = raw(c, v, b, t)?;
            let fbr_input = raw(c, v, b, t)?;
            let surface = surface_byte(c, t)?;
            let mb_mode = vsrc(c, v, b, t, ExecSize::Simd1)?;
            let sub_mb_shape = vsrc(c, v, b, t, ExecSize::Simd1)?;
            let sub_pred_mode = vsrc(c, v, b, t, ExecSize::Simd1)?;
            let output = raw(c, v, b, t)?;
            b.append_vme_fbr(
                uni_input,
                fbr_input,
                surface,
                mb_mode,
                sub_mb_shape,
                sub_pred_mode,
                output,
            )
        }
        Opcode::VmeSic | Opcode::VmeIdm => {
            let uni_input = raw(c, v, b, t)?;
            let input = raw(c, v, b, t)?;
            let surface = surface_byte(c, t)?;
            let output = raw(c, v, b, t)?;
            if op == Opcode::VmeSic {
                b.append_vme_sic(uni_input, input, surface, output)
            } else {
                b.append_vme_idm(uni_input, input, surface, output)
            }
        }
        Opcode::UrbWrite3d => {
            let (emask, size) = read_exec_size(c, v)?;
            let pred = read_predication(c, t)?;
            let num_out = c.u8()?;
            let channel_mask = raw(c, v, b, t)?;
            let global_offset = c.u16()?;
            let urb_handle = raw(c, v, b, t)?;
            let per_slot_offset = raw(c, v, b, t)?;
            let vertex_data = raw(c, v, b, t)?;
            b.append_urb_write(
                pred,
                emask,
                size,
                num_out,
                channel_mask,
                global_offset,
                urb_handle,
                per_slot_offset,
                vertex_data,
            )
        }
        Opcode::Dpas | Opcode::Dpasw => {
            let (emask, size) = read_exec_size(c, v)?;
            let dst = raw(c, v, b, t)?;
            let src0 = raw(c, v, b, t)?;
            let src1 = raw(c, v, b, t)?;
            let src2 = vsrc(c, v, b, t, size)?;
            let control = c.u32()?;
            let [a_precision, w_precision, depth, repeat] = control.to_le_bytes();
            b.append_dpas(
                op,
                emask,
                size,
                dst,
                src0,
                src1,
                src2,
                a_precision,
                w_precision,
                depth,
                repeat,
            )
        }
        Opcode::Lifetime => {
            let properties = c.u8()?;
            let var_id = if v.wide_indices() {
                c.u32()?
            } else {
                u32::from(c.u16()?)
            };
            let start = properties & 0x1 == 0;
            let var = match properties >> 4 {
                0 => LifetimeRef::General(t.general(var_id)?),
                1 => LifetimeRef::Address(t.address(var_id)?),
                2 => LifetimeRef::Predicate(t.predicate(var_id)?),
                other => {
                    return Err(DecodeError::InvalidEncoding {
                        what: "lifetime variable class",
                        value: u32::from(other),
                        offset: c.pos(),
                    })
                }
            };
            b.append_lifetime(start, var)
        }
        _ => unreachable!("non-misc opcode routed to misc handler"),
    }
}

fn read_svm<B: ProgramBuilder + ?Sized>(
    c: &mut Cursor<'_>,
    v: Version,
    b: &mut B,
    t: &RoutineTables<B>,
) -> Result<()> {
    let sub = SvmSubOp::from_u8(c.u8()?, c.pos())?;
    match sub {
        SvmSubOp::BlockLd | SvmSubOp::BlockSt => {
            let owords = c.u8()?;
            let unaligned = owords & 0x8 != 0;
            let num_owords = oword_count(owords & 0x7, c.pos())?;
            let address = vsrc(c, v, b, t, ExecSize::Simd1)?;
            let data = raw(c, v, b, t)?;
            if sub == SvmSubOp::BlockLd {
                b.append_svm_block_load(num_owords, unaligned, address, data)
            } else {
                b.append_svm_block_store(num_owords, address, data)
            }
        }
        SvmSubOp::Gather | SvmSubOp::Scatter => {
            let (emask, size) = read_exec_size(c, v)?;
            let pred = read_predication(c, t)?;
            let block_size = c.u8()? & 0x3;
            let num_blocks = c.u8()? & 0x3;
            let addresses = raw(c, v, b, t)?;
            let data = raw(c, v, b, t)?;
            if sub == SvmSubOp::Gather {
                b.append_svm_gather(pred, emask, size, block_size, num_blocks, addresses, data)
            } else {
                b.append_svm_scatter(pred, emask, size, block_size, num_blocks, addresses, data)
            }
        }
        SvmSubOp::Atomic => {
            let (emask, size) = read_exec_size(c, v)?;
            let pred = read_predication(c, t)?;
            let (atomic_op, width) = decode_atomic(c.u8()?, c.pos())?;
            let addresses = raw(c, v, b, t)?;
            let src0 = raw(c, v, b, t)?;
            let src1 = raw(c, v, b, t)?;
            let dst = raw(c, v, b, t)?;
            b.append_svm_atomic(
                pred, emask, size, atomic_op, width, addresses, src0, src1, dst,
            )
        }
        SvmSubOp::Gather4Scaled | SvmSubOp::Scatter4Scaled => {
            let (emask, size) = read_exec_size(c, v)?;
            let pred = read_predication(c, t)?;
            let channel_mask = c.u8()?;
            let _scale = c.u16()?;
            let address = vsrc(c, v, b, t, ExecSize::Simd1)?;
            let offsets = raw(c, v, b, t)?;
            let data = raw(c, v, b, t)?;
            if sub == SvmSubOp::Gather4Scaled {
                b.append_svm_gather4_scaled(pred, emask, size, channel_mask, address, offsets, data)
            } else {
                b.append_svm_scatter4_scaled(
                    pred, emask, size, channel_mask, address, offsets, data,
                )
            }
        }
    }
}

fn read_sampler3d_sub(c: &mut Cursor<'_>, v: Version) -> Result<(Sampler3dOp, Sample3dFlags)> {
    if v.wide_sampler_sub_opcode() {
        let val = c.u16()?;
        let op = Sampler3dOp::from_u8((val & 0xFF) as u8, c.pos())?;
        Ok((
            op,
            Sample3dFlags {
                pixel_null_mask: val & (1 << 8) != 0,
                cps_enable: val & (1 << 9) != 0,
                non_uniform: val & (1 << 10) != 0,
            },
        ))
    } else {
        let val = c.u8()?;
        let op = Sampler3dOp::from_u8(val & 0x1F, c.pos())?;
        Ok((
            op,
            Sample3dFlags {
                pixel_null_mask: val & (1 << 5) != 0,
                cps_enable: val & (1 << 6) != 0,
                non_uniform: val & (1 << 7) != 0,
            },
        ))
    }
}

fn read_aoffimmi<B: ProgramBuilder + ?Sized>(
    c: &mut Cursor<'_>,
    v: Version,
    b: &mut B,
    t: &RoutineTables<B>,
) -> Result<B::Operand> {
    if v.aoffimmi_is_vector() {
        vsrc(c, v, b, t, ExecSize::Simd1)
    } else {
        let bits = u64::from(c.u16()?);
        b.immediate(Immediate {
            ty: VisaType::Uw,
            bits,
        })
    }
}

fn read_paired_surface<B: ProgramBuilder + ?Sized>(
    c: &mut Cursor<'_>,
    v: Version,
    b: &mut B,
    t: &RoutineTables<B>,
) -> Result<B::RawOperand> {
    if v.has_paired_surface() {
        raw(c, v, b, t)
    } else {
        b.null_raw_operand()
    }
}

fn read_sample3d_params<B: ProgramBuilder + ?Sized>(
    c: &mut Cursor<'_>,
    v: Version,
    b: &mut B,
    t: &RoutineTables<B>,
    max: u8,
) -> Result<Vec<B::RawOperand>> {
    let num_params = c.u8()?;
    if num_params >= max {
        return Err(DecodeError::InvalidEncoding {
            what: "sampler parameter count",
            value: u32::from(num_params),
            offset: c.pos(),
        });
    }
    let mut params = Vec::with_capacity(num_params as usize);
    for _ in 0..num_params {
        params.push(raw(c, v, b, t)?);
    }
    Ok(params)
}

fn read_sampler<B: ProgramBuilder + ?Sized>(
    c: &mut Cursor<'_>,
    v: Version,
    b: &mut B,
    t: &RoutineTables<B>,
    op: Opcode,
) -> Result<()> {
    match op {
        Opcode::Sample | Opcode::Load => {
            let mode = c.u8()?;
            let channel_mask = mode & 0xF;
            let simd16 = (mode >> 4) & 0x3 != 0;
            let sampler = if op == Opcode::Sample {
                Some(sampler_byte(c, t)?)
            } else {
                None
            };
            let surface = surface_byte(c, t)?;
            let u = raw(c, v, b, t)?;
            let vo = raw(c, v, b, t)?;
            let r = raw(c, v, b, t)?;
            let dst = raw(c, v, b, t)?;
            match sampler {
                Some(sampler) => {
                    b.append_sample(channel_mask, simd16, sampler, surface, u, vo, r, dst)
                }
                None => b.append_sampler_load(channel_mask, simd16, surface, u, vo, r, dst),
            }
        }
        Opcode::SampleUnorm => {
            let channel_mask = c.u8()?;
            let sampler = sampler_byte(c, t)?;
            let surface = surface_byte(c, t)?;
            let u_offset = vsrc(c, v, b, t, ExecSize::Simd1)?;
            let v_offset = vsrc(c, v, b, t, ExecSize::Simd1)?;
            let delta_u = vsrc(c, v, b, t, ExecSize::Simd1)?;
            let delta_v = vsrc(c, v, b, t, ExecSize::Simd1)?;
            let dst = raw(c, v, b, t)?;
            b.append_sample_unorm(
                channel_mask,
                sampler,
                surface,
                u_offset,
                v_offset,
                delta_u,
                delta_v,
                dst,
            )
        }
        Opcode::Avs => {
            let channel_mask = c.u8()?;
            let sampler = sampler_byte(c, t)?;
            let surface = surface_byte(c, t)?;
            let u_offset = vsrc(c, v, b, t, ExecSize::Simd1)?;
            let v_offset = vsrc(c, v, b, t, ExecSize::Simd1)?;
            let delta_u = vsrc(c, v, b, t, ExecSize::Simd1)?;
            let delta_v = vsrc(c, v, b, t, ExecSize::Simd1)?;
            let u2d = vsrc(c, v, b, t, ExecSize::Simd1)?;
            let group_id = vsrc(c, v, b, t, ExecSize::Simd1)?;
            let vertical_block_number = vsrc(c, v, b, t, ExecSize::Simd1)?;
            let cntrl = c.u8()?;
            let v2d = vsrc(c, v, b, t, ExecSize::Simd1)?;
            let exec_mode = c.u8()?;
            let ief_bypass = vsrc(c, v, b, t, ExecSize::Simd1)?;
            let dst = raw(c, v, b, t)?;
            b.append_avs(AvsArgs {
                channel_mask,
                sampler,
                surface,
                u_offset,
                v_offset,
                delta_u,
                delta_v,
                u2d,
                group_id,
                vertical_block_number,
                cntrl,
                v2d,
                exec_mode,
                ief_bypass,
                dst,
            })
        }
        Opcode::Sample3d | Opcode::Load3d | Opcode::Gather43d => {
            let (sub, flags) = read_sampler3d_sub(c, v)?;
            let (emask, size) = read_exec_size(c, v)?;
            let pred = read_predication(c, t)?;
            let channel_mask = c.u8()?;
            let aoffimmi = read_aoffimmi(c, v, b, t)?;
            let sampler = if op == Opcode::Load3d {
                None
            } else {
                Some(sampler_byte(c, t)?)
            };
            let surface = surface_byte(c, t)?;
            let dst = raw(c, v, b, t)?;
            let paired_surface = read_paired_surface(c, v, b, t)?;
            let max_params = if op == Opcode::Gather43d { 8 } else { 16 };
            let params = read_sample3d_params(c, v, b, t, max_params)?;
            let args = Sample3dArgs {
                channel_mask,
                aoffimmi,
                sampler,
                surface,
                paired_surface,
                dst,
                params,
            };
            match op {
                Opcode::Sample3d => b.append_sample_3d(sub, flags, pred, emask, size, args),
                Opcode::Load3d => b.append_load_3d(sub, flags, pred, emask, size, args),
                _ => b.append_gather4_3d(sub, pred, emask, size, args),
            }
        }
        Opcode::Info3d => {
            let sub = Sampler3dOp::from_u8(c.u8()?, c.pos())?;
            let (emask, size) = read_exec_size(c, v)?;
            let channel_mask = c.u8()?;
            let surface = surface_byte(c, t)?;
            let lod = if sub == Sampler3dOp::Resinfo {
                Some(raw(c, v, b, t)?)
            } else {
                None
            };
            let dst = raw(c, v, b, t)?;
            b.append_info_3d(sub, emask, size, channel_mask, surface, lod, dst)
        }
        Opcode::Va => read_va(c, v, b, t),
        Opcode::VaSklPlus => read_va_plus(c, v, b, t),
        _ => unreachable!("non-sampler opcode routed to sampler handler"),
    }
}

fn read_va<B: ProgramBuilder + ?Sized>(
    c: &mut Cursor<'_>,
    v: Version,
    b: &mut B,
    t: &RoutineTables<B>,
) -> Result<()> {
    let sub = VaSubOp::from_u8(c.u8()?, c.pos())?;
    let sampler = if sub.has_sampler() {
        Some(sampler_byte(c, t)?)
    } else {
        None
    };
    let surface = surface_byte(c, t)?;
    let u_offset = vsrc(c, v, b, t, ExecSize::Simd1)?;
    let v_offset = vsrc(c, v, b, t, ExecSize::Simd1)?;
    match (sub, sampler) {
        (VaSubOp::MinMax, None) => {
            let mmf_mode = vsrc(c, v, b, t, ExecSize::Simd1)?;
            let dst = raw(c, v, b, t)?;
            b.append_va_min_max(surface, u_offset, v_offset, mmf_mode, dst)
        }
        (VaSubOp::MinMaxFilter, Some(sampler)) => {
            let cntrl = c.u8()?;
            let exec_mode = c.u8()?;
            let mmf_mode = vsrc(c, v, b, t, ExecSize::Simd1)?;
            let dst = raw(c, v, b, t)?;
            b.append_va_min_max_filter(
                sampler, surface, u_offset, v_offset, cntrl, exec_mode, mmf_mode, dst,
            )
        }
        (VaSubOp::BoolCentroid, None) => {
            let v_size = vsrc(c, v, b, t, ExecSize::Simd1)?;
            let h_size = vsrc(c, v, b, t, ExecSize::Simd1)?;
            let dst = raw(c, v, b, t)?;
            b.append_va_bool_centroid(surface, u_offset, v_offset, v_size, h_size, dst)
        }
        (VaSubOp::Centroid, None) => {
            let v_size = vsrc(c, v, b, t, ExecSize::Simd1)?;
            let dst = raw(c, v, b, t)?;
            b.append_va_centroid(surface, u_offset, v_offset, v_size, dst)
        }
        (VaSubOp::Convolve, Some(sampler)) => {
            let properties = c.u8()?;
            let dst = raw(c, v, b, t)?;
            b.append_va_convolve(
                sampler,
                surface,
                u_offset,
                v_offset,
                properties & 0x3,
                properties & 0x10 != 0,
                dst,
            )
        }
        (VaSubOp::Erode | VaSubOp::Dilate, Some(sampler)) => {
            let exec_mode = c.u8()?;
            let dst = raw(c, v, b, t)?;
            b.append_va_erode_dilate(
                sub == VaSubOp::Erode,
                sampler,
                surface,
                u_offset,
                v_offset,
                exec_mode,
                dst,
            )
        }
        (VaSubOp::Avs, _) => Err(DecodeError::InvalidEncoding {
            what: "va sub-opcode",
            value: VaSubOp::Avs as u32,
            offset: c.pos(),
        }),
        _ => unreachable!("sampler presence follows the sub-opcode"),
    }
}

fn read_va_plus<B: ProgramBuilder + ?Sized>(
    c: &mut Cursor<'_>,
    v: Version,
    b: &mut B,
    t: &RoutineTables<B>,
) -> Result<()> {
    let sub = VaPlusSubOp::from_u8(c.u8()?, c.pos())?;
    let mut samplers = Vec::new();
    let mut surfaces = Vec::new();
    let mut vectors = Vec::new();
    let mut raw_srcs = Vec::new();
    let mut scalars = Vec::new();
    let mut dst = None;
    for field in sub.fields() {
        match field {
            VaPlusField::Sampler => samplers.push(sampler_byte(c, t)?),
            VaPlusField::Surface => surfaces.push(surface_byte(c, t)?),
            VaPlusField::Vector => vectors.push(vsrc(c, v, b, t, ExecSize::Simd1)?),
            VaPlusField::RawSrc => raw_srcs.push(raw(c, v, b, t)?),
            VaPlusField::RawDst => dst = Some(raw(c, v, b, t)?),
            VaPlusField::Scalar(width) => {
                let value = match width {
                    1 => u32::from(c.u8()?),
                    2 => u32::from(c.u16()?),
                    _ => c.u32()?,
                };
                scalars.push(value);
            }
        }
    }
    b.append_va_plus(
        sub,
        crate::builder::VaPlusArgs {
            samplers,
            surfaces,
            vectors,
            raw_srcs,
            scalars,
            dst,
        },
    )
}

fn read_lsc_caching(c: &mut Cursor<'_>) -> Result<LscCaching> {
    Ok(LscCaching {
        l1: c.u8()?,
        l3: c.u8()?,
    })
}

fn read_lsc<B: ProgramBuilder + ?Sized>(
    c: &mut Cursor<'_>,
    v: Version,
    b: &mut B,
    t: &RoutineTables<B>,
    op: Opcode,
) -> Result<()> {
    if op == Opcode::LscFence {
        let (emask, size) = read_exec_size(c, v)?;
        // The predicate slot is encoded but a fence cannot be predicated.
        let _ = read_predication(c, t)?;
        let sfid = c.u8()?;
        let fence_op = c.u8()?;
        let scope = c.u8()?;
        return b.append_lsc_fence(emask, size, sfid, fence_op, scope);
    }

    let sub = LscSubOp::from_u8(c.u8()?, c.pos())?;
    let (emask, size) = read_exec_size(c, v)?;
    let pred = read_predication(c, t)?;

    if op == Opcode::LscUntyped {
        let sfid = c.u8()?;
        let caching = read_lsc_caching(c)?;
        if sub.is_block2d() {
            let shape = LscBlock2dShape {
                size: c.u8()?,
                order: c.u8()?,
                blocks: c.u8()?,
                width: c.u16()?,
                height: c.u16()?,
                vnni: c.u8()? != 0,
            };
            let dst = raw(c, v, b, t)?;
            let addrs = [
                vsrc(c, v, b, t, ExecSize::Simd1)?,
                vsrc(c, v, b, t, ExecSize::Simd1)?,
                vsrc(c, v, b, t, ExecSize::Simd1)?,
                vsrc(c, v, b, t, ExecSize::Simd1)?,
                vsrc(c, v, b, t, ExecSize::Simd1)?,
                vsrc(c, v, b, t, ExecSize::Simd1)?,
            ];
            let src1 = raw(c, v, b, t)?;
            return b.append_lsc_untyped_block2d(
                sub,
                pred,
                emask,
                size,
                LscBlock2dArgs {
                    sfid,
                    caching,
                    shape,
                    dst,
                    addrs,
                    src1,
                },
            );
        }
        if sub.is_append_counter() {
            let addr_type = c.u8()?;
            let shape = LscDataShape {
                size: c.u8()?,
                order: c.u8()?,
                elems: c.u8()?,
                chmask: c.u8()?,
            };
            let surface = vsrc(c, v, b, t, ExecSize::Simd1)?;
            let surface_index = c.u32()?;
            let dst = raw(c, v, b, t)?;
            let src = raw(c, v, b, t)?;
            return b.append_lsc_append_counter(
                sub,
                pred,
                emask,
                size,
                sfid,
                caching,
                addr_type,
                shape,
                surface,
                surface_index,
                dst,
                src,
            );
        }
        let addr = LscAddr {
            addr_type: c.u8()?,
            imm_scale: c.u16()?,
            imm_offset: c.i32()?,
            size: c.u8()?,
        };
        let mut shape = LscDataShape {
            size: c.u8()?,
            order: c.u8()?,
            elems: c.u8()?,
            chmask: 0,
        };
        if sub.uses_channel_mask() {
            shape.chmask = c.u8()?;
        }
        let surface = vsrc(c, v, b, t, ExecSize::Simd1)?;
        let surface_index = c.u32()?;
        let dst = raw(c, v, b, t)?;
        let src0 = raw(c, v, b, t)?;
        let src0_pitch = if sub.is_strided() {
            Some(vsrc(c, v, b, t, ExecSize::Simd1)?)
        } else {
            None
        };
        let src1 = raw(c, v, b, t)?;
        let src2 = if sub.is_strided() {
            None
        } else {
            Some(raw(c, v, b, t)?)
        };
        return b.append_lsc_untyped(
            sub,
            pred,
            emask,
            size,
            LscUntypedArgs {
                sfid,
                caching,
                addr,
                shape,
                surface,
                surface_index,
                dst,
                src0,
                src0_pitch,
                src1,
                src2,
            },
        );
    }

    // Typed forms route to the sampler data port; no sfid byte is encoded.
    let caching = read_lsc_caching(c)?;
    if sub.is_block2d() {
        let addr_type = c.u8()?;
        let width = c.u16()?;
        let height = c.u16()?;
        let surface = vsrc(c, v, b, t, ExecSize::Simd1)?;
        let surface_index = c.u32()?;
        let dst = raw(c, v, b, t)?;
        let x_offset = vsrc(c, v, b, t, ExecSize::Simd1)?;
        let y_offset = vsrc(c, v, b, t, ExecSize::Simd1)?;
        let src1 = raw(c, v, b, t)?;
        return b.append_lsc_typed_block2d(
            sub,
            pred,
            emask,
            size,
            LscTypedBlock2dArgs {
                caching,
                addr_type,
                width,
                height,
                surface,
                surface_index,
                dst,
                x_offset,
                y_offset,
                src1,
            },
        );
    }
    let addr_type = c.u8()?;
    let addr_size = c.u8()?;
    let shape = LscDataShape {
        size: c.u8()?,
        order: c.u8()?,
        elems: c.u8()?,
        chmask: c.u8()?,
    };
    let surface = vsrc(c, v, b, t, ExecSize::Simd1)?;
    let surface_index = c.u32()?;
    let dst = raw(c, v, b, t)?;
    let u = raw(c, v, b, t)?;
    let u_offset = c.i32()?;
    let vo = raw(c, v, b, t)?;
    let v_offset = c.i32()?;
    let r = raw(c, v, b, t)?;
    let r_offset = c.i32()?;
    let lod = raw(c, v, b, t)?;
    let src1 = raw(c, v, b, t)?;
    let src2 = raw(c, v, b, t)?;
    b.append_lsc_typed(
        sub,
        pred,
        emask,
        size,
        LscTypedArgs {
            caching,
            addr_type,
            addr_size,
            shape,
            surface,
            surface_index,
            dst,
            u: (u, u_offset),
            v: (vo, v_offset),
            r: (r, r_offset),
            lod,
            src1,
            src2,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn oword_counts() {
        assert_eq!(oword_count(0, 0).unwrap(), 1);
        assert_eq!(oword_count(3, 0).unwrap(), 8);
        assert_eq!(oword_count(4, 0).unwrap(), 16);
        assert!(oword_count(5, 0).is_err());
    }
}
