//! Declaration-section decoding.
//!
//! Every routine opens with its declaration tables: the string pool, then
//! general, address, predicate, label, sampler, and surface variables, the
//! kernel input bindings, and finally the routine attributes. Tables are
//! populated strictly in stream order; indices in later records may only
//! reference slots that already exist.

use tracing::trace;

use crate::attrs::{self, AttrValue, Attribute};
use crate::builder::{InputVar, ProgramBuilder, VarRef};
use crate::cursor::Cursor;
use crate::error::{DecodeError, Result};
use crate::isa::{
    Align, InputClass, LabelKind, VisaType, BINDLESS_SAMPLER_SLOT, MAX_SAMPLER_SLOTS,
    NUM_PREDEFINED_SURFACES, NUM_PREDEFINED_VARS,
};
use crate::version::Version;

/// Handle tables for one routine, indexed exactly as the stream indexes them.
///
/// The general table is seeded with the 32 predefined variables, the surface
/// table with the 6 predefined surfaces, and predicate slot 0 is the
/// no-predicate sentinel. Sampler slot 31 holds the bindless sampler.
pub struct RoutineTables<B: ProgramBuilder + ?Sized> {
    /// String pool.
    pub strings: Vec<String>,
    /// General variables; `0..32` predefined, stream declarations follow.
    pub generals: Vec<B::GenVar>,
    /// Address variables.
    pub addresses: Vec<B::AddrVar>,
    /// Predicate variables; slot 0 is reserved.
    pub predicates: Vec<Option<B::PredVar>>,
    /// Sampler variables; fixed 32 slots, slot 31 bindless.
    pub samplers: Vec<Option<B::SamplerVar>>,
    /// Surface variables; `0..6` predefined.
    pub surfaces: Vec<B::SurfaceVar>,
    /// Labels.
    pub labels: Vec<B::Label>,
}

impl<B: ProgramBuilder + ?Sized> RoutineTables<B> {
    /// Resolves a string-pool index.
    pub fn string(&self, index: u32) -> Result<&str> {
        self.strings
            .get(index as usize)
            .map(String::as_str)
            .ok_or(DecodeError::IndexOutOfRange {
                table: "string",
                index,
                len: self.strings.len(),
            })
    }

    /// Resolves a general-variable index.
    pub fn general(&self, index: u32) -> Result<B::GenVar> {
        self.generals
            .get(index as usize)
            .copied()
            .ok_or(DecodeError::IndexOutOfRange {
                table: "general variable",
                index,
                len: self.generals.len(),
            })
    }

    /// Resolves an address-variable index.
    pub fn address(&self, index: u32) -> Result<B::AddrVar> {
        self.addresses
            .get(index as usize)
            .copied()
            .ok_or(DecodeError::IndexOutOfRange {
                table: "address variable",
                index,
                len: self.addresses.len(),
            })
    }

    /// Resolves a predicate-variable index. Slot 0 never resolves; it encodes
    /// the absence of a predicate.
    pub fn predicate(&self, index: u32) -> Result<B::PredVar> {
        self.predicates
            .get(index as usize)
            .copied()
            .flatten()
            .ok_or(DecodeError::IndexOutOfRange {
                table: "predicate variable",
                index,
                len: self.predicates.len(),
            })
    }

    /// Resolves a sampler index.
    pub fn sampler(&self, index: u32) -> Result<B::SamplerVar> {
        self.samplers
            .get(index as usize)
            .copied()
            .flatten()
            .ok_or(DecodeError::IndexOutOfRange {
                table: "sampler variable",
                index,
                len: self.samplers.len(),
            })
    }

    /// Resolves a surface index.
    pub fn surface(&self, index: u32) -> Result<B::SurfaceVar> {
        self.surfaces
            .get(index as usize)
            .copied()
            .ok_or(DecodeError::IndexOutOfRange {
                table: "surface variable",
                index,
                len: self.surfaces.len(),
            })
    }

    /// Resolves a label index.
    pub fn label(&self, index: u32) -> Result<B::Label> {
        self.labels
            .get(index as usize)
            .copied()
            .ok_or(DecodeError::IndexOutOfRange {
                table: "label",
                index,
                len: self.labels.len(),
            })
    }
}

/// Result of decoding a routine's declaration section: the populated tables
/// plus the location of the instruction stream within the routine window.
pub struct DeclSection<B: ProgramBuilder + ?Sized> {
    /// Populated handle tables.
    pub tables: RoutineTables<B>,
    /// Byte size of the instruction stream.
    pub code_size: u32,
    /// Offset of the first instruction, relative to the routine window.
    pub code_entry: u32,
}

fn attach_all<B: ProgramBuilder + ?Sized>(
    builder: &mut B,
    var: VarRef<B>,
    attrs: &[Attribute],
) -> Result<()> {
    for attr in attrs {
        builder.attach_attribute(var, attr)?;
    }
    Ok(())
}

/// Decodes a routine's declaration section from the start of its window.
pub fn read_decl_section<B: ProgramBuilder + ?Sized>(
    cursor: &mut Cursor<'_>,
    version: Version,
    builder: &mut B,
    is_kernel: bool,
) -> Result<DeclSection<B>> {
    // String pool.
    let string_count = cursor.var_index(version)?;
    let mut strings = Vec::with_capacity(string_count as usize);
    for i in 0..string_count {
        strings.push(cursor.cstr(i)?);
    }

    // The routine records its own name as a pool index; nothing further uses
    // it, but it must resolve.
    let name_index = cursor.var_index(version)?;
    if name_index as usize >= strings.len() && string_count > 0 {
        return Err(DecodeError::IndexOutOfRange {
            table: "string",
            index: name_index,
            len: strings.len(),
        });
    }

    let mut tables = RoutineTables::<B> {
        strings,
        generals: Vec::new(),
        addresses: Vec::new(),
        predicates: vec![None],
        samplers: vec![None; MAX_SAMPLER_SLOTS],
        surfaces: Vec::new(),
        labels: Vec::new(),
    };

    // General variables, behind the 32 predefined slots.
    let general_count = cursor.var_index(version)?;
    tables.generals.reserve(NUM_PREDEFINED_VARS as usize + general_count as usize);
    for i in 0..NUM_PREDEFINED_VARS {
        tables.generals.push(builder.predefined_var(i as u8)?);
    }
    for i in 0..general_count {
        let table_index = u32::from(NUM_PREDEFINED_VARS) + i;
        let name_index = cursor.var_index(version)?;
        let name = tables.string(name_index)?.to_owned();
        let bit_properties = cursor.u8()?;
        let ty = VisaType::from_u8(bit_properties & 0xF, cursor.pos())?;
        let align = Align::from_u8(bit_properties >> 4, cursor.pos())?;
        let num_elements = cursor.u16()?;
        let alias_index = cursor.var_index(version)?;
        let alias_offset = cursor.u16()?;
        let alias_scope = cursor.u8()?;
        if alias_scope != 0 {
            return Err(DecodeError::DeprecatedNonZero {
                what: "alias scope",
                found: u32::from(alias_scope),
            });
        }
        let alias = if alias_index == 0 {
            None
        } else if alias_index < table_index {
            Some((tables.general(alias_index)?, alias_offset))
        } else {
            return Err(DecodeError::AliasNotYetDeclared {
                index: table_index,
                alias: alias_index,
            });
        };
        let var = builder.declare_general(&name, num_elements, ty, align, alias)?;
        tables.generals.push(var);
        let attr_count = cursor.u8()?;
        let attrs = attrs::read_attributes(cursor, version, &tables.strings, attr_count as usize)?;
        attach_all(builder, VarRef::General(var), &attrs)?;
    }
    trace!(count = general_count, "general variables declared");

    // Address variables.
    let address_count = cursor.u16()?;
    for _ in 0..address_count {
        let name_index = cursor.var_index(version)?;
        let name = tables.string(name_index)?.to_owned();
        let num_elements = cursor.u16()?;
        let var = builder.declare_address(&name, num_elements)?;
        tables.addresses.push(var);
        let attr_count = cursor.u8()?;
        let attrs = attrs::read_attributes(cursor, version, &tables.strings, attr_count as usize)?;
        attach_all(builder, VarRef::Address(var), &attrs)?;
    }

    // Predicate variables, slots 1..=count.
    let predicate_count = cursor.u16()?;
    for _ in 0..predicate_count {
        let name_index = cursor.var_index(version)?;
        let name = tables.string(name_index)?.to_owned();
        let num_elements = cursor.u16()?;
        let var = builder.declare_predicate(&name, num_elements)?;
        tables.predicates.push(Some(var));
        let attr_count = cursor.u8()?;
        let attrs = attrs::read_attributes(cursor, version, &tables.strings, attr_count as usize)?;
        attach_all(builder, VarRef::Predicate(var), &attrs)?;
    }

    // Labels. Display names are made unique by appending the table index;
    // FC labels keep their pool string verbatim.
    let label_count = cursor.u16()?;
    for i in 0..label_count {
        let name_index = cursor.var_index(version)?;
        let kind = LabelKind::from_u8(cursor.u8()?, cursor.pos())?;
        let base = tables.string(name_index)?;
        let name = if kind == LabelKind::Fc {
            base.to_owned()
        } else if name_index == 0 {
            format!("L{i}")
        } else {
            format!("{base}_{i}")
        };
        let attr_count = cursor.u8()?;
        if attr_count != 0 {
            return Err(DecodeError::LabelAttributes {
                index: u32::from(i),
                count: attr_count,
            });
        }
        tables.labels.push(builder.declare_label(&name, kind)?);
    }

    // Samplers occupy slots 0..count of a fixed 32-slot table; slot 31 is
    // reserved for the bindless sampler.
    let sampler_count = cursor.u8()?;
    if sampler_count as usize >= MAX_SAMPLER_SLOTS {
        return Err(DecodeError::TooManySamplers {
            count: sampler_count,
        });
    }
    for slot in 0..sampler_count {
        let name_index = cursor.var_index(version)?;
        let name = tables.string(name_index)?.to_owned();
        let num_elements = cursor.u16()?;
        let var = builder.declare_sampler(&name, num_elements)?;
        tables.samplers[slot as usize] = Some(var);
        let attr_count = cursor.u8()?;
        let attrs = attrs::read_attributes(cursor, version, &tables.strings, attr_count as usize)?;
        attach_all(builder, VarRef::Sampler(var), &attrs)?;
    }
    tables.samplers[BINDLESS_SAMPLER_SLOT] = Some(builder.bindless_sampler()?);

    // Surfaces, behind the 6 predefined slots. A `SurfaceUsage` attribute of
    // 2 marks the surface read-write, so attributes are decoded before the
    // declaration call.
    let surface_count = cursor.u8()?;
    for i in 0..NUM_PREDEFINED_SURFACES {
        tables.surfaces.push(builder.predefined_surface(i)?);
    }
    for _ in 0..surface_count {
        let name_index = cursor.var_index(version)?;
        let name = tables.string(name_index)?.to_owned();
        let num_elements = cursor.u16()?;
        let attr_count = cursor.u8()?;
        let attrs = attrs::read_attributes(cursor, version, &tables.strings, attr_count as usize)?;
        let read_write = attrs
            .iter()
            .any(|a| a.name == "SurfaceUsage" && a.value == AttrValue::Int32(2));
        let var = builder.declare_surface(&name, num_elements, read_write)?;
        tables.surfaces.push(var);
        attach_all(builder, VarRef::Surface(var), &attrs)?;
    }

    // VME variables are long dead; the count must still be present and zero.
    let vme_count = cursor.u8()?;
    if vme_count != 0 {
        return Err(DecodeError::DeprecatedNonZero {
            what: "vme variable",
            found: u32::from(vme_count),
        });
    }

    // Kernel input bindings.
    if is_kernel {
        let input_count = cursor.input_count(version)?;
        for _ in 0..input_count {
            let kind = cursor.u8()?;
            let class = InputClass::from_u8(kind & 0x7, cursor.pos())?;
            let implicit_kind = kind >> 3;
            let index = cursor.var_index(version)?;
            let offset = cursor.i16()?;
            let size = cursor.u16()?;
            let var = match class {
                InputClass::General => InputVar::General(tables.general(index)?),
                InputClass::Sampler => InputVar::Sampler(tables.sampler(index)?),
                InputClass::Surface => InputVar::Surface(tables.surface(index)?),
            };
            builder.register_input(var, offset, size, implicit_kind)?;
        }
    }

    let code_size = cursor.u32()?;
    let code_entry = cursor.u32()?;

    if !is_kernel {
        let input_size = cursor.u8()?;
        let return_size = cursor.u8()?;
        builder.set_frame_sizes(input_size, return_size)?;
    }

    // Routine attributes. Kernels without an explicit Target get the default.
    let attr_count = cursor.u16()?;
    let routine_attrs =
        attrs::read_attributes(cursor, version, &tables.strings, attr_count as usize)?;
    let mut has_target = false;
    for attr in &routine_attrs {
        if attr.name == "Target" {
            has_target = true;
        }
        builder.set_routine_attribute(attr)?;
    }
    if is_kernel && !has_target {
        builder.set_routine_attribute(&Attribute {
            name: "Target".to_owned(),
            value: AttrValue::Int32(0),
        })?;
    }

    Ok(DeclSection {
        tables,
        code_size,
        code_entry,
    })
}
