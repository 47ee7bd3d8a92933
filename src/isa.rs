//! Instruction-set tables: opcodes, categories, and the scalar enums that
//! appear in encoded operands and instruction bodies.
//!
//! Opcode numbering is stable across format versions; gaps in the numbering
//! space are reserved and rejected as [`DecodeError::UnknownOpcode`].

use crate::error::{DecodeError, Result};

/// `CISA` in little-endian ASCII, the first four bytes of every container.
pub const MAGIC: u32 = 0x4153_4943;

/// Number of predefined general variables occupying general-table indices
/// `0..32`. Stream-declared variables start at index 32.
pub const NUM_PREDEFINED_VARS: u16 = 32;

/// Number of predefined surfaces occupying surface-table indices `0..6`.
pub const NUM_PREDEFINED_SURFACES: u8 = 6;

/// Size of the per-routine sampler table. Sampler declarations must fit in
/// slots `0..31`.
pub const MAX_SAMPLER_SLOTS: usize = 32;

/// Sampler-table slot reserved for the bindless sampler handle.
pub const BINDLESS_SAMPLER_SLOT: usize = 31;

/// Predefined surface index for shared local memory.
pub const PREDEF_SURFACE_SLM: u8 = 0;
/// Predefined surface index for the stack access surface.
pub const PREDEF_SURFACE_STACK: u8 = 1;
/// Predefined surface index for binding table entry 252.
pub const PREDEF_SURFACE_T252: u8 = 4;
/// Predefined surface index for the stateless surface (T255).
pub const PREDEF_SURFACE_T255: u8 = 5;

/// Instruction category. Drives which body layout follows the opcode byte.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Category {
    /// Data movement: `mov`, `sel`, `setp`, `movs`, `fminmax`.
    Mov,
    /// Arithmetic on vector operands.
    Arith,
    /// Bitwise logic and shifts.
    Logic,
    /// Address arithmetic (`addr_add`).
    Address,
    /// Comparison producing a flag or vector destination.
    Compare,
    /// Thread and memory synchronization.
    Sync,
    /// Scalar control flow.
    Flow,
    /// Divergent control flow (`goto`).
    SimdFlow,
    /// Data-port (surface memory) access.
    DataPort,
    /// Sampler and video-analytics access.
    Sampler,
    /// Shared virtual memory access; body starts with a sub-opcode byte.
    Svm,
    /// Miscellaneous: raw sends, debug info, lifetimes, URB, DPAS.
    Misc,
    /// Load/store-cache messages; body layout depends on the sub-opcode.
    Lsc,
}

macro_rules! opcodes {
    ($( $name:ident = $value:literal => ($cat:ident, $mnemonic:literal, $srcs:literal, $dsts:literal), )*) => {
        /// An instruction opcode.
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
        #[repr(u8)]
        pub enum Opcode {
            $(
                #[allow(missing_docs)]
                $name = $value,
            )*
        }

        impl Opcode {
            /// Decodes an opcode byte. Reserved values are an error.
            pub fn from_u8(value: u8, offset: usize) -> Result<Opcode> {
                match value {
                    $( $value => Ok(Opcode::$name), )*
                    _ => Err(DecodeError::UnknownOpcode { opcode: value, offset }),
                }
            }

            /// Assembly mnemonic.
            pub fn name(self) -> &'static str {
                match self {
                    $( Opcode::$name => $mnemonic, )*
                }
            }

            /// Instruction category.
            pub fn category(self) -> Category {
                match self {
                    $( Opcode::$name => Category::$cat, )*
                }
            }

            /// Number of source operands in the common (table-driven) body
            /// layout. Zero for opcodes with bespoke layouts.
            pub fn src_count(self) -> usize {
                match self {
                    $( Opcode::$name => $srcs, )*
                }
            }

            /// Number of destination operands in the common body layout.
            pub fn dst_count(self) -> usize {
                match self {
                    $( Opcode::$name => $dsts, )*
                }
            }
        }
    };
}

opcodes! {
    Add = 0x01 => (Arith, "add", 2, 1),
    Avg = 0x02 => (Arith, "avg", 2, 1),
    Div = 0x03 => (Arith, "div", 2, 1),
    Dp2 = 0x04 => (Arith, "dp2", 2, 1),
    Dp3 = 0x05 => (Arith, "dp3", 2, 1),
    Dp4 = 0x06 => (Arith, "dp4", 2, 1),
    Dph = 0x07 => (Arith, "dph", 2, 1),
    Exp = 0x08 => (Arith, "exp", 1, 1),
    Frc = 0x09 => (Arith, "frc", 1, 1),
    Line = 0x0A => (Arith, "line", 2, 1),
    Log = 0x0B => (Arith, "log", 1, 1),
    Mad = 0x0C => (Arith, "mad", 3, 1),
    Mulh = 0x0D => (Arith, "mulh", 2, 1),
    Lrp = 0x0E => (Arith, "lrp", 3, 1),
    Mod = 0x0F => (Arith, "mod", 2, 1),
    Mul = 0x10 => (Arith, "mul", 2, 1),
    Pow = 0x11 => (Arith, "pow", 2, 1),
    Rndd = 0x12 => (Arith, "rndd", 1, 1),
    Rndu = 0x13 => (Arith, "rndu", 1, 1),
    Rnde = 0x14 => (Arith, "rnde", 1, 1),
    Rndz = 0x15 => (Arith, "rndz", 1, 1),
    Sad2 = 0x16 => (Arith, "sad2", 2, 1),
    Sin = 0x17 => (Arith, "sin", 1, 1),
    Cos = 0x18 => (Arith, "cos", 1, 1),
    Sqrt = 0x19 => (Arith, "sqrt", 1, 1),
    Rsqrt = 0x1A => (Arith, "rsqrt", 1, 1),
    Inv = 0x1B => (Arith, "inv", 1, 1),
    Lzd = 0x1F => (Arith, "lzd", 1, 1),
    And = 0x20 => (Logic, "and", 2, 1),
    Or = 0x21 => (Logic, "or", 2, 1),
    Xor = 0x22 => (Logic, "xor", 2, 1),
    Not = 0x23 => (Logic, "not", 1, 1),
    Shl = 0x24 => (Logic, "shl", 2, 1),
    Shr = 0x25 => (Logic, "shr", 2, 1),
    Asr = 0x26 => (Logic, "asr", 2, 1),
    Cbit = 0x27 => (Logic, "cbit", 1, 1),
    AddrAdd = 0x28 => (Address, "addr_add", 2, 1),
    Mov = 0x29 => (Mov, "mov", 1, 1),
    Sel = 0x2A => (Mov, "sel", 2, 1),
    Setp = 0x2B => (Mov, "setp", 1, 1),
    Cmp = 0x2C => (Compare, "cmp", 2, 1),
    Movs = 0x2D => (Mov, "movs", 1, 1),
    Fbl = 0x2E => (Logic, "fbl", 1, 1),
    Fbh = 0x2F => (Logic, "fbh", 1, 1),
    Subroutine = 0x30 => (Flow, "subroutine", 1, 0),
    Label = 0x31 => (Flow, "label", 1, 0),
    Jmp = 0x32 => (Flow, "jmp", 1, 0),
    Call = 0x33 => (Flow, "call", 1, 0),
    Ret = 0x34 => (Flow, "ret", 0, 0),
    OwordLd = 0x35 => (DataPort, "oword_ld", 2, 1),
    OwordSt = 0x36 => (DataPort, "oword_st", 3, 0),
    MediaLd = 0x37 => (DataPort, "media_ld", 5, 1),
    MediaSt = 0x38 => (DataPort, "media_st", 6, 0),
    Gather = 0x39 => (DataPort, "gather", 4, 1),
    Scatter = 0x3A => (DataPort, "scatter", 5, 0),
    OwordLdUnaligned = 0x3C => (DataPort, "oword_ld_unaligned", 2, 1),
    Sample = 0x40 => (Sampler, "sample", 5, 1),
    SampleUnorm = 0x41 => (Sampler, "sample_unorm", 6, 1),
    Load = 0x42 => (Sampler, "load", 4, 1),
    Avs = 0x43 => (Sampler, "avs", 13, 1),
    Va = 0x44 => (Sampler, "va", 0, 0),
    Fminmax = 0x45 => (Mov, "fminmax", 2, 1),
    Bfe = 0x46 => (Logic, "bfe", 3, 1),
    Bfi = 0x47 => (Logic, "bfi", 4, 1),
    Bfrev = 0x48 => (Logic, "bfrev", 1, 1),
    Addc = 0x49 => (Arith, "addc", 2, 2),
    Subb = 0x4A => (Arith, "subb", 2, 2),
    Gather4Typed = 0x4B => (DataPort, "gather4_typed", 7, 1),
    Scatter4Typed = 0x4C => (DataPort, "scatter4_typed", 8, 0),
    VaSklPlus = 0x4D => (Sampler, "va_skl_plus", 0, 0),
    Svm = 0x4E => (Svm, "svm", 0, 0),
    Ifcall = 0x4F => (Flow, "ifcall", 3, 0),
    Faddr = 0x50 => (Flow, "faddr", 1, 1),
    File = 0x51 => (Misc, "file", 1, 0),
    Loc = 0x52 => (Misc, "loc", 1, 0),
    VmeIme = 0x54 => (Misc, "vme_ime", 5, 1),
    VmeSic = 0x55 => (Misc, "vme_sic", 2, 1),
    VmeFbr = 0x56 => (Misc, "vme_fbr", 2, 1),
    VmeIdm = 0x57 => (Misc, "vme_idm", 2, 1),
    Barrier = 0x59 => (Sync, "barrier", 0, 0),
    SamplerCacheFlush = 0x5A => (Sync, "sampler_cache_flush", 0, 0),
    Wait = 0x5B => (Sync, "wait", 0, 0),
    Fence = 0x5C => (Sync, "fence", 0, 0),
    RawSend = 0x5D => (Misc, "raw_send", 0, 0),
    Yield = 0x5F => (Sync, "yield", 0, 0),
    Fcall = 0x67 => (Flow, "fcall", 3, 0),
    Fret = 0x68 => (Flow, "fret", 0, 0),
    Switchjmp = 0x69 => (Flow, "switchjmp", 0, 0),
    Sad2add = 0x6A => (Arith, "sad2add", 3, 1),
    Plane = 0x6B => (Arith, "plane", 2, 1),
    Goto = 0x6C => (SimdFlow, "goto", 1, 0),
    Sample3d = 0x6D => (Sampler, "sample_3d", 5, 1),
    Load3d = 0x6E => (Sampler, "load_3d", 5, 1),
    Gather43d = 0x6F => (Sampler, "gather4_3d", 5, 1),
    Info3d = 0x70 => (Sampler, "info_3d", 2, 1),
    RtWrite3d = 0x71 => (DataPort, "rt_write_3d", 3, 0),
    UrbWrite3d = 0x72 => (Misc, "urb_write_3d", 6, 0),
    TypedAtomic3d = 0x73 => (DataPort, "typed_atomic_3d", 9, 1),
    Gather4Scaled = 0x74 => (DataPort, "gather4_scaled", 4, 1),
    Scatter4Scaled = 0x75 => (DataPort, "scatter4_scaled", 5, 0),
    GatherScaled = 0x78 => (DataPort, "gather_scaled", 4, 1),
    ScatterScaled = 0x79 => (DataPort, "scatter_scaled", 5, 0),
    RawSends = 0x7A => (Misc, "raw_sends", 0, 0),
    Lifetime = 0x7B => (Misc, "lifetime", 2, 0),
    Sbarrier = 0x7C => (Sync, "sbarrier", 1, 0),
    DwordAtomic = 0x7D => (DataPort, "dword_atomic", 6, 1),
    Sqrtm = 0x7E => (Arith, "sqrtm", 1, 1),
    Divm = 0x7F => (Arith, "divm", 2, 1),
    Rol = 0x80 => (Logic, "rol", 2, 1),
    Ror = 0x81 => (Logic, "ror", 2, 1),
    Dp4a = 0x82 => (Arith, "dp4a", 3, 1),
    Dpas = 0x83 => (Misc, "dpas", 0, 0),
    Dpasw = 0x84 => (Misc, "dpasw", 0, 0),
    Add3 = 0x85 => (Arith, "add3", 3, 1),
    Bfn = 0x86 => (Logic, "bfn", 3, 1),
    QwGather = 0x87 => (DataPort, "qw_gather", 3, 1),
    QwScatter = 0x88 => (DataPort, "qw_scatter", 4, 0),
    LscUntyped = 0x89 => (Lsc, "lsc_untyped", 0, 0),
    LscTyped = 0x8A => (Lsc, "lsc_typed", 0, 0),
    LscFence = 0x8B => (Lsc, "lsc_fence", 0, 0),
    Nbarrier = 0x8C => (Sync, "nbarrier", 0, 0),
    RawSendg = 0x8D => (Misc, "raw_sendg", 0, 0),
}

impl Opcode {
    /// Whether the encoded body carries a leading predicate operand.
    pub fn has_predicate(self) -> bool {
        use Opcode::*;
        match self.category() {
            Category::Mov => !matches!(self, Setp | Movs | Fminmax),
            Category::Arith | Category::Logic => true,
            Category::Address | Category::Compare => false,
            Category::Flow => !matches!(self, Subroutine | Label | Switchjmp),
            Category::SimdFlow => true,
            _ => matches!(
                self,
                DwordAtomic
                    | GatherScaled
                    | Gather4Scaled
                    | Gather4Typed
                    | ScatterScaled
                    | Scatter4Scaled
                    | Scatter4Typed
                    | RawSend
                    | RawSends
                    | Sample3d
                    | Load3d
                    | Gather43d
                    | RtWrite3d
                    | UrbWrite3d
                    | TypedAtomic3d
            ),
        }
    }
}

/// Element type of a variable or immediate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
#[allow(missing_docs)]
pub enum VisaType {
    Ud = 0x0,
    D = 0x1,
    Uw = 0x2,
    W = 0x3,
    Ub = 0x4,
    B = 0x5,
    Df = 0x6,
    F = 0x7,
    V = 0x8,
    Vf = 0x9,
    Bool = 0xA,
    Uq = 0xB,
    Uv = 0xC,
    Q = 0xD,
    Hf = 0xE,
}

impl VisaType {
    /// Decodes the low nibble of a type byte.
    pub fn from_u8(value: u8, offset: usize) -> Result<VisaType> {
        use VisaType::*;
        Ok(match value {
            0x0 => Ud,
            0x1 => D,
            0x2 => Uw,
            0x3 => W,
            0x4 => Ub,
            0x5 => B,
            0x6 => Df,
            0x7 => F,
            0x8 => V,
            0x9 => Vf,
            0xA => Bool,
            0xB => Uq,
            0xC => Uv,
            0xD => Q,
            0xE => Hf,
            _ => {
                return Err(DecodeError::InvalidEncoding {
                    what: "data type",
                    value: u32::from(value),
                    offset,
                })
            }
        })
    }

    /// Encoded width of an immediate of this type, in bytes.
    pub fn immediate_bytes(self) -> usize {
        match self {
            VisaType::Df | VisaType::Q | VisaType::Uq => 8,
            _ => 4,
        }
    }
}

/// Storage alignment of a general variable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
#[allow(missing_docs)]
pub enum Align {
    Byte = 0x0,
    Word = 0x1,
    Dword = 0x2,
    Qword = 0x3,
    Oword = 0x4,
    Grf = 0x5,
    TwoGrf = 0x6,
    Hword = 0x7,
    Word32 = 0x8,
    Word64 = 0x9,
}

impl Align {
    /// Decodes the high nibble of a declaration's bit-properties byte.
    pub fn from_u8(value: u8, offset: usize) -> Result<Align> {
        use Align::*;
        Ok(match value {
            0x0 => Byte,
            0x1 => Word,
            0x2 => Dword,
            0x3 => Qword,
            0x4 => Oword,
            0x5 => Grf,
            0x6 => TwoGrf,
            0x7 => Hword,
            0x8 => Word32,
            0x9 => Word64,
            _ => {
                return Err(DecodeError::InvalidEncoding {
                    what: "alignment",
                    value: u32::from(value),
                    offset,
                })
            }
        })
    }
}

/// Execution size: number of lanes an instruction operates on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
#[allow(missing_docs)]
pub enum ExecSize {
    Simd1 = 0,
    Simd2 = 1,
    Simd4 = 2,
    Simd8 = 3,
    Simd16 = 4,
    Simd32 = 5,
}

impl ExecSize {
    /// Decodes the low nibble of an execution-size byte.
    pub fn from_u8(value: u8, offset: usize) -> Result<ExecSize> {
        use ExecSize::*;
        Ok(match value {
            0 => Simd1,
            1 => Simd2,
            2 => Simd4,
            3 => Simd8,
            4 => Simd16,
            5 => Simd32,
            _ => {
                return Err(DecodeError::InvalidEncoding {
                    what: "execution size",
                    value: u32::from(value),
                    offset,
                })
            }
        })
    }

    /// Lane count.
    pub fn lanes(self) -> u32 {
        1 << (self as u32)
    }
}

/// Execution-mask control: the quarter/half selector plus the no-mask bit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
#[allow(missing_docs)]
pub enum EMask {
    M1 = 0,
    M2 = 1,
    M3 = 2,
    M4 = 3,
    M5 = 4,
    M6 = 5,
    M7 = 6,
    M8 = 7,
    M1Nm = 8,
    M2Nm = 9,
    M3Nm = 10,
    M4Nm = 11,
    M5Nm = 12,
    M6Nm = 13,
    M7Nm = 14,
    M8Nm = 15,
}

impl EMask {
    /// Decodes the high nibble of an execution-size byte.
    pub fn from_u8(value: u8, offset: usize) -> Result<EMask> {
        use EMask::*;
        Ok(match value {
            0 => M1,
            1 => M2,
            2 => M3,
            3 => M4,
            4 => M5,
            5 => M6,
            6 => M7,
            7 => M8,
            8 => M1Nm,
            9 => M2Nm,
            10 => M3Nm,
            11 => M4Nm,
            12 => M5Nm,
            13 => M6Nm,
            14 => M7Nm,
            15 => M8Nm,
            _ => {
                return Err(DecodeError::InvalidEncoding {
                    what: "execution mask",
                    value: u32::from(value),
                    offset,
                })
            }
        })
    }
}

/// Source/destination modifier carried in an operand tag byte.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
#[allow(missing_docs)]
pub enum Modifier {
    None = 0x0,
    Abs = 0x1,
    Neg = 0x2,
    NegAbs = 0x3,
    Sat = 0x4,
    Not = 0x5,
}

impl Modifier {
    /// Decodes bits 3..6 of an operand tag byte.
    pub fn from_u8(value: u8, offset: usize) -> Result<Modifier> {
        use Modifier::*;
        Ok(match value {
            0x0 => None,
            0x1 => Abs,
            0x2 => Neg,
            0x3 => NegAbs,
            0x4 => Sat,
            0x5 => Not,
            _ => {
                return Err(DecodeError::InvalidEncoding {
                    what: "operand modifier",
                    value: u32::from(value),
                    offset,
                })
            }
        })
    }
}

/// Operand class, the low three bits of an operand tag byte.
///
/// `AddressOf` never appears in encoded streams; address-of views are implied
/// by context (the first source of `addr_add`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
#[allow(missing_docs)]
pub enum OperandClass {
    General = 0x0,
    Address = 0x1,
    Predicate = 0x2,
    Indirect = 0x3,
    AddressOf = 0x4,
    Immediate = 0x5,
    State = 0x6,
}

impl OperandClass {
    /// Decodes the low three bits of an operand tag byte.
    pub fn from_u8(value: u8, offset: usize) -> Result<OperandClass> {
        use OperandClass::*;
        Ok(match value {
            0x0 => General,
            0x1 => Address,
            0x2 => Predicate,
            0x3 => Indirect,
            0x4 => AddressOf,
            0x5 => Immediate,
            0x6 => State,
            _ => {
                return Err(DecodeError::InvalidEncoding {
                    what: "operand class",
                    value: u32::from(value),
                    offset,
                })
            }
        })
    }
}

/// Label flavor recorded in a label declaration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
#[allow(missing_docs)]
pub enum LabelKind {
    Block = 0x0,
    Subroutine = 0x1,
    Fc = 0x2,
    Function = 0x3,
}

impl LabelKind {
    /// Decodes a label-kind byte.
    pub fn from_u8(value: u8, offset: usize) -> Result<LabelKind> {
        use LabelKind::*;
        Ok(match value {
            0x0 => Block,
            0x1 => Subroutine,
            0x2 => Fc,
            0x3 => Function,
            _ => {
                return Err(DecodeError::InvalidEncoding {
                    what: "label kind",
                    value: u32::from(value),
                    offset,
                })
            }
        })
    }
}

/// Storage class of a kernel input, the low three bits of its kind byte.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
#[allow(missing_docs)]
pub enum InputClass {
    General = 0x0,
    Sampler = 0x1,
    Surface = 0x2,
}

impl InputClass {
    /// Decodes the low three bits of an input kind byte.
    pub fn from_u8(value: u8, offset: usize) -> Result<InputClass> {
        use InputClass::*;
        Ok(match value {
            0x0 => General,
            0x1 => Sampler,
            0x2 => Surface,
            _ => {
                return Err(DecodeError::InvalidEncoding {
                    what: "input class",
                    value: u32::from(value),
                    offset,
                })
            }
        })
    }
}

/// Atomic operation selector, the low five bits of an atomic-op byte.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
#[allow(missing_docs)]
pub enum AtomicOp {
    Add = 0x0,
    Sub = 0x1,
    Inc = 0x2,
    Dec = 0x3,
    Min = 0x4,
    Max = 0x5,
    Xchg = 0x6,
    Cmpxchg = 0x7,
    And = 0x8,
    Or = 0x9,
    Xor = 0xA,
    Imin = 0xB,
    Imax = 0xC,
    Predec = 0xD,
    Fmax = 0x10,
    Fmin = 0x11,
    Fcmpwr = 0x12,
}

impl AtomicOp {
    /// Decodes the low five bits of an atomic-op byte.
    pub fn from_u8(value: u8, offset: usize) -> Result<AtomicOp> {
        use AtomicOp::*;
        Ok(match value {
            0x0 => Add,
            0x1 => Sub,
            0x2 => Inc,
            0x3 => Dec,
            0x4 => Min,
            0x5 => Max,
            0x6 => Xchg,
            0x7 => Cmpxchg,
            0x8 => And,
            0x9 => Or,
            0xA => Xor,
            0xB => Imin,
            0xC => Imax,
            0xD => Predec,
            0x10 => Fmax,
            0x11 => Fmin,
            0x12 => Fcmpwr,
            _ => {
                return Err(DecodeError::InvalidEncoding {
                    what: "atomic operation",
                    value: u32::from(value),
                    offset,
                })
            }
        })
    }
}

/// Width of the data an atomic instruction operates on, bits 5..7 of the
/// atomic-op byte.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
#[allow(missing_docs)]
pub enum AtomicWidth {
    Bits16,
    Bits32,
    Bits64,
}

/// Splits an atomic-op byte into its operation and data width.
pub fn decode_atomic(value: u8, offset: usize) -> Result<(AtomicOp, AtomicWidth)> {
    let op = AtomicOp::from_u8(value & 0x1F, offset)?;
    let width = if (value >> 5) & 0x1 != 0 {
        AtomicWidth::Bits16
    } else if (value >> 6) & 0x1 != 0 {
        AtomicWidth::Bits64
    } else {
        AtomicWidth::Bits32
    };
    Ok((op, width))
}

/// Predicate combine control, bits 13..15 of a predicate field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
#[allow(missing_docs)]
pub enum PredControl {
    None = 0x0,
    Any = 0x1,
    All = 0x2,
}

impl PredControl {
    /// Decodes the two control bits of a predicate field.
    pub fn from_u8(value: u8, offset: usize) -> Result<PredControl> {
        use PredControl::*;
        Ok(match value {
            0x0 => None,
            0x1 => Any,
            0x2 => All,
            _ => {
                return Err(DecodeError::InvalidEncoding {
                    what: "predicate control",
                    value: u32::from(value),
                    offset,
                })
            }
        })
    }
}

/// Comparison relation, the low three bits of `cmp`'s sub-opcode byte.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
#[allow(missing_docs)]
pub enum CompareRelation {
    Eq = 0,
    Ne = 1,
    Gt = 2,
    Ge = 3,
    Lt = 4,
    Le = 5,
}

impl CompareRelation {
    /// Decodes the low three bits of the comparison sub-opcode byte.
    pub fn from_u8(value: u8, offset: usize) -> Result<CompareRelation> {
        use CompareRelation::*;
        Ok(match value {
            0 => Eq,
            1 => Ne,
            2 => Gt,
            3 => Ge,
            4 => Lt,
            5 => Le,
            _ => {
                return Err(DecodeError::InvalidEncoding {
                    what: "comparison relation",
                    value: u32::from(value),
                    offset,
                })
            }
        })
    }
}

/// Which extremum `fminmax` selects.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
#[allow(missing_docs)]
pub enum MinMax {
    Min = 0,
    Max = 1,
}

impl MinMax {
    /// Decodes the `fminmax` sub-opcode byte.
    pub fn from_u8(value: u8, offset: usize) -> Result<MinMax> {
        match value {
            0 => Ok(MinMax::Min),
            1 => Ok(MinMax::Max),
            _ => Err(DecodeError::InvalidEncoding {
                what: "fminmax sub-opcode",
                value: u32::from(value),
                offset,
            }),
        }
    }
}

bitflags::bitflags! {
    /// Cache-control bits of the `fence` mask byte.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct FenceMask: u8 {
        /// Commit enable.
        const COMMIT = 1 << 0;
        /// Flush the instruction cache.
        const FLUSH_INSTRUCTION = 1 << 1;
        /// Flush the sampler cache.
        const FLUSH_SAMPLER = 1 << 2;
        /// Flush the constant cache.
        const FLUSH_CONSTANT = 1 << 3;
        /// Flush the read-write cache.
        const FLUSH_RW = 1 << 4;
        /// Fence shared local memory only.
        const LOCAL = 1 << 5;
        /// Flush L1 caches.
        const FLUSH_L1 = 1 << 6;
        /// Scheduling barrier only, no hardware fence.
        const SCHEDULING_ONLY = 1 << 7;
    }
}

/// Shared-virtual-memory sub-opcode, the byte after an `svm` opcode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
#[allow(missing_docs)]
pub enum SvmSubOp {
    BlockLd = 0x1,
    BlockSt = 0x2,
    Gather = 0x3,
    Scatter = 0x4,
    Atomic = 0x5,
    Gather4Scaled = 0x6,
    Scatter4Scaled = 0x7,
}

impl SvmSubOp {
    /// Decodes an `svm` sub-opcode byte.
    pub fn from_u8(value: u8, offset: usize) -> Result<SvmSubOp> {
        use SvmSubOp::*;
        Ok(match value {
            0x1 => BlockLd,
            0x2 => BlockSt,
            0x3 => Gather,
            0x4 => Scatter,
            0x5 => Atomic,
            0x6 => Gather4Scaled,
            0x7 => Scatter4Scaled,
            _ => {
                return Err(DecodeError::InvalidEncoding {
                    what: "svm sub-opcode",
                    value: u32::from(value),
                    offset,
                })
            }
        })
    }
}

/// Sampler-message sub-opcode shared by the 3D sample/load/gather forms.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
#[allow(missing_docs)]
pub enum Sampler3dOp {
    Sample = 0x00,
    SampleB = 0x01,
    SampleL = 0x02,
    SampleC = 0x03,
    SampleD = 0x04,
    SampleBC = 0x05,
    SampleLC = 0x06,
    Ld = 0x07,
    Gather4 = 0x08,
    Lod = 0x09,
    Resinfo = 0x0A,
    Sampleinfo = 0x0B,
    SampleKillpix = 0x0C,
    Gather4C = 0x10,
    Gather4Po = 0x11,
    Gather4PoC = 0x12,
    SampleDC = 0x14,
    SampleLz = 0x18,
    SampleCLz = 0x19,
    LdLz = 0x1A,
    Ld2dmsW = 0x1C,
    LdMcs = 0x1D,
}

impl Sampler3dOp {
    /// Decodes the operation bits of a 3D-sampler sub-opcode field.
    pub fn from_u8(value: u8, offset: usize) -> Result<Sampler3dOp> {
        use Sampler3dOp::*;
        Ok(match value {
            0x00 => Sample,
            0x01 => SampleB,
            0x02 => SampleL,
            0x03 => SampleC,
            0x04 => SampleD,
            0x05 => SampleBC,
            0x06 => SampleLC,
            0x07 => Ld,
            0x08 => Gather4,
            0x09 => Lod,
            0x0A => Resinfo,
            0x0B => Sampleinfo,
            0x0C => SampleKillpix,
            0x10 => Gather4C,
            0x11 => Gather4Po,
            0x12 => Gather4PoC,
            0x14 => SampleDC,
            0x18 => SampleLz,
            0x19 => SampleCLz,
            0x1A => LdLz,
            0x1C => Ld2dmsW,
            0x1D => LdMcs,
            _ => {
                return Err(DecodeError::InvalidEncoding {
                    what: "sampler sub-opcode",
                    value: u32::from(value),
                    offset,
                })
            }
        })
    }
}

/// Legacy video-analytics sub-opcode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
#[allow(missing_docs)]
pub enum VaSubOp {
    Avs = 0x0,
    Convolve = 0x1,
    MinMax = 0x2,
    MinMaxFilter = 0x3,
    Erode = 0x4,
    Dilate = 0x5,
    BoolCentroid = 0x6,
    Centroid = 0x7,
}

impl VaSubOp {
    /// Decodes a `va` sub-opcode byte.
    pub fn from_u8(value: u8, offset: usize) -> Result<VaSubOp> {
        use VaSubOp::*;
        Ok(match value {
            0x0 => Avs,
            0x1 => Convolve,
            0x2 => MinMax,
            0x3 => MinMaxFilter,
            0x4 => Erode,
            0x5 => Dilate,
            0x6 => BoolCentroid,
            0x7 => Centroid,
            _ => {
                return Err(DecodeError::InvalidEncoding {
                    what: "va sub-opcode",
                    value: u32::from(value),
                    offset,
                })
            }
        })
    }

    /// Whether the sub-opcode's body starts with a sampler index byte.
    pub fn has_sampler(self) -> bool {
        matches!(
            self,
            VaSubOp::Convolve | VaSubOp::MinMaxFilter | VaSubOp::Erode | VaSubOp::Dilate
        )
    }
}

/// Extended video-analytics sub-opcode (`va_skl_plus`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
#[allow(missing_docs)]
pub enum VaPlusSubOp {
    ConvolveVertical1d = 0x08,
    ConvolveHorizontal1d = 0x09,
    Convolve1Pixel = 0x0A,
    FloodFill = 0x0B,
    LbpCreation = 0x0C,
    LbpCorrelation = 0x0D,
    CorrelationSearch = 0x0F,
    HdcConvolve = 0x10,
    HdcMinMaxFilter = 0x11,
    HdcErode = 0x12,
    HdcDilate = 0x13,
    HdcLbpCorrelation = 0x14,
    HdcLbpCreation = 0x15,
    HdcConvolveHorizontal1d = 0x16,
    HdcConvolveVertical1d = 0x17,
    HdcConvolve1Pixel = 0x18,
}

/// One step of a `va_skl_plus` body, in encoded order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VaPlusField {
    /// Sampler index byte resolved through the sampler table.
    Sampler,
    /// Surface index byte resolved through the surface table.
    Surface,
    /// Vector (scalar-region) source operand.
    Vector,
    /// Raw source operand.
    RawSrc,
    /// Raw destination operand.
    RawDst,
    /// Unsigned scalar of the given byte width.
    Scalar(u8),
}

impl VaPlusSubOp {
    /// Decodes a `va_skl_plus` sub-opcode byte.
    pub fn from_u8(value: u8, offset: usize) -> Result<VaPlusSubOp> {
        use VaPlusSubOp::*;
        Ok(match value {
            0x08 => ConvolveVertical1d,
            0x09 => ConvolveHorizontal1d,
            0x0A => Convolve1Pixel,
            0x0B => FloodFill,
            0x0C => LbpCreation,
            0x0D => LbpCorrelation,
            0x0F => CorrelationSearch,
            0x10 => HdcConvolve,
            0x11 => HdcMinMaxFilter,
            0x12 => HdcErode,
            0x13 => HdcDilate,
            0x14 => HdcLbpCorrelation,
            0x15 => HdcLbpCreation,
            0x16 => HdcConvolveHorizontal1d,
            0x17 => HdcConvolveVertical1d,
            0x18 => HdcConvolve1Pixel,
            _ => {
                return Err(DecodeError::InvalidEncoding {
                    what: "va_skl_plus sub-opcode",
                    value: u32::from(value),
                    offset,
                })
            }
        })
    }

    /// Encoded field sequence for this sub-opcode's body.
    pub fn fields(self) -> &'static [VaPlusField] {
        use VaPlusField::*;
        use VaPlusSubOp::*;
        match self {
            ConvolveVertical1d | ConvolveHorizontal1d => {
                &[Sampler, Surface, Vector, Vector, Scalar(1), RawDst]
            }
            Convolve1Pixel => &[Sampler, Surface, Vector, Vector, Scalar(1), RawSrc, RawDst],
            FloodFill => &[Scalar(1), RawSrc, Vector, Vector, Vector, RawDst],
            LbpCreation => &[Surface, Vector, Vector, Scalar(1), RawDst],
            LbpCorrelation => &[Surface, Vector, Vector, Vector, RawDst],
            CorrelationSearch => &[
                Surface, Vector, Vector, Vector, Vector, Vector, Vector, Vector, Vector, RawDst,
            ],
            HdcConvolve => &[Sampler, Surface, Vector, Vector, Scalar(1), Surface, Vector, Vector],
            HdcMinMaxFilter => &[
                Sampler,
                Surface,
                Vector,
                Vector,
                Scalar(1),
                Scalar(1),
                Surface,
                Vector,
                Vector,
            ],
            HdcErode | HdcDilate => {
                &[Sampler, Surface, Vector, Vector, Surface, Vector, Vector]
            }
            HdcLbpCorrelation => &[Surface, Vector, Vector, Vector, Surface, Vector, Vector],
            HdcLbpCreation => &[Surface, Vector, Vector, Scalar(1), Surface, Vector, Vector],
            HdcConvolveHorizontal1d | HdcConvolveVertical1d => {
                &[Sampler, Surface, Vector, Vector, Scalar(1), Surface, Vector, Vector]
            }
            HdcConvolve1Pixel => &[
                Sampler,
                Surface,
                Vector,
                Vector,
                Scalar(1),
                RawSrc,
                Surface,
                Vector,
                Vector,
            ],
        }
    }
}

/// Load/store-cache message sub-opcode, the byte after an `lsc_untyped` or
/// `lsc_typed` opcode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
#[allow(missing_docs)]
pub enum LscSubOp {
    Load = 0x00,
    LoadStrided = 0x01,
    LoadQuad = 0x02,
    LoadBlock2d = 0x03,
    Store = 0x04,
    StoreStrided = 0x05,
    StoreQuad = 0x06,
    StoreBlock2d = 0x07,
    AtomicIinc = 0x08,
    AtomicIdec = 0x09,
    AtomicLoad = 0x0A,
    AtomicStore = 0x0B,
    AtomicIadd = 0x0C,
    AtomicIsub = 0x0D,
    AtomicSmin = 0x0E,
    AtomicSmax = 0x0F,
    AtomicUmin = 0x10,
    AtomicUmax = 0x11,
    AtomicIcas = 0x12,
    AtomicFadd = 0x13,
    AtomicFsub = 0x14,
    AtomicFmin = 0x15,
    AtomicFmax = 0x16,
    AtomicFcas = 0x17,
    AtomicAnd = 0x18,
    AtomicOr = 0x19,
    AtomicXor = 0x1A,
    LoadStatus = 0x1B,
    StoreUncompressed = 0x1C,
    Fence = 0x1F,
    StoreUncompressedQuad = 0x20,
    AppendCounterAtomicAdd = 0x28,
    AppendCounterAtomicSub = 0x29,
}

impl LscSubOp {
    /// Decodes an LSC sub-opcode byte.
    pub fn from_u8(value: u8, offset: usize) -> Result<LscSubOp> {
        use LscSubOp::*;
        Ok(match value {
            0x00 => Load,
            0x01 => LoadStrided,
            0x02 => LoadQuad,
            0x03 => LoadBlock2d,
            0x04 => Store,
            0x05 => StoreStrided,
            0x06 => StoreQuad,
            0x07 => StoreBlock2d,
            0x08 => AtomicIinc,
            0x09 => AtomicIdec,
            0x0A => AtomicLoad,
            0x0B => AtomicStore,
            0x0C => AtomicIadd,
            0x0D => AtomicIsub,
            0x0E => AtomicSmin,
            0x0F => AtomicSmax,
            0x10 => AtomicUmin,
            0x11 => AtomicUmax,
            0x12 => AtomicIcas,
            0x13 => AtomicFadd,
            0x14 => AtomicFsub,
            0x15 => AtomicFmin,
            0x16 => AtomicFmax,
            0x17 => AtomicFcas,
            0x18 => AtomicAnd,
            0x19 => AtomicOr,
            0x1A => AtomicXor,
            0x1B => LoadStatus,
            0x1C => StoreUncompressed,
            0x1F => Fence,
            0x20 => StoreUncompressedQuad,
            0x28 => AppendCounterAtomicAdd,
            0x29 => AppendCounterAtomicSub,
            _ => {
                return Err(DecodeError::InvalidEncoding {
                    what: "lsc sub-opcode",
                    value: u32::from(value),
                    offset,
                })
            }
        })
    }

    /// Whether the sub-opcode uses the block-2D body layout.
    pub fn is_block2d(self) -> bool {
        matches!(self, LscSubOp::LoadBlock2d | LscSubOp::StoreBlock2d)
    }

    /// Whether the sub-opcode uses the append-counter body layout.
    pub fn is_append_counter(self) -> bool {
        matches!(
            self,
            LscSubOp::AppendCounterAtomicAdd | LscSubOp::AppendCounterAtomicSub
        )
    }

    /// Whether the sub-opcode uses the strided body layout.
    pub fn is_strided(self) -> bool {
        matches!(self, LscSubOp::LoadStrided | LscSubOp::StoreStrided)
    }

    /// Whether the data shape's channel mask applies (quad forms).
    pub fn uses_channel_mask(self) -> bool {
        matches!(
            self,
            LscSubOp::LoadQuad | LscSubOp::StoreQuad | LscSubOp::StoreUncompressedQuad
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opcode_round_trip() {
        for value in 0u8..=0xFF {
            if let Ok(op) = Opcode::from_u8(value, 0) {
                assert_eq!(op as u8, value);
            }
        }
    }

    #[test]
    fn reserved_opcodes_rejected() {
        for value in [0x00, 0x1C, 0x1E, 0x3B, 0x3F, 0x53, 0x58, 0x5E, 0x60, 0x66, 0x76, 0x8E] {
            assert!(matches!(
                Opcode::from_u8(value, 7),
                Err(DecodeError::UnknownOpcode { opcode, offset: 7 }) if opcode == value
            ));
        }
    }

    #[test]
    fn categories() {
        assert_eq!(Opcode::Add.category(), Category::Arith);
        assert_eq!(Opcode::AddrAdd.category(), Category::Address);
        assert_eq!(Opcode::Cmp.category(), Category::Compare);
        assert_eq!(Opcode::Goto.category(), Category::SimdFlow);
        assert_eq!(Opcode::Svm.category(), Category::Svm);
        assert_eq!(Opcode::LscFence.category(), Category::Lsc);
        assert_eq!(Opcode::Nbarrier.category(), Category::Sync);
    }

    #[test]
    fn predication_rules() {
        assert!(Opcode::Mov.has_predicate());
        assert!(Opcode::Sel.has_predicate());
        assert!(!Opcode::Setp.has_predicate());
        assert!(!Opcode::Movs.has_predicate());
        assert!(!Opcode::Fminmax.has_predicate());
        assert!(Opcode::Add.has_predicate());
        assert!(Opcode::Bfn.has_predicate());
        assert!(!Opcode::AddrAdd.has_predicate());
        assert!(!Opcode::Cmp.has_predicate());
        assert!(Opcode::Jmp.has_predicate());
        assert!(!Opcode::Label.has_predicate());
        assert!(!Opcode::Switchjmp.has_predicate());
        assert!(Opcode::Goto.has_predicate());
        assert!(Opcode::DwordAtomic.has_predicate());
        assert!(!Opcode::OwordLd.has_predicate());
        assert!(Opcode::RawSends.has_predicate());
    }

    #[test]
    fn exec_size_lanes() {
        assert_eq!(ExecSize::Simd1.lanes(), 1);
        assert_eq!(ExecSize::Simd32.lanes(), 32);
        assert!(ExecSize::from_u8(6, 0).is_err());
    }

    #[test]
    fn immediate_widths() {
        assert_eq!(VisaType::F.immediate_bytes(), 4);
        assert_eq!(VisaType::Df.immediate_bytes(), 8);
        assert_eq!(VisaType::Q.immediate_bytes(), 8);
        assert_eq!(VisaType::Uq.immediate_bytes(), 8);
        assert_eq!(VisaType::Bool.immediate_bytes(), 4);
    }

    #[test]
    fn atomic_width_bits() {
        let (op, width) = decode_atomic(0x00, 0).unwrap();
        assert_eq!(op, AtomicOp::Add);
        assert_eq!(width, AtomicWidth::Bits32);
        let (op, width) = decode_atomic(0x20 | 0x07, 0).unwrap();
        assert_eq!(op, AtomicOp::Cmpxchg);
        assert_eq!(width, AtomicWidth::Bits16);
        let (op, width) = decode_atomic(0x40 | 0x12, 0).unwrap();
        assert_eq!(op, AtomicOp::Fcmpwr);
        assert_eq!(width, AtomicWidth::Bits64);
        assert!(decode_atomic(0x0E, 0).is_err());
    }

    #[test]
    fn va_plus_fields_end_in_output() {
        use VaPlusField::*;
        for value in 0x08u8..0x19 {
            if value == 0x0E {
                assert!(VaPlusSubOp::from_u8(value, 0).is_err());
                continue;
            }
            let sub = VaPlusSubOp::from_u8(value, 0).unwrap();
            let fields = sub.fields();
            assert!(!fields.is_empty());
            // Every form ends at either a raw destination or an HDC surface
            // write sequence (surface, two vectors).
            let last = fields[fields.len() - 1];
            assert!(matches!(last, RawDst | Vector));
        }
    }

    #[test]
    fn lsc_layout_classes() {
        assert!(LscSubOp::LoadBlock2d.is_block2d());
        assert!(LscSubOp::AppendCounterAtomicSub.is_append_counter());
        assert!(LscSubOp::StoreStrided.is_strided());
        assert!(LscSubOp::LoadQuad.uses_channel_mask());
        assert!(LscSubOp::StoreUncompressedQuad.uses_channel_mask());
        assert!(!LscSubOp::Load.uses_channel_mask());
        assert!(LscSubOp::from_u8(0x1D, 0).is_err());
        assert!(LscSubOp::from_u8(0x21, 0).is_err());
    }
}
