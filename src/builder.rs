//! The builder contract.
//!
//! The decoder does not materialize an IR of its own. Instead it replays every
//! declaration and instruction, in stream order, into a [`ProgramBuilder`]
//! supplied by the caller. The builder mints opaque handles for declared
//! variables and labels; the decoder resolves stream indices through its own
//! tables and hands the handles back when operands reference them.
//!
//! Any builder method may fail; a failure aborts the decode with
//! [`DecodeError::Builder`](crate::DecodeError::Builder).

use crate::attrs::Attribute;
use crate::error::Result;
use crate::isa::{
    Align, AtomicOp, AtomicWidth, CompareRelation, EMask, ExecSize, FenceMask, LabelKind, LscSubOp,
    MinMax, Modifier, Opcode, PredControl, Sampler3dOp, VisaType,
};

/// A decoded region descriptor for a general or indirect operand.
///
/// Each component is `None` when the encoded nibble was the null marker,
/// otherwise the decoded stride/width value (0, 1, 2, 4, 8, 16, or 32).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Region {
    /// Vertical stride, in elements.
    pub vert: Option<u8>,
    /// Row width, in elements.
    pub width: Option<u8>,
    /// Horizontal stride, in elements.
    pub horiz: Option<u8>,
}

/// An immediate constant: the element type plus up to eight payload bytes,
/// zero-extended into `bits`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Immediate {
    /// Element type; fixes the payload width and interpretation.
    pub ty: VisaType,
    /// Raw payload bits, little-endian, zero-extended to 64 bits.
    pub bits: u64,
}

/// An instruction guard: which flag variable gates execution and how.
pub struct Predication<B: ProgramBuilder + ?Sized> {
    /// The predicate variable.
    pub var: B::PredVar,
    /// Whether the predicate is inverted.
    pub invert: bool,
    /// Any/all combine control.
    pub control: PredControl,
}

impl<B: ProgramBuilder + ?Sized> Clone for Predication<B> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<B: ProgramBuilder + ?Sized> Copy for Predication<B> {}

/// A reference to any attributable variable.
pub enum VarRef<B: ProgramBuilder + ?Sized> {
    /// General register-file variable.
    General(B::GenVar),
    /// Address variable.
    Address(B::AddrVar),
    /// Predicate (flag) variable.
    Predicate(B::PredVar),
    /// Sampler state variable.
    Sampler(B::SamplerVar),
    /// Surface state variable.
    Surface(B::SurfaceVar),
}

impl<B: ProgramBuilder + ?Sized> Clone for VarRef<B> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<B: ProgramBuilder + ?Sized> Copy for VarRef<B> {}

/// A variable named by a kernel input record.
pub enum InputVar<B: ProgramBuilder + ?Sized> {
    /// General variable bound to the thread payload.
    General(B::GenVar),
    /// Sampler bound to the thread payload.
    Sampler(B::SamplerVar),
    /// Surface bound to the thread payload.
    Surface(B::SurfaceVar),
}

impl<B: ProgramBuilder + ?Sized> Clone for InputVar<B> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<B: ProgramBuilder + ?Sized> Copy for InputVar<B> {}

/// A sampler or surface state variable, as referenced by a state operand.
pub enum StateVar<B: ProgramBuilder + ?Sized> {
    /// Surface table entry.
    Surface(B::SurfaceVar),
    /// Sampler table entry.
    Sampler(B::SamplerVar),
}

impl<B: ProgramBuilder + ?Sized> Clone for StateVar<B> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<B: ProgramBuilder + ?Sized> Copy for StateVar<B> {}

/// The variable a `lifetime` instruction opens or closes.
pub enum LifetimeRef<B: ProgramBuilder + ?Sized> {
    /// General variable.
    General(B::GenVar),
    /// Address variable.
    Address(B::AddrVar),
    /// Predicate variable.
    Predicate(B::PredVar),
}

impl<B: ProgramBuilder + ?Sized> Clone for LifetimeRef<B> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<B: ProgramBuilder + ?Sized> Copy for LifetimeRef<B> {}

/// Destination bundle of a `rt_write_3d`; which optional pieces are present is
/// governed by the instruction's mode bits.
pub struct RtWriteArgs<B: ProgramBuilder + ?Sized> {
    /// Message header payload.
    pub r1_header: B::RawOperand,
    /// Sample index, when per-sample writes are enabled.
    pub sample_index: Option<B::Operand>,
    /// Coarse-pixel-shading counter.
    pub cps_counter: Option<B::Operand>,
    /// Render-target index.
    pub rt_index: Option<B::Operand>,
    /// Source-0 alpha payload.
    pub src0_alpha: Option<B::RawOperand>,
    /// Output mask payload.
    pub output_mask: Option<B::RawOperand>,
    /// Red channel payload.
    pub red: B::RawOperand,
    /// Green channel payload.
    pub green: B::RawOperand,
    /// Blue channel payload.
    pub blue: B::RawOperand,
    /// Alpha channel payload.
    pub alpha: B::RawOperand,
    /// Depth payload.
    pub depth: Option<B::RawOperand>,
    /// Stencil payload.
    pub stencil: Option<B::RawOperand>,
}

/// Flag bits carried alongside a 3D sampler sub-opcode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Sample3dFlags {
    /// Request the pixel-null-mask response word.
    pub pixel_null_mask: bool,
    /// Coarse pixel shading enable.
    pub cps_enable: bool,
    /// The sampler/surface indices are not uniform across lanes.
    pub non_uniform: bool,
}

/// Body of a `sample_3d`/`load_3d`/`gather4_3d` instruction.
pub struct Sample3dArgs<B: ProgramBuilder + ?Sized> {
    /// Channel mask (load/sample) or single channel selector (gather4).
    pub channel_mask: u8,
    /// Immediate texel offset, or the offset operand on newer versions.
    pub aoffimmi: B::Operand,
    /// Sampler state; absent for `load_3d`.
    pub sampler: Option<B::SamplerVar>,
    /// Surface being sampled.
    pub surface: B::SurfaceVar,
    /// Paired surface handle; null on versions that predate it.
    pub paired_surface: B::RawOperand,
    /// Result payload.
    pub dst: B::RawOperand,
    /// Per-message parameter payloads, in stream order.
    pub params: Vec<B::RawOperand>,
}

/// Body of an `avs` sample instruction.
pub struct AvsArgs<B: ProgramBuilder + ?Sized> {
    /// Channel mask.
    pub channel_mask: u8,
    /// Sampler state.
    pub sampler: B::SamplerVar,
    /// Surface being sampled.
    pub surface: B::SurfaceVar,
    /// Normalized horizontal coordinate.
    pub u_offset: B::Operand,
    /// Normalized vertical coordinate.
    pub v_offset: B::Operand,
    /// Horizontal coordinate delta.
    pub delta_u: B::Operand,
    /// Vertical coordinate delta.
    pub delta_v: B::Operand,
    /// Second-derivative horizontal delta.
    pub u2d: B::Operand,
    /// Group identifier.
    pub group_id: B::Operand,
    /// Vertical block number.
    pub vertical_block_number: B::Operand,
    /// Output format control.
    pub cntrl: u8,
    /// Second-derivative vertical delta.
    pub v2d: B::Operand,
    /// Execution mode.
    pub exec_mode: u8,
    /// Bypass the image-enhancement filter.
    pub ief_bypass: B::Operand,
    /// Result payload.
    pub dst: B::RawOperand,
}

/// Body of the gateway `raw_sendg` instruction.
pub struct RawSendgArgs<B: ProgramBuilder + ?Sized> {
    /// Execute only when the predicate passes, instead of unconditionally.
    pub is_conditional: bool,
    /// End-of-thread send.
    pub is_eot: bool,
    /// Shared-function identifier.
    pub sfid: u32,
    /// Result payload and its length in registers.
    pub dst: B::RawOperand,
    /// Destination length.
    pub dst_len: u32,
    /// First source payload.
    pub src0: B::RawOperand,
    /// First source length.
    pub src0_len: u32,
    /// Second source payload.
    pub src1: B::RawOperand,
    /// Second source length.
    pub src1_len: u32,
    /// First indirect descriptor operand.
    pub ind0: B::Operand,
    /// Second indirect descriptor operand.
    pub ind1: B::Operand,
    /// Low descriptor word.
    pub desc_lo: u32,
    /// High descriptor word.
    pub desc_hi: u32,
}

/// Operand bundle of a descriptor-driven `va_skl_plus` instruction, grouped by
/// operand kind in stream order.
pub struct VaPlusArgs<B: ProgramBuilder + ?Sized> {
    /// Sampler states, in stream order.
    pub samplers: Vec<B::SamplerVar>,
    /// Surface states, in stream order.
    pub surfaces: Vec<B::SurfaceVar>,
    /// Vector operands, in stream order.
    pub vectors: Vec<B::Operand>,
    /// Raw source payloads, in stream order.
    pub raw_srcs: Vec<B::RawOperand>,
    /// Scalar immediates, in stream order.
    pub scalars: Vec<u32>,
    /// Raw destination payload; absent for HDC forms that write a surface.
    pub dst: Option<B::RawOperand>,
}

/// L1/L3 cache-control pair of an LSC message.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LscCaching {
    /// L1 cache control.
    pub l1: u8,
    /// L3 cache control.
    pub l3: u8,
}

/// Address computation of an untyped LSC message.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LscAddr {
    /// Address model (flat, BTI, SS, BSS).
    pub addr_type: u8,
    /// Immediate scale applied to each offset.
    pub imm_scale: u16,
    /// Immediate offset added to each address.
    pub imm_offset: i32,
    /// Address size (16, 32, or 64 bits).
    pub size: u8,
}

/// Per-element data shape of an LSC message.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LscDataShape {
    /// Element size.
    pub size: u8,
    /// Element order (non-transposed or transposed).
    pub order: u8,
    /// Elements per address.
    pub elems: u8,
    /// Channel mask; meaningful only for the quad forms.
    pub chmask: u8,
}

/// Block shape of a 2D block LSC message.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LscBlock2dShape {
    /// Element size.
    pub size: u8,
    /// Element order.
    pub order: u8,
    /// Number of blocks.
    pub blocks: u8,
    /// Block width, in elements.
    pub width: u16,
    /// Block height, in elements.
    pub height: u16,
    /// Whether the load transforms data for VNNI.
    pub vnni: bool,
}

/// Body of an untyped LSC load/store/atomic.
pub struct LscUntypedArgs<B: ProgramBuilder + ?Sized> {
    /// Shared-function identifier the message routes to.
    pub sfid: u8,
    /// Cache controls.
    pub caching: LscCaching,
    /// Address computation.
    pub addr: LscAddr,
    /// Data shape.
    pub shape: LscDataShape,
    /// Surface base operand.
    pub surface: B::Operand,
    /// Surface-state index.
    pub surface_index: u32,
    /// Result payload.
    pub dst: B::RawOperand,
    /// Address/offset payload.
    pub src0: B::RawOperand,
    /// Pitch between rows; strided forms only.
    pub src0_pitch: Option<B::Operand>,
    /// Store data or first atomic operand.
    pub src1: B::RawOperand,
    /// Second atomic operand; absent for strided forms.
    pub src2: Option<B::RawOperand>,
}

/// Body of an untyped 2D block LSC load/store.
pub struct LscBlock2dArgs<B: ProgramBuilder + ?Sized> {
    /// Shared-function identifier.
    pub sfid: u8,
    /// Cache controls.
    pub caching: LscCaching,
    /// Block shape.
    pub shape: LscBlock2dShape,
    /// Result payload.
    pub dst: B::RawOperand,
    /// Surface base address, surface width, height, pitch, and the block X/Y
    /// offsets, in stream order.
    pub addrs: [B::Operand; 6],
    /// Store data payload.
    pub src1: B::RawOperand,
}

/// Body of a typed LSC message.
pub struct LscTypedArgs<B: ProgramBuilder + ?Sized> {
    /// Cache controls.
    pub caching: LscCaching,
    /// Address model.
    pub addr_type: u8,
    /// Address size.
    pub addr_size: u8,
    /// Data shape.
    pub shape: LscDataShape,
    /// Surface base operand.
    pub surface: B::Operand,
    /// Surface-state index.
    pub surface_index: u32,
    /// Result payload.
    pub dst: B::RawOperand,
    /// U coordinate payload and immediate offset.
    pub u: (B::RawOperand, i32),
    /// V coordinate payload and immediate offset.
    pub v: (B::RawOperand, i32),
    /// R coordinate payload and immediate offset.
    pub r: (B::RawOperand, i32),
    /// Level-of-detail payload.
    pub lod: B::RawOperand,
    /// Store data or first atomic operand.
    pub src1: B::RawOperand,
    /// Second atomic operand.
    pub src2: B::RawOperand,
}

/// Body of a typed 2D block LSC message.
pub struct LscTypedBlock2dArgs<B: ProgramBuilder + ?Sized> {
    /// Cache controls.
    pub caching: LscCaching,
    /// Address model.
    pub addr_type: u8,
    /// Block width, in elements.
    pub width: u16,
    /// Block height, in elements.
    pub height: u16,
    /// Surface base operand.
    pub surface: B::Operand,
    /// Surface-state index.
    pub surface_index: u32,
    /// Result payload.
    pub dst: B::RawOperand,
    /// Block X offset.
    pub x_offset: B::Operand,
    /// Block Y offset.
    pub y_offset: B::Operand,
    /// Store data payload.
    pub src1: B::RawOperand,
}

/// Receives the decoded program.
///
/// Handle types are opaque to the decoder; it stores them in per-routine
/// tables and passes them back whenever an encoded index resolves to the
/// corresponding declaration.
pub trait ProgramBuilder {
    /// Handle for a general register-file variable.
    type GenVar: Copy;
    /// Handle for an address variable.
    type AddrVar: Copy;
    /// Handle for a predicate variable.
    type PredVar: Copy;
    /// Handle for a sampler state variable.
    type SamplerVar: Copy;
    /// Handle for a surface state variable.
    type SurfaceVar: Copy;
    /// Handle for a label.
    type Label: Copy;
    /// A constructed vector (general/address/predicate/indirect/immediate/
    /// state) operand.
    type Operand: Clone;
    /// A constructed raw operand.
    type RawOperand: Clone;

    // Routine lifecycle.

    /// Starts a new kernel. Declarations and instructions that follow belong
    /// to it until the next `begin_*` call.
    fn begin_kernel(&mut self, name: &str) -> Result<()>;

    /// Starts a new function.
    fn begin_function(&mut self, name: &str) -> Result<()>;

    // Predefined handles.

    /// Resolves a predefined general variable (indices `0..32`).
    fn predefined_var(&mut self, index: u8) -> Result<Self::GenVar>;

    /// Resolves a predefined surface (indices `0..6`).
    fn predefined_surface(&mut self, index: u8) -> Result<Self::SurfaceVar>;

    /// Resolves the bindless sampler handle (sampler-table slot 31).
    fn bindless_sampler(&mut self) -> Result<Self::SamplerVar>;

    // Declarations.

    /// Declares a general variable. `alias` roots the variable inside another
    /// declaration at the given byte offset.
    fn declare_general(
        &mut self,
        name: &str,
        num_elements: u16,
        ty: VisaType,
        align: Align,
        alias: Option<(Self::GenVar, u16)>,
    ) -> Result<Self::GenVar>;

    /// Declares an address variable of `num_elements` words.
    fn declare_address(&mut self, name: &str, num_elements: u16) -> Result<Self::AddrVar>;

    /// Declares a predicate variable of `num_elements` flag bits.
    fn declare_predicate(&mut self, name: &str, num_elements: u16) -> Result<Self::PredVar>;

    /// Declares a sampler state variable.
    fn declare_sampler(&mut self, name: &str, num_elements: u16) -> Result<Self::SamplerVar>;

    /// Declares a surface state variable. `read_write` reflects a
    /// `SurfaceUsage` attribute requesting read-write access.
    fn declare_surface(
        &mut self,
        name: &str,
        num_elements: u16,
        read_write: bool,
    ) -> Result<Self::SurfaceVar>;

    /// Declares a label.
    fn declare_label(&mut self, name: &str, kind: LabelKind) -> Result<Self::Label>;

    /// Attaches an attribute to a previously declared variable.
    fn attach_attribute(&mut self, var: VarRef<Self>, attr: &Attribute) -> Result<()>;

    /// Records a routine-level attribute.
    fn set_routine_attribute(&mut self, attr: &Attribute) -> Result<()>;

    /// Binds a variable to the thread payload at `offset`. `implicit_kind` is
    /// zero for explicit arguments.
    fn register_input(
        &mut self,
        var: InputVar<Self>,
        offset: i16,
        size: u16,
        implicit_kind: u8,
    ) -> Result<()>;

    /// Records a function's encoded argument and return-value sizes.
    fn set_frame_sizes(&mut self, input_size: u8, return_size: u8) -> Result<()>;

    // Operand construction.

    /// Builds a general source operand.
    fn src_general(
        &mut self,
        var: Self::GenVar,
        modifier: Modifier,
        region: Region,
        row: u8,
        col: u8,
    ) -> Result<Self::Operand>;

    /// Builds a general destination operand.
    fn dst_general(
        &mut self,
        var: Self::GenVar,
        horizontal_stride: Option<u8>,
        row: u8,
        col: u8,
    ) -> Result<Self::Operand>;

    /// Builds an address operand over `width` lanes.
    fn address_operand(
        &mut self,
        var: Self::AddrVar,
        offset: u8,
        width: ExecSize,
        is_dst: bool,
    ) -> Result<Self::Operand>;

    /// Builds a predicate vector source operand.
    fn predicate_src(&mut self, var: Self::PredVar, size: ExecSize) -> Result<Self::Operand>;

    /// Builds a predicate vector destination operand.
    fn predicate_dst(&mut self, var: Self::PredVar, size: ExecSize) -> Result<Self::Operand>;

    /// Builds an indirect source operand through an address variable.
    #[allow(clippy::too_many_arguments)]
    fn indirect_src(
        &mut self,
        addr: Self::AddrVar,
        modifier: Modifier,
        addr_offset: u8,
        indirect_offset: i16,
        region: Region,
        ty: VisaType,
    ) -> Result<Self::Operand>;

    /// Builds an indirect destination operand through an address variable.
    fn indirect_dst(
        &mut self,
        addr: Self::AddrVar,
        addr_offset: u8,
        indirect_offset: i16,
        horizontal_stride: Option<u8>,
        ty: VisaType,
    ) -> Result<Self::Operand>;

    /// Builds an immediate operand.
    fn immediate(&mut self, imm: Immediate) -> Result<Self::Operand>;

    /// Builds a state (surface/sampler) operand.
    fn state_operand(
        &mut self,
        var: StateVar<Self>,
        offset: u8,
        is_dst: bool,
    ) -> Result<Self::Operand>;

    /// Builds an address-of view of a general variable, rooted at
    /// (`row`, `col`).
    fn address_of_general(
        &mut self,
        var: Self::GenVar,
        row: u8,
        col: u8,
    ) -> Result<Self::Operand>;

    /// Builds an address-of view of a state variable at `byte_offset`.
    fn address_of_state(
        &mut self,
        var: StateVar<Self>,
        byte_offset: u16,
    ) -> Result<Self::Operand>;

    /// Builds a raw operand: a register-aligned view of a general variable.
    fn raw_operand(&mut self, var: Self::GenVar, offset: u16) -> Result<Self::RawOperand>;

    /// Builds the null raw operand.
    fn null_raw_operand(&mut self) -> Result<Self::RawOperand>;

    // Data movement, arithmetic, logic.

    /// Appends `mov`/`sel`/`setp`/`movs`. `sel` carries `src1`.
    #[allow(clippy::too_many_arguments)]
    fn append_data_movement(
        &mut self,
        op: Opcode,
        pred: Option<Predication<Self>>,
        emask: EMask,
        size: ExecSize,
        saturate: bool,
        dst: Self::Operand,
        src0: Self::Operand,
        src1: Option<Self::Operand>,
    ) -> Result<()>;

    /// Appends `fminmax`.
    #[allow(clippy::too_many_arguments)]
    fn append_min_max(
        &mut self,
        sub: MinMax,
        emask: EMask,
        size: ExecSize,
        saturate: bool,
        dst: Self::Operand,
        src0: Self::Operand,
        src1: Self::Operand,
    ) -> Result<()>;

    /// Appends a one-, two-, or three-source arithmetic instruction.
    #[allow(clippy::too_many_arguments)]
    fn append_arithmetic(
        &mut self,
        op: Opcode,
        pred: Option<Predication<Self>>,
        emask: EMask,
        size: ExecSize,
        saturate: bool,
        dst: Self::Operand,
        src0: Self::Operand,
        src1: Option<Self::Operand>,
        src2: Option<Self::Operand>,
    ) -> Result<()>;

    /// Appends `addc`/`subb`, which write a result and a carry/borrow.
    #[allow(clippy::too_many_arguments)]
    fn append_two_dst_arithmetic(
        &mut self,
        op: Opcode,
        pred: Option<Predication<Self>>,
        emask: EMask,
        size: ExecSize,
        dst: Self::Operand,
        carry_borrow: Self::Operand,
        src0: Self::Operand,
        src1: Self::Operand,
    ) -> Result<()>;

    /// Appends a logic or shift instruction with up to four sources.
    #[allow(clippy::too_many_arguments)]
    fn append_logic(
        &mut self,
        op: Opcode,
        pred: Option<Predication<Self>>,
        emask: EMask,
        size: ExecSize,
        saturate: bool,
        dst: Self::Operand,
        src0: Self::Operand,
        src1: Option<Self::Operand>,
        src2: Option<Self::Operand>,
        src3: Option<Self::Operand>,
    ) -> Result<()>;

    /// Appends `bfn` with its boolean function-control byte.
    #[allow(clippy::too_many_arguments)]
    fn append_bfn(
        &mut self,
        func_ctrl: u8,
        pred: Option<Predication<Self>>,
        emask: EMask,
        size: ExecSize,
        saturate: bool,
        dst: Self::Operand,
        src0: Self::Operand,
        src1: Self::Operand,
        src2: Self::Operand,
    ) -> Result<()>;

    /// Appends `addr_add`.
    fn append_addr_add(
        &mut self,
        emask: EMask,
        size: ExecSize,
        dst: Self::Operand,
        src0: Self::Operand,
        src1: Self::Operand,
    ) -> Result<()>;

    /// Appends `cmp` writing a general destination.
    #[allow(clippy::too_many_arguments)]
    fn append_compare(
        &mut self,
        rel: CompareRelation,
        emask: EMask,
        size: ExecSize,
        dst: Self::Operand,
        src0: Self::Operand,
        src1: Self::Operand,
    ) -> Result<()>;

    /// Appends `cmp` writing a predicate.
    #[allow(clippy::too_many_arguments)]
    fn append_compare_to_predicate(
        &mut self,
        rel: CompareRelation,
        emask: EMask,
        size: ExecSize,
        dst: Self::PredVar,
        src0: Self::Operand,
        src1: Self::Operand,
    ) -> Result<()>;

    // Control flow.

    /// Appends a `label` or `subroutine` marker.
    fn append_label(&mut self, label: Self::Label) -> Result<()>;

    /// Appends `jmp`.
    fn append_jmp(
        &mut self,
        pred: Option<Predication<Self>>,
        emask: EMask,
        size: ExecSize,
        target: Self::Label,
    ) -> Result<()>;

    /// Appends `goto`.
    fn append_goto(
        &mut self,
        pred: Option<Predication<Self>>,
        emask: EMask,
        size: ExecSize,
        target: Self::Label,
    ) -> Result<()>;

    /// Appends `call`.
    fn append_call(
        &mut self,
        pred: Option<Predication<Self>>,
        emask: EMask,
        size: ExecSize,
        target: Self::Label,
    ) -> Result<()>;

    /// Appends `ret`.
    fn append_ret(
        &mut self,
        pred: Option<Predication<Self>>,
        emask: EMask,
        size: ExecSize,
    ) -> Result<()>;

    /// Appends `fret`.
    fn append_fret(
        &mut self,
        pred: Option<Predication<Self>>,
        emask: EMask,
        size: ExecSize,
    ) -> Result<()>;

    /// Appends `fcall` to the named function.
    #[allow(clippy::too_many_arguments)]
    fn append_fcall(
        &mut self,
        pred: Option<Predication<Self>>,
        emask: EMask,
        size: ExecSize,
        callee: &str,
        arg_size: u8,
        return_size: u8,
    ) -> Result<()>;

    /// Appends `ifcall` through a function-address operand.
    #[allow(clippy::too_many_arguments)]
    fn append_ifcall(
        &mut self,
        pred: Option<Predication<Self>>,
        emask: EMask,
        size: ExecSize,
        address: Self::Operand,
        arg_size: u8,
        return_size: u8,
    ) -> Result<()>;

    /// Appends `faddr`, taking the address of the named symbol.
    fn append_faddr(&mut self, symbol: &str, dst: Self::Operand) -> Result<()>;

    /// Appends `switchjmp` over the given targets.
    fn append_switch_jmp(
        &mut self,
        emask: EMask,
        size: ExecSize,
        index: Self::Operand,
        targets: &[Self::Label],
    ) -> Result<()>;

    // Synchronization.

    /// Appends `barrier`.
    fn append_barrier(&mut self) -> Result<()>;

    /// Appends `yield`.
    fn append_yield(&mut self) -> Result<()>;

    /// Appends `sampler_cache_flush`.
    fn append_sampler_cache_flush(&mut self) -> Result<()>;

    /// Appends `fence`.
    fn append_fence(&mut self, mask: FenceMask) -> Result<()>;

    /// Appends `wait`. `mask` is absent on versions that predate it.
    fn append_wait(&mut self, mask: Option<Self::Operand>) -> Result<()>;

    /// Appends `sbarrier` in signal or wait mode.
    fn append_split_barrier(&mut self, signal: bool) -> Result<()>;

    /// Appends the wait half of a named barrier.
    fn append_nbarrier_wait(&mut self, id: Self::Operand) -> Result<()>;

    /// Appends the signal half of a named barrier.
    fn append_nbarrier_signal(
        &mut self,
        id: Self::Operand,
        barrier_type: Self::Operand,
        num_producers: Self::Operand,
        num_consumers: Self::Operand,
    ) -> Result<()>;

    // Data-port access.

    /// Appends `media_ld`.
    #[allow(clippy::too_many_arguments)]
    fn append_media_load(
        &mut self,
        modifier: u8,
        surface: Self::SurfaceVar,
        plane: u8,
        block_width: u8,
        block_height: u8,
        x_offset: Self::Operand,
        y_offset: Self::Operand,
        dst: Self::RawOperand,
    ) -> Result<()>;

    /// Appends `media_st`.
    #[allow(clippy::too_many_arguments)]
    fn append_media_store(
        &mut self,
        modifier: u8,
        surface: Self::SurfaceVar,
        plane: u8,
        block_width: u8,
        block_height: u8,
        x_offset: Self::Operand,
        y_offset: Self::Operand,
        src: Self::RawOperand,
    ) -> Result<()>;

    /// Appends `oword_ld` or `oword_ld_unaligned`.
    fn append_oword_load(
        &mut self,
        num_owords: u8,
        unaligned: bool,
        surface: Self::SurfaceVar,
        offset: Self::Operand,
        dst: Self::RawOperand,
    ) -> Result<()>;

    /// Appends `oword_st`.
    fn append_oword_store(
        &mut self,
        num_owords: u8,
        surface: Self::SurfaceVar,
        offset: Self::Operand,
        src: Self::RawOperand,
    ) -> Result<()>;

    /// Appends legacy `gather`. `elt_bytes` is 1, 2, or 4; `num_elts` is the
    /// decoded element count.
    #[allow(clippy::too_many_arguments)]
    fn append_gather(
        &mut self,
        emask: EMask,
        elt_bytes: u8,
        num_elts: u8,
        surface: Self::SurfaceVar,
        global_offset: Self::Operand,
        element_offsets: Self::RawOperand,
        dst: Self::RawOperand,
    ) -> Result<()>;

    /// Appends legacy `scatter`.
    #[allow(clippy::too_many_arguments)]
    fn append_scatter(
        &mut self,
        emask: EMask,
        elt_bytes: u8,
        num_elts: u8,
        surface: Self::SurfaceVar,
        global_offset: Self::Operand,
        element_offsets: Self::RawOperand,
        src: Self::RawOperand,
    ) -> Result<()>;

    /// Appends `gather4_typed`.
    #[allow(clippy::too_many_arguments)]
    fn append_gather4_typed(
        &mut self,
        pred: Option<Predication<Self>>,
        emask: EMask,
        size: ExecSize,
        channel_mask: u8,
        surface: Self::SurfaceVar,
        u_offsets: Self::RawOperand,
        v_offsets: Self::RawOperand,
        r_offsets: Self::RawOperand,
        lod: Self::RawOperand,
        dst: Self::RawOperand,
    ) -> Result<()>;

    /// Appends `scatter4_typed`.
    #[allow(clippy::too_many_arguments)]
    fn append_scatter4_typed(
        &mut self,
        pred: Option<Predication<Self>>,
        emask: EMask,
        size: ExecSize,
        channel_mask: u8,
        surface: Self::SurfaceVar,
        u_offsets: Self::RawOperand,
        v_offsets: Self::RawOperand,
        r_offsets: Self::RawOperand,
        lod: Self::RawOperand,
        src: Self::RawOperand,
    ) -> Result<()>;

    /// Appends `gather4_scaled`.
    #[allow(clippy::too_many_arguments)]
    fn append_gather4_scaled(
        &mut self,
        pred: Option<Predication<Self>>,
        emask: EMask,
        size: ExecSize,
        channel_mask: u8,
        surface: Self::SurfaceVar,
        global_offset: Self::Operand,
        offsets: Self::RawOperand,
        dst: Self::RawOperand,
    ) -> Result<()>;

    /// Appends `scatter4_scaled`.
    #[allow(clippy::too_many_arguments)]
    fn append_scatter4_scaled(
        &mut self,
        pred: Option<Predication<Self>>,
        emask: EMask,
        size: ExecSize,
        channel_mask: u8,
        surface: Self::SurfaceVar,
        global_offset: Self::Operand,
        offsets: Self::RawOperand,
        src: Self::RawOperand,
    ) -> Result<()>;

    /// Appends `gather_scaled`.
    #[allow(clippy::too_many_arguments)]
    fn append_gather_scaled(
        &mut self,
        pred: Option<Predication<Self>>,
        emask: EMask,
        size: ExecSize,
        num_blocks: u8,
        surface: Self::SurfaceVar,
        global_offset: Self::Operand,
        offsets: Self::RawOperand,
        dst: Self::RawOperand,
    ) -> Result<()>;

    /// Appends `scatter_scaled`.
    #[allow(clippy::too_many_arguments)]
    fn append_scatter_scaled(
        &mut self,
        pred: Option<Predication<Self>>,
        emask: EMask,
        size: ExecSize,
        num_blocks: u8,
        surface: Self::SurfaceVar,
        global_offset: Self::Operand,
        offsets: Self::RawOperand,
        src: Self::RawOperand,
    ) -> Result<()>;

    /// Appends `qw_gather`.
    #[allow(clippy::too_many_arguments)]
    fn append_qw_gather(
        &mut self,
        pred: Option<Predication<Self>>,
        emask: EMask,
        size: ExecSize,
        num_blocks: u8,
        surface: Self::SurfaceVar,
        offsets: Self::RawOperand,
        dst: Self::RawOperand,
    ) -> Result<()>;

    /// Appends `qw_scatter`.
    #[allow(clippy::too_many_arguments)]
    fn append_qw_scatter(
        &mut self,
        pred: Option<Predication<Self>>,
        emask: EMask,
        size: ExecSize,
        num_blocks: u8,
        surface: Self::SurfaceVar,
        offsets: Self::RawOperand,
        src: Self::RawOperand,
    ) -> Result<()>;

    /// Appends `dword_atomic`.
    #[allow(clippy::too_many_arguments)]
    fn append_dword_atomic(
        &mut self,
        pred: Option<Predication<Self>>,
        emask: EMask,
        size: ExecSize,
        op: AtomicOp,
        width: AtomicWidth,
        surface: Self::SurfaceVar,
        offsets: Self::RawOperand,
        src0: Self::RawOperand,
        src1: Self::RawOperand,
        dst: Self::RawOperand,
    ) -> Result<()>;

    /// Appends `typed_atomic_3d`.
    #[allow(clippy::too_many_arguments)]
    fn append_typed_atomic(
        &mut self,
        pred: Option<Predication<Self>>,
        emask: EMask,
        size: ExecSize,
        op: AtomicOp,
        width: AtomicWidth,
        surface: Self::SurfaceVar,
        u_offsets: Self::RawOperand,
        v_offsets: Self::RawOperand,
        r_offsets: Self::RawOperand,
        lod: Self::RawOperand,
        src0: Self::RawOperand,
        src1: Self::RawOperand,
        dst: Self::RawOperand,
    ) -> Result<()>;

    /// Appends `rt_write_3d`.
    #[allow(clippy::too_many_arguments)]
    fn append_rt_write(
        &mut self,
        pred: Option<Predication<Self>>,
        emask: EMask,
        size: ExecSize,
        mode: u16,
        surface: Self::SurfaceVar,
        args: RtWriteArgs<Self>,
    ) -> Result<()>;

    // Miscellaneous.

    /// Appends a `file` debug directive.
    fn append_file(&mut self, name: &str) -> Result<()>;

    /// Appends a `loc` debug directive.
    fn append_loc(&mut self, line: u32) -> Result<()>;

    /// Appends `raw_send`.
    #[allow(clippy::too_many_arguments)]
    fn append_raw_send(
        &mut self,
        pred: Option<Predication<Self>>,
        emask: EMask,
        size: ExecSize,
        modifier: u8,
        ex_msg_desc: u32,
        num_src: u8,
        num_dst: u8,
        desc: Self::Operand,
        src: Self::RawOperand,
        dst: Self::RawOperand,
    ) -> Result<()>;

    /// Appends `raw_sends`. `ffid` is zero on versions that predate it.
    #[allow(clippy::too_many_arguments)]
    fn append_raw_sends(
        &mut self,
        pred: Option<Predication<Self>>,
        emask: EMask,
        size: ExecSize,
        is_eot: bool,
        num_src0: u8,
        num_src1: u8,
        num_dst: u8,
        ffid: u8,
        ex_msg_desc: Self::Operand,
        desc: Self::Operand,
        src0: Self::RawOperand,
        src1: Self::RawOperand,
        dst: Self::RawOperand,
    ) -> Result<()>;

    /// Appends `raw_sendg`.
    fn append_raw_sendg(
        &mut self,
        pred: Option<Predication<Self>>,
        emask: EMask,
        size: ExecSize,
        args: RawSendgArgs<Self>,
    ) -> Result<()>;

    /// Appends `vme_ime`.
    #[allow(clippy::too_many_arguments)]
    fn append_vme_ime(
        &mut self,
        stream_mode: u8,
        search_ctrl: u8,
        uni_input: Self::RawOperand,
        ime_input: Self::RawOperand,
        surface: Self::SurfaceVar,
        ref0: Self::RawOperand,
        ref1: Self::RawOperand,
        cost_center: Self::RawOperand,
        output: Self::RawOperand,
    ) -> Result<()>;

    /// Appends `vme_fbr`.
    #[allow(clippy::too_many_arguments)]
    fn append_vme_fbr(
        &mut self,
        uni_input: Self::RawOperand,
        fbr_input: Self::RawOperand,
        surface: Self::SurfaceVar,
        mb_mode: Self::Operand,
        sub_mb_shape: Self::Operand,
        sub_pred_mode: Self::Operand,
        output: Self::RawOperand,
    ) -> Result<()>;

    /// Appends `vme_sic`.
    fn append_vme_sic(
        &mut self,
        uni_input: Self::RawOperand,
        sic_input: Self::RawOperand,
        surface: Self::SurfaceVar,
        output: Self::RawOperand,
    ) -> Result<()>;

    /// Appends `vme_idm`.
    fn append_vme_idm(
        &mut self,
        uni_input: Self::RawOperand,
        idm_input: Self::RawOperand,
        surface: Self::SurfaceVar,
        output: Self::RawOperand,
    ) -> Result<()>;

    /// Appends `urb_write_3d`.
    #[allow(clippy::too_many_arguments)]
    fn append_urb_write(
        &mut self,
        pred: Option<Predication<Self>>,
        emask: EMask,
        size: ExecSize,
        num_out: u8,
        channel_mask: Self::RawOperand,
        global_offset: u16,
        urb_handle: Self::RawOperand,
        per_slot_offset: Self::RawOperand,
        vertex_data: Self::RawOperand,
    ) -> Result<()>;

    /// Appends `dpas`/`dpasw`. Precision, depth, and repeat controls are the
    /// four bytes of the encoded control word.
    #[allow(clippy::too_many_arguments)]
    fn append_dpas(
        &mut self,
        op: Opcode,
        emask: EMask,
        size: ExecSize,
        dst: Self::RawOperand,
        src0: Self::RawOperand,
        src1: Self::RawOperand,
        src2: Self::Operand,
        a_precision: u8,
        w_precision: u8,
        depth: u8,
        repeat: u8,
    ) -> Result<()>;

    /// Appends a `lifetime` start or end marker.
    fn append_lifetime(&mut self, start: bool, var: LifetimeRef<Self>) -> Result<()>;

    // Shared virtual memory.

    /// Appends an SVM block load.
    fn append_svm_block_load(
        &mut self,
        num_owords: u8,
        unaligned: bool,
        address: Self::Operand,
        dst: Self::RawOperand,
    ) -> Result<()>;

    /// Appends an SVM block store.
    fn append_svm_block_store(
        &mut self,
        num_owords: u8,
        address: Self::Operand,
        src: Self::RawOperand,
    ) -> Result<()>;

    /// Appends an SVM gather.
    #[allow(clippy::too_many_arguments)]
    fn append_svm_gather(
        &mut self,
        pred: Option<Predication<Self>>,
        emask: EMask,
        size: ExecSize,
        block_size: u8,
        num_blocks: u8,
        addresses: Self::RawOperand,
        dst: Self::RawOperand,
    ) -> Result<()>;

    /// Appends an SVM scatter.
    #[allow(clippy::too_many_arguments)]
    fn append_svm_scatter(
        &mut self,
        pred: Option<Predication<Self>>,
        emask: EMask,
        size: ExecSize,
        block_size: u8,
        num_blocks: u8,
        addresses: Self::RawOperand,
        src: Self::RawOperand,
    ) -> Result<()>;

    /// Appends an SVM atomic.
    #[allow(clippy::too_many_arguments)]
    fn append_svm_atomic(
        &mut self,
        pred: Option<Predication<Self>>,
        emask: EMask,
        size: ExecSize,
        op: AtomicOp,
        width: AtomicWidth,
        addresses: Self::RawOperand,
        src0: Self::RawOperand,
        src1: Self::RawOperand,
        dst: Self::RawOperand,
    ) -> Result<()>;

    /// Appends an SVM four-channel scaled gather.
    #[allow(clippy::too_many_arguments)]
    fn append_svm_gather4_scaled(
        &mut self,
        pred: Option<Predication<Self>>,
        emask: EMask,
        size: ExecSize,
        channel_mask: u8,
        address: Self::Operand,
        offsets: Self::RawOperand,
        dst: Self::RawOperand,
    ) -> Result<()>;

    /// Appends an SVM four-channel scaled scatter.
    #[allow(clippy::too_many_arguments)]
    fn append_svm_scatter4_scaled(
        &mut self,
        pred: Option<Predication<Self>>,
        emask: EMask,
        size: ExecSize,
        channel_mask: u8,
        address: Self::Operand,
        offsets: Self::RawOperand,
        src: Self::RawOperand,
    ) -> Result<()>;

    // Sampling.

    /// Appends `avs`.
    fn append_avs(&mut self, args: AvsArgs<Self>) -> Result<()>;

    /// Appends legacy `sample`.
    #[allow(clippy::too_many_arguments)]
    fn append_sample(
        &mut self,
        channel_mask: u8,
        simd16: bool,
        sampler: Self::SamplerVar,
        surface: Self::SurfaceVar,
        u_offsets: Self::RawOperand,
        v_offsets: Self::RawOperand,
        r_offsets: Self::RawOperand,
        dst: Self::RawOperand,
    ) -> Result<()>;

    /// Appends legacy `load`.
    #[allow(clippy::too_many_arguments)]
    fn append_sampler_load(
        &mut self,
        channel_mask: u8,
        simd16: bool,
        surface: Self::SurfaceVar,
        u_offsets: Self::RawOperand,
        v_offsets: Self::RawOperand,
        r_offsets: Self::RawOperand,
        dst: Self::RawOperand,
    ) -> Result<()>;

    /// Appends `sample_unorm`.
    #[allow(clippy::too_many_arguments)]
    fn append_sample_unorm(
        &mut self,
        channel_mask: u8,
        sampler: Self::SamplerVar,
        surface: Self::SurfaceVar,
        u_offset: Self::Operand,
        v_offset: Self::Operand,
        delta_u: Self::Operand,
        delta_v: Self::Operand,
        dst: Self::RawOperand,
    ) -> Result<()>;

    /// Appends `sample_3d`.
    #[allow(clippy::too_many_arguments)]
    fn append_sample_3d(
        &mut self,
        op: Sampler3dOp,
        flags: Sample3dFlags,
        pred: Option<Predication<Self>>,
        emask: EMask,
        size: ExecSize,
        args: Sample3dArgs<Self>,
    ) -> Result<()>;

    /// Appends `load_3d`.
    #[allow(clippy::too_many_arguments)]
    fn append_load_3d(
        &mut self,
        op: Sampler3dOp,
        flags: Sample3dFlags,
        pred: Option<Predication<Self>>,
        emask: EMask,
        size: ExecSize,
        args: Sample3dArgs<Self>,
    ) -> Result<()>;

    /// Appends `gather4_3d`.
    #[allow(clippy::too_many_arguments)]
    fn append_gather4_3d(
        &mut self,
        op: Sampler3dOp,
        pred: Option<Predication<Self>>,
        emask: EMask,
        size: ExecSize,
        args: Sample3dArgs<Self>,
    ) -> Result<()>;

    /// Appends `info_3d`. `lod` accompanies only the resinfo form.
    #[allow(clippy::too_many_arguments)]
    fn append_info_3d(
        &mut self,
        op: Sampler3dOp,
        emask: EMask,
        size: ExecSize,
        channel_mask: u8,
        surface: Self::SurfaceVar,
        lod: Option<Self::RawOperand>,
        dst: Self::RawOperand,
    ) -> Result<()>;

    /// Appends a `va` min/max.
    fn append_va_min_max(
        &mut self,
        surface: Self::SurfaceVar,
        u_offset: Self::Operand,
        v_offset: Self::Operand,
        mmf_mode: Self::Operand,
        dst: Self::RawOperand,
    ) -> Result<()>;

    /// Appends a `va` min/max filter.
    #[allow(clippy::too_many_arguments)]
    fn append_va_min_max_filter(
        &mut self,
        sampler: Self::SamplerVar,
        surface: Self::SurfaceVar,
        u_offset: Self::Operand,
        v_offset: Self::Operand,
        cntrl: u8,
        exec_mode: u8,
        mmf_mode: Self::Operand,
        dst: Self::RawOperand,
    ) -> Result<()>;

    /// Appends a `va` boolean centroid.
    #[allow(clippy::too_many_arguments)]
    fn append_va_bool_centroid(
        &mut self,
        surface: Self::SurfaceVar,
        u_offset: Self::Operand,
        v_offset: Self::Operand,
        v_size: Self::Operand,
        h_size: Self::Operand,
        dst: Self::RawOperand,
    ) -> Result<()>;

    /// Appends a `va` centroid.
    fn append_va_centroid(
        &mut self,
        surface: Self::SurfaceVar,
        u_offset: Self::Operand,
        v_offset: Self::Operand,
        v_size: Self::Operand,
        dst: Self::RawOperand,
    ) -> Result<()>;

    /// Appends a `va` convolve.
    #[allow(clippy::too_many_arguments)]
    fn append_va_convolve(
        &mut self,
        sampler: Self::SamplerVar,
        surface: Self::SurfaceVar,
        u_offset: Self::Operand,
        v_offset: Self::Operand,
        exec_mode: u8,
        big_kernel: bool,
        dst: Self::RawOperand,
    ) -> Result<()>;

    /// Appends a `va` erode or dilate.
    #[allow(clippy::too_many_arguments)]
    fn append_va_erode_dilate(
        &mut self,
        erode: bool,
        sampler: Self::SamplerVar,
        surface: Self::SurfaceVar,
        u_offset: Self::Operand,
        v_offset: Self::Operand,
        exec_mode: u8,
        dst: Self::RawOperand,
    ) -> Result<()>;

    /// Appends a descriptor-driven `va_skl_plus` instruction.
    fn append_va_plus(
        &mut self,
        sub: crate::isa::VaPlusSubOp,
        args: VaPlusArgs<Self>,
    ) -> Result<()>;

    // Load/store-cache messages.

    /// Appends `lsc_fence`.
    fn append_lsc_fence(
        &mut self,
        emask: EMask,
        size: ExecSize,
        sfid: u8,
        fence_op: u8,
        scope: u8,
    ) -> Result<()>;

    /// Appends an untyped LSC load/store/atomic.
    #[allow(clippy::too_many_arguments)]
    fn append_lsc_untyped(
        &mut self,
        sub: LscSubOp,
        pred: Option<Predication<Self>>,
        emask: EMask,
        size: ExecSize,
        args: LscUntypedArgs<Self>,
    ) -> Result<()>;

    /// Appends an untyped 2D block LSC load/store.
    fn append_lsc_untyped_block2d(
        &mut self,
        sub: LscSubOp,
        pred: Option<Predication<Self>>,
        emask: EMask,
        size: ExecSize,
        args: LscBlock2dArgs<Self>,
    ) -> Result<()>;

    /// Appends an LSC append-counter atomic.
    #[allow(clippy::too_many_arguments)]
    fn append_lsc_append_counter(
        &mut self,
        sub: LscSubOp,
        pred: Option<Predication<Self>>,
        emask: EMask,
        size: ExecSize,
        sfid: u8,
        caching: LscCaching,
        addr_type: u8,
        shape: LscDataShape,
        surface: Self::Operand,
        surface_index: u32,
        dst: Self::RawOperand,
        src: Self::RawOperand,
    ) -> Result<()>;

    /// Appends a typed LSC message.
    fn append_lsc_typed(
        &mut self,
        sub: LscSubOp,
        pred: Option<Predication<Self>>,
        emask: EMask,
        size: ExecSize,
        args: LscTypedArgs<Self>,
    ) -> Result<()>;

    /// Appends a typed 2D block LSC message.
    fn append_lsc_typed_block2d(
        &mut self,
        sub: LscSubOp,
        pred: Option<Predication<Self>>,
        emask: EMask,
        size: ExecSize,
        args: LscTypedBlock2dArgs<Self>,
    ) -> Result<()>;
}
