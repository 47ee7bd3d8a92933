//! A [`ProgramBuilder`] that records every call as one transcript line.
//!
//! Handles are table indices chosen to match the decoder's own numbering, so
//! transcript lines name variables the way the encoded stream indexed them.

use visa_bytecode::builder::{
    AvsArgs, Immediate, InputVar, LifetimeRef, LscCaching, LscDataShape, LscTypedArgs,
    LscTypedBlock2dArgs, LscBlock2dArgs, LscUntypedArgs, Predication, ProgramBuilder,
    RawSendgArgs, Region, RtWriteArgs, Sample3dArgs, Sample3dFlags, StateVar, VarRef,
};
use visa_bytecode::isa::{
    AtomicOp, AtomicWidth, CompareRelation, LscSubOp, MinMax, Sampler3dOp, VaPlusSubOp,
};
use visa_bytecode::{
    Align, Attribute, EMask, ExecSize, FenceMask, LabelKind, Modifier, Opcode, Result, VisaType,
};

#[derive(Debug, Default)]
pub struct Recorder {
    pub events: Vec<String>,
    generals: u32,
    addresses: u32,
    predicates: u32,
    samplers: u32,
    surfaces: u32,
    labels: u32,
}

fn opt(value: Option<u8>) -> String {
    match value {
        Some(v) => v.to_string(),
        None => "-".to_owned(),
    }
}

fn region(r: &Region) -> String {
    format!("{}/{}/{}", opt(r.vert), opt(r.width), opt(r.horiz))
}

fn pred(p: &Option<Predication<Recorder>>) -> String {
    match p {
        None => String::new(),
        Some(p) => format!(
            " @{}p{}:{:?}",
            if p.invert { "!" } else { "" },
            p.var,
            p.control
        ),
    }
}

fn var_ref(var: &VarRef<Recorder>) -> String {
    match var {
        VarRef::General(v) => format!("v{v}"),
        VarRef::Address(v) => format!("a{v}"),
        VarRef::Predicate(v) => format!("p{v}"),
        VarRef::Sampler(v) => format!("smp{v}"),
        VarRef::Surface(v) => format!("surf{v}"),
    }
}

fn state(var: &StateVar<Recorder>) -> String {
    match var {
        StateVar::Surface(v) => format!("surf{v}"),
        StateVar::Sampler(v) => format!("smp{v}"),
    }
}

fn opt_op(value: &Option<String>) -> String {
    match value {
        Some(v) => format!(" {v}"),
        None => String::new(),
    }
}

impl Recorder {
    fn push(&mut self, event: String) -> Result<()> {
        self.events.push(event);
        Ok(())
    }
}

impl ProgramBuilder for Recorder {
    type GenVar = u32;
    type AddrVar = u32;
    type PredVar = u32;
    type SamplerVar = u32;
    type SurfaceVar = u32;
    type Label = u32;
    type Operand = String;
    type RawOperand = String;

    fn begin_kernel(&mut self, name: &str) -> Result<()> {
        self.generals = 0;
        self.addresses = 0;
        self.predicates = 0;
        self.samplers = 0;
        self.surfaces = 0;
        self.labels = 0;
        self.push(format!("kernel {name}"))
    }

    fn begin_function(&mut self, name: &str) -> Result<()> {
        self.generals = 0;
        self.addresses = 0;
        self.predicates = 0;
        self.samplers = 0;
        self.surfaces = 0;
        self.labels = 0;
        self.push(format!("function {name}"))
    }

    fn predefined_var(&mut self, index: u8) -> Result<u32> {
        Ok(u32::from(index))
    }

    fn predefined_surface(&mut self, index: u8) -> Result<u32> {
        Ok(u32::from(index))
    }

    fn bindless_sampler(&mut self) -> Result<u32> {
        Ok(31)
    }

    fn declare_general(
        &mut self,
        name: &str,
        num_elements: u16,
        ty: VisaType,
        align: Align,
        alias: Option<(u32, u16)>,
    ) -> Result<u32> {
        let handle = 32 + self.generals;
        self.generals += 1;
        let alias = match alias {
            Some((var, off)) => format!(" alias=v{var}+{off}"),
            None => String::new(),
        };
        self.push(format!("decl_gen {name} {ty:?} {align:?} n={num_elements}{alias}"))?;
        Ok(handle)
    }

    fn declare_address(&mut self, name: &str, num_elements: u16) -> Result<u32> {
        let handle = self.addresses;
        self.addresses += 1;
        self.push(format!("decl_addr {name} n={num_elements}"))?;
        Ok(handle)
    }

    fn declare_predicate(&mut self, name: &str, num_elements: u16) -> Result<u32> {
        self.predicates += 1;
        self.push(format!("decl_pred {name} n={num_elements}"))?;
        Ok(self.predicates)
    }

    fn declare_sampler(&mut self, name: &str, _num_elements: u16) -> Result<u32> {
        let handle = self.samplers;
        self.samplers += 1;
        self.push(format!("decl_sampler {name}"))?;
        Ok(handle)
    }

    fn declare_surface(&mut self, name: &str, _num_elements: u16, read_write: bool) -> Result<u32> {
        let handle = 6 + self.surfaces;
        self.surfaces += 1;
        self.push(format!("decl_surface {name} rw={read_write}"))?;
        Ok(handle)
    }

    fn declare_label(&mut self, name: &str, kind: LabelKind) -> Result<u32> {
        let handle = self.labels;
        self.labels += 1;
        self.push(format!("decl_label {name} {kind:?}"))?;
        Ok(handle)
    }

    fn attach_attribute(&mut self, var: VarRef<Self>, attr: &Attribute) -> Result<()> {
        let target = var_ref(&var);
        self.push(format!("attr {target} {}={:?}", attr.name, attr.value))
    }

    fn set_routine_attribute(&mut self, attr: &Attribute) -> Result<()> {
        self.push(format!("rattr {}={:?}", attr.name, attr.value))
    }

    fn register_input(
        &mut self,
        var: InputVar<Self>,
        offset: i16,
        size: u16,
        implicit_kind: u8,
    ) -> Result<()> {
        let target = match var {
            InputVar::General(v) => format!("v{v}"),
            InputVar::Sampler(v) => format!("smp{v}"),
            InputVar::Surface(v) => format!("surf{v}"),
        };
        self.push(format!("input {target} off={offset} sz={size} implicit={implicit_kind}"))
    }

    fn set_frame_sizes(&mut self, input_size: u8, return_size: u8) -> Result<()> {
        self.push(format!("frame in={input_size} ret={return_size}"))
    }

    fn src_general(
        &mut self,
        var: u32,
        modifier: Modifier,
        r: Region,
        row: u8,
        col: u8,
    ) -> Result<String> {
        Ok(format!("v{var}({row},{col})m={modifier:?}r={}", region(&r)))
    }

    fn dst_general(
        &mut self,
        var: u32,
        horizontal_stride: Option<u8>,
        row: u8,
        col: u8,
    ) -> Result<String> {
        Ok(format!("v{var}({row},{col})h={}", opt(horizontal_stride)))
    }

    fn address_operand(&mut self, var: u32, offset: u8, width: ExecSize, is_dst: bool) -> Result<String> {
        let d = if is_dst { "d" } else { "" };
        Ok(format!("a{var}+{offset}w{}{d}", width.lanes()))
    }

    fn predicate_src(&mut self, var: u32, _size: ExecSize) -> Result<String> {
        Ok(format!("p{var}"))
    }

    fn predicate_dst(&mut self, var: u32, _size: ExecSize) -> Result<String> {
        Ok(format!("p{var}d"))
    }

    fn indirect_src(
        &mut self,
        addr: u32,
        modifier: Modifier,
        addr_offset: u8,
        indirect_offset: i16,
        r: Region,
        ty: VisaType,
    ) -> Result<String> {
        Ok(format!(
            "ind(a{addr}.{addr_offset},{indirect_offset},{ty:?},m={modifier:?},r={})",
            region(&r)
        ))
    }

    fn indirect_dst(
        &mut self,
        addr: u32,
        addr_offset: u8,
        indirect_offset: i16,
        horizontal_stride: Option<u8>,
        ty: VisaType,
    ) -> Result<String> {
        Ok(format!(
            "indd(a{addr}.{addr_offset},{indirect_offset},{ty:?},h={})",
            opt(horizontal_stride)
        ))
    }

    fn immediate(&mut self, imm: Immediate) -> Result<String> {
        Ok(format!("imm({:?},{:#x})", imm.ty, imm.bits))
    }

    fn state_operand(&mut self, var: StateVar<Self>, offset: u8, is_dst: bool) -> Result<String> {
        let d = if is_dst { "d" } else { "" };
        Ok(format!("st({},{offset}){d}", state(&var)))
    }

    fn address_of_general(&mut self, var: u32, row: u8, col: u8) -> Result<String> {
        Ok(format!("&v{var}({row},{col})"))
    }

    fn address_of_state(&mut self, var: StateVar<Self>, byte_offset: u16) -> Result<String> {
        Ok(format!("&{}+{byte_offset}", state(&var)))
    }

    fn raw_operand(&mut self, var: u32, offset: u16) -> Result<String> {
        Ok(format!("r(v{var}+{offset})"))
    }

    fn null_raw_operand(&mut self) -> Result<String> {
        Ok("null".to_owned())
    }

    fn append_data_movement(
        &mut self,
        op: Opcode,
        p: Option<Predication<Self>>,
        emask: EMask,
        size: ExecSize,
        saturate: bool,
        dst: String,
        src0: String,
        src1: Option<String>,
    ) -> Result<()> {
        let sat = if saturate { " sat" } else { "" };
        self.push(format!(
            "{} {emask:?} {size:?}{}{sat} {dst} {src0}{}",
            op.name(),
            pred(&p),
            opt_op(&src1)
        ))
    }

    fn append_min_max(
        &mut self,
        sub: MinMax,
        emask: EMask,
        size: ExecSize,
        saturate: bool,
        dst: String,
        src0: String,
        src1: String,
    ) -> Result<()> {
        let sat = if saturate { " sat" } else { "" };
        self.push(format!("fminmax.{sub:?} {emask:?} {size:?}{sat} {dst} {src0} {src1}"))
    }

    fn append_arithmetic(
        &mut self,
        op: Opcode,
        p: Option<Predication<Self>>,
        emask: EMask,
        size: ExecSize,
        saturate: bool,
        dst: String,
        src0: String,
        src1: Option<String>,
        src2: Option<String>,
    ) -> Result<()> {
        let sat = if saturate { " sat" } else { "" };
        self.push(format!(
            "{} {emask:?} {size:?}{}{sat} {dst} {src0}{}{}",
            op.name(),
            pred(&p),
            opt_op(&src1),
            opt_op(&src2)
        ))
    }

    fn append_two_dst_arithmetic(
        &mut self,
        op: Opcode,
        p: Option<Predication<Self>>,
        emask: EMask,
        size: ExecSize,
        dst: String,
        carry_borrow: String,
        src0: String,
        src1: String,
    ) -> Result<()> {
        self.push(format!(
            "{} {emask:?} {size:?}{} {dst} {carry_borrow} {src0} {src1}",
            op.name(),
            pred(&p)
        ))
    }

    fn append_logic(
        &mut self,
        op: Opcode,
        p: Option<Predication<Self>>,
        emask: EMask,
        size: ExecSize,
        saturate: bool,
        dst: String,
        src0: String,
        src1: Option<String>,
        src2: Option<String>,
        src3: Option<String>,
    ) -> Result<()> {
        let sat = if saturate { " sat" } else { "" };
        self.push(format!(
            "{} {emask:?} {size:?}{}{sat} {dst} {src0}{}{}{}",
            op.name(),
            pred(&p),
            opt_op(&src1),
            opt_op(&src2),
            opt_op(&src3)
        ))
    }

    fn append_bfn(
        &mut self,
        func_ctrl: u8,
        p: Option<Predication<Self>>,
        emask: EMask,
        size: ExecSize,
        saturate: bool,
        dst: String,
        src0: String,
        src1: String,
        src2: String,
    ) -> Result<()> {
        let sat = if saturate { " sat" } else { "" };
        self.push(format!(
            "bfn.{func_ctrl:#04x} {emask:?} {size:?}{}{sat} {dst} {src0} {src1} {src2}",
            pred(&p)
        ))
    }

    fn append_addr_add(
        &mut self,
        emask: EMask,
        size: ExecSize,
        dst: String,
        src0: String,
        src1: String,
    ) -> Result<()> {
        self.push(format!("addr_add {emask:?} {size:?} {dst} {src0} {src1}"))
    }

    fn append_compare(
        &mut self,
        rel: CompareRelation,
        emask: EMask,
        size: ExecSize,
        dst: String,
        src0: String,
        src1: String,
    ) -> Result<()> {
        self.push(format!("cmp.{rel:?} {emask:?} {size:?} {dst} {src0} {src1}"))
    }

    fn append_compare_to_predicate(
        &mut self,
        rel: CompareRelation,
        emask: EMask,
        size: ExecSize,
        dst: u32,
        src0: String,
        src1: String,
    ) -> Result<()> {
        self.push(format!("cmp.{rel:?} {emask:?} {size:?} p{dst} {src0} {src1}"))
    }

    fn append_label(&mut self, label: u32) -> Result<()> {
        self.push(format!("label l{label}"))
    }

    fn append_jmp(
        &mut self,
        p: Option<Predication<Self>>,
        emask: EMask,
        size: ExecSize,
        target: u32,
    ) -> Result<()> {
        self.push(format!("jmp {emask:?} {size:?}{} l{target}", pred(&p)))
    }

    fn append_goto(
        &mut self,
        p: Option<Predication<Self>>,
        emask: EMask,
        size: ExecSize,
        target: u32,
    ) -> Result<()> {
        self.push(format!("goto {emask:?} {size:?}{} l{target}", pred(&p)))
    }

    fn append_call(
        &mut self,
        p: Option<Predication<Self>>,
        emask: EMask,
        size: ExecSize,
        target: u32,
    ) -> Result<()> {
        self.push(format!("call {emask:?} {size:?}{} l{target}", pred(&p)))
    }

    fn append_ret(&mut self, p: Option<Predication<Self>>, emask: EMask, size: ExecSize) -> Result<()> {
        self.push(format!("ret {emask:?} {size:?}{}", pred(&p)))
    }

    fn append_fret(&mut self, p: Option<Predication<Self>>, emask: EMask, size: ExecSize) -> Result<()> {
        self.push(format!("fret {emask:?} {size:?}{}", pred(&p)))
    }

    fn append_fcall(
        &mut self,
        p: Option<Predication<Self>>,
        emask: EMask,
        size: ExecSize,
        callee: &str,
        arg_size: u8,
        return_size: u8,
    ) -> Result<()> {
        self.push(format!(
            "fcall {emask:?} {size:?}{} {callee} arg={arg_size} ret={return_size}",
            pred(&p)
        ))
    }

    fn append_ifcall(
        &mut self,
        p: Option<Predication<Self>>,
        emask: EMask,
        size: ExecSize,
        address: String,
        arg_size: u8,
        return_size: u8,
    ) -> Result<()> {
        self.push(format!(
            "ifcall {emask:?} {size:?}{} {address} arg={arg_size} ret={return_size}",
            pred(&p)
        ))
    }

    fn append_faddr(&mut self, symbol: &str, dst: String) -> Result<()> {
        self.push(format!("faddr {symbol} {dst}"))
    }

    fn append_switch_jmp(
        &mut self,
        emask: EMask,
        size: ExecSize,
        index: String,
        targets: &[u32],
    ) -> Result<()> {
        let labels: Vec<String> = targets.iter().map(|t| format!("l{t}")).collect();
        self.push(format!(
            "switchjmp {emask:?} {size:?} {index} [{}]",
            labels.join(" ")
        ))
    }

    fn append_barrier(&mut self) -> Result<()> {
        self.push("barrier".to_owned())
    }

    fn append_yield(&mut self) -> Result<()> {
        self.push("yield".to_owned())
    }

    fn append_sampler_cache_flush(&mut self) -> Result<()> {
        self.push("sampler_cache_flush".to_owned())
    }

    fn append_fence(&mut self, mask: FenceMask) -> Result<()> {
        self.push(format!("fence {mask:?}"))
    }

    fn append_wait(&mut self, mask: Option<String>) -> Result<()> {
        self.push(format!("wait{}", opt_op(&mask)))
    }

    fn append_split_barrier(&mut self, signal: bool) -> Result<()> {
        self.push(format!("sbarrier signal={signal}"))
    }

    fn append_nbarrier_wait(&mut self, id: String) -> Result<()> {
        self.push(format!("nbarrier.wait {id}"))
    }

    fn append_nbarrier_signal(
        &mut self,
        id: String,
        barrier_type: String,
        num_producers: String,
        num_consumers: String,
    ) -> Result<()> {
        self.push(format!(
            "nbarrier.signal {id} {barrier_type} {num_producers} {num_consumers}"
        ))
    }

    fn append_media_load(
        &mut self,
        modifier: u8,
        surface: u32,
        plane: u8,
        block_width: u8,
        block_height: u8,
        x_offset: String,
        y_offset: String,
        dst: String,
    ) -> Result<()> {
        self.push(format!(
            "media_ld.{modifier} surf{surface} plane={plane} {block_width}x{block_height} {x_offset} {y_offset} {dst}"
        ))
    }

    fn append_media_store(
        &mut self,
        modifier: u8,
        surface: u32,
        plane: u8,
        block_width: u8,
        block_height: u8,
        x_offset: String,
        y_offset: String,
        src: String,
    ) -> Result<()> {
        self.push(format!(
            "media_st.{modifier} surf{surface} plane={plane} {block_width}x{block_height} {x_offset} {y_offset} {src}"
        ))
    }

    fn append_oword_load(
        &mut self,
        num_owords: u8,
        unaligned: bool,
        surface: u32,
        offset: String,
        dst: String,
    ) -> Result<()> {
        self.push(format!(
            "oword_ld n={num_owords} unaligned={unaligned} surf{surface} {offset} {dst}"
        ))
    }

    fn append_oword_store(
        &mut self,
        num_owords: u8,
        surface: u32,
        offset: String,
        src: String,
    ) -> Result<()> {
        self.push(format!("oword_st n={num_owords} surf{surface} {offset} {src}"))
    }

    fn append_gather(
        &mut self,
        emask: EMask,
        elt_bytes: u8,
        num_elts: u8,
        surface: u32,
        global_offset: String,
        element_offsets: String,
        dst: String,
    ) -> Result<()> {
        self.push(format!(
            "gather {emask:?} elt={elt_bytes} n={num_elts} surf{surface} {global_offset} {element_offsets} {dst}"
        ))
    }

    fn append_scatter(
        &mut self,
        emask: EMask,
        elt_bytes: u8,
        num_elts: u8,
        surface: u32,
        global_offset: String,
        element_offsets: String,
        src: String,
    ) -> Result<()> {
        self.push(format!(
            "scatter {emask:?} elt={elt_bytes} n={num_elts} surf{surface} {global_offset} {element_offsets} {src}"
        ))
    }

    fn append_gather4_typed(
        &mut self,
        p: Option<Predication<Self>>,
        emask: EMask,
        size: ExecSize,
        channel_mask: u8,
        surface: u32,
        u_offsets: String,
        v_offsets: String,
        r_offsets: String,
        lod: String,
        dst: String,
    ) -> Result<()> {
        self.push(format!(
            "gather4_typed {emask:?} {size:?}{} mask={channel_mask:#x} surf{surface} {u_offsets} {v_offsets} {r_offsets} {lod} {dst}",
            pred(&p)
        ))
    }

    fn append_scatter4_typed(
        &mut self,
        p: Option<Predication<Self>>,
        emask: EMask,
        size: ExecSize,
        channel_mask: u8,
        surface: u32,
        u_offsets: String,
        v_offsets: String,
        r_offsets: String,
        lod: String,
        src: String,
    ) -> Result<()> {
        self.push(format!(
            "scatter4_typed {emask:?} {size:?}{} mask={channel_mask:#x} surf{surface} {u_offsets} {v_offsets} {r_offsets} {lod} {src}",
            pred(&p)
        ))
    }

    fn append_gather4_scaled(
        &mut self,
        p: Option<Predication<Self>>,
        emask: EMask,
        size: ExecSize,
        channel_mask: u8,
        surface: u32,
        global_offset: String,
        offsets: String,
        dst: String,
    ) -> Result<()> {
        self.push(format!(
            "gather4_scaled {emask:?} {size:?}{} mask={channel_mask:#x} surf{surface} {global_offset} {offsets} {dst}",
            pred(&p)
        ))
    }

    fn append_scatter4_scaled(
        &mut self,
        p: Option<Predication<Self>>,
        emask: EMask,
        size: ExecSize,
        channel_mask: u8,
        surface: u32,
        global_offset: String,
        offsets: String,
        src: String,
    ) -> Result<()> {
        self.push(format!(
            "scatter4_scaled {emask:?} {size:?}{} mask={channel_mask:#x} surf{surface} {global_offset} {offsets} {src}",
            pred(&p)
        ))
    }

    fn append_gather_scaled(
        &mut self,
        p: Option<Predication<Self>>,
        emask: EMask,
        size: ExecSize,
        num_blocks: u8,
        surface: u32,
        global_offset: String,
        offsets: String,
        dst: String,
    ) -> Result<()> {
        self.push(format!(
            "gather_scaled {emask:?} {size:?}{} blocks={num_blocks} surf{surface} {global_offset} {offsets} {dst}",
            pred(&p)
        ))
    }

    fn append_scatter_scaled(
        &mut self,
        p: Option<Predication<Self>>,
        emask: EMask,
        size: ExecSize,
        num_blocks: u8,
        surface: u32,
        global_offset: String,
        offsets: String,
        src: String,
    ) -> Result<()> {
        self.push(format!(
            "scatter_scaled {emask:?} {size:?}{} blocks={num_blocks} surf{surface} {global_offset} {offsets} {src}",
            pred(&p)
        ))
    }

    fn append_qw_gather(
        &mut self,
        p: Option<Predication<Self>>,
        emask: EMask,
        size: ExecSize,
        num_blocks: u8,
        surface: u32,
        offsets: String,
        dst: String,
    ) -> Result<()> {
        self.push(format!(
            "qw_gather {emask:?} {size:?}{} blocks={num_blocks} surf{surface} {offsets} {dst}",
            pred(&p)
        ))
    }

    fn append_qw_scatter(
        &mut self,
        p: Option<Predication<Self>>,
        emask: EMask,
        size: ExecSize,
        num_blocks: u8,
        surface: u32,
        offsets: String,
        src: String,
    ) -> Result<()> {
        self.push(format!(
            "qw_scatter {emask:?} {size:?}{} blocks={num_blocks} surf{surface} {offsets} {src}",
            pred(&p)
        ))
    }

    fn append_dword_atomic(
        &mut self,
        p: Option<Predication<Self>>,
        emask: EMask,
        size: ExecSize,
        op: AtomicOp,
        width: AtomicWidth,
        surface: u32,
        offsets: String,
        src0: String,
        src1: String,
        dst: String,
    ) -> Result<()> {
        self.push(format!(
            "dword_atomic.{op:?}.{width:?} {emask:?} {size:?}{} surf{surface} {offsets} {src0} {src1} {dst}",
            pred(&p)
        ))
    }

    fn append_typed_atomic(
        &mut self,
        p: Option<Predication<Self>>,
        emask: EMask,
        size: ExecSize,
        op: AtomicOp,
        width: AtomicWidth,
        surface: u32,
        u_offsets: String,
        v_offsets: String,
        r_offsets: String,
        lod: String,
        src0: String,
        src1: String,
        dst: String,
    ) -> Result<()> {
        self.push(format!(
            "typed_atomic.{op:?}.{width:?} {emask:?} {size:?}{} surf{surface} {u_offsets} {v_offsets} {r_offsets} {lod} {src0} {src1} {dst}",
            pred(&p)
        ))
    }

    fn append_rt_write(
        &mut self,
        p: Option<Predication<Self>>,
        emask: EMask,
        size: ExecSize,
        mode: u16,
        surface: u32,
        args: RtWriteArgs<Self>,
    ) -> Result<()> {
        self.push(format!(
            "rt_write {emask:?} {size:?}{} mode={mode:#x} surf{surface} {}{}{}{}{}{} {} {} {} {}{}{}",
            pred(&p),
            args.r1_header,
            opt_op(&args.sample_index),
            opt_op(&args.cps_counter),
            opt_op(&args.rt_index),
            opt_op(&args.src0_alpha),
            opt_op(&args.output_mask),
            args.red,
            args.green,
            args.blue,
            args.alpha,
            opt_op(&args.depth),
            opt_op(&args.stencil)
        ))
    }

    fn append_file(&mut self, name: &str) -> Result<()> {
        self.push(format!("file {name}"))
    }

    fn append_loc(&mut self, line: u32) -> Result<()> {
        self.push(format!("loc {line}"))
    }

    fn append_raw_send(
        &mut self,
        p: Option<Predication<Self>>,
        emask: EMask,
        size: ExecSize,
        modifier: u8,
        ex_msg_desc: u32,
        num_src: u8,
        num_dst: u8,
        desc: String,
        src: String,
        dst: String,
    ) -> Result<()> {
        self.push(format!(
            "raw_send {emask:?} {size:?}{} mod={modifier} ex={ex_msg_desc:#x} ns={num_src} nd={num_dst} {desc} {src} {dst}",
            pred(&p)
        ))
    }

    fn append_raw_sends(
        &mut self,
        p: Option<Predication<Self>>,
        emask: EMask,
        size: ExecSize,
        is_eot: bool,
        num_src0: u8,
        num_src1: u8,
        num_dst: u8,
        ffid: u8,
        ex_msg_desc: String,
        desc: String,
        src0: String,
        src1: String,
        dst: String,
    ) -> Result<()> {
        self.push(format!(
            "raw_sends {emask:?} {size:?}{} eot={is_eot} n0={num_src0} n1={num_src1} nd={num_dst} ffid={ffid} {ex_msg_desc} {desc} {src0} {src1} {dst}",
            pred(&p)
        ))
    }

    fn append_raw_sendg(
        &mut self,
        p: Option<Predication<Self>>,
        emask: EMask,
        size: ExecSize,
        args: RawSendgArgs<Self>,
    ) -> Result<()> {
        self.push(format!(
            "raw_sendg {emask:?} {size:?}{} cond={} eot={} sfid={} {}:{} {}:{} {}:{} {} {} desc={:#x}:{:#x}",
            pred(&p),
            args.is_conditional,
            args.is_eot,
            args.sfid,
            args.dst,
            args.dst_len,
            args.src0,
            args.src0_len,
            args.src1,
            args.src1_len,
            args.ind0,
            args.ind1,
            args.desc_lo,
            args.desc_hi
        ))
    }

    fn append_vme_ime(
        &mut self,
        stream_mode: u8,
        search_ctrl: u8,
        uni_input: String,
        ime_input: String,
        surface: u32,
        ref0: String,
        ref1: String,
        cost_center: String,
        output: String,
    ) -> Result<()> {
        self.push(format!(
            "vme_ime stream={stream_mode} search={search_ctrl} {uni_input} {ime_input} surf{surface} {ref0} {ref1} {cost_center} {output}"
        ))
    }

    fn append_vme_fbr(
        &mut self,
        uni_input: String,
        fbr_input: String,
        surface: u32,
        mb_mode: String,
        sub_mb_shape: String,
        sub_pred_mode: String,
        output: String,
    ) -> Result<()> {
        self.push(format!(
            "vme_fbr {uni_input} {fbr_input} surf{surface} {mb_mode} {sub_mb_shape} {sub_pred_mode} {output}"
        ))
    }

    fn append_vme_sic(
        &mut self,
        uni_input: String,
        sic_input: String,
        surface: u32,
        output: String,
    ) -> Result<()> {
        self.push(format!("vme_sic {uni_input} {sic_input} surf{surface} {output}"))
    }

    fn append_vme_idm(
        &mut self,
        uni_input: String,
        idm_input: String,
        surface: u32,
        output: String,
    ) -> Result<()> {
        self.push(format!("vme_idm {uni_input} {idm_input} surf{surface} {output}"))
    }

    fn append_urb_write(
        &mut self,
        p: Option<Predication<Self>>,
        emask: EMask,
        size: ExecSize,
        num_out: u8,
        channel_mask: String,
        global_offset: u16,
        urb_handle: String,
        per_slot_offset: String,
        vertex_data: String,
    ) -> Result<()> {
        self.push(format!(
            "urb_write {emask:?} {size:?}{} n={num_out} {channel_mask} off={global_offset} {urb_handle} {per_slot_offset} {vertex_data}",
            pred(&p)
        ))
    }

    fn append_dpas(
        &mut self,
        op: Opcode,
        emask: EMask,
        size: ExecSize,
        dst: String,
        src0: String,
        src1: String,
        src2: String,
        a_precision: u8,
        w_precision: u8,
        depth: u8,
        repeat: u8,
    ) -> Result<()> {
        self.push(format!(
            "{} {emask:?} {size:?} {dst} {src0} {src1} {src2} a={a_precision} w={w_precision} d={depth} r={repeat}",
            op.name()
        ))
    }

    fn append_lifetime(&mut self, start: bool, var: LifetimeRef<Self>) -> Result<()> {
        let target = match var {
            LifetimeRef::General(v) => format!("v{v}"),
            LifetimeRef::Address(v) => format!("a{v}"),
            LifetimeRef::Predicate(v) => format!("p{v}"),
        };
        let phase = if start { "start" } else { "end" };
        self.push(format!("lifetime.{phase} {target}"))
    }

    fn append_svm_block_load(
        &mut self,
        num_owords: u8,
        unaligned: bool,
        address: String,
        dst: String,
    ) -> Result<()> {
        self.push(format!(
            "svm_block_ld n={num_owords} unaligned={unaligned} {address} {dst}"
        ))
    }

    fn append_svm_block_store(&mut self, num_owords: u8, address: String, src: String) -> Result<()> {
        self.push(format!("svm_block_st n={num_owords} {address} {src}"))
    }

    fn append_svm_gather(
        &mut self,
        p: Option<Predication<Self>>,
        emask: EMask,
        size: ExecSize,
        block_size: u8,
        num_blocks: u8,
        addresses: String,
        dst: String,
    ) -> Result<()> {
        self.push(format!(
            "svm_gather {emask:?} {size:?}{} bs={block_size} n={num_blocks} {addresses} {dst}",
            pred(&p)
        ))
    }

    fn append_svm_scatter(
        &mut self,
        p: Option<Predication<Self>>,
        emask: EMask,
        size: ExecSize,
        block_size: u8,
        num_blocks: u8,
        addresses: String,
        src: String,
    ) -> Result<()> {
        self.push(format!(
            "svm_scatter {emask:?} {size:?}{} bs={block_size} n={num_blocks} {addresses} {src}",
            pred(&p)
        ))
    }

    fn append_svm_atomic(
        &mut self,
        p: Option<Predication<Self>>,
        emask: EMask,
        size: ExecSize,
        op: AtomicOp,
        width: AtomicWidth,
        addresses: String,
        src0: String,
        src1: String,
        dst: String,
    ) -> Result<()> {
        self.push(format!(
            "svm_atomic.{op:?}.{width:?} {emask:?} {size:?}{} {addresses} {src0} {src1} {dst}",
            pred(&p)
        ))
    }

    fn append_svm_gather4_scaled(
        &mut self,
        p: Option<Predication<Self>>,
        emask: EMask,
        size: ExecSize,
        channel_mask: u8,
        address: String,
        offsets: String,
        dst: String,
    ) -> Result<()> {
        self.push(format!(
            "svm_gather4_scaled {emask:?} {size:?}{} mask={channel_mask:#x} {address} {offsets} {dst}",
            pred(&p)
        ))
    }

    fn append_svm_scatter4_scaled(
        &mut self,
        p: Option<Predication<Self>>,
        emask: EMask,
        size: ExecSize,
        channel_mask: u8,
        address: String,
        offsets: String,
        src: String,
    ) -> Result<()> {
        self.push(format!(
            "svm_scatter4_scaled {emask:?} {size:?}{} mask={channel_mask:#x} {address} {offsets} {src}",
            pred(&p)
        ))
    }

    fn append_avs(&mut self, args: AvsArgs<Self>) -> Result<()> {
        self.push(format!(
            "avs mask={:#x} smp{} surf{} {} {} {} {} {} {} {} cntrl={} {} exec={} {} {}",
            args.channel_mask,
            args.sampler,
            args.surface,
            args.u_offset,
            args.v_offset,
            args.delta_u,
            args.delta_v,
            args.u2d,
            args.group_id,
            args.vertical_block_number,
            args.cntrl,
            args.v2d,
            args.exec_mode,
            args.ief_bypass,
            args.dst
        ))
    }

    fn append_sample(
        &mut self,
        channel_mask: u8,
        simd16: bool,
        sampler: u32,
        surface: u32,
        u_offsets: String,
        v_offsets: String,
        r_offsets: String,
        dst: String,
    ) -> Result<()> {
        self.push(format!(
            "sample mask={channel_mask:#x} simd16={simd16} smp{sampler} surf{surface} {u_offsets} {v_offsets} {r_offsets} {dst}"
        ))
    }

    fn append_sampler_load(
        &mut self,
        channel_mask: u8,
        simd16: bool,
        surface: u32,
        u_offsets: String,
        v_offsets: String,
        r_offsets: String,
        dst: String,
    ) -> Result<()> {
        self.push(format!(
            "load mask={channel_mask:#x} simd16={simd16} surf{surface} {u_offsets} {v_offsets} {r_offsets} {dst}"
        ))
    }

    fn append_sample_unorm(
        &mut self,
        channel_mask: u8,
        sampler: u32,
        surface: u32,
        u_offset: String,
        v_offset: String,
        delta_u: String,
        delta_v: String,
        dst: String,
    ) -> Result<()> {
        self.push(format!(
            "sample_unorm mask={channel_mask:#x} smp{sampler} surf{surface} {u_offset} {v_offset} {delta_u} {delta_v} {dst}"
        ))
    }

    fn append_sample_3d(
        &mut self,
        op: Sampler3dOp,
        flags: Sample3dFlags,
        p: Option<Predication<Self>>,
        emask: EMask,
        size: ExecSize,
        args: Sample3dArgs<Self>,
    ) -> Result<()> {
        self.push(format!(
            "sample_3d.{op:?} {emask:?} {size:?}{} pnm={} cps={} nu={} {}",
            pred(&p),
            flags.pixel_null_mask,
            flags.cps_enable,
            flags.non_uniform,
            sample3d(&args)
        ))
    }

    fn append_load_3d(
        &mut self,
        op: Sampler3dOp,
        flags: Sample3dFlags,
        p: Option<Predication<Self>>,
        emask: EMask,
        size: ExecSize,
        args: Sample3dArgs<Self>,
    ) -> Result<()> {
        self.push(format!(
            "load_3d.{op:?} {emask:?} {size:?}{} pnm={} cps={} nu={} {}",
            pred(&p),
            flags.pixel_null_mask,
            flags.cps_enable,
            flags.non_uniform,
            sample3d(&args)
        ))
    }

    fn append_gather4_3d(
        &mut self,
        op: Sampler3dOp,
        p: Option<Predication<Self>>,
        emask: EMask,
        size: ExecSize,
        args: Sample3dArgs<Self>,
    ) -> Result<()> {
        self.push(format!(
            "gather4_3d.{op:?} {emask:?} {size:?}{} {}",
            pred(&p),
            sample3d(&args)
        ))
    }

    fn append_info_3d(
        &mut self,
        op: Sampler3dOp,
        emask: EMask,
        size: ExecSize,
        channel_mask: u8,
        surface: u32,
        lod: Option<String>,
        dst: String,
    ) -> Result<()> {
        self.push(format!(
            "info_3d.{op:?} {emask:?} {size:?} mask={channel_mask:#x} surf{surface}{} {dst}",
            opt_op(&lod)
        ))
    }

    fn append_va_min_max(
        &mut self,
        surface: u32,
        u_offset: String,
        v_offset: String,
        mmf_mode: String,
        dst: String,
    ) -> Result<()> {
        self.push(format!(
            "va_minmax surf{surface} {u_offset} {v_offset} {mmf_mode} {dst}"
        ))
    }

    fn append_va_min_max_filter(
        &mut self,
        sampler: u32,
        surface: u32,
        u_offset: String,
        v_offset: String,
        cntrl: u8,
        exec_mode: u8,
        mmf_mode: String,
        dst: String,
    ) -> Result<()> {
        self.push(format!(
            "va_minmaxfilter smp{sampler} surf{surface} {u_offset} {v_offset} cntrl={cntrl} exec={exec_mode} {mmf_mode} {dst}"
        ))
    }

    fn append_va_bool_centroid(
        &mut self,
        surface: u32,
        u_offset: String,
        v_offset: String,
        v_size: String,
        h_size: String,
        dst: String,
    ) -> Result<()> {
        self.push(format!(
            "va_bool_centroid surf{surface} {u_offset} {v_offset} {v_size} {h_size} {dst}"
        ))
    }

    fn append_va_centroid(
        &mut self,
        surface: u32,
        u_offset: String,
        v_offset: String,
        v_size: String,
        dst: String,
    ) -> Result<()> {
        self.push(format!(
            "va_centroid surf{surface} {u_offset} {v_offset} {v_size} {dst}"
        ))
    }

    fn append_va_convolve(
        &mut self,
        sampler: u32,
        surface: u32,
        u_offset: String,
        v_offset: String,
        exec_mode: u8,
        big_kernel: bool,
        dst: String,
    ) -> Result<()> {
        self.push(format!(
            "va_convolve smp{sampler} surf{surface} {u_offset} {v_offset} exec={exec_mode} big={big_kernel} {dst}"
        ))
    }

    fn append_va_erode_dilate(
        &mut self,
        erode: bool,
        sampler: u32,
        surface: u32,
        u_offset: String,
        v_offset: String,
        exec_mode: u8,
        dst: String,
    ) -> Result<()> {
        let name = if erode { "va_erode" } else { "va_dilate" };
        self.push(format!(
            "{name} smp{sampler} surf{surface} {u_offset} {v_offset} exec={exec_mode} {dst}"
        ))
    }

    fn append_va_plus(
        &mut self,
        sub: VaPlusSubOp,
        args: visa_bytecode::builder::VaPlusArgs<Self>,
    ) -> Result<()> {
        let samplers: Vec<String> = args.samplers.iter().map(|s| format!("smp{s}")).collect();
        let surfaces: Vec<String> = args.surfaces.iter().map(|s| format!("surf{s}")).collect();
        let scalars: Vec<String> = args.scalars.iter().map(|s| s.to_string()).collect();
        self.push(format!(
            "va_plus.{sub:?} [{}] [{}] [{}] [{}] [{}]{}",
            samplers.join(" "),
            surfaces.join(" "),
            args.vectors.join(" "),
            args.raw_srcs.join(" "),
            scalars.join(" "),
            opt_op(&args.dst)
        ))
    }

    fn append_lsc_fence(
        &mut self,
        emask: EMask,
        size: ExecSize,
        sfid: u8,
        fence_op: u8,
        scope: u8,
    ) -> Result<()> {
        self.push(format!(
            "lsc_fence {emask:?} {size:?} sfid={sfid} op={fence_op} scope={scope}"
        ))
    }

    fn append_lsc_untyped(
        &mut self,
        sub: LscSubOp,
        p: Option<Predication<Self>>,
        emask: EMask,
        size: ExecSize,
        args: LscUntypedArgs<Self>,
    ) -> Result<()> {
        self.push(format!(
            "lsc_untyped.{sub:?} {emask:?} {size:?}{} sfid={} l1={} l3={} at={} scale={} imm={} as={} {} {} {} {}{} {}{}",
            pred(&p),
            args.sfid,
            args.caching.l1,
            args.caching.l3,
            args.addr.addr_type,
            args.addr.imm_scale,
            args.addr.imm_offset,
            args.addr.size,
            shape(&args.shape),
            args.surface,
            args.dst,
            args.src0,
            opt_op(&args.src0_pitch),
            args.src1,
            opt_op(&args.src2)
        ))
    }

    fn append_lsc_untyped_block2d(
        &mut self,
        sub: LscSubOp,
        p: Option<Predication<Self>>,
        emask: EMask,
        size: ExecSize,
        args: LscBlock2dArgs<Self>,
    ) -> Result<()> {
        self.push(format!(
            "lsc_untyped_block2d.{sub:?} {emask:?} {size:?}{} sfid={} {}x{} blocks={} vnni={} {} [{}] {}",
            pred(&p),
            args.sfid,
            args.shape.width,
            args.shape.height,
            args.shape.blocks,
            args.shape.vnni,
            args.dst,
            args.addrs.join(" "),
            args.src1
        ))
    }

    fn append_lsc_append_counter(
        &mut self,
        sub: LscSubOp,
        p: Option<Predication<Self>>,
        emask: EMask,
        size: ExecSize,
        sfid: u8,
        caching: LscCaching,
        addr_type: u8,
        data_shape: LscDataShape,
        surface: String,
        surface_index: u32,
        dst: String,
        src: String,
    ) -> Result<()> {
        self.push(format!(
            "lsc_append_counter.{sub:?} {emask:?} {size:?}{} sfid={sfid} l1={} l3={} at={addr_type} {} {surface}:{surface_index} {dst} {src}",
            pred(&p),
            caching.l1,
            caching.l3,
            shape(&data_shape)
        ))
    }

    fn append_lsc_typed(
        &mut self,
        sub: LscSubOp,
        p: Option<Predication<Self>>,
        emask: EMask,
        size: ExecSize,
        args: LscTypedArgs<Self>,
    ) -> Result<()> {
        self.push(format!(
            "lsc_typed.{sub:?} {emask:?} {size:?}{} at={} as={} {} {}:{} {} {}+{} {}+{} {}+{} {} {} {}",
            pred(&p),
            args.addr_type,
            args.addr_size,
            shape(&args.shape),
            args.surface,
            args.surface_index,
            args.dst,
            args.u.0,
            args.u.1,
            args.v.0,
            args.v.1,
            args.r.0,
            args.r.1,
            args.lod,
            args.src1,
            args.src2
        ))
    }

    fn append_lsc_typed_block2d(
        &mut self,
        sub: LscSubOp,
        p: Option<Predication<Self>>,
        emask: EMask,
        size: ExecSize,
        args: LscTypedBlock2dArgs<Self>,
    ) -> Result<()> {
        self.push(format!(
            "lsc_typed_block2d.{sub:?} {emask:?} {size:?}{} at={} {}x{} {}:{} {} {} {} {}",
            pred(&p),
            args.addr_type,
            args.width,
            args.height,
            args.surface,
            args.surface_index,
            args.dst,
            args.x_offset,
            args.y_offset,
            args.src1
        ))
    }
}

fn sample3d(args: &Sample3dArgs<Recorder>) -> String {
    let sampler = match args.sampler {
        Some(s) => format!("smp{s} "),
        None => String::new(),
    };
    format!(
        "mask={:#x} {} {}surf{} {} paired={} [{}]",
        args.channel_mask,
        args.aoffimmi,
        sampler,
        args.surface,
        args.dst,
        args.paired_surface,
        args.params.join(" ")
    )
}

fn shape(s: &LscDataShape) -> String {
    format!("d{}.{}.{}.{:#x}", s.size, s.order, s.elems, s.chmask)
}
