use crate::isa::{LabelKind, VisaType, MAGIC};
use crate::version::Version;

/// A little-endian byte-stream writer mirroring the widths the decoder reads.
///
/// Version-dependent fields (`var_index`, `input_count`, `name`) encode at the
/// width the given version decodes them, so the same test can be run across
/// version boundaries by changing only the version passed here.
pub struct Writer {
    version: Version,
    bytes: Vec<u8>,
}

impl Writer {
    /// Creates an empty writer targeting `version`.
    pub fn new(version: Version) -> Self {
        Self {
            version,
            bytes: Vec::new(),
        }
    }

    /// Appends a byte.
    pub fn u8(&mut self, value: u8) -> &mut Self {
        self.bytes.push(value);
        self
    }

    /// Appends a little-endian `u16`.
    pub fn u16(&mut self, value: u16) -> &mut Self {
        self.bytes.extend_from_slice(&value.to_le_bytes());
        self
    }

    /// Appends a little-endian `u32`.
    pub fn u32(&mut self, value: u32) -> &mut Self {
        self.bytes.extend_from_slice(&value.to_le_bytes());
        self
    }

    /// Appends a little-endian `u64`.
    pub fn u64(&mut self, value: u64) -> &mut Self {
        self.bytes.extend_from_slice(&value.to_le_bytes());
        self
    }

    /// Appends a little-endian `i16`.
    pub fn i16(&mut self, value: i16) -> &mut Self {
        self.bytes.extend_from_slice(&value.to_le_bytes());
        self
    }

    /// Appends a little-endian `i32`.
    pub fn i32(&mut self, value: i32) -> &mut Self {
        self.bytes.extend_from_slice(&value.to_le_bytes());
        self
    }

    /// Appends raw bytes.
    pub fn bytes(&mut self, data: &[u8]) -> &mut Self {
        self.bytes.extend_from_slice(data);
        self
    }

    /// Appends a variable index at this version's width.
    pub fn var_index(&mut self, value: u32) -> &mut Self {
        if self.version.wide_indices() {
            self.u32(value)
        } else {
            self.u16(value as u16)
        }
    }

    /// Appends an input count at this version's width.
    pub fn input_count(&mut self, value: u32) -> &mut Self {
        if self.version.wide_input_count() {
            self.u32(value)
        } else {
            self.u8(value as u8)
        }
    }

    /// Appends a length-prefixed name at this version's width.
    pub fn name(&mut self, name: &str) -> &mut Self {
        if self.version.wide_name_length() {
            self.u16(name.len() as u16);
        } else {
            self.u8(name.len() as u8);
        }
        self.bytes(name.as_bytes())
    }

    /// Appends a NUL-terminated string-pool entry.
    pub fn cstr(&mut self, value: &str) -> &mut Self {
        self.bytes(value.as_bytes()).u8(0)
    }

    /// Appends a general vector operand with the given tag modifier bits.
    pub fn general_operand(
        &mut self,
        modifier: u8,
        index: u32,
        row: u8,
        col: u8,
        region: u16,
    ) -> &mut Self {
        self.u8(modifier << 3); // class 0 = general
        self.var_index(index);
        self.u8(row).u8(col).u16(region)
    }

    /// Appends an immediate vector operand with a 32-bit payload.
    pub fn immediate_u32(&mut self, ty: VisaType, bits: u32) -> &mut Self {
        self.u8(0x05); // class 5 = immediate, no modifier
        self.u8(ty as u8).u32(bits)
    }

    /// Appends a raw operand.
    pub fn raw_operand(&mut self, index: u32, offset: u16) -> &mut Self {
        self.var_index(index);
        self.u16(offset)
    }

    /// Current length.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether anything has been written.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Consumes the writer.
    pub fn into_vec(self) -> Vec<u8> {
        self.bytes
    }
}

/// Builds a routine body: a declaration section followed by its code.
///
/// Tables not touched through the `declare_*` methods encode as empty, which
/// is valid; the decoder still seeds the predefined slots. `finish` lays the
/// instruction bytes directly after the declaration section and points
/// `code_entry` at them.
pub struct RoutineWriter {
    version: Version,
    is_kernel: bool,
    strings: Vec<String>,
    general_count: u32,
    generals: Writer,
    address_count: u16,
    addresses: Writer,
    predicate_count: u16,
    predicates: Writer,
    label_count: u16,
    labels: Writer,
    sampler_count: u8,
    samplers: Writer,
    surface_count: u8,
    surfaces: Writer,
    input_count: u32,
    inputs: Writer,
    frame_sizes: (u8, u8),
    attr_count: u16,
    attrs: Writer,
}

impl RoutineWriter {
    /// Creates a routine writer for a kernel body.
    pub fn kernel(version: Version) -> Self {
        Self::new(version, true)
    }

    /// Creates a routine writer for a function body.
    pub fn function(version: Version) -> Self {
        Self::new(version, false)
    }

    fn new(version: Version, is_kernel: bool) -> Self {
        Self {
            version,
            is_kernel,
            strings: vec![String::new()],
            general_count: 0,
            generals: Writer::new(version),
            address_count: 0,
            addresses: Writer::new(version),
            predicate_count: 0,
            predicates: Writer::new(version),
            label_count: 0,
            labels: Writer::new(version),
            sampler_count: 0,
            samplers: Writer::new(version),
            surface_count: 0,
            surfaces: Writer::new(version),
            input_count: 0,
            inputs: Writer::new(version),
            frame_sizes: (0, 0),
            attr_count: 0,
            attrs: Writer::new(version),
        }
    }

    /// Interns a string, returning its pool index.
    pub fn string(&mut self, value: &str) -> u32 {
        if let Some(i) = self.strings.iter().position(|s| s == value) {
            return i as u32;
        }
        self.strings.push(value.to_owned());
        (self.strings.len() - 1) as u32
    }

    /// Declares a general variable; returns its table index (predefined slots
    /// come first).
    pub fn general(&mut self, name: &str, ty: VisaType, align: u8, num_elements: u16) -> u32 {
        self.general_with_alias(name, ty, align, num_elements, 0, 0)
    }

    /// Declares a general variable aliasing an earlier table index.
    pub fn general_with_alias(
        &mut self,
        name: &str,
        ty: VisaType,
        align: u8,
        num_elements: u16,
        alias_index: u32,
        alias_offset: u16,
    ) -> u32 {
        let name_index = self.string(name);
        self.generals.var_index(name_index);
        self.generals.u8((ty as u8) | (align << 4));
        self.generals.u16(num_elements);
        self.generals.var_index(alias_index);
        self.generals.u16(alias_offset);
        self.generals.u8(0); // alias scope, must be zero
        self.generals.u8(0); // attribute count
        let index = 32 + self.general_count;
        self.general_count += 1;
        index
    }

    /// Declares an address variable; returns its table index.
    pub fn address(&mut self, name: &str, num_elements: u16) -> u32 {
        let name_index = self.string(name);
        self.addresses.var_index(name_index);
        self.addresses.u16(num_elements);
        self.addresses.u8(0);
        let index = u32::from(self.address_count);
        self.address_count += 1;
        index
    }

    /// Declares a predicate variable; returns its slot (slot 0 is reserved).
    pub fn predicate(&mut self, name: &str, num_elements: u16) -> u32 {
        let name_index = self.string(name);
        self.predicates.var_index(name_index);
        self.predicates.u16(num_elements);
        self.predicates.u8(0);
        self.predicate_count += 1;
        u32::from(self.predicate_count)
    }

    /// Declares a label; returns its table index.
    pub fn label(&mut self, name: &str, kind: LabelKind) -> u32 {
        let name_index = self.string(name);
        self.labels.var_index(name_index);
        self.labels.u8(kind as u8);
        self.labels.u8(0);
        let index = u32::from(self.label_count);
        self.label_count += 1;
        index
    }

    /// Declares a sampler; returns its slot.
    pub fn sampler(&mut self, name: &str, num_elements: u16) -> u32 {
        let name_index = self.string(name);
        self.samplers.var_index(name_index);
        self.samplers.u16(num_elements);
        self.samplers.u8(0);
        let slot = u32::from(self.sampler_count);
        self.sampler_count += 1;
        slot
    }

    /// Declares a surface; returns its table index (predefined slots first).
    /// A non-zero `usage` encodes a `SurfaceUsage` attribute.
    pub fn surface(&mut self, name: &str, num_elements: u16, usage: i32) -> u32 {
        let name_index = self.string(name);
        let usage_name = if usage != 0 {
            Some(self.string("SurfaceUsage"))
        } else {
            None
        };
        self.surfaces.var_index(name_index);
        self.surfaces.u16(num_elements);
        match usage_name {
            Some(attr_name) => {
                self.surfaces.u8(1);
                self.surfaces.var_index(attr_name);
                self.surfaces.u8(4);
                self.surfaces.i32(usage);
            }
            None => {
                self.surfaces.u8(0);
            }
        }
        let index = 6 + u32::from(self.surface_count);
        self.surface_count += 1;
        index
    }

    /// Registers a kernel input binding over a general variable.
    pub fn input_general(&mut self, var_index: u32, offset: i16, size: u16) {
        self.inputs.u8(0); // class general, explicit
        self.inputs.var_index(var_index);
        self.inputs.i16(offset);
        self.inputs.u16(size);
        self.input_count += 1;
    }

    /// Sets the function frame sizes (encoded only for functions).
    pub fn frame_sizes(&mut self, input_size: u8, return_size: u8) {
        self.frame_sizes = (input_size, return_size);
    }

    /// Adds a routine attribute with a 32-bit payload.
    pub fn attr_int32(&mut self, name: &str, value: i32) {
        let name_index = self.string(name);
        self.attrs.var_index(name_index);
        self.attrs.u8(4);
        self.attrs.i32(value);
        self.attr_count += 1;
    }

    /// Encodes the declaration section and appends `code` after it.
    pub fn finish(self, code: &[u8]) -> Vec<u8> {
        let mut w = Writer::new(self.version);
        w.var_index(self.strings.len() as u32);
        for s in &self.strings {
            w.cstr(s);
        }
        w.var_index(0); // routine name index
        w.var_index(self.general_count);
        w.bytes(&self.generals.into_vec());
        w.u16(self.address_count);
        w.bytes(&self.addresses.into_vec());
        w.u16(self.predicate_count);
        w.bytes(&self.predicates.into_vec());
        w.u16(self.label_count);
        w.bytes(&self.labels.into_vec());
        w.u8(self.sampler_count);
        w.bytes(&self.samplers.into_vec());
        w.u8(self.surface_count);
        w.bytes(&self.surfaces.into_vec());
        w.u8(0); // vme count, must be zero
        if self.is_kernel {
            w.input_count(self.input_count);
            w.bytes(&self.inputs.into_vec());
        }

        let attr_bytes = self.attrs.into_vec();
        let tail = 2 + attr_bytes.len() + if self.is_kernel { 0 } else { 2 };
        let code_entry = (w.len() + 8 + tail) as u32;
        w.u32(code.len() as u32);
        w.u32(code_entry);
        if !self.is_kernel {
            w.u8(self.frame_sizes.0).u8(self.frame_sizes.1);
        }
        w.u16(self.attr_count);
        w.bytes(&attr_bytes);
        w.bytes(code);
        w.into_vec()
    }
}

/// Builds a container holding the provided kernel and function bodies.
///
/// The header gets a valid magic, the requested version, correct offsets and
/// sizes for every routine window, zeroed relocation counts, and no generated
/// binaries.
pub fn build_container(
    version: Version,
    kernels: &[(&str, &[u8])],
    functions: &[(&str, &[u8])],
) -> Vec<u8> {
    let mut w = Writer::new(version);
    w.u32(MAGIC);
    w.u8(version.major).u8(version.minor);

    // Header size must be known before routine offsets can be filled in, so
    // lay the header out twice: once to measure, once for real.
    let name_len = |name: &str| {
        if version.wide_name_length() {
            2 + name.len()
        } else {
            1 + name.len()
        }
    };
    let mut header_size = 4 + 2 + 2; // magic, version, kernel count
    for (name, _) in kernels {
        header_size += name_len(name) + 4 + 4 + 4 + 2 + 2 + 1;
    }
    header_size += 2 + 2; // file-scope count, function count
    for (name, _) in functions {
        header_size += 1 + name_len(name) + 4 + 4 + 2 + 2;
    }

    let mut offset = header_size as u32;
    w.u16(kernels.len() as u16);
    for (name, body) in kernels {
        w.name(name);
        w.u32(offset);
        w.u32(body.len() as u32);
        w.u32(0); // input offset
        w.u16(0); // variable relocations
        w.u16(0); // function relocations
        w.u8(0); // generated binaries
        offset += body.len() as u32;
    }
    w.u16(0); // file-scope variables
    w.u16(functions.len() as u16);
    for (name, body) in functions {
        w.u8(0); // linkage
        w.name(name);
        w.u32(offset);
        w.u32(body.len() as u32);
        w.u16(0);
        w.u16(0);
        offset += body.len() as u32;
    }

    debug_assert_eq!(w.len(), header_size);
    for (_, body) in kernels {
        w.bytes(body);
    }
    for (_, body) in functions {
        w.bytes(body);
    }
    w.into_vec()
}
