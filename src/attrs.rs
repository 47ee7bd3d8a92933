//! Attribute decoding.
//!
//! Attributes annotate variables, inputs, and whole routines. Each is encoded
//! as a string-pool name index, a payload size byte, and a payload whose
//! interpretation is fixed by the attribute's registered kind. Names outside
//! the registry are fatal.

use crate::cursor::Cursor;
use crate::error::{DecodeError, Result};
use crate::version::Version;

/// Payload interpretation of a registered attribute.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AttrKind {
    /// Zero- or one-byte payload treated as a flag.
    Bool,
    /// Sign-extended integer of one, two, or four payload bytes.
    Int32,
    /// NUL-terminated byte string.
    String,
}

/// A decoded attribute value.
#[derive(Clone, Debug, PartialEq)]
pub enum AttrValue {
    /// Flag attribute; an empty payload means set.
    Bool(bool),
    /// Integer attribute, sign-extended from its encoded width.
    Int32(i32),
    /// String attribute.
    String(String),
}

/// A decoded attribute: resolved name plus value.
#[derive(Clone, Debug, PartialEq)]
pub struct Attribute {
    /// Attribute name, resolved through the routine's string pool.
    pub name: String,
    /// Decoded payload.
    pub value: AttrValue,
}

/// Looks up the payload kind for a registered attribute name.
pub fn attr_kind(name: &str) -> Option<AttrKind> {
    Some(match name {
        "Target" | "SLMSize" | "SpillMemOffset" | "SimdSize" | "ArgSize" | "RetValSize"
        | "PerThreadInputSize" | "CrossThreadInputSize" | "NBarrierCnt" | "Scope"
        | "SurfaceUsage" => AttrKind::Int32,
        "Input" | "Output" | "Input_Output" | "NoWidening" | "Extern" | "NoBarrier" => {
            AttrKind::Bool
        }
        "OutputAsmPath" | "Entry" | "Callable" => AttrKind::String,
        _ => return None,
    })
}

/// Reads one attribute record at the cursor.
pub fn read_attribute(
    cursor: &mut Cursor<'_>,
    version: Version,
    strings: &[String],
) -> Result<Attribute> {
    let name_index = cursor.var_index(version)?;
    let name = strings
        .get(name_index as usize)
        .ok_or(DecodeError::IndexOutOfRange {
            table: "string",
            index: name_index,
            len: strings.len(),
        })?
        .clone();

    let kind = attr_kind(&name).ok_or_else(|| DecodeError::UnknownAttribute { name: name.clone() })?;

    let size = cursor.u8()? as usize;
    let payload = cursor.take(size)?;

    let value = match kind {
        AttrKind::Bool => match size {
            0 => AttrValue::Bool(true),
            1 => AttrValue::Bool(payload[0] != 0),
            _ => {
                return Err(DecodeError::BadAttributeSize { name, size: size as u8 });
            }
        },
        AttrKind::Int32 => {
            let v = match size {
                0 => 1,
                1 => i32::from(payload[0] as i8),
                2 => i32::from(i16::from_le_bytes([payload[0], payload[1]])),
                4 => i32::from_le_bytes([payload[0], payload[1], payload[2], payload[3]]),
                _ => {
                    return Err(DecodeError::BadAttributeSize { name, size: size as u8 });
                }
            };
            AttrValue::Int32(v)
        }
        AttrKind::String => {
            let end = payload.iter().position(|&b| b == 0).unwrap_or(size);
            AttrValue::String(String::from_utf8_lossy(&payload[..end]).into_owned())
        }
    };

    Ok(Attribute { name, value })
}

/// Reads `count` attribute records.
pub fn read_attributes(
    cursor: &mut Cursor<'_>,
    version: Version,
    strings: &[String],
    count: usize,
) -> Result<Vec<Attribute>> {
    let mut attrs = Vec::with_capacity(count);
    for _ in 0..count {
        attrs.push(read_attribute(cursor, version, strings)?);
    }
    Ok(attrs)
}
