//! Script element parsing and push encoding.
//!
//! A script element is an opcode byte together with the bytes it pushes
//! (empty for non-push opcodes). Elements are only produced by parsing;
//! scripts are built by appending to the raw byte form.
//!
//! Length fields of `OP_PUSHDATA2` and `OP_PUSHDATA4` are read and written
//! big-endian. Parsing and encoding agree, so a script built here always
//! parses back to the same elements.

use crate::opcodes::*;
use crate::ScriptError;

/// A single parsed element of a script.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScriptElement {
    opcode: u8,
    data: Vec<u8>,
}

impl ScriptElement {
    /// The opcode byte. For direct pushes (1-75 bytes) this is the length.
    pub fn opcode(&self) -> u8 {
        self.opcode
    }

    /// The pushed bytes, empty for non-push opcodes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// True if the opcode pushes data (direct push or OP_PUSHDATA1/2/4).
    pub fn is_push(&self) -> bool {
        (OP_DATA_1..=OP_PUSHDATA4).contains(&self.opcode)
    }

    /// Render as an ASM token: pushes as hex, everything else by name.
    pub fn to_asm_string(&self) -> String {
        if self.is_push() {
            hex::encode(&self.data)
        } else {
            opcode_to_string(self.opcode).to_string()
        }
    }

    /// Append the wire form of this element, keeping its original opcode.
    pub(crate) fn write_to(&self, out: &mut Vec<u8>) {
        out.push(self.opcode);
        match self.opcode {
            OP_PUSHDATA1 => out.push(self.data.len() as u8),
            OP_PUSHDATA2 => out.extend_from_slice(&(self.data.len() as u16).to_be_bytes()),
            OP_PUSHDATA4 => out.extend_from_slice(&(self.data.len() as u32).to_be_bytes()),
            _ => {}
        }
        out.extend_from_slice(&self.data);
    }
}

/// Decode raw script bytes into elements.
///
/// # Arguments
/// * `bytes` - The raw script bytes to decode.
///
/// # Returns
/// The parsed elements, or `ScriptError::Parse` if a length field or its
/// payload runs past the end of the buffer.
pub fn decode_script(bytes: &[u8]) -> Result<Vec<ScriptElement>, ScriptError> {
    let mut elements = Vec::new();
    let mut pos = 0;

    while pos < bytes.len() {
        let opcode = bytes[pos];
        pos += 1;

        let length = match opcode {
            OP_DATA_1..=OP_DATA_75 => opcode as usize,
            OP_PUSHDATA1 => read_length::<1>(bytes, &mut pos, opcode)?,
            OP_PUSHDATA2 => read_length::<2>(bytes, &mut pos, opcode)?,
            OP_PUSHDATA4 => read_length::<4>(bytes, &mut pos, opcode)?,
            _ => 0,
        };

        let end = pos
            .checked_add(length)
            .filter(|&end| end <= bytes.len())
            .ok_or_else(|| {
                ScriptError::Parse(format!(
                    "push of {} bytes at offset {} exceeds script length {}",
                    length,
                    pos - 1,
                    bytes.len()
                ))
            })?;

        elements.push(ScriptElement {
            opcode,
            data: bytes[pos..end].to_vec(),
        });
        pos = end;
    }

    Ok(elements)
}

/// Read an N-byte big-endian length field.
fn read_length<const N: usize>(bytes: &[u8], pos: &mut usize, opcode: u8) -> Result<usize, ScriptError> {
    let field = bytes.get(*pos..*pos + N).ok_or_else(|| {
        ScriptError::Parse(format!(
            "{} at offset {} is missing its length field",
            opcode_to_string(opcode),
            *pos - 1
        ))
    })?;
    *pos += N;
    Ok(field.iter().fold(0usize, |acc, &b| (acc << 8) | b as usize))
}

/// Compute the push prefix for a payload of the given length.
///
/// Uses the smallest form: a direct push up to 75 bytes, then
/// OP_PUSHDATA1, OP_PUSHDATA2 and OP_PUSHDATA4.
///
/// # Returns
/// The prefix bytes, or `DataTooBig` past `u32::MAX`.
pub fn push_data_prefix(data_len: usize) -> Result<Vec<u8>, ScriptError> {
    if data_len <= OP_DATA_75 as usize {
        Ok(vec![data_len as u8])
    } else if data_len <= 0xff {
        Ok(vec![OP_PUSHDATA1, data_len as u8])
    } else if data_len <= 0xffff {
        let mut buf = vec![OP_PUSHDATA2];
        buf.extend_from_slice(&(data_len as u16).to_be_bytes());
        Ok(buf)
    } else if data_len as u64 <= u32::MAX as u64 {
        let mut buf = vec![OP_PUSHDATA4];
        buf.extend_from_slice(&(data_len as u32).to_be_bytes());
        Ok(buf)
    } else {
        Err(ScriptError::DataTooBig(data_len))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_script_simple() {
        let bytes = hex::decode("05000102030401ff02abcd").unwrap();
        let elements = decode_script(&bytes).unwrap();
        assert_eq!(elements.len(), 3);
        assert_eq!(elements[0].data(), &[0x00, 0x01, 0x02, 0x03, 0x04]);
        assert_eq!(elements[1].data(), &[0xff]);
        assert_eq!(elements[2].opcode(), 0x02);
    }

    #[test]
    fn test_decode_script_empty() {
        assert!(decode_script(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_decode_p2pkh() {
        let bytes = hex::decode("76a914e2a623699e81b291c0327f408fea765d534baa2a88ac").unwrap();
        let elements = decode_script(&bytes).unwrap();
        let ops: Vec<u8> = elements.iter().map(|e| e.opcode()).collect();
        assert_eq!(ops, vec![OP_DUP, OP_HASH160, OP_DATA_20, OP_EQUALVERIFY, OP_CHECKSIG]);
        assert!(elements[0].data().is_empty());
        assert_eq!(hex::encode(elements[2].data()), "e2a623699e81b291c0327f408fea765d534baa2a");
    }

    #[test]
    fn test_decode_script_truncated_push() {
        // 0x05 announces five bytes but only three follow
        let bytes = hex::decode("05000000").unwrap();
        assert!(matches!(decode_script(&bytes), Err(ScriptError::Parse(_))));
    }

    #[test]
    fn test_decode_pushdata1() {
        let data = b"testing";
        let mut script_bytes = vec![OP_PUSHDATA1, data.len() as u8];
        script_bytes.extend_from_slice(data);
        let elements = decode_script(&script_bytes).unwrap();
        assert_eq!(elements.len(), 1);
        assert_eq!(elements[0].opcode(), OP_PUSHDATA1);
        assert_eq!(elements[0].data(), data);

        assert!(decode_script(&hex::decode("4c05000000").unwrap()).is_err());
        assert!(decode_script(&[OP_PUSHDATA1]).is_err());
    }

    #[test]
    fn test_decode_pushdata2_is_big_endian() {
        let mut script_bytes = vec![OP_PUSHDATA2, 0x01, 0x00];
        script_bytes.extend_from_slice(&[0xaa; 256]);
        let elements = decode_script(&script_bytes).unwrap();
        assert_eq!(elements.len(), 1);
        assert_eq!(elements[0].data().len(), 256);

        // only one length byte present
        assert!(decode_script(&[OP_PUSHDATA2, 0x01]).is_err());
    }

    #[test]
    fn test_decode_pushdata4_is_big_endian() {
        let mut script_bytes = vec![OP_PUSHDATA4, 0x00, 0x00, 0x00, 0x03];
        script_bytes.extend_from_slice(&[1, 2, 3]);
        let elements = decode_script(&script_bytes).unwrap();
        assert_eq!(elements[0].data(), &[1, 2, 3]);

        assert!(decode_script(&[OP_PUSHDATA4, 0x00, 0x00]).is_err());
        assert!(decode_script(&[OP_PUSHDATA4, 0xff, 0xff, 0xff, 0xff, 0x00]).is_err());
    }

    #[test]
    fn test_push_data_prefix_boundaries() {
        assert_eq!(push_data_prefix(20).unwrap(), vec![20u8]);
        assert_eq!(push_data_prefix(75).unwrap(), vec![75u8]);
        assert_eq!(push_data_prefix(76).unwrap(), vec![OP_PUSHDATA1, 76]);
        assert_eq!(push_data_prefix(255).unwrap(), vec![OP_PUSHDATA1, 255]);
        assert_eq!(push_data_prefix(256).unwrap(), vec![OP_PUSHDATA2, 0x01, 0x00]);
        assert_eq!(push_data_prefix(65535).unwrap(), vec![OP_PUSHDATA2, 0xff, 0xff]);
        assert_eq!(push_data_prefix(65536).unwrap(), vec![OP_PUSHDATA4, 0x00, 0x01, 0x00, 0x00]);
    }

    #[test]
    fn test_write_to_reproduces_bytes() {
        let mut original = vec![OP_DUP, OP_PUSHDATA1, 0x02, 0xab, 0xcd, OP_PUSHDATA2, 0x00, 0x01, 0xee];
        original.extend_from_slice(&[0x03, 1, 2, 3]);
        let mut out = Vec::new();
        for element in decode_script(&original).unwrap() {
            element.write_to(&mut out);
        }
        assert_eq!(out, original);
    }

    #[test]
    fn test_element_asm() {
        let elements = decode_script(&hex::decode("14abababababababababababababababababababab76").unwrap()).unwrap();
        assert_eq!(elements[0].to_asm_string(), "ab".repeat(20));
        assert_eq!(elements[1].to_asm_string(), "OP_DUP");
    }
}
