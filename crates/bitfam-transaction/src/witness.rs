//! Witness stack wire encoding.
//!
//! A stack is `VarInt(item count)` followed by each item as
//! `VarInt(len) || bytes`. An empty stack is the single byte `0x00`, the
//! placeholder written for inputs that spend non-witness scripts.

use bitfam_primitives::util::{VarInt, WireReader, WireWriter};

use crate::TransactionError;

/// Read one witness stack.
pub fn read_stack(reader: &mut WireReader) -> Result<Vec<Vec<u8>>, TransactionError> {
    let count = reader.read_varint().map_err(|e| {
        TransactionError::SerializationError(format!("reading witness item count: {}", e))
    })?;

    let mut items = Vec::new();
    for _ in 0..count.value() {
        let item = reader.read_var_bytes().map_err(|e| {
            TransactionError::SerializationError(format!("reading witness item: {}", e))
        })?;
        items.push(item.to_vec());
    }
    Ok(items)
}

/// Write one witness stack.
pub fn write_stack(writer: &mut WireWriter, items: &[Vec<u8>]) {
    writer.write_varint(VarInt::from(items.len()));
    for item in items {
        writer.write_var_bytes(item);
    }
}

/// Encoded length of a witness stack in bytes.
pub fn stack_size(items: &[Vec<u8>]) -> usize {
    VarInt::from(items.len()).length()
        + items
            .iter()
            .map(|item| VarInt::from(item.len()).length() + item.len())
            .sum::<usize>()
}
