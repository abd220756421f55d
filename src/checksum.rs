//! Single-byte XOR integrity check.
//!
//! The instrument appends one byte chosen so that the XOR of the timestamp,
//! spectral, system and checksum groups (551 bytes) is zero.  The 5-byte
//! reserved header is not covered.

use crate::error::DecodeError;
use crate::record::RawRecord;

/// XOR-reduce every byte of every group, in order.
pub fn xor_reduce<'a, I>(groups: I) -> u8
where
    I: IntoIterator<Item = &'a [u8]>,
{
    groups
        .into_iter()
        .flat_map(|g| g.iter())
        .fold(0u8, |acc, b| acc ^ b)
}

/// Residue of the covered span; zero for an intact record.
pub fn residue(record: &RawRecord) -> u8 {
    xor_reduce(record.payload_groups())
}

/// Accept the record iff its payload reduces to zero.
pub fn validate(record: &RawRecord) -> Result<(), DecodeError> {
    match residue(record) {
        0       => Ok(()),
        residue => Err(DecodeError::ChecksumMismatch { residue }),
    }
}
