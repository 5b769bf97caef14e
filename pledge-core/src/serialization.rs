//! Serialization support.
//!
//! All variable-size artifacts of the promise protocol share one wire vocabulary: little-endian
//! `u32` length prefixes followed by fixed-length canonical encodings of group elements and
//! scalars. Buffer decoding goes through [`ByteReader`], which fails with
//! [`Error::BufferTooSmall`] rather than reading past the input; stream decoding reads the
//! minimum prefix needed to size the artifact, then reads the remainder with read-full
//! semantics.

use std::io::{self, Read};

use byteorder::{ByteOrder, LittleEndian};

use crate::{Ciphersuite, Element, Error, Field, FieldError, Group, GroupError};

/// Number of bytes in the little-endian `u32` length prefix.
pub(crate) const PREFIX_SIZE: usize = 4;

/// Helper struct to serialize a Scalar.
#[derive(Clone, Copy, PartialEq, Eq)]
pub(crate) struct SerializableScalar<C: Ciphersuite>(
    pub <<<C as Ciphersuite>::Group as Group>::Field as Field>::Scalar,
);

impl<C> SerializableScalar<C>
where
    C: Ciphersuite,
{
    /// Serialize a Scalar.
    pub fn serialize(&self) -> Vec<u8> {
        <<C::Group as Group>::Field>::serialize(&self.0)
            .as_ref()
            .to_vec()
    }

    /// Deserialize a Scalar from a serialized buffer.
    pub fn deserialize(bytes: &[u8]) -> Result<Self, Error> {
        let serialized: <<C::Group as Group>::Field as Field>::Serialization = bytes
            .to_vec()
            .try_into()
            .map_err(|_| FieldError::MalformedScalar)?;
        let scalar = <<C::Group as Group>::Field>::deserialize(&serialized)?;
        Ok(Self(scalar))
    }
}

/// Helper struct to serialize a group Element.
#[derive(Clone, Copy, PartialEq, Eq)]
pub(crate) struct SerializableElement<C: Ciphersuite>(pub(crate) Element<C>);

impl<C> SerializableElement<C>
where
    C: Ciphersuite,
{
    /// Serialize an Element. Returns an error if it's the identity.
    pub fn serialize(&self) -> Result<Vec<u8>, Error> {
        Ok(<C::Group as Group>::serialize(&self.0)?.as_ref().to_vec())
    }

    /// Deserialize an Element. Returns an error if it's malformed or is the identity.
    pub fn deserialize(bytes: &[u8]) -> Result<Self, Error> {
        let serialized: <C::Group as Group>::Serialization = bytes
            .to_vec()
            .try_into()
            .map_err(|_| GroupError::MalformedElement)?;
        let element = <C::Group as Group>::deserialize(&serialized)?;
        Ok(Self(element))
    }
}

/// The encoded length of a scalar of the suite, probed from the zero scalar.
pub(crate) fn scalar_size<C: Ciphersuite>() -> usize {
    <<C::Group as Group>::Field>::serialize(&<<C::Group as Group>::Field>::zero())
        .as_ref()
        .len()
}

/// The encoded length of a group element of the suite.
///
/// Probed by encoding the generator; the identity cannot be used since it does not serialize.
pub(crate) fn element_size<C: Ciphersuite>() -> usize {
    <C::Group>::serialize(&<C::Group>::generator())
        .expect("serializing the generator always works")
        .as_ref()
        .len()
}

/// Appends a little-endian `u32` length prefix to the output buffer.
pub(crate) fn write_u32(out: &mut Vec<u8>, value: u32) {
    let mut buf = [0u8; PREFIX_SIZE];
    LittleEndian::write_u32(&mut buf, value);
    out.extend_from_slice(&buf);
}

/// Cursor over a byte slice providing structured reads.
///
/// Every read checks the remaining length first, so decoding truncated input surfaces
/// [`Error::BufferTooSmall`] instead of panicking.
pub(crate) struct ByteReader<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl<'a> ByteReader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, offset: 0 }
    }

    /// Reads exactly `len` bytes from the cursor.
    pub fn read_exact(&mut self, len: usize) -> Result<&'a [u8], Error> {
        if self.bytes.len().saturating_sub(self.offset) < len {
            return Err(Error::BufferTooSmall);
        }
        let start = self.offset;
        self.offset += len;
        Ok(&self.bytes[start..start + len])
    }

    /// Reads a little-endian `u32` length prefix.
    pub fn read_u32(&mut self) -> Result<u32, Error> {
        Ok(LittleEndian::read_u32(self.read_exact(PREFIX_SIZE)?))
    }

    /// Reads a little-endian `u32` that must fit the protocol's `u16` participant bound.
    pub fn read_count(&mut self) -> Result<u16, Error> {
        u16::try_from(self.read_u32()?).map_err(|_| Error::DeserializationError)
    }
}

/// Reads exactly `len` bytes from a stream into a fresh buffer; short reads are errors.
pub(crate) fn read_exact_vec<R: Read>(reader: &mut R, len: usize) -> io::Result<Vec<u8>> {
    let mut buf = vec![0u8; len];
    reader.read_exact(&mut buf)?;
    Ok(buf)
}

/// Wraps a codec error for surfacing through the stream entry points.
pub(crate) fn invalid_data(err: Error) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, err)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    #[test]
    fn read_u32_is_little_endian() {
        let mut reader = ByteReader::new(&[0x01, 0x02, 0x03, 0x04, 0xff]);
        assert_eq!(reader.read_u32().unwrap(), 0x0403_0201);
        assert_eq!(reader.read_exact(1).unwrap(), &[0xff]);
    }

    #[test]
    fn write_u32_round_trips() {
        let mut out = Vec::new();
        write_u32(&mut out, 0xdead_beef);
        let mut reader = ByteReader::new(&out);
        assert_eq!(reader.read_u32().unwrap(), 0xdead_beef);
    }

    #[test]
    fn short_buffers_error() {
        let mut reader = ByteReader::new(&[0x01, 0x02]);
        assert_eq!(reader.read_u32().unwrap_err(), Error::BufferTooSmall);
        // A failed read consumes nothing
        assert_eq!(reader.read_exact(2).unwrap(), &[0x01, 0x02]);
        assert_eq!(reader.read_exact(1).unwrap_err(), Error::BufferTooSmall);
    }

    #[test]
    fn read_count_rejects_oversized_values() {
        let mut out = Vec::new();
        write_u32(&mut out, u32::from(u16::MAX));
        assert_eq!(ByteReader::new(&out).read_count().unwrap(), u16::MAX);

        let mut out = Vec::new();
        write_u32(&mut out, u32::from(u16::MAX) + 1);
        assert_eq!(
            ByteReader::new(&out).read_count().unwrap_err(),
            Error::DeserializationError
        );
    }

    #[test]
    fn stream_reads_are_read_full() {
        let mut cursor = Cursor::new(vec![0u8; 3]);
        let err = read_exact_vec(&mut cursor, 4).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);

        let mut cursor = Cursor::new(vec![7u8; 4]);
        assert_eq!(read_exact_vec(&mut cursor, 4).unwrap(), vec![7u8; 4]);
    }
}
