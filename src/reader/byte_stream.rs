//! Provides functionality to read primitives from a recording byte stream.

use crate::{Error, Result};
use std::io::{self, Read, Seek, SeekFrom};

const STRING_ENCODING_NULL: i8 = 0;
const STRING_ENCODING_EMPTY_STRING: i8 = 1;
const STRING_ENCODING_UTF8_BYTE_ARRAY: i8 = 3;

#[derive(Debug, Eq, PartialEq)]
pub enum StringType {
    Null,
    Empty,
    Raw(String),
}

#[macro_use]
mod macros {
    macro_rules! read_num {
        ($self:ident, $ty:ty) => {
            return $self.read_exact().map(<$ty>::from_be_bytes)
        };
    }
}

pub struct ByteStream<T> {
    inner: T,
}

impl<T: Read> ByteStream<T> {
    pub fn new(inner: T) -> Self {
        Self { inner }
    }

    pub fn read_exact<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut buf = [0; N];
        self.inner.read_exact(&mut buf)?;
        Ok(buf)
    }

    /// Reads exactly `size` bytes, growing the buffer only as data arrives.
    pub fn read_to_vec(&mut self, size: u64) -> Result<Vec<u8>> {
        let mut buf = vec![];
        (&mut self.inner).take(size).read_to_end(&mut buf)?;
        if (buf.len() as u64) < size {
            return Err(io::Error::from(io::ErrorKind::UnexpectedEof).into());
        }
        Ok(buf)
    }

    pub fn read_i8(&mut self) -> Result<i8> {
        read_num!(self, i8);
    }

    pub fn read_i16(&mut self) -> Result<i16> {
        read_num!(self, i16);
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        read_num!(self, i32);
    }

    pub fn read_i64(&mut self) -> Result<i64> {
        read_num!(self, i64);
    }

    pub fn read_string(&mut self) -> Result<StringType> {
        let encoding = self.read_i8()?;
        if encoding == STRING_ENCODING_NULL {
            return Ok(StringType::Null);
        }
        if encoding == STRING_ENCODING_EMPTY_STRING {
            return Ok(StringType::Empty);
        }
        if encoding != STRING_ENCODING_UTF8_BYTE_ARRAY {
            return Err(Error::InvalidString);
        }

        let size = usize::try_from(self.read_i32()?).map_err(|_| Error::InvalidString)?;
        let buf = self.read_to_vec(size as u64)?;
        String::from_utf8(buf)
            .map(StringType::Raw)
            .map_err(|_| Error::InvalidString)
    }

    /// Reads a string that must be present, mapping empty to `""`.
    pub fn read_non_null_string(&mut self) -> Result<String> {
        match self.read_string()? {
            StringType::Null => Err(Error::InvalidString),
            StringType::Empty => Ok(String::new()),
            StringType::Raw(s) => Ok(s),
        }
    }
}

impl<T: Read + Seek> ByteStream<T> {
    pub fn seek(&mut self, position: u64) -> Result<()> {
        self.inner.seek(SeekFrom::Start(position))?;
        Ok(())
    }

    pub fn position(&mut self) -> Result<u64> {
        Ok(self.inner.stream_position()?)
    }

    /// Total length of the stream; the position is left unchanged.
    pub fn stream_len(&mut self) -> Result<u64> {
        let position = self.inner.stream_position()?;
        let len = self.inner.seek(SeekFrom::End(0))?;
        self.inner.seek(SeekFrom::Start(position))?;
        Ok(len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_read_i64() {
        let bytes = [0u8, 0, 0, 0, 0, 0, 0xd8, 0x05];
        let mut s = ByteStream::new(Cursor::new(bytes));
        assert_eq!(55301, s.read_i64().unwrap());
    }

    #[test]
    fn test_read_string_null() {
        let bytes = [STRING_ENCODING_NULL as u8];
        let mut s = ByteStream::new(Cursor::new(bytes));
        assert_eq!(StringType::Null, s.read_string().unwrap());
    }

    #[test]
    fn test_read_string_empty() {
        let bytes = [STRING_ENCODING_EMPTY_STRING as u8];
        let mut s = ByteStream::new(Cursor::new(bytes));
        assert_eq!(StringType::Empty, s.read_string().unwrap());
    }

    #[test]
    fn test_read_string_utf8() {
        let mut bytes = vec![STRING_ENCODING_UTF8_BYTE_ARRAY as u8, 0, 0, 0, 11];
        bytes.extend_from_slice("hello,world".as_bytes());
        let mut s = ByteStream::new(Cursor::new(bytes));
        assert_eq!(
            StringType::Raw("hello,world".to_string()),
            s.read_string().unwrap()
        );
    }

    #[test]
    fn test_read_string_unknown_encoding() {
        // constant pool references are not part of this format
        let bytes = [2u8, 0];
        let mut s = ByteStream::new(Cursor::new(bytes));
        assert!(matches!(s.read_string(), Err(Error::InvalidString)));
    }

    #[test]
    fn test_read_string_huge_length() {
        let mut bytes = vec![STRING_ENCODING_UTF8_BYTE_ARRAY as u8];
        bytes.extend_from_slice(&i32::MAX.to_be_bytes());
        bytes.extend_from_slice("short".as_bytes());
        let mut s = ByteStream::new(Cursor::new(bytes));
        assert!(matches!(s.read_string(), Err(Error::Io(_))));
    }

    #[test]
    fn test_stream_len_keeps_position() {
        let mut s = ByteStream::new(Cursor::new([1u8, 2, 3, 4]));
        s.read_i8().unwrap();
        assert_eq!(4, s.stream_len().unwrap());
        assert_eq!(1, s.position().unwrap());
    }

    #[test]
    fn test_read_string_truncated() {
        let mut bytes = vec![STRING_ENCODING_UTF8_BYTE_ARRAY as u8, 0, 0, 0, 11];
        bytes.extend_from_slice("hello".as_bytes());
        let mut s = ByteStream::new(Cursor::new(bytes));
        assert!(matches!(s.read_string(), Err(Error::Io(_))));
    }
}
