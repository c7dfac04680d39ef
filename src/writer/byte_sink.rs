//! Provides functionality to write primitives to a recording byte stream.
//! All integers are big-endian and fixed width.

use crate::{Error, Result};
use byteorder::{WriteBytesExt, BE};
use std::io::Write;

const STRING_ENCODING_EMPTY_STRING: i8 = 1;
const STRING_ENCODING_UTF8_BYTE_ARRAY: i8 = 3;

/// Converts a length or count to the `i32` the format stores it as.
pub(crate) fn length_i32(len: usize, what: &'static str) -> Result<i32> {
    i32::try_from(len).map_err(|_| Error::TooLarge(what))
}

pub struct ByteSink<T> {
    inner: T,
}

impl<T: Write> ByteSink<T> {
    pub fn new(inner: T) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> T {
        self.inner
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        Ok(self.inner.write_all(bytes)?)
    }

    pub fn write_i8(&mut self, v: i8) -> Result<()> {
        Ok(self.inner.write_i8(v)?)
    }

    pub fn write_i16(&mut self, v: i16) -> Result<()> {
        Ok(self.inner.write_i16::<BE>(v)?)
    }

    pub fn write_i32(&mut self, v: i32) -> Result<()> {
        Ok(self.inner.write_i32::<BE>(v)?)
    }

    pub fn write_i64(&mut self, v: i64) -> Result<()> {
        Ok(self.inner.write_i64::<BE>(v)?)
    }

    pub fn write_string(&mut self, s: &str) -> Result<()> {
        if s.is_empty() {
            return self.write_i8(STRING_ENCODING_EMPTY_STRING);
        }
        self.write_i8(STRING_ENCODING_UTF8_BYTE_ARRAY)?;
        self.write_i32(length_i32(s.len(), "string")?)?;
        self.write_bytes(s.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_i64() {
        let mut s = ByteSink::new(vec![]);
        s.write_i64(55301).unwrap();
        assert_eq!(vec![0, 0, 0, 0, 0, 0, 0xd8, 0x05], s.into_inner());
    }

    #[test]
    fn test_write_string_empty() {
        let mut s = ByteSink::new(vec![]);
        s.write_string("").unwrap();
        assert_eq!(vec![STRING_ENCODING_EMPTY_STRING as u8], s.into_inner());
    }

    #[test]
    fn test_write_string_utf8() {
        let mut s = ByteSink::new(vec![]);
        s.write_string("hello,world").unwrap();

        let mut expected = vec![STRING_ENCODING_UTF8_BYTE_ARRAY as u8, 0, 0, 0, 11];
        expected.extend_from_slice("hello,world".as_bytes());
        assert_eq!(expected, s.into_inner());
    }

    #[test]
    fn test_length_i32_overflow() {
        assert_eq!(i32::MAX, length_i32(i32::MAX as usize, "string").unwrap());
        assert!(matches!(
            length_i32(i32::MAX as usize + 1, "string"),
            Err(Error::TooLarge("string"))
        ));
    }

    #[test]
    fn test_write_string_multibyte_length() {
        let mut s = ByteSink::new(vec![]);
        s.write_string("ä").unwrap();
        // length counts bytes, not chars
        assert_eq!(&[0, 0, 0, 2], &s.into_inner()[1..5]);
    }
}
