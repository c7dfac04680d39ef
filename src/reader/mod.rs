//! Read recordings back into event types and events.

use crate::reader::byte_stream::ByteStream;
use crate::reader::event::EventIterator;
use crate::reader::metadata::Metadata;
use crate::{Error, Result, Version, HEADER_SIZE, MAGIC};
use chrono::{DateTime, TimeZone, Utc};
use std::io::{Read, Seek};

mod byte_stream;
pub mod de;
pub mod event;
pub mod metadata;

pub use event::Event;

#[derive(Debug)]
pub struct ChunkHeader {
    pub version: Version,
    pub chunk_size: i64,
    pub metadata_offset: i64,
    pub events_offset: i64,
    pub start_time_millis: i64,
}

impl ChunkHeader {
    pub fn start_time(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.start_time_millis).single()
    }

    fn validate(&self) -> Result<()> {
        if self.metadata_offset < HEADER_SIZE
            || self.events_offset < self.metadata_offset
            || self.chunk_size < self.events_offset
        {
            return Err(Error::InvalidFormat);
        }
        Ok(())
    }
}

#[derive(Debug)]
pub struct Chunk {
    pub header: ChunkHeader,
    pub metadata: Metadata,
    body: Vec<u8>,
}

impl Chunk {
    pub fn events(&self) -> EventIterator<'_> {
        EventIterator::new(self)
    }
}

pub struct RecordingReader<R> {
    inner: ByteStream<R>,
}

impl<R> RecordingReader<R>
where
    R: Read + Seek,
{
    pub fn new(inner: R) -> Self {
        Self {
            inner: ByteStream::new(inner),
        }
    }

    pub fn read_chunk(&mut self) -> Result<Chunk> {
        let header = self.read_header()?;
        // offsets and sizes in the header must lie within the stream
        if header.chunk_size as u64 > self.inner.stream_len()? {
            return Err(Error::InvalidFormat);
        }
        let metadata = Metadata::try_new(&mut self.inner, &header)?;

        let body_size = (header.chunk_size - header.events_offset) as u64;
        let body = self.inner.read_to_vec(body_size)?;

        Ok(Chunk {
            header,
            metadata,
            body,
        })
    }

    fn read_header(&mut self) -> Result<ChunkHeader> {
        self.inner.seek(0)?;
        if self.inner.read_exact::<4>()? != MAGIC {
            return Err(Error::InvalidFormat);
        }

        let version = Version {
            major: self.inner.read_i16()?,
            minor: self.inner.read_i16()?,
        };
        if version != crate::VERSION_1 {
            return Err(Error::UnsupportedVersion(version));
        }

        let header = ChunkHeader {
            version,
            chunk_size: self.inner.read_i64()?,
            metadata_offset: self.inner.read_i64()?,
            events_offset: self.inner.read_i64()?,
            start_time_millis: self.inner.read_i64()?,
        };
        header.validate()?;
        Ok(header)
    }
}
