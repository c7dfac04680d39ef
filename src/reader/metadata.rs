//! Read the metadata section.
//! Metadata contains the type definitions needed to parse the recorded events.

use crate::reader::byte_stream::ByteStream;
use crate::reader::ChunkHeader;
use crate::schema::{EventSchema, FieldDescriptor, FieldKind};
use crate::{Error, Result};
use rustc_hash::FxHashMap;
use std::io::{Read, Seek};

// id (i64) + empty name tag + field count (i32)
const MIN_TYPE_SIZE: u64 = 13;
// empty name tag + kind tag
const MIN_FIELD_SIZE: u64 = 2;

#[derive(Debug, Default)]
pub struct TypePool {
    // declaration order
    types: Vec<EventSchema>,
    by_id: FxHashMap<i64, usize>,
}

impl TypePool {
    pub fn register(&mut self, desc: EventSchema) -> Result<()> {
        if self.by_id.contains_key(&desc.id()) {
            return Err(Error::InvalidFormat);
        }
        self.by_id.insert(desc.id(), self.types.len());
        self.types.push(desc);
        Ok(())
    }

    pub fn get(&self, class_id: i64) -> Option<&EventSchema> {
        self.by_id.get(&class_id).map(|&idx| &self.types[idx])
    }

    pub fn get_by_name(&self, type_name: &str) -> Option<&EventSchema> {
        self.types.iter().find(|t| t.type_name() == type_name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &EventSchema> {
        self.types.iter()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

#[derive(Debug)]
pub struct Metadata {
    pub type_pool: TypePool,
}

impl Metadata {
    pub fn try_new<T: Read + Seek>(
        stream: &mut ByteStream<T>,
        header: &ChunkHeader,
    ) -> Result<Self> {
        stream.seek(header.metadata_offset as u64)?;

        let mut type_pool = TypePool::default();
        let end = header.events_offset as u64;
        let type_count = stream.read_i32()?;
        Self::check_count(stream, type_count, MIN_TYPE_SIZE, end)?;
        for _ in 0..type_count {
            type_pool.register(Self::read_type(stream, end)?)?;
        }

        // the event section starts right after the metadata
        if stream.position()? != header.events_offset as u64 {
            return Err(Error::InvalidFormat);
        }

        Ok(Self { type_pool })
    }

    /// Rejects counts that cannot fit in what is left of the section.
    fn check_count<T: Read + Seek>(
        stream: &mut ByteStream<T>,
        count: i32,
        min_size: u64,
        end: u64,
    ) -> Result<()> {
        let remaining = end.saturating_sub(stream.position()?);
        if count < 0 || count as u64 * min_size > remaining {
            return Err(Error::InvalidFormat);
        }
        Ok(())
    }

    fn read_type<T: Read + Seek>(stream: &mut ByteStream<T>, end: u64) -> Result<EventSchema> {
        let class_id = stream.read_i64()?;
        let name = stream.read_non_null_string()?;

        let field_count = stream.read_i32()?;
        Self::check_count(stream, field_count, MIN_FIELD_SIZE, end)?;
        let mut fields = vec![];
        for _ in 0..field_count {
            let field_name = stream.read_non_null_string()?;
            let kind = FieldKind::from_tag(stream.read_i8()?)?;
            fields.push(FieldDescriptor::new(field_name, kind));
        }

        EventSchema::try_new(class_id, name, fields).map_err(|_| Error::InvalidFormat)
    }
}
