use anyhow::Result;
use prost::Message;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

/// Kind of a dumped object, as recorded by the runtime-side agent
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, prost::Enumeration)]
#[repr(i32)]
pub enum ObjectKind {
    Other = 0,
    Mapping = 1,
    List = 2,
    Tuple = 3,
    Frame = 4,
}

#[derive(Clone, PartialEq, Message)]
pub struct HeapObject {
    #[prost(uint64, tag = "1")]
    pub start: u64,
    #[prost(enumeration = "ObjectKind", tag = "2")]
    pub kind: i32,
    /// Outgoing references, in slot order
    #[prost(uint64, repeated, tag = "3")]
    pub referents: Vec<u64>,
    #[prost(uint64, tag = "4")]
    pub reference_count: u64,
    #[prost(uint64, tag = "5")]
    pub per_slot_overhead: u64,
    #[prost(uint64, tag = "6")]
    pub slot_mask: u64,
    #[prost(uint64, tag = "7")]
    pub fill_count: u64,
    /// Slots live in storage owned elsewhere (e.g. inline in the header)
    #[prost(bool, tag = "8")]
    pub shared_backing_store: bool,
    #[prost(uint64, tag = "9")]
    pub allocated_capacity: u64,
    #[prost(string, tag = "10")]
    pub type_name: String,
    /// Source file of the code a frame object is executing
    #[prost(string, optional, tag = "11")]
    pub frame_source: Option<String>,
}

#[derive(Clone, PartialEq, Message)]
pub struct HeapDump {
    #[prost(message, repeated, tag = "1")]
    pub objects: Vec<HeapObject>,
}

impl HeapObject {
    pub fn object_kind(&self) -> ObjectKind {
        ObjectKind::from_i32(self.kind).unwrap_or(ObjectKind::Other)
    }

    pub fn mapping(start: u64, per_slot_overhead: u64, slot_mask: u64, fill_count: u64) -> Self {
        HeapObject {
            start,
            kind: ObjectKind::Mapping as i32,
            reference_count: 1,
            per_slot_overhead,
            slot_mask,
            fill_count,
            type_name: "dict".to_string(),
            ..Default::default()
        }
    }

    pub fn list(start: u64, per_slot_overhead: u64, allocated_capacity: u64) -> Self {
        HeapObject {
            start,
            kind: ObjectKind::List as i32,
            reference_count: 1,
            per_slot_overhead,
            allocated_capacity,
            type_name: "list".to_string(),
            ..Default::default()
        }
    }

    pub fn tuple(start: u64, per_slot_overhead: u64, len: u64) -> Self {
        HeapObject {
            start,
            kind: ObjectKind::Tuple as i32,
            reference_count: 1,
            per_slot_overhead,
            allocated_capacity: len,
            type_name: "tuple".to_string(),
            ..Default::default()
        }
    }

    pub fn frame(start: u64, source: &str) -> Self {
        HeapObject {
            start,
            kind: ObjectKind::Frame as i32,
            reference_count: 1,
            type_name: "frame".to_string(),
            frame_source: Some(source.to_string()),
            ..Default::default()
        }
    }

    pub fn other(start: u64, type_name: &str) -> Self {
        HeapObject {
            start,
            kind: ObjectKind::Other as i32,
            reference_count: 1,
            type_name: type_name.to_string(),
            ..Default::default()
        }
    }

    pub fn shared(mut self) -> Self {
        self.shared_backing_store = true;
        self
    }

    pub fn with_referents(mut self, referents: &[u64]) -> Self {
        self.referents = referents.to_vec();
        self
    }
}

impl HeapDump {
    pub fn from_binpb_zst(p: impl AsRef<Path>) -> Result<HeapDump> {
        let file = File::open(p)?;
        let mut reader = zstd::Decoder::new(file)?;
        let mut buf = vec![];
        reader.read_to_end(&mut buf)?;
        Ok(HeapDump::decode(buf.as_slice())?)
    }

    pub fn to_binpb_zst(&self, p: impl AsRef<Path>) -> Result<()> {
        let file = File::create(p)?;
        let mut writer = zstd::Encoder::new(file, 0)?;
        writer.write_all(&self.encode_to_vec())?;
        writer.finish()?;
        Ok(())
    }
}
