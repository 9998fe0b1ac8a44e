//! Declarative field schemas.
//!
//! Every message body the dongle emits is described by an ordered list of
//! [`Field`]s. A [`Schema`] walks the body front to back with an explicit
//! cursor and produces a [`Record`] of named values in schema order.
//!
//! Prefix kinds ([`FieldKind::Length`] and [`FieldKind::Count`]) read a size
//! and then consume the field declared right after them.

use crate::error::{ProtocolError, ProtocolResult};

/// How a field consumes bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// `n` bits (a multiple of 8) emitted as a lowercase hex token.
    Bits(u16),
    /// One byte, unsigned.
    Int8,
    /// Two bytes, big-endian unsigned.
    Int16,
    /// Byte length of the following field, `width` bytes wide (1 or 2).
    Length(u8),
    /// One-byte element count for the following field, whose elements are
    /// `elem_bits` wide.
    Count(u16),
    /// Follows a `Length`: raw bytes.
    Raw,
    /// Follows a `Length`: hex token.
    Token,
    /// Follows a `Count`: list of hex tokens.
    List,
    /// All remaining bytes as a hex token.
    Rest,
    /// All remaining bytes, kept raw.
    RawRest,
    /// Re-apply the whole schema to the remaining bytes.
    Recursive,
}

impl FieldKind {
    /// Bytes this kind always consumes, not counting data-dependent parts.
    pub const fn fixed_len(self) -> usize {
        match self {
            FieldKind::Bits(bits) => (bits / 8) as usize,
            FieldKind::Int8 => 1,
            FieldKind::Int16 => 2,
            FieldKind::Length(width) => width as usize,
            FieldKind::Count(_) => 1,
            FieldKind::Raw
            | FieldKind::Token
            | FieldKind::List
            | FieldKind::Rest
            | FieldKind::RawRest
            | FieldKind::Recursive => 0,
        }
    }
}

/// A named field descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    /// Name the decoded value is stored under.
    pub name: &'static str,
    /// How the field consumes bytes.
    pub kind: FieldKind,
}

/// Shorthand constructor used by the static layouts.
pub const fn field(name: &'static str, kind: FieldKind) -> Field {
    Field { name, kind }
}

/// A decoded field value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// Hex token.
    Token(String),
    /// Unsigned integer, including the values of prefix fields.
    Int(u64),
    /// Raw bytes.
    Bytes(Vec<u8>),
    /// List of hex tokens.
    List(Vec<String>),
    /// Records produced by further passes of a recursive schema.
    Records(Vec<Record>),
}

/// Named field values, in schema order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    fields: Vec<(&'static str, FieldValue)>,
}

impl Record {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a field value.
    pub fn push(&mut self, name: &'static str, value: FieldValue) {
        self.fields.push((name, value));
    }

    /// Look up a field by name.
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|(field, _)| *field == name)
            .map(|(_, value)| value)
    }

    /// Iterate over fields in schema order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &FieldValue)> {
        self.fields.iter().map(|(name, value)| (*name, value))
    }

    /// Number of decoded fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if no field was decoded.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    fn require(&self, name: &'static str) -> ProtocolResult<&FieldValue> {
        self.get(name).ok_or(ProtocolError::MissingField(name))
    }

    /// Hex token value.
    pub fn token(&self, name: &'static str) -> ProtocolResult<&str> {
        match self.require(name)? {
            FieldValue::Token(token) => Ok(token),
            _ => Err(ProtocolError::UnexpectedFieldKind {
                field: name,
                expected: "a token",
            }),
        }
    }

    /// Unsigned value of an integer field or of a hex token.
    pub fn uint(&self, name: &'static str) -> ProtocolResult<u64> {
        match self.require(name)? {
            FieldValue::Int(value) => Ok(*value),
            FieldValue::Token(token) => u64::from_str_radix(token, 16).map_err(|_| {
                ProtocolError::UnexpectedFieldKind {
                    field: name,
                    expected: "an integer of at most 64 bits",
                }
            }),
            _ => Err(ProtocolError::UnexpectedFieldKind {
                field: name,
                expected: "an integer",
            }),
        }
    }

    /// Value as `u8`; fails if it does not fit.
    pub fn u8(&self, name: &'static str) -> ProtocolResult<u8> {
        u8::try_from(self.uint(name)?).map_err(|_| ProtocolError::UnexpectedFieldKind {
            field: name,
            expected: "an 8-bit integer",
        })
    }

    /// Value as `u16`; fails if it does not fit.
    pub fn u16(&self, name: &'static str) -> ProtocolResult<u16> {
        u16::try_from(self.uint(name)?).map_err(|_| ProtocolError::UnexpectedFieldKind {
            field: name,
            expected: "a 16-bit integer",
        })
    }

    /// Raw bytes value.
    pub fn bytes(&self, name: &'static str) -> ProtocolResult<&[u8]> {
        match self.require(name)? {
            FieldValue::Bytes(bytes) => Ok(bytes),
            _ => Err(ProtocolError::UnexpectedFieldKind {
                field: name,
                expected: "raw bytes",
            }),
        }
    }

    /// List of hex tokens.
    pub fn list(&self, name: &'static str) -> ProtocolResult<&[String]> {
        match self.require(name)? {
            FieldValue::List(items) => Ok(items),
            _ => Err(ProtocolError::UnexpectedFieldKind {
                field: name,
                expected: "a list",
            }),
        }
    }

    /// Records of a recursive field.
    pub fn records(&self, name: &'static str) -> ProtocolResult<&[Record]> {
        match self.require(name)? {
            FieldValue::Records(records) => Ok(records),
            _ => Err(ProtocolError::UnexpectedFieldKind {
                field: name,
                expected: "nested records",
            }),
        }
    }
}

/// Read position over a body.
struct Cursor<'d> {
    data: &'d [u8],
    pos: usize,
}

impl<'d> Cursor<'d> {
    fn new(data: &'d [u8]) -> Self {
        Cursor { data, pos: 0 }
    }

    fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    fn take(&mut self, field: &'static str, len: usize) -> ProtocolResult<&'d [u8]> {
        if self.remaining() < len {
            return Err(ProtocolError::truncated(field, self.pos, len, self.remaining()));
        }
        let slice = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(slice)
    }

    fn take_rest(&mut self) -> &'d [u8] {
        let slice = &self.data[self.pos..];
        self.pos = self.data.len();
        slice
    }

    fn read_uint(&mut self, field: &'static str, width: usize) -> ProtocolResult<u64> {
        let bytes = self.take(field, width)?;
        Ok(bytes.iter().fold(0u64, |acc, &b| (acc << 8) | b as u64))
    }
}

/// An immutable ordered list of fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schema<'a> {
    fields: &'a [Field],
}

impl<'a> Schema<'a> {
    /// Wrap a field list.
    pub const fn new(fields: &'a [Field]) -> Self {
        Schema { fields }
    }

    /// The field descriptors.
    pub fn fields(&self) -> &'a [Field] {
        self.fields
    }

    /// Smallest number of bytes one pass of this schema can consume.
    pub fn min_len(&self) -> usize {
        self.fields.iter().map(|f| f.kind.fixed_len()).sum()
    }

    fn is_recursive(&self) -> bool {
        self.fields.iter().any(|f| f.kind == FieldKind::Recursive)
    }

    /// Decode `data` into a record.
    ///
    /// A `Recursive` field collects the records of further passes over the
    /// remaining bytes, stopping once fewer than [`Schema::min_len`] bytes
    /// are left. A recursive schema given less than one pass worth of bytes
    /// yields an empty record.
    pub fn decode(&self, data: &[u8]) -> ProtocolResult<Record> {
        let mut cursor = Cursor::new(data);

        if !self.is_recursive() {
            return self.decode_pass(&mut cursor).map(|(record, _)| record);
        }

        let min_len = self.min_len().max(1);
        if cursor.remaining() < min_len {
            return Ok(Record::new());
        }

        let (mut first, recursive) = self.decode_pass(&mut cursor)?;
        let mut more = Vec::new();
        while cursor.remaining() >= min_len {
            let (record, _) = self.decode_pass(&mut cursor)?;
            more.push(record);
        }
        if let Some(name) = recursive {
            first.push(name, FieldValue::Records(more));
        }
        Ok(first)
    }

    /// One pass over the fields. Returns the record and the name of the
    /// recursive field, if the pass stopped at one.
    fn decode_pass(
        &self,
        cursor: &mut Cursor<'_>,
    ) -> ProtocolResult<(Record, Option<&'static str>)> {
        let mut record = Record::new();
        let mut fields = self.fields.iter();

        while let Some(field) = fields.next() {
            match field.kind {
                FieldKind::Bits(bits) => {
                    let bytes = cursor.take(field.name, (bits / 8) as usize)?;
                    record.push(field.name, FieldValue::Token(hex::encode(bytes)));
                }
                FieldKind::Int8 => {
                    let value = cursor.read_uint(field.name, 1)?;
                    record.push(field.name, FieldValue::Int(value));
                }
                FieldKind::Int16 => {
                    let value = cursor.read_uint(field.name, 2)?;
                    record.push(field.name, FieldValue::Int(value));
                }
                FieldKind::Length(width) => {
                    let length = cursor.read_uint(field.name, width as usize)?;
                    record.push(field.name, FieldValue::Int(length));
                    let next = fields
                        .next()
                        .ok_or(ProtocolError::UnpairedField(field.name))?;
                    let bytes = cursor.take(next.name, length as usize)?;
                    let value = match next.kind {
                        FieldKind::Raw => FieldValue::Bytes(bytes.to_vec()),
                        FieldKind::Token => FieldValue::Token(hex::encode(bytes)),
                        _ => return Err(ProtocolError::UnpairedField(field.name)),
                    };
                    record.push(next.name, value);
                }
                FieldKind::Count(elem_bits) => {
                    let count = cursor.read_uint(field.name, 1)?;
                    record.push(field.name, FieldValue::Int(count));
                    let next = fields
                        .next()
                        .ok_or(ProtocolError::UnpairedField(field.name))?;
                    if next.kind != FieldKind::List {
                        return Err(ProtocolError::UnpairedField(field.name));
                    }
                    let elem_len = (elem_bits / 8) as usize;
                    let mut items = Vec::with_capacity(count as usize);
                    for _ in 0..count {
                        items.push(hex::encode(cursor.take(next.name, elem_len)?));
                    }
                    record.push(next.name, FieldValue::List(items));
                }
                FieldKind::Raw | FieldKind::Token | FieldKind::List => {
                    return Err(ProtocolError::UnpairedField(field.name));
                }
                FieldKind::Rest => {
                    record.push(field.name, FieldValue::Token(hex::encode(cursor.take_rest())));
                }
                FieldKind::RawRest => {
                    record.push(field.name, FieldValue::Bytes(cursor.take_rest().to_vec()));
                }
                FieldKind::Recursive => return Ok((record, Some(field.name))),
            }
        }

        Ok((record, None))
    }
}

#[cfg(test)]
mod tests {
    use super::FieldKind::*;
    use super::*;

    const SIMPLE: Schema<'static> = Schema::new(&[
        field("a", Bits(16)),
        field("b", Int16),
        field("c", RawRest),
    ]);

    #[test]
    fn test_decode_simple_schema() {
        let record = SIMPLE.decode(&[0x41, 0x42, 0x00, 0x10, 0xFF, 0xFF]).unwrap();
        assert_eq!(record.token("a").unwrap(), "4142");
        assert_eq!(record.uint("b").unwrap(), 16);
        assert_eq!(record.bytes("c").unwrap(), &[0xFF, 0xFF]);
        let names: Vec<_> = record.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_decode_truncated() {
        let err = SIMPLE.decode(&[0x41, 0x42, 0x00]).unwrap_err();
        assert_eq!(err, ProtocolError::truncated("b", 2, 2, 1));
    }

    #[test]
    fn test_length_prefixed_raw_and_token() {
        const SCHEMA: Schema<'static> = Schema::new(&[
            field("size", Length(2)),
            field("data", Raw),
            field("tag_len", Length(1)),
            field("tag", Token),
            field("end", RawRest),
        ]);
        let record = SCHEMA
            .decode(&[0x00, 0x02, 0x09, 0x29, 0x01, 0xAB, 0x55])
            .unwrap();
        assert_eq!(record.uint("size").unwrap(), 2);
        assert_eq!(record.bytes("data").unwrap(), &[0x09, 0x29]);
        assert_eq!(record.token("tag").unwrap(), "ab");
        assert_eq!(record.bytes("end").unwrap(), &[0x55]);
    }

    #[test]
    fn test_zero_length_prefix() {
        const SCHEMA: Schema<'static> =
            Schema::new(&[field("size", Length(1)), field("info", Raw)]);
        let record = SCHEMA.decode(&[0x00]).unwrap();
        assert_eq!(record.bytes("info").unwrap(), &[] as &[u8]);
    }

    #[test]
    fn test_count_prefixed_list() {
        const SCHEMA: Schema<'static> = Schema::new(&[
            field("endpoint", Bits(8)),
            field("cluster_count", Count(16)),
            field("cluster_list", List),
        ]);
        let record = SCHEMA.decode(&[0x01, 0x02, 0x00, 0x00, 0x04, 0x02]).unwrap();
        assert_eq!(record.uint("cluster_count").unwrap(), 2);
        assert_eq!(record.list("cluster_list").unwrap(), &["0000", "0402"]);

        let record = SCHEMA.decode(&[0x01, 0x00]).unwrap();
        assert!(record.list("cluster_list").unwrap().is_empty());
    }

    #[test]
    fn test_count_overruns_buffer() {
        const SCHEMA: Schema<'static> =
            Schema::new(&[field("count", Count(8)), field("items", List)]);
        assert!(matches!(
            SCHEMA.decode(&[0x03, 0x01]),
            Err(ProtocolError::Truncated { field: "items", .. })
        ));
    }

    #[test]
    fn test_unpaired_prefix() {
        const SCHEMA: Schema<'static> = Schema::new(&[field("size", Length(1))]);
        assert_eq!(
            SCHEMA.decode(&[0x00]),
            Err(ProtocolError::UnpairedField("size"))
        );

        const ORPHAN_SCHEMA: Schema<'static> = Schema::new(&[field("orphan", Raw)]);
        assert_eq!(ORPHAN_SCHEMA.decode(&[]), Err(ProtocolError::UnpairedField("orphan")));
    }

    #[test]
    fn test_recursive_schema() {
        const SCHEMA: Schema<'static> = Schema::new(&[
            field("id", Bits(8)),
            field("addr", Bits(16)),
            field("next", Recursive),
        ]);
        assert_eq!(SCHEMA.min_len(), 3);

        // Three records plus one trailing byte that is too short for a pass.
        let data = [0x01, 0xAA, 0xAA, 0x02, 0xBB, 0xBB, 0x03, 0xCC, 0xCC, 0x7F];
        let record = SCHEMA.decode(&data).unwrap();
        assert_eq!(record.token("addr").unwrap(), "aaaa");
        let more = record.records("next").unwrap();
        assert_eq!(more.len(), 2);
        assert_eq!(more[1].token("addr").unwrap(), "cccc");
        assert!(more[1].get("next").is_none());

        assert!(SCHEMA.decode(&[0x7F]).unwrap().is_empty());
    }

    #[test]
    fn test_record_accessor_errors() {
        let record = SIMPLE.decode(&[0x41, 0x42, 0x01, 0x00]).unwrap();
        assert_eq!(record.u8("b"), Err(ProtocolError::UnexpectedFieldKind {
            field: "b",
            expected: "an 8-bit integer",
        }));
        assert_eq!(record.u16("a").unwrap(), 0x4142);
        assert_eq!(record.bytes("missing"), Err(ProtocolError::MissingField("missing")));
        assert!(record.list("a").is_err());
    }
}
