//! Object-stream decode loop
//!
//! One [`Decoder`] decodes one stream: its string, traits, and object
//! reference tables are created empty and dropped with it. Tables are
//! append-only indexed lists; back-references are indexes into them.
//! Self-referential objects work because every array/object registers a
//! placeholder in its table slot before its contents are decoded, then
//! fills the slot.

use crate::reader::{to_i29, ByteReader};
use crate::value::{Traits, Value};
use crate::{marker, Error, Result};

/// Capacity hint cap for length-prefixed collections; declared counts are
/// untrusted until that many values actually decode.
const MAX_PREALLOC: usize = 256;

/// Decode a single value from the top of an object stream.
///
/// Trailing bytes after the root value are ignored.
pub fn decode(data: &[u8]) -> Result<Value> {
    Decoder::new(data).read_value()
}

/// Stateful decoder holding the three per-stream reference tables
pub struct Decoder<'a> {
    reader: ByteReader<'a>,
    strings: Vec<String>,
    traits: Vec<Traits>,
    objects: Vec<Value>,
}

impl<'a> Decoder<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            reader: ByteReader::new(data),
            strings: Vec::new(),
            traits: Vec::new(),
            objects: Vec::new(),
        }
    }

    /// Decode the next value, marker byte included
    pub fn read_value(&mut self) -> Result<Value> {
        let marker_byte = self.reader.read_u8()?;
        match marker_byte {
            marker::UNDEFINED | marker::NULL => Ok(Value::Null),
            marker::FALSE => Ok(Value::Bool(false)),
            marker::TRUE => Ok(Value::Bool(true)),
            marker::INTEGER => {
                let raw = self.reader.read_u29()?;
                Ok(Value::Integer(to_i29(raw)))
            }
            marker::DOUBLE => Ok(Value::Double(self.reader.read_f64()?)),
            marker::STRING => Ok(Value::String(self.read_string()?)),
            marker::DATE => self.read_date(),
            marker::ARRAY => self.read_array(),
            marker::OBJECT => self.read_object(),
            other => Err(Error::UnknownMarker(other)),
        }
    }

    /// Ref-or-length string. Inline non-empty strings enter the string
    /// table; the empty string is never added (it doubles as a sentinel).
    fn read_string(&mut self) -> Result<String> {
        let header = self.reader.read_u29()?;
        if header & 1 == 0 {
            let index = (header >> 1) as usize;
            return self
                .strings
                .get(index)
                .cloned()
                .ok_or(Error::StringRefOutOfRange(index));
        }

        let len = (header >> 1) as usize;
        let bytes = self.reader.read_bytes(len)?;
        let string = std::str::from_utf8(bytes)
            .map_err(|_| Error::InvalidUtf8)?
            .to_string();

        if !string.is_empty() {
            self.strings.push(string.clone());
        }
        Ok(string)
    }

    fn read_date(&mut self) -> Result<Value> {
        let header = self.reader.read_u29()?;
        if header & 1 == 0 {
            return self.object_ref((header >> 1) as usize);
        }

        let millis = self.reader.read_f64()?;
        let date = Value::Date(millis);
        self.objects.push(date.clone());
        Ok(date)
    }

    /// Ref-or-count array: associative pairs up to the empty-key sentinel,
    /// then `count` dense elements.
    fn read_array(&mut self) -> Result<Value> {
        let header = self.reader.read_u29()?;
        if header & 1 == 0 {
            return self.object_ref((header >> 1) as usize);
        }
        let count = (header >> 1) as usize;

        let slot = self.objects.len();
        self.objects.push(Value::Null);

        let mut assoc = Vec::new();
        loop {
            let key = self.read_string()?;
            if key.is_empty() {
                break;
            }
            let value = self.read_value()?;
            assoc.push((key, value));
        }

        let mut dense = Vec::with_capacity(count.min(MAX_PREALLOC));
        for _ in 0..count {
            dense.push(self.read_value()?);
        }

        let array = Value::Array { assoc, dense };
        self.objects[slot] = array.clone();
        Ok(array)
    }

    fn read_object(&mut self) -> Result<Value> {
        let header = self.reader.read_u29()?;
        if header & 1 == 0 {
            return self.object_ref((header >> 1) as usize);
        }

        let traits = self.read_traits(header)?;

        // Register before recursing so field values can back-reference
        // this object.
        let slot = self.objects.len();
        self.objects.push(Value::Null);

        let mut fields =
            Vec::with_capacity(traits.field_names.len().min(MAX_PREALLOC));
        for name in &traits.field_names {
            let value = self.read_value()?;
            fields.push((name.clone(), value));
        }

        if traits.dynamic {
            loop {
                let name = self.read_string()?;
                if name.is_empty() {
                    break;
                }
                let value = self.read_value()?;
                fields.push((name, value));
            }
        }

        let object = Value::Object {
            class_name: traits.class_name.clone(),
            fields,
        };
        self.objects[slot] = object.clone();
        Ok(object)
    }

    /// Traits part of an object header: back-reference or inline descriptor
    fn read_traits(&mut self, header: u32) -> Result<Traits> {
        if header & 2 == 0 {
            let index = (header >> 2) as usize;
            return self
                .traits
                .get(index)
                .cloned()
                .ok_or(Error::TraitsRefOutOfRange(index));
        }

        if header & 4 != 0 {
            let class_name = self.read_string()?;
            return Err(Error::Externalizable(class_name));
        }

        let dynamic = header & 8 != 0;
        let count = (header >> 4) as usize;
        let class_name = self.read_string()?;

        let mut field_names = Vec::with_capacity(count.min(MAX_PREALLOC));
        for _ in 0..count {
            field_names.push(self.read_string()?);
        }

        let traits = Traits {
            class_name,
            field_names,
            dynamic,
        };
        self.traits.push(traits.clone());
        Ok(traits)
    }

    fn object_ref(&self, index: usize) -> Result<Value> {
        self.objects
            .get(index)
            .cloned()
            .ok_or(Error::ObjectRefOutOfRange(index))
    }
}
