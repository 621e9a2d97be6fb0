//! Reading a map whose keys are known up front.

use log::debug;

use crate::document::{skip, ByteStream, Document, MapStream};
use crate::error::Result;

/// Key-ordered view over a map.
///
/// `fields` lists the expected keys in the order they are requested. Map
/// entries may arrive in any order: unknown keys are skipped, and a key that
/// comes later in `fields` than the one being requested is held until it is
/// requested itself. Fields whose key was not met before a later field's key
/// (or the end of the map) read as absent. When a key repeats, its first
/// occurrence wins.
///
/// # Example
///
/// ```
/// use docstream::{json, Document, SchemaMap, Value};
///
/// let mut input = docstream::buffers::Reader::new(br#"{"b":2,"x":0,"c":3}"#);
/// let Document::Map(map) = json::read(&mut input)? else { unreachable!() };
/// let mut schema = SchemaMap::new(map, &["a", "b", "c"]);
/// assert!(schema.read("a")?.is_none());
/// assert_eq!(schema.read("b")?.map(Value::read).transpose()?, Some(Value::Unsigned(2)));
/// assert_eq!(schema.read("c")?.map(Value::read).transpose()?, Some(Value::Unsigned(3)));
/// schema.seek_to_end()?;
/// # Ok::<(), docstream::Error>(())
/// ```
pub struct SchemaMap<'f, M: MapStream> {
    map: M,
    fields: &'f [&'f str],
    next_field: usize,
    held: Option<usize>,
    exhausted: bool,
}

impl<'f, M: MapStream> SchemaMap<'f, M> {
    pub fn new(map: M, fields: &'f [&'f str]) -> Self {
        Self {
            map,
            fields,
            next_field: 0,
            held: None,
            exhausted: false,
        }
    }

    /// Returns the value of `name`, or `None` if the map does not have it.
    ///
    /// # Panics
    ///
    /// If `name` is not one of the fields, or was requested out of order.
    pub fn read(&mut self, name: &str) -> Result<Option<Document<M::Nodes<'_>>>> {
        let index = match self.fields.iter().position(|field| *field == name) {
            Some(index) => index,
            None => panic!("{name:?} is not a field of this schema"),
        };
        assert!(
            index >= self.next_field,
            "field {name:?} requested after a later field"
        );
        self.next_field = index + 1;

        if let Some(held) = self.held {
            if held < index {
                self.held = None;
                skip(self.map.read_value()?)?;
            }
        }
        if self.held.is_none() && !self.exhausted {
            self.held = self.next_known_key(index)?;
            self.exhausted = self.held.is_none();
        }
        if self.held == Some(index) {
            self.held = None;
            self.map.read_value().map(Some)
        } else {
            Ok(None)
        }
    }

    /// Skips every remaining entry, leaving the stream after the map.
    pub fn seek_to_end(mut self) -> Result<()> {
        if self.held.take().is_some() {
            skip(self.map.read_value()?)?;
        }
        if !self.exhausted {
            self.map.skip_remaining()?;
        }
        Ok(())
    }

    /// Reads keys until one names a field at or after `from`, skipping the
    /// entries in between. Returns that field's index, `None` at the end of
    /// the map.
    fn next_known_key(&mut self, from: usize) -> Result<Option<usize>> {
        loop {
            let key = match self.map.next_key()? {
                None => return Ok(None),
                Some(Document::Text(mut text)) => Some(text.read_to_vec()?),
                Some(other) => {
                    skip(other)?;
                    None
                }
            };
            let index = key.as_deref().and_then(|key| {
                self.fields
                    .iter()
                    .position(|field| field.as_bytes() == key)
            });
            match index {
                Some(index) if index >= from => return Ok(Some(index)),
                _ => {
                    debug!(
                        "schema: skipping entry {:?}",
                        key.as_deref().map(String::from_utf8_lossy)
                    );
                    skip(self.map.read_value()?)?;
                }
            }
        }
    }
}
