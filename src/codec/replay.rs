//! Re-feeding object members that were read ahead of a type marker.
//!
//! Decoders that need a discriminator member before they can choose how to
//! read the rest of an object pull members into a buffer until they find
//! it. [`Replay`] then presents the buffered members, followed by whatever
//! the underlying input still holds, as a single [`MapAccess`].

use serde::de::{DeserializeSeed, Error as _, IntoDeserializer, MapAccess};
use serde_json::Value;

/// Members read before the type marker, in input order.
pub(crate) type Buffered = Vec<(String, Value)>;

/// Reads members from `map` until `is_marker` accepts a key.
///
/// Returns the buffered members and the marker's key and value, or `None`
/// for the marker if the object ended first.
pub(crate) fn read_until<'de, A, F>(
    map: &mut A,
    mut is_marker: F,
) -> Result<(Buffered, Option<(String, Value)>), A::Error>
where
    A: MapAccess<'de>,
    F: FnMut(&str) -> bool,
{
    let mut buffered = Vec::new();
    while let Some(key) = map.next_key::<String>()? {
        let value: Value = map.next_value()?;
        if is_marker(&key) {
            return Ok((buffered, Some((key, value))));
        }
        buffered.push((key, value));
    }
    Ok((buffered, None))
}

/// Unwraps a type marker's value, which must be a JSON string.
pub(crate) fn tag_string<E: serde::de::Error>(value: Value, member: &str) -> Result<String, E> {
    match value {
        Value::String(tag) => Ok(tag),
        other => Err(E::custom(format!("{member} must be a string, found {other}"))),
    }
}

/// A [`MapAccess`] that yields buffered members before delegating.
pub(crate) struct Replay<A> {
    buffered: std::vec::IntoIter<(String, Value)>,
    pending: Option<Value>,
    inner: A,
}

impl<A> Replay<A> {
    pub(crate) fn new(buffered: Buffered, inner: A) -> Self {
        Self {
            buffered: buffered.into_iter(),
            pending: None,
            inner,
        }
    }
}

impl<'de, A> MapAccess<'de> for Replay<A>
where
    A: MapAccess<'de>,
{
    type Error = A::Error;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>, Self::Error>
    where
        K: DeserializeSeed<'de>,
    {
        match self.buffered.next() {
            Some((key, value)) => {
                self.pending = Some(value);
                let key: serde::de::value::StringDeserializer<A::Error> = key.into_deserializer();
                seed.deserialize(key).map(Some)
            }
            None => self.inner.next_key_seed(seed),
        }
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value, Self::Error>
    where
        V: DeserializeSeed<'de>,
    {
        match self.pending.take() {
            Some(value) => seed.deserialize(value).map_err(A::Error::custom),
            None => self.inner.next_value_seed(seed),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        self.inner
            .size_hint()
            .map(|rest| rest + self.buffered.len())
    }
}
