use std::fmt;
use std::marker::PhantomData;

use serde::de::{Deserialize, Deserializer, MapAccess, Visitor};

/// City name to per-city payload, in the order the API listed the cities.
///
/// The order matters: the first key is the default selection and the
/// selector lists cities exactly as received.
#[derive(Debug, Clone, PartialEq)]
pub struct CityKeyed<T> {
    entries: Vec<(String, T)>,
}

impl<T> Default for CityKeyed<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<T> CityKeyed<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: impl IntoIterator<Item = (String, T)>) -> Self {
        let mut keyed = Self::new();
        for (key, value) in entries {
            keyed.insert(key, value);
        }
        keyed
    }

    /// Replaces the value for an existing key in place, otherwise appends.
    pub fn insert(&mut self, key: String, value: T) {
        if let Some(slot) = self.entries.iter_mut().find(|(existing, _)| *existing == key) {
            slot.1 = value;
        } else {
            self.entries.push((key, value));
        }
    }

    pub fn remove(&mut self, key: &str) -> Option<T> {
        let index = self.entries.iter().position(|(existing, _)| existing == key)?;
        Some(self.entries.remove(index).1)
    }

    pub fn get(&self, key: &str) -> Option<&T> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, value)| value)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    pub fn key_list(&self) -> Vec<String> {
        self.keys().map(str::to_string).collect()
    }

    pub fn entries(&self) -> &[(String, T)] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<(String, T)> {
        self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keeps the key order but swaps every value, used to turn a keys-only
    /// listing into an empty cache.
    pub fn map_values<U>(self, mut f: impl FnMut(T) -> U) -> CityKeyed<U> {
        CityKeyed {
            entries: self
                .entries
                .into_iter()
                .map(|(key, value)| (key, f(value)))
                .collect(),
        }
    }
}

struct CityKeyedVisitor<T>(PhantomData<T>);

impl<'de, T> Visitor<'de> for CityKeyedVisitor<T>
where
    T: Deserialize<'de>,
{
    type Value = CityKeyed<T>;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("an object keyed by city")
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut keyed = CityKeyed::new();
        while let Some((key, value)) = map.next_entry::<String, T>()? {
            keyed.insert(key, value);
        }
        Ok(keyed)
    }
}

impl<'de, T> Deserialize<'de> for CityKeyed<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(CityKeyedVisitor(PhantomData))
    }
}
