//! Free-form `name = value` properties attached to maps, layers and objects.

use serde::Serialize;

use crate::error::PropertyError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Property {
    pub name: String,
    pub value: String,
}

/// Properties in document order. Duplicate names are kept on purpose so that
/// lookups can tell a missing key from an ambiguous one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Properties(pub Vec<Property>);

impl Properties {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.push(Property {
            name: name.into(),
            value: value.into(),
        });
    }

    /// Every value stored under `name`.
    pub fn get_all<'a>(&'a self, name: &str) -> impl Iterator<Item = &'a str> {
        self.0
            .iter()
            .filter(move |p| p.name == name)
            .map(|p| p.value.as_str())
    }

    /// The single value stored under `name`.
    pub fn get(&self, name: &str) -> Result<&str, PropertyError> {
        let mut values = self.get_all(name);
        let first = values
            .next()
            .ok_or_else(|| PropertyError::Unavailable(name.to_string()))?;
        if values.next().is_some() {
            return Err(PropertyError::NotUnique(name.to_string()));
        }
        Ok(first)
    }

    /// Like [`Properties::get`], but a missing key is `Ok(None)`.
    pub fn get_opt(&self, name: &str) -> Result<Option<&str>, PropertyError> {
        match self.get(name) {
            Ok(v) => Ok(Some(v)),
            Err(PropertyError::Unavailable(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<N: Into<String>, V: Into<String>> FromIterator<(N, V)> for Properties {
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        let mut props = Properties::new();
        for (n, v) in iter {
            props.push(n, v);
        }
        props
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_and_duplicate_keys_are_errors() {
        let props: Properties = [("Bitmap", "true"), ("NilTile", "3"), ("NilTile", "4")]
            .into_iter()
            .collect();

        assert_eq!(props.get("Bitmap"), Ok("true"));
        assert_eq!(
            props.get("Affine"),
            Err(PropertyError::Unavailable("Affine".into()))
        );
        assert_eq!(
            props.get("NilTile"),
            Err(PropertyError::NotUnique("NilTile".into()))
        );
        assert_eq!(props.get_opt("Affine"), Ok(None));
        assert!(props.get_opt("NilTile").is_err());
    }

    #[test]
    fn values_outlive_the_key() {
        let props: Properties = [("Compression", "LZ77")].into_iter().collect();
        let value = {
            let key = String::from("Compression");
            props.get(&key).unwrap()
        };
        assert_eq!(value, "LZ77");
        assert_eq!(props.get_all("Compression").count(), 1);
    }
}
