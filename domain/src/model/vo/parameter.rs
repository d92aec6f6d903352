use std::fmt;

/// Connection keys carried on the form next to the pipeline options.
pub const HOST: &str = "Host";
pub const USER: &str = "User";
pub const PORT: &str = "Port";
pub const PIPELINE: &str = "Qiime2 Pipeline";

pub const CONNECTION_KEYS: [&str; 4] = [USER, HOST, PORT, PIPELINE];

pub const OUTDIR: &str = "outdir";
pub const SAMPLE_SHEET: &str = "sample-sheet";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParameterValue {
    Text(String),
    Flag(bool),
}

impl ParameterValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Flag(_) => None,
        }
    }
}

impl From<&str> for ParameterValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_owned())
    }
}

impl From<String> for ParameterValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<bool> for ParameterValue {
    fn from(b: bool) -> Self {
        Self::Flag(b)
    }
}

/// Option name to value, kept in insertion order.
///
/// The order is significant: it is the order arguments are emitted on the
/// pipeline command line and the order lines are written to a parameter file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterSet {
    entries: Vec<(String, ParameterValue)>,
}

impl ParameterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the value in place when the key exists, appends otherwise.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ParameterValue>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, v)) => *v = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&ParameterValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn text(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(ParameterValue::as_text)
    }

    pub fn remove(&mut self, key: &str) -> Option<ParameterValue> {
        let idx = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(idx).1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParameterValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Splits into `(connection, options)`, both keeping their relative order.
    pub fn split_off_connection(&self) -> (ParameterSet, ParameterSet) {
        let (connection, options) = self
            .entries
            .iter()
            .cloned()
            .partition(|(k, _)| CONNECTION_KEYS.contains(&k.as_str()));
        (
            Self {
                entries: connection,
            },
            Self { entries: options },
        )
    }

    /// Loads `other` onto a form.
    ///
    /// A flag absent from a parameter file means `false`, so every flag on the
    /// form is cleared before the loaded values are applied. A file cannot tell
    /// a set flag from an empty text option, so a set flag landing on a text
    /// option of the form is read as that option left empty.
    pub fn apply(&mut self, other: ParameterSet) {
        for (_, v) in self.entries.iter_mut() {
            if let ParameterValue::Flag(b) = v {
                *b = false;
            }
        }
        for (k, v) in other.entries {
            let v = match (self.get(&k), v) {
                (Some(ParameterValue::Text(_)), ParameterValue::Flag(true)) => {
                    ParameterValue::Text(String::new())
                }
                (_, v) => v,
            };
            self.insert(k, v);
        }
    }
}

impl<K, V> FromIterator<(K, V)> for ParameterSet
where
    K: Into<String>,
    V: Into<ParameterValue>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut set = Self::new();
        for (k, v) in iter {
            set.insert(k, v);
        }
        set
    }
}

impl fmt::Display for ParameterSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self.entries.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
        for (k, v) in &self.entries {
            match v {
                ParameterValue::Text(s) => writeln!(f, "{k:width$}  {s}")?,
                ParameterValue::Flag(b) => {
                    writeln!(f, "{k:width$}  [{}]", if *b { "x" } else { " " })?
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_keeps_position() {
        let mut set = ParameterSet::new();
        set.insert("threads", "4");
        set.insert("skip-otu", true);
        set.insert("threads", "8");
        let keys: Vec<_> = set.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, ["threads", "skip-otu"]);
        assert_eq!(set.text("threads"), Some("8"));
    }

    #[test]
    fn split_connection_from_options() {
        let set: ParameterSet = [
            (USER, ParameterValue::from("me")),
            ("outdir", "out".into()),
            (HOST, "10.0.0.1".into()),
            ("skip-otu", true.into()),
        ]
        .into_iter()
        .collect();

        let (connection, options) = set.split_off_connection();
        assert_eq!(connection.text(USER), Some("me"));
        assert_eq!(connection.text(HOST), Some("10.0.0.1"));
        assert_eq!(connection.len(), 2);
        let keys: Vec<_> = options.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, ["outdir", "skip-otu"]);
    }

    #[test]
    fn apply_clears_flags_absent_from_loaded_set() {
        let mut form: ParameterSet = [
            ("threads", ParameterValue::from("1")),
            ("skip-otu", true.into()),
            ("invert-colors", true.into()),
        ]
        .into_iter()
        .collect();
        let loaded: ParameterSet = [
            ("threads", ParameterValue::from("4")),
            ("invert-colors", true.into()),
            ("colormap", "Set2".into()),
        ]
        .into_iter()
        .collect();

        form.apply(loaded);

        assert_eq!(form.text("threads"), Some("4"));
        assert_eq!(form.get("skip-otu"), Some(&ParameterValue::Flag(false)));
        assert_eq!(form.get("invert-colors"), Some(&ParameterValue::Flag(true)));
        assert_eq!(form.text("colormap"), Some("Set2"));
    }

    #[test]
    fn bare_key_on_text_option_is_an_empty_value() {
        let mut form: ParameterSet = [
            (USER, ParameterValue::from("me")),
            ("clip-r1-5-prime", "17".into()),
            ("skip-otu", false.into()),
        ]
        .into_iter()
        .collect();
        let loaded: ParameterSet = [
            (USER, ParameterValue::Flag(true)),
            ("clip-r1-5-prime", true.into()),
            ("skip-otu", true.into()),
            ("extra", true.into()),
        ]
        .into_iter()
        .collect();

        form.apply(loaded);

        assert_eq!(form.text(USER), Some(""));
        assert_eq!(form.text("clip-r1-5-prime"), Some(""));
        assert_eq!(form.get("skip-otu"), Some(&ParameterValue::Flag(true)));
        assert_eq!(form.get("extra"), Some(&ParameterValue::Flag(true)));
    }
}
