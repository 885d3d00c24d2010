use fxhash::FxHashMap;
use std::collections::HashMap;

/// The named constants an ad blocker declares for `!#if` conditions, e.g. `adguard` or
/// `adguard_ext_firefox`.
///
/// Only flags explicitly set to `true` are enabled. A missing flag is simply disabled, it is
/// never an error.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FlagSet {
    flags: FxHashMap<String, bool>,
}

impl FlagSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set<N: Into<String>>(&mut self, name: N, value: bool) -> &mut Self {
        self.flags.insert(name.into(), value);
        self
    }

    pub fn with<N: Into<String>>(mut self, name: N, value: bool) -> Self {
        self.set(name, value);
        self
    }

    pub fn get<N: AsRef<str>>(&self, name: N) -> Option<bool> {
        self.flags.get(name.as_ref()).copied()
    }

    pub fn is_enabled<N: AsRef<str>>(&self, name: N) -> bool {
        self.get(name) == Some(true)
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    pub fn len(&self) -> usize {
        self.flags.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.flags.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl<N: Into<String>> FromIterator<(N, bool)> for FlagSet {
    fn from_iter<I: IntoIterator<Item = (N, bool)>>(iter: I) -> Self {
        let mut ret = FlagSet::new();
        ret.extend(iter);
        ret
    }
}

impl<N: Into<String>> Extend<(N, bool)> for FlagSet {
    fn extend<I: IntoIterator<Item = (N, bool)>>(&mut self, iter: I) {
        for (name, value) in iter {
            self.set(name, value);
        }
    }
}

impl From<HashMap<String, bool>> for FlagSet {
    fn from(map: HashMap<String, bool>) -> Self {
        map.into_iter().collect()
    }
}

#[cfg(test)]
mod test {
    use super::FlagSet;
    use maplit::hashmap;

    #[test]
    fn only_true_is_enabled() {
        let flags = FlagSet::new().with("adguard", true).with("opera", false);
        assert!(flags.is_enabled("adguard"));
        assert!(!flags.is_enabled("opera"));
        assert!(!flags.is_enabled("missing"));
        assert_eq!(flags.get("opera"), Some(false));
        assert_eq!(flags.get("missing"), None);
    }

    #[test]
    fn from_map() {
        let flags = FlagSet::from(hashmap! {
            "adguard".to_string() => true,
            "adguard_ext_chromium".to_string() => true,
        });
        assert_eq!(flags.len(), 2);
        assert!(flags.is_enabled("adguard_ext_chromium"));
    }

    #[test]
    fn later_values_win() {
        let flags: FlagSet = [("a", true), ("a", false)].into_iter().collect();
        assert!(!flags.is_enabled("a"));
    }
}
