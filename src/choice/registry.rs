use std::collections::BTreeMap;

/// Named conditions, loaded once from configuration.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PredicateRegistry {
    formulas: BTreeMap<String, String>,
}

impl PredicateRegistry {
    pub fn new(formulas: BTreeMap<String, String>) -> Self {
        Self { formulas }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.formulas.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.formulas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.formulas.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for PredicateRegistry {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            formulas: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}
