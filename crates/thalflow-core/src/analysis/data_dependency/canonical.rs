use super::DependencyMap;
use crate::values::Value;

/// Projects an SSA-keyed closure onto declared variables. Entries whose keys
/// canonicalize to the same variable are merged.
///
/// Only meaningful on a closed map: merging versions first would connect
/// definitions that never flow into each other.
pub fn canonicalize(closure: &DependencyMap) -> DependencyMap {
    let mut canonical = DependencyMap::new();
    for (key, values) in closure {
        canonical
            .entry(key.canonical())
            .or_default()
            .extend(values.iter().map(Value::canonical));
    }
    canonical
}
