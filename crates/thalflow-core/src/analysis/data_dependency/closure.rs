use super::DependencyMap;
use indexmap::{IndexMap, IndexSet};
use std::collections::{HashSet, VecDeque};
use std::hash::Hash;
use tracing::trace;

/// Transitive closure of a direct dependency map.
///
/// `C[v]` holds `D[v]` plus every value reachable from `v` through keys of
/// `D`, except `v` itself: a value only depends on itself when `D[v]` says so
/// directly. Values that are not keys of `direct` do not become keys.
///
/// Worklist over a reverse index: popping `n` pushes `C[n]` into every key
/// whose closure contains `n`. Newly reached keys are queued so their own
/// closure flows back. Pop order does not affect the result.
pub fn transitive_closure<V>(direct: &DependencyMap<V>) -> DependencyMap<V>
where
    V: Clone + Eq + Hash,
{
    let mut closure = direct.clone();

    let mut dependents: IndexMap<V, IndexSet<V>> = IndexMap::new();
    for (key, values) in &closure {
        for value in values {
            dependents
                .entry(value.clone())
                .or_default()
                .insert(key.clone());
        }
    }

    let mut worklist: VecDeque<V> = closure.keys().cloned().collect();
    let mut queued: HashSet<V> = closure.keys().cloned().collect();
    let mut pops = 0usize;

    while let Some(node) = worklist.pop_front() {
        queued.remove(&node);
        pops += 1;

        let Some(reached) = closure.get(&node).cloned() else {
            continue;
        };
        let Some(targets) = dependents.get(&node).cloned() else {
            continue;
        };

        for target in targets {
            let mut grew = false;
            for value in &reached {
                if *value == target {
                    continue;
                }
                let Some(entry) = closure.get_mut(&target) else {
                    continue;
                };
                if entry.insert(value.clone()) {
                    grew = true;
                    dependents
                        .entry(value.clone())
                        .or_default()
                        .insert(target.clone());
                    if direct.contains_key(value) && queued.insert(value.clone()) {
                        worklist.push_back(value.clone());
                    }
                }
            }
            if grew && queued.insert(target.clone()) {
                worklist.push_back(target);
            }
        }
    }

    trace!(keys = closure.len(), pops, "transitive closure computed");
    closure
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    type Graph = DependencyMap<u32>;

    fn set(values: &[u32]) -> IndexSet<u32> {
        values.iter().copied().collect()
    }

    fn graph(edges: &[(u32, &[u32])]) -> Graph {
        edges
            .iter()
            .map(|(k, vs)| (*k, vs.iter().copied().collect()))
            .collect()
    }

    /// Re-scan every key until a full pass adds nothing.
    fn naive(direct: &Graph) -> Graph {
        let mut closure = direct.clone();
        loop {
            let mut changed = false;
            let snapshot = closure.clone();
            for (key, items) in &snapshot {
                for item in items {
                    let Some(additional) = closure.get(item).cloned() else {
                        continue;
                    };
                    for extra in additional {
                        if !items.contains(&extra) && extra != *key {
                            if let Some(entry) = closure.get_mut(key) {
                                changed |= entry.insert(extra);
                            }
                        }
                    }
                }
            }
            if !changed {
                return closure;
            }
        }
    }

    /// Warshall over the keys, dropping the row's own key on every union.
    fn warshall(direct: &Graph) -> Graph {
        let mut closure = direct.clone();
        let keys: Vec<u32> = closure.keys().copied().collect();
        for k in &keys {
            let via = closure[k].clone();
            for i in &keys {
                if i != k && closure[i].contains(k) {
                    let row = &mut closure[i];
                    row.extend(via.iter().copied().filter(|v| v != i));
                }
            }
        }
        closure
    }

    /// Depth-first reachability from each key.
    fn per_node_dfs(direct: &Graph) -> Graph {
        direct
            .iter()
            .map(|(start, edges)| {
                let mut visited: IndexSet<u32> = IndexSet::new();
                let mut stack: Vec<u32> = edges.iter().copied().collect();
                while let Some(node) = stack.pop() {
                    if visited.insert(node) {
                        if let Some(next) = direct.get(&node) {
                            stack.extend(next.iter().copied());
                        }
                    }
                }
                let mut reached: IndexSet<u32> = edges.clone();
                reached.extend(visited.into_iter().filter(|v| v != start));
                (*start, reached)
            })
            .collect()
    }

    fn assert_all_agree(direct: &Graph) {
        let expected = naive(direct);
        assert_eq!(warshall(direct), expected, "warshall");
        assert_eq!(per_node_dfs(direct), expected, "dfs");
        assert_eq!(transitive_closure(direct), expected, "worklist");
    }

    #[test]
    fn test_empty_graph() {
        let direct = Graph::new();
        assert_all_agree(&direct);
        assert!(transitive_closure(&direct).is_empty());
    }

    #[test]
    fn test_single_node_without_edges() {
        let direct = graph(&[(1, &[])]);
        assert_all_agree(&direct);
        assert_eq!(transitive_closure(&direct), direct);
    }

    #[test]
    fn test_single_edge() {
        let direct = graph(&[(1, &[2])]);
        assert_all_agree(&direct);
        assert_eq!(transitive_closure(&direct), direct);
    }

    #[test]
    fn test_chain() {
        let direct = graph(&[(1, &[2]), (2, &[3]), (3, &[4])]);
        assert_all_agree(&direct);
        assert_eq!(
            transitive_closure(&direct),
            graph(&[(1, &[2, 3, 4]), (2, &[3, 4]), (3, &[4])])
        );
    }

    #[test]
    fn test_diamond() {
        let direct = graph(&[(1, &[2, 3]), (2, &[4]), (3, &[4]), (4, &[5])]);
        assert_all_agree(&direct);
        assert_eq!(transitive_closure(&direct)[&1], set(&[2, 3, 4, 5]));
    }

    #[test]
    fn test_two_cycle() {
        let direct = graph(&[(1, &[2]), (2, &[1])]);
        assert_all_agree(&direct);
        assert_eq!(transitive_closure(&direct), direct);
    }

    #[test]
    fn test_three_cycle_saturates() {
        let direct = graph(&[(1, &[2]), (2, &[3]), (3, &[1])]);
        assert_all_agree(&direct);
        assert_eq!(
            transitive_closure(&direct),
            graph(&[(1, &[2, 3]), (2, &[3, 1]), (3, &[1, 2])])
        );
    }

    #[test]
    fn test_self_loop_is_kept() {
        let direct = graph(&[(1, &[1, 2]), (2, &[3])]);
        assert_all_agree(&direct);
        let closure = transitive_closure(&direct);
        assert_eq!(closure[&1], set(&[1, 2, 3]));
        assert!(!closure[&2].contains(&2));
    }

    #[test]
    fn test_disconnected_components() {
        let direct = graph(&[(1, &[2]), (2, &[3]), (10, &[11]), (11, &[12])]);
        assert_all_agree(&direct);
        let closure = transitive_closure(&direct);
        assert_eq!(closure[&1], set(&[2, 3]));
        assert_eq!(closure[&10], set(&[11, 12]));
    }

    #[test]
    fn test_multi_parent() {
        let direct = graph(&[(1, &[3]), (2, &[3]), (3, &[4, 5])]);
        assert_all_agree(&direct);
        let closure = transitive_closure(&direct);
        assert_eq!(closure[&1], set(&[3, 4, 5]));
        assert_eq!(closure[&2], set(&[3, 4, 5]));
    }

    #[test]
    fn test_edges_to_absent_keys() {
        let direct = graph(&[(1, &[2, 7]), (2, &[8])]);
        assert_all_agree(&direct);
        let closure = transitive_closure(&direct);
        assert_eq!(closure.len(), 2);
        assert_eq!(closure[&1], set(&[2, 7, 8]));
        assert!(!closure.contains_key(&7));
    }

    #[test]
    fn test_cycle_feeding_a_tail() {
        let direct = graph(&[(1, &[2]), (2, &[1, 3]), (3, &[4]), (5, &[1])]);
        assert_all_agree(&direct);
        let closure = transitive_closure(&direct);
        assert_eq!(closure[&5], set(&[1, 2, 3, 4]));
        assert_eq!(closure[&1], set(&[2, 3, 4]));
    }

    fn arbitrary_graph() -> impl Strategy<Value = Graph> {
        prop::collection::vec(
            (0u32..12, prop::collection::vec(0u32..14, 0..5)),
            0..12,
        )
        .prop_map(|entries| {
            let mut direct = Graph::new();
            for (key, values) in entries {
                direct.entry(key).or_default().extend(values);
            }
            direct
        })
    }

    fn acyclic_graph() -> impl Strategy<Value = Graph> {
        prop::collection::vec(
            (0u32..12, prop::collection::vec(0u32..14, 0..5)),
            0..12,
        )
        .prop_map(|entries| {
            let mut direct = Graph::new();
            for (key, values) in entries {
                direct
                    .entry(key)
                    .or_default()
                    .extend(values.into_iter().filter(|v| *v > key));
            }
            direct
        })
    }

    proptest! {
        #[test]
        fn prop_all_algorithms_agree(direct in arbitrary_graph()) {
            let expected = naive(&direct);
            prop_assert_eq!(&warshall(&direct), &expected);
            prop_assert_eq!(&per_node_dfs(&direct), &expected);
            prop_assert_eq!(&transitive_closure(&direct), &expected);
        }

        #[test]
        fn prop_closure_is_idempotent(direct in arbitrary_graph()) {
            let once = transitive_closure(&direct);
            prop_assert_eq!(transitive_closure(&once), once);
        }

        #[test]
        fn prop_acyclic_graphs_never_self_depend(direct in acyclic_graph()) {
            let closure = transitive_closure(&direct);
            for (key, values) in &closure {
                prop_assert!(!values.contains(key));
            }
        }
    }
}
