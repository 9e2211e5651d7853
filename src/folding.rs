//! Key folding and path expansion.
//!
//! Key folding collapses chains of single-member objects into one dotted key
//! before encoding:
//!
//! ```text
//! {"server": {"http": {"port": 8080}}}   =>   {"server.http.port": 8080}
//! ```
//!
//! Path expansion is the inverse and runs after decoding. Both are pure
//! transforms over [`Value`] and never touch the wire layout.
//!
//! Only keys whose segments are identifiers (`[A-Za-z_][A-Za-z0-9_]*`) take
//! part. Expansion does not know which dotted keys came from folding: a
//! literal key such as `"version.major"` written by the caller is expanded
//! into `{"version": {"major": ...}}` as well.
//!
//! Expansion deepens the tree, so it enforces the decoder's `max_depth` on the
//! result and fails with [`Error::DepthLimitExceeded`] instead of building
//! nesting the codec would refuse.
//!
//! ## Examples
//!
//! ```rust
//! use toon_binary::folding::{expand_paths, fold_keys, FoldConfig};
//! use toon_binary::{toon, DecodeOptions, KeyFolding, PathExpansion};
//!
//! let value = toon!({ "a": { "b": { "c": 1 } }, "d": 2 });
//!
//! let folded = fold_keys(value.clone(), &FoldConfig::new(KeyFolding::Safe));
//! assert_eq!(folded, toon!({ "a.b.c": 1, "d": 2 }));
//!
//! let options = DecodeOptions::new().with_expand_paths(PathExpansion::Safe);
//! let expanded = expand_paths(folded, &options).unwrap();
//! assert_eq!(expanded, value);
//! ```

use crate::{
    DecodeOptions, EncodeOptions, Error, KeyFolding, PathExpansion, Result, ToonMap, Value,
};
use std::collections::HashSet;

/// Settings for [`fold_keys`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct FoldConfig {
    pub mode: KeyFolding,
    /// Maximum segments in one folded key; `None` means unbounded.
    pub flatten_depth: Option<usize>,
}

impl FoldConfig {
    #[must_use]
    pub fn new(mode: KeyFolding) -> Self {
        FoldConfig {
            mode,
            flatten_depth: None,
        }
    }

    #[must_use]
    pub fn with_flatten_depth(mut self, depth: usize) -> Self {
        self.flatten_depth = Some(depth);
        self
    }

    /// Segment limit, or `None` when folding is disabled.
    fn limit(&self) -> Option<usize> {
        match (self.mode, self.flatten_depth) {
            (KeyFolding::Off, _) => None,
            (KeyFolding::Safe, Some(depth)) if depth < 2 => None,
            (KeyFolding::Safe, depth) => Some(depth.unwrap_or(usize::MAX)),
        }
    }
}

impl From<&EncodeOptions> for FoldConfig {
    fn from(options: &EncodeOptions) -> Self {
        FoldConfig {
            mode: options.key_folding,
            flatten_depth: options.flatten_depth,
        }
    }
}

/// Returns `true` if `segment` matches `[A-Za-z_][A-Za-z0-9_]*`.
#[must_use]
pub fn is_identifier(segment: &str) -> bool {
    let mut chars = segment.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

fn is_expandable(key: &str) -> bool {
    key.contains('.') && key.split('.').all(is_identifier)
}

/// Collapses single-member object chains into dotted keys.
///
/// A chain stops at the first non-identifier segment, at a value that is not
/// a single-member object, or at `flatten_depth` segments. A fold whose key
/// would collide with a sibling is skipped. Arrays are traversed.
#[must_use]
pub fn fold_keys(value: Value, config: &FoldConfig) -> Value {
    match config.limit() {
        Some(limit) => fold_value(value, limit),
        None => value,
    }
}

fn fold_value(value: Value, limit: usize) -> Value {
    match value {
        Value::Array(items) => Value::Array(
            items
                .into_iter()
                .map(|item| fold_value(item, limit))
                .collect(),
        ),
        Value::Object(members) => Value::Object(fold_object(members, limit)),
        other => other,
    }
}

fn fold_object(members: ToonMap, limit: usize) -> ToonMap {
    let siblings: HashSet<String> = members.keys().cloned().collect();
    let mut folded = ToonMap::with_capacity(members.len());

    for (key, value) in members {
        let segments = chain_segments(&key, &value, limit);
        let dotted = segments.join(".");
        let depth = segments.len();

        if depth < 2 || siblings.contains(&dotted) || folded.contains_key(&dotted) {
            folded.insert(key, fold_value(value, limit));
            continue;
        }

        let mut tail = value;
        for _ in 1..depth {
            tail = into_only_member(tail);
        }
        folded.insert(dotted, fold_value(tail, limit));
    }

    folded
}

/// Segments of the longest foldable chain starting at `key`.
fn chain_segments(key: &str, value: &Value, limit: usize) -> Vec<String> {
    if !is_identifier(key) {
        return vec![key.to_string()];
    }

    let mut segments = vec![key.to_string()];
    let mut current = value;
    while segments.len() < limit {
        let (next_key, next_value) = match current {
            Value::Object(obj) if obj.len() == 1 => match obj.iter().next() {
                Some(member) => member,
                None => break,
            },
            _ => break,
        };
        if !is_identifier(next_key) {
            break;
        }
        segments.push(next_key.clone());
        current = next_value;
    }
    segments
}

fn into_only_member(value: Value) -> Value {
    match value {
        Value::Object(obj) if obj.len() == 1 => match obj.into_iter().next() {
            Some((_, inner)) => inner,
            None => Value::Null,
        },
        other => other,
    }
}

/// Splits dotted keys back into nested objects.
///
/// Runs only when `options.expand_paths` is [`PathExpansion::Safe`]. Values
/// are expanded bottom-up, then each dotted key with identifier segments is
/// deep-merged into its siblings in order. Keys holding any other segment
/// stay as they are. When a path runs into an existing non-object value,
/// strict mode fails with [`Error::PathConflict`] and lenient mode lets the
/// later entry win.
///
/// # Errors
///
/// Besides path conflicts, fails with [`Error::DepthLimitExceeded`] when the
/// expanded tree would nest deeper than `options.max_depth`. The tree has no
/// byte offsets at this point, so the error reports offset 0.
///
/// # Examples
///
/// ```rust
/// use toon_binary::folding::expand_paths;
/// use toon_binary::{toon, DecodeOptions, Error, PathExpansion};
///
/// let strict = DecodeOptions::new().with_expand_paths(PathExpansion::Safe);
/// let lenient = strict.clone().with_strict(false);
///
/// let merged = expand_paths(toon!({ "a.b": 1, "a.c": 2 }), &strict).unwrap();
/// assert_eq!(merged, toon!({ "a": { "b": 1, "c": 2 } }));
///
/// let conflict = toon!({ "a": 1, "a.b": 2 });
/// assert!(matches!(
///     expand_paths(conflict.clone(), &strict),
///     Err(Error::PathConflict { .. })
/// ));
/// assert_eq!(
///     expand_paths(conflict, &lenient).unwrap(),
///     toon!({ "a": { "b": 2 } })
/// );
/// ```
pub fn expand_paths(value: Value, options: &DecodeOptions) -> Result<Value> {
    match options.expand_paths {
        PathExpansion::Off => Ok(value),
        PathExpansion::Safe => {
            let expander = Expander {
                strict: options.strict,
                max_depth: options.max_depth,
            };
            expander.expand_value(value, 0)
        }
    }
}

struct Expander {
    strict: bool,
    max_depth: usize,
}

impl Expander {
    fn too_deep(&self) -> Error {
        Error::DepthLimitExceeded {
            offset: 0,
            limit: self.max_depth,
        }
    }

    /// Expands `value`, which sits inside `depth` containers.
    fn expand_value(&self, value: Value, depth: usize) -> Result<Value> {
        match value {
            Value::Array(items) => {
                if depth >= self.max_depth {
                    return Err(self.too_deep());
                }
                items
                    .into_iter()
                    .map(|item| self.expand_value(item, depth + 1))
                    .collect::<Result<Vec<_>>>()
                    .map(Value::Array)
            }
            Value::Object(members) => {
                if depth >= self.max_depth {
                    return Err(self.too_deep());
                }
                self.expand_object(members, depth + 1).map(Value::Object)
            }
            other => Ok(other),
        }
    }

    /// Expands the members of an object whose values sit at `depth`.
    fn expand_object(&self, members: ToonMap, depth: usize) -> Result<ToonMap> {
        let mut expanded = ToonMap::with_capacity(members.len());
        for (key, value) in members {
            let value = self.expand_value(value, depth)?;
            if is_expandable(&key) {
                let segments: Vec<&str> = key.split('.').collect();
                // Each segment after the first adds one object level.
                let nesting = depth + segments.len() - 1 + height(&value);
                if nesting > self.max_depth {
                    return Err(self.too_deep());
                }
                self.insert_path(&mut expanded, &segments, value)?;
            } else {
                self.merge_member(&mut expanded, key.clone(), value, key)?;
            }
        }
        Ok(expanded)
    }

    fn insert_path(&self, target: &mut ToonMap, segments: &[&str], value: Value) -> Result<()> {
        let (last, parents) = match segments.split_last() {
            Some(split) => split,
            None => return Ok(()),
        };

        let mut current = target;
        let mut path = String::new();
        for segment in parents {
            path = join_path(&path, segment);
            if !matches!(current.get(segment), Some(Value::Object(_))) {
                if self.strict && current.contains_key(segment) {
                    return Err(Error::PathConflict { path });
                }
                current.insert((*segment).to_string(), Value::Object(ToonMap::new()));
            }
            current = match current.get_mut(segment) {
                Some(Value::Object(child)) => child,
                _ => return Err(Error::PathConflict { path }),
            };
        }

        let path = join_path(&path, last);
        self.merge_member(current, (*last).to_string(), value, path)
    }

    /// Inserts `key`, deep-merging when both sides are objects.
    fn merge_member(
        &self,
        target: &mut ToonMap,
        key: String,
        value: Value,
        path: String,
    ) -> Result<()> {
        let slot = match target.get_mut(&key) {
            Some(slot) => slot,
            None => {
                target.insert(key, value);
                return Ok(());
            }
        };

        match (slot, value) {
            (Value::Object(existing), Value::Object(incoming)) => {
                for (child_key, child_value) in incoming {
                    let child_path = join_path(&path, &child_key);
                    self.merge_member(existing, child_key, child_value, child_path)?;
                }
                Ok(())
            }
            _ if self.strict => Err(Error::PathConflict { path }),
            (slot, value) => {
                *slot = value;
                Ok(())
            }
        }
    }
}

/// Container levels in `value`: 0 for primitives, 1 for `{}` or `[]`.
fn height(value: &Value) -> usize {
    match value {
        Value::Array(items) => 1 + items.iter().map(height).max().unwrap_or(0),
        Value::Object(members) => 1 + members.values().map(height).max().unwrap_or(0),
        _ => 0,
    }
}

fn join_path(prefix: &str, segment: &str) -> String {
    if prefix.is_empty() {
        segment.to_string()
    } else {
        format!("{}.{}", prefix, segment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::toon;

    fn safe() -> FoldConfig {
        FoldConfig::new(KeyFolding::Safe)
    }

    fn expand(value: Value, strict: bool) -> Result<Value> {
        let options = DecodeOptions::new()
            .with_expand_paths(PathExpansion::Safe)
            .with_strict(strict);
        expand_paths(value, &options)
    }

    #[test]
    fn test_identifier() {
        assert!(is_identifier("a"));
        assert!(is_identifier("_private9"));
        assert!(!is_identifier(""));
        assert!(!is_identifier("9lives"));
        assert!(!is_identifier("with-dash"));
        assert!(!is_identifier("dotted.key"));
        assert!(!is_identifier("café"));
    }

    #[test]
    fn test_off_is_identity() {
        let value = toon!({ "a": { "b": 1 } });
        assert_eq!(fold_keys(value.clone(), &FoldConfig::default()), value);
        assert_eq!(
            expand_paths(toon!({ "a.b": 1 }), &DecodeOptions::default()).unwrap(),
            toon!({ "a.b": 1 })
        );
    }

    #[test]
    fn test_fold_stops_at_multi_member_object() {
        let value = toon!({ "a": { "b": { "x": 1, "y": 2 } } });
        assert_eq!(
            fold_keys(value, &safe()),
            toon!({ "a.b": { "x": 1, "y": 2 } })
        );
    }

    #[test]
    fn test_fold_stops_at_non_identifier() {
        let value = toon!({ "a": { "b-c": { "d": 1 } } });
        assert_eq!(fold_keys(value.clone(), &safe()), value);

        let value = toon!({ "a": { "b": { "c d": 1 } } });
        assert_eq!(
            fold_keys(value, &safe()),
            toon!({ "a.b": { "c d": 1 } })
        );
    }

    #[test]
    fn test_fold_skips_sibling_collision() {
        let value = toon!({ "a": { "b": 1 }, "a.b": 2 });
        assert_eq!(fold_keys(value.clone(), &safe()), value);
    }

    #[test]
    fn test_flatten_depth_bound() {
        let value = toon!({ "a": { "b": { "c": { "d": 1 } } } });

        let two = safe().with_flatten_depth(2);
        assert_eq!(
            fold_keys(value.clone(), &two),
            toon!({ "a.b": { "c.d": 1 } })
        );

        let three = safe().with_flatten_depth(3);
        assert_eq!(
            fold_keys(value.clone(), &three),
            toon!({ "a.b.c": { "d": 1 } })
        );

        let one = safe().with_flatten_depth(1);
        assert_eq!(fold_keys(value, &one), toon!({ "a": { "b": { "c": { "d": 1 } } } }));
    }

    #[test]
    fn test_fold_traverses_arrays() {
        let value = toon!([{ "a": { "b": 1 } }, 2]);
        assert_eq!(fold_keys(value, &safe()), toon!([{ "a.b": 1 }, 2]));
    }

    #[test]
    fn test_fold_keeps_empty_object_tail() {
        let value = toon!({ "a": { "b": {} } });
        let folded = fold_keys(value.clone(), &safe());
        assert_eq!(folded, toon!({ "a.b": {} }));
        assert_eq!(expand(folded, true).unwrap(), value);
    }

    #[test]
    fn test_expand_leaves_non_identifier_paths() {
        let value = toon!({ "a.b-c": 1, "1.2": 2, "plain": 3 });
        assert_eq!(
            expand(value.clone(), true).unwrap(),
            value
        );
    }

    #[test]
    fn test_expand_deep_merges_in_order() {
        let value = toon!({ "a.b.c": 1, "x": 0, "a.b.d": 2, "a": { "e": 3 } });
        assert_eq!(
            expand(value, true).unwrap(),
            toon!({ "a": { "b": { "c": 1, "d": 2 }, "e": 3 }, "x": 0 })
        );
    }

    #[test]
    fn test_expand_nested_values() {
        let value = toon!({ "list": [{ "p.q": true }] });
        assert_eq!(
            expand(value, true).unwrap(),
            toon!({ "list": [{ "p": { "q": true } }] })
        );
    }

    #[test]
    fn test_expand_conflicts() {
        let value = toon!({ "a.b": 1, "a.b.c": 2 });
        assert_eq!(
            expand(value.clone(), true),
            Err(Error::PathConflict {
                path: "a.b".to_string()
            })
        );
        assert_eq!(
            expand(value, false).unwrap(),
            toon!({ "a": { "b": { "c": 2 } } })
        );

        let value = toon!({ "a.b": 1, "a": 2 });
        assert_eq!(
            expand(value.clone(), true),
            Err(Error::PathConflict {
                path: "a".to_string()
            })
        );
        assert_eq!(
            expand(value, false).unwrap(),
            toon!({ "a": 2 })
        );
    }

    #[test]
    fn test_fold_then_expand_roundtrip() {
        let value = toon!({
            "server": { "http": { "port": 8080 } },
            "name": "svc",
            "tags": [{ "k": { "v": 1 } }],
            "odd key": { "x": { "y": null } }
        });
        let folded = fold_keys(value.clone(), &safe());
        assert_eq!(
            folded.as_object().unwrap().keys().cloned().collect::<Vec<_>>(),
            vec!["server.http.port", "name", "tags", "odd key"]
        );
        assert_eq!(expand(folded, true).unwrap(), value);
    }

    fn dotted(segments: usize) -> String {
        vec!["a"; segments].join(".")
    }

    #[test]
    fn test_expand_respects_max_depth() {
        let mut members = ToonMap::new();
        members.insert(dotted(128), Value::Null);
        let expanded = expand(Value::Object(members), true).unwrap();

        let mut depth = 0;
        let mut current = &expanded;
        while let Some(members) = current.as_object() {
            depth += 1;
            current = members.get("a").unwrap();
        }
        assert_eq!(depth, 128);
        assert_eq!(current, &Value::Null);

        let mut members = ToonMap::new();
        members.insert(dotted(129), Value::Null);
        assert_eq!(
            expand(Value::Object(members), true),
            Err(Error::DepthLimitExceeded {
                offset: 0,
                limit: 128
            })
        );
    }

    #[test]
    fn test_expand_huge_path_fails_without_overflow() {
        let mut members = ToonMap::new();
        members.insert(dotted(500_000), Value::Null);
        assert!(matches!(
            expand(Value::Object(members), false),
            Err(Error::DepthLimitExceeded { limit: 128, .. })
        ));
    }

    #[test]
    fn test_expand_counts_value_height() {
        let options = DecodeOptions::new()
            .with_expand_paths(PathExpansion::Safe)
            .with_max_depth(4);

        // outer object + a + b + [ + {} = 5 levels
        let value = toon!({ "a.b.c": [{}] });
        assert!(matches!(
            expand_paths(value, &options),
            Err(Error::DepthLimitExceeded { limit: 4, .. })
        ));

        let value = toon!({ "a.b.c": [1] });
        assert_eq!(
            expand_paths(value, &options).unwrap(),
            toon!({ "a": { "b": { "c": [1] } } })
        );

        // Containers deeper than the limit fail even without dotted keys.
        let value = toon!([[[[[1]]]]]);
        assert!(matches!(
            expand_paths(value, &options),
            Err(Error::DepthLimitExceeded { limit: 4, .. })
        ));
    }

    #[test]
    fn test_height() {
        assert_eq!(height(&Value::Null), 0);
        assert_eq!(height(&toon!({})), 1);
        assert_eq!(height(&toon!([1, [2, { "a": [] }]])), 4);
    }
}
