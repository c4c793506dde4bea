use regex::Regex;
use serde_json::{Map, Value};
use std::collections::VecDeque;
use std::sync::OnceLock;

pub const CONTAINER_KEYS: [&str; 7] = [
    "keyword_info",
    "keyword_properties",
    "info",
    "properties",
    "data",
    "metrics",
    "stats",
];

pub const MAX_DEPTH: usize = 8;

static WORD_PATTERN: OnceLock<Regex> = OnceLock::new();

fn split_words(key: &str) -> Vec<String> {
    let re = WORD_PATTERN
        .get_or_init(|| Regex::new(r"[A-Z]+[a-z0-9]*|[a-z0-9]+").expect("word pattern is valid"));
    re.find_iter(key)
        .map(|m| m.as_str().to_lowercase())
        .collect()
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Alternative spellings of `key`, excluding `key` itself.
pub fn case_variants(key: &str) -> Vec<String> {
    let words = split_words(key);
    let Some((head, tail)) = words.split_first() else {
        return Vec::new();
    };

    let camel = std::iter::once(head.clone())
        .chain(tail.iter().map(|w| capitalize(w)))
        .collect::<String>();
    let snake = words.join("_");
    let kebab = words.join("-");

    let mut variants: Vec<String> = Vec::with_capacity(3);
    for candidate in [camel, snake, kebab] {
        if candidate != key && !variants.contains(&candidate) {
            variants.push(candidate);
        }
    }
    variants
}

fn present(value: Option<&Value>) -> Option<&Value> {
    value.filter(|v| !v.is_null())
}

fn in_containers<'a>(map: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    CONTAINER_KEYS.iter().find_map(|container| {
        map.get(*container)
            .and_then(Value::as_object)
            .and_then(|inner| present(inner.get(key)))
    })
}

fn direct_or_variant<'a>(
    map: &'a Map<String, Value>,
    key: &str,
    variants: &[String],
) -> Option<&'a Value> {
    present(map.get(key)).or_else(|| variants.iter().find_map(|v| present(map.get(v))))
}

fn children<'a>(map: &'a Map<String, Value>) -> impl Iterator<Item = &'a Map<String, Value>> {
    let declared = CONTAINER_KEYS
        .iter()
        .filter_map(move |container| map.get(*container))
        .filter_map(Value::as_object);
    let others = map
        .iter()
        .filter(|(k, _)| !CONTAINER_KEYS.contains(&k.as_str()))
        .filter_map(|(_, v)| v.as_object());
    declared.chain(others)
}

fn breadth_first<'a>(
    root: &'a Map<String, Value>,
    key: &str,
    variants: &[String],
) -> Option<&'a Value> {
    let mut queue: VecDeque<(&Map<String, Value>, usize)> =
        children(root).map(|child| (child, 1)).collect();

    while let Some((node, depth)) = queue.pop_front() {
        if let Some(found) = direct_or_variant(node, key, variants) {
            return Some(found);
        }
        if depth < MAX_DEPTH {
            queue.extend(children(node).map(|child| (child, depth + 1)));
        }
    }
    None
}

/// Direct, then containers, then case variants, then breadth-first. `null` is absent.
pub fn resolve<'a>(obj: &'a Value, key: &str) -> Option<&'a Value> {
    let map = obj.as_object()?;

    if let Some(found) = present(map.get(key)).or_else(|| in_containers(map, key)) {
        return Some(found);
    }

    let variants = case_variants(key);
    for variant in &variants {
        if let Some(found) = present(map.get(variant)).or_else(|| in_containers(map, variant)) {
            return Some(found);
        }
    }

    breadth_first(map, key, &variants)
}

pub fn resolve_any<'a>(obj: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().find_map(|key| resolve(obj, key))
}

pub fn get_path<'a>(obj: &'a Value, path: &[&str]) -> Option<&'a Value> {
    let found = path
        .iter()
        .try_fold(obj, |current, segment| current.as_object()?.get(*segment))?;
    present(Some(found))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_case_variants() {
        assert_eq!(
            case_variants("search_volume"),
            vec!["searchVolume".to_string(), "search-volume".to_string()]
        );
        assert_eq!(
            case_variants("keywordDifficulty"),
            vec![
                "keyword_difficulty".to_string(),
                "keyword-difficulty".to_string()
            ]
        );
        assert!(case_variants("cpc").is_empty());
        assert!(case_variants("").is_empty());
    }

    #[test]
    fn test_direct_key_wins_over_container() {
        let item = json!({"cpc": 1.5, "keyword_info": {"cpc": 9.0}});
        assert_eq!(resolve(&item, "cpc"), Some(&json!(1.5)));
    }

    #[test]
    fn test_containers_follow_declared_order() {
        let item = json!({
            "stats": {"search_volume": 1},
            "keyword_info": {"search_volume": 2}
        });
        assert_eq!(resolve(&item, "search_volume"), Some(&json!(2)));
    }

    #[test]
    fn test_case_variant_lookup() {
        let item = json!({"metrics": {"searchVolume": 480}});
        assert_eq!(resolve(&item, "search_volume"), Some(&json!(480)));

        let kebab = json!({"competition-level": "LOW"});
        assert_eq!(resolve(&kebab, "competition_level"), Some(&json!("LOW")));
    }

    #[test]
    fn test_breadth_first_prefers_shallow_match() {
        let item = json!({
            "aaa": {"deeper": {"cpc": 3.0}},
            "zzz": {"cpc": 1.0}
        });
        assert_eq!(resolve(&item, "cpc"), Some(&json!(1.0)));
    }

    #[test]
    fn test_breadth_first_visits_containers_before_other_keys() {
        let item = json!({
            "aaa": {"inner": {"cpc": 3.0}},
            "data": {"inner": {"cpc": 7.0}}
        });
        assert_eq!(resolve(&item, "cpc"), Some(&json!(7.0)));
    }

    #[test]
    fn test_null_is_absent_and_arrays_are_skipped() {
        let item = json!({
            "cpc": null,
            "list": [{"cpc": 5.0}],
            "keyword_info": {"cpc": 2.0}
        });
        assert_eq!(resolve(&item, "cpc"), Some(&json!(2.0)));

        let only_array = json!({"list": [{"cpc": 5.0}]});
        assert_eq!(resolve(&only_array, "cpc"), None);
    }

    #[test]
    fn test_non_object_input_resolves_to_none() {
        assert_eq!(resolve(&json!(null), "keyword"), None);
        assert_eq!(resolve(&json!([1, 2]), "keyword"), None);
        assert_eq!(resolve(&json!("seo"), "keyword"), None);
    }

    #[test]
    fn test_depth_is_bounded() {
        let mut item = json!({"cpc": 4.0});
        for _ in 0..MAX_DEPTH + 1 {
            item = json!({ "nested": item });
        }
        assert_eq!(resolve(&item, "cpc"), None);

        let mut shallow = json!({"cpc": 4.0});
        for _ in 0..MAX_DEPTH {
            shallow = json!({ "nested": shallow });
        }
        assert_eq!(resolve(&shallow, "cpc"), Some(&json!(4.0)));
    }

    #[test]
    fn test_resolve_any_and_get_path() {
        let item = json!({"tags": ["tools"], "keyword_data": {"keyword_difficulty": 40}});
        assert_eq!(
            resolve_any(&item, &["categories", "category", "tags"]),
            Some(&json!(["tools"]))
        );
        assert_eq!(
            get_path(&item, &["keyword_data", "keyword_difficulty"]),
            Some(&json!(40))
        );
        assert_eq!(get_path(&item, &["keyword_data", "missing"]), None);
        assert_eq!(get_path(&item, &["tags", "0"]), None);
    }
}
