use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use regex::Regex;
use serde_yaml::Value;

fn flatten(prefix: &str, value: &Value, out: &mut BTreeSet<String>) {
    match value {
        Value::Mapping(map) => {
            for (k, v) in map {
                let Some(k) = k.as_str() else { continue };
                if k.starts_with('_') {
                    continue;
                }
                let key = if prefix.is_empty() {
                    k.to_string()
                } else {
                    format!("{prefix}.{k}")
                };
                flatten(&key, v, out);
            }
        }
        _ => {
            out.insert(prefix.to_string());
        }
    }
}

fn keys(locale: &str) -> BTreeSet<String> {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("locales")
        .join(format!("{locale}.yml"));
    let text = fs::read_to_string(&path).unwrap();
    let value: Value = serde_yaml::from_str(&text).unwrap();
    let mut out = BTreeSet::new();
    flatten("", &value, &mut out);
    out
}

fn placeholders(locale: &str, key: &str) -> BTreeSet<String> {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("locales")
        .join(format!("{locale}.yml"));
    let value: Value = serde_yaml::from_str(&fs::read_to_string(path).unwrap()).unwrap();
    let mut node = &value;
    for part in key.split('.') {
        node = &node[part];
    }
    let re = Regex::new(r"%\{(\w+)\}").unwrap();
    re.captures_iter(node.as_str().unwrap_or_default())
        .map(|c| c[1].to_string())
        .collect()
}

fn source_keys(dir: &Path, re: &Regex, out: &mut BTreeSet<String>) {
    for entry in fs::read_dir(dir).unwrap() {
        let path = entry.unwrap().path();
        if path.is_dir() {
            source_keys(&path, re, out);
        } else if path.extension().is_some_and(|e| e == "rs") {
            let text = fs::read_to_string(&path).unwrap();
            out.extend(re.captures_iter(&text).map(|c| c[1].to_string()));
        }
    }
}

#[test]
fn locales_share_the_same_keys() {
    let en = keys("en");
    let zh = keys("zh-CN");
    let missing: Vec<_> = en.difference(&zh).collect();
    let extra: Vec<_> = zh.difference(&en).collect();
    assert!(missing.is_empty(), "missing in zh-CN: {missing:?}");
    assert!(extra.is_empty(), "only in zh-CN: {extra:?}");
}

#[test]
fn translations_keep_their_placeholders() {
    for key in keys("en") {
        assert_eq!(
            placeholders("en", &key),
            placeholders("zh-CN", &key),
            "placeholder mismatch for {key}"
        );
    }
}

#[test]
fn every_key_used_in_source_exists() {
    let re = Regex::new(r#"\bt!\(\s*"([a-z_.\-]+)""#).unwrap();
    let mut used = BTreeSet::new();
    source_keys(&Path::new(env!("CARGO_MANIFEST_DIR")).join("src"), &re, &mut used);
    assert!(!used.is_empty());
    let en = keys("en");
    let unknown: Vec<_> = used.difference(&en).collect();
    assert!(unknown.is_empty(), "unknown locale keys: {unknown:?}");
}
