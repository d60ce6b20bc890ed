//! Structural checks over generated text.
//!
//! These scan the finished documents rather than the renderer inputs, so
//! they catch disagreements between what a view binds to and what the
//! view-model actually declares.

use indexmap::IndexSet;
use regex::Regex;
use std::sync::OnceLock;

static BINDING: OnceLock<Regex> = OnceLock::new();
static PUBLIC_PROPERTY: OnceLock<Regex> = OnceLock::new();
static OBSERVABLE_FIELD: OnceLock<Regex> = OnceLock::new();
static TAG: OnceLock<Regex> = OnceLock::new();
static MEMBER: OnceLock<Regex> = OnceLock::new();

fn binding_regex() -> &'static Regex {
    BINDING.get_or_init(|| Regex::new(r"\{Binding\s+(?:Path=)?([A-Za-z_]\w*)").expect("binding regex"))
}

fn public_property_regex() -> &'static Regex {
    PUBLIC_PROPERTY
        .get_or_init(|| Regex::new(r"public\s+[^(){};=:]+?\s+(\w+)\s*(?:\{|=>)").expect("property regex"))
}

fn observable_field_regex() -> &'static Regex {
    OBSERVABLE_FIELD.get_or_init(|| {
        Regex::new(r"\[ObservableProperty\]\s*private\s+[^;=]+?\s+(\w+)\s*[=;]").expect("observable field regex")
    })
}

fn tag_regex() -> &'static Regex {
    TAG.get_or_init(|| {
        Regex::new(r#"<(/?)([A-Za-z_][\w:.]*)(?:[^>"]|"[^"]*")*?(/?)>"#).expect("tag regex")
    })
}

fn member_regex() -> &'static Regex {
    MEMBER.get_or_init(|| {
        Regex::new(r"(?m)^[ \t]*(?:public|private|protected|internal)\s+[\w.<>?, ]+?\s+(\w+)\s*(?:=>|[=;{(])")
            .expect("member regex")
    })
}

/// Root member of every `{Binding ...}` path, in first-seen order.
pub fn binding_paths(markup: &str) -> IndexSet<String> {
    binding_regex()
        .captures_iter(markup)
        .map(|c| c[1].to_string())
        .collect()
}

/// Public properties declared in a source document, including ones a
/// source generator synthesizes from `[ObservableProperty]` fields.
pub fn declared_members(source: &str) -> IndexSet<String> {
    let mut members: IndexSet<String> = public_property_regex()
        .captures_iter(source)
        .map(|c| c[1].to_string())
        .collect();
    for capture in observable_field_regex().captures_iter(source) {
        members.insert(generated_property_name(&capture[1]));
    }
    members
}

fn generated_property_name(field: &str) -> String {
    let trimmed = field.trim_start_matches('_');
    let mut chars = trimmed.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Member names a source document declares more than once, counting the
/// properties `[ObservableProperty]` fields generate and the implicit `Item`
/// of a public indexer. Overloaded methods are reported too, which the
/// generated classes never declare.
pub fn duplicate_members(source: &str) -> Vec<String> {
    let mut names: Vec<String> = member_regex()
        .captures_iter(source)
        .map(|c| c[1].to_string())
        .collect();
    names.extend(
        observable_field_regex()
            .captures_iter(source)
            .map(|c| generated_property_name(&c[1])),
    );
    if source.contains("public string this[") {
        names.push("Item".to_string());
    }

    let mut seen = IndexSet::new();
    let mut duplicates = IndexSet::new();
    for name in names {
        if !seen.insert(name.clone()) {
            duplicates.insert(name);
        }
    }
    duplicates.into_iter().collect()
}

/// Binding roots the view uses that neither the view-model nor the item
/// type declares.
pub fn dangling_bindings(view: &str, view_model: &str, item_members: &[&str]) -> Vec<String> {
    let declared = declared_members(view_model);
    binding_paths(view)
        .into_iter()
        .filter(|path| !declared.contains(path) && !item_members.contains(&path.as_str()))
        .collect()
}

/// Whether braces balance, ignoring string and character literals.
pub fn braces_balanced(source: &str) -> bool {
    let mut depth: i64 = 0;
    let mut chars = source.chars();
    while let Some(c) = chars.next() {
        match c {
            '"' | '\'' => {
                while let Some(inner) = chars.next() {
                    if inner == '\\' {
                        chars.next();
                    } else if inner == c {
                        break;
                    }
                }
            }
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth < 0 {
                    return false;
                }
            }
            _ => {}
        }
    }
    depth == 0
}

/// Whether every opened tag is closed in order and exactly one root exists.
pub fn markup_well_formed(markup: &str) -> bool {
    let mut stack: Vec<&str> = Vec::new();
    let mut roots = 0;
    for capture in tag_regex().captures_iter(markup) {
        let closing = !capture[1].is_empty();
        let self_closing = !capture[3].is_empty();
        let name = match capture.get(2) {
            Some(m) => m.as_str(),
            None => return false,
        };

        if stack.is_empty() && !closing {
            roots += 1;
        }
        if closing {
            if stack.pop() != Some(name) {
                return false;
            }
        } else if !self_closing {
            stack.push(name);
        }
    }
    stack.is_empty() && roots == 1
}
