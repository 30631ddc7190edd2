//! String inflections used to derive resource names.
//!
//! Covers the regular English plural rules plus a short irregular and
//! uncountable list. Multi-word CamelCase names only inflect their last word,
//! so `StrangeRabbits` singularizes to `StrangeRabbit`.

const UNCOUNTABLE: &[&str] = &[
    "equipment",
    "information",
    "rice",
    "money",
    "species",
    "series",
    "fish",
    "sheep",
    "news",
    "data",
];

const IRREGULAR: &[(&str, &str)] = &[
    ("person", "people"),
    ("man", "men"),
    ("woman", "women"),
    ("child", "children"),
    ("mouse", "mice"),
    ("goose", "geese"),
    ("ox", "oxen"),
    ("foot", "feet"),
    ("tooth", "teeth"),
];

/// `StrangeRabbit` -> `strange_rabbit`, `HTMLPage` -> `html_page`.
pub fn underscore(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut result = String::with_capacity(s.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if c == '-' || c == ' ' {
            result.push('_');
            continue;
        }
        if c.is_uppercase() {
            if i > 0 {
                let prev = chars[i - 1];
                let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
                if prev.is_lowercase()
                    || prev.is_ascii_digit()
                    || (prev.is_uppercase() && next_is_lower)
                {
                    result.push('_');
                }
            }
            result.extend(c.to_lowercase());
        } else {
            result.push(c);
        }
    }
    result
}

/// `strange_rabbit` -> `StrangeRabbit`.
pub fn camelize(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut capitalize_next = true;
    for c in s.chars() {
        if c == '_' || c == '-' || c == ' ' {
            capitalize_next = true;
        } else if capitalize_next {
            result.extend(c.to_uppercase());
            capitalize_next = false;
        } else {
            result.push(c);
        }
    }
    result
}

/// `strange_rabbit` -> `Strange rabbit`, `site_id` -> `Site`.
pub fn humanize(s: &str) -> String {
    let underscored = underscore(s);
    let trimmed = underscored.strip_suffix("_id").unwrap_or(&underscored);
    let spaced = trimmed.replace('_', " ");
    let mut chars = spaced.trim().chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// `strange_rabbit` -> `strange-rabbit`.
pub fn dasherize(s: &str) -> String {
    s.replace('_', "-")
}

/// Pluralizes the last word of `s`, preserving its case.
pub fn pluralize(s: &str) -> String {
    inflect_last_word(s, pluralize_word)
}

/// Singularizes the last word of `s`, preserving its case.
pub fn singularize(s: &str) -> String {
    inflect_last_word(s, singularize_word)
}

fn inflect_last_word(s: &str, f: fn(&str) -> String) -> String {
    let split = last_word_start(s);
    let (head, word) = s.split_at(split);
    if word.is_empty() {
        return s.to_string();
    }
    let inflected = f(&word.to_lowercase());
    format!("{}{}", head, match_case(word, &inflected))
}

/// Byte offset where the last word begins: after the last `_`, `-` or space,
/// or at the last uppercase letter that follows a lowercase one.
fn last_word_start(s: &str) -> usize {
    let mut start = 0;
    let mut prev: Option<char> = None;
    for (i, c) in s.char_indices() {
        if c == '_' || c == '-' || c == ' ' {
            start = i + c.len_utf8();
        } else if c.is_uppercase() && prev.is_some_and(|p| p.is_lowercase() || p.is_ascii_digit()) {
            start = i;
        }
        prev = Some(c);
    }
    start
}

fn match_case(original: &str, inflected: &str) -> String {
    if original.chars().all(|c| !c.is_lowercase()) && original.chars().count() > 1 {
        return inflected.to_uppercase();
    }
    if original.chars().next().is_some_and(char::is_uppercase) {
        let mut chars = inflected.chars();
        return match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        };
    }
    inflected.to_string()
}

fn pluralize_word(word: &str) -> String {
    if UNCOUNTABLE.contains(&word) {
        return word.to_string();
    }
    if let Some((_, plural)) = IRREGULAR.iter().find(|(singular, _)| *singular == word) {
        return plural.to_string();
    }
    if IRREGULAR.iter().any(|(_, plural)| *plural == word) {
        return word.to_string();
    }
    if word.ends_with("quiz") {
        return format!("{word}zes");
    }
    if ["matrix", "vertex", "index"].iter().any(|s| word.ends_with(s)) {
        return format!("{}ices", &word[..word.len() - 2]);
    }
    if word.ends_with("sis") {
        return format!("{}ses", &word[..word.len() - 3]);
    }
    if ["status", "bus", "alias"].iter().any(|s| word.ends_with(s)) {
        return format!("{word}es");
    }
    if ["x", "ch", "ss", "sh"].iter().any(|s| word.ends_with(s)) {
        return format!("{word}es");
    }
    if let Some(stem) = word.strip_suffix('y') {
        let before = stem.chars().last();
        if before.is_some_and(|c| !"aeiou".contains(c)) || stem.ends_with("qu") {
            return format!("{stem}ies");
        }
    }
    if let Some(stem) = word.strip_suffix("fe") {
        if !stem.ends_with('f') {
            return format!("{stem}ves");
        }
    }
    if let Some(stem) = word.strip_suffix('f') {
        if stem.ends_with('l') || stem.ends_with('r') {
            return format!("{stem}ves");
        }
    }
    if word.ends_with("tomato") || word.ends_with("potato") || word.ends_with("buffalo") {
        return format!("{word}es");
    }
    if word.ends_with('s') && !word.ends_with("ss") {
        return word.to_string();
    }
    format!("{word}s")
}

fn singularize_word(word: &str) -> String {
    if UNCOUNTABLE.contains(&word) {
        return word.to_string();
    }
    if let Some((singular, _)) = IRREGULAR.iter().find(|(_, plural)| *plural == word) {
        return singular.to_string();
    }
    if IRREGULAR.iter().any(|(singular, _)| *singular == word) {
        return word.to_string();
    }
    if let Some(stem) = word.strip_suffix("zzes") {
        if stem.ends_with("qui") {
            return format!("{stem}z");
        }
    }
    if let Some(stem) = word.strip_suffix("ices") {
        if stem.ends_with("matr") || stem.ends_with("vert") || stem.ends_with("ind") {
            let tail = if stem.ends_with("matr") { "ix" } else { "ex" };
            return format!("{stem}{tail}");
        }
    }
    if let Some(stem) = word.strip_suffix("ses") {
        if stem.ends_with("statu") || stem.ends_with("alia") {
            return format!("{stem}s");
        }
        if stem.ends_with("bu") {
            return format!("{stem}s");
        }
        if ["analy", "diagno", "parenthe", "progno", "synop", "the", "cri", "oa"]
            .iter()
            .any(|s| stem.ends_with(s))
        {
            return format!("{stem}sis");
        }
    }
    if let Some(stem) = word.strip_suffix("es") {
        if ["x", "ch", "ss", "sh"].iter().any(|s| stem.ends_with(s)) {
            return stem.to_string();
        }
        if stem.ends_with("tomato") || stem.ends_with("potato") || stem.ends_with("buffalo") {
            return stem.to_string();
        }
    }
    if let Some(stem) = word.strip_suffix("ies") {
        if stem.chars().count() > 1 && !["mov", "cook"].contains(&stem) {
            return format!("{stem}y");
        }
    }
    if let Some(stem) = word.strip_suffix("ves") {
        if stem.ends_with('l') || stem.ends_with('r') || stem.ends_with("ar") {
            return format!("{stem}f");
        }
        if stem.ends_with("ni") || stem.ends_with("wi") || stem.ends_with("li") {
            return format!("{stem}fe");
        }
    }
    if word.ends_with("ss") || word.ends_with("us") || word.ends_with("is") {
        return word.to_string();
    }
    match word.strip_suffix('s') {
        Some(stem) if !stem.is_empty() => stem.to_string(),
        _ => word.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_underscore() {
        assert_eq!(underscore("Flange"), "flange");
        assert_eq!(underscore("StrangeRabbit"), "strange_rabbit");
        assert_eq!(underscore("HTMLPage"), "html_page");
        assert_eq!(underscore("Page2Part"), "page2_part");
        assert_eq!(underscore("already_snake"), "already_snake");
    }

    #[test]
    fn test_camelize_round_trips_underscore() {
        for name in ["Flange", "StrangeRabbit", "PagePart"] {
            assert_eq!(camelize(&underscore(name)), name);
        }
    }

    #[test]
    fn test_humanize() {
        assert_eq!(humanize("strange_rabbit"), "Strange rabbit");
        assert_eq!(humanize("StrangeRabbit"), "Strange rabbit");
        assert_eq!(humanize("site_id"), "Site");
        assert_eq!(humanize(""), "");
    }

    #[test]
    fn test_pluralize_regular_and_irregular() {
        assert_eq!(pluralize("Flange"), "Flanges");
        assert_eq!(pluralize("StrangeRabbit"), "StrangeRabbits");
        assert_eq!(pluralize("strange_rabbit"), "strange_rabbits");
        assert_eq!(pluralize("category"), "categories");
        assert_eq!(pluralize("day"), "days");
        assert_eq!(pluralize("box"), "boxes");
        assert_eq!(pluralize("church"), "churches");
        assert_eq!(pluralize("status"), "statuses");
        assert_eq!(pluralize("analysis"), "analyses");
        assert_eq!(pluralize("wolf"), "wolves");
        assert_eq!(pluralize("knife"), "knives");
        assert_eq!(pluralize("Person"), "People");
        assert_eq!(pluralize("sheep"), "sheep");
        assert_eq!(pluralize("index"), "indices");
        assert_eq!(pluralize("quiz"), "quizzes");
    }

    #[test]
    fn test_singularize_regular_and_irregular() {
        assert_eq!(singularize("Flanges"), "Flange");
        assert_eq!(singularize("StrangeRabbits"), "StrangeRabbit");
        assert_eq!(singularize("strange_rabbits"), "strange_rabbit");
        assert_eq!(singularize("categories"), "category");
        assert_eq!(singularize("boxes"), "box");
        assert_eq!(singularize("statuses"), "status");
        assert_eq!(singularize("analyses"), "analysis");
        assert_eq!(singularize("wolves"), "wolf");
        assert_eq!(singularize("knives"), "knife");
        assert_eq!(singularize("People"), "Person");
        assert_eq!(singularize("Status"), "Status");
        assert_eq!(singularize("Flange"), "Flange");
        assert_eq!(singularize("news"), "news");
    }

    #[test]
    fn test_singularize_inverts_pluralize() {
        for word in ["Flange", "StrangeRabbit", "Category", "Box", "Person", "Address"] {
            assert_eq!(singularize(&pluralize(word)), word, "round trip of {word}");
        }
    }
}
