use crate::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SelectorAttrCondition {
    Exists { key: String },
    Eq { key: String, value: String },
    StartsWith { key: String, value: String },
    EndsWith { key: String, value: String },
    Contains { key: String, value: String },
    Includes { key: String, value: String },
}

impl SelectorAttrCondition {
    pub(crate) fn key(&self) -> &str {
        match self {
            Self::Exists { key }
            | Self::Eq { key, .. }
            | Self::StartsWith { key, .. }
            | Self::EndsWith { key, .. }
            | Self::Contains { key, .. }
            | Self::Includes { key, .. } => key,
        }
    }

    pub(crate) fn matches(&self, actual: Option<&str>) -> bool {
        let Some(actual) = actual else {
            return false;
        };
        match self {
            Self::Exists { .. } => true,
            Self::Eq { value, .. } => actual == value,
            // Empty operands never match for the substring operators.
            Self::StartsWith { value, .. } => !value.is_empty() && actual.starts_with(value),
            Self::EndsWith { value, .. } => !value.is_empty() && actual.ends_with(value),
            Self::Contains { value, .. } => !value.is_empty() && actual.contains(value.as_str()),
            Self::Includes { value, .. } => actual.split_whitespace().any(|token| token == value),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SelectorPseudoClass {
    FirstChild,
    LastChild,
    Checked,
    Disabled,
    Enabled,
    Not(Vec<Vec<SelectorPart>>),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct SelectorStep {
    pub(crate) tag: Option<String>,
    pub(crate) universal: bool,
    pub(crate) id: Option<String>,
    pub(crate) classes: Vec<String>,
    pub(crate) attrs: Vec<SelectorAttrCondition>,
    pub(crate) pseudo_classes: Vec<SelectorPseudoClass>,
}

impl SelectorStep {
    pub(crate) fn id_only(&self) -> Option<&str> {
        if !self.universal
            && self.tag.is_none()
            && self.classes.is_empty()
            && self.attrs.is_empty()
            && self.pseudo_classes.is_empty()
        {
            self.id.as_deref()
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SelectorCombinator {
    Descendant,
    Child,
    AdjacentSibling,
    GeneralSibling,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SelectorPart {
    pub(crate) step: SelectorStep,
    // Relation to previous (left) selector part.
    pub(crate) combinator: Option<SelectorCombinator>,
}

pub(crate) fn parse_selector_chain(selector: &str) -> Result<Vec<SelectorPart>> {
    let selector = selector.trim();
    if selector.is_empty() {
        return Err(Error::UnsupportedSelector(selector.into()));
    }

    let tokens = tokenize_selector(selector)?;
    let mut steps = Vec::new();
    let mut pending_combinator: Option<SelectorCombinator> = None;

    for token in tokens {
        let combinator = match token.as_str() {
            ">" => Some(SelectorCombinator::Child),
            "+" => Some(SelectorCombinator::AdjacentSibling),
            "~" => Some(SelectorCombinator::GeneralSibling),
            _ => None,
        };
        if let Some(combinator) = combinator {
            if pending_combinator.is_some() || steps.is_empty() {
                return Err(Error::UnsupportedSelector(selector.into()));
            }
            pending_combinator = Some(combinator);
            continue;
        }

        let step = parse_selector_step(&token)?;
        let combinator = if steps.is_empty() {
            None
        } else {
            Some(
                pending_combinator
                    .take()
                    .unwrap_or(SelectorCombinator::Descendant),
            )
        };
        steps.push(SelectorPart { step, combinator });
    }

    if steps.is_empty() || pending_combinator.is_some() {
        return Err(Error::UnsupportedSelector(selector.into()));
    }

    Ok(steps)
}

pub(crate) fn parse_selector_groups(selector: &str) -> Result<Vec<Vec<SelectorPart>>> {
    let groups = split_selector_groups(selector)?;
    let mut parsed = Vec::with_capacity(groups.len());
    for group in groups {
        parsed.push(parse_selector_chain(&group)?);
    }
    Ok(parsed)
}

/// Splits on top-level commas, leaving brackets, parentheses and quoted
/// attribute values intact.
pub(crate) fn split_selector_groups(selector: &str) -> Result<Vec<String>> {
    let mut groups = Vec::new();
    let mut current = String::new();
    let mut depth = Depth::default();

    for ch in selector.chars() {
        if ch == ',' && depth.is_top_level() {
            let trimmed = current.trim();
            if trimmed.is_empty() {
                return Err(Error::UnsupportedSelector(selector.into()));
            }
            groups.push(trimmed.to_string());
            current.clear();
            continue;
        }
        depth
            .track(ch)
            .ok_or_else(|| Error::UnsupportedSelector(selector.into()))?;
        current.push(ch);
    }

    if !depth.is_balanced() {
        return Err(Error::UnsupportedSelector(selector.into()));
    }

    let trimmed = current.trim();
    if trimmed.is_empty() {
        return Err(Error::UnsupportedSelector(selector.into()));
    }
    groups.push(trimmed.to_string());
    Ok(groups)
}

pub(crate) fn tokenize_selector(selector: &str) -> Result<Vec<String>> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut depth = Depth::default();

    for ch in selector.chars() {
        if depth.is_top_level() {
            match ch {
                '>' | '+' | '~' => {
                    if !current.trim().is_empty() {
                        tokens.push(current.trim().to_string());
                    }
                    current.clear();
                    tokens.push(ch.to_string());
                    continue;
                }
                ch if ch.is_ascii_whitespace() => {
                    if !current.trim().is_empty() {
                        tokens.push(current.trim().to_string());
                    }
                    current.clear();
                    continue;
                }
                _ => {}
            }
        }
        depth
            .track(ch)
            .ok_or_else(|| Error::UnsupportedSelector(selector.into()))?;
        current.push(ch);
    }

    if !depth.is_balanced() {
        return Err(Error::UnsupportedSelector(selector.into()));
    }

    if !current.trim().is_empty() {
        tokens.push(current.trim().to_string());
    }

    Ok(tokens)
}

#[derive(Debug, Default)]
struct Depth {
    brackets: usize,
    parens: usize,
    quote: Option<char>,
    escaped: bool,
}

impl Depth {
    fn is_top_level(&self) -> bool {
        self.brackets == 0 && self.parens == 0 && self.quote.is_none()
    }

    fn is_balanced(&self) -> bool {
        self.is_top_level()
    }

    fn track(&mut self, ch: char) -> Option<()> {
        if let Some(quote) = self.quote {
            if self.escaped {
                self.escaped = false;
            } else if ch == '\\' {
                self.escaped = true;
            } else if ch == quote {
                self.quote = None;
            }
            return Some(());
        }
        match ch {
            '"' | '\'' if self.brackets > 0 || self.parens > 0 => self.quote = Some(ch),
            '[' => self.brackets += 1,
            ']' => self.brackets = self.brackets.checked_sub(1)?,
            '(' => self.parens += 1,
            ')' => self.parens = self.parens.checked_sub(1)?,
            _ => {}
        }
        Some(())
    }
}

pub(crate) fn parse_selector_step(part: &str) -> Result<SelectorStep> {
    let part = part.trim();
    if part.is_empty() {
        return Err(Error::UnsupportedSelector(part.into()));
    }

    let bytes = part.as_bytes();
    let mut i = 0usize;
    let mut step = SelectorStep::default();

    while i < bytes.len() {
        match bytes[i] {
            b'*' => {
                if step.universal {
                    return Err(Error::UnsupportedSelector(part.into()));
                }
                step.universal = true;
                i += 1;
            }
            b'#' => {
                i += 1;
                let Some((id, next)) = parse_selector_ident(part, i) else {
                    return Err(Error::UnsupportedSelector(part.into()));
                };
                if step.id.replace(id).is_some() {
                    return Err(Error::UnsupportedSelector(part.into()));
                }
                i = next;
            }
            b'.' => {
                i += 1;
                let Some((class_name, next)) = parse_selector_ident(part, i) else {
                    return Err(Error::UnsupportedSelector(part.into()));
                };
                step.classes.push(class_name);
                i = next;
            }
            b'[' => {
                let (attr, next) = parse_selector_attr_condition(part, i)?;
                step.attrs.push(attr);
                i = next;
            }
            b':' => {
                let Some((pseudo, next)) = parse_selector_pseudo(part, i) else {
                    return Err(Error::UnsupportedSelector(part.into()));
                };
                step.pseudo_classes.push(pseudo);
                i = next;
            }
            _ => {
                if step.tag.is_some()
                    || step.id.is_some()
                    || !step.classes.is_empty()
                    || !step.attrs.is_empty()
                    || step.universal
                {
                    return Err(Error::UnsupportedSelector(part.into()));
                }
                let Some((tag, next)) = parse_selector_ident(part, i) else {
                    return Err(Error::UnsupportedSelector(part.into()));
                };
                step.tag = Some(tag.to_ascii_lowercase());
                i = next;
            }
        }
    }

    Ok(step)
}

const SIMPLE_PSEUDO_CLASSES: [&str; 5] = ["first-child", "last-child", "checked", "disabled", "enabled"];

fn simple_pseudo_class(name: &str) -> Option<SelectorPseudoClass> {
    match name {
        "first-child" => Some(SelectorPseudoClass::FirstChild),
        "last-child" => Some(SelectorPseudoClass::LastChild),
        "checked" => Some(SelectorPseudoClass::Checked),
        "disabled" => Some(SelectorPseudoClass::Disabled),
        "enabled" => Some(SelectorPseudoClass::Enabled),
        _ => None,
    }
}

pub(crate) fn parse_selector_pseudo(
    part: &str,
    start: usize,
) -> Option<(SelectorPseudoClass, usize)> {
    if part.as_bytes().get(start)? != &b':' {
        return None;
    }
    let start = start + 1;
    let tail = part.get(start..)?;

    for name in SIMPLE_PSEUDO_CLASSES {
        if let Some(rest) = tail.strip_prefix(name) {
            if rest.is_empty() || is_selector_continuation(rest.as_bytes().first()?) {
                return Some((simple_pseudo_class(name)?, start + name.len()));
            }
        }
    }

    let rest = tail.strip_prefix("not(")?;
    let close_pos = find_matching_paren(rest)?;
    let body = rest[..close_pos].trim();
    if body.is_empty() {
        return None;
    }
    let inners = parse_selector_groups(body).ok()?;

    let next = start + "not(".len() + close_pos + 1;
    if let Some(ch) = part.as_bytes().get(next) {
        if !is_selector_continuation(ch) {
            return None;
        }
    }
    Some((SelectorPseudoClass::Not(inners), next))
}

pub(crate) fn find_matching_paren(body: &str) -> Option<usize> {
    let mut paren_depth = 1usize;
    let mut bracket_depth = 0usize;
    let mut quote: Option<u8> = None;
    let mut escaped = false;

    for (idx, b) in body.bytes().enumerate() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
                continue;
            }
            if b == b'\\' {
                escaped = true;
                continue;
            }
            if b == q {
                quote = None;
            }
            continue;
        }

        match b {
            b'\'' | b'"' => quote = Some(b),
            b'[' => bracket_depth += 1,
            b']' => bracket_depth = bracket_depth.checked_sub(1)?,
            b'(' if bracket_depth == 0 => paren_depth += 1,
            b')' if bracket_depth == 0 => {
                paren_depth = paren_depth.checked_sub(1)?;
                if paren_depth == 0 {
                    return Some(idx);
                }
            }
            _ => {}
        }
    }
    None
}

pub(crate) fn is_selector_continuation(next: &u8) -> bool {
    matches!(next, b'.' | b'#' | b'[' | b':')
}

pub(crate) fn parse_selector_ident(src: &str, start: usize) -> Option<(String, usize)> {
    let bytes = src.as_bytes();
    if start >= bytes.len() || !is_selector_ident_char(bytes[start]) {
        return None;
    }
    let mut end = start + 1;
    while end < bytes.len() && is_selector_ident_char(bytes[end]) {
        end += 1;
    }
    Some((src.get(start..end)?.to_string(), end))
}

pub(crate) fn is_selector_ident_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'-'
}

#[derive(Debug, Clone, Copy)]
enum AttrOperator {
    Eq,
    StartsWith,
    EndsWith,
    Contains,
    Includes,
}

pub(crate) fn parse_selector_attr_condition(
    src: &str,
    open_bracket: usize,
) -> Result<(SelectorAttrCondition, usize)> {
    let bytes = src.as_bytes();
    let unsupported = || Error::UnsupportedSelector(src.into());
    let mut i = open_bracket + 1;

    skip_ws(bytes, &mut i);
    let key_start = i;
    while i < bytes.len() && is_selector_attr_name_char(bytes[i]) {
        i += 1;
    }
    if key_start == i {
        return Err(unsupported());
    }
    let key = src
        .get(key_start..i)
        .ok_or_else(unsupported)?
        .to_ascii_lowercase();

    skip_ws(bytes, &mut i);
    if i >= bytes.len() {
        return Err(unsupported());
    }
    if bytes[i] == b']' {
        return Ok((SelectorAttrCondition::Exists { key }, i + 1));
    }

    let (op, next) = match (bytes.get(i), bytes.get(i + 1)) {
        (Some(b'='), _) => (AttrOperator::Eq, i + 1),
        (Some(b'^'), Some(b'=')) => (AttrOperator::StartsWith, i + 2),
        (Some(b'$'), Some(b'=')) => (AttrOperator::EndsWith, i + 2),
        (Some(b'*'), Some(b'=')) => (AttrOperator::Contains, i + 2),
        (Some(b'~'), Some(b'=')) => (AttrOperator::Includes, i + 2),
        _ => return Err(unsupported()),
    };

    i = next;
    skip_ws(bytes, &mut i);
    if i >= bytes.len() {
        return Err(unsupported());
    }

    let (value, after_value) = parse_selector_attr_value(src, i)?;
    i = after_value;
    skip_ws(bytes, &mut i);
    if i >= bytes.len() || bytes[i] != b']' {
        return Err(unsupported());
    }

    let cond = match op {
        AttrOperator::Eq => SelectorAttrCondition::Eq { key, value },
        AttrOperator::StartsWith => SelectorAttrCondition::StartsWith { key, value },
        AttrOperator::EndsWith => SelectorAttrCondition::EndsWith { key, value },
        AttrOperator::Contains => SelectorAttrCondition::Contains { key, value },
        AttrOperator::Includes => SelectorAttrCondition::Includes { key, value },
    };

    Ok((cond, i + 1))
}

fn skip_ws(bytes: &[u8], i: &mut usize) {
    while *i < bytes.len() && bytes[*i].is_ascii_whitespace() {
        *i += 1;
    }
}

pub(crate) fn is_selector_attr_name_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'-' || b == b':'
}

pub(crate) fn parse_selector_attr_value(src: &str, start: usize) -> Result<(String, usize)> {
    let bytes = src.as_bytes();
    if start >= bytes.len() {
        return Err(Error::UnsupportedSelector(src.into()));
    }

    if bytes[start] == b'"' || bytes[start] == b'\'' {
        let quote = bytes[start];
        let mut i = start + 1;
        while i < bytes.len() {
            if bytes[i] == b'\\' {
                i = (i + 2).min(bytes.len());
                continue;
            }
            if bytes[i] == quote {
                let raw = src
                    .get(start + 1..i)
                    .ok_or_else(|| Error::UnsupportedSelector(src.into()))?;
                return Ok((unescape_selector_value(raw), i + 1));
            }
            i += 1;
        }
        return Err(Error::UnsupportedSelector(src.into()));
    }

    let mut i = start;
    while i < bytes.len() {
        if bytes[i].is_ascii_whitespace() || bytes[i] == b']' {
            break;
        }
        if bytes[i] == b'\\' {
            i = (i + 2).min(bytes.len());
            continue;
        }
        i += 1;
    }
    let raw = src
        .get(start..i)
        .ok_or_else(|| Error::UnsupportedSelector(src.into()))?;
    Ok((unescape_selector_value(raw), i))
}

fn unescape_selector_value(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(ch) = chars.next() {
        if ch == '\\' {
            if let Some(escaped) = chars.next() {
                out.push(escaped);
            }
        } else {
            out.push(ch);
        }
    }
    out
}

/// Selector matching controls whose `name` is exactly `name`.
pub(crate) fn name_selector(name: &str) -> String {
    format!("[name={}]", quote_attr_value(name))
}

/// Quotes a value for use inside an attribute selector.
pub(crate) fn quote_attr_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for ch in value.chars() {
        if ch == '"' || ch == '\\' {
            out.push('\\');
        }
        out.push(ch);
    }
    out.push('"');
    out
}
