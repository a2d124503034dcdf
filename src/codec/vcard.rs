//! vCard 4.0 encoding of `ContactPayload`.
//!
//! The blob is a complete, self-describing vCard: UTF-8, CRLF line endings,
//! lines folded at 75 octets, text escaped per RFC 6350 §3.4. Decoding also
//! accepts vCard 3.0 input (bare-LF, `TYPE` shorthand, `ENCODING=b` photos)
//! so cards exported by other address books import cleanly. Properties outside
//! the payload's fields are dropped on decode.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::NaiveDate;

use super::record_decode_failure;
use crate::error::{BookError, BookResult};
use crate::model::{ContactPayload, Labeled, PostalAddress};

const MAX_LINE_OCTETS: usize = 75;

/// TYPE values that describe a property rather than label it.
const NON_LABEL_TYPES: &[&str] = &["pref", "internet", "voice", "x400", "text"];

pub fn encode(payload: &ContactPayload) -> Vec<u8> {
    let mut lines: Vec<String> = vec!["BEGIN:VCARD".into(), "VERSION:4.0".into()];

    if let Some(uid) = &payload.external_id {
        lines.push(format!("UID:{}", escape_text(uid)));
    }
    lines.push(format!("FN:{}", escape_text(&formatted_name(payload))));
    lines.push(format!(
        "N:{};{};{};{};{}",
        escape_text(&payload.family_name),
        escape_text(&payload.given_name),
        escape_text(&payload.middle_name),
        escape_text(&payload.name_prefix),
        escape_text(&payload.name_suffix),
    ));
    push_text(&mut lines, "NICKNAME", &payload.nickname);
    push_text(&mut lines, "ORG", &payload.organization);
    push_text(&mut lines, "TITLE", &payload.job_title);

    push_labeled(&mut lines, "TEL", &payload.phones);
    push_labeled(&mut lines, "EMAIL", &payload.emails);
    for adr in &payload.addresses {
        let a = &adr.value;
        lines.push(format!(
            "ADR{}:;;{};{};{};{};{}",
            type_param(adr.label.as_deref()),
            escape_text(&a.street),
            escape_text(&a.city),
            escape_text(&a.state),
            escape_text(&a.postal_code),
            escape_text(&a.country),
        ));
    }
    push_labeled(&mut lines, "URL", &payload.urls);
    push_labeled(&mut lines, "IMPP", &payload.instant_messages);

    if let Some(bday) = payload.birthday {
        lines.push(format!("BDAY:{}", bday.format("%Y%m%d")));
    }
    for date in &payload.dates {
        lines.push(format!(
            "X-ABDATE{}:{}",
            type_param(date.label.as_deref()),
            date.value.format("%Y%m%d")
        ));
    }
    for rel in &payload.relations {
        lines.push(format!(
            "RELATED{};VALUE=text:{}",
            type_param(rel.label.as_deref()),
            escape_text(&rel.value)
        ));
    }
    push_text(&mut lines, "NOTE", &payload.note);
    if let Some(photo) = &payload.photo {
        lines.push(format!(
            "PHOTO:data:{};base64,{}",
            sniff_media_type(photo),
            STANDARD.encode(photo)
        ));
    }
    lines.push("END:VCARD".into());

    let mut out = String::new();
    for line in &lines {
        out.push_str(&fold_line(line));
        out.push_str("\r\n");
    }
    out.into_bytes()
}

/// Encodes several payloads as one `.vcf` document.
pub fn encode_many<'a>(payloads: impl IntoIterator<Item = &'a ContactPayload>) -> Vec<u8> {
    payloads.into_iter().flat_map(encode).collect()
}

/// Decodes a blob, returning an empty payload if it is malformed.
pub fn decode(blob: &[u8]) -> ContactPayload {
    match try_decode(blob) {
        Ok(payload) => payload,
        Err(e) => {
            record_decode_failure("vcard", &e.to_string());
            ContactPayload::default()
        }
    }
}

/// Decodes a blob, failing if it is not a single well-formed vCard.
pub fn try_decode(blob: &[u8]) -> BookResult<ContactPayload> {
    let text = std::str::from_utf8(blob).map_err(|e| decode_error(&e.to_string()))?;
    if text.trim().is_empty() {
        return Err(decode_error("empty payload"));
    }

    let unfolded = unfold(text);
    // Only the terminator is stripped; trailing blanks belong to the value.
    let mut lines = unfolded
        .lines()
        .map(|l| l.trim_end_matches('\r'))
        .filter(|l| !l.trim().is_empty());

    match lines.next() {
        Some(first) if first.trim().eq_ignore_ascii_case("BEGIN:VCARD") => {}
        _ => return Err(decode_error("missing BEGIN:VCARD")),
    }

    let mut payload = ContactPayload::default();
    let mut formatted = None;
    let mut saw_name = false;
    let mut closed = false;

    for line in lines {
        if line.trim().eq_ignore_ascii_case("END:VCARD") {
            closed = true;
            break;
        }
        let Some(prop) = parse_content_line(line) else {
            return Err(decode_error(&format!("malformed line `{}`", truncate(line))));
        };
        apply_property(&mut payload, &prop, &mut formatted, &mut saw_name);
    }

    if !closed {
        return Err(decode_error("missing END:VCARD"));
    }
    if !saw_name {
        if let Some(fn_value) = formatted {
            payload.given_name = fn_value;
        }
    }
    Ok(payload)
}

/// Splits a `.vcf` document into one blob per card. Text outside
/// BEGIN/END pairs is ignored; an unterminated trailing card is kept so the
/// decoder can report it.
pub fn split_cards(text: &str) -> Vec<Vec<u8>> {
    let mut cards = Vec::new();
    let mut current: Option<String> = None;

    for line in text.lines() {
        let trimmed = line.trim_end_matches('\r');
        if trimmed.eq_ignore_ascii_case("BEGIN:VCARD") {
            if let Some(open) = current.take() {
                cards.push(open.into_bytes());
            }
            current = Some(String::new());
        }
        if let Some(card) = current.as_mut() {
            card.push_str(trimmed);
            card.push_str("\r\n");
            if trimmed.eq_ignore_ascii_case("END:VCARD") {
                if let Some(done) = current.take() {
                    cards.push(done.into_bytes());
                }
            }
        }
    }
    if let Some(open) = current {
        cards.push(open.into_bytes());
    }
    cards
}

struct ParamValue {
    text: String,
    /// Quoted values are always taken literally, even if they spell a
    /// property descriptor such as `pref`.
    quoted: bool,
}

struct ContentLine {
    name: String,
    params: Vec<(String, Vec<ParamValue>)>,
    value: String,
}

impl ContentLine {
    fn param(&self, name: &str) -> Option<&[ParamValue]> {
        self.params
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_slice())
    }

    fn label(&self) -> Option<String> {
        self.params
            .iter()
            .filter(|(n, _)| n == "TYPE")
            .flat_map(|(_, values)| values.iter())
            .find(|v| v.quoted || !is_descriptor(&v.text))
            .map(|v| v.text.clone())
    }
}

fn apply_property(
    payload: &mut ContactPayload,
    prop: &ContentLine,
    formatted: &mut Option<String>,
    saw_name: &mut bool,
) {
    match prop.name.as_str() {
        "UID" => payload.external_id = Some(unescape(&prop.value)),
        "FN" => *formatted = Some(unescape(&prop.value)),
        "N" => {
            let mut parts = split_structured(&prop.value).into_iter();
            payload.family_name = parts.next().unwrap_or_default();
            payload.given_name = parts.next().unwrap_or_default();
            payload.middle_name = parts.next().unwrap_or_default();
            payload.name_prefix = parts.next().unwrap_or_default();
            payload.name_suffix = parts.next().unwrap_or_default();
            *saw_name = true;
        }
        "NICKNAME" => payload.nickname = unescape(&prop.value),
        "ORG" => {
            payload.organization = split_structured(&prop.value)
                .into_iter()
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>()
                .join(", ")
        }
        "TITLE" => payload.job_title = unescape(&prop.value),
        "TEL" => payload.phones.push(labeled_text(prop)),
        "EMAIL" => payload.emails.push(labeled_text(prop)),
        "URL" => payload.urls.push(labeled_text(prop)),
        "IMPP" => payload.instant_messages.push(labeled_text(prop)),
        "ADR" => {
            let parts = split_structured(&prop.value);
            let field = |i: usize| parts.get(i).cloned().unwrap_or_default();
            let address = PostalAddress {
                street: field(2),
                city: field(3),
                state: field(4),
                postal_code: field(5),
                country: field(6),
            };
            payload.addresses.push(Labeled {
                label: prop.label(),
                value: address,
            });
        }
        "BDAY" => payload.birthday = parse_date(&prop.value, "BDAY"),
        "X-ABDATE" | "ANNIVERSARY" => {
            if let Some(date) = parse_date(&prop.value, &prop.name) {
                let label = prop.label().or_else(|| {
                    (prop.name == "ANNIVERSARY").then(|| "anniversary".to_string())
                });
                payload.dates.push(Labeled { label, value: date });
            }
        }
        "RELATED" | "X-ABRELATEDNAMES" => payload.relations.push(labeled_text(prop)),
        "NOTE" => payload.note = unescape(&prop.value),
        "PHOTO" => payload.photo = parse_photo(prop),
        _ => {}
    }
}

fn labeled_text(prop: &ContentLine) -> Labeled<String> {
    Labeled {
        label: prop.label(),
        value: unescape(&prop.value),
    }
}

fn parse_date(value: &str, what: &str) -> Option<NaiveDate> {
    let value = value.trim();
    let parsed = NaiveDate::parse_from_str(value, "%Y%m%d")
        .or_else(|_| NaiveDate::parse_from_str(value, "%Y-%m-%d"));
    match parsed {
        Ok(date) => Some(date),
        Err(_) => {
            record_decode_failure(what, value);
            None
        }
    }
}

fn parse_photo(prop: &ContentLine) -> Option<Vec<u8>> {
    let inline_base64 = prop
        .param("ENCODING")
        .map(|v| {
            v.iter()
                .any(|e| e.text.eq_ignore_ascii_case("b") || e.text.eq_ignore_ascii_case("base64"))
        })
        .unwrap_or(false);

    let data = if inline_base64 {
        prop.value.as_str()
    } else if let Some(rest) = prop.value.strip_prefix("data:") {
        match rest.split_once(";base64,") {
            Some((_, data)) => data,
            None => {
                record_decode_failure("PHOTO", "data URI without base64 body");
                return None;
            }
        }
    } else {
        // External photo URLs are not fetched.
        return None;
    };

    let compact: String = data.chars().filter(|c| !c.is_whitespace()).collect();
    match STANDARD.decode(compact) {
        Ok(bytes) => Some(bytes),
        Err(e) => {
            record_decode_failure("PHOTO", &e.to_string());
            None
        }
    }
}

fn parse_content_line(line: &str) -> Option<ContentLine> {
    let colon = find_unquoted(line, ':')?;
    let (head, value) = (&line[..colon], &line[colon + 1..]);

    let mut segments = split_unquoted(head, ';').into_iter();
    let raw_name = segments.next()?;
    let name = raw_name
        .rsplit('.')
        .next()
        .unwrap_or(raw_name)
        .trim()
        .to_ascii_uppercase();
    if name.is_empty() {
        return None;
    }

    let params = segments
        .filter(|s| !s.is_empty())
        .map(|segment| match segment.split_once('=') {
            Some((k, v)) => (k.trim().to_ascii_uppercase(), param_values(v)),
            None => ("TYPE".to_string(), param_values(segment)),
        })
        .collect();

    Some(ContentLine {
        name,
        params,
        value: value.to_string(),
    })
}

fn param_values(raw: &str) -> Vec<ParamValue> {
    let raw = raw.trim();
    if raw.len() >= 2 && raw.starts_with('"') && raw.ends_with('"') {
        return vec![ParamValue {
            text: caret_decode(&raw[1..raw.len() - 1]),
            quoted: true,
        }];
    }
    raw.split(',')
        .filter(|s| !s.is_empty())
        .map(|s| ParamValue {
            text: caret_decode(s),
            quoted: false,
        })
        .collect()
}

fn is_descriptor(value: &str) -> bool {
    NON_LABEL_TYPES
        .iter()
        .any(|skip| value.eq_ignore_ascii_case(skip))
}

fn find_unquoted(s: &str, target: char) -> Option<usize> {
    let mut quoted = false;
    for (i, c) in s.char_indices() {
        match c {
            '"' => quoted = !quoted,
            c if c == target && !quoted => return Some(i),
            _ => {}
        }
    }
    None
}

fn split_unquoted(s: &str, sep: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut quoted = false;
    let mut start = 0;
    for (i, c) in s.char_indices() {
        match c {
            '"' => quoted = !quoted,
            c if c == sep && !quoted => {
                parts.push(&s[start..i]);
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(&s[start..]);
    parts
}

/// Splits a structured value on unescaped semicolons and unescapes each part.
fn split_structured(value: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                current.push(c);
                if let Some(next) = chars.next() {
                    current.push(next);
                }
            }
            ';' => parts.push(unescape(&std::mem::take(&mut current))),
            _ => current.push(c),
        }
    }
    parts.push(unescape(&current));
    parts
}

fn escape_text(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => result.push_str("\\\\"),
            '\n' => result.push_str("\\n"),
            ',' => result.push_str("\\,"),
            ';' => result.push_str("\\;"),
            '\r' => {}
            _ => result.push(c),
        }
    }
    result
}

fn unescape(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            result.push(c);
            continue;
        }
        match chars.next() {
            Some('n') | Some('N') => result.push('\n'),
            Some(other) => result.push(other),
            None => result.push('\\'),
        }
    }
    result
}

/// RFC 6868 parameter encoding. Labels with separators, edge blanks, or
/// the spelling of a descriptor are quoted so they decode unchanged.
fn type_param(label: Option<&str>) -> String {
    let Some(label) = label.filter(|l| !l.is_empty()) else {
        return String::new();
    };
    let mut encoded = String::with_capacity(label.len());
    let mut needs_quotes = is_descriptor(label) || label.trim() != label;
    for c in label.chars() {
        match c {
            '^' => encoded.push_str("^^"),
            '\n' => encoded.push_str("^n"),
            '"' => {
                encoded.push_str("^'");
                needs_quotes = true;
            }
            ':' | ';' | ',' => {
                encoded.push(c);
                needs_quotes = true;
            }
            c if c.is_control() => {}
            c => encoded.push(c),
        }
    }
    if needs_quotes {
        format!(";TYPE=\"{}\"", encoded)
    } else {
        format!(";TYPE={}", encoded)
    }
}

fn caret_decode(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '^' {
            result.push(c);
            continue;
        }
        match chars.next() {
            Some('^') => result.push('^'),
            Some('n') => result.push('\n'),
            Some('\'') => result.push('"'),
            Some(other) => {
                result.push('^');
                result.push(other);
            }
            None => result.push('^'),
        }
    }
    result
}

fn push_text(lines: &mut Vec<String>, name: &str, value: &str) {
    if !value.is_empty() {
        lines.push(format!("{}:{}", name, escape_text(value)));
    }
}

fn push_labeled(lines: &mut Vec<String>, name: &str, values: &[Labeled<String>]) {
    for v in values {
        lines.push(format!(
            "{}{}:{}",
            name,
            type_param(v.label.as_deref()),
            escape_text(&v.value)
        ));
    }
}

fn formatted_name(payload: &ContactPayload) -> String {
    let parts = [
        payload.name_prefix.as_str(),
        payload.given_name.as_str(),
        payload.middle_name.as_str(),
        payload.family_name.as_str(),
        payload.name_suffix.as_str(),
    ];
    let joined = parts
        .iter()
        .filter(|p| !p.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(" ");
    if joined.is_empty() {
        payload.organization.clone()
    } else {
        joined
    }
}

fn sniff_media_type(bytes: &[u8]) -> &'static str {
    if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        "image/jpeg"
    } else if bytes.starts_with(&[0x89, b'P', b'N', b'G']) {
        "image/png"
    } else if bytes.starts_with(b"GIF8") {
        "image/gif"
    } else {
        "application/octet-stream"
    }
}

/// Folds at 75 octets without splitting a UTF-8 sequence.
fn fold_line(line: &str) -> String {
    if line.len() <= MAX_LINE_OCTETS {
        return line.to_string();
    }
    let mut result = String::with_capacity(line.len() + line.len() / MAX_LINE_OCTETS * 3);
    let mut current_len = 0;
    let mut limit = MAX_LINE_OCTETS;
    for c in line.chars() {
        let char_len = c.len_utf8();
        if current_len + char_len > limit {
            result.push_str("\r\n ");
            current_len = 0;
            limit = MAX_LINE_OCTETS - 1;
        }
        result.push(c);
        current_len += char_len;
    }
    result
}

/// Joins continuation lines (CRLF or bare LF followed by space or tab).
fn unfold(input: &str) -> String {
    let mut result = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\r' if chars.peek() == Some(&'\n') => {
                chars.next();
                if matches!(chars.peek(), Some(' ' | '\t')) {
                    chars.next();
                } else {
                    result.push('\n');
                }
            }
            '\n' => {
                if matches!(chars.peek(), Some(' ' | '\t')) {
                    chars.next();
                } else {
                    result.push('\n');
                }
            }
            _ => result.push(c),
        }
    }
    result
}

fn decode_error(reason: &str) -> BookError {
    BookError::Decode {
        what: "vcard".into(),
        reason: reason.into(),
    }
}

fn truncate(line: &str) -> String {
    line.chars().take(40).collect()
}
