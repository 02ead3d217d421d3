//! Localized Messages
//!
//! `.properties` 형식의 메시지 번들과 `{0}` 스타일 위치 인자.
//!
//! 조회 순서: 요청 locale → 기본 locale → key 자체.
//! 마지막 단계 덕분에 조회는 절대 실패하지 않음.
//!
//! 번들 파싱은 `.properties` 규칙을 따름: `\` 줄 이어쓰기, `\uXXXX`,
//! `\t` 등 escape, `=`/`:`/공백 구분자.
//!
//! 포맷팅은 `MessageFormat` 규칙의 부분집합:
//! - `{n}` 자리는 한 번의 스캔으로 치환 (인자 안의 `{n}`은 다시 치환되지 않음)
//! - `''` → `'`, `'...'` 구간은 리터럴
//! - 인자가 없으면 패턴을 그대로 반환 (`''`도 그대로)
//! - `{0,number}` 같은 format type/style은 지원하지 않음

use std::collections::HashMap;
use std::fs;
use std::iter::Peekable;
use std::path::Path;
use std::str::Chars;

use anyhow::{Context, Result};
use axum::http::{header::ACCEPT_LANGUAGE, HeaderMap};

pub const LOCATION_ERROR_MESSAGE_KEY: &str = "product.map.page.feedback.error";

const DEFAULT_LOCALE: &str = "en";

const DEFAULT_MESSAGES: &str = r#"
# Product map
product.map.page.feedback.error=Sorry, we could not find a location for "{0}". Please try another search.
"#;

/// 언어 코드 (primary subtag, 소문자)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Locale(String);

impl Locale {
    pub fn new(tag: &str) -> Self {
        let primary = tag.split(['-', '_']).next().unwrap_or_default();
        Self(primary.trim().to_lowercase())
    }

    /// `Accept-Language` 첫 번째 태그 사용, 없으면 기본 locale
    pub fn from_headers(headers: &HeaderMap) -> Self {
        headers
            .get(ACCEPT_LANGUAGE)
            .and_then(|value| value.to_str().ok())
            .and_then(|raw| raw.split(',').next())
            .map(|tag| tag.split(';').next().unwrap_or_default().trim())
            .filter(|tag| !tag.is_empty() && *tag != "*")
            .map(Self::new)
            .unwrap_or_default()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Locale {
    fn default() -> Self {
        Self(DEFAULT_LOCALE.to_string())
    }
}

/// locale별 메시지 번들
#[derive(Debug, Clone)]
pub struct MessageSource {
    bundles: HashMap<Locale, HashMap<String, String>>,
    default_locale: Locale,
}

impl Default for MessageSource {
    fn default() -> Self {
        let mut source = Self::empty();
        source.add_properties(&Locale::default(), DEFAULT_MESSAGES);
        source
    }
}

impl MessageSource {
    pub fn empty() -> Self {
        Self {
            bundles: HashMap::new(),
            default_locale: Locale::default(),
        }
    }

    /// 기본 번들 + 디렉토리의 `messages*.properties`
    ///
    /// - `messages.properties` → 기본 locale
    /// - `messages_<lang>.properties` → 해당 locale
    pub fn load_dir(dir: &Path) -> Result<Self> {
        let mut source = Self::default();

        let entries = fs::read_dir(dir)
            .with_context(|| format!("failed to read messages dir {}", dir.display()))?;

        for entry in entries {
            let path = entry?.path();
            let Some(stem) = path
                .file_name()
                .and_then(|name| name.to_str())
                .and_then(|name| name.strip_suffix(".properties"))
            else {
                continue;
            };

            let locale = match stem.strip_prefix("messages") {
                Some("") => Locale::default(),
                Some(suffix) => match suffix.strip_prefix('_') {
                    Some(lang) => Locale::new(lang),
                    None => continue,
                },
                None => continue,
            };

            let text = fs::read_to_string(&path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            source.add_properties(&locale, &text);
            tracing::debug!(locale = locale.as_str(), file = %path.display(), "message bundle loaded");
        }

        Ok(source)
    }

    /// `key=value` 라인 추가. `#`/`!` 주석과 빈 줄은 무시.
    pub fn add_properties(&mut self, locale: &Locale, text: &str) {
        let bundle = self.bundles.entry(locale.clone()).or_default();
        for line in logical_lines(text) {
            let (key, value) = split_entry(&line);
            if !key.is_empty() {
                bundle.insert(key, value);
            }
        }
    }

    /// 메시지 조회 + 인자 치환
    pub fn get_message(&self, key: &str, args: &[String], locale: &Locale) -> String {
        let pattern = self
            .lookup(key, locale)
            .or_else(|| self.lookup(key, &self.default_locale));

        match pattern {
            Some(pattern) => format_message(pattern, args),
            None => {
                tracing::warn!(key, locale = locale.as_str(), "no message found for key");
                key.to_string()
            }
        }
    }

    fn lookup(&self, key: &str, locale: &Locale) -> Option<&str> {
        self.bundles
            .get(locale)
            .and_then(|bundle| bundle.get(key))
            .map(String::as_str)
    }
}

/// 주석/빈 줄을 건너뛰고 `\` 이어쓰기를 합친 논리 라인
fn logical_lines(text: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut continuing = false;

    for raw in text.lines() {
        let line = raw.trim_start();
        if !continuing && (line.is_empty() || line.starts_with('#') || line.starts_with('!')) {
            continue;
        }

        let trailing = line.chars().rev().take_while(|c| *c == '\\').count();
        if trailing % 2 == 1 {
            current.push_str(&line[..line.len() - 1]);
            continuing = true;
        } else {
            current.push_str(line);
            lines.push(std::mem::take(&mut current));
            continuing = false;
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// 첫 번째 escape 되지 않은 `=`, `:` 또는 공백에서 key/value 분리
fn split_entry(line: &str) -> (String, String) {
    let mut chars = line.chars().peekable();
    let mut key = String::new();

    while let Some(c) = chars.next() {
        match c {
            '\\' => push_escape(&mut key, &mut chars),
            '=' | ':' => break,
            c if c.is_whitespace() => {
                skip_whitespace(&mut chars);
                if matches!(chars.peek(), Some('=' | ':')) {
                    chars.next();
                }
                break;
            }
            c => key.push(c),
        }
    }

    skip_whitespace(&mut chars);
    let mut value = String::new();
    while let Some(c) = chars.next() {
        match c {
            '\\' => push_escape(&mut value, &mut chars),
            c => value.push(c),
        }
    }

    (key, value)
}

fn skip_whitespace(chars: &mut Peekable<Chars<'_>>) {
    while chars.next_if(|c| c.is_whitespace()).is_some() {}
}

fn push_escape(out: &mut String, chars: &mut Peekable<Chars<'_>>) {
    match chars.next() {
        Some('t') => out.push('\t'),
        Some('n') => out.push('\n'),
        Some('r') => out.push('\r'),
        Some('f') => out.push('\u{c}'),
        Some('u') => {
            let hex: String = chars.by_ref().take(4).collect();
            match u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32) {
                Some(decoded) => out.push(decoded),
                None => {
                    out.push_str("\\u");
                    out.push_str(&hex);
                }
            }
        }
        Some(other) => out.push(other),
        None => {}
    }
}

/// `{n}` 치환 + `'` quoting. 범위 밖 인덱스는 그대로 둠.
fn format_message(pattern: &str, args: &[String]) -> String {
    if args.is_empty() {
        return pattern.to_string();
    }

    let mut out = String::with_capacity(pattern.len());
    let mut chars = pattern.chars().peekable();
    let mut quoted = false;

    while let Some(c) = chars.next() {
        match c {
            '\'' if chars.peek() == Some(&'\'') => {
                chars.next();
                out.push('\'');
            }
            '\'' => quoted = !quoted,
            '{' if !quoted => {
                let mut inner = String::new();
                let mut closed = false;
                for n in chars.by_ref() {
                    if n == '}' {
                        closed = true;
                        break;
                    }
                    inner.push(n);
                }

                let arg = inner.trim().parse::<usize>().ok().and_then(|i| args.get(i));
                match arg {
                    Some(arg) if closed => out.push_str(arg),
                    _ => {
                        out.push('{');
                        out.push_str(&inner);
                        if closed {
                            out.push('}');
                        }
                    }
                }
            }
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_locale_from_headers() {
        let mut headers = HeaderMap::new();
        assert_eq!(Locale::from_headers(&headers), Locale::default());

        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("es-MX,es;q=0.9,en;q=0.8"));
        assert_eq!(Locale::from_headers(&headers).as_str(), "es");

        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("*"));
        assert_eq!(Locale::from_headers(&headers), Locale::default());
    }

    #[test]
    fn test_default_location_message() {
        let source = MessageSource::default();
        let msg = source.get_message(
            LOCATION_ERROR_MESSAGE_KEY,
            &["Atlantis".to_string()],
            &Locale::default(),
        );
        assert!(msg.contains("\"Atlantis\""));
        assert!(!msg.contains("{0}"));
    }

    #[test]
    fn test_locale_fallback() {
        let mut source = MessageSource::default();
        source.add_properties(&Locale::new("es"), "greeting=Hola {0}\n! comment\n");

        let es = Locale::new("es");
        assert_eq!(source.get_message("greeting", &["Ana".to_string()], &es), "Hola Ana");

        // es 번들에 없는 key는 기본 locale에서
        let msg = source.get_message(LOCATION_ERROR_MESSAGE_KEY, &["X".to_string()], &es);
        assert!(msg.starts_with("Sorry"));
    }

    #[test]
    fn test_arguments_are_substituted_once() {
        let args = ["{1}".to_string(), "X".to_string()];
        assert_eq!(format_message("A={0} B={1}", &args), "A={1} B=X");
        assert_eq!(format_message("{0} of {5}", &args), "{1} of {5}");
    }

    #[test]
    fn test_message_format_quoting() {
        let args = ["Rust".to_string()];
        assert_eq!(format_message("We can''t find {0}", &args), "We can't find Rust");
        assert_eq!(format_message("'{0}' is literal, {0} is not", &args), "{0} is literal, Rust is not");
        // 인자 없으면 패턴 그대로
        assert_eq!(format_message("don''t", &[]), "don''t");
    }

    #[test]
    fn test_properties_escapes_and_continuations() {
        let mut source = MessageSource::empty();
        source.add_properties(
            &Locale::default(),
            "multi.line=first \\\n    second\n\
             unicode=caf\\u00e9\n\
             spaced key\\ name : value\n\
             colon\\:key=a:b\n\
             \n   # indented comment\n\
             apostrophe=Can''t find \"{0}\"\n",
        );

        let en = Locale::default();
        assert_eq!(source.get_message("multi.line", &[], &en), "first second");
        assert_eq!(source.get_message("unicode", &[], &en), "café");
        assert_eq!(source.get_message("spaced", &[], &en), "key name : value");
        assert_eq!(source.get_message("colon:key", &[], &en), "a:b");
        assert_eq!(
            source.get_message("apostrophe", &["Paris".to_string()], &en),
            "Can't find \"Paris\""
        );
    }

    #[test]
    fn test_missing_key_returns_key() {
        let source = MessageSource::empty();
        assert_eq!(
            source.get_message("no.such.key", &[], &Locale::default()),
            "no.such.key"
        );
    }

    #[test]
    fn test_load_dir() {
        let dir = std::env::temp_dir().join(format!("blog-web-messages-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("messages.properties"), "site.title=Blog\n").unwrap();
        fs::write(dir.join("messages_fr.properties"), "site.title=Le Blog\n").unwrap();
        fs::write(dir.join("notes.txt"), "ignored=yes\n").unwrap();

        let source = MessageSource::load_dir(&dir).unwrap();
        assert_eq!(source.get_message("site.title", &[], &Locale::default()), "Blog");
        assert_eq!(source.get_message("site.title", &[], &Locale::new("fr")), "Le Blog");
        // 기본 번들도 유지
        assert_ne!(
            source.get_message(LOCATION_ERROR_MESSAGE_KEY, &[], &Locale::default()),
            LOCATION_ERROR_MESSAGE_KEY
        );

        fs::remove_dir_all(&dir).unwrap();
    }
}
