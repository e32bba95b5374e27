//! Lightweight markup for message text.
//!
//! Four patterns are recognised, in this order: fenced code blocks
//! (```` ```lang ... ``` ````), inline code (`` `x` ``), `###bold###` and
//! `##bold##`. Text is parsed into [`Segment`]s first and only then rendered,
//! either as Yew nodes or as escaped markup, so message content can never
//! inject HTML.

use std::sync::OnceLock;

use regex::{Captures, Regex};
use yew::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Segment {
    Text(String),
    InlineCode(String),
    CodeBlock { language: Option<String>, code: String },
    Bold(String),
}

fn fence_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)```(?:([\w+\-]+)?[ \t]*\r?\n)?(.*?)```").expect("fence pattern"))
}

fn inline_code_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"`([^`\n]+)`").expect("inline code pattern"))
}

fn triple_hash_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"###(.+?)###").expect("### pattern"))
}

fn double_hash_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"##(.+?)##").expect("## pattern"))
}

pub fn parse(text: &str) -> Vec<Segment> {
    let segments = vec![Segment::Text(text.to_string())];
    let segments = split_text(segments, fence_re(), |caps| Segment::CodeBlock {
        language: caps.get(1).map(|m| m.as_str().to_string()),
        code: trim_line_end(&caps[2]).to_string(),
    });
    let segments = split_text(segments, inline_code_re(), |caps| {
        Segment::InlineCode(caps[1].to_string())
    });
    let segments = split_text(segments, triple_hash_re(), |caps| Segment::Bold(caps[1].to_string()));
    split_text(segments, double_hash_re(), |caps| Segment::Bold(caps[1].to_string()))
}

fn trim_line_end(code: &str) -> &str {
    code.strip_suffix("\r\n")
        .or_else(|| code.strip_suffix('\n'))
        .unwrap_or(code)
}

/// Re-splits every `Text` segment on `re`; already-recognised segments are
/// left alone.
fn split_text<F>(segments: Vec<Segment>, re: &Regex, make: F) -> Vec<Segment>
where
    F: Fn(&Captures) -> Segment,
{
    let mut out = Vec::with_capacity(segments.len());
    for segment in segments {
        let text = match segment {
            Segment::Text(text) => text,
            other => {
                out.push(other);
                continue;
            }
        };
        let mut last = 0;
        for caps in re.captures_iter(&text) {
            let whole = caps.get(0).expect("group 0 is always present");
            if whole.start() > last {
                out.push(Segment::Text(text[last..whole.start()].to_string()));
            }
            out.push(make(&caps));
            last = whole.end();
        }
        if last < text.len() {
            out.push(Segment::Text(text[last..].to_string()));
        }
    }
    out
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Escaped markup string for the given message text.
pub fn to_markup(text: &str) -> String {
    parse(text)
        .iter()
        .map(|segment| match segment {
            Segment::Text(t) => escape_html(t),
            Segment::InlineCode(c) => format!("<code class='inline-code'>{}</code>", escape_html(c)),
            Segment::CodeBlock { code, .. } => {
                format!("<pre class='code-block'><code>{}</code></pre>", escape_html(code))
            }
            Segment::Bold(b) => format!("<strong>{}</strong>", escape_html(b)),
        })
        .collect()
}

pub fn render(segments: &[Segment]) -> Html {
    html! {
        <>
            { for segments.iter().map(|segment| match segment {
                Segment::Text(t) => html! { { t.clone() } },
                Segment::InlineCode(c) => html! {
                    <code class="inline-code" style="background:#f1f3f5; padding:0 0.25em; border-radius:3px; font-family:'Courier New', monospace;">
                        { c.clone() }
                    </code>
                },
                Segment::CodeBlock { language, code } => html! {
                    <pre class="code-block" data-language={language.clone().unwrap_or_default()} style="background:#272822; color:#f8f8f2; padding:0.75em; border-radius:4px; overflow-x:auto; white-space:pre;">
                        <code>{ code.clone() }</code>
                    </pre>
                },
                Segment::Bold(b) => html! { <strong>{ b.clone() }</strong> },
            }) }
        </>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inline_code() {
        assert_eq!(to_markup("`x`"), "<code class='inline-code'>x</code>");
        assert_eq!(
            parse("run `ls -la` now"),
            vec![
                Segment::Text("run ".to_string()),
                Segment::InlineCode("ls -la".to_string()),
                Segment::Text(" now".to_string()),
            ]
        );
    }

    #[test]
    fn test_code_block_with_language() {
        assert_eq!(
            parse("```js\ncode\n```"),
            vec![Segment::CodeBlock {
                language: Some("js".to_string()),
                code: "code".to_string(),
            }]
        );
        let markup = to_markup("```js\ncode\n```");
        assert!(markup.starts_with("<pre class='code-block'>"));
        assert!(markup.contains("code</code>"));
    }

    #[test]
    fn test_code_block_with_crlf_line_endings() {
        assert_eq!(
            parse("```js\r\ncode\r\n```"),
            vec![Segment::CodeBlock {
                language: Some("js".to_string()),
                code: "code".to_string(),
            }]
        );
        assert_eq!(
            parse("```js\r\ncode```"),
            vec![Segment::CodeBlock {
                language: Some("js".to_string()),
                code: "code".to_string(),
            }]
        );
    }

    #[test]
    fn test_code_block_without_language() {
        assert_eq!(
            parse("```let x = 1;```"),
            vec![Segment::CodeBlock {
                language: None,
                code: "let x = 1;".to_string(),
            }]
        );
    }

    #[test]
    fn test_bold_markers() {
        assert_eq!(to_markup("###bold###"), "<strong>bold</strong>");
        assert_eq!(to_markup("##bold##"), "<strong>bold</strong>");
        assert_eq!(
            parse("a ##b## c"),
            vec![
                Segment::Text("a ".to_string()),
                Segment::Bold("b".to_string()),
                Segment::Text(" c".to_string()),
            ]
        );
    }

    #[test]
    fn test_plain_text_unchanged() {
        let text = "Hello there, nothing special here.\nSecond line.";
        assert_eq!(to_markup(text), text);
        assert_eq!(parse(text), vec![Segment::Text(text.to_string())]);
    }

    #[test]
    fn test_markers_inside_code_are_literal() {
        assert_eq!(
            parse("```\n##not bold## and `tick`\n```"),
            vec![Segment::CodeBlock {
                language: None,
                code: "##not bold## and `tick`".to_string(),
            }]
        );
        assert_eq!(parse("`##x##`"), vec![Segment::InlineCode("##x##".to_string())]);
    }

    #[test]
    fn test_html_is_escaped() {
        assert_eq!(
            to_markup("<img src=x onerror=alert(1)> `<b>`"),
            "&lt;img src=x onerror=alert(1)&gt; <code class='inline-code'>&lt;b&gt;</code>"
        );
        assert_eq!(to_markup("##<script>##"), "<strong>&lt;script&gt;</strong>");
    }

    #[test]
    fn test_unclosed_markers_stay_text() {
        assert_eq!(to_markup("```js\nno end"), "```js\nno end");
        assert_eq!(to_markup("a `b"), "a `b");
    }
}
