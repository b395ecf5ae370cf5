use pulldown_cmark::{html, CowStr, Event, Parser, Tag};
use tracing::debug;

/// Convert markdown from an untrusted source into HTML that is safe to inject.
///
/// Raw HTML is emitted as escaped text, and link or image destinations with a
/// scheme other than http, https or mailto are replaced by `#`.
pub fn to_html(markdown: &str) -> String {
    let parser = Parser::new_ext(markdown, super::parser_options()).map(sanitize_event);
    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}

fn sanitize_event(event: Event<'_>) -> Event<'_> {
    match event {
        Event::Html(raw) => {
            debug!(len = raw.len(), "escaping raw html from completion");
            Event::Text(raw)
        }
        Event::Start(tag) => Event::Start(sanitize_tag(tag)),
        Event::End(tag) => Event::End(sanitize_tag(tag)),
        other => other,
    }
}

fn sanitize_tag(tag: Tag<'_>) -> Tag<'_> {
    match tag {
        Tag::Link(kind, dest, title) => Tag::Link(kind, safe_destination(dest), title),
        Tag::Image(kind, dest, title) => Tag::Image(kind, safe_destination(dest), title),
        other => other,
    }
}

fn safe_destination(dest: CowStr<'_>) -> CowStr<'_> {
    if is_safe_url(&dest) {
        dest
    } else {
        debug!(url = %dest, "dropping unsafe link destination");
        CowStr::Borrowed("#")
    }
}

/// Relative URLs, fragments and http(s)/mailto are allowed.
pub fn is_safe_url(url: &str) -> bool {
    let trimmed = url.trim_start();
    let scheme_end = trimmed.find(|c: char| matches!(c, ':' | '/' | '?' | '#'));
    match scheme_end {
        Some(idx) if trimmed[idx..].starts_with(':') => {
            let scheme = trimmed[..idx].to_ascii_lowercase();
            matches!(scheme.as_str(), "http" | "https" | "mailto")
        }
        _ => true,
    }
}
