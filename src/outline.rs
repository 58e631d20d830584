//! Read-only outline of a document body.
//!
//! Posts in this corpus are mostly prose around short illustrative code
//! snippets. The outline lists the headings and the code blocks (with their
//! highlight language) so `show` and the JSON report can summarise a post
//! without rendering it. Markdown expansion itself stays with the site
//! generator.

use pulldown_cmark::{CodeBlockKind, Event, Parser, Tag, TagEnd};
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Outline {
    pub headings: Vec<Heading>,
    pub code_blocks: Vec<CodeBlock>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Heading {
    pub level: u8,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CodeBlock {
    /// Info-string language of a fenced block; `None` for untagged or indented blocks.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    pub lines: usize,
}

impl Outline {
    /// Distinct code block languages in first-seen order.
    pub fn languages(&self) -> Vec<&str> {
        let mut langs: Vec<&str> = Vec::new();
        for lang in self.code_blocks.iter().filter_map(|b| b.language.as_deref()) {
            if !langs.contains(&lang) {
                langs.push(lang);
            }
        }
        langs
    }
}

/// Build the outline of a Markdown body.
pub fn outline(body: &str) -> Outline {
    let mut out = Outline::default();
    let mut heading: Option<Heading> = None;
    let mut code: Option<CodeBlock> = None;

    for event in Parser::new(body) {
        match event {
            Event::Start(Tag::Heading { level, .. }) => {
                heading = Some(Heading {
                    level: level as u8,
                    text: String::new(),
                });
            }
            Event::End(TagEnd::Heading(_)) => {
                if let Some(mut h) = heading.take() {
                    h.text = h.text.trim().to_string();
                    out.headings.push(h);
                }
            }
            Event::Start(Tag::CodeBlock(kind)) => {
                let language = match kind {
                    CodeBlockKind::Fenced(info) => info
                        .split_whitespace()
                        .next()
                        .map(|lang| lang.trim_matches(|c| c == '{' || c == '}').to_string())
                        .filter(|lang| !lang.is_empty()),
                    CodeBlockKind::Indented => None,
                };
                code = Some(CodeBlock { language, lines: 0 });
            }
            Event::End(TagEnd::CodeBlock) => {
                if let Some(block) = code.take() {
                    out.code_blocks.push(block);
                }
            }
            Event::Text(text) | Event::Code(text) => {
                if let Some(block) = code.as_mut() {
                    block.lines += text.lines().count();
                } else if let Some(h) = heading.as_mut() {
                    h.text.push_str(&text);
                }
            }
            _ => {}
        }
    }

    out
}
