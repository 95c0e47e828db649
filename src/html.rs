use crate::block::{Block, List, Span};
use crate::config::Config;
use crate::sanitize::{escape_html, safe_href};

/// Convert blocks to an HTML fragment
pub fn blocks_to_html(blocks: &[Block]) -> String {
    let mut out = String::new();
    for block in blocks {
        emit_block(block, &mut out);
    }
    out
}

/// Wrap an HTML fragment in a standalone page styled from `config`.
pub fn document(fragment: &str, config: &Config) -> String {
    let title = config.document.title.as_deref().unwrap_or("Document");
    let font = if config.font.sans {
        "sans-serif"
    } else {
        "serif"
    };
    let decoration = if config.links.underline {
        "underline"
    } else {
        "none"
    };

    let mut out = String::with_capacity(fragment.len() + 512);
    out.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    out.push_str(&format!("<title>{}</title>\n", escape_html(title)));
    out.push_str("<style>\n");
    out.push_str(&format!(
        "body {{ font-family: {font}; max-width: {}; margin: 0 auto; }}\n",
        escape_html(&config.document.max_width)
    ));
    out.push_str(&format!(
        "a {{ color: {}; text-decoration: {decoration}; }}\n",
        escape_html(&config.links.color)
    ));
    out.push_str("</style>\n</head>\n<body>\n");
    out.push_str(fragment);
    out.push_str("\n</body>\n</html>\n");
    out
}

fn emit_block(block: &Block, out: &mut String) {
    match block {
        Block::Heading { level, content } => {
            // The output tag set stops at h3.
            let tag = match level {
                1 => "h1",
                2 => "h2",
                _ => "h3",
            };
            out.push_str(&format!("<{tag}>"));
            spans_to_html(content, out);
            out.push_str(&format!("</{tag}>"));
        }
        Block::Paragraph { content } => {
            out.push_str("<p>");
            spans_to_html(content, out);
            out.push_str("</p>");
        }
        Block::CodeBlock { content, .. } => {
            out.push_str("<pre><code>");
            out.push_str(&escape_html(content));
            out.push_str("</code></pre>");
        }
        Block::Blockquote { content } => {
            out.push_str("<blockquote>");
            spans_to_html(content, out);
            out.push_str("</blockquote>");
        }
        Block::List(list) => list_to_html(list, out),
    }
}

fn spans_to_html(spans: &[Span], out: &mut String) {
    for span in spans {
        span_to_html(span, out);
    }
}

fn span_to_html(span: &Span, out: &mut String) {
    match span {
        Span::Text(text) => out.push_str(&escape_html(text)),
        Span::Bold(inner) => {
            out.push_str("<strong>");
            spans_to_html(inner, out);
            out.push_str("</strong>");
        }
        Span::Italic(inner) => {
            out.push_str("<em>");
            spans_to_html(inner, out);
            out.push_str("</em>");
        }
        Span::Code(text) => {
            out.push_str("<code>");
            out.push_str(&escape_html(text));
            out.push_str("</code>");
        }
        Span::Link { url, content } => {
            out.push_str("<a href=\"");
            out.push_str(&escape_html(&safe_href(url)));
            out.push_str("\">");
            spans_to_html(content, out);
            out.push_str("</a>");
        }
    }
}

fn list_to_html(list: &List, out: &mut String) {
    let tag = if list.ordered { "ol" } else { "ul" };

    out.push_str(&format!("<{tag}>"));
    for item in &list.items {
        out.push_str("<li>");
        spans_to_html(&item.content, out);
        if let Some(ref nested) = item.nested {
            list_to_html(nested, out);
        }
        out.push_str("</li>");
    }
    out.push_str(&format!("</{tag}>"));
}

#[cfg(test)]
mod tests {
    use crate::{Config, markdown_to_document, markdown_to_html};
    use pretty_assertions::assert_eq;

    #[test]
    fn empty() {
        assert_eq!(markdown_to_html(""), "");
    }

    #[test]
    fn headings() {
        assert_eq!(
            markdown_to_html("# Heading 1\n## Heading 2\n### Heading 3"),
            "<h1>Heading 1</h1><h2>Heading 2</h2><h3>Heading 3</h3>"
        );
    }

    #[test]
    fn deeper_headings_fall_back_to_paragraphs() {
        assert_eq!(markdown_to_html("#### Four"), "<p>#### Four</p>");
    }

    #[test]
    fn paragraph() {
        assert_eq!(markdown_to_html("Hello world"), "<p>Hello world</p>");
    }

    #[test]
    fn inline_spans() {
        assert_eq!(
            markdown_to_html("**bold** *italic* `code` [link](https://example.com)"),
            "<p><strong>bold</strong> <em>italic</em> <code>code</code> \
             <a href=\"https://example.com\">link</a></p>"
        );
    }

    #[test]
    fn list_closes_on_blank_line() {
        assert_eq!(
            markdown_to_html("* a\n* b\n\nnext paragraph"),
            "<ul><li>a</li><li>b</li></ul><p>next paragraph</p>"
        );
    }

    #[test]
    fn list_closes_on_paragraph() {
        assert_eq!(
            markdown_to_html("- a\ntext"),
            "<ul><li>a</li></ul><p>text</p>"
        );
    }

    #[test]
    fn ordered_list() {
        assert_eq!(
            markdown_to_html("1. one\n2. **two**"),
            "<ol><li>one</li><li><strong>two</strong></li></ol>"
        );
    }

    #[test]
    fn nested_list() {
        assert_eq!(
            markdown_to_html("* a\n  * b"),
            "<ul><li>a<ul><li>b</li></ul></li></ul>"
        );
    }

    #[test]
    fn code_block() {
        assert_eq!(
            markdown_to_html("```\ncode\nmultiple lines\n```"),
            "<pre><code>code\nmultiple lines</code></pre>"
        );
    }

    #[test]
    fn code_block_is_literal() {
        assert_eq!(
            markdown_to_html("```\n**x** <b>\n```"),
            "<pre><code>**x** &lt;b&gt;</code></pre>"
        );
    }

    #[test]
    fn unclosed_code_block() {
        assert_eq!(
            markdown_to_html("text\n```\nlet x;"),
            "<p>text</p><pre><code>let x;</code></pre>"
        );
    }

    #[test]
    fn blockquote() {
        assert_eq!(
            markdown_to_html("> quoted *text*\n> continues\n\nafter"),
            "<blockquote>quoted <em>text</em> continues</blockquote><p>after</p>"
        );
    }

    #[test]
    fn script_tags_are_escaped() {
        assert_eq!(
            markdown_to_html("<script>alert('x')</script>"),
            "<p>&lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt;</p>"
        );
    }

    #[test]
    fn attributes_cannot_escape_href() {
        assert_eq!(
            markdown_to_html("[x](https://a.com\" onclick=\"evil())"),
            "<p><a href=\"https://a.com&quot; onclick=&quot;evil()\">x</a></p>"
        );
    }

    #[test]
    fn javascript_links_are_defanged() {
        assert_eq!(
            markdown_to_html("[x](javascript:alert(1))"),
            "<p><a href=\"#\">x</a></p>"
        );
        assert_eq!(
            markdown_to_html("* [y](JAVASCRIPT:void(0))"),
            "<ul><li><a href=\"#\">y</a></li></ul>"
        );
    }

    #[test]
    fn javascript_links_written_with_character_references_are_defanged() {
        assert_eq!(
            markdown_to_html("[x](javascript&#58;alert(1))"),
            "<p><a href=\"#\">x</a></p>"
        );
        assert_eq!(
            markdown_to_html("[x](&#106;avascript:alert(1))"),
            "<p><a href=\"#\">x</a></p>"
        );
        assert_eq!(
            markdown_to_html("[x](java&Tab;script:alert(1))"),
            "<p><a href=\"#\">x</a></p>"
        );
        assert_eq!(
            markdown_to_html("[x](https://a.com/?q=1&r=2)"),
            "<p><a href=\"https://a.com/?q=1&r=2\">x</a></p>"
        );
    }

    #[test]
    fn escaped_text_inside_spans() {
        assert_eq!(
            markdown_to_html("**<i>** `<b>`"),
            "<p><strong>&lt;i&gt;</strong> <code>&lt;b&gt;</code></p>"
        );
    }

    #[test]
    fn malformed_markdown_degrades_to_text() {
        assert_eq!(
            markdown_to_html("**open [link](\n`tick\n>"),
            "<p>**open [link](</p><p>`tick</p><p>&gt;</p>"
        );
    }

    #[test]
    fn standalone_document_embeds_fragment() {
        let mut config = Config::compiled_default();
        config.document.title = Some("<Bio>".to_string());
        let page = markdown_to_document("# Hi", &config);

        assert!(page.starts_with("<!DOCTYPE html>\n"));
        assert!(page.contains("<title>&lt;Bio&gt;</title>"));
        assert!(page.contains("a { color: #1a4f8b; text-decoration: underline; }"));
        assert!(page.contains("<body>\n<h1>Hi</h1>\n</body>"));
    }

    #[test]
    fn standalone_document_uses_font_and_link_settings() {
        let mut config = Config::compiled_default();
        config.font.sans = true;
        config.links.underline = false;
        config.links.color = "red".to_string();
        let page = markdown_to_document("", &config);

        assert!(page.contains("font-family: sans-serif"));
        assert!(page.contains("a { color: red; text-decoration: none; }"));
        assert!(page.contains("<title>Document</title>"));
    }
}
