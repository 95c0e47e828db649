/// Inline text spans with formatting
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Span {
    Text(String),
    Bold(Vec<Span>),
    Italic(Vec<Span>),
    Code(String),
    /// `url` is the raw target; it is scheme-checked when emitted.
    Link { url: String, content: Vec<Span> },
}

/// A single list item, which can contain a nested list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListItem {
    pub content: Vec<Span>,
    pub nested: Option<Box<List>>,
}

/// A list (ordered or unordered)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct List {
    pub ordered: bool,
    pub items: Vec<ListItem>,
}

/// Block-level elements parsed from chat markdown
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Heading {
        level: u8,
        content: Vec<Span>,
    },
    Paragraph {
        content: Vec<Span>,
    },
    CodeBlock {
        /// Info string of the opening fence; never emitted.
        language: Option<String>,
        content: String,
    },
    Blockquote {
        content: Vec<Span>,
    },
    List(List),
}
