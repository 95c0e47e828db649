use tracing::trace;

use crate::block::{Block, List, ListItem};
use crate::inline;

const FENCE: &str = "```";

/// Parse chat markdown into a list of blocks
pub fn parse(markdown: &str) -> Vec<Block> {
    let mut blocks = Vec::new();
    let mut state = BlockState::None;

    for line in markdown.split('\n') {
        let line = line.strip_suffix('\r').unwrap_or(line);
        state = process_line(line, state, &mut blocks);
    }
    close(state, &mut blocks);

    blocks
}

/// The multi-line block currently being accumulated.
enum BlockState<'a> {
    None,
    CodeBlock {
        language: Option<&'a str>,
        lines: Vec<&'a str>,
    },
    Blockquote {
        lines: Vec<&'a str>,
    },
    UnorderedList(ListBuilder),
    OrderedList(ListBuilder),
}

impl BlockState<'_> {
    fn name(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::CodeBlock { .. } => "code_block",
            Self::Blockquote { .. } => "blockquote",
            Self::UnorderedList(_) => "unordered_list",
            Self::OrderedList(_) => "ordered_list",
        }
    }
}

fn process_line<'a>(
    line: &'a str,
    state: BlockState<'a>,
    blocks: &mut Vec<Block>,
) -> BlockState<'a> {
    // Code fences
    if let BlockState::CodeBlock {
        language,
        mut lines,
    } = state
    {
        if line.trim() == FENCE {
            close(BlockState::CodeBlock { language, lines }, blocks);
            return BlockState::None;
        }
        lines.push(line);
        return BlockState::CodeBlock { language, lines };
    }
    if let Some(language) = fence_open(line) {
        close(state, blocks);
        return BlockState::CodeBlock {
            language,
            lines: Vec::new(),
        };
    }

    // Blockquotes
    if let Some(rest) = line.strip_prefix("> ") {
        return match state {
            BlockState::Blockquote { mut lines } => {
                lines.push(rest);
                BlockState::Blockquote { lines }
            }
            other => {
                close(other, blocks);
                BlockState::Blockquote { lines: vec![rest] }
            }
        };
    }
    let state = match state {
        quote @ BlockState::Blockquote { .. } => {
            close(quote, blocks);
            BlockState::None
        }
        other => other,
    };

    // Blank lines end lists
    if line.trim().is_empty() {
        close(state, blocks);
        return BlockState::None;
    }

    if let Some((level, rest)) = heading(line) {
        close(state, blocks);
        blocks.push(Block::Heading {
            level,
            content: inline::parse(rest.trim()),
        });
        return BlockState::None;
    }

    if let Some(item) = list_item(line) {
        return push_list_item(state, item, blocks);
    }

    close(state, blocks);
    blocks.push(Block::Paragraph {
        content: inline::parse(line.trim()),
    });
    BlockState::None
}

/// Returns the info string (if any) when `line` opens a code fence.
fn fence_open(line: &str) -> Option<Option<&str>> {
    let info = line.trim().strip_prefix(FENCE)?;
    if info.contains('`') {
        return None;
    }
    let info = info.trim();
    Some((!info.is_empty()).then_some(info))
}

fn heading(line: &str) -> Option<(u8, &str)> {
    [("### ", 3), ("## ", 2), ("# ", 1)]
        .into_iter()
        .find_map(|(prefix, level)| line.strip_prefix(prefix).map(|rest| (level, rest)))
}

/// A line recognised as a list item.
#[derive(Clone, Copy)]
struct ItemLine<'a> {
    indent: usize,
    ordered: bool,
    text: &'a str,
}

impl ItemLine<'_> {
    fn into_list_item(self) -> ListItem {
        ListItem {
            content: inline::parse(self.text.trim()),
            nested: None,
        }
    }
}

fn list_item(line: &str) -> Option<ItemLine<'_>> {
    let trimmed = line.trim_start();
    let indent = line[..line.len() - trimmed.len()].chars().count();

    if let Some(text) = trimmed
        .strip_prefix("* ")
        .or_else(|| trimmed.strip_prefix("- "))
    {
        return Some(ItemLine {
            indent,
            ordered: false,
            text,
        });
    }

    // `\d+\.` followed by whitespace; the number itself is dropped.
    let digits = trimmed.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    let mut rest = trimmed[digits..].strip_prefix('.')?.chars();
    if !rest.next()?.is_whitespace() {
        return None;
    }
    Some(ItemLine {
        indent,
        ordered: true,
        text: rest.as_str(),
    })
}

fn push_list_item<'a>(
    state: BlockState<'a>,
    item: ItemLine<'_>,
    blocks: &mut Vec<Block>,
) -> BlockState<'a> {
    match state {
        BlockState::UnorderedList(mut list) if !item.ordered || !list.at_root(item.indent) => {
            list.push(item);
            BlockState::UnorderedList(list)
        }
        BlockState::OrderedList(mut list) if item.ordered || !list.at_root(item.indent) => {
            list.push(item);
            BlockState::OrderedList(list)
        }
        other => {
            close(other, blocks);
            let list = ListBuilder::new(item);
            if item.ordered {
                BlockState::OrderedList(list)
            } else {
                BlockState::UnorderedList(list)
            }
        }
    }
}

/// Emit the block held by `state`, if any.
fn close(state: BlockState<'_>, blocks: &mut Vec<Block>) {
    if !matches!(state, BlockState::None) {
        trace!(block = state.name(), "closing block");
    }
    match state {
        BlockState::None => {}
        BlockState::CodeBlock { language, lines } => blocks.push(Block::CodeBlock {
            language: language.map(str::to_string),
            content: lines.join("\n"),
        }),
        BlockState::Blockquote { lines } => blocks.push(Block::Blockquote {
            content: inline::parse(lines.join(" ").trim()),
        }),
        BlockState::UnorderedList(list) | BlockState::OrderedList(list) => {
            blocks.push(Block::List(list.finish()));
        }
    }
}

/// One open list level and the indent its items sit at.
struct Level {
    indent: usize,
    list: List,
}

/// Builds a list tree from indented item lines. The first level is the
/// outermost list; nested levels are attached to their parent item when
/// they close.
struct ListBuilder {
    levels: Vec<Level>,
}

impl ListBuilder {
    fn new(item: ItemLine<'_>) -> Self {
        Self {
            levels: vec![Level {
                indent: item.indent,
                list: List {
                    ordered: item.ordered,
                    items: vec![item.into_list_item()],
                },
            }],
        }
    }

    /// Whether an item at `indent` would be a sibling in the outermost list.
    fn at_root(&self, indent: usize) -> bool {
        self.levels.first().is_none_or(|root| indent <= root.indent)
    }

    fn push(&mut self, item: ItemLine<'_>) {
        loop {
            let depth = self.levels.len();
            let Some(top) = self.levels.last_mut() else {
                *self = Self::new(item);
                return;
            };

            if item.indent > top.indent {
                if let Some(parent) = top.list.items.last_mut() {
                    // Reopen the parent's nested list if one was closed earlier.
                    let mut list = parent.nested.take().map_or_else(
                        || List {
                            ordered: item.ordered,
                            items: Vec::new(),
                        },
                        |nested| *nested,
                    );
                    list.items.push(item.into_list_item());
                    self.levels.push(Level {
                        indent: item.indent,
                        list,
                    });
                    return;
                }
            }

            if item.indent >= top.indent || depth == 1 {
                top.list.items.push(item.into_list_item());
                return;
            }

            self.close_level();
        }
    }

    fn close_level(&mut self) {
        if self.levels.len() < 2 {
            return;
        }
        let Some(level) = self.levels.pop() else {
            return;
        };
        if let Some(parent) = self
            .levels
            .last_mut()
            .and_then(|parent| parent.list.items.last_mut())
        {
            parent.nested = Some(Box::new(level.list));
        }
    }

    fn finish(mut self) -> List {
        while self.levels.len() > 1 {
            self.close_level();
        }
        self.levels.pop().map_or_else(
            || List {
                ordered: false,
                items: Vec::new(),
            },
            |root| root.list,
        )
    }
}
