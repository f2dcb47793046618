//! Markdown → ratatui `Text`.
//!
//! Walks `pulldown_cmark` events and builds styled lines from a fixed
//! [`MarkdownStyles`] sheet. Fenced code blocks are buffered until they close,
//! then drawn in a rounded box and highlighted with syntect when the fence
//! names a known language.

use std::sync::LazyLock;

use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use syntect::easy::HighlightLines;
use syntect::highlighting::{Theme, ThemeSet};
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;

static SYNTAXES: LazyLock<SyntaxSet> = LazyLock::new(SyntaxSet::load_defaults_newlines);
static CODE_THEME: LazyLock<Theme> = LazyLock::new(|| {
    let mut themes = ThemeSet::load_defaults();
    themes
        .themes
        .remove("base16-ocean.dark")
        .unwrap_or_default()
});

/// Accent used for headings, links and inline code.
pub const ACCENT: Color = Color::Rgb(0x6C, 0x63, 0xFF);
/// Tint behind inline code.
const CODE_TINT: Color = Color::Rgb(0xF0, 0xF2, 0xFE);
const TAB: &str = "    ";

/// Style sheet for rendered responses.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkdownStyles {
    pub body: Style,
    pub heading1: Style,
    pub heading2: Style,
    /// H3 and below.
    pub heading: Style,
    pub link: Style,
    pub code_inline: Style,
    pub code_block_border: Style,
    /// Used when no syntax definition matches the fence language.
    pub code_block_text: Style,
    pub muted: Style,
}

impl Default for MarkdownStyles {
    fn default() -> Self {
        let accent = Style::default().fg(ACCENT);
        Self {
            body: Style::default(),
            heading1: accent.add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            heading2: accent.add_modifier(Modifier::BOLD),
            heading: accent.add_modifier(Modifier::BOLD | Modifier::ITALIC),
            link: accent.add_modifier(Modifier::UNDERLINED),
            code_inline: accent.bg(CODE_TINT),
            code_block_border: accent.add_modifier(Modifier::DIM),
            code_block_text: Style::default().fg(Color::White),
            muted: Style::default().fg(Color::DarkGray),
        }
    }
}

impl MarkdownStyles {
    fn for_heading(&self, level: HeadingLevel) -> Style {
        match level {
            HeadingLevel::H1 => self.heading1,
            HeadingLevel::H2 => self.heading2,
            _ => self.heading,
        }
    }
}

/// Render markdown into owned, styled text.
pub fn render(content: &str, styles: &MarkdownStyles) -> Text<'static> {
    let options = Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS;
    let mut builder = TextBuilder::new(styles);
    for event in Parser::new_ext(content, options) {
        builder.event(event);
    }
    Text::from(builder.lines)
}

/// Open block containers that affect how new lines start.
enum Container {
    Quote,
    /// `next` is the number of the next ordered item, `None` for bullets.
    List { next: Option<u64> },
}

/// A fenced or indented code block being collected.
struct CodeFence {
    lang: String,
    body: String,
}

struct TextBuilder<'s> {
    sheet: &'s MarkdownStyles,
    lines: Vec<Line<'static>>,
    /// Inline styles, each one patched over its parent.
    inline: Vec<Style>,
    containers: Vec<Container>,
    code: Option<CodeFence>,
    link: Option<String>,
    /// A blank line goes before the next block.
    gap: bool,
    /// The current line is a fresh list marker awaiting its text.
    item_open: bool,
}

impl<'s> TextBuilder<'s> {
    fn new(sheet: &'s MarkdownStyles) -> Self {
        Self {
            sheet,
            lines: Vec::new(),
            inline: Vec::new(),
            containers: Vec::new(),
            code: None,
            link: None,
            gap: false,
            item_open: false,
        }
    }

    fn style(&self) -> Style {
        self.inline.last().copied().unwrap_or(self.sheet.body)
    }

    fn push_style(&mut self, overlay: Style) {
        self.inline.push(self.style().patch(overlay));
    }

    fn quote_depth(&self) -> usize {
        self.containers
            .iter()
            .filter(|c| matches!(c, Container::Quote))
            .count()
    }

    /// Start a new line carrying one `│ ` per open blockquote.
    fn new_line(&mut self) {
        let bar = Span::styled("│ ", self.sheet.muted);
        let prefix = vec![bar; self.quote_depth()];
        self.lines.push(Line::from(prefix));
    }

    fn start_block(&mut self) {
        if self.gap && !self.lines.is_empty() {
            self.new_line();
        }
        self.gap = false;
        self.new_line();
    }

    fn append(&mut self, span: Span<'static>) {
        if self.lines.is_empty() {
            self.new_line();
        }
        if let Some(line) = self.lines.last_mut() {
            line.spans.push(span);
        }
        self.item_open = false;
    }

    fn event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.open(tag),
            Event::End(tag) => self.close(tag),
            Event::Text(text) => match self.code.as_mut() {
                Some(fence) => fence.body.push_str(&text),
                None => {
                    let span = Span::styled(text.replace('\t', TAB), self.style());
                    self.append(span);
                }
            },
            Event::Code(code) => {
                self.append(Span::styled(format!(" {code} "), self.sheet.code_inline));
            }
            Event::SoftBreak => self.append(Span::raw(" ")),
            Event::HardBreak => self.new_line(),
            Event::Rule => {
                self.start_block();
                self.append(Span::styled("─".repeat(40), self.sheet.muted));
                self.gap = true;
            }
            Event::TaskListMarker(done) => {
                self.append(Span::raw(if done { "[x] " } else { "[ ] " }));
            }
            _ => {}
        }
    }

    fn open(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph => {
                if !self.item_open {
                    self.start_block();
                }
            }
            Tag::Heading { level, .. } => {
                self.start_block();
                self.push_style(self.sheet.for_heading(level));
            }
            Tag::BlockQuote(_) => {
                if self.gap && !self.lines.is_empty() {
                    self.new_line();
                    self.gap = false;
                }
                self.containers.push(Container::Quote);
                self.push_style(self.sheet.body.add_modifier(Modifier::DIM | Modifier::ITALIC));
            }
            Tag::CodeBlock(kind) => {
                let lang = match kind {
                    CodeBlockKind::Fenced(lang) => lang.trim().to_string(),
                    CodeBlockKind::Indented => String::new(),
                };
                self.code = Some(CodeFence {
                    lang,
                    body: String::new(),
                });
            }
            Tag::List(start) => {
                if !self.containers.iter().any(|c| matches!(c, Container::List { .. })) {
                    if self.gap && !self.lines.is_empty() {
                        self.new_line();
                    }
                    self.gap = false;
                }
                self.containers.push(Container::List { next: start });
            }
            Tag::Item => self.open_item(),
            Tag::Emphasis => self.push_style(Style::new().add_modifier(Modifier::ITALIC)),
            Tag::Strong => self.push_style(Style::new().add_modifier(Modifier::BOLD)),
            Tag::Strikethrough => self.push_style(Style::new().add_modifier(Modifier::CROSSED_OUT)),
            Tag::Link { dest_url, .. } => {
                self.link = Some(dest_url.into_string());
                self.push_style(self.sheet.link);
            }
            _ => {}
        }
    }

    fn open_item(&mut self) {
        let depth = self
            .containers
            .iter()
            .filter(|c| matches!(c, Container::List { .. }))
            .count()
            .saturating_sub(1);
        let marker = match self.containers.last_mut() {
            Some(Container::List { next: Some(n) }) => {
                let marker = format!("{n}. ");
                *n += 1;
                marker
            }
            _ => "- ".to_string(),
        };
        self.new_line();
        self.append(Span::styled(
            format!("{}{marker}", "  ".repeat(depth)),
            self.sheet.muted,
        ));
        self.item_open = true;
    }

    fn close(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph => self.gap = true,
            TagEnd::Heading(_) => {
                self.inline.pop();
                self.gap = true;
            }
            TagEnd::BlockQuote(_) => {
                self.containers.pop();
                self.inline.pop();
                self.gap = true;
            }
            TagEnd::CodeBlock => {
                if let Some(fence) = self.code.take() {
                    self.code_block(fence);
                }
                self.gap = true;
            }
            TagEnd::List(_) => {
                self.containers.pop();
                self.gap = true;
            }
            TagEnd::Emphasis | TagEnd::Strong | TagEnd::Strikethrough => {
                self.inline.pop();
            }
            TagEnd::Link => {
                self.inline.pop();
                if let Some(url) = self.link.take() {
                    self.append(Span::styled(" (", self.sheet.muted));
                    self.append(Span::styled(url, self.sheet.link));
                    self.append(Span::styled(")", self.sheet.muted));
                }
            }
            _ => {}
        }
    }

    /// Draw a finished code block: labelled top border, `│ ` gutter, bottom border.
    fn code_block(&mut self, fence: CodeFence) {
        let border = self.sheet.code_block_border;
        if !self.lines.is_empty() {
            self.new_line();
        }
        self.gap = false;

        self.new_line();
        if fence.lang.is_empty() {
            self.append(Span::styled("╭──", border));
        } else {
            self.append(Span::styled("╭── ", border));
            self.append(Span::styled(fence.lang.clone(), border.add_modifier(Modifier::BOLD)));
            self.append(Span::styled(" ──", border));
        }

        for spans in highlight(&fence, self.sheet.code_block_text) {
            self.new_line();
            self.append(Span::styled("│ ", border));
            for span in spans {
                self.append(span);
            }
        }

        self.new_line();
        self.append(Span::styled("╰──", border));
    }
}

/// Split a code block into styled spans per line. Falls back to `plain` when
/// the fence language is unknown.
fn highlight(fence: &CodeFence, plain: Style) -> Vec<Vec<Span<'static>>> {
    let syntax = (!fence.lang.is_empty())
        .then(|| SYNTAXES.find_syntax_by_token(&fence.lang))
        .flatten();

    let Some(syntax) = syntax else {
        return fence
            .body
            .lines()
            .map(|line| vec![Span::styled(line.replace('\t', TAB), plain)])
            .collect();
    };

    let mut highlighter = HighlightLines::new(syntax, &CODE_THEME);
    LinesWithEndings::from(&fence.body)
        .map(|line| match highlighter.highlight_line(line, &SYNTAXES) {
            Ok(ranges) => ranges
                .into_iter()
                .filter_map(|(style, piece)| {
                    let piece = piece.trim_end_matches('\n').replace('\t', TAB);
                    let fg = Color::Rgb(style.foreground.r, style.foreground.g, style.foreground.b);
                    (!piece.is_empty()).then(|| Span::styled(piece, Style::default().fg(fg)))
                })
                .collect(),
            Err(_) => vec![Span::styled(
                line.trim_end_matches('\n').replace('\t', TAB),
                plain,
            )],
        })
        .collect()
}
