//! Fenced code-block extraction.
//!
//! Scans a document body line by line for fenced code segments. A fence is a
//! run of three or more identical fence characters (`` ` `` or `~`),
//! optionally followed by an info string whose first token is the language
//! tag. The block closes at the next line whose fence run uses the same
//! character and is **at least as long** — so an outer four-backtick fence
//! can carry a literal three-backtick fence inside it without closing early.
//!
//! Blocks are yielded in source order with contiguous zero-based indices;
//! this is the canonical iteration order for every downstream rule. Line
//! numbers are 1-based in the source file's coordinate space.

/// One extracted fenced block. Produced once; never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeBlock {
    /// Zero-based position within the document.
    pub index: usize,
    /// Language tag from the info string; may be empty.
    pub language: String,
    /// Block content, without the fence lines.
    pub text: String,
    /// First content line (1-based). For an empty block this is the line
    /// directly after the opening fence.
    pub start_line: usize,
    /// Line of the closing fence (1-based).
    pub end_line: usize,
}

/// Extraction output: the closed blocks plus, when the document ends inside
/// an open fence, the 1-based line of the dangling opening fence. The
/// dangling span yields no block and is not analyzed further.
#[derive(Debug, Clone)]
pub struct ExtractedBlocks {
    pub blocks: Vec<CodeBlock>,
    pub unterminated: Option<usize>,
}

struct OpenFence {
    ch: char,
    len: usize,
    language: String,
    open_line: usize,
    content: Vec<String>,
}

/// Scans `body` and extracts every fenced code block.
pub fn extract_blocks(body: &str) -> ExtractedBlocks {
    let mut blocks = Vec::new();
    let mut open: Option<OpenFence> = None;

    for (idx, line) in body.lines().enumerate() {
        let line_num = idx + 1;

        match open {
            Some(ref mut fence) if !closes(line, fence.ch, fence.len) => {
                fence.content.push(line.to_string());
            }
            Some(_) => {
                if let Some(fence) = open.take() {
                    blocks.push(CodeBlock {
                        index: blocks.len(),
                        language: fence.language,
                        text: fence.content.join("\n"),
                        start_line: fence.open_line + 1,
                        end_line: line_num,
                    });
                }
            }
            None => {
                if let Some((ch, len, info)) = parse_fence(line) {
                    // A backtick fence whose info string carries a backtick
                    // is inline code, not a fence opener (tilde fences have
                    // no such restriction).
                    if ch == '`' && info.contains('`') {
                        continue;
                    }
                    let language = info.split_whitespace().next().unwrap_or("").to_string();
                    open = Some(OpenFence {
                        ch,
                        len,
                        language,
                        open_line: line_num,
                        content: Vec::new(),
                    });
                }
            }
        }
    }

    ExtractedBlocks {
        unterminated: open.map(|f| f.open_line),
        blocks,
    }
}

/// Recognises a fence line: up to three leading spaces, then a run of three
/// or more identical fence characters. Returns the fence character, the run
/// length, and the trimmed info string.
fn parse_fence(line: &str) -> Option<(char, usize, &str)> {
    let rest = strip_indent(line)?;
    let ch = rest.chars().next()?;
    if ch != '`' && ch != '~' {
        return None;
    }
    let len = rest.chars().take_while(|&c| c == ch).count();
    if len < 3 {
        return None;
    }
    Some((ch, len, rest[len..].trim()))
}

/// A closing fence is a run of the same character, at least as long as the
/// opener, with nothing but whitespace around it.
fn closes(line: &str, ch: char, open_len: usize) -> bool {
    let Some(rest) = strip_indent(line) else {
        return false;
    };
    let len = rest.chars().take_while(|&c| c == ch).count();
    len >= open_len && rest[len..].trim().is_empty()
}

/// Strips up to three leading spaces; more indentation means the line is an
/// indented code line, not a fence.
fn strip_indent(line: &str) -> Option<&str> {
    let spaces = line.chars().take_while(|&c| c == ' ').count();
    if spaces > 3 {
        return None;
    }
    Some(&line[spaces..])
}
