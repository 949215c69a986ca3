use skillcheck::blocks::extract_blocks;

// ---------------------------------------------------------------------------
// Basic extraction
// ---------------------------------------------------------------------------

#[test]
fn simple_block_is_extracted() {
    let extracted = extract_blocks("```python\nx = 1\n```\n");
    assert_eq!(extracted.blocks.len(), 1);
    assert!(extracted.unterminated.is_none());

    let block = &extracted.blocks[0];
    assert_eq!(block.index, 0);
    assert_eq!(block.language, "python");
    assert_eq!(block.text, "x = 1");
    assert_eq!(block.start_line, 2);
    assert_eq!(block.end_line, 3);
}

#[test]
fn indices_are_contiguous_and_in_source_order() {
    let body = "intro\n```python\na = 1\n```\nmiddle\n```bash\nls\n```\n```\nplain\n```\n";
    let extracted = extract_blocks(body);
    assert_eq!(extracted.blocks.len(), 3);
    for (i, block) in extracted.blocks.iter().enumerate() {
        assert_eq!(block.index, i);
    }
    assert_eq!(extracted.blocks[0].language, "python");
    assert_eq!(extracted.blocks[1].language, "bash");
    assert_eq!(extracted.blocks[2].language, "");
}

#[test]
fn line_numbers_use_source_coordinates() {
    let body = "title\n\n```python\na = 1\nb = 2\n```\n";
    let extracted = extract_blocks(body);
    let block = &extracted.blocks[0];
    assert_eq!(block.start_line, 4);
    assert_eq!(block.end_line, 6);
}

#[test]
fn empty_block_has_empty_text() {
    let extracted = extract_blocks("```\n```\n");
    assert_eq!(extracted.blocks.len(), 1);
    assert_eq!(extracted.blocks[0].text, "");
}

#[test]
fn rerun_on_identical_input_yields_identical_blocks() {
    let body = "```python\nx = 1\n```\ntext\n```bash\nls\n```\n";
    let first = extract_blocks(body);
    let second = extract_blocks(body);
    assert_eq!(first.blocks, second.blocks);
}

// ---------------------------------------------------------------------------
// Fence matching
// ---------------------------------------------------------------------------

#[test]
fn tilde_fences_are_recognized() {
    let extracted = extract_blocks("~~~python\nx = 1\n~~~\n");
    assert_eq!(extracted.blocks.len(), 1);
    assert_eq!(extracted.blocks[0].language, "python");
}

#[test]
fn longer_outer_fence_keeps_inner_fence_literal() {
    let body = "````markdown\nUsage:\n```python\nx = 1\n```\n````\n";
    let extracted = extract_blocks(body);
    assert_eq!(extracted.blocks.len(), 1);

    let block = &extracted.blocks[0];
    assert_eq!(block.language, "markdown");
    assert!(block.text.contains("```python"));
    assert_eq!(block.start_line, 2);
    assert_eq!(block.end_line, 6);
}

#[test]
fn shorter_inner_fence_does_not_close_outer() {
    // The three-backtick line inside the four-backtick fence is content.
    let extracted = extract_blocks("````\n```\nstill inside\n````\n");
    assert_eq!(extracted.blocks.len(), 1);
    assert!(extracted.blocks[0].text.contains("still inside"));
}

#[test]
fn longer_closing_fence_closes_the_block() {
    let extracted = extract_blocks("```python\nx = 1\n`````\n");
    assert_eq!(extracted.blocks.len(), 1);
    assert!(extracted.unterminated.is_none());
}

#[test]
fn mismatched_fence_char_does_not_close() {
    let extracted = extract_blocks("```python\nx = 1\n~~~\n```\n");
    assert_eq!(extracted.blocks.len(), 1);
    assert!(extracted.blocks[0].text.contains("~~~"));
}

#[test]
fn two_char_run_is_not_a_fence() {
    let extracted = extract_blocks("``\nnot a block\n``\n");
    assert!(extracted.blocks.is_empty());
}

// ---------------------------------------------------------------------------
// Unterminated fences
// ---------------------------------------------------------------------------

#[test]
fn unterminated_fence_yields_no_block() {
    let extracted = extract_blocks("```python\nx = 1\n");
    assert!(extracted.blocks.is_empty());
    assert_eq!(extracted.unterminated, Some(1));
}

#[test]
fn closed_blocks_before_unterminated_fence_survive() {
    let body = "```python\na = 1\n```\n\n```bash\ndangling\n";
    let extracted = extract_blocks(body);
    assert_eq!(extracted.blocks.len(), 1);
    assert_eq!(extracted.unterminated, Some(5));
}
