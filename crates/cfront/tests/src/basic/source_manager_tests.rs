use super::*;

fn manager_with(text: &str) -> (SourceManager, FileId) {
    let mut sm = SourceManager::new();
    let file_id = sm.create_file_id_for_buffer("input.c", text.as_bytes().to_vec());
    (sm, file_id)
}

#[test]
fn line_and_column_queries() {
    // Ten lines; line 7 is "line seven" and column 5 is 'e'.
    let text = "one\ntwo\nthree\nfour\nfive\nsix\nline seven\neight\nnine\nten\n";
    let (sm, file_id) = manager_with(text);

    let line7_start = text.lines().take(6).map(|l| l.len() + 1).sum::<usize>() as u32;
    let loc = sm.location_for_offset(file_id, line7_start + 4);
    assert_eq!(sm.line_number(loc), 7);
    assert_eq!(sm.column_number(loc), 5);
}

#[test]
fn line_numbers_are_monotonic() {
    let text = "a\nbb\r\nccc\rdddd\n\reeee";
    let (sm, file_id) = manager_with(text);
    let mut last = 0;
    for offset in 0..text.len() as u32 {
        let line = sm.line_number(sm.location_for_offset(file_id, offset));
        assert!(line >= last, "line number regressed at offset {offset}");
        last = line;
    }
}

#[test]
fn crlf_pairs_terminate_one_line() {
    let (sm, file_id) = manager_with("a\r\nb\n\rc");
    // 'a' line 1, 'b' line 2, 'c' line 3.
    assert_eq!(sm.line_number(sm.location_for_offset(file_id, 0)), 1);
    assert_eq!(sm.line_number(sm.location_for_offset(file_id, 3)), 2);
    assert_eq!(sm.line_number(sm.location_for_offset(file_id, 6)), 3);
}

#[test]
fn nearby_line_queries_use_the_cache() {
    let text = (1..=100).map(|i| format!("line {i}\n")).collect::<String>();
    let (sm, file_id) = manager_with(&text);

    // Walk forward a few lines at a time; the narrowed search must agree
    // with a fresh binary search.
    let mut offset = 0u32;
    for expected_line in 1..=100u32 {
        let loc = sm.location_for_offset(file_id, offset);
        assert_eq!(sm.line_number(loc), expected_line);
        offset += format!("line {expected_line}\n").len() as u32;
    }
    // And backwards.
    assert_eq!(sm.line_number(sm.location_for_offset(file_id, 0)), 1);
}

#[test]
fn large_buffers_are_chunked() {
    let chunk = 1u32 << SourceLocation::FILE_POS_BITS;
    let size = chunk + chunk / 2;
    let mut text = vec![b'x'; size as usize];
    // Sprinkle newlines so line queries stay meaningful.
    for i in (0..size as usize).step_by(1000) {
        text[i] = b'\n';
    }
    let mut sm = SourceManager::new();
    let first = sm.create_file_id_for_buffer("big.c", text);

    // An offset beyond the first chunk resolves through the second chunk's
    // FileId and decomposes back to the flat offset.
    let offset = chunk + 17;
    let loc = sm.location_for_offset(first, offset);
    assert_eq!(loc.file_id(), FileId(first.index() + 1));
    let (decomposed_file, decomposed_offset) = sm.decomposed_file_loc(loc);
    assert_eq!(decomposed_file, first);
    assert_eq!(decomposed_offset, offset);
}

#[test]
fn instantiation_locs_fuse_into_recent_entries() {
    let (mut sm, file_id) = manager_with("#define M(x) x+1\nint y = M(2);\n");
    let use_loc = sm.location_for_offset(file_id, 25);
    let phys_a = sm.location_for_offset(file_id, 13);
    let phys_b = sm.location_for_offset(file_id, 15);

    let loc_a = sm.instantiation_loc(phys_a, use_loc);
    let loc_b = sm.instantiation_loc(phys_b, use_loc);
    assert!(loc_a.is_macro_id());
    assert!(loc_b.is_macro_id());
    // Same instantiation point, same file, small delta: one table entry.
    assert_eq!(loc_a.macro_id(), loc_b.macro_id());
    assert_eq!(loc_b.macro_phys_offs(), 2);

    assert_eq!(sm.physical_loc(loc_b), phys_b);
    assert_eq!(sm.logical_loc(loc_b), use_loc);
    // File locations are their own physical and logical form.
    assert_eq!(sm.physical_loc(phys_a), phys_a);
    assert_eq!(sm.logical_loc(phys_a), phys_a);
}

#[test]
fn distant_physical_locations_get_fresh_entries() {
    let text = "x".repeat(4096);
    let (mut sm, file_id) = manager_with(&text);
    let use_loc = sm.location_for_offset(file_id, 0);
    let near = sm.instantiation_loc(sm.location_for_offset(file_id, 10), use_loc);
    let far = sm.instantiation_loc(sm.location_for_offset(file_id, 3000), use_loc);
    // A delta beyond the packed width cannot share the entry.
    assert_ne!(near.macro_id(), far.macro_id());
}

#[test]
fn include_stack_walks_to_the_main_file() {
    let mut sm = SourceManager::new();
    let main = sm.create_file_id_for_buffer("main.c", b"#include \"a.h\"\n".to_vec());
    let include_loc = sm.location_for_offset(main, 0);
    let header = sm.create_file_id_for_bytes("a.h".to_owned(), b"int x;\n".to_vec(), include_loc);

    let in_header = sm.location_for_offset(header, 4);
    let stack = sm.include_stack(in_header);
    assert_eq!(stack, vec![include_loc]);
    assert!(sm.include_stack(include_loc).is_empty());
}

#[test]
fn character_data_and_source_name() {
    let (sm, file_id) = manager_with("abcdef");
    let loc = sm.location_for_offset(file_id, 2);
    assert_eq!(&sm.character_data(loc)[..3], b"cde");
    assert_eq!(sm.source_name(loc), "input.c");
}

#[test]
fn missing_file_reports_an_error() {
    let mut sm = SourceManager::new();
    let result = sm.create_file_id(std::path::Path::new("/nonexistent/definitely_missing.c"), SourceLocation::invalid());
    assert!(result.is_err());
}
