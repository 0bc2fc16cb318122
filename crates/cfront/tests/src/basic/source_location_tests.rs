use super::*;

#[test]
fn invalid_is_the_zero_sentinel() {
    let loc = SourceLocation::invalid();
    assert!(!loc.is_valid());
    assert!(loc.is_file_id());
    assert_eq!(loc.raw_encoding(), 0);
}

#[test]
fn file_locations_round_trip() {
    for (file, offset) in [(1u32, 0u32), (1, 1), (5, 12345), (42, (1 << 20) - 1)] {
        let loc = SourceLocation::file_loc(FileId(file), offset);
        assert!(loc.is_valid());
        assert!(loc.is_file_id());
        assert_eq!(loc.file_id(), FileId(file));
        assert_eq!(loc.raw_file_pos(), offset);
        let rebuilt = SourceLocation::file_loc(loc.file_id(), loc.raw_file_pos());
        assert_eq!(rebuilt, loc);
    }
}

#[test]
fn macro_locations_round_trip() {
    let loc = SourceLocation::macro_loc(MacroId(77), 33, 1);
    assert!(loc.is_macro_id());
    assert_eq!(loc.macro_id(), MacroId(77));
    assert_eq!(loc.macro_phys_offs(), 33);
    assert_eq!(loc.macro_log_offs(), 1);
}

#[test]
fn file_offset_carries_into_the_next_chunk() {
    let near_end = SourceLocation::file_loc(FileId(3), (1 << SourceLocation::FILE_POS_BITS) - 1);
    let bumped = near_end.file_loc_with_offset(1);
    assert_eq!(bumped.file_id(), FileId(4));
    assert_eq!(bumped.raw_file_pos(), 0);
}

#[test]
fn phys_offs_validity_matches_the_packed_width() {
    assert!(SourceLocation::is_valid_macro_phys_offs(0));
    assert!(SourceLocation::is_valid_macro_phys_offs((1 << SourceLocation::MACRO_PHYS_OFFS_BITS) - 1));
    assert!(!SourceLocation::is_valid_macro_phys_offs(1 << SourceLocation::MACRO_PHYS_OFFS_BITS));
    assert!(!SourceLocation::is_valid_macro_phys_offs(-1));
}

#[test]
fn raw_encoding_round_trips() {
    let loc = SourceLocation::file_loc(FileId(9), 4096);
    assert_eq!(SourceLocation::from_raw_encoding(loc.raw_encoding()), loc);
}
