use super::*;
use pretty_assertions::assert_eq;
use test_case::test_case;

const BUNDLED: &str = include_str!("../../data/opcodes.json");

fn minimal(unprefixed: &str, cbprefixed: &str) -> String {
    format!(r#"{{ "unprefixed": {{ {unprefixed} }}, "cbprefixed": {{ {cbprefixed} }} }}"#)
}

#[test]
fn test_bundled_catalog_is_complete() {
    let catalog = Catalog::from_json_str(BUNDLED).unwrap();
    assert_eq!(catalog.unprefixed_len(), 256);
    assert_eq!(catalog.cbprefixed_len(), 256);
}

#[test]
fn test_entry_fields() {
    let catalog = Catalog::from_json_str(BUNDLED).unwrap();
    let ld = catalog.unprefixed(0x3E).unwrap();
    assert_eq!(ld.mnemonic, "LD");
    assert_eq!(ld.bytes, 2);
    assert_eq!(ld.cycles, vec![8]);
    assert_eq!(ld.operands.len(), 2);
    assert_eq!(ld.operands[1].name, "n8");
    assert_eq!(ld.operands[1].bytes, 1);
    assert!(ld.operands[1].immediate);

    let ldi = catalog.unprefixed(0x22).unwrap();
    assert_eq!(ldi.operands[0].adjust, Some(Adjust::Increment));
    assert!(!ldi.operands[0].immediate);

    let rlc = catalog.cbprefixed(0x00).unwrap();
    assert!(rlc.prefixed);
    assert_eq!(rlc.mnemonic, "RLC");
}

#[test]
fn test_branch_cycles() {
    let catalog = Catalog::from_json_str(BUNDLED).unwrap();
    let jr_nz = catalog.unprefixed(0x20).unwrap();
    assert_eq!(jr_nz.cycles_for(true), 12);
    assert_eq!(jr_nz.cycles_for(false), 8);
    let nop = catalog.unprefixed(0x00).unwrap();
    assert_eq!(nop.cycles_for(true), 4);
    assert_eq!(nop.cycles_for(false), 4);
}

#[test]
fn test_malformed_key_is_skipped() {
    let doc = minimal(
        r#""0x00": { "mnemonic": "NOP", "bytes": 1, "cycles": 4 },
           "0xZZ": { "mnemonic": "BAD", "bytes": 1, "cycles": 4 },
           "0x100": { "mnemonic": "WIDE", "bytes": 1, "cycles": 4 }"#,
        "",
    );
    let catalog = Catalog::from_json_str(&doc).unwrap();
    assert_eq!(catalog.unprefixed_len(), 1);
    assert_eq!(catalog.unprefixed(0x00).unwrap().mnemonic, "NOP");
}

#[test_case("0x3E", Some(0x3E) ; "lower prefix")]
#[test_case("0X3e", Some(0x3E) ; "upper prefix")]
#[test_case("ff", Some(0xFF) ; "bare hex")]
#[test_case("0x", None ; "empty digits")]
#[test_case("0x+1", None ; "sign")]
#[test_case("0x123", None ; "too wide")]
#[test_case("nope", None ; "not hex")]
fn test_parse_opcode_key(key: &str, expected: Option<u8>) {
    assert_eq!(parse_opcode_key(key), expected);
}

#[test]
fn test_optional_fields_default() {
    let doc = minimal(
        r#""0x10": { "mnemonic": "STOP", "bytes": 2, "cycles": 4 }"#,
        "",
    );
    let catalog = Catalog::from_json_str(&doc).unwrap();
    let entry = catalog.unprefixed(0x10).unwrap();
    assert_eq!(entry.mnemonic, "STOP");
    assert_eq!(entry.bytes, 2);
    assert_eq!(entry.cycles, vec![4]);
    assert!(entry.operands.is_empty());
    assert!(!entry.immediate);
    assert!(entry.flags.is_none());
    assert_eq!(entry.flag_masks(), FlagMasks::IDENTITY);
}

#[test_case(r#"{ "bytes": 1, "cycles": 4 }"# ; "no mnemonic")]
#[test_case(r#"{ "mnemonic": "NOP", "cycles": 4 }"# ; "no length")]
#[test_case(r#"{ "mnemonic": "NOP", "bytes": 1 }"# ; "no cycles")]
#[test_case("{}" ; "empty entry")]
fn test_missing_required_field_is_fatal(entry: &str) {
    let doc = minimal(&format!(r#""0x00": {entry}"#), "");
    assert!(matches!(
        Catalog::from_json_str(&doc),
        Err(CatalogError::Parse(_))
    ));
}

#[test_case("0", vec![0] ; "zero")]
#[test_case("[]", vec![] ; "empty list")]
#[test_case("[12, 0]", vec![12, 0] ; "zero not taken")]
#[test_case("[4, 4, 4]", vec![4, 4, 4] ; "too many")]
fn test_unusable_cycles_are_fatal(cycles: &str, expected: Vec<u32>) {
    let doc = minimal(
        "",
        &format!(r#""0x37": {{ "mnemonic": "SWAP", "bytes": 2, "cycles": {cycles} }}"#),
    );
    match Catalog::from_json_str(&doc) {
        Err(CatalogError::InvalidCycles {
            opcode,
            prefixed,
            cycles,
        }) => {
            assert_eq!(opcode, 0x37);
            assert!(prefixed);
            assert_eq!(cycles, expected);
        }
        other => panic!("expected InvalidCycles, got {other:?}"),
    }
}

#[test]
fn test_missing_section_is_fatal() {
    let doc = r#"{ "unprefixed": {} }"#;
    let err = Catalog::from_json_str(doc).unwrap_err();
    assert!(matches!(err, CatalogError::MissingSection("cbprefixed")));
}

#[test]
fn test_structurally_invalid_document_is_fatal() {
    assert!(matches!(
        Catalog::from_json_str("[1, 2, 3]"),
        Err(CatalogError::Parse(_))
    ));
    let doc = minimal(r#""0x00": { "bytes": "one" }"#, "");
    assert!(matches!(
        Catalog::from_json_str(&doc),
        Err(CatalogError::Parse(_))
    ));
    assert!(matches!(
        Catalog::from_json_str("{ not json"),
        Err(CatalogError::Parse(_))
    ));
}

#[test]
fn test_missing_file_is_fatal() {
    let path = Path::new("/definitely/not/here/opcodes.json");
    let err = Catalog::load(path).unwrap_err();
    assert!(matches!(err, CatalogError::Io { .. }));
}

#[test]
fn test_flag_masks_apply() {
    let doc = minimal(
        r#""0x00": { "mnemonic": "NOP", "bytes": 1, "cycles": 4,
                     "flags": { "Z": "Z", "N": "0", "H": "1", "C": "-" } }"#,
        "",
    );
    let catalog = Catalog::from_json_str(&doc).unwrap();
    let masks = catalog.unprefixed(0x00).unwrap().flag_masks();
    // before: C set; handler computed Z and N and cleared C
    let before = 0x10;
    let after = 0xC0;
    assert_eq!(masks.apply(before, after), 0x80 | 0x20 | 0x10);
}
