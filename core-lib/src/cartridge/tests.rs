use super::*;
use crate::mmu::Mmu;
use pretty_assertions::assert_eq;
use test_case::test_case;

/// Loads a blank 32KB ROM with `bytes` patched in at `offset`
fn header_rom(patches: Vec<(usize, Vec<u8>)>) -> Mmu {
    let mut rom = vec![0; 0x8000];
    for (offset, bytes) in patches {
        rom[offset..offset + bytes.len()].copy_from_slice(&bytes);
    }
    let mut mmu = Mmu::new();
    mmu.load_rom(&rom);
    mmu
}

#[test]
fn test_header_fields() {
    let mmu = header_rom(vec![
        (0x134, b"TETRIS".to_vec()),
        (0x143, vec![0x80]),
        (0x147, vec![0x03, 0x02, 0x03]),
        (0x14E, vec![0x12, 0x34]),
    ]);
    let header = CartridgeHeader::read(&mmu);
    assert_eq!(header.title, "TETRIS");
    assert!(header.supports_cgb());
    assert_eq!(header.cartridge_type, 0x03);
    assert_eq!(header.rom_size_code, 0x02);
    assert_eq!(header.ram_size_code, 0x03);
    assert_eq!(
        header.global_checksum, 0x1234,
        "global checksum is big-endian"
    );
}

#[test]
fn test_licensee_and_region_fields() {
    let mmu = header_rom(vec![
        (0x144, b"01".to_vec()),
        (0x146, vec![0x03]),
        (0x14A, vec![0x01, 0x33, 0x02]),
    ]);
    let header = CartridgeHeader::read(&mmu);
    assert_eq!(header.new_licensee_code, *b"01");
    assert_eq!(header.sgb_flag, 0x03);
    assert_eq!(header.destination_code, 0x01);
    assert_eq!(header.old_licensee_code, 0x33);
    assert_eq!(header.mask_rom_version, 0x02);
    assert!(header.uses_new_licensee());
    assert!(header.supports_sgb());
    assert!(!header.is_japanese());
    assert_eq!(header.licensee(), "01");
}

#[test]
fn test_old_licensee_code() {
    let header = CartridgeHeader::read(&header_rom(vec![
        (0x144, b"99".to_vec()),
        (0x146, vec![0x03]),
        (0x14B, vec![0x01]),
    ]));
    assert!(!header.uses_new_licensee());
    assert!(!header.supports_sgb(), "SGB needs the new licensee scheme");
    assert!(header.is_japanese());
    assert_eq!(header.licensee(), "01");
}

#[test]
fn test_title_uses_all_fifteen_bytes() {
    let mmu = header_rom(vec![(0x134, b"ABCDEFGHIJKLMNOP".to_vec())]);
    let header = CartridgeHeader::read(&mmu);
    assert_eq!(header.title, "ABCDEFGHIJKLMNO");
}

#[test]
fn test_header_checksum_of_blank_header() {
    // 25 zero bytes: 0 - 25 = 0xE7
    let mut mmu = header_rom(vec![(0x14D, vec![0xE7])]);
    assert!(CartridgeHeader::read(&mmu).header_checksum_matches());

    mmu.load_rom(&[]);
    let header = CartridgeHeader::read(&mmu);
    assert_eq!(header.header_checksum, 0x00);
    assert!(!header.header_checksum_matches());
}

#[test]
fn test_header_checksum_with_title() {
    let title = b"POKEMON RED";
    let expected = title.iter().fold(0xE7u8, |x, &b| x.wrapping_sub(b));
    let mmu = header_rom(vec![(0x134, title.to_vec()), (0x14D, vec![expected])]);
    assert!(CartridgeHeader::read(&mmu).header_checksum_matches());
}

#[test_case(0x00, CartridgeType::RomOnly { ram: false, battery: false })]
#[test_case(0x03, CartridgeType::Mbc1 { ram: true, battery: true })]
#[test_case(0x06, CartridgeType::Mbc2 { battery: true })]
#[test_case(0x10, CartridgeType::Mbc3 { ram: true, battery: true, rtc: true })]
#[test_case(0x1E, CartridgeType::Mbc5 { ram: true, battery: true, rumble: true })]
#[test_case(0xFF, CartridgeType::HuC1)]
fn test_cartridge_type_decoding(code: u8, expected: CartridgeType) {
    assert_eq!(CartridgeType::try_from(code), Ok(expected));
}

#[test]
fn test_cartridge_type_flags() {
    let rom_only = CartridgeType::RomOnly {
        ram: false,
        battery: false,
    };
    assert!(!rom_only.has_mapper());
    assert!(!rom_only.has_battery());
    let mbc3 = CartridgeType::Mbc3 {
        ram: true,
        battery: true,
        rtc: false,
    };
    assert!(mbc3.has_mapper());
    assert!(mbc3.has_battery());
}

#[test]
fn test_unsupported_cartridge_type() {
    let header = CartridgeHeader::read(&header_rom(vec![(0x147, vec![0xAA])]));
    assert_eq!(
        header.kind(),
        Err(CartridgeError::UnsupportedCartridgeType(0xAA))
    );
}

#[test]
fn test_size_codes() {
    let header = CartridgeHeader::read(&header_rom(vec![(0x148, vec![0x05, 0x03])]));
    let rom = header.rom_size().unwrap();
    assert_eq!(rom.banks(), 64);
    assert_eq!(rom.as_bytes(), 1024 * 1024);
    assert_eq!(header.ram_size(), Ok(RamSize::Size32KB));
    assert_eq!(RamSize::Size32KB.as_bytes(), 32 * 1024);
    assert_eq!(
        RomSize::from_code(0x00).map(RomSize::as_bytes),
        Some(32 * 1024)
    );
}

#[test]
fn test_invalid_size_codes() {
    let header = CartridgeHeader::read(&header_rom(vec![(0x148, vec![0xFF, 0x09])]));
    assert_eq!(header.rom_size(), Err(CartridgeError::InvalidRomSize(0xFF)));
    assert_eq!(header.ram_size(), Err(CartridgeError::InvalidRamSize(0x09)));
}
