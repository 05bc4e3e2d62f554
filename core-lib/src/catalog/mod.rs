//! Instruction catalog: per-opcode metadata supplied as a JSON document.
//!
//! The document has two sections, `unprefixed` and `cbprefixed`, each
//! mapping a hex opcode key (`"0x3E"`) to an entry:
//!
//! ```json
//! { "mnemonic": "LD", "bytes": 2, "cycles": 8,
//!   "operands": [{ "name": "A", "immediate": true },
//!                { "name": "n8", "bytes": 1, "immediate": true }],
//!   "immediate": true,
//!   "flags": { "Z": "-", "N": "-", "H": "-", "C": "-" } }
//! ```
//!
//! `mnemonic`, `bytes` and `cycles` are required. `cycles` is either one
//! non-zero number or `[taken, not_taken]` for branches.
//! A malformed key is skipped with a warning; a missing file or a document
//! that does not have this shape is a load error.

mod error;

pub use error::CatalogError;

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, instrument, warn};

/// Post-access adjustment of a pointer operand (`(HL+)`, `(HL-)`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum Adjust {
    #[serde(rename = "+")]
    Increment,
    #[serde(rename = "-")]
    Decrement,
}

/// One operand of an instruction as described by the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OperandDescriptor {
    #[serde(default = "unknown_operand")]
    pub name: String,
    #[serde(default)]
    pub bytes: u8,
    #[serde(default)]
    pub immediate: bool,
    #[serde(default)]
    pub value: Option<u16>,
    #[serde(default)]
    pub adjust: Option<Adjust>,
}

fn unknown_operand() -> String {
    "UNKNOWN".to_owned()
}

/// How an instruction treats one flag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum FlagEffect {
    /// Computed by the instruction.
    #[default]
    Affected,
    /// Always cleared (`"0"`).
    Reset,
    /// Always set (`"1"`).
    Set,
    /// Left as it was (`"-"`).
    Unchanged,
}

impl From<String> for FlagEffect {
    fn from(value: String) -> Self {
        match value.trim() {
            "0" => Self::Reset,
            "1" => Self::Set,
            "-" => Self::Unchanged,
            _ => Self::Affected,
        }
    }
}

/// Declared effect on each of the four flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlagEffects {
    pub zero: FlagEffect,
    pub subtract: FlagEffect,
    pub half_carry: FlagEffect,
    pub carry: FlagEffect,
}

/// Bit masks compiled from [`FlagEffects`] so applying them is three ops.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlagMasks {
    keep: u8,
    set: u8,
    reset: u8,
}

impl FlagEffects {
    fn from_map(map: &BTreeMap<String, FlagEffect>) -> Self {
        let mut effects = Self::default();
        for (name, effect) in map {
            match name.as_str() {
                "Z" | "z" => effects.zero = *effect,
                "N" | "n" => effects.subtract = *effect,
                "H" | "h" => effects.half_carry = *effect,
                "C" | "c" => effects.carry = *effect,
                other => debug!(flag = other, "ignoring unknown flag in catalog entry"),
            }
        }
        effects
    }

    pub fn masks(&self) -> FlagMasks {
        let mut masks = FlagMasks::IDENTITY;
        for (effect, bit) in [
            (self.zero, 0x80),
            (self.subtract, 0x40),
            (self.half_carry, 0x20),
            (self.carry, 0x10),
        ] {
            match effect {
                FlagEffect::Affected => {}
                FlagEffect::Reset => masks.reset |= bit,
                FlagEffect::Set => masks.set |= bit,
                FlagEffect::Unchanged => masks.keep |= bit,
            }
        }
        masks
    }
}

impl FlagMasks {
    /// Masks that leave the handler's result untouched.
    pub const IDENTITY: Self = Self {
        keep: 0,
        set: 0,
        reset: 0,
    };

    /// Combines F before and after a handler ran into the F the catalog
    /// declares.
    #[inline]
    pub const fn apply(self, before: u8, after: u8) -> u8 {
        let merged = (after & !self.keep) | (before & self.keep);
        ((merged & !self.reset) | self.set) & 0xF0
    }
}

/// Immutable metadata for one opcode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    pub opcode: u8,
    pub prefixed: bool,
    pub mnemonic: String,
    pub bytes: u8,
    /// One cost, or `[taken, not_taken]` for branch-dependent instructions.
    pub cycles: Vec<u32>,
    pub operands: Vec<OperandDescriptor>,
    pub immediate: bool,
    pub flags: Option<FlagEffects>,
    pub comment: String,
}

impl Instruction {
    /// Cost in T-cycles given whether a conditional branch was taken.
    /// Unconditional instructions ignore the argument.
    pub fn cycles_for(&self, branch_taken: bool) -> u32 {
        match (self.cycles.as_slice(), branch_taken) {
            ([], _) => 0,
            ([_, not_taken, ..], false) => *not_taken,
            ([first, ..], _) => *first,
        }
    }

    pub fn flag_masks(&self) -> FlagMasks {
        self.flags.map_or(FlagMasks::IDENTITY, |f| f.masks())
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawCycles {
    Single(u32),
    List(Vec<u32>),
}

#[derive(Debug, Deserialize)]
struct RawEntry {
    mnemonic: String,
    bytes: u8,
    cycles: RawCycles,
    #[serde(default)]
    operands: Vec<OperandDescriptor>,
    #[serde(default)]
    immediate: bool,
    #[serde(default)]
    flags: Option<BTreeMap<String, FlagEffect>>,
    #[serde(default)]
    comment: String,
}

#[derive(Debug, Deserialize)]
struct RawCatalog {
    unprefixed: Option<BTreeMap<String, RawEntry>>,
    cbprefixed: Option<BTreeMap<String, RawEntry>>,
}

/// Parses `"0x3E"`, `"3e"` or `"0X3E"` into an opcode byte.
fn parse_opcode_key(key: &str) -> Option<u8> {
    let trimmed = key.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    if digits.is_empty() || digits.len() > 2 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    u8::from_str_radix(digits, 16).ok()
}

/// The full catalog: 256 unprefixed and 256 CB-prefixed slots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    unprefixed: Vec<Option<Instruction>>,
    cbprefixed: Vec<Option<Instruction>>,
}

impl Catalog {
    /// Reads and parses a catalog file.
    #[instrument(level = "debug", skip_all, fields(path = %path.display()))]
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let text = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// Parses a catalog document.
    pub fn from_json_str(text: &str) -> Result<Self, CatalogError> {
        let raw: RawCatalog = serde_json::from_str(text)?;
        let unprefixed = raw
            .unprefixed
            .ok_or(CatalogError::MissingSection("unprefixed"))?;
        let cbprefixed = raw
            .cbprefixed
            .ok_or(CatalogError::MissingSection("cbprefixed"))?;

        let catalog = Self {
            unprefixed: Self::build_section(unprefixed, false)?,
            cbprefixed: Self::build_section(cbprefixed, true)?,
        };
        debug!(
            unprefixed = catalog.unprefixed_len(),
            cbprefixed = catalog.cbprefixed_len(),
            "instruction catalog loaded"
        );
        Ok(catalog)
    }

    fn build_section(
        entries: BTreeMap<String, RawEntry>,
        prefixed: bool,
    ) -> Result<Vec<Option<Instruction>>, CatalogError> {
        let mut slots = vec![None; 256];
        for (key, entry) in entries {
            let Some(opcode) = parse_opcode_key(&key) else {
                warn!(key = %key, prefixed, "skipping catalog entry with malformed opcode key");
                continue;
            };
            let cycles = match entry.cycles {
                RawCycles::Single(c) => vec![c],
                RawCycles::List(list) => list,
            };
            // Every executed instruction advances the cycle counter
            if cycles.is_empty() || cycles.len() > 2 || cycles.contains(&0) {
                return Err(CatalogError::InvalidCycles {
                    opcode,
                    prefixed,
                    cycles,
                });
            }
            slots[usize::from(opcode)] = Some(Instruction {
                opcode,
                prefixed,
                mnemonic: entry.mnemonic,
                bytes: entry.bytes,
                cycles,
                operands: entry.operands,
                immediate: entry.immediate,
                flags: entry.flags.as_ref().map(FlagEffects::from_map),
                comment: entry.comment,
            });
        }
        Ok(slots)
    }

    #[inline]
    pub fn unprefixed(&self, opcode: u8) -> Option<&Instruction> {
        self.unprefixed[usize::from(opcode)].as_ref()
    }

    #[inline]
    pub fn cbprefixed(&self, opcode: u8) -> Option<&Instruction> {
        self.cbprefixed[usize::from(opcode)].as_ref()
    }

    /// Looks an opcode up in either section.
    #[inline]
    pub fn get(&self, opcode: u8, prefixed: bool) -> Option<&Instruction> {
        if prefixed {
            self.cbprefixed(opcode)
        } else {
            self.unprefixed(opcode)
        }
    }

    pub fn unprefixed_len(&self) -> usize {
        self.unprefixed.iter().flatten().count()
    }

    pub fn cbprefixed_len(&self) -> usize {
        self.cbprefixed.iter().flatten().count()
    }
}

#[cfg(test)]
mod tests;
