//! Variant lookups, attached to the UNIHAN dataset as a plugin.
//!
//! UNIHAN variant fields hold whitespace-separated entries of the form
//! `U+XXXX`, optionally followed by `<` and a comma-separated list of the
//! dictionaries that attest the relationship:
//!
//! ```text
//! U+5E72<kMatthews,kMeyerWempe U+6F27<kMeyerWempe
//! ```

use std::any::Any;
use std::fmt;

use cihai_bootstrap::{TABLE_NAME, parse_ucn};

use crate::error::Result;
use crate::extend::{DatasetPlugin, SqlAccess, SqlSlot};
use crate::registry::Registered;

/// Namespace the variants plugin is attached under by default.
pub const VARIANTS_NAMESPACE: &str = "variants";

/// The kind of relationship a variant field records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VariantKind {
    Traditional,
    Simplified,
    Semantic,
    SpecializedSemantic,
    Z,
}

impl VariantKind {
    pub const ALL: [VariantKind; 5] = [
        VariantKind::Traditional,
        VariantKind::Simplified,
        VariantKind::Semantic,
        VariantKind::SpecializedSemantic,
        VariantKind::Z,
    ];

    /// The UNIHAN field carrying this kind.
    pub fn field(self) -> &'static str {
        match self {
            VariantKind::Traditional => "kTraditionalVariant",
            VariantKind::Simplified => "kSimplifiedVariant",
            VariantKind::Semantic => "kSemanticVariant",
            VariantKind::SpecializedSemantic => "kSpecializedSemanticVariant",
            VariantKind::Z => "kZVariant",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            VariantKind::Traditional => "traditional",
            VariantKind::Simplified => "simplified",
            VariantKind::Semantic => "semantic",
            VariantKind::SpecializedSemantic => "specialized semantic",
            VariantKind::Z => "z",
        }
    }
}

impl fmt::Display for VariantKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

/// One variant of a character.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variant {
    pub kind: VariantKind,
    pub character: char,
    pub ucn: String,
    /// Dictionaries attesting the relationship, if listed.
    pub sources: Vec<String>,
}

/// Parses one variant field value.
///
/// Malformed entries are skipped.
///
/// # Examples
///
/// ```
/// use cihai::{VariantKind, parse_variants};
///
/// let variants = parse_variants(VariantKind::Semantic, "U+5E72<kMatthews,kMeyerWempe U+6F27");
/// assert_eq!(variants[0].character, '干');
/// assert_eq!(variants[0].sources, vec!["kMatthews", "kMeyerWempe"]);
/// assert!(variants[1].sources.is_empty());
/// ```
pub fn parse_variants(kind: VariantKind, raw: &str) -> Vec<Variant> {
    raw.split_whitespace()
        .filter_map(|entry| {
            let (ucn, sources) = match entry.split_once('<') {
                Some((ucn, sources)) => (ucn, sources),
                None => (entry, ""),
            };
            let character = parse_ucn(ucn).ok().and_then(char::from_u32);
            let Some(character) = character else {
                tracing::debug!(field = kind.field(), entry, "skipping malformed variant");
                return None;
            };
            Some(Variant {
                kind,
                character,
                ucn: ucn.to_string(),
                sources: sources
                    .split(',')
                    .filter(|source| !source.is_empty())
                    .map(String::from)
                    .collect(),
            })
        })
        .collect()
}

/// Reads variant fields for a character.
#[derive(Debug, Default)]
pub struct UnihanVariants {
    sql: SqlSlot,
}

impl Registered for UnihanVariants {
    const PATH: &'static str = "cihai::datasets::UnihanVariants";
}

impl DatasetPlugin for UnihanVariants {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn sql_access(&mut self) -> Option<&mut dyn SqlAccess> {
        Some(&mut self.sql)
    }

    fn bootstrap(&mut self) -> Result<()> {
        // Only needs the database the dataset handed over.
        self.sql.get()?;
        Ok(())
    }
}

impl UnihanVariants {
    /// Every variant recorded for `ch`, grouped by kind in [`VariantKind::ALL`] order.
    ///
    /// Variant fields that were not loaded are treated as empty. An unknown
    /// character has no variants.
    pub fn variants(&self, ch: char) -> Result<Vec<Variant>> {
        let db = self.sql.get()?;
        let Some(row) = db.first_by(TABLE_NAME, "char", &ch.to_string())? else {
            return Ok(Vec::new());
        };

        Ok(VariantKind::ALL
            .iter()
            .filter_map(|kind| row.text(kind.field()).map(|raw| parse_variants(*kind, raw)))
            .flatten()
            .collect())
    }
}
