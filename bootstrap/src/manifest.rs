//! Which UNIHAN fields live in which archive member.
//!
//! `Unihan.zip` ships one text file per topic. Loading a subset of fields
//! only needs the files that carry them, so the bootstrap consults
//! [`UNIHAN_MANIFEST`] to decide what to extract and parse.

/// Archive member → fields it carries.
pub const UNIHAN_MANIFEST: &[(&str, &[&str])] = &[
    (
        "Unihan_DictionaryIndices.txt",
        &[
            "kCheungBauerIndex",
            "kCowles",
            "kDaeJaweon",
            "kFennIndex",
            "kGSR",
            "kHanYu",
            "kIRGDaeJaweon",
            "kIRGDaiKanwaZiten",
            "kIRGHanyuDaZidian",
            "kIRGKangXi",
            "kKangXi",
            "kKarlgren",
            "kLau",
            "kMatthews",
            "kMeyerWempe",
            "kMorohashi",
            "kNelson",
            "kSBGY",
            "kSMSZD2003Index",
        ],
    ),
    (
        "Unihan_DictionaryLikeData.txt",
        &[
            "kAlternateTotalStrokes",
            "kCangjie",
            "kCheungBauer",
            "kCihaiT",
            "kFenn",
            "kFourCornerCode",
            "kFrequency",
            "kGradeLevel",
            "kHDZRadBreak",
            "kHKGlyph",
            "kPhonetic",
            "kStrange",
            "kUnihanCore2020",
        ],
    ),
    (
        "Unihan_IRGSources.txt",
        &[
            "kCompatibilityVariant",
            "kIICore",
            "kIRG_GSource",
            "kIRG_HSource",
            "kIRG_JSource",
            "kIRG_KPSource",
            "kIRG_KSource",
            "kIRG_MSource",
            "kIRG_SSource",
            "kIRG_TSource",
            "kIRG_UKSource",
            "kIRG_USource",
            "kIRG_VSource",
            "kRSUnicode",
            "kTotalStrokes",
        ],
    ),
    (
        "Unihan_NumericValues.txt",
        &["kAccountingNumeric", "kOtherNumeric", "kPrimaryNumeric"],
    ),
    (
        "Unihan_OtherMappings.txt",
        &[
            "kBigFive",
            "kCCCII",
            "kCNS1986",
            "kCNS1992",
            "kEACC",
            "kGB0",
            "kGB1",
            "kGB3",
            "kGB5",
            "kGB7",
            "kGB8",
            "kHKSCS",
            "kIBMJapan",
            "kJa",
            "kJinmeiyoKanji",
            "kJis0",
            "kJis1",
            "kJIS0213",
            "kJoyoKanji",
            "kKoreanEducationHanja",
            "kKoreanName",
            "kKPS0",
            "kKPS1",
            "kKSC0",
            "kKSC1",
            "kMainlandTelegraph",
            "kPseudoGB1",
            "kTaiwanTelegraph",
            "kTGH",
            "kXerox",
        ],
    ),
    (
        "Unihan_RadicalStrokeCounts.txt",
        &[
            "kRSAdobe_Japan1_6",
            "kRSJapanese",
            "kRSKangXi",
            "kRSKanWa",
            "kRSKorean",
        ],
    ),
    (
        "Unihan_Readings.txt",
        &[
            "kCantonese",
            "kDefinition",
            "kHangul",
            "kHanyuPinlu",
            "kHanyuPinyin",
            "kJapanese",
            "kJapaneseKun",
            "kJapaneseOn",
            "kKorean",
            "kMandarin",
            "kSMSZD2003Readings",
            "kTang",
            "kTGHZ2013",
            "kVietnamese",
            "kXHC1983",
        ],
    ),
    (
        "Unihan_Variants.txt",
        &[
            "kSemanticVariant",
            "kSimplifiedVariant",
            "kSpecializedSemanticVariant",
            "kSpoofingVariant",
            "kTraditionalVariant",
            "kZVariant",
        ],
    ),
];

/// Every known field, in manifest order.
pub fn all_fields() -> impl Iterator<Item = &'static str> {
    UNIHAN_MANIFEST
        .iter()
        .flat_map(|(_, fields)| fields.iter().copied())
}

/// Every known archive member, in manifest order.
pub fn all_files() -> impl Iterator<Item = &'static str> {
    UNIHAN_MANIFEST.iter().map(|(file, _)| *file)
}

/// Fields carried by an archive member, or `None` for unknown members.
pub fn fields_in(file: &str) -> Option<&'static [&'static str]> {
    UNIHAN_MANIFEST
        .iter()
        .find(|(name, _)| *name == file)
        .map(|(_, fields)| *fields)
}

/// The archive member that carries `field`.
pub fn file_for(field: &str) -> Option<&'static str> {
    UNIHAN_MANIFEST
        .iter()
        .find(|(_, fields)| fields.contains(&field))
        .map(|(file, _)| *file)
}
