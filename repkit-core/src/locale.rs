/// Compatibility bucket for the engine's locale-dependent configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CompatibilityClass {
    RussianFamily,
    Japanese,
    Unsupported,
}

/// Primary language ids whose locales use Cyrillic script in the
/// configurations the engine ships for.
const CYRILLIC_FAMILY: [u16; 9] = [
    0x19, // Russian
    0x22, // Ukrainian
    0x02, // Bulgarian
    0x1a, // Serbian (Cyrillic)
    0x2f, // Macedonian
    0x50, // Mongolian (Cyrillic)
    0x23, // Belarusian
    0x43, // Uzbek (Cyrillic)
    0x40, // Kyrgyz (Cyrillic)
];

const JAPANESE: u16 = 0x11;

/// LANGID with the sublanguage stripped.
pub const fn primary_lang_id(lang_id: u16) -> u16 {
    lang_id & 0x3ff
}

/// Total, deterministic classification: every id lands in exactly one class.
pub fn classify(lang_id: u16) -> CompatibilityClass {
    let primary = primary_lang_id(lang_id);
    if CYRILLIC_FAMILY.contains(&primary) {
        CompatibilityClass::RussianFamily
    } else if primary == JAPANESE {
        CompatibilityClass::Japanese
    } else {
        CompatibilityClass::Unsupported
    }
}

/// Snapshot of the system locale oracle, computed fresh per query. The raw
/// lang id and codepage are inputs supplied by the caller (on the target
/// platform: GetSystemDefaultLangID / GetACP).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LocaleProfile {
    pub lang_id: u16,
    pub primary: u16,
    pub codepage: u32,
    pub encoding_name: String,
}

impl LocaleProfile {
    pub fn new(lang_id: u16, codepage: u32) -> Self {
        Self {
            lang_id,
            primary: primary_lang_id(lang_id),
            codepage,
            encoding_name: format!("cp{codepage}"),
        }
    }

    pub fn class(&self) -> CompatibilityClass {
        classify(self.lang_id)
    }

    pub fn display_name(&self) -> String {
        display_name(self.lang_id)
    }
}

/// Known LANGID -> display name, standing in for the platform locale table.
const LOCALE_NAMES: &[(u16, &str)] = &[
    (0x0419, "ru_RU"),
    (0x0422, "uk_UA"),
    (0x0402, "bg_BG"),
    (0x0c1a, "sr_SP"),
    (0x042f, "mk_MK"),
    (0x0450, "mn_MN"),
    (0x0423, "be_BY"),
    (0x0443, "uz_UZ"),
    (0x0440, "ky_KG"),
    (0x0411, "ja_JP"),
    (0x0409, "en_US"),
    (0x0809, "en_GB"),
    (0x0407, "de_DE"),
    (0x040c, "fr_FR"),
    (0x0410, "it_IT"),
    (0x040a, "es_ES"),
    (0x0415, "pl_PL"),
    (0x0416, "pt_BR"),
    (0x0804, "zh_CN"),
    (0x0404, "zh_TW"),
    (0x0412, "ko_KR"),
];

/// Human-readable locale name; unknown ids render as hex.
pub fn display_name(lang_id: u16) -> String {
    LOCALE_NAMES
        .iter()
        .find(|(id, _)| *id == lang_id)
        .map(|(_, name)| (*name).to_string())
        .unwrap_or_else(|| format!("0x{lang_id:04X}"))
}
