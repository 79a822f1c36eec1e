use std::collections::{HashMap, HashSet};

use regex::Regex;

/// Company- and class-level labeled fields ("Antall aksjer: 1 000").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldLabel {
    Shares,
    NominalValue,
    ShareCapital,
    Votes,
    Remarks,
}

/// Canonical shareholder-table columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ColumnField {
    Name,
    /// One shared column carries either a registration number or a birth
    /// date, depending on the shareholder. Classified per cell.
    OrgOrBirth,
    Email,
    Phone,
    Address,
    Country,
    OwnershipPct,
    VotingPct,
    TotalShares,
    Pledged,
    ShareNumbers,
    CostPrice,
    EntryDate,
}

const LABEL_ALIASES: &[(FieldLabel, &[&str])] = &[
    (
        FieldLabel::Shares,
        &[
            "antall aksjer",
            "totalt antall aksjer",
            "antall aksjer totalt",
            "number of shares",
            "total shares",
            "total number of shares",
            "shares",
        ],
    ),
    (
        FieldLabel::NominalValue,
        &[
            "pålydende",
            "pålydende verdi",
            "pålydende pr aksje",
            "nominal value",
            "par value",
            "nominal",
        ],
    ),
    (FieldLabel::ShareCapital, &["aksjekapital", "share capital"]),
    (
        FieldLabel::Votes,
        &[
            "antall stemmer",
            "stemmer totalt",
            "number of votes",
            "total votes",
            "votes",
        ],
    ),
    (
        FieldLabel::Remarks,
        &[
            "merknad",
            "merknader",
            "notat",
            "notater",
            "kommentar",
            "remarks",
            "notes",
            "comments",
        ],
    ),
];

const COLUMN_ALIASES: &[(ColumnField, &[&str])] = &[
    (
        ColumnField::Name,
        &[
            "navn",
            "name",
            "aksjonær",
            "aksjeeier",
            "aksjonærens navn",
            "shareholder",
            "shareholder name",
        ],
    ),
    (
        ColumnField::OrgOrBirth,
        &[
            "org nr",
            "orgnr",
            "org no",
            "org number",
            "organisasjonsnummer",
            "fødselsdato",
            "f dato",
            "født",
            "birth date",
            "date of birth",
            "org nr fødselsdato",
            "fødselsdato org nr",
            "orgnr fødselsdato",
            "org no birth date",
        ],
    ),
    (
        ColumnField::Email,
        &["epost", "e post", "e-post", "email", "e mail", "e-mail", "mail"],
    ),
    (
        ColumnField::Phone,
        &["telefon", "tlf", "mobil", "phone", "mobile", "telephone"],
    ),
    (
        ColumnField::Address,
        &["adresse", "postadresse", "address", "postal address"],
    ),
    (ColumnField::Country, &["land", "country"]),
    (
        ColumnField::OwnershipPct,
        &[
            "eierandel",
            "eierandel %",
            "eierandel i %",
            "andel",
            "andel %",
            "ownership",
            "ownership %",
            "stake",
            "share of ownership",
        ],
    ),
    (
        ColumnField::VotingPct,
        &[
            "stemmeandel",
            "stemmeandel %",
            "stemmeandel i %",
            "voting share",
            "voting %",
            "votes %",
            "share of votes",
        ],
    ),
    (
        ColumnField::TotalShares,
        &[
            "antall aksjer",
            "aksjer",
            "sum aksjer",
            "antall aksjer totalt",
            "totalt antall aksjer",
            "number of shares",
            "shares",
            "total shares",
        ],
    ),
    (ColumnField::Pledged, &["pant", "pantsatt", "pledge", "pledged"]),
    (
        ColumnField::ShareNumbers,
        &[
            "aksjenummer",
            "aksjenr",
            "aksje nr",
            "share numbers",
            "share nos",
            "share no",
            "certificate numbers",
        ],
    ),
    (
        ColumnField::CostPrice,
        &[
            "kostpris",
            "inngangsverdi",
            "kjøpspris",
            "anskaffelseskost",
            "cost price",
            "cost",
            "purchase price",
        ],
    ),
    (
        ColumnField::EntryDate,
        &[
            "ervervsdato",
            "ervervet",
            "dato ervervet",
            "innført dato",
            "entry date",
            "date acquired",
            "acquired date",
        ],
    ),
];

const CLASS_ALIASES: &[(&str, &[&str])] = &[
    (
        "Class A",
        &["a-aksjer", "a aksjer", "aksjeklasse a", "klasse a", "class a", "a-shares", "a shares"],
    ),
    (
        "Class B",
        &["b-aksjer", "b aksjer", "aksjeklasse b", "klasse b", "class b", "b-shares", "b shares"],
    ),
    (
        "Class C",
        &["c-aksjer", "c aksjer", "aksjeklasse c", "klasse c", "class c", "c-shares", "c shares"],
    ),
    (
        "Ordinary shares",
        &[
            "ordinære aksjer",
            "ordinaere aksjer",
            "ordinære",
            "alminnelige aksjer",
            "ordinary shares",
            "ordinary",
            "common shares",
            "common stock",
        ],
    ),
    (
        "Preference shares",
        &[
            "preferanseaksjer",
            "preferanse",
            "preference shares",
            "preference",
            "preferred shares",
            "preferred stock",
        ],
    ),
];

/// Corporate-form suffixes, lowercased with dots stripped. Last-resort
/// entity-type classifier only.
const CORPORATE_SUFFIXES: &[&str] = &[
    // Nordics
    "as", "asa", "ans", "da", "ks", "iks", "nuf", "ba", "enk", "a/s", "aps", "ivs", "k/s",
    "p/s", "ab", "hb", "kb", "oy", "oyj", "ay", "ehf", "hf",
    // UK / US
    "ltd", "limited", "llc", "llp", "inc", "incorporated", "corp", "corporation", "plc", "co",
    "pty",
    // German-speaking
    "gmbh", "ag", "kg", "kgaa", "ug", "ohg",
    // Benelux
    "bv", "nv", "vof", "bvba",
    // France / Southern Europe
    "sarl", "sa", "sas", "sca", "snc", "srl", "spa", "sl", "slu", "lda",
    // Central / Eastern Europe
    "sro", "kft", "zrt", "doo", "dd", "ad",
    // EU-wide
    "se",
];

const FOOTER_WORDS: &[&str] = &["total", "totalt", "sum", "exported", "eksportert"];

/// Immutable multilingual lookup tables for register parsing.
///
/// Built once by a pure constructor and passed by reference; there is no
/// global state. Configured deployments can layer extra corporate suffixes
/// and share-class aliases on top of the built-ins.
pub struct Vocabulary {
    labels: HashMap<String, FieldLabel>,
    columns: HashMap<String, ColumnField>,
    classes: HashMap<String, String>,
    class_aliases: Vec<(String, Vec<String>)>,
    suffixes: HashSet<String>,
    anchor: Regex,
}

impl Vocabulary {
    pub fn new() -> Self {
        Self::with_extensions(&[], &[])
    }

    /// Built-ins plus configured extensions. Extension aliases win over
    /// built-in aliases when they collide.
    pub fn with_extensions(
        extra_suffixes: &[String],
        extra_class_aliases: &[(String, Vec<String>)],
    ) -> Self {
        let mut labels = HashMap::new();
        for (field, aliases) in LABEL_ALIASES {
            for alias in *aliases {
                labels.insert(normalize_key(alias), *field);
            }
        }

        let mut columns = HashMap::new();
        for (field, aliases) in COLUMN_ALIASES {
            for alias in *aliases {
                columns.insert(normalize_key(alias), *field);
            }
        }

        let mut classes = HashMap::new();
        let mut class_aliases: Vec<(String, Vec<String>)> = Vec::new();
        for (canonical, aliases) in CLASS_ALIASES {
            let mut keys: Vec<String> = aliases.iter().map(|a| normalize_key(a)).collect();
            keys.push(normalize_key(canonical));
            for key in &keys {
                classes.insert(key.clone(), (*canonical).to_string());
            }
            class_aliases.push(((*canonical).to_string(), keys));
        }
        for (canonical, aliases) in extra_class_aliases {
            let mut keys: Vec<String> = aliases.iter().map(|a| normalize_key(a)).collect();
            keys.push(normalize_key(canonical));
            for key in &keys {
                classes.insert(key.clone(), canonical.clone());
            }
            match class_aliases.iter_mut().find(|(c, _)| c == canonical) {
                Some((_, existing)) => existing.extend(keys),
                None => class_aliases.push((canonical.clone(), keys)),
            }
        }

        let mut suffixes: HashSet<String> =
            CORPORATE_SUFFIXES.iter().map(|s| s.to_string()).collect();
        for s in extra_suffixes {
            suffixes.insert(s.trim().to_lowercase().replace('.', ""));
        }

        // "Alpha Invest AS (910 000 001)": name, optional 2-letter
        // jurisdiction prefix, at least 7 digit-ish characters.
        let anchor =
            Regex::new(r"^\s*(.+?)\s*\(\s*([A-Za-z]{2})?\s*(\d[\d\s.\-]{6,})\s*\)\s*$").unwrap();

        Vocabulary {
            labels,
            columns,
            classes,
            class_aliases,
            suffixes,
            anchor,
        }
    }

    pub fn label(&self, text: &str) -> Option<FieldLabel> {
        self.labels.get(&normalize_key(text)).copied()
    }

    pub fn column(&self, text: &str) -> Option<ColumnField> {
        self.columns.get(&normalize_key(text)).copied()
    }

    /// Resolve a cell to a canonical share-class name.
    pub fn share_class(&self, text: &str) -> Option<&str> {
        self.classes.get(&normalize_key(text)).map(|s| s.as_str())
    }

    /// All normalized aliases for a canonical class name, used to associate
    /// free-text remarks with a class by substring.
    pub fn class_alias_keys(&self, canonical: &str) -> &[String] {
        self.class_aliases
            .iter()
            .find(|(c, _)| c == canonical)
            .map(|(_, keys)| keys.as_slice())
            .unwrap_or(&[])
    }

    /// Corporate-form check on the trailing name token ("Kvist Invest AS",
    /// "Acme Ltd.").
    pub fn is_corporate_name(&self, name: &str) -> bool {
        let Some(last) = name.split_whitespace().last() else {
            return false;
        };
        let token = last.to_lowercase().replace('.', "");
        !token.is_empty() && self.suffixes.contains(&token)
    }

    /// Footer rows below the data: totals, export stamps, URLs.
    pub fn is_footer(&self, text: &str) -> bool {
        let lower = text.trim().to_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") || lower.starts_with("www.")
        {
            return true;
        }
        let Some(first) = lower.split_whitespace().next() else {
            return false;
        };
        FOOTER_WORDS.contains(&first.trim_end_matches(':'))
    }

    /// Match a `NAME (REGNUMBER)` company anchor cell. Returns the name and
    /// the raw registration number (prefix included, separators untouched).
    pub fn company_anchor(&self, text: &str) -> Option<(String, String)> {
        let caps = self.anchor.captures(text)?;
        let name = caps.get(1)?.as_str().trim().to_string();
        if name.is_empty() {
            return None;
        }
        let prefix = caps.get(2).map(|m| m.as_str().to_uppercase()).unwrap_or_default();
        let digits = caps.get(3)?.as_str().trim().to_string();
        Some((name, format!("{prefix}{digits}")))
    }
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self::new()
    }
}

/// Alias-key normalization: lowercase, `.` `,` `/` to spaces, whitespace
/// collapsed. "Org.nr/Fødselsdato" and "org nr fødselsdato" share a key.
pub fn normalize_key(s: &str) -> String {
    let lowered = s.to_lowercase();
    let replaced: String = lowered
        .chars()
        .map(|c| match c {
            '.' | ',' | '/' => ' ',
            c => c,
        })
        .collect();
    replaced.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_collapse_punctuation_and_case() {
        assert_eq!(normalize_key("Org.nr/Fødselsdato"), "org nr fødselsdato");
        assert_eq!(normalize_key("  Antall   aksjer "), "antall aksjer");
        assert_eq!(normalize_key("E-post"), "e-post");
    }

    #[test]
    fn columns_resolve_in_both_languages() {
        let v = Vocabulary::new();
        assert_eq!(v.column("Navn"), Some(ColumnField::Name));
        assert_eq!(v.column("Name"), Some(ColumnField::Name));
        assert_eq!(v.column("Org.nr"), Some(ColumnField::OrgOrBirth));
        assert_eq!(v.column("Fødselsdato"), Some(ColumnField::OrgOrBirth));
        assert_eq!(v.column("Antall aksjer"), Some(ColumnField::TotalShares));
        assert_eq!(v.column("Number of shares"), Some(ColumnField::TotalShares));
        assert_eq!(v.column("Eierandel %"), Some(ColumnField::OwnershipPct));
        assert_eq!(v.column("noise"), None);
    }

    #[test]
    fn labels_resolve_in_both_languages() {
        let v = Vocabulary::new();
        assert_eq!(v.label("Antall aksjer"), Some(FieldLabel::Shares));
        assert_eq!(v.label("Pålydende"), Some(FieldLabel::NominalValue));
        assert_eq!(v.label("Share capital"), Some(FieldLabel::ShareCapital));
        assert_eq!(v.label("Merknader"), Some(FieldLabel::Remarks));
    }

    #[test]
    fn share_classes_canonicalize() {
        let v = Vocabulary::new();
        assert_eq!(v.share_class("A-aksjer"), Some("Class A"));
        assert_eq!(v.share_class("Class A"), Some("Class A"));
        assert_eq!(v.share_class("Ordinære aksjer"), Some("Ordinary shares"));
        assert_eq!(v.share_class("Preferanseaksjer"), Some("Preference shares"));
        assert_eq!(v.share_class("Navn"), None);
    }

    #[test]
    fn corporate_suffixes_match_trailing_token_only() {
        let v = Vocabulary::new();
        assert!(v.is_corporate_name("Kvist Invest AS"));
        assert!(v.is_corporate_name("Acme Ltd."));
        assert!(v.is_corporate_name("Dansk Industri A/S"));
        assert!(v.is_corporate_name("Müller GmbH"));
        assert!(!v.is_corporate_name("Ola Nordmann"));
        assert!(!v.is_corporate_name("Astrid Solberg"));
        assert!(!v.is_corporate_name(""));
    }

    #[test]
    fn footer_detection() {
        let v = Vocabulary::new();
        assert!(v.is_footer("Totalt"));
        assert!(v.is_footer("Sum: 1 000 000"));
        assert!(v.is_footer("Exported 2024-01-05"));
        assert!(v.is_footer("https://registry.example.com/export"));
        assert!(!v.is_footer("Summerfield Holdings Ltd"));
        assert!(!v.is_footer("Totalen AS"));
    }

    #[test]
    fn anchors_match_with_and_without_prefix() {
        let v = Vocabulary::new();
        assert_eq!(
            v.company_anchor("Alpha Invest AS (910 000 001)"),
            Some(("Alpha Invest AS".to_string(), "910 000 001".to_string()))
        );
        assert_eq!(
            v.company_anchor("Nordisk Data (DK 12345678)"),
            Some(("Nordisk Data".to_string(), "DK12345678".to_string()))
        );
        assert_eq!(v.company_anchor("Styret (2024)"), None);
        assert_eq!(v.company_anchor("Alpha Invest AS"), None);
    }

    #[test]
    fn extensions_layer_on_builtins() {
        let v = Vocabulary::with_extensions(
            &["XYZ".to_string()],
            &[("Founder shares".to_string(), vec!["gründeraksjer".to_string()])],
        );
        assert!(v.is_corporate_name("Test XYZ"));
        assert!(v.is_corporate_name("Kvist Invest AS"));
        assert_eq!(v.share_class("Gründeraksjer"), Some("Founder shares"));
        assert_eq!(v.share_class("Founder shares"), Some("Founder shares"));
        assert_eq!(v.share_class("A-aksjer"), Some("Class A"));
    }
}
