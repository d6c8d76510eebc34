use std::collections::HashMap;
use std::io::Read;
use std::iter::FromIterator;

use lazy_static::lazy_static;
use regex::Regex;

use crate::errors::*;
use crate::preprocessing::normalize;

pub trait Stemmer: Send + Sync {
    fn stem(&self, value: &str) -> String;
}

/// Lancaster stemming with per-word overrides.
///
/// Each line of the overrides table reads `word,stem`, blank lines and lines
/// starting with `#` are skipped. Words missing from the table go through the
/// Lancaster rules.
pub struct StemOverrides {
    overrides: HashMap<String, String>,
}

impl StemOverrides {
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .comment(Some(b'#'))
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut overrides = HashMap::new();
        for record in csv_reader.records() {
            let record = record?;
            if record.len() != 2 || record[0].is_empty() || record[1].is_empty() {
                let line = record.position().map(|p| p.line()).unwrap_or_default();
                return Err(ChatbotError::InvalidConfiguration(format!(
                    "stem override on line {} must read `word,stem`",
                    line
                ))
                .into());
            }
            overrides.insert(normalize(&record[0]), normalize(&record[1]));
        }
        Ok(Self { overrides })
    }

    pub fn len(&self) -> usize {
        self.overrides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.overrides.is_empty()
    }
}

impl FromIterator<(String, String)> for StemOverrides {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        Self {
            overrides: iter
                .into_iter()
                .map(|(word, stem)| (normalize(&word), normalize(&stem)))
                .collect(),
        }
    }
}

impl Stemmer for StemOverrides {
    fn stem(&self, value: &str) -> String {
        match self.overrides.get(&normalize(value)) {
            Some(stem) => stem.clone(),
            None => LancasterStemmer.stem(value),
        }
    }
}

/// Paice/Husk (Lancaster) rules, keyed by their reversed ending.
///
/// Format: reversed ending, optional `*` (word must be intact), number of
/// characters to remove, optional string to append, then `>` to continue
/// stemming or `.` to stop.
const LANCASTER_RULES: &[&str] = &[
    "ai*2.", "a*1.", "bb1.", "city3s.", "ci2>", "cn1t>", "dd1.", "dei3y>", "deec2ss.", "dee1.",
    "de2>", "dooh4>", "e1>", "feil1v.", "fi2>", "gni3>", "gai3y.", "ga2>", "gg1.", "ht*2.",
    "hsiug5ct.", "hsi3>", "i*1.", "i1y>", "ji1d.", "juf1s.", "ju1d.", "jo1d.", "jeh1r.",
    "jrev1t.", "jsim2t.", "jn1d.", "j1s.", "lbaifi6.", "lbai4y.", "lba3>", "lbi3.", "lib2l>",
    "lc1.", "lufi4y.", "luf3>", "lu2.", "lai3>", "lau3>", "la2>", "ll1.", "mui3.", "mu*2.",
    "msi3>", "mm1.", "nois4j>", "noix4ct.", "noi3>", "nai3>", "na2>", "nee0.", "ne2>", "nn1.",
    "pihs4>", "pp1.", "re2>", "rae0.", "ra2.", "ro2>", "ru2>", "rr1.", "rt1>", "rei3y>",
    "sei3y>", "sis2.", "si2>", "ssen4>", "ss0.", "suo3>", "su*2.", "s*1>", "s0.", "tacilp4y.",
    "ta2>", "tnem4>", "tne3>", "tna3>", "tpir2b.", "tpro2b.", "tcud1.", "tpmus2.", "tpec2iv.",
    "tulo2v.", "tsis0.", "tsi3>", "tt1.", "uqi3.", "ugo1.", "vis3j>", "vie0.", "vi2>", "ylb1>",
    "yli3y>", "ylp0.", "yl2>", "ygo1.", "yhp1.", "ymo1.", "ypo1.", "yti3>", "yte3>", "ytl2.",
    "yrtsi5.", "yra3>", "yro3>", "yfi3.", "ycn2t>", "yca3>", "zi2>", "zy1s.",
];

struct LancasterRule {
    ending: String,
    intact_only: bool,
    remove_total: usize,
    append: String,
    stop: bool,
}

lazy_static! {
    static ref LANCASTER_RULE_TABLE: HashMap<char, Vec<LancasterRule>> = {
        let rule_regex = Regex::new(r"^([a-z]+)(\*?)(\d)([a-z]*)([>\.]?)$").unwrap();
        let mut table: HashMap<char, Vec<LancasterRule>> = HashMap::new();
        for rule in LANCASTER_RULES {
            let captures = rule_regex
                .captures(rule)
                .unwrap_or_else(|| panic!("Malformed Lancaster rule '{}'", rule));
            let reversed_ending = &captures[1];
            let key = reversed_ending.chars().next().unwrap();
            table.entry(key).or_insert_with(Vec::new).push(LancasterRule {
                ending: reversed_ending.chars().rev().collect(),
                intact_only: !captures[2].is_empty(),
                remove_total: captures[3].parse().unwrap(),
                append: captures[4].to_string(),
                stop: &captures[5] == ".",
            });
        }
        table
    };
}

/// Rule-based English stemmer following the Paice/Husk algorithm.
///
/// Input is lower-cased before stemming, so differently cased forms of a word
/// share a stem.
#[derive(Debug, Default, Clone, Copy)]
pub struct LancasterStemmer;

impl LancasterStemmer {
    fn last_letter_index(word: &[char]) -> Option<usize> {
        word.iter()
            .take_while(|c| c.is_alphabetic())
            .count()
            .checked_sub(1)
    }

    fn is_acceptable(word: &[char], remove_total: usize) -> bool {
        let is_vowel = |c: char| "aeiouy".contains(c);
        if word.len() < remove_total {
            return false;
        }
        let remaining = word.len() - remove_total;
        if is_vowel(word[0]) {
            remaining >= 2
        } else {
            remaining >= 3 && (is_vowel(word[1]) || is_vowel(word[2]))
        }
    }

    fn apply_rule(word: &mut Vec<char>, rule: &LancasterRule) {
        let new_len = word.len() - rule.remove_total;
        word.truncate(new_len);
        word.extend(rule.append.chars());
    }

    fn ends_with(word: &[char], ending: &str) -> bool {
        let ending: Vec<char> = ending.chars().collect();
        word.len() >= ending.len() && word[word.len() - ending.len()..] == ending[..]
    }
}

impl Stemmer for LancasterStemmer {
    fn stem(&self, value: &str) -> String {
        let intact: Vec<char> = value.to_lowercase().chars().collect();
        let mut word = intact.clone();
        loop {
            let last_letter = match Self::last_letter_index(&word) {
                Some(index) => word[index],
                None => break,
            };
            let rules = match LANCASTER_RULE_TABLE.get(&last_letter) {
                Some(rules) => rules,
                None => break,
            };
            let applied_rule = rules.iter().find(|rule| {
                Self::ends_with(&word, &rule.ending)
                    && (!rule.intact_only || word == intact)
                    && Self::is_acceptable(&word, rule.remove_total)
            });
            match applied_rule {
                Some(rule) => {
                    Self::apply_rule(&mut word, rule);
                    if rule.stop {
                        break;
                    }
                }
                None => break,
            }
        }
        word.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stem_overrides_take_precedence_over_lancaster() {
        // Given
        let table: &[u8] = r#"
# keep product names intact
maximum,maximum
 Provision , provision
"#
        .as_ref();

        // When
        let stemmer = StemOverrides::from_reader(table).unwrap();

        // Then
        assert_eq!(2, stemmer.len());
        assert_eq!("maximum", stemmer.stem("maximum"));
        assert_eq!("provision", stemmer.stem("PROVISION"));
        assert_eq!("presum", stemmer.stem("presumably"));
        assert_eq!("run", stemmer.stem("running"));
    }

    #[test]
    fn stem_overrides_reject_malformed_lines() {
        let missing_stem: &[u8] = b"maximum\n";
        let extra_field: &[u8] = b"maximum,maxim,max\n";
        let empty_stem: &[u8] = b"maximum,\n";
        assert!(StemOverrides::from_reader(missing_stem).is_err());
        assert!(StemOverrides::from_reader(extra_field).is_err());
        assert!(StemOverrides::from_reader(empty_stem).is_err());
    }

    #[test]
    fn lancaster_stemmer_works() {
        // Given
        let stemmer = LancasterStemmer;
        let words = vec![
            ("maximum", "maxim"),
            ("presumably", "presum"),
            ("multiply", "multiply"),
            ("provision", "provid"),
            ("owed", "ow"),
            ("ear", "ear"),
            ("saying", "say"),
            ("crying", "cry"),
            ("string", "string"),
            ("meant", "meant"),
            ("cement", "cem"),
        ];

        for (word, expected_stem) in words {
            // When
            let stem = stemmer.stem(word);

            // Then
            assert_eq!(expected_stem, stem, "wrong stem for '{}'", word);
        }
    }

    #[test]
    fn lancaster_stemmer_collapses_case() {
        let stemmer = LancasterStemmer;
        assert_eq!("hello", stemmer.stem("Hello"));
        assert_eq!("hello", stemmer.stem("hello"));
        assert_eq!(stemmer.stem("Running"), stemmer.stem("running"));
    }

    #[test]
    fn lancaster_stemmer_leaves_punctuation_and_short_words_untouched() {
        let stemmer = LancasterStemmer;
        assert_eq!("?", stemmer.stem("?"));
        assert_eq!("n't", stemmer.stem("n't"));
        assert_eq!("hi", stemmer.stem("Hi"));
        assert_eq!("bye", stemmer.stem("Bye"));
    }
}
