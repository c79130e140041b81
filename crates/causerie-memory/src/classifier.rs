// SPDX-FileCopyrightText: 2026 Causerie Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Pluggable sentence classifiers.
//!
//! The offline summarizer asks a [`Classifier`] whether a sentence carries a
//! durable fact. [`FactPatterns`] is the default: a set of French keyword
//! patterns, extensible with user patterns from configuration.

use std::sync::LazyLock;

use causerie_core::CauserieError;
use regex::Regex;
use strum::{Display, EnumString};

/// A strategy that labels a piece of text, or declines to.
pub trait Classifier: Send + Sync {
    type Label;

    fn classify(&self, text: &str) -> Option<Self::Label>;
}

/// Category of a durable fact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum FactKind {
    Preference,
    Objective,
    Deadline,
    Budget,
    Obligation,
    Constraint,
    /// Matched one of the configured extra patterns.
    Custom,
}

const BUILTIN_SOURCES: &[(FactKind, &str)] = &[
    (
        FactKind::Preference,
        r"(?i)\b(je préf[èe]re|j['’]aime|j['’]adore|je d[ée]teste|je n['’]aime pas|plut[ôo]t que|ma pr[ée]f[ée]rence)",
    ),
    (
        FactKind::Objective,
        r"(?i)\b(objectifs?|mon but|le but|je veux|je voudrais|j['’]aimerais|je souhaite|mon projet)\b",
    ),
    (
        FactKind::Deadline,
        r"(?i)\b(avant le|d['’]ici|date limite|[ée]ch[ée]ance|deadline|demain|lundi|mardi|mercredi|jeudi|vendredi|samedi|dimanche|janvier|f[ée]vrier|mars|avril|mai|juin|juillet|ao[ûu]t|septembre|octobre|novembre|d[ée]cembre)\b|\b\d{1,2}/\d{1,2}(/\d{2,4})?\b",
    ),
    (
        FactKind::Budget,
        r"(?i)\b(budget|co[ûu]ts?|prix|tarifs?)\b|\d+\s?(€|\$|euros?\b|dollars?\b)",
    ),
    (
        FactKind::Obligation,
        r"(?i)\b(il faut|je dois|doit|doivent|obligatoire|interdit|ne jamais|toujours|jamais)\b",
    ),
    (
        FactKind::Constraint,
        r"(?i)\b(contraintes?|r[èe]gles?|limites?|maximum|minimum|exigences?|imp[ée]ratifs?)\b",
    ),
];

static BUILTIN_PATTERNS: LazyLock<Vec<(FactKind, Regex)>> = LazyLock::new(|| {
    BUILTIN_SOURCES
        .iter()
        .filter_map(|(kind, source)| Regex::new(source).ok().map(|re| (*kind, re)))
        .collect()
});

/// Regex-based fact detector.
#[derive(Debug, Clone)]
pub struct FactPatterns {
    patterns: Vec<(FactKind, Regex)>,
}

impl FactPatterns {
    /// The built-in French pattern set.
    pub fn french() -> Self {
        Self {
            patterns: BUILTIN_PATTERNS.clone(),
        }
    }

    /// Built-in patterns plus `extra`, each labelled [`FactKind::Custom`].
    pub fn with_extra<S: AsRef<str>>(extra: &[S]) -> Result<Self, CauserieError> {
        let mut patterns = Self::french();
        for source in extra {
            patterns.add(FactKind::Custom, source.as_ref())?;
        }
        Ok(patterns)
    }

    /// Appends one pattern.
    pub fn add(&mut self, kind: FactKind, source: &str) -> Result<(), CauserieError> {
        let re = Regex::new(source)
            .map_err(|e| CauserieError::Config(format!("invalid fact pattern '{source}': {e}")))?;
        self.patterns.push((kind, re));
        Ok(())
    }

    /// Every kind whose pattern matches `text`, in pattern order.
    pub fn kinds(&self, text: &str) -> Vec<FactKind> {
        let mut kinds = Vec::new();
        for (kind, re) in &self.patterns {
            if re.is_match(text) && !kinds.contains(kind) {
                kinds.push(*kind);
            }
        }
        kinds
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

impl Default for FactPatterns {
    fn default() -> Self {
        Self::french()
    }
}

impl Classifier for FactPatterns {
    type Label = FactKind;

    fn classify(&self, text: &str) -> Option<FactKind> {
        self.patterns
            .iter()
            .find(|(_, re)| re.is_match(text))
            .map(|(kind, _)| *kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_builtin_pattern_compiles() {
        assert_eq!(BUILTIN_PATTERNS.len(), BUILTIN_SOURCES.len());
        assert_eq!(FactPatterns::french().len(), 6);
    }

    #[test]
    fn recognizes_each_category() {
        let patterns = FactPatterns::french();
        let cases = [
            ("Je préfère le train à l'avion.", FactKind::Preference),
            ("Mon objectif est de courir un marathon.", FactKind::Objective),
            ("Le rendu est prévu d'ici vendredi.", FactKind::Deadline),
            ("Le budget total est serré.", FactKind::Budget),
            ("Ça coûte 45 €.", FactKind::Budget),
            ("Il faut rappeler le client.", FactKind::Obligation),
            ("La règle est simple.", FactKind::Constraint),
        ];
        for (text, expected) in cases {
            assert_eq!(patterns.classify(text), Some(expected), "{text}");
        }
    }

    #[test]
    fn small_talk_is_not_a_fact() {
        let patterns = FactPatterns::french();
        assert_eq!(patterns.classify("Bonjour, comment ça va ?"), None);
        assert_eq!(patterns.classify("Merci beaucoup."), None);
    }

    #[test]
    fn extra_patterns_are_custom() {
        let patterns = FactPatterns::with_extra(&["(?i)allergique"]).unwrap();
        assert_eq!(
            patterns.classify("Je suis allergique aux noix."),
            Some(FactKind::Custom)
        );
    }

    #[test]
    fn invalid_extra_pattern_is_config_error() {
        let err = FactPatterns::with_extra(&["("]).unwrap_err();
        assert!(matches!(err, CauserieError::Config(_)));
    }

    #[test]
    fn kinds_lists_all_matches() {
        let patterns = FactPatterns::french();
        let kinds = patterns.kinds("Je veux un budget de 200 euros avant le 3/04.");
        assert!(kinds.contains(&FactKind::Objective));
        assert!(kinds.contains(&FactKind::Budget));
        assert!(kinds.contains(&FactKind::Deadline));
    }

    #[test]
    fn fact_kind_parses_from_snake_case() {
        use std::str::FromStr;
        assert_eq!(FactKind::from_str("deadline").unwrap(), FactKind::Deadline);
        assert_eq!(FactKind::Custom.to_string(), "custom");
    }
}
