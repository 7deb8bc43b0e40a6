use crate::elements::Version;
use crate::keyword::{Lexicon, G_VER, STANDARD};

/// One position in a version pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    /// Exactly this (lowercase) token.
    Word(&'static str),
    /// Any revision token (`r1`, `r2`, `r3`, `zero`); supplies the version.
    Revision,
}

/// A version pattern matched against the tokens directly before the member.
#[derive(Debug, Clone, Copy)]
pub struct VersionRule {
    pub name: &'static str,
    pub slots: &'static [Slot],
    /// Version produced when the pattern has no `Revision` slot.
    pub fixed: Option<Version>,
}

/// Version patterns, most specific first. The first rule that fits wins.
pub static RULES: &[VersionRule] = &[
    VersionRule {
        name: "g_ver_standard",
        slots: &[Slot::Word(G_VER[0]), Slot::Word(G_VER[1]), Slot::Word(STANDARD)],
        fixed: Some(Version::GVer),
    },
    VersionRule {
        name: "g_ver",
        slots: &[Slot::Word(G_VER[0]), Slot::Word(G_VER[1])],
        fixed: Some(Version::GVer),
    },
    VersionRule {
        name: "revision_standard",
        slots: &[Slot::Revision, Slot::Word(STANDARD)],
        fixed: None,
    },
    VersionRule {
        name: "standard",
        slots: &[Slot::Word(STANDARD)],
        fixed: Some(Version::Standard),
    },
    VersionRule {
        name: "revision",
        slots: &[Slot::Revision],
        fixed: None,
    },
];

/// Outcome of the version scan over the region between category and member.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VersionMatch {
    pub version: Version,
    /// Index into the region where version tokens begin; everything before
    /// it is the middle segment.
    pub start: usize,
    /// Name of the rule that matched, `None` for the default.
    pub rule: Option<&'static str>,
}

impl VersionRule {
    /// Match this rule against the tail of `region`. Returns the version when
    /// every slot lines up and the pattern fits inside the region.
    pub fn matches(&self, lexicon: &Lexicon, region: &[String]) -> Option<Version> {
        if self.slots.len() > region.len() {
            return None;
        }
        let tail = &region[region.len() - self.slots.len()..];
        let mut version = self.fixed;
        for (slot, token) in self.slots.iter().zip(tail) {
            match slot {
                Slot::Word(word) => {
                    if token != word {
                        return None;
                    }
                }
                Slot::Revision => version = Some(lexicon.revision(token)?),
            }
        }
        version
    }
}

/// Scan the rules in order; fall back to `STANDARD` consuming no tokens.
pub fn extract(lexicon: &Lexicon, region: &[String]) -> VersionMatch {
    RULES
        .iter()
        .find_map(|rule| {
            rule.matches(lexicon, region).map(|version| VersionMatch {
                version,
                start: region.len() - rule.slots.len(),
                rule: Some(rule.name),
            })
        })
        .unwrap_or(VersionMatch {
            version: Version::Standard,
            start: region.len(),
            rule: None,
        })
}
