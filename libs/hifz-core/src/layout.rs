//! Fixed partition of the page range into gated sections.

use serde::Serialize;

use crate::config::TOTAL_PAGES;

/// Section identifier, 1-based.
pub type SectionId = u8;

/// A contiguous, inclusive range of units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SectionDef {
    pub id: SectionId,
    pub name: &'static str,
    pub first_unit: u32,
    pub last_unit: u32,
}

impl SectionDef {
    /// Number of units in the section.
    pub fn len(&self) -> u32 {
        self.last_unit - self.first_unit + 1
    }

    /// Whether the section holds no units.
    pub fn is_empty(&self) -> bool {
        self.last_unit < self.first_unit
    }

    /// Whether `unit` falls in this section.
    pub fn contains(&self, unit: u32) -> bool {
        (self.first_unit..=self.last_unit).contains(&unit)
    }
}

/// Five juz per section on the standard Madani pagination.
const MADANI_SECTIONS: [SectionDef; 6] = [
    SectionDef { id: 1, name: "Juz 1-5", first_unit: 1, last_unit: 101 },
    SectionDef { id: 2, name: "Juz 6-10", first_unit: 102, last_unit: 201 },
    SectionDef { id: 3, name: "Juz 11-15", first_unit: 202, last_unit: 301 },
    SectionDef { id: 4, name: "Juz 16-20", first_unit: 302, last_unit: 401 },
    SectionDef { id: 5, name: "Juz 21-25", first_unit: 402, last_unit: 501 },
    SectionDef { id: 6, name: "Juz 26-30", first_unit: 502, last_unit: TOTAL_PAGES },
];

/// Ordered list of sections covering the unit range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionLayout {
    sections: Vec<SectionDef>,
}

impl Default for SectionLayout {
    fn default() -> Self {
        Self {
            sections: MADANI_SECTIONS.to_vec(),
        }
    }
}

impl SectionLayout {
    /// All sections in gating order.
    pub fn sections(&self) -> &[SectionDef] {
        &self.sections
    }

    /// Look up a section by id.
    pub fn get(&self, id: SectionId) -> Option<&SectionDef> {
        self.sections.iter().find(|s| s.id == id)
    }

    /// The section that follows `id`, if any.
    pub fn next_after(&self, id: SectionId) -> Option<&SectionDef> {
        let index = self.sections.iter().position(|s| s.id == id)?;
        self.sections.get(index + 1)
    }

    /// Section containing `unit`.
    pub fn resolve(&self, unit: u32) -> Option<SectionId> {
        self.sections.iter().find(|s| s.contains(unit)).map(|s| s.id)
    }
}
