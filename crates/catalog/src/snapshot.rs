//! Read-only catalog snapshot supplied by the caller.

use serde::{Deserialize, Serialize};

use eduledger_core::{
    ClassId, CourseId, DomainError, DomainResult, Money, Period, ProfessorId, StudentId,
};

use crate::professor::Professor;

/// A course: the catalog entry class groups are derived from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub id: CourseId,
    /// Default monthly price; the last stop of the fee fallback chain.
    pub price: Option<Money>,
}

/// A student's roster entry in a class group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enrollment {
    pub student: StudentId,
    /// Per-student fee override. Takes precedence over the class and course
    /// prices when present, including an explicit zero, which makes every
    /// period trivially settled for this student.
    pub monthly_fee: Option<Money>,
}

/// A professor's staffing entry in a class group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub professor: ProfessorId,
    /// Legacy per-professor per-class pay override. Newer data carries the
    /// uniform rate on the class itself.
    pub pay_override: Option<Money>,
}

/// A scheduled class group with its roster and staffing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassGroup {
    pub id: ClassId,
    pub course: CourseId,
    pub monthly_price: Option<Money>,
    /// Uniform per-class pay rate for per-class professors.
    pub per_class_rate: Option<Money>,
    /// First billable period, when known.
    pub starts: Option<Period>,
    /// Last billable period, when known.
    pub ends: Option<Period>,
    pub roster: Vec<Enrollment>,
    pub staff: Vec<Assignment>,
}

impl ClassGroup {
    pub fn enrollment(&self, student: StudentId) -> Option<&Enrollment> {
        self.roster.iter().find(|e| e.student == student)
    }

    pub fn assignment(&self, professor: ProfessorId) -> Option<&Assignment> {
        self.staff.iter().find(|a| a.professor == professor)
    }

    /// The class's billable periods, clipped to `fallback_end` when the class
    /// has no end date.
    pub fn billable_periods(&self, fallback_end: Period) -> Vec<Period> {
        let Some(start) = self.starts else {
            return Vec::new();
        };
        let end = self.ends.unwrap_or(fallback_end);
        Period::range_inclusive(start, end)
    }
}

/// Snapshot of the catalog as of one reconciliation call.
///
/// The engine never caches across calls: every computation receives a fresh
/// snapshot from the caller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogSnapshot {
    pub courses: Vec<Course>,
    pub classes: Vec<ClassGroup>,
    pub professors: Vec<Professor>,
}

impl CatalogSnapshot {
    pub fn course(&self, id: CourseId) -> Option<&Course> {
        self.courses.iter().find(|c| c.id == id)
    }

    pub fn class(&self, id: ClassId) -> DomainResult<&ClassGroup> {
        self.classes
            .iter()
            .find(|c| c.id == id)
            .ok_or(DomainError::NotFound)
    }

    pub fn professor(&self, id: ProfessorId) -> DomainResult<&Professor> {
        self.professors
            .iter()
            .find(|p| p.id == id)
            .ok_or(DomainError::NotFound)
    }
}
