//! Client-side filtering and lookups over already-fetched collections.
//!
//! Nothing here checks referential integrity: a missing referent yields a
//! blank label or is simply not matched.

use shared::domain::{
    Semester, SemesterId, Subject, SubjectId, Term, TermId, TexFile, Year, YearId,
};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileFilter {
    pub semester: Option<SemesterId>,
    pub subject: Option<SubjectId>,
}

impl FileFilter {
    pub fn is_empty(&self) -> bool {
        self.semester.is_none() && self.subject.is_none()
    }

    /// A new semester selection invalidates the subject selection.
    pub fn select_semester(&mut self, semester: Option<SemesterId>) {
        self.semester = semester;
        self.subject = None;
    }

    pub fn select_subject(&mut self, subject: Option<SubjectId>) {
        self.subject = subject;
    }

    pub fn matches(&self, file: &TexFile) -> bool {
        if let Some(semester) = &self.semester {
            if file.grouping_id().as_ref() != Some(semester) {
                return false;
            }
        }
        if let Some(subject) = &self.subject {
            if file.subject_id.as_ref() != Some(subject) {
                return false;
            }
        }
        true
    }

    pub fn apply<'a>(&self, files: &'a [TexFile]) -> Vec<&'a TexFile> {
        files.iter().filter(|file| self.matches(file)).collect()
    }
}

pub fn semesters_for_year<'a>(
    semesters: &'a [Semester],
    year: Option<&YearId>,
) -> Vec<&'a Semester> {
    semesters
        .iter()
        .filter(|semester| year.map_or(true, |year| &semester.year_id == year))
        .collect()
}

pub fn subjects_for_semester<'a>(
    subjects: &'a [Subject],
    semester: Option<&SemesterId>,
) -> Vec<&'a Subject> {
    subjects
        .iter()
        .filter(|subject| semester.map_or(true, |id| subject.grouping_id().as_ref() == Some(id)))
        .collect()
}

pub fn find_year<'a>(years: &'a [Year], id: &YearId) -> Option<&'a Year> {
    years.iter().find(|year| &year.id == id)
}

pub fn find_semester<'a>(semesters: &'a [Semester], id: &SemesterId) -> Option<&'a Semester> {
    semesters.iter().find(|semester| &semester.id == id)
}

pub fn find_subject<'a>(subjects: &'a [Subject], id: &SubjectId) -> Option<&'a Subject> {
    subjects.iter().find(|subject| &subject.id == id)
}

pub fn year_label(year: &Year) -> String {
    format!("Year {}", year.year)
}

pub fn semester_label(semester: &Semester) -> String {
    format!("Semester {}", semester.name)
}

/// "Semester X • Subject" style location line for a file card. Unresolved
/// parts render blank.
pub fn file_location(file: &TexFile, semesters: &[Semester], subjects: &[Subject]) -> String {
    let semester = file
        .grouping_id()
        .and_then(|id| find_semester(semesters, &id))
        .map(semester_label)
        .unwrap_or_default();
    let subject = subject_label(subjects, file.subject_id.as_ref());
    format!("{semester} • {subject}")
}

/// Subject name for an optional reference, blank when it does not resolve.
pub fn subject_label(subjects: &[Subject], id: Option<&SubjectId>) -> String {
    id.and_then(|id| find_subject(subjects, id))
        .map(|subject| subject.name.clone())
        .unwrap_or_default()
}

pub fn files_in_subject(files: &[TexFile], subject: &SubjectId) -> usize {
    files
        .iter()
        .filter(|file| file.subject_id.as_ref() == Some(subject))
        .count()
}

pub fn subjects_in_semester(subjects: &[Subject], semester: &SemesterId) -> usize {
    subjects
        .iter()
        .filter(|subject| subject.semester_id.as_ref() == Some(semester))
        .count()
}

pub fn subjects_in_term(subjects: &[Subject], term: &TermId) -> usize {
    subjects
        .iter()
        .filter(|subject| subject.term_id.as_ref() == Some(term))
        .count()
}

pub fn semesters_in_year(semesters: &[Semester], year: &YearId) -> usize {
    semesters
        .iter()
        .filter(|semester| &semester.year_id == year)
        .count()
}

pub fn term_date_range(term: &Term) -> Option<String> {
    let start = term.start_date?;
    let end = term
        .end_date
        .map(|end| end.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "Present".to_string());
    Some(format!("{} - {end}", start.format("%Y-%m-%d")))
}

#[cfg(test)]
#[path = "tests/filter_tests.rs"]
mod tests;
