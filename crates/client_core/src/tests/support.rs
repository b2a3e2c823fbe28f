//! Record builders shared by the unit tests.

use shared::domain::{
    CompilationStatus, FileId, FileVersion, Semester, SemesterId, SourceType, Subject, SubjectId,
    Term, TermId, TexFile, VersionId, Year, YearId,
};

pub(crate) fn year(id: &str, year: u8) -> Year {
    Year {
        id: YearId::from(id),
        year,
        description: None,
    }
}

pub(crate) fn semester(id: &str, year_id: &str, name: &str) -> Semester {
    Semester {
        id: SemesterId::from(id),
        year_id: YearId::from(year_id),
        name: name.to_string(),
        description: None,
        start_date: None,
        end_date: None,
    }
}

pub(crate) fn term(id: &str, name: &str) -> Term {
    Term {
        id: TermId::from(id),
        name: name.to_string(),
        description: None,
        start_date: None,
        end_date: None,
    }
}

pub(crate) fn subject(id: &str, name: &str, semester_id: &str) -> Subject {
    Subject {
        id: SubjectId::from(id),
        name: name.to_string(),
        description: None,
        semester_id: Some(SemesterId::from(semester_id)),
        term_id: None,
        color: None,
    }
}

pub(crate) fn file(id: &str, name: &str, semester_id: &str, subject_id: &str) -> TexFile {
    TexFile {
        id: FileId::from(id),
        name: name.to_string(),
        subject_id: Some(SubjectId::from(subject_id)),
        semester_id: Some(SemesterId::from(semester_id)),
        term_id: None,
        content: format!("\\section{{{name}}}"),
        word_count: 1,
        file_size: 12,
        compilation_status: CompilationStatus::Unknown,
        compilation_output: None,
        source_type: SourceType::Manual,
        tags: Vec::new(),
        notes: None,
        created_at: None,
        updated_at: None,
        versions: Vec::new(),
    }
}

pub(crate) fn version(id: &str, content: &str) -> FileVersion {
    FileVersion {
        id: VersionId::from(id),
        content: content.to_string(),
        word_count: content.split_whitespace().count() as u64,
        file_size: content.len() as u64,
        compilation_status: CompilationStatus::Unknown,
        created_at: None,
    }
}
