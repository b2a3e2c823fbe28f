use shared::{
    domain::{Semester, Subject, Term, TexFile, Year},
    protocol::DashboardStats,
};

/// Result of one full load: the five collections fetched together.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    pub years: Vec<Year>,
    pub semesters: Vec<Semester>,
    pub subjects: Vec<Subject>,
    pub files: Vec<TexFile>,
    pub stats: DashboardStats,
}

/// Disposable local copies of backend collections. Every reload replaces
/// them wholesale.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackerState {
    pub years: Vec<Year>,
    pub semesters: Vec<Semester>,
    pub terms: Vec<Term>,
    pub subjects: Vec<Subject>,
    pub files: Vec<TexFile>,
    pub stats: DashboardStats,
    pub loading: bool,
}

impl TrackerState {
    pub fn apply_snapshot(&mut self, snapshot: Snapshot) {
        let Snapshot {
            years,
            semesters,
            subjects,
            files,
            stats,
        } = snapshot;
        self.years = years;
        self.semesters = semesters;
        self.subjects = subjects;
        self.files = files;
        self.stats = stats;
    }

    pub fn replace_terms(&mut self, terms: Vec<Term>) {
        self.terms = terms;
    }

    pub fn replace_lookups(&mut self, semesters: Vec<Semester>, subjects: Vec<Subject>) {
        self.semesters = semesters;
        self.subjects = subjects;
    }

    /// Search results stand in for the file list until the next reload.
    pub fn replace_files(&mut self, files: Vec<TexFile>) {
        self.files = files;
    }
}
