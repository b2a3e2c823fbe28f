use shared::{
    domain::{CompilationStatus, TexFile},
    protocol::DashboardStats,
};

pub const RECENT_FILES_SHOWN: usize = 5;

/// What the dashboard draws, derived from the last fetched stats.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSummary<'a> {
    pub total_years: u64,
    pub total_semesters: u64,
    pub total_subjects: u64,
    pub total_files: u64,
    pub compilation: [(CompilationStatus, u64); 3],
    pub recent_files: &'a [TexFile],
}

impl<'a> DashboardSummary<'a> {
    pub fn from_stats(stats: &'a DashboardStats) -> Self {
        let recent = stats.recent_files.len().min(RECENT_FILES_SHOWN);
        Self {
            total_years: stats.total_years,
            // Older backends only report terms.
            total_semesters: stats.total_semesters.max(stats.total_terms),
            total_subjects: stats.total_subjects,
            total_files: stats.total_files,
            compilation: CompilationStatus::ALL.map(|status| (status, stats.compilation_count(status))),
            recent_files: &stats.recent_files[..recent],
        }
    }
}
