use std::fmt::{self, Write};

use client_core::{
    filter::{
        file_location, files_in_subject, semester_label, semesters_for_year, semesters_in_year,
        subjects_for_semester, subjects_in_semester, subjects_in_term, term_date_range, year_label,
    },
    preview::{
        format_local_date, format_local_datetime, tag_chips, version_excerpt, FilePreview,
        PreviewTab,
    },
    stats::DashboardSummary,
    TrackerState,
};
use shared::domain::TexFile;

pub fn dashboard(out: &mut impl Write, state: &TrackerState) -> fmt::Result {
    let summary = DashboardSummary::from_stats(&state.stats);
    writeln!(out, "Academic Years  {}", summary.total_years)?;
    writeln!(out, "Semesters       {}", summary.total_semesters)?;
    writeln!(out, "Subjects        {}", summary.total_subjects)?;
    writeln!(out, "LaTeX Files     {}", summary.total_files)?;
    writeln!(out)?;
    writeln!(out, "Compilation status")?;
    for (status, count) in summary.compilation {
        writeln!(out, "  {:<8} {count}", status.as_str())?;
    }
    writeln!(out)?;
    writeln!(out, "Recent files")?;
    if summary.recent_files.is_empty() {
        writeln!(out, "  (none)")?;
    }
    for file in summary.recent_files {
        writeln!(
            out,
            "  {}  {}  {}",
            file.name,
            file.compilation_status.as_str(),
            format_local_date(file.updated_at)
        )?;
    }
    Ok(())
}

pub fn file_cards(out: &mut impl Write, state: &TrackerState, files: &[&TexFile]) -> fmt::Result {
    if files.is_empty() {
        return writeln!(out, "No files found");
    }
    for file in files {
        writeln!(out, "{}  [{}]", file.name, file.id)?;
        writeln!(
            out,
            "  {}",
            file_location(file, &state.semesters, &state.subjects)
        )?;
        writeln!(
            out,
            "  {} words  {} bytes  {}",
            file.word_count,
            file.file_size,
            file.compilation_status.as_str()
        )?;
        let chips = tag_chips(&file.tags);
        if !chips.is_empty() {
            writeln!(out, "  tags: {}", chips.join(", "))?;
        }
        writeln!(out, "  updated {}", format_local_date(file.updated_at))?;
    }
    Ok(())
}

pub fn management(out: &mut impl Write, state: &TrackerState) -> fmt::Result {
    writeln!(out, "Academic Years")?;
    for year in &state.years {
        writeln!(
            out,
            "  {}  [{}]  {} semesters",
            year_label(year),
            year.id,
            semesters_in_year(&state.semesters, &year.id)
        )?;
        for semester in semesters_for_year(&state.semesters, Some(&year.id)) {
            writeln!(
                out,
                "    {}  [{}]  {} subjects",
                semester_label(semester),
                semester.id,
                subjects_in_semester(&state.subjects, &semester.id)
            )?;
            for subject in subjects_for_semester(&state.subjects, Some(&semester.id)) {
                writeln!(
                    out,
                    "      {}  [{}]  {}  {} files",
                    subject.name,
                    subject.id,
                    subject.color_or_default(),
                    files_in_subject(&state.files, &subject.id)
                )?;
            }
        }
    }
    if !state.terms.is_empty() {
        writeln!(out)?;
        writeln!(out, "Terms")?;
        for term in &state.terms {
            let dates = term_date_range(term).unwrap_or_default();
            writeln!(
                out,
                "  {}  [{}]  {dates}  {} subjects",
                term.name,
                term.id,
                subjects_in_term(&state.subjects, &term.id)
            )?;
        }
    }
    Ok(())
}

pub fn preview(out: &mut impl Write, preview: &FilePreview) -> fmt::Result {
    let file = &preview.file;
    writeln!(out, "{}", file.name)?;
    writeln!(
        out,
        "{} words • {} bytes • {}",
        file.word_count,
        file.file_size,
        file.compilation_status.as_str()
    )?;
    writeln!(out, "-- {} --", preview.tab_label(preview.tab))?;
    match preview.tab {
        PreviewTab::Content => {
            writeln!(out, "{}", file.content)?;
        }
        PreviewTab::Info => {
            writeln!(out, "Source:  {}", file.source_type.as_str())?;
            writeln!(out, "Created: {}", format_local_datetime(file.created_at))?;
            writeln!(out, "Updated: {}", format_local_datetime(file.updated_at))?;
            if !file.tags.is_empty() {
                writeln!(out, "Tags:    {}", file.tags.join(", "))?;
            }
            if let Some(notes) = file.notes.as_deref().filter(|notes| !notes.is_empty()) {
                writeln!(out, "Notes:   {notes}")?;
            }
            if let Some(output) = file.compilation_output.as_deref() {
                writeln!(out, "Compilation output:\n{output}")?;
            }
        }
        PreviewTab::Versions => {
            if file.versions.is_empty() {
                writeln!(out, "No versions recorded")?;
            }
            for (number, version) in preview.numbered_versions() {
                writeln!(
                    out,
                    "Version {number}  {}  {} words",
                    format_local_datetime(version.created_at),
                    version.word_count
                )?;
                writeln!(out, "  {}", version_excerpt(&version.content))?;
            }
        }
    }
    Ok(())
}
