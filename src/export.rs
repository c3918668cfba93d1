use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Local;

use crate::models::{AnswerResult, PageRef};

/// Exactly what lands on the clipboard for a citation.
pub fn citation(answer: &str, source_label: &str, page: &PageRef) -> String {
    format!("\"{answer}\" (Source: {source_label}, Page {page})")
}

/// Writes the citation for an answer to the system clipboard and returns it.
pub fn copy_citation(result: &AnswerResult, source_label: &str) -> Result<String> {
    let text = citation(&result.answer, source_label, &result.page);
    let mut clipboard = arboard::Clipboard::new().context("clipboard unavailable")?;
    clipboard
        .set_text(text.clone())
        .context("clipboard write failed")?;
    Ok(text)
}

/// File name for a saved note: source stem plus page. Sentinel page labels
/// can contain separators ("N/A"), which must not become path components.
pub fn note_file_name(source_label: &str, page: &PageRef) -> String {
    let stem = source_label
        .rsplit_once('.')
        .map(|(stem, _)| stem)
        .unwrap_or(source_label);
    let page = page.to_string().replace(['/', '\\'], "_");
    format!("{stem}_Ref_Page_{page}.txt")
}

/// The note body. `generated_on` is supplied by the caller.
pub fn note_document(result: &AnswerResult, source_label: &str, generated_on: &str) -> String {
    let rule = "-".repeat(50);
    format!(
        "{rule}\nRESEARCH EVIDENCE\n{rule}\nGenerated On: {generated_on}\nQuery: {query}\nSource: {source_label} (Page {page})\n\nANSWER:\n{answer}\n\n{rule}\nStrict Knowledge Constraint: Source Material Only\n{rule}\n",
        query = result.query.to_uppercase(),
        page = result.page,
        answer = result.answer,
    )
}

/// Builds and saves the note into `dir`, named by page number.
pub fn save_research_note(
    result: &AnswerResult,
    source_label: &str,
    dir: &Path,
) -> Result<PathBuf> {
    let generated_on = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
    let path = dir.join(note_file_name(source_label, &result.page));
    fs::write(&path, note_document(result, source_label, &generated_on))
        .with_context(|| format!("failed to write {}", path.display()))?;
    log::debug!("research note saved: {}", path.display());
    Ok(path)
}

#[test]
fn test_citation_format() {
    assert_eq!(
        citation("X", "Cloud_Computing.pdf", &PageRef::Number(4)),
        r#""X" (Source: Cloud_Computing.pdf, Page 4)"#
    );
}

#[test]
fn test_note_file_name_uses_source_stem() {
    assert_eq!(
        note_file_name("Cloud_Computing.pdf", &PageRef::Number(12)),
        "Cloud_Computing_Ref_Page_12.txt"
    );
    assert_eq!(
        note_file_name("notes", &PageRef::Label("N/A".into())),
        "notes_Ref_Page_N_A.txt"
    );
}
