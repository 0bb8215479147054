//! Source file heuristics
//!
//! Small pure helpers for working with multi-file verified sources: picking
//! the main contract file, merging files for prompting, and deduping paths.

use crate::models::types::ContractFile;

/// Pick the file most likely to hold the primary contract.
///
/// Scoring: a file whose stem has a matching `contract` declaration inside
/// gets a large bonus, then files are ranked by how many external/public
/// function declarations they carry. Ties keep the earliest file.
pub fn find_main_contract(files: &[ContractFile]) -> Option<&ContractFile> {
    files
        .iter()
        .enumerate()
        .max_by_key(|(idx, file)| {
            // enumerate index negated so earlier files win ties under max_by_key
            (score_file(file), std::cmp::Reverse(*idx))
        })
        .map(|(_, file)| file)
}

fn score_file(file: &ContractFile) -> i64 {
    let stem = file.name.strip_suffix(".sol").unwrap_or(&file.name);
    let mut score = 0i64;

    let declares_self = file.content.lines().any(|line| {
        let line = line.trim_start();
        (line.starts_with("contract ") || line.starts_with("abstract contract "))
            && line.contains(stem)
    });
    if declares_self {
        score += 100;
    }

    score += file
        .content
        .lines()
        .filter(|line| {
            let line = line.trim_start();
            line.starts_with("function ")
                && (line.contains(" external") || line.contains(" public"))
        })
        .count() as i64;

    score
}

/// Merge all files into one prompt-ready blob, each prefixed by its path
pub fn merge_contract_contents(files: &[ContractFile]) -> String {
    let mut merged = String::new();
    for file in files {
        merged.push_str(&format!("// File: {}\n{}\n\n", file.path, file.content));
    }
    merged
}

/// Drop duplicate paths, keeping the LAST occurrence of each.
/// Relative order of surviving files is preserved.
pub fn dedupe_files(files: Vec<ContractFile>) -> Vec<ContractFile> {
    let mut result: Vec<ContractFile> = Vec::with_capacity(files.len());
    for file in files {
        if let Some(existing) = result.iter_mut().find(|f| f.path == file.path) {
            *existing = file;
        } else {
            result.push(file);
        }
    }
    result
}
