//! Pulls the job description out of a repository README.

const SECTION_HEADINGS: [&str; 2] = ["## mcp job", "### mcp job"];
const FALLBACK_LINES: usize = 5;

/// Extract the "MCP Job" section from README text.
///
/// The section starts after a level-2 or level-3 heading reading exactly
/// `MCP Job` (case-insensitive, surrounding whitespace ignored) and runs up
/// to the next level-2 or level-3 heading. Without such a heading, the first
/// non-blank lines after the title are used instead. Returns an empty string
/// when nothing usable is found.
pub fn extract_job_section(readme: &str) -> String {
    if readme.is_empty() {
        return String::new();
    }
    let lines: Vec<&str> = readme.lines().collect();

    let start = lines.iter().position(|l| {
        let lower = l.trim().to_lowercase();
        SECTION_HEADINGS.contains(&lower.as_str())
    });

    if let Some(start) = start {
        let chunk: Vec<&str> = lines[start + 1..]
            .iter()
            .take_while(|l| !is_section_heading(l))
            .copied()
            .collect();
        return chunk.join("\n").trim().to_string();
    }

    let non_blank: Vec<&str> = lines.into_iter().filter(|l| !l.trim().is_empty()).collect();
    if non_blank.len() > 1 {
        return non_blank
            .iter()
            .skip(1)
            .take(FALLBACK_LINES)
            .copied()
            .collect::<Vec<_>>()
            .join("\n");
    }
    String::new()
}

fn is_section_heading(line: &str) -> bool {
    line.starts_with("## ") || line.starts_with("### ")
}
