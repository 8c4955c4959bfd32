// Clean formatting artifacts from raw generated text before tabular parsing.
// The generation service is asked for raw CSV but does not reliably comply:
// fenced blocks, stray backticks, and degenerate leading lines all occur.

/// Normalize raw generated text into a tabular-text candidate.
///
/// Strips leading/trailing code fences (optionally tagged, e.g. ```` ```csv ````),
/// removes remaining backtick characters, and drops degenerate leading lines
/// consisting only of commas. Idempotent; never fails; whitespace-only input
/// yields an empty string.
pub fn normalize(raw: &str) -> String {
    let unfenced = strip_fences(raw.trim());
    let no_backticks = unfenced.replace('`', "");
    strip_degenerate_leading_lines(no_backticks.trim()).to_string()
}

/// Remove a leading fence line (```` ``` ```` or ```` ```csv ````) and a
/// trailing bare fence line, when present.
fn strip_fences(text: &str) -> &str {
    let mut out = text;
    if let Some(rest) = out.strip_prefix("```") {
        // Skip the format hint up to the end of the fence line.
        out = match rest.find('\n') {
            Some(nl) => &rest[nl + 1..],
            None => "",
        };
    }
    if let Some(rest) = out.trim_end().strip_suffix("```") {
        out = rest;
    }
    out
}

/// Drop leading lines that contain only commas and whitespace — an
/// empty-column artifact some generations prepend before the header.
fn strip_degenerate_leading_lines(text: &str) -> &str {
    let mut out = text;
    loop {
        let line_end = out.find('\n').unwrap_or(out.len());
        let line = &out[..line_end];
        let degenerate =
            !line.trim().is_empty() && line.chars().all(|c| c == ',' || c.is_whitespace());
        if !degenerate {
            return out;
        }
        out = out[line_end..].trim_start();
    }
}
