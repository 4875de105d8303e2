const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";
const RESET: &str = "\x1b[0m";

/// Line diff of `old` against `new`: unchanged lines are prefixed with two
/// spaces, removed lines with `- ` and added lines with `+ `.
pub fn render_diff(old: &str, new: &str) -> String {
    let old_lines: Vec<&str> = old.lines().collect();
    let new_lines: Vec<&str> = new.lines().collect();

    // lcs[i][j] = longest common subsequence of old_lines[i..] and new_lines[j..]
    let mut lcs = vec![vec![0usize; new_lines.len() + 1]; old_lines.len() + 1];
    for i in (0..old_lines.len()).rev() {
        for j in (0..new_lines.len()).rev() {
            lcs[i][j] = if old_lines[i] == new_lines[j] {
                lcs[i + 1][j + 1] + 1
            } else {
                lcs[i + 1][j].max(lcs[i][j + 1])
            };
        }
    }

    let mut out = String::new();
    let (mut i, mut j) = (0, 0);
    while i < old_lines.len() || j < new_lines.len() {
        if i < old_lines.len() && j < new_lines.len() && old_lines[i] == new_lines[j] {
            out.push_str(&format!("  {}\n", old_lines[i]));
            i += 1;
            j += 1;
        } else if j < new_lines.len() && (i == old_lines.len() || lcs[i][j + 1] >= lcs[i + 1][j]) {
            out.push_str(&format!("+ {}\n", new_lines[j]));
            j += 1;
        } else {
            out.push_str(&format!("- {}\n", old_lines[i]));
            i += 1;
        }
    }

    out
}

/// Print a rendered diff with removed lines in red and added lines in green.
pub fn show_diff(diff: &str) {
    for line in diff.lines() {
        if line.starts_with("- ") {
            println!("{}{}{}", RED, line, RESET);
        } else if line.starts_with("+ ") {
            println!("{}{}{}", GREEN, line, RESET);
        } else {
            println!("{}", line);
        }
    }
}
