use std::io::{self, BufRead, Write};

/// Asks a yes/no question on stdin. Anything but `y`/`yes` is a no, and so
/// is a closed stdin.
pub fn confirm(question: &str) -> io::Result<bool> {
    confirm_from(question, &mut io::stdin().lock(), &mut io::stdout())
}

pub fn confirm_from<R: BufRead, W: Write>(question: &str, input: &mut R, out: &mut W) -> io::Result<bool> {
    write!(out, "{} (y/n): ", question)?;
    out.flush()?;
    let mut answer = String::new();
    if input.read_line(&mut answer)? == 0 {
        return Ok(false);
    }
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}
