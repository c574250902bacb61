/// Collapse runs of spaces, drop newlines and tabs, trim.
pub fn clean_text(raw: &str) -> String {
    let stripped: String = raw.chars().filter(|c| *c != '\n' && *c != '\t').collect();
    let mut out = String::with_capacity(stripped.len());
    let mut prev_space = false;
    for c in stripped.chars() {
        if c == ' ' {
            if !prev_space {
                out.push(c);
            }
            prev_space = true;
        } else {
            out.push(c);
            prev_space = false;
        }
    }
    out.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_text_normalizes_cell_content() {
        assert_eq!(clean_text("\n  3 N   Sayre\t "), "3 N Sayre");
        assert_eq!(clean_text("GOLF\nBALL"), "GOLFBALL");
        assert_eq!(clean_text(""), "");
    }
}
