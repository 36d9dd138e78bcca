//! Line tables for source buffers.
//!
//! Byte offsets are 0-indexed. [`SourceCode`](crate::SourceCode) turns them
//! into 1-indexed lines and columns with these tables.

/// Byte offsets at which each line of `content` starts.
///
/// The first entry is always `0`, so an empty text has one (empty) line.
pub fn line_start_offsets(content: &str) -> Vec<usize> {
    let mut starts = vec![0];
    starts.extend(newline_offsets(content).map(|i| i + 1));
    starts
}

/// Byte offsets of every `\n` in `content`.
fn newline_offsets(content: &str) -> impl Iterator<Item = usize> + '_ {
    content
        .bytes()
        .enumerate()
        .filter(|&(_, b)| b == b'\n')
        .map(|(i, _)| i)
}

/// Char index of the first char of each line, given its byte offsets.
pub fn line_char_starts(content: &str, line_starts: &[usize]) -> Vec<usize> {
    let mut char_starts = Vec::with_capacity(line_starts.len());
    let mut chars_before = 0usize;
    let mut previous = 0usize;
    for &start in line_starts {
        chars_before += content[previous..start].chars().count();
        char_starts.push(chars_before);
        previous = start;
    }
    char_starts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_starts() {
        assert_eq!(line_start_offsets(""), vec![0]);
        assert_eq!(line_start_offsets("one\ntwo\nthree"), vec![0, 4, 8]);
        assert_eq!(line_start_offsets("a\n"), vec![0, 2]);
    }

    #[test]
    fn char_starts_count_chars_not_bytes() {
        let content = "é{\nb:c;\n}";
        let starts = line_start_offsets(content);
        assert_eq!(starts, vec![0, 4, 9]);
        assert_eq!(line_char_starts(content, &starts), vec![0, 3, 8]);
    }
}
