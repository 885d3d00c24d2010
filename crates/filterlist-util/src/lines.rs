use itertools::Itertools;

pub trait RetainWithIndex<T> {
    /// Like [`Vec::retain`], but the predicate also receives the original index of each element.
    fn retain_with_index<F>(&mut self, f: F)
    where
        F: FnMut(&T, usize) -> bool;
}

impl<T> RetainWithIndex<T> for Vec<T> {
    fn retain_with_index<F>(&mut self, mut f: F)
    where
        F: FnMut(&T, usize) -> bool,
    {
        let mut index = 0;
        self.retain(|item| {
            let keep = f(item, index);
            index += 1;
            keep
        });
    }
}

/// Returns up to `count` lines immediately preceding `index`.
pub fn lines_before<S>(lines: &[S], index: usize, count: usize) -> &[S] {
    let index = index.min(lines.len());
    &lines[index.saturating_sub(count)..index]
}

/// Renders lines as a tab-indented block, one line per row.
pub fn indent_block<S: AsRef<str>>(lines: &[S]) -> String {
    lines
        .iter()
        .map(|line| format!("\t{}", line.as_ref()))
        .join("\n")
}
