/// Classification of a single target character against the live input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CharClass {
    Correct,
    Incorrect,
    Cursor,
    Pending,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DiffChar {
    pub ch: char,
    pub class: CharClass,
}

/// Classify every character of `target` against `input`.
///
/// The result always has exactly one entry per target character. Positions
/// already typed are `Correct` or `Incorrect`, the first untyped position is
/// the `Cursor`, and everything after it is `Pending`. Input typed past the
/// end of the target does not show up.
pub fn diff(target: &str, input: &str) -> Vec<DiffChar> {
    let mut typed = input.chars();
    let mut typed_len = 0usize;

    target
        .chars()
        .enumerate()
        .map(|(i, ch)| {
            let class = match typed.next() {
                Some(actual) => {
                    typed_len += 1;
                    if actual == ch {
                        CharClass::Correct
                    } else {
                        CharClass::Incorrect
                    }
                }
                None if i == typed_len => CharClass::Cursor,
                None => CharClass::Pending,
            };
            DiffChar { ch, class }
        })
        .collect()
}

/// Number of input positions that match the target at the same index.
pub fn count_correct(target: &str, input: &str) -> usize {
    target
        .chars()
        .zip(input.chars())
        .filter(|(expected, actual)| expected == actual)
        .count()
}
