/*!
Text clean-up applied to instance files before parsing.

SATLIB benchmark files end with a `%` line followed by a lone `0`, neither of
which is a clause. Turning those lines into comments lets the strict parser
accept such files without touching them on disk.
*/

use std::borrow::Cow;

fn is_trailer(line: &str) -> bool {
    line == "%" || line == "0"
}

/// Rewrites every line that is exactly `%` or `0` into a comment line.
pub fn normalize_instance(text: &str) -> Cow<'_, str> {
    if !text.lines().any(is_trailer) {
        return Cow::Borrowed(text);
    }

    let mut normalized = String::with_capacity(text.len() + 8);
    for line in text.split_inclusive('\n') {
        let (content, ending) = match line.strip_suffix("\r\n") {
            Some(content) => (content, "\r\n"),
            None => match line.strip_suffix('\n') {
                Some(content) => (content, "\n"),
                None => (line, ""),
            },
        };

        if is_trailer(content) {
            trace!("Commenting out trailer line '{}'", content);
            normalized.push_str("c ");
        }
        normalized.push_str(content);
        normalized.push_str(ending);
    }

    Cow::Owned(normalized)
}
