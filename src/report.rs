/*!
Error printer for `main`, showing the whole `source()` chain of a snafu error.
*/

use std::{error::Error as StdError, fmt};

pub struct Report(Box<dyn StdError>);

/// One-line rendering of a borrowed error and its causes, joined by `: `.
pub struct Chain<'a>(pub &'a (dyn StdError + 'static));

fn causes<'a>(
    error: &'a (dyn StdError + 'static),
) -> impl Iterator<Item = &'a (dyn StdError + 'static)> {
    std::iter::successors(error.source(), |&e| e.source())
}

impl Report {
    /// Causes of the error, outermost first, excluding the error itself.
    pub fn causes(&self) -> impl Iterator<Item = &(dyn StdError + 'static)> {
        causes(&*self.0)
    }
}

impl fmt::Display for Chain<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)?;
        for cause in causes(self.0) {
            write!(f, ": {}", cause)?;
        }
        Ok(())
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", Chain(&*self.0))
    }
}

impl fmt::Debug for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.0)?;

        let mut causes = self.causes().peekable();
        if causes.peek().is_some() {
            writeln!(f, "\nCaused by:")?;
            for (i, e) in causes.enumerate() {
                writeln!(f, "  {}: {}", i, e)?;
            }
        }

        Ok(())
    }
}

impl<E: Into<Box<dyn StdError>>> From<E> for Report {
    fn from(e: E) -> Self {
        Report(e.into())
    }
}
