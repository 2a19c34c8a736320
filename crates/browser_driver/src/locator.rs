use core::fmt::{Display, Formatter, Result as FmtResult};

use anyhow::{Result, bail};

/// What a locator searches for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Target {
    /// CSS selector, matched with `querySelectorAll`.
    Css(String),
    /// Element whose own text equals this string after whitespace trimming.
    Text(String),
}

/// Which of the matched elements a locator refers to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Nth {
    /// Every match. Actions require exactly one.
    #[default]
    All,
    First,
    Last,
    Index(usize),
}

/// A lazily resolved reference to elements on the page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Locator {
    target: Target,
    nth: Nth,
}

impl Locator {
    pub fn css(selector: impl Into<String>) -> Self {
        Self {
            target: Target::Css(selector.into()),
            nth: Nth::All,
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self {
            target: Target::Text(text.into()),
            nth: Nth::All,
        }
    }

    #[must_use]
    pub fn first(self) -> Self {
        Self {
            nth: Nth::First,
            ..self
        }
    }

    #[must_use]
    pub fn last(self) -> Self {
        Self {
            nth: Nth::Last,
            ..self
        }
    }

    #[must_use]
    pub fn nth(self, index: usize) -> Self {
        Self {
            nth: Nth::Index(index),
            ..self
        }
    }

    pub const fn target(&self) -> &Target {
        &self.target
    }

    pub const fn position(&self) -> Nth {
        self.nth
    }

    /// Narrow all matches down to the ones this locator refers to.
    pub fn pick<T>(&self, mut matches: Vec<T>) -> Vec<T> {
        match self.nth {
            Nth::All => matches,
            Nth::First => matches.into_iter().take(1).collect(),
            Nth::Last => matches.pop().into_iter().collect(),
            Nth::Index(index) => matches.into_iter().nth(index).into_iter().collect(),
        }
    }

    /// Narrow to exactly one element, as every action requires.
    pub fn pick_one<T>(&self, matches: Vec<T>) -> Result<T> {
        let found = matches.len();
        let mut picked = self.pick(matches);
        match picked.len() {
            1 => picked.pop().ok_or_else(|| anyhow::anyhow!("no element matches {self}")),
            0 => bail!("no element matches {self} ({found} candidates)"),
            count => bail!("{self} resolved to {count} elements, expected exactly one"),
        }
    }
}

impl Display for Locator {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> FmtResult {
        match &self.target {
            Target::Css(selector) => write!(formatter, "css={selector}")?,
            Target::Text(text) => write!(formatter, "text=\"{text}\"")?,
        }
        match self.nth {
            Nth::All => Ok(()),
            Nth::First => write!(formatter, " >> first"),
            Nth::Last => write!(formatter, " >> last"),
            Nth::Index(index) => write!(formatter, " >> nth={index}"),
        }
    }
}
