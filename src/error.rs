//! Error and warning types for the engine, per the kinds named in the
//! engine's error-handling design: `ParseError`, `LoadError`, `RenderError`
//! and `InternalInvariant` are surfaced to callers; everything else is a
//! [`Warning`] and never fails a job.

use std::fmt;

use ecow::EcoString;

/// A distance literal failed to parse, or a hyphenation dictionary header
/// named an unknown key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError(EcoString);

impl ParseError {
    pub fn new(message: impl Into<EcoString>) -> Self {
        Self(message.into())
    }

    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "parse error: {}", self.0)
    }
}

impl std::error::Error for ParseError {}

/// A resource could not be loaded: a hyphenation pattern file is malformed,
/// or a font failed to load through the font-manager's loader hook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadError(EcoString);

impl LoadError {
    pub fn new(message: impl Into<EcoString>) -> Self {
        Self(message.into())
    }

    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "load error: {}", self.0)
    }
}

impl std::error::Error for LoadError {}

/// Drawing asked a composite font for a code point that none of its
/// constituent fonts support.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderError(EcoString);

impl RenderError {
    pub fn new(message: impl Into<EcoString>) -> Self {
        Self(message.into())
    }

    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "render error: {}", self.0)
    }
}

impl std::error::Error for RenderError {}

/// An internal invariant was violated: inconsistent text direction during
/// bidi reordering, or an unexpected element class encountered during
/// kerning. Should never occur on well-formed input; if it does, it is a
/// bug in the engine rather than bad caller data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InternalInvariant(EcoString);

impl InternalInvariant {
    pub fn new(message: impl Into<EcoString>) -> Self {
        Self(message.into())
    }

    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InternalInvariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "internal invariant violated: {}", self.0)
    }
}

impl std::error::Error for InternalInvariant {}

/// A non-fatal condition encountered during assembly. Warnings never fail a
/// job; they're collected into a [`Warnings`] sink and also emitted through
/// `tracing::warn!` as they occur.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// A paragraph ended with unbalanced quotation state.
    UnbalancedQuotes { line: Option<u32> },
    /// Two or more `Section` bookmarks landed on the same physical page.
    DuplicateSection { page: u32 },
    /// The kerning pass couldn't resolve a discretionary's post/no-break
    /// disagreement by peeking the next element, and fell back to
    /// `prevCp = noBreakCh`.
    UnresolvedKernPeek,
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnbalancedQuotes { line } => match line {
                Some(n) => write!(f, "unbalanced quotation state (source line {n})"),
                None => write!(f, "unbalanced quotation state"),
            },
            Self::DuplicateSection { page } => {
                write!(f, "duplicate section bookmark on physical page {page}")
            }
            Self::UnresolvedKernPeek => {
                write!(f, "kerning peek-ahead across discretionary was unresolved")
            }
        }
    }
}

/// Collects warnings produced while running the engine over one document.
#[derive(Debug, Clone, Default)]
pub struct Warnings(Vec<Warning>);

impl Warnings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a warning and emits it through `tracing`.
    pub fn push(&mut self, warning: Warning) {
        tracing::warn!("{warning}");
        self.0.push(warning);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Warning> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[Warning] {
        &self.0
    }
}
