//! Poems and the read-only card pool they are dealt from.

use std::borrow::Cow;
use std::collections::HashSet;

use crate::error::KarutaError;

/// One karuta card: the reader speaks both halves, the table shows the card.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Poem {
    pub id: u32,
    /// Upper verse (kami no ku).
    pub first_half: Cow<'static, str>,
    /// Lower verse (shimo no ku).
    pub second_half: Cow<'static, str>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub author: Option<Cow<'static, str>>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub image: Option<Cow<'static, str>>,
}

impl Poem {
    /// Build a poem from static text so datasets can live in `const` tables.
    pub const fn from_static(
        id: u32,
        first_half: &'static str,
        second_half: &'static str,
        author: &'static str,
        image: &'static str,
    ) -> Self {
        Self {
            id,
            first_half: Cow::Borrowed(first_half),
            second_half: Cow::Borrowed(second_half),
            author: Some(Cow::Borrowed(author)),
            image: Some(Cow::Borrowed(image)),
        }
    }

    pub fn new(
        id: u32,
        first_half: impl Into<Cow<'static, str>>,
        second_half: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self {
            id,
            first_half: first_half.into(),
            second_half: second_half.into(),
            author: None,
            image: None,
        }
    }

    /// Both halves joined the way the reader's caption shows them.
    pub fn full_text(&self) -> String {
        format!("{} {}", self.first_half, self.second_half)
    }
}

/// Validated, non-empty set of poems with unique ids.
#[derive(Clone, Debug)]
pub struct CardPool {
    poems: Vec<Poem>,
}

impl CardPool {
    pub fn new(poems: Vec<Poem>) -> Result<Self, KarutaError> {
        if poems.is_empty() {
            return Err(KarutaError::EmptyPool);
        }
        let mut seen = HashSet::with_capacity(poems.len());
        for poem in &poems {
            if !seen.insert(poem.id) {
                return Err(KarutaError::DuplicatePoemId(poem.id));
            }
        }
        Ok(Self { poems })
    }

    pub fn from_static(poems: &'static [Poem]) -> Result<Self, KarutaError> {
        Self::new(poems.to_vec())
    }

    pub fn poems(&self) -> &[Poem] {
        &self.poems
    }

    pub fn len(&self) -> usize {
        self.poems.len()
    }

    /// Always false for a constructed pool; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.poems.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_pool() {
        assert!(matches!(CardPool::new(Vec::new()), Err(KarutaError::EmptyPool)));
    }

    #[test]
    fn rejects_duplicate_ids() {
        let poems = vec![Poem::new(1, "a", "b"), Poem::new(2, "c", "d"), Poem::new(1, "e", "f")];
        assert!(matches!(CardPool::new(poems), Err(KarutaError::DuplicatePoemId(1))));
    }

    #[test]
    fn full_text_joins_halves_with_space() {
        let poem = Poem::new(7, "天の原", "ふりさけ見れば");
        assert_eq!(poem.full_text(), "天の原 ふりさけ見れば");
    }
}
