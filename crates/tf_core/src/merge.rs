//! Combining fetched article lists into what the page displays.

use serde::Serialize;
use crate::types::Article;

pub const DEFAULT_BLOCK_SIZE: usize = 4;

/// Picks the article for the large slot: the first one with an image, or
/// failing that the first one at all.
pub fn select_lead(articles: &[Article]) -> Option<&Article> {
    articles
        .iter()
        .find(|a| a.has_image())
        .or_else(|| articles.first())
}

/// Splits a section into its lead and the remaining "more news" list.
pub fn split_lead(articles: &[Article]) -> (Option<&Article>, Vec<&Article>) {
    let lead_index = articles
        .iter()
        .position(|a| a.has_image())
        .or(if articles.is_empty() { None } else { Some(0) });

    match lead_index {
        Some(i) => {
            let rest = articles
                .iter()
                .enumerate()
                .filter(|(j, _)| *j != i)
                .map(|(_, a)| a)
                .collect();
            (Some(&articles[i]), rest)
        }
        None => (None, Vec::new()),
    }
}

/// Alternates blocks of `block_size` items from `a` and `b` until both are
/// exhausted or `limit` items have been emitted. A shorter list simply
/// contributes fewer items per round.
pub fn interleave<T: Clone>(a: &[T], b: &[T], block_size: usize, limit: usize) -> Vec<T> {
    let block = block_size.max(1);
    let mut out = Vec::with_capacity(limit.min(a.len() + b.len()));
    let (mut ia, mut ib) = (0, 0);

    while out.len() < limit && (ia < a.len() || ib < b.len()) {
        for source in [(a, &mut ia), (b, &mut ib)] {
            let (items, cursor) = source;
            let take = block.min(items.len() - *cursor).min(limit - out.len());
            out.extend_from_slice(&items[*cursor..*cursor + take]);
            *cursor += take;
        }
    }

    out
}

/// The mixed "Latest News" grid.
#[derive(Debug, Clone, Serialize)]
pub struct LatestNews {
    pub articles: Vec<Article>,
    /// More articles were fetched than are shown.
    pub has_more: bool,
}

impl LatestNews {
    pub fn build(crypto: &[Article], tech: &[Article], block_size: usize, visible: usize) -> Self {
        let articles = interleave(crypto, tech, block_size, visible);
        let has_more = crypto.len() + tech.len() > articles.len();
        Self { articles, has_more }
    }
}
