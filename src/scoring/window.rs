use std::ops::Range;

/// The parts of a ranking to show: a top block and, when the requester sits
/// far enough below it, a block centred on the requester.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardWindow {
    pub top: Range<usize>,
    /// Empty when the requester is absent or already covered by `top`.
    pub context: Range<usize>,
    total: usize,
}

impl LeaderboardWindow {
    pub fn has_context(&self) -> bool {
        !self.context.is_empty()
    }

    /// Whether ranks are left out between the top block and what follows it.
    pub fn gap_after_top(&self) -> bool {
        if self.has_context() {
            self.context.start > self.top.end
        } else {
            self.top.end < self.total
        }
    }

    pub fn gap_after_context(&self) -> bool {
        self.has_context() && self.context.end < self.total
    }

    pub fn top_slice<'a, T>(&self, ranked: &'a [T]) -> &'a [T] {
        &ranked[self.top.start.min(ranked.len())..self.top.end.min(ranked.len())]
    }

    pub fn context_slice<'a, T>(&self, ranked: &'a [T]) -> &'a [T] {
        &ranked[self.context.start.min(ranked.len())..self.context.end.min(ranked.len())]
    }
}

/// Pick the ranks of a `total`-long ranking to show to a requester at `rank`.
///
/// When the requester's block would start at or before one past the end of
/// the top block (`rank - radius <= top_n + 1`), the top block is extended
/// through `rank + radius` instead of showing two blocks.
pub fn select_window(
    total: usize,
    rank: Option<usize>,
    top_n: usize,
    radius: usize,
) -> LeaderboardWindow {
    let head = top_n.min(total);
    let empty = head..head;

    let Some(rank) = rank.filter(|r| *r < total) else {
        return LeaderboardWindow {
            top: 0..head,
            context: empty,
            total,
        };
    };

    if rank.saturating_sub(radius) <= top_n + 1 {
        let end = top_n.max(rank + radius + 1).min(total);
        LeaderboardWindow {
            top: 0..end,
            context: end..end,
            total,
        }
    } else {
        LeaderboardWindow {
            top: 0..head,
            context: rank - radius..(rank + radius + 1).min(total),
            total,
        }
    }
}
