/// Page count up to which every page is rendered without ellipses.
pub const FULL_RUN_LIMIT: u32 = 7;

/// Number of interior page numbers shown around the current page.
pub const INTERIOR_WINDOW: u32 = 5;

/// One rendering unit of the pagination control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageToken {
    /// A selectable page number.
    Page(u32),
    /// A gap marker. `key` is the midpoint of the skipped range and exists
    /// only to give the token a stable identity; it is never navigated to.
    Ellipsis { key: u32 },
}

impl PageToken {
    pub fn key(&self) -> u32 {
        match self {
            PageToken::Page(page) => *page,
            PageToken::Ellipsis { key } => *key,
        }
    }

    pub fn page(&self) -> Option<u32> {
        match self {
            PageToken::Page(page) => Some(*page),
            PageToken::Ellipsis { .. } => None,
        }
    }

    pub fn is_navigable(&self) -> bool {
        matches!(self, PageToken::Page(_))
    }

    pub fn label(&self) -> String {
        match self {
            PageToken::Page(page) => page.to_string(),
            PageToken::Ellipsis { .. } => "...".to_string(),
        }
    }
}

/// Maps `(current_page, total_pages)` to the tokens of the pagination control.
///
/// Small page counts are rendered in full. Larger ones always show the first
/// and last page plus a window of [`INTERIOR_WINDOW`] pages around the current
/// one, slid back inside `[2, total_pages - 1]` when it would overflow.
pub fn compute_window(current_page: u32, total_pages: u32) -> Vec<PageToken> {
    if total_pages <= FULL_RUN_LIMIT {
        return (1..=total_pages).map(PageToken::Page).collect();
    }

    // The result set can shrink under a held page number.
    let current_page = current_page.clamp(1, total_pages);
    let last_interior = total_pages - 1;
    let mut start = current_page.saturating_sub(INTERIOR_WINDOW / 2).max(2);
    let end = (start + INTERIOR_WINDOW - 1).min(last_interior);
    if end - start < INTERIOR_WINDOW - 1 {
        start = end.saturating_sub(INTERIOR_WINDOW - 1).max(2);
    }

    let mut tokens = Vec::with_capacity(INTERIOR_WINDOW as usize + 4);
    tokens.push(PageToken::Page(1));
    if start > 2 {
        tokens.push(PageToken::Ellipsis {
            key: (1 + start) / 2,
        });
    }
    tokens.extend((start..=end).map(PageToken::Page));
    if end < last_interior {
        tokens.push(PageToken::Ellipsis {
            key: (end + total_pages) / 2,
        });
    }
    tokens.push(PageToken::Page(total_pages));
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pages(tokens: &[PageToken]) -> Vec<Option<u32>> {
        tokens.iter().map(PageToken::page).collect()
    }

    #[test]
    fn zero_pages_renders_nothing() {
        assert!(compute_window(0, 0).is_empty());
    }

    #[test]
    fn small_totals_render_every_page() {
        for total in 1..=FULL_RUN_LIMIT {
            for current in 1..=total {
                let tokens = compute_window(current, total);
                let expected: Vec<PageToken> = (1..=total).map(PageToken::Page).collect();
                assert_eq!(tokens, expected);
            }
        }
    }

    #[test]
    fn first_page_of_many_has_trailing_gap_only() {
        let tokens = compute_window(1, 20);
        assert_eq!(
            pages(&tokens),
            vec![Some(1), Some(2), Some(3), Some(4), Some(5), Some(6), None, Some(20)]
        );
        assert_eq!(tokens[6], PageToken::Ellipsis { key: 13 });
    }

    #[test]
    fn middle_page_has_gaps_on_both_sides() {
        let tokens = compute_window(10, 20);
        assert_eq!(
            pages(&tokens),
            vec![
                Some(1),
                None,
                Some(8),
                Some(9),
                Some(10),
                Some(11),
                Some(12),
                None,
                Some(20)
            ]
        );
        assert_eq!(tokens[1], PageToken::Ellipsis { key: 4 });
        assert_eq!(tokens[7], PageToken::Ellipsis { key: 16 });
    }

    #[test]
    fn window_slides_left_at_the_end() {
        let tokens = compute_window(20, 20);
        assert_eq!(
            pages(&tokens),
            vec![Some(1), None, Some(15), Some(16), Some(17), Some(18), Some(19), Some(20)]
        );
    }

    #[test]
    fn eight_pages_near_the_end_keeps_five_interior() {
        let tokens = compute_window(7, 8);
        assert_eq!(
            pages(&tokens),
            vec![Some(1), None, Some(3), Some(4), Some(5), Some(6), Some(7), Some(8)]
        );
        assert_eq!(tokens[1], PageToken::Ellipsis { key: 2 });
    }

    #[test]
    fn large_totals_are_bounded_and_strictly_increasing() {
        for total in (FULL_RUN_LIMIT + 1)..=40 {
            for current in 1..=total {
                let tokens = compute_window(current, total);
                assert_eq!(tokens.first(), Some(&PageToken::Page(1)));
                assert_eq!(tokens.last(), Some(&PageToken::Page(total)));

                let ellipses = tokens.iter().filter(|t| !t.is_navigable()).count();
                assert!(ellipses <= 2, "total={total} current={current}");

                let numbers: Vec<u32> = tokens.iter().filter_map(PageToken::page).collect();
                assert!(numbers.iter().all(|p| (1..=total).contains(p)));
                assert!(numbers.windows(2).all(|w| w[0] < w[1]));
                assert!(numbers.contains(&current));
            }
        }
    }

    #[test]
    fn current_page_past_the_end_is_clamped() {
        assert_eq!(compute_window(50, 20), compute_window(20, 20));
        assert_eq!(compute_window(0, 20), compute_window(1, 20));
    }

    #[test]
    fn ellipsis_keys_never_collide_with_rendered_pages() {
        for total in (FULL_RUN_LIMIT + 1)..=30 {
            for current in 1..=total {
                let tokens = compute_window(current, total);
                let numbers: Vec<u32> = tokens.iter().filter_map(PageToken::page).collect();
                for token in tokens.iter().filter(|t| !t.is_navigable()) {
                    assert!(!numbers.contains(&token.key()));
                }
            }
        }
    }
}
