//! Arrangement of labels onto fixed-capacity sheets.

use std::iter;

use lss_model::Page;

/// Lay out `blanks` empty slots followed by every label, in pages of `per_page`.
///
/// The last page is padded with empty slots. At least one page is always
/// returned, so an empty input yields a single all-blank sheet. A capacity of
/// zero is treated as one.
pub fn paginate<T>(labels: impl IntoIterator<Item = T>, per_page: usize, blanks: usize) -> Vec<Page<T>> {
    let per_page = per_page.max(1);
    let slots = iter::repeat_with(|| None)
        .take(blanks)
        .chain(labels.into_iter().map(Some));

    let mut pages = Vec::new();
    let mut current = Vec::with_capacity(per_page);
    for slot in slots {
        if current.len() == per_page {
            pages.push(Page {
                slots: std::mem::replace(&mut current, Vec::with_capacity(per_page)),
            });
        }
        current.push(slot);
    }
    current.resize_with(per_page, || None);
    pages.push(Page { slots: current });
    pages
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_is_one_blank_page() {
        let pages = paginate(Vec::<u32>::new(), 4, 0);
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].slots, vec![None, None, None, None]);
    }

    #[test]
    fn test_blanks_lead_and_last_page_padded() {
        let pages = paginate(vec![1, 2, 3], 2, 1);
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].slots, vec![None, Some(1)]);
        assert_eq!(pages[1].slots, vec![Some(2), Some(3)]);
    }

    #[test]
    fn test_exact_fill_has_no_trailing_page() {
        let pages = paginate(vec![1, 2, 3, 4], 2, 0);
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[1].blank_count(), 0);
    }

    #[test]
    fn test_blanks_only() {
        let pages = paginate(Vec::<u32>::new(), 3, 4);
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[1].blank_count(), 3);
    }
}
