//! Outbound batching.

use crate::error::{SyncError, SyncResult};

/// Splits `items` into consecutive batches of at most `batch_size`.
///
/// Batches borrow from `items` and keep its order; concatenating them
/// yields `items` again. Every batch but the last is full, and an empty
/// input produces no batches.
///
/// # Errors
///
/// Returns [`SyncError::InvalidInput`] if `batch_size` is zero.
pub fn partition<T>(items: &[T], batch_size: usize) -> SyncResult<Vec<&[T]>> {
    if batch_size == 0 {
        return Err(SyncError::invalid_input("batch size must be at least 1"));
    }
    Ok(items.chunks(batch_size).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn twenty_three_in_tens() {
        let items: Vec<u32> = (0..23).collect();
        let batches = partition(&items, 10).unwrap();

        let sizes: Vec<_> = batches.iter().map(|b| b.len()).collect();
        assert_eq!(sizes, vec![10, 10, 3]);
        assert_eq!(batches[2], &[20, 21, 22]);
    }

    #[test]
    fn evenly_divisible_last_batch_is_full() {
        let items: Vec<u32> = (0..20).collect();
        let batches = partition(&items, 10).unwrap();
        assert_eq!(batches.len(), 2);
        assert_eq!(batches[1].len(), 10);
    }

    #[test]
    fn empty_input_has_no_batches() {
        let items: Vec<u32> = Vec::new();
        assert!(partition(&items, 10).unwrap().is_empty());
    }

    #[test]
    fn zero_batch_size_rejected() {
        let items = [1, 2, 3];
        assert!(matches!(
            partition(&items, 0),
            Err(SyncError::InvalidInput(_))
        ));
    }

    #[test]
    fn batches_borrow_the_source() {
        let items = vec![String::from("a"), String::from("b")];
        let batches = partition(&items, 1).unwrap();
        assert!(std::ptr::eq(&batches[1][0], &items[1]));
    }

    proptest! {
        #[test]
        fn concatenation_reconstructs_input(
            items in proptest::collection::vec(any::<u16>(), 0..200),
            batch_size in 1usize..25,
        ) {
            let batches = partition(&items, batch_size).unwrap();

            let rebuilt: Vec<u16> = batches.iter().flat_map(|b| b.iter().copied()).collect();
            prop_assert_eq!(&rebuilt, &items);

            prop_assert!(batches.iter().all(|b| !b.is_empty()));
            if let Some((last, full)) = batches.split_last() {
                prop_assert!(full.iter().all(|b| b.len() == batch_size));
                let remainder = items.len() % batch_size;
                let expected_last = if remainder == 0 { batch_size } else { remainder };
                prop_assert_eq!(last.len(), expected_last);
            } else {
                prop_assert!(items.is_empty());
            }
        }
    }
}
