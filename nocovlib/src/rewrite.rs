//! Rewriting hit counts of protected blocks.

use crate::interval::Interval;
use crate::profile::Block;

/// Default override: drop matching blocks from the report.
pub const DEFAULT_COVER_COUNT: i64 = -1;

/// Give every unexecuted block inside one of `enclosures` the count
/// `cover_count`.
///
/// Blocks that ran at least once keep their count: a marker only excuses code
/// the tests never reached. Enclosures are applied in order, so when they
/// overlap the last one to claim a still-zero block decides its count.
///
/// Returns the number of rewrites performed.
pub fn rewrite_blocks(blocks: &mut [Block], enclosures: &[Interval], cover_count: i64) -> usize {
    let mut rewritten = 0;
    for enclosure in enclosures {
        for block in blocks.iter_mut() {
            if block.count == 0 && enclosure.contains(&block.interval()) {
                block.count = cover_count;
                rewritten += 1;
            }
        }
    }
    rewritten
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blocks() -> Vec<Block> {
        vec![
            Block::new(3, 19, 5, 2).with_counts(2, 1),
            Block::new(5, 11, 8, 3).with_counts(1, 0),
            Block::new(9, 2, 9, 10).with_counts(1, 0),
        ]
    }

    #[test]
    fn test_rewrites_contained_zero_blocks() {
        let mut blocks = blocks();

        let enclosure = Interval::new(5, 11, 8, 3);
        let n = rewrite_blocks(&mut blocks, &[enclosure], DEFAULT_COVER_COUNT);

        assert_eq!(n, 1);
        assert_eq!(blocks[1].count, -1);
        assert_eq!(blocks[2].count, 0);
    }

    #[test]
    fn test_executed_blocks_untouched() {
        let mut blocks = blocks();

        rewrite_blocks(&mut blocks, &[Interval::new(1, 1, 20, 1)], 5);

        assert_eq!(blocks[0].count, 1);
        assert_eq!(blocks[1].count, 5);
        assert_eq!(blocks[2].count, 5);
    }

    #[test]
    fn test_partially_overlapping_block_untouched() {
        let mut blocks = blocks();

        // Starts one column after block 2.
        rewrite_blocks(&mut blocks, &[Interval::new(5, 12, 9, 1)], 5);

        assert_eq!(blocks[1].count, 0);
    }

    #[test]
    fn test_statement_count_preserved() {
        let mut blocks = blocks();

        rewrite_blocks(&mut blocks, &[Interval::new(5, 11, 8, 3)], 7);

        assert_eq!(blocks[1].num_stmt, 1);
    }

    #[test]
    fn test_overlapping_enclosures_are_idempotent() {
        let mut blocks = blocks();
        let outer = Interval::new(3, 1, 10, 1);
        let inner = Interval::new(5, 11, 8, 3);

        let n = rewrite_blocks(&mut blocks, &[outer, inner], 5);

        // The inner enclosure finds nothing left at zero.
        assert_eq!(n, 2);
        assert_eq!(blocks[1].count, 5);
    }

    #[test]
    fn test_zero_override_rewrites_on_every_claim() {
        // A zero override leaves blocks eligible, so every enclosure that
        // claims a block rewrites it again.
        let mut blocks = blocks();
        let outer = Interval::new(3, 1, 10, 1);
        let inner = Interval::new(5, 11, 8, 3);

        let n = rewrite_blocks(&mut blocks, &[outer, inner], 0);

        assert_eq!(n, 3);
        assert_eq!(blocks[1].count, 0);
    }

    #[test]
    fn test_no_enclosures() {
        let mut blocks = blocks();
        assert_eq!(rewrite_blocks(&mut blocks, &[], -1), 0);
        assert_eq!(blocks, self::blocks());
    }
}
