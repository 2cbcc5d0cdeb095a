/// Nominal byte range `[start, end)` assigned to one worker.
///
/// The range is nominal: the scanner moves `start` forward to the next record
/// boundary (unless it is zero) and finishes the record that straddles `end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Partition {
    pub index: usize,
    pub start: u64,
    pub end: u64,
}

impl Partition {
    pub fn new(index: usize, start: u64, end: u64) -> Self {
        Self { index, start, end }
    }

    pub fn len(&self) -> u64 {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Split `file_size` bytes into `count` contiguous nominal ranges.
    ///
    /// Returns no partitions for an empty file. The last range always ends at
    /// `file_size` and every range is non-empty.
    pub fn plan(file_size: u64, count: usize) -> Vec<Partition> {
        if file_size == 0 {
            return Vec::new();
        }

        let count = (count.max(1) as u64).min(file_size);
        let boundary = |i: u64| (u128::from(file_size) * u128::from(i) / u128::from(count)) as u64;

        (0..count)
            .map(|i| Partition::new(i as usize, boundary(i), boundary(i + 1)))
            .collect()
    }
}
