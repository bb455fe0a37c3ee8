use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::Serialize;

use super::model::Table;

/// Seed shared by both shuffles so a table always splits the same way.
pub const SPLIT_SEED: u64 = 42;

/// Share of all rows held out for testing.
pub const TEST_FRACTION: f64 = 0.2;

/// Share of the remaining rows held out for validation (0.125 × 0.8 = 0.1 overall).
pub const VALIDATION_FRACTION: f64 = 0.125;

/// The full table or one of its partitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PartitionKind {
    #[serde(rename = "df")]
    Full,
    #[serde(rename = "train")]
    Train,
    #[serde(rename = "test")]
    Test,
    #[serde(rename = "val")]
    Validation,
}

impl PartitionKind {
    /// Order in which charts are produced.
    pub const ALL: [PartitionKind; 4] = [
        PartitionKind::Full,
        PartitionKind::Train,
        PartitionKind::Test,
        PartitionKind::Validation,
    ];

    /// Short name used in file names.
    pub fn slug(self) -> &'static str {
        match self {
            PartitionKind::Full => "df",
            PartitionKind::Train => "train",
            PartitionKind::Test => "test",
            PartitionKind::Validation => "val",
        }
    }

    /// Upper-case name used in chart captions.
    pub fn caption_name(self) -> &'static str {
        match self {
            PartitionKind::Full => "DF",
            PartitionKind::Train => "TRAIN",
            PartitionKind::Test => "TEST",
            PartitionKind::Validation => "VAL",
        }
    }
}

/// One side of a split: the rows it holds and their positions in the source table.
#[derive(Debug, Clone)]
pub struct Partition {
    pub indices: Vec<usize>,
    pub table: Table,
}

impl Partition {
    fn from_indices(source: &Table, indices: Vec<usize>) -> Self {
        let table = source.take(&indices);
        Partition { indices, table }
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// Train / validation / test partitions of one table.
#[derive(Debug, Clone)]
pub struct PartitionSet {
    pub train: Partition,
    pub validation: Partition,
    pub test: Partition,
}

impl PartitionSet {
    /// The table behind `kind`; `Full` is answered with `full`.
    pub fn table<'a>(&'a self, kind: PartitionKind, full: &'a Table) -> &'a Table {
        match kind {
            PartitionKind::Full => full,
            PartitionKind::Train => &self.train.table,
            PartitionKind::Test => &self.test.table,
            PartitionKind::Validation => &self.validation.table,
        }
    }
}

/// Shuffle `indices` with a fresh RNG seeded by `seed`, then split off the
/// first `held_out(len)` of them. Returns `(held_out, rest)`.
fn shuffle_split(
    mut indices: Vec<usize>,
    held_out: impl Fn(usize) -> usize,
    seed: u64,
) -> (Vec<usize>, Vec<usize>) {
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let total = indices.len();
    let split_at = held_out(total).min(total);

    let rest = indices.split_off(split_at);
    (indices, rest)
}

/// Test rows for `n` rows in total: `round(n × 0.2)`.
pub fn test_size(n: usize) -> usize {
    ((n as f64) * TEST_FRACTION).round() as usize
}

/// Validation rows taken from a working set of `n` rows: `ceil(n × 0.125)`,
/// so small tables still get at least one validation row.
pub fn validation_size(n: usize) -> usize {
    ((n as f64) * VALIDATION_FRACTION).ceil() as usize
}

/// Split `table` into roughly 70% train, 10% validation and 20% test.
///
/// Step one shuffles all rows and holds out the test rows; step two shuffles
/// what is left, with an identically seeded RNG, and holds out the validation
/// rows. Every row lands in exactly one partition.
pub fn split_table(table: &Table, seed: u64) -> PartitionSet {
    let all: Vec<usize> = (0..table.len()).collect();

    let (test, working) = shuffle_split(all, test_size, seed);
    let (validation, train) = shuffle_split(working, validation_size, seed);

    log::debug!(
        "Dataset split: {} train, {} validation, {} test",
        train.len(),
        validation.len(),
        test.len(),
    );

    PartitionSet {
        train: Partition::from_indices(table, train),
        validation: Partition::from_indices(table, validation),
        test: Partition::from_indices(table, test),
    }
}
