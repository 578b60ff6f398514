//! Benchmark record data models
//!
//! Contains the parsed form of one benchmark output line and the
//! per-input grouping of records by benchmark name.

use std::collections::HashMap;
use std::fmt;
use std::ops::{BitOr, BitOrAssign};

/// Set of optional measurements present on a record
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Measured(u8);

impl Measured {
    pub const NONE: Measured = Measured(0);
    pub const NS_PER_OP: Measured = Measured(1 << 0);
    pub const MB_PER_S: Measured = Measured(1 << 1);
    pub const ALLOCED_BYTES_PER_OP: Measured = Measured(1 << 2);
    pub const ALLOCS_PER_OP: Measured = Measured(1 << 3);

    /// Raw bit representation
    pub fn bits(self) -> u8 {
        self.0
    }

    /// Check whether every flag in `other` is set
    pub fn contains(self, other: Measured) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn insert(&mut self, other: Measured) {
        self.0 |= other.0;
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for Measured {
    type Output = Measured;

    fn bitor(self, rhs: Measured) -> Measured {
        Measured(self.0 | rhs.0)
    }
}

impl BitOrAssign for Measured {
    fn bitor_assign(&mut self, rhs: Measured) {
        self.insert(rhs);
    }
}

/// One measured run of a named benchmark
#[derive(Debug, Clone, PartialEq)]
pub struct BenchmarkRecord {
    /// Benchmark name including any `-N` GOMAXPROCS suffix
    pub name: String,
    /// Number of iterations the runner executed
    pub n: i64,
    /// Nanoseconds per operation
    pub ns_per_op: f64,
    /// Throughput in megabytes per second
    pub mb_per_s: f64,
    /// Bytes allocated per operation
    pub alloced_bytes_per_op: u64,
    /// Allocations per operation
    pub allocs_per_op: u64,
    /// Which of the optional values above were present in the text
    pub measured: Measured,
    /// Position of the line among all records of its input
    pub ord: usize,
}

impl BenchmarkRecord {
    /// Create a record with only the iteration count set
    pub fn new(name: impl Into<String>, n: i64) -> Self {
        Self {
            name: name.into(),
            n,
            ns_per_op: 0.0,
            mb_per_s: 0.0,
            alloced_bytes_per_op: 0,
            allocs_per_op: 0,
            measured: Measured::NONE,
            ord: 0,
        }
    }

    pub fn with_ns_per_op(mut self, value: f64) -> Self {
        self.ns_per_op = value;
        self.measured |= Measured::NS_PER_OP;
        self
    }

    pub fn with_mb_per_s(mut self, value: f64) -> Self {
        self.mb_per_s = value;
        self.measured |= Measured::MB_PER_S;
        self
    }

    pub fn with_alloced_bytes_per_op(mut self, value: u64) -> Self {
        self.alloced_bytes_per_op = value;
        self.measured |= Measured::ALLOCED_BYTES_PER_OP;
        self
    }

    pub fn with_allocs_per_op(mut self, value: u64) -> Self {
        self.allocs_per_op = value;
        self.measured |= Measured::ALLOCS_PER_OP;
        self
    }

    pub fn with_ord(mut self, ord: usize) -> Self {
        self.ord = ord;
        self
    }
}

impl fmt::Display for BenchmarkRecord {
    /// Formats the record the way the benchmark runner prints it
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.n)?;
        if self.measured.contains(Measured::NS_PER_OP) {
            write!(f, " {:.2} ns/op", self.ns_per_op)?;
        }
        if self.measured.contains(Measured::MB_PER_S) {
            write!(f, " {:.2} MB/s", self.mb_per_s)?;
        }
        if self.measured.contains(Measured::ALLOCED_BYTES_PER_OP) {
            write!(f, " {} B/op", self.alloced_bytes_per_op)?;
        }
        if self.measured.contains(Measured::ALLOCS_PER_OP) {
            write!(f, " {} allocs/op", self.allocs_per_op)?;
        }
        Ok(())
    }
}

/// All records of one input, grouped by benchmark name in line order
pub type BenchmarkSet = HashMap<String, Vec<BenchmarkRecord>>;

/// Total number of records across every name in a set
pub fn record_count(set: &BenchmarkSet) -> usize {
    set.values().map(Vec::len).sum()
}
