//! Fill Parameters
//!
//! # Example
//!
//!     use scanc::{FillParams, FillRule, Variant};
//!
//!     let mut params = FillParams::new();
//!     params.rule(FillRule::EvenOdd)
//!         .variant(Variant::CentreTrapezoids)
//!         .table_limit(64 * 1024);
//!
//!     assert_eq!(params.fill_rule(), FillRule::EvenOdd);
//!

use crate::device::LogicalOp;
use crate::fixed::Fixed;
use crate::fixed::FIXED_1;
use crate::variant::Variant;

/// Default ceiling on the size of one band's edge table, 1 MiB
pub const DEFAULT_TABLE_LIMIT: usize = 1024 * 1024;

/// Winding Rule
#[derive(Debug,Copy,Clone,PartialEq)]
pub enum FillRule {
    /// Inside where the winding number is non-zero
    NonZero,
    /// Inside where the number of crossings is odd
    EvenOdd,
}
impl Default for FillRule {
    fn default() -> FillRule {
        FillRule::NonZero
    }
}

/// Parameters of one fill
#[derive(Debug,Copy,Clone,PartialEq)]
pub struct FillParams {
    /// Winding rule, NonZero
    rule: FillRule,
    /// Curve flatness in fixed units, 1 pixel
    flatness: Fixed,
    /// Scan converter, AnyPartSpans
    variant: Variant,
    /// Raster operation passed to the device, none
    lop: Option<LogicalOp>,
    /// Largest edge table in bytes, 1 MiB
    table_limit: usize,
}

impl Default for FillParams {
    fn default() -> Self {
        Self {
            rule: FillRule::default(),
            flatness: FIXED_1,
            variant: Variant::AnyPartSpans,
            lop: None,
            table_limit: DEFAULT_TABLE_LIMIT,
        }
    }
}

impl FillParams {
    /// Create parameters with default values
    pub fn new() -> Self {
        Self::default()
    }
    /// Set the winding rule
    pub fn rule(&mut self, rule: FillRule) -> &mut Self {
        self.rule = rule;
        self
    }
    /// Set curve flatness, in fixed units
    ///
    /// Non-positive values are treated as the smallest flatness
    pub fn flatness(&mut self, flatness: Fixed) -> &mut Self {
        self.flatness = flatness.max(1);
        self
    }
    /// Set the scan converter
    pub fn variant(&mut self, variant: Variant) -> &mut Self {
        self.variant = variant;
        self
    }
    /// Set the raster operation handed to the device
    pub fn lop(&mut self, lop: LogicalOp) -> &mut Self {
        self.lop = Some(lop);
        self
    }
    /// Set the edge table ceiling in bytes
    pub fn table_limit(&mut self, limit: usize) -> &mut Self {
        self.table_limit = limit.max(1);
        self
    }
    pub fn fill_rule(&self) -> FillRule {
        self.rule
    }
    pub fn curve_flatness(&self) -> Fixed {
        self.flatness
    }
    pub fn scan_variant(&self) -> Variant {
        self.variant
    }
    pub fn logical_op(&self) -> Option<LogicalOp> {
        self.lop
    }
    pub fn max_table_bytes(&self) -> usize {
        self.table_limit
    }
}
