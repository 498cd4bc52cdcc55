//! Estimate calculation modules.
//!
//! This module provides the GST arithmetic behind the estimate totals and the
//! shared rounding and input-parsing helpers.

pub mod common;
pub mod gst;

pub use gst::{GST_INCLUSIVE_DIVISOR, GST_RATE, GstCalculator, GstSplit, LineTotals, Totals};
