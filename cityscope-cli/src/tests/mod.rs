//! Shared test harness modules for the CityScope CLI.

use super::*;

mod helpers;
mod unit;
