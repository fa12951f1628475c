//! Built-in check catalogue, one module per category family.

mod bsi;
mod ntia;
mod quality;
mod scvs;
mod semantic;
mod sharing;
mod structural;

use super::check::Check;

/// Every built-in check in registry order
pub(crate) fn all() -> Vec<Check> {
    let mut checks = structural::checks();
    checks.extend(ntia::checks());
    checks.extend(semantic::checks());
    checks.extend(quality::checks());
    checks.extend(sharing::checks());
    checks.extend(bsi::v1_checks());
    checks.extend(bsi::v2_checks());
    checks.extend(scvs::checks());
    checks
}
