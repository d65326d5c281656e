//! Normalized callable signatures, used for diagnostics only.

use crate::registry::CallableDescriptor;
use indexmap::IndexMap;
use std::collections::BTreeMap;

/// Occurrences of each normalized signature, in first-seen order.
pub type SignatureStats = IndexMap<String, usize>;

/// `#` when static, the return type, `!`, then the sorted multiset of
/// parameter type names as `Type:count` joined by commas.
///
/// `fn(i32, String, i32) -> ()` on an instance gives `()!String:1,i32:2`.
pub fn signature_of(callable: &CallableDescriptor) -> String {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for parameter in &callable.parameters {
        *counts.entry(parameter.parameter_type.name()).or_insert(0) += 1;
    }
    let parameters = counts
        .iter()
        .map(|(name, count)| format!("{}:{}", name, count))
        .collect::<Vec<_>>()
        .join(",");

    format!(
        "{}{}!{}",
        if callable.is_static { "#" } else { "" },
        callable.return_type,
        parameters
    )
}

pub(crate) fn tally(stats: &mut SignatureStats, signature: &str) {
    *stats.entry(signature.to_string()).or_insert(0) += 1;
}
