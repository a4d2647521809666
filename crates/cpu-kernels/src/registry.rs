// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Ordered micro-kernel tables.
//!
//! A table lists implementations from most to least specialised. Selection
//! walks it once and returns the first entry whose predicate accepts the
//! selector, so an SVE entry placed before a NEON entry wins whenever both
//! match.

/// One entry of a micro-kernel table.
#[derive(Clone, Copy)]
pub struct MicroKernel<S, F> {
    pub name: &'static str,
    pub is_selected: fn(&S) -> bool,
    pub ukernel: F,
}

impl<S, F> std::fmt::Debug for MicroKernel<S, F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MicroKernel").field("name", &self.name).finish_non_exhaustive()
    }
}

/// Returns the first entry of `table` whose predicate accepts `selector`.
pub fn get_implementation<'t, S, F>(
    table: &'t [MicroKernel<S, F>],
    selector: &S,
) -> Option<&'t MicroKernel<S, F>> {
    table.iter().find(|uk| (uk.is_selected)(selector))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Sel {
        wide: bool,
        dtype: u8,
    }

    const TABLE: [MicroKernel<Sel, u32>; 3] = [
        MicroKernel {
            name: "wide_a",
            is_selected: |s: &Sel| s.wide && s.dtype == 0,
            ukernel: 1,
        },
        MicroKernel {
            name: "narrow_a",
            is_selected: |s: &Sel| s.dtype == 0,
            ukernel: 2,
        },
        MicroKernel {
            name: "narrow_b",
            is_selected: |s: &Sel| s.dtype == 1,
            ukernel: 3,
        },
    ];

    #[test]
    fn test_first_match_wins() {
        let uk = get_implementation(&TABLE, &Sel { wide: true, dtype: 0 }).unwrap();
        assert_eq!(uk.name, "wide_a");
        let uk = get_implementation(&TABLE, &Sel { wide: false, dtype: 0 }).unwrap();
        assert_eq!(uk.ukernel, 2);
    }

    #[test]
    fn test_no_match() {
        assert!(get_implementation(&TABLE, &Sel { wide: true, dtype: 9 }).is_none());
    }
}
