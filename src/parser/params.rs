// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! VT100-compliant extraction helpers for [`vte::Params`].
//!
//! Parameter defaults differ by operation class: counts and positions treat
//! both a missing and a zero parameter as 1; selector parameters (ED/EL/TBC
//! types, DSR requests) default to 0 and keep explicit zeros.

use smallvec::SmallVec;
use vte::Params;

pub trait ParamsExt {
    /// The nth parameter with count semantics: missing or 0 becomes 1.
    fn nth_non_zero(&self, n: usize) -> u16;

    /// The nth parameter as sent, `None` when absent.
    fn nth_opt(&self, n: usize) -> Option<u16>;

    /// All parameters in order, subparameters (colon-separated) flattened
    /// in place. SGR extended-color handling works on this flat view, which
    /// makes `38;5;196` and `38:5:196` equivalent.
    fn flatten(&self) -> SmallVec<[u16; 16]>;
}

impl ParamsExt for Params {
    fn nth_non_zero(&self, n: usize) -> u16 {
        self.nth_opt(n).map_or(1, |value| value.max(1))
    }

    fn nth_opt(&self, n: usize) -> Option<u16> {
        self.iter().nth(n).and_then(|group| group.first()).copied()
    }

    fn flatten(&self) -> SmallVec<[u16; 16]> {
        self.iter().flat_map(|group| group.iter().copied()).collect()
    }
}

#[cfg(test)]
mod tests {
    use vte::{Parser, Perform};

    use super::*;

    /// Run a CSI sequence through vte and hand the parsed params to `check`.
    fn with_params(sequence: &str, check: impl FnOnce(&Params)) {
        struct Catcher<F>(Option<F>);

        impl<F: FnOnce(&Params)> Perform for Catcher<F> {
            fn csi_dispatch(
                &mut self,
                params: &Params,
                _intermediates: &[u8],
                _ignore: bool,
                _c: char,
            ) {
                if let Some(check) = self.0.take() {
                    check(params);
                }
            }
        }

        let mut parser = Parser::new();
        let mut catcher = Catcher(Some(check));
        parser.advance(&mut catcher, sequence.as_bytes());
    }

    #[test]
    fn missing_and_zero_count_params_default_to_one() {
        with_params("\x1b[A", |params| {
            assert_eq!(params.nth_non_zero(0), 1);
        });
        with_params("\x1b[0A", |params| {
            assert_eq!(params.nth_non_zero(0), 1);
        });
        with_params("\x1b[7A", |params| {
            assert_eq!(params.nth_non_zero(0), 7);
        });
    }

    #[test]
    fn optional_params_keep_zero_and_absence_apart() {
        with_params("\x1b[0J", |params| {
            assert_eq!(params.nth_opt(0), Some(0));
        });
        with_params("\x1b[J", |params| {
            // vte reports an implicit single zero param for a bare final.
            assert_eq!(params.nth_opt(0).unwrap_or(0), 0);
            assert_eq!(params.nth_opt(5), None);
        });
    }

    #[test]
    fn colon_subparameters_flatten_like_semicolons() {
        with_params("\x1b[38:5:196m", |params| {
            assert_eq!(params.flatten().as_slice(), &[38, 5, 196]);
        });
        with_params("\x1b[38;5;196m", |params| {
            assert_eq!(params.flatten().as_slice(), &[38, 5, 196]);
        });
    }
}
