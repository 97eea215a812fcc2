// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

use crate::config::ConfigError;
use thiserror::Error;

/// Errors that abort a branch-and-bound run.
///
/// Both node variants report a broken `BranchNode` implementation; the
/// search cannot continue past such a node.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SchemeError {
    #[error(
        "node is not feasible but selected no branching variable ({unfixed} of {variable_count} variables unfixed)"
    )]
    NoBranchingVariable {
        unfixed: usize,
        variable_count: usize,
    },
    #[error("branching variable {variable} is out of range for {variable_count} variables")]
    VariableOutOfRange {
        variable: usize,
        variable_count: usize,
    },
    #[error("invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let e = SchemeError::NoBranchingVariable {
            unfixed: 3,
            variable_count: 8,
        };
        assert_eq!(
            e.to_string(),
            "node is not feasible but selected no branching variable (3 of 8 variables unfixed)"
        );

        let e = SchemeError::VariableOutOfRange {
            variable: 9,
            variable_count: 4,
        };
        assert_eq!(
            e.to_string(),
            "branching variable 9 is out of range for 4 variables"
        );
    }

    #[test]
    fn test_from_config_error() {
        let e: SchemeError = ConfigError::ZeroNodeLimit.into();
        assert_eq!(e, SchemeError::InvalidConfig(ConfigError::ZeroNodeLimit));
        assert_eq!(
            e.to_string(),
            "invalid configuration: node limit must be positive"
        );
    }
}
