//! Perft suite files.
//!
//! A suite is a TOML file listing positions and their expected node counts
//! by depth:
//!
//! ```toml
//! [[positions]]
//! name = "startpos"
//! fen = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"
//! counts = [20, 400, 8902]
//! ```

use chess_core::Fen;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Errors from loading a suite file.
#[derive(Error, Debug)]
pub enum SuiteError {
    #[error("Failed to read suite file: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("Failed to parse suite: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Suite entry '{0}' has no expected counts")]
    NoCounts(String),
}

/// One position and its node counts for depths 1, 2, ...
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct SuiteEntry {
    pub name: String,
    pub fen: String,
    pub counts: Vec<u64>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct Suite {
    #[serde(default)]
    pub positions: Vec<SuiteEntry>,
}

impl Suite {
    /// Reads a suite from `path`. A missing file is an error.
    pub fn load(path: &Path) -> Result<Self, SuiteError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, SuiteError> {
        let suite: Suite = toml::from_str(content)?;
        if let Some(entry) = suite.positions.iter().find(|e| e.counts.is_empty()) {
            return Err(SuiteError::NoCounts(entry.name.clone()));
        }
        Ok(suite)
    }

    /// The published reference positions.
    pub fn builtin() -> Self {
        let entry = |name: &str, fen: &str, counts: &[u64]| SuiteEntry {
            name: name.to_string(),
            fen: fen.to_string(),
            counts: counts.to_vec(),
        };
        Suite {
            positions: vec![
                entry("startpos", Fen::STARTPOS, &[20, 400, 8_902, 197_281, 4_865_609]),
                entry(
                    "kiwipete",
                    "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
                    &[48, 2_039, 97_862, 4_085_603],
                ),
                entry(
                    "position3",
                    "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
                    &[14, 191, 2_812, 43_238, 674_624],
                ),
                entry(
                    "position4",
                    "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1",
                    &[6, 264, 9_467, 422_333],
                ),
                entry(
                    "position5",
                    "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8",
                    &[44, 1_486, 62_379, 2_103_487],
                ),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_suite() {
        let suite = Suite::parse(
            r#"
[[positions]]
name = "startpos"
fen = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"
counts = [20, 400]

[[positions]]
name = "bare kings"
fen = "4k3/8/8/8/8/8/8/4K3 w - - 0 1"
counts = [5]
"#,
        )
        .unwrap();
        assert_eq!(suite.positions.len(), 2);
        assert_eq!(suite.positions[0].counts, vec![20, 400]);
        assert_eq!(suite.positions[1].name, "bare kings");
    }

    #[test]
    fn empty_file_is_an_empty_suite() {
        assert_eq!(Suite::parse("").unwrap().positions.len(), 0);
    }

    #[test]
    fn rejects_entries_without_counts() {
        let err = Suite::parse(
            r#"
[[positions]]
name = "nothing"
fen = "4k3/8/8/8/8/8/8/4K3 w - - 0 1"
counts = []
"#,
        )
        .unwrap_err();
        assert!(matches!(err, SuiteError::NoCounts(name) if name == "nothing"));
    }

    #[test]
    fn rejects_bad_toml() {
        assert!(matches!(
            Suite::parse("positions = 3"),
            Err(SuiteError::ParseError(_))
        ));
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(matches!(
            Suite::load(Path::new("/nonexistent/suite.toml")),
            Err(SuiteError::ReadError(_))
        ));
    }

    #[test]
    fn builtin_fens_parse() {
        for entry in Suite::builtin().positions {
            assert!(Fen::parse(&entry.fen).is_ok(), "{}", entry.name);
        }
    }
}
