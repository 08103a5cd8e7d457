//! Incremental reconstruction of a symbol record from page text fragments.
//!
//! The symbol lookup page renders company name, trading symbol, ISIN and BSE
//! code as a run of text nodes. An external HTML extractor hands those nodes
//! over in document order; [`SymbolTextParser`] assigns each non-empty
//! fragment to the next unfilled field. Occasionally two fields share one
//! node separated by whitespace (`"HDFCBANK  INE040A01034"`), so once the
//! company name is known, fragments are split on whitespace first.
//!
//! ```
//! use nse_rs::symbol::SymbolTextParser;
//!
//! let mut parser = SymbolTextParser::new();
//! parser.feed(["HDFC Bank Ltd", "HDFCBANK  INE040A01034", "500180"]);
//! let record = parser.result().unwrap();
//! assert_eq!(record.symbol, "HDFCBANK");
//! assert_eq!(record.isin.as_deref(), Some("INE040A01034"));
//! ```

use serde::{Deserialize, Serialize};

const COMPANY_NAME: usize = 0;
const SYMBOL: usize = 1;
const ISIN: usize = 2;
const BSE_CODE: usize = 3;
const FIELD_COUNT: usize = 4;

/// A resolved symbol record. `isin` and `bse_code` may be missing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolRecord {
    pub company_name: String,
    pub symbol: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub isin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bse_code: Option<String>,
}

/// Progress of a [`SymbolTextParser`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParserState {
    /// Nothing captured yet.
    Empty,
    /// Some fields captured, but no symbol yet.
    Accumulating,
    /// At least the symbol is known.
    Resolved,
}

/// Fills `company_name`, `symbol`, `isin`, `bse_code` in that order.
#[derive(Debug, Clone, Default)]
pub struct SymbolTextParser {
    fields: [Option<String>; FIELD_COUNT],
}

impl SymbolTextParser {
    /// Create an empty parser.
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume fragments in document order. Fragments arriving after all
    /// four fields are filled are ignored.
    pub fn feed<I, S>(&mut self, fragments: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for fragment in fragments {
            let fragment = fragment.as_ref().trim();
            if fragment.is_empty() {
                continue;
            }
            let company_known = self.fields[COMPANY_NAME].is_some();
            for token in tokens(fragment, company_known) {
                self.place(token);
            }
        }
    }

    /// The record, once the symbol is known.
    pub fn result(&self) -> Option<SymbolRecord> {
        let symbol = self.fields[SYMBOL].clone()?;
        Some(SymbolRecord {
            company_name: self.fields[COMPANY_NAME].clone().unwrap_or_default(),
            symbol,
            isin: self.fields[ISIN].clone(),
            bse_code: self.fields[BSE_CODE].clone(),
        })
    }

    /// Current progress.
    pub fn state(&self) -> ParserState {
        if self.fields[SYMBOL].is_some() {
            ParserState::Resolved
        } else if self.fields.iter().any(Option::is_some) {
            ParserState::Accumulating
        } else {
            ParserState::Empty
        }
    }

    /// Discard everything captured so far.
    pub fn reset(&mut self) {
        self.fields = Default::default();
    }

    fn place(&mut self, token: &str) {
        if let Some(slot) = self.fields.iter_mut().find(|field| field.is_none()) {
            *slot = Some(token.to_owned());
        }
    }
}

/// A company name may contain spaces; any later field may not.
fn tokens(fragment: &str, company_known: bool) -> Vec<&str> {
    if company_known {
        fragment.split_whitespace().collect()
    } else {
        vec![fragment]
    }
}
