//! 80-column FITS header cards

use crate::image_pipeline::common::error::{ConversionError, Result};

pub const CARD_SIZE: usize = 80;
pub const BLOCK_SIZE: usize = 2880;

/// Keywords regenerated from the data on every write.
const STRUCTURAL_KEYWORDS: [&str; 9] = [
    "SIMPLE", "XTENSION", "BITPIX", "NAXIS", "EXTEND", "PCOUNT", "GCOUNT", "BZERO", "BSCALE",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    raw: String,
}

impl Card {
    /// Parses one card. Lines shorter than 80 columns are padded with spaces.
    pub fn parse(text: &str) -> Option<Self> {
        if text.len() > CARD_SIZE || !text.bytes().all(|b| (0x20..=0x7e).contains(&b)) {
            return None;
        }
        Some(Self {
            raw: format!("{:<width$}", text, width = CARD_SIZE),
        })
    }

    pub fn integer(keyword: &str, value: i64) -> Self {
        Self::with_value(keyword, &format!("{:>20}", value))
    }

    pub fn logical(keyword: &str, value: bool) -> Self {
        Self::with_value(keyword, &format!("{:>20}", if value { "T" } else { "F" }))
    }

    pub fn string(keyword: &str, value: &str) -> Self {
        let quoted = format!("'{:<8}'", value.replace('\'', "''"));
        Self::with_value(keyword, &format!("{:<20}", quoted))
    }

    pub fn end() -> Self {
        Self {
            raw: format!("{:<width$}", "END", width = CARD_SIZE),
        }
    }

    fn with_value(keyword: &str, value: &str) -> Self {
        let mut raw = format!("{:<8}= {}", keyword, value);
        raw.truncate(CARD_SIZE);
        Self {
            raw: format!("{:<width$}", raw, width = CARD_SIZE),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn keyword(&self) -> &str {
        self.raw[..8].trim_end()
    }

    pub fn is_end(&self) -> bool {
        self.keyword() == "END"
    }

    /// True for keywords the writer derives from the data instead of copying.
    pub fn is_structural(&self) -> bool {
        let keyword = self.keyword();
        if keyword == "END" || STRUCTURAL_KEYWORDS.contains(&keyword) {
            return true;
        }
        keyword
            .strip_prefix("NAXIS")
            .is_some_and(|axis| !axis.is_empty() && axis.bytes().all(|b| b.is_ascii_digit()))
    }

    /// The value field, without its comment, for `KEYWORD = value / comment` cards.
    pub fn value(&self) -> Option<&str> {
        if &self.raw[8..10] != "= " {
            return None;
        }
        let field = &self.raw[10..];
        let trimmed = field.trim_start();

        if let Some(rest) = trimmed.strip_prefix('\'') {
            let mut chars = rest.char_indices().peekable();
            while let Some((i, c)) = chars.next() {
                if c == '\'' {
                    if matches!(chars.peek(), Some((_, '\''))) {
                        chars.next();
                        continue;
                    }
                    let start = field.len() - trimmed.len();
                    return Some(&field[start..start + i + 2]);
                }
            }
            return Some(trimmed.trim_end());
        }

        let value = match trimmed.find('/') {
            Some(slash) => &trimmed[..slash],
            None => trimmed,
        };
        Some(value.trim())
    }

    pub fn integer_value(&self) -> Option<i64> {
        let value = self.value()?;
        value.parse::<i64>().ok().or_else(|| {
            let real = self.real_value()?;
            (real.fract() == 0.0).then_some(real as i64)
        })
    }

    pub fn real_value(&self) -> Option<f64> {
        self.value()?.replace(['D', 'd'], "E").parse::<f64>().ok()
    }

    pub fn string_value(&self) -> Option<String> {
        let value = self.value()?;
        let inner = value.strip_prefix('\'')?.strip_suffix('\'')?;
        Some(inner.replace("''", "'").trim_end().to_string())
    }

    /// Same keyword and the same value, however each card formats it.
    pub fn states_same_value(&self, other: &Card) -> bool {
        if self.keyword() != other.keyword() {
            return false;
        }
        match (self.string_value(), other.string_value()) {
            (Some(a), Some(b)) => a == b,
            (None, None) => match (self.integer_value(), other.integer_value()) {
                (Some(a), Some(b)) => a == b,
                _ => self.value().is_some() && self.value() == other.value(),
            },
            _ => false,
        }
    }
}

/// Looks up the first card carrying `keyword`.
pub fn find<'a>(cards: &'a [Card], keyword: &str) -> Option<&'a Card> {
    cards.iter().find(|card| card.keyword() == keyword)
}

/// Splits a header blob into cards, stopping at `END`.
///
/// Accepts either fixed 80-column cards concatenated without separators or
/// one card per line.
pub fn parse_blob(blob: &str) -> Result<Vec<Card>> {
    let malformed = |detail: &str| ConversionError::MalformedSideChannel(format!("FITS header {}", detail));

    let lines: Vec<&str> = if blob.contains('\n') {
        blob.lines().collect()
    } else {
        if !blob.is_ascii() {
            return Err(malformed("contains non-ASCII characters"));
        }
        (0..blob.len())
            .step_by(CARD_SIZE)
            .map(|start| &blob[start..(start + CARD_SIZE).min(blob.len())])
            .collect()
    };

    let mut cards = Vec::with_capacity(lines.len());
    for line in lines {
        let card = Card::parse(line.trim_end_matches('\r'))
            .ok_or_else(|| malformed("card is not 80 printable ASCII columns"))?;
        if card.is_end() {
            break;
        }
        cards.push(card);
    }
    Ok(cards)
}

/// Concatenates cards into a blob without an `END` card or block padding.
pub fn to_blob(cards: &[Card]) -> String {
    cards.iter().map(Card::as_str).collect()
}

/// A complete header as a blob: every card, then `END`, without block padding.
pub fn header_blob(cards: &[Card]) -> String {
    let mut blob = to_blob(cards);
    blob.push_str(Card::end().as_str());
    blob
}

/// Reads header cards from the start of `data` up to and including `END`.
/// Returns the cards before `END` and the padded header length in bytes.
pub fn read_header(data: &[u8]) -> Result<(Vec<Card>, usize)> {
    let mut cards = Vec::new();

    for (index, chunk) in data.chunks_exact(CARD_SIZE).enumerate() {
        let text = std::str::from_utf8(chunk)
            .ok()
            .and_then(Card::parse)
            .ok_or_else(|| ConversionError::SourceUnreadable("invalid FITS header card".to_string()))?;

        if text.is_end() {
            let used = (index + 1) * CARD_SIZE;
            return Ok((cards, used.div_ceil(BLOCK_SIZE) * BLOCK_SIZE));
        }
        cards.push(text);
    }

    Err(ConversionError::SourceUnreadable("FITS header has no END card".to_string()))
}

/// Serializes cards plus `END`, padded with spaces to a whole block.
pub fn write_header(cards: &[Card], out: &mut Vec<u8>) {
    let start = out.len();
    for card in cards {
        out.extend_from_slice(card.as_str().as_bytes());
    }
    out.extend_from_slice(Card::end().as_str().as_bytes());
    pad_block(out, start, b' ');
}

/// Pads `out` from `start` to the next block boundary with `fill`.
pub fn pad_block(out: &mut Vec<u8>, start: usize, fill: u8) {
    let written = out.len() - start;
    let padded = written.div_ceil(BLOCK_SIZE) * BLOCK_SIZE;
    out.resize(start + padded, fill);
}
